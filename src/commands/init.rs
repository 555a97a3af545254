use crate::io;
use anyhow::Result;
use std::path::PathBuf;

const DEFAULT_CONFIG: &str = r#"# Javamap Configuration

[files]
# Glob patterns skipped during the walk, matched against paths relative
# to the analysis root. Test sources are skipped by default.
exclude = [
    "**/target/**",
    "**/build/**",
    "**/out/**",
    "**/.git/**",
    "**/test/**",
    "**/tests/**",
    "**/*Test.java",
    "**/*Tests.java"
]
# Files above this size are recorded as failed, not parsed
max_file_size_bytes = 2097152
# Per-file parse time limit in seconds
parse_timeout_secs = 10

[boundaries]
# A package group is a boundary candidate when its edges leaving the
# group, divided by edges staying inside, fall below this ratio
coupling_threshold = 0.15
# Groups with fewer types than this are ignored
min_group_types = 2

[legacy]
# Regexes over qualified names (and name.method); matching references
# are flagged unless an allow pattern also matches
patterns = []
allow = []
# Table names searched in @Table values and string literals
tables = []

[integration]
# Annotations marking HTTP server endpoints and their route mappings
server_annotations = ["RestController", "Controller", "Path"]
mapping_annotations = [
    "RequestMapping",
    "GetMapping",
    "PostMapping",
    "PutMapping",
    "DeleteMapping",
    "PatchMapping",
    "GET",
    "POST",
    "PUT",
    "DELETE"
]
# HTTP client shapes: annotated interfaces and well-known client types
client_annotations = ["FeignClient"]
client_types = ["RestTemplate", "WebClient", "HttpClient"]
# Messaging shapes
listener_annotations = ["KafkaListener", "JmsListener", "RabbitListener"]
producer_types = ["KafkaTemplate", "JmsTemplate", "RabbitTemplate"]

[naming]
# Stereotype suffix conventions checked by the naming detector
suffix_rules = [
    { annotation = "RestController", suffix = "Controller" },
    { annotation = "Controller", suffix = "Controller" },
    { annotation = "Service", suffix = "Service" },
    { annotation = "Repository", suffix = "Repository" }
]
"#;

pub fn init_config(force: bool) -> Result<()> {
    let config_path = PathBuf::from(".javamap.toml");

    if config_path.exists() && !force {
        anyhow::bail!("Configuration file already exists. Use --force to overwrite.");
    }

    io::write_file(&config_path, DEFAULT_CONFIG)?;
    println!("Created .javamap.toml configuration file");

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::config::{parse_config, JavamapConfig};

    #[test]
    fn test_default_template_parses_and_matches_defaults() {
        let parsed = parse_config(DEFAULT_CONFIG).unwrap();
        let defaults = JavamapConfig::default();

        assert_eq!(parsed.files.exclude, defaults.files.exclude);
        assert_eq!(parsed.files.max_file_size_bytes, defaults.files.max_file_size_bytes);
        assert_eq!(
            parsed.boundaries.coupling_threshold,
            defaults.boundaries.coupling_threshold
        );
        assert_eq!(
            parsed.integration.server_annotations,
            defaults.integration.server_annotations
        );
        assert_eq!(parsed.naming.suffix_rules, defaults.naming.suffix_rules);
    }

    #[test]
    fn test_default_template_validates() {
        let parsed = parse_config(DEFAULT_CONFIG).unwrap();
        assert!(parsed.validate().is_ok());
    }
}
