mod loader;

pub use loader::{directory_ancestors, load_config, parse_config};

use crate::core::{Error, Result};
use serde::{Deserialize, Serialize};

/// File selection configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FilesConfig {
    /// Glob patterns for files and directories to skip
    #[serde(default = "default_exclude")]
    pub exclude: Vec<String>,

    /// Files larger than this are recorded as failed, not read
    #[serde(default = "default_max_file_size_bytes")]
    pub max_file_size_bytes: u64,

    /// Per-file parse time limit; a file exceeding it is marked failed
    #[serde(default = "default_parse_timeout_secs")]
    pub parse_timeout_secs: u64,
}

impl Default for FilesConfig {
    fn default() -> Self {
        Self {
            exclude: default_exclude(),
            max_file_size_bytes: default_max_file_size_bytes(),
            parse_timeout_secs: default_parse_timeout_secs(),
        }
    }
}

fn default_exclude() -> Vec<String> {
    [
        "**/target/**",
        "**/build/**",
        "**/out/**",
        "**/.git/**",
        "**/test/**",
        "**/tests/**",
        "**/*Test.java",
        "**/*Tests.java",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

fn default_max_file_size_bytes() -> u64 {
    2 * 1024 * 1024
}

fn default_parse_timeout_secs() -> u64 {
    10
}

/// Service boundary detection configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct BoundaryConfig {
    /// A package group is a boundary candidate when edges leaving it,
    /// divided by edges inside it, stay below this ratio
    #[serde(default = "default_coupling_threshold")]
    pub coupling_threshold: f64,

    /// Groups with fewer types than this are not reported
    #[serde(default = "default_min_group_types")]
    pub min_group_types: usize,
}

impl Default for BoundaryConfig {
    fn default() -> Self {
        Self {
            coupling_threshold: default_coupling_threshold(),
            min_group_types: default_min_group_types(),
        }
    }
}

fn default_coupling_threshold() -> f64 {
    0.15
}

fn default_min_group_types() -> usize {
    2
}

/// Legacy API detection configuration
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct LegacyConfig {
    /// Regex patterns matched against qualified target names (deny list)
    #[serde(default)]
    pub patterns: Vec<String>,

    /// Regex patterns exempting otherwise-denied targets
    #[serde(default)]
    pub allow: Vec<String>,

    /// Legacy table names searched in string literals and @Table values
    #[serde(default)]
    pub tables: Vec<String>,
}

/// Integration pattern recognition lists.
///
/// Defaults cover the Spring MVC, Feign, JAX-RS and Kafka/JMS/AMQP
/// shapes; projects on other stacks override them in config.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct IntegrationConfig {
    /// Type-level annotations marking a REST server class
    #[serde(default = "default_server_annotations")]
    pub server_annotations: Vec<String>,

    /// Method-level annotations mapping an HTTP endpoint
    #[serde(default = "default_mapping_annotations")]
    pub mapping_annotations: Vec<String>,

    /// Type-level annotations marking a declarative HTTP client
    #[serde(default = "default_client_annotations")]
    pub client_annotations: Vec<String>,

    /// Field or local types marking programmatic HTTP client usage
    #[serde(default = "default_client_types")]
    pub client_types: Vec<String>,

    /// Method-level annotations marking a message consumer
    #[serde(default = "default_listener_annotations")]
    pub listener_annotations: Vec<String>,

    /// Field or local types marking a message producer
    #[serde(default = "default_producer_types")]
    pub producer_types: Vec<String>,
}

impl Default for IntegrationConfig {
    fn default() -> Self {
        Self {
            server_annotations: default_server_annotations(),
            mapping_annotations: default_mapping_annotations(),
            client_annotations: default_client_annotations(),
            client_types: default_client_types(),
            listener_annotations: default_listener_annotations(),
            producer_types: default_producer_types(),
        }
    }
}

fn default_server_annotations() -> Vec<String> {
    ["RestController", "Controller", "Path"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

fn default_mapping_annotations() -> Vec<String> {
    [
        "RequestMapping",
        "GetMapping",
        "PostMapping",
        "PutMapping",
        "DeleteMapping",
        "PatchMapping",
        "GET",
        "POST",
        "PUT",
        "DELETE",
    ]
    .iter()
    .map(|s| s.to_string())
    .collect()
}

fn default_client_annotations() -> Vec<String> {
    vec!["FeignClient".to_string()]
}

fn default_client_types() -> Vec<String> {
    ["RestTemplate", "WebClient", "HttpClient"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

fn default_listener_annotations() -> Vec<String> {
    ["KafkaListener", "JmsListener", "RabbitListener"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

fn default_producer_types() -> Vec<String> {
    ["KafkaTemplate", "JmsTemplate", "RabbitTemplate"]
        .iter()
        .map(|s| s.to_string())
        .collect()
}

/// One stereotype naming rule: types annotated with `annotation`
/// should carry `suffix` in their simple name
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct SuffixRule {
    pub annotation: String,
    pub suffix: String,
}

/// Naming convention configuration
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NamingConfig {
    #[serde(default = "default_suffix_rules")]
    pub suffix_rules: Vec<SuffixRule>,
}

impl Default for NamingConfig {
    fn default() -> Self {
        Self {
            suffix_rules: default_suffix_rules(),
        }
    }
}

fn default_suffix_rules() -> Vec<SuffixRule> {
    [
        ("RestController", "Controller"),
        ("Controller", "Controller"),
        ("Service", "Service"),
        ("Repository", "Repository"),
    ]
    .iter()
    .map(|(annotation, suffix)| SuffixRule {
        annotation: annotation.to_string(),
        suffix: suffix.to_string(),
    })
    .collect()
}

/// Top-level javamap configuration, read from .javamap.toml
#[derive(Debug, Clone, Default, Serialize, Deserialize)]
pub struct JavamapConfig {
    #[serde(default)]
    pub files: FilesConfig,
    #[serde(default)]
    pub boundaries: BoundaryConfig,
    #[serde(default)]
    pub legacy: LegacyConfig,
    #[serde(default)]
    pub integration: IntegrationConfig,
    #[serde(default)]
    pub naming: NamingConfig,
}

impl JavamapConfig {
    /// Validate everything a run depends on, before any file is touched.
    ///
    /// Invalid globs or regexes cannot be meaningfully recovered from,
    /// so they are fatal here rather than degraded later.
    pub fn validate(&self) -> Result<()> {
        for pattern in &self.files.exclude {
            glob::Pattern::new(pattern)
                .map_err(|e| Error::config(format!("invalid exclude glob `{pattern}`: {e}")))?;
        }
        for pattern in self.legacy.patterns.iter().chain(&self.legacy.allow) {
            regex::Regex::new(pattern).map_err(|e| {
                Error::config(format!("invalid legacy API pattern `{pattern}`: {e}"))
            })?;
        }
        validate_threshold(self.boundaries.coupling_threshold)
            .map_err(Error::config)?;
        if self.files.max_file_size_bytes == 0 {
            return Err(Error::config("max_file_size_bytes must be positive"));
        }
        if self.files.parse_timeout_secs == 0 {
            return Err(Error::config("parse_timeout_secs must be positive"));
        }
        Ok(())
    }
}

fn validate_threshold(threshold: f64) -> std::result::Result<(), String> {
    if threshold.is_finite() && threshold > 0.0 {
        Ok(())
    } else {
        Err(format!(
            "coupling_threshold must be a positive number, got {threshold}"
        ))
    }
}
