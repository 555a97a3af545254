use std::fs;
use std::io::{BufReader, Read};
use std::path::{Path, PathBuf};

use super::JavamapConfig;
use crate::core::{Error, Result};

pub const CONFIG_FILE_NAME: &str = ".javamap.toml";

const MAX_TRAVERSAL_DEPTH: usize = 10;

/// Read a config file's contents
fn read_config_file(path: &Path) -> std::result::Result<String, std::io::Error> {
    let file = fs::File::open(path)?;
    let mut reader = BufReader::new(file);
    let mut contents = String::new();
    reader.read_to_string(&mut contents)?;
    Ok(contents)
}

/// Parse and validate config from a TOML string
pub fn parse_config(contents: &str) -> Result<JavamapConfig> {
    let config = toml::from_str::<JavamapConfig>(contents)
        .map_err(|e| Error::config(format!("failed to parse {CONFIG_FILE_NAME}: {e}")))?;
    config.validate()?;
    Ok(config)
}

/// Try one path: Ok(None) when absent, Err when present but unusable.
///
/// A malformed config file is fatal, not downgraded, since running with
/// silently different settings than the user wrote is worse than stopping.
fn try_load_config_from_path(config_path: &Path) -> Result<Option<JavamapConfig>> {
    let contents = match read_config_file(config_path) {
        Ok(contents) => contents,
        Err(e) if e.kind() == std::io::ErrorKind::NotFound => return Ok(None),
        Err(e) => {
            return Err(Error::config(format!(
                "failed to read {}: {}",
                config_path.display(),
                e
            )))
        }
    };

    let config = parse_config(&contents)?;
    log::debug!("Loaded config from {}", config_path.display());
    Ok(Some(config))
}

/// Directory ancestors of `start`, up to a depth limit
pub fn directory_ancestors(start: PathBuf, max_depth: usize) -> impl Iterator<Item = PathBuf> {
    std::iter::successors(Some(start), |dir| {
        let mut parent = dir.clone();
        if parent.pop() {
            Some(parent)
        } else {
            None
        }
    })
    .take(max_depth)
}

/// Locate and load .javamap.toml by walking up from `start`.
///
/// Absence anywhere in the chain means defaults; the first file found
/// wins and is validated before anything else runs.
pub fn load_config(start: &Path) -> Result<JavamapConfig> {
    let origin = if start.is_absolute() {
        start.to_path_buf()
    } else {
        std::env::current_dir()?.join(start)
    };

    for dir in directory_ancestors(origin, MAX_TRAVERSAL_DEPTH) {
        if let Some(config) = try_load_config_from_path(&dir.join(CONFIG_FILE_NAME))? {
            return Ok(config);
        }
    }

    log::debug!(
        "No {} found after checking {} directories, using defaults",
        CONFIG_FILE_NAME,
        MAX_TRAVERSAL_DEPTH
    );
    Ok(JavamapConfig::default())
}
