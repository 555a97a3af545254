//! Shared error types for the analysis engine

use serde::{Deserialize, Serialize};
use std::path::PathBuf;
use thiserror::Error;

/// Errors that abort an analysis run.
///
/// Per-file read and parse problems never surface here; the engine
/// downgrades them to [`Warning`]s and keeps going.
#[derive(Debug, Error)]
pub enum Error {
    /// Two declarations produced the same qualified name; the model
    /// cannot represent both, so the run fails
    #[error(
        "Duplicate type `{qualified_name}`: declared in both {} and {}",
        first.display(),
        second.display()
    )]
    DuplicateType {
        qualified_name: String,
        first: PathBuf,
        second: PathBuf,
    },

    /// Invalid configuration; fatal before any file is processed
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// IO errors
    #[error(transparent)]
    Io(#[from] std::io::Error),

    /// JSON errors
    #[error(transparent)]
    Json(#[from] serde_json::Error),

    /// Invalid exclude glob
    #[error(transparent)]
    Pattern(#[from] glob::PatternError),

    /// Invalid legacy-API pattern
    #[error(transparent)]
    Regex(#[from] regex::Error),
}

impl Error {
    /// Create a configuration error
    pub fn config(message: impl Into<String>) -> Self {
        Self::Configuration(message.into())
    }
}

/// Result type alias using our error type
pub type Result<T> = std::result::Result<T, Error>;

/// Warning categories surfaced in the exported model
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize,
)]
#[serde(rename_all = "snake_case")]
pub enum WarningCategory {
    FileRead,
    Parse,
    Resolution,
    Detector,
}

impl WarningCategory {
    /// Get the display name for this category
    pub fn display_name(&self) -> &str {
        match self {
            WarningCategory::FileRead => "file-read",
            WarningCategory::Parse => "parse",
            WarningCategory::Resolution => "resolution",
            WarningCategory::Detector => "detector",
        }
    }
}

/// A recovered, per-file or per-edge problem that degraded the model
/// without aborting the run.
#[derive(Debug, Clone, PartialEq, Eq, PartialOrd, Ord, Serialize, Deserialize)]
pub struct Warning {
    pub file: Option<PathBuf>,
    pub category: WarningCategory,
    pub message: String,
}

impl Warning {
    pub fn file_read(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self {
            file: Some(path.into()),
            category: WarningCategory::FileRead,
            message: message.into(),
        }
    }

    pub fn parse(path: impl Into<PathBuf>, message: impl Into<String>) -> Self {
        Self {
            file: Some(path.into()),
            category: WarningCategory::Parse,
            message: message.into(),
        }
    }

    pub fn resolution(path: Option<PathBuf>, message: impl Into<String>) -> Self {
        Self {
            file: path,
            category: WarningCategory::Resolution,
            message: message.into(),
        }
    }

    pub fn detector(detector: &str, message: impl Into<String>) -> Self {
        Self {
            file: None,
            category: WarningCategory::Detector,
            message: format!("{}: {}", detector, message.into()),
        }
    }
}
