//! Store configuration
//!
//! Loaded from a JSON file:
//!
//! ```json
//! { "backend": "file", "data_dir": "./data", "sync_writes": true, "log_level": "info" }
//! ```
//!
//! Every field except `data_dir` has a default; `data_dir` is required
//! for the file backend.

use std::fs;
use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::observability::Severity;

/// Result type for configuration loading
pub type ConfigResult<T> = Result<T, ConfigError>;

/// Configuration errors
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("Failed to read config {path}: {source}")]
    Read {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    #[error("Invalid config JSON: {0}")]
    Parse(#[from] serde_json::Error),

    #[error("Invalid config: {0}")]
    Invalid(String),
}

/// Which persistence collaborator backs the store
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum BackendKind {
    Memory,
    #[default]
    File,
}

/// Configuration file structure
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct StoreConfig {
    /// Backend selection (default: file)
    #[serde(default)]
    pub backend: BackendKind,

    /// Data directory (required for the file backend)
    #[serde(default)]
    pub data_dir: Option<PathBuf>,

    /// fsync after every append (default: true)
    #[serde(default = "default_sync_writes")]
    pub sync_writes: bool,

    /// Minimum log severity (default: "info")
    #[serde(default = "default_log_level")]
    pub log_level: String,
}

fn default_sync_writes() -> bool {
    true
}

fn default_log_level() -> String {
    "info".to_string()
}

impl Default for StoreConfig {
    fn default() -> Self {
        Self::memory()
    }
}

impl StoreConfig {
    /// In-memory store with default settings.
    pub fn memory() -> Self {
        Self {
            backend: BackendKind::Memory,
            data_dir: None,
            sync_writes: default_sync_writes(),
            log_level: default_log_level(),
        }
    }

    /// File-backed store rooted at `data_dir`.
    pub fn file(data_dir: impl Into<PathBuf>) -> Self {
        Self {
            backend: BackendKind::File,
            data_dir: Some(data_dir.into()),
            ..Self::memory()
        }
    }

    /// Load and validate configuration from a JSON file.
    pub fn load(path: &Path) -> ConfigResult<Self> {
        let content = fs::read_to_string(path).map_err(|source| ConfigError::Read {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_json(&content)
    }

    /// Parse and validate configuration from JSON text.
    pub fn from_json(content: &str) -> ConfigResult<Self> {
        let config: StoreConfig = serde_json::from_str(content)?;
        config.validate()?;
        Ok(config)
    }

    /// Checks cross-field constraints.
    pub fn validate(&self) -> ConfigResult<()> {
        if self.backend == BackendKind::File {
            match &self.data_dir {
                None => {
                    return Err(ConfigError::Invalid(
                        "data_dir is required when backend is 'file'".to_string(),
                    ))
                }
                Some(dir) if dir.as_os_str().is_empty() => {
                    return Err(ConfigError::Invalid("data_dir must not be empty".to_string()))
                }
                Some(_) => {}
            }
        }

        self.min_severity()?;
        Ok(())
    }

    /// Parsed `log_level`.
    pub fn min_severity(&self) -> ConfigResult<Severity> {
        self.log_level.parse().map_err(ConfigError::Invalid)
    }
}
