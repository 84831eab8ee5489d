///
/// # Connection Configuration
///
/// How a connection is opened: which database, whether it may write or
/// create, and how long to wait on a locked database before giving up.
///
/// ## Example
///
/// ```toml
/// path = "data/app.db"
/// read_only = false
/// create = true
/// busy_timeout_ms = 2000
/// ```
///
/// Every field is optional. The default is a writable in-memory database.
/// Unknown keys are rejected so typos do not pass silently. `create` only
/// applies to writable connections and is ignored when `read_only` is set.
///

use std::path::{Path, PathBuf};

use miette::Diagnostic;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub const MEMORY_PATH: &str = ":memory:";

#[derive(Debug, Error, Diagnostic)]
pub enum ConfigError {
    #[error("Failed to read config at {path}: {source}")]
    #[diagnostic(code(squeal::config::io))]
    Io {
        path: PathBuf,
        source: std::io::Error,
    },

    #[error("Failed to parse config: {reason}")]
    #[diagnostic(code(squeal::config::parse))]
    Parse { reason: String },

    #[error("Invalid config: {0}")]
    #[diagnostic(code(squeal::config::invalid))]
    Invalid(String),
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct ConnectionConfig {
    pub path: PathBuf,
    pub read_only: bool,
    pub create: bool,
    pub busy_timeout_ms: Option<u64>,
}

impl Default for ConnectionConfig {
    fn default() -> Self {
        Self {
            path: PathBuf::from(MEMORY_PATH),
            read_only: false,
            create: true,
            busy_timeout_ms: None,
        }
    }
}

impl ConnectionConfig {
    pub fn in_memory() -> Self {
        Self::default()
    }

    pub fn at_path(path: impl Into<PathBuf>) -> Self {
        Self {
            path: path.into(),
            ..Self::default()
        }
    }

    pub fn read_only(mut self, read_only: bool) -> Self {
        self.read_only = read_only;
        if read_only {
            self.create = false;
        }
        self
    }

    pub fn busy_timeout_ms(mut self, millis: u64) -> Self {
        self.busy_timeout_ms = Some(millis);
        self
    }

    /// Whether opening may create the database file.
    pub fn creates(&self) -> bool {
        self.create && !self.read_only
    }

    pub fn is_in_memory(&self) -> bool {
        self.path.as_os_str() == MEMORY_PATH
    }

    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let config: Self = toml::from_str(content).map_err(|e| ConfigError::Parse {
            reason: e.to_string(),
        })?;
        config.validate()?;
        Ok(config)
    }

    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    pub fn validate(&self) -> Result<(), ConfigError> {
        if self.path.as_os_str().is_empty() {
            return Err(ConfigError::Invalid("path must not be empty".to_string()));
        }
        Ok(())
    }
}
