///
/// # CLI Settings
///
/// Optional TOML file passed with `--config`.
///
/// ## Example
///
/// ```toml
/// [connection]
/// busy_timeout_ms = 1000
///
/// [output]
/// separator = ","
/// null_text = "NULL"
/// headers = false
/// format = "json"
/// ```
///
/// The database path given on the command line replaces `connection.path`.
///

use std::path::Path;

use clap::ValueEnum;
use serde::{Deserialize, Serialize};
use squeal_sqlite3::{ConfigError, ConnectionConfig};

#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Deserialize, Serialize, ValueEnum)]
#[serde(rename_all = "lowercase")]
pub enum OutputFormat {
    /// One line per row, cells joined by the separator
    #[default]
    List,
    /// A JSON document with `columns` and `rows`
    Json,
}

#[derive(Debug, Clone, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct OutputConfig {
    pub separator: String,
    pub null_text: String,
    pub headers: bool,
    pub format: OutputFormat,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            separator: "|".to_string(),
            null_text: String::new(),
            headers: true,
            format: OutputFormat::List,
        }
    }
}

#[derive(Debug, Clone, Default, PartialEq, Eq, Deserialize, Serialize)]
#[serde(default, deny_unknown_fields)]
pub struct Settings {
    pub connection: ConnectionConfig,
    pub output: OutputConfig,
}

impl Settings {
    pub fn from_toml_str(content: &str) -> Result<Self, ConfigError> {
        let settings: Self = toml::from_str(content).map_err(|e| ConfigError::Parse {
            reason: e.to_string(),
        })?;
        settings.connection.validate()?;
        Ok(settings)
    }

    pub fn from_path(path: &Path) -> Result<Self, ConfigError> {
        let content = std::fs::read_to_string(path).map_err(|source| ConfigError::Io {
            path: path.to_path_buf(),
            source,
        })?;
        Self::from_toml_str(&content)
    }

    /// Defaults when no file is given.
    pub fn load(path: Option<&Path>) -> Result<Self, ConfigError> {
        match path {
            Some(path) => Self::from_path(path),
            None => Ok(Self::default()),
        }
    }
}
