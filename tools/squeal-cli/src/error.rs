///
/// CLI error types.
///
/// Library errors pass through unchanged so their diagnostic codes and help
/// text reach the terminal; the CLI adds its own for argument parsing and
/// output.
///

use miette::Diagnostic;
use squeal_sqlite3::{ConfigError, SquealError};
use thiserror::Error;

#[derive(Debug, Error, Diagnostic)]
pub enum CliError {
    #[error(transparent)]
    #[diagnostic(transparent)]
    Sql(#[from] SquealError),

    #[error(transparent)]
    #[diagnostic(transparent)]
    Config(#[from] ConfigError),

    #[error("Invalid parameter '{raw}': {reason}")]
    #[diagnostic(
        code(squeal::cli::parameter),
        help("named parameters are written NAME=VALUE; blobs as x'CAFE'; quote text as '42' to keep it text")
    )]
    InvalidParameter { raw: String, reason: String },

    #[error("Failed to write output: {0}")]
    #[diagnostic(code(squeal::cli::io))]
    Io(#[from] std::io::Error),

    #[error("Failed to encode JSON: {0}")]
    #[diagnostic(code(squeal::cli::json))]
    Json(#[from] serde_json::Error),
}

impl CliError {
    pub fn invalid_parameter(raw: &str, reason: impl Into<String>) -> Self {
        CliError::InvalidParameter {
            raw: raw.to_string(),
            reason: reason.into(),
        }
    }
}
