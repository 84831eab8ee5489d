///
/// Statement Error Types
///
/// Errors raised by the execution core. Local errors are detected before the
/// engine is called; engine errors are carried through unchanged.
///
/// Error categories:
/// - UnknownParameter: a named placeholder the engine never registered
/// - ParameterOutOfRange: a positional index outside 1..=parameter_count
/// - ColumnOutOfRange: a column index outside 0..column_count
/// - UnknownColumn: a column name missing from the catalog
/// - EmptyStatement: the SQL text compiled to no statement at all
/// - Engine: whatever the engine reported for bind/step/reset/finalize
///

use miette::Diagnostic;
use thiserror::Error;

/// An error reported by the underlying SQL engine.
///
/// `code` is the engine's (extended) result code; `message` is its
/// connection-scoped description at the time of the failure.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("{message} (code {code})")]
pub struct EngineError {
    pub code: i32,
    pub message: String,
}

impl EngineError {
    pub fn new(code: i32, message: impl Into<String>) -> Self {
        Self {
            code,
            message: message.into(),
        }
    }

    /// The primary result code, with extended bits stripped.
    pub fn primary_code(&self) -> i32 {
        self.code & 0xff
    }
}

#[derive(Debug, Error, Diagnostic)]
pub enum SquealError {
    #[error("unknown bind parameter '{0}'")]
    #[diagnostic(
        code(squeal::unknown_parameter),
        help("named placeholders include their prefix, e.g. ':name', '@name' or '$name'")
    )]
    UnknownParameter(String),

    #[error("parameter index {index} out of range (statement has {count} parameters)")]
    #[diagnostic(
        code(squeal::parameter_out_of_range),
        help("parameter indices are 1-based")
    )]
    ParameterOutOfRange { index: usize, count: usize },

    #[error("column index {index} out of range (statement has {count} columns)")]
    #[diagnostic(
        code(squeal::column_out_of_range),
        help("column indices are 0-based")
    )]
    ColumnOutOfRange { index: usize, count: usize },

    #[error("unknown column '{0}'")]
    #[diagnostic(code(squeal::unknown_column))]
    UnknownColumn(String),

    #[error("statement contains no SQL")]
    #[diagnostic(code(squeal::empty_statement))]
    EmptyStatement,

    #[error("engine error: {0}")]
    #[diagnostic(code(squeal::engine))]
    Engine(#[from] EngineError),
}

impl SquealError {
    /// The engine error behind this error, if the engine raised it.
    pub fn engine_error(&self) -> Option<&EngineError> {
        match self {
            SquealError::Engine(e) => Some(e),
            _ => None,
        }
    }
}

pub type Result<T, E = SquealError> = std::result::Result<T, E>;
