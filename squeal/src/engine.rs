///
/// Engine Boundary
///
/// The execution core never parses, plans, or stores anything itself. All of
/// that belongs to an external SQL engine, reached through one prepared
/// statement handle per cursor.
///
/// Indexing conventions follow the engine's C interface:
/// - parameters are 1-based
/// - columns are 0-based
///
/// The core validates indices before calling in, so implementations may
/// assume `1..=parameter_count()` and `0..column_count()`.
///
/// Column reads are only meaningful while the statement sits on a row; the
/// core never calls them otherwise.
///

use crate::error::EngineError;
use crate::value::ColumnType;

/// Outcome of one engine step that did not fail.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum StepStatus {
    Row,
    Done,
}

/// A prepared statement owned by the engine.
///
/// The handle is move-only. `finalize` consumes it, so a handle can be
/// finalized at most once; implementations must also release the native
/// statement when dropped without an explicit `finalize`.
pub trait StatementHandle {
    fn parameter_count(&self) -> usize;

    /// Resolves a named placeholder (including its prefix) to its index.
    fn parameter_index(&self, name: &str) -> Option<usize>;

    fn parameter_name(&self, index: usize) -> Option<String>;

    fn bind_text(&mut self, index: usize, value: &str) -> Result<(), EngineError>;
    fn bind_int64(&mut self, index: usize, value: i64) -> Result<(), EngineError>;
    fn bind_double(&mut self, index: usize, value: f64) -> Result<(), EngineError>;
    fn bind_blob(&mut self, index: usize, value: &[u8]) -> Result<(), EngineError>;
    fn bind_null(&mut self, index: usize) -> Result<(), EngineError>;

    /// Sets every parameter back to NULL.
    fn clear_bindings(&mut self);

    fn column_count(&self) -> usize;
    fn column_name(&self, index: usize) -> Option<String>;

    fn column_type(&self, index: usize) -> ColumnType;
    fn column_int64(&self, index: usize) -> i64;
    fn column_double(&self, index: usize) -> f64;
    fn column_text(&self, index: usize) -> String;
    fn column_blob(&self, index: usize) -> Vec<u8>;

    fn step(&mut self) -> Result<StepStatus, EngineError>;
    fn reset(&mut self) -> Result<(), EngineError>;
    fn finalize(self) -> Result<(), EngineError>
    where
        Self: Sized;

    /// The SQL text the statement was prepared from.
    fn sql(&self) -> Option<String> {
        None
    }

    fn is_read_only(&self) -> bool {
        false
    }
}
