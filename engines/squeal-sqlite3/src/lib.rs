///
/// squeal SQLite3 Engine
///
/// Connects the squeal statement core to SQLite. Uses rusqlite with bundled
/// SQLite for zero system dependency; connections are opened through
/// rusqlite and statements are driven through the raw `sqlite3_stmt` API so
/// the core controls every step, reset and finalize.
///
/// Architecture:
/// - `SqliteConnection` owns the database handle and prepares statements.
/// - `SqliteStatement<'conn>` implements `StatementHandle` for one native
///   statement and borrows its connection.
/// - `Statement<'conn>` is the core's `StatementCursor` over that handle.
/// - `ConnectionConfig` describes how to open a database (TOML-loadable).
///
/// Errors use squeal's `SquealError`; SQLite failures arrive as
/// `SquealError::Engine` with the extended result code and message.
///

pub mod config;
pub mod connection;
pub mod statement;

pub use config::{ConfigError, ConnectionConfig};
pub use connection::{SqliteConnection, Statement};
pub use statement::SqliteStatement;

pub use squeal::{
    ColumnCatalog, ColumnType, CursorState, EngineError, ParameterSlot, RowIterator, SquealError,
    StatementCursor, StatementHandle, Value,
};
