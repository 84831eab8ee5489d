///
/// SQLite connection.
///
/// Owns a rusqlite `Connection` and prepares native statements on it. Every
/// statement borrows the connection (`Statement<'conn>`), so the compiler
/// rejects closing or dropping a connection while a statement prepared from
/// it is still alive. The connection also counts its open statements.
///
/// Error mapping follows one rule: whatever SQLite says is passed through as
/// an `EngineError` carrying the extended result code and the connection's
/// error message.
///

use std::cell::Cell;
use std::ffi::{c_int, CStr};
use std::path::Path;
use std::time::Duration;

use rusqlite::{ffi, Connection, OpenFlags};
use squeal::{EngineError, SquealError, StatementCursor};
use tracing::debug;

use crate::config::ConnectionConfig;
use crate::statement::SqliteStatement;

/// A cursor over a statement prepared on a `SqliteConnection`.
pub type Statement<'conn> = StatementCursor<SqliteStatement<'conn>>;

pub(crate) fn engine_error(e: rusqlite::Error) -> EngineError {
    match e {
        rusqlite::Error::SqliteFailure(err, message) => {
            let message = message.unwrap_or_else(|| err.to_string());
            EngineError::new(err.extended_code, message)
        }
        other => EngineError::new(-1, other.to_string()),
    }
}

pub struct SqliteConnection {
    inner: Connection,
    open_statements: Cell<usize>,
}

impl SqliteConnection {
    pub fn open(path: impl AsRef<Path>) -> Result<Self, SquealError> {
        Self::open_with_config(&ConnectionConfig::at_path(path.as_ref()))
    }

    pub fn open_in_memory() -> Result<Self, SquealError> {
        Self::open_with_config(&ConnectionConfig::in_memory())
    }

    pub fn open_with_config(config: &ConnectionConfig) -> Result<Self, SquealError> {
        let mut flags = OpenFlags::SQLITE_OPEN_URI | OpenFlags::SQLITE_OPEN_NO_MUTEX;
        if config.read_only {
            flags |= OpenFlags::SQLITE_OPEN_READ_ONLY;
        } else {
            flags |= OpenFlags::SQLITE_OPEN_READ_WRITE;
            if config.creates() {
                flags |= OpenFlags::SQLITE_OPEN_CREATE;
            }
        }

        let inner = Connection::open_with_flags(&config.path, flags).map_err(engine_error)?;
        if let Some(millis) = config.busy_timeout_ms {
            inner
                .busy_timeout(Duration::from_millis(millis))
                .map_err(engine_error)?;
        }
        debug!(path = %config.path.display(), read_only = config.read_only, "opened database");

        Ok(Self {
            inner,
            open_statements: Cell::new(0),
        })
    }

    /// Compiles the first statement in `sql`; trailing text is ignored.
    pub fn prepare(&self, sql: &str) -> Result<Statement<'_>, SquealError> {
        let handle = SqliteStatement::prepare(self, sql)?;
        Ok(StatementCursor::new(handle))
    }

    /// Runs zero or more `;`-separated statements that return no rows.
    pub fn execute_batch(&self, sql: &str) -> Result<(), SquealError> {
        self.inner.execute_batch(sql).map_err(engine_error)?;
        Ok(())
    }

    /// Rows modified by the most recent INSERT, UPDATE or DELETE.
    pub fn changes(&self) -> u64 {
        self.inner.changes() as u64
    }

    pub fn last_insert_rowid(&self) -> i64 {
        self.inner.last_insert_rowid()
    }

    pub fn begin(&self) -> Result<(), SquealError> {
        self.execute_batch("BEGIN")
    }

    pub fn commit(&self) -> Result<(), SquealError> {
        self.execute_batch("COMMIT")
    }

    pub fn rollback(&self) -> Result<(), SquealError> {
        self.execute_batch("ROLLBACK")
    }

    pub fn is_autocommit(&self) -> bool {
        self.inner.is_autocommit()
    }

    pub fn open_statement_count(&self) -> usize {
        self.open_statements.get()
    }

    pub fn close(self) -> Result<(), SquealError> {
        debug!("closing database");
        self.inner.close().map_err(|(_, e)| engine_error(e))?;
        Ok(())
    }

    pub(crate) fn raw_handle(&self) -> *mut ffi::sqlite3 {
        unsafe { self.inner.handle() }
    }

    pub(crate) fn statement_opened(&self) {
        self.open_statements.set(self.open_statements.get() + 1);
    }

    pub(crate) fn statement_closed(&self) {
        self.open_statements
            .set(self.open_statements.get().saturating_sub(1));
    }

    /// Describes a failed call that returned `rc`. The connection's extended
    /// code and message are used when they belong to the same failure;
    /// otherwise SQLite's generic text for `rc`.
    pub(crate) fn error_for(&self, rc: c_int) -> EngineError {
        let db = self.raw_handle();
        unsafe {
            let extended = ffi::sqlite3_extended_errcode(db);
            if extended & 0xff == rc & 0xff {
                let message = CStr::from_ptr(ffi::sqlite3_errmsg(db));
                EngineError::new(extended, message.to_string_lossy())
            } else {
                let message = CStr::from_ptr(ffi::sqlite3_errstr(rc));
                EngineError::new(rc, message.to_string_lossy())
            }
        }
    }
}
