///
/// SQLite statement handle.
///
/// Wraps one native `sqlite3_stmt` and implements the core's engine boundary
/// on top of the SQLite C API (reached through rusqlite's re-exported
/// bindings). This is the only file in the crate with `unsafe` statement
/// calls.
///
/// Each handle borrows the connection it was prepared on. The borrow keeps
/// the connection alive and is where connection-scoped error messages are
/// read from. The native statement is finalized exactly once: either by
/// `finalize`, which consumes the handle, or on drop.
///
/// Blob binding uses `sqlite3_bind_zeroblob` for empty slices so that an
/// empty blob is stored as a zero-length blob rather than NULL.
///

use std::ffi::{c_char, c_int, c_void, CStr, CString};
use std::ptr;

use rusqlite::ffi;
use squeal::{ColumnType, EngineError, SquealError, StatementHandle, StepStatus};
use tracing::{trace, warn};

use crate::connection::SqliteConnection;

pub struct SqliteStatement<'conn> {
    raw: *mut ffi::sqlite3_stmt,
    connection: &'conn SqliteConnection,
}

impl<'conn> SqliteStatement<'conn> {
    pub(crate) fn prepare(
        connection: &'conn SqliteConnection,
        sql: &str,
    ) -> Result<Self, SquealError> {
        let len = c_int::try_from(sql.len())
            .map_err(|_| EngineError::new(ffi::SQLITE_TOOBIG, "SQL text too long"))?;
        let mut raw = ptr::null_mut();
        let mut tail = ptr::null();
        let rc = unsafe {
            ffi::sqlite3_prepare_v2(
                connection.raw_handle(),
                sql.as_ptr().cast::<c_char>(),
                len,
                &mut raw,
                &mut tail,
            )
        };
        if rc != ffi::SQLITE_OK {
            return Err(connection.error_for(rc).into());
        }
        if raw.is_null() {
            return Err(SquealError::EmptyStatement);
        }
        connection.statement_opened();
        trace!(sql, "prepared statement");
        Ok(Self { raw, connection })
    }

    fn check(&self, rc: c_int) -> Result<(), EngineError> {
        if rc == ffi::SQLITE_OK {
            Ok(())
        } else {
            Err(self.connection.error_for(rc))
        }
    }

    fn release(&mut self) -> c_int {
        let raw = std::mem::replace(&mut self.raw, ptr::null_mut());
        if raw.is_null() {
            return ffi::SQLITE_OK;
        }
        let rc = unsafe { ffi::sqlite3_finalize(raw) };
        self.connection.statement_closed();
        rc
    }
}

fn c_index(index: usize) -> c_int {
    c_int::try_from(index).unwrap_or(c_int::MAX)
}

fn too_big(what: &str) -> EngineError {
    EngineError::new(ffi::SQLITE_TOOBIG, format!("{} too large to bind", what))
}

unsafe fn optional_text(ptr: *const c_char) -> Option<String> {
    if ptr.is_null() {
        return None;
    }
    Some(unsafe { CStr::from_ptr(ptr) }.to_string_lossy().into_owned())
}

impl StatementHandle for SqliteStatement<'_> {
    fn parameter_count(&self) -> usize {
        let count = unsafe { ffi::sqlite3_bind_parameter_count(self.raw) };
        usize::try_from(count).unwrap_or(0)
    }

    fn parameter_index(&self, name: &str) -> Option<usize> {
        let name = CString::new(name).ok()?;
        let index = unsafe { ffi::sqlite3_bind_parameter_index(self.raw, name.as_ptr()) };
        if index > 0 {
            usize::try_from(index).ok()
        } else {
            None
        }
    }

    fn parameter_name(&self, index: usize) -> Option<String> {
        unsafe { optional_text(ffi::sqlite3_bind_parameter_name(self.raw, c_index(index))) }
    }

    fn bind_text(&mut self, index: usize, value: &str) -> Result<(), EngineError> {
        let len = c_int::try_from(value.len()).map_err(|_| too_big("text"))?;
        let rc = unsafe {
            ffi::sqlite3_bind_text(
                self.raw,
                c_index(index),
                value.as_ptr().cast::<c_char>(),
                len,
                ffi::SQLITE_TRANSIENT(),
            )
        };
        self.check(rc)
    }

    fn bind_int64(&mut self, index: usize, value: i64) -> Result<(), EngineError> {
        let rc = unsafe { ffi::sqlite3_bind_int64(self.raw, c_index(index), value) };
        self.check(rc)
    }

    fn bind_double(&mut self, index: usize, value: f64) -> Result<(), EngineError> {
        let rc = unsafe { ffi::sqlite3_bind_double(self.raw, c_index(index), value) };
        self.check(rc)
    }

    fn bind_blob(&mut self, index: usize, value: &[u8]) -> Result<(), EngineError> {
        let rc = if value.is_empty() {
            unsafe { ffi::sqlite3_bind_zeroblob(self.raw, c_index(index), 0) }
        } else {
            let len = c_int::try_from(value.len()).map_err(|_| too_big("blob"))?;
            unsafe {
                ffi::sqlite3_bind_blob(
                    self.raw,
                    c_index(index),
                    value.as_ptr().cast::<c_void>(),
                    len,
                    ffi::SQLITE_TRANSIENT(),
                )
            }
        };
        self.check(rc)
    }

    fn bind_null(&mut self, index: usize) -> Result<(), EngineError> {
        let rc = unsafe { ffi::sqlite3_bind_null(self.raw, c_index(index)) };
        self.check(rc)
    }

    fn clear_bindings(&mut self) {
        unsafe {
            ffi::sqlite3_clear_bindings(self.raw);
        }
    }

    fn column_count(&self) -> usize {
        let count = unsafe { ffi::sqlite3_column_count(self.raw) };
        usize::try_from(count).unwrap_or(0)
    }

    fn column_name(&self, index: usize) -> Option<String> {
        unsafe { optional_text(ffi::sqlite3_column_name(self.raw, c_index(index))) }
    }

    fn column_type(&self, index: usize) -> ColumnType {
        match unsafe { ffi::sqlite3_column_type(self.raw, c_index(index)) } {
            ffi::SQLITE_INTEGER => ColumnType::Integer,
            ffi::SQLITE_FLOAT => ColumnType::Float,
            ffi::SQLITE_BLOB => ColumnType::Blob,
            ffi::SQLITE_NULL => ColumnType::Null,
            _ => ColumnType::Text,
        }
    }

    fn column_int64(&self, index: usize) -> i64 {
        unsafe { ffi::sqlite3_column_int64(self.raw, c_index(index)) }
    }

    fn column_double(&self, index: usize) -> f64 {
        unsafe { ffi::sqlite3_column_double(self.raw, c_index(index)) }
    }

    fn column_text(&self, index: usize) -> String {
        let column = c_index(index);
        unsafe {
            // text before bytes: the length is only valid after the conversion
            let text = ffi::sqlite3_column_text(self.raw, column);
            if text.is_null() {
                return String::new();
            }
            let len = usize::try_from(ffi::sqlite3_column_bytes(self.raw, column)).unwrap_or(0);
            let bytes = std::slice::from_raw_parts(text.cast::<u8>(), len);
            String::from_utf8_lossy(bytes).into_owned()
        }
    }

    fn column_blob(&self, index: usize) -> Vec<u8> {
        let column = c_index(index);
        unsafe {
            // a zero-length blob comes back as a NULL pointer
            let data = ffi::sqlite3_column_blob(self.raw, column);
            let len = usize::try_from(ffi::sqlite3_column_bytes(self.raw, column)).unwrap_or(0);
            if data.is_null() || len == 0 {
                return Vec::new();
            }
            std::slice::from_raw_parts(data.cast::<u8>(), len).to_vec()
        }
    }

    fn step(&mut self) -> Result<StepStatus, EngineError> {
        match unsafe { ffi::sqlite3_step(self.raw) } {
            ffi::SQLITE_ROW => Ok(StepStatus::Row),
            ffi::SQLITE_DONE => Ok(StepStatus::Done),
            rc => Err(self.connection.error_for(rc)),
        }
    }

    fn reset(&mut self) -> Result<(), EngineError> {
        let rc = unsafe { ffi::sqlite3_reset(self.raw) };
        self.check(rc)
    }

    fn finalize(mut self) -> Result<(), EngineError> {
        let rc = self.release();
        if rc == ffi::SQLITE_OK {
            Ok(())
        } else {
            Err(self.connection.error_for(rc))
        }
    }

    fn sql(&self) -> Option<String> {
        unsafe { optional_text(ffi::sqlite3_sql(self.raw)) }
    }

    fn is_read_only(&self) -> bool {
        unsafe { ffi::sqlite3_stmt_readonly(self.raw) != 0 }
    }
}

impl Drop for SqliteStatement<'_> {
    fn drop(&mut self) {
        let rc = self.release();
        if rc != ffi::SQLITE_OK {
            let error = self.connection.error_for(rc);
            warn!(code = error.code, error = %error.message, "error finalizing statement");
        }
    }
}
