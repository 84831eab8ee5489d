///
/// Statement Cursor
///
/// Drives one prepared statement through its result set and exposes the
/// current row through typed accessors.
///
/// Lifecycle:
/// - `Ready`: no current row; parameters may be (re)bound
/// - `HasRow`: a row is available and stable until the next step or reset
/// - `Done`: the result set is exhausted, or the last step failed
///
/// Transitions:
/// - step() from Ready/HasRow: row → HasRow (true), done → Done (false),
///   engine error → Done (error returned)
/// - step() from Done: false, without calling the engine
/// - reset() from HasRow/Done → Ready; bindings are kept
/// - reset() from Ready: no-op
/// - clear_parameters(): any state, state unchanged
///
/// Typed accessors read the engine's per-row dynamic type. A NULL value, or
/// a read while there is no current row, yields `None`. Only an out-of-range
/// column index or an unknown column name is an error.
///
/// The cursor owns its handle. Dropping the cursor finalizes the statement;
/// `finalize` does the same but returns the engine's verdict.
///
/// A cursor is a single-threaded object: every call blocks in the engine
/// and calls must not interleave.
///

use std::fmt;

use tracing::{debug, trace};

use crate::catalog::ColumnCatalog;
use crate::engine::{StatementHandle, StepStatus};
use crate::error::{Result, SquealError};
use crate::rows::{MappedRows, RowIterator};
use crate::value::{ColumnType, Value};

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CursorState {
    Ready,
    HasRow,
    Done,
}

pub struct StatementCursor<H: StatementHandle> {
    handle: H,
    catalog: ColumnCatalog,
    parameter_count: usize,
    state: CursorState,
}

impl<H: StatementHandle> fmt::Debug for StatementCursor<H> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("StatementCursor")
            .field("state", &self.state)
            .field("columns", &self.catalog.names())
            .field("parameter_count", &self.parameter_count)
            .finish_non_exhaustive()
    }
}

impl<H: StatementHandle> StatementCursor<H> {
    /// Wraps a freshly prepared handle. The column catalog is captured here,
    /// before the first step.
    pub fn new(handle: H) -> Self {
        let catalog = ColumnCatalog::from_handle(&handle);
        let parameter_count = handle.parameter_count();
        debug!(
            columns = catalog.len(),
            parameters = parameter_count,
            "statement prepared"
        );
        Self {
            handle,
            catalog,
            parameter_count,
            state: CursorState::Ready,
        }
    }

    pub fn state(&self) -> CursorState {
        self.state
    }

    pub fn has_row(&self) -> bool {
        self.state == CursorState::HasRow
    }

    pub fn catalog(&self) -> &ColumnCatalog {
        &self.catalog
    }

    pub fn column_count(&self) -> usize {
        self.catalog.len()
    }

    pub fn column_names(&self) -> &[String] {
        self.catalog.names()
    }

    pub fn index_of_column(&self, name: &str) -> Option<usize> {
        self.catalog.index_of(name)
    }

    pub fn name_of_column(&self, index: usize) -> Result<&str> {
        self.catalog
            .name_of(index)
            .ok_or(SquealError::ColumnOutOfRange {
                index,
                count: self.catalog.len(),
            })
    }

    pub fn parameter_count(&self) -> usize {
        self.parameter_count
    }

    pub fn sql(&self) -> Option<String> {
        self.handle.sql()
    }

    pub fn is_read_only(&self) -> bool {
        self.handle.is_read_only()
    }

    pub(crate) fn handle(&self) -> &H {
        &self.handle
    }

    pub(crate) fn handle_mut(&mut self) -> &mut H {
        &mut self.handle
    }

    // -------------------------------------------------------------------------
    // Execution

    /// Advances to the next row. Returns `true` when a row is available.
    pub fn step(&mut self) -> Result<bool> {
        if self.state == CursorState::Done {
            return Ok(false);
        }
        match self.handle.step() {
            Ok(StepStatus::Row) => {
                self.state = CursorState::HasRow;
                Ok(true)
            }
            Ok(StepStatus::Done) => {
                trace!("statement exhausted");
                self.state = CursorState::Done;
                Ok(false)
            }
            Err(e) => {
                debug!(code = e.code, error = %e.message, "step failed");
                self.state = CursorState::Done;
                Err(e.into())
            }
        }
    }

    /// Rewinds the statement so it can run again. Bound parameters are kept;
    /// call `clear_parameters` to drop them.
    pub fn reset(&mut self) -> Result<()> {
        if self.state == CursorState::Ready {
            return Ok(());
        }
        self.state = CursorState::Ready;
        trace!("statement reset");
        self.handle.reset()?;
        Ok(())
    }

    /// Steps through every row, calling `on_row` for each one. Stops at the
    /// first step or callback error.
    pub fn execute<F, E>(&mut self, mut on_row: F) -> Result<(), E>
    where
        F: FnMut(&Self) -> Result<(), E>,
        E: From<SquealError>,
    {
        while self.step()? {
            on_row(self)?;
        }
        Ok(())
    }

    /// Steps to completion, ignoring any rows.
    pub fn run(&mut self) -> Result<()> {
        self.execute(|_| Ok::<(), SquealError>(()))
    }

    pub fn rows(&mut self) -> RowIterator<'_, H> {
        RowIterator::new(self)
    }

    pub fn query_map<T, F>(&mut self, f: F) -> MappedRows<'_, H, F>
    where
        F: FnMut(&Self) -> Result<T>,
    {
        RowIterator::new(self).map(f)
    }

    /// Steps once and hands the row to `f`; `None` when there are no more rows.
    pub fn select_next_row<T, F>(&mut self, f: F) -> Result<Option<T>>
    where
        F: FnOnce(&Self) -> T,
    {
        if !self.step()? {
            return Ok(None);
        }
        Ok(Some(f(self)))
    }

    pub fn select_rows<T, F>(&mut self, mut f: F) -> Result<Vec<T>>
    where
        F: FnMut(&Self) -> T,
    {
        let mut results = Vec::new();
        while self.step()? {
            results.push(f(self));
        }
        Ok(results)
    }

    pub fn select_next_int(&mut self) -> Result<Option<i64>> {
        self.select_first(Self::int_at)
    }

    pub fn select_next_int64(&mut self) -> Result<Option<i64>> {
        self.select_first(Self::int64_at)
    }

    pub fn select_next_double(&mut self) -> Result<Option<f64>> {
        self.select_first(Self::double_at)
    }

    pub fn select_next_string(&mut self) -> Result<Option<String>> {
        self.select_first(Self::string_at)
    }

    pub fn select_next_bool(&mut self) -> Result<Option<bool>> {
        self.select_first(Self::bool_at)
    }

    pub fn select_next_blob(&mut self) -> Result<Option<Vec<u8>>> {
        self.select_first(Self::blob_at)
    }

    fn select_first<T>(&mut self, read: fn(&Self, usize) -> Result<Option<T>>) -> Result<Option<T>> {
        if !self.step()? {
            return Ok(None);
        }
        read(self, 0)
    }

    /// Finalizes the statement now, reporting any engine error.
    pub fn finalize(self) -> Result<()> {
        debug!("finalizing statement");
        self.handle.finalize()?;
        Ok(())
    }

    // -------------------------------------------------------------------------
    // Current row

    fn check_column(&self, index: usize) -> Result<()> {
        let count = self.catalog.len();
        if index >= count {
            return Err(SquealError::ColumnOutOfRange { index, count });
        }
        Ok(())
    }

    fn resolve_column(&self, name: &str) -> Result<usize> {
        self.catalog
            .index_of(name)
            .ok_or_else(|| SquealError::UnknownColumn(name.to_string()))
    }

    /// The type of the current row's value, or `None` when it is NULL or
    /// there is no current row.
    fn present_type(&self, index: usize) -> Result<Option<ColumnType>> {
        self.check_column(index)?;
        if self.state != CursorState::HasRow {
            return Ok(None);
        }
        match self.handle.column_type(index) {
            ColumnType::Null => Ok(None),
            ty => Ok(Some(ty)),
        }
    }

    pub fn type_of(&self, index: usize) -> Result<ColumnType> {
        Ok(self.present_type(index)?.unwrap_or(ColumnType::Null))
    }

    pub fn is_null_at(&self, index: usize) -> Result<bool> {
        Ok(self.present_type(index)?.is_none())
    }

    pub fn int64_at(&self, index: usize) -> Result<Option<i64>> {
        Ok(self
            .present_type(index)?
            .map(|_| self.handle.column_int64(index)))
    }

    /// The full 64-bit integer; never narrowed.
    pub fn int_at(&self, index: usize) -> Result<Option<i64>> {
        self.int64_at(index)
    }

    pub fn double_at(&self, index: usize) -> Result<Option<f64>> {
        Ok(self
            .present_type(index)?
            .map(|_| self.handle.column_double(index)))
    }

    pub fn string_at(&self, index: usize) -> Result<Option<String>> {
        Ok(self
            .present_type(index)?
            .map(|_| self.handle.column_text(index)))
    }

    pub fn bool_at(&self, index: usize) -> Result<Option<bool>> {
        Ok(self.int64_at(index)?.map(|v| v != 0))
    }

    /// A zero-length blob reads as `Some(vec![])`, never as `None`.
    pub fn blob_at(&self, index: usize) -> Result<Option<Vec<u8>>> {
        Ok(self
            .present_type(index)?
            .map(|_| self.handle.column_blob(index)))
    }

    /// Reads the value in its own per-row type.
    pub fn value_at(&self, index: usize) -> Result<Option<Value>> {
        let value = match self.present_type(index)? {
            None | Some(ColumnType::Null) => None,
            Some(ColumnType::Integer) => Some(Value::Integer(self.handle.column_int64(index))),
            Some(ColumnType::Float) => Some(Value::Float(self.handle.column_double(index))),
            Some(ColumnType::Text) => Some(Value::Text(self.handle.column_text(index))),
            Some(ColumnType::Blob) => Some(Value::Blob(self.handle.column_blob(index))),
        };
        Ok(value)
    }

    pub fn type_of_named(&self, name: &str) -> Result<ColumnType> {
        self.type_of(self.resolve_column(name)?)
    }

    pub fn int64_named(&self, name: &str) -> Result<Option<i64>> {
        self.int64_at(self.resolve_column(name)?)
    }

    pub fn int_named(&self, name: &str) -> Result<Option<i64>> {
        self.int_at(self.resolve_column(name)?)
    }

    pub fn double_named(&self, name: &str) -> Result<Option<f64>> {
        self.double_at(self.resolve_column(name)?)
    }

    pub fn string_named(&self, name: &str) -> Result<Option<String>> {
        self.string_at(self.resolve_column(name)?)
    }

    pub fn bool_named(&self, name: &str) -> Result<Option<bool>> {
        self.bool_at(self.resolve_column(name)?)
    }

    pub fn blob_named(&self, name: &str) -> Result<Option<Vec<u8>>> {
        self.blob_at(self.resolve_column(name)?)
    }

    pub fn value_named(&self, name: &str) -> Result<Option<Value>> {
        self.value_at(self.resolve_column(name)?)
    }
}
