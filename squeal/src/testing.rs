///
/// Scripted statement handle for unit tests.
///
/// Behaves like a small engine: fixed rows (or an echo of the current
/// bindings), loose numeric/text coercion on reads, auto-restart when
/// stepped again after completion, and optional failure injection. Every
/// call that matters is recorded in a shared `Journal` so tests can observe
/// the handle after it has moved into a cursor.
///

use std::cell::RefCell;
use std::rc::Rc;

use crate::engine::{StatementHandle, StepStatus};
use crate::error::EngineError;
use crate::value::{ColumnType, Value};

pub(crate) const SQLITE_BUSY: i32 = 5;
pub(crate) const SQLITE_MISUSE: i32 = 21;

#[derive(Debug, Default)]
pub(crate) struct Journal {
    pub bindings: Vec<Option<Value>>,
    pub engine_steps: usize,
    pub resets: usize,
    pub clears: usize,
    pub finalized: usize,
}

enum Rows {
    Fixed(Vec<Vec<Option<Value>>>),
    Echo,
}

pub(crate) struct ScriptedHandle {
    columns: Vec<Option<String>>,
    parameters: Vec<Option<String>>,
    rows: Rows,
    current: Option<usize>,
    next_row: usize,
    exhausted: bool,
    fail_step_at: Option<usize>,
    fail_binds: bool,
    fail_reset: bool,
    finalized: bool,
    journal: Rc<RefCell<Journal>>,
}

impl ScriptedHandle {
    pub fn with_rows(columns: &[&str], rows: Vec<Vec<Option<Value>>>) -> Self {
        Self::build(
            columns.iter().map(|c| Some(c.to_string())).collect(),
            Vec::new(),
            Rows::Fixed(rows),
        )
    }

    /// One row whose columns are the current parameter bindings, like
    /// `SELECT ?1, ?2, ...`.
    pub fn echo(parameters: &[Option<&str>]) -> Self {
        Self::build(
            (0..parameters.len()).map(|i| Some(format!("p{}", i + 1))).collect(),
            parameters.iter().map(|p| p.map(str::to_string)).collect(),
            Rows::Echo,
        )
    }

    fn build(columns: Vec<Option<String>>, parameters: Vec<Option<String>>, rows: Rows) -> Self {
        let journal = Journal {
            bindings: vec![None; parameters.len()],
            ..Journal::default()
        };
        Self {
            columns,
            parameters,
            rows,
            current: None,
            next_row: 0,
            exhausted: false,
            fail_step_at: None,
            fail_binds: false,
            fail_reset: false,
            finalized: false,
            journal: Rc::new(RefCell::new(journal)),
        }
    }

    pub fn with_unnamed_columns(mut self, indices: &[usize]) -> Self {
        for &i in indices {
            self.columns[i] = None;
        }
        self
    }

    /// Fails the engine step that would produce row `row`.
    pub fn failing_at(mut self, row: usize) -> Self {
        self.fail_step_at = Some(row);
        self
    }

    pub fn failing_binds(mut self) -> Self {
        self.fail_binds = true;
        self
    }

    /// Every reset rewinds the statement but reports a busy error, as
    /// engines do when the last step failed.
    pub fn failing_reset(mut self) -> Self {
        self.fail_reset = true;
        self
    }

    pub fn journal(&self) -> Rc<RefCell<Journal>> {
        Rc::clone(&self.journal)
    }

    fn row_count(&self) -> usize {
        match &self.rows {
            Rows::Fixed(rows) => rows.len(),
            Rows::Echo => 1,
        }
    }

    fn cell(&self, index: usize) -> Option<Value> {
        let row = self.current?;
        match &self.rows {
            Rows::Fixed(rows) => rows.get(row)?.get(index)?.clone(),
            Rows::Echo => self.journal.borrow().bindings.get(index)?.clone(),
        }
    }

    fn bind(&mut self, index: usize, value: Option<Value>) -> Result<(), EngineError> {
        if self.fail_binds {
            return Err(EngineError::new(SQLITE_MISUSE, "bad parameter or other API misuse"));
        }
        self.journal.borrow_mut().bindings[index - 1] = value;
        Ok(())
    }
}

impl StatementHandle for ScriptedHandle {
    fn parameter_count(&self) -> usize {
        self.parameters.len()
    }

    fn parameter_index(&self, name: &str) -> Option<usize> {
        self.parameters
            .iter()
            .position(|p| p.as_deref() == Some(name))
            .map(|i| i + 1)
    }

    fn parameter_name(&self, index: usize) -> Option<String> {
        self.parameters.get(index.checked_sub(1)?)?.clone()
    }

    fn bind_text(&mut self, index: usize, value: &str) -> Result<(), EngineError> {
        self.bind(index, Some(Value::from(value)))
    }

    fn bind_int64(&mut self, index: usize, value: i64) -> Result<(), EngineError> {
        self.bind(index, Some(Value::Integer(value)))
    }

    fn bind_double(&mut self, index: usize, value: f64) -> Result<(), EngineError> {
        self.bind(index, Some(Value::Float(value)))
    }

    fn bind_blob(&mut self, index: usize, value: &[u8]) -> Result<(), EngineError> {
        self.bind(index, Some(Value::from(value)))
    }

    fn bind_null(&mut self, index: usize) -> Result<(), EngineError> {
        self.bind(index, None)
    }

    fn clear_bindings(&mut self) {
        let mut journal = self.journal.borrow_mut();
        journal.clears += 1;
        journal.bindings.iter_mut().for_each(|b| *b = None);
    }

    fn column_count(&self) -> usize {
        self.columns.len()
    }

    fn column_name(&self, index: usize) -> Option<String> {
        self.columns.get(index)?.clone()
    }

    fn column_type(&self, index: usize) -> ColumnType {
        self.cell(index)
            .map(|v| v.column_type())
            .unwrap_or(ColumnType::Null)
    }

    fn column_int64(&self, index: usize) -> i64 {
        match self.cell(index) {
            Some(Value::Integer(i)) => i,
            Some(Value::Float(f)) => f as i64,
            Some(Value::Text(s)) => s.trim().parse().unwrap_or(0),
            _ => 0,
        }
    }

    fn column_double(&self, index: usize) -> f64 {
        match self.cell(index) {
            Some(Value::Integer(i)) => i as f64,
            Some(Value::Float(f)) => f,
            Some(Value::Text(s)) => s.trim().parse().unwrap_or(0.0),
            _ => 0.0,
        }
    }

    fn column_text(&self, index: usize) -> String {
        match self.cell(index) {
            Some(Value::Blob(b)) => String::from_utf8_lossy(&b).into_owned(),
            Some(v) => v.to_string(),
            None => String::new(),
        }
    }

    fn column_blob(&self, index: usize) -> Vec<u8> {
        match self.cell(index) {
            Some(Value::Blob(b)) => b,
            Some(v) => v.to_string().into_bytes(),
            None => Vec::new(),
        }
    }

    fn step(&mut self) -> Result<StepStatus, EngineError> {
        self.journal.borrow_mut().engine_steps += 1;
        if self.exhausted {
            // engines restart a completed statement when stepped again
            self.exhausted = false;
            self.next_row = 0;
        }
        if self.fail_step_at == Some(self.next_row) {
            self.current = None;
            return Err(EngineError::new(SQLITE_BUSY, "database is locked"));
        }
        if self.next_row < self.row_count() {
            self.current = Some(self.next_row);
            self.next_row += 1;
            Ok(StepStatus::Row)
        } else {
            self.current = None;
            self.exhausted = true;
            Ok(StepStatus::Done)
        }
    }

    fn reset(&mut self) -> Result<(), EngineError> {
        self.journal.borrow_mut().resets += 1;
        self.current = None;
        self.next_row = 0;
        self.exhausted = false;
        if self.fail_reset {
            return Err(EngineError::new(SQLITE_BUSY, "database is locked"));
        }
        Ok(())
    }

    fn finalize(mut self) -> Result<(), EngineError> {
        self.finalized = true;
        self.journal.borrow_mut().finalized += 1;
        Ok(())
    }

    fn sql(&self) -> Option<String> {
        Some("-- scripted".to_string())
    }
}

impl Drop for ScriptedHandle {
    fn drop(&mut self) {
        if !self.finalized {
            self.journal.borrow_mut().finalized += 1;
        }
    }
}
