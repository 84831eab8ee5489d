///
/// Parameter Binding
///
/// Binds values to a statement's placeholders, either by 1-based position or
/// by name. Names are resolved through the catalog the engine built when the
/// statement was prepared; they include their prefix (`:name`, `@name`,
/// `$name`).
///
/// Checks done here, before the engine is called:
/// - an unregistered name fails with UnknownParameter
/// - an index outside 1..=parameter_count fails with ParameterOutOfRange
///
/// Anything the engine itself rejects comes back as SquealError::Engine.
/// Rebinding a slot silently replaces the previous value. Bindings survive
/// `reset`; `clear_parameters` sets every slot back to NULL.
///

use tracing::trace;

use crate::cursor::StatementCursor;
use crate::engine::StatementHandle;
use crate::error::{Result, SquealError};
use crate::value::Value;

/// One placeholder of a prepared statement.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParameterSlot {
    index: usize,
    name: Option<String>,
}

impl ParameterSlot {
    pub fn new(index: usize, name: Option<String>) -> Self {
        Self { index, name }
    }

    /// 1-based position.
    pub fn index(&self) -> usize {
        self.index
    }

    /// The placeholder's name with its prefix; `None` for plain `?`.
    pub fn name(&self) -> Option<&str> {
        self.name.as_deref()
    }
}

impl<H: StatementHandle> StatementCursor<H> {
    /// The 1-based index of a named parameter, or `None` if the statement
    /// declares no such name.
    pub fn parameter_index(&self, name: &str) -> Option<usize> {
        self.handle().parameter_index(name)
    }

    pub fn parameters(&self) -> Vec<ParameterSlot> {
        (1..=self.parameter_count())
            .map(|i| ParameterSlot::new(i, self.handle().parameter_name(i)))
            .collect()
    }

    fn check_parameter(&self, index: usize) -> Result<()> {
        let count = self.parameter_count();
        if index == 0 || index > count {
            return Err(SquealError::ParameterOutOfRange { index, count });
        }
        Ok(())
    }

    fn resolve_parameter(&self, name: &str) -> Result<usize> {
        self.parameter_index(name)
            .ok_or_else(|| SquealError::UnknownParameter(name.to_string()))
    }

    /// Sets every parameter to NULL. Valid in any state.
    pub fn clear_parameters(&mut self) {
        trace!("clearing bindings");
        self.handle_mut().clear_bindings();
    }

    // -------------------------------------------------------------------------
    // Positional

    pub fn bind_text(&mut self, index: usize, value: &str) -> Result<()> {
        self.check_parameter(index)?;
        trace!(index, "bind text");
        self.handle_mut().bind_text(index, value)?;
        Ok(())
    }

    /// Same 64-bit binder as `bind_int64`; values are never narrowed.
    pub fn bind_int(&mut self, index: usize, value: i64) -> Result<()> {
        self.check_parameter(index)?;
        trace!(index, value, "bind int");
        self.handle_mut().bind_int64(index, value)?;
        Ok(())
    }

    pub fn bind_int64(&mut self, index: usize, value: i64) -> Result<()> {
        self.check_parameter(index)?;
        trace!(index, value, "bind int64");
        self.handle_mut().bind_int64(index, value)?;
        Ok(())
    }

    pub fn bind_double(&mut self, index: usize, value: f64) -> Result<()> {
        self.check_parameter(index)?;
        trace!(index, value, "bind double");
        self.handle_mut().bind_double(index, value)?;
        Ok(())
    }

    /// Booleans are stored as the integers 0 and 1.
    pub fn bind_bool(&mut self, index: usize, value: bool) -> Result<()> {
        self.check_parameter(index)?;
        trace!(index, value, "bind bool");
        self.handle_mut().bind_int64(index, i64::from(value))?;
        Ok(())
    }

    /// An empty slice binds a zero-length blob, not NULL.
    pub fn bind_blob(&mut self, index: usize, value: &[u8]) -> Result<()> {
        self.check_parameter(index)?;
        trace!(index, len = value.len(), "bind blob");
        self.handle_mut().bind_blob(index, value)?;
        Ok(())
    }

    pub fn bind_null(&mut self, index: usize) -> Result<()> {
        self.check_parameter(index)?;
        trace!(index, "bind null");
        self.handle_mut().bind_null(index)?;
        Ok(())
    }

    /// Binds a dynamic value; `None` binds NULL.
    pub fn bind_value(&mut self, index: usize, value: Option<&Value>) -> Result<()> {
        match value {
            Some(Value::Integer(i)) => self.bind_int64(index, *i),
            Some(Value::Float(f)) => self.bind_double(index, *f),
            Some(Value::Text(s)) => self.bind_text(index, s),
            Some(Value::Blob(b)) => self.bind_blob(index, b),
            None => self.bind_null(index),
        }
    }

    /// Binds `values[i]` to parameter `i + 1`.
    pub fn bind_values(&mut self, values: &[Option<Value>]) -> Result<()> {
        for (i, value) in values.iter().enumerate() {
            self.bind_value(i + 1, value.as_ref())?;
        }
        Ok(())
    }

    // -------------------------------------------------------------------------
    // Named

    pub fn bind_text_named(&mut self, name: &str, value: &str) -> Result<()> {
        let index = self.resolve_parameter(name)?;
        self.bind_text(index, value)
    }

    pub fn bind_int_named(&mut self, name: &str, value: i64) -> Result<()> {
        let index = self.resolve_parameter(name)?;
        self.bind_int(index, value)
    }

    pub fn bind_int64_named(&mut self, name: &str, value: i64) -> Result<()> {
        let index = self.resolve_parameter(name)?;
        self.bind_int64(index, value)
    }

    pub fn bind_double_named(&mut self, name: &str, value: f64) -> Result<()> {
        let index = self.resolve_parameter(name)?;
        self.bind_double(index, value)
    }

    pub fn bind_bool_named(&mut self, name: &str, value: bool) -> Result<()> {
        let index = self.resolve_parameter(name)?;
        self.bind_bool(index, value)
    }

    pub fn bind_blob_named(&mut self, name: &str, value: &[u8]) -> Result<()> {
        let index = self.resolve_parameter(name)?;
        self.bind_blob(index, value)
    }

    pub fn bind_null_named(&mut self, name: &str) -> Result<()> {
        let index = self.resolve_parameter(name)?;
        self.bind_null(index)
    }

    pub fn bind_value_named(&mut self, name: &str, value: Option<&Value>) -> Result<()> {
        let index = self.resolve_parameter(name)?;
        self.bind_value(index, value)
    }
}
