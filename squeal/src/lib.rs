//!
//! # squeal: typed prepared-statement execution core
//!
//! A prepared statement, once an engine has compiled it, is driven through
//! a `StatementCursor`: bind parameters, step through rows, read typed
//! values, reset and run again. The engine itself stays behind the
//! `StatementHandle` trait, so this crate holds no SQL, storage, or I/O.
//!
//! ## Usage
//!
//! ```rust,ignore
//! let mut cursor = StatementCursor::new(handle);
//! cursor.bind_text_named(":name", "Ada")?;
//! let mut rows = cursor.rows();
//! while let Some(row) = rows.next() {
//!     let row = row?;
//!     println!("{:?}", row.int64_named("id")?);
//! }
//! ```
//!
//! ## Modules
//!
//! - `value`: `Value` and the per-row `ColumnType` tag
//! - `catalog`: column names and name→index lookup
//! - `binder`: positional and named parameter binding
//! - `cursor`: the Ready/HasRow/Done state machine and typed accessors
//! - `rows`: single-pass row iteration
//! - `engine`: the boundary an engine implements
//!

pub mod binder;
pub mod catalog;
pub mod cursor;
pub mod engine;
pub mod error;
pub mod rows;
pub mod value;

#[cfg(test)]
mod testing;

pub use binder::ParameterSlot;
pub use catalog::ColumnCatalog;
pub use cursor::{CursorState, StatementCursor};
pub use engine::{StatementHandle, StepStatus};
pub use error::{EngineError, Result, SquealError};
pub use rows::{MappedRows, RowIterator};
pub use value::{ColumnType, Value};
