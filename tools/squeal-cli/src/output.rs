///
/// Row rendering.
///
/// Drains a cursor and writes every row in the configured format:
/// - list: optional header line, then one line per row with cells joined
///   by the separator and NULL printed as `null_text`
/// - json: `{"columns": [...], "rows": [[...], ...]}`, pretty-printed
///
/// Blobs print as `x'..'` hex literals in both formats.
///

use std::io::Write;

use serde_json::{json, Number, Value as JsonValue};
use squeal_sqlite3::{StatementCursor, StatementHandle, Value};

use crate::error::CliError;
use crate::settings::{OutputConfig, OutputFormat};

/// Returns the number of rows written.
pub fn render<H, W>(
    cursor: &mut StatementCursor<H>,
    config: &OutputConfig,
    out: &mut W,
) -> Result<usize, CliError>
where
    H: StatementHandle,
    W: Write,
{
    match config.format {
        OutputFormat::List => render_list(cursor, config, out),
        OutputFormat::Json => render_json(cursor, out),
    }
}

fn render_list<H: StatementHandle, W: Write>(
    cursor: &mut StatementCursor<H>,
    config: &OutputConfig,
    out: &mut W,
) -> Result<usize, CliError> {
    if config.headers && cursor.column_count() > 0 {
        writeln!(out, "{}", cursor.column_names().join(&config.separator))?;
    }

    let mut count = 0;
    let mut rows = cursor.rows();
    while let Some(row) = rows.next() {
        let row = row?;
        let mut cells = Vec::with_capacity(row.column_count());
        for index in 0..row.column_count() {
            cells.push(match row.value_at(index)? {
                Some(value) => value.to_string(),
                None => config.null_text.clone(),
            });
        }
        writeln!(out, "{}", cells.join(&config.separator))?;
        count += 1;
    }
    Ok(count)
}

fn render_json<H: StatementHandle, W: Write>(
    cursor: &mut StatementCursor<H>,
    out: &mut W,
) -> Result<usize, CliError> {
    let columns = cursor.column_names().to_vec();
    let mut records = Vec::new();
    let mut rows = cursor.rows();
    while let Some(row) = rows.next() {
        let row = row?;
        let mut record = Vec::with_capacity(columns.len());
        for index in 0..columns.len() {
            record.push(json_value(row.value_at(index)?));
        }
        records.push(JsonValue::Array(record));
    }

    let count = records.len();
    let document = json!({ "columns": columns, "rows": records });
    serde_json::to_writer_pretty(&mut *out, &document)?;
    writeln!(out)?;
    Ok(count)
}

fn json_value(value: Option<Value>) -> JsonValue {
    match value {
        None => JsonValue::Null,
        Some(Value::Integer(i)) => JsonValue::from(i),
        Some(Value::Float(f)) => Number::from_f64(f).map_or(JsonValue::Null, JsonValue::Number),
        Some(Value::Text(s)) => JsonValue::String(s),
        Some(blob @ Value::Blob(_)) => JsonValue::String(blob.to_string()),
    }
}
