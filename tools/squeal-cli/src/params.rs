///
/// Parameter values from the command line.
///
/// A raw argument becomes a value by the first rule that matches:
/// - `null` (any case): NULL
/// - `x'..'` or `X'..'`: blob from hex digits
/// - `'..'`: text with the quotes removed
/// - an integer: INTEGER
/// - a number containing a digit: FLOAT
/// - anything else: TEXT
///

use squeal_sqlite3::Value;

use crate::error::CliError;

pub fn parse_value(raw: &str) -> Result<Option<Value>, CliError> {
    if raw.eq_ignore_ascii_case("null") {
        return Ok(None);
    }
    if let Some(hex_digits) = blob_literal(raw) {
        let bytes = hex::decode(hex_digits)
            .map_err(|e| CliError::invalid_parameter(raw, format!("bad blob literal: {}", e)))?;
        return Ok(Some(Value::Blob(bytes)));
    }
    if raw.len() >= 2 && raw.starts_with('\'') && raw.ends_with('\'') {
        return Ok(Some(Value::Text(raw[1..raw.len() - 1].to_string())));
    }
    if let Ok(i) = raw.parse::<i64>() {
        return Ok(Some(Value::Integer(i)));
    }
    // f64 also accepts "inf" and "nan"; those stay text
    if raw.bytes().any(|b| b.is_ascii_digit()) {
        if let Ok(f) = raw.parse::<f64>() {
            return Ok(Some(Value::Float(f)));
        }
    }
    Ok(Some(Value::Text(raw.to_string())))
}

/// Splits `NAME=VALUE`. Names without a `:`, `@` or `$` prefix get `:`.
pub fn parse_named(raw: &str) -> Result<(String, Option<Value>), CliError> {
    let Some((name, value)) = raw.split_once('=') else {
        return Err(CliError::invalid_parameter(raw, "expected NAME=VALUE"));
    };
    let name = name.trim();
    if name.is_empty() {
        return Err(CliError::invalid_parameter(raw, "parameter name is empty"));
    }
    let name = if name.starts_with([':', '@', '$']) {
        name.to_string()
    } else {
        format!(":{}", name)
    };
    Ok((name, parse_value(value)?))
}

fn blob_literal(raw: &str) -> Option<&str> {
    let rest = raw.strip_prefix("x'").or_else(|| raw.strip_prefix("X'"))?;
    rest.strip_suffix('\'')
}
