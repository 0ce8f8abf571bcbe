//! Shared row handling for the tabular encoders (CSV, XLSX)
//!
//! Both encoders require a non-empty array of objects. The checks live here
//! so the encoders fail with the same structured error instead of producing
//! an empty file.

use serde_json::{Map, Value};

use super::error::{EncodeError, EncodeResult};

/// A JSON object used as one table row
pub type Row = Map<String, Value>;

/// Borrow the rows of a tabular input, checking its shape
pub fn object_rows(value: &Value) -> EncodeResult<Vec<&Row>> {
    let items = match value {
        Value::Array(items) if !items.is_empty() => items,
        other => return Err(EncodeError::NotTabular(describe(other))),
    };

    items
        .iter()
        .enumerate()
        .map(|(index, item)| {
            item.as_object().ok_or(EncodeError::RowNotObject {
                index,
                found: describe(item),
            })
        })
        .collect()
}

/// Columns taken from the first row only, in key order
pub fn first_row_columns<'a>(rows: &[&'a Row]) -> Vec<&'a str> {
    rows.first()
        .map(|row| row.keys().map(String::as_str).collect())
        .unwrap_or_default()
}

/// Union of all row keys, in order of first appearance
pub fn union_columns<'a>(rows: &[&'a Row]) -> Vec<&'a str> {
    let mut columns: Vec<&str> = Vec::new();
    for row in rows {
        for key in row.keys() {
            if !columns.contains(&key.as_str()) {
                columns.push(key);
            }
        }
    }
    columns
}

/// Render a scalar cell as text. Nested values become compact JSON, null is empty.
pub fn cell_text(value: &Value) -> String {
    match value {
        Value::Null => String::new(),
        Value::Bool(b) => b.to_string(),
        Value::Number(n) => n.to_string(),
        Value::String(s) => s.clone(),
        nested => nested.to_string(),
    }
}

/// Short human description of a JSON value's shape, for error messages
pub fn describe(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "a boolean",
        Value::Number(_) => "a number",
        Value::String(_) => "a string",
        Value::Array(items) if items.is_empty() => "an empty array",
        Value::Array(_) => "an array",
        Value::Object(_) => "an object",
    }
}
