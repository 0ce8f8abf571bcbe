//! CSV encoder
//!
//! Header row plus one record per object. Columns are the union of row keys
//! in first-appearance order, so uniform input gets exactly the first
//! object's keys. Quoting follows the JSON type of each cell: headers,
//! strings, nested values and empty cells are quoted while numbers and
//! booleans are written bare.

use csv::{QuoteStyle, WriterBuilder};
use serde_json::Value;

use super::error::EncodeResult;
use super::tabular::{cell_text, object_rows, union_columns};

/// Encode an array of objects as CSV text
pub fn encode(value: &Value) -> EncodeResult<Vec<u8>> {
    let rows = object_rows(value)?;
    let columns = union_columns(&rows);

    // Fields arrive already quoted, so the writer must not quote again
    let mut writer = WriterBuilder::new()
        .quote_style(QuoteStyle::Never)
        .from_writer(Vec::new());

    writer.write_record(columns.iter().map(|column| quoted(column)))?;
    for row in &rows {
        writer.write_record(columns.iter().map(|column| field(row.get(*column))))?;
    }

    writer.into_inner().map_err(|e| e.into_error().into())
}

fn field(cell: Option<&Value>) -> String {
    match cell {
        Some(Value::Number(n)) => n.to_string(),
        Some(Value::Bool(b)) => b.to_string(),
        other => quoted(&other.map(cell_text).unwrap_or_default()),
    }
}

fn quoted(text: &str) -> String {
    format!("\"{}\"", text.replace('"', "\"\""))
}
