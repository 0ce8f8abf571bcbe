//! XLSX encoder
//!
//! Builds a minimal SpreadsheetML package (one worksheet, inline strings, no
//! shared string table or styles). The first object's keys define the columns;
//! keys that only appear in later rows are ignored.

use std::io::{Cursor, Write};

use quick_xml::{
    events::{BytesDecl, BytesEnd, BytesStart, BytesText, Event},
    Writer,
};
use serde_json::Value;
use zip::write::SimpleFileOptions;
use zip::{CompressionMethod, ZipWriter};

use super::error::EncodeResult;
use super::tabular::{cell_text, first_row_columns, object_rows, Row};
use super::xml::xml_text;

pub const SHEET_NAME: &str = "Sheet 1";
pub const SHEET_PATH: &str = "xl/worksheets/sheet1.xml";

const CONTENT_TYPES: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Types xmlns="http://schemas.openxmlformats.org/package/2006/content-types"><Default Extension="rels" ContentType="application/vnd.openxmlformats-package.relationships+xml"/><Default Extension="xml" ContentType="application/xml"/><Override PartName="/xl/workbook.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.sheet.main+xml"/><Override PartName="/xl/worksheets/sheet1.xml" ContentType="application/vnd.openxmlformats-officedocument.spreadsheetml.worksheet+xml"/></Types>"#;

const ROOT_RELS: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/officeDocument" Target="xl/workbook.xml"/></Relationships>"#;

const WORKBOOK_RELS: &str = r#"<?xml version="1.0" encoding="UTF-8" standalone="yes"?>
<Relationships xmlns="http://schemas.openxmlformats.org/package/2006/relationships"><Relationship Id="rId1" Type="http://schemas.openxmlformats.org/officeDocument/2006/relationships/worksheet" Target="worksheets/sheet1.xml"/></Relationships>"#;

const SPREADSHEET_NS: &str = "http://schemas.openxmlformats.org/spreadsheetml/2006/main";
const RELATIONSHIP_NS: &str =
    "http://schemas.openxmlformats.org/officeDocument/2006/relationships";

/// Encode an array of objects as a one-sheet workbook
pub fn encode(value: &Value) -> EncodeResult<Vec<u8>> {
    let rows = object_rows(value)?;
    let columns = first_row_columns(&rows);

    let sheet = sheet_xml(&columns, &rows)?;

    let options = SimpleFileOptions::default().compression_method(CompressionMethod::Deflated);
    let mut archive = ZipWriter::new(Cursor::new(Vec::new()));

    archive.start_file("[Content_Types].xml", options)?;
    archive.write_all(CONTENT_TYPES.as_bytes())?;

    archive.start_file("_rels/.rels", options)?;
    archive.write_all(ROOT_RELS.as_bytes())?;

    archive.start_file("xl/workbook.xml", options)?;
    archive.write_all(&workbook_xml()?)?;

    archive.start_file("xl/_rels/workbook.xml.rels", options)?;
    archive.write_all(WORKBOOK_RELS.as_bytes())?;

    archive.start_file(SHEET_PATH, options)?;
    archive.write_all(&sheet)?;

    Ok(archive.finish()?.into_inner())
}

fn workbook_xml() -> EncodeResult<Vec<u8>> {
    let mut writer = Writer::new(Cursor::new(Vec::new()));
    writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), Some("yes"))))?;

    let mut workbook = BytesStart::new("workbook");
    workbook.push_attribute(("xmlns", SPREADSHEET_NS));
    workbook.push_attribute(("xmlns:r", RELATIONSHIP_NS));
    writer.write_event(Event::Start(workbook))?;

    writer.write_event(Event::Start(BytesStart::new("sheets")))?;
    let mut sheet = BytesStart::new("sheet");
    sheet.push_attribute(("name", SHEET_NAME));
    sheet.push_attribute(("sheetId", "1"));
    sheet.push_attribute(("r:id", "rId1"));
    writer.write_event(Event::Empty(sheet))?;
    writer.write_event(Event::End(BytesEnd::new("sheets")))?;

    writer.write_event(Event::End(BytesEnd::new("workbook")))?;
    Ok(writer.into_inner().into_inner())
}

fn sheet_xml(columns: &[&str], rows: &[&Row]) -> EncodeResult<Vec<u8>> {
    let mut writer = Writer::new(Cursor::new(Vec::new()));
    writer.write_event(Event::Decl(BytesDecl::new("1.0", Some("UTF-8"), Some("yes"))))?;

    let mut worksheet = BytesStart::new("worksheet");
    worksheet.push_attribute(("xmlns", SPREADSHEET_NS));
    writer.write_event(Event::Start(worksheet))?;
    writer.write_event(Event::Start(BytesStart::new("sheetData")))?;

    // Header row
    let header: Vec<Value> = columns.iter().map(|c| Value::String(c.to_string())).collect();
    write_row(&mut writer, 1, header.iter().map(Some))?;

    for (index, row) in rows.iter().enumerate() {
        let cells = columns.iter().map(|column| row.get(*column));
        write_row(&mut writer, index + 2, cells)?;
    }

    writer.write_event(Event::End(BytesEnd::new("sheetData")))?;
    writer.write_event(Event::End(BytesEnd::new("worksheet")))?;
    Ok(writer.into_inner().into_inner())
}

fn write_row<'a, W: Write>(
    writer: &mut Writer<W>,
    row_number: usize,
    cells: impl Iterator<Item = Option<&'a Value>>,
) -> EncodeResult<()> {
    let row_ref = row_number.to_string();
    let mut row = BytesStart::new("row");
    row.push_attribute(("r", row_ref.as_str()));
    writer.write_event(Event::Start(row))?;

    for (column, cell) in cells.enumerate() {
        let cell = match cell {
            Some(Value::Null) | None => continue,
            Some(value) => value,
        };
        let reference = format!("{}{}", column_name(column), row_number);
        write_cell(writer, &reference, cell)?;
    }

    writer.write_event(Event::End(BytesEnd::new("row")))?;
    Ok(())
}

fn write_cell<W: Write>(writer: &mut Writer<W>, reference: &str, value: &Value) -> EncodeResult<()> {
    let mut cell = BytesStart::new("c");
    cell.push_attribute(("r", reference));

    match value {
        Value::Number(n) => {
            writer.write_event(Event::Start(cell))?;
            write_text_element(writer, "v", &n.to_string())?;
        }
        Value::Bool(b) => {
            cell.push_attribute(("t", "b"));
            writer.write_event(Event::Start(cell))?;
            write_text_element(writer, "v", if *b { "1" } else { "0" })?;
        }
        other => {
            cell.push_attribute(("t", "inlineStr"));
            writer.write_event(Event::Start(cell))?;
            writer.write_event(Event::Start(BytesStart::new("is")))?;
            write_text_element(writer, "t", &cell_text(other))?;
            writer.write_event(Event::End(BytesEnd::new("is")))?;
        }
    }

    writer.write_event(Event::End(BytesEnd::new("c")))?;
    Ok(())
}

fn write_text_element<W: Write>(writer: &mut Writer<W>, name: &str, text: &str) -> EncodeResult<()> {
    writer.write_event(Event::Start(BytesStart::new(name)))?;
    writer.write_event(Event::Text(BytesText::new(&xml_text(text))))?;
    writer.write_event(Event::End(BytesEnd::new(name)))?;
    Ok(())
}

/// Zero-based column index to spreadsheet letters (0 -> A, 26 -> AA)
fn column_name(index: usize) -> String {
    let mut name = Vec::new();
    let mut n = index + 1;
    while n > 0 {
        let rem = (n - 1) % 26;
        name.push(b'A' + rem as u8);
        n = (n - 1) / 26;
    }
    name.reverse();
    String::from_utf8_lossy(&name).into_owned()
}
