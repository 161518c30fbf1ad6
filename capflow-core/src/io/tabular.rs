//! CSV rendering for tabular sinks.
//!
//! One line per record, values in schema column order. Cells containing a
//! comma, quote or newline are quoted with internal quotes doubled.

use std::borrow::Cow;

use crate::record::Record;
use crate::schema::RecordSchema;

/// Quote a cell if it needs it.
pub fn escape_cell(value: &str) -> Cow<'_, str> {
    if value.contains(',') || value.contains('"') || value.contains('\n') || value.contains('\r')
    {
        Cow::Owned(format!("\"{}\"", value.replace('"', "\"\"")))
    } else {
        Cow::Borrowed(value)
    }
}

/// The header row: column names, newline-terminated.
pub fn header_row(schema: &RecordSchema) -> String {
    let mut line = schema
        .fields
        .iter()
        .map(|f| escape_cell(f.name))
        .collect::<Vec<_>>()
        .join(",");
    line.push('\n');
    line
}

/// One record as a newline-terminated row.
pub fn record_row(record: &Record) -> String {
    let mut line = String::with_capacity(record.len() * 8);
    for (i, value) in record.values.iter().enumerate() {
        if i > 0 {
            line.push(',');
        }
        line.push_str(&escape_cell(&value.to_string()));
    }
    line.push('\n');
    line
}

/// Split one CSV line back into cells, undoing [`escape_cell`].
///
/// Quoted cells may contain embedded newlines, so `line` may span several
/// physical lines. A trailing newline is ignored.
pub fn parse_row(line: &str) -> Vec<String> {
    let line = line.strip_suffix('\n').unwrap_or(line);
    let mut cells = Vec::new();
    let mut cell = String::new();
    let mut in_quotes = false;
    let mut chars = line.chars().peekable();

    while let Some(c) = chars.next() {
        match (c, in_quotes) {
            ('"', true) if chars.peek() == Some(&'"') => {
                cell.push('"');
                chars.next();
            }
            ('"', true) => in_quotes = false,
            ('"', false) if cell.is_empty() => in_quotes = true,
            (',', false) => cells.push(std::mem::take(&mut cell)),
            (c, _) => cell.push(c),
        }
    }
    cells.push(cell);
    cells
}
