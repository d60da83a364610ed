//! Final pass over a master table: sort, format, fill.

use serde::{Deserialize, Serialize};

use crate::table::{Cell, PriceTable, TIMESTAMP_COLUMN};
use crate::time::format_timestamp;

/// A sheet-ready cell: a number or text, never null.
///
/// Absent prices render as `Text("")`.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum SheetValue {
    Number(f64),
    Text(String),
}

impl SheetValue {
    pub fn empty() -> Self {
        SheetValue::Text(String::new())
    }
}

/// Header row plus data rows, in output order.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
pub struct SheetTable {
    pub header: Vec<String>,
    pub rows: Vec<Vec<SheetValue>>,
}

/// Stable sort of rows by timestamp ascending. Idempotent.
pub fn normalize(mut table: PriceTable) -> PriceTable {
    table.rows_mut().sort_by_key(|r| r.timestamp);
    table
}

/// Render a table for the sheet writer: `timestamp` first and formatted, every
/// blank cell as the empty string.
pub fn render(table: &PriceTable) -> SheetTable {
    let header = std::iter::once(TIMESTAMP_COLUMN.to_string())
        .chain(table.columns().iter().cloned())
        .collect();

    let rows = table
        .rows()
        .iter()
        .map(|r| {
            std::iter::once(SheetValue::Text(format_timestamp(&r.timestamp)))
                .chain(r.cells.iter().map(|c| match c {
                    Cell::Price(p) => SheetValue::Number(*p),
                    Cell::Blank => SheetValue::empty(),
                }))
                .collect()
        })
        .collect();

    SheetTable { header, rows }
}

/// `render(normalize(table))`.
pub fn finalize(table: PriceTable) -> SheetTable {
    render(&normalize(table))
}
