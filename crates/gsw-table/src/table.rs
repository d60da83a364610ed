//! Wide, timestamp-keyed price table and the outer join every fold goes through.
//!
//! The timestamp is not stored as a data column: each [`Row`] owns it, so it is
//! structurally the first column and can never be renamed or merged.

use std::collections::{HashMap, HashSet};

use chrono::NaiveDateTime;

use crate::TableError;

/// Header name of the timestamp column.
pub const TIMESTAMP_COLUMN: &str = "timestamp";

// ---------------------------------------------------------------------------
// Cells
// ---------------------------------------------------------------------------

/// One price cell. `Blank` is the absence marker: no observation for this
/// timestamp/column. It is distinct from a zero price.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Cell {
    Price(f64),
    Blank,
}

impl Cell {
    pub fn price(&self) -> Option<f64> {
        match self {
            Cell::Price(p) => Some(*p),
            Cell::Blank => None,
        }
    }
}

/// The single definition of "no value" used by every coalescing step.
pub fn is_blank(cell: &Cell) -> bool {
    matches!(cell, Cell::Blank)
}

/// `primary` unless it is blank, in which case `fallback`.
pub fn coalesce(primary: Cell, fallback: Cell) -> Cell {
    if is_blank(&primary) {
        fallback
    } else {
        primary
    }
}

// ---------------------------------------------------------------------------
// Table
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq)]
pub struct Row {
    pub timestamp: NaiveDateTime,
    /// One cell per data column, in column order.
    pub cells: Vec<Cell>,
}

/// Invariants:
/// - data column names are unique and never `timestamp`
/// - row timestamps are unique
/// - every row has exactly one cell per data column
#[derive(Debug, Clone, PartialEq, Default)]
pub struct PriceTable {
    columns: Vec<String>,
    rows: Vec<Row>,
}

impl PriceTable {
    /// A `{timestamp}`-only table with no rows; the fold seed.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Build a table from parts, checking every invariant.
    pub fn from_parts(columns: Vec<String>, rows: Vec<Row>) -> Result<Self, TableError> {
        let mut names = HashSet::new();
        for c in &columns {
            if c == TIMESTAMP_COLUMN {
                return Err(TableError::ReservedColumn);
            }
            if !names.insert(c.as_str()) {
                return Err(TableError::DuplicateColumn(c.clone()));
            }
        }

        let mut seen = HashSet::new();
        for r in &rows {
            if !seen.insert(r.timestamp) {
                return Err(TableError::DuplicateTimestamp(r.timestamp));
            }
            if r.cells.len() != columns.len() {
                return Err(TableError::RowWidth {
                    timestamp: r.timestamp,
                    expected: columns.len(),
                    got: r.cells.len(),
                });
            }
        }

        Ok(Self { columns, rows })
    }

    /// Data column names (timestamp excluded).
    pub fn columns(&self) -> &[String] {
        &self.columns
    }

    pub fn rows(&self) -> &[Row] {
        &self.rows
    }

    pub fn column_index(&self, name: &str) -> Option<usize> {
        self.columns.iter().position(|c| c == name)
    }

    /// Cell at `(timestamp, column)`, or `None` when either does not exist.
    pub fn cell(&self, timestamp: &NaiveDateTime, column: &str) -> Option<Cell> {
        let ci = self.column_index(column)?;
        self.rows
            .iter()
            .find(|r| r.timestamp == *timestamp)
            .map(|r| r.cells[ci])
    }

    pub fn timestamps(&self) -> impl Iterator<Item = &NaiveDateTime> + '_ {
        self.rows.iter().map(|r| &r.timestamp)
    }

    pub fn row_count(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }

    pub(crate) fn rows_mut(&mut self) -> &mut [Row] {
        &mut self.rows
    }

    pub(crate) fn columns_mut(&mut self) -> &mut [String] {
        &mut self.columns
    }

    pub(crate) fn remove_column(&mut self, index: usize) {
        self.columns.remove(index);
        for r in &mut self.rows {
            r.cells.remove(index);
        }
    }
}

// ---------------------------------------------------------------------------
// Outer join
// ---------------------------------------------------------------------------

/// Full outer join on timestamp.
///
/// - Columns: `left`'s in order, then `right`'s that `left` lacks.
/// - Rows: `left`'s in order (matched by timestamp), then unmatched `right` rows
///   in their order.
/// - Unmatched cells are [`Cell::Blank`].
/// - A column present on both sides is coalesced: the left cell wins unless it
///   is blank.
pub fn outer_join(left: &PriceTable, right: &PriceTable) -> PriceTable {
    let mut columns = left.columns.clone();
    let slots: Vec<usize> = right
        .columns
        .iter()
        .map(|name| match left.column_index(name) {
            Some(i) => i,
            None => {
                columns.push(name.clone());
                columns.len() - 1
            }
        })
        .collect();
    let width = columns.len();

    let right_by_ts: HashMap<NaiveDateTime, usize> = right
        .rows
        .iter()
        .enumerate()
        .map(|(i, r)| (r.timestamp, i))
        .collect();
    let mut matched = vec![false; right.rows.len()];

    let mut rows = Vec::with_capacity(left.rows.len() + right.rows.len());
    for l in &left.rows {
        let mut cells = l.cells.clone();
        cells.resize(width, Cell::Blank);
        if let Some(&ri) = right_by_ts.get(&l.timestamp) {
            matched[ri] = true;
            fill(&mut cells, &right.rows[ri].cells, &slots);
        }
        rows.push(Row {
            timestamp: l.timestamp,
            cells,
        });
    }

    for (r, done) in right.rows.iter().zip(&matched) {
        if *done {
            continue;
        }
        let mut cells = vec![Cell::Blank; width];
        fill(&mut cells, &r.cells, &slots);
        rows.push(Row {
            timestamp: r.timestamp,
            cells,
        });
    }

    PriceTable { columns, rows }
}

fn fill(target: &mut [Cell], source: &[Cell], slots: &[usize]) {
    for (cell, &slot) in source.iter().zip(slots) {
        target[slot] = coalesce(target[slot], *cell);
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
