//! gsw-table
//!
//! Reshaping core: per-location price series in, one wide timestamp-keyed
//! table out.
//!
//! Pipeline per resource variant:
//! `build_variant_table` -> `merge_portals` -> `qualify` -> `accumulate`,
//! then `normalize` + `render` once every variant of a tier has been folded.
//!
//! This crate does **not** fetch data (see gsw-md) and does **not** write to a
//! spreadsheet (see gsw-sheet). Every function here is pure.

pub mod accumulate;
pub mod builder;
pub mod filter;
pub mod normalize;
pub mod observation;
pub mod portal;
pub mod table;
pub mod time;

use std::fmt;

use chrono::NaiveDateTime;

pub use accumulate::{accumulate, fold_variants, qualify, VariantLabel};
pub use builder::{build_variant_table, LocationSeries};
pub use filter::LocationFilter;
pub use normalize::{finalize, normalize, render, SheetTable, SheetValue};
pub use observation::{RawObservation, RawPoint};
pub use portal::{merge_portals, portal_parent, PORTAL_SUFFIX};
pub use table::{coalesce, is_blank, outer_join, Cell, PriceTable, Row, TIMESTAMP_COLUMN};
pub use time::{format_timestamp, parse_observed_at, parse_timestamp, TIMESTAMP_FORMAT};

// ---------------------------------------------------------------------------
// Error type
// ---------------------------------------------------------------------------

/// Errors produced while reshaping observations into tables.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TableError {
    /// An observation carried a timestamp that could not be parsed.
    MalformedObservation { location: String, raw: String },
    /// Two data columns would share a name.
    DuplicateColumn(String),
    /// A data column tried to use the reserved `timestamp` name.
    ReservedColumn,
    /// Two rows share a timestamp.
    DuplicateTimestamp(NaiveDateTime),
    /// A row does not carry one cell per column.
    RowWidth {
        timestamp: NaiveDateTime,
        expected: usize,
        got: usize,
    },
}

impl fmt::Display for TableError {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TableError::MalformedObservation { location, raw } => {
                write!(f, "malformed observation at '{location}': timestamp '{raw}'")
            }
            TableError::DuplicateColumn(name) => write!(f, "duplicate column '{name}'"),
            TableError::ReservedColumn => {
                write!(f, "column name '{TIMESTAMP_COLUMN}' is reserved")
            }
            TableError::DuplicateTimestamp(ts) => {
                write!(f, "duplicate row for timestamp {}", format_timestamp(ts))
            }
            TableError::RowWidth {
                timestamp,
                expected,
                got,
            } => write!(
                f,
                "row {} has {got} cells, expected {expected}",
                format_timestamp(timestamp)
            ),
        }
    }
}

impl std::error::Error for TableError {}

/// Build, portal-merge and qualify one variant's observations.
///
/// The returned table is ready to be folded into a tier's master table with
/// [`accumulate`].
pub fn prepare_variant(
    observations: &[RawObservation],
    filter: &LocationFilter,
    label: &VariantLabel,
) -> Result<PriceTable, TableError> {
    let table = build_variant_table(observations, filter)?;
    Ok(qualify(merge_portals(table), label))
}
