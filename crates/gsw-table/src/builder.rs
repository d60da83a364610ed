//! Per-variant table builder: one API response in, one wide table out.

use std::collections::HashSet;

use chrono::NaiveDateTime;

use crate::filter::LocationFilter;
use crate::observation::RawObservation;
use crate::table::{outer_join, Cell, PriceTable, Row};
use crate::time::parse_observed_at;
use crate::TableError;

/// Price history of exactly one location with parsed timestamps.
#[derive(Debug, Clone, PartialEq)]
pub struct LocationSeries {
    pub location: String,
    pub points: Vec<(NaiveDateTime, f64)>,
}

impl LocationSeries {
    /// Parse every point of `obs`. A repeated timestamp keeps its first point.
    pub fn from_observation(obs: &RawObservation) -> Result<Self, TableError> {
        let mut seen = HashSet::new();
        let mut points = Vec::with_capacity(obs.data.len());
        for p in &obs.data {
            let ts = parse_observed_at(&p.timestamp).ok_or_else(|| {
                TableError::MalformedObservation {
                    location: obs.location.clone(),
                    raw: p.timestamp.clone(),
                }
            })?;
            if seen.insert(ts) {
                points.push((ts, p.avg_price));
            }
        }
        Ok(Self {
            location: obs.location.clone(),
            points,
        })
    }

    /// Single-column table named after the location.
    pub fn into_table(self) -> Result<PriceTable, TableError> {
        let rows = self
            .points
            .into_iter()
            .map(|(timestamp, price)| Row {
                timestamp,
                cells: vec![Cell::Price(price)],
            })
            .collect();
        PriceTable::from_parts(vec![self.location], rows)
    }
}

/// Fold every allowed location of one response into a wide table.
///
/// Locations failing `filter` never reach the join. With no survivors the
/// result is the empty `{timestamp}`-only table. A location listed more than
/// once (e.g. once per quality) shares one column; earlier entries win.
pub fn build_variant_table(
    observations: &[RawObservation],
    filter: &LocationFilter,
) -> Result<PriceTable, TableError> {
    observations
        .iter()
        .filter(|o| filter.is_allowed(&o.location))
        .try_fold(PriceTable::empty(), |acc, obs| {
            let series = LocationSeries::from_observation(obs)?.into_table()?;
            Ok(outer_join(&acc, &series))
        })
}
