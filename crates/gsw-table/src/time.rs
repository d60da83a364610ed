//! Timestamp parsing and the canonical sheet format.

use chrono::{DateTime, NaiveDateTime};

/// Canonical sheet form: 24-hour, second precision, no zone suffix.
pub const TIMESTAMP_FORMAT: &str = "%Y-%m-%d %H:%M:%S";

/// Format an instant in [`TIMESTAMP_FORMAT`].
pub fn format_timestamp(ts: &NaiveDateTime) -> String {
    ts.format(TIMESTAMP_FORMAT).to_string()
}

/// Parse a value previously produced by [`format_timestamp`].
pub fn parse_timestamp(s: &str) -> Option<NaiveDateTime> {
    NaiveDateTime::parse_from_str(s.trim(), TIMESTAMP_FORMAT).ok()
}

/// Parse a timestamp as reported by the market-data source.
///
/// The history API reports naive ISO-8601 values (`2024-01-01T00:00:00`).
/// Space-separated and RFC 3339 forms are accepted too; zoned values are
/// converted to UTC and the zone dropped.
pub fn parse_observed_at(raw: &str) -> Option<NaiveDateTime> {
    let s = raw.trim();
    NaiveDateTime::parse_from_str(s, "%Y-%m-%dT%H:%M:%S%.f")
        .or_else(|_| NaiveDateTime::parse_from_str(s, "%Y-%m-%d %H:%M:%S%.f"))
        .ok()
        .or_else(|| {
            DateTime::parse_from_rfc3339(s)
                .ok()
                .map(|dt| dt.naive_utc())
        })
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::Timelike;

    #[test]
    fn observed_at_naive_iso() {
        let ts = parse_observed_at("2024-01-05T12:00:00").unwrap();
        assert_eq!(format_timestamp(&ts), "2024-01-05 12:00:00");
    }

    #[test]
    fn observed_at_rfc3339_is_converted_to_utc() {
        let ts = parse_observed_at("2024-01-05T12:00:00+02:00").unwrap();
        assert_eq!(format_timestamp(&ts), "2024-01-05 10:00:00");
    }

    #[test]
    fn observed_at_space_separated() {
        assert!(parse_observed_at("2024-01-05 12:00:00").is_some());
    }

    #[test]
    fn observed_at_rejects_garbage() {
        assert!(parse_observed_at("").is_none());
        assert!(parse_observed_at("yesterday").is_none());
        assert!(parse_observed_at("2024-13-01T00:00:00").is_none());
    }

    #[test]
    fn format_then_parse_keeps_second_precision() {
        let original = parse_observed_at("2024-07-31T23:59:58.750").unwrap();
        let round = parse_timestamp(&format_timestamp(&original)).unwrap();
        assert_eq!(round, original.with_nanosecond(0).unwrap());
    }

    #[test]
    fn format_is_24_hour() {
        let ts = parse_observed_at("2024-07-31T18:05:09").unwrap();
        assert_eq!(format_timestamp(&ts), "2024-07-31 18:05:09");
    }
}
