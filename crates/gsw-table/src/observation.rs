//! Wire shape of one location's history as returned by the market-data source.

use serde::{Deserialize, Serialize};

/// One location's price history for one item.
///
/// `quality` and `item_id` are carried through decoding but never reach a
/// table.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawObservation {
    pub location: String,
    #[serde(default)]
    pub item_id: Option<String>,
    #[serde(default)]
    pub quality: Option<u8>,
    #[serde(default)]
    pub data: Vec<RawPoint>,
}

/// A single history point. `item_count` is dropped by the table builder.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct RawPoint {
    pub timestamp: String,
    pub avg_price: f64,
    #[serde(default)]
    pub item_count: i64,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn decodes_history_payload() {
        let raw = r#"[
            {"location":"Lymhurst","item_id":"T5_ORE","quality":1,
             "data":[{"item_count":120,"avg_price":312,"timestamp":"2024-01-01T00:00:00"}]},
            {"location":"Martlock Portal","item_id":"T5_ORE","quality":1,"data":[]}
        ]"#;
        let v: Vec<RawObservation> = serde_json::from_str(raw).unwrap();
        assert_eq!(v.len(), 2);
        assert_eq!(v[0].location, "Lymhurst");
        assert_eq!(v[0].data[0].avg_price, 312.0);
        assert_eq!(v[0].data[0].item_count, 120);
        assert!(v[1].data.is_empty());
    }

    #[test]
    fn missing_optional_fields_default() {
        let raw = r#"{"location":"Bridgewatch"}"#;
        let v: RawObservation = serde_json::from_str(raw).unwrap();
        assert_eq!(v.quality, None);
        assert!(v.data.is_empty());
    }

    #[test]
    fn non_numeric_price_is_rejected() {
        let raw = r#"{
            "location": "Lymhurst",
            "data": [{"timestamp": "2024-01-01T00:00:00", "avg_price": "n/a"}]
        }"#;
        assert!(serde_json::from_str::<RawObservation>(raw).is_err());
    }
}
