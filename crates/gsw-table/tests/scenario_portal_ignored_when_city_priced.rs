//! City price wins over its portal.
//!
//! GREEN when:
//! - a city priced at a timestamp keeps its own price; the portal's is ignored
//! - the matched portal column is dropped after the merge
//! - the rendered sheet is `timestamp` first, one column per city

use gsw_table::*;

fn obs(location: &str, points: &[(&str, f64)]) -> RawObservation {
    RawObservation {
        location: location.to_string(),
        item_id: None,
        quality: Some(1),
        data: points
            .iter()
            .map(|(ts, p)| RawPoint {
                timestamp: ts.to_string(),
                avg_price: *p,
                item_count: 0,
            })
            .collect(),
    }
}

#[test]
fn scenario_portal_ignored_when_city_priced() {
    let filter = LocationFilter::new(["Lymhurst", "Martlock"]);
    let t1 = "2024-05-01T00:00:00";

    // Lymhurst reported on its own; the portal and Martlock in a later entry.
    let observations = vec![
        obs("Lymhurst", &[(t1, 10.0)]),
        obs("Lymhurst Portal", &[(t1, 20.0)]),
        obs("Martlock", &[(t1, 5.0)]),
    ];

    let merged = merge_portals(build_variant_table(&observations, &filter).unwrap());
    assert_eq!(merged.columns(), ["Lymhurst", "Martlock"]);

    let sheet = finalize(merged);
    assert_eq!(sheet.header, vec!["timestamp", "Lymhurst", "Martlock"]);
    assert_eq!(
        sheet.rows,
        vec![vec![
            SheetValue::Text("2024-05-01 00:00:00".to_string()),
            SheetValue::Number(10.0),
            SheetValue::Number(5.0),
        ]]
    );
}
