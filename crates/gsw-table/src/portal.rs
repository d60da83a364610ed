//! City/portal merge.
//!
//! Portal markets are reported as their own location (`"<City> Portal"`) but
//! belong to the city's market. Their prices only fill gaps in the city column.

use crate::table::{coalesce, PriceTable};

pub const PORTAL_SUFFIX: &str = " Portal";

/// `"Lymhurst Portal"` -> `Some("Lymhurst")`; anything else -> `None`.
pub fn portal_parent(column: &str) -> Option<&str> {
    column
        .strip_suffix(PORTAL_SUFFIX)
        .filter(|city| !city.is_empty())
}

/// Coalesce each portal column into its city column, then drop it.
///
/// Per row the city cell is kept unless blank, in which case the portal cell
/// is used. A portal column with no bare-city column stays in the table
/// unchanged.
pub fn merge_portals(mut table: PriceTable) -> PriceTable {
    let pairs: Vec<(usize, usize)> = table
        .columns()
        .iter()
        .enumerate()
        .filter_map(|(portal, name)| {
            let city = table.column_index(portal_parent(name)?)?;
            Some((city, portal))
        })
        .collect();

    if pairs.is_empty() {
        return table;
    }

    for row in table.rows_mut() {
        for &(city, portal) in &pairs {
            row.cells[city] = coalesce(row.cells[city], row.cells[portal]);
        }
    }

    let mut portals: Vec<usize> = pairs.iter().map(|&(_, portal)| portal).collect();
    portals.sort_unstable();
    for portal in portals.into_iter().rev() {
        table.remove_column(portal);
    }
    table
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::table::{Cell, Row};
    use crate::time::parse_timestamp;
    use chrono::NaiveDateTime;

    fn ts(day: u32) -> NaiveDateTime {
        parse_timestamp(&format!("2024-02-{day:02} 00:00:00")).unwrap()
    }

    fn table(columns: &[&str], rows: Vec<(u32, Vec<Cell>)>) -> PriceTable {
        PriceTable::from_parts(
            columns.iter().map(|c| c.to_string()).collect(),
            rows.into_iter()
                .map(|(d, cells)| Row {
                    timestamp: ts(d),
                    cells,
                })
                .collect(),
        )
        .unwrap()
    }

    use Cell::{Blank, Price};

    #[test]
    fn parent_of_portal_column() {
        assert_eq!(portal_parent("Lymhurst Portal"), Some("Lymhurst"));
        assert_eq!(portal_parent("Fort Sterling Portal"), Some("Fort Sterling"));
        assert_eq!(portal_parent("Lymhurst"), None);
        assert_eq!(portal_parent(" Portal"), None);
        assert_eq!(portal_parent("Portal Lymhurst"), None);
    }

    #[test]
    fn blank_city_takes_portal_value() {
        let t = table(
            &["Lymhurst", "Lymhurst Portal"],
            vec![
                (1, vec![Price(10.0), Price(20.0)]),
                (2, vec![Blank, Price(21.0)]),
                (3, vec![Blank, Blank]),
            ],
        );
        let m = merge_portals(t);
        assert_eq!(m.columns(), ["Lymhurst"]);
        assert_eq!(m.cell(&ts(1), "Lymhurst"), Some(Price(10.0)));
        assert_eq!(m.cell(&ts(2), "Lymhurst"), Some(Price(21.0)));
        assert_eq!(m.cell(&ts(3), "Lymhurst"), Some(Blank));
    }

    #[test]
    fn zero_city_price_is_not_blank() {
        let t = table(
            &["Martlock", "Martlock Portal"],
            vec![(1, vec![Price(0.0), Price(5.0)])],
        );
        let m = merge_portals(t);
        assert_eq!(m.cell(&ts(1), "Martlock"), Some(Price(0.0)));
    }

    #[test]
    fn city_value_wins_over_portal() {
        // Lymhurst=10, Lymhurst Portal=20, Martlock=5 at t1.
        let t = table(
            &["Lymhurst Portal", "Martlock", "Lymhurst"],
            vec![(1, vec![Price(20.0), Price(5.0), Price(10.0)])],
        );
        let m = merge_portals(t);
        assert_eq!(m.columns(), ["Martlock", "Lymhurst"]);
        assert_eq!(m.rows()[0].cells, vec![Price(5.0), Price(10.0)]);
    }

    #[test]
    fn unmatched_portal_column_is_kept() {
        let t = table(&["Lymhurst Portal"], vec![(1, vec![Price(20.0)])]);
        let m = merge_portals(t.clone());
        assert_eq!(m, t);
        assert_eq!(m.columns(), ["Lymhurst Portal"]);
        assert_eq!(m.cell(&ts(1), "Lymhurst Portal"), Some(Price(20.0)));
    }

    #[test]
    fn several_portals_merge_independently() {
        let t = table(
            &["Lymhurst", "Martlock Portal", "Lymhurst Portal", "Martlock", "Thetford Portal"],
            vec![
                (1, vec![Blank, Price(7.0), Price(1.0), Blank, Price(3.0)]),
                (2, vec![Price(2.0), Blank, Price(9.0), Price(8.0), Blank]),
            ],
        );
        let m = merge_portals(t);
        assert_eq!(m.columns(), ["Lymhurst", "Martlock", "Thetford Portal"]);
        assert_eq!(m.rows()[0].cells, vec![Price(1.0), Price(7.0), Price(3.0)]);
        assert_eq!(m.rows()[1].cells, vec![Price(2.0), Price(8.0), Blank]);
    }

    #[test]
    fn table_without_portals_is_untouched() {
        let t = table(&["Lymhurst"], vec![(1, vec![Price(1.0)])]);
        assert_eq!(merge_portals(t.clone()), t);
    }
}
