use super::group::{summarize, Measures};
use super::summary::{Metric, SortOrder, SummaryTable};
use crate::data::model::SalesTable;

/// Region → sum(Sales, Profit), distinct orders and customers. Sales desc.
pub fn sales_by_region(table: &SalesTable) -> SummaryTable {
    summarize(
        table,
        "Region",
        |r| r.region.as_str(),
        Measures::SALES_PROFIT.with_orders().with_customers(),
    )
    .sorted_by(Metric::Sales, SortOrder::Descending)
}

/// Top `n` states by sales.
pub fn sales_by_state(table: &SalesTable, n: usize) -> SummaryTable {
    summarize(
        table,
        "State",
        |r| r.state.as_str(),
        Measures::SALES_PROFIT.with_orders(),
    )
    .sorted_by(Metric::Sales, SortOrder::Descending)
    .top(n)
}

/// Top `n` cities by sales.
pub fn sales_by_city(table: &SalesTable, n: usize) -> SummaryTable {
    summarize(table, "City", |r| r.city.as_str(), Measures::SALES_PROFIT)
        .sorted_by(Metric::Sales, SortOrder::Descending)
        .top(n)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::fixtures::record;
    use crate::data::model::SalesRecord;

    fn located(region: &str, state: &str, city: &str, sales: f64) -> SalesRecord {
        let mut r = record("Any", sales, sales / 10.0);
        r.region = region.into();
        r.state = state.into();
        r.city = city.into();
        r
    }

    fn table() -> SalesTable {
        SalesTable::from_records(vec![
            located("West", "California", "Los Angeles", 400.0),
            located("West", "California", "San Francisco", 250.0),
            located("West", "Washington", "Seattle", 300.0),
            located("East", "New York", "New York City", 800.0),
            located("Central", "Texas", "Houston", 120.0),
        ])
    }

    #[test]
    fn region_totals_cover_every_row() {
        let summary = sales_by_region(&table());
        assert_eq!(summary.keys(), ["West", "East", "Central"]);
        assert_eq!(summary.total(Metric::Sales), 1870.0);
        assert_eq!(summary.get("West").unwrap().profit, Some(95.0));
        assert_eq!(summary.get("West").unwrap().customers, Some(1));
    }

    #[test]
    fn states_and_cities_truncate() {
        let states = sales_by_state(&table(), 2);
        assert_eq!(states.keys(), ["New York", "California"]);
        assert_eq!(states.rows[1].sales, 650.0);
        assert_eq!(states.rows[1].orders, Some(1));

        let cities = sales_by_city(&table(), 10);
        assert_eq!(cities.len(), 5);
        assert_eq!(cities.rows[0].key, "New York City");
        assert_eq!(cities.rows[0].orders, None);
    }
}
