use super::group::{group_by, summarize, Measures};
use super::period::{Granularity, Period};
use super::summary::{percent_change, round2, Metric, SummaryTable};
use crate::data::model::SalesTable;

// Period keys are derived per call from "Order Date"; the table itself is
// never augmented, so repeated calls return identical results.

/// Year-month → sum(Sales, Profit), distinct orders. Chronological.
pub fn monthly_sales(table: &SalesTable) -> SummaryTable {
    by_period(table, Granularity::Month, Measures::SALES_PROFIT.with_orders())
}

/// Year → sum(Sales, Profit), distinct orders. Chronological.
pub fn yearly_sales(table: &SalesTable) -> SummaryTable {
    by_period(table, Granularity::Year, Measures::SALES_PROFIT.with_orders())
}

/// Year-quarter → sum(Sales, Profit). Chronological.
pub fn quarterly_sales(table: &SalesTable) -> SummaryTable {
    by_period(table, Granularity::Quarter, Measures::SALES_PROFIT)
}

fn by_period(table: &SalesTable, granularity: Granularity, measures: Measures) -> SummaryTable {
    let key_column = match granularity {
        Granularity::Year => "Year",
        Granularity::Quarter => "Quarter",
        Granularity::Month => "Month",
    };
    summarize(
        table,
        key_column,
        |r| Period::of(r.order_date, granularity),
        measures,
    )
}

/// Yearly sales with year-over-year percent change of Sales and Profit.
///
/// Growth is computed on exact totals and left empty for the first year,
/// and for any year following one whose total was 0.
pub fn yearly_growth(table: &SalesTable) -> SummaryTable {
    let measures = Measures::SALES_PROFIT.with_orders();
    let mut previous: Option<(f64, f64)> = None;
    let mut rows = Vec::new();

    for (year, totals) in group_by(table, |r| Period::of(r.order_date, Granularity::Year)) {
        let mut row = totals.to_row(year.to_string(), measures);
        if let Some((prev_sales, prev_profit)) = previous {
            row.sales_growth = percent_change(prev_sales, totals.sales).map(round2);
            row.profit_growth = percent_change(prev_profit, totals.profit).map(round2);
        }
        previous = Some((totals.sales, totals.profit));
        rows.push(row);
    }

    SummaryTable::new("Year", rows)
}

/// Mean sales per period row of a trend table; 0 when empty.
pub fn average_sales(trend: &SummaryTable) -> f64 {
    trend.mean(Metric::Sales)
}

/// Mean profit per period row of a trend table; 0 when empty.
pub fn average_profit(trend: &SummaryTable) -> f64 {
    trend.mean(Metric::Profit)
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;
    use crate::data::model::fixtures::record;

    fn table() -> SalesTable {
        let mut rows = Vec::new();
        for (i, (y, m, d, sales, profit)) in [
            (2022, 3, 15, 200.0, 20.0),
            (2021, 1, 5, 100.0, 10.0),
            (2021, 1, 28, 50.0, -5.0),
            (2021, 11, 2, 50.0, 15.0),
            (2023, 11, 20, 100.0, 30.0),
        ]
        .into_iter()
        .enumerate()
        {
            let mut r = record("Any", sales, profit);
            r.order_date = NaiveDate::from_ymd_opt(y, m, d).unwrap();
            r.order_id = format!("O-{i}");
            rows.push(r);
        }
        SalesTable::from_records(rows)
    }

    #[test]
    fn monthly_is_chronological() {
        let monthly = monthly_sales(&table());
        assert_eq!(monthly.key_column, "Month");
        assert_eq!(monthly.keys(), ["2021-01", "2021-11", "2022-03", "2023-11"]);
        let jan = &monthly.rows[0];
        assert_eq!(jan.sales, 150.0);
        assert_eq!(jan.profit, Some(5.0));
        assert_eq!(jan.orders, Some(2));
    }

    #[test]
    fn repeated_calls_are_identical() {
        let t = table();
        let _ = yearly_sales(&t);
        let first = monthly_sales(&t);
        let second = monthly_sales(&t);
        assert_eq!(first, second);
        assert_eq!(t.column_names().len(), 19);
    }

    #[test]
    fn quarters_and_years() {
        let quarterly = quarterly_sales(&table());
        assert_eq!(quarterly.keys(), ["2021Q1", "2021Q4", "2022Q1", "2023Q4"]);
        assert_eq!(quarterly.rows[0].orders, None);

        let yearly = yearly_sales(&table());
        assert_eq!(yearly.keys(), ["2021", "2022", "2023"]);
        assert_eq!(yearly.rows[0].sales, 200.0);
        assert_eq!(yearly.rows[0].orders, Some(3));
        assert_eq!(yearly.mean(Metric::Sales), 166.67);
    }

    #[test]
    fn growth_is_relative_to_previous_year() {
        let growth = yearly_growth(&table());
        assert_eq!(growth.rows[0].sales_growth, None);
        assert_eq!(growth.rows[1].sales_growth, Some(0.0));
        assert_eq!(growth.rows[1].profit_growth, Some(0.0));
        assert_eq!(growth.rows[2].sales_growth, Some(-50.0));
        assert_eq!(growth.rows[2].profit_growth, Some(50.0));
    }

    #[test]
    fn empty_table_has_no_periods() {
        assert!(monthly_sales(&SalesTable::default()).is_empty());
        assert!(yearly_growth(&SalesTable::default()).is_empty());
        assert_eq!(average_sales(&monthly_sales(&SalesTable::default())), 0.0);
    }

    #[test]
    fn averages_are_per_period() {
        let monthly = monthly_sales(&table());
        assert_eq!(average_sales(&monthly), 125.0);
        assert_eq!(average_profit(&monthly), 17.5);
    }
}
