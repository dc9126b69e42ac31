use super::group::{summarize, Measures};
use super::summary::{Metric, SortOrder, SummaryTable};
use crate::data::model::SalesTable;

/// Category → sum(Sales, Profit) and margin. Profit desc.
pub fn profit_by_category(table: &SalesTable) -> SummaryTable {
    summarize(
        table,
        "Category",
        |r| r.category.as_str(),
        Measures::SALES_PROFIT.with_margin(),
    )
    .sorted_by(Metric::Profit, SortOrder::Descending)
}

/// Top `n` products by profit, with margin.
pub fn most_profitable_products(table: &SalesTable, n: usize) -> SummaryTable {
    summarize(
        table,
        "Product",
        |r| r.product_name.as_str(),
        Measures::SALES_PROFIT.with_margin(),
    )
    .sorted_by(Metric::Profit, SortOrder::Descending)
    .top(n)
}

/// Up to `n` products whose total profit is negative, worst first.
/// Empty when nothing loses money.
pub fn loss_making_products(table: &SalesTable, n: usize) -> SummaryTable {
    summarize(
        table,
        "Product",
        |r| r.product_name.as_str(),
        Measures::SALES_PROFIT,
    )
    .filtered(|row| row.profit.is_some_and(|p| p < 0.0))
    .sorted_by(Metric::Profit, SortOrder::Ascending)
    .top(n)
}

/// Ship mode → sum(Sales), distinct orders. Sales desc.
pub fn sales_by_ship_mode(table: &SalesTable) -> SummaryTable {
    summarize(
        table,
        "Ship Mode",
        |r| r.ship_mode.as_str(),
        Measures::default().with_orders(),
    )
    .sorted_by(Metric::Sales, SortOrder::Descending)
}

/// Ship mode → sum(Sales, Profit) and margin. Profit desc.
pub fn profit_by_ship_mode(table: &SalesTable) -> SummaryTable {
    summarize(
        table,
        "Ship Mode",
        |r| r.ship_mode.as_str(),
        Measures::SALES_PROFIT.with_margin(),
    )
    .sorted_by(Metric::Profit, SortOrder::Descending)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::fixtures::record;
    use crate::data::model::SalesRecord;

    fn product(name: &str, sales: f64, profit: f64) -> SalesRecord {
        let mut r = record("Any", sales, profit);
        r.product_name = name.into();
        r
    }

    #[test]
    fn margin_per_category() {
        let table = SalesTable::from_records(vec![
            record("Tech", 100.0, 20.0),
            record("Tech", 50.0, -5.0),
            record("Furniture", 30.0, 3.0),
            record("Freebies", 0.0, 4.0),
        ]);
        let summary = profit_by_category(&table);
        assert_eq!(summary.keys(), ["Tech", "Freebies", "Furniture"]);
        assert_eq!(summary.get("Tech").unwrap().profit_margin, Some(10.0));
        assert_eq!(summary.get("Furniture").unwrap().profit_margin, Some(10.0));
        assert_eq!(summary.get("Freebies").unwrap().profit_margin, Some(0.0));
    }

    #[test]
    fn loss_makers_are_negative_and_ascending() {
        let table = SalesTable::from_records(vec![
            product("Cubify 3D Printer", 4499.98, -3399.98),
            product("Binder", 20.0, 6.0),
            product("Lexmark Printer", 2000.0, -1200.0),
            product("Lexmark Printer", 500.0, 100.0),
            product("Chair", 300.0, -15.5),
        ]);
        let losses = loss_making_products(&table, 10);
        assert_eq!(
            losses.keys(),
            ["Cubify 3D Printer", "Lexmark Printer", "Chair"]
        );
        assert!(losses.rows.iter().all(|r| r.profit.unwrap() < 0.0));
        assert_eq!(losses.get("Lexmark Printer").unwrap().profit, Some(-1100.0));
        assert_eq!(loss_making_products(&table, 1).len(), 1);
    }

    #[test]
    fn no_loss_makers_is_empty_not_error() {
        let table = SalesTable::from_records(vec![product("Binder", 20.0, 6.0)]);
        let losses = loss_making_products(&table, 10);
        assert!(losses.is_empty());
        assert_eq!(losses.key_column, "Product");
    }

    #[test]
    fn most_profitable_top_n() {
        let table = SalesTable::from_records(vec![
            product("Canon Copier", 61599.82, 25199.93),
            product("Binder", 20.0, 6.0),
            product("Fellowes Binding", 27453.38, 7753.04),
        ]);
        let top = most_profitable_products(&table, 2);
        assert_eq!(top.keys(), ["Canon Copier", "Fellowes Binding"]);
        assert_eq!(top.rows[0].profit_margin, Some(40.91));
    }

    #[test]
    fn ship_modes() {
        let mut rows = Vec::new();
        for (mode, sales, profit, order) in [
            ("Standard Class", 500.0, 50.0, "O-1"),
            ("Standard Class", 100.0, 10.0, "O-2"),
            ("First Class", 300.0, 90.0, "O-3"),
        ] {
            let mut r = record("Any", sales, profit);
            r.ship_mode = mode.into();
            r.order_id = order.into();
            rows.push(r);
        }
        let table = SalesTable::from_records(rows);

        let sales = sales_by_ship_mode(&table);
        assert_eq!(sales.keys(), ["Standard Class", "First Class"]);
        assert_eq!(sales.rows[0].orders, Some(2));
        assert_eq!(sales.rows[0].profit, None);

        let profit = profit_by_ship_mode(&table);
        assert_eq!(profit.keys(), ["First Class", "Standard Class"]);
        assert_eq!(profit.rows[0].profit_margin, Some(30.0));
    }
}
