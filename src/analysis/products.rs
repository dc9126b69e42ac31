use super::group::{summarize, Measures};
use super::summary::{Metric, SortOrder, SummaryTable};
use crate::data::model::SalesTable;

/// Category → sum(Sales, Profit, Quantity), distinct orders. Sales desc.
pub fn sales_by_category(table: &SalesTable) -> SummaryTable {
    summarize(
        table,
        "Category",
        |r| r.category.as_str(),
        Measures::SALES_PROFIT.with_quantity().with_orders(),
    )
    .sorted_by(Metric::Sales, SortOrder::Descending)
}

/// Top `n` sub-categories by sales.
pub fn sales_by_subcategory(table: &SalesTable, n: usize) -> SummaryTable {
    summarize(
        table,
        "Sub-Category",
        |r| r.sub_category.as_str(),
        Measures::SALES_PROFIT.with_quantity(),
    )
    .sorted_by(Metric::Sales, SortOrder::Descending)
    .top(n)
}

/// Top `n` products (by name) by sales.
pub fn top_products(table: &SalesTable, n: usize) -> SummaryTable {
    summarize(
        table,
        "Product",
        |r| r.product_name.as_str(),
        Measures::SALES_PROFIT.with_quantity(),
    )
    .sorted_by(Metric::Sales, SortOrder::Descending)
    .top(n)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::data::model::fixtures::record;
    use crate::data::model::SalesRecord;

    fn product(name: &str, sales: f64, quantity: i64) -> SalesRecord {
        let mut r = record("Technology", sales, 1.0);
        r.product_name = name.into();
        r.quantity = Some(quantity);
        r
    }

    #[test]
    fn category_scenario() {
        let table = SalesTable::from_records(vec![
            record("Tech", 100.0, 20.0),
            record("Tech", 50.0, -5.0),
            record("Furniture", 30.0, 3.0),
        ]);
        let summary = sales_by_category(&table);

        assert_eq!(summary.key_column, "Category");
        assert_eq!(summary.keys(), ["Tech", "Furniture"]);
        let tech = &summary.rows[0];
        assert_eq!(tech.sales, 150.0);
        assert_eq!(tech.profit, Some(15.0));
        assert_eq!(tech.quantity, Some(2));
        assert_eq!(tech.orders, Some(1));
        assert_eq!(summary.rows[1].sales, 30.0);
        assert_eq!(summary.rows[1].profit, Some(3.0));
    }

    #[test]
    fn top_products_length_is_min_of_n_and_distinct() {
        let table = SalesTable::from_records(vec![
            product("Pen", 5.0, 10),
            product("Desk", 300.0, 1),
            product("Pen", 7.0, 2),
            product("Lamp", 40.0, 3),
        ]);
        assert_eq!(top_products(&table, 10).len(), 3);
        assert_eq!(top_products(&table, 2).len(), 2);
        assert_eq!(top_products(&table, 0).len(), 0);

        let top = top_products(&table, 3);
        assert_eq!(top.keys(), ["Desk", "Lamp", "Pen"]);
        assert_eq!(top.get("Pen").unwrap().quantity, Some(12));
        assert_eq!(top.get("Pen").unwrap().sales, 12.0);
    }

    #[test]
    fn ties_break_by_key() {
        let table = SalesTable::from_records(vec![
            product("Zeta", 10.0, 1),
            product("Alpha", 10.0, 1),
            product("Mid", 10.0, 1),
        ]);
        assert_eq!(top_products(&table, 2).keys(), ["Alpha", "Mid"]);
    }

    #[test]
    fn subcategory_top_n() {
        let mut rows = Vec::new();
        for (sub, sales) in [
            ("Phones", 90.0),
            ("Chairs", 60.0),
            ("Binders", 15.0),
            ("Phones", 10.0),
        ] {
            let mut r = record("Any", sales, 0.0);
            r.sub_category = sub.into();
            rows.push(r);
        }
        let summary = sales_by_subcategory(&SalesTable::from_records(rows), 2);
        assert_eq!(summary.key_column, "Sub-Category");
        assert_eq!(summary.keys(), ["Phones", "Chairs"]);
        assert_eq!(summary.rows[0].sales, 100.0);
        assert_eq!(summary.rows[0].orders, None);
    }
}
