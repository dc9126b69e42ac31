use super::group::{summarize, Measures};
use super::summary::{Metric, SortOrder, SummaryTable};
use crate::data::model::SalesTable;

/// Segment → sum(Sales, Profit), distinct orders and customers. Sales desc.
pub fn sales_by_segment(table: &SalesTable) -> SummaryTable {
    summarize(
        table,
        "Segment",
        |r| r.segment.as_str(),
        Measures::SALES_PROFIT.with_orders().with_customers(),
    )
    .sorted_by(Metric::Sales, SortOrder::Descending)
}

/// Top `n` customers (by name) by sales, with distinct order counts.
pub fn top_customers(table: &SalesTable, n: usize) -> SummaryTable {
    summarize(
        table,
        "Customer",
        |r| r.customer_name.as_str(),
        Measures::SALES_PROFIT.with_orders(),
    )
    .sorted_by(Metric::Sales, SortOrder::Descending)
    .top(n)
}
