//! Aggregation engine: pure reports over a [`SalesTable`].
//!
//! Every report groups rows on one key, reduces metrics exactly, rounds to
//! cents on the way out, then sorts. Groups are built in ascending key order
//! and all sorts are stable, so equal metric values are ordered by key.
//!
//! [`SalesTable`]: crate::data::model::SalesTable

pub mod customers;
pub mod group;
pub mod overview;
pub mod period;
pub mod products;
pub mod profitability;
pub mod regions;
pub mod summary;
pub mod trends;

pub use customers::{sales_by_segment, top_customers};
pub use overview::{
    dataset_summary, date_range, overview_metrics, profit_overview, unique_categories,
    unique_regions, unique_segments, DatasetSummary, OverviewMetrics, ProfitOverview,
};
pub use products::{sales_by_category, sales_by_subcategory, top_products};
pub use profitability::{
    loss_making_products, most_profitable_products, profit_by_category, profit_by_ship_mode,
    sales_by_ship_mode,
};
pub use regions::{sales_by_city, sales_by_region, sales_by_state};
pub use summary::{Metric, SortOrder, SummaryRow, SummaryTable};
pub use trends::{
    average_profit, average_sales, monthly_sales, quarterly_sales, yearly_growth, yearly_sales,
};
