use std::collections::BTreeSet;

use serde::Serialize;

use super::group::totals;
use super::summary::{profit_margin, round2};
use crate::data::filter::DateRange;
use crate::data::model::{SalesRecord, SalesTable};

// ---------------------------------------------------------------------------
// Headline KPIs
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct OverviewMetrics {
    pub total_sales: f64,
    pub total_profit: f64,
    pub total_orders: usize,
    pub total_customers: usize,
    /// Sales per distinct order; 0 without orders.
    pub avg_order_value: f64,
    /// Percent; 0 without positive sales.
    pub profit_margin: f64,
}

/// Whole-table totals. All money values rounded at the end.
pub fn overview_metrics(table: &SalesTable) -> OverviewMetrics {
    let t = totals(table);
    let total_orders = t.order_count();
    let avg_order_value = if total_orders > 0 {
        t.sales / total_orders as f64
    } else {
        0.0
    };

    OverviewMetrics {
        total_sales: round2(t.sales),
        total_profit: round2(t.profit),
        total_orders,
        total_customers: t.customer_count(),
        avg_order_value: round2(avg_order_value),
        profit_margin: round2(profit_margin(t.profit, t.sales)),
    }
}

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct ProfitOverview {
    pub total_sales: f64,
    pub total_profit: f64,
    /// Sum of the negative line-item profits (≤ 0).
    pub total_loss: f64,
    pub profit_margin: f64,
}

pub fn profit_overview(table: &SalesTable) -> ProfitOverview {
    let t = totals(table);
    let total_loss: f64 = table
        .iter()
        .filter_map(|r| r.profit)
        .filter(|&p| p < 0.0)
        .sum();

    ProfitOverview {
        total_sales: round2(t.sales),
        total_profit: round2(t.profit),
        total_loss: round2(total_loss),
        profit_margin: round2(profit_margin(t.profit, t.sales)),
    }
}

// ---------------------------------------------------------------------------
// Dataset shape: distinct counts and value lists for filter controls
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct DatasetSummary {
    pub rows: usize,
    pub categories: usize,
    pub sub_categories: usize,
    pub products: usize,
    pub regions: usize,
    pub states: usize,
    pub cities: usize,
    pub segments: usize,
    pub first_order: Option<chrono::NaiveDate>,
    pub last_order: Option<chrono::NaiveDate>,
}

pub fn dataset_summary(table: &SalesTable) -> DatasetSummary {
    let count = |f: fn(&SalesRecord) -> &str| distinct(table, f).len();
    let range = date_range(table);
    DatasetSummary {
        rows: table.len(),
        categories: count(|r| r.category.as_str()),
        sub_categories: count(|r| r.sub_category.as_str()),
        products: count(|r| r.product_name.as_str()),
        regions: count(|r| r.region.as_str()),
        states: count(|r| r.state.as_str()),
        cities: count(|r| r.city.as_str()),
        segments: count(|r| r.segment.as_str()),
        first_order: range.map(|r| r.start),
        last_order: range.map(|r| r.end),
    }
}

fn distinct<'a>(table: &'a SalesTable, f: fn(&SalesRecord) -> &str) -> BTreeSet<&'a str> {
    table.iter().map(f).collect()
}

fn sorted_unique(table: &SalesTable, f: fn(&SalesRecord) -> &str) -> Vec<String> {
    distinct(table, f).into_iter().map(str::to_string).collect()
}

/// Sorted distinct categories.
pub fn unique_categories(table: &SalesTable) -> Vec<String> {
    sorted_unique(table, |r| r.category.as_str())
}

/// Sorted distinct regions.
pub fn unique_regions(table: &SalesTable) -> Vec<String> {
    sorted_unique(table, |r| r.region.as_str())
}

/// Sorted distinct customer segments.
pub fn unique_segments(table: &SalesTable) -> Vec<String> {
    sorted_unique(table, |r| r.segment.as_str())
}

/// Earliest and latest order date; `None` for an empty table.
pub fn date_range(table: &SalesTable) -> Option<DateRange> {
    let mut dates = table.iter().map(|r| r.order_date);
    let first = dates.next()?;
    let (start, end) = dates.fold((first, first), |(lo, hi), d| (lo.min(d), hi.max(d)));
    Some(DateRange { start, end })
}
