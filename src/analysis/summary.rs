use std::cmp::Ordering;
use std::fmt;

use serde::Serialize;

// ---------------------------------------------------------------------------
// Numeric helpers
// ---------------------------------------------------------------------------

/// Round to cents. Applied once, when a result is handed out. Values that
/// round to zero come back as `+0.0`, never `-0.0`.
pub fn round2(value: f64) -> f64 {
    (value * 100.0).round() / 100.0 + 0.0
}

/// Profit as a percentage of sales; 0 when there are no positive sales.
pub fn profit_margin(profit: f64, sales: f64) -> f64 {
    if sales > 0.0 {
        profit / sales * 100.0
    } else {
        0.0
    }
}

/// Percent change from `previous` to `current`; undefined when `previous` is 0.
pub fn percent_change(previous: f64, current: f64) -> Option<f64> {
    if previous == 0.0 {
        None
    } else {
        Some((current - previous) / previous * 100.0)
    }
}

// ---------------------------------------------------------------------------
// Metric – the value columns a summary row can carry
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Metric {
    Sales,
    Profit,
    Quantity,
    Orders,
    Customers,
    ProfitMargin,
    SalesGrowth,
    ProfitGrowth,
}

impl Metric {
    pub const ALL: [Metric; 8] = [
        Metric::Sales,
        Metric::Profit,
        Metric::Quantity,
        Metric::Orders,
        Metric::Customers,
        Metric::ProfitMargin,
        Metric::SalesGrowth,
        Metric::ProfitGrowth,
    ];

    /// Column label used by tabular output.
    pub fn label(self) -> &'static str {
        match self {
            Metric::Sales => "Sales",
            Metric::Profit => "Profit",
            Metric::Quantity => "Quantity",
            Metric::Orders => "Orders",
            Metric::Customers => "Customers",
            Metric::ProfitMargin => "Profit_Margin",
            Metric::SalesGrowth => "Sales_Growth",
            Metric::ProfitGrowth => "Profit_Growth",
        }
    }

    /// Whether the metric is a count (rendered as an integer column).
    pub fn is_count(self) -> bool {
        matches!(self, Metric::Quantity | Metric::Orders | Metric::Customers)
    }
}

impl fmt::Display for Metric {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.label())
    }
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SortOrder {
    Ascending,
    Descending,
}

// ---------------------------------------------------------------------------
// SummaryRow – one group of a summary table
// ---------------------------------------------------------------------------

/// One row per distinct group key. Metrics a given report does not compute
/// are `None` and omitted from serialized output.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SummaryRow {
    pub key: String,
    pub sales: f64,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profit: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub quantity: Option<i64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub orders: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub customers: Option<usize>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profit_margin: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub sales_growth: Option<f64>,
    #[serde(skip_serializing_if = "Option::is_none")]
    pub profit_growth: Option<f64>,
}

impl SummaryRow {
    pub fn new(key: impl Into<String>, sales: f64) -> Self {
        SummaryRow {
            key: key.into(),
            sales,
            profit: None,
            quantity: None,
            orders: None,
            customers: None,
            profit_margin: None,
            sales_growth: None,
            profit_growth: None,
        }
    }

    /// The value of `metric` as a float, if this row carries it.
    pub fn value(&self, metric: Metric) -> Option<f64> {
        match metric {
            Metric::Sales => Some(self.sales),
            Metric::Profit => self.profit,
            Metric::Quantity => self.quantity.map(|q| q as f64),
            Metric::Orders => self.orders.map(|n| n as f64),
            Metric::Customers => self.customers.map(|n| n as f64),
            Metric::ProfitMargin => self.profit_margin,
            Metric::SalesGrowth => self.sales_growth,
            Metric::ProfitGrowth => self.profit_growth,
        }
    }
}

// ---------------------------------------------------------------------------
// SummaryTable – grouped result handed to the presentation layer
// ---------------------------------------------------------------------------

#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct SummaryTable {
    /// Name of the group-key column ("Category", "Month", ...).
    pub key_column: String,
    pub rows: Vec<SummaryRow>,
}

impl SummaryTable {
    pub fn new(key_column: impl Into<String>, rows: Vec<SummaryRow>) -> Self {
        SummaryTable {
            key_column: key_column.into(),
            rows,
        }
    }

    /// Stable sort on `metric`. Rows lacking the metric sort last; equal
    /// values keep their current (key) order.
    pub fn sorted_by(mut self, metric: Metric, order: SortOrder) -> Self {
        self.rows.sort_by(|a, b| match (a.value(metric), b.value(metric)) {
            (Some(x), Some(y)) => match order {
                SortOrder::Ascending => x.total_cmp(&y),
                SortOrder::Descending => y.total_cmp(&x),
            },
            (Some(_), None) => Ordering::Less,
            (None, Some(_)) => Ordering::Greater,
            (None, None) => Ordering::Equal,
        });
        self
    }

    /// Keep the first `n` rows.
    pub fn top(mut self, n: usize) -> Self {
        self.rows.truncate(n);
        self
    }

    /// Keep rows matching `keep`, preserving order.
    pub fn filtered<F>(mut self, keep: F) -> Self
    where
        F: Fn(&SummaryRow) -> bool,
    {
        self.rows.retain(|row| keep(row));
        self
    }

    /// Metric columns present on at least one row, in [`Metric::ALL`] order.
    pub fn metrics(&self) -> Vec<Metric> {
        Metric::ALL
            .into_iter()
            .filter(|&m| self.rows.iter().any(|r| r.value(m).is_some()))
            .collect()
    }

    /// `(key, value)` pairs for charting one metric. Rows without it are skipped.
    pub fn series(&self, metric: Metric) -> Vec<(String, f64)> {
        self.rows
            .iter()
            .filter_map(|r| r.value(metric).map(|v| (r.key.clone(), v)))
            .collect()
    }

    /// Mean of `metric` across rows, rounded to cents; 0 for an empty table.
    pub fn mean(&self, metric: Metric) -> f64 {
        let values: Vec<f64> = self.rows.iter().filter_map(|r| r.value(metric)).collect();
        if values.is_empty() {
            return 0.0;
        }
        round2(values.iter().sum::<f64>() / values.len() as f64)
    }

    /// Sum of `metric` across rows.
    pub fn total(&self, metric: Metric) -> f64 {
        self.rows.iter().filter_map(|r| r.value(metric)).sum()
    }

    pub fn keys(&self) -> Vec<&str> {
        self.rows.iter().map(|r| r.key.as_str()).collect()
    }

    pub fn get(&self, key: &str) -> Option<&SummaryRow> {
        self.rows.iter().find(|r| r.key == key)
    }

    pub fn len(&self) -> usize {
        self.rows.len()
    }

    pub fn is_empty(&self) -> bool {
        self.rows.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn row(key: &str, sales: f64, profit: f64) -> SummaryRow {
        SummaryRow {
            profit: Some(profit),
            ..SummaryRow::new(key, sales)
        }
    }

    #[test]
    fn rounds_half_cents_once() {
        assert_eq!(round2(10.004 + 10.006), 20.01);
        assert_eq!(round2(-3.14159), -3.14);
    }

    #[test]
    fn tiny_negatives_round_to_positive_zero() {
        let zero = round2(-0.001);
        assert_eq!(zero, 0.0);
        assert!(zero.is_sign_positive());
        let json = serde_json::to_string(&SummaryRow::new("K", zero)).unwrap();
        assert_eq!(json, r#"{"key":"K","sales":0.0}"#);
        assert_eq!(round2(-0.006), -0.01);
    }

    #[test]
    fn margin_is_zero_without_sales() {
        assert_eq!(profit_margin(5.0, 0.0), 0.0);
        assert_eq!(profit_margin(-5.0, 0.0), 0.0);
        assert_eq!(profit_margin(20.0, 100.0), 20.0);
    }

    #[test]
    fn percent_change_needs_nonzero_base() {
        assert_eq!(percent_change(0.0, 10.0), None);
        assert_eq!(percent_change(100.0, 150.0), Some(50.0));
        assert_eq!(percent_change(100.0, 50.0), Some(-50.0));
    }

    #[test]
    fn sort_is_stable_for_ties() {
        let table = SummaryTable::new(
            "K",
            vec![row("a", 5.0, 1.0), row("b", 9.0, 1.0), row("c", 5.0, 1.0)],
        )
        .sorted_by(Metric::Sales, SortOrder::Descending);
        assert_eq!(table.keys(), ["b", "a", "c"]);

        let table = table.sorted_by(Metric::Sales, SortOrder::Ascending);
        assert_eq!(table.keys(), ["a", "c", "b"]);
    }

    #[test]
    fn top_never_exceeds_n() {
        let table = SummaryTable::new("K", vec![row("a", 1.0, 0.0), row("b", 2.0, 0.0)]);
        assert_eq!(table.clone().top(5).len(), 2);
        assert_eq!(table.clone().top(1).len(), 1);
        assert!(table.top(0).is_empty());
    }

    #[test]
    fn series_and_mean() {
        let table = SummaryTable::new(
            "Month",
            vec![row("2021-01", 10.0, 2.0), row("2021-02", 20.0, 3.0)],
        );
        assert_eq!(
            table.series(Metric::Profit),
            vec![("2021-01".to_string(), 2.0), ("2021-02".to_string(), 3.0)]
        );
        assert!(table.series(Metric::Orders).is_empty());
        assert_eq!(table.mean(Metric::Sales), 15.0);
        assert_eq!(SummaryTable::new("Month", vec![]).mean(Metric::Sales), 0.0);
        assert_eq!(table.metrics(), vec![Metric::Sales, Metric::Profit]);
    }

    #[test]
    fn serializes_only_present_metrics() {
        let json = serde_json::to_value(row("Tech", 150.0, 15.0)).unwrap();
        assert_eq!(json, serde_json::json!({"key": "Tech", "sales": 150.0, "profit": 15.0}));
    }
}
