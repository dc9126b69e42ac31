use std::collections::{BTreeMap, HashSet};
use std::fmt::Display;

use super::summary::{profit_margin, round2, SummaryRow, SummaryTable};
use crate::data::model::{SalesRecord, SalesTable};

// ---------------------------------------------------------------------------
// Measures – which reductions a report asks for
// ---------------------------------------------------------------------------

/// Metric columns to emit beyond `Sales`, which is always summed.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct Measures {
    pub profit: bool,
    pub quantity: bool,
    pub orders: bool,
    pub customers: bool,
    pub margin: bool,
}

impl Measures {
    /// sum(Sales, Profit)
    pub const SALES_PROFIT: Measures = Measures {
        profit: true,
        quantity: false,
        orders: false,
        customers: false,
        margin: false,
    };

    pub const fn with_quantity(self) -> Self {
        Measures {
            quantity: true,
            ..self
        }
    }

    pub const fn with_orders(self) -> Self {
        Measures {
            orders: true,
            ..self
        }
    }

    pub const fn with_customers(self) -> Self {
        Measures {
            customers: true,
            ..self
        }
    }

    pub const fn with_margin(self) -> Self {
        Measures {
            margin: true,
            ..self
        }
    }
}

// ---------------------------------------------------------------------------
// GroupTotals – running reductions for one group
// ---------------------------------------------------------------------------

/// Exact (unrounded) reductions for one group. Distinct sets borrow from the
/// table, so no strings are copied while grouping.
#[derive(Debug, Default)]
pub struct GroupTotals<'a> {
    pub sales: f64,
    pub profit: f64,
    pub quantity: i64,
    pub rows: usize,
    orders: HashSet<&'a str>,
    customers: HashSet<&'a str>,
}

impl<'a> GroupTotals<'a> {
    pub fn add(&mut self, record: &'a SalesRecord) {
        self.sales += record.sales.unwrap_or_default();
        self.profit += record.profit.unwrap_or_default();
        self.quantity += record.quantity.unwrap_or_default();
        self.rows += 1;
        self.orders.insert(record.order_id.as_str());
        self.customers.insert(record.customer_id.as_str());
    }

    pub fn order_count(&self) -> usize {
        self.orders.len()
    }

    pub fn customer_count(&self) -> usize {
        self.customers.len()
    }

    /// Round and project onto the requested columns.
    pub fn to_row(&self, key: String, measures: Measures) -> SummaryRow {
        SummaryRow {
            profit: measures.profit.then(|| round2(self.profit)),
            quantity: measures.quantity.then_some(self.quantity),
            orders: measures.orders.then(|| self.order_count()),
            customers: measures.customers.then(|| self.customer_count()),
            profit_margin: measures
                .margin
                .then(|| round2(profit_margin(self.profit, self.sales))),
            ..SummaryRow::new(key, round2(self.sales))
        }
    }
}

/// Totals over the whole table.
pub fn totals(table: &SalesTable) -> GroupTotals<'_> {
    let mut totals = GroupTotals::default();
    for record in table {
        totals.add(record);
    }
    totals
}

/// Partition rows by `key`. Groups come back in ascending key order, which
/// is the tie-break for every later sort.
pub fn group_by<'a, K, F>(table: &'a SalesTable, key: F) -> BTreeMap<K, GroupTotals<'a>>
where
    K: Ord,
    F: Fn(&'a SalesRecord) -> K,
{
    let mut groups: BTreeMap<K, GroupTotals<'a>> = BTreeMap::new();
    for record in table {
        groups.entry(key(record)).or_default().add(record);
    }
    groups
}

/// Group, reduce and project in one step, unsorted (key order).
pub fn summarize<'a, K, F>(
    table: &'a SalesTable,
    key_column: &str,
    key: F,
    measures: Measures,
) -> SummaryTable
where
    K: Ord + Display,
    F: Fn(&'a SalesRecord) -> K,
{
    let rows = group_by(table, key)
        .into_iter()
        .map(|(k, totals)| totals.to_row(k.to_string(), measures))
        .collect();
    SummaryTable::new(key_column, rows)
}
