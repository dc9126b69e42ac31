use std::collections::{BTreeMap, BTreeSet};

use chrono::NaiveDate;

use super::model::{columns, SalesRecord, SalesTable};

// ---------------------------------------------------------------------------
// Date range: inclusive bounds on "Order Date"
// ---------------------------------------------------------------------------

/// Inclusive order-date range.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct DateRange {
    pub start: NaiveDate,
    pub end: NaiveDate,
}

impl DateRange {
    /// Build a range; swapped bounds are put back in order.
    pub fn new(start: NaiveDate, end: NaiveDate) -> Self {
        if start <= end {
            DateRange { start, end }
        } else {
            DateRange {
                start: end,
                end: start,
            }
        }
    }

    pub fn contains(&self, date: NaiveDate) -> bool {
        self.start <= date && date <= self.end
    }

    /// Restrict this range to `bounds` (the dataset's min/max order dates).
    /// `None` when the two do not overlap.
    pub fn clamp(&self, bounds: &DateRange) -> Option<DateRange> {
        if self.end < bounds.start || self.start > bounds.end {
            return None;
        }
        Some(DateRange::new(
            self.start.max(bounds.start),
            self.end.min(bounds.end),
        ))
    }
}

// ---------------------------------------------------------------------------
// Filter predicate: which values are selected per column
// ---------------------------------------------------------------------------

/// Row filter driven by the dashboard's selection controls.
///
/// A column absent from `selections` is unconstrained. A column present
/// with an empty set matches nothing.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct SalesFilter {
    selections: BTreeMap<&'static str, BTreeSet<String>>,
    date_range: Option<DateRange>,
}

impl SalesFilter {
    /// A filter that keeps every row.
    pub fn all() -> Self {
        Self::default()
    }

    pub fn categories<I, S>(self, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.select(columns::CATEGORY, values)
    }

    pub fn regions<I, S>(self, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.select(columns::REGION, values)
    }

    pub fn segments<I, S>(self, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.select(columns::SEGMENT, values)
    }

    pub fn between(mut self, range: DateRange) -> Self {
        self.date_range = Some(range);
        self
    }

    fn select<I, S>(mut self, column: &'static str, values: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.selections
            .insert(column, values.into_iter().map(Into::into).collect());
        self
    }

    /// Drop the constraint on `column` (select all).
    pub fn clear_column(&mut self, column: &str) {
        self.selections.remove(column);
    }

    pub fn date_range(&self) -> Option<DateRange> {
        self.date_range
    }

    /// Whether the filter constrains anything at all.
    pub fn is_unfiltered(&self) -> bool {
        self.selections.is_empty() && self.date_range.is_none()
    }

    pub fn matches(&self, record: &SalesRecord) -> bool {
        if let Some(range) = &self.date_range {
            if !range.contains(record.order_date) {
                return false;
            }
        }
        self.selections.iter().all(|(col, selected)| {
            record
                .text(col)
                .is_some_and(|value| selected.contains(value))
        })
    }

    /// Indices of rows passing all active constraints.
    pub fn filtered_indices(&self, table: &SalesTable) -> Vec<usize> {
        table
            .iter()
            .enumerate()
            .filter(|(_, record)| self.matches(record))
            .map(|(i, _)| i)
            .collect()
    }

    /// A new table with only the matching rows; the input is untouched.
    pub fn apply(&self, table: &SalesTable) -> SalesTable {
        if self.is_unfiltered() {
            return table.clone();
        }
        table.select(&self.filtered_indices(table))
    }
}
