use std::path::Path;

use log::debug;

use crate::analysis::{self, OverviewMetrics};
use crate::data::filter::{DateRange, SalesFilter};
use crate::data::loader::load_file;
use crate::data::model::SalesTable;
use crate::error::Result;

// ---------------------------------------------------------------------------
// Dashboard session
// ---------------------------------------------------------------------------

/// Caller-held dashboard state: the table loaded once at startup, the
/// active filter, and the filtered view reports run against.
#[derive(Debug, Clone)]
pub struct DashboardSession {
    /// Loaded dataset, never modified after load.
    table: SalesTable,

    /// Active selections.
    filter: SalesFilter,

    /// Rows passing `filter` (cached).
    view: SalesTable,

    /// Order-date bounds of the full table, for date-range controls.
    bounds: Option<DateRange>,
}

impl DashboardSession {
    /// Load the data file and start with no filter.
    pub fn open(path: &Path) -> Result<Self> {
        Ok(Self::new(load_file(path)?))
    }

    pub fn new(table: SalesTable) -> Self {
        let bounds = analysis::date_range(&table);
        Self {
            view: table.clone(),
            table,
            filter: SalesFilter::all(),
            bounds,
        }
    }

    /// Replace the filter and recompute the view. Date ranges overlapping
    /// the table are clamped to its bounds.
    pub fn set_filter(&mut self, mut filter: SalesFilter) {
        let clamped = filter
            .date_range()
            .zip(self.bounds)
            .and_then(|(range, bounds)| range.clamp(&bounds));
        if let Some(range) = clamped {
            filter = filter.between(range);
        }
        self.filter = filter;
        self.refilter();
    }

    /// Drop every selection.
    pub fn clear_filter(&mut self) {
        self.set_filter(SalesFilter::all());
    }

    fn refilter(&mut self) {
        self.view = self.filter.apply(&self.table);
        debug!(
            "filter applied: {} of {} rows visible",
            self.view.len(),
            self.table.len()
        );
    }

    /// The full, unfiltered table.
    pub fn table(&self) -> &SalesTable {
        &self.table
    }

    /// The filtered table that reports should use.
    pub fn view(&self) -> &SalesTable {
        &self.view
    }

    pub fn filter(&self) -> &SalesFilter {
        &self.filter
    }

    pub fn bounds(&self) -> Option<DateRange> {
        self.bounds
    }

    /// Headline metrics for the current view.
    pub fn overview(&self) -> OverviewMetrics {
        analysis::overview_metrics(&self.view)
    }

    /// Whether the current filter leaves nothing to show.
    pub fn is_view_empty(&self) -> bool {
        self.view.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use chrono::NaiveDate;

    use super::*;
    use crate::data::model::fixtures::record;

    fn session() -> DashboardSession {
        let mut a = record("Technology", 100.0, 20.0);
        a.order_date = NaiveDate::from_ymd_opt(2021, 1, 5).unwrap();
        let mut b = record("Furniture", 50.0, -5.0);
        b.order_date = NaiveDate::from_ymd_opt(2023, 11, 20).unwrap();
        b.order_id = "O-2".into();
        DashboardSession::new(SalesTable::from_records(vec![a, b]))
    }

    #[test]
    fn filter_narrows_view_but_not_table() {
        let mut s = session();
        s.set_filter(SalesFilter::all().categories(["Furniture"]));
        assert_eq!(s.view().len(), 1);
        assert_eq!(s.table().len(), 2);
        assert_eq!(s.overview().total_sales, 50.0);

        s.clear_filter();
        assert_eq!(s.view().len(), 2);
        assert_eq!(s.overview().total_orders, 2);
    }

    #[test]
    fn date_filter_is_clamped_to_bounds() {
        let mut s = session();
        let wide = DateRange::new(
            NaiveDate::from_ymd_opt(1999, 1, 1).unwrap(),
            NaiveDate::from_ymd_opt(2099, 1, 1).unwrap(),
        );
        s.set_filter(SalesFilter::all().between(wide));
        assert_eq!(s.filter().date_range(), s.bounds());
        assert_eq!(s.view().len(), 2);
    }

    #[test]
    fn disjoint_date_filter_matches_nothing() {
        let mut s = session();
        let before = DateRange::new(
            NaiveDate::from_ymd_opt(2019, 1, 1).unwrap(),
            NaiveDate::from_ymd_opt(2019, 12, 31).unwrap(),
        );
        s.set_filter(SalesFilter::all().between(before));
        assert!(s.is_view_empty());
    }

    #[test]
    fn empty_view_is_not_an_error() {
        let mut s = session();
        s.set_filter(SalesFilter::all().regions(["Atlantis"]));
        assert!(s.is_view_empty());
        assert_eq!(s.overview().profit_margin, 0.0);
        assert!(analysis::loss_making_products(s.view(), 10).is_empty());
    }
}
