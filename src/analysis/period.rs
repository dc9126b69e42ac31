use std::fmt;

use chrono::{Datelike, NaiveDate};

/// Calendar bucket size for time-based reports.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub enum Granularity {
    Year,
    Quarter,
    Month,
}

/// A derived temporal group key. Computed from a row's order date on demand
/// rather than stored on the table, so repeated reports see the same data.
///
/// Ordering is chronological within one granularity.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct Period {
    granularity: Granularity,
    year: i32,
    /// Month (1-12) or quarter (1-4); 0 for whole years.
    index: u32,
}

impl Period {
    pub fn of(date: NaiveDate, granularity: Granularity) -> Self {
        let index = match granularity {
            Granularity::Year => 0,
            Granularity::Quarter => (date.month() - 1) / 3 + 1,
            Granularity::Month => date.month(),
        };
        Period {
            granularity,
            year: date.year(),
            index,
        }
    }
}

/// `2021-03` for months, `2021Q1` for quarters, `2021` for years.
impl fmt::Display for Period {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self.granularity {
            Granularity::Year => write!(f, "{}", self.year),
            Granularity::Quarter => write!(f, "{}Q{}", self.year, self.index),
            Granularity::Month => write!(f, "{}-{:02}", self.year, self.index),
        }
    }
}
