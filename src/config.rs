use std::env;
use std::path::PathBuf;

/// Default location of the superstore extract, relative to the working directory.
pub const DEFAULT_DATA_PATH: &str = "data/superstore.csv";

/// Default row limit for top-N reports.
pub const DEFAULT_TOP_N: usize = 10;

/// Runtime configuration for the dashboard binaries.
///
/// Loaded from environment variables with sensible defaults.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct DashboardConfig {
    /// Path to the sales data file (.csv, .json or .parquet)
    pub data_path: PathBuf,

    /// Row limit used by the top-N aggregations
    pub top_n: usize,
}

impl Default for DashboardConfig {
    fn default() -> Self {
        Self {
            data_path: PathBuf::from(DEFAULT_DATA_PATH),
            top_n: DEFAULT_TOP_N,
        }
    }
}

impl DashboardConfig {
    /// Load configuration from environment variables
    ///
    /// Environment variables:
    /// - `SALES_DATA_PATH` (default: data/superstore.csv)
    /// - `SALES_TOP_N` (default: 10, must be > 0)
    pub fn from_env() -> Self {
        Self::from_lookup(|key| env::var(key).ok())
    }

    fn from_lookup<F>(lookup: F) -> Self
    where
        F: Fn(&str) -> Option<String>,
    {
        let defaults = Self::default();
        Self {
            data_path: lookup("SALES_DATA_PATH")
                .map(|s| s.trim().to_string())
                .filter(|s| !s.is_empty())
                .map(PathBuf::from)
                .unwrap_or(defaults.data_path),

            top_n: lookup("SALES_TOP_N")
                .and_then(|s| s.trim().parse().ok())
                .filter(|&n: &usize| n > 0)
                .unwrap_or(defaults.top_n),
        }
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn lookup(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| (k.to_string(), v.to_string()))
            .collect();
        move |key| map.get(key).cloned()
    }

    #[test]
    fn defaults_when_unset() {
        let config = DashboardConfig::from_lookup(lookup(&[]));
        assert_eq!(config, DashboardConfig::default());
        assert_eq!(config.data_path, PathBuf::from("data/superstore.csv"));
        assert_eq!(config.top_n, 10);
    }

    #[test]
    fn reads_overrides() {
        let config = DashboardConfig::from_lookup(lookup(&[
            ("SALES_DATA_PATH", "/tmp/sales.parquet"),
            ("SALES_TOP_N", "25"),
        ]));
        assert_eq!(config.data_path, PathBuf::from("/tmp/sales.parquet"));
        assert_eq!(config.top_n, 25);
    }

    #[test]
    fn invalid_top_n_falls_back() {
        let config = DashboardConfig::from_lookup(lookup(&[("SALES_TOP_N", "zero")]));
        assert_eq!(config.top_n, DEFAULT_TOP_N);

        let config = DashboardConfig::from_lookup(lookup(&[("SALES_TOP_N", "0")]));
        assert_eq!(config.top_n, DEFAULT_TOP_N);
    }
}
