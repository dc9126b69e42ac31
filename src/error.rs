use std::path::PathBuf;

use thiserror::Error;

/// Failures that can cross the loader boundary.
///
/// Only `SourceNotFound` is meant to be recovered from: callers show
/// "please add the data file" guidance instead of aborting.
#[derive(Debug, Error)]
pub enum LoadError {
    #[error("data file not found: {}", path.display())]
    SourceNotFound { path: PathBuf },
    #[error("io error: {0}")]
    Io(#[from] std::io::Error),
    #[error("csv error: {0}")]
    Csv(#[from] csv::Error),
    #[error("json error: {0}")]
    Json(#[from] serde_json::Error),
    #[error("parquet error: {0}")]
    Parquet(#[from] parquet::errors::ParquetError),
    #[error("arrow error: {0}")]
    Arrow(#[from] arrow::error::ArrowError),
    #[error("missing column '{0}'")]
    MissingColumn(String),
    #[error("row {row}: cannot parse '{value}' in column '{column}' as a date")]
    MalformedDate {
        row: usize,
        column: &'static str,
        value: String,
    },
    #[error("unsupported file extension: .{0}")]
    UnsupportedFormat(String),
}

impl LoadError {
    /// True when the data file is absent (as opposed to present but broken).
    pub fn is_not_found(&self) -> bool {
        match self {
            LoadError::SourceNotFound { .. } => true,
            LoadError::Io(e) => e.kind() == std::io::ErrorKind::NotFound,
            _ => false,
        }
    }
}

pub type Result<T> = std::result::Result<T, LoadError>;
