/// Data layer: row types, loading, and filtering.
///
/// Architecture:
/// ```text
///  .csv / .json / .parquet
///        │
///        ▼
///   ┌──────────┐
///   │ encoding  │  utf-8 → latin-1 → windows-1252 → lossy utf-8
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse rows + dates → SalesTable
///   └──────────┘
///        │
///        ▼
///   ┌────────────┐
///   │ SalesTable  │  Vec<SalesRecord>, column names, missing counts
///   └────────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  filter   │  category / region / segment / date range → new table
///   └──────────┘
/// ```

pub mod encoding;
pub mod filter;
pub mod loader;
pub mod model;
