/// Data layer: core types, loading, and filtering.
///
/// Architecture:
/// ```text
///  .csv / .tsv / .json
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse file → MetricsTable
///   └──────────┘
///        │
///        ▼
///   ┌──────────────┐
///   │ MetricsTable  │  Vec<MetricsRow>, losses as Option<f64>
///   └──────────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  filter   │  drop missing values → one Series per loss column
///   └──────────┘
/// ```

pub mod loader;
pub mod model;
pub mod filter;
