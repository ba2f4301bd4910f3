/// Data layer: core types, loading, and series derivation.
///
/// Architecture:
/// ```text
///  .csv / .tsv / .json / .parquet
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse file → Table
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │   Table   │  named columns, per-column inferred types
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │   view    │  validate selectors → series / histogram / trendline
///   └──────────┘
/// ```

pub mod loader;
pub mod model;
pub mod view;
