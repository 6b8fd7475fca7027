/// Data layer: source ingestion, coercion, and the immutable catalog.
///
/// Architecture:
/// ```text
///  .csv / .tsv / .json / .parquet
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse file → RawTable (normalized headers, raw cells)
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  catalog  │  coerce year/price/distance, convert units,
///   └──────────┘  drop bad rows → Vec<Listing> + price index
/// ```

pub mod catalog;
pub mod convert;
pub mod loader;
pub mod model;
pub mod normalize;
