/// Data layer: core types, loading, derived columns, filtering and queries.
///
/// Architecture:
/// ```text
///  .csv / .json / .parquet
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse file → Vec<RawCity>
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  prepare  │  derived columns over the full table → FullDataset
///   └──────────┘
///        │        (memoized per source state by `source`)
///        ▼
///   ┌──────────┐
///   │  filter   │  sidebar predicates → FilteredView
///   └──────────┘
///        │
///        ├──▶ query   rankings, group means, summary, cost breakdown
///        └──▶ export  FilteredView → CSV
/// ```

pub mod error;
pub mod export;
pub mod filter;
pub mod loader;
pub mod model;
pub mod prepare;
pub mod query;
pub mod source;
