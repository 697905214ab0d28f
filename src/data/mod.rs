/// Data layer: core types, loading, filtering and aggregation.
///
/// Architecture:
/// ```text
///      results .csv
///           │
///           ▼
///   ┌──────────────┐
///   │    loader    │  schema check, coercion, party buckets
///   └──────────────┘   (DatasetCache: load once per file version)
///           │
///           ▼
///   ┌──────────────┐
///   │   Dataset    │  Arc-shared, immutable rows + region index
///   └──────────────┘
///           │
///           ▼
///   ┌──────────────┐
///   │    filter    │  FilterSelection → filtered rows (or EmptyResultError)
///   └──────────────┘
///           │
///           ▼
///   ┌──────────────┐
///   │  aggregate   │  seat counts, majority, regional matrix, shares
///   └──────────────┘
/// ```

pub mod aggregate;
pub mod filter;
pub mod loader;
pub mod model;
