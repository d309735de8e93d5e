/// Data layer: core types, loading, and the filter-aggregate pipeline.
///
/// Architecture:
/// ```text
///      .csv
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse 16-column file → Dataset
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │ Dataset   │  Vec<Row>, distinct-value indices
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │  query    │  filter by criteria → count / percentage per municipality
///   └──────────┘
/// ```

pub mod loader;
pub mod model;
pub mod query;
