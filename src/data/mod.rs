/// Data layer: core types, loading, aggregation, charts, filtering, export.
///
/// Architecture:
/// ```text
///  .xlsx / .xls / .ods / .csv
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  sheet → header + rows → PostTable   (sentence: titles)
///   └──────────┘
///        │
///        ▼
///   ┌───────────┐
///   │ PostTable  │  Vec<PostRecord>, Columns descriptor
///   └───────────┘
///        │
///        ▼
///   ┌───────────┐
///   │ dashboard  │  filter → metrics, charts, search rows, export
///   └───────────┘
/// ```

pub mod charts;
pub mod dashboard;
pub mod export;
pub mod filter;
pub mod format;
pub mod loader;
pub mod metrics;
pub mod model;
pub mod sentence;
