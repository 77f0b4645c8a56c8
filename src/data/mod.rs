/// Data layer: table model, loading, writing and preview.
///
/// Architecture:
/// ```text
///  .csv / .json / .parquet
///        │
///        ▼
///   ┌──────────┐
///   │  loader  │  parse file → Dataset
///   └──────────┘
///        │
///        ▼
///   ┌──────────┐
///   │ Dataset  │  ordered columns, Vec<Sample>
///   └──────────┘
///        │          (pipeline stages append columns)
///        ▼
///   ┌──────────┐
///   │  writer  │  Dataset → .csv / .json / .parquet (atomic replace)
///   └──────────┘
/// ```

pub mod columnar;
pub mod loader;
pub mod model;
pub mod preview;
pub mod writer;
