/// Data layer: core types, loading, filtering, derivation, and export.
///
/// Architecture:
/// ```text
///  .csv / .json / .xlsx / URL
///        │
///        ▼
///   ┌──────────┐
///   │  loader   │  parse source → PlotDataset
///   └──────────┘
///        │
///        ▼
///   ┌─────────────┐
///   │ PlotDataset  │  Vec<PlotRecord>, id + status indices
///   └─────────────┘
///        │
///        ├───────────────┬───────────────┐
///        ▼               ▼               ▼
///   ┌──────────┐   ┌──────────┐   ┌──────────┐
///   │  filter   │   │  derive   │   │  export   │
///   │ + lookup  │   │ details   │   │  blobs    │
///   └──────────┘   └──────────┘   └──────────┘
/// ```

pub mod derive;
pub mod export;
pub mod filter;
pub mod loader;
pub mod model;
