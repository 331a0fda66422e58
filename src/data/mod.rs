/// Data layer: core types, loading, and queries.
///
/// Architecture:
/// ```text
///  TB_Burden_Country.csv      countries.geojson (URL or file)
///          │                          │
///          ▼                          ▼
///   ┌──────────────────────────────────────┐
///   │  loader   parse → BurdenDataset, World │
///   └──────────────────────────────────────┘
///          │
///          ▼
///   ┌──────────┐
///   │  filter   │  country / region / year filters, top-N, geometry join
///   └──────────┘
/// ```

pub mod loader;
pub mod model;
pub mod filter;
