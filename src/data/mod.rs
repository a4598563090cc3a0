/// Data layer: the photometry record, column options, and the CSV loader.
///
/// Architecture:
/// ```text
///  photometry.csv        ReadOptions
///        │                    │
///        ▼                    ▼
///   ┌──────────────────────────────┐
///   │  loader   parse → map → coerce → sanity checks
///   └──────────────────────────────┘
///        │
///        ▼
///   ┌────────────┐
///   │ Photometry │  band / flux / flux_err / mjd? / zp?
///   └────────────┘
/// ```

pub mod loader;
pub mod model;
pub mod options;
