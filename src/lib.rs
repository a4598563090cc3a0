//! Photometry ingestion for Bayesian SED fitting.
//!
//! Reads flux measurements per spectral band from delimited text into a
//! validated, immutable [`Photometry`] record.
//!
//! ```no_run
//! use bayesed::{Field, ReadOptions, read_photometry_csv};
//!
//! let opts = ReadOptions::default().with_column(Field::Band, "filter");
//! let phot = read_photometry_csv("photometry.csv", &opts)?;
//! println!("{} observations in {:?}", phot.len(), phot.bands());
//! # Ok::<(), bayesed::PhotometryError>(())
//! ```

pub mod data;
mod error;

pub use data::loader::{read_photometry, read_photometry_csv};
pub use data::model::{Photometry, PhotometryRow};
pub use data::options::{Field, ReadOptions};
pub use error::{PhotometryError, Result};
