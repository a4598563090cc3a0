use std::collections::BTreeSet;

use serde::Serialize;

use super::options::Field;
use crate::error::{PhotometryError, Result};

// ---------------------------------------------------------------------------
// Photometry – aligned measurement arrays
// ---------------------------------------------------------------------------

/// A set of aligned photometric measurements, one entry per observation.
///
/// All present arrays have the same length. Fields are private: once built the
/// record cannot change, a corrected table means a new record.
#[derive(Debug, Clone, Serialize)]
pub struct Photometry {
    band: Vec<String>,
    flux: Vec<f64>,
    flux_err: Vec<f64>,
    mjd: Option<Vec<f64>>,
    zp: Option<Vec<f64>>,
}

/// Borrowed view of a single observation.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct PhotometryRow<'a> {
    pub band: &'a str,
    pub flux: f64,
    pub flux_err: f64,
    pub mjd: Option<f64>,
    pub zp: Option<f64>,
}

impl Photometry {
    /// Build a record, checking every array against the length of `band`.
    pub fn new(
        band: Vec<String>,
        flux: Vec<f64>,
        flux_err: Vec<f64>,
        mjd: Option<Vec<f64>>,
        zp: Option<Vec<f64>>,
    ) -> Result<Self> {
        let n = band.len();
        check_len(Field::Flux, n, flux.len())?;
        check_len(Field::FluxErr, n, flux_err.len())?;
        if let Some(mjd) = &mjd {
            check_len(Field::Mjd, n, mjd.len())?;
        }
        if let Some(zp) = &zp {
            check_len(Field::Zp, n, zp.len())?;
        }

        Ok(Self {
            band,
            flux,
            flux_err,
            mjd,
            zp,
        })
    }

    pub fn band(&self) -> &[String] {
        &self.band
    }

    pub fn flux(&self) -> &[f64] {
        &self.flux
    }

    pub fn flux_err(&self) -> &[f64] {
        &self.flux_err
    }

    /// Observation times (MJD), if the table had them.
    pub fn mjd(&self) -> Option<&[f64]> {
        self.mjd.as_deref()
    }

    /// Zeropoints, if the table had them.
    pub fn zp(&self) -> Option<&[f64]> {
        self.zp.as_deref()
    }

    /// Number of observations.
    pub fn len(&self) -> usize {
        self.band.len()
    }

    /// Whether the record holds no observations.
    pub fn is_empty(&self) -> bool {
        self.band.is_empty()
    }

    /// Iterate observations in table order.
    pub fn rows(&self) -> impl Iterator<Item = PhotometryRow<'_>> + '_ {
        (0..self.len()).map(move |i| PhotometryRow {
            band: &self.band[i],
            flux: self.flux[i],
            flux_err: self.flux_err[i],
            mjd: self.mjd.as_ref().map(|m| m[i]),
            zp: self.zp.as_ref().map(|z| z[i]),
        })
    }

    /// Distinct band names in order of first appearance.
    pub fn bands(&self) -> Vec<&str> {
        let mut seen = BTreeSet::new();
        self.band
            .iter()
            .map(String::as_str)
            .filter(|b| seen.insert(*b))
            .collect()
    }

    /// Take the arrays back as `(band, flux, flux_err, mjd, zp)`.
    #[allow(clippy::type_complexity)]
    pub fn into_parts(
        self,
    ) -> (
        Vec<String>,
        Vec<f64>,
        Vec<f64>,
        Option<Vec<f64>>,
        Option<Vec<f64>>,
    ) {
        (self.band, self.flux, self.flux_err, self.mjd, self.zp)
    }
}

// Floats compare by bit pattern so blank (NaN) cells match themselves.
impl PartialEq for Photometry {
    fn eq(&self, other: &Self) -> bool {
        self.band == other.band
            && same_floats(&self.flux, &other.flux)
            && same_floats(&self.flux_err, &other.flux_err)
            && same_optional(self.mjd.as_deref(), other.mjd.as_deref())
            && same_optional(self.zp.as_deref(), other.zp.as_deref())
    }
}

fn same_floats(a: &[f64], b: &[f64]) -> bool {
    a.len() == b.len() && a.iter().zip(b).all(|(x, y)| x.to_bits() == y.to_bits())
}

fn same_optional(a: Option<&[f64]>, b: Option<&[f64]>) -> bool {
    match (a, b) {
        (Some(a), Some(b)) => same_floats(a, b),
        (None, None) => true,
        _ => false,
    }
}

fn check_len(field: Field, expected: usize, actual: usize) -> Result<()> {
    if actual != expected {
        return Err(PhotometryError::ShapeMismatch {
            field,
            expected,
            actual,
        });
    }
    Ok(())
}
