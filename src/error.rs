//! Error types for photometry ingestion.

use std::path::PathBuf;

use thiserror::Error;

use crate::data::options::Field;

/// Errors that can occur while building or loading a [`Photometry`](crate::Photometry) record.
#[derive(Debug, Error)]
pub enum PhotometryError {
    // === Shape Errors ===
    /// An array does not have the same length as `band`.
    #[error(
        "{field} has {actual} entries but band has {expected}; \
         band/flux/flux_err/mjd/zp must have the same length"
    )]
    ShapeMismatch {
        field: Field,
        expected: usize,
        actual: usize,
    },

    // === Schema Errors ===
    /// Required logical fields have no physical column in the file.
    #[error(
        "missing required columns {}; have columns [{}]",
        format_fields(.missing),
        .available.join(", ")
    )]
    MissingColumns {
        missing: Vec<Field>,
        available: Vec<String>,
    },

    // === Value Errors ===
    /// A cell expected to be numeric could not be parsed.
    #[error("invalid numeric value '{value}' in {field} at row {row}")]
    InvalidNumericValue {
        field: Field,
        row: usize,
        value: String,
    },

    /// A flux or flux_err entry is infinite or NaN.
    #[error("non-finite value {value} in {field} at row {row}")]
    NonFiniteValue { field: Field, row: usize, value: f64 },

    /// A flux_err entry is zero or negative.
    #[error("all flux_err must be > 0, got {value} at row {row}")]
    NonPositiveUncertainty { row: usize, value: f64 },

    /// A logical field name that is not one of band/flux/flux_err/mjd/zp.
    #[error("unknown photometry field '{0}'")]
    UnknownField(String),

    // === Parse Errors ===
    /// The input file could not be opened.
    #[error("failed to read file {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The delimited text is malformed (ragged rows, bad UTF-8, ...).
    #[error("failed to parse CSV: {0}")]
    Csv(#[from] csv::Error),
}

fn format_fields(fields: &[Field]) -> String {
    let names: Vec<&str> = fields.iter().map(|f| f.name()).collect();
    format!("[{}]", names.join(", "))
}

/// Result type for photometry operations.
pub type Result<T> = std::result::Result<T, PhotometryError>;
