use std::collections::BTreeMap;
use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::PhotometryError;

// ---------------------------------------------------------------------------
// Field – the logical columns of a photometry table
// ---------------------------------------------------------------------------

/// Logical photometry field. The physical column a field is read from is
/// configured per load through [`ReadOptions`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Field {
    Band,
    Flux,
    FluxErr,
    Mjd,
    Zp,
}

impl Field {
    /// All fields in canonical column order.
    pub const ALL: [Field; 5] = [Field::Band, Field::Flux, Field::FluxErr, Field::Mjd, Field::Zp];

    /// Fields a table must provide unless configured otherwise.
    pub const DEFAULT_REQUIRED: [Field; 3] = [Field::Band, Field::Flux, Field::FluxErr];

    /// Logical name, also the default physical column name.
    pub fn name(self) -> &'static str {
        match self {
            Field::Band => "band",
            Field::Flux => "flux",
            Field::FluxErr => "flux_err",
            Field::Mjd => "mjd",
            Field::Zp => "zp",
        }
    }
}

impl fmt::Display for Field {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Field {
    type Err = PhotometryError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        Field::ALL
            .into_iter()
            .find(|f| f.name() == s)
            .ok_or_else(|| PhotometryError::UnknownField(s.to_string()))
    }
}

// ---------------------------------------------------------------------------
// ReadOptions – column mapping and required set
// ---------------------------------------------------------------------------

/// Options for [`read_photometry_csv`](crate::read_photometry_csv).
///
/// Every field maps to a physical column of the same name unless overridden.
/// Deserializes with defaults for anything omitted, e.g.
/// `{"columns": {"band": "filter"}}`.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ReadOptions {
    /// Physical column overrides: logical field → header name.
    pub columns: BTreeMap<Field, String>,
    /// Logical fields that must be present in the header.
    pub required: Vec<Field>,
    /// Field delimiter byte.
    pub delimiter: u8,
}

impl Default for ReadOptions {
    fn default() -> Self {
        Self {
            columns: BTreeMap::new(),
            required: Field::DEFAULT_REQUIRED.to_vec(),
            delimiter: b',',
        }
    }
}

impl ReadOptions {
    /// Read `field` from the column called `column`.
    pub fn with_column(mut self, field: Field, column: impl Into<String>) -> Self {
        self.columns.insert(field, column.into());
        self
    }

    /// Replace the set of required fields.
    pub fn with_required(mut self, required: impl IntoIterator<Item = Field>) -> Self {
        self.required = required.into_iter().collect();
        self.required.sort();
        self.required.dedup();
        self
    }

    pub fn with_delimiter(mut self, delimiter: u8) -> Self {
        self.delimiter = delimiter;
        self
    }

    /// Physical column name for `field`.
    pub fn column(&self, field: Field) -> &str {
        self.columns
            .get(&field)
            .map(String::as_str)
            .unwrap_or_else(|| field.name())
    }
}
