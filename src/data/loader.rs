use std::fs::File;
use std::io::Read;
use std::path::Path;

use csv::StringRecord;
use log::{debug, info};

use super::model::Photometry;
use super::options::{Field, ReadOptions};
use crate::error::{PhotometryError, Result};

/// Cell contents read as a missing value (NaN) in numeric columns; the
/// pandas `read_csv` default NA set.
const MISSING_MARKERS: &[&str] = &[
    "", "#N/A", "#N/A N/A", "#NA", "-1.#IND", "-1.#QNAN", "-NaN", "-nan", "1.#IND",
    "1.#QNAN", "<NA>", "N/A", "NA", "NULL", "NaN", "None", "n/a", "nan", "null",
];

// ---------------------------------------------------------------------------
// Public entry-points
// ---------------------------------------------------------------------------

/// Read photometry from a CSV file.
///
/// Expected columns by default:
/// * `band` (string), `flux` (float), `flux_err` (float, finite and > 0)
///
/// Optional:
/// * `mjd`, `zp` – loaded when the header has them, `None` otherwise
///
/// Column names and the required set come from `options`. Any bad cell fails
/// the whole load; no partial record is returned.
pub fn read_photometry_csv<P: AsRef<Path>>(path: P, options: &ReadOptions) -> Result<Photometry> {
    let path = path.as_ref();
    let file = File::open(path).map_err(|source| PhotometryError::Io {
        path: path.to_path_buf(),
        source,
    })?;
    debug!("reading photometry from {}", path.display());
    read_photometry(file, options)
}

/// Read photometry from any byte source holding delimited text with a header row.
pub fn read_photometry<R: Read>(source: R, options: &ReadOptions) -> Result<Photometry> {
    let mut reader = csv::ReaderBuilder::new()
        .has_headers(true)
        .delimiter(options.delimiter)
        .from_reader(source);

    let headers: Vec<String> = reader.headers()?.iter().map(|h| h.to_string()).collect();
    debug!("CSV header: {headers:?}");

    let records = reader
        .records()
        .collect::<std::result::Result<Vec<StringRecord>, csv::Error>>()?;

    let table = Table {
        headers: &headers,
        records: &records,
        options,
    };

    let missing: Vec<Field> = options
        .required
        .iter()
        .copied()
        .filter(|f| table.index(*f).is_none())
        .collect();
    if !missing.is_empty() {
        return Err(PhotometryError::MissingColumns {
            missing,
            available: headers.clone(),
        });
    }

    let band = table.strings(Field::Band)?;
    let flux = table.floats(Field::Flux)?;
    let flux_err = table.floats(Field::FluxErr)?;
    let mjd = table.optional_floats(Field::Mjd)?;
    let zp = table.optional_floats(Field::Zp)?;

    check_finite(Field::Flux, &flux)?;
    check_finite(Field::FluxErr, &flux_err)?;
    check_positive(&flux_err)?;

    let phot = Photometry::new(band, flux, flux_err, mjd, zp)?;
    info!(
        "loaded {} photometry rows (mjd: {}, zp: {})",
        phot.len(),
        phot.mjd().is_some(),
        phot.zp().is_some()
    );
    Ok(phot)
}

// ---------------------------------------------------------------------------
// Column extraction
// ---------------------------------------------------------------------------

/// Parsed CSV body with the column mapping applied.
struct Table<'a> {
    headers: &'a [String],
    records: &'a [StringRecord],
    options: &'a ReadOptions,
}

impl Table<'_> {
    /// Position of the physical column for `field`; first match wins.
    fn index(&self, field: Field) -> Option<usize> {
        let name = self.options.column(field);
        self.headers.iter().position(|h| h == name)
    }

    fn require(&self, field: Field) -> Result<usize> {
        self.index(field)
            .ok_or_else(|| PhotometryError::MissingColumns {
                missing: vec![field],
                available: self.headers.to_vec(),
            })
    }

    fn cells(&self, idx: usize) -> impl Iterator<Item = (usize, &str)> + '_ {
        self.records
            .iter()
            .enumerate()
            .map(move |(i, rec)| (i + 1, rec.get(idx).unwrap_or("")))
    }

    fn strings(&self, field: Field) -> Result<Vec<String>> {
        let idx = self.require(field)?;
        Ok(self.cells(idx).map(|(_, s)| s.to_string()).collect())
    }

    fn floats(&self, field: Field) -> Result<Vec<f64>> {
        let idx = self.require(field)?;
        self.cells(idx)
            .map(|(row, s)| parse_float(s, field, row))
            .collect()
    }

    fn optional_floats(&self, field: Field) -> Result<Option<Vec<f64>>> {
        if self.index(field).is_none() {
            debug!("optional column '{}' absent", self.options.column(field));
            return Ok(None);
        }
        self.floats(field).map(Some)
    }
}

fn parse_float(s: &str, field: Field, row: usize) -> Result<f64> {
    let tok = s.trim();
    if MISSING_MARKERS.contains(&tok) {
        return Ok(f64::NAN);
    }
    tok.parse::<f64>()
        .map_err(|_| PhotometryError::InvalidNumericValue {
            field,
            row,
            value: s.to_string(),
        })
}

// ---------------------------------------------------------------------------
// Sanity checks
// ---------------------------------------------------------------------------

fn check_finite(field: Field, values: &[f64]) -> Result<()> {
    match values.iter().position(|v| !v.is_finite()) {
        Some(i) => Err(PhotometryError::NonFiniteValue {
            field,
            row: i + 1,
            value: values[i],
        }),
        None => Ok(()),
    }
}

fn check_positive(flux_err: &[f64]) -> Result<()> {
    match flux_err.iter().position(|v| *v <= 0.0) {
        Some(i) => Err(PhotometryError::NonPositiveUncertainty {
            row: i + 1,
            value: flux_err[i],
        }),
        None => Ok(()),
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn load(text: &str) -> Result<Photometry> {
        read_photometry(text.as_bytes(), &ReadOptions::default())
    }

    #[test]
    fn test_parse_float_accepts_special_tokens() {
        assert_eq!(parse_float(" 1.5e-3 ", Field::Flux, 1).unwrap(), 1.5e-3);
        assert!(parse_float("", Field::Zp, 1).unwrap().is_nan());
        assert!(parse_float("NA", Field::Zp, 1).unwrap().is_nan());
        assert!(parse_float("NaN", Field::Zp, 1).unwrap().is_nan());
        assert_eq!(parse_float("-Infinity", Field::Flux, 1).unwrap(), f64::NEG_INFINITY);
    }

    #[test]
    fn test_parse_float_pandas_na_tokens() {
        for tok in ["#NA", "#N/A N/A", "-1.#IND", "-1.#QNAN", "1.#IND", "1.#QNAN", "-NaN"] {
            assert!(parse_float(tok, Field::Mjd, 1).unwrap().is_nan(), "{tok}");
        }
    }

    #[test]
    fn test_parse_float_rejects_text() {
        let err = parse_float("bright", Field::Flux, 4).unwrap_err();
        assert!(matches!(
            err,
            PhotometryError::InvalidNumericValue {
                field: Field::Flux,
                row: 4,
                ref value,
            } if value == "bright"
        ));
    }

    #[test]
    fn test_minimal_table() {
        let phot = load("band,flux,flux_err\ng,1.0,0.1\nr,2.0,0.2\n").unwrap();
        assert_eq!(phot.band(), &["g".to_string(), "r".to_string()]);
        assert_eq!(phot.flux(), &[1.0, 2.0]);
        assert!(phot.mjd().is_none());
        assert!(phot.zp().is_none());
    }

    #[test]
    fn test_header_only_gives_empty_record() {
        let phot = load("band,flux,flux_err\n").unwrap();
        assert!(phot.is_empty());
    }

    #[test]
    fn test_empty_input_reports_missing_columns() {
        let err = load("").unwrap_err();
        match err {
            PhotometryError::MissingColumns { missing, .. } => {
                assert_eq!(missing, Field::DEFAULT_REQUIRED.to_vec());
            }
            other => panic!("unexpected error: {other}"),
        }
    }

    #[test]
    fn test_invalid_flux_err_cell() {
        let err = load("band,flux,flux_err\ng,1.0,0.1\nr,2.0,abc\n").unwrap_err();
        assert!(matches!(
            err,
            PhotometryError::InvalidNumericValue { field: Field::FluxErr, row: 2, .. }
        ));
    }

    #[test]
    fn test_invalid_optional_cell() {
        let err = load("band,flux,flux_err,mjd\ng,1.0,0.1,yesterday\n").unwrap_err();
        assert!(matches!(
            err,
            PhotometryError::InvalidNumericValue { field: Field::Mjd, .. }
        ));
    }

    #[test]
    fn test_coercion_error_wins_over_sanity_checks() {
        let err = load("band,flux,flux_err,zp\ng,inf,0.0,oops\n").unwrap_err();
        assert!(matches!(err, PhotometryError::InvalidNumericValue { field: Field::Zp, .. }));
    }

    #[test]
    fn test_non_finite_checked_before_non_positive() {
        let err = load("band,flux,flux_err\ng,1.0,0.0\nr,nan,0.1\n").unwrap_err();
        assert!(matches!(err, PhotometryError::NonFiniteValue { field: Field::Flux, row: 2, .. }));
    }

    #[test]
    fn test_blank_flux_is_non_finite() {
        let err = load("band,flux,flux_err\ng,,0.1\n").unwrap_err();
        assert!(matches!(err, PhotometryError::NonFiniteValue { field: Field::Flux, row: 1, .. }));
    }

    #[test]
    fn test_negative_flux_err() {
        let err = load("band,flux,flux_err\ng,1.0,-0.1\n").unwrap_err();
        assert!(matches!(err, PhotometryError::NonPositiveUncertainty { row: 1, .. }));
    }

    #[test]
    fn test_negative_flux_is_allowed() {
        let phot = load("band,flux,flux_err\ng,-0.5,0.1\n").unwrap();
        assert_eq!(phot.flux(), &[-0.5]);
    }

    #[test]
    fn test_ragged_row_is_csv_error() {
        let err = load("band,flux,flux_err\ng,1.0\n").unwrap_err();
        assert!(matches!(err, PhotometryError::Csv(_)));
    }

    #[test]
    fn test_semicolon_delimiter() {
        let opts = ReadOptions::default().with_delimiter(b';');
        let phot = read_photometry("band;flux;flux_err\ng;1.0;0.1\n".as_bytes(), &opts).unwrap();
        assert_eq!(phot.flux(), &[1.0]);
    }

    #[test]
    fn test_duplicate_header_uses_first() {
        let phot = load("band,flux,flux_err,flux\ng,1.0,0.1,9.0\n").unwrap();
        assert_eq!(phot.flux(), &[1.0]);
    }

    #[test]
    fn test_optional_field_can_be_required() {
        let opts = ReadOptions::default()
            .with_required([Field::Band, Field::Flux, Field::FluxErr, Field::Mjd]);
        let err =
            read_photometry("band,flux,flux_err\ng,1.0,0.1\n".as_bytes(), &opts).unwrap_err();
        assert!(matches!(
            err,
            PhotometryError::MissingColumns { ref missing, .. } if missing == &vec![Field::Mjd]
        ));
    }

    #[test]
    fn test_missing_file_is_io_error() {
        let err = read_photometry_csv("/definitely/not/here.csv", &ReadOptions::default())
            .unwrap_err();
        assert!(matches!(err, PhotometryError::Io { .. }));
    }
}
