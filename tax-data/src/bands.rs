use std::fs::File;
use std::io::Read;
use std::path::Path;

use rust_decimal::Decimal;
use serde::Deserialize;
use tax_core::{RegimeError, TaxBand, TaxRegime};
use thiserror::Error;
use tracing::debug;

/// Errors that can occur when loading a band table.
#[derive(Debug, Error)]
pub enum BandLoaderError {
    #[error("could not read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("CSV parse error: {0}")]
    CsvParse(String),

    #[error("band table is invalid: {0}")]
    InvalidSchedule(#[from] RegimeError),
}

impl From<csv::Error> for BandLoaderError {
    fn from(err: csv::Error) -> Self {
        BandLoaderError::CsvParse(err.to_string())
    }
}

/// A single record from a band table CSV file.
///
/// - `label`: Display label, e.g. `Next ₦2,200,000 (15%)`
/// - `width`: Width of the band (empty for the unbounded top band)
/// - `rate`: Band rate as a decimal (e.g., 0.15 for 15%)
#[derive(Debug, Clone, Deserialize, PartialEq)]
pub struct BandRecord {
    pub label: String,
    #[serde(deserialize_with = "deserialize_optional_decimal")]
    pub width: Option<Decimal>,
    pub rate: Decimal,
}

impl From<BandRecord> for TaxBand {
    fn from(record: BandRecord) -> Self {
        TaxBand {
            label: record.label,
            width: record.width,
            rate: record.rate,
        }
    }
}

fn deserialize_optional_decimal<'de, D>(deserializer: D) -> Result<Option<Decimal>, D::Error>
where
    D: serde::Deserializer<'de>,
{
    let s: Option<String> = Option::deserialize(deserializer)?;
    match s {
        Some(s) if s.trim().is_empty() => Ok(None),
        Some(s) => s
            .trim()
            .replace(',', "")
            .parse::<Decimal>()
            .map(Some)
            .map_err(serde::de::Error::custom),
        None => Ok(None),
    }
}

/// Loader for band tables stored as CSV.
///
/// ```csv
/// label,width,rate
/// First ₦800,000 (Exempt),800000,0
/// Next ₦2,200,000 (15%),2200000,0.15
/// Above ₦3,000,000 (18%),,0.18
/// ```
///
/// Labels containing commas must be quoted.
pub struct BandLoader;

impl BandLoader {
    /// Parse band records from a CSV reader, in file order.
    pub fn parse<R: Read>(reader: R) -> Result<Vec<BandRecord>, BandLoaderError> {
        let mut csv_reader = csv::ReaderBuilder::new()
            .trim(csv::Trim::All)
            .from_reader(reader);
        let mut records = Vec::new();

        for result in csv_reader.deserialize() {
            let record: BandRecord = result?;
            records.push(record);
        }

        Ok(records)
    }

    pub fn parse_file(path: &Path) -> Result<Vec<BandRecord>, BandLoaderError> {
        let file = File::open(path).map_err(|source| BandLoaderError::Io {
            path: path.display().to_string(),
            source,
        })?;
        Self::parse(file)
    }

    /// Replace the bands of `regime` with `records`.
    ///
    /// The regime's other constants are kept. The result is validated, so
    /// a table whose top band is bounded (or that is empty) is rejected.
    pub fn apply(
        regime: &TaxRegime,
        records: Vec<BandRecord>,
    ) -> Result<TaxRegime, BandLoaderError> {
        let updated = TaxRegime {
            bands: records.into_iter().map(TaxBand::from).collect(),
            ..regime.clone()
        };
        updated.validate()?;
        debug!(regime = %updated.id, bands = updated.bands.len(), "applied band table");
        Ok(updated)
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    const NG_2025_CSV: &str = r#"label,width,rate
"First ₦800,000 (Exempt)",800000,0
"Next ₦2,200,000 (15%)",2200000,0.15
"Next ₦9,000,000 (18%)",9000000,0.18
"Next ₦13,000,000 (21%)",13000000,0.21
"Next ₦25,000,000 (23%)",25000000,0.23
"Above ₦50,000,000 (25%)",,0.25
"#;

    #[test]
    fn test_parse_csv_single_band() {
        let csv = "label,width,rate\nFirst 800k,800000,0";

        let records = BandLoader::parse(csv.as_bytes()).expect("Failed to parse CSV");

        assert_eq!(
            records,
            vec![BandRecord {
                label: "First 800k".to_string(),
                width: Some(dec!(800000)),
                rate: dec!(0),
            }]
        );
    }

    #[test]
    fn test_parse_csv_unbounded_top_band() {
        let csv = "label,width,rate\nAbove 50m,,0.25";

        let records = BandLoader::parse(csv.as_bytes()).expect("Failed to parse CSV");

        assert_eq!(records[0].width, None);
        assert_eq!(records[0].rate, dec!(0.25));
    }

    #[test]
    fn test_parse_csv_width_with_thousands_separator() {
        let csv = "label,width,rate\nBand,\"2,200,000\",0.15";

        let records = BandLoader::parse(csv.as_bytes()).expect("Failed to parse CSV");

        assert_eq!(records[0].width, Some(dec!(2200000)));
    }

    #[test]
    fn test_parse_full_table_matches_builtin() {
        let records = BandLoader::parse(NG_2025_CSV.as_bytes()).expect("Failed to parse CSV");

        assert_eq!(records.len(), 6);
        let bands: Vec<TaxBand> = records.into_iter().map(TaxBand::from).collect();
        assert_eq!(bands, TaxRegime::nigeria_2025().bands);
    }

    #[test]
    fn test_parse_invalid_csv_missing_column() {
        let csv = "label,width\nBand,100";

        let err = BandLoader::parse(csv.as_bytes()).expect_err("Should fail for missing column");

        let BandLoaderError::CsvParse(msg) = err else {
            panic!("Expected CsvParse error, got: {:?}", err);
        };
        assert!(
            msg.contains("missing field"),
            "Expected 'missing field' in error, got: {}",
            msg
        );
    }

    #[test]
    fn test_parse_invalid_csv_bad_decimal() {
        let csv = "label,width,rate\nBand,abc,0.10";

        let err = BandLoader::parse(csv.as_bytes()).expect_err("Should fail for invalid decimal");

        assert!(matches!(err, BandLoaderError::CsvParse(_)));
    }

    #[test]
    fn test_parse_empty_csv() {
        let records = BandLoader::parse("label,width,rate\n".as_bytes()).expect("Failed to parse CSV");

        assert!(records.is_empty());
    }

    // =========================================================================
    // apply tests
    // =========================================================================

    #[test]
    fn test_apply_replaces_bands_only() {
        let csv = "label,width,rate\nFirst 1m,1000000,0\nRest,,0.2";
        let records = BandLoader::parse(csv.as_bytes()).unwrap();
        let base = TaxRegime::nigeria_2025();

        let regime = BandLoader::apply(&base, records).expect("valid table");

        assert_eq!(regime.bands.len(), 2);
        assert_eq!(regime.bands[1], TaxBand::unbounded("Rest", dec!(0.2)));
        assert_eq!(regime.rent_relief_cap, base.rent_relief_cap);
        assert_eq!(regime.id, base.id);
    }

    #[test]
    fn test_apply_rejects_bounded_top_band() {
        let csv = "label,width,rate\nFirst 1m,1000000,0";
        let records = BandLoader::parse(csv.as_bytes()).unwrap();

        let err = BandLoader::apply(&TaxRegime::nigeria_2025(), records).unwrap_err();

        assert!(matches!(
            err,
            BandLoaderError::InvalidSchedule(RegimeError::LastBandBounded)
        ));
    }

    #[test]
    fn test_apply_rejects_empty_table() {
        let err = BandLoader::apply(&TaxRegime::nigeria_2025(), Vec::new()).unwrap_err();

        assert!(matches!(
            err,
            BandLoaderError::InvalidSchedule(RegimeError::NoBands)
        ));
    }

    #[test]
    fn test_parse_file_missing_is_io_error() {
        let err = BandLoader::parse_file(Path::new("does/not/exist.csv")).unwrap_err();

        assert!(matches!(err, BandLoaderError::Io { .. }));
    }
}
