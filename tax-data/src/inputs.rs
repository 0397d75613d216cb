//! Tax inputs stored as TOML or JSON.
//!
//! Both formats use the nested layout of [`TaxInputs`]; keys may be
//! snake_case or camelCase and anything left out is zero:
//!
//! ```toml
//! annual_gross_salary = 6000000
//! residency = "resident"
//!
//! [reliefs]
//! annual_pension = 480000
//! annual_rent_paid = 1200000
//!
//! [employer_benefits]
//! housing_provided = true
//! housing_rental_value = 900000
//! ```
//!
//! Negative amounts load fine and are rejected later by
//! [`PersonalIncomeTax::compute_checked`](tax_core::PersonalIncomeTax::compute_checked).
//! Amounts beyond [`MAX_AMOUNT`](tax_core::MAX_AMOUNT) in magnitude and an
//! unrecognised residency are reported here as validation errors.

use std::fs;
use std::path::Path;

use serde_json::Value;
use tax_core::validation::{Validator, check_ranges};
use tax_core::{TaxInputs, ValidationError};
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum InputLoadError {
    #[error("could not read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("unsupported input format '{0}' (expected .toml or .json)")]
    UnsupportedFormat(String),

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("JSON parse error: {0}")]
    Json(#[from] serde_json::Error),

    #[error(transparent)]
    Invalid(#[from] ValidationError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputFormat {
    Toml,
    Json,
}

impl InputFormat {
    /// Picks the format from a file extension, case-insensitively.
    pub fn from_path(path: &Path) -> Result<Self, InputLoadError> {
        let extension = path
            .extension()
            .and_then(|e| e.to_str())
            .unwrap_or_default()
            .to_ascii_lowercase();
        match extension.as_str() {
            "toml" => Ok(Self::Toml),
            "json" => Ok(Self::Json),
            _ => Err(InputLoadError::UnsupportedFormat(
                path.display().to_string(),
            )),
        }
    }
}

/// Parse inputs from text in the given format.
pub fn load_inputs_from_str(
    text: &str,
    format: InputFormat,
) -> Result<TaxInputs, InputLoadError> {
    let value: Value = match format {
        InputFormat::Toml => serde_json::to_value(toml::from_str::<toml::Value>(text)?)?,
        InputFormat::Json => serde_json::from_str(text)?,
    };
    from_value(value)
}

/// Read and parse an inputs file, picking the format from its extension.
pub fn load_inputs_file(path: &Path) -> Result<TaxInputs, InputLoadError> {
    let format = InputFormat::from_path(path)?;
    let text = fs::read_to_string(path).map_err(|source| InputLoadError::Io {
        path: path.display().to_string(),
        source,
    })?;
    let inputs = load_inputs_from_str(&text, format)?;
    debug!(path = %path.display(), ?format, "loaded tax inputs");
    Ok(inputs)
}

/// Residency is pulled out and checked on its own so an unknown value is a
/// validation error naming the field, not a serde message.
fn from_value(mut value: Value) -> Result<TaxInputs, InputLoadError> {
    let residency_raw = value
        .as_object_mut()
        .and_then(|object| object.remove("residency"));

    let mut validator = Validator::new();
    let residency = match residency_raw {
        None | Some(Value::Null) => Default::default(),
        Some(Value::String(raw)) => validator.residency(&raw),
        Some(other) => validator.residency(&other.to_string()),
    };
    validator.finish()?;

    let inputs: TaxInputs = serde_json::from_value(value)?;
    check_ranges(&inputs)?;
    Ok(inputs.with_residency(residency))
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;
    use tax_core::{FieldProblem, Residency};

    use super::*;

    #[test]
    fn test_oversized_amount_is_rejected_but_negative_loads() {
        let text = r#"{
            "annual_gross_salary": -5,
            "investing_income": { "dividends": "50000000000000000000000000000" }
        }"#;

        let err = load_inputs_from_str(text, InputFormat::Json).unwrap_err();

        let InputLoadError::Invalid(err) = err else {
            panic!("expected validation error, got {err:?}");
        };
        assert_eq!(err.fields(), vec!["investing_income.dividends"]);
        assert!(matches!(err.issues()[0].problem, FieldProblem::TooLarge(_)));
    }

    #[test]
    fn test_load_toml_nested_inputs() {
        let text = r#"
annual_gross_salary = 6000000
residency = "non-resident"

[investing_income]
dividends = 150000.50

[reliefs]
annual_rent_paid = 1200000

[employer_benefits]
car_provided = true
car_acquisition_cost = 12000000
"#;

        let inputs = load_inputs_from_str(text, InputFormat::Toml).expect("valid inputs");

        assert_eq!(inputs.annual_gross_salary, dec!(6000000));
        assert_eq!(inputs.investing_income.dividends, dec!(150000.50));
        assert_eq!(inputs.investing_income.interest, dec!(0));
        assert_eq!(inputs.reliefs.annual_rent_paid, dec!(1200000));
        assert!(inputs.employer_benefits.car_provided);
        assert!(!inputs.employer_benefits.housing_provided);
        assert_eq!(inputs.residency, Residency::NonResident);
    }

    #[test]
    fn test_load_json_camel_case_inputs() {
        let text = r#"{
            "annualGrossSalary": 6000000,
            "chargeableGains": { "digitalAssetGains": 250000, "digitalAssetLosses": 400000 },
            "reliefs": { "annualNHF": 150000 }
        }"#;

        let inputs = load_inputs_from_str(text, InputFormat::Json).expect("valid inputs");

        assert_eq!(inputs.annual_gross_salary, dec!(6000000));
        assert_eq!(inputs.chargeable_gains.digital_asset_losses, dec!(400000));
        assert_eq!(inputs.reliefs.annual_nhf, dec!(150000));
        assert_eq!(inputs.residency, Residency::Resident);
    }

    #[test]
    fn test_empty_document_is_all_zero() {
        let inputs = load_inputs_from_str("", InputFormat::Toml).expect("valid inputs");

        assert_eq!(inputs, TaxInputs::default());
    }

    #[test]
    fn test_negative_amount_loads_unchanged() {
        let inputs = load_inputs_from_str(r#"{"annual_gross_salary": -5}"#, InputFormat::Json)
            .expect("range is checked later");

        assert_eq!(inputs.annual_gross_salary, dec!(-5));
    }

    #[test]
    fn test_unknown_residency_is_validation_error() {
        let err = load_inputs_from_str(r#"residency = "tourist""#, InputFormat::Toml).unwrap_err();

        let InputLoadError::Invalid(err) = err else {
            panic!("expected validation error, got {err:?}");
        };
        assert_eq!(err.fields(), vec!["residency"]);
        assert_eq!(
            err.issues()[0].problem,
            FieldProblem::UnknownResidency("tourist".to_string())
        );
    }

    #[test]
    fn test_non_numeric_amount_is_parse_error() {
        let err = load_inputs_from_str(r#"{"annual_gross_salary": "lots"}"#, InputFormat::Json)
            .unwrap_err();

        assert!(matches!(err, InputLoadError::Json(_)));
    }

    #[test]
    fn test_format_from_path() {
        assert_eq!(
            InputFormat::from_path(Path::new("me.TOML")).unwrap(),
            InputFormat::Toml
        );
        assert_eq!(
            InputFormat::from_path(Path::new("dir/me.json")).unwrap(),
            InputFormat::Json
        );
        assert!(matches!(
            InputFormat::from_path(Path::new("me.yaml")),
            Err(InputLoadError::UnsupportedFormat(_))
        ));
    }
}
