//! Tax regimes stored as TOML.
//!
//! ```toml
//! id = "ng-2025"
//! name = "Nigeria Tax Act 2025"
//! tax_year = 2025
//! currency = "NGN"
//! minimum_wage_exemption = 800000
//! rent_relief_cap = 500000
//! rent_relief_rate = 0.20
//! housing_bik_cap_rate = 0.20
//! vehicle_bik_rate = 0.05
//!
//! [[bands]]
//! label = "First ₦800,000 (Exempt)"
//! width = 800000
//! rate = 0
//!
//! [[bands]]
//! label = "Above ₦800,000 (15%)"
//! rate = 0.15
//! ```
//!
//! `bands` may be left out when the schedule is supplied separately through
//! [`BandLoader`](crate::BandLoader).

use std::fs;
use std::path::Path;

use tax_core::{RegimeError, TaxRegime};
use thiserror::Error;
use tracing::debug;

#[derive(Debug, Error)]
pub enum RegimeFileError {
    #[error("could not read {path}: {source}")]
    Io {
        path: String,
        #[source]
        source: std::io::Error,
    },

    #[error("TOML parse error: {0}")]
    Toml(#[from] toml::de::Error),

    #[error("regime is invalid: {0}")]
    Invalid(#[from] RegimeError),
}

/// Parse a regime without validating it.
pub fn parse_regime(text: &str) -> Result<TaxRegime, RegimeFileError> {
    Ok(toml::from_str(text)?)
}

/// Parse and validate a regime.
pub fn load_regime_from_str(text: &str) -> Result<TaxRegime, RegimeFileError> {
    let regime = parse_regime(text)?;
    regime.validate()?;
    Ok(regime)
}

pub fn read_regime_file(path: &Path) -> Result<TaxRegime, RegimeFileError> {
    let text = fs::read_to_string(path).map_err(|source| RegimeFileError::Io {
        path: path.display().to_string(),
        source,
    })?;
    let regime = parse_regime(&text)?;
    debug!(path = %path.display(), id = %regime.id, "read regime file");
    Ok(regime)
}

/// Read, parse and validate a regime file.
pub fn load_regime_file(path: &Path) -> Result<TaxRegime, RegimeFileError> {
    let regime = read_regime_file(path)?;
    regime.validate()?;
    Ok(regime)
}
