//! `--set path=value` overrides applied on top of loaded inputs.
//!
//! Paths are the dotted field paths of [`TaxInputs`] in snake_case or
//! camelCase (`reliefs.annual_rent_paid`, `reliefs.annualRentPaid`), plus
//! `residency`. Each override yields a new inputs value; the loaded inputs
//! are never modified in place.

use std::fmt;
use std::str::FromStr;

use tax_core::validation::Validator;
use tax_core::{AmountField, FlagField, TaxInputs, ValidationError};
use thiserror::Error;

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum OverrideError {
    #[error("expected PATH=VALUE, got '{0}'")]
    Syntax(String),

    #[error("unknown input field '{0}'")]
    UnknownField(String),

    #[error(transparent)]
    Invalid(#[from] ValidationError),
}

#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum Target {
    Amount(AmountField),
    Flag(FlagField),
    Residency,
}

impl Target {
    fn parse(path: &str) -> Option<Self> {
        if path.trim().eq_ignore_ascii_case("residency") {
            return Some(Self::Residency);
        }
        AmountField::parse(path)
            .map(Self::Amount)
            .or_else(|| FlagField::parse(path).map(Self::Flag))
    }
}

/// One parsed `PATH=VALUE` argument.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Override {
    target: Target,
    path: String,
    value: String,
}

impl Override {
    pub fn path(&self) -> &str {
        &self.path
    }

    pub fn value(&self) -> &str {
        &self.value
    }
}

impl FromStr for Override {
    type Err = OverrideError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let (path, value) = s
            .split_once('=')
            .ok_or_else(|| OverrideError::Syntax(s.to_string()))?;
        let path = path.trim();
        if path.is_empty() {
            return Err(OverrideError::Syntax(s.to_string()));
        }
        let target = Target::parse(path).ok_or_else(|| OverrideError::UnknownField(path.to_string()))?;
        Ok(Self {
            target,
            path: path.to_string(),
            value: value.trim().to_string(),
        })
    }
}

impl fmt::Display for Override {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        write!(f, "{}={}", self.path, self.value)
    }
}

/// Applies `overrides` in order; a later override of the same field wins.
///
/// Every bad value is reported, not just the first.
pub fn apply_overrides(
    inputs: TaxInputs,
    overrides: &[Override],
) -> Result<TaxInputs, OverrideError> {
    let mut validator = Validator::new();
    let updated = overrides.iter().fold(inputs, |acc, o| match o.target {
        Target::Amount(field) => acc.with_amount(field, validator.amount(field, &o.value)),
        Target::Flag(field) => acc.with_flag(field, validator.flag(field, &o.value)),
        Target::Residency => acc.with_residency(validator.residency(&o.value)),
    });
    validator.finish()?;
    Ok(updated)
}
