//! Input validation ahead of the engine.
//!
//! [`PersonalIncomeTax::compute`](crate::calculations::PersonalIncomeTax::compute)
//! accepts any value and lets malformed amounts flow into the arithmetic. The
//! checks here are stricter than that: they collect **every** offending field
//! into one [`ValidationError`] so a caller can report them all at once.
//!
//! Two entry points:
//! - [`validate_inputs`] for an already-typed [`TaxInputs`] (negative or
//!   out-of-range amounts).
//! - [`Validator`] for text coming from forms and flat files, which also catches
//!   unparseable or non-finite numbers and unknown residency values.

use std::fmt;

use rust_decimal::Decimal;
use thiserror::Error;

use crate::{AmountField, FlagField, Residency, TaxInputs};

/// Largest magnitude accepted for any single amount (10^15).
///
/// Keeps every sum and product in the engine well inside `Decimal`'s range.
pub const MAX_AMOUNT: Decimal = Decimal::from_parts(0xA4C6_8000, 0x0003_8D7E, 0, false, 0);

/// What is wrong with one field.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FieldProblem {
    #[error("must not be negative, got {0}")]
    Negative(Decimal),

    #[error("{0} exceeds the largest supported amount of {max}", max = MAX_AMOUNT)]
    TooLarge(Decimal),

    #[error("'{0}' is not a number")]
    NotANumber(String),

    #[error("'{0}' is not a finite number")]
    NonFinite(String),

    #[error("'{0}' is not a recognised residency")]
    UnknownResidency(String),

    #[error("'{0}' is not a yes/no value")]
    NotABoolean(String),
}

/// A single offending field, named by its dotted path.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FieldIssue {
    pub field: String,
    pub problem: FieldProblem,
}

impl fmt::Display for FieldIssue {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        write!(f, "{}: {}", self.field, self.problem)
    }
}

/// Every problem found in one set of inputs.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
#[error("invalid tax inputs: {}", join_issues(.issues))]
pub struct ValidationError {
    issues: Vec<FieldIssue>,
}

impl ValidationError {
    pub fn issues(&self) -> &[FieldIssue] {
        &self.issues
    }

    /// Paths of the offending fields, in the order they were found.
    pub fn fields(&self) -> Vec<&str> {
        self.issues.iter().map(|i| i.field.as_str()).collect()
    }
}

fn join_issues(issues: &[FieldIssue]) -> String {
    issues
        .iter()
        .map(ToString::to_string)
        .collect::<Vec<_>>()
        .join("; ")
}

/// Rejects negative monetary amounts and amounts above [`MAX_AMOUNT`].
///
/// # Errors
///
/// Returns a [`ValidationError`] naming every offending field.
///
/// # Example
///
/// ```
/// use rust_decimal_macros::dec;
/// use tax_core::{AmountField, TaxInputs};
/// use tax_core::validation::validate_inputs;
///
/// let inputs = TaxInputs::default()
///     .with_amount(AmountField::AnnualGrossSalary, dec!(-1))
///     .with_amount(AmountField::AnnualRentPaid, dec!(-2));
///
/// let err = validate_inputs(&inputs).unwrap_err();
/// assert_eq!(
///     err.fields(),
///     vec!["annual_gross_salary", "reliefs.annual_rent_paid"]
/// );
/// ```
pub fn validate_inputs(inputs: &TaxInputs) -> Result<(), ValidationError> {
    let mut validator = Validator::new();
    for field in AmountField::ALL {
        validator.check_amount(field, inputs.amount(field));
    }
    validator.finish()
}

/// Rejects amounts whose magnitude exceeds [`MAX_AMOUNT`], whatever their sign.
///
/// Loaders run this even where negative amounts are let through, so the
/// unchecked engine never sees a value that could overflow.
///
/// # Errors
///
/// Returns a [`ValidationError`] naming every out-of-range field.
pub fn check_ranges(inputs: &TaxInputs) -> Result<(), ValidationError> {
    let mut validator = Validator::new();
    for field in AmountField::ALL {
        validator.check_in_range(field, inputs.amount(field));
    }
    validator.finish()
}

/// Accumulates field problems while building inputs from text.
///
/// Each parsing method returns a usable value (zero, `false`, the default
/// residency) even on failure so the caller can keep going and report every
/// problem in one pass.
#[derive(Debug, Default)]
pub struct Validator {
    issues: Vec<FieldIssue>,
}

impl Validator {
    pub fn new() -> Self {
        Self::default()
    }

    /// Parses a monetary amount.
    ///
    /// Empty text is zero. Comma thousands separators are accepted. Negative,
    /// oversized, non-finite and unparseable values are recorded as problems.
    pub fn amount(
        &mut self,
        field: AmountField,
        raw: &str,
    ) -> Decimal {
        match parse_amount(raw) {
            Ok(value) => {
                self.check_amount(field, value);
                value
            }
            Err(problem) => {
                self.push(field.path(), problem);
                Decimal::ZERO
            }
        }
    }

    /// Parses a yes/no flag. Empty text is `false`.
    pub fn flag(
        &mut self,
        field: FlagField,
        raw: &str,
    ) -> bool {
        match raw.trim().to_ascii_lowercase().as_str() {
            "" | "false" | "no" | "n" | "0" => false,
            "true" | "yes" | "y" | "1" => true,
            _ => {
                self.push(field.path(), FieldProblem::NotABoolean(raw.to_string()));
                false
            }
        }
    }

    /// Parses a residency value. Empty text is the default (resident).
    pub fn residency(
        &mut self,
        raw: &str,
    ) -> Residency {
        if raw.trim().is_empty() {
            return Residency::default();
        }
        raw.parse().unwrap_or_else(|_| {
            self.push("residency", FieldProblem::UnknownResidency(raw.to_string()));
            Residency::default()
        })
    }

    /// Records a problem if `value` is negative or above [`MAX_AMOUNT`].
    pub fn check_amount(
        &mut self,
        field: AmountField,
        value: Decimal,
    ) {
        if value > MAX_AMOUNT {
            self.push(field.path(), FieldProblem::TooLarge(value));
        } else {
            self.check_non_negative(field, value);
        }
    }

    pub fn check_in_range(
        &mut self,
        field: AmountField,
        value: Decimal,
    ) {
        if value.abs() > MAX_AMOUNT {
            self.push(field.path(), FieldProblem::TooLarge(value));
        }
    }

    pub fn check_non_negative(
        &mut self,
        field: AmountField,
        value: Decimal,
    ) {
        if value < Decimal::ZERO {
            self.push(field.path(), FieldProblem::Negative(value));
        }
    }

    pub fn push(
        &mut self,
        field: impl Into<String>,
        problem: FieldProblem,
    ) {
        self.issues.push(FieldIssue {
            field: field.into(),
            problem,
        });
    }

    pub fn is_empty(&self) -> bool {
        self.issues.is_empty()
    }

    /// # Errors
    ///
    /// Returns a [`ValidationError`] if any problem was recorded.
    pub fn finish(self) -> Result<(), ValidationError> {
        if self.issues.is_empty() {
            Ok(())
        } else {
            Err(ValidationError {
                issues: self.issues,
            })
        }
    }
}

/// Parses user-entered amount text.
///
/// Trims whitespace and strips comma thousands separators. Empty text is zero.
fn parse_amount(raw: &str) -> Result<Decimal, FieldProblem> {
    let normalized = raw.trim().replace(',', "");
    if normalized.is_empty() {
        return Ok(Decimal::ZERO);
    }
    let unsigned = normalized.trim_start_matches(['+', '-']).to_ascii_lowercase();
    if matches!(unsigned.as_str(), "nan" | "inf" | "infinity") {
        return Err(FieldProblem::NonFinite(raw.to_string()));
    }
    normalized
        .parse::<Decimal>()
        .or_else(|_| Decimal::from_scientific(&normalized))
        .map_err(|_| FieldProblem::NotANumber(raw.to_string()))
}
