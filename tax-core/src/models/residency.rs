use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Tax residency of the individual.
///
/// Recorded on the inputs but never branched on by the engine: callers are
/// expected to have already restricted non-resident income to local-source
/// amounts before filling in [`TaxInputs`](crate::TaxInputs).
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "kebab-case")]
pub enum Residency {
    #[default]
    Resident,
    #[serde(alias = "non_resident", alias = "nonresident")]
    NonResident,
}

impl Residency {
    pub fn as_str(&self) -> &'static str {
        match self {
            Self::Resident => "resident",
            Self::NonResident => "non-resident",
        }
    }
}

impl fmt::Display for Residency {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Returned when a residency string is not one of the recognised values.
#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unrecognised residency '{0}' (expected 'resident' or 'non-resident')")]
pub struct ParseResidencyError(pub String);

impl FromStr for Residency {
    type Err = ParseResidencyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "resident" => Ok(Self::Resident),
            "non-resident" | "non_resident" | "nonresident" => Ok(Self::NonResident),
            _ => Err(ParseResidencyError(s.to_string())),
        }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;

    use super::*;

    #[test]
    fn parse_accepts_both_spellings() {
        assert_eq!("resident".parse(), Ok(Residency::Resident));
        assert_eq!(" Non-Resident ".parse(), Ok(Residency::NonResident));
        assert_eq!("non_resident".parse(), Ok(Residency::NonResident));
    }

    #[test]
    fn parse_rejects_unknown_value() {
        let result = "citizen".parse::<Residency>();

        assert_eq!(result, Err(ParseResidencyError("citizen".to_string())));
    }

    #[test]
    fn serde_uses_kebab_case() {
        let json = serde_json::to_string(&Residency::NonResident).unwrap();

        assert_eq!(json, "\"non-resident\"");
    }
}
