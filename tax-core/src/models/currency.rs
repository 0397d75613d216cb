use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

/// Currencies the estimator can display and convert between.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
#[serde(rename_all = "UPPERCASE")]
pub enum Currency {
    Usd,
    Gbp,
    Eur,
    Cad,
    Ngn,
}

impl Currency {
    pub const SUPPORTED: [Currency; 5] = [
        Self::Usd,
        Self::Gbp,
        Self::Eur,
        Self::Cad,
        Self::Ngn,
    ];

    /// ISO 4217 code.
    pub fn code(&self) -> &'static str {
        match self {
            Self::Usd => "USD",
            Self::Gbp => "GBP",
            Self::Eur => "EUR",
            Self::Cad => "CAD",
            Self::Ngn => "NGN",
        }
    }

    pub fn name(&self) -> &'static str {
        match self {
            Self::Usd => "US Dollar",
            Self::Gbp => "British Pound",
            Self::Eur => "Euro",
            Self::Cad => "Canadian Dollar",
            Self::Ngn => "Nigerian Naira",
        }
    }

    pub fn symbol(&self) -> &'static str {
        match self {
            Self::Usd => "$",
            Self::Gbp => "£",
            Self::Eur => "€",
            Self::Cad => "CA$",
            Self::Ngn => "₦",
        }
    }
}

impl fmt::Display for Currency {
    fn fmt(
        &self,
        f: &mut fmt::Formatter<'_>,
    ) -> fmt::Result {
        f.write_str(self.code())
    }
}

#[derive(Debug, Clone, PartialEq, Eq, thiserror::Error)]
#[error("unsupported currency '{0}'")]
pub struct ParseCurrencyError(pub String);

impl FromStr for Currency {
    type Err = ParseCurrencyError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let code = s.trim().to_ascii_uppercase();
        Self::SUPPORTED
            .into_iter()
            .find(|c| c.code() == code)
            .ok_or_else(|| ParseCurrencyError(s.to_string()))
    }
}
