use std::collections::BTreeMap;

use chrono::{DateTime, Utc};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use crate::{Currency, ParseCurrencyError, TaxBreakdown, TaxResult};

#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum FxError {
    #[error("unsupported currency '{0}'")]
    UnknownCurrency(String),

    #[error("no rate for {currency} against {base}")]
    MissingRate { currency: Currency, base: Currency },

    #[error("rate for {currency} must be positive, got {rate}")]
    InvalidRate { currency: Currency, rate: Decimal },

    #[error("converting {amount} {from} to {to} is out of range")]
    Overflow {
        amount: Decimal,
        from: Currency,
        to: Currency,
    },
}

impl From<ParseCurrencyError> for FxError {
    fn from(err: ParseCurrencyError) -> Self {
        Self::UnknownCurrency(err.0)
    }
}

/// One snapshot of exchange rates, each expressed as units per one `base`.
///
/// The base currency's own rate is always 1 and need not be stored.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExchangeRates {
    pub base: Currency,
    pub rates: BTreeMap<Currency, Decimal>,
    /// When the source last refreshed these rates, if it said.
    pub fetched_at: Option<DateTime<Utc>>,
}

impl ExchangeRates {
    pub fn new(base: Currency) -> Self {
        Self {
            base,
            rates: BTreeMap::new(),
            fetched_at: None,
        }
    }

    /// Adds or replaces the rate for `currency`.
    ///
    /// # Errors
    /// [`FxError::InvalidRate`] if `rate` is zero or negative.
    pub fn insert(
        &mut self,
        currency: Currency,
        rate: Decimal,
    ) -> Result<(), FxError> {
        if rate <= Decimal::ZERO {
            return Err(FxError::InvalidRate { currency, rate });
        }
        self.rates.insert(currency, rate);
        Ok(())
    }

    /// Builder form of [`insert`](Self::insert).
    ///
    /// # Errors
    /// [`FxError::InvalidRate`] if `rate` is zero or negative.
    pub fn with_rate(
        mut self,
        currency: Currency,
        rate: Decimal,
    ) -> Result<Self, FxError> {
        self.insert(currency, rate)?;
        Ok(self)
    }

    /// Units of `currency` per one unit of the base.
    ///
    /// # Errors
    /// [`FxError::MissingRate`] if no rate is known, [`FxError::InvalidRate`]
    /// if a stored rate is not positive.
    pub fn rate(
        &self,
        currency: Currency,
    ) -> Result<Decimal, FxError> {
        if currency == self.base {
            return Ok(Decimal::ONE);
        }
        let rate = self
            .rates
            .get(&currency)
            .copied()
            .ok_or(FxError::MissingRate {
                currency,
                base: self.base,
            })?;
        if rate <= Decimal::ZERO {
            return Err(FxError::InvalidRate { currency, rate });
        }
        Ok(rate)
    }

    /// Converts through the base: `amount / rate(from) * rate(to)`.
    ///
    /// # Errors
    /// Any [`FxError`] from looking up either rate, or [`FxError::Overflow`]
    /// if the result does not fit in a `Decimal`.
    ///
    /// ```
    /// use rust_decimal_macros::dec;
    /// use tax_core::Currency;
    /// use tax_core::fx::ExchangeRates;
    ///
    /// let rates = ExchangeRates::new(Currency::Usd)
    ///     .with_rate(Currency::Ngn, dec!(1500))
    ///     .unwrap();
    ///
    /// assert_eq!(rates.convert(dec!(100), Currency::Usd, Currency::Ngn).unwrap(), dec!(150000));
    /// ```
    pub fn convert(
        &self,
        amount: Decimal,
        from: Currency,
        to: Currency,
    ) -> Result<Decimal, FxError> {
        let from_rate = self.rate(from)?;
        let to_rate = self.rate(to)?;
        if from == to {
            return Ok(amount);
        }
        amount
            .checked_div(from_rate)
            .and_then(|base| base.checked_mul(to_rate))
            .ok_or(FxError::Overflow { amount, from, to })
    }

    /// Units of `home` per one unit of `unit`, e.g. naira per dollar.
    ///
    /// # Errors
    /// Any [`FxError`] from looking up either rate.
    pub fn quote(
        &self,
        unit: Currency,
        home: Currency,
    ) -> Result<Decimal, FxError> {
        self.rate(home)?
            .checked_div(self.rate(unit)?)
            .ok_or(FxError::Overflow {
                amount: Decimal::ONE,
                from: unit,
                to: home,
            })
    }

    /// Quotes every other supported currency against `home`, skipping any
    /// without a rate.
    pub fn quotes_against(
        &self,
        home: Currency,
    ) -> Vec<(Currency, Decimal)> {
        Currency::SUPPORTED
            .into_iter()
            .filter(|c| *c != home)
            .filter_map(|c| self.quote(c, home).ok().map(|q| (c, q)))
            .collect()
    }

    /// The same snapshot re-expressed against a different base.
    ///
    /// # Errors
    /// Any [`FxError`] from looking up the new base's rate, or
    /// [`FxError::Overflow`] if a rebased rate does not fit.
    pub fn rebase(
        &self,
        base: Currency,
    ) -> Result<Self, FxError> {
        let pivot = self.rate(base)?;
        let mut rebased = Self {
            base,
            rates: BTreeMap::new(),
            fetched_at: self.fetched_at,
        };
        let divide = |currency: Currency, rate: Decimal| {
            rate.checked_div(pivot).ok_or(FxError::Overflow {
                amount: rate,
                from: currency,
                to: base,
            })
        };
        if self.base != base {
            rebased.rates.insert(self.base, divide(self.base, Decimal::ONE)?);
        }
        for (currency, rate) in &self.rates {
            if *currency != base {
                rebased.rates.insert(*currency, divide(*currency, *rate)?);
            }
        }
        Ok(rebased)
    }

    /// Re-expresses the money fields of `result` in another currency.
    ///
    /// The breakdown and flags are carried across; rates inside the
    /// breakdown are percentages and are left alone.
    ///
    /// # Errors
    /// Any [`FxError`] from looking up either rate.
    pub fn convert_result(
        &self,
        result: &TaxResult,
        from: Currency,
        to: Currency,
    ) -> Result<TaxResult, FxError> {
        let convert = |amount: Decimal| self.convert(amount, from, to);

        let breakdown = result
            .breakdown
            .iter()
            .map(|line| {
                Ok(TaxBreakdown {
                    bracket: line.bracket.clone(),
                    rate: line.rate,
                    taxable_amount: convert(line.taxable_amount)?,
                    tax_due: convert(line.tax_due)?,
                })
            })
            .collect::<Result<Vec<_>, FxError>>()?;

        Ok(TaxResult {
            total_gross_income: convert(result.total_gross_income)?,
            bik_adjustments: convert(result.bik_adjustments)?,
            total_exemptions_and_deductions: convert(result.total_exemptions_and_deductions)?,
            rent_relief: convert(result.rent_relief)?,
            total_chargeable_gains: convert(result.total_chargeable_gains)?,
            net_chargeable_income: convert(result.net_chargeable_income)?,
            total_tax_due: convert(result.total_tax_due)?,
            breakdown,
            annual_take_home_pay: convert(result.annual_take_home_pay)?,
            monthly_take_home_pay: convert(result.monthly_take_home_pay)?,
            is_exempt: result.is_exempt,
        })
    }
}
