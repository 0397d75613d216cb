//! Versioned tax-year configuration.
//!
//! A [`TaxRegime`] bundles the band schedule with the thresholds, caps and
//! rates the engine applies. Alternate tax years are added as additional
//! regimes rather than by editing the engine.
//!
//! # Example
//!
//! ```
//! use rust_decimal_macros::dec;
//! use tax_core::TaxRegime;
//!
//! let regime = TaxRegime::nigeria_2025();
//! regime.validate().unwrap();
//!
//! assert_eq!(regime.bands.len(), 6);
//! assert_eq!(regime.minimum_wage_exemption, dec!(800000));
//! ```

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

use super::{BandRow, Currency, TaxBand};

/// Errors raised for an invalid regime or an unknown regime id.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum RegimeError {
    #[error("regime has no tax bands")]
    NoBands,

    /// Only the last band may omit its width.
    #[error("band {index} is unbounded but is not the last band")]
    UnboundedBandNotLast { index: usize },

    #[error("the last band must be unbounded")]
    LastBandBounded,

    #[error("band {index} width must be positive, got {width}")]
    InvalidBandWidth { index: usize, width: Decimal },

    #[error("band {index} rate must be between 0 and 1, got {rate}")]
    InvalidBandRate { index: usize, rate: Decimal },

    #[error("{name} must be between 0 and 1, got {value}")]
    InvalidRate { name: &'static str, value: Decimal },

    #[error("{name} must be non-negative, got {value}")]
    NegativeAmount { name: &'static str, value: Decimal },

    #[error("unknown regime '{requested}'; available: {available:?}")]
    UnknownRegime {
        requested: String,
        available: Vec<String>,
    },
}

/// Bands and constants for one tax year.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxRegime {
    /// Short identifier used for lookup, e.g. `ng-2025`.
    pub id: String,
    pub name: String,
    pub tax_year: i32,
    /// Currency every amount in the regime (and in the inputs) is expressed in.
    pub currency: Currency,
    /// May be left out of a regime file when bands come from a separate table.
    #[serde(default)]
    pub bands: Vec<TaxBand>,

    /// Total gross income at or below this is fully exempt.
    pub minimum_wage_exemption: Decimal,
    /// Ceiling on rent relief, whatever the rent paid.
    pub rent_relief_cap: Decimal,
    /// Share of rent paid granted as relief.
    pub rent_relief_rate: Decimal,
    /// Housing benefit is capped at this share of gross salary.
    pub housing_bik_cap_rate: Decimal,
    /// Share of a provided vehicle's acquisition cost taxed as a benefit.
    pub vehicle_bik_rate: Decimal,
}

impl TaxRegime {
    /// The personal income tax schedule introduced by the Nigeria Tax Act 2025.
    pub fn nigeria_2025() -> Self {
        Self {
            id: "ng-2025".to_string(),
            name: "Nigeria Tax Act 2025".to_string(),
            tax_year: 2025,
            currency: Currency::Ngn,
            bands: vec![
                TaxBand::bounded(
                    "First ₦800,000 (Exempt)",
                    Decimal::new(800_000, 0),
                    Decimal::ZERO,
                ),
                TaxBand::bounded(
                    "Next ₦2,200,000 (15%)",
                    Decimal::new(2_200_000, 0),
                    Decimal::new(15, 2),
                ),
                TaxBand::bounded(
                    "Next ₦9,000,000 (18%)",
                    Decimal::new(9_000_000, 0),
                    Decimal::new(18, 2),
                ),
                TaxBand::bounded(
                    "Next ₦13,000,000 (21%)",
                    Decimal::new(13_000_000, 0),
                    Decimal::new(21, 2),
                ),
                TaxBand::bounded(
                    "Next ₦25,000,000 (23%)",
                    Decimal::new(25_000_000, 0),
                    Decimal::new(23, 2),
                ),
                TaxBand::unbounded("Above ₦50,000,000 (25%)", Decimal::new(25, 2)),
            ],
            minimum_wage_exemption: Decimal::new(800_000, 0),
            rent_relief_cap: Decimal::new(500_000, 0),
            rent_relief_rate: Decimal::new(20, 2),
            housing_bik_cap_rate: Decimal::new(20, 2),
            vehicle_bik_rate: Decimal::new(5, 2),
        }
    }

    /// Checks the band schedule and constants.
    ///
    /// # Errors
    ///
    /// Returns [`RegimeError`] if:
    /// - there are no bands
    /// - a band other than the last is unbounded, or the last band is bounded
    /// - a band width is not positive
    /// - a band rate or any of the relief/benefit rates is outside `[0, 1]`
    /// - the exemption threshold or rent relief cap is negative
    pub fn validate(&self) -> Result<(), RegimeError> {
        let Some(last) = self.bands.len().checked_sub(1) else {
            return Err(RegimeError::NoBands);
        };

        for (index, band) in self.bands.iter().enumerate() {
            match band.width {
                None if index != last => {
                    return Err(RegimeError::UnboundedBandNotLast { index });
                }
                Some(_) if index == last => return Err(RegimeError::LastBandBounded),
                Some(width) if width <= Decimal::ZERO => {
                    return Err(RegimeError::InvalidBandWidth { index, width });
                }
                _ => {}
            }
            if !is_unit_fraction(band.rate) {
                return Err(RegimeError::InvalidBandRate {
                    index,
                    rate: band.rate,
                });
            }
        }

        for (name, value) in [
            ("rent relief rate", self.rent_relief_rate),
            ("housing benefit cap rate", self.housing_bik_cap_rate),
            ("vehicle benefit rate", self.vehicle_bik_rate),
        ] {
            if !is_unit_fraction(value) {
                return Err(RegimeError::InvalidRate { name, value });
            }
        }

        for (name, value) in [
            ("minimum wage exemption", self.minimum_wage_exemption),
            ("rent relief cap", self.rent_relief_cap),
        ] {
            if value < Decimal::ZERO {
                return Err(RegimeError::NegativeAmount { name, value });
            }
        }

        Ok(())
    }

    /// The band schedule as cumulative income ranges.
    pub fn band_table(&self) -> Vec<BandRow> {
        let mut lower = Decimal::ZERO;
        self.bands
            .iter()
            .map(|band| {
                let upper = band.width.map(|width| lower + width);
                let row = BandRow {
                    label: band.label.clone(),
                    lower,
                    upper,
                    rate_percent: band.rate * Decimal::ONE_HUNDRED,
                };
                if let Some(upper) = upper {
                    lower = upper;
                }
                row
            })
            .collect()
    }
}

impl Default for TaxRegime {
    fn default() -> Self {
        Self::nigeria_2025()
    }
}

fn is_unit_fraction(value: Decimal) -> bool {
    value >= Decimal::ZERO && value <= Decimal::ONE
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    #[test]
    fn nigeria_2025_is_valid() {
        assert_eq!(TaxRegime::nigeria_2025().validate(), Ok(()));
    }

    #[test]
    fn nigeria_2025_constants() {
        let regime = TaxRegime::nigeria_2025();

        assert_eq!(regime.minimum_wage_exemption, dec!(800000));
        assert_eq!(regime.rent_relief_cap, dec!(500000));
        assert_eq!(regime.rent_relief_rate, dec!(0.20));
        assert_eq!(regime.housing_bik_cap_rate, dec!(0.20));
        assert_eq!(regime.vehicle_bik_rate, dec!(0.05));
        assert_eq!(regime.currency, Currency::Ngn);
    }

    // =========================================================================
    // validate tests
    // =========================================================================

    #[test]
    fn validate_rejects_empty_bands() {
        let mut regime = TaxRegime::nigeria_2025();
        regime.bands.clear();

        assert_eq!(regime.validate(), Err(RegimeError::NoBands));
    }

    #[test]
    fn validate_rejects_unbounded_middle_band() {
        let mut regime = TaxRegime::nigeria_2025();
        regime.bands[2].width = None;

        assert_eq!(
            regime.validate(),
            Err(RegimeError::UnboundedBandNotLast { index: 2 })
        );
    }

    #[test]
    fn validate_rejects_bounded_last_band() {
        let mut regime = TaxRegime::nigeria_2025();
        regime.bands[5].width = Some(dec!(1000000));

        assert_eq!(regime.validate(), Err(RegimeError::LastBandBounded));
    }

    #[test]
    fn validate_rejects_zero_width() {
        let mut regime = TaxRegime::nigeria_2025();
        regime.bands[1].width = Some(dec!(0));

        assert_eq!(
            regime.validate(),
            Err(RegimeError::InvalidBandWidth {
                index: 1,
                width: dec!(0)
            })
        );
    }

    #[test]
    fn validate_rejects_rate_above_one() {
        let mut regime = TaxRegime::nigeria_2025();
        regime.bands[3].rate = dec!(21);

        assert_eq!(
            regime.validate(),
            Err(RegimeError::InvalidBandRate {
                index: 3,
                rate: dec!(21)
            })
        );
    }

    #[test]
    fn validate_rejects_negative_relief_rate() {
        let mut regime = TaxRegime::nigeria_2025();
        regime.rent_relief_rate = dec!(-0.2);

        assert_eq!(
            regime.validate(),
            Err(RegimeError::InvalidRate {
                name: "rent relief rate",
                value: dec!(-0.2)
            })
        );
    }

    #[test]
    fn validate_rejects_negative_exemption() {
        let mut regime = TaxRegime::nigeria_2025();
        regime.minimum_wage_exemption = dec!(-1);

        assert_eq!(
            regime.validate(),
            Err(RegimeError::NegativeAmount {
                name: "minimum wage exemption",
                value: dec!(-1)
            })
        );
    }

    #[test]
    fn single_unbounded_band_is_valid() {
        let mut regime = TaxRegime::nigeria_2025();
        regime.bands = vec![TaxBand::unbounded("Flat 10%", dec!(0.10))];

        assert_eq!(regime.validate(), Ok(()));
    }

    // =========================================================================
    // band_table tests
    // =========================================================================

    #[test]
    fn band_table_accumulates_bounds() {
        let table = TaxRegime::nigeria_2025().band_table();

        assert_eq!(table.len(), 6);
        assert_eq!(table[0].lower, dec!(0));
        assert_eq!(table[0].upper, Some(dec!(800000)));
        assert_eq!(table[1].lower, dec!(800000));
        assert_eq!(table[1].upper, Some(dec!(3000000)));
        assert_eq!(table[2].upper, Some(dec!(12000000)));
        assert_eq!(table[3].upper, Some(dec!(25000000)));
        assert_eq!(table[4].upper, Some(dec!(50000000)));
        assert_eq!(table[5].lower, dec!(50000000));
        assert_eq!(table[5].upper, None);
        assert_eq!(table[5].rate_percent, dec!(25));
    }
}
