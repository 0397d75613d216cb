use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

/// One band of a progressive schedule.
///
/// Bands are applied in order to net chargeable income; each consumes up to
/// `width` of whatever income is left. Only the last band may be unbounded.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxBand {
    pub label: String,
    /// Amount of income taxed in this band, `None` for the top band.
    #[serde(default)]
    pub width: Option<Decimal>,
    /// Marginal rate as a fraction (0.15 for 15%).
    pub rate: Decimal,
}

impl TaxBand {
    pub fn bounded(
        label: impl Into<String>,
        width: Decimal,
        rate: Decimal,
    ) -> Self {
        Self {
            label: label.into(),
            width: Some(width),
            rate,
        }
    }

    pub fn unbounded(
        label: impl Into<String>,
        rate: Decimal,
    ) -> Self {
        Self {
            label: label.into(),
            width: None,
            rate,
        }
    }

    /// Portion of `remaining` income that falls into this band.
    pub fn taxable_portion(
        &self,
        remaining: Decimal,
    ) -> Decimal {
        match self.width {
            Some(width) => remaining.min(width),
            None => remaining,
        }
    }
}

/// A band expressed as an income range, for reference tables.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct BandRow {
    pub label: String,
    pub lower: Decimal,
    /// `None` for the top band.
    pub upper: Option<Decimal>,
    /// Rate as a percentage.
    pub rate_percent: Decimal,
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    #[test]
    fn bounded_band_caps_at_width() {
        let band = TaxBand::bounded("Next 2,200,000", dec!(2200000), dec!(0.15));

        assert_eq!(band.taxable_portion(dec!(5000000)), dec!(2200000));
        assert_eq!(band.taxable_portion(dec!(100)), dec!(100));
    }

    #[test]
    fn unbounded_band_takes_everything() {
        let band = TaxBand::unbounded("Above 50,000,000", dec!(0.25));

        assert_eq!(band.taxable_portion(dec!(123456789)), dec!(123456789));
    }
}
