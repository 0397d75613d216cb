use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::calculations::common::monthly;

/// Tax charged in a single band.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxBreakdown {
    /// Display label of the band, e.g. `Next ₦2,200,000 (15%)`.
    pub bracket: String,
    /// Band rate as a percentage (15 for a 0.15 rate).
    pub rate: Decimal,
    /// Portion of net chargeable income that fell into this band.
    pub taxable_amount: Decimal,
    pub tax_due: Decimal,
}

/// Itemized outcome of one computation.
///
/// Every field is derived from the inputs and the active regime; nothing is
/// carried over between computations.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct TaxResult {
    /// Salary plus dividends, interest and royalties.
    pub total_gross_income: Decimal,

    /// Taxable value of housing and vehicle benefits.
    pub bik_adjustments: Decimal,

    /// Pension, NHF, NHIS, life assurance, mortgage interest and rent relief.
    pub total_exemptions_and_deductions: Decimal,

    /// The relief granted for rent paid, after its cap.
    /// Already included in `total_exemptions_and_deductions`.
    pub rent_relief: Decimal,

    /// Digital gains net of digital losses (floored at zero) plus other gains.
    pub total_chargeable_gains: Decimal,

    /// Income the bands are applied to. Never negative.
    pub net_chargeable_income: Decimal,

    pub total_tax_due: Decimal,

    /// One entry per band touched, in band order.
    pub breakdown: Vec<TaxBreakdown>,

    /// Not clamped: pathological inputs can make this negative.
    pub annual_take_home_pay: Decimal,
    pub monthly_take_home_pay: Decimal,

    /// True when total gross income is at or below the minimum wage exemption.
    pub is_exempt: bool,
}

impl TaxResult {
    /// Result for income at or below the minimum wage exemption.
    pub(crate) fn exempt(total_gross_income: Decimal) -> Self {
        Self {
            total_gross_income,
            bik_adjustments: Decimal::ZERO,
            total_exemptions_and_deductions: Decimal::ZERO,
            rent_relief: Decimal::ZERO,
            total_chargeable_gains: Decimal::ZERO,
            net_chargeable_income: Decimal::ZERO,
            total_tax_due: Decimal::ZERO,
            breakdown: Vec::new(),
            annual_take_home_pay: total_gross_income,
            monthly_take_home_pay: monthly(total_gross_income),
            is_exempt: true,
        }
    }

    /// Total tax as a share of total gross income, as a percentage.
    ///
    /// Returns zero when there is no gross income.
    pub fn effective_rate(&self) -> Decimal {
        if self.total_gross_income.is_zero() {
            return Decimal::ZERO;
        }
        self.total_tax_due / self.total_gross_income * Decimal::ONE_HUNDRED
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    #[test]
    fn exempt_result_passes_gross_through_as_take_home() {
        let result = TaxResult::exempt(dec!(600000));

        assert!(result.is_exempt);
        assert!(result.breakdown.is_empty());
        assert_eq!(result.total_tax_due, dec!(0));
        assert_eq!(result.annual_take_home_pay, dec!(600000));
        assert_eq!(result.monthly_take_home_pay, dec!(50000));
    }

    #[test]
    fn effective_rate_is_zero_without_income() {
        let result = TaxResult::exempt(dec!(0));

        assert_eq!(result.effective_rate(), dec!(0));
    }
}
