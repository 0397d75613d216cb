//! Personal income tax computation.
//!
//! Turns a [`TaxInputs`] into an itemized [`TaxResult`] under a given
//! [`TaxRegime`]. The computation is pure: it borrows the regime and the
//! inputs, performs no I/O and keeps no state between calls, so one
//! calculator can be shared freely across threads.
//!
//! # Steps
//!
//! | Step | Description |
//! |------|-------------|
//! | 1    | Total gross income: salary + dividends + interest + royalties |
//! | 2    | Exempt if total gross income ≤ minimum wage exemption (stop here) |
//! | 3    | Benefits in kind: housing (capped at a share of salary) + vehicle |
//! | 4    | Deductions: pension + NHF + NHIS + life assurance + mortgage interest + rent relief (capped) |
//! | 5    | Chargeable gains: digital gains net of digital losses (min 0) + other gains |
//! | 6    | Net chargeable income: (Step 1 + Step 3 − Step 4) + Step 5, min 0 |
//! | 7    | Tax: walk the bands in order over Step 6 |
//! | 8    | Take-home pay: Step 1 − Step 7 − (pension + NHF + NHIS) |
//!
//! No amounts are rounded along the way; `rust_decimal` keeps every step
//! exact and rounding is left to display.
//!
//! # Example
//!
//! ```
//! use rust_decimal_macros::dec;
//! use tax_core::calculations::PersonalIncomeTax;
//! use tax_core::{AmountField, TaxInputs, TaxRegime};
//!
//! let regime = TaxRegime::nigeria_2025();
//! let calculator = PersonalIncomeTax::new(&regime);
//!
//! let inputs = TaxInputs::default().with_amount(AmountField::AnnualGrossSalary, dec!(6000000));
//! let result = calculator.compute(&inputs);
//!
//! assert_eq!(result.total_tax_due, dec!(870000));
//! assert_eq!(result.annual_take_home_pay, dec!(5130000));
//! assert_eq!(result.monthly_take_home_pay, dec!(427500));
//! ```

use rust_decimal::Decimal;
use tracing::debug;

use crate::calculations::common::{floor_at_zero, monthly};
use crate::validation::{ValidationError, validate_inputs};
use crate::{
    ChargeableGains, EmployerBenefits, Reliefs, TaxBreakdown, TaxInputs, TaxRegime, TaxResult,
};

/// Calculator for personal income tax under one regime.
#[derive(Debug, Clone, Copy)]
pub struct PersonalIncomeTax<'a> {
    regime: &'a TaxRegime,
}

impl<'a> PersonalIncomeTax<'a> {
    /// Creates a calculator for the given regime.
    ///
    /// The regime is assumed to be valid; see [`TaxRegime::validate`].
    pub fn new(regime: &'a TaxRegime) -> Self {
        Self { regime }
    }

    pub fn regime(&self) -> &'a TaxRegime {
        self.regime
    }

    /// Computes the full result for `inputs`.
    ///
    /// Inputs are not validated: negative amounts flow straight into the
    /// arithmetic and can produce meaningless figures. Use
    /// [`compute_checked`](Self::compute_checked) to reject them first.
    ///
    /// Every amount must lie within [`MAX_AMOUNT`](crate::MAX_AMOUNT) in
    /// magnitude; the input loaders enforce this even on the unchecked path.
    pub fn compute(
        &self,
        inputs: &TaxInputs,
    ) -> TaxResult {
        let total_gross_income = self.total_gross_income(inputs);

        if self.is_exempt(total_gross_income) {
            debug!(
                regime = %self.regime.id,
                %total_gross_income,
                "income at or below minimum wage exemption"
            );
            return TaxResult::exempt(total_gross_income);
        }

        let bik_adjustments =
            self.benefits_in_kind(inputs.annual_gross_salary, &inputs.employer_benefits);
        let income_with_bik = total_gross_income + bik_adjustments;

        let rent_relief = self.rent_relief(inputs.reliefs.annual_rent_paid);
        let total_deductions = self.total_deductions(&inputs.reliefs, rent_relief);

        let total_chargeable_gains = self.total_chargeable_gains(&inputs.chargeable_gains);

        let net_chargeable_income =
            self.net_chargeable_income(income_with_bik, total_deductions, total_chargeable_gains);

        let (breakdown, total_tax_due) = self.apply_bands(net_chargeable_income);

        let annual_take_home_pay =
            self.annual_take_home_pay(total_gross_income, total_tax_due, &inputs.reliefs);

        debug!(
            regime = %self.regime.id,
            residency = %inputs.residency,
            %net_chargeable_income,
            %total_tax_due,
            bands = breakdown.len(),
            "computed personal income tax"
        );

        TaxResult {
            total_gross_income,
            bik_adjustments,
            total_exemptions_and_deductions: total_deductions,
            rent_relief,
            total_chargeable_gains,
            net_chargeable_income,
            total_tax_due,
            breakdown,
            annual_take_home_pay,
            monthly_take_home_pay: monthly(annual_take_home_pay),
            is_exempt: false,
        }
    }

    /// Validates `inputs` and then computes the result.
    ///
    /// # Errors
    ///
    /// Returns [`ValidationError`] listing every negative or oversized amount.
    pub fn compute_checked(
        &self,
        inputs: &TaxInputs,
    ) -> Result<TaxResult, ValidationError> {
        validate_inputs(inputs)?;
        Ok(self.compute(inputs))
    }

    /// Salary plus investment income. Gains and benefits are layered on later.
    fn total_gross_income(
        &self,
        inputs: &TaxInputs,
    ) -> Decimal {
        let investing = &inputs.investing_income;
        inputs.annual_gross_salary + investing.dividends + investing.interest + investing.royalties
    }

    /// Hard cliff: one unit above the threshold and nothing is exempt.
    fn is_exempt(
        &self,
        total_gross_income: Decimal,
    ) -> bool {
        total_gross_income <= self.regime.minimum_wage_exemption
    }

    /// Housing is capped at a share of salary alone; the vehicle benefit is uncapped.
    fn benefits_in_kind(
        &self,
        annual_gross_salary: Decimal,
        benefits: &EmployerBenefits,
    ) -> Decimal {
        let mut total = Decimal::ZERO;
        if benefits.housing_provided {
            let cap = self.regime.housing_bik_cap_rate * annual_gross_salary;
            total += benefits.housing_rental_value.min(cap);
        }
        if benefits.car_provided {
            total += benefits.car_acquisition_cost * self.regime.vehicle_bik_rate;
        }
        total
    }

    fn rent_relief(
        &self,
        annual_rent_paid: Decimal,
    ) -> Decimal {
        (annual_rent_paid * self.regime.rent_relief_rate).min(self.regime.rent_relief_cap)
    }

    fn total_deductions(
        &self,
        reliefs: &Reliefs,
        rent_relief: Decimal,
    ) -> Decimal {
        reliefs.annual_pension
            + reliefs.annual_nhf
            + reliefs.annual_nhis
            + reliefs.life_assurance_premiums
            + reliefs.mortgage_interest
            + rent_relief
    }

    /// Digital losses only offset digital gains; any excess is discarded.
    fn digital_gains(
        &self,
        gains: &ChargeableGains,
    ) -> Decimal {
        let net = gains.digital_asset_gains - gains.digital_asset_losses;
        if net < Decimal::ZERO {
            debug!(discarded = %-net, "net digital asset loss discarded");
        }
        floor_at_zero(net)
    }

    fn total_chargeable_gains(
        &self,
        gains: &ChargeableGains,
    ) -> Decimal {
        self.digital_gains(gains) + gains.other_asset_gains
    }

    /// Deductions come off before gains are added back; gains get no relief.
    fn net_chargeable_income(
        &self,
        income_with_bik: Decimal,
        total_deductions: Decimal,
        total_chargeable_gains: Decimal,
    ) -> Decimal {
        floor_at_zero((income_with_bik - total_deductions) + total_chargeable_gains)
    }

    /// Walks the bands in order, stopping as soon as no income remains.
    fn apply_bands(
        &self,
        net_chargeable_income: Decimal,
    ) -> (Vec<TaxBreakdown>, Decimal) {
        let mut remaining = net_chargeable_income;
        let mut total_tax_due = Decimal::ZERO;
        let mut breakdown = Vec::new();

        for band in &self.regime.bands {
            if remaining <= Decimal::ZERO {
                break;
            }

            let taxable_amount = band.taxable_portion(remaining);
            let tax_due = taxable_amount * band.rate;

            breakdown.push(TaxBreakdown {
                bracket: band.label.clone(),
                rate: band.rate * Decimal::ONE_HUNDRED,
                taxable_amount,
                tax_due,
            });

            total_tax_due += tax_due;
            remaining -= taxable_amount;
        }

        (breakdown, total_tax_due)
    }

    /// Cash view: benefits in kind and non-statutory reliefs do not change
    /// what is paid out, so only pension, NHF and NHIS are subtracted.
    fn annual_take_home_pay(
        &self,
        total_gross_income: Decimal,
        total_tax_due: Decimal,
        reliefs: &Reliefs,
    ) -> Decimal {
        total_gross_income - total_tax_due - reliefs.statutory_contributions()
    }
}
