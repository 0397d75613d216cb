//! Input model for a single personal income tax estimate.
//!
//! [`TaxInputs`] is a plain value type. It is never mutated in place by the
//! engine; editing a field goes through [`TaxInputs::with_amount`],
//! [`TaxInputs::with_flag`] or [`TaxInputs::with_residency`], each of which
//! returns a new value that is then recomputed in full.
//!
//! Field paths use the same dotted layout as the serialized form, e.g.
//! `reliefs.annual_rent_paid`. The camelCase spelling used by web form
//! payloads (`reliefs.annualRentPaid`) is accepted everywhere a path is parsed.

use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use super::Residency;

/// Investment income received during the year.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct InvestingIncome {
    pub dividends: Decimal,
    pub interest: Decimal,
    pub royalties: Decimal,
}

/// Gross gains and losses on asset disposals, before any offsetting.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct ChargeableGains {
    #[serde(alias = "digitalAssetGains")]
    pub digital_asset_gains: Decimal,
    #[serde(alias = "digitalAssetLosses")]
    pub digital_asset_losses: Decimal,
    #[serde(alias = "otherAssetGains")]
    pub other_asset_gains: Decimal,
}

/// Benefits in kind provided by an employer.
///
/// `housing_rental_value` and `car_acquisition_cost` are ignored unless the
/// matching flag is set.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct EmployerBenefits {
    #[serde(alias = "housingProvided")]
    pub housing_provided: bool,
    #[serde(alias = "housingRentalValue")]
    pub housing_rental_value: Decimal,
    #[serde(alias = "carProvided")]
    pub car_provided: bool,
    #[serde(alias = "carAcquisitionCost")]
    pub car_acquisition_cost: Decimal,
}

/// Statutory contributions and reliefs claimed for the year.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct Reliefs {
    #[serde(alias = "annualPension")]
    pub annual_pension: Decimal,
    #[serde(alias = "annualNHF")]
    pub annual_nhf: Decimal,
    #[serde(alias = "annualNHIS")]
    pub annual_nhis: Decimal,
    #[serde(alias = "annualRentPaid")]
    pub annual_rent_paid: Decimal,
    #[serde(alias = "lifeAssurancePremiums")]
    pub life_assurance_premiums: Decimal,
    #[serde(alias = "mortgageInterest")]
    pub mortgage_interest: Decimal,
}

impl Reliefs {
    /// Pension, NHF and NHIS: the contributions that leave the pay packet.
    pub fn statutory_contributions(&self) -> Decimal {
        self.annual_pension + self.annual_nhf + self.annual_nhis
    }
}

/// Everything the engine needs to estimate one year's liability.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default)]
pub struct TaxInputs {
    pub residency: Residency,
    #[serde(alias = "annualGrossSalary")]
    pub annual_gross_salary: Decimal,
    #[serde(alias = "investingIncome")]
    pub investing_income: InvestingIncome,
    #[serde(alias = "chargeableGains")]
    pub chargeable_gains: ChargeableGains,
    #[serde(alias = "employerBenefits")]
    pub employer_benefits: EmployerBenefits,
    pub reliefs: Reliefs,
}

/// Every monetary field of [`TaxInputs`], addressable by path.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum AmountField {
    AnnualGrossSalary,
    Dividends,
    Interest,
    Royalties,
    DigitalAssetGains,
    DigitalAssetLosses,
    OtherAssetGains,
    HousingRentalValue,
    CarAcquisitionCost,
    AnnualPension,
    AnnualNhf,
    AnnualNhis,
    AnnualRentPaid,
    LifeAssurancePremiums,
    MortgageInterest,
}

impl AmountField {
    pub const ALL: [AmountField; 15] = [
        Self::AnnualGrossSalary,
        Self::Dividends,
        Self::Interest,
        Self::Royalties,
        Self::DigitalAssetGains,
        Self::DigitalAssetLosses,
        Self::OtherAssetGains,
        Self::HousingRentalValue,
        Self::CarAcquisitionCost,
        Self::AnnualPension,
        Self::AnnualNhf,
        Self::AnnualNhis,
        Self::AnnualRentPaid,
        Self::LifeAssurancePremiums,
        Self::MortgageInterest,
    ];

    /// Dotted snake_case path, e.g. `reliefs.annual_rent_paid`.
    pub fn path(&self) -> &'static str {
        match self {
            Self::AnnualGrossSalary => "annual_gross_salary",
            Self::Dividends => "investing_income.dividends",
            Self::Interest => "investing_income.interest",
            Self::Royalties => "investing_income.royalties",
            Self::DigitalAssetGains => "chargeable_gains.digital_asset_gains",
            Self::DigitalAssetLosses => "chargeable_gains.digital_asset_losses",
            Self::OtherAssetGains => "chargeable_gains.other_asset_gains",
            Self::HousingRentalValue => "employer_benefits.housing_rental_value",
            Self::CarAcquisitionCost => "employer_benefits.car_acquisition_cost",
            Self::AnnualPension => "reliefs.annual_pension",
            Self::AnnualNhf => "reliefs.annual_nhf",
            Self::AnnualNhis => "reliefs.annual_nhis",
            Self::AnnualRentPaid => "reliefs.annual_rent_paid",
            Self::LifeAssurancePremiums => "reliefs.life_assurance_premiums",
            Self::MortgageInterest => "reliefs.mortgage_interest",
        }
    }

    /// Last path segment, used as the column name in flat CSV files.
    pub fn column(&self) -> &'static str {
        let path = self.path();
        path.rsplit('.').next().unwrap_or(path)
    }

    /// Parses either the snake_case path or its camelCase equivalent.
    pub fn parse(path: &str) -> Option<Self> {
        let wanted = normalize_path(path);
        Self::ALL
            .into_iter()
            .find(|field| normalize_path(field.path()) == wanted)
    }
}

/// The boolean switches of [`TaxInputs`].
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum FlagField {
    HousingProvided,
    CarProvided,
}

impl FlagField {
    pub const ALL: [FlagField; 2] = [Self::HousingProvided, Self::CarProvided];

    pub fn path(&self) -> &'static str {
        match self {
            Self::HousingProvided => "employer_benefits.housing_provided",
            Self::CarProvided => "employer_benefits.car_provided",
        }
    }

    pub fn column(&self) -> &'static str {
        let path = self.path();
        path.rsplit('.').next().unwrap_or(path)
    }

    pub fn parse(path: &str) -> Option<Self> {
        let wanted = normalize_path(path);
        Self::ALL
            .into_iter()
            .find(|field| normalize_path(field.path()) == wanted)
    }
}

/// Lowercases and drops underscores so `annualNHF` and `annual_nhf` compare equal.
fn normalize_path(path: &str) -> String {
    path.trim()
        .chars()
        .filter(|c| *c != '_')
        .flat_map(char::to_lowercase)
        .collect()
}

impl TaxInputs {
    /// Reads one monetary field.
    pub fn amount(
        &self,
        field: AmountField,
    ) -> Decimal {
        match field {
            AmountField::AnnualGrossSalary => self.annual_gross_salary,
            AmountField::Dividends => self.investing_income.dividends,
            AmountField::Interest => self.investing_income.interest,
            AmountField::Royalties => self.investing_income.royalties,
            AmountField::DigitalAssetGains => self.chargeable_gains.digital_asset_gains,
            AmountField::DigitalAssetLosses => self.chargeable_gains.digital_asset_losses,
            AmountField::OtherAssetGains => self.chargeable_gains.other_asset_gains,
            AmountField::HousingRentalValue => self.employer_benefits.housing_rental_value,
            AmountField::CarAcquisitionCost => self.employer_benefits.car_acquisition_cost,
            AmountField::AnnualPension => self.reliefs.annual_pension,
            AmountField::AnnualNhf => self.reliefs.annual_nhf,
            AmountField::AnnualNhis => self.reliefs.annual_nhis,
            AmountField::AnnualRentPaid => self.reliefs.annual_rent_paid,
            AmountField::LifeAssurancePremiums => self.reliefs.life_assurance_premiums,
            AmountField::MortgageInterest => self.reliefs.mortgage_interest,
        }
    }

    /// Reads one boolean field.
    pub fn flag(
        &self,
        field: FlagField,
    ) -> bool {
        match field {
            FlagField::HousingProvided => self.employer_benefits.housing_provided,
            FlagField::CarProvided => self.employer_benefits.car_provided,
        }
    }

    /// Returns a copy of these inputs with one monetary field replaced.
    #[must_use]
    pub fn with_amount(
        self,
        field: AmountField,
        value: Decimal,
    ) -> Self {
        let mut next = self;
        let slot = match field {
            AmountField::AnnualGrossSalary => &mut next.annual_gross_salary,
            AmountField::Dividends => &mut next.investing_income.dividends,
            AmountField::Interest => &mut next.investing_income.interest,
            AmountField::Royalties => &mut next.investing_income.royalties,
            AmountField::DigitalAssetGains => &mut next.chargeable_gains.digital_asset_gains,
            AmountField::DigitalAssetLosses => &mut next.chargeable_gains.digital_asset_losses,
            AmountField::OtherAssetGains => &mut next.chargeable_gains.other_asset_gains,
            AmountField::HousingRentalValue => &mut next.employer_benefits.housing_rental_value,
            AmountField::CarAcquisitionCost => &mut next.employer_benefits.car_acquisition_cost,
            AmountField::AnnualPension => &mut next.reliefs.annual_pension,
            AmountField::AnnualNhf => &mut next.reliefs.annual_nhf,
            AmountField::AnnualNhis => &mut next.reliefs.annual_nhis,
            AmountField::AnnualRentPaid => &mut next.reliefs.annual_rent_paid,
            AmountField::LifeAssurancePremiums => &mut next.reliefs.life_assurance_premiums,
            AmountField::MortgageInterest => &mut next.reliefs.mortgage_interest,
        };
        *slot = value;
        next
    }

    /// Returns a copy of these inputs with one boolean field replaced.
    #[must_use]
    pub fn with_flag(
        self,
        field: FlagField,
        value: bool,
    ) -> Self {
        let mut next = self;
        match field {
            FlagField::HousingProvided => next.employer_benefits.housing_provided = value,
            FlagField::CarProvided => next.employer_benefits.car_provided = value,
        }
        next
    }

    #[must_use]
    pub fn with_residency(
        self,
        residency: Residency,
    ) -> Self {
        Self { residency, ..self }
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    #[test]
    fn default_inputs_are_all_zero() {
        let inputs = TaxInputs::default();

        for field in AmountField::ALL {
            assert_eq!(inputs.amount(field), Decimal::ZERO, "{}", field.path());
        }
        assert_eq!(inputs.residency, Residency::Resident);
        assert!(!inputs.employer_benefits.housing_provided);
        assert!(!inputs.employer_benefits.car_provided);
    }

    #[test]
    fn with_amount_leaves_original_untouched() {
        let original = TaxInputs::default();

        let updated = original.with_amount(AmountField::AnnualRentPaid, dec!(1200000));

        assert_eq!(original.reliefs.annual_rent_paid, dec!(0));
        assert_eq!(updated.reliefs.annual_rent_paid, dec!(1200000));
    }

    #[test]
    fn with_amount_round_trips_through_amount_for_every_field() {
        let mut inputs = TaxInputs::default();
        for (i, field) in AmountField::ALL.into_iter().enumerate() {
            inputs = inputs.with_amount(field, Decimal::from(i + 1));
        }

        for (i, field) in AmountField::ALL.into_iter().enumerate() {
            assert_eq!(inputs.amount(field), Decimal::from(i + 1), "{}", field.path());
        }
    }

    #[test]
    fn with_flag_sets_only_the_named_flag() {
        let inputs = TaxInputs::default().with_flag(FlagField::CarProvided, true);

        assert!(inputs.flag(FlagField::CarProvided));
        assert!(!inputs.flag(FlagField::HousingProvided));
    }

    #[test]
    fn with_residency_keeps_amounts() {
        let inputs = TaxInputs::default()
            .with_amount(AmountField::AnnualGrossSalary, dec!(5000000))
            .with_residency(Residency::NonResident);

        assert_eq!(inputs.residency, Residency::NonResident);
        assert_eq!(inputs.annual_gross_salary, dec!(5000000));
    }

    #[test]
    fn amount_field_parses_snake_and_camel_paths() {
        assert_eq!(
            AmountField::parse("reliefs.annual_rent_paid"),
            Some(AmountField::AnnualRentPaid)
        );
        assert_eq!(
            AmountField::parse("reliefs.annualRentPaid"),
            Some(AmountField::AnnualRentPaid)
        );
        assert_eq!(
            AmountField::parse("reliefs.annualNHF"),
            Some(AmountField::AnnualNhf)
        );
        assert_eq!(AmountField::parse("reliefs.unknown"), None);
    }

    #[test]
    fn flag_field_parses_camel_path() {
        assert_eq!(
            FlagField::parse("employerBenefits.housingProvided"),
            Some(FlagField::HousingProvided)
        );
    }

    #[test]
    fn column_is_last_path_segment() {
        assert_eq!(AmountField::Dividends.column(), "dividends");
        assert_eq!(AmountField::AnnualGrossSalary.column(), "annual_gross_salary");
        assert_eq!(FlagField::CarProvided.column(), "car_provided");
    }

    #[test]
    fn statutory_contributions_sum_pension_nhf_nhis() {
        let reliefs = Reliefs {
            annual_pension: dec!(400000),
            annual_nhf: dec!(125000),
            annual_nhis: dec!(50000),
            annual_rent_paid: dec!(999999),
            life_assurance_premiums: dec!(999999),
            mortgage_interest: dec!(999999),
        };

        assert_eq!(reliefs.statutory_contributions(), dec!(575000));
    }

    #[test]
    fn deserializes_camel_case_payload() {
        let json = r#"{
            "residency": "non-resident",
            "annualGrossSalary": 6000000,
            "investingIncome": { "dividends": 100000 },
            "employerBenefits": { "housingProvided": true, "housingRentalValue": 900000 },
            "reliefs": { "annualNHF": 150000 }
        }"#;

        let inputs: TaxInputs = serde_json::from_str(json).unwrap();

        assert_eq!(inputs.residency, Residency::NonResident);
        assert_eq!(inputs.annual_gross_salary, dec!(6000000));
        assert_eq!(inputs.investing_income.dividends, dec!(100000));
        assert!(inputs.employer_benefits.housing_provided);
        assert_eq!(inputs.employer_benefits.housing_rental_value, dec!(900000));
        assert_eq!(inputs.reliefs.annual_nhf, dec!(150000));
        assert_eq!(inputs.chargeable_gains, ChargeableGains::default());
    }
}
