mod currency;
mod residency;
mod tax_band;
mod tax_inputs;
mod tax_regime;
mod tax_result;

pub use currency::{Currency, ParseCurrencyError};
pub use residency::{ParseResidencyError, Residency};
pub use tax_band::{BandRow, TaxBand};
pub use tax_inputs::{
    AmountField, ChargeableGains, EmployerBenefits, FlagField, InvestingIncome, Reliefs,
    TaxInputs,
};
pub use tax_regime::{RegimeError, TaxRegime};
pub use tax_result::{TaxBreakdown, TaxResult};
