//! Plain-text summary of a result, for sharing.
//!
//! The text here is unencoded; building WhatsApp or mail links from it is the
//! job of `tax_data::share`.

use crate::format::format_currency;
use crate::{TaxRegime, TaxResult};

/// Builds the share message for `result`.
///
/// `link` is appended as a call to action when given.
///
/// ```
/// use rust_decimal_macros::dec;
/// use tax_core::calculations::PersonalIncomeTax;
/// use tax_core::share::share_message;
/// use tax_core::{AmountField, TaxInputs, TaxRegime};
///
/// let regime = TaxRegime::nigeria_2025();
/// let inputs = TaxInputs::default().with_amount(AmountField::AnnualGrossSalary, dec!(6000000));
/// let result = PersonalIncomeTax::new(&regime).compute(&inputs);
///
/// let message = share_message(&result, &regime, None);
/// assert!(message.contains("Total Tax Due: ₦870,000"));
/// ```
pub fn share_message(
    result: &TaxResult,
    regime: &TaxRegime,
    link: Option<&str>,
) -> String {
    let currency = regime.currency;
    let mut message = format!(
        "{} Personal Tax Estimation:\n\n\
         💰 Gross Annual Income: {}\n\
         💸 Total Tax Due: {}\n\
         🏦 Monthly Take-Home: {}",
        regime.name,
        format_currency(result.total_gross_income, currency),
        format_currency(result.total_tax_due, currency),
        format_currency(result.monthly_take_home_pay, currency),
    );

    if let Some(link) = link.map(str::trim).filter(|l| !l.is_empty()) {
        message.push_str(&format!(
            "\n\nCalculate your {} tax at: {link}",
            regime.tax_year
        ));
    }

    message
}

/// Subject line for emailed summaries.
pub fn email_subject(regime: &TaxRegime) -> String {
    format!("My {} Tax Estimation ({})", regime.tax_year, regime.name)
}
