//! Display formatting for money.
//!
//! The engine never rounds; these helpers are where amounts meet a reader.
//! Rounding is half away from zero.

use rust_decimal::Decimal;

use crate::calculations::common::round_half_up;
use crate::Currency;

/// Formats `amount` as whole units of `currency`, e.g. `₦5,130,000`.
///
/// Negative amounts carry a leading minus: `-₦2,000,000`.
///
/// ```
/// use rust_decimal_macros::dec;
/// use tax_core::Currency;
/// use tax_core::format::format_currency;
///
/// assert_eq!(format_currency(dec!(427500), Currency::Ngn), "₦427,500");
/// assert_eq!(format_currency(dec!(1234.5), Currency::Usd), "$1,235");
/// ```
pub fn format_currency(
    amount: Decimal,
    currency: Currency,
) -> String {
    let rounded = round_half_up(amount, 0);
    let sign = if rounded.is_sign_negative() && !rounded.is_zero() {
        "-"
    } else {
        ""
    };
    format!("{sign}{}{}", currency.symbol(), group_digits(rounded.abs(), 0))
}

/// Formats `amount` with comma grouping and exactly `decimal_places` places.
///
/// ```
/// use rust_decimal_macros::dec;
/// use tax_core::format::format_amount;
///
/// assert_eq!(format_amount(dec!(1530.456), 2), "1,530.46");
/// ```
pub fn format_amount(
    amount: Decimal,
    decimal_places: u32,
) -> String {
    let rounded = round_half_up(amount, decimal_places);
    let sign = if rounded.is_sign_negative() && !rounded.is_zero() {
        "-"
    } else {
        ""
    };
    format!("{sign}{}", group_digits(rounded.abs(), decimal_places))
}

/// Formats a percentage with up to two places, dropping trailing zeros.
pub fn format_percent(percent: Decimal) -> String {
    format!("{}%", round_half_up(percent, 2).normalize())
}

fn group_digits(
    value: Decimal,
    decimal_places: u32,
) -> String {
    let text = format!("{:.*}", decimal_places as usize, value);
    let (whole, fraction) = match text.split_once('.') {
        Some((whole, fraction)) => (whole, Some(fraction)),
        None => (text.as_str(), None),
    };

    let mut grouped = String::with_capacity(whole.len() + whole.len() / 3);
    for (i, digit) in whole.chars().enumerate() {
        if i > 0 && (whole.len() - i) % 3 == 0 {
            grouped.push(',');
        }
        grouped.push(digit);
    }

    match fraction {
        Some(fraction) => format!("{grouped}.{fraction}"),
        None => grouped,
    }
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    // =========================================================================
    // format_currency tests
    // =========================================================================

    #[test]
    fn currency_groups_thousands() {
        assert_eq!(format_currency(dec!(5130000), Currency::Ngn), "₦5,130,000");
        assert_eq!(format_currency(dec!(800000), Currency::Ngn), "₦800,000");
        assert_eq!(format_currency(dec!(999), Currency::Ngn), "₦999");
        assert_eq!(format_currency(dec!(0), Currency::Ngn), "₦0");
    }

    #[test]
    fn currency_rounds_half_away_from_zero() {
        assert_eq!(format_currency(dec!(66666.5), Currency::Ngn), "₦66,667");
        assert_eq!(format_currency(dec!(66666.49), Currency::Ngn), "₦66,666");
        assert_eq!(format_currency(dec!(-0.5), Currency::Ngn), "-₦1");
    }

    #[test]
    fn currency_negative_has_leading_minus() {
        assert_eq!(format_currency(dec!(-2000000), Currency::Ngn), "-₦2,000,000");
    }

    #[test]
    fn currency_tiny_negative_rounds_to_plain_zero() {
        assert_eq!(format_currency(dec!(-0.2), Currency::Gbp), "£0");
    }

    #[test]
    fn currency_uses_each_symbol() {
        assert_eq!(format_currency(dec!(1000), Currency::Usd), "$1,000");
        assert_eq!(format_currency(dec!(1000), Currency::Eur), "€1,000");
        assert_eq!(format_currency(dec!(1000), Currency::Cad), "CA$1,000");
    }

    // =========================================================================
    // format_amount tests
    // =========================================================================

    #[test]
    fn amount_pads_decimal_places() {
        assert_eq!(format_amount(dec!(1530), 2), "1,530.00");
        assert_eq!(format_amount(dec!(0.5), 2), "0.50");
    }

    #[test]
    fn amount_rounds_to_places() {
        assert_eq!(format_amount(dec!(1234567.895), 2), "1,234,567.90");
        assert_eq!(format_amount(dec!(-1234.005), 2), "-1,234.01");
    }

    #[test]
    fn amount_with_zero_places_has_no_point() {
        assert_eq!(format_amount(dec!(1234567.4), 0), "1,234,567");
    }

    #[test]
    fn percent_drops_trailing_zeros() {
        assert_eq!(format_percent(dec!(15.00)), "15%");
        assert_eq!(format_percent(dec!(14.5)), "14.5%");
        assert_eq!(format_percent(dec!(14.499)), "14.5%");
    }
}
