//! Common arithmetic helpers for tax calculations.
//!
//! The engine itself never rounds. Rounding happens once, when a figure is
//! displayed, using [`round_half_up`].

use rust_decimal::{Decimal, RoundingStrategy};

/// Rounds a value to `decimal_places` using half-up rounding.
///
/// Values exactly at the midpoint are rounded away from zero, matching how
/// currency amounts are conventionally displayed.
///
/// # Examples
///
/// ```
/// use rust_decimal_macros::dec;
/// use tax_core::calculations::common::round_half_up;
///
/// assert_eq!(round_half_up(dec!(427499.5), 0), dec!(427500));
/// assert_eq!(round_half_up(dec!(123.454), 2), dec!(123.45));
/// assert_eq!(round_half_up(dec!(-0.5), 0), dec!(-1)); // Away from zero
/// ```
pub fn round_half_up(
    value: Decimal,
    decimal_places: u32,
) -> Decimal {
    value.round_dp_with_strategy(decimal_places, RoundingStrategy::MidpointAwayFromZero)
}

/// Clamps negative values to zero.
///
/// # Examples
///
/// ```
/// use rust_decimal_macros::dec;
/// use tax_core::calculations::common::floor_at_zero;
///
/// assert_eq!(floor_at_zero(dec!(-250)), dec!(0));
/// assert_eq!(floor_at_zero(dec!(250)), dec!(250));
/// ```
pub fn floor_at_zero(value: Decimal) -> Decimal {
    value.max(Decimal::ZERO)
}

/// Divides an annual figure into twelve equal months.
pub fn monthly(annual: Decimal) -> Decimal {
    annual / Decimal::from(12)
}

#[cfg(test)]
mod tests {
    use pretty_assertions::assert_eq;
    use rust_decimal_macros::dec;

    use super::*;

    // =========================================================================
    // round_half_up tests
    // =========================================================================

    #[test]
    fn round_half_up_rounds_down_below_midpoint() {
        assert_eq!(round_half_up(dec!(66666.49), 0), dec!(66666));
    }

    #[test]
    fn round_half_up_rounds_up_at_midpoint() {
        assert_eq!(round_half_up(dec!(123.455), 2), dec!(123.46));
    }

    #[test]
    fn round_half_up_handles_negative_values() {
        assert_eq!(round_half_up(dec!(-123.455), 2), dec!(-123.46));
    }

    #[test]
    fn round_half_up_preserves_whole_values() {
        assert_eq!(round_half_up(dec!(870000), 0), dec!(870000));
    }

    // =========================================================================
    // floor_at_zero tests
    // =========================================================================

    #[test]
    fn floor_at_zero_clamps_negative() {
        assert_eq!(floor_at_zero(dec!(-0.01)), dec!(0));
    }

    #[test]
    fn floor_at_zero_keeps_zero_and_positive() {
        assert_eq!(floor_at_zero(dec!(0)), dec!(0));
        assert_eq!(floor_at_zero(dec!(42)), dec!(42));
    }

    // =========================================================================
    // monthly tests
    // =========================================================================

    #[test]
    fn monthly_divides_by_twelve() {
        assert_eq!(monthly(dec!(5130000)), dec!(427500));
    }

    #[test]
    fn monthly_keeps_fractional_precision() {
        let month = monthly(dec!(800000));

        assert_eq!(round_half_up(month, 2), dec!(66666.67));
    }
}
