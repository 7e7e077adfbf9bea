//! Money rounding helpers.
//!
//! Tax amounts are rounded half-away-from-zero at 4 decimal places when a
//! line is computed, and again at 2 decimal places when an amount crosses
//! the document/presentation boundary. The two stages are distinct:
//! `333.33 * 0.15` is `49.9995` after the first and `50.00` after the
//! second, and downstream totals depend on exactly that.

use rust_decimal::prelude::*;
use rust_decimal::Decimal;

/// Rounds a value half-away-from-zero to the given number of decimal places.
#[must_use]
pub fn round_half_up(value: Decimal, decimal_places: u32) -> Decimal {
    value.round_dp_with_strategy(decimal_places, RoundingStrategy::MidpointAwayFromZero)
}

/// Rounds a tax line amount (4 decimal places, half-away-from-zero).
#[must_use]
pub fn round_tax(value: Decimal) -> Decimal {
    round_half_up(value, 4)
}

/// Rounds a document-level money amount (2 decimal places, half-away-from-zero).
#[must_use]
pub fn round_money(value: Decimal) -> Decimal {
    round_half_up(value, 2)
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use rust_decimal_macros::dec;

    #[rstest]
    #[case(dec!(49.99951), dec!(49.9995))]
    #[case(dec!(49.99955), dec!(49.9996))]
    #[case(dec!(333.33) * dec!(0.15), dec!(49.9995))]
    fn test_round_tax_four_decimals(#[case] input: Decimal, #[case] expected: Decimal) {
        assert_eq!(round_tax(input), expected);
    }

    #[rstest]
    #[case(dec!(49.9995), dec!(50.00))]
    #[case(dec!(49.994), dec!(49.99))]
    #[case(dec!(150), dec!(150.00))]
    fn test_round_money_two_decimals(#[case] input: Decimal, #[case] expected: Decimal) {
        assert_eq!(round_money(input), expected);
    }

    #[test]
    fn test_two_stage_rounding_law() {
        // taxable 333.33 at 15%: 49.9995 at the line, 50.00 at the boundary.
        let line = round_tax(dec!(333.33) * dec!(0.15));
        assert_eq!(line, dec!(49.9995));
        assert_eq!(round_money(line), dec!(50.00));
    }

    #[test]
    fn test_half_away_from_zero_not_bankers() {
        // Banker's rounding would give 2.2 here.
        assert_eq!(round_half_up(dec!(2.25), 1), dec!(2.3));
        assert_eq!(round_half_up(dec!(-2.25), 1), dec!(-2.3));
    }
}
