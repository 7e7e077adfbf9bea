//! Effective-dated rate resolution.

use chrono::NaiveDate;

use super::types::TaxRate;

/// Picks the rate row in force on `as_of`.
///
/// A row is in force when it is active, `effective_from <= as_of`, and
/// `effective_to` is unset or `>= as_of`. Ties break on the latest
/// `effective_from`. When no row is in force the active default row is
/// used instead; with neither, the tax type contributes nothing.
#[must_use]
pub fn resolve_rate(rates: &[TaxRate], as_of: NaiveDate) -> Option<&TaxRate> {
    let effective = rates
        .iter()
        .filter(|r| {
            r.is_active
                && r.effective_from <= as_of
                && r.effective_to.is_none_or(|to| to >= as_of)
        })
        .max_by_key(|r| r.effective_from);

    effective.or_else(|| rates.iter().find(|r| r.is_active && r.is_default))
}

#[cfg(test)]
mod tests {
    use super::*;
    use khazna_shared::types::{TaxRateId, TaxTypeId};
    use rust_decimal::Decimal;
    use rust_decimal_macros::dec;

    fn date(y: i32, m: u32, d: u32) -> NaiveDate {
        NaiveDate::from_ymd_opt(y, m, d).unwrap()
    }

    fn rate(
        value: Decimal,
        from: NaiveDate,
        to: Option<NaiveDate>,
        is_default: bool,
        is_active: bool,
    ) -> TaxRate {
        TaxRate {
            id: TaxRateId::new(),
            tax_type_id: TaxTypeId::new(),
            rate: value,
            fixed_amount: Decimal::ZERO,
            effective_from: from,
            effective_to: to,
            is_default,
            is_active,
        }
    }

    #[test]
    fn test_effective_window_bounds_are_inclusive() {
        let rates = [rate(
            dec!(0.15),
            date(2025, 1, 1),
            Some(date(2025, 12, 31)),
            false,
            true,
        )];
        assert!(resolve_rate(&rates, date(2025, 1, 1)).is_some());
        assert!(resolve_rate(&rates, date(2025, 12, 31)).is_some());
        assert!(resolve_rate(&rates, date(2024, 12, 31)).is_none());
        assert!(resolve_rate(&rates, date(2026, 1, 1)).is_none());
    }

    #[test]
    fn test_open_ended_rate_applies_indefinitely() {
        let rates = [rate(dec!(0.15), date(2020, 7, 1), None, false, true)];
        assert!(resolve_rate(&rates, date(2099, 1, 1)).is_some());
    }

    #[test]
    fn test_latest_effective_from_wins_on_overlap() {
        let rates = [
            rate(dec!(0.05), date(2020, 1, 1), None, false, true),
            rate(dec!(0.15), date(2020, 7, 1), None, false, true),
        ];
        let picked = resolve_rate(&rates, date(2021, 1, 1)).unwrap();
        assert_eq!(picked.rate, dec!(0.15));
    }

    #[test]
    fn test_default_used_when_no_window_covers_date() {
        let rates = [
            rate(
                dec!(0.05),
                date(2025, 1, 1),
                Some(date(2025, 6, 30)),
                false,
                true,
            ),
            rate(dec!(0.15), date(2030, 1, 1), None, true, true),
        ];
        // 2026 falls outside the first window; the default wins even though
        // its own effective_from has not arrived.
        let picked = resolve_rate(&rates, date(2026, 1, 1)).unwrap();
        assert_eq!(picked.rate, dec!(0.15));
    }

    #[test]
    fn test_inactive_rates_never_selected() {
        let rates = [rate(dec!(0.15), date(2020, 1, 1), None, true, false)];
        assert!(resolve_rate(&rates, date(2025, 1, 1)).is_none());
    }

    #[test]
    fn test_empty_slice_yields_none() {
        assert!(resolve_rate(&[], date(2025, 1, 1)).is_none());
    }
}
