//! Structural validation of voucher lines before posting.

use rust_decimal::Decimal;

use super::error::LedgerError;
use super::types::{EntryType, LedgerLine, VoucherTotals};

/// Validates voucher lines and returns their side totals.
///
/// Checks run in order of cheapness: line count, per-line amounts, side
/// presence, then the balance equation within the one-cent tolerance.
pub fn validate_lines(lines: &[LedgerLine]) -> Result<VoucherTotals, LedgerError> {
    if lines.len() < 2 {
        return Err(LedgerError::InsufficientEntries(lines.len()));
    }

    for line in lines {
        if line.amount <= Decimal::ZERO {
            return Err(LedgerError::NonPositiveAmount {
                account: line.account_code.clone(),
                amount: line.amount,
            });
        }
    }

    let has_debit = lines.iter().any(|l| l.entry_type == EntryType::Debit);
    let has_credit = lines.iter().any(|l| l.entry_type == EntryType::Credit);
    if !has_debit || !has_credit {
        return Err(LedgerError::SingleSided);
    }

    let totals = VoucherTotals::of(lines);
    if !totals.is_balanced() {
        return Err(LedgerError::Unbalanced {
            debit: totals.debit,
            credit: totals.credit,
        });
    }
    Ok(totals)
}
