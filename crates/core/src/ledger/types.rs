//! Ledger line and posted entry types.

use chrono::NaiveDate;
use khazna_shared::types::{FiscalPeriodId, LedgerEntryId};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// Balance tolerance for a voucher, one cent.
pub const BALANCE_TOLERANCE: Decimal = Decimal::from_parts(1, 0, 0, false, 2);

/// Which side of the ledger a line posts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum EntryType {
    /// Debit side.
    Debit,
    /// Credit side.
    Credit,
}

impl EntryType {
    /// The opposite side, used when reversing a voucher.
    #[must_use]
    pub fn flipped(self) -> Self {
        match self {
            Self::Debit => Self::Credit,
            Self::Credit => Self::Debit,
        }
    }
}

/// What kind of business event produced a voucher.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum SourceType {
    /// Sales invoice posting.
    Invoice,
    /// Payroll liability accrual.
    PayrollAccrual,
    /// Payroll disbursement.
    PayrollPayment,
    /// Hand-entered journal voucher.
    Manual,
    /// Reversal of an earlier voucher.
    Reversal,
}

/// Link from a voucher back to its source document.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct SourceDocument {
    /// Event kind.
    pub source_type: SourceType,
    /// Source document identifier, when one exists.
    pub source_id: Option<Uuid>,
}

impl SourceDocument {
    /// Creates a source link.
    #[must_use]
    pub fn new(source_type: SourceType, source_id: Option<Uuid>) -> Self {
        Self {
            source_type,
            source_id,
        }
    }

    /// A manual voucher with no source document.
    #[must_use]
    pub fn manual() -> Self {
        Self::new(SourceType::Manual, None)
    }
}

/// One unposted line of a voucher.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct LedgerLine {
    /// Chart account code.
    pub account_code: String,
    /// Debit or credit.
    pub entry_type: EntryType,
    /// Line amount, must be positive.
    pub amount: Decimal,
    /// Line narration.
    pub description: String,
}

impl LedgerLine {
    /// A debit line.
    #[must_use]
    pub fn debit(
        account_code: impl Into<String>,
        amount: Decimal,
        description: impl Into<String>,
    ) -> Self {
        Self {
            account_code: account_code.into(),
            entry_type: EntryType::Debit,
            amount,
            description: description.into(),
        }
    }

    /// A credit line.
    #[must_use]
    pub fn credit(
        account_code: impl Into<String>,
        amount: Decimal,
        description: impl Into<String>,
    ) -> Self {
        Self {
            account_code: account_code.into(),
            entry_type: EntryType::Credit,
            amount,
            description: description.into(),
        }
    }
}

/// Side totals of a voucher.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct VoucherTotals {
    /// Sum of debit lines.
    pub debit: Decimal,
    /// Sum of credit lines.
    pub credit: Decimal,
}

impl VoucherTotals {
    /// Accumulates side totals over the lines.
    #[must_use]
    pub fn of(lines: &[LedgerLine]) -> Self {
        lines.iter().fold(Self::default(), |mut totals, line| {
            match line.entry_type {
                EntryType::Debit => totals.debit += line.amount,
                EntryType::Credit => totals.credit += line.amount,
            }
            totals
        })
    }

    /// True when the sides agree within one cent.
    #[must_use]
    pub fn is_balanced(&self) -> bool {
        (self.debit - self.credit).abs() <= BALANCE_TOLERANCE
    }
}

/// One persisted ledger entry of a posted voucher.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PostedEntry {
    /// Entry identifier.
    pub id: LedgerEntryId,
    /// Voucher the entry belongs to, e.g. "VOU-000001".
    pub voucher_number: String,
    /// Chart account code.
    pub account_code: String,
    /// Debit or credit.
    pub entry_type: EntryType,
    /// Entry amount.
    pub amount: Decimal,
    /// Entry narration.
    pub description: String,
    /// Date the entry posts under.
    pub posting_date: NaiveDate,
    /// Fiscal period the posting date resolved to.
    pub fiscal_period_id: FiscalPeriodId,
    /// Business event that produced the voucher.
    pub source_type: SourceType,
    /// Source document identifier, when one exists.
    pub source_id: Option<Uuid>,
}
