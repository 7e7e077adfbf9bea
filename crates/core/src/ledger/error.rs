//! Ledger posting errors.

use chrono::NaiveDate;
use rust_decimal::Decimal;
use thiserror::Error;

use crate::fiscal::FiscalError;
use crate::store::StoreError;

/// Reasons a voucher cannot post.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum LedgerError {
    /// A voucher needs at least one line per side.
    #[error("a voucher requires at least two lines, got {0}")]
    InsufficientEntries(usize),
    /// Every line sat on the same side of the ledger.
    #[error("voucher must contain both debit and credit lines")]
    SingleSided,
    /// Line amounts must be strictly positive.
    #[error("non-positive amount {amount} on account {account}")]
    NonPositiveAmount {
        /// Offending account code.
        account: String,
        /// Offending amount.
        amount: Decimal,
    },
    /// Debits and credits differ by more than the balance tolerance.
    #[error("voucher out of balance: debits {debit}, credits {credit}")]
    Unbalanced {
        /// Debit side total.
        debit: Decimal,
        /// Credit side total.
        credit: Decimal,
    },
    /// A line names an account the chart does not have.
    #[error("account not found in chart: {0}")]
    AccountNotFound(String),
    /// No fiscal period covers the posting date.
    #[error("no fiscal period covers {0}")]
    NoFiscalPeriod(NaiveDate),
    /// The covering period rejected the posting.
    #[error(transparent)]
    Fiscal(#[from] FiscalError),
    /// Reversal target does not exist.
    #[error("voucher not found: {0}")]
    VoucherNotFound(String),
    /// Persistence failure.
    #[error(transparent)]
    Storage(#[from] StoreError),
}
