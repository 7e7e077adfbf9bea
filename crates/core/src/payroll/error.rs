//! Payroll lifecycle errors.

use thiserror::Error;

use crate::accounts::AccountRole;
use crate::ledger::LedgerError;
use crate::store::{PayrollStatus, StoreError};

/// Reasons a payroll operation cannot proceed.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum PayrollError {
    /// A cycle cannot be generated with nobody on the payroll.
    #[error("no active employees to generate a payroll cycle for")]
    NoActiveEmployees,
    /// The cycle is not in the state the operation requires.
    #[error("payroll cycle is {from:?}, operation requires {required:?}")]
    InvalidTransition {
        /// Current state.
        from: PayrollStatus,
        /// State the operation requires.
        required: PayrollStatus,
    },
    /// A required account role has no account in the chart.
    ///
    /// Payroll postings never fall back to unverified defaults; a missing
    /// mapping blocks the cycle until the chart is fixed.
    #[error("no chart account mapped for role {0:?}")]
    MissingAccountMapping(AccountRole),
    /// The payroll voucher failed to post.
    #[error(transparent)]
    Ledger(#[from] LedgerError),
    /// Persistence failure.
    #[error(transparent)]
    Store(#[from] StoreError),
}
