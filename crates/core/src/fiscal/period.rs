//! Fiscal periods and the rules for posting into them.

use chrono::NaiveDate;
use khazna_shared::types::FiscalPeriodId;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// Guard violations raised when posting into a restricted period.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum FiscalError {
    /// The period is locked against ordinary postings.
    #[error("fiscal period '{0}' is locked")]
    PeriodLocked(String),
    /// The period is closed; nothing may post into it.
    #[error("fiscal period '{0}' is closed")]
    PeriodClosed(String),
}

/// Caller privilege level for posting into restricted periods.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PostingPrivilege {
    /// Ordinary posting; locked and closed periods both block.
    Standard,
    /// Adjustment posting; bypasses lock and close state.
    Override,
}

/// An accounting period with lock and close state.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct FiscalPeriod {
    /// Period identifier.
    pub id: FiscalPeriodId,
    /// Display name, e.g. "2026-01".
    pub name: String,
    /// First day of the period.
    pub start_date: NaiveDate,
    /// Last day of the period.
    pub end_date: NaiveDate,
    /// Locked periods reject ordinary postings.
    pub is_locked: bool,
    /// Closed periods reject all postings.
    pub is_closed: bool,
}

impl FiscalPeriod {
    /// Whether `date` falls inside the period, bounds inclusive.
    #[must_use]
    pub fn contains_date(&self, date: NaiveDate) -> bool {
        self.start_date <= date && date <= self.end_date
    }

    /// Checks whether a posting with the given privilege may enter this
    /// period. Closed is reported over locked when both flags are set.
    pub fn validate_posting(&self, privilege: PostingPrivilege) -> Result<(), FiscalError> {
        if privilege == PostingPrivilege::Override {
            return Ok(());
        }
        if self.is_closed {
            return Err(FiscalError::PeriodClosed(self.name.clone()));
        }
        if self.is_locked {
            return Err(FiscalError::PeriodLocked(self.name.clone()));
        }
        Ok(())
    }
}
