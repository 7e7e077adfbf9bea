//! Payroll cycle inputs.

use chrono::NaiveDate;
use khazna_shared::types::UserId;
use serde::{Deserialize, Serialize};

pub use crate::store::{PayrollCycle, PayrollItem, PayrollStatus, PayrollTransaction};

/// Request to generate a payroll cycle.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct GenerateCycleInput {
    /// Display name, e.g. "2026-01".
    pub name: String,
    /// First day covered.
    pub period_start: NaiveDate,
    /// Last day covered; also the accrual posting date.
    pub period_end: NaiveDate,
    /// User generating the cycle.
    pub created_by: UserId,
}
