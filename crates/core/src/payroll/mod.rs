//! Payroll cycle lifecycle.
//!
//! A cycle moves draft -> approved -> paid. Drafts carry no ledger effect
//! and may be regenerated freely; approval accrues the salary liability;
//! payment settles it. Account mappings are fail-hard here: an unmapped
//! salaries account blocks the cycle rather than posting to a guess.

pub mod error;
pub mod service;
pub mod types;

pub use error::PayrollError;
pub use service::{ACCRUAL_PREFIX, PAYMENT_PREFIX, PayrollService};
pub use types::{GenerateCycleInput, PayrollCycle, PayrollItem, PayrollStatus, PayrollTransaction};
