//! Fiscal period posting guards.

pub mod period;

pub use period::{FiscalError, FiscalPeriod, PostingPrivilege};
