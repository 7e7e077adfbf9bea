//! Accounting core for Khazna.
//!
//! This crate contains pure business logic with ZERO web or database
//! dependencies. Persistence is consumed through the `store` traits; the
//! surrounding application supplies real implementations.
//!
//! # Modules
//!
//! - `accounts` - Semantic account role resolution against the chart of accounts
//! - `tax` - Tax engine: effective-dated rates, multi-line calculation, authority adapters
//! - `ledger` - Double-entry voucher validation and posting
//! - `fiscal` - Fiscal period posting guards
//! - `store` - Unit-of-work boundary and domain records
//! - `sales` - Invoice creation orchestrator
//! - `payroll` - Payroll cycle lifecycle orchestrator

pub mod accounts;
pub mod fiscal;
pub mod ledger;
pub mod payroll;
pub mod sales;
pub mod store;
pub mod tax;
