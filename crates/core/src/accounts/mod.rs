//! Semantic account role resolution against the chart of accounts.
//!
//! Business workflows never hard-code ledger account codes. They name a
//! semantic role (cash, output VAT, salaries payable, ...) and the resolver
//! maps it to a concrete code: bilingual name-pattern match first, static
//! default last.

pub mod resolver;
pub mod role;

pub use resolver::{AccountDirectory, AccountResolver};
pub use role::{AccountRole, AccountType};
