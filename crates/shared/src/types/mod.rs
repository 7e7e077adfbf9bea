//! Common type definitions.

pub mod id;
pub mod money;

pub use id::{
    AccountId, CustomerId, EmployeeId, FiscalPeriodId, InvoiceId, LedgerEntryId, PayrollCycleId,
    PayrollItemId, ProductId, TaxAuthorityId, TaxLineId, TaxRateId, TaxTypeId, UserId,
};
pub use money::{round_half_up, round_money, round_tax};
