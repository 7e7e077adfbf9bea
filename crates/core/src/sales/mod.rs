//! Sales invoice creation.
//!
//! `SalesService::create_invoice` runs the whole flow inside one unit of
//! work: request validation, stock check, tax calculation, the balanced
//! invoice voucher (revenue, VAT, discount, and cost of goods), stock
//! relief, the receivable for credit sales, and tax audit rows.

pub mod error;
pub mod service;
pub mod types;

pub use error::SalesError;
pub use service::{INVOICE_PREFIX, SalesService};
pub use types::{CreateInvoiceInput, CreatedInvoice, NewInvoiceItem, PaymentType};

#[cfg(test)]
mod tests;
