//! Invoice creation errors.

use thiserror::Error;

use crate::ledger::LedgerError;
use crate::store::StoreError;

/// Reasons an invoice cannot be created.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum SalesError {
    /// The request carried no lines.
    #[error("an invoice requires at least one item")]
    NoItems,
    /// Line quantities must be strictly positive.
    #[error("invalid quantity {quantity} for product {product}")]
    InvalidQuantity {
        /// Offending product name.
        product: String,
        /// Requested quantity.
        quantity: i64,
    },
    /// Credit invoices must name the customer owing the balance.
    #[error("credit invoices require a customer")]
    CustomerRequired,
    /// A line asked for more units than are on hand.
    #[error("insufficient stock for {product}: requested {requested}, available {available}")]
    InsufficientStock {
        /// Product short of stock.
        product: String,
        /// Units requested.
        requested: i64,
        /// Units on hand.
        available: i64,
    },
    /// The invoice voucher failed to post.
    #[error(transparent)]
    Ledger(#[from] LedgerError),
    /// Persistence failure.
    #[error(transparent)]
    Store(#[from] StoreError),
}
