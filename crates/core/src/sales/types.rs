//! Invoice creation inputs and outputs.

use chrono::NaiveDate;
use khazna_shared::types::{CustomerId, ProductId};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};

use crate::store::Invoice;
use crate::tax::types::TaxCalculationResult;

pub use crate::store::PaymentType;

/// One requested invoice line.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct NewInvoiceItem {
    /// Product sold.
    pub product_id: ProductId,
    /// Units sold, must be positive.
    pub quantity: i64,
    /// Agreed unit price before tax.
    pub unit_price: Decimal,
}

/// Request to create a sales invoice.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreateInvoiceInput {
    /// Buyer; required for credit invoices.
    pub customer_id: Option<CustomerId>,
    /// Issue date, also the tax calculation and posting date.
    pub invoice_date: NaiveDate,
    /// Cash or credit settlement.
    pub payment_type: PaymentType,
    /// Document-level discount off the subtotal.
    pub discount: Decimal,
    /// Amount settled at issue. Defaults to the grand total for cash
    /// sales and to zero for credit sales.
    pub amount_paid: Option<Decimal>,
    /// Requested lines.
    pub items: Vec<NewInvoiceItem>,
}

/// A created invoice with its tax breakdown.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CreatedInvoice {
    /// Persisted invoice record.
    pub invoice: Invoice,
    /// Taxes applied to the document.
    pub tax: TaxCalculationResult,
}
