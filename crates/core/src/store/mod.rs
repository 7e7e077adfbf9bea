//! Persistence boundary: domain records and the unit-of-work trait.
//!
//! The core never talks to a database. Workflows receive a [`UnitOfWork`]
//! and read and write through it; the surrounding application maps the
//! trait onto its storage. [`memory::MemoryStore`] is the in-process
//! implementation used by tests and embedders.

pub mod memory;

use chrono::NaiveDate;
use khazna_shared::types::{
    AccountId, CustomerId, EmployeeId, InvoiceId, PayrollCycleId, PayrollItemId, ProductId, UserId,
};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;
use uuid::Uuid;

use crate::accounts::{AccountDirectory, AccountType};
use crate::fiscal::FiscalPeriod;
use crate::ledger::types::PostedEntry;
use crate::tax::calculator::TaxRegistry;
use crate::tax::types::TaxLineRecord;

/// Persistence failures.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum StoreError {
    /// A referenced record does not exist.
    #[error("{entity} not found: {id}")]
    NotFound {
        /// Record kind.
        entity: &'static str,
        /// Identifier that missed.
        id: String,
    },
    /// An insert collided with an existing record.
    #[error("duplicate {entity}: {id}")]
    Duplicate {
        /// Record kind.
        entity: &'static str,
        /// Colliding identifier.
        id: String,
    },
}

/// One account of the chart of accounts.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ChartAccount {
    /// Account identifier.
    pub id: AccountId,
    /// Unique account code, e.g. "1110".
    pub code: String,
    /// Account name, Arabic or English.
    pub name: String,
    /// Classification.
    pub account_type: AccountType,
    /// Parent account code; accounts with children never take postings.
    pub parent_code: Option<String>,
    /// Inactive accounts are invisible to resolution and posting.
    pub is_active: bool,
}

/// A sellable product with moving-average cost.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Product {
    /// Product identifier.
    pub id: ProductId,
    /// Display name.
    pub name: String,
    /// Units on hand.
    pub stock_quantity: i64,
    /// Weighted average unit cost, maintained by purchasing.
    pub weighted_average_cost: Decimal,
}

/// A customer account with its running receivable balance.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Customer {
    /// Customer identifier.
    pub id: CustomerId,
    /// Display name.
    pub name: String,
    /// Outstanding receivable balance.
    pub balance: Decimal,
}

/// A named salary component.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PayComponent {
    /// Component name, e.g. "housing".
    pub name: String,
    /// Monthly amount.
    pub amount: Decimal,
}

/// An employee on the payroll.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Employee {
    /// Employee identifier.
    pub id: EmployeeId,
    /// Display name.
    pub name: String,
    /// Monthly basic salary.
    pub basic_salary: Decimal,
    /// Hire date; employees hired after a cycle's period end are excluded
    /// from it.
    pub hired_on: NaiveDate,
    /// Recurring allowances.
    pub allowances: Vec<PayComponent>,
    /// Recurring deductions.
    pub deductions: Vec<PayComponent>,
    /// Inactive employees are excluded from new cycles.
    pub is_active: bool,
}

impl Employee {
    /// Sum of recurring allowances.
    #[must_use]
    pub fn total_allowances(&self) -> Decimal {
        self.allowances.iter().map(|c| c.amount).sum()
    }

    /// Sum of recurring deductions.
    #[must_use]
    pub fn total_deductions(&self) -> Decimal {
        self.deductions.iter().map(|c| c.amount).sum()
    }
}

/// How an invoice is settled.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PaymentType {
    /// Settled immediately against the cash account.
    Cash,
    /// Settled later; posts to accounts receivable.
    Credit,
}

/// One line of an invoice.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct InvoiceItem {
    /// Product sold.
    pub product_id: ProductId,
    /// Units sold.
    pub quantity: i64,
    /// Agreed unit price before tax.
    pub unit_price: Decimal,
    /// `quantity * unit_price`.
    pub line_total: Decimal,
}

/// A finalized sales invoice.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Invoice {
    /// Invoice identifier.
    pub id: InvoiceId,
    /// Human-facing number, e.g. "INV-000001".
    pub number: String,
    /// Buyer; required for credit invoices.
    pub customer_id: Option<CustomerId>,
    /// Issue date.
    pub invoice_date: NaiveDate,
    /// Cash or credit settlement.
    pub payment_type: PaymentType,
    /// Lines sold.
    pub items: Vec<InvoiceItem>,
    /// Sum of line totals.
    pub subtotal: Decimal,
    /// Document-level discount.
    pub discount: Decimal,
    /// Total tax across all tax lines.
    pub tax_total: Decimal,
    /// Grand total, `subtotal - discount + tax_total`.
    pub total: Decimal,
    /// Amount settled at issue; the rest becomes a receivable.
    pub amount_paid: Decimal,
    /// Journal voucher the invoice posted under.
    pub voucher_number: String,
}

/// A movement on a customer's receivable balance.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ReceivableTransaction {
    /// Transaction identifier.
    pub id: Uuid,
    /// Customer owing the amount.
    pub customer_id: CustomerId,
    /// Invoice that created the balance.
    pub invoice_id: InvoiceId,
    /// Amount owed.
    pub amount: Decimal,
    /// Transaction date.
    pub transaction_date: NaiveDate,
    /// Narration.
    pub description: String,
}

/// Lifecycle state of a payroll cycle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum PayrollStatus {
    /// Generated, editable, nothing posted.
    Draft,
    /// Approved; liability accrued in the ledger.
    Approved,
    /// Paid out; liability settled.
    Paid,
}

/// A monthly payroll run.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PayrollCycle {
    /// Cycle identifier.
    pub id: PayrollCycleId,
    /// Display name, e.g. "2026-01".
    pub name: String,
    /// First day covered.
    pub period_start: NaiveDate,
    /// Last day covered.
    pub period_end: NaiveDate,
    /// Lifecycle state.
    pub status: PayrollStatus,
    /// User who generated the cycle.
    pub created_by: UserId,
    /// User who approved the cycle.
    pub approved_by: Option<UserId>,
    /// Sum of item gross salaries.
    pub total_gross: Decimal,
    /// Sum of item deductions.
    pub total_deductions: Decimal,
    /// Sum of item net salaries.
    pub total_net: Decimal,
    /// Accrual voucher, set on approval.
    pub accrual_voucher: Option<String>,
    /// Payment voucher, set on payment.
    pub payment_voucher: Option<String>,
}

/// One employee's pay within a cycle.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PayrollItem {
    /// Item identifier.
    pub id: PayrollItemId,
    /// Owning cycle.
    pub cycle_id: PayrollCycleId,
    /// Employee paid.
    pub employee_id: EmployeeId,
    /// Basic salary snapshot.
    pub basic_salary: Decimal,
    /// Allowances snapshot.
    pub total_allowances: Decimal,
    /// Deductions snapshot.
    pub total_deductions: Decimal,
    /// `basic + allowances`.
    pub gross_salary: Decimal,
    /// `gross - deductions`.
    pub net_salary: Decimal,
}

/// A disbursement made when a cycle is paid.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct PayrollTransaction {
    /// Transaction identifier.
    pub id: Uuid,
    /// Cycle being settled.
    pub cycle_id: PayrollCycleId,
    /// Employee paid.
    pub employee_id: EmployeeId,
    /// Net amount disbursed.
    pub amount: Decimal,
    /// Disbursement date.
    pub transaction_date: NaiveDate,
    /// Payment voucher the disbursement posted under.
    pub voucher_number: String,
}

/// Transactional access to the accounting data set.
///
/// A unit of work sees a consistent snapshot and buffers writes until the
/// surrounding transaction commits. The supertraits expose the chart of
/// accounts and the tax registry to the resolver and calculator without a
/// second handle.
pub trait UnitOfWork: AccountDirectory + TaxRegistry {
    /// Fiscal period covering `date`, if any.
    fn fiscal_period_for(&self, date: NaiveDate) -> Option<FiscalPeriod>;

    /// Next number in a named sequence, formatted "{prefix}-{n:06}".
    fn next_sequence(&mut self, prefix: &str) -> String;

    /// Appends posted ledger entries.
    fn insert_ledger_entries(&mut self, entries: Vec<PostedEntry>) -> Result<(), StoreError>;

    /// All entries of a voucher, empty when the voucher is unknown.
    fn ledger_entries_for_voucher(&self, voucher_number: &str) -> Vec<PostedEntry>;

    /// Loads a product.
    fn product(&self, id: ProductId) -> Result<Product, StoreError>;

    /// Replaces a product record.
    fn update_product(&mut self, product: Product) -> Result<(), StoreError>;

    /// Loads a customer.
    fn customer(&self, id: CustomerId) -> Result<Customer, StoreError>;

    /// Replaces a customer record.
    fn update_customer(&mut self, customer: Customer) -> Result<(), StoreError>;

    /// Persists a finalized invoice.
    fn insert_invoice(&mut self, invoice: Invoice) -> Result<(), StoreError>;

    /// Records a receivable movement.
    fn insert_receivable(&mut self, tx: ReceivableTransaction) -> Result<(), StoreError>;

    /// Persists per-document tax audit rows.
    fn insert_tax_lines(&mut self, records: Vec<TaxLineRecord>) -> Result<(), StoreError>;

    /// All active employees.
    fn active_employees(&self) -> Vec<Employee>;

    /// Persists a new payroll cycle.
    fn insert_payroll_cycle(&mut self, cycle: PayrollCycle) -> Result<(), StoreError>;

    /// Loads a payroll cycle.
    fn payroll_cycle(&self, id: PayrollCycleId) -> Result<PayrollCycle, StoreError>;

    /// Replaces a payroll cycle record.
    fn update_payroll_cycle(&mut self, cycle: PayrollCycle) -> Result<(), StoreError>;

    /// Persists one employee's pay line.
    fn insert_payroll_item(&mut self, item: PayrollItem) -> Result<(), StoreError>;

    /// All pay lines of a cycle.
    fn payroll_items(&self, cycle_id: PayrollCycleId) -> Vec<PayrollItem>;

    /// Records a payroll disbursement.
    fn insert_payroll_transaction(&mut self, tx: PayrollTransaction) -> Result<(), StoreError>;
}
