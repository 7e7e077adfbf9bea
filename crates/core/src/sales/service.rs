//! Invoice creation workflow.

use khazna_shared::config::{AccountingConfig, ZatcaConfig};
use khazna_shared::types::InvoiceId;
use khazna_shared::types::money::round_money;
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::accounts::{AccountResolver, AccountRole};
use crate::fiscal::PostingPrivilege;
use crate::ledger::{BALANCE_TOLERANCE, LedgerLine, LedgerPoster, SourceDocument, SourceType};
use crate::store::{Invoice, InvoiceItem, PaymentType, ReceivableTransaction, UnitOfWork};
use crate::tax::TaxCalculator;
use crate::tax::authority::CompliancePayload;
use crate::tax::types::{ApplicableArea, TaxCalculationResult};

use super::error::SalesError;
use super::types::{CreateInvoiceInput, CreatedInvoice};

/// Sequence prefix for invoice numbers.
pub const INVOICE_PREFIX: &str = "INV";

/// Creates invoices: stock check, tax, ledger voucher, and subledgers in
/// one unit of work.
///
/// The caller runs `create_invoice` inside a store transaction; any error
/// rolls back the invoice, its voucher, the stock movements, and the
/// receivable together.
#[derive(Debug, Clone)]
pub struct SalesService {
    calculator: TaxCalculator,
    country_code: String,
    output_vat_account: String,
}

impl SalesService {
    /// Builds the service from the accounting configuration.
    #[must_use]
    pub fn new(config: &AccountingConfig) -> Self {
        Self {
            calculator: TaxCalculator::from_config(config),
            country_code: config.country_code.clone(),
            output_vat_account: config.output_vat_account.clone(),
        }
    }

    /// Creates and posts a sales invoice.
    ///
    /// Steps: validate the request, check stock, price the lines, compute
    /// tax, persist the invoice, post the voucher (including cost of
    /// goods), relieve stock, then record the receivable and tax audit
    /// rows.
    pub fn create_invoice<U: UnitOfWork + ?Sized>(
        &self,
        uow: &mut U,
        input: &CreateInvoiceInput,
    ) -> Result<CreatedInvoice, SalesError> {
        if input.items.is_empty() {
            return Err(SalesError::NoItems);
        }
        if input.payment_type == PaymentType::Credit && input.customer_id.is_none() {
            return Err(SalesError::CustomerRequired);
        }
        if let Some(customer_id) = input.customer_id {
            uow.customer(customer_id)?;
        }

        // Stock check and line pricing in one pass over the products.
        let mut items = Vec::with_capacity(input.items.len());
        let mut subtotal = Decimal::ZERO;
        let mut cost_of_goods = Decimal::ZERO;
        for requested in &input.items {
            let mut product = uow.product(requested.product_id)?;
            if requested.quantity <= 0 {
                return Err(SalesError::InvalidQuantity {
                    product: product.name,
                    quantity: requested.quantity,
                });
            }
            if product.stock_quantity < requested.quantity {
                return Err(SalesError::InsufficientStock {
                    product: product.name,
                    requested: requested.quantity,
                    available: product.stock_quantity,
                });
            }

            let line_total = requested.unit_price * Decimal::from(requested.quantity);
            subtotal += line_total;
            cost_of_goods +=
                product.weighted_average_cost * Decimal::from(requested.quantity);
            items.push(InvoiceItem {
                product_id: requested.product_id,
                quantity: requested.quantity,
                unit_price: requested.unit_price,
                line_total,
            });

            product.stock_quantity -= requested.quantity;
            uow.update_product(product)?;
        }

        let taxable = subtotal - input.discount;
        let tax = self.calculator.calculate(
            uow,
            taxable,
            &self.country_code,
            input.invoice_date,
            ApplicableArea::Sales,
        );
        let tax_total = round_money(tax.total_tax);
        let total = round_money(taxable + tax_total);
        let amount_paid = input.amount_paid.unwrap_or(match input.payment_type {
            PaymentType::Cash => total,
            PaymentType::Credit => Decimal::ZERO,
        });
        let outstanding = total - amount_paid;

        let invoice_id = InvoiceId::new();
        let number = uow.next_sequence(INVOICE_PREFIX);

        let lines = self.voucher_lines(
            uow,
            &number,
            input,
            subtotal,
            &tax,
            amount_paid,
            outstanding,
            cost_of_goods,
        );
        let voucher_number = LedgerPoster::post(
            uow,
            &lines,
            SourceDocument::new(SourceType::Invoice, Some(invoice_id.into_inner())),
            None,
            input.invoice_date,
            PostingPrivilege::Standard,
        )?;

        let invoice = Invoice {
            id: invoice_id,
            number: number.clone(),
            customer_id: input.customer_id,
            invoice_date: input.invoice_date,
            payment_type: input.payment_type,
            items,
            subtotal,
            discount: input.discount,
            tax_total,
            total,
            amount_paid,
            voucher_number,
        };
        uow.insert_invoice(invoice.clone())?;

        if input.payment_type == PaymentType::Credit && outstanding > BALANCE_TOLERANCE {
            // CustomerRequired was checked up front.
            if let Some(customer_id) = input.customer_id {
                uow.insert_receivable(ReceivableTransaction {
                    id: Uuid::now_v7(),
                    customer_id,
                    invoice_id,
                    amount: outstanding,
                    transaction_date: input.invoice_date,
                    description: format!("Invoice {number}"),
                })?;
                let mut customer = uow.customer(customer_id)?;
                customer.balance += outstanding;
                uow.update_customer(customer)?;
            }
        }

        uow.insert_tax_lines(tax.audit_records("invoice", invoice_id.into_inner()))?;

        tracing::info!(
            invoice = %number,
            %total,
            tax = %tax_total,
            payment = ?input.payment_type,
            "invoice created"
        );
        Ok(CreatedInvoice { invoice, tax })
    }

    /// Builds the compliance payload for a created invoice.
    #[must_use]
    pub fn compliance_payload(invoice: &Invoice, zatca: &ZatcaConfig) -> CompliancePayload {
        CompliancePayload {
            invoice_id: invoice.id,
            invoice_number: invoice.number.clone(),
            issued_at: invoice
                .invoice_date
                .and_hms_opt(0, 0, 0)
                .unwrap_or_default()
                .and_utc(),
            seller_name: zatca.seller_name.clone(),
            seller_tax_number: zatca.tax_number.clone(),
            line_count: invoice.items.len(),
            total_with_tax: invoice.total,
            tax_total: invoice.tax_total,
        }
    }

    #[allow(clippy::too_many_arguments)]
    fn voucher_lines<U: UnitOfWork + ?Sized>(
        &self,
        uow: &U,
        number: &str,
        input: &CreateInvoiceInput,
        subtotal: Decimal,
        tax: &TaxCalculationResult,
        amount_paid: Decimal,
        outstanding: Decimal,
        cost_of_goods: Decimal,
    ) -> Vec<LedgerLine> {
        let mut lines = Vec::with_capacity(6);
        if amount_paid > Decimal::ZERO {
            lines.push(LedgerLine::debit(
                AccountResolver::resolve(uow, AccountRole::Cash),
                amount_paid,
                format!("Invoice {number}"),
            ));
        }
        // Sub-cent residue stays within the balance tolerance instead of
        // posting to receivables.
        if outstanding > BALANCE_TOLERANCE {
            lines.push(LedgerLine::debit(
                AccountResolver::resolve(uow, AccountRole::AccountsReceivable),
                outstanding,
                format!("Invoice {number} on account"),
            ));
        }
        lines.push(LedgerLine::credit(
            AccountResolver::resolve(uow, AccountRole::SalesRevenue),
            subtotal,
            format!("Invoice {number} revenue"),
        ));
        if input.discount > Decimal::ZERO {
            lines.push(LedgerLine::debit(
                AccountResolver::resolve(uow, AccountRole::SalesDiscount),
                input.discount,
                format!("Invoice {number} discount"),
            ));
        }
        for (account, amount) in self.tax_credits(uow, tax) {
            lines.push(LedgerLine::credit(
                account,
                amount,
                format!("Invoice {number} tax"),
            ));
        }
        if cost_of_goods > Decimal::ZERO {
            lines.push(LedgerLine::debit(
                AccountResolver::resolve(uow, AccountRole::CostOfGoodsSold),
                cost_of_goods,
                format!("Invoice {number} cost of goods"),
            ));
            lines.push(LedgerLine::credit(
                AccountResolver::resolve(uow, AccountRole::Inventory),
                cost_of_goods,
                format!("Invoice {number} stock relief"),
            ));
        }
        lines
    }

    /// Groups tax amounts by the ledger account each line posts to.
    ///
    /// A line's own account wins when the chart has it; otherwise the
    /// configured output account, then the resolved output-VAT role.
    fn tax_credits<U: UnitOfWork + ?Sized>(
        &self,
        uow: &U,
        tax: &TaxCalculationResult,
    ) -> Vec<(String, Decimal)> {
        let mut credits: Vec<(String, Decimal)> = Vec::new();
        for line in &tax.lines {
            if line.tax_amount <= Decimal::ZERO {
                continue;
            }
            let account = line
                .gl_account_code
                .as_deref()
                .and_then(|code| AccountResolver::validate_code(uow, code))
                .or_else(|| AccountResolver::validate_code(uow, &self.output_vat_account))
                .unwrap_or_else(|| AccountResolver::resolve(uow, AccountRole::OutputVat));
            match credits.iter_mut().find(|(code, _)| *code == account) {
                Some((_, amount)) => *amount += line.tax_amount,
                None => credits.push((account, line.tax_amount)),
            }
        }
        for credit in &mut credits {
            credit.1 = round_money(credit.1);
        }
        credits
    }
}
