use chrono::NaiveDate;
use khazna_shared::config::AccountingConfig;
use khazna_shared::types::{
    AccountId, CustomerId, FiscalPeriodId, ProductId, TaxAuthorityId, TaxRateId, TaxTypeId,
};
use rust_decimal::Decimal;
use rust_decimal_macros::dec;

use crate::accounts::AccountType;
use crate::fiscal::FiscalPeriod;
use crate::ledger::EntryType;
use crate::store::memory::MemoryStore;
use crate::store::{ChartAccount, Customer, Product};
use crate::tax::types::{CalculationKind, TaxAuthority, TaxRate, TaxType};

use super::error::SalesError;
use super::service::SalesService;
use super::types::{CreateInvoiceInput, CreatedInvoice, NewInvoiceItem, PaymentType};

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

fn seed_vat_registry(store: &mut MemoryStore, rate: Decimal) -> TaxAuthorityId {
    let authority_id = TaxAuthorityId::new();
    let type_id = TaxTypeId::new();
    store.seed_tax_authority(TaxAuthority {
        id: authority_id,
        code: "ZATCA".to_string(),
        name: "Zakat, Tax and Customs Authority".to_string(),
        country_code: "SA".to_string(),
        priority: 10,
        is_active: true,
    });
    store.seed_tax_type(TaxType {
        id: type_id,
        authority_id,
        code: "VAT".to_string(),
        name: "Value Added Tax".to_string(),
        calculation_kind: CalculationKind::Percentage,
        applies_to_sales: true,
        applies_to_purchases: false,
        gl_account_code: None,
        is_active: true,
    });
    store.seed_tax_rate(TaxRate {
        id: TaxRateId::new(),
        tax_type_id: type_id,
        rate,
        fixed_amount: Decimal::ZERO,
        effective_from: date(2020, 1, 1),
        effective_to: None,
        is_default: false,
        is_active: true,
    });
    authority_id
}

struct Fixture {
    store: MemoryStore,
    authority_id: TaxAuthorityId,
    product_id: ProductId,
    customer_id: CustomerId,
}

fn fixture() -> Fixture {
    let mut store = MemoryStore::new();
    store.seed_default_chart();
    store.seed_fiscal_period(FiscalPeriod {
        id: FiscalPeriodId::new(),
        name: "2026-01".to_string(),
        start_date: date(2026, 1, 1),
        end_date: date(2026, 1, 31),
        is_locked: false,
        is_closed: false,
    });
    let authority_id = seed_vat_registry(&mut store, dec!(0.15));

    let product_id = ProductId::new();
    store.seed_product(Product {
        id: product_id,
        name: "Widget".to_string(),
        stock_quantity: 10,
        weighted_average_cost: dec!(400.00),
    });

    let customer_id = CustomerId::new();
    store.seed_customer(Customer {
        id: customer_id,
        name: "Acme".to_string(),
        balance: Decimal::ZERO,
    });

    Fixture {
        store,
        authority_id,
        product_id,
        customer_id,
    }
}

fn cash_input(fix: &Fixture, quantity: i64, unit_price: Decimal) -> CreateInvoiceInput {
    CreateInvoiceInput {
        customer_id: None,
        invoice_date: date(2026, 1, 15),
        payment_type: PaymentType::Cash,
        discount: Decimal::ZERO,
        amount_paid: None,
        items: vec![NewInvoiceItem {
            product_id: fix.product_id,
            quantity,
            unit_price,
        }],
    }
}

fn create(fix: &mut Fixture, input: &CreateInvoiceInput) -> Result<CreatedInvoice, SalesError> {
    let service = SalesService::new(&AccountingConfig::default());
    fix.store.transaction(|tx| service.create_invoice(tx, input))
}

#[test]
fn test_cash_invoice_posts_balanced_voucher() {
    let mut fix = fixture();
    let input = cash_input(&fix, 2, dec!(500.00));
    let created = create(&mut fix, &input).unwrap();

    assert_eq!(created.invoice.number, "INV-000001");
    assert_eq!(created.invoice.subtotal, dec!(1000.00));
    assert_eq!(created.invoice.tax_total, dec!(150.00));
    assert_eq!(created.invoice.total, dec!(1150.00));
    // Cash sales settle in full at issue.
    assert_eq!(created.invoice.amount_paid, dec!(1150.00));

    let entries = fix.store.ledger_entries();
    assert_eq!(entries.len(), 5);
    let debits: Decimal = entries
        .iter()
        .filter(|e| e.entry_type == EntryType::Debit)
        .map(|e| e.amount)
        .sum();
    let credits: Decimal = entries
        .iter()
        .filter(|e| e.entry_type == EntryType::Credit)
        .map(|e| e.amount)
        .sum();
    assert_eq!(debits, credits);

    let cash = entries.iter().find(|e| e.account_code == "1110").unwrap();
    assert_eq!(cash.amount, dec!(1150.00));
    let vat = entries.iter().find(|e| e.account_code == "2210").unwrap();
    assert_eq!(vat.entry_type, EntryType::Credit);
    assert_eq!(vat.amount, dec!(150.00));

    // Cost of goods at weighted average: 2 * 400.
    let cogs = entries.iter().find(|e| e.account_code == "5100").unwrap();
    assert_eq!(cogs.amount, dec!(800.00));
    let inventory = entries.iter().find(|e| e.account_code == "1130").unwrap();
    assert_eq!(inventory.entry_type, EntryType::Credit);
    assert_eq!(inventory.amount, dec!(800.00));

    assert_eq!(fix.store.product(fix.product_id).unwrap().stock_quantity, 8);
    assert_eq!(fix.store.tax_lines().len(), 1);
    assert_eq!(fix.store.tax_lines()[0].tax_amount, dec!(150.0000));
}

#[test]
fn test_credit_invoice_records_receivable() {
    let mut fix = fixture();
    let mut input = cash_input(&fix, 1, dec!(1000.00));
    input.payment_type = PaymentType::Credit;
    input.customer_id = Some(fix.customer_id);

    let created = create(&mut fix, &input).unwrap();

    let ar = fix
        .store
        .ledger_entries()
        .iter()
        .find(|e| e.account_code == "1120")
        .cloned()
        .unwrap();
    assert_eq!(ar.entry_type, EntryType::Debit);
    assert_eq!(ar.amount, dec!(1150.00));

    let receivables = fix.store.receivables();
    assert_eq!(receivables.len(), 1);
    assert_eq!(receivables[0].customer_id, fix.customer_id);
    assert_eq!(receivables[0].invoice_id, created.invoice.id);
    assert_eq!(receivables[0].amount, dec!(1150.00));
    assert_eq!(
        fix.store.customer(fix.customer_id).unwrap().balance,
        dec!(1150.00)
    );
}

#[test]
fn test_partial_payment_splits_cash_and_receivable() {
    let mut fix = fixture();
    let mut input = cash_input(&fix, 1, dec!(1000.00));
    input.payment_type = PaymentType::Credit;
    input.customer_id = Some(fix.customer_id);
    input.amount_paid = Some(dec!(500.00));

    let created = create(&mut fix, &input).unwrap();
    assert_eq!(created.invoice.amount_paid, dec!(500.00));

    let entries = fix.store.ledger_entries();
    let cash = entries.iter().find(|e| e.account_code == "1110").unwrap();
    assert_eq!(cash.entry_type, EntryType::Debit);
    assert_eq!(cash.amount, dec!(500.00));
    let ar = entries.iter().find(|e| e.account_code == "1120").unwrap();
    assert_eq!(ar.amount, dec!(650.00));

    // Only the outstanding part hits the subledger and the balance.
    assert_eq!(fix.store.receivables()[0].amount, dec!(650.00));
    assert_eq!(
        fix.store.customer(fix.customer_id).unwrap().balance,
        dec!(650.00)
    );
}

#[test]
fn test_credit_invoice_without_customer_rejected() {
    let mut fix = fixture();
    let mut input = cash_input(&fix, 1, dec!(100.00));
    input.payment_type = PaymentType::Credit;

    assert_eq!(
        create(&mut fix, &input).unwrap_err(),
        SalesError::CustomerRequired
    );
}

#[test]
fn test_empty_invoice_rejected() {
    let mut fix = fixture();
    let mut input = cash_input(&fix, 1, dec!(100.00));
    input.items.clear();

    assert_eq!(create(&mut fix, &input).unwrap_err(), SalesError::NoItems);
}

#[test]
fn test_insufficient_stock_rolls_everything_back() {
    let mut fix = fixture();
    let input = cash_input(&fix, 99, dec!(10.00));
    let result = create(&mut fix, &input);
    assert_eq!(
        result.unwrap_err(),
        SalesError::InsufficientStock {
            product: "Widget".to_string(),
            requested: 99,
            available: 10,
        }
    );

    assert!(fix.store.invoices().is_empty());
    assert!(fix.store.ledger_entries().is_empty());
    assert_eq!(fix.store.product(fix.product_id).unwrap().stock_quantity, 10);

    // The failed attempt did not consume an invoice number.
    let retry = cash_input(&fix, 1, dec!(10.00));
    let created = create(&mut fix, &retry).unwrap();
    assert_eq!(created.invoice.number, "INV-000001");
}

#[test]
fn test_discount_reduces_taxable_base() {
    let mut fix = fixture();
    let mut input = cash_input(&fix, 2, dec!(500.00));
    input.discount = dec!(100.00);

    let created = create(&mut fix, &input).unwrap();
    // Taxable 900, VAT 135, total 1035.
    assert_eq!(created.invoice.tax_total, dec!(135.00));
    assert_eq!(created.invoice.total, dec!(1035.00));

    let discount = fix
        .store
        .ledger_entries()
        .iter()
        .find(|e| e.account_code == "4110")
        .cloned()
        .unwrap();
    assert_eq!(discount.entry_type, EntryType::Debit);
    assert_eq!(discount.amount, dec!(100.00));
}

#[test]
fn test_tax_type_account_override_splits_the_credit() {
    let mut fix = fixture();
    fix.store.seed_account(ChartAccount {
        id: AccountId::new(),
        code: "2230".to_string(),
        name: "Municipal Fees Payable".to_string(),
        account_type: AccountType::Liability,
        parent_code: None,
        is_active: true,
    });
    let fee_type_id = TaxTypeId::new();
    fix.store.seed_tax_type(TaxType {
        id: fee_type_id,
        authority_id: fix.authority_id,
        code: "FEE".to_string(),
        name: "Municipal Fee".to_string(),
        calculation_kind: CalculationKind::FixedAmount,
        applies_to_sales: true,
        applies_to_purchases: false,
        gl_account_code: Some("2230".to_string()),
        is_active: true,
    });
    fix.store.seed_tax_rate(TaxRate {
        id: TaxRateId::new(),
        tax_type_id: fee_type_id,
        rate: Decimal::ZERO,
        fixed_amount: dec!(5.00),
        effective_from: date(2020, 1, 1),
        effective_to: None,
        is_default: false,
        is_active: true,
    });

    let input = cash_input(&fix, 1, dec!(1000.00));
    let created = create(&mut fix, &input).unwrap();
    assert_eq!(created.invoice.tax_total, dec!(155.00));
    assert_eq!(created.invoice.total, dec!(1155.00));

    // Each tax posts to its own payable account.
    let entries = fix.store.ledger_entries();
    assert_eq!(entries.len(), 6);
    let vat = entries.iter().find(|e| e.account_code == "2210").unwrap();
    assert_eq!(vat.entry_type, EntryType::Credit);
    assert_eq!(vat.amount, dec!(150.00));
    let fee = entries.iter().find(|e| e.account_code == "2230").unwrap();
    assert_eq!(fee.entry_type, EntryType::Credit);
    assert_eq!(fee.amount, dec!(5.00));
}

#[test]
fn test_sub_cent_shortfall_stays_off_the_receivables() {
    let mut fix = fixture();
    let mut input = cash_input(&fix, 1, dec!(1000.00));
    input.payment_type = PaymentType::Credit;
    input.customer_id = Some(fix.customer_id);
    input.amount_paid = Some(dec!(1149.99));

    create(&mut fix, &input).unwrap();

    // A one-cent residue is rounding noise, not an open balance.
    assert!(
        fix.store
            .ledger_entries()
            .iter()
            .all(|e| e.account_code != "1120")
    );
    assert!(fix.store.receivables().is_empty());
    assert_eq!(
        fix.store.customer(fix.customer_id).unwrap().balance,
        Decimal::ZERO
    );
}

#[test]
fn test_unregistered_country_uses_legacy_rate_without_audit_rows() {
    let mut fix = fixture();
    let config = AccountingConfig {
        country_code: "XX".to_string(),
        ..AccountingConfig::default()
    };
    let service = SalesService::new(&config);
    let input = cash_input(&fix, 1, dec!(200.00));

    let created = fix
        .store
        .transaction(|tx| service.create_invoice(tx, &input))
        .unwrap();
    assert_eq!(created.tax.lines[0].authority_code, "LEGACY");
    assert_eq!(created.invoice.tax_total, dec!(30.00));
    // Legacy lines carry no registry identifiers, so nothing is audited.
    assert!(fix.store.tax_lines().is_empty());
}

#[test]
fn test_invalid_quantity_rejected() {
    let mut fix = fixture();
    let input = cash_input(&fix, 0, dec!(100.00));
    assert!(matches!(
        create(&mut fix, &input),
        Err(SalesError::InvalidQuantity { quantity: 0, .. })
    ));
}

#[test]
fn test_compliance_payload_feeds_the_authority_adapter() {
    use crate::tax::authority::zatca::{DocumentGenerator, SandboxClient, ZatcaAuthority};
    use crate::tax::authority::{
        AdapterError, AuthorityAdapter, CompliancePayload, SubmissionStatus, SubmissionType,
    };
    use khazna_shared::config::{ZatcaConfig, ZatcaEnvironment};

    struct Generator;
    impl DocumentGenerator for Generator {
        fn generate(&self, payload: &CompliancePayload) -> Result<String, AdapterError> {
            Ok(format!("<invoice number=\"{}\"/>", payload.invoice_number))
        }
    }

    let mut fix = fixture();
    let input = cash_input(&fix, 2, dec!(500.00));
    let created = create(&mut fix, &input).unwrap();

    let zatca = ZatcaConfig {
        enabled: true,
        environment: ZatcaEnvironment::Sandbox,
        seller_name: "Khazna Trading".to_string(),
        tax_number: "300000000000003".to_string(),
        company_country: "SA".to_string(),
    };
    let payload = SalesService::compliance_payload(&created.invoice, &zatca);
    assert_eq!(payload.total_with_tax, dec!(1150.00));
    assert_eq!(payload.tax_total, dec!(150.00));

    let adapter = ZatcaAuthority::new(zatca, Generator, SandboxClient);
    let result = adapter.submit(&payload, SubmissionType::Reporting);
    assert_eq!(result.status, SubmissionStatus::Submitted);
    assert!(result.scannable_code.is_some());
}
