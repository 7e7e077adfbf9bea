//! In-memory store with snapshot transactions.

use std::collections::HashMap;

use chrono::NaiveDate;
use khazna_shared::types::{CustomerId, PayrollCycleId, ProductId, TaxAuthorityId, TaxTypeId};

use crate::accounts::{AccountDirectory, AccountType};
use crate::fiscal::FiscalPeriod;
use crate::ledger::types::PostedEntry;
use crate::tax::calculator::TaxRegistry;
use crate::tax::types::{TaxAuthority, TaxLineRecord, TaxRate, TaxType};

use super::{
    ChartAccount, Customer, Employee, Invoice, PayrollCycle, PayrollItem, PayrollTransaction,
    Product, ReceivableTransaction, StoreError, UnitOfWork,
};

#[derive(Debug, Clone, Default)]
struct State {
    accounts: Vec<ChartAccount>,
    fiscal_periods: Vec<FiscalPeriod>,
    tax_authorities: Vec<TaxAuthority>,
    tax_types: Vec<TaxType>,
    tax_rates: Vec<TaxRate>,
    products: Vec<Product>,
    customers: Vec<Customer>,
    employees: Vec<Employee>,
    ledger_entries: Vec<PostedEntry>,
    invoices: Vec<Invoice>,
    receivables: Vec<ReceivableTransaction>,
    tax_lines: Vec<TaxLineRecord>,
    payroll_cycles: Vec<PayrollCycle>,
    payroll_items: Vec<PayrollItem>,
    payroll_transactions: Vec<PayrollTransaction>,
    sequences: HashMap<String, u64>,
}

/// In-process store backing tests and embedded use.
///
/// `transaction` runs the closure against a cloned snapshot and adopts the
/// snapshot only on success, so a failing workflow leaves the store
/// untouched.
#[derive(Debug, Clone, Default)]
pub struct MemoryStore {
    state: State,
}

/// A pending transaction over a [`MemoryStore`] snapshot.
#[derive(Debug)]
pub struct MemoryTx {
    state: State,
}

impl MemoryStore {
    /// Creates an empty store.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Runs `f` transactionally: writes are kept only when `f` succeeds.
    pub fn transaction<T, E>(
        &mut self,
        f: impl FnOnce(&mut MemoryTx) -> Result<T, E>,
    ) -> Result<T, E> {
        let mut tx = MemoryTx {
            state: self.state.clone(),
        };
        let out = f(&mut tx)?;
        self.state = tx.state;
        Ok(out)
    }

    /// Inserts a chart account.
    pub fn seed_account(&mut self, account: ChartAccount) {
        self.state.accounts.push(account);
    }

    /// Inserts the standard chart used by the default role mappings.
    pub fn seed_default_chart(&mut self) {
        use AccountType::{Asset, Equity, Expense, Liability, Revenue};
        let rows: &[(&str, &str, AccountType)] = &[
            ("1110", "Cash", Asset),
            ("1120", "Accounts Receivable", Asset),
            ("1130", "Inventory", Asset),
            ("1210", "Fixed Assets", Asset),
            ("2110", "Accounts Payable", Liability),
            ("2120", "Salaries Payable", Liability),
            ("2130", "Payroll Deductions Payable", Liability),
            ("2210", "VAT Output", Liability),
            ("2220", "VAT Input", Liability),
            ("3100", "Capital", Equity),
            ("3200", "Retained Earnings", Equity),
            ("4100", "Sales Revenue", Revenue),
            ("4110", "Sales Discount", Revenue),
            ("4200", "Other Revenue", Revenue),
            ("5100", "Cost of Goods Sold", Expense),
            ("5210", "Operating Expenses", Expense),
            ("5220", "Salaries Expense", Expense),
            ("5300", "Depreciation Expense", Expense),
        ];
        for (code, name, account_type) in rows {
            self.seed_account(ChartAccount {
                id: khazna_shared::types::AccountId::new(),
                code: (*code).to_string(),
                name: (*name).to_string(),
                account_type: *account_type,
                parent_code: None,
                is_active: true,
            });
        }
    }

    /// Inserts a fiscal period.
    pub fn seed_fiscal_period(&mut self, period: FiscalPeriod) {
        self.state.fiscal_periods.push(period);
    }

    /// Inserts a product.
    pub fn seed_product(&mut self, product: Product) {
        self.state.products.push(product);
    }

    /// Inserts a customer.
    pub fn seed_customer(&mut self, customer: Customer) {
        self.state.customers.push(customer);
    }

    /// Inserts an employee.
    pub fn seed_employee(&mut self, employee: Employee) {
        self.state.employees.push(employee);
    }

    /// Inserts a tax authority.
    pub fn seed_tax_authority(&mut self, authority: TaxAuthority) {
        self.state.tax_authorities.push(authority);
    }

    /// Inserts a tax type.
    pub fn seed_tax_type(&mut self, tax_type: TaxType) {
        self.state.tax_types.push(tax_type);
    }

    /// Inserts a tax rate row.
    pub fn seed_tax_rate(&mut self, rate: TaxRate) {
        self.state.tax_rates.push(rate);
    }

    /// All posted ledger entries, in posting order.
    #[must_use]
    pub fn ledger_entries(&self) -> &[PostedEntry] {
        &self.state.ledger_entries
    }

    /// All persisted invoices.
    #[must_use]
    pub fn invoices(&self) -> &[Invoice] {
        &self.state.invoices
    }

    /// All receivable movements.
    #[must_use]
    pub fn receivables(&self) -> &[ReceivableTransaction] {
        &self.state.receivables
    }

    /// All tax audit rows.
    #[must_use]
    pub fn tax_lines(&self) -> &[TaxLineRecord] {
        &self.state.tax_lines
    }

    /// All payroll cycles.
    #[must_use]
    pub fn payroll_cycles(&self) -> &[PayrollCycle] {
        &self.state.payroll_cycles
    }

    /// Pay lines of one cycle.
    #[must_use]
    pub fn payroll_items(&self, cycle_id: PayrollCycleId) -> Vec<PayrollItem> {
        self.state
            .payroll_items
            .iter()
            .filter(|i| i.cycle_id == cycle_id)
            .cloned()
            .collect()
    }

    /// All payroll disbursements.
    #[must_use]
    pub fn payroll_transactions(&self) -> &[PayrollTransaction] {
        &self.state.payroll_transactions
    }

    /// Current state of a product.
    #[must_use]
    pub fn product(&self, id: ProductId) -> Option<&Product> {
        self.state.products.iter().find(|p| p.id == id)
    }

    /// Current state of a customer.
    #[must_use]
    pub fn customer(&self, id: CustomerId) -> Option<&Customer> {
        self.state.customers.iter().find(|c| c.id == id)
    }
}

impl State {
    fn is_leaf(&self, code: &str) -> bool {
        !self
            .accounts
            .iter()
            .any(|a| a.parent_code.as_deref() == Some(code))
    }
}

impl AccountDirectory for MemoryTx {
    fn find_leaf_account(
        &self,
        account_type: AccountType,
        pattern: Option<&str>,
    ) -> Option<String> {
        let mut codes: Vec<&str> = self
            .state
            .accounts
            .iter()
            .filter(|a| {
                a.is_active
                    && a.account_type == account_type
                    && self.state.is_leaf(&a.code)
                    && pattern.is_none_or(|p| a.name.contains(p) || a.code.contains(p))
            })
            .map(|a| a.code.as_str())
            .collect();
        codes.sort_unstable();
        codes.first().map(|c| (*c).to_string())
    }

    fn account_exists(&self, code: &str) -> bool {
        self.state
            .accounts
            .iter()
            .any(|a| a.is_active && a.code == code)
    }
}

impl TaxRegistry for MemoryTx {
    fn active_tax_authorities(&self, country_code: &str) -> Vec<TaxAuthority> {
        let mut authorities: Vec<TaxAuthority> = self
            .state
            .tax_authorities
            .iter()
            .filter(|a| a.is_active && a.country_code == country_code)
            .cloned()
            .collect();
        authorities.sort_by_key(|a| std::cmp::Reverse(a.priority));
        authorities
    }

    fn active_tax_types(&self, authority_id: TaxAuthorityId) -> Vec<TaxType> {
        self.state
            .tax_types
            .iter()
            .filter(|t| t.is_active && t.authority_id == authority_id)
            .cloned()
            .collect()
    }

    fn tax_rates(&self, tax_type_id: TaxTypeId) -> Vec<TaxRate> {
        self.state
            .tax_rates
            .iter()
            .filter(|r| r.tax_type_id == tax_type_id)
            .cloned()
            .collect()
    }
}

impl UnitOfWork for MemoryTx {
    fn fiscal_period_for(&self, date: NaiveDate) -> Option<FiscalPeriod> {
        self.state
            .fiscal_periods
            .iter()
            .find(|p| p.contains_date(date))
            .cloned()
    }

    fn next_sequence(&mut self, prefix: &str) -> String {
        let counter = self.state.sequences.entry(prefix.to_string()).or_insert(0);
        *counter += 1;
        format!("{prefix}-{:06}", *counter)
    }

    fn insert_ledger_entries(&mut self, entries: Vec<PostedEntry>) -> Result<(), StoreError> {
        self.state.ledger_entries.extend(entries);
        Ok(())
    }

    fn ledger_entries_for_voucher(&self, voucher_number: &str) -> Vec<PostedEntry> {
        self.state
            .ledger_entries
            .iter()
            .filter(|e| e.voucher_number == voucher_number)
            .cloned()
            .collect()
    }

    fn product(&self, id: ProductId) -> Result<Product, StoreError> {
        self.state
            .products
            .iter()
            .find(|p| p.id == id)
            .cloned()
            .ok_or(StoreError::NotFound {
                entity: "product",
                id: id.to_string(),
            })
    }

    fn update_product(&mut self, product: Product) -> Result<(), StoreError> {
        let slot = self
            .state
            .products
            .iter_mut()
            .find(|p| p.id == product.id)
            .ok_or(StoreError::NotFound {
                entity: "product",
                id: product.id.to_string(),
            })?;
        *slot = product;
        Ok(())
    }

    fn customer(&self, id: CustomerId) -> Result<Customer, StoreError> {
        self.state
            .customers
            .iter()
            .find(|c| c.id == id)
            .cloned()
            .ok_or(StoreError::NotFound {
                entity: "customer",
                id: id.to_string(),
            })
    }

    fn update_customer(&mut self, customer: Customer) -> Result<(), StoreError> {
        let slot = self
            .state
            .customers
            .iter_mut()
            .find(|c| c.id == customer.id)
            .ok_or(StoreError::NotFound {
                entity: "customer",
                id: customer.id.to_string(),
            })?;
        *slot = customer;
        Ok(())
    }

    fn insert_invoice(&mut self, invoice: Invoice) -> Result<(), StoreError> {
        if self.state.invoices.iter().any(|i| i.id == invoice.id) {
            return Err(StoreError::Duplicate {
                entity: "invoice",
                id: invoice.id.to_string(),
            });
        }
        self.state.invoices.push(invoice);
        Ok(())
    }

    fn insert_receivable(&mut self, tx: ReceivableTransaction) -> Result<(), StoreError> {
        self.state.receivables.push(tx);
        Ok(())
    }

    fn insert_tax_lines(&mut self, records: Vec<TaxLineRecord>) -> Result<(), StoreError> {
        self.state.tax_lines.extend(records);
        Ok(())
    }

    fn active_employees(&self) -> Vec<Employee> {
        self.state
            .employees
            .iter()
            .filter(|e| e.is_active)
            .cloned()
            .collect()
    }

    fn insert_payroll_cycle(&mut self, cycle: PayrollCycle) -> Result<(), StoreError> {
        if self.state.payroll_cycles.iter().any(|c| c.id == cycle.id) {
            return Err(StoreError::Duplicate {
                entity: "payroll cycle",
                id: cycle.id.to_string(),
            });
        }
        self.state.payroll_cycles.push(cycle);
        Ok(())
    }

    fn payroll_cycle(&self, id: PayrollCycleId) -> Result<PayrollCycle, StoreError> {
        self.state
            .payroll_cycles
            .iter()
            .find(|c| c.id == id)
            .cloned()
            .ok_or(StoreError::NotFound {
                entity: "payroll cycle",
                id: id.to_string(),
            })
    }

    fn update_payroll_cycle(&mut self, cycle: PayrollCycle) -> Result<(), StoreError> {
        let slot = self
            .state
            .payroll_cycles
            .iter_mut()
            .find(|c| c.id == cycle.id)
            .ok_or(StoreError::NotFound {
                entity: "payroll cycle",
                id: cycle.id.to_string(),
            })?;
        *slot = cycle;
        Ok(())
    }

    fn insert_payroll_item(&mut self, item: PayrollItem) -> Result<(), StoreError> {
        self.state.payroll_items.push(item);
        Ok(())
    }

    fn payroll_items(&self, cycle_id: PayrollCycleId) -> Vec<PayrollItem> {
        self.state
            .payroll_items
            .iter()
            .filter(|i| i.cycle_id == cycle_id)
            .cloned()
            .collect()
    }

    fn insert_payroll_transaction(&mut self, tx: PayrollTransaction) -> Result<(), StoreError> {
        self.state.payroll_transactions.push(tx);
        Ok(())
    }
}
