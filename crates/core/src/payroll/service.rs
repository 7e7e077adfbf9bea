//! Payroll cycle lifecycle: generate, approve, pay.

use chrono::NaiveDate;
use khazna_shared::types::{PayrollCycleId, PayrollItemId, UserId};
use rust_decimal::Decimal;
use uuid::Uuid;

use crate::accounts::{AccountResolver, AccountRole};
use crate::fiscal::PostingPrivilege;
use crate::ledger::{LedgerLine, LedgerPoster, SourceDocument, SourceType};
use crate::store::{
    PayrollCycle, PayrollItem, PayrollStatus, PayrollTransaction, UnitOfWork,
};

use super::error::PayrollError;
use super::types::GenerateCycleInput;

/// Sequence prefix for payroll accrual vouchers.
pub const ACCRUAL_PREFIX: &str = "PAY-ACCR";
/// Sequence prefix for payroll payment vouchers.
pub const PAYMENT_PREFIX: &str = "PAY-PMT";

/// Drives a payroll cycle through draft, approved, and paid.
///
/// Generation snapshots the active employees into pay lines without
/// touching the ledger. Approval posts the liability accrual dated at the
/// period end; payment settles the liability and records one disbursement
/// per employee.
pub struct PayrollService;

impl PayrollService {
    /// Generates a draft cycle from the active employees.
    pub fn generate<U: UnitOfWork + ?Sized>(
        uow: &mut U,
        input: &GenerateCycleInput,
    ) -> Result<PayrollCycle, PayrollError> {
        let employees: Vec<_> = uow
            .active_employees()
            .into_iter()
            .filter(|e| e.hired_on <= input.period_end)
            .collect();
        if employees.is_empty() {
            return Err(PayrollError::NoActiveEmployees);
        }

        let cycle_id = PayrollCycleId::new();
        let mut total_gross = Decimal::ZERO;
        let mut total_deductions = Decimal::ZERO;
        let mut total_net = Decimal::ZERO;

        let items: Vec<PayrollItem> = employees
            .iter()
            .map(|employee| {
                let allowances = employee.total_allowances();
                let deductions = employee.total_deductions();
                let gross = employee.basic_salary + allowances;
                let net = gross - deductions;
                total_gross += gross;
                total_deductions += deductions;
                total_net += net;
                PayrollItem {
                    id: PayrollItemId::new(),
                    cycle_id,
                    employee_id: employee.id,
                    basic_salary: employee.basic_salary,
                    total_allowances: allowances,
                    total_deductions: deductions,
                    gross_salary: gross,
                    net_salary: net,
                }
            })
            .collect();

        let cycle = PayrollCycle {
            id: cycle_id,
            name: input.name.clone(),
            period_start: input.period_start,
            period_end: input.period_end,
            status: PayrollStatus::Draft,
            created_by: input.created_by,
            approved_by: None,
            total_gross,
            total_deductions,
            total_net,
            accrual_voucher: None,
            payment_voucher: None,
        };
        uow.insert_payroll_cycle(cycle.clone())?;
        for item in items {
            uow.insert_payroll_item(item)?;
        }

        tracing::info!(
            cycle = %cycle.name,
            employees = employees.len(),
            gross = %total_gross,
            net = %total_net,
            "payroll cycle generated"
        );
        Ok(cycle)
    }

    /// Approves a draft cycle and posts the liability accrual.
    pub fn approve<U: UnitOfWork + ?Sized>(
        uow: &mut U,
        cycle_id: PayrollCycleId,
        approved_by: UserId,
    ) -> Result<PayrollCycle, PayrollError> {
        let mut cycle = uow.payroll_cycle(cycle_id)?;
        if cycle.status != PayrollStatus::Draft {
            return Err(PayrollError::InvalidTransition {
                from: cycle.status,
                required: PayrollStatus::Draft,
            });
        }

        let expense = Self::required_account(uow, AccountRole::SalariesExpense)?;
        let payable = Self::required_account(uow, AccountRole::SalariesPayable)?;

        let mut lines = vec![
            LedgerLine::debit(
                expense,
                cycle.total_gross,
                format!("Payroll {} salaries expense", cycle.name),
            ),
            LedgerLine::credit(
                payable,
                cycle.total_net,
                format!("Payroll {} net salaries payable", cycle.name),
            ),
        ];
        if cycle.total_deductions > Decimal::ZERO {
            let deductions =
                Self::required_account(uow, AccountRole::PayrollDeductionsPayable)?;
            lines.push(LedgerLine::credit(
                deductions,
                cycle.total_deductions,
                format!("Payroll {} withheld deductions", cycle.name),
            ));
        }

        let voucher_number = uow.next_sequence(ACCRUAL_PREFIX);
        let voucher_number = LedgerPoster::post(
            uow,
            &lines,
            SourceDocument::new(SourceType::PayrollAccrual, Some(cycle.id.into_inner())),
            Some(voucher_number),
            cycle.period_end,
            PostingPrivilege::Standard,
        )?;

        cycle.status = PayrollStatus::Approved;
        cycle.approved_by = Some(approved_by);
        cycle.accrual_voucher = Some(voucher_number.clone());
        uow.update_payroll_cycle(cycle.clone())?;

        tracing::info!(cycle = %cycle.name, voucher = %voucher_number, "payroll approved");
        Ok(cycle)
    }

    /// Pays an approved cycle: settles the liability and records one
    /// disbursement per employee.
    pub fn process_payment<U: UnitOfWork + ?Sized>(
        uow: &mut U,
        cycle_id: PayrollCycleId,
        payment_date: NaiveDate,
    ) -> Result<PayrollCycle, PayrollError> {
        let mut cycle = uow.payroll_cycle(cycle_id)?;
        if cycle.status != PayrollStatus::Approved {
            return Err(PayrollError::InvalidTransition {
                from: cycle.status,
                required: PayrollStatus::Approved,
            });
        }

        let payable = Self::required_account(uow, AccountRole::SalariesPayable)?;
        let cash = Self::required_account(uow, AccountRole::Cash)?;

        let lines = [
            LedgerLine::debit(
                payable,
                cycle.total_net,
                format!("Payroll {} settlement", cycle.name),
            ),
            LedgerLine::credit(
                cash,
                cycle.total_net,
                format!("Payroll {} disbursement", cycle.name),
            ),
        ];

        let voucher_number = uow.next_sequence(PAYMENT_PREFIX);
        let voucher_number = LedgerPoster::post(
            uow,
            &lines,
            SourceDocument::new(SourceType::PayrollPayment, Some(cycle.id.into_inner())),
            Some(voucher_number),
            payment_date,
            PostingPrivilege::Standard,
        )?;

        for item in uow.payroll_items(cycle_id) {
            uow.insert_payroll_transaction(PayrollTransaction {
                id: Uuid::now_v7(),
                cycle_id,
                employee_id: item.employee_id,
                amount: item.net_salary,
                transaction_date: payment_date,
                voucher_number: voucher_number.clone(),
            })?;
        }

        cycle.status = PayrollStatus::Paid;
        cycle.payment_voucher = Some(voucher_number.clone());
        uow.update_payroll_cycle(cycle.clone())?;

        tracing::info!(cycle = %cycle.name, voucher = %voucher_number, "payroll paid");
        Ok(cycle)
    }

    fn required_account<U: UnitOfWork + ?Sized>(
        uow: &U,
        role: AccountRole,
    ) -> Result<String, PayrollError> {
        AccountResolver::resolve_existing(uow, role)
            .ok_or(PayrollError::MissingAccountMapping(role))
    }
}
