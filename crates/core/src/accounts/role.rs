//! Semantic account roles and their resolution metadata.

use serde::{Deserialize, Serialize};
use std::fmt;

/// Ledger account classification.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum AccountType {
    /// Asset accounts (debit-normal).
    Asset,
    /// Liability accounts (credit-normal).
    Liability,
    /// Equity accounts (credit-normal).
    Equity,
    /// Revenue accounts (credit-normal).
    Revenue,
    /// Expense accounts (debit-normal).
    Expense,
}

impl fmt::Display for AccountType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Asset => "asset",
            Self::Liability => "liability",
            Self::Equity => "equity",
            Self::Revenue => "revenue",
            Self::Expense => "expense",
        };
        write!(f, "{s}")
    }
}

/// Semantic account role used by the orchestrators.
///
/// Every role carries the account type it lives under, an ordered list of
/// bilingual name patterns, and a static default code for when the chart
/// has no matching account. New roles must register all three.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum AccountRole {
    /// Cash on hand / petty cash.
    Cash,
    /// Trade receivables.
    AccountsReceivable,
    /// Inventory asset.
    Inventory,
    /// Property and equipment.
    FixedAssets,
    /// Trade payables.
    AccountsPayable,
    /// VAT collected on sales.
    OutputVat,
    /// VAT paid on purchases.
    InputVat,
    /// Owner capital.
    Capital,
    /// Retained earnings.
    RetainedEarnings,
    /// Sales revenue.
    SalesRevenue,
    /// Sales discounts (contra-revenue, kept under revenue in this chart).
    SalesDiscount,
    /// Other operating revenue.
    OtherRevenue,
    /// Cost of goods sold.
    CostOfGoodsSold,
    /// General operating expenses.
    OperatingExpenses,
    /// Salaries and wages expense.
    SalariesExpense,
    /// Net salaries owed to employees.
    SalariesPayable,
    /// Withheld payroll deductions owed to external agencies.
    PayrollDeductionsPayable,
    /// Depreciation expense.
    DepreciationExpense,
}

impl AccountRole {
    /// All roles, for exhaustive default-registration checks.
    pub const ALL: [Self; 18] = [
        Self::Cash,
        Self::AccountsReceivable,
        Self::Inventory,
        Self::FixedAssets,
        Self::AccountsPayable,
        Self::OutputVat,
        Self::InputVat,
        Self::Capital,
        Self::RetainedEarnings,
        Self::SalesRevenue,
        Self::SalesDiscount,
        Self::OtherRevenue,
        Self::CostOfGoodsSold,
        Self::OperatingExpenses,
        Self::SalariesExpense,
        Self::SalariesPayable,
        Self::PayrollDeductionsPayable,
        Self::DepreciationExpense,
    ];

    /// The account type this role resolves within.
    #[must_use]
    pub fn account_type(&self) -> AccountType {
        match self {
            Self::Cash | Self::AccountsReceivable | Self::Inventory | Self::FixedAssets => {
                AccountType::Asset
            }
            Self::AccountsPayable
            | Self::OutputVat
            | Self::InputVat
            | Self::SalariesPayable
            | Self::PayrollDeductionsPayable => AccountType::Liability,
            Self::Capital | Self::RetainedEarnings => AccountType::Equity,
            Self::SalesRevenue | Self::SalesDiscount | Self::OtherRevenue => AccountType::Revenue,
            Self::CostOfGoodsSold
            | Self::OperatingExpenses
            | Self::SalariesExpense
            | Self::DepreciationExpense => AccountType::Expense,
        }
    }

    /// Ordered name/code patterns to try, Arabic chart names first.
    #[must_use]
    pub fn name_patterns(&self) -> &'static [&'static str] {
        match self {
            Self::Cash => &["النقدية", "Cash"],
            Self::AccountsReceivable => &["الذمم المدينة", "Receivable"],
            Self::Inventory => &["المخزون", "Inventory"],
            Self::FixedAssets => &["المعدات", "Fixed"],
            Self::AccountsPayable => &["الذمم الدائنة", "Payable"],
            Self::OutputVat => &["مخرجات", "Output"],
            Self::InputVat => &["مدخلات", "Input"],
            Self::Capital => &["رأس المال", "Capital"],
            Self::RetainedEarnings => &["الأرباح المحتجزة", "Retained"],
            Self::SalesRevenue => &["4101", "مبيعات", "Sales"],
            Self::SalesDiscount => &["خصم المبيعات", "Discount"],
            Self::OtherRevenue => &["إيرادات أخرى", "Other"],
            Self::CostOfGoodsSold => &["تكلفة البضاعة", "COGS"],
            Self::OperatingExpenses => &["مصروفات متنوعة", "Operating", "5290", "5210"],
            Self::SalariesExpense => &["مرتبات", "Salary"],
            Self::SalariesPayable => &["رواتب مستحقة", "Salary Payable"],
            Self::PayrollDeductionsPayable => &["استقطاعات", "Deductions Payable"],
            Self::DepreciationExpense => &["الإهلاك", "Depreciation"],
        }
    }

    /// Static fallback code used when no chart account matches.
    #[must_use]
    pub fn default_code(&self) -> &'static str {
        match self {
            Self::Cash => "1110",
            Self::AccountsReceivable => "1120",
            Self::Inventory => "1130",
            Self::FixedAssets => "1210",
            Self::AccountsPayable => "2110",
            Self::SalariesPayable => "2120",
            Self::PayrollDeductionsPayable => "2130",
            Self::OutputVat => "2210",
            Self::InputVat => "2220",
            Self::Capital => "3100",
            Self::RetainedEarnings => "3200",
            Self::SalesRevenue => "4100",
            Self::SalesDiscount => "4110",
            Self::OtherRevenue => "4200",
            Self::CostOfGoodsSold => "5100",
            Self::OperatingExpenses => "5210",
            Self::SalariesExpense => "5220",
            Self::DepreciationExpense => "5300",
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;

    #[test]
    fn test_every_role_has_default_and_patterns() {
        for role in AccountRole::ALL {
            assert!(!role.default_code().is_empty(), "{role:?} missing default");
            assert!(
                !role.name_patterns().is_empty(),
                "{role:?} missing patterns"
            );
        }
    }

    #[test]
    fn test_default_codes_are_unique() {
        let mut codes: Vec<&str> = AccountRole::ALL.iter().map(|r| r.default_code()).collect();
        codes.sort_unstable();
        codes.dedup();
        assert_eq!(codes.len(), AccountRole::ALL.len());
    }

    #[rstest]
    #[case(AccountRole::Cash, AccountType::Asset)]
    #[case(AccountRole::OutputVat, AccountType::Liability)]
    #[case(AccountRole::SalesRevenue, AccountType::Revenue)]
    #[case(AccountRole::CostOfGoodsSold, AccountType::Expense)]
    #[case(AccountRole::Capital, AccountType::Equity)]
    #[case(AccountRole::PayrollDeductionsPayable, AccountType::Liability)]
    fn test_role_account_types(#[case] role: AccountRole, #[case] expected: AccountType) {
        assert_eq!(role.account_type(), expected);
    }
}
