//! Account resolution: ordered pattern tiers, then static defaults.

use std::collections::HashMap;

use super::role::{AccountRole, AccountType};

/// Read access to the chart of accounts.
///
/// Implementations must only consider active leaf accounts (accounts no
/// other account names as parent) and return the match with the lowest
/// account code when several qualify.
pub trait AccountDirectory {
    /// Finds the first active leaf account of `account_type` whose name or
    /// code contains `pattern` (case-sensitive substring, both languages).
    /// With `None`, finds the first active leaf account of the type.
    fn find_leaf_account(&self, account_type: AccountType, pattern: Option<&str>)
        -> Option<String>;

    /// Returns true if an active account with this exact code exists.
    fn account_exists(&self, code: &str) -> bool;
}

/// Maps semantic account roles to concrete ledger account codes.
///
/// Resolution is an explicit strategy list: every name pattern of the role
/// in order, then the static default. `resolve` never fails; callers that
/// treat an unmapped role as a configuration defect use `resolve_existing`.
pub struct AccountResolver;

impl AccountResolver {
    /// Resolves a role to an account code, falling back to the static
    /// default when the chart has no matching account.
    #[must_use]
    pub fn resolve<D: AccountDirectory + ?Sized>(directory: &D, role: AccountRole) -> String {
        if let Some(code) = Self::pattern_match(directory, role) {
            return code;
        }
        tracing::warn!(
            role = ?role,
            default = role.default_code(),
            "no chart account matched role, using static default"
        );
        role.default_code().to_string()
    }

    /// Resolves a role only to an account that actually exists.
    ///
    /// The static default is accepted only when the directory confirms the
    /// code. Returns `None` when the role is unmapped, which fail-hard
    /// callers (payroll posting) turn into a blocking error.
    #[must_use]
    pub fn resolve_existing<D: AccountDirectory + ?Sized>(
        directory: &D,
        role: AccountRole,
    ) -> Option<String> {
        if let Some(code) = Self::pattern_match(directory, role) {
            return Some(code);
        }
        let default = role.default_code();
        if directory.account_exists(default) {
            return Some(default.to_string());
        }
        None
    }

    /// Resolves every role the orchestrators use in one pass.
    #[must_use]
    pub fn resolve_all<D: AccountDirectory + ?Sized>(
        directory: &D,
    ) -> HashMap<AccountRole, String> {
        AccountRole::ALL
            .iter()
            .map(|role| (*role, Self::resolve(directory, *role)))
            .collect()
    }

    /// Returns the code unchanged when it names an active account.
    #[must_use]
    pub fn validate_code<D: AccountDirectory + ?Sized>(
        directory: &D,
        code: &str,
    ) -> Option<String> {
        directory.account_exists(code).then(|| code.to_string())
    }

    fn pattern_match<D: AccountDirectory + ?Sized>(
        directory: &D,
        role: AccountRole,
    ) -> Option<String> {
        let account_type = role.account_type();
        role.name_patterns()
            .iter()
            .find_map(|pattern| directory.find_leaf_account(account_type, Some(pattern)))
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    /// Minimal directory backed by (type, name, code) rows.
    struct FakeDirectory {
        rows: Vec<(AccountType, String, String)>,
    }

    impl FakeDirectory {
        fn new(rows: &[(AccountType, &str, &str)]) -> Self {
            Self {
                rows: rows
                    .iter()
                    .map(|(t, n, c)| (*t, (*n).to_string(), (*c).to_string()))
                    .collect(),
            }
        }
    }

    impl AccountDirectory for FakeDirectory {
        fn find_leaf_account(
            &self,
            account_type: AccountType,
            pattern: Option<&str>,
        ) -> Option<String> {
            let mut matches: Vec<&(AccountType, String, String)> = self
                .rows
                .iter()
                .filter(|(t, name, code)| {
                    *t == account_type
                        && pattern.is_none_or(|p| name.contains(p) || code.contains(p))
                })
                .collect();
            matches.sort_by(|a, b| a.2.cmp(&b.2));
            matches.first().map(|(_, _, code)| code.clone())
        }

        fn account_exists(&self, code: &str) -> bool {
            self.rows.iter().any(|(_, _, c)| c == code)
        }
    }

    #[test]
    fn test_pattern_match_preferred_over_default() {
        let dir = FakeDirectory::new(&[(AccountType::Asset, "Main Cash Box", "1010")]);
        assert_eq!(AccountResolver::resolve(&dir, AccountRole::Cash), "1010");
    }

    #[test]
    fn test_arabic_pattern_matches_first() {
        let dir = FakeDirectory::new(&[
            (AccountType::Asset, "النقدية الرئيسية", "1005"),
            (AccountType::Asset, "Cash Drawer", "1010"),
        ]);
        // Arabic pattern is first in the tier list, so 1005 wins even
        // though 1010 also matches a later pattern.
        assert_eq!(AccountResolver::resolve(&dir, AccountRole::Cash), "1005");
    }

    #[test]
    fn test_lowest_code_wins_within_a_tier() {
        let dir = FakeDirectory::new(&[
            (AccountType::Asset, "Cash B", "1112"),
            (AccountType::Asset, "Cash A", "1111"),
        ]);
        assert_eq!(AccountResolver::resolve(&dir, AccountRole::Cash), "1111");
    }

    #[test]
    fn test_static_default_when_no_match() {
        let dir = FakeDirectory::new(&[]);
        assert_eq!(AccountResolver::resolve(&dir, AccountRole::Cash), "1110");
        assert_eq!(
            AccountResolver::resolve(&dir, AccountRole::OutputVat),
            "2210"
        );
    }

    #[test]
    fn test_resolve_never_fails_for_any_role() {
        let dir = FakeDirectory::new(&[]);
        for role in AccountRole::ALL {
            assert!(!AccountResolver::resolve(&dir, role).is_empty());
        }
    }

    #[test]
    fn test_resolve_existing_requires_real_account() {
        let empty = FakeDirectory::new(&[]);
        assert_eq!(
            AccountResolver::resolve_existing(&empty, AccountRole::SalariesExpense),
            None
        );

        let seeded = FakeDirectory::new(&[(AccountType::Expense, "Misc expense", "5220")]);
        // No pattern match, but the default code exists in the chart.
        assert_eq!(
            AccountResolver::resolve_existing(&seeded, AccountRole::SalariesExpense),
            Some("5220".to_string())
        );
    }

    #[test]
    fn test_resolve_existing_prefers_pattern_match() {
        let dir = FakeDirectory::new(&[(AccountType::Expense, "Salary Expense", "5225")]);
        assert_eq!(
            AccountResolver::resolve_existing(&dir, AccountRole::SalariesExpense),
            Some("5225".to_string())
        );
    }

    #[test]
    fn test_resolve_all_covers_every_role() {
        let map = AccountResolver::resolve_all(&FakeDirectory::new(&[]));
        assert_eq!(map.len(), AccountRole::ALL.len());
    }

    #[test]
    fn test_validate_code() {
        let dir = FakeDirectory::new(&[(AccountType::Asset, "Cash", "1110")]);
        assert_eq!(
            AccountResolver::validate_code(&dir, "1110"),
            Some("1110".to_string())
        );
        assert_eq!(AccountResolver::validate_code(&dir, "9999"), None);
    }
}
