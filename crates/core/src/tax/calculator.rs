//! Multi-authority tax calculation.

use chrono::NaiveDate;
use khazna_shared::config::AccountingConfig;
use khazna_shared::types::money::{round_money, round_tax};
use khazna_shared::types::{TaxAuthorityId, TaxTypeId};
use rust_decimal::Decimal;

use super::rate::resolve_rate;
use super::types::{
    ApplicableArea, CalculationKind, TaxAuthority, TaxCalculationResult, TaxLine, TaxRate, TaxType,
};

/// Read access to the registered tax configuration.
pub trait TaxRegistry {
    /// Active authorities governing `country_code`, highest priority first.
    fn active_tax_authorities(&self, country_code: &str) -> Vec<TaxAuthority>;

    /// Active tax types under an authority.
    fn active_tax_types(&self, authority_id: TaxAuthorityId) -> Vec<TaxType>;

    /// All rate rows for a tax type, active or not.
    fn tax_rates(&self, tax_type_id: TaxTypeId) -> Vec<TaxRate>;
}

/// Computes the taxes applicable to a document.
///
/// Only the primary authority (highest priority) for the country is
/// consulted; each of its active tax types for the requested area
/// contributes at most one line, priced by its rate row in force on the
/// calculation date. When no authority is registered for the country the
/// calculator falls back to a single flat-rate legacy line so documents
/// are never silently untaxed.
#[derive(Debug, Clone)]
pub struct TaxCalculator {
    legacy_rate: Decimal,
}

impl TaxCalculator {
    /// Creates a calculator with an explicit legacy fallback rate.
    #[must_use]
    pub fn new(legacy_rate: Decimal) -> Self {
        Self { legacy_rate }
    }

    /// Creates a calculator from the accounting configuration.
    #[must_use]
    pub fn from_config(config: &AccountingConfig) -> Self {
        Self::new(config.vat_rate)
    }

    /// Calculates all taxes on `taxable_amount` for the given country,
    /// date, and document area.
    #[must_use]
    pub fn calculate<R: TaxRegistry + ?Sized>(
        &self,
        registry: &R,
        taxable_amount: Decimal,
        country_code: &str,
        as_of: NaiveDate,
        area: ApplicableArea,
    ) -> TaxCalculationResult {
        let authorities = registry.active_tax_authorities(country_code);
        let Some(authority) = authorities.first() else {
            tracing::debug!(
                country = country_code,
                "no tax authority registered, using legacy rate"
            );
            return self.calculate_legacy(taxable_amount);
        };

        let mut result = TaxCalculationResult::default();
        for tax_type in registry.active_tax_types(authority.id) {
            if !tax_type.applies_to(area) {
                continue;
            }
            let rates = registry.tax_rates(tax_type.id);
            let Some(rate_row) = resolve_rate(&rates, as_of) else {
                tracing::warn!(
                    tax_type = %tax_type.code,
                    %as_of,
                    "tax type has no rate in force, skipping"
                );
                continue;
            };

            let (rate, tax_amount) = match tax_type.calculation_kind {
                CalculationKind::Percentage => {
                    (rate_row.rate, round_tax(taxable_amount * rate_row.rate))
                }
                CalculationKind::FixedAmount => (Decimal::ZERO, rate_row.fixed_amount),
            };

            // Zero-rated taxes still emit a line for compliance records.
            if tax_amount > Decimal::ZERO || rate.is_zero() {
                result.add_line(TaxLine {
                    tax_type_id: Some(tax_type.id),
                    tax_rate_id: Some(rate_row.id),
                    authority_code: authority.code.clone(),
                    tax_code: tax_type.code.clone(),
                    tax_name: tax_type.name.clone(),
                    rate,
                    taxable_amount,
                    tax_amount,
                    gl_account_code: tax_type.gl_account_code.clone(),
                });
            }
        }
        result
    }

    /// Flat-rate fallback used when no authority governs the country.
    #[must_use]
    pub fn calculate_legacy(&self, taxable_amount: Decimal) -> TaxCalculationResult {
        let mut result = TaxCalculationResult::default();
        result.add_line(TaxLine {
            tax_type_id: None,
            tax_rate_id: None,
            authority_code: "LEGACY".to_string(),
            tax_code: "VAT".to_string(),
            tax_name: "Value Added Tax".to_string(),
            rate: self.legacy_rate,
            taxable_amount,
            tax_amount: round_money(taxable_amount * self.legacy_rate),
            gl_account_code: None,
        });
        result
    }
}
