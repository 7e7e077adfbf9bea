//! Tax domain types.

use chrono::NaiveDate;
use khazna_shared::types::{TaxAuthorityId, TaxLineId, TaxRateId, TaxTypeId};
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use uuid::Uuid;

/// How a tax type turns a taxable base into an amount.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum CalculationKind {
    /// Amount is `taxable * rate`, rounded to tax precision.
    Percentage,
    /// Amount is the rate row's fixed amount; the reported rate is zero.
    FixedAmount,
}

/// Which side of trade a tax type applies to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum ApplicableArea {
    /// Output taxes on sales documents.
    Sales,
    /// Input taxes on purchase documents.
    Purchases,
}

/// A tax authority registered for one or more countries.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaxAuthority {
    /// Authority identifier.
    pub id: TaxAuthorityId,
    /// Short code, e.g. "ZATCA".
    pub code: String,
    /// Display name.
    pub name: String,
    /// ISO country code the authority governs.
    pub country_code: String,
    /// Higher-priority authorities are consulted first.
    pub priority: i32,
    /// Inactive authorities are skipped during calculation.
    pub is_active: bool,
}

/// A tax type under an authority, e.g. standard-rate VAT.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaxType {
    /// Tax type identifier.
    pub id: TaxTypeId,
    /// Owning authority.
    pub authority_id: TaxAuthorityId,
    /// Short code, e.g. "VAT".
    pub code: String,
    /// Display name.
    pub name: String,
    /// Percentage or fixed-amount calculation.
    pub calculation_kind: CalculationKind,
    /// True when the type applies to sales documents.
    pub applies_to_sales: bool,
    /// True when the type applies to purchase documents.
    pub applies_to_purchases: bool,
    /// Ledger account the tax posts to; `None` defers to the caller's
    /// configured output account.
    pub gl_account_code: Option<String>,
    /// Inactive types are skipped during calculation.
    pub is_active: bool,
}

impl TaxType {
    /// Whether this type participates in calculations for `area`.
    #[must_use]
    pub fn applies_to(&self, area: ApplicableArea) -> bool {
        match area {
            ApplicableArea::Sales => self.applies_to_sales,
            ApplicableArea::Purchases => self.applies_to_purchases,
        }
    }
}

/// An effective-dated rate row for a tax type.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct TaxRate {
    /// Rate identifier.
    pub id: TaxRateId,
    /// Owning tax type.
    pub tax_type_id: TaxTypeId,
    /// Fractional rate, e.g. 0.15 for 15%. Ignored for fixed-amount types.
    pub rate: Decimal,
    /// Fixed amount for fixed-amount types.
    pub fixed_amount: Decimal,
    /// First date the rate applies.
    pub effective_from: NaiveDate,
    /// Last date the rate applies; `None` means open-ended.
    pub effective_to: Option<NaiveDate>,
    /// Fallback rate when no row covers the calculation date.
    pub is_default: bool,
    /// Inactive rates are never selected.
    pub is_active: bool,
}

/// One tax computed for a document.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaxLine {
    /// Tax type identifier, `None` for the legacy fallback line.
    pub tax_type_id: Option<TaxTypeId>,
    /// Rate row identifier, `None` for the legacy fallback line.
    pub tax_rate_id: Option<TaxRateId>,
    /// Authority code, "LEGACY" for the fallback line.
    pub authority_code: String,
    /// Tax type code.
    pub tax_code: String,
    /// Tax type name.
    pub tax_name: String,
    /// Fractional rate applied. Zero for fixed-amount taxes.
    pub rate: Decimal,
    /// Taxable base the line was computed from.
    pub taxable_amount: Decimal,
    /// Computed tax amount.
    pub tax_amount: Decimal,
    /// Account override carried from the tax type, when it names one.
    pub gl_account_code: Option<String>,
}

/// Ordered result of a tax calculation over one document.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
pub struct TaxCalculationResult {
    /// Tax lines in authority/type iteration order.
    pub lines: Vec<TaxLine>,
    /// Sum of line amounts.
    pub total_tax: Decimal,
    /// Sum of line taxable bases.
    pub total_taxable: Decimal,
}

impl TaxCalculationResult {
    /// Appends a line and keeps the totals in sync.
    pub fn add_line(&mut self, line: TaxLine) {
        self.total_tax += line.tax_amount;
        self.total_taxable += line.taxable_amount;
        self.lines.push(line);
    }

    /// True when no tax applied.
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.lines.is_empty()
    }

    /// Builds persistable audit records for registry-backed lines.
    ///
    /// Legacy fallback lines carry no registry identifiers and are not
    /// persisted as audit rows.
    #[must_use]
    pub fn audit_records(&self, document_type: &str, document_id: Uuid) -> Vec<TaxLineRecord> {
        self.lines
            .iter()
            .enumerate()
            .filter_map(|(idx, line)| {
                let tax_type_id = line.tax_type_id?;
                Some(TaxLineRecord {
                    id: TaxLineId::new(),
                    document_type: document_type.to_string(),
                    document_id,
                    tax_type_id,
                    tax_rate_id: line.tax_rate_id,
                    rate: line.rate,
                    taxable_amount: line.taxable_amount,
                    tax_amount: line.tax_amount,
                    line_order: idx as u32,
                    metadata: serde_json::json!({
                        "authority_code": line.authority_code,
                        "tax_code": line.tax_code,
                    }),
                })
            })
            .collect()
    }
}

/// A persisted per-document tax audit row.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct TaxLineRecord {
    /// Audit row identifier.
    pub id: TaxLineId,
    /// Source document type, e.g. "invoice".
    pub document_type: String,
    /// Source document identifier.
    pub document_id: Uuid,
    /// Tax type that produced the line.
    pub tax_type_id: TaxTypeId,
    /// Rate row used, when one was effective.
    pub tax_rate_id: Option<TaxRateId>,
    /// Fractional rate applied.
    pub rate: Decimal,
    /// Taxable base.
    pub taxable_amount: Decimal,
    /// Computed amount.
    pub tax_amount: Decimal,
    /// Position within the document's tax lines.
    pub line_order: u32,
    /// Free-form context captured at calculation time.
    pub metadata: serde_json::Value,
}

#[cfg(test)]
mod tests {
    use super::*;
    use rust_decimal_macros::dec;

    fn line(amount: Decimal, with_ids: bool) -> TaxLine {
        TaxLine {
            tax_type_id: with_ids.then(TaxTypeId::new),
            tax_rate_id: with_ids.then(TaxRateId::new),
            authority_code: if with_ids { "ZATCA" } else { "LEGACY" }.to_string(),
            tax_code: "VAT".to_string(),
            tax_name: "Value Added Tax".to_string(),
            rate: dec!(0.15),
            taxable_amount: dec!(100),
            tax_amount: amount,
            gl_account_code: None,
        }
    }

    #[test]
    fn test_add_line_tracks_total() {
        let mut result = TaxCalculationResult::default();
        result.add_line(line(dec!(15.00), true));
        result.add_line(line(dec!(7.50), true));
        assert_eq!(result.total_tax, dec!(22.50));
        assert_eq!(result.total_taxable, dec!(200));
        assert_eq!(result.lines.len(), 2);
    }

    #[test]
    fn test_audit_records_skip_legacy_lines() {
        let mut result = TaxCalculationResult::default();
        result.add_line(line(dec!(15.00), true));
        result.add_line(line(dec!(15.00), false));

        let records = result.audit_records("invoice", Uuid::now_v7());
        assert_eq!(records.len(), 1);
        assert_eq!(records[0].line_order, 0);
        assert_eq!(records[0].metadata["authority_code"], "ZATCA");
    }

    #[test]
    fn test_applies_to() {
        let tax_type = TaxType {
            id: TaxTypeId::new(),
            authority_id: TaxAuthorityId::new(),
            code: "VAT".to_string(),
            name: "VAT".to_string(),
            calculation_kind: CalculationKind::Percentage,
            applies_to_sales: true,
            applies_to_purchases: false,
            gl_account_code: None,
            is_active: true,
        };
        assert!(tax_type.applies_to(ApplicableArea::Sales));
        assert!(!tax_type.applies_to(ApplicableArea::Purchases));
    }
}
