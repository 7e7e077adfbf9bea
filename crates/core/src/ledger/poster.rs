//! Voucher posting and reversal.

use chrono::NaiveDate;
use khazna_shared::types::LedgerEntryId;

use crate::fiscal::PostingPrivilege;
use crate::store::UnitOfWork;

use super::error::LedgerError;
use super::types::{LedgerLine, PostedEntry, SourceDocument, SourceType};
use super::validation::validate_lines;

/// Sequence prefix for journal vouchers.
pub const VOUCHER_PREFIX: &str = "VOU";

/// Posts balanced vouchers into the ledger.
///
/// Posting is all-or-nothing: validation, account lookup, and the fiscal
/// guard all run before any entry is written, and callers invoke the
/// poster inside a unit-of-work transaction so a later failure in the same
/// workflow discards the voucher too.
pub struct LedgerPoster;

impl LedgerPoster {
    /// Validates and posts a voucher, returning its voucher number.
    ///
    /// When `voucher_number` is `None` the next number in the voucher
    /// sequence is assigned.
    pub fn post<U: UnitOfWork + ?Sized>(
        uow: &mut U,
        lines: &[LedgerLine],
        source: SourceDocument,
        voucher_number: Option<String>,
        posting_date: NaiveDate,
        privilege: PostingPrivilege,
    ) -> Result<String, LedgerError> {
        let totals = validate_lines(lines)?;

        let period = uow
            .fiscal_period_for(posting_date)
            .ok_or(LedgerError::NoFiscalPeriod(posting_date))?;
        period.validate_posting(privilege)?;

        for line in lines {
            if !uow.account_exists(&line.account_code) {
                return Err(LedgerError::AccountNotFound(line.account_code.clone()));
            }
        }

        let voucher_number =
            voucher_number.unwrap_or_else(|| uow.next_sequence(VOUCHER_PREFIX));

        let entries: Vec<PostedEntry> = lines
            .iter()
            .map(|line| PostedEntry {
                id: LedgerEntryId::new(),
                voucher_number: voucher_number.clone(),
                account_code: line.account_code.clone(),
                entry_type: line.entry_type,
                amount: line.amount,
                description: line.description.clone(),
                posting_date,
                fiscal_period_id: period.id,
                source_type: source.source_type,
                source_id: source.source_id,
            })
            .collect();
        uow.insert_ledger_entries(entries)?;

        tracing::info!(
            voucher = %voucher_number,
            lines = lines.len(),
            debit = %totals.debit,
            credit = %totals.credit,
            source = ?source.source_type,
            "voucher posted"
        );
        Ok(voucher_number)
    }

    /// Posts a voucher that mirrors an existing one with sides flipped.
    ///
    /// With `description` unset, each line narrates "Reversal of
    /// {voucher}: {original narration}".
    pub fn reverse<U: UnitOfWork + ?Sized>(
        uow: &mut U,
        voucher_number: &str,
        description: Option<&str>,
        reversal_date: NaiveDate,
        privilege: PostingPrivilege,
    ) -> Result<String, LedgerError> {
        let entries = uow.ledger_entries_for_voucher(voucher_number);
        if entries.is_empty() {
            return Err(LedgerError::VoucherNotFound(voucher_number.to_string()));
        }

        let source_id = entries[0].source_id;
        let lines: Vec<LedgerLine> = entries
            .iter()
            .map(|entry| LedgerLine {
                account_code: entry.account_code.clone(),
                entry_type: entry.entry_type.flipped(),
                amount: entry.amount,
                description: description.map_or_else(
                    || format!("Reversal of {voucher_number}: {}", entry.description),
                    ToString::to_string,
                ),
            })
            .collect();

        Self::post(
            uow,
            &lines,
            SourceDocument::new(SourceType::Reversal, source_id),
            None,
            reversal_date,
            privilege,
        )
    }
}
