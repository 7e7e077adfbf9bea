//! Double-entry voucher validation and posting.
//!
//! A voucher is a set of lines that must balance within one cent before it
//! may post. Posting resolves the fiscal period for the posting date and
//! enforces its lock and close state; reversal posts a mirror voucher with
//! the sides flipped.

pub mod error;
pub mod poster;
pub mod types;
pub mod validation;

pub use error::LedgerError;
pub use poster::{LedgerPoster, VOUCHER_PREFIX};
pub use types::{
    EntryType, LedgerLine, PostedEntry, SourceDocument, SourceType, VoucherTotals,
    BALANCE_TOLERANCE,
};
pub use validation::validate_lines;
