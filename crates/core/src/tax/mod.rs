//! Tax engine: effective-dated rates, multi-authority calculation, and
//! compliance adapters.
//!
//! Calculation walks the registered authorities for the document's country,
//! prices every applicable tax type with the rate in force on the document
//! date, and falls back to a flat legacy rate when no authority is
//! registered. Authority adapters (ZATCA) validate and submit documents for
//! compliance and produce scannable codes.

pub mod authority;
pub mod calculator;
pub mod rate;
pub mod types;

pub use calculator::{TaxCalculator, TaxRegistry};
pub use rate::resolve_rate;
pub use types::{
    ApplicableArea, CalculationKind, TaxAuthority, TaxCalculationResult, TaxLine, TaxLineRecord,
    TaxRate, TaxType,
};
