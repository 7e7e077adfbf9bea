//! Tax authority compliance adapters.
//!
//! An adapter takes a finalized document, validates it against the
//! authority's rules, produces a scannable code, and submits it to the
//! authority's endpoint. The ZATCA adapter is the only implementation;
//! the trait keeps orchestrators independent of any one authority.

pub mod tlv;
pub mod zatca;

use chrono::{DateTime, Utc};
use khazna_shared::types::InvoiceId;
use rust_decimal::Decimal;
use serde::{Deserialize, Serialize};
use thiserror::Error;

pub use tlv::{QrField, TlvError};
pub use zatca::{DocumentGenerator, SandboxClient, SubmissionClient, ZatcaAuthority};

/// Compliance-relevant fields of a finalized document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct CompliancePayload {
    /// Source invoice.
    pub invoice_id: InvoiceId,
    /// Human-facing document number.
    pub invoice_number: String,
    /// Issue timestamp.
    pub issued_at: DateTime<Utc>,
    /// Registered seller name.
    pub seller_name: String,
    /// Seller tax registration number.
    pub seller_tax_number: String,
    /// Number of line items on the document.
    pub line_count: usize,
    /// Grand total including tax.
    pub total_with_tax: Decimal,
    /// Total tax on the document.
    pub tax_total: Decimal,
}

/// Everything the authority receives for one document.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct ComplianceArtifacts {
    /// Serialized document body.
    pub document: String,
    /// Hex SHA-256 of the document body.
    pub document_hash: String,
    /// Base64 TLV code for the document's QR.
    pub scannable_code: String,
}

/// How a document is submitted to the authority.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SubmissionType {
    /// After-the-fact reporting of simplified documents.
    Reporting,
    /// Pre-issuance clearance of standard documents.
    Clearance,
}

/// Authority verdict on a submission.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum SubmissionStatus {
    /// The authority accepted the document.
    Submitted,
    /// The document failed validation or transport.
    Rejected,
}

/// Outcome of a submission attempt.
///
/// Submission never raises: every failure is normalized into a rejected
/// result so the calling workflow can record it and continue.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmissionResult {
    /// Accepted or rejected.
    pub status: SubmissionStatus,
    /// Authority-assigned identifier, present when accepted.
    pub external_id: Option<String>,
    /// Base64 TLV code for the document's QR, present when accepted.
    pub scannable_code: Option<String>,
    /// Failure detail, present when rejected.
    pub error_message: Option<String>,
}

impl SubmissionResult {
    /// Builds a rejected result from a failure message.
    #[must_use]
    pub fn rejected(message: impl Into<String>) -> Self {
        Self {
            status: SubmissionStatus::Rejected,
            external_id: None,
            scannable_code: None,
            error_message: Some(message.into()),
        }
    }
}

/// Adapter failures surfaced to callers of `validate` and
/// `compliance_artifacts`.
#[derive(Debug, Error)]
pub enum AdapterError {
    /// The payload violates the authority's document rules.
    #[error("document failed authority validation: {}", errors.join("; "))]
    Invalid {
        /// Every rule violation found, not just the first.
        errors: Vec<String>,
    },
    /// The document generator failed.
    #[error("document generation failed: {0}")]
    Document(String),
    /// The submission endpoint failed.
    #[error("submission transport failed: {0}")]
    Transport(String),
    /// The scannable code could not be encoded.
    #[error(transparent)]
    Code(#[from] TlvError),
}

/// A tax authority integration.
pub trait AuthorityAdapter {
    /// Whether documents should be routed through this authority.
    fn is_enabled(&self) -> bool;

    /// Checks the payload against the authority's rules, collecting every
    /// violation.
    fn validate(&self, payload: &CompliancePayload) -> Result<(), AdapterError>;

    /// Renders the document, its hash, and the scannable code.
    fn compliance_artifacts(
        &self,
        payload: &CompliancePayload,
    ) -> Result<ComplianceArtifacts, AdapterError>;

    /// Validates, generates, and submits the document.
    fn submit(&self, payload: &CompliancePayload, submission: SubmissionType) -> SubmissionResult;
}
