//! ZATCA (Saudi Arabia) authority adapter.

use khazna_shared::config::ZatcaConfig;
use khazna_shared::types::money::round_money;
use rust_decimal::Decimal;
use sha2::{Digest, Sha256};

use super::tlv::{self, QrField};
use super::{
    AdapterError, AuthorityAdapter, ComplianceArtifacts, CompliancePayload, SubmissionResult,
    SubmissionStatus, SubmissionType,
};

/// Renders the authority-facing document body for a payload.
pub trait DocumentGenerator {
    /// Produces the serialized document submitted to the authority.
    fn generate(&self, payload: &CompliancePayload) -> Result<String, AdapterError>;
}

/// Delivers a generated document to the authority endpoint.
pub trait SubmissionClient {
    /// Submits the document, returning the authority-assigned identifier.
    fn submit(
        &self,
        document: &str,
        document_hash: &str,
        submission: SubmissionType,
    ) -> Result<String, AdapterError>;
}

/// Accepts every submission, for the sandbox environment and tests.
#[derive(Debug, Clone, Copy, Default)]
pub struct SandboxClient;

impl SubmissionClient for SandboxClient {
    fn submit(
        &self,
        _document: &str,
        document_hash: &str,
        _submission: SubmissionType,
    ) -> Result<String, AdapterError> {
        Ok(format!("SANDBOX-{}", &document_hash[..12]))
    }
}

/// ZATCA e-invoicing adapter.
///
/// Scannable codes follow the simplified invoice QR layout: tag 1 seller
/// name, tag 2 VAT registration number, tag 3 RFC 3339 timestamp, tag 4
/// total with VAT at two decimals, tag 5 VAT total at two decimals.
pub struct ZatcaAuthority<G, C> {
    config: ZatcaConfig,
    generator: G,
    client: C,
}

impl<G: DocumentGenerator, C: SubmissionClient> ZatcaAuthority<G, C> {
    /// Creates an adapter over a document generator and submission client.
    #[must_use]
    pub fn new(config: ZatcaConfig, generator: G, client: C) -> Self {
        Self {
            config,
            generator,
            client,
        }
    }

    fn scannable_code(&self, payload: &CompliancePayload) -> Result<String, AdapterError> {
        let fields = [
            QrField::new(1, payload.seller_name.clone()),
            QrField::new(2, payload.seller_tax_number.clone()),
            QrField::new(3, payload.issued_at.to_rfc3339()),
            QrField::new(4, round_money(payload.total_with_tax).to_string()),
            QrField::new(5, round_money(payload.tax_total).to_string()),
        ];
        Ok(tlv::encode_base64(&fields)?)
    }

    fn collect_violations(&self, payload: &CompliancePayload) -> Vec<String> {
        let mut errors = Vec::new();
        if payload.invoice_number.trim().is_empty() {
            errors.push("invoice number is required".to_string());
        }
        if payload.line_count == 0 {
            errors.push("document must carry at least one line item".to_string());
        }
        if payload.seller_name.trim().is_empty() {
            errors.push("seller name is required".to_string());
        }
        let tax_number = &payload.seller_tax_number;
        if tax_number.len() != 15 || !tax_number.bytes().all(|b| b.is_ascii_digit()) {
            errors.push("seller tax number must be 15 digits".to_string());
        }
        if payload.total_with_tax <= Decimal::ZERO {
            errors.push("total including tax must be positive".to_string());
        }
        if payload.tax_total < Decimal::ZERO {
            errors.push("tax total must not be negative".to_string());
        }
        if payload.tax_total > payload.total_with_tax {
            errors.push("tax total exceeds total including tax".to_string());
        }
        errors
    }
}

impl<G: DocumentGenerator, C: SubmissionClient> AuthorityAdapter for ZatcaAuthority<G, C> {
    fn is_enabled(&self) -> bool {
        self.config.enabled || self.config.company_country == "SA"
    }

    fn validate(&self, payload: &CompliancePayload) -> Result<(), AdapterError> {
        let errors = self.collect_violations(payload);
        if errors.is_empty() {
            Ok(())
        } else {
            Err(AdapterError::Invalid { errors })
        }
    }

    fn compliance_artifacts(
        &self,
        payload: &CompliancePayload,
    ) -> Result<ComplianceArtifacts, AdapterError> {
        let document = self.generator.generate(payload)?;
        let document_hash = hex::encode(Sha256::digest(document.as_bytes()));
        Ok(ComplianceArtifacts {
            document,
            document_hash,
            scannable_code: self.scannable_code(payload)?,
        })
    }

    fn submit(&self, payload: &CompliancePayload, submission: SubmissionType) -> SubmissionResult {
        if let Err(err) = self.validate(payload) {
            return SubmissionResult::rejected(err.to_string());
        }

        let artifacts = match self.compliance_artifacts(payload) {
            Ok(artifacts) => artifacts,
            Err(err) => return SubmissionResult::rejected(err.to_string()),
        };

        match self
            .client
            .submit(&artifacts.document, &artifacts.document_hash, submission)
        {
            Ok(external_id) => {
                tracing::info!(
                    invoice = %payload.invoice_number,
                    %external_id,
                    "document accepted by authority"
                );
                SubmissionResult {
                    status: SubmissionStatus::Submitted,
                    external_id: Some(external_id),
                    scannable_code: Some(artifacts.scannable_code),
                    error_message: None,
                }
            }
            Err(err) => {
                tracing::warn!(
                    invoice = %payload.invoice_number,
                    error = %err,
                    "document rejected by authority"
                );
                SubmissionResult::rejected(err.to_string())
            }
        }
    }
}
