//! TLV encoding for scannable compliance codes.
//!
//! Each field is one tag byte, one length byte, and the UTF-8 value bytes.
//! The concatenated fields are base64-encoded for embedding in a QR code.

use base64::Engine as _;
use base64::engine::general_purpose::STANDARD as BASE64;
use thiserror::Error;

/// TLV encode/decode failures.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum TlvError {
    /// A field value exceeds the single-byte length limit.
    #[error("TLV value for tag {tag} is {len} bytes, limit is 255")]
    ValueTooLong {
        /// Offending tag.
        tag: u8,
        /// Byte length of the value.
        len: usize,
    },
    /// The byte stream ended mid-field.
    #[error("truncated TLV stream at offset {0}")]
    Truncated(usize),
    /// A decoded value is not valid UTF-8.
    #[error("TLV value for tag {0} is not valid UTF-8")]
    InvalidUtf8(u8),
    /// The base64 wrapper could not be decoded.
    #[error("invalid base64 payload: {0}")]
    InvalidBase64(#[from] base64::DecodeError),
}

/// One tagged field of a scannable code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct QrField {
    /// Field tag (1-based).
    pub tag: u8,
    /// Field value.
    pub value: String,
}

impl QrField {
    /// Creates a field.
    #[must_use]
    pub fn new(tag: u8, value: impl Into<String>) -> Self {
        Self {
            tag,
            value: value.into(),
        }
    }
}

/// Encodes fields into raw TLV bytes.
pub fn encode(fields: &[QrField]) -> Result<Vec<u8>, TlvError> {
    let mut out = Vec::new();
    for field in fields {
        let bytes = field.value.as_bytes();
        let len = u8::try_from(bytes.len()).map_err(|_| TlvError::ValueTooLong {
            tag: field.tag,
            len: bytes.len(),
        })?;
        out.push(field.tag);
        out.push(len);
        out.extend_from_slice(bytes);
    }
    Ok(out)
}

/// Encodes fields into the base64 form embedded in QR codes.
pub fn encode_base64(fields: &[QrField]) -> Result<String, TlvError> {
    Ok(BASE64.encode(encode(fields)?))
}

/// Decodes raw TLV bytes back into fields.
pub fn decode(bytes: &[u8]) -> Result<Vec<QrField>, TlvError> {
    let mut fields = Vec::new();
    let mut offset = 0;
    while offset < bytes.len() {
        if offset + 2 > bytes.len() {
            return Err(TlvError::Truncated(offset));
        }
        let tag = bytes[offset];
        let len = bytes[offset + 1] as usize;
        let start = offset + 2;
        let end = start + len;
        if end > bytes.len() {
            return Err(TlvError::Truncated(offset));
        }
        let value = std::str::from_utf8(&bytes[start..end])
            .map_err(|_| TlvError::InvalidUtf8(tag))?
            .to_string();
        fields.push(QrField { tag, value });
        offset = end;
    }
    Ok(fields)
}

/// Decodes a base64-wrapped TLV payload.
pub fn decode_base64(payload: &str) -> Result<Vec<QrField>, TlvError> {
    decode(&BASE64.decode(payload)?)
}
