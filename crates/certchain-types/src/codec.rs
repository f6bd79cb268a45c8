//! Byte encoding for certificate records.
//!
//! Records are stored as UTF-8 JSON. Field names are kept verbatim so that
//! the store can evaluate selectors against them, and sequence fields
//! round-trip exactly, including empty sequences and non-ASCII text.

use crate::error::{CodecError, CodecResult};
use crate::record::{CertRecord, Certificate};

/// Encode a record into its stored byte form.
pub fn encode(record: &CertRecord) -> CodecResult<Vec<u8>> {
    serde_json::to_vec(record).map_err(|e| CodecError::Encode(e.to_string()))
}

/// Decode a stored blob into whichever variant its `docType` names.
pub fn decode(bytes: &[u8]) -> CodecResult<CertRecord> {
    serde_json::from_slice(bytes).map_err(|e| CodecError::Malformed(e.to_string()))
}

/// Decode a stored blob as the variant `C`.
///
/// Fails with [`CodecError::VariantMismatch`] if the blob is well formed but
/// holds the other variant.
pub fn decode_as<C: Certificate>(bytes: &[u8]) -> CodecResult<C> {
    let record = decode(bytes)?;
    C::from_record(record).map_err(|other| CodecError::VariantMismatch {
        expected: C::DOC_TYPE,
        found: other.doc_type(),
    })
}
