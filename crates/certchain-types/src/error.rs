use thiserror::Error;

use crate::record::DocType;

/// Errors produced while encoding or decoding certificate records.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum CodecError {
    /// The bytes are not a well-formed certificate record.
    #[error("malformed record: {0}")]
    Malformed(String),

    /// The record could not be serialized.
    #[error("failed to encode record: {0}")]
    Encode(String),

    /// The record decoded cleanly but is the other variant.
    #[error("record variant mismatch: expected {expected}, found {found}")]
    VariantMismatch { expected: DocType, found: DocType },
}

/// Result alias for codec operations.
pub type CodecResult<T> = Result<T, CodecError>;
