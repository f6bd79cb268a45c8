use std::fmt;

use certchain_store::StoreError;
use certchain_types::{CertId, CodecError};
use serde::Serialize;

/// Errors produced by contract operations.
#[derive(Debug, thiserror::Error)]
pub enum ContractError {
    /// The world state failed. The only kind worth retrying.
    #[error("store error: {0}")]
    Store(#[from] StoreError),

    #[error("certificate already exists: {0}")]
    DuplicateAsset(CertId),

    #[error("certificate does not exist: {0}")]
    NotFound(CertId),

    /// Stored bytes do not match the expected record shape.
    #[error("failed to decode certificate {cert_id}: {source}")]
    Decode {
        cert_id: CertId,
        #[source]
        source: CodecError,
    },

    #[error("invalid argument: {0}")]
    InvalidArgument(String),

    #[error("unknown function: {0}")]
    UnknownFunction(String),

    /// A response payload could not be serialized.
    #[error("serialization error: {0}")]
    Serialization(String),
}

/// Coarse classification handed back to the invoking runtime.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "snake_case")]
pub enum ErrorKind {
    Store,
    DuplicateAsset,
    NotFound,
    Decode,
    InvalidArgument,
    UnknownFunction,
    Serialization,
}

impl fmt::Display for ErrorKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let s = match self {
            Self::Store => "store",
            Self::DuplicateAsset => "duplicate_asset",
            Self::NotFound => "not_found",
            Self::Decode => "decode",
            Self::InvalidArgument => "invalid_argument",
            Self::UnknownFunction => "unknown_function",
            Self::Serialization => "serialization",
        };
        f.write_str(s)
    }
}

impl ContractError {
    pub fn kind(&self) -> ErrorKind {
        match self {
            Self::Store(_) => ErrorKind::Store,
            Self::DuplicateAsset(_) => ErrorKind::DuplicateAsset,
            Self::NotFound(_) => ErrorKind::NotFound,
            Self::Decode { .. } => ErrorKind::Decode,
            Self::InvalidArgument(_) => ErrorKind::InvalidArgument,
            Self::UnknownFunction(_) => ErrorKind::UnknownFunction,
            Self::Serialization(_) => ErrorKind::Serialization,
        }
    }

    /// Whether resubmitting the same invocation could succeed.
    pub fn is_retryable(&self) -> bool {
        matches!(self, Self::Store(_))
    }
}

/// Result alias for contract operations.
pub type ContractResult<T> = Result<T, ContractError>;
