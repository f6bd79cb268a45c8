use std::path::PathBuf;

/// Errors from world-state operations.
#[derive(Debug, thiserror::Error)]
pub enum StoreError {
    /// I/O error from the underlying storage backend.
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    /// Serialization or deserialization failure inside the backend.
    #[error("serialization error: {0}")]
    Serialization(String),

    /// The key cannot be stored (e.g. it is empty).
    #[error("invalid key: {0:?}")]
    InvalidKey(String),

    /// A query iterator was used after it was released.
    #[error("query iterator already closed")]
    IteratorClosed,

    /// A backend lock was poisoned by a panicking writer.
    #[error("store lock poisoned")]
    LockPoisoned,

    /// Persisted state could not be loaded.
    #[error("corrupt state file {path}: {reason}")]
    Corrupt { path: PathBuf, reason: String },

    /// The external store could not be reached or refused the call.
    #[error("store unavailable: {0}")]
    Unavailable(String),
}

/// Result alias for store operations.
pub type StoreResult<T> = Result<T, StoreError>;
