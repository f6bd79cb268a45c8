use std::sync::Arc;

use crate::error::{StoreError, StoreResult};
use crate::iter::QueryIterator;
use crate::selector::Selector;

/// A single `(key, value)` pair yielded by a query.
#[derive(Clone, Debug, PartialEq, Eq)]
pub struct KeyValue {
    pub key: String,
    pub value: Vec<u8>,
}

impl KeyValue {
    pub fn new(key: impl Into<String>, value: Vec<u8>) -> Self {
        Self {
            key: key.into(),
            value,
        }
    }
}

/// Backend side of a query result sequence.
///
/// Implementations yield a finite sequence that cannot be restarted. `close`
/// releases whatever the backend holds (cursor, snapshot, connection) and is
/// called exactly once by [`QueryIterator`].
pub trait StateQueryIterator: Send {
    /// Advance to the next entry. Returns `Ok(None)` once exhausted.
    fn next(&mut self) -> StoreResult<Option<KeyValue>>;

    /// Release the iterator. After this, `next` fails with
    /// [`StoreError::IteratorClosed`].
    fn close(&mut self) -> StoreResult<()>;
}

/// World-state contract consumed by the certificate contract.
///
/// The key space is flat and shared by every record kind. All
/// implementations must satisfy these invariants:
/// - A key exists exactly when a value is stored under it. There are no
///   tombstones.
/// - `put` overwrites; uniqueness is the caller's concern.
/// - Selector evaluation and result ordering belong to the store. Callers
///   must not re-sort.
/// - All I/O errors are propagated, never silently ignored.
pub trait StateStore: Send + Sync {
    /// Read the value stored under `key`.
    ///
    /// Returns `Ok(None)` if the key is absent.
    fn get(&self, key: &str) -> StoreResult<Option<Vec<u8>>>;

    /// Store `value` under `key`, replacing any previous value.
    fn put(&self, key: &str, value: &[u8]) -> StoreResult<()>;

    /// Check whether `key` is present.
    ///
    /// Default implementation reads the value. Backends may override with a
    /// cheaper presence check.
    fn exists(&self, key: &str) -> StoreResult<bool> {
        Ok(self.get(key)?.is_some())
    }

    /// Run a selector query. The returned iterator must be consumed or
    /// dropped before the invocation completes; dropping releases it.
    fn query(&self, selector: &Selector) -> StoreResult<QueryIterator>;
}

impl<S: StateStore + ?Sized> StateStore for Arc<S> {
    fn get(&self, key: &str) -> StoreResult<Option<Vec<u8>>> {
        (**self).get(key)
    }

    fn put(&self, key: &str, value: &[u8]) -> StoreResult<()> {
        (**self).put(key, value)
    }

    fn exists(&self, key: &str) -> StoreResult<bool> {
        (**self).exists(key)
    }

    fn query(&self, selector: &Selector) -> StoreResult<QueryIterator> {
        (**self).query(selector)
    }
}

/// Reject keys no backend can hold.
pub fn validate_key(key: &str) -> StoreResult<()> {
    if key.is_empty() {
        return Err(StoreError::InvalidKey(key.to_string()));
    }
    Ok(())
}
