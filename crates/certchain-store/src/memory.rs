use std::collections::BTreeMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, RwLock, RwLockReadGuard, RwLockWriteGuard};

use crate::error::{StoreError, StoreResult};
use crate::iter::{QueryIterator, SnapshotIterator};
use crate::selector::Selector;
use crate::traits::{validate_key, StateStore};

/// In-memory world state backed by a `BTreeMap`.
///
/// Intended for tests and embedding. Query results come back in ascending
/// key order. The store counts unreleased query iterators so callers can
/// assert that every query was closed.
pub struct InMemoryStateStore {
    entries: RwLock<BTreeMap<String, Vec<u8>>>,
    open_iterators: Arc<AtomicUsize>,
}

impl InMemoryStateStore {
    /// Create a new empty store.
    pub fn new() -> Self {
        Self {
            entries: RwLock::new(BTreeMap::new()),
            open_iterators: Arc::new(AtomicUsize::new(0)),
        }
    }

    /// Number of keys currently stored.
    pub fn len(&self) -> StoreResult<usize> {
        Ok(self.read_state()?.len())
    }

    /// Returns `true` if no key is stored.
    pub fn is_empty(&self) -> StoreResult<bool> {
        Ok(self.read_state()?.is_empty())
    }

    /// All keys in ascending order.
    pub fn keys(&self) -> StoreResult<Vec<String>> {
        Ok(self.read_state()?.keys().cloned().collect())
    }

    /// A copy of the full key space.
    pub fn snapshot(&self) -> StoreResult<BTreeMap<String, Vec<u8>>> {
        Ok(self.read_state()?.clone())
    }

    /// Number of query iterators handed out and not yet released.
    pub fn open_iterators(&self) -> usize {
        self.open_iterators.load(Ordering::SeqCst)
    }

    fn read_state(&self) -> StoreResult<RwLockReadGuard<'_, BTreeMap<String, Vec<u8>>>> {
        self.entries.read().map_err(|_| StoreError::LockPoisoned)
    }

    fn write_state(&self) -> StoreResult<RwLockWriteGuard<'_, BTreeMap<String, Vec<u8>>>> {
        self.entries.write().map_err(|_| StoreError::LockPoisoned)
    }
}

impl Default for InMemoryStateStore {
    fn default() -> Self {
        Self::new()
    }
}

impl StateStore for InMemoryStateStore {
    fn get(&self, key: &str) -> StoreResult<Option<Vec<u8>>> {
        Ok(self.read_state()?.get(key).cloned())
    }

    fn put(&self, key: &str, value: &[u8]) -> StoreResult<()> {
        validate_key(key)?;
        self.write_state()?.insert(key.to_string(), value.to_vec());
        Ok(())
    }

    fn exists(&self, key: &str) -> StoreResult<bool> {
        Ok(self.read_state()?.contains_key(key))
    }

    fn query(&self, selector: &Selector) -> StoreResult<QueryIterator> {
        let state = self.read_state()?;
        let snapshot = SnapshotIterator::select(&state, selector).tracked(self.open_iterators.clone());
        Ok(QueryIterator::new(snapshot))
    }
}

impl std::fmt::Debug for InMemoryStateStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        let count = self.read_state().map(|s| s.len()).unwrap_or_default();
        f.debug_struct("InMemoryStateStore")
            .field("key_count", &count)
            .field("open_iterators", &self.open_iterators())
            .finish()
    }
}
