//! Store doubles for exercising failure paths.

use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::Arc;

use certchain_store::{
    InMemoryStateStore, KeyValue, QueryIterator, Selector, StateQueryIterator, StateStore,
    StoreError, StoreResult,
};

/// Wraps an [`InMemoryStateStore`] and fails selected operations on demand.
#[derive(Default)]
pub struct FaultyStore {
    pub inner: InMemoryStateStore,
    pub fail_exists: AtomicBool,
    pub fail_get: AtomicBool,
    pub fail_put: AtomicBool,
    pub fail_query: AtomicBool,
    /// Fail the `next` call after this many successful entries.
    pub fail_next_after: Option<usize>,
    pub fail_close: bool,
    pub puts: AtomicUsize,
    pub closes: Arc<AtomicUsize>,
}

impl FaultyStore {
    pub fn new() -> Self {
        Self::default()
    }

    fn fault(flag: &AtomicBool, op: &str) -> StoreResult<()> {
        if flag.load(Ordering::SeqCst) {
            return Err(StoreError::Unavailable(format!("{op} refused")));
        }
        Ok(())
    }
}

impl StateStore for FaultyStore {
    fn get(&self, key: &str) -> StoreResult<Option<Vec<u8>>> {
        Self::fault(&self.fail_get, "get")?;
        self.inner.get(key)
    }

    fn put(&self, key: &str, value: &[u8]) -> StoreResult<()> {
        Self::fault(&self.fail_put, "put")?;
        self.puts.fetch_add(1, Ordering::SeqCst);
        self.inner.put(key, value)
    }

    fn exists(&self, key: &str) -> StoreResult<bool> {
        Self::fault(&self.fail_exists, "exists")?;
        self.inner.exists(key)
    }

    fn query(&self, selector: &Selector) -> StoreResult<QueryIterator> {
        Self::fault(&self.fail_query, "query")?;
        let mut entries = Vec::new();
        let mut iter = self.inner.query(selector)?;
        while let Some(kv) = iter.next_entry()? {
            entries.push(kv);
        }
        iter.close()?;
        Ok(QueryIterator::new(ScriptedIterator {
            entries: entries.into_iter(),
            yielded: 0,
            fail_next_after: self.fail_next_after,
            fail_close: self.fail_close,
            closes: self.closes.clone(),
        }))
    }
}

struct ScriptedIterator {
    entries: std::vec::IntoIter<KeyValue>,
    yielded: usize,
    fail_next_after: Option<usize>,
    fail_close: bool,
    closes: Arc<AtomicUsize>,
}

impl StateQueryIterator for ScriptedIterator {
    fn next(&mut self) -> StoreResult<Option<KeyValue>> {
        if self.fail_next_after == Some(self.yielded) {
            return Err(StoreError::Unavailable("cursor broke".into()));
        }
        self.yielded += 1;
        Ok(self.entries.next())
    }

    fn close(&mut self) -> StoreResult<()> {
        self.closes.fetch_add(1, Ordering::SeqCst);
        if self.fail_close {
            return Err(StoreError::Unavailable("close refused".into()));
        }
        Ok(())
    }
}
