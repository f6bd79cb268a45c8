use std::collections::BTreeMap;
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::Arc;

use tracing::warn;

use crate::error::{StoreError, StoreResult};
use crate::selector::Selector;
use crate::traits::{KeyValue, StateQueryIterator};

/// Scoped owner of a query result sequence.
///
/// The backend iterator is released exactly once: either by an explicit
/// [`close`](Self::close), which reports release errors, or by `Drop`, which
/// logs them. Every exit path of a caller therefore releases the iterator.
pub struct QueryIterator {
    inner: Box<dyn StateQueryIterator>,
    closed: bool,
}

impl QueryIterator {
    pub fn new(inner: impl StateQueryIterator + 'static) -> Self {
        Self {
            inner: Box::new(inner),
            closed: false,
        }
    }

    /// Advance to the next entry. Returns `Ok(None)` once exhausted.
    pub fn next_entry(&mut self) -> StoreResult<Option<KeyValue>> {
        if self.closed {
            return Err(StoreError::IteratorClosed);
        }
        self.inner.next()
    }

    /// Release the iterator and report whether the backend released cleanly.
    pub fn close(mut self) -> StoreResult<()> {
        self.release()
    }

    fn release(&mut self) -> StoreResult<()> {
        if self.closed {
            return Ok(());
        }
        self.closed = true;
        self.inner.close()
    }
}

impl Iterator for QueryIterator {
    type Item = StoreResult<KeyValue>;

    fn next(&mut self) -> Option<Self::Item> {
        self.next_entry().transpose()
    }
}

impl Drop for QueryIterator {
    fn drop(&mut self) {
        if let Err(e) = self.release() {
            warn!(error = %e, "failed to release query iterator");
        }
    }
}

impl std::fmt::Debug for QueryIterator {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("QueryIterator")
            .field("closed", &self.closed)
            .finish()
    }
}

/// Iterator over a point-in-time copy of the matching entries.
///
/// Used by the reference backends: matches are collected when the query is
/// issued, so later writes never disturb an open iteration. An optional
/// shared counter tracks how many iterators are still unreleased.
pub struct SnapshotIterator {
    entries: std::vec::IntoIter<KeyValue>,
    open: Option<Arc<AtomicUsize>>,
    closed: bool,
}

impl SnapshotIterator {
    pub fn new(entries: Vec<KeyValue>) -> Self {
        Self {
            entries: entries.into_iter(),
            open: None,
            closed: false,
        }
    }

    /// Collect the entries of `state` matching `selector`, in key order.
    pub fn select(state: &BTreeMap<String, Vec<u8>>, selector: &Selector) -> Self {
        let entries = state
            .iter()
            .filter(|(_, value)| selector.matches(value))
            .map(|(key, value)| KeyValue::new(key.clone(), value.clone()))
            .collect();
        Self::new(entries)
    }

    /// Count this iterator in `open` until it is closed.
    pub fn tracked(mut self, open: Arc<AtomicUsize>) -> Self {
        open.fetch_add(1, Ordering::SeqCst);
        self.open = Some(open);
        self
    }

    /// Entries not yet yielded.
    pub fn remaining(&self) -> usize {
        self.entries.len()
    }
}

impl StateQueryIterator for SnapshotIterator {
    fn next(&mut self) -> StoreResult<Option<KeyValue>> {
        if self.closed {
            return Err(StoreError::IteratorClosed);
        }
        Ok(self.entries.next())
    }

    fn close(&mut self) -> StoreResult<()> {
        if self.closed {
            return Err(StoreError::IteratorClosed);
        }
        self.closed = true;
        if let Some(open) = self.open.take() {
            open.fetch_sub(1, Ordering::SeqCst);
        }
        Ok(())
    }
}
