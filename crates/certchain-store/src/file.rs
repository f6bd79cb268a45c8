//! File-backed world state for local use.
//!
//! The whole key space is kept in memory and rewritten to disk on every
//! `put`. On-disk format:
//!
//! ```text
//! {
//!   "version": 1,
//!   "entries": { "<key>": "<hex-encoded value>", ... }
//! }
//! ```
//!
//! Writes go to a temporary file in the same directory, are synced, and then
//! atomically renamed over the target, so a crash leaves either the old or
//! the new state on disk.

use std::collections::BTreeMap;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};
use std::sync::atomic::{AtomicUsize, Ordering};
use std::sync::{Arc, RwLock};

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::error::{StoreError, StoreResult};
use crate::iter::{QueryIterator, SnapshotIterator};
use crate::selector::Selector;
use crate::traits::{validate_key, StateStore};

/// Current on-disk format version.
pub const STATE_FILE_VERSION: u32 = 1;

#[derive(Serialize, Deserialize)]
struct StateFile {
    version: u32,
    entries: BTreeMap<String, String>,
}

/// World state persisted as a single JSON document.
pub struct FileStateStore {
    path: PathBuf,
    entries: RwLock<BTreeMap<String, Vec<u8>>>,
    open_iterators: Arc<AtomicUsize>,
}

impl FileStateStore {
    /// Open the state file at `path`, or start empty if it does not exist.
    ///
    /// The parent directory is created if needed. Nothing is written until
    /// the first `put`.
    pub fn open(path: impl AsRef<Path>) -> StoreResult<Self> {
        let path = path.as_ref().to_path_buf();
        if let Some(parent) = path.parent().filter(|p| !p.as_os_str().is_empty()) {
            fs::create_dir_all(parent)?;
        }

        let entries = if path.exists() {
            load(&path)?
        } else {
            BTreeMap::new()
        };
        debug!(path = %path.display(), entries = entries.len(), "state file opened");

        Ok(Self {
            path,
            entries: RwLock::new(entries),
            open_iterators: Arc::new(AtomicUsize::new(0)),
        })
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    /// Number of keys currently stored.
    pub fn len(&self) -> StoreResult<usize> {
        Ok(self
            .entries
            .read()
            .map_err(|_| StoreError::LockPoisoned)?
            .len())
    }

    pub fn is_empty(&self) -> StoreResult<bool> {
        Ok(self.len()? == 0)
    }

    /// Number of query iterators handed out and not yet released.
    pub fn open_iterators(&self) -> usize {
        self.open_iterators.load(Ordering::SeqCst)
    }

    fn persist(&self, entries: &BTreeMap<String, Vec<u8>>) -> StoreResult<()> {
        let file = StateFile {
            version: STATE_FILE_VERSION,
            entries: entries
                .iter()
                .map(|(k, v)| (k.clone(), hex::encode(v)))
                .collect(),
        };
        let bytes = serde_json::to_vec_pretty(&file)
            .map_err(|e| StoreError::Serialization(e.to_string()))?;

        let dir = match self.path.parent() {
            Some(p) if !p.as_os_str().is_empty() => p,
            _ => Path::new("."),
        };
        let mut tmp = tempfile::NamedTempFile::new_in(dir)?;
        tmp.write_all(&bytes)?;
        tmp.as_file().sync_all()?;
        tmp.persist(&self.path).map_err(|e| StoreError::Io(e.error))?;

        debug!(path = %self.path.display(), entries = entries.len(), "state file written");
        Ok(())
    }
}

fn load(path: &Path) -> StoreResult<BTreeMap<String, Vec<u8>>> {
    let corrupt = |reason: String| StoreError::Corrupt {
        path: path.to_path_buf(),
        reason,
    };

    let bytes = fs::read(path)?;
    let file: StateFile = serde_json::from_slice(&bytes).map_err(|e| corrupt(e.to_string()))?;
    if file.version != STATE_FILE_VERSION {
        return Err(corrupt(format!("unsupported version {}", file.version)));
    }

    file.entries
        .into_iter()
        .map(|(key, value)| {
            let decoded =
                hex::decode(&value).map_err(|e| corrupt(format!("key {key:?}: {e}")))?;
            Ok((key, decoded))
        })
        .collect()
}

impl StateStore for FileStateStore {
    fn get(&self, key: &str) -> StoreResult<Option<Vec<u8>>> {
        let entries = self.entries.read().map_err(|_| StoreError::LockPoisoned)?;
        Ok(entries.get(key).cloned())
    }

    fn put(&self, key: &str, value: &[u8]) -> StoreResult<()> {
        validate_key(key)?;
        let mut entries = self.entries.write().map_err(|_| StoreError::LockPoisoned)?;
        let previous = entries.insert(key.to_string(), value.to_vec());

        if let Err(e) = self.persist(&entries) {
            // Keep memory in line with what is on disk.
            match previous {
                Some(old) => entries.insert(key.to_string(), old),
                None => entries.remove(key),
            };
            return Err(e);
        }
        Ok(())
    }

    fn exists(&self, key: &str) -> StoreResult<bool> {
        let entries = self.entries.read().map_err(|_| StoreError::LockPoisoned)?;
        Ok(entries.contains_key(key))
    }

    fn query(&self, selector: &Selector) -> StoreResult<QueryIterator> {
        let entries = self.entries.read().map_err(|_| StoreError::LockPoisoned)?;
        let snapshot =
            SnapshotIterator::select(&entries, selector).tracked(self.open_iterators.clone());
        Ok(QueryIterator::new(snapshot))
    }
}

impl std::fmt::Debug for FileStateStore {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FileStateStore")
            .field("path", &self.path)
            .field("key_count", &self.len().unwrap_or_default())
            .finish()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn state_path(dir: &tempfile::TempDir) -> PathBuf {
        dir.path().join("ledger.json")
    }

    #[test]
    fn missing_file_opens_empty() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStateStore::open(state_path(&dir)).unwrap();
        assert!(store.is_empty().unwrap());
        assert!(!state_path(&dir).exists());
    }

    #[test]
    fn writes_survive_reopen() {
        let dir = tempfile::tempdir().unwrap();
        {
            let store = FileStateStore::open(state_path(&dir)).unwrap();
            store.put("aCert1", br#"{"docType":"aCert"}"#).unwrap();
            store.put("cCert1", "ünïcødé".as_bytes()).unwrap();
        }
        let store = FileStateStore::open(state_path(&dir)).unwrap();
        assert_eq!(store.len().unwrap(), 2);
        assert_eq!(
            store.get("aCert1").unwrap(),
            Some(br#"{"docType":"aCert"}"#.to_vec())
        );
        assert_eq!(store.get("cCert1").unwrap(), Some("ünïcødé".as_bytes().to_vec()));
    }

    #[test]
    fn creates_parent_directories() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("nested").join("deeper").join("ledger.json");
        let store = FileStateStore::open(&path).unwrap();
        store.put("k", b"v").unwrap();
        assert!(path.exists());
    }

    #[test]
    fn state_file_is_versioned_hex() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStateStore::open(state_path(&dir)).unwrap();
        store.put("k", b"\x01\xff").unwrap();

        let raw: serde_json::Value =
            serde_json::from_slice(&fs::read(state_path(&dir)).unwrap()).unwrap();
        assert_eq!(raw["version"], 1);
        assert_eq!(raw["entries"]["k"], "01ff");
    }

    #[test]
    fn unsupported_version_is_corrupt() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(state_path(&dir), br#"{"version":9,"entries":{}}"#).unwrap();
        let err = FileStateStore::open(state_path(&dir)).unwrap_err();
        assert!(matches!(err, StoreError::Corrupt { .. }));
    }

    #[test]
    fn bad_hex_is_corrupt() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(state_path(&dir), br#"{"version":1,"entries":{"k":"zz"}}"#).unwrap();
        let err = FileStateStore::open(state_path(&dir)).unwrap_err();
        assert!(matches!(err, StoreError::Corrupt { .. }));
    }

    #[test]
    fn invalid_json_is_corrupt() {
        let dir = tempfile::tempdir().unwrap();
        fs::write(state_path(&dir), b"{ nope").unwrap();
        assert!(matches!(
            FileStateStore::open(state_path(&dir)),
            Err(StoreError::Corrupt { .. })
        ));
    }

    #[test]
    fn empty_key_is_rejected_without_writing() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStateStore::open(state_path(&dir)).unwrap();
        assert!(matches!(store.put("", b"v"), Err(StoreError::InvalidKey(_))));
        assert!(!state_path(&dir).exists());
    }

    #[test]
    fn query_matches_persisted_documents() {
        let dir = tempfile::tempdir().unwrap();
        let store = FileStateStore::open(state_path(&dir)).unwrap();
        store
            .put("a1", br#"{"docType":"aCert","studentID":"S1"}"#)
            .unwrap();
        store
            .put("c1", br#"{"docType":"cCert","studentID":"S1"}"#)
            .unwrap();

        let selector = Selector::new().equals("docType", "cCert").equals("studentID", "S1");
        let mut iter = store.query(&selector).unwrap();
        assert_eq!(store.open_iterators(), 1);
        assert_eq!(iter.next_entry().unwrap().unwrap().key, "c1");
        assert!(iter.next_entry().unwrap().is_none());
        iter.close().unwrap();
        assert_eq!(store.open_iterators(), 0);
    }
}
