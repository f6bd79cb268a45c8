//! World-state adapter for certchain.
//!
//! The ledger engine itself (durable storage, ordering, endorsement) lives
//! outside this workspace. This crate defines the contract the certificate
//! contract consumes from it, plus two reference backends.
//!
//! # Contract
//!
//! - [`StateStore`]: `get` / `put` / `exists` / `query` over one flat key space
//! - [`Selector`]: typed field-equality query, rendered only by serialization
//! - [`QueryIterator`]: scoped result sequence, released on every exit path
//!
//! # Backends
//!
//! - [`InMemoryStateStore`]: `BTreeMap`-based store for tests and embedding
//! - [`FileStateStore`]: single JSON document on disk for local use
//!
//! # Design Rules
//!
//! 1. The store never interprets values except to evaluate selectors.
//! 2. Query results are finite and cannot be restarted. They must be
//!    released before the invocation ends.
//! 3. All I/O errors are propagated, never silently ignored.

pub mod error;
pub mod file;
pub mod iter;
pub mod memory;
pub mod selector;
pub mod traits;

pub use error::{StoreError, StoreResult};
pub use file::FileStateStore;
pub use iter::{QueryIterator, SnapshotIterator};
pub use memory::InMemoryStateStore;
pub use selector::Selector;
pub use traits::{validate_key, KeyValue, StateQueryIterator, StateStore};
