//! Certificate contract for certchain.
//!
//! This crate is the core of certchain. It provides:
//! - Issuance with one-time-creation semantics per certificate id
//! - Retrieval by id, decoded as the requested variant
//! - Student-scoped selector queries materialized in store order
//! - Ledger seeding with a fixed sample set
//! - [`CertContract`], the transaction surface, plus [`Function`] dispatch by
//!   transaction name
//!
//! Every operation runs synchronously against a [`certchain_store::StateStore`]
//! and surfaces the first error it meets. No partial results are returned.

pub mod contract;
pub mod dispatch;
pub mod error;
pub mod issuance;
pub mod query;
pub mod retrieval;
pub mod seed;

#[cfg(test)]
mod testing;

pub use contract::CertContract;
pub use dispatch::Function;
pub use error::{ContractError, ContractResult, ErrorKind};
pub use issuance::issue;
pub use query::{collect_certificates, query_by_student, student_selector};
pub use retrieval::{asset_exists, read};
pub use seed::{sample_academic_certificates, sample_extracurricular_certificates, seed};
