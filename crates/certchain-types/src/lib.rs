//! Record model for certchain.
//!
//! Two certificate variants live in one flat key space on the ledger. Every
//! stored blob carries a `docType` discriminator, and decoding goes through
//! an exhaustive match on [`CertRecord`] rather than any runtime type lookup.
//!
//! # Key Types
//!
//! - [`AcademicCertificate`]: degree, graduation date, and course transcript
//! - [`ExtraCurricularCertificate`]: list of achievements
//! - [`CertRecord`]: either variant, tagged by [`DocType`]
//! - [`Certificate`]: per-variant trait used by the contract engines
//! - [`CertId`] / [`StudentId`]: string identifiers
//!
//! The [`codec`] module turns records into stored bytes and back.

pub mod codec;
pub mod error;
pub mod id;
pub mod record;

pub use codec::{decode, decode_as, encode};
pub use error::{CodecError, CodecResult};
pub use id::{CertId, StudentId};
pub use record::{
    AcademicCertificate, CertRecord, Certificate, DocType, ExtraCurricularCertificate,
};
