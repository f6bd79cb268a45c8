//! One-time certificate issuance.
//!
//! Issuance is check-then-act: `exists` followed by `put`. The two calls are
//! not atomic from this side of the store boundary. Two concurrent issuances
//! of the same id are resolved by the ledger's own conflict detection at
//! commit time, not by anything in this crate.

use certchain_store::StateStore;
use certchain_types::{encode, Certificate};
use tracing::{info, warn};

use crate::error::{ContractError, ContractResult};

/// Issue `cert` under its own id.
///
/// Fails with [`ContractError::DuplicateAsset`] if the id is already taken
/// by a record of either variant. On every failure path no key is written.
pub fn issue<S, C>(store: &S, cert: C) -> ContractResult<()>
where
    S: StateStore + ?Sized,
    C: Certificate,
{
    let cert_id = cert.cert_id().clone();
    if cert_id.is_empty() {
        return Err(ContractError::InvalidArgument(
            "certID must not be empty".into(),
        ));
    }

    if store.exists(cert_id.as_str())? {
        warn!(cert_id = %cert_id, doc_type = %C::DOC_TYPE, "rejected duplicate certificate");
        return Err(ContractError::DuplicateAsset(cert_id));
    }

    let student_id = cert.student_id().clone();
    let bytes = encode(&cert.into_record()).map_err(|source| ContractError::Decode {
        cert_id: cert_id.clone(),
        source,
    })?;
    store.put(cert_id.as_str(), &bytes)?;

    info!(
        cert_id = %cert_id,
        doc_type = %C::DOC_TYPE,
        student_id = %student_id,
        "certificate issued"
    );
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::FaultyStore;
    use certchain_store::{InMemoryStateStore, StoreError};
    use certchain_types::{decode, AcademicCertificate, CertRecord, ExtraCurricularCertificate};
    use std::sync::atomic::Ordering;

    fn academic(id: &str) -> AcademicCertificate {
        AcademicCertificate::new(
            id,
            "SWE1904873",
            "Loo Yong Jun",
            "Bachelor of Software Engineering",
            "2023-07-15",
            vec!["Course A, GPA : 4.0".into()],
        )
    }

    fn extracurricular(id: &str) -> ExtraCurricularCertificate {
        ExtraCurricularCertificate::new(id, "SWE1904873", "Loo Yong Jun", vec!["Chess".into()])
    }

    #[test]
    fn issue_writes_tagged_record() {
        let store = InMemoryStateStore::new();
        issue(&store, academic("aCert1")).unwrap();

        let bytes = store.get("aCert1").unwrap().unwrap();
        let record = decode(&bytes).unwrap();
        assert_eq!(record, CertRecord::Academic(academic("aCert1")));

        let raw: serde_json::Value = serde_json::from_slice(&bytes).unwrap();
        assert_eq!(raw["docType"], "aCert");
    }

    #[test]
    fn issue_creates_exactly_one_key() {
        let store = InMemoryStateStore::new();
        issue(&store, extracurricular("cCert1")).unwrap();
        assert_eq!(store.keys().unwrap(), vec!["cCert1"]);
    }

    #[test]
    fn duplicate_leaves_state_untouched() {
        let store = InMemoryStateStore::new();
        issue(&store, academic("aCert1")).unwrap();
        let before = store.snapshot().unwrap();

        let mut second = academic("aCert1");
        second.student_name = "Someone Else".into();
        let err = issue(&store, second).unwrap_err();

        assert!(matches!(err, ContractError::DuplicateAsset(ref id) if id.as_str() == "aCert1"));
        assert_eq!(store.snapshot().unwrap(), before);
    }

    #[test]
    fn duplicate_across_variants() {
        let store = InMemoryStateStore::new();
        issue(&store, academic("shared")).unwrap();
        let err = issue(&store, extracurricular("shared")).unwrap_err();
        assert!(matches!(err, ContractError::DuplicateAsset(_)));

        let record = decode(&store.get("shared").unwrap().unwrap()).unwrap();
        assert!(matches!(record, CertRecord::Academic(_)));
    }

    #[test]
    fn empty_id_is_rejected_before_touching_store() {
        let store = FaultyStore::new();
        store.fail_exists.store(true, Ordering::SeqCst);
        let err = issue(&store, academic("")).unwrap_err();
        assert!(matches!(err, ContractError::InvalidArgument(_)));
        assert_eq!(store.puts.load(Ordering::SeqCst), 0);
    }

    #[test]
    fn exists_failure_propagates_without_write() {
        let store = FaultyStore::new();
        store.fail_exists.store(true, Ordering::SeqCst);
        let err = issue(&store, academic("aCert1")).unwrap_err();
        assert!(matches!(err, ContractError::Store(StoreError::Unavailable(_))));
        assert!(err.is_retryable());
        assert_eq!(store.puts.load(Ordering::SeqCst), 0);
        assert!(store.inner.is_empty().unwrap());
    }

    #[test]
    fn put_failure_propagates() {
        let store = FaultyStore::new();
        store.fail_put.store(true, Ordering::SeqCst);
        let err = issue(&store, extracurricular("cCert1")).unwrap_err();
        assert!(matches!(err, ContractError::Store(_)));
        assert!(store.inner.is_empty().unwrap());
    }
}
