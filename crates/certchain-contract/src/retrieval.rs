use certchain_store::StateStore;
use certchain_types::{decode_as, CertId, Certificate};
use tracing::debug;

use crate::error::{ContractError, ContractResult};

/// Read the certificate stored under `cert_id` as variant `C`.
///
/// Fails with [`ContractError::NotFound`] if the key is absent and with
/// [`ContractError::Decode`] if it holds the other variant or malformed
/// bytes.
pub fn read<S, C>(store: &S, cert_id: &CertId) -> ContractResult<C>
where
    S: StateStore + ?Sized,
    C: Certificate,
{
    let bytes = store
        .get(cert_id.as_str())?
        .ok_or_else(|| ContractError::NotFound(cert_id.clone()))?;

    let cert = decode_as::<C>(&bytes).map_err(|source| ContractError::Decode {
        cert_id: cert_id.clone(),
        source,
    })?;

    debug!(cert_id = %cert_id, doc_type = %C::DOC_TYPE, "certificate read");
    Ok(cert)
}

/// Whether any record, of either variant, is stored under `cert_id`.
pub fn asset_exists<S>(store: &S, cert_id: &CertId) -> ContractResult<bool>
where
    S: StateStore + ?Sized,
{
    Ok(store.exists(cert_id.as_str())?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::issuance::issue;
    use crate::testing::FaultyStore;
    use certchain_store::InMemoryStateStore;
    use certchain_types::{AcademicCertificate, CodecError, DocType, ExtraCurricularCertificate};
    use std::sync::atomic::Ordering;

    fn academic() -> AcademicCertificate {
        AcademicCertificate::new(
            "aCert1",
            "SWE1904873",
            "Loo Yong Jun",
            "Bachelor of Software Engineering",
            "2023-07-15",
            vec!["Course A, GPA : 4.0".into()],
        )
    }

    #[test]
    fn read_returns_issued_record() {
        let store = InMemoryStateStore::new();
        issue(&store, academic()).unwrap();
        let cert: AcademicCertificate = read(&store, &CertId::from("aCert1")).unwrap();
        assert_eq!(cert, academic());
    }

    #[test]
    fn read_missing_is_not_found() {
        let store = InMemoryStateStore::new();
        let err = read::<_, AcademicCertificate>(&store, &CertId::from("nope")).unwrap_err();
        assert!(matches!(err, ContractError::NotFound(ref id) if id.as_str() == "nope"));
    }

    #[test]
    fn read_wrong_variant_is_decode_error() {
        let store = InMemoryStateStore::new();
        issue(&store, academic()).unwrap();
        let err =
            read::<_, ExtraCurricularCertificate>(&store, &CertId::from("aCert1")).unwrap_err();
        match err {
            ContractError::Decode { cert_id, source } => {
                assert_eq!(cert_id.as_str(), "aCert1");
                assert_eq!(
                    source,
                    CodecError::VariantMismatch {
                        expected: DocType::Extracurricular,
                        found: DocType::Academic,
                    }
                );
            }
            other => panic!("expected decode error, got {other:?}"),
        }
    }

    #[test]
    fn read_malformed_blob_is_decode_error() {
        let store = InMemoryStateStore::new();
        store.put("junk", b"{\"docType\":\"aCert\"").unwrap();
        let err = read::<_, AcademicCertificate>(&store, &CertId::from("junk")).unwrap_err();
        assert!(matches!(
            err,
            ContractError::Decode {
                source: CodecError::Malformed(_),
                ..
            }
        ));
    }

    #[test]
    fn read_store_failure_propagates() {
        let store = FaultyStore::new();
        store.fail_get.store(true, Ordering::SeqCst);
        let err = read::<_, AcademicCertificate>(&store, &CertId::from("aCert1")).unwrap_err();
        assert!(matches!(err, ContractError::Store(_)));
    }

    #[test]
    fn asset_exists_reflects_key_presence() {
        let store = InMemoryStateStore::new();
        assert!(!asset_exists(&store, &CertId::from("aCert1")).unwrap());
        issue(&store, academic()).unwrap();
        assert!(asset_exists(&store, &CertId::from("aCert1")).unwrap());
    }
}
