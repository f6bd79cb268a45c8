//! Student-scoped certificate queries.
//!
//! A query is a [`Selector`] over the `docType` and `studentID` fields,
//! built from typed values. The store evaluates it and decides the result
//! order; this module decodes entries in exactly that order and never
//! returns a partial list.

use certchain_store::{QueryIterator, Selector, StateStore};
use certchain_types::{decode_as, CertId, Certificate, StudentId};
use tracing::debug;

use crate::error::{ContractError, ContractResult};

/// Stored field holding the record discriminator.
pub const DOC_TYPE_FIELD: &str = "docType";
/// Stored field holding the student reference.
pub const STUDENT_ID_FIELD: &str = "studentID";

/// Selector for every `C` record that references `student_id`.
pub fn student_selector<C: Certificate>(student_id: &StudentId) -> Selector {
    Selector::new()
        .equals(DOC_TYPE_FIELD, C::DOC_TYPE.as_str())
        .equals(STUDENT_ID_FIELD, student_id.as_str())
}

/// All `C` certificates issued to `student_id`, in store order.
///
/// Returns an empty list when nothing matches.
pub fn query_by_student<S, C>(store: &S, student_id: &StudentId) -> ContractResult<Vec<C>>
where
    S: StateStore + ?Sized,
    C: Certificate,
{
    let selector = student_selector::<C>(student_id);
    debug!(doc_type = %C::DOC_TYPE, student_id = %student_id, selector = ?selector, "querying certificates");

    let iter = store.query(&selector)?;
    let certs = collect_certificates::<C>(iter)?;

    debug!(doc_type = %C::DOC_TYPE, student_id = %student_id, count = certs.len(), "query complete");
    Ok(certs)
}

/// Drain `iter`, decoding every value as `C`.
///
/// The iterator is released on every path. If the drain succeeds, a release
/// failure is reported as a store error. If the drain fails, the drain error
/// wins and the iterator is released when dropped.
pub fn collect_certificates<C: Certificate>(mut iter: QueryIterator) -> ContractResult<Vec<C>> {
    let mut certs = Vec::new();
    while let Some(entry) = iter.next_entry()? {
        let cert = decode_as::<C>(&entry.value).map_err(|source| ContractError::Decode {
            cert_id: CertId::new(entry.key),
            source,
        })?;
        certs.push(cert);
    }
    iter.close()?;
    Ok(certs)
}
