use certchain_store::StateStore;
use certchain_types::{
    AcademicCertificate, CertId, Certificate, ExtraCurricularCertificate, StudentId,
};

use crate::error::ContractResult;
use crate::{issuance, query, retrieval, seed};

/// The certificate contract over a world state `S`.
///
/// Holds no record state of its own: every call starts from a fresh read of
/// the store.
pub struct CertContract<S> {
    store: S,
}

impl<S: StateStore> CertContract<S> {
    pub fn new(store: S) -> Self {
        Self { store }
    }

    /// The backing world state.
    pub fn store(&self) -> &S {
        &self.store
    }

    pub fn into_store(self) -> S {
        self.store
    }

    // ---- Generic operations ----

    /// Issue a certificate of any variant. `docType` comes from `C`.
    pub fn issue<C: Certificate>(&self, cert: C) -> ContractResult<()> {
        issuance::issue(&self.store, cert)
    }

    pub fn read<C: Certificate>(&self, cert_id: &CertId) -> ContractResult<C> {
        retrieval::read(&self.store, cert_id)
    }

    pub fn query_by_student<C: Certificate>(&self, student_id: &StudentId) -> ContractResult<Vec<C>> {
        query::query_by_student(&self.store, student_id)
    }

    // ---- Transactions ----

    pub fn issue_academic_certificate(
        &self,
        cert_id: impl Into<CertId>,
        student_id: impl Into<StudentId>,
        student_name: impl Into<String>,
        degree: impl Into<String>,
        graduation_date: impl Into<String>,
        transcript: Vec<String>,
    ) -> ContractResult<()> {
        self.issue(AcademicCertificate::new(
            cert_id,
            student_id,
            student_name,
            degree,
            graduation_date,
            transcript,
        ))
    }

    pub fn issue_extracurricular_certificate(
        &self,
        cert_id: impl Into<CertId>,
        student_id: impl Into<StudentId>,
        student_name: impl Into<String>,
        achievements: Vec<String>,
    ) -> ContractResult<()> {
        self.issue(ExtraCurricularCertificate::new(
            cert_id,
            student_id,
            student_name,
            achievements,
        ))
    }

    pub fn read_academic_certificate(
        &self,
        cert_id: impl Into<CertId>,
    ) -> ContractResult<AcademicCertificate> {
        self.read(&cert_id.into())
    }

    pub fn read_extracurricular_certificate(
        &self,
        cert_id: impl Into<CertId>,
    ) -> ContractResult<ExtraCurricularCertificate> {
        self.read(&cert_id.into())
    }

    pub fn query_academic_certificates_by_student(
        &self,
        student_id: impl Into<StudentId>,
    ) -> ContractResult<Vec<AcademicCertificate>> {
        self.query_by_student(&student_id.into())
    }

    pub fn query_extracurricular_certificates_by_student(
        &self,
        student_id: impl Into<StudentId>,
    ) -> ContractResult<Vec<ExtraCurricularCertificate>> {
        self.query_by_student(&student_id.into())
    }

    /// Whether a record of either variant is stored under `cert_id`.
    pub fn asset_exists(&self, cert_id: impl Into<CertId>) -> ContractResult<bool> {
        retrieval::asset_exists(&self.store, &cert_id.into())
    }

    /// Seed the ledger with the sample certificates.
    pub fn init_ledger(&self) -> ContractResult<Vec<CertId>> {
        seed::seed(&self.store)
    }
}

impl<S> std::fmt::Debug for CertContract<S>
where
    S: std::fmt::Debug,
{
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("CertContract")
            .field("store", &self.store)
            .finish()
    }
}
