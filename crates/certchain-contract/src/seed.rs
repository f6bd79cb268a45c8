//! Bootstrap sample data.

use certchain_store::StateStore;
use certchain_types::{AcademicCertificate, CertId, Certificate, ExtraCurricularCertificate};
use tracing::info;

use crate::error::ContractResult;
use crate::issuance::issue;

/// Academic records issued by [`seed`], in issue order.
pub fn sample_academic_certificates() -> Vec<AcademicCertificate> {
    vec![
        AcademicCertificate::new(
            "aCert1",
            "SWE1904873",
            "Loo Yong Jun",
            "Bachelor of Software Engineering",
            "2023-07-15",
            vec![
                "Introduction to software engineering, GPA : 4.0".into(),
                "Computing architecture, GPA : 3.3".into(),
            ],
        ),
        AcademicCertificate::new(
            "aCert2",
            "SWE1909886",
            "Loo Ken Wae",
            "Bachelor of Software Engineering",
            "2023-07-15",
            vec![
                "Introduction to software engineering, GPA : 2.0".into(),
                "International Business, GPA : 2.0".into(),
            ],
        ),
    ]
}

/// Extracurricular records issued by [`seed`], in issue order.
pub fn sample_extracurricular_certificates() -> Vec<ExtraCurricularCertificate> {
    vec![
        ExtraCurricularCertificate::new(
            "cCert1",
            "SWE1904873",
            "Loo Yong Jun",
            vec![
                "President, Software Engineering Society".into(),
                "Hackathon 2022, First Place".into(),
            ],
        ),
        ExtraCurricularCertificate::new(
            "cCert2",
            "SWE1909886",
            "Loo Ken Wae",
            vec!["Volunteer, Campus Sustainability Drive".into()],
        ),
    ]
}

/// Issue the sample set: every academic record, then every extracurricular
/// record.
///
/// Stops at the first failure. Records issued before that point stay on the
/// ledger; seeding is not atomic as a whole. Returns the issued ids in order.
pub fn seed<S>(store: &S) -> ContractResult<Vec<CertId>>
where
    S: StateStore + ?Sized,
{
    let mut issued = Vec::new();

    for cert in sample_academic_certificates() {
        issued.push(issue_one(store, cert)?);
    }
    for cert in sample_extracurricular_certificates() {
        issued.push(issue_one(store, cert)?);
    }

    info!(count = issued.len(), "ledger seeded");
    Ok(issued)
}

fn issue_one<S, C>(store: &S, cert: C) -> ContractResult<CertId>
where
    S: StateStore + ?Sized,
    C: Certificate,
{
    let cert_id = cert.cert_id().clone();
    issue(store, cert)?;
    Ok(cert_id)
}
