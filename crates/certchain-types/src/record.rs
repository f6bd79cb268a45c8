use std::fmt;

use serde::{Deserialize, Serialize};

use crate::id::{CertId, StudentId};

/// Discriminator stored in every record's `docType` field.
///
/// The issuing operation sets it; callers never supply it. It is the only
/// way to tell which variant a stored blob holds.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum DocType {
    #[serde(rename = "aCert")]
    Academic,
    #[serde(rename = "cCert")]
    Extracurricular,
}

impl DocType {
    /// The wire tag for this variant.
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Academic => "aCert",
            Self::Extracurricular => "cCert",
        }
    }

    /// Parse a wire tag. Returns `None` for unknown tags.
    pub fn from_tag(tag: &str) -> Option<Self> {
        match tag {
            "aCert" => Some(Self::Academic),
            "cCert" => Some(Self::Extracurricular),
            _ => None,
        }
    }
}

impl fmt::Display for DocType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// An academic certificate with its course transcript.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct AcademicCertificate {
    #[serde(rename = "certID")]
    pub cert_id: CertId,
    #[serde(rename = "studentID")]
    pub student_id: StudentId,
    #[serde(rename = "studentName")]
    pub student_name: String,
    pub degree: String,
    #[serde(rename = "graduationDate")]
    pub graduation_date: String,
    /// Free-text course/grade entries, in issue order.
    pub transcript: Vec<String>,
}

impl AcademicCertificate {
    pub fn new(
        cert_id: impl Into<CertId>,
        student_id: impl Into<StudentId>,
        student_name: impl Into<String>,
        degree: impl Into<String>,
        graduation_date: impl Into<String>,
        transcript: Vec<String>,
    ) -> Self {
        Self {
            cert_id: cert_id.into(),
            student_id: student_id.into(),
            student_name: student_name.into(),
            degree: degree.into(),
            graduation_date: graduation_date.into(),
            transcript,
        }
    }
}

/// An extracurricular certificate listing a student's achievements.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
pub struct ExtraCurricularCertificate {
    #[serde(rename = "certID")]
    pub cert_id: CertId,
    #[serde(rename = "studentID")]
    pub student_id: StudentId,
    #[serde(rename = "studentName")]
    pub student_name: String,
    pub achievements: Vec<String>,
}

impl ExtraCurricularCertificate {
    pub fn new(
        cert_id: impl Into<CertId>,
        student_id: impl Into<StudentId>,
        student_name: impl Into<String>,
        achievements: Vec<String>,
    ) -> Self {
        Self {
            cert_id: cert_id.into(),
            student_id: student_id.into(),
            student_name: student_name.into(),
            achievements,
        }
    }
}

/// A stored certificate of either variant.
///
/// Serializes as a single flat object carrying `docType` next to the variant
/// fields, e.g. `{"docType":"aCert","certID":"aCert1",...}`.
#[derive(Clone, Debug, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "docType")]
pub enum CertRecord {
    #[serde(rename = "aCert")]
    Academic(AcademicCertificate),
    #[serde(rename = "cCert")]
    Extracurricular(ExtraCurricularCertificate),
}

impl CertRecord {
    pub fn doc_type(&self) -> DocType {
        match self {
            Self::Academic(_) => DocType::Academic,
            Self::Extracurricular(_) => DocType::Extracurricular,
        }
    }

    pub fn cert_id(&self) -> &CertId {
        match self {
            Self::Academic(c) => &c.cert_id,
            Self::Extracurricular(c) => &c.cert_id,
        }
    }

    pub fn student_id(&self) -> &StudentId {
        match self {
            Self::Academic(c) => &c.student_id,
            Self::Extracurricular(c) => &c.student_id,
        }
    }
}

impl From<AcademicCertificate> for CertRecord {
    fn from(cert: AcademicCertificate) -> Self {
        Self::Academic(cert)
    }
}

impl From<ExtraCurricularCertificate> for CertRecord {
    fn from(cert: ExtraCurricularCertificate) -> Self {
        Self::Extracurricular(cert)
    }
}

/// A concrete certificate variant.
///
/// Ties each record shape to its [`DocType`] so the issuance, retrieval, and
/// query paths can be written once and instantiated per variant.
pub trait Certificate: Clone + fmt::Debug + Send + Sized {
    const DOC_TYPE: DocType;

    fn cert_id(&self) -> &CertId;

    fn student_id(&self) -> &StudentId;

    fn into_record(self) -> CertRecord;

    /// Extract this variant from a record, handing the record back unchanged
    /// when it holds the other variant.
    fn from_record(record: CertRecord) -> Result<Self, CertRecord>;

    fn doc_type(&self) -> DocType {
        Self::DOC_TYPE
    }
}

impl Certificate for AcademicCertificate {
    const DOC_TYPE: DocType = DocType::Academic;

    fn cert_id(&self) -> &CertId {
        &self.cert_id
    }

    fn student_id(&self) -> &StudentId {
        &self.student_id
    }

    fn into_record(self) -> CertRecord {
        CertRecord::Academic(self)
    }

    fn from_record(record: CertRecord) -> Result<Self, CertRecord> {
        match record {
            CertRecord::Academic(c) => Ok(c),
            other @ CertRecord::Extracurricular(_) => Err(other),
        }
    }
}

impl Certificate for ExtraCurricularCertificate {
    const DOC_TYPE: DocType = DocType::Extracurricular;

    fn cert_id(&self) -> &CertId {
        &self.cert_id
    }

    fn student_id(&self) -> &StudentId {
        &self.student_id
    }

    fn into_record(self) -> CertRecord {
        CertRecord::Extracurricular(self)
    }

    fn from_record(record: CertRecord) -> Result<Self, CertRecord> {
        match record {
            CertRecord::Extracurricular(c) => Ok(c),
            other @ CertRecord::Academic(_) => Err(other),
        }
    }
}
