//! Invocation by transaction name.
//!
//! The invoking runtime delivers a function name and string arguments and
//! expects a byte payload back. Sequence arguments (`transcript`,
//! `achievements`) arrive as JSON arrays of strings. Records come back as
//! JSON objects that carry `docType`, and queries as JSON arrays of them.

use std::fmt;
use std::str::FromStr;

use certchain_store::StateStore;
use certchain_types::{CertRecord, Certificate};
use serde::Serialize;
use tracing::debug;

use crate::contract::CertContract;
use crate::error::{ContractError, ContractResult};

/// A transaction the contract accepts.
#[derive(Clone, Copy, Debug, PartialEq, Eq, Hash)]
pub enum Function {
    IssueAcademicCertificate,
    IssueExtracurricularCertificate,
    ReadAcademicCertificate,
    ReadExtracurricularCertificate,
    QueryAcademicCertificatesByStudent,
    QueryExtracurricularCertificatesByStudent,
    AssetExists,
    InitLedger,
    /// Older four-argument academic issuance without degree or graduation
    /// date. Those fields are stored empty.
    IssueAcademicCertificateLegacy,
}

impl Function {
    pub const ALL: [Function; 9] = [
        Function::IssueAcademicCertificate,
        Function::IssueExtracurricularCertificate,
        Function::ReadAcademicCertificate,
        Function::ReadExtracurricularCertificate,
        Function::QueryAcademicCertificatesByStudent,
        Function::QueryExtracurricularCertificatesByStudent,
        Function::AssetExists,
        Function::InitLedger,
        Function::IssueAcademicCertificateLegacy,
    ];

    /// Canonical transaction name.
    pub const fn name(&self) -> &'static str {
        match self {
            Self::IssueAcademicCertificate => "IssueAcademicCertificate",
            Self::IssueExtracurricularCertificate => "IssueExtracurricularCertificate",
            Self::ReadAcademicCertificate => "ReadAcademicCertificate",
            Self::ReadExtracurricularCertificate => "ReadExtracurricularCertificate",
            Self::QueryAcademicCertificatesByStudent => "QueryAcademicCertificatesByStudent",
            Self::QueryExtracurricularCertificatesByStudent => {
                "QueryExtracurricularCertificatesByStudent"
            }
            Self::AssetExists => "AssetExists",
            Self::InitLedger => "InitLedger",
            Self::IssueAcademicCertificateLegacy => "IssueAcaCert",
        }
    }

    /// Number of string arguments the transaction takes.
    pub const fn arity(&self) -> usize {
        match self {
            Self::IssueAcademicCertificate => 6,
            Self::IssueExtracurricularCertificate | Self::IssueAcademicCertificateLegacy => 4,
            Self::ReadAcademicCertificate
            | Self::ReadExtracurricularCertificate
            | Self::QueryAcademicCertificatesByStudent
            | Self::QueryExtracurricularCertificatesByStudent
            | Self::AssetExists => 1,
            Self::InitLedger => 0,
        }
    }

    /// Whether the transaction writes to the ledger.
    pub const fn is_submit(&self) -> bool {
        matches!(
            self,
            Self::IssueAcademicCertificate
                | Self::IssueExtracurricularCertificate
                | Self::IssueAcademicCertificateLegacy
                | Self::InitLedger
        )
    }
}

impl fmt::Display for Function {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

impl FromStr for Function {
    type Err = ContractError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let function = match s {
            "IssueAcademicCertificate" => Self::IssueAcademicCertificate,
            "IssueExtracurricularCertificate" | "IssueCurrCert" => {
                Self::IssueExtracurricularCertificate
            }
            "ReadAcademicCertificate" | "ReadAcaCert" => Self::ReadAcademicCertificate,
            "ReadExtracurricularCertificate" | "ReadCurrCert" => {
                Self::ReadExtracurricularCertificate
            }
            "QueryAcademicCertificatesByStudent" | "QueryAcaCertByStudentID" => {
                Self::QueryAcademicCertificatesByStudent
            }
            "QueryExtracurricularCertificatesByStudent" | "QueryCurrCertByStudentID" => {
                Self::QueryExtracurricularCertificatesByStudent
            }
            "AssetExists" => Self::AssetExists,
            "InitLedger" => Self::InitLedger,
            "IssueAcaCert" => Self::IssueAcademicCertificateLegacy,
            other => return Err(ContractError::UnknownFunction(other.to_string())),
        };
        Ok(function)
    }
}

impl<S: StateStore> CertContract<S> {
    /// Run the transaction `function` with string `args`.
    ///
    /// Writes return an empty payload. Reads return JSON.
    pub fn invoke(&self, function: &str, args: &[String]) -> ContractResult<Vec<u8>> {
        let function: Function = function.parse()?;
        debug!(function = %function, args = args.len(), "invoking transaction");

        match (function, args) {
            (
                Function::IssueAcademicCertificate,
                [cert_id, student_id, student_name, degree, graduation_date, transcript],
            ) => {
                self.issue_academic_certificate(
                    cert_id.as_str(),
                    student_id.as_str(),
                    student_name.as_str(),
                    degree.as_str(),
                    graduation_date.as_str(),
                    parse_list("transcript", transcript)?,
                )?;
                Ok(Vec::new())
            }
            (
                Function::IssueAcademicCertificateLegacy,
                [cert_id, student_id, student_name, transcript],
            ) => {
                self.issue_academic_certificate(
                    cert_id.as_str(),
                    student_id.as_str(),
                    student_name.as_str(),
                    "",
                    "",
                    parse_list("transcript", transcript)?,
                )?;
                Ok(Vec::new())
            }
            (
                Function::IssueExtracurricularCertificate,
                [cert_id, student_id, student_name, achievements],
            ) => {
                self.issue_extracurricular_certificate(
                    cert_id.as_str(),
                    student_id.as_str(),
                    student_name.as_str(),
                    parse_list("achievements", achievements)?,
                )?;
                Ok(Vec::new())
            }
            (Function::ReadAcademicCertificate, [cert_id]) => {
                record_payload(self.read_academic_certificate(cert_id.as_str())?)
            }
            (Function::ReadExtracurricularCertificate, [cert_id]) => {
                record_payload(self.read_extracurricular_certificate(cert_id.as_str())?)
            }
            (Function::QueryAcademicCertificatesByStudent, [student_id]) => list_payload(
                self.query_academic_certificates_by_student(student_id.as_str())?,
            ),
            (Function::QueryExtracurricularCertificatesByStudent, [student_id]) => list_payload(
                self.query_extracurricular_certificates_by_student(student_id.as_str())?,
            ),
            (Function::AssetExists, [cert_id]) => {
                json_payload(&self.asset_exists(cert_id.as_str())?)
            }
            (Function::InitLedger, []) => {
                self.init_ledger()?;
                Ok(Vec::new())
            }
            (function, args) => Err(ContractError::InvalidArgument(format!(
                "{function} expects {} arguments, got {}",
                function.arity(),
                args.len()
            ))),
        }
    }
}

fn parse_list(field: &str, raw: &str) -> ContractResult<Vec<String>> {
    serde_json::from_str(raw).map_err(|e| {
        ContractError::InvalidArgument(format!("{field} must be a JSON array of strings: {e}"))
    })
}

fn json_payload<T: Serialize + ?Sized>(value: &T) -> ContractResult<Vec<u8>> {
    serde_json::to_vec(value).map_err(|e| ContractError::Serialization(e.to_string()))
}

fn record_payload<C: Certificate>(cert: C) -> ContractResult<Vec<u8>> {
    json_payload(&cert.into_record())
}

fn list_payload<C: Certificate>(certs: Vec<C>) -> ContractResult<Vec<u8>> {
    let records: Vec<CertRecord> = certs.into_iter().map(Certificate::into_record).collect();
    json_payload(&records)
}
