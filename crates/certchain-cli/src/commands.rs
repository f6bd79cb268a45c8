use std::io::Write;

use anyhow::Context;
use colored::Colorize;
use serde::Serialize;
use serde_json::json;
use tracing::debug;

use certchain_contract::{CertContract, ContractError};
use certchain_store::FileStateStore;
use certchain_types::{AcademicCertificate, CertRecord, ExtraCurricularCertificate};

use crate::cli::*;
use crate::config::{CliConfig, OutputFormat};

pub fn run_command(command: Command, config: &CliConfig, out: &mut impl Write) -> anyhow::Result<()> {
    let store = FileStateStore::open(&config.ledger.path)
        .with_context(|| format!("failed to open ledger {}", config.ledger.path.display()))?;
    debug!(ledger = %config.ledger.path.display(), "ledger opened");
    let contract = CertContract::new(store);
    let format = config.output.format;

    match command {
        Command::InitLedger => cmd_init_ledger(&contract, format, out),
        Command::IssueAcademic(args) => cmd_issue_academic(&contract, args, format, out),
        Command::IssueExtracurricular(args) => cmd_issue_extracurricular(&contract, args, format, out),
        Command::ReadAcademic(args) => {
            let cert = contract.read_academic_certificate(args.cert_id)?;
            emit(out, format, &CertRecord::from(cert.clone()), |out| print_academic(out, &cert))
        }
        Command::ReadExtracurricular(args) => {
            let cert = contract.read_extracurricular_certificate(args.cert_id)?;
            emit(out, format, &CertRecord::from(cert.clone()), |out| print_extracurricular(out, &cert))
        }
        Command::QueryAcademic(args) => {
            let certs = contract.query_academic_certificates_by_student(args.student_id.as_str())?;
            let records: Vec<CertRecord> = certs.iter().cloned().map(CertRecord::from).collect();
            emit(out, format, &records, |out| {
                if certs.is_empty() {
                    writeln!(out, "No academic certificates for {}.", args.student_id.yellow())?;
                }
                for cert in &certs {
                    print_academic(out, cert)?;
                }
                Ok(())
            })
        }
        Command::QueryExtracurricular(args) => {
            let certs = contract.query_extracurricular_certificates_by_student(args.student_id.as_str())?;
            let records: Vec<CertRecord> = certs.iter().cloned().map(CertRecord::from).collect();
            emit(out, format, &records, |out| {
                if certs.is_empty() {
                    writeln!(out, "No extracurricular certificates for {}.", args.student_id.yellow())?;
                }
                for cert in &certs {
                    print_extracurricular(out, cert)?;
                }
                Ok(())
            })
        }
        Command::Exists(args) => {
            let exists = contract.asset_exists(args.cert_id.as_str())?;
            emit(out, format, &json!({ "certID": &args.cert_id, "exists": exists }), |out| {
                if exists {
                    writeln!(out, "{} {} is issued", "✓".green(), args.cert_id.yellow())
                } else {
                    writeln!(out, "{} {} is not issued", "✗".red(), args.cert_id.yellow())
                }
            })
        }
        Command::Invoke(args) => {
            let payload = contract.invoke(&args.function, &args.args)?;
            if payload.is_empty() {
                if format == OutputFormat::Text {
                    writeln!(out, "{} {} committed", "✓".green().bold(), args.function.bold())?;
                }
            } else {
                out.write_all(&payload)?;
                writeln!(out)?;
            }
            Ok(())
        }
    }
}

fn cmd_init_ledger(
    contract: &CertContract<FileStateStore>,
    format: OutputFormat,
    out: &mut impl Write,
) -> anyhow::Result<()> {
    let ids = contract.init_ledger()?;
    emit(out, format, &json!({ "seeded": &ids }), |out| {
        writeln!(out, "{} Seeded ledger with {} certificates", "✓".green().bold(), ids.len())?;
        for id in &ids {
            writeln!(out, "  {}", id.as_str().yellow())?;
        }
        Ok(())
    })
}

fn cmd_issue_academic(
    contract: &CertContract<FileStateStore>,
    args: IssueAcademicArgs,
    format: OutputFormat,
    out: &mut impl Write,
) -> anyhow::Result<()> {
    let cert = AcademicCertificate::new(
        args.cert_id,
        args.student_id,
        args.student_name,
        args.degree,
        args.graduation_date,
        args.transcript,
    );
    contract.issue(cert.clone())?;
    emit(out, format, &CertRecord::from(cert.clone()), |out| {
        writeln!(out, "{} Issued academic certificate {}", "✓".green().bold(), cert.cert_id.as_str().yellow())
    })
}

fn cmd_issue_extracurricular(
    contract: &CertContract<FileStateStore>,
    args: IssueExtracurricularArgs,
    format: OutputFormat,
    out: &mut impl Write,
) -> anyhow::Result<()> {
    let cert = ExtraCurricularCertificate::new(
        args.cert_id,
        args.student_id,
        args.student_name,
        args.achievements,
    );
    contract.issue(cert.clone())?;
    emit(out, format, &CertRecord::from(cert.clone()), |out| {
        writeln!(
            out,
            "{} Issued extracurricular certificate {}",
            "✓".green().bold(),
            cert.cert_id.as_str().yellow()
        )
    })
}

/// Write `value` as JSON, or run `text` for human output.
fn emit<W, T, F>(out: &mut W, format: OutputFormat, value: &T, text: F) -> anyhow::Result<()>
where
    W: Write,
    T: Serialize + ?Sized,
    F: FnOnce(&mut W) -> std::io::Result<()>,
{
    match format {
        OutputFormat::Json => {
            serde_json::to_writer_pretty(&mut *out, value)?;
            writeln!(out)?;
        }
        OutputFormat::Text => text(out)?,
    }
    Ok(())
}

fn print_academic(out: &mut impl Write, cert: &AcademicCertificate) -> std::io::Result<()> {
    writeln!(out, "{} {}", "Academic certificate".bold(), cert.cert_id.as_str().yellow().bold())?;
    writeln!(out, "  Student: {} ({})", cert.student_name, cert.student_id.as_str().cyan())?;
    writeln!(out, "  Degree: {}", cert.degree)?;
    writeln!(out, "  Graduated: {}", cert.graduation_date)?;
    for line in &cert.transcript {
        writeln!(out, "  - {line}")?;
    }
    Ok(())
}

fn print_extracurricular(out: &mut impl Write, cert: &ExtraCurricularCertificate) -> std::io::Result<()> {
    writeln!(out, "{} {}", "Extracurricular certificate".bold(), cert.cert_id.as_str().yellow().bold())?;
    writeln!(out, "  Student: {} ({})", cert.student_name, cert.student_id.as_str().cyan())?;
    for achievement in &cert.achievements {
        writeln!(out, "  - {achievement}")?;
    }
    Ok(())
}

/// JSON body reported for a failed command in `--format json` mode.
pub fn error_json(err: &anyhow::Error) -> serde_json::Value {
    match err.downcast_ref::<ContractError>() {
        Some(contract_err) => json!({
            "error": {
                "kind": contract_err.kind(),
                "message": contract_err.to_string(),
                "retryable": contract_err.is_retryable(),
            }
        }),
        None => json!({
            "error": {
                "kind": "cli",
                "message": format!("{err:#}"),
                "retryable": false,
            }
        }),
    }
}
