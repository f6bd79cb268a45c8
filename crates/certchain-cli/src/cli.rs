use std::path::PathBuf;

use clap::{Args, Parser, Subcommand};

use crate::config::OutputFormat;

#[derive(Parser)]
#[command(
    name = "certchain",
    about = "certchain: issue and look up academic and extracurricular certificates",
    version,
)]
pub struct Cli {
    #[command(subcommand)]
    pub command: Command,

    /// Log at debug level
    #[arg(short, long, global = true)]
    pub verbose: bool,

    #[arg(long, global = true)]
    pub format: Option<OutputFormat>,

    /// Config file (defaults to ./certchain.toml when present)
    #[arg(long, global = true)]
    pub config: Option<PathBuf>,

    /// Ledger state file
    #[arg(long, global = true)]
    pub ledger: Option<PathBuf>,
}

#[derive(Subcommand)]
pub enum Command {
    /// Seed the ledger with the sample certificates
    InitLedger,
    /// Issue an academic certificate
    IssueAcademic(IssueAcademicArgs),
    /// Issue an extracurricular certificate
    IssueExtracurricular(IssueExtracurricularArgs),
    /// Show an academic certificate
    ReadAcademic(CertArgs),
    /// Show an extracurricular certificate
    ReadExtracurricular(CertArgs),
    /// List a student's academic certificates
    QueryAcademic(StudentArgs),
    /// List a student's extracurricular certificates
    QueryExtracurricular(StudentArgs),
    /// Check whether a certificate id is taken
    Exists(CertArgs),
    /// Run a transaction by name with raw string arguments
    Invoke(InvokeArgs),
}

#[derive(Args)]
pub struct IssueAcademicArgs {
    pub cert_id: String,
    #[arg(long)]
    pub student_id: String,
    #[arg(long)]
    pub student_name: String,
    #[arg(long)]
    pub degree: String,
    #[arg(long)]
    pub graduation_date: String,
    /// Transcript entry; repeat for each course
    #[arg(long)]
    pub transcript: Vec<String>,
}

#[derive(Args)]
pub struct IssueExtracurricularArgs {
    pub cert_id: String,
    #[arg(long)]
    pub student_id: String,
    #[arg(long)]
    pub student_name: String,
    /// Achievement; repeat for each entry
    #[arg(long = "achievement")]
    pub achievements: Vec<String>,
}

#[derive(Args)]
pub struct CertArgs {
    pub cert_id: String,
}

#[derive(Args)]
pub struct StudentArgs {
    pub student_id: String,
}

#[derive(Args)]
pub struct InvokeArgs {
    pub function: String,
    pub args: Vec<String>,
}
