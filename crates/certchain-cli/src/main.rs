use std::io::{self, Write};
use std::process::ExitCode;

use clap::Parser;
use tracing_subscriber::EnvFilter;

mod cli;
mod commands;
mod config;

use config::{CliConfig, OutputFormat};

fn main() -> anyhow::Result<ExitCode> {
    let cli = cli::Cli::parse();
    let config = CliConfig::load(cli.config.as_deref())?.with_overrides(&cli);

    let filter = EnvFilter::try_from_default_env()
        .or_else(|_| EnvFilter::try_new(&config.log.filter))?;
    tracing_subscriber::fmt()
        .with_env_filter(filter)
        .with_writer(io::stderr)
        .init();

    let mut stdout = io::stdout().lock();
    match commands::run_command(cli.command, &config, &mut stdout) {
        Ok(()) => Ok(ExitCode::SUCCESS),
        Err(err) if config.output.format == OutputFormat::Json => {
            serde_json::to_writer_pretty(&mut stdout, &commands::error_json(&err))?;
            writeln!(stdout)?;
            Ok(ExitCode::FAILURE)
        }
        Err(err) => Err(err),
    }
}
