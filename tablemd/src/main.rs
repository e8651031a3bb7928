//! Table documentation tool.
//!
//! Connects to an Oracle or SQL Server catalog, finds the tables matching a
//! name or LIKE pattern and writes one Markdown document per table.
//!
//! # Security Guarantees
//! - Read-only catalog queries only
//! - Passwords are never logged or echoed

use clap::Parser;
use clap::error::ErrorKind;
use std::process::ExitCode;
use tablemd::{Cli, run::run};
use tablemd_core::logging::init_logging;

#[tokio::main(flavor = "current_thread")]
async fn main() -> ExitCode {
    let cli = match Cli::try_parse() {
        Ok(cli) => cli,
        Err(e) if matches!(e.kind(), ErrorKind::DisplayHelp | ErrorKind::DisplayVersion) => e.exit(),
        Err(e) => {
            // Usage errors exit with 1, not clap's default 2
            if e.print().is_err() {
                eprintln!("{e}");
            }
            return ExitCode::from(1);
        }
    };

    if let Err(e) = init_logging(cli.verbose, cli.quiet) {
        eprintln!("{}", e.format_detailed());
        return ExitCode::from(e.exit_code());
    }

    match run(&cli).await {
        Ok(report) => {
            tracing::info!("Generated {} document(s)", report.written.len());
            ExitCode::SUCCESS
        }
        Err(e) => {
            tracing::debug!("Run failed: {:?}", e);
            eprintln!("{}", e.format_detailed());
            ExitCode::from(e.exit_code())
        }
    }
}
