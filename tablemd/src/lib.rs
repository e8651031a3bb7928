//! Library module for tablemd
//!
//! This module exposes the command line, the catalog adapters and the
//! generation pipeline for testing purposes. The binary entry point is in
//! main.rs.

pub mod adapters;
pub mod output;
pub mod run;

use clap::Parser;
use std::path::PathBuf;

/// Default configuration file name, looked up next to the executable
pub const DEFAULT_CONFIG_FILE: &str = "tablemd.properties";

/// CLI argument structure
#[derive(Parser, Debug)]
#[command(name = "tablemd")]
#[command(about = "Render Oracle and SQL Server table definitions as Markdown")]
#[command(version)]
#[command(long_about = "
tablemd - table definitions as Markdown

Reads connection settings from a properties file, finds the tables whose
names match PATTERN and writes one Markdown document per table to
<OUTPUT_BASE>/<schema or database>/TABLE_<name>.md.

PATTERN is an exact table name (case-insensitive) unless it contains
% or _, in which case it is a SQL LIKE pattern.

EXAMPLES:
  tablemd TXD2BV01
  tablemd 'ABC%'
  tablemd --config prod.properties --output-base docs/tables 'ORDER%'
")]
pub struct Cli {
    /// Table name or LIKE pattern
    #[arg(value_name = "PATTERN")]
    pub pattern: String,

    /// Properties file with connection settings
    #[arg(
        short,
        long,
        value_name = "FILE",
        env = "TABLEMD_CONFIG",
        help = "Properties file (default: tablemd.properties next to the executable)"
    )]
    pub config: Option<PathBuf>,

    /// Output base directory
    #[arg(long, value_name = "DIR", help = "Override OUTPUT_BASE from the properties file")]
    pub output_base: Option<PathBuf>,

    /// Prompt for the database password
    #[arg(long, help = "Read the database password from the terminal")]
    pub prompt_password: bool,

    /// Increase verbosity
    #[arg(
        short,
        long,
        action = clap::ArgAction::Count,
        help = "Increase verbosity (-v, -vv, -vvv)"
    )]
    pub verbose: u8,

    /// Suppress output
    #[arg(short, long, help = "Suppress all log output except errors")]
    pub quiet: bool,
}

impl Cli {
    /// Configuration file to load.
    ///
    /// An explicit `--config` (or `TABLEMD_CONFIG`) wins. Otherwise the
    /// default file next to the running executable is used, falling back to
    /// the working directory if the executable path is unknown.
    pub fn config_path(&self) -> PathBuf {
        if let Some(path) = &self.config {
            return path.clone();
        }

        std::env::current_exe()
            .ok()
            .and_then(|exe| exe.parent().map(|dir| dir.join(DEFAULT_CONFIG_FILE)))
            .unwrap_or_else(|| PathBuf::from(DEFAULT_CONFIG_FILE))
    }
}
