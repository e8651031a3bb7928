//! The generation pipeline.
//!
//! Load configuration, open one adapter, enumerate matching tables and
//! render each one to disk in order. The connection is closed on every
//! path out of [`run`].

use crate::Cli;
use crate::adapters::{CatalogAdapter, connect_adapter};
use crate::output::{output_directory, write_document};
use std::io::Write;
use std::path::{Path, PathBuf};
use tablemd_core::{Properties, Result, TableMdError, TablePattern, ToolConfig};

/// Outcome of one generation pass.
#[derive(Debug, Default, Clone, PartialEq, Eq)]
pub struct GenerationReport {
    /// Tables that matched the pattern, in enumeration order
    pub tables: Vec<String>,
    /// Files written, in the same order
    pub written: Vec<PathBuf>,
}

/// Renders every table matching `pattern` into `output_base`.
///
/// Tables are processed one at a time in the order the adapter returns
/// them. For each written file one `[<Backend>] Generated: <path>` line
/// goes to `console`; when nothing matches a single informational line is
/// written instead and the report is empty.
///
/// # Errors
///
/// Any failure while collecting, rendering or writing a table aborts the
/// pass; files written before the failure are kept.
pub async fn generate_documents(
    adapter: &mut dyn CatalogAdapter,
    pattern: &TablePattern,
    output_base: &Path,
    console: &mut dyn Write,
) -> Result<GenerationReport> {
    let label = adapter.backend().label();
    let tables = adapter.enumerate_tables(pattern).await?;
    tracing::info!("{} table(s) match pattern {}", tables.len(), pattern);

    if tables.is_empty() {
        console_line(
            console,
            &format!(
                "[{label}] No matching tables ({}, pattern={pattern})",
                adapter.scope_description()
            ),
        )?;
        return Ok(GenerationReport::default());
    }

    let directory = output_directory(output_base, adapter.backend_identifier());
    let mut report = GenerationReport::default();

    for table in tables {
        let metadata = adapter.collect_metadata(&table).await?;
        let document = adapter.render(&metadata)?;
        let path = write_document(&directory, &table, &document).await?;

        console_line(console, &format!("[{label}] Generated: {}", path.display()))?;
        report.written.push(path);
        report.tables.push(table);
    }

    Ok(report)
}

fn console_line(console: &mut dyn Write, line: &str) -> Result<()> {
    writeln!(console, "{line}")
        .and_then(|()| console.flush())
        .map_err(|e| TableMdError::io("Failed to write console output", e))
}

/// Closes the adapter and merges the close outcome with the run outcome.
///
/// A failed run keeps its own error; a close failure is then only logged.
/// After a successful run a close failure becomes the result.
pub async fn close_adapter<T>(adapter: &mut dyn CatalogAdapter, outcome: Result<T>) -> Result<T> {
    let closed = adapter.close().await;
    match (outcome, closed) {
        (Ok(value), Ok(())) => Ok(value),
        (Ok(_), Err(close_error)) => Err(close_error),
        (Err(error), Ok(())) => Err(error),
        (Err(error), Err(close_error)) => {
            tracing::warn!("Failed to close connection after error: {}", close_error);
            Err(error)
        }
    }
}

/// Loads configuration and applies command-line overrides.
///
/// # Errors
///
/// Returns the loader's error for a missing or unreadable file and the
/// validation error for an unsupported `DB_TYPE`.
pub fn load_config(cli: &Cli) -> Result<ToolConfig> {
    let path = cli.config_path();
    tracing::debug!("Loading configuration from {}", path.display());

    let mut config = ToolConfig::from_properties(Properties::load(&path)?)?;
    if let Some(output_base) = &cli.output_base {
        config.set_output_base(output_base.clone());
    }
    Ok(config)
}

/// Runs one complete generation for the parsed command line.
///
/// # Errors
///
/// Returns the first error of the run; see [`TableMdError::exit_code`] for
/// how each maps to a process status.
pub async fn run(cli: &Cli) -> Result<GenerationReport> {
    if cli.pattern.trim().is_empty() {
        return Err(TableMdError::usage("Table name or pattern must not be empty"));
    }

    let config = load_config(cli)?;
    let pattern = TablePattern::parse(&cli.pattern);
    tracing::info!(
        "Documenting {} tables matching {} into {}",
        config.backend(),
        pattern,
        config.output_base().display()
    );

    let mut adapter = connect_adapter(&config, cli.prompt_password).await?;
    tracing::debug!("Using {}", adapter.safe_description());

    let mut stdout = std::io::stdout();
    let outcome =
        generate_documents(adapter.as_mut(), &pattern, config.output_base(), &mut stdout).await;
    close_adapter(adapter.as_mut(), outcome).await
}
