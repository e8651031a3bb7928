//! Catalog adapters for Oracle and SQL Server.
//!
//! Each adapter owns one live connection and answers three questions about
//! the configured schema: which tables match a pattern, what a table's
//! columns and keys look like, and how to close the connection again. All
//! catalog access is read-only.

use async_trait::async_trait;
use std::io::{self, Write};
use tablemd_core::{
    BackendKind, Result, TableMdError, TableMetadata, TablePattern, ToolConfig,
    render_table_document,
};

#[cfg(feature = "oracle")]
pub mod oracle;

#[cfg(feature = "mssql")]
pub mod sqlserver;

/// Read-only access to one backend's catalog.
///
/// Adapters are used strictly sequentially: one query at a time, one table
/// at a time.
///
/// # Security
///
/// Implementations must ensure:
/// - Passwords are never logged or included in error messages
/// - Only `SELECT` statements against catalog views are issued
/// - [`safe_description`](Self::safe_description) contains no credentials
#[async_trait]
pub trait CatalogAdapter: Send {
    /// Backend this adapter talks to
    fn backend(&self) -> BackendKind;

    /// Output subdirectory name for this run (Oracle user or SQL Server database)
    fn backend_identifier(&self) -> &str;

    /// Catalog scope used in console messages, e.g. `schema=SCOTT`
    fn scope_description(&self) -> String;

    /// Connection target for logging (no credentials)
    fn safe_description(&self) -> String;

    /// Lists matching base tables in ascending name order.
    ///
    /// # Errors
    ///
    /// Returns [`TableMdError::Query`] if the catalog query fails.
    async fn enumerate_tables(&mut self, pattern: &TablePattern) -> Result<Vec<String>>;

    /// Collects columns, primary key and foreign keys of one table.
    ///
    /// # Errors
    ///
    /// Returns [`TableMdError::Query`] if any of the catalog queries fails.
    async fn collect_metadata(&mut self, table: &str) -> Result<TableMetadata>;

    /// Renders collected metadata as a Markdown document.
    ///
    /// # Errors
    ///
    /// Returns [`TableMdError::Render`] if the template fails.
    fn render(&self, table: &TableMetadata) -> Result<String> {
        render_table_document(table)
    }

    /// Closes the connection. Calling it twice is a no-op.
    ///
    /// # Errors
    ///
    /// Returns [`TableMdError::Connection`] if the driver reports a failure
    /// while closing.
    async fn close(&mut self) -> Result<()>;
}

/// Opens an adapter for the backend selected in `config`.
///
/// Backend settings are validated before any connection attempt. When
/// `prompt_password` is set, the password is read from the terminal and
/// replaces the configured one.
///
/// # Errors
///
/// - [`TableMdError::Configuration`] for missing or malformed settings
/// - [`TableMdError::BackendUnavailable`] if the backend is not compiled in,
///   its client library is missing, or the auth mode is not supported here
/// - [`TableMdError::Connection`] if connecting or logging in fails
pub async fn connect_adapter(
    config: &ToolConfig,
    prompt_password: bool,
) -> Result<Box<dyn CatalogAdapter>> {
    match config.backend() {
        BackendKind::Oracle => connect_oracle(config, prompt_password).await,
        BackendKind::SqlServer => connect_sqlserver(config, prompt_password).await,
    }
}

#[cfg(feature = "oracle")]
async fn connect_oracle(
    config: &ToolConfig,
    prompt_password: bool,
) -> Result<Box<dyn CatalogAdapter>> {
    let mut settings = config.oracle_settings()?;
    if prompt_password {
        let password = read_password(&format!(
            "Oracle password for {}: ",
            settings.credentials.username()
        ))?;
        settings.credentials.set_password(password);
    }

    let adapter = oracle::OracleAdapter::connect(settings, config.backend_identifier()).await?;
    Ok(Box::new(adapter))
}

#[cfg(not(feature = "oracle"))]
#[allow(clippy::unused_async)]
async fn connect_oracle(
    config: &ToolConfig,
    _prompt_password: bool,
) -> Result<Box<dyn CatalogAdapter>> {
    config.oracle_settings()?;
    Err(TableMdError::backend_unavailable(
        "Oracle",
        "this build does not include the Oracle adapter",
        "Rebuild with --features oracle to enable Oracle support",
    ))
}

#[cfg(feature = "mssql")]
async fn connect_sqlserver(
    config: &ToolConfig,
    prompt_password: bool,
) -> Result<Box<dyn CatalogAdapter>> {
    use tablemd_core::config::SqlServerAuth;

    let mut settings = config.sqlserver_settings()?;
    if prompt_password {
        match &mut settings.auth {
            SqlServerAuth::SqlLogin(credentials) => {
                let password = read_password(&format!(
                    "SQL Server password for {}: ",
                    credentials.username()
                ))?;
                credentials.set_password(password);
            }
            SqlServerAuth::Integrated => {
                tracing::warn!("--prompt-password ignored: integrated authentication is configured");
            }
        }
    }

    let adapter =
        sqlserver::SqlServerAdapter::connect(settings, config.backend_identifier()).await?;
    Ok(Box::new(adapter))
}

#[cfg(not(feature = "mssql"))]
#[allow(clippy::unused_async)]
async fn connect_sqlserver(
    config: &ToolConfig,
    _prompt_password: bool,
) -> Result<Box<dyn CatalogAdapter>> {
    config.sqlserver_settings()?;
    Err(TableMdError::backend_unavailable(
        "SQL Server",
        "this build does not include the SQL Server adapter",
        "Rebuild with --features mssql to enable SQL Server support",
    ))
}

/// Reads a password from the terminal without echo.
///
/// The prompt goes to stderr; stdout carries only result lines.
#[cfg_attr(not(any(feature = "oracle", feature = "mssql")), allow(dead_code))]
fn read_password(prompt: &str) -> Result<String> {
    eprint!("{prompt}");
    io::stderr().flush().map_err(|e| {
        TableMdError::configuration(format!(
            "Failed to flush stderr before reading password: {e}"
        ))
    })?;
    let password = rpassword::read_password()
        .map_err(|e| TableMdError::configuration(format!("Failed to read password: {e}")))?;

    if password.is_empty() {
        return Err(TableMdError::configuration("Password cannot be empty"));
    }
    Ok(password)
}
