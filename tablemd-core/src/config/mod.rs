//! Run configuration.
//!
//! - `properties`: the flat `key=value` file format
//! - `connection`: typed Oracle / SQL Server connection settings
//!
//! [`ToolConfig`] is the validated top level: which backend to use and
//! where to write documents.

mod connection;
mod properties;

pub use connection::{
    DEFAULT_ORACLE_PORT, DEFAULT_SQLSERVER_DRIVER, DEFAULT_SQLSERVER_PORT, OracleSettings,
    OracleTarget, SqlServerAuth, SqlServerSettings, parse_flag,
};
pub use properties::Properties;

use crate::{Result, error::TableMdError};
use std::path::PathBuf;

/// Default output base directory when `OUTPUT_BASE` is absent
pub const DEFAULT_OUTPUT_BASE: &str = "output";

/// Supported catalog backends.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum BackendKind {
    /// Oracle Database
    Oracle,
    /// Microsoft SQL Server
    SqlServer,
}

impl BackendKind {
    /// Value accepted in `DB_TYPE`
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Oracle => "oracle",
            Self::SqlServer => "sqlserver",
        }
    }

    /// Human-readable label used in console messages
    pub fn label(self) -> &'static str {
        match self {
            Self::Oracle => "Oracle",
            Self::SqlServer => "SQL Server",
        }
    }

    /// Output subdirectory used when the identifying key is not configured
    pub fn fallback_identifier(self) -> &'static str {
        match self {
            Self::Oracle => "ORACLE",
            Self::SqlServer => "MSSQL",
        }
    }
}

impl std::fmt::Display for BackendKind {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.label())
    }
}

impl std::str::FromStr for BackendKind {
    type Err = TableMdError;

    /// Parses a `DB_TYPE` value, ignoring case.
    fn from_str(value: &str) -> Result<Self> {
        match value.to_lowercase().as_str() {
            "oracle" => Ok(Self::Oracle),
            "sqlserver" => Ok(Self::SqlServer),
            _ => Err(TableMdError::UnsupportedBackend {
                value: value.to_string(),
            }),
        }
    }
}

/// Validated top-level configuration for one run.
#[derive(Debug, Clone)]
pub struct ToolConfig {
    backend: BackendKind,
    output_base: PathBuf,
    properties: Properties,
}

impl ToolConfig {
    /// Selects the backend from `DB_TYPE` and resolves `OUTPUT_BASE`.
    ///
    /// Connection keys are left untouched until the backend's settings are
    /// requested.
    ///
    /// # Errors
    /// Returns [`TableMdError::UnsupportedBackend`] when `DB_TYPE` is absent
    /// or not one of `oracle` / `sqlserver`.
    pub fn from_properties(properties: Properties) -> Result<Self> {
        let backend: BackendKind = properties.get_or("DB_TYPE", "").parse()?;
        let output_base = PathBuf::from(properties.get_or("OUTPUT_BASE", DEFAULT_OUTPUT_BASE));

        Ok(Self {
            backend,
            output_base,
            properties,
        })
    }

    /// Selected backend
    pub fn backend(&self) -> BackendKind {
        self.backend
    }

    /// Base directory for generated documents
    pub fn output_base(&self) -> &std::path::Path {
        &self.output_base
    }

    /// Overrides the base output directory (e.g. from the command line)
    pub fn set_output_base(&mut self, output_base: PathBuf) {
        self.output_base = output_base;
    }

    /// Output subdirectory name for the selected backend.
    ///
    /// Oracle uses `ORA_USER`, SQL Server uses `MSSQL_DBNAME`; either falls
    /// back to a fixed name when the key is absent.
    pub fn backend_identifier(&self) -> String {
        let key = match self.backend {
            BackendKind::Oracle => "ORA_USER",
            BackendKind::SqlServer => "MSSQL_DBNAME",
        };
        self.properties
            .get_non_empty(key)
            .unwrap_or(self.backend.fallback_identifier())
            .to_string()
    }

    /// Oracle connection settings.
    ///
    /// # Errors
    /// See [`OracleSettings::from_properties`].
    pub fn oracle_settings(&self) -> Result<OracleSettings> {
        OracleSettings::from_properties(&self.properties)
    }

    /// SQL Server connection settings.
    ///
    /// # Errors
    /// See [`SqlServerSettings::from_properties`].
    pub fn sqlserver_settings(&self) -> Result<SqlServerSettings> {
        SqlServerSettings::from_properties(&self.properties)
    }
}
