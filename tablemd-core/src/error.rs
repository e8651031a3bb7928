//! Error types and process exit codes.
//!
//! Every failure the tool can report is a variant of [`TableMdError`]. Each
//! variant maps to a stable process exit status through
//! [`TableMdError::exit_code`], so scripts can tell a missing configuration
//! file apart from an unreachable database.
//!
//! # Security
//! Messages never include passwords. Connection failures carry the driver
//! error as their source, and callers describe the target through
//! credential-free descriptions only.

use std::path::PathBuf;
use thiserror::Error;

/// Main error type for tablemd operations.
#[derive(Debug, Error)]
pub enum TableMdError {
    /// Command-line usage error
    #[error("{message}")]
    Usage { message: String },

    /// The properties file does not exist
    #[error("Configuration file not found: {}", path.display())]
    ConfigNotFound { path: PathBuf },

    /// The properties file exists but could not be read
    #[error("Failed to read configuration file {}", path.display())]
    ConfigRead {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// `DB_TYPE` is missing or names an unknown backend
    #[error("Unsupported DB_TYPE '{value}': expected 'oracle' or 'sqlserver'")]
    UnsupportedBackend { value: String },

    /// A configuration value is missing or malformed
    #[error("Configuration error: {message}")]
    Configuration { message: String },

    /// The backend cannot be used by this build or on this machine
    #[error("{backend} support is unavailable: {reason}\n  Hint: {hint}")]
    BackendUnavailable {
        backend: String,
        reason: String,
        hint: String,
    },

    /// Connecting or authenticating failed
    #[error("Database connection failed: {context}")]
    Connection {
        context: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// A catalog query failed
    #[error("Catalog query failed: {context}")]
    Query {
        context: String,
        #[source]
        source: Box<dyn std::error::Error + Send + Sync>,
    },

    /// The Markdown template could not be rendered
    #[error("Failed to render Markdown for table {table}")]
    Render {
        table: String,
        #[source]
        source: askama::Error,
    },

    /// Writing output failed
    #[error("I/O operation failed: {context}")]
    Io {
        context: String,
        #[source]
        source: std::io::Error,
    },
}

/// Convenience type alias for Results with TableMdError
pub type Result<T> = std::result::Result<T, TableMdError>;

impl TableMdError {
    /// Creates a usage error
    pub fn usage(message: impl Into<String>) -> Self {
        Self::Usage {
            message: message.into(),
        }
    }

    /// Creates a configuration error
    pub fn configuration(message: impl Into<String>) -> Self {
        Self::Configuration {
            message: message.into(),
        }
    }

    /// Creates a backend-unavailable error with a remediation hint
    pub fn backend_unavailable(
        backend: impl Into<String>,
        reason: impl Into<String>,
        hint: impl Into<String>,
    ) -> Self {
        Self::BackendUnavailable {
            backend: backend.into(),
            reason: reason.into(),
            hint: hint.into(),
        }
    }

    /// Creates a connection error with sanitized context
    pub fn connection_failed<E>(context: impl Into<String>, error: E) -> Self
    where
        E: Into<Box<dyn std::error::Error + Send + Sync>>,
    {
        Self::Connection {
            context: context.into(),
            source: error.into(),
        }
    }

    /// Creates a catalog query error
    pub fn query_failed<E>(context: impl Into<String>, error: E) -> Self
    where
        E: Into<Box<dyn std::error::Error + Send + Sync>>,
    {
        Self::Query {
            context: context.into(),
            source: error.into(),
        }
    }

    /// Creates an I/O error with context
    pub fn io(context: impl Into<String>, source: std::io::Error) -> Self {
        Self::Io {
            context: context.into(),
            source,
        }
    }

    /// Process exit status for this error.
    ///
    /// | Code | Condition |
    /// |---|---|
    /// | 1 | usage |
    /// | 2 | configuration file absent or unreadable |
    /// | 3 | unsupported `DB_TYPE` |
    /// | 4 | invalid configuration value |
    /// | 5 | backend unavailable |
    /// | 6 | connection failure |
    /// | 7 | catalog query failure |
    /// | 8 | rendering or output failure |
    pub fn exit_code(&self) -> u8 {
        match self {
            Self::Usage { .. } => 1,
            Self::ConfigNotFound { .. } | Self::ConfigRead { .. } => 2,
            Self::UnsupportedBackend { .. } => 3,
            Self::Configuration { .. } => 4,
            Self::BackendUnavailable { .. } => 5,
            Self::Connection { .. } => 6,
            Self::Query { .. } => 7,
            Self::Render { .. } | Self::Io { .. } => 8,
        }
    }

    /// Formats the error with its full source chain.
    pub fn format_detailed(&self) -> String {
        let mut output = format!("Error: {self}");

        let mut source = std::error::Error::source(self);
        let mut depth = 1_usize;
        while let Some(err) = source {
            output.push_str(&format!("\nCaused by:\n  {depth}: {err}"));
            source = err.source();
            depth = depth.saturating_add(1);
        }

        output
    }
}
