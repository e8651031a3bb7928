//! Core data structures and utilities for tablemd.
//!
//! This crate holds everything the `tablemd` binary needs that does not
//! touch a database driver: configuration loading, the error taxonomy and
//! its exit codes, logging setup, the backend-agnostic table model, table
//! pattern classification and the Markdown renderer.
//!
//! # Security Guarantees
//! - Passwords are held in zeroizing containers and never logged
//! - Catalog access is read-only; nothing here issues SQL itself
//!
//! # Flow
//! The binary loads [`config::Properties`], validates them into a
//! [`ToolConfig`], asks an adapter for [`TableMetadata`] and hands each
//! table to [`render::render_table_document`].

pub mod config;
pub mod error;
pub mod logging;
pub mod models;
pub mod pattern;
pub mod render;
pub mod security;

// Re-export commonly used types
pub use config::{BackendKind, Properties, ToolConfig};
pub use error::{Result, TableMdError};
pub use models::{ColumnDescriptor, ForeignKeyMap, ForeignKeyTarget, PrimaryKeySet, TableMetadata};
pub use pattern::TablePattern;
pub use render::render_table_document;
pub use security::Credentials;
