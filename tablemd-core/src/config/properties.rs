//! Flat `key=value` properties files.
//!
//! The format is deliberately small: one entry per line, `#` starts a
//! comment line, the first `=` separates key from value, and both sides are
//! trimmed. Nothing else is recognised and nothing is rejected.

use crate::{Result, error::TableMdError};
use std::collections::BTreeMap;
use std::path::Path;

/// Parsed properties, keyed by exact (case-sensitive) key.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct Properties {
    entries: BTreeMap<String, String>,
}

impl Properties {
    /// Parses properties text.
    ///
    /// Blank lines and lines starting with `#` (after trimming) are skipped.
    /// Lines without `=` are dropped silently. A key that appears twice keeps
    /// the last value.
    ///
    /// # Example
    /// ```rust
    /// use tablemd_core::config::Properties;
    ///
    /// let props = Properties::parse("# db\nDB_TYPE = oracle\nDB_TYPE=sqlserver\n");
    /// assert_eq!(props.get("DB_TYPE"), Some("sqlserver"));
    /// ```
    pub fn parse(text: &str) -> Self {
        let mut entries = BTreeMap::new();

        for line in text.lines() {
            let line = line.trim();
            if line.is_empty() || line.starts_with('#') {
                continue;
            }
            if let Some((key, value)) = line.split_once('=') {
                entries.insert(key.trim().to_string(), value.trim().to_string());
            }
        }

        Self { entries }
    }

    /// Reads and parses a properties file.
    ///
    /// # Errors
    /// Returns [`TableMdError::ConfigNotFound`] if the file does not exist and
    /// [`TableMdError::ConfigRead`] if it cannot be read as UTF-8 text.
    pub fn load(path: &Path) -> Result<Self> {
        match std::fs::read_to_string(path) {
            Ok(text) => {
                let props = Self::parse(&text);
                tracing::debug!(
                    "Loaded {} configuration entries from {}",
                    props.len(),
                    path.display()
                );
                Ok(props)
            }
            Err(e) if e.kind() == std::io::ErrorKind::NotFound => {
                Err(TableMdError::ConfigNotFound {
                    path: path.to_path_buf(),
                })
            }
            Err(e) => Err(TableMdError::ConfigRead {
                path: path.to_path_buf(),
                source: e,
            }),
        }
    }

    /// Returns the value for `key`, if present (possibly empty).
    pub fn get(&self, key: &str) -> Option<&str> {
        self.entries.get(key).map(String::as_str)
    }

    /// Returns the value for `key`, treating an empty value as absent.
    pub fn get_non_empty(&self, key: &str) -> Option<&str> {
        self.get(key).filter(|value| !value.is_empty())
    }

    /// Returns the value for `key` or `default` when the key is absent.
    pub fn get_or<'a>(&'a self, key: &str, default: &'a str) -> &'a str {
        self.get(key).unwrap_or(default)
    }

    /// Number of entries.
    pub fn len(&self) -> usize {
        self.entries.len()
    }

    /// Whether no entries were parsed.
    pub fn is_empty(&self) -> bool {
        self.entries.is_empty()
    }
}
