//! Table name patterns.
//!
//! The operator passes either an exact table name or a SQL `LIKE` pattern.
//! Any `%` or `_` makes it a pattern; there is no escape syntax, so a table
//! whose name contains `_` is always matched as a pattern.

/// How the enumeration query should compare table names.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TablePattern {
    /// Case-insensitive equality
    Exact(String),
    /// Case-insensitive SQL `LIKE`
    Like(String),
}

/// Whether `pattern` contains a `LIKE` wildcard (`%` or `_`).
pub fn is_like_pattern(pattern: &str) -> bool {
    pattern.contains(['%', '_'])
}

impl TablePattern {
    /// Classifies raw operator input.
    ///
    /// ```rust
    /// use tablemd_core::TablePattern;
    ///
    /// assert!(matches!(TablePattern::parse("TXD2BV01"), TablePattern::Exact(_)));
    /// assert!(matches!(TablePattern::parse("ABC%"), TablePattern::Like(_)));
    /// ```
    pub fn parse(raw: &str) -> Self {
        if is_like_pattern(raw) {
            Self::Like(raw.to_string())
        } else {
            Self::Exact(raw.to_string())
        }
    }

    /// The text as given by the operator
    pub fn as_str(&self) -> &str {
        match self {
            Self::Exact(value) | Self::Like(value) => value,
        }
    }

    pub fn is_like(&self) -> bool {
        matches!(self, Self::Like(_))
    }
}

impl std::fmt::Display for TablePattern {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.write_str(self.as_str())
    }
}
