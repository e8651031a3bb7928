//! Backend-agnostic table metadata.
//!
//! Both catalog adapters map their rows into these types; the renderer
//! only ever sees this shape.

use std::collections::{BTreeSet, HashMap};

/// One column as reported by the catalog.
///
/// A column carries either a precision (with optional scale) or a plain
/// length, depending on type and backend. Adapters normalise backend quirks
/// (for instance SQL Server's `precision = 0` for character types) before
/// building the descriptor.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ColumnDescriptor {
    pub name: String,
    pub data_type: String,
    pub length: Option<i64>,
    pub precision: Option<i64>,
    pub scale: Option<i64>,
    pub is_nullable: bool,
    /// Raw default expression, untrimmed
    pub default_value: Option<String>,
    pub comment: Option<String>,
}

impl ColumnDescriptor {
    /// Creates a nullable column with no size, default or comment.
    pub fn new(name: impl Into<String>, data_type: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            data_type: data_type.into(),
            length: None,
            precision: None,
            scale: None,
            is_nullable: true,
            default_value: None,
            comment: None,
        }
    }

    pub fn with_length(mut self, length: i64) -> Self {
        self.length = Some(length);
        self
    }

    pub fn with_precision(mut self, precision: i64, scale: Option<i64>) -> Self {
        self.precision = Some(precision);
        self.scale = scale;
        self
    }

    pub fn with_nullable(mut self, is_nullable: bool) -> Self {
        self.is_nullable = is_nullable;
        self
    }

    pub fn with_default(mut self, default_value: impl Into<String>) -> Self {
        self.default_value = Some(default_value.into());
        self
    }

    pub fn with_comment(mut self, comment: impl Into<String>) -> Self {
        self.comment = Some(comment.into());
        self
    }
}

/// Referenced side of a foreign key column.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ForeignKeyTarget {
    pub table: String,
    pub column: String,
}

impl std::fmt::Display for ForeignKeyTarget {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        write!(f, "{}.{}", self.table, self.column)
    }
}

/// Column name -> referenced `Table.Column`.
///
/// Holds at most one target per column. When a column takes part in more
/// than one foreign key, the last inserted target is kept.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct ForeignKeyMap {
    targets: HashMap<String, ForeignKeyTarget>,
}

impl ForeignKeyMap {
    pub fn new() -> Self {
        Self::default()
    }

    /// Records a target for `column`, replacing any earlier one.
    pub fn insert(
        &mut self,
        column: impl Into<String>,
        table: impl Into<String>,
        referenced_column: impl Into<String>,
    ) {
        self.targets.insert(
            column.into(),
            ForeignKeyTarget {
                table: table.into(),
                column: referenced_column.into(),
            },
        );
    }

    pub fn get(&self, column: &str) -> Option<&ForeignKeyTarget> {
        self.targets.get(column)
    }

    pub fn len(&self) -> usize {
        self.targets.len()
    }

    pub fn is_empty(&self) -> bool {
        self.targets.is_empty()
    }
}

impl<C, T, R> FromIterator<(C, T, R)> for ForeignKeyMap
where
    C: Into<String>,
    T: Into<String>,
    R: Into<String>,
{
    fn from_iter<I: IntoIterator<Item = (C, T, R)>>(iter: I) -> Self {
        let mut map = Self::new();
        for (column, table, referenced_column) in iter {
            map.insert(column, table, referenced_column);
        }
        map
    }
}

/// Names of the columns in a table's primary key.
pub type PrimaryKeySet = BTreeSet<String>;

/// Everything rendered into one table document.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TableMetadata {
    pub name: String,
    /// Columns in catalog ordinal order
    pub columns: Vec<ColumnDescriptor>,
    pub primary_key: PrimaryKeySet,
    pub foreign_keys: ForeignKeyMap,
}

impl TableMetadata {
    pub fn new(name: impl Into<String>) -> Self {
        Self {
            name: name.into(),
            columns: Vec::new(),
            primary_key: PrimaryKeySet::new(),
            foreign_keys: ForeignKeyMap::new(),
        }
    }

    /// Whether `column` is part of the primary key
    pub fn is_primary_key(&self, column: &str) -> bool {
        self.primary_key.contains(column)
    }

    /// Foreign key target of `column`, if any
    pub fn foreign_key(&self, column: &str) -> Option<&ForeignKeyTarget> {
        self.foreign_keys.get(column)
    }
}
