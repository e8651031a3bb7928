//! Markdown rendering for table metadata.
//!
//! One document per table: a heading, a blank line and a fixed eight-column
//! Markdown table with one row per column. Lines are joined with `\n` and
//! the document has no trailing newline.

use crate::models::{ColumnDescriptor, TableMetadata};
use crate::{Result, error::TableMdError};
use askama::Template;
use std::fmt;

/// Header row of the column table
pub const HEADER_ROW: &str =
    "| Field | Type | Length/Precision | Nullable | Default | PK | FK | Comment |";

/// Alignment row of the column table
pub const SEPARATOR_ROW: &str = "|---|---|---:|:---:|:---:|:---:|:---:|---|";

#[derive(Template)]
#[template(
    source = "## Table: {{ table_name }}\n\n{{ header }}\n{{ separator }}{% for row in rows %}\n{{ row }}{% endfor %}",
    ext = "md",
    escape = "none"
)]
struct TableDocument<'a> {
    table_name: &'a str,
    header: &'a str,
    separator: &'a str,
    rows: Vec<ColumnRow<'a>>,
}

/// One rendered row of the column table.
struct ColumnRow<'a> {
    table: &'a TableMetadata,
    column: &'a ColumnDescriptor,
}

impl fmt::Display for ColumnRow<'_> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        let column = self.column;
        let nullable = if column.is_nullable { "Y" } else { "N" };
        let primary_key = if self.table.is_primary_key(&column.name) {
            "Y"
        } else {
            ""
        };
        let foreign_key = self
            .table
            .foreign_key(&column.name)
            .map(|target| format!("FK → `{target}`"))
            .unwrap_or_default();

        write!(
            f,
            "| {} | {} | {} | {} | {} | {} | {} | {} |",
            column.name,
            column.data_type,
            length_precision_cell(column),
            nullable,
            default_cell(column.default_value.as_deref()),
            primary_key,
            foreign_key,
            column
                .comment
                .as_deref()
                .map(escape_pipes)
                .unwrap_or_default(),
        )
    }
}

/// Text of the Length/Precision cell.
///
/// Precision wins over length. Scale is shown only when it is present and
/// non-zero, so `NUMBER(10,0)` renders as `10`.
///
/// ```rust
/// use tablemd_core::{ColumnDescriptor, render::length_precision_cell};
///
/// let amount = ColumnDescriptor::new("AMOUNT", "NUMBER").with_precision(10, Some(2));
/// assert_eq!(length_precision_cell(&amount), "10,2");
///
/// let name = ColumnDescriptor::new("NAME", "VARCHAR2").with_length(255);
/// assert_eq!(length_precision_cell(&name), "255");
/// ```
pub fn length_precision_cell(column: &ColumnDescriptor) -> String {
    match (column.precision, column.scale, column.length) {
        (Some(precision), Some(scale), _) if scale != 0 => format!("{precision},{scale}"),
        (Some(precision), _, _) => precision.to_string(),
        (None, _, Some(length)) => length.to_string(),
        (None, _, None) => String::new(),
    }
}

/// Escapes `|` so cell text cannot split a Markdown table row.
pub fn escape_pipes(text: &str) -> String {
    text.replace('|', "\\|")
}

fn default_cell(default_value: Option<&str>) -> String {
    default_value
        .map(|value| escape_pipes(value.trim()))
        .unwrap_or_default()
}

/// File name of the document for `table_name`
pub fn document_file_name(table_name: &str) -> String {
    format!("TABLE_{table_name}.md")
}

/// Renders one table document.
///
/// # Errors
/// Returns [`TableMdError::Render`] if the template fails to render.
pub fn render_table_document(table: &TableMetadata) -> Result<String> {
    let document = TableDocument {
        table_name: &table.name,
        header: HEADER_ROW,
        separator: SEPARATOR_ROW,
        rows: table
            .columns
            .iter()
            .map(|column| ColumnRow { table, column })
            .collect(),
    };

    document.render().map_err(|source| TableMdError::Render {
        table: table.name.clone(),
        source,
    })
}

#[cfg(test)]
mod tests {
    use super::*;

    fn orders_table() -> TableMetadata {
        let mut table = TableMetadata::new("ORDERS");
        table.columns = vec![
            ColumnDescriptor::new("ID", "NUMBER")
                .with_length(22)
                .with_precision(10, Some(0))
                .with_nullable(false),
            ColumnDescriptor::new("CUSTOMER_ID", "NUMBER")
                .with_length(22)
                .with_precision(10, None)
                .with_nullable(false)
                .with_comment("Owning customer"),
            ColumnDescriptor::new("AMOUNT", "NUMBER")
                .with_length(22)
                .with_precision(12, Some(2))
                .with_default(" 0 \n"),
            ColumnDescriptor::new("NOTE", "VARCHAR2").with_length(255),
        ];
        table.primary_key.insert("ID".to_string());
        table.foreign_keys.insert("CUSTOMER_ID", "CUSTOMERS", "ID");
        table
    }

    #[test]
    fn test_length_precision_cell() {
        let decimal = ColumnDescriptor::new("A", "NUMBER").with_precision(10, Some(2));
        assert_eq!(length_precision_cell(&decimal), "10,2");

        let zero_scale = ColumnDescriptor::new("B", "NUMBER").with_precision(10, Some(0));
        assert_eq!(length_precision_cell(&zero_scale), "10");

        let no_scale = ColumnDescriptor::new("C", "NUMBER").with_precision(7, None);
        assert_eq!(length_precision_cell(&no_scale), "7");

        let text = ColumnDescriptor::new("D", "VARCHAR2").with_length(255);
        assert_eq!(length_precision_cell(&text), "255");

        let neither = ColumnDescriptor::new("E", "CLOB");
        assert_eq!(length_precision_cell(&neither), "");
    }

    #[test]
    fn test_precision_wins_over_length() {
        let column = ColumnDescriptor::new("A", "decimal")
            .with_length(9)
            .with_precision(18, Some(4));
        assert_eq!(length_precision_cell(&column), "18,4");
    }

    #[test]
    fn test_render_layout() {
        let document = render_table_document(&orders_table()).unwrap();
        let lines: Vec<&str> = document.lines().collect();

        assert_eq!(lines.len(), 4 + 4);
        assert_eq!(lines[0], "## Table: ORDERS");
        assert_eq!(lines[1], "");
        assert_eq!(lines[2], HEADER_ROW);
        assert_eq!(lines[3], SEPARATOR_ROW);
        assert!(!document.ends_with('\n'));
    }

    #[test]
    fn test_render_rows() {
        let document = render_table_document(&orders_table()).unwrap();
        let lines: Vec<&str> = document.split('\n').collect();

        assert_eq!(lines[4], "| ID | NUMBER | 10 | N |  | Y |  |  |");
        assert_eq!(
            lines[5],
            "| CUSTOMER_ID | NUMBER | 10 | N |  |  | FK → `CUSTOMERS.ID` | Owning customer |"
        );
        assert_eq!(lines[6], "| AMOUNT | NUMBER | 12,2 | Y | 0 |  |  |  |");
        assert_eq!(lines[7], "| NOTE | VARCHAR2 | 255 | Y |  |  |  |  |");
    }

    #[test]
    fn test_render_preserves_column_order() {
        let mut table = TableMetadata::new("T");
        table.columns = ["Z", "A", "M"]
            .into_iter()
            .map(|name| ColumnDescriptor::new(name, "INT"))
            .collect();

        let document = render_table_document(&table).unwrap();
        let names: Vec<&str> = document
            .split('\n')
            .skip(4)
            .map(|line| line.split(" | ").next().unwrap().trim_start_matches("| "))
            .collect();
        assert_eq!(names, vec!["Z", "A", "M"]);
    }

    #[test]
    fn test_pipes_do_not_split_cells() {
        let mut table = TableMetadata::new("T");
        table.columns = vec![
            ColumnDescriptor::new("FLAGS", "varchar")
                .with_length(10)
                .with_default("('a|b')")
                .with_comment("one|two|three"),
        ];

        let document = render_table_document(&table).unwrap();
        let row = document.split('\n').nth(4).unwrap();
        assert!(row.contains("('a\\|b')"));
        assert!(row.contains("one\\|two\\|three"));

        let unescaped_pipes = row.replace("\\|", "").matches('|').count();
        assert_eq!(unescaped_pipes, 9);
    }

    #[test]
    fn test_render_table_without_columns() {
        let document = render_table_document(&TableMetadata::new("EMPTY")).unwrap();
        assert_eq!(
            document,
            format!("## Table: EMPTY\n\n{HEADER_ROW}\n{SEPARATOR_ROW}")
        );
    }

    #[test]
    fn test_document_file_name() {
        assert_eq!(document_file_name("TXD2BV01"), "TABLE_TXD2BV01.md");
    }

    #[test]
    fn test_html_characters_are_not_escaped() {
        let mut table = TableMetadata::new("T");
        table.columns = vec![ColumnDescriptor::new("C", "INT").with_comment("a < b & c > d")];

        let document = render_table_document(&table).unwrap();
        assert!(document.contains("a < b & c > d"));
    }
}
