//! File output for rendered table documents.
//!
//! Documents land in `<output_base>/<identifier>/TABLE_<name>.md` and always
//! replace whatever was there before.

use std::path::{Path, PathBuf};
use tablemd_core::{Result, TableMdError, render::document_file_name};

/// Directory that receives the documents of one run.
pub fn output_directory(output_base: &Path, identifier: &str) -> PathBuf {
    output_base.join(identifier)
}

/// Writes one document, creating the directory if needed.
///
/// Returns the path of the written file.
///
/// # Errors
///
/// Returns [`TableMdError::Io`] if the directory cannot be created or the
/// file cannot be written.
pub async fn write_document(directory: &Path, table_name: &str, document: &str) -> Result<PathBuf> {
    tokio::fs::create_dir_all(directory).await.map_err(|e| {
        TableMdError::io(
            format!("Failed to create output directory {}", directory.display()),
            e,
        )
    })?;

    let path = directory.join(document_file_name(table_name));
    tokio::fs::write(&path, document)
        .await
        .map_err(|e| TableMdError::io(format!("Failed to write {}", path.display()), e))?;

    tracing::debug!("Wrote {} bytes to {}", document.len(), path.display());
    Ok(path)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_write_document_creates_directory() {
        let temp = tempfile::tempdir().unwrap();
        let directory = output_directory(&temp.path().join("out"), "SCOTT");

        let path = write_document(&directory, "EMP", "## Table: EMP").await.unwrap();

        assert_eq!(path, temp.path().join("out").join("SCOTT").join("TABLE_EMP.md"));
        assert_eq!(std::fs::read_to_string(&path).unwrap(), "## Table: EMP");
    }

    #[tokio::test]
    async fn test_write_document_overwrites() {
        let temp = tempfile::tempdir().unwrap();

        write_document(temp.path(), "EMP", "first version, longer text")
            .await
            .unwrap();
        let path = write_document(temp.path(), "EMP", "second").await.unwrap();

        assert_eq!(std::fs::read_to_string(path).unwrap(), "second");
    }

    #[tokio::test]
    async fn test_write_document_reports_io_error() {
        let temp = tempfile::tempdir().unwrap();
        let blocker = temp.path().join("not-a-dir");
        std::fs::write(&blocker, "file").unwrap();

        let result = write_document(&blocker.join("sub"), "EMP", "x").await;
        assert!(matches!(result, Err(TableMdError::Io { .. })));
        assert_eq!(result.unwrap_err().exit_code(), 8);
    }
}
