//! File writer for generated builders.
//!
//! Writes generated Java files to disk with dry-run support, and compares
//! existing files against fresh output for the `check` command.

use crate::error::{CliResult, WriteError};
use std::path::{Path, PathBuf};

/// Result of a write operation.
#[derive(Debug)]
pub enum WriteResult {
    /// File was written successfully.
    Written {
        /// Path to the written file.
        path: PathBuf,
        /// Number of bytes written.
        bytes: usize,
    },
    /// Dry run - content was not written.
    DryRun {
        /// Content that would have been written.
        content: String,
        /// Path where content would have been written.
        path: PathBuf,
    },
}

/// State of a generated file on disk relative to fresh output.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FileStatus {
    /// The file matches.
    UpToDate,
    /// The file exists with different content.
    Stale,
    /// The file does not exist.
    Missing,
}

/// File writer with dry-run support.
#[derive(Debug)]
pub struct FileWriter {
    /// Whether to run in dry-run mode.
    dry_run: bool,
}

impl FileWriter {
    /// Create a new file writer.
    pub fn new(dry_run: bool) -> Self {
        Self { dry_run }
    }

    /// Write content to a file.
    ///
    /// In dry-run mode, returns the content without writing.
    pub fn write(&self, path: &Path, content: &str) -> CliResult<WriteResult> {
        if self.dry_run {
            return Ok(WriteResult::DryRun {
                content: content.to_string(),
                path: path.to_path_buf(),
            });
        }

        if let Some(parent) = path.parent() {
            if !parent.exists() {
                std::fs::create_dir_all(parent).map_err(|e| WriteError::CreateDir {
                    path: parent.to_path_buf(),
                    source: e,
                })?;
            }
        }

        std::fs::write(path, content).map_err(|e| WriteError::WriteFile {
            path: path.to_path_buf(),
            source: e,
        })?;

        Ok(WriteResult::Written {
            path: path.to_path_buf(),
            bytes: content.len(),
        })
    }

    /// Check if running in dry-run mode.
    pub fn is_dry_run(&self) -> bool {
        self.dry_run
    }
}

/// Compare the file at `path` with `expected`.
pub fn file_status(path: &Path, expected: &str) -> CliResult<FileStatus> {
    if !path.exists() {
        return Ok(FileStatus::Missing);
    }
    let existing = std::fs::read_to_string(path).map_err(|e| WriteError::ReadFile {
        path: path.to_path_buf(),
        source: e,
    })?;
    if existing == expected {
        Ok(FileStatus::UpToDate)
    } else {
        Ok(FileStatus::Stale)
    }
}

impl WriteResult {
    /// Get the path associated with this result.
    pub fn path(&self) -> &Path {
        match self {
            WriteResult::Written { path, .. } => path,
            WriteResult::DryRun { path, .. } => path,
        }
    }

    /// Check if the write was successful (not dry-run).
    pub fn was_written(&self) -> bool {
        matches!(self, WriteResult::Written { .. })
    }

    /// Get the number of bytes written (0 for dry-run).
    pub fn bytes(&self) -> usize {
        match self {
            WriteResult::Written { bytes, .. } => *bytes,
            WriteResult::DryRun { .. } => 0,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    const CONTENT: &str = "abstract class Person_Builder {\n}\n";

    #[test]
    fn test_write_file() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("Person_Builder.java");

        let result = FileWriter::new(false).write(&path, CONTENT).unwrap();

        assert!(result.was_written());
        assert_eq!(result.bytes(), CONTENT.len());
        assert_eq!(std::fs::read_to_string(&path).unwrap(), CONTENT);
    }

    #[test]
    fn test_write_creates_package_directories() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("com/example/Person_Builder.java");

        let result = FileWriter::new(false).write(&path, CONTENT).unwrap();

        assert!(matches!(result, WriteResult::Written { .. }));
        assert!(path.exists());
    }

    #[test]
    fn test_dry_run_does_not_write() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("Person_Builder.java");

        let writer = FileWriter::new(true);
        assert!(writer.is_dry_run());
        let result = writer.write(&path, CONTENT).unwrap();

        assert!(!path.exists());
        assert_eq!(result.path(), path.as_path());
        assert_eq!(result.bytes(), 0);
        match result {
            WriteResult::DryRun { content, .. } => assert_eq!(content, CONTENT),
            other => panic!("unexpected result: {other:?}"),
        }
    }

    #[test]
    fn test_file_status() {
        let dir = TempDir::new().unwrap();
        let path = dir.path().join("Person_Builder.java");

        assert_eq!(file_status(&path, CONTENT).unwrap(), FileStatus::Missing);

        std::fs::write(&path, CONTENT).unwrap();
        assert_eq!(file_status(&path, CONTENT).unwrap(), FileStatus::UpToDate);

        std::fs::write(&path, "class Old {}\n").unwrap();
        assert_eq!(file_status(&path, CONTENT).unwrap(), FileStatus::Stale);
    }
}
