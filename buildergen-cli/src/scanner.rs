//! Descriptor discovery.
//!
//! Walks an input directory for `*.json` type descriptors, respecting
//! `.gitignore` patterns and an optional glob filter. A single file may be
//! given instead of a directory.

use crate::error::{CliResult, ScanError};
use ignore::WalkBuilder;
use std::path::{Path, PathBuf};

/// File extension of type descriptors.
pub const DESCRIPTOR_EXTENSION: &str = "json";

/// A discovered descriptor file with its content.
#[derive(Debug, Clone)]
pub struct DescriptorFile {
    /// Path to the file.
    pub path: PathBuf,

    /// Path relative to the scan root.
    pub relative_path: PathBuf,

    /// File content.
    pub content: String,
}

/// Scanner for discovering descriptor files.
#[derive(Debug)]
pub struct DescriptorScanner {
    /// Directory or single file to scan.
    root: PathBuf,

    /// Whether to respect .gitignore files.
    respect_gitignore: bool,

    /// Optional glob filter pattern.
    filter: Option<glob::Pattern>,
}

/// Whether `path` looks like a descriptor file.
pub fn is_descriptor(path: &Path) -> bool {
    path.extension().is_some_and(|ext| ext == DESCRIPTOR_EXTENSION)
}

impl DescriptorScanner {
    /// Create a new scanner for the given root.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            respect_gitignore: true,
            filter: None,
        }
    }

    /// Set whether to respect .gitignore files.
    pub fn with_gitignore(mut self, respect: bool) -> Self {
        self.respect_gitignore = respect;
        self
    }

    /// Set a glob filter pattern, matched against paths relative to the root.
    pub fn with_filter(mut self, pattern: &str) -> Result<Self, ScanError> {
        let glob_pattern = glob::Pattern::new(pattern)
            .map_err(|e| ScanError::invalid_pattern(pattern, e.to_string()))?;
        self.filter = Some(glob_pattern);
        Ok(self)
    }

    /// Scan and return every descriptor, sorted by path.
    pub fn scan(&self) -> CliResult<Vec<DescriptorFile>> {
        if !self.root.exists() {
            return Err(ScanError::not_found(self.root.clone()).into());
        }

        if self.root.is_file() {
            let file_name = self
                .root
                .file_name()
                .map(PathBuf::from)
                .unwrap_or_else(|| self.root.clone());
            return Ok(vec![DescriptorFile {
                content: read(&self.root)?,
                path: self.root.clone(),
                relative_path: file_name,
            }]);
        }

        let mut files = Vec::new();

        let walker = WalkBuilder::new(&self.root)
            .git_ignore(self.respect_gitignore)
            .git_global(self.respect_gitignore)
            .git_exclude(self.respect_gitignore)
            .hidden(false)
            .build();

        for entry in walker {
            let entry = entry.map_err(ScanError::Walk)?;
            let path = entry.path();

            if !path.is_file() || !is_descriptor(path) {
                continue;
            }

            let relative = self.relative_path(path);
            if let Some(ref pattern) = self.filter {
                if !pattern.matches_path(&relative) {
                    continue;
                }
            }

            files.push(DescriptorFile {
                content: read(path)?,
                path: path.to_path_buf(),
                relative_path: relative,
            });
        }

        if files.is_empty() {
            return Err(ScanError::no_descriptors(self.root.clone()).into());
        }

        files.sort_by(|a, b| a.path.cmp(&b.path));
        Ok(files)
    }

    /// Scan without failing on empty results.
    pub fn scan_allow_empty(&self) -> CliResult<Vec<DescriptorFile>> {
        match self.scan() {
            Ok(files) => Ok(files),
            Err(crate::error::CliError::Scan(ScanError::NoDescriptors { .. })) => Ok(Vec::new()),
            Err(e) => Err(e),
        }
    }

    fn relative_path(&self, path: &Path) -> PathBuf {
        path.strip_prefix(&self.root).unwrap_or(path).to_path_buf()
    }

    /// Get the scan root.
    pub fn root(&self) -> &Path {
        &self.root
    }
}

fn read(path: &Path) -> Result<String, ScanError> {
    std::fs::read_to_string(path).map_err(|e| ScanError::Io {
        path: path.to_path_buf(),
        source: e,
    })
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CliError;
    use std::fs;
    use tempfile::TempDir;

    fn create_test_dir() -> TempDir {
        let dir = TempDir::new().unwrap();

        fs::write(dir.path().join("person.json"), r#"{"type": "com.example.Person"}"#).unwrap();

        fs::create_dir(dir.path().join("shapes")).unwrap();
        fs::write(dir.path().join("shapes/circle.json"), r#"{"type": "com.example.Circle"}"#)
            .unwrap();
        fs::write(dir.path().join("shapes/square.json"), r#"{"type": "com.example.Square"}"#)
            .unwrap();

        fs::write(dir.path().join("README.md"), "# Descriptors").unwrap();

        dir
    }

    #[test]
    fn test_scan_finds_all_descriptors() {
        let dir = create_test_dir();
        let files = DescriptorScanner::new(dir.path()).scan().unwrap();

        let paths: Vec<_> = files
            .iter()
            .map(|f| f.relative_path.to_string_lossy().replace('\\', "/"))
            .collect();
        assert_eq!(paths, vec!["person.json", "shapes/circle.json", "shapes/square.json"]);
    }

    #[test]
    fn test_scan_excludes_other_files() {
        let dir = create_test_dir();
        let files = DescriptorScanner::new(dir.path()).scan().unwrap();

        for file in &files {
            assert!(is_descriptor(&file.path));
        }
    }

    #[test]
    fn test_scan_with_filter() {
        let dir = create_test_dir();
        let files = DescriptorScanner::new(dir.path())
            .with_filter("shapes/*")
            .unwrap()
            .scan()
            .unwrap();

        assert_eq!(files.len(), 2);
        assert!(files.iter().all(|f| f.relative_path.starts_with("shapes")));
    }

    #[test]
    fn test_invalid_filter() {
        let result = DescriptorScanner::new(".").with_filter("[");
        assert!(matches!(result, Err(ScanError::InvalidPattern { .. })));
    }

    #[test]
    fn test_scan_single_file() {
        let dir = create_test_dir();
        let files = DescriptorScanner::new(dir.path().join("person.json")).scan().unwrap();

        assert_eq!(files.len(), 1);
        assert_eq!(files[0].relative_path, PathBuf::from("person.json"));
        assert!(files[0].content.contains("com.example.Person"));
    }

    #[test]
    fn test_scan_missing_root() {
        let dir = TempDir::new().unwrap();
        let err = DescriptorScanner::new(dir.path().join("missing")).scan().unwrap_err();
        assert!(matches!(err, CliError::Scan(ScanError::NotFound { .. })));
    }

    #[test]
    fn test_scan_empty_directory() {
        let dir = TempDir::new().unwrap();
        let scanner = DescriptorScanner::new(dir.path());

        assert!(matches!(
            scanner.scan(),
            Err(CliError::Scan(ScanError::NoDescriptors { .. }))
        ));
        assert!(scanner.scan_allow_empty().unwrap().is_empty());
    }
}
