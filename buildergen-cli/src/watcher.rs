//! File watcher for `generate --watch`.
//!
//! Reports debounced changes to descriptor files under the input directory.

use crate::error::{CliResult, WatchError};
use crate::scanner::is_descriptor;
use notify::{RecommendedWatcher, RecursiveMode, Watcher};
use notify_debouncer_mini::{new_debouncer, DebouncedEvent, Debouncer};
use std::path::{Path, PathBuf};
use std::sync::mpsc::{channel, Receiver};
use std::time::Duration;

/// Event types for descriptor changes.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum WatchEvent {
    /// A descriptor was created or modified.
    Modified(PathBuf),
    /// A descriptor was deleted.
    Deleted(PathBuf),
    /// An error occurred.
    Error(String),
}

/// File watcher for monitoring descriptor files.
pub struct FileWatcher {
    /// Directory or file to watch.
    root: PathBuf,
    /// Debounce duration in milliseconds.
    debounce_ms: u64,
}

impl FileWatcher {
    /// Create a new file watcher for the given path.
    pub fn new(root: impl Into<PathBuf>) -> Self {
        Self {
            root: root.into(),
            debounce_ms: 500,
        }
    }

    /// Set the debounce duration in milliseconds.
    pub fn with_debounce(mut self, ms: u64) -> Self {
        self.debounce_ms = ms;
        self
    }

    /// Start watching.
    ///
    /// Events arrive on the returned receiver for as long as the debouncer
    /// is kept alive.
    pub fn watch(&self) -> CliResult<(Debouncer<RecommendedWatcher>, Receiver<WatchEvent>)> {
        let (tx, rx) = channel::<WatchEvent>();

        let mut debouncer = new_debouncer(
            Duration::from_millis(self.debounce_ms),
            move |result: Result<Vec<DebouncedEvent>, notify::Error>| match result {
                Ok(events) => {
                    for event in events {
                        if let Some(watch_event) = WatchEvent::from_path(event.path) {
                            let _ = tx.send(watch_event);
                        }
                    }
                }
                Err(e) => {
                    let _ = tx.send(WatchEvent::Error(e.to_string()));
                }
            },
        )
        .map_err(|e| WatchError::Init(e.to_string()))?;

        let mode = if self.root.is_dir() {
            RecursiveMode::Recursive
        } else {
            RecursiveMode::NonRecursive
        };
        debouncer
            .watcher()
            .watch(&self.root, mode)
            .map_err(|e| WatchError::Init(e.to_string()))?;

        Ok((debouncer, rx))
    }

    /// Get the path being watched.
    pub fn root(&self) -> &Path {
        &self.root
    }
}

impl WatchEvent {
    /// Classify a changed path; non-descriptor paths yield `None`.
    pub fn from_path(path: PathBuf) -> Option<Self> {
        if !is_descriptor(&path) {
            return None;
        }
        if path.exists() {
            Some(WatchEvent::Modified(path))
        } else {
            Some(WatchEvent::Deleted(path))
        }
    }

    /// Get the path associated with this event.
    pub fn path(&self) -> Option<&Path> {
        match self {
            WatchEvent::Modified(p) | WatchEvent::Deleted(p) => Some(p),
            WatchEvent::Error(_) => None,
        }
    }

    /// Check if this is an error event.
    pub fn is_error(&self) -> bool {
        matches!(self, WatchEvent::Error(_))
    }

    /// Get the error message if this is an error event.
    pub fn error_message(&self) -> Option<&str> {
        match self {
            WatchEvent::Error(msg) => Some(msg),
            _ => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use tempfile::TempDir;

    #[test]
    fn test_watch_event_from_path() {
        let dir = TempDir::new().unwrap();
        let existing = dir.path().join("person.json");
        std::fs::write(&existing, "{}").unwrap();
        let removed = dir.path().join("gone.json");

        assert_eq!(
            WatchEvent::from_path(existing.clone()),
            Some(WatchEvent::Modified(existing))
        );
        assert_eq!(
            WatchEvent::from_path(removed.clone()),
            Some(WatchEvent::Deleted(removed))
        );
        assert_eq!(WatchEvent::from_path(dir.path().join("Person_Builder.java")), None);
    }

    #[test]
    fn test_watch_event_accessors() {
        let path = PathBuf::from("/descriptors/person.json");

        let modified = WatchEvent::Modified(path.clone());
        assert_eq!(modified.path(), Some(path.as_path()));
        assert!(!modified.is_error());
        assert_eq!(modified.error_message(), None);

        let error = WatchEvent::Error("test error".to_string());
        assert_eq!(error.path(), None);
        assert!(error.is_error());
        assert_eq!(error.error_message(), Some("test error"));
    }

    #[test]
    fn test_file_watcher_settings() {
        let watcher = FileWatcher::new("/descriptors");
        assert_eq!(watcher.root(), Path::new("/descriptors"));
        assert_eq!(watcher.debounce_ms, 500);

        let watcher = watcher.with_debounce(1000);
        assert_eq!(watcher.debounce_ms, 1000);
    }
}
