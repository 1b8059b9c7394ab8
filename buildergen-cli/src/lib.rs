//! # buildergen-cli
//!
//! CLI library for generating Java builder classes from JSON type
//! descriptors.
//!
//! ## Architecture
//!
//! - [`config`] - Configuration management and TOML parsing
//! - [`scanner`] - Descriptor discovery and filtering
//! - [`loader`] - Descriptor decoding
//! - [`generator`] - Builder generation using the `buildergen` core
//! - [`writer`] - File output, dry-run support and staleness checks
//! - [`watcher`] - File system watching for `generate --watch`
//! - [`error`] - Error types and handling

use std::path::Path;

pub mod config;
pub mod error;
pub mod generator;
pub mod loader;
pub mod scanner;
pub mod watcher;
pub mod writer;

// Re-export main types for convenience
pub use config::{Config, ConfigManager};
pub use error::{CliError, CliResult};
pub use generator::{BuilderGenerator, GeneratedFile, GeneratedOutput};
pub use loader::{DescriptorLoader, LoadedDescriptor};
pub use scanner::{DescriptorFile, DescriptorScanner};
pub use watcher::FileWatcher;
pub use writer::FileWriter;

use error::DescriptorError;

/// Outcome of scanning, loading and generating in one go.
#[derive(Debug, Default)]
pub struct Run {
    /// Number of descriptor files found.
    pub scanned: usize,

    /// Files that could not be loaded; they are skipped.
    pub skipped: Vec<DescriptorError>,

    /// Generated builders.
    pub output: GeneratedOutput,
}

/// Scan `input`, load every descriptor and generate its builder.
///
/// An input with no descriptors yields an empty run rather than an error.
pub fn run_pipeline(input: &Path, filter: Option<&str>, config: &Config) -> CliResult<Run> {
    let generator_config = config.generator_config()?;

    let mut scanner = DescriptorScanner::new(input);
    if let Some(pattern) = filter {
        scanner = scanner.with_filter(pattern)?;
    }
    let files = scanner.scan_allow_empty()?;

    let (descriptors, skipped) = DescriptorLoader::new().parse_files(&files);
    let output = BuilderGenerator::new(generator_config).generate(&descriptors)?;

    Ok(Run {
        scanned: files.len(),
        skipped,
        output,
    })
}
