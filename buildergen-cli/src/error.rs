//! Error types for the CLI.
//!
//! Every command returns [`CliResult`]; `main` maps [`CliError::Stale`] to
//! exit code 2 and everything else to a plain failure.

use std::path::PathBuf;
use thiserror::Error;

use buildergen::GeneratorError;

/// Result type alias for CLI operations.
pub type CliResult<T> = Result<T, CliError>;

/// Main error type for CLI operations.
#[derive(Debug, Error)]
pub enum CliError {
    /// Error during descriptor discovery.
    #[error("Failed to scan for descriptors: {0}")]
    Scan(#[from] ScanError),

    /// Error reading or decoding a descriptor.
    #[error("Failed to load descriptor: {0}")]
    Descriptor(#[from] DescriptorError),

    /// Error during builder generation.
    #[error("Failed to generate builders: {0}")]
    Generate(#[from] GenerateError),

    /// Error loading configuration.
    #[error("Failed to load configuration: {0}")]
    Config(#[from] ConfigError),

    /// Error writing output files.
    #[error("Failed to write output: {0}")]
    Write(#[from] WriteError),

    /// Error during file watching.
    #[error("Watch error: {0}")]
    Watch(#[from] WatchError),

    /// Generated sources do not match the descriptors.
    #[error("Check failed: {0}")]
    Stale(String),

    /// Generic IO error.
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Error during descriptor discovery.
#[derive(Debug, Error)]
pub enum ScanError {
    /// Input path does not exist.
    #[error("Input not found: {path}")]
    NotFound { path: PathBuf },

    /// No descriptor files under the input directory.
    #[error("No descriptor files found in: {path}")]
    NoDescriptors { path: PathBuf },

    /// Invalid filter pattern.
    #[error("Invalid filter pattern '{pattern}': {message}")]
    InvalidPattern { pattern: String, message: String },

    /// IO error during scanning.
    #[error("IO error scanning {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Error from the directory walker.
    #[error("Walk error: {0}")]
    Walk(#[from] ignore::Error),
}

/// Error reading or decoding a descriptor file.
#[derive(Debug, Error)]
pub enum DescriptorError {
    /// Malformed JSON or a field of the wrong shape.
    #[error("Invalid descriptor {file}:{line}:{column}: {message}")]
    Json {
        file: PathBuf,
        line: usize,
        column: usize,
        message: String,
    },

    /// The descriptor decoded but cannot be turned into a datatype.
    #[error("Invalid descriptor {file}: {source}")]
    Model {
        file: PathBuf,
        #[source]
        source: GeneratorError,
    },
}

/// Error during builder generation.
#[derive(Debug, Error)]
pub enum GenerateError {
    /// The core rejected a type.
    #[error("{type_name}: {source}")]
    Builder {
        type_name: String,
        #[source]
        source: GeneratorError,
    },

    /// Two descriptors describe the same type.
    #[error("Type '{type_name}' is described by both {first} and {second}")]
    DuplicateType {
        type_name: String,
        first: PathBuf,
        second: PathBuf,
    },
}

/// Error loading configuration.
#[derive(Debug, Error)]
pub enum ConfigError {
    /// Config file not found.
    #[error("Configuration file not found: {path}")]
    NotFound { path: PathBuf },

    /// Invalid TOML syntax.
    #[error("Invalid TOML in {path}: {message}")]
    InvalidToml { path: PathBuf, message: String },

    /// Invalid configuration value.
    #[error("Invalid configuration value for '{key}': {message}")]
    InvalidValue { key: String, message: String },

    /// IO error reading config.
    #[error("Failed to read config {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Error writing output files.
#[derive(Debug, Error)]
pub enum WriteError {
    /// Failed to create directory.
    #[error("Failed to create directory {path}: {source}")]
    CreateDir {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Failed to write file.
    #[error("Failed to write file {path}: {source}")]
    WriteFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// Failed to read an existing file for comparison.
    #[error("Failed to read file {path}: {source}")]
    ReadFile {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },
}

/// Error during file watching.
#[derive(Debug, Error)]
pub enum WatchError {
    /// Failed to initialize watcher.
    #[error("Failed to initialize file watcher: {0}")]
    Init(String),
}

impl ScanError {
    /// Create an input not found error.
    pub fn not_found(path: PathBuf) -> Self {
        Self::NotFound { path }
    }

    /// Create a no descriptors error.
    pub fn no_descriptors(path: PathBuf) -> Self {
        Self::NoDescriptors { path }
    }

    /// Create an invalid pattern error.
    pub fn invalid_pattern(pattern: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidPattern {
            pattern: pattern.into(),
            message: message.into(),
        }
    }
}

impl DescriptorError {
    /// Wrap a `serde_json` error with the file it came from.
    pub fn json(file: PathBuf, error: &serde_json::Error) -> Self {
        Self::Json {
            file,
            line: error.line(),
            column: error.column(),
            message: error.to_string(),
        }
    }

    /// The file the error refers to.
    pub fn file(&self) -> &std::path::Path {
        match self {
            DescriptorError::Json { file, .. } | DescriptorError::Model { file, .. } => file,
        }
    }
}

impl GenerateError {
    /// Wrap a core error with the type it was raised for.
    pub fn builder(type_name: impl Into<String>, source: GeneratorError) -> Self {
        Self::Builder {
            type_name: type_name.into(),
            source,
        }
    }
}

impl ConfigError {
    /// Create an invalid TOML error.
    pub fn invalid_toml(path: PathBuf, message: impl Into<String>) -> Self {
        Self::InvalidToml {
            path,
            message: message.into(),
        }
    }

    /// Create an invalid value error.
    pub fn invalid_value(key: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidValue {
            key: key.into(),
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_scan_error_display() {
        let err = ScanError::not_found(PathBuf::from("/missing"));
        assert_eq!(err.to_string(), "Input not found: /missing");

        let err = ScanError::invalid_pattern("[", "unclosed");
        assert_eq!(err.to_string(), "Invalid filter pattern '[': unclosed");
    }

    #[test]
    fn test_descriptor_json_error_carries_location() {
        let json_err = serde_json::from_str::<serde_json::Value>("{\n  \"type\": }").unwrap_err();
        let err = DescriptorError::json(PathBuf::from("person.json"), &json_err);
        match &err {
            DescriptorError::Json { line, .. } => assert_eq!(*line, 2),
            other => panic!("unexpected error: {other:?}"),
        }
        assert_eq!(err.file(), std::path::Path::new("person.json"));
        assert!(err.to_string().starts_with("Invalid descriptor person.json:2:"));
    }

    #[test]
    fn test_generate_error_display() {
        let err = GenerateError::builder(
            "com.example.Person",
            GeneratorError::UnresolvedProperty {
                property: "callback".to_string(),
                declared_type: "void".to_string(),
            },
        );
        assert_eq!(
            err.to_string(),
            "com.example.Person: No strategy can generate property 'callback' of type void"
        );

        let err = GenerateError::DuplicateType {
            type_name: "com.example.Person".to_string(),
            first: PathBuf::from("a.json"),
            second: PathBuf::from("b.json"),
        };
        assert!(err.to_string().contains("a.json and b.json"));
    }

    #[test]
    fn test_cli_error_from_conversions() {
        let err: CliError = ConfigError::invalid_value("java.source_level", "bad").into();
        assert!(matches!(err, CliError::Config(_)));

        let err: CliError = std::io::Error::new(std::io::ErrorKind::Other, "boom").into();
        assert!(matches!(err, CliError::Io(_)));
    }
}
