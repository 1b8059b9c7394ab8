//! Descriptor decoding.
//!
//! Turns scanned files into [`TypeDescriptor`]s. A bad file never stops the
//! others from loading; its error is collected and returned alongside.

use crate::error::DescriptorError;
use crate::scanner::DescriptorFile;
use buildergen::TypeDescriptor;
use std::path::PathBuf;
use tracing::{debug, warn};

/// A successfully decoded descriptor.
#[derive(Debug, Clone)]
pub struct LoadedDescriptor {
    /// File the descriptor came from.
    pub path: PathBuf,

    /// Path relative to the scan root.
    pub relative_path: PathBuf,

    /// The decoded descriptor.
    pub descriptor: TypeDescriptor,
}

/// Decodes descriptor files.
#[derive(Debug, Default)]
pub struct DescriptorLoader;

impl DescriptorLoader {
    /// Create a loader.
    pub fn new() -> Self {
        Self
    }

    /// Decode one file.
    ///
    /// The datatype is derived eagerly so contradictory flags are reported
    /// against the file rather than during generation.
    pub fn parse_file(&self, file: &DescriptorFile) -> Result<LoadedDescriptor, DescriptorError> {
        let descriptor = TypeDescriptor::from_json(&file.content)
            .map_err(|e| DescriptorError::json(file.path.clone(), &e))?;

        descriptor.datatype().map_err(|source| DescriptorError::Model {
            file: file.path.clone(),
            source,
        })?;

        debug!(
            file = %file.relative_path.display(),
            type_name = %descriptor.type_name,
            properties = descriptor.properties.len(),
            "Loaded descriptor"
        );

        Ok(LoadedDescriptor {
            path: file.path.clone(),
            relative_path: file.relative_path.clone(),
            descriptor,
        })
    }

    /// Decode every file, collecting failures instead of stopping at them.
    pub fn parse_files(
        &self,
        files: &[DescriptorFile],
    ) -> (Vec<LoadedDescriptor>, Vec<DescriptorError>) {
        let mut loaded = Vec::new();
        let mut errors = Vec::new();

        for file in files {
            match self.parse_file(file) {
                Ok(descriptor) => loaded.push(descriptor),
                Err(e) => {
                    warn!(file = %file.path.display(), error = %e, "Skipping descriptor");
                    errors.push(e);
                }
            }
        }

        (loaded, errors)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn file(name: &str, content: &str) -> DescriptorFile {
        DescriptorFile {
            path: PathBuf::from(name),
            relative_path: PathBuf::from(name),
            content: content.to_string(),
        }
    }

    #[test]
    fn test_parse_valid_descriptor() {
        let loaded = DescriptorLoader::new()
            .parse_file(&file(
                "person.json",
                r#"{"type": "com.example.Person", "properties": [{"name": "name", "type": "java.lang.String"}]}"#,
            ))
            .unwrap();

        assert_eq!(loaded.descriptor.type_name.to_string(), "com.example.Person");
        assert_eq!(loaded.descriptor.properties.len(), 1);
        assert_eq!(loaded.path, PathBuf::from("person.json"));
    }

    #[test]
    fn test_parse_malformed_json() {
        let err = DescriptorLoader::new()
            .parse_file(&file("broken.json", "{\"type\": "))
            .unwrap_err();
        assert!(matches!(err, DescriptorError::Json { .. }));
        assert_eq!(err.file(), std::path::Path::new("broken.json"));
    }

    #[test]
    fn test_parse_missing_type_field() {
        let err = DescriptorLoader::new()
            .parse_file(&file("empty.json", "{}"))
            .unwrap_err();
        assert!(err.to_string().contains("type"));
    }

    #[test]
    fn test_parse_files_collects_errors() {
        let files = vec![
            file("a.json", r#"{"type": "com.example.A"}"#),
            file("b.json", "not json"),
            file("c.json", r#"{"type": "com.example.C"}"#),
        ];

        let (loaded, errors) = DescriptorLoader::new().parse_files(&files);

        assert_eq!(loaded.len(), 2);
        assert_eq!(errors.len(), 1);
        assert_eq!(errors[0].file(), std::path::Path::new("b.json"));
    }
}
