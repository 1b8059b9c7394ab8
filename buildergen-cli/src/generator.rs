//! Builder generation for loaded descriptors.
//!
//! Runs the core [`BuilderEmitter`] over every descriptor and lays the
//! results out as files under the output source root.

use crate::error::{CliResult, GenerateError};
use crate::loader::LoadedDescriptor;
use buildergen::{BuilderEmitter, CodeGenerator, GeneratorConfig};
use std::collections::BTreeMap;
use std::path::PathBuf;
use tracing::info;

/// One generated compilation unit.
#[derive(Debug, Clone)]
pub struct GeneratedFile {
    /// Qualified name of the source type.
    pub type_name: String,

    /// Descriptor the file was generated from.
    pub source: PathBuf,

    /// Path relative to the output source root.
    pub relative_path: PathBuf,

    /// Java source.
    pub content: String,

    /// Property name and the strategy that generated it.
    pub strategies: Vec<(String, &'static str)>,
}

/// Everything produced by one generation run, ordered by type name.
#[derive(Debug, Clone, Default)]
pub struct GeneratedOutput {
    /// The generated files.
    pub files: Vec<GeneratedFile>,
}

/// Generates one builder per descriptor.
pub struct BuilderGenerator {
    emitter: BuilderEmitter,
    config: GeneratorConfig,
}

impl BuilderGenerator {
    /// Create a generator with the given core configuration.
    pub fn new(config: GeneratorConfig) -> Self {
        Self {
            emitter: BuilderEmitter::new(),
            config,
        }
    }

    /// The core configuration in use.
    pub fn config(&self) -> &GeneratorConfig {
        &self.config
    }

    /// Generate builders for every descriptor.
    ///
    /// Fails on the first type the core rejects, or when two descriptors
    /// describe the same type.
    pub fn generate(&self, descriptors: &[LoadedDescriptor]) -> CliResult<GeneratedOutput> {
        let mut by_type: BTreeMap<String, &LoadedDescriptor> = BTreeMap::new();
        for loaded in descriptors {
            let type_name = loaded.descriptor.type_name.to_string();
            if let Some(first) = by_type.insert(type_name.clone(), loaded) {
                return Err(GenerateError::DuplicateType {
                    type_name,
                    first: first.path.clone(),
                    second: loaded.path.clone(),
                }
                .into());
            }
        }

        let mut files = Vec::with_capacity(by_type.len());
        for (type_name, loaded) in by_type {
            let generated = self
                .emitter
                .generate_descriptor(&loaded.descriptor, &self.config)
                .map_err(|e| GenerateError::builder(type_name.clone(), e))?;

            info!(
                type_name = %type_name,
                builder = %generated.type_name,
                properties = generated.strategies.len(),
                "Generated builder"
            );

            files.push(GeneratedFile {
                relative_path: generated.relative_path(),
                source: loaded.path.clone(),
                content: generated.code,
                strategies: generated.strategies,
                type_name,
            });
        }

        Ok(GeneratedOutput { files })
    }
}

impl GeneratedOutput {
    /// Number of generated files.
    pub fn len(&self) -> usize {
        self.files.len()
    }

    /// Whether nothing was generated.
    pub fn is_empty(&self) -> bool {
        self.files.is_empty()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::CliError;
    use buildergen::TypeDescriptor;

    fn loaded(path: &str, json: &str) -> LoadedDescriptor {
        LoadedDescriptor {
            path: PathBuf::from(path),
            relative_path: PathBuf::from(path),
            descriptor: TypeDescriptor::from_json(json).unwrap(),
        }
    }

    #[test]
    fn test_generate_lays_out_by_package() {
        let descriptors = vec![
            loaded(
                "person.json",
                r#"{"type": "com.example.Person", "properties": [{"name": "name", "type": "java.lang.String"}]}"#,
            ),
            loaded("address.json", r#"{"type": "com.example.geo.Address"}"#),
        ];

        let output = BuilderGenerator::new(GeneratorConfig::default())
            .generate(&descriptors)
            .unwrap();

        assert_eq!(output.len(), 2);
        assert_eq!(output.files[0].type_name, "com.example.Person");
        assert_eq!(
            output.files[0].relative_path,
            ["com", "example", "Person_Builder.java"].iter().collect::<PathBuf>()
        );
        assert_eq!(output.files[0].strategies, vec![("name".to_string(), "required")]);
        assert!(output.files[0].content.contains("abstract class Person_Builder {"));
        assert_eq!(
            output.files[1].relative_path,
            ["com", "example", "geo", "Address_Builder.java"].iter().collect::<PathBuf>()
        );
    }

    #[test]
    fn test_generate_rejects_duplicate_types() {
        let descriptors = vec![
            loaded("a.json", r#"{"type": "com.example.Person"}"#),
            loaded("b.json", r#"{"type": "com.example.Person"}"#),
        ];

        let err = BuilderGenerator::new(GeneratorConfig::default())
            .generate(&descriptors)
            .unwrap_err();
        assert!(matches!(
            err,
            CliError::Generate(GenerateError::DuplicateType { .. })
        ));
    }

    #[test]
    fn test_generate_reports_core_errors_with_type() {
        let descriptors = vec![loaded(
            "broken.json",
            r#"{"type": "com.example.Broken", "properties": [{"name": "nothing", "type": "void"}]}"#,
        )];

        let err = BuilderGenerator::new(GeneratorConfig::default())
            .generate(&descriptors)
            .unwrap_err();
        let message = err.to_string();
        assert!(message.contains("com.example.Broken"));
        assert!(message.contains("'nothing'"));
    }

    #[test]
    fn test_generate_empty() {
        let output = BuilderGenerator::new(GeneratorConfig::default())
            .generate(&[])
            .unwrap();
        assert!(output.is_empty());
    }
}
