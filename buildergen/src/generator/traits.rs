//! Code generator trait definition.
//!
//! This module defines the `CodeGenerator` trait together with the
//! configuration every generator receives and the code it returns.

use serde::{Deserialize, Serialize};
use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use crate::error::GeneratorResult;
use crate::model::{Datatype, PropertyDeclaration, QualifiedName, TypeDescriptor};

/// Trait for Java code generators.
///
/// A generator turns one datatype and its ordered properties into a single
/// compilation unit.
///
/// # Example
///
/// ```rust,ignore
/// use buildergen::generator::{CodeGenerator, GeneratorConfig, GeneratedCode};
/// use buildergen::model::{Datatype, PropertyDeclaration};
/// use buildergen::GeneratorResult;
///
/// struct MyGenerator;
///
/// impl CodeGenerator for MyGenerator {
///     fn id(&self) -> &'static str { "my-generator" }
///     fn name(&self) -> &'static str { "My Generator" }
///     fn file_extension(&self) -> &'static str { "java" }
///
///     fn generate(
///         &self,
///         datatype: &Datatype,
///         properties: &[PropertyDeclaration],
///         config: &GeneratorConfig,
///     ) -> GeneratorResult<GeneratedCode> {
///         Ok(GeneratedCode::new("// generated code", datatype.generated_builder.name.clone()))
///     }
/// }
/// ```
pub trait CodeGenerator: Send + Sync {
    /// Returns the unique identifier for this generator.
    fn id(&self) -> &'static str;

    /// Returns the human-readable name of this generator.
    fn name(&self) -> &'static str;

    /// Returns the file extension for generated files.
    fn file_extension(&self) -> &'static str;

    /// Generate the compilation unit for one datatype.
    fn generate(
        &self,
        datatype: &Datatype,
        properties: &[PropertyDeclaration],
        config: &GeneratorConfig,
    ) -> GeneratorResult<GeneratedCode>;

    /// Generate from a serialized descriptor.
    fn generate_descriptor(
        &self,
        descriptor: &TypeDescriptor,
        config: &GeneratorConfig,
    ) -> GeneratorResult<GeneratedCode> {
        let datatype = descriptor.datatype()?;
        self.generate(&datatype, &descriptor.properties, config)
    }
}

/// Generator configuration options.
///
/// Controls the Java language level and libraries the output may use, and
/// how the output is formatted.
#[derive(Debug, Clone, PartialEq)]
pub struct GeneratorConfig {
    /// Language level and library support
    pub features: Features,

    /// Whether to generate Javadoc comments
    pub generate_docs: bool,

    /// Whether to annotate the generated builder with `@Generated`
    pub generated_annotation: bool,

    /// Indentation style
    pub indent: IndentStyle,

    /// Line ending style
    pub line_ending: LineEnding,
}

impl Default for GeneratorConfig {
    fn default() -> Self {
        Self {
            features: Features::default(),
            generate_docs: true,
            generated_annotation: false,
            indent: IndentStyle::default(),
            line_ending: LineEnding::default(),
        }
    }
}

impl GeneratorConfig {
    /// Create a new generator config with default settings.
    pub fn new() -> Self {
        Self::default()
    }

    /// Set the language level and library support.
    pub fn with_features(mut self, features: Features) -> Self {
        self.features = features;
        self
    }

    /// Set whether to generate Javadoc comments.
    pub fn with_generate_docs(mut self, generate: bool) -> Self {
        self.generate_docs = generate;
        self
    }

    /// Set whether to emit `@Generated` on the builder.
    pub fn with_generated_annotation(mut self, annotate: bool) -> Self {
        self.generated_annotation = annotate;
        self
    }

    /// Set the indentation style.
    pub fn with_indent(mut self, indent: IndentStyle) -> Self {
        self.indent = indent;
        self
    }

    /// Set the line ending style.
    pub fn with_line_ending(mut self, line_ending: LineEnding) -> Self {
        self.line_ending = line_ending;
        self
    }
}

// =============================================================================
// Features
// =============================================================================

/// Java language level of the generated code.
#[derive(
    Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Default, Serialize, Deserialize,
)]
#[serde(rename_all = "lowercase")]
pub enum SourceLevel {
    Java6,
    Java7,
    #[default]
    Java8,
}

impl SourceLevel {
    /// Get the canonical name.
    pub fn as_str(&self) -> &'static str {
        match self {
            SourceLevel::Java6 => "java6",
            SourceLevel::Java7 => "java7",
            SourceLevel::Java8 => "java8",
        }
    }
}

impl fmt::Display for SourceLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for SourceLevel {
    type Err = String;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s.to_ascii_lowercase().as_str() {
            "java6" | "6" | "1.6" => Ok(SourceLevel::Java6),
            "java7" | "7" | "1.7" => Ok(SourceLevel::Java7),
            "java8" | "8" | "1.8" => Ok(SourceLevel::Java8),
            other => Err(format!("unsupported source level '{}'", other)),
        }
    }
}

/// Language and library capabilities available to the generated code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub struct Features {
    /// Java language level
    #[serde(default)]
    pub source_level: SourceLevel,

    /// Whether Guava is on the classpath
    #[serde(default)]
    pub guava: bool,
}

impl Features {
    /// Create a feature set.
    pub fn new(source_level: SourceLevel, guava: bool) -> Self {
        Self {
            source_level,
            guava,
        }
    }

    /// `java.util.Objects` is available.
    pub fn has_objects(&self) -> bool {
        self.source_level >= SourceLevel::Java7
    }

    /// The diamond operator is available.
    pub fn has_diamond(&self) -> bool {
        self.source_level >= SourceLevel::Java7
    }

    /// Lambdas, `java.util.Optional` and `java.util.function` are available.
    pub fn has_lambdas(&self) -> bool {
        self.source_level >= SourceLevel::Java8
    }
}

// =============================================================================
// Formatting
// =============================================================================

/// Indentation style for generated code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum IndentStyle {
    /// Use spaces for indentation (default: 2 spaces)
    #[default]
    Spaces2,

    /// Use 4 spaces for indentation
    Spaces4,

    /// Use tabs for indentation
    Tabs,
}

impl IndentStyle {
    /// Get the indentation string.
    pub fn as_str(&self) -> &str {
        match self {
            IndentStyle::Spaces2 => "  ",
            IndentStyle::Spaces4 => "    ",
            IndentStyle::Tabs => "\t",
        }
    }

    /// Create an indentation string for the given depth.
    pub fn indent(&self, depth: usize) -> String {
        self.as_str().repeat(depth)
    }
}

/// Line ending style for generated code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum LineEnding {
    /// Unix-style line endings (LF)
    #[default]
    Lf,

    /// Windows-style line endings (CRLF)
    CrLf,
}

impl LineEnding {
    /// Get the line ending string.
    pub fn as_str(&self) -> &str {
        match self {
            LineEnding::Lf => "\n",
            LineEnding::CrLf => "\r\n",
        }
    }
}

// =============================================================================
// Output
// =============================================================================

/// Generated code output.
#[derive(Debug, Clone, PartialEq)]
pub struct GeneratedCode {
    /// The complete compilation unit
    pub code: String,

    /// The top-level class declared by the unit
    pub type_name: QualifiedName,

    /// One entry per property: name and the strategy that generated it
    pub strategies: Vec<(String, &'static str)>,
}

impl GeneratedCode {
    /// Create a new GeneratedCode instance.
    pub fn new(code: impl Into<String>, type_name: QualifiedName) -> Self {
        Self {
            code: code.into(),
            type_name,
            strategies: Vec::new(),
        }
    }

    /// Record which strategy generated each property.
    pub fn with_strategies(mut self, strategies: Vec<(String, &'static str)>) -> Self {
        self.strategies = strategies;
        self
    }

    /// File name of the unit (`Person_Builder.java`).
    pub fn file_name(&self) -> String {
        format!("{}.java", self.type_name.simple_name())
    }

    /// Path of the unit relative to a source root (`com/example/Person_Builder.java`).
    pub fn relative_path(&self) -> PathBuf {
        let mut path: PathBuf = self
            .type_name
            .package()
            .split('.')
            .filter(|segment| !segment.is_empty())
            .collect();
        path.push(self.file_name());
        path
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_generator_config_default() {
        let config = GeneratorConfig::default();
        assert_eq!(config.features.source_level, SourceLevel::Java8);
        assert!(!config.features.guava);
        assert!(config.generate_docs);
        assert!(!config.generated_annotation);
        assert!(matches!(config.indent, IndentStyle::Spaces2));
        assert!(matches!(config.line_ending, LineEnding::Lf));
    }

    #[test]
    fn test_generator_config_builder() {
        let config = GeneratorConfig::new()
            .with_features(Features::new(SourceLevel::Java6, true))
            .with_generate_docs(false)
            .with_generated_annotation(true)
            .with_indent(IndentStyle::Spaces4);

        assert_eq!(config.features.source_level, SourceLevel::Java6);
        assert!(config.features.guava);
        assert!(!config.generate_docs);
        assert!(config.generated_annotation);
        assert!(matches!(config.indent, IndentStyle::Spaces4));
    }

    #[test]
    fn test_source_level_ordering() {
        assert!(SourceLevel::Java6 < SourceLevel::Java7);
        assert!(!Features::new(SourceLevel::Java6, false).has_objects());
        assert!(Features::new(SourceLevel::Java7, false).has_diamond());
        assert!(!Features::new(SourceLevel::Java7, false).has_lambdas());
        assert!(Features::new(SourceLevel::Java8, false).has_lambdas());
    }

    #[test]
    fn test_source_level_parse() {
        assert_eq!("java7".parse::<SourceLevel>(), Ok(SourceLevel::Java7));
        assert_eq!("1.6".parse::<SourceLevel>(), Ok(SourceLevel::Java6));
        assert_eq!("JAVA8".parse::<SourceLevel>(), Ok(SourceLevel::Java8));
        assert!("java11".parse::<SourceLevel>().is_err());
    }

    #[test]
    fn test_indent_style() {
        assert_eq!(IndentStyle::Spaces2.as_str(), "  ");
        assert_eq!(IndentStyle::Spaces4.as_str(), "    ");
        assert_eq!(IndentStyle::Tabs.as_str(), "\t");

        assert_eq!(IndentStyle::Spaces2.indent(2), "    ");
        assert_eq!(IndentStyle::Spaces4.indent(2), "        ");
    }

    #[test]
    fn test_line_ending() {
        assert_eq!(LineEnding::Lf.as_str(), "\n");
        assert_eq!(LineEnding::CrLf.as_str(), "\r\n");
    }

    #[test]
    fn test_generated_code_paths() {
        let code = GeneratedCode::new("class X {}", QualifiedName::new("com.example", "Person_Builder"));
        assert_eq!(code.file_name(), "Person_Builder.java");
        assert_eq!(
            code.relative_path(),
            PathBuf::from("com").join("example").join("Person_Builder.java")
        );

        let code = GeneratedCode::new("", QualifiedName::new("", "Person_Builder"));
        assert_eq!(code.relative_path(), PathBuf::from("Person_Builder.java"));
    }
}
