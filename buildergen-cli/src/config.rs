//! Configuration management for the CLI.
//!
//! This module handles loading configuration from `buildergen.toml` files
//! and merging with command-line arguments.

use crate::error::{CliResult, ConfigError};
use buildergen::{Features, GeneratorConfig, IndentStyle, LineEnding, SourceLevel};
use serde::Deserialize;
use std::path::{Path, PathBuf};

/// Default configuration filename.
pub const CONFIG_FILENAME: &str = "buildergen.toml";

/// Main configuration structure.
#[derive(Debug, Default, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct Config {
    /// Output configuration.
    pub output: OutputConfig,

    /// Target language level and libraries.
    pub java: JavaConfig,
}

/// Output configuration.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct OutputConfig {
    /// Source root the generated files are written under.
    pub dir: PathBuf,

    /// Whether to generate Javadoc comments.
    pub generate_docs: bool,

    /// Whether to annotate builders with `@Generated`.
    pub generated_annotation: bool,

    /// Indentation: "2", "4" or "tab".
    pub indent: String,

    /// Line endings: "lf" or "crlf".
    pub line_ending: String,
}

/// Java feature configuration.
#[derive(Debug, Clone, PartialEq, Deserialize)]
#[serde(default)]
pub struct JavaConfig {
    /// Language level of the generated code.
    pub source_level: SourceLevel,

    /// Whether Guava is on the classpath.
    pub guava: bool,
}

impl Default for OutputConfig {
    fn default() -> Self {
        Self {
            dir: PathBuf::from("./generated"),
            generate_docs: true,
            generated_annotation: false,
            indent: "2".to_string(),
            line_ending: "lf".to_string(),
        }
    }
}

impl Default for JavaConfig {
    fn default() -> Self {
        Self {
            source_level: SourceLevel::Java8,
            guava: false,
        }
    }
}

impl Config {
    /// Translate into the core generator configuration.
    pub fn generator_config(&self) -> CliResult<GeneratorConfig> {
        let indent = match self.output.indent.to_ascii_lowercase().as_str() {
            "2" => IndentStyle::Spaces2,
            "4" => IndentStyle::Spaces4,
            "tab" | "tabs" => IndentStyle::Tabs,
            other => {
                return Err(ConfigError::invalid_value(
                    "output.indent",
                    format!("expected \"2\", \"4\" or \"tab\", got \"{}\"", other),
                )
                .into())
            }
        };
        let line_ending = match self.output.line_ending.to_ascii_lowercase().as_str() {
            "lf" => LineEnding::Lf,
            "crlf" => LineEnding::CrLf,
            other => {
                return Err(ConfigError::invalid_value(
                    "output.line_ending",
                    format!("expected \"lf\" or \"crlf\", got \"{}\"", other),
                )
                .into())
            }
        };

        Ok(GeneratorConfig::new()
            .with_features(Features::new(self.java.source_level, self.java.guava))
            .with_generate_docs(self.output.generate_docs)
            .with_generated_annotation(self.output.generated_annotation)
            .with_indent(indent)
            .with_line_ending(line_ending))
    }
}

/// Configuration manager for loading and merging configs.
pub struct ConfigManager;

impl ConfigManager {
    /// Load configuration from a file path.
    ///
    /// Without a path, `buildergen.toml` in the working directory is used if
    /// present and defaults otherwise. An explicit path must exist.
    pub fn load(path: Option<&Path>) -> CliResult<Config> {
        let config_path = match path {
            Some(path) if !path.exists() => {
                return Err(ConfigError::NotFound {
                    path: path.to_path_buf(),
                }
                .into())
            }
            Some(path) => path.to_path_buf(),
            None => PathBuf::from(CONFIG_FILENAME),
        };

        if !config_path.exists() {
            return Ok(Config::default());
        }

        let content = std::fs::read_to_string(&config_path).map_err(|e| ConfigError::Io {
            path: config_path.clone(),
            source: e,
        })?;

        Self::parse(&config_path, &content)
    }

    /// Parse configuration text; `path` is only used in error messages.
    pub fn parse(path: &Path, content: &str) -> CliResult<Config> {
        let config: Config = toml::from_str(content)
            .map_err(|e| ConfigError::invalid_toml(path.to_path_buf(), e.to_string()))?;
        Ok(config)
    }

    /// Merge CLI arguments into configuration.
    ///
    /// CLI arguments take precedence over config file values.
    pub fn merge_cli_args(mut config: Config, args: &CliArgs) -> Config {
        if let Some(ref output) = args.output {
            config.output.dir = output.clone();
        }

        if let Some(source_level) = args.source_level {
            config.java.source_level = source_level;
        }

        if let Some(guava) = args.guava {
            config.java.guava = guava;
        }

        if let Some(generate_docs) = args.generate_docs {
            config.output.generate_docs = generate_docs;
        }

        config
    }

    /// Generate default configuration file content with comments.
    pub fn default_config_content() -> &'static str {
        r#"# buildergen configuration file

[output]
# Source root the generated builders are written under
dir = "./generated"

# Whether to generate Javadoc comments on builder methods
generate_docs = true

# Whether to annotate builders with @Generated
generated_annotation = false

# Indentation of generated code ("2", "4" or "tab")
indent = "2"

# Line endings of generated code ("lf" or "crlf")
line_ending = "lf"

[java]
# Language level of the generated code (java6, java7, java8)
source_level = "java8"

# Whether Guava is available (immutable copies, Multiset, Preconditions)
guava = false
"#
    }
}

/// CLI arguments that can override configuration.
#[derive(Debug, Default)]
pub struct CliArgs {
    /// Output directory override.
    pub output: Option<PathBuf>,

    /// Source level override.
    pub source_level: Option<SourceLevel>,

    /// Guava override.
    pub guava: Option<bool>,

    /// Generate docs override.
    pub generate_docs: Option<bool>,
}
