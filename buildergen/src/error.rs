//! Error types for builder generation.
//!
//! Every error here is fatal for the type being generated: the orchestrator
//! stops at the first one and no partial output is produced.

use thiserror::Error;

/// Result type alias for generator operations.
pub type GeneratorResult<T> = Result<T, GeneratorError>;

/// Errors raised while binding strategies or rendering a builder.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum GeneratorError {
    /// No strategy in the selection chain accepted the property.
    #[error("No strategy can generate property '{property}' of type {declared_type}")]
    UnresolvedProperty {
        property: String,
        declared_type: String,
    },

    /// The datatype metadata contradicts itself.
    #[error("Invalid metadata for {type_name}: {message}")]
    InvalidMetadata { type_name: String, message: String },

    /// A property was constructed with inconsistent name forms.
    #[error("Invalid property '{property}': {message}")]
    InvalidProperty { property: String, message: String },
}

impl GeneratorError {
    /// Create an invalid metadata error.
    pub fn invalid_metadata(type_name: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidMetadata {
            type_name: type_name.into(),
            message: message.into(),
        }
    }

    /// Create an invalid property error.
    pub fn invalid_property(property: impl Into<String>, message: impl Into<String>) -> Self {
        Self::InvalidProperty {
            property: property.into(),
            message: message.into(),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_unresolved_property_message() {
        let err = GeneratorError::UnresolvedProperty {
            property: "callback".to_string(),
            declared_type: "void".to_string(),
        };
        assert_eq!(
            err.to_string(),
            "No strategy can generate property 'callback' of type void"
        );
    }

    #[test]
    fn test_invalid_metadata_message() {
        let err = GeneratorError::invalid_metadata("com.example.Person", "duplicate nested name");
        assert!(err.to_string().contains("com.example.Person"));
        assert!(err.to_string().contains("duplicate nested name"));
    }
}
