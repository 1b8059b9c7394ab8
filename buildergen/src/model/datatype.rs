//! Datatype model.
//!
//! Describes the source type and every class name the generated code
//! declares or refers to. Host adapters normally start from
//! [`Datatype::standard`] and adjust individual flags.

use serde::{Deserialize, Serialize};
use std::collections::BTreeSet;

use super::types::{ParameterizedType, QualifiedName};
use crate::error::{GeneratorError, GeneratorResult};

/// How a fresh user builder is obtained.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum BuilderFactory {
    /// `new Person.Builder()`
    #[default]
    NoArgsConstructor,
    /// `Person.builder()`
    BuilderMethod,
}

/// The type a builder is generated for.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Datatype {
    /// The abstract source type (`Person<A, B>`)
    pub source_type: ParameterizedType,

    /// Whether the source type is an interface
    #[serde(default)]
    pub interface_type: bool,

    /// The user-visible builder (`Person.Builder<A, B>`)
    pub builder: ParameterizedType,

    /// The generated superclass of the user builder (`Person_Builder<A, B>`)
    pub generated_builder: ParameterizedType,

    /// The immutable implementation (`Person_Builder.Value<A, B>`)
    pub value_type: ParameterizedType,

    /// The test-only partial implementation
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub partial_type: Option<ParameterizedType>,

    /// Enum tracking unset required properties
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub property_enum: Option<QualifiedName>,

    /// How a fresh builder is created, if at all
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub builder_factory: Option<BuilderFactory>,

    /// Whether the generated builder implements `Serializable`
    #[serde(default)]
    pub builder_serializable: bool,

    /// Whether the user builder can be subclassed and partials built
    #[serde(default)]
    pub extensible: bool,

    /// Nested types in scope inside the generated class body
    #[serde(default, skip_serializing_if = "BTreeSet::is_empty")]
    pub visible_nested_types: BTreeSet<QualifiedName>,
}

impl Datatype {
    /// Derive the conventional names for a source type.
    ///
    /// The generated builder for `com.example.Outer.Person` is the top-level
    /// class `com.example.Outer_Person_Builder`.
    pub fn standard(source_type: ParameterizedType) -> Self {
        let name = &source_type.name;
        let generated_name = QualifiedName::new(
            name.package(),
            format!("{}_Builder", name.simple_names().join("_")),
        );
        let builder = source_type.with_name(name.nested("Builder"));
        let generated_builder = source_type.with_name(generated_name.clone());
        let value_type = source_type.with_name(generated_name.nested("Value"));
        let partial_type = source_type.with_name(generated_name.nested("Partial"));
        let property_enum = generated_name.nested("Property");
        let visible_nested_types = [
            builder.name.clone(),
            value_type.name.clone(),
            partial_type.name.clone(),
            property_enum.clone(),
        ]
        .into_iter()
        .collect();
        Self {
            source_type,
            interface_type: false,
            builder,
            generated_builder,
            value_type,
            partial_type: Some(partial_type),
            property_enum: Some(property_enum),
            builder_factory: Some(BuilderFactory::NoArgsConstructor),
            builder_serializable: false,
            extensible: true,
            visible_nested_types,
        }
    }

    /// Mark the source type as an interface.
    pub fn with_interface_type(mut self, interface_type: bool) -> Self {
        self.interface_type = interface_type;
        self
    }

    /// Set the builder factory.
    pub fn with_builder_factory(mut self, factory: Option<BuilderFactory>) -> Self {
        self.builder_factory = factory;
        self
    }

    /// Make the generated builder serializable.
    pub fn with_builder_serializable(mut self, serializable: bool) -> Self {
        self.builder_serializable = serializable;
        self
    }

    /// Toggle extensibility; a non-extensible type has no partial.
    pub fn with_extensible(mut self, extensible: bool) -> Self {
        self.extensible = extensible;
        if !extensible {
            if let Some(partial) = self.partial_type.take() {
                self.visible_nested_types.remove(&partial.name);
            }
        } else if self.partial_type.is_none() {
            let partial = self
                .generated_builder
                .with_name(self.generated_builder.name.nested("Partial"));
            self.visible_nested_types.insert(partial.name.clone());
            self.partial_type = Some(partial);
        }
        self
    }

    /// Remove the required-tracking enum.
    pub fn without_property_enum(mut self) -> Self {
        if let Some(property_enum) = self.property_enum.take() {
            self.visible_nested_types.remove(&property_enum);
        }
        self
    }

    /// Package of the generated compilation unit.
    pub fn package(&self) -> &str {
        self.generated_builder.name.package()
    }

    /// Check that the metadata is self-consistent.
    pub fn validate(&self) -> GeneratorResult<()> {
        let type_name = self.source_type.name.to_string();
        if self.extensible != self.partial_type.is_some() {
            let message = if self.extensible {
                "extensible types need a partial type"
            } else {
                "a partial type is only generated for extensible types"
            };
            return Err(GeneratorError::invalid_metadata(type_name, message));
        }
        if !self.generated_builder.name.is_top_level() {
            return Err(GeneratorError::invalid_metadata(
                type_name,
                "the generated builder must be a top-level class",
            ));
        }
        let mut seen = BTreeSet::new();
        let nested = std::iter::once(&self.value_type.name)
            .chain(self.partial_type.as_ref().map(|p| &p.name))
            .chain(self.property_enum.as_ref());
        for name in nested {
            if name.enclosing_type().as_ref() != Some(&self.generated_builder.name) {
                return Err(GeneratorError::invalid_metadata(
                    type_name,
                    format!("{} is not nested in the generated builder", name),
                ));
            }
            if !seen.insert(name.simple_name()) {
                return Err(GeneratorError::invalid_metadata(
                    type_name,
                    format!("duplicate nested type name '{}'", name.simple_name()),
                ));
            }
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn person() -> ParameterizedType {
        ParameterizedType::new(QualifiedName::new("com.example", "Person")).with_params(["A", "B"])
    }

    #[test]
    fn test_standard_names() {
        let datatype = Datatype::standard(person());
        assert_eq!(datatype.builder.name.to_string(), "com.example.Person.Builder");
        assert_eq!(
            datatype.generated_builder.name.to_string(),
            "com.example.Person_Builder"
        );
        assert_eq!(
            datatype.value_type.name.to_string(),
            "com.example.Person_Builder.Value"
        );
        assert_eq!(datatype.value_type.params, vec!["A", "B"]);
        assert_eq!(
            datatype.property_enum.as_ref().map(ToString::to_string),
            Some("com.example.Person_Builder.Property".to_string())
        );
        assert!(datatype.extensible);
        assert_eq!(datatype.builder_factory, Some(BuilderFactory::NoArgsConstructor));
        assert!(datatype.validate().is_ok());
    }

    #[test]
    fn test_nested_source_type() {
        let source = ParameterizedType::new(
            QualifiedName::parse("com.example.Outer.Person").unwrap(),
        );
        let datatype = Datatype::standard(source);
        assert_eq!(
            datatype.generated_builder.name.to_string(),
            "com.example.Outer_Person_Builder"
        );
        assert_eq!(
            datatype.builder.name.to_string(),
            "com.example.Outer.Person.Builder"
        );
    }

    #[test]
    fn test_non_extensible_drops_partial() {
        let datatype = Datatype::standard(person()).with_extensible(false);
        assert!(datatype.partial_type.is_none());
        assert!(datatype.validate().is_ok());
        assert_eq!(datatype.visible_nested_types.len(), 3);
    }

    #[test]
    fn test_partial_without_extensible_is_rejected() {
        let mut datatype = Datatype::standard(person());
        datatype.extensible = false;
        let err = datatype.validate().unwrap_err();
        assert!(err.to_string().contains("only generated for extensible"));
    }

    #[test]
    fn test_duplicate_nested_names_are_rejected() {
        let mut datatype = Datatype::standard(person());
        datatype.property_enum = Some(datatype.generated_builder.name.nested("Value"));
        let err = datatype.validate().unwrap_err();
        assert!(err.to_string().contains("duplicate nested type name 'Value'"));
    }

    #[test]
    fn test_builder_factory_serde() {
        let factory: BuilderFactory = serde_json::from_str("\"builder_method\"").unwrap();
        assert_eq!(factory, BuilderFactory::BuilderMethod);
    }
}
