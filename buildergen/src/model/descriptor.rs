//! Serialized type descriptors.
//!
//! A descriptor is the compact form a host adapter writes for one source
//! type: the class name, a few flags and the ordered property list. The
//! conventional class names are derived through [`Datatype::standard`].

use serde::{Deserialize, Serialize};

use super::datatype::{BuilderFactory, Datatype};
use super::property::PropertyDeclaration;
use super::types::{ParameterizedType, QualifiedName};
use crate::error::GeneratorResult;

/// One source type and its properties.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct TypeDescriptor {
    /// Qualified name of the source type
    #[serde(rename = "type")]
    pub type_name: QualifiedName,

    /// Type parameter names
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub type_parameters: Vec<String>,

    /// Whether the source type is an interface
    #[serde(default)]
    pub interface: bool,

    /// Builder factory; `null` when the builder has no accessible constructor
    #[serde(default = "default_factory")]
    pub builder_factory: Option<BuilderFactory>,

    /// Whether the builder is serializable
    #[serde(default)]
    pub serializable: bool,

    /// Whether the builder is extensible
    #[serde(default = "default_extensible")]
    pub extensible: bool,

    /// Properties in declaration order
    #[serde(default)]
    pub properties: Vec<PropertyDeclaration>,
}

fn default_factory() -> Option<BuilderFactory> {
    Some(BuilderFactory::NoArgsConstructor)
}

fn default_extensible() -> bool {
    true
}

impl TypeDescriptor {
    /// Create a descriptor with default flags and no properties.
    pub fn new(type_name: QualifiedName) -> Self {
        Self {
            type_name,
            type_parameters: Vec::new(),
            interface: false,
            builder_factory: default_factory(),
            serializable: false,
            extensible: true,
            properties: Vec::new(),
        }
    }

    /// Add a property.
    pub fn with_property(mut self, property: PropertyDeclaration) -> Self {
        self.properties.push(property);
        self
    }

    /// Parse a descriptor from JSON.
    pub fn from_json(json: &str) -> serde_json::Result<Self> {
        serde_json::from_str(json)
    }

    /// Build the validated datatype this descriptor describes.
    pub fn datatype(&self) -> GeneratorResult<Datatype> {
        let source = ParameterizedType::new(self.type_name.clone())
            .with_params(self.type_parameters.iter().cloned());
        let datatype = Datatype::standard(source)
            .with_interface_type(self.interface)
            .with_builder_factory(self.builder_factory)
            .with_builder_serializable(self.serializable)
            .with_extensible(self.extensible);
        datatype.validate()?;
        Ok(datatype)
    }
}
