//! Structural annotation descriptors.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use super::types::QualifiedName;

/// An annotation present on a source accessor.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Annotation {
    /// Annotation type
    pub name: QualifiedName,

    /// Explicitly written element values, as Java source text
    #[serde(default, skip_serializing_if = "BTreeMap::is_empty")]
    pub element_values: BTreeMap<String, String>,
}

impl Annotation {
    /// Create a marker annotation.
    pub fn new(name: QualifiedName) -> Self {
        Self {
            name,
            element_values: BTreeMap::new(),
        }
    }

    /// Add an element value.
    pub fn with_element(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.element_values.insert(key.into(), value.into());
        self
    }

    /// A marker annotation whose simple name is `Nullable`, from any package.
    pub fn is_nullable(&self) -> bool {
        self.element_values.is_empty() && self.name.simple_name() == "Nullable"
    }
}
