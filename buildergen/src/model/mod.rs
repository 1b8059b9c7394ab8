//! Type and property model.
//!
//! Immutable value objects describing the source type. Nothing in this
//! module knows how builders are rendered.

pub mod annotation;
pub mod datatype;
pub mod descriptor;
pub mod property;
pub mod types;

#[cfg(test)]
mod proptest;

pub use annotation::Annotation;
pub use datatype::{BuilderFactory, Datatype};
pub use descriptor::TypeDescriptor;
pub use property::{BuildableType, DefaultSource, Property, PropertyDeclaration};
pub use types::{ParameterizedType, Primitive, QualifiedName, TypeRef};
