//! # buildergen
//!
//! Generates Java builder classes from a structural description of value
//! types.
//!
//! For an abstract type `Person` with a nested `Builder extends
//! Person_Builder`, this crate renders the source of `Person_Builder`: a
//! mutable builder with typed setters, `mergeFrom`, `clear`, `build` and
//! `buildPartial`, plus the immutable `Value` and `Partial` implementations.
//!
//! ## Usage
//!
//! ```rust,ignore
//! use buildergen::{generate_builder, GeneratorConfig, TypeDescriptor};
//!
//! let descriptor = TypeDescriptor::from_json(r#"{
//!     "type": "com.example.Person",
//!     "properties": [
//!         {"name": "name", "type": "java.lang.String"},
//!         {"name": "age", "type": "java.lang.Integer",
//!          "annotations": [{"name": "javax.annotation.Nullable"}]}
//!     ]
//! }"#)?;
//! let generated = generate_builder(&descriptor, &GeneratorConfig::default())?;
//! assert_eq!(generated.file_name(), "Person_Builder.java");
//! ```
//!
//! ## Property Strategies
//!
//! Each property is bound to the first strategy that accepts it:
//!
//! - `nullable` - reference types carrying a `@Nullable` annotation
//! - `collection` - `java.util.List<E>` and `java.util.Set<E>`
//! - `map` - `java.util.Map<K, V>`
//! - `multiset` - Guava `Multiset<E>`, when Guava is available
//! - `optional` - `java.util.Optional<T>` (Java 8) or Guava `Optional<T>`
//! - `buildable` - types with their own generated builder
//! - `default` - properties the user builder initializes
//! - `required` - everything else; `build()` fails while unset

pub mod error;
pub mod generator;
pub mod model;
pub mod source;

pub use error::{GeneratorError, GeneratorResult};
pub use generator::{
    BuilderEmitter, CodeGenerator, Features, GeneratedCode, GeneratorConfig, IndentStyle,
    LineEnding, SourceLevel,
};
pub use model::{Datatype, PropertyDeclaration, TypeDescriptor};

/// Generate the builder for one descriptor with the standard emitter.
pub fn generate_builder(
    descriptor: &TypeDescriptor,
    config: &GeneratorConfig,
) -> GeneratorResult<GeneratedCode> {
    BuilderEmitter::new().generate_descriptor(descriptor, config)
}
