//! Code generator module.
//!
//! This module defines the code generator trait, the per-property
//! strategies, and the emitter that assembles a builder class from them.

pub mod context;
pub mod emitter;
pub mod equality;
pub mod selection;
pub mod strategy;
pub mod tracking;
pub mod traits;

pub use emitter::BuilderEmitter;
pub use selection::{PropertyFactory, SelectionChain};
pub use strategy::{Category, Strategy};
pub use traits::{
    CodeGenerator, Features, GeneratedCode, GeneratorConfig, IndentStyle, LineEnding, SourceLevel,
};
