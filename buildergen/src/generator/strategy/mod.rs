//! Per-property code generation strategies.
//!
//! Each property of the source type is bound to exactly one strategy. The
//! orchestrator drives every strategy through the [`PropertyCodeGenerator`]
//! callbacks in a fixed order; strategies only write the code for their own
//! property and never look at the others.

mod buildable;
mod collection;
mod default_value;
mod map;
mod multiset;
mod nullable;
mod optional;
mod required;

pub use buildable::BuildableProperty;
pub use collection::{CollectionKind, CollectionProperty};
pub use default_value::DefaultValueProperty;
pub use map::MapProperty;
pub use multiset::MultisetProperty;
pub use nullable::NullableProperty;
pub use optional::{OptionalKind, OptionalProperty};
pub use required::RequiredProperty;

use super::context::{java_util, GenerationContext, Javadoc};
use super::equality::FieldKind;
use crate::model::{Property, QualifiedName, TypeRef};
use crate::source::SourceWriter;

/// How a property participates in required-property tracking.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    /// Must be set before `build()`.
    Required,
    /// May be left unset; reads as null or absent.
    Optional,
    /// Starts with a value supplied by the builder.
    HasDefault,
}

/// Callbacks the orchestrator invokes for one property.
pub trait PropertyCodeGenerator {
    /// The property this strategy generates.
    fn property(&self) -> &Property;

    /// Tracking category.
    fn category(&self) -> Category;

    /// Builder storage field(s).
    fn add_builder_field_declaration(&self, code: &mut SourceWriter, ctx: &GenerationContext<'_>);

    /// Builder setters, getters and mutators.
    fn add_builder_field_accessors(&self, code: &mut SourceWriter, ctx: &GenerationContext<'_>);

    /// Type of the field stored on the value and partial classes.
    fn value_field_type(&self) -> TypeRef {
        self.property().declared_type.clone()
    }

    /// How the stored field is compared and printed.
    fn field_kind(&self) -> FieldKind;

    /// Annotations written before the value field.
    fn add_field_annotations(&self, _code: &mut SourceWriter) {}

    /// Annotations written before generated getters and setter parameters.
    fn add_getter_annotations(&self, _code: &mut SourceWriter) {}

    /// Field declaration on the value and partial classes.
    fn add_value_field_declaration(&self, code: &mut SourceWriter, final_field: &str) {
        self.add_field_annotations(code);
        code.add_line("private final {} {};", &[&self.value_field_type(), &final_field]);
    }

    /// Copy the builder's state into a value field.
    fn add_final_field_assignment(
        &self,
        code: &mut SourceWriter,
        _ctx: &GenerationContext<'_>,
        final_field: &str,
        builder: &str,
    ) {
        code.add_line("{} = {}.{};", &[&final_field, &builder, &self.property().name]);
    }

    /// Copy the builder's state into a partial field.
    fn add_partial_field_assignment(
        &self,
        code: &mut SourceWriter,
        ctx: &GenerationContext<'_>,
        final_field: &str,
        builder: &str,
    ) {
        self.add_final_field_assignment(code, ctx, final_field, builder);
    }

    /// Body of the value getter overriding the source accessor.
    fn add_value_getter_body(&self, code: &mut SourceWriter, _ctx: &GenerationContext<'_>, field: &str) {
        code.add_line("return {};", &[&field]);
    }

    /// Whether `mergeFrom` compares this property against a default builder.
    fn merges_against_defaults(&self) -> bool {
        false
    }

    /// Statements merging the property from a value instance.
    fn add_merge_from_value(
        &self,
        code: &mut SourceWriter,
        ctx: &GenerationContext<'_>,
        value: &str,
        defaults: Option<&str>,
    );

    /// Statements merging the property from another builder.
    fn add_merge_from_builder(
        &self,
        code: &mut SourceWriter,
        ctx: &GenerationContext<'_>,
        builder: &str,
        defaults: Option<&str>,
    );

    /// Write a mapped result back through the setter.
    fn add_set_from_result(&self, code: &mut SourceWriter, builder: &str, variable: &str) {
        code.add_line(
            "{}.{}({});",
            &[&builder, &self.property().setter_name(), &variable],
        );
    }

    /// Whether `clear()` needs a default builder to reset this property.
    fn is_template_required_in_clear(&self) -> bool;

    /// Reset the property from a default builder.
    fn add_clear(&self, code: &mut SourceWriter, ctx: &GenerationContext<'_>, template: &str);

    /// Reset the property without a template.
    fn add_partial_clear(&self, code: &mut SourceWriter, ctx: &GenerationContext<'_>);
}

/// The strategy bound to one property.
#[derive(Debug, Clone, PartialEq)]
pub enum Strategy {
    Required(RequiredProperty),
    Nullable(NullableProperty),
    Optional(OptionalProperty),
    Collection(CollectionProperty),
    Map(MapProperty),
    Multiset(MultisetProperty),
    Buildable(BuildableProperty),
    DefaultValue(DefaultValueProperty),
}

impl Strategy {
    /// The code generator behind this strategy.
    pub fn generator(&self) -> &dyn PropertyCodeGenerator {
        match self {
            Strategy::Required(g) => g,
            Strategy::Nullable(g) => g,
            Strategy::Optional(g) => g,
            Strategy::Collection(g) => g,
            Strategy::Map(g) => g,
            Strategy::Multiset(g) => g,
            Strategy::Buildable(g) => g,
            Strategy::DefaultValue(g) => g,
        }
    }

    /// Short name of the strategy, used in logs and reports.
    pub fn name(&self) -> &'static str {
        match self {
            Strategy::Required(_) => "required",
            Strategy::Nullable(_) => "nullable",
            Strategy::Optional(_) => "optional",
            Strategy::Collection(_) => "collection",
            Strategy::Map(_) => "map",
            Strategy::Multiset(_) => "multiset",
            Strategy::Buildable(_) => "buildable",
            Strategy::DefaultValue(_) => "default",
        }
    }

    /// The property this strategy generates.
    pub fn property(&self) -> &Property {
        self.generator().property()
    }

    /// Tracking category.
    pub fn category(&self) -> Category {
        self.generator().category()
    }
}

// =============================================================================
// Shared accessor helpers
// =============================================================================

/// `java.util.function.UnaryOperator`
fn unary_operator() -> QualifiedName {
    QualifiedName::new("java.util.function", "UnaryOperator")
}

/// Javadoc for a setter of a scalar property.
fn setter_doc(ctx: &GenerationContext<'_>, property: &Property, null_checked: bool) -> Javadoc {
    let doc = Javadoc::new()
        .line("Sets the value to be returned by {}.", &[&ctx.getter_link(property)])
        .blank()
        .line("@return this {@code Builder} object", &[]);
    if null_checked {
        doc.line(
            "@throws NullPointerException if {@code {}} is null",
            &[&property.name],
        )
    } else {
        doc
    }
}

/// A null-checking `setX(T)` that stores into the builder field.
fn add_checked_setter(
    code: &mut SourceWriter,
    ctx: &GenerationContext<'_>,
    property: &Property,
    after_assignment: impl FnOnce(&mut SourceWriter),
) {
    let null_checked = !property.declared_type.is_primitive();
    ctx.add_javadoc(code, setter_doc(ctx, property, null_checked));
    code.add_line(
        "public {} {}({} {}) {",
        &[
            ctx.builder(),
            &property.setter_name(),
            &property.declared_type,
            &property.name,
        ],
    );
    let target = format!("this.{}", property.name);
    if null_checked {
        ctx.add_checked_assignment(code, &target, &property.name);
    } else {
        code.add_line("{} = {};", &[&target, &property.name]);
    }
    after_assignment(code);
    ctx.add_return_this(code);
    code.add_line("}", &[]);
}

/// Java 8 `mapX(UnaryOperator<T>)`, applying the mapper to the current value.
fn add_map_method(
    code: &mut SourceWriter,
    ctx: &GenerationContext<'_>,
    generator: &dyn PropertyCodeGenerator,
    current: &str,
    may_be_unset: bool,
) {
    let property = generator.property();
    let operand = property.boxed_or_declared();
    let mut doc = Javadoc::new()
        .line("Replaces the value to be returned by {}", &[&ctx.getter_link(property)])
        .line("by applying {@code mapper} to it and using the result.", &[])
        .blank()
        .line("@return this {@code Builder} object", &[])
        .line("@throws NullPointerException if {@code mapper} is null or returns null", &[]);
    if may_be_unset {
        doc = doc.line("@throws IllegalStateException if the field has not been set", &[]);
    }
    ctx.add_javadoc(code, doc);
    code.add_line(
        "public {} {}({}<{}> mapper) {",
        &[ctx.builder(), &property.method("map"), &unary_operator(), operand],
    );
    ctx.add_null_check(code, "mapper");
    code.add_line(
        "{} result = mapper.apply({});",
        &[&property.declared_type, &current],
    );
    generator.add_set_from_result(code, "this", "result");
    ctx.add_return_this(code);
    code.add_line("}", &[]);
}

/// `java.util.Collections`
fn collections() -> QualifiedName {
    java_util("Collections")
}

/// The single type argument of a generic type, if it is a plain type.
fn element_type(ty: &TypeRef) -> Option<&TypeRef> {
    match ty.type_args() {
        [element] => plain_type_arg(element),
        _ => None,
    }
}

/// Accepts type arguments that can be used as parameter types.
fn plain_type_arg(arg: &TypeRef) -> Option<&TypeRef> {
    match arg {
        TypeRef::Declared { .. } | TypeRef::Variable(_) | TypeRef::Array(_) => Some(arg),
        _ => None,
    }
}

#[cfg(test)]
pub(crate) mod test_support {
    use super::*;
    use crate::generator::tracking::RequiredTracking;
    use crate::generator::traits::{Features, IndentStyle, LineEnding};
    use crate::model::{Datatype, ParameterizedType};

    pub fn datatype() -> Datatype {
        Datatype::standard(ParameterizedType::new(QualifiedName::new("com.example", "Person")))
    }

    /// Render one callback of a strategy with every type fully qualified.
    pub fn render(
        datatype: &Datatype,
        features: Features,
        strategy: &Strategy,
        f: impl Fn(&dyn PropertyCodeGenerator, &mut SourceWriter, &GenerationContext<'_>),
    ) -> String {
        let tracking = RequiredTracking::new(
            datatype,
            [(strategy.property(), strategy.category())],
        )
        .expect("tracking");
        let ctx = GenerationContext::new(datatype, features, true, tracking);
        let mut code = SourceWriter::new();
        f(strategy.generator(), &mut code, &ctx);
        crate::source::reindent(&code.to_qualified_string(), IndentStyle::Spaces2, LineEnding::Lf)
    }
}
