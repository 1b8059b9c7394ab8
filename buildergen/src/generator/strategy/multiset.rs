//! Guava `Multiset` properties.

use super::{element_type, Category, PropertyCodeGenerator};
use crate::generator::context::{preconditions, GenerationContext, Javadoc};
use crate::generator::equality::FieldKind;
use crate::generator::traits::Features;
use crate::model::{Property, PropertyDeclaration, QualifiedName, TypeRef};
use crate::source::SourceWriter;

fn guava_collect(simple_name: &str) -> QualifiedName {
    QualifiedName::new("com.google.common.collect", simple_name)
}

/// A `Multiset<E>` built up with element counts.
#[derive(Debug, Clone, PartialEq)]
pub struct MultisetProperty {
    property: Property,
    element: TypeRef,
}

impl MultisetProperty {
    /// Accepts `com.google.common.collect.Multiset<E>` when Guava is available.
    pub fn create(declaration: &PropertyDeclaration, features: &Features) -> Option<Self> {
        let ty = &declaration.property.declared_type;
        if !features.guava || !ty.is_class("com.google.common.collect.Multiset") {
            return None;
        }
        Some(Self {
            property: declaration.property.clone(),
            element: element_type(ty)?.clone(),
        })
    }
}

impl PropertyCodeGenerator for MultisetProperty {
    fn property(&self) -> &Property {
        &self.property
    }

    fn category(&self) -> Category {
        Category::HasDefault
    }

    fn field_kind(&self) -> FieldKind {
        FieldKind::NonNull
    }

    fn add_builder_field_declaration(&self, code: &mut SourceWriter, _ctx: &GenerationContext<'_>) {
        let linked = guava_collect("LinkedHashMultiset");
        code.add_line(
            "private final {} {} = {}.create();",
            &[
                &TypeRef::generic(linked.clone(), vec![self.element.clone()]),
                &self.property.name,
                &linked,
            ],
        );
    }

    fn add_builder_field_accessors(&self, code: &mut SourceWriter, ctx: &GenerationContext<'_>) {
        let property = &self.property;
        let name = &property.name;
        let link = ctx.getter_link(property);
        let add_copies = property.method("addCopiesTo");
        let add = property.method("add");

        ctx.add_javadoc(
            code,
            Javadoc::new()
                .line("Adds {@code element} to the multiset to be returned from {}.", &[&link])
                .blank()
                .line("@return this {@code Builder} object", &[])
                .line("@throws NullPointerException if {@code element} is null", &[]),
        );
        code.add_line("public {} {}({} element) {", &[ctx.builder(), &add, &self.element]);
        code.add_line("return {}(element, 1);", &[&add_copies]);
        code.add_line("}", &[]);

        code.add_line("", &[]);
        ctx.add_javadoc(
            code,
            Javadoc::new()
                .line("Adds a number of occurrences of {@code element} to the multiset to be", &[])
                .line("returned from {}.", &[&link])
                .blank()
                .line("@return this {@code Builder} object", &[])
                .line("@throws NullPointerException if {@code element} is null", &[])
                .line("@throws IllegalArgumentException if {@code occurrences} is negative", &[]),
        );
        code.add_line(
            "public {} {}({} element, int occurrences) {",
            &[ctx.builder(), &add_copies, &self.element],
        );
        code.add_line(
            "{}({}, {}.count({}.checkNotNull(element)) + occurrences);",
            &[&property.method("setCountOf"), &"element", name, &preconditions()],
        );
        ctx.add_return_this(code);
        code.add_line("}", &[]);

        code.add_line("", &[]);
        ctx.add_javadoc(
            code,
            Javadoc::new()
                .line("Adds each element of {@code elements} to the multiset to be returned from", &[])
                .line("{}.", &[&link])
                .blank()
                .line("@return this {@code Builder} object", &[])
                .line(
                    "@throws NullPointerException if {@code elements} is null or contains a",
                    &[],
                )
                .line("    null element", &[]),
        );
        code.add_line(
            "public {} {}({}<{}> elements) {",
            &[
                ctx.builder(),
                &property.method("addAll"),
                &QualifiedName::new("java.lang", "Iterable"),
                &TypeRef::extends_wildcard(self.element.clone()),
            ],
        );
        code.add_line("for ({} element : elements) {", &[&self.element]);
        code.add_line("{}(element, 1);", &[&add_copies]);
        code.add_line("}", &[]);
        ctx.add_return_this(code);
        code.add_line("}", &[]);

        code.add_line("", &[]);
        ctx.add_javadoc(
            code,
            Javadoc::new()
                .line("Adds or removes the necessary occurrences of {@code element} to/from the", &[])
                .line("multiset to be returned from {}, such that it attains the", &[&link])
                .line("desired count.", &[])
                .blank()
                .line("@return this {@code Builder} object", &[])
                .line("@throws NullPointerException if {@code element} is null", &[])
                .line("@throws IllegalArgumentException if {@code occurrences} is negative", &[]),
        );
        code.add_line(
            "public {} {}({} element, int occurrences) {",
            &[ctx.builder(), &property.method("setCountOf"), &self.element],
        );
        code.add_line("{}.checkNotNull(element);", &[&preconditions()]);
        code.add_line(
            "{}.checkArgument(occurrences >= 0, \"occurrences cannot be negative: %s\", occurrences);",
            &[&preconditions()],
        );
        code.add_line("this.{}.setCount(element, occurrences);", &[name]);
        ctx.add_return_this(code);
        code.add_line("}", &[]);

        code.add_line("", &[]);
        ctx.add_javadoc(
            code,
            Javadoc::new()
                .line("Clears the multiset to be returned from {}.", &[&link])
                .blank()
                .line("@return this {@code Builder} object", &[]),
        );
        code.add_line("public {} {}() {", &[ctx.builder(), &property.method("clear")]);
        code.add_line("this.{}.clear();", &[name]);
        ctx.add_return_this(code);
        code.add_line("}", &[]);

        code.add_line("", &[]);
        ctx.add_javadoc(
            code,
            Javadoc::new()
                .line("Returns an unmodifiable view of the multiset that will be returned by", &[])
                .line("{}.", &[&link])
                .line("Changes to this builder will be reflected in the view.", &[]),
        );
        code.add_line(
            "public {} {}() {",
            &[&property.declared_type, &property.builder_getter_name()],
        );
        code.add_line(
            "return {}.unmodifiableMultiset({});",
            &[&guava_collect("Multisets"), name],
        );
        code.add_line("}", &[]);
    }

    fn add_final_field_assignment(
        &self,
        code: &mut SourceWriter,
        _ctx: &GenerationContext<'_>,
        final_field: &str,
        builder: &str,
    ) {
        code.add_line(
            "{} = {}.copyOf({}.{});",
            &[
                &final_field,
                &guava_collect("ImmutableMultiset"),
                &builder,
                &self.property.name,
            ],
        );
    }

    fn add_merge_from_value(
        &self,
        code: &mut SourceWriter,
        _ctx: &GenerationContext<'_>,
        value: &str,
        _defaults: Option<&str>,
    ) {
        code.add_line(
            "{}({}.{}());",
            &[&self.property.method("addAll"), &value, &self.property.getter_name],
        );
    }

    fn add_merge_from_builder(
        &self,
        code: &mut SourceWriter,
        _ctx: &GenerationContext<'_>,
        builder: &str,
        _defaults: Option<&str>,
    ) {
        code.add_line(
            "{}({}.{}());",
            &[
                &self.property.method("addAll"),
                &builder,
                &self.property.builder_getter_name(),
            ],
        );
    }

    fn is_template_required_in_clear(&self) -> bool {
        false
    }

    fn add_clear(&self, code: &mut SourceWriter, ctx: &GenerationContext<'_>, _template: &str) {
        self.add_partial_clear(code, ctx);
    }

    fn add_partial_clear(&self, code: &mut SourceWriter, _ctx: &GenerationContext<'_>) {
        code.add_line("{}.clear();", &[&self.property.name]);
    }
}
