//! `List` and `Set` properties.

use super::{collections, element_type, Category, PropertyCodeGenerator};
use crate::generator::context::{java_util, GenerationContext, Javadoc};
use crate::generator::equality::FieldKind;
use crate::generator::traits::Features;
use crate::model::{Property, PropertyDeclaration, QualifiedName, TypeRef};
use crate::source::SourceWriter;

/// The collection interfaces with a dedicated strategy.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CollectionKind {
    List,
    Set,
}

impl CollectionKind {
    /// The kind of a declared type.
    pub fn of(ty: &TypeRef) -> Option<Self> {
        if ty.is_class("java.util.List") {
            Some(CollectionKind::List)
        } else if ty.is_class("java.util.Set") {
            Some(CollectionKind::Set)
        } else {
            None
        }
    }

    /// Mutable class backing the builder field.
    pub fn implementation(self) -> QualifiedName {
        match self {
            CollectionKind::List => java_util("ArrayList"),
            CollectionKind::Set => java_util("LinkedHashSet"),
        }
    }

    /// `Collections` method returning a read-only view.
    pub fn unmodifiable(self) -> &'static str {
        match self {
            CollectionKind::List => "unmodifiableList",
            CollectionKind::Set => "unmodifiableSet",
        }
    }

    /// Guava immutable counterpart.
    pub fn immutable(self) -> QualifiedName {
        let simple_name = match self {
            CollectionKind::List => "ImmutableList",
            CollectionKind::Set => "ImmutableSet",
        };
        QualifiedName::new("com.google.common.collect", simple_name)
    }

    /// Word used in Javadoc.
    pub fn noun(self) -> &'static str {
        match self {
            CollectionKind::List => "list",
            CollectionKind::Set => "set",
        }
    }
}

/// A `List<E>` or `Set<E>` built up element by element.
#[derive(Debug, Clone, PartialEq)]
pub struct CollectionProperty {
    property: Property,
    kind: CollectionKind,
    element: TypeRef,
}

impl CollectionProperty {
    /// Accepts `java.util.List<E>` and `java.util.Set<E>`.
    pub fn create(declaration: &PropertyDeclaration, _features: &Features) -> Option<Self> {
        let ty = &declaration.property.declared_type;
        let kind = CollectionKind::of(ty)?;
        let element = element_type(ty)?.clone();
        Some(Self {
            property: declaration.property.clone(),
            kind,
            element,
        })
    }

    /// The collection kind.
    pub fn kind(&self) -> CollectionKind {
        self.kind
    }

    /// `ArrayList<E>`
    fn implementation_type(&self) -> TypeRef {
        TypeRef::generic(self.kind.implementation(), vec![self.element.clone()])
    }
}

impl PropertyCodeGenerator for CollectionProperty {
    fn property(&self) -> &Property {
        &self.property
    }

    fn category(&self) -> Category {
        Category::HasDefault
    }

    fn field_kind(&self) -> FieldKind {
        FieldKind::NonNull
    }

    fn add_builder_field_declaration(&self, code: &mut SourceWriter, ctx: &GenerationContext<'_>) {
        let implementation = self.implementation_type();
        if ctx.features.has_diamond() {
            code.add_line(
                "private final {} {} = new {}<>();",
                &[&implementation, &self.property.name, &self.kind.implementation()],
            );
        } else {
            code.add_line(
                "private final {} {} = new {}();",
                &[&implementation, &self.property.name, &implementation],
            );
        }
    }

    fn add_builder_field_accessors(&self, code: &mut SourceWriter, ctx: &GenerationContext<'_>) {
        let property = &self.property;
        let name = &property.name;
        let noun = self.kind.noun();
        let link = ctx.getter_link(property);
        let add = property.method("add");

        ctx.add_javadoc(
            code,
            Javadoc::new()
                .line("Adds {@code element} to the {} to be returned from {}.", &[&noun, &link])
                .blank()
                .line("@return this {@code Builder} object", &[])
                .line("@throws NullPointerException if {@code element} is null", &[]),
        );
        code.add_line("public {} {}({} element) {", &[ctx.builder(), &add, &self.element]);
        ctx.add_null_check(code, "element");
        code.add_line("this.{}.add(element);", &[name]);
        ctx.add_return_this(code);
        code.add_line("}", &[]);

        code.add_line("", &[]);
        ctx.add_javadoc(
            code,
            Javadoc::new()
                .line("Adds each element of {@code elements} to the {} to be returned from", &[&noun])
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
        code.add_line("{}(element);", &[&add]);
        code.add_line("}", &[]);
        ctx.add_return_this(code);
        code.add_line("}", &[]);

        if self.kind == CollectionKind::Set {
            code.add_line("", &[]);
            ctx.add_javadoc(
                code,
                Javadoc::new()
                    .line("Removes {@code element} from the set to be returned from {}.", &[&link])
                    .line("Does nothing if {@code element} is not in the set.", &[])
                    .blank()
                    .line("@return this {@code Builder} object", &[])
                    .line("@throws NullPointerException if {@code element} is null", &[]),
            );
            code.add_line(
                "public {} {}({} element) {",
                &[ctx.builder(), &property.method("remove"), &self.element],
            );
            ctx.add_null_check(code, "element");
            code.add_line("this.{}.remove(element);", &[name]);
            ctx.add_return_this(code);
            code.add_line("}", &[]);
        }

        code.add_line("", &[]);
        ctx.add_javadoc(
            code,
            Javadoc::new()
                .line("Clears the {} to be returned from {}.", &[&noun, &link])
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
                .line("Returns an unmodifiable view of the {} that will be returned by", &[&noun])
                .line("{}.", &[&link])
                .line("Changes to this builder will be reflected in the view.", &[]),
        );
        code.add_line(
            "public {} {}() {",
            &[&property.declared_type, &property.builder_getter_name()],
        );
        code.add_line(
            "return {}.{}({});",
            &[&collections(), &self.kind.unmodifiable(), name],
        );
        code.add_line("}", &[]);
    }

    fn add_final_field_assignment(
        &self,
        code: &mut SourceWriter,
        ctx: &GenerationContext<'_>,
        final_field: &str,
        builder: &str,
    ) {
        let name = &self.property.name;
        if ctx.features.guava {
            code.add_line(
                "{} = {}.copyOf({}.{});",
                &[&final_field, &self.kind.immutable(), &builder, name],
            );
        } else {
            code.add_line(
                "{} = {}.{}(new {}({}.{}));",
                &[
                    &final_field,
                    &collections(),
                    &self.kind.unmodifiable(),
                    &self.implementation_type(),
                    &builder,
                    name,
                ],
            );
        }
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
