//! `java.util.Optional` and Guava `Optional` properties.

use super::{element_type, unary_operator, Category, PropertyCodeGenerator};
use crate::generator::context::{field_ref, GenerationContext, Javadoc, MAP_LOCALS};
use crate::generator::equality::{Differs, FieldKind};
use crate::generator::traits::Features;
use crate::model::{Property, PropertyDeclaration, QualifiedName, TypeRef};
use crate::source::SourceWriter;

/// Which `Optional` class a property uses.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum OptionalKind {
    /// `java.util.Optional`, Java 8 and later
    Java,
    /// `com.google.common.base.Optional`
    Guava,
}

impl OptionalKind {
    /// The kind of a declared type, if the features allow it.
    pub fn of(ty: &TypeRef, features: &Features) -> Option<Self> {
        if ty.is_class("java.util.Optional") && features.has_lambdas() {
            Some(OptionalKind::Java)
        } else if ty.is_class("com.google.common.base.Optional") && features.guava {
            Some(OptionalKind::Guava)
        } else {
            None
        }
    }

    /// The `Optional` class.
    pub fn class(self) -> QualifiedName {
        match self {
            OptionalKind::Java => QualifiedName::new("java.util", "Optional"),
            OptionalKind::Guava => QualifiedName::new("com.google.common.base", "Optional"),
        }
    }

    /// Factory wrapping a possibly-null reference.
    pub fn of_nullable(self) -> &'static str {
        match self {
            OptionalKind::Java => "ofNullable",
            OptionalKind::Guava => "fromNullable",
        }
    }

    /// Factory for the empty instance.
    pub fn empty(self) -> &'static str {
        match self {
            OptionalKind::Java => "empty",
            OptionalKind::Guava => "absent",
        }
    }
}

/// A property exposed as `Optional<T>` and stored as a nullable `T`.
#[derive(Debug, Clone, PartialEq)]
pub struct OptionalProperty {
    property: Property,
    kind: OptionalKind,
    element: TypeRef,
}

impl OptionalProperty {
    /// Accepts `Optional<T>` when its class is available.
    pub fn create(declaration: &PropertyDeclaration, features: &Features) -> Option<Self> {
        let ty = &declaration.property.declared_type;
        let kind = OptionalKind::of(ty, features)?;
        let element = element_type(ty)?.clone();
        Some(Self {
            property: declaration.property.clone(),
            kind,
            element,
        })
    }

    /// `Optional<? extends T>`
    fn wildcard_optional(&self) -> TypeRef {
        TypeRef::generic(
            self.kind.class(),
            vec![TypeRef::extends_wildcard(self.element.clone())],
        )
    }

    fn add_conditional_merge(
        &self,
        code: &mut SourceWriter,
        ctx: &GenerationContext<'_>,
        getter: &str,
        defaults: Option<&str>,
    ) {
        let setter = self.property.setter_name();
        match defaults {
            Some(defaults) => {
                let default_value =
                    format!("{}.{}()", defaults, self.property.builder_getter_name());
                code.add_line(
                    "if ({}) {",
                    &[&Differs {
                        kind: FieldKind::NonNull,
                        lhs: getter,
                        rhs: &default_value,
                        features: ctx.features,
                    }],
                );
            }
            None => {
                code.add_line("if ({}.isPresent()) {", &[&getter]);
            }
        }
        code.add_line("{}({});", &[&setter, &getter]);
        code.add_line("}", &[]);
    }
}

impl PropertyCodeGenerator for OptionalProperty {
    fn property(&self) -> &Property {
        &self.property
    }

    fn category(&self) -> Category {
        Category::Optional
    }

    fn value_field_type(&self) -> TypeRef {
        self.element.clone()
    }

    fn field_kind(&self) -> FieldKind {
        FieldKind::Nullable
    }

    fn add_builder_field_declaration(&self, code: &mut SourceWriter, _ctx: &GenerationContext<'_>) {
        code.add_line("private {} {} = null;", &[&self.element, &self.property.name]);
    }

    fn add_builder_field_accessors(&self, code: &mut SourceWriter, ctx: &GenerationContext<'_>) {
        let property = &self.property;
        let name = &property.name;
        let setter = property.setter_name();
        let clear = property.method("clear");
        let optional = self.kind.class();
        let link = ctx.getter_link(property);

        // setX(T)
        ctx.add_javadoc(
            code,
            Javadoc::new()
                .line("Sets the value to be returned by {}.", &[&link])
                .blank()
                .line("@return this {@code Builder} object", &[])
                .line("@throws NullPointerException if {@code {}} is null", &[name]),
        );
        code.add_line(
            "public {} {}({} {}) {",
            &[ctx.builder(), &setter, &self.element, name],
        );
        ctx.add_checked_assignment(code, &format!("this.{}", name), name);
        ctx.add_return_this(code);
        code.add_line("}", &[]);

        // setX(Optional<? extends T>)
        code.add_line("", &[]);
        ctx.add_javadoc(
            code,
            Javadoc::new()
                .line("Sets the value to be returned by {}.", &[&link])
                .blank()
                .line("@return this {@code Builder} object", &[])
                .line("@throws NullPointerException if {@code {}} is null", &[name]),
        );
        code.add_line(
            "public {} {}({} {}) {",
            &[ctx.builder(), &setter, &self.wildcard_optional(), name],
        );
        code.add_line("if ({}.isPresent()) {", &[name]);
        code.add_line("return {}({}.get());", &[&setter, name]);
        code.add_line("} else {", &[]);
        code.add_line("return {}();", &[&clear]);
        code.add_line("}", &[]);
        code.add_line("}", &[]);

        // setNullableX(T)
        code.add_line("", &[]);
        ctx.add_javadoc(
            code,
            Javadoc::new()
                .line("Sets the value to be returned by {}.", &[&link])
                .blank()
                .line("@return this {@code Builder} object", &[]),
        );
        code.add_line(
            "public {} {}({} {}) {",
            &[ctx.builder(), &property.method("setNullable"), &self.element, name],
        );
        code.add_line("if ({} != null) {", &[name]);
        code.add_line("return {}({});", &[&setter, name]);
        code.add_line("} else {", &[]);
        code.add_line("return {}();", &[&clear]);
        code.add_line("}", &[]);
        code.add_line("}", &[]);

        if ctx.features.has_lambdas() {
            code.add_line("", &[]);
            ctx.add_javadoc(
                code,
                Javadoc::new()
                    .line("If the value to be returned by {} is present,", &[&link])
                    .line("replaces it by applying {@code mapper} to it and using the result.", &[])
                    .blank()
                    .line("@return this {@code Builder} object", &[])
                    .line(
                        "@throws NullPointerException if {@code mapper} is null or returns null",
                        &[],
                    ),
            );
            code.add_line(
                "public {} {}({}<{}> mapper) {",
                &[ctx.builder(), &property.method("map"), &unary_operator(), &self.element],
            );
            ctx.add_null_check(code, "mapper");
            let current = field_ref(name, MAP_LOCALS);
            code.add_line("if ({} != null) {", &[&current]);
            code.add_line("{} result = mapper.apply({});", &[&self.element, &current]);
            self.add_set_from_result(code, "this", "result");
            code.add_line("}", &[]);
            ctx.add_return_this(code);
            code.add_line("}", &[]);
        }

        // clearX()
        code.add_line("", &[]);
        ctx.add_javadoc(
            code,
            Javadoc::new()
                .line("Sets the value to be returned by {}", &[&link])
                .line(
                    "to {@link {}#{}() Optional.{}()}.",
                    &[&optional, &self.kind.empty(), &self.kind.empty()],
                )
                .blank()
                .line("@return this {@code Builder} object", &[]),
        );
        code.add_line("public {} {}() {", &[ctx.builder(), &clear]);
        code.add_line("this.{} = null;", &[name]);
        ctx.add_return_this(code);
        code.add_line("}", &[]);

        // getX()
        code.add_line("", &[]);
        ctx.add_javadoc(
            code,
            Javadoc::new().line("Returns the value that will be returned by {}.", &[&link]),
        );
        code.add_line(
            "public {}<{}> {}() {",
            &[&optional, &self.element, &property.builder_getter_name()],
        );
        code.add_line(
            "return {}.{}({});",
            &[&optional, &self.kind.of_nullable(), name],
        );
        code.add_line("}", &[]);
    }

    fn add_value_getter_body(&self, code: &mut SourceWriter, _ctx: &GenerationContext<'_>, field: &str) {
        code.add_line(
            "return {}.{}({});",
            &[&self.kind.class(), &self.kind.of_nullable(), &field],
        );
    }

    fn merges_against_defaults(&self) -> bool {
        true
    }

    fn add_merge_from_value(
        &self,
        code: &mut SourceWriter,
        ctx: &GenerationContext<'_>,
        value: &str,
        defaults: Option<&str>,
    ) {
        let getter = format!("{}.{}()", value, self.property.getter_name);
        self.add_conditional_merge(code, ctx, &getter, defaults);
    }

    fn add_merge_from_builder(
        &self,
        code: &mut SourceWriter,
        ctx: &GenerationContext<'_>,
        builder: &str,
        defaults: Option<&str>,
    ) {
        let getter = format!("{}.{}()", builder, self.property.builder_getter_name());
        self.add_conditional_merge(code, ctx, &getter, defaults);
    }

    fn is_template_required_in_clear(&self) -> bool {
        true
    }

    fn add_clear(&self, code: &mut SourceWriter, _ctx: &GenerationContext<'_>, template: &str) {
        let name = &self.property.name;
        code.add_line("{} = {}.{};", &[name, &template, name]);
    }

    fn add_partial_clear(&self, code: &mut SourceWriter, _ctx: &GenerationContext<'_>) {
        code.add_line("{} = null;", &[&self.property.name]);
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generator::context::DEFAULTS;
    use crate::generator::strategy::test_support::{datatype, render};
    use crate::generator::strategy::Strategy;
    use crate::generator::traits::SourceLevel;

    fn declaration(ty: &str) -> PropertyDeclaration {
        PropertyDeclaration::new(Property::new("nickname", TypeRef::parse(ty)))
    }

    fn strategy(ty: &str, features: Features) -> Strategy {
        Strategy::Optional(OptionalProperty::create(&declaration(ty), &features).unwrap())
    }

    #[test]
    fn test_kind_depends_on_features() {
        let java = "java.util.Optional<java.lang.String>";
        let guava = "com.google.common.base.Optional<java.lang.String>";
        let java7 = Features::new(SourceLevel::Java7, true);
        assert!(OptionalProperty::create(&declaration(java), &java7).is_none());
        assert!(OptionalProperty::create(&declaration(guava), &java7).is_some());
        let java8 = Features::new(SourceLevel::Java8, false);
        assert!(OptionalProperty::create(&declaration(java), &java8).is_some());
        assert!(OptionalProperty::create(&declaration(guava), &java8).is_none());
        assert!(OptionalProperty::create(&declaration("java.util.Optional"), &java8).is_none());
    }

    #[test]
    fn test_java8_accessors() {
        let features = Features::new(SourceLevel::Java8, false);
        let text = render(
            &datatype(),
            features,
            &strategy("java.util.Optional<java.lang.String>", features),
            |g, code, ctx| g.add_builder_field_accessors(code, ctx),
        );
        assert!(text.contains(
            "public com.example.Person.Builder setNickname(java.lang.String nickname) {\n  \
             this.nickname = java.util.Objects.requireNonNull(nickname);"
        ));
        assert!(text.contains(
            "public com.example.Person.Builder setNickname(\
             java.util.Optional<? extends java.lang.String> nickname) {\n  \
             if (nickname.isPresent()) {\n    return setNickname(nickname.get());\n  \
             } else {\n    return clearNickname();\n  }\n}"
        ));
        assert!(text.contains(
            "public com.example.Person.Builder setNullableNickname(java.lang.String nickname) {"
        ));
        assert!(text.contains("if (nickname != null) {\n    java.lang.String result = mapper.apply(nickname);"));
        assert!(text.contains("to {@link java.util.Optional#empty() Optional.empty()}."));
        assert!(text.contains(
            "public java.util.Optional<java.lang.String> getNickname() {\n  \
             return java.util.Optional.ofNullable(nickname);\n}"
        ));
    }

    #[test]
    fn test_guava_accessors_without_lambdas() {
        let features = Features::new(SourceLevel::Java7, true);
        let text = render(
            &datatype(),
            features,
            &strategy("com.google.common.base.Optional<java.lang.String>", features),
            |g, code, ctx| g.add_builder_field_accessors(code, ctx),
        );
        assert!(!text.contains("mapNickname"));
        assert!(text.contains("return com.google.common.base.Optional.fromNullable(nickname);"));
        assert!(text.contains("Optional#absent() Optional.absent()"));
    }

    #[test]
    fn test_value_stores_element() {
        let features = Features::new(SourceLevel::Java8, false);
        let strategy = strategy("java.util.Optional<java.lang.String>", features);
        assert_eq!(strategy.generator().value_field_type(), TypeRef::parse("java.lang.String"));
        let text = render(&datatype(), features, &strategy, |g, code, ctx| {
            g.add_value_getter_body(code, ctx, "nickname")
        });
        assert_eq!(text, "return java.util.Optional.ofNullable(nickname);\n");
    }

    #[test]
    fn test_merge() {
        let features = Features::new(SourceLevel::Java8, false);
        let strategy = strategy("java.util.Optional<java.lang.String>", features);
        let with_defaults = render(&datatype(), features, &strategy, |g, code, ctx| {
            g.add_merge_from_value(code, ctx, "value", Some(DEFAULTS))
        });
        assert_eq!(
            with_defaults,
            "if (!java.util.Objects.equals(value.getNickname(), _defaults.getNickname())) {\n  \
             setNickname(value.getNickname());\n}\n"
        );
        let without = render(&datatype(), features, &strategy, |g, code, ctx| {
            g.add_merge_from_builder(code, ctx, "template", None)
        });
        assert_eq!(
            without,
            "if (template.getNickname().isPresent()) {\n  setNickname(template.getNickname());\n}\n"
        );
    }
}
