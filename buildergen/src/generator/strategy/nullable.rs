//! Properties annotated `@Nullable`.

use super::{setter_doc, Category, PropertyCodeGenerator};
use crate::generator::context::{GenerationContext, Javadoc};
use crate::generator::equality::{Differs, FieldKind};
use crate::generator::traits::Features;
use crate::model::{Property, PropertyDeclaration, QualifiedName, TypeRef};
use crate::source::SourceWriter;

/// A reference property that may be null and defaults to null.
#[derive(Debug, Clone, PartialEq)]
pub struct NullableProperty {
    property: Property,
    nullables: Vec<QualifiedName>,
}

impl NullableProperty {
    /// Accepts reference types carrying a `@Nullable` marker.
    pub fn create(declaration: &PropertyDeclaration, _features: &Features) -> Option<Self> {
        let ty = &declaration.property.declared_type;
        if ty.is_primitive() || matches!(ty, TypeRef::Void) || !ty.is_resolved() {
            return None;
        }
        let nullables: Vec<QualifiedName> = declaration
            .nullable_annotations()
            .into_iter()
            .map(|a| a.name.clone())
            .collect();
        if nullables.is_empty() {
            return None;
        }
        Some(Self {
            property: declaration.property.clone(),
            nullables,
        })
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
                        kind: FieldKind::Nullable,
                        lhs: getter,
                        rhs: &default_value,
                        features: ctx.features,
                    }],
                );
            }
            None => {
                code.add_line("if ({} != null) {", &[&getter]);
            }
        }
        code.add_line("{}({});", &[&setter, &getter]);
        code.add_line("}", &[]);
    }
}

impl PropertyCodeGenerator for NullableProperty {
    fn property(&self) -> &Property {
        &self.property
    }

    fn category(&self) -> Category {
        Category::Optional
    }

    fn field_kind(&self) -> FieldKind {
        FieldKind::Nullable
    }

    fn add_field_annotations(&self, code: &mut SourceWriter) {
        self.add_getter_annotations(code);
    }

    fn add_getter_annotations(&self, code: &mut SourceWriter) {
        for annotation in &self.nullables {
            code.add("@{} ", &[annotation]);
        }
    }

    fn add_builder_field_declaration(&self, code: &mut SourceWriter, _ctx: &GenerationContext<'_>) {
        self.add_field_annotations(code);
        code.add_line(
            "private {} {} = null;",
            &[&self.property.declared_type, &self.property.name],
        );
    }

    fn add_builder_field_accessors(&self, code: &mut SourceWriter, ctx: &GenerationContext<'_>) {
        let property = &self.property;

        ctx.add_javadoc(code, setter_doc(ctx, property, false));
        code.add("public {} {}(", &[ctx.builder(), &property.setter_name()]);
        self.add_getter_annotations(code);
        code.add_line("{} {}) {", &[&property.declared_type, &property.name]);
        code.add_line("this.{} = {};", &[&property.name, &property.name]);
        ctx.add_return_this(code);
        code.add_line("}", &[]);

        code.add_line("", &[]);
        ctx.add_javadoc(
            code,
            Javadoc::new().line(
                "Returns the value that will be returned by {}.",
                &[&ctx.getter_link(property)],
            ),
        );
        self.add_getter_annotations(code);
        code.add_line(
            "public {} {}() {",
            &[&property.declared_type, &property.builder_getter_name()],
        );
        code.add_line("return {};", &[&property.name]);
        code.add_line("}", &[]);
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
    use crate::model::Annotation;

    fn nullable() -> Annotation {
        Annotation::new(QualifiedName::new("javax.annotation", "Nullable"))
    }

    fn declaration(ty: &str) -> PropertyDeclaration {
        PropertyDeclaration::new(Property::new("age", TypeRef::parse(ty))).with_annotation(nullable())
    }

    fn strategy() -> Strategy {
        Strategy::Nullable(
            NullableProperty::create(&declaration("java.lang.Integer"), &Features::default()).unwrap(),
        )
    }

    #[test]
    fn test_requires_nullable_reference() {
        let features = Features::default();
        assert!(NullableProperty::create(&declaration("int"), &features).is_none());
        let plain = PropertyDeclaration::new(Property::new("age", TypeRef::parse("java.lang.Integer")));
        assert!(NullableProperty::create(&plain, &features).is_none());
        let other = PropertyDeclaration::new(Property::new("age", TypeRef::parse("java.lang.Integer")))
            .with_annotation(Annotation::new(QualifiedName::new("com.example", "CheckForNull")));
        assert!(NullableProperty::create(&other, &features).is_none());
    }

    #[test]
    fn test_field_and_accessors() {
        let strategy = strategy();
        let field = render(&datatype(), Features::default(), &strategy, |g, code, ctx| {
            g.add_builder_field_declaration(code, ctx)
        });
        assert_eq!(
            field,
            "@javax.annotation.Nullable private java.lang.Integer age = null;\n"
        );

        let accessors = render(&datatype(), Features::default(), &strategy, |g, code, ctx| {
            g.add_builder_field_accessors(code, ctx)
        });
        assert!(accessors.contains(
            "public com.example.Person.Builder setAge(@javax.annotation.Nullable java.lang.Integer age) {\n  \
             this.age = age;\n  \
             return (com.example.Person.Builder) this;\n}"
        ));
        assert!(accessors.contains(
            "@javax.annotation.Nullable public java.lang.Integer getAge() {\n  return age;\n}"
        ));
        assert!(!accessors.contains("NullPointerException"));
        assert!(!accessors.contains("mapAge"));
    }

    #[test]
    fn test_merge_compares_against_defaults() {
        let text = render(
            &datatype(),
            Features::new(SourceLevel::Java6, false),
            &strategy(),
            |g, code, ctx| g.add_merge_from_value(code, ctx, "value", Some(DEFAULTS)),
        );
        assert_eq!(
            text,
            "if ((value.getAge() != _defaults.getAge() && (value.getAge() == null \
             || !value.getAge().equals(_defaults.getAge())))) {\n  setAge(value.getAge());\n}\n"
        );
    }

    #[test]
    fn test_merge_without_defaults_skips_null() {
        let text = render(&datatype(), Features::default(), &strategy(), |g, code, ctx| {
            g.add_merge_from_builder(code, ctx, "template", None)
        });
        assert_eq!(
            text,
            "if (template.getAge() != null) {\n  setAge(template.getAge());\n}\n"
        );
    }

    #[test]
    fn test_partial_clear_resets_to_null() {
        let text = render(&datatype(), Features::default(), &strategy(), |g, code, ctx| {
            g.add_partial_clear(code, ctx)
        });
        assert_eq!(text, "age = null;\n");
        assert_eq!(strategy().category(), Category::Optional);
    }
}
