//! Properties with a builder-supplied default.

use super::{add_checked_setter, add_map_method, Category, PropertyCodeGenerator};
use crate::generator::context::{field_ref, GenerationContext, Javadoc, MAP_LOCALS};
use crate::generator::equality::{Differs, FieldKind};
use crate::generator::traits::Features;
use crate::model::{DefaultSource, Property, PropertyDeclaration, TypeRef};
use crate::source::SourceWriter;

/// A scalar property that never needs to be set explicitly.
#[derive(Debug, Clone, PartialEq)]
pub struct DefaultValueProperty {
    property: Property,
    source: DefaultSource,
}

impl DefaultValueProperty {
    /// Accepts resolved scalar types declaring a default.
    pub fn create(declaration: &PropertyDeclaration, _features: &Features) -> Option<Self> {
        let source = declaration.default.clone()?;
        let ty = &declaration.property.declared_type;
        if matches!(ty, TypeRef::Void | TypeRef::Wildcard(_)) || !ty.is_resolved() {
            return None;
        }
        Some(Self {
            property: declaration.property.clone(),
            source,
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
        let Some(defaults) = defaults else {
            code.add_line("{}({});", &[&setter, &getter]);
            return;
        };
        let default_value = format!("{}.{}()", defaults, self.property.builder_getter_name());
        code.add_line(
            "if ({}) {",
            &[&Differs {
                kind: self.field_kind(),
                lhs: getter,
                rhs: &default_value,
                features: ctx.features,
            }],
        );
        code.add_line("{}({});", &[&setter, &getter]);
        code.add_line("}", &[]);
    }
}

impl PropertyCodeGenerator for DefaultValueProperty {
    fn property(&self) -> &Property {
        &self.property
    }

    fn category(&self) -> Category {
        Category::HasDefault
    }

    fn field_kind(&self) -> FieldKind {
        FieldKind::of(&self.property.declared_type, false)
    }

    fn add_builder_field_declaration(&self, code: &mut SourceWriter, _ctx: &GenerationContext<'_>) {
        let property = &self.property;
        match &self.source {
            DefaultSource::Constructor => {
                code.add_line("private {} {};", &[&property.declared_type, &property.name]);
            }
            DefaultSource::Initializer(expression) => {
                code.add_line(
                    "private {} {} = {};",
                    &[&property.declared_type, &property.name, expression],
                );
            }
        }
    }

    fn add_builder_field_accessors(&self, code: &mut SourceWriter, ctx: &GenerationContext<'_>) {
        let property = &self.property;

        add_checked_setter(code, ctx, property, |_| {});

        if ctx.features.has_lambdas() {
            code.add_line("", &[]);
            add_map_method(code, ctx, self, &field_ref(&property.name, MAP_LOCALS), false);
        }

        code.add_line("", &[]);
        ctx.add_javadoc(
            code,
            Javadoc::new().line(
                "Returns the value that will be returned by {}.",
                &[&ctx.getter_link(property)],
            ),
        );
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
        let name = &self.property.name;
        match &self.source {
            DefaultSource::Initializer(expression) => {
                code.add_line("{} = {};", &[name, expression]);
            }
            DefaultSource::Constructor => {
                let zero = self
                    .property
                    .declared_type
                    .as_primitive()
                    .map_or("null", |p| p.zero_value());
                code.add_line("{} = {};", &[name, &zero]);
            }
        }
    }
}
