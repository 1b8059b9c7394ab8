//! Properties that must be set before `build()`.

use super::{add_checked_setter, add_map_method, Category, PropertyCodeGenerator};
use crate::generator::context::{GenerationContext, Javadoc, BASE};
use crate::generator::equality::{Differs, FieldKind};
use crate::generator::tracking::UNSET_PROPERTIES;
use crate::generator::traits::Features;
use crate::model::{Property, PropertyDeclaration, TypeRef};
use crate::source::SourceWriter;

/// A plain property with no default; the fallback strategy.
#[derive(Debug, Clone, PartialEq)]
pub struct RequiredProperty {
    property: Property,
}

impl RequiredProperty {
    /// Accepts any resolved, non-void type.
    pub fn create(declaration: &PropertyDeclaration, _features: &Features) -> Option<Self> {
        let ty = &declaration.property.declared_type;
        if matches!(ty, TypeRef::Void | TypeRef::Wildcard(_)) || !ty.is_resolved() {
            return None;
        }
        Some(Self {
            property: declaration.property.clone(),
        })
    }
}

impl PropertyCodeGenerator for RequiredProperty {
    fn property(&self) -> &Property {
        &self.property
    }

    fn category(&self) -> Category {
        Category::Required
    }

    fn field_kind(&self) -> FieldKind {
        FieldKind::of(&self.property.declared_type, false)
    }

    fn add_builder_field_declaration(&self, code: &mut SourceWriter, _ctx: &GenerationContext<'_>) {
        code.add_line(
            "private {} {};",
            &[&self.property.declared_type, &self.property.name],
        );
    }

    fn add_builder_field_accessors(&self, code: &mut SourceWriter, ctx: &GenerationContext<'_>) {
        let property = &self.property;

        add_checked_setter(code, ctx, property, |code| {
            if let Some(constant) = ctx.tracking.constant(&property.name) {
                code.add_line("{}.remove({});", &[&UNSET_PROPERTIES, &constant]);
            }
        });

        if ctx.features.has_lambdas() {
            code.add_line("", &[]);
            let current = format!("{}()", property.builder_getter_name());
            add_map_method(code, ctx, self, &current, true);
        }

        code.add_line("", &[]);
        ctx.add_javadoc(
            code,
            Javadoc::new()
                .line(
                    "Returns the value that will be returned by {}.",
                    &[&ctx.getter_link(property)],
                )
                .blank()
                .line("@throws IllegalStateException if the field has not been set", &[]),
        );
        code.add_line(
            "public {} {}() {",
            &[&property.declared_type, &property.builder_getter_name()],
        );
        ctx.tracking.add_require_set(code, &ctx.features, property);
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
        let property = &self.property;
        let getter = format!("{}.{}()", value, property.getter_name);
        let constant = ctx.tracking.constant(&property.name);
        match (defaults, constant) {
            (Some(defaults), Some(constant)) => {
                let default_value = format!("{}.{}()", defaults, property.builder_getter_name());
                code.add_line(
                    "if ({}.{}.contains({})",
                    &[&defaults, &UNSET_PROPERTIES, &constant],
                );
                code.add_line(
                    "    || {}) {",
                    &[&Differs {
                        kind: self.field_kind(),
                        lhs: &getter,
                        rhs: &default_value,
                        features: ctx.features,
                    }],
                );
                code.add_line("{}({});", &[&property.setter_name(), &getter]);
                code.add_line("}", &[]);
            }
            _ => {
                code.add_line("{}({});", &[&property.setter_name(), &getter]);
            }
        }
    }

    fn add_merge_from_builder(
        &self,
        code: &mut SourceWriter,
        ctx: &GenerationContext<'_>,
        builder: &str,
        defaults: Option<&str>,
    ) {
        let property = &self.property;
        let getter = format!("{}.{}()", builder, property.builder_getter_name());
        let Some(constant) = ctx.tracking.constant(&property.name) else {
            code.add_line("{}({});", &[&property.setter_name(), &getter]);
            return;
        };
        match defaults {
            Some(defaults) => {
                let default_value = format!("{}.{}()", defaults, property.builder_getter_name());
                code.add_line(
                    "if (!{}.{}.contains({})",
                    &[&BASE, &UNSET_PROPERTIES, &constant],
                );
                code.add_line(
                    "    && ({}.{}.contains({})",
                    &[&defaults, &UNSET_PROPERTIES, &constant],
                );
                code.add_line(
                    "        || {})) {",
                    &[&Differs {
                        kind: self.field_kind(),
                        lhs: &getter,
                        rhs: &default_value,
                        features: ctx.features,
                    }],
                );
            }
            None => {
                code.add_line(
                    "if (!{}.{}.contains({})) {",
                    &[&BASE, &UNSET_PROPERTIES, &constant],
                );
            }
        }
        code.add_line("{}({});", &[&property.setter_name(), &getter]);
        code.add_line("}", &[]);
    }

    fn is_template_required_in_clear(&self) -> bool {
        true
    }

    fn add_clear(&self, code: &mut SourceWriter, _ctx: &GenerationContext<'_>, template: &str) {
        let name = &self.property.name;
        code.add_line("{} = {}.{};", &[name, &template, name]);
    }

    fn add_partial_clear(&self, code: &mut SourceWriter, _ctx: &GenerationContext<'_>) {
        let zero = self
            .property
            .declared_type
            .as_primitive()
            .map_or("null", |p| p.zero_value());
        code.add_line("{} = {};", &[&self.property.name, &zero]);
    }
}
