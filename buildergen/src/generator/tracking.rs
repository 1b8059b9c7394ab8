//! Required-property tracking.
//!
//! Every REQUIRED property gets a constant in a private enum nested in the
//! generated builder. The builder keeps an `EnumSet` of the constants whose
//! property has not been set yet; `build()` refuses to run while it is
//! non-empty.

use super::context::{java_lang, java_util, preconditions};
use super::strategy::Category;
use super::traits::Features;
use crate::error::{GeneratorError, GeneratorResult};
use crate::model::{Datatype, Property, QualifiedName};
use crate::source::{Emit, SourceWriter, StringLiteral};

/// Name of the builder field holding unset properties.
pub const UNSET_PROPERTIES: &str = "_unsetProperties";

/// One REQUIRED property and its enum constant.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct TrackedProperty {
    /// Position in the enum
    pub ordinal: usize,
    /// Property name, also the constant's `toString()`
    pub property_name: String,
    /// Enum constant name
    pub constant: String,
}

/// Shape of the tracking enum, computed once per generated type.
#[derive(Debug, Clone, Default, PartialEq)]
pub struct RequiredTracking {
    enum_type: Option<QualifiedName>,
    properties: Vec<TrackedProperty>,
}

impl RequiredTracking {
    /// Tracking for a type with no REQUIRED properties.
    pub fn empty() -> Self {
        Self::default()
    }

    /// Collect the REQUIRED properties in declaration order.
    pub fn new<'a, I>(datatype: &Datatype, categorized: I) -> GeneratorResult<Self>
    where
        I: IntoIterator<Item = (&'a Property, Category)>,
    {
        let properties: Vec<TrackedProperty> = categorized
            .into_iter()
            .filter(|(_, category)| *category == Category::Required)
            .enumerate()
            .map(|(ordinal, (property, _))| TrackedProperty {
                ordinal,
                property_name: property.name.clone(),
                constant: property.all_caps_name.clone(),
            })
            .collect();
        if properties.is_empty() {
            return Ok(Self::empty());
        }
        let Some(enum_type) = datatype.property_enum.clone() else {
            return Err(GeneratorError::invalid_metadata(
                datatype.source_type.name.to_string(),
                format!(
                    "required property '{}' needs a property enum",
                    properties[0].property_name
                ),
            ));
        };
        for (i, tracked) in properties.iter().enumerate() {
            if properties[..i].iter().any(|p| p.constant == tracked.constant) {
                return Err(GeneratorError::invalid_metadata(
                    datatype.source_type.name.to_string(),
                    format!("duplicate property constant '{}'", tracked.constant),
                ));
            }
        }
        Ok(Self {
            enum_type: Some(enum_type),
            properties,
        })
    }

    /// Whether no property is tracked.
    pub fn is_empty(&self) -> bool {
        self.properties.is_empty()
    }

    /// Tracked properties in ordinal order.
    pub fn properties(&self) -> &[TrackedProperty] {
        &self.properties
    }

    /// The enum constant for a property, if it is tracked.
    pub fn constant(&self, property_name: &str) -> Option<EnumConstant<'_>> {
        let enum_type = self.enum_type.as_ref()?;
        self.properties
            .iter()
            .find(|p| p.property_name == property_name)
            .map(|p| EnumConstant {
                enum_type,
                constant: &p.constant,
            })
    }

    /// Declare the private enum.
    pub fn add_enum_declaration(&self, code: &mut SourceWriter) {
        let Some(enum_type) = &self.enum_type else {
            return;
        };
        code.add_line("private enum {} {", &[&enum_type.simple_name()]);
        for tracked in &self.properties {
            code.add_line(
                "{}({}),",
                &[&tracked.constant, &StringLiteral(&tracked.property_name)],
            );
        }
        code.add_line(";", &[]);
        code.add_line("", &[]);
        code.add_line("private final {} name;", &[&java_lang("String")]);
        code.add_line("", &[]);
        code.add_line(
            "private {}({} name) {",
            &[&enum_type.simple_name(), &java_lang("String")],
        );
        code.add_line("this.name = name;", &[]);
        code.add_line("}", &[]);
        code.add_line("", &[]);
        code.add_line("@Override", &[]);
        code.add_line("public {} toString() {", &[&java_lang("String")]);
        code.add_line("return name;", &[]);
        code.add_line("}", &[]);
        code.add_line("}", &[]);
    }

    /// Declare the builder's unset set, initially holding every constant.
    pub fn add_unset_field(&self, code: &mut SourceWriter) {
        let Some(enum_type) = &self.enum_type else {
            return;
        };
        let enum_set = java_util("EnumSet");
        code.add_line(
            "private final {}<{}> {} =",
            &[&enum_set, enum_type, &UNSET_PROPERTIES],
        );
        code.add_line("    {}.allOf({}.class);", &[&enum_set, enum_type]);
    }

    /// Declare the partial's copy of the unset set.
    pub fn add_partial_unset_field(&self, code: &mut SourceWriter) {
        if let Some(enum_type) = &self.enum_type {
            code.add_line(
                "private final {}<{}> {};",
                &[&java_util("EnumSet"), enum_type, &UNSET_PROPERTIES],
            );
        }
    }

    /// Reset the unset set in `clear()`, from a template builder or to every constant.
    pub fn add_restore_unset(&self, code: &mut SourceWriter, template: Option<&str>) {
        let Some(enum_type) = &self.enum_type else {
            return;
        };
        if self.is_empty() {
            return;
        }
        code.add_line("{}.clear();", &[&UNSET_PROPERTIES]);
        match template {
            Some(template) => {
                code.add_line(
                    "{}.addAll({}.{});",
                    &[&UNSET_PROPERTIES, &template, &UNSET_PROPERTIES],
                );
            }
            None => {
                code.add_line(
                    "{}.addAll({}.allOf({}.class));",
                    &[&UNSET_PROPERTIES, &java_util("EnumSet"), enum_type],
                );
            }
        }
    }

    /// Copy the builder's unset set into a partial.
    pub fn add_partial_unset_assignment(&self, code: &mut SourceWriter, builder: &str) {
        if !self.is_empty() {
            code.add_line(
                "this.{} = {}.{}.clone();",
                &[&UNSET_PROPERTIES, &builder, &UNSET_PROPERTIES],
            );
        }
    }

    /// Guard in `build()` listing every unset property.
    pub fn add_build_check(&self, code: &mut SourceWriter, features: &Features) {
        if self.is_empty() {
            return;
        }
        if features.guava {
            code.add_line(
                "{}.checkState({}.isEmpty(), \"Not set: %s\", {});",
                &[&preconditions(), &UNSET_PROPERTIES, &UNSET_PROPERTIES],
            );
        } else {
            code.add_line("if (!{}.isEmpty()) {", &[&UNSET_PROPERTIES]);
            code.add_line(
                "throw new {}(\"Not set: \" + {});",
                &[&java_lang("IllegalStateException"), &UNSET_PROPERTIES],
            );
            code.add_line("}", &[]);
        }
    }

    /// Guard in a builder getter: the property must have been set.
    pub fn add_require_set(
        &self,
        code: &mut SourceWriter,
        features: &Features,
        property: &Property,
    ) {
        let Some(constant) = self.constant(&property.name) else {
            return;
        };
        let message_text = format!("{} not set", property.name);
        let message = StringLiteral(&message_text);
        if features.guava {
            code.add_line("{}.checkState(", &[&preconditions()]);
            code.add_line(
                "    !{}.contains({}), {});",
                &[&UNSET_PROPERTIES, &constant, &message],
            );
        } else {
            code.add_line("if ({}.contains({})) {", &[&UNSET_PROPERTIES, &constant]);
            code.add_line(
                "throw new {}({});",
                &[&java_lang("IllegalStateException"), &message],
            );
            code.add_line("}", &[]);
        }
    }

    /// Guard in a partial getter: unset properties cannot be read.
    pub fn add_partial_require_set(&self, code: &mut SourceWriter, property: &Property) {
        let Some(constant) = self.constant(&property.name) else {
            return;
        };
        code.add_line("if ({}.contains({})) {", &[&UNSET_PROPERTIES, &constant]);
        code.add_line(
            "throw new {}({});",
            &[
                &java_lang("UnsupportedOperationException"),
                &StringLiteral(&format!("{} not set", property.name)),
            ],
        );
        code.add_line("}", &[]);
    }
}

/// `Person_Builder.Property.NAME`
#[derive(Debug, Clone, Copy)]
pub struct EnumConstant<'a> {
    enum_type: &'a QualifiedName,
    constant: &'a str,
}

impl Emit for EnumConstant<'_> {
    fn emit(&self, code: &mut SourceWriter) {
        code.add("{}.{}", &[self.enum_type, &self.constant]);
    }
}
