//! Property model.
//!
//! A [`Property`] is one abstract accessor of the source type. All of its
//! name forms are derived from a single identifier so that the builder
//! methods, the tracking enum constant and the fields always agree.

use convert_case::{Boundary, Case, Casing};
use serde::{Deserialize, Serialize};

use super::annotation::Annotation;
use super::types::{Primitive, TypeRef};
use crate::error::{GeneratorError, GeneratorResult};

/// A single property of the source type.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(try_from = "PropertySource", rename_all = "camelCase")]
pub struct Property {
    /// Field name (`firstName`)
    pub name: String,

    /// Name with its first character upper-cased (`FirstName`)
    pub capitalized_name: String,

    /// Enum constant form (`FIRST_NAME`)
    pub all_caps_name: String,

    /// Accessor declared on the source type (`getFirstName`)
    pub getter_name: String,

    /// Declared return type of the accessor
    #[serde(rename = "type")]
    pub declared_type: TypeRef,

    /// Wrapper type when the declared type is primitive
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub boxed_type: Option<TypeRef>,

    /// Whether a cast from `Object` to the declared type is fully checked
    pub fully_checked_cast: bool,

    /// Whether the accessor follows the `getX`/`isX` convention
    pub using_bean_convention: bool,
}

/// The fields a host adapter supplies; everything else is derived.
#[derive(Debug, Clone, Deserialize)]
#[serde(rename_all = "camelCase")]
struct PropertySource {
    name: String,
    #[serde(rename = "type")]
    declared_type: TypeRef,
    #[serde(default)]
    getter_name: Option<String>,
    #[serde(default = "default_bean_convention")]
    using_bean_convention: bool,
}

fn default_bean_convention() -> bool {
    true
}

impl TryFrom<PropertySource> for Property {
    type Error = GeneratorError;

    fn try_from(source: PropertySource) -> Result<Self, Self::Error> {
        let mut property = Property::new(source.name, source.declared_type)
            .with_bean_convention(source.using_bean_convention);
        if let Some(getter) = source.getter_name {
            property = property.with_getter_name(getter);
        }
        property.validate()?;
        Ok(property)
    }
}

impl Property {
    /// Derive every name form from the field identifier.
    pub fn new(name: impl Into<String>, declared_type: TypeRef) -> Self {
        let name = name.into();
        let capitalized_name = capitalize(&name);
        let all_caps_name = constant_name(&name);
        let getter_name = bean_getter(&capitalized_name, &declared_type);
        let boxed_type = declared_type
            .is_primitive()
            .then(|| declared_type.boxed());
        let fully_checked_cast = is_fully_checked(&declared_type);
        Self {
            name,
            capitalized_name,
            all_caps_name,
            getter_name,
            declared_type,
            boxed_type,
            fully_checked_cast,
            using_bean_convention: true,
        }
    }

    /// Switch between `getName()` and plain `name()` accessors.
    pub fn with_bean_convention(mut self, using_bean_convention: bool) -> Self {
        self.using_bean_convention = using_bean_convention;
        self.getter_name = if using_bean_convention {
            bean_getter(&self.capitalized_name, &self.declared_type)
        } else {
            self.name.clone()
        };
        self
    }

    /// Override the accessor name declared on the source type.
    pub fn with_getter_name(mut self, getter_name: impl Into<String>) -> Self {
        self.getter_name = getter_name.into();
        self
    }

    /// Check that the name forms are consistent with each other.
    pub fn validate(&self) -> GeneratorResult<()> {
        if !is_java_identifier(&self.name) {
            return Err(GeneratorError::invalid_property(
                &self.name,
                "name is not a Java identifier",
            ));
        }
        if self.capitalized_name != capitalize(&self.name) {
            return Err(GeneratorError::invalid_property(
                &self.name,
                format!("capitalized name '{}' does not match", self.capitalized_name),
            ));
        }
        if self.all_caps_name != constant_name(&self.name) {
            return Err(GeneratorError::invalid_property(
                &self.name,
                format!("constant name '{}' does not match", self.all_caps_name),
            ));
        }
        if !is_java_identifier(&self.getter_name) {
            return Err(GeneratorError::invalid_property(
                &self.name,
                "getter name must be a non-empty identifier",
            ));
        }
        let expected_boxed = self
            .declared_type
            .is_primitive()
            .then(|| self.declared_type.boxed());
        if self.boxed_type != expected_boxed {
            return Err(GeneratorError::invalid_property(
                &self.name,
                "boxed type does not match the declared type",
            ));
        }
        Ok(())
    }

    /// The declared type, boxed if primitive.
    pub fn boxed_or_declared(&self) -> &TypeRef {
        self.boxed_type.as_ref().unwrap_or(&self.declared_type)
    }

    /// Builder method name with the given prefix (`setName`, `addAllName`).
    pub fn method(&self, prefix: &str) -> String {
        format!("{}{}", prefix, self.capitalized_name)
    }

    /// Builder setter name.
    pub fn setter_name(&self) -> String {
        self.method("set")
    }

    /// Builder getter name; always uses the `get` prefix.
    pub fn builder_getter_name(&self) -> String {
        self.method("get")
    }
}

/// Properties of the source type paired with what the host knows about them.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct PropertyDeclaration {
    /// The property itself
    #[serde(flatten)]
    pub property: Property,

    /// Annotations present on the accessor
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub annotations: Vec<Annotation>,

    /// Set when the property type has its own generated builder
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub buildable: Option<BuildableType>,

    /// Set when the user builder supplies a default value
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub default: Option<DefaultSource>,
}

impl PropertyDeclaration {
    /// Create a declaration with no annotations.
    pub fn new(property: Property) -> Self {
        Self {
            property,
            annotations: Vec::new(),
            buildable: None,
            default: None,
        }
    }

    /// Add an annotation.
    pub fn with_annotation(mut self, annotation: Annotation) -> Self {
        self.annotations.push(annotation);
        self
    }

    /// Mark the property type as buildable.
    pub fn with_buildable(mut self, buildable: BuildableType) -> Self {
        self.buildable = Some(buildable);
        self
    }

    /// Record a builder-supplied default.
    pub fn with_default(mut self, default: DefaultSource) -> Self {
        self.default = Some(default);
        self
    }

    /// Annotations recognised as nullable markers.
    pub fn nullable_annotations(&self) -> Vec<&Annotation> {
        self.annotations.iter().filter(|a| a.is_nullable()).collect()
    }
}

/// A property type that exposes its own generated builder.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase", deny_unknown_fields)]
pub struct BuildableType {
    /// The nested builder type (`Address.Builder`)
    pub builder_type: TypeRef,

    /// How to obtain a fresh nested builder
    #[serde(default)]
    pub builder_factory: super::datatype::BuilderFactory,

    /// Whether the nested builder has `buildPartial()`
    #[serde(default)]
    pub supports_partial: bool,
}

impl BuildableType {
    /// Create a buildable type created through a no-args constructor.
    pub fn new(builder_type: TypeRef) -> Self {
        Self {
            builder_type,
            builder_factory: super::datatype::BuilderFactory::NoArgsConstructor,
            supports_partial: false,
        }
    }

    /// Set the builder factory.
    pub fn with_builder_factory(mut self, factory: super::datatype::BuilderFactory) -> Self {
        self.builder_factory = factory;
        self
    }

    /// Mark the nested builder as having `buildPartial()`.
    pub fn with_partial_support(mut self) -> Self {
        self.supports_partial = true;
        self
    }
}

/// Where a builder-supplied default comes from.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(tag = "kind", content = "expression", rename_all = "snake_case")]
pub enum DefaultSource {
    /// Set by the user builder's constructor.
    Constructor,
    /// Java expression used as the field initializer.
    Initializer(String),
}

/// A new word starts at an upper-case letter; digits stay with their word.
const CAMEL_WORDS: [Boundary; 3] = [Boundary::LowerUpper, Boundary::DigitUpper, Boundary::Acronym];

/// `lineItem2` becomes `LINE_ITEM2`.
fn constant_name(name: &str) -> String {
    name.from_case(Case::Camel)
        .set_boundaries(&CAMEL_WORDS)
        .to_case(Case::UpperSnake)
}

fn capitalize(name: &str) -> String {
    let mut chars = name.chars();
    match chars.next() {
        Some(first) => first.to_uppercase().chain(chars).collect(),
        None => String::new(),
    }
}

fn bean_getter(capitalized_name: &str, declared_type: &TypeRef) -> String {
    let prefix = if declared_type.as_primitive() == Some(Primitive::Boolean) {
        "is"
    } else {
        "get"
    };
    format!("{}{}", prefix, capitalized_name)
}

fn is_fully_checked(ty: &TypeRef) -> bool {
    match ty {
        TypeRef::Primitive(_) => true,
        TypeRef::Declared { args, .. } => args.iter().all(|a| *a == TypeRef::Wildcard(None)),
        TypeRef::Array(component) => is_fully_checked(component),
        _ => false,
    }
}

fn is_java_identifier(text: &str) -> bool {
    let mut chars = text.chars();
    match chars.next() {
        Some(c) if c.is_alphabetic() || c == '_' || c == '$' => {}
        _ => return false,
    }
    chars.all(|c| c.is_alphanumeric() || c == '_' || c == '$')
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::model::types::QualifiedName;

    fn string() -> TypeRef {
        TypeRef::declared(QualifiedName::new("java.lang", "String"))
    }

    #[test]
    fn test_name_forms() {
        let property = Property::new("firstName", string());
        assert_eq!(property.capitalized_name, "FirstName");
        assert_eq!(property.all_caps_name, "FIRST_NAME");
        assert_eq!(property.getter_name, "getFirstName");
        assert_eq!(property.setter_name(), "setFirstName");
        assert_eq!(property.method("addAll"), "addAllFirstName");
        assert!(property.boxed_type.is_none());
        assert!(property.fully_checked_cast);
    }

    #[test]
    fn test_constant_name_keeps_digits_in_word() {
        assert_eq!(Property::new("address2", string()).all_caps_name, "ADDRESS2");
        assert_eq!(Property::new("line2Text", string()).all_caps_name, "LINE2_TEXT");
        assert_eq!(Property::new("x", string()).all_caps_name, "X");
        assert!(Property::new("address2", string()).validate().is_ok());
    }

    #[test]
    fn test_boolean_getter_uses_is_prefix() {
        let property = Property::new("active", TypeRef::Primitive(Primitive::Boolean));
        assert_eq!(property.getter_name, "isActive");
        assert_eq!(property.builder_getter_name(), "getActive");
        assert_eq!(
            property.boxed_type,
            Some(TypeRef::declared(QualifiedName::new("java.lang", "Boolean")))
        );
    }

    #[test]
    fn test_plain_accessor_convention() {
        let property = Property::new("name", string()).with_bean_convention(false);
        assert_eq!(property.getter_name, "name");
        assert!(!property.using_bean_convention);
        assert!(property.validate().is_ok());
    }

    #[test]
    fn test_generic_cast_is_unchecked() {
        let property = Property::new("items", TypeRef::parse("java.util.List<T>"));
        assert!(!property.fully_checked_cast);
        let property = Property::new("items", TypeRef::parse("java.util.List<?>"));
        assert!(property.fully_checked_cast);
    }

    #[test]
    fn test_validate_rejects_inconsistent_names() {
        let mut property = Property::new("name", string());
        property.all_caps_name = "NOM".to_string();
        let err = property.validate().unwrap_err();
        assert!(matches!(err, GeneratorError::InvalidProperty { .. }));

        let mut property = Property::new("name", string());
        property.getter_name = String::new();
        assert!(property.validate().is_err());

        let mut property = Property::new("age", TypeRef::Primitive(Primitive::Int));
        property.boxed_type = None;
        assert!(property.validate().is_err());
    }

    #[test]
    fn test_deserialize_derives_name_forms() {
        let json = r#"{"name": "lastName", "type": "java.lang.String"}"#;
        let property: Property = serde_json::from_str(json).unwrap();
        assert_eq!(property, Property::new("lastName", string()));
    }

    #[test]
    fn test_deserialize_plain_getter() {
        let json = r#"{
            "name": "score",
            "type": "float",
            "getterName": "score",
            "usingBeanConvention": false
        }"#;
        let property: Property = serde_json::from_str(json).unwrap();
        assert_eq!(property.getter_name, "score");
        assert!(!property.using_bean_convention);

        let json = r#"{"name": "score", "type": "float", "usingBeanConvention": false}"#;
        let property: Property = serde_json::from_str(json).unwrap();
        assert_eq!(property.getter_name, "score");
    }

    #[test]
    fn test_buildable_type_keys() {
        let json = r#"{"builderType": "com.example.Address.Builder", "supportsPartial": true}"#;
        let buildable: BuildableType = serde_json::from_str(json).unwrap();
        assert!(buildable.supports_partial);

        let json = r#"{"builder_type": "com.example.Address.Builder"}"#;
        assert!(serde_json::from_str::<BuildableType>(json).is_err());
    }

    #[test]
    fn test_deserialize_rejects_bad_identifier() {
        let json = r#"{"name": "last-name", "type": "java.lang.String"}"#;
        assert!(serde_json::from_str::<Property>(json).is_err());
    }

    #[test]
    fn test_declaration_with_default() {
        let json = r#"{
            "name": "retries",
            "type": "int",
            "default": {"kind": "initializer", "expression": "3"}
        }"#;
        let declaration: PropertyDeclaration = serde_json::from_str(json).unwrap();
        assert_eq!(
            declaration.default,
            Some(DefaultSource::Initializer("3".to_string()))
        );
        assert!(declaration.annotations.is_empty());
    }
}
