//! Strategy selection.
//!
//! Each property is offered to an ordered list of factories; the first one
//! that accepts it decides how the property is generated. The fallback,
//! [`PropertyFactory::Required`], accepts every resolved non-void type, so a
//! property nobody accepts is an error rather than a silent skip.

use std::collections::HashSet;

use tracing::{debug, trace};

use super::strategy::{
    BuildableProperty, CollectionProperty, DefaultValueProperty, MapProperty, MultisetProperty,
    NullableProperty, OptionalProperty, RequiredProperty, Strategy,
};
use super::traits::Features;
use crate::error::{GeneratorError, GeneratorResult};
use crate::model::PropertyDeclaration;

/// A matcher that may claim a property.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum PropertyFactory {
    Nullable,
    Collection,
    Map,
    Multiset,
    Optional,
    Buildable,
    DefaultValue,
    Required,
}

impl PropertyFactory {
    /// Every factory, in selection order.
    pub const ALL: [PropertyFactory; 8] = [
        PropertyFactory::Nullable,
        PropertyFactory::Collection,
        PropertyFactory::Map,
        PropertyFactory::Multiset,
        PropertyFactory::Optional,
        PropertyFactory::Buildable,
        PropertyFactory::DefaultValue,
        PropertyFactory::Required,
    ];

    /// Name used in logs.
    pub fn name(self) -> &'static str {
        match self {
            PropertyFactory::Nullable => "nullable",
            PropertyFactory::Collection => "collection",
            PropertyFactory::Map => "map",
            PropertyFactory::Multiset => "multiset",
            PropertyFactory::Optional => "optional",
            PropertyFactory::Buildable => "buildable",
            PropertyFactory::DefaultValue => "default",
            PropertyFactory::Required => "required",
        }
    }

    /// Build a strategy if this factory accepts the property.
    pub fn create(self, declaration: &PropertyDeclaration, features: &Features) -> Option<Strategy> {
        match self {
            PropertyFactory::Nullable => {
                NullableProperty::create(declaration, features).map(Strategy::Nullable)
            }
            PropertyFactory::Collection => {
                CollectionProperty::create(declaration, features).map(Strategy::Collection)
            }
            PropertyFactory::Map => MapProperty::create(declaration, features).map(Strategy::Map),
            PropertyFactory::Multiset => {
                MultisetProperty::create(declaration, features).map(Strategy::Multiset)
            }
            PropertyFactory::Optional => {
                OptionalProperty::create(declaration, features).map(Strategy::Optional)
            }
            PropertyFactory::Buildable => {
                BuildableProperty::create(declaration, features).map(Strategy::Buildable)
            }
            PropertyFactory::DefaultValue => {
                DefaultValueProperty::create(declaration, features).map(Strategy::DefaultValue)
            }
            PropertyFactory::Required => {
                RequiredProperty::create(declaration, features).map(Strategy::Required)
            }
        }
    }
}

/// Ordered factories; the first acceptor wins.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct SelectionChain {
    factories: Vec<PropertyFactory>,
}

impl Default for SelectionChain {
    fn default() -> Self {
        Self {
            factories: PropertyFactory::ALL.to_vec(),
        }
    }
}

impl SelectionChain {
    /// A chain trying `factories` in the given order.
    pub fn new(factories: impl IntoIterator<Item = PropertyFactory>) -> Self {
        Self {
            factories: factories.into_iter().collect(),
        }
    }

    /// The factories, in order.
    pub fn factories(&self) -> &[PropertyFactory] {
        &self.factories
    }

    /// Bind one property to its strategy.
    pub fn select(
        &self,
        declaration: &PropertyDeclaration,
        features: &Features,
    ) -> GeneratorResult<Strategy> {
        let property = &declaration.property;
        for factory in &self.factories {
            match factory.create(declaration, features) {
                Some(strategy) => {
                    debug!(
                        property = %property.name,
                        declared_type = %property.declared_type,
                        factory = factory.name(),
                        "Selected property strategy"
                    );
                    return Ok(strategy);
                }
                None => {
                    trace!(property = %property.name, factory = factory.name(), "Factory declined");
                }
            }
        }
        Err(GeneratorError::UnresolvedProperty {
            property: property.name.clone(),
            declared_type: property.declared_type.to_string(),
        })
    }

    /// Bind every property, in declaration order.
    ///
    /// Properties are validated first; duplicate names are rejected.
    pub fn bind(
        &self,
        declarations: &[PropertyDeclaration],
        features: &Features,
    ) -> GeneratorResult<Vec<Strategy>> {
        let mut seen = HashSet::new();
        let mut strategies = Vec::with_capacity(declarations.len());
        for declaration in declarations {
            let property = &declaration.property;
            property.validate()?;
            if !seen.insert(property.name.as_str()) {
                return Err(GeneratorError::invalid_property(
                    &property.name,
                    "duplicate property name",
                ));
            }
            strategies.push(self.select(declaration, features)?);
        }
        Ok(strategies)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generator::strategy::Category;
    use crate::generator::traits::SourceLevel;
    use crate::model::{Annotation, BuildableType, DefaultSource, Property, QualifiedName, TypeRef};
    use proptest::prelude::{any, prop, prop_assert, prop_assert_eq, proptest};
    use proptest::strategy::Strategy as _;

    fn declaration(name: &str, ty: &str) -> PropertyDeclaration {
        PropertyDeclaration::new(Property::new(name, TypeRef::parse(ty)))
    }

    fn nullable() -> Annotation {
        Annotation::new(QualifiedName::new("javax.annotation", "Nullable"))
    }

    fn selected(declaration: &PropertyDeclaration, features: Features) -> &'static str {
        SelectionChain::default()
            .select(declaration, &features)
            .unwrap()
            .name()
    }

    #[test]
    fn test_selection_by_shape() {
        let guava = Features::new(SourceLevel::Java8, true);
        let cases = [
            (declaration("name", "java.lang.String"), "required"),
            (declaration("age", "int"), "required"),
            (declaration("age", "java.lang.Integer").with_annotation(nullable()), "nullable"),
            (declaration("tags", "java.util.List<java.lang.String>"), "collection"),
            (declaration("ids", "java.util.Set<java.lang.Long>"), "collection"),
            (declaration("scores", "java.util.Map<java.lang.String, java.lang.Integer>"), "map"),
            (declaration("words", "com.google.common.collect.Multiset<java.lang.String>"), "multiset"),
            (declaration("nick", "java.util.Optional<java.lang.String>"), "optional"),
            (declaration("nick", "com.google.common.base.Optional<java.lang.String>"), "optional"),
            (
                declaration("address", "com.example.Address")
                    .with_buildable(BuildableType::new(TypeRef::parse("com.example.Address.Builder"))),
                "buildable",
            ),
            (
                declaration("retries", "int").with_default(DefaultSource::Initializer("3".into())),
                "default",
            ),
        ];
        for (declaration, expected) in cases {
            assert_eq!(selected(&declaration, guava), expected, "{}", declaration.property.name);
        }
    }

    #[test]
    fn test_nullable_wins_over_collection() {
        let declaration =
            declaration("tags", "java.util.List<java.lang.String>").with_annotation(nullable());
        assert_eq!(selected(&declaration, Features::default()), "nullable");
    }

    #[test]
    fn test_unavailable_library_falls_back_to_required() {
        let java7 = Features::new(SourceLevel::Java7, false);
        assert_eq!(
            selected(&declaration("nick", "java.util.Optional<java.lang.String>"), java7),
            "required"
        );
        assert_eq!(
            selected(&declaration("words", "com.google.common.collect.Multiset<java.lang.String>"), java7),
            "required"
        );
    }

    #[test]
    fn test_unresolved_type_is_an_error() {
        let err = SelectionChain::default()
            .select(&declaration("broken", "Missing<"), &Features::default())
            .unwrap_err();
        assert_eq!(
            err,
            GeneratorError::UnresolvedProperty {
                property: "broken".to_string(),
                declared_type: "Missing<".to_string(),
            }
        );
        assert!(err.to_string().contains("'broken'"));
    }

    #[test]
    fn test_void_is_an_error() {
        let result = SelectionChain::default().select(&declaration("nothing", "void"), &Features::default());
        assert!(matches!(result, Err(GeneratorError::UnresolvedProperty { .. })));
    }

    #[test]
    fn test_bind_keeps_declaration_order() {
        let declarations = vec![
            declaration("name", "java.lang.String"),
            declaration("age", "java.lang.Integer").with_annotation(nullable()),
            declaration("tags", "java.util.List<java.lang.String>"),
        ];
        let strategies = SelectionChain::default()
            .bind(&declarations, &Features::default())
            .unwrap();
        let bound: Vec<_> = strategies
            .iter()
            .map(|s| (s.property().name.as_str(), s.category()))
            .collect();
        assert_eq!(
            bound,
            vec![
                ("name", Category::Required),
                ("age", Category::Optional),
                ("tags", Category::HasDefault),
            ]
        );
    }

    #[test]
    fn test_bind_rejects_duplicates_and_invalid_properties() {
        let declarations = vec![
            declaration("name", "java.lang.String"),
            declaration("name", "java.lang.Integer"),
        ];
        let err = SelectionChain::default()
            .bind(&declarations, &Features::default())
            .unwrap_err();
        assert!(err.to_string().contains("duplicate property name"));

        let mut property = Property::new("name", TypeRef::parse("java.lang.String"));
        property.all_caps_name = "WRONG".to_string();
        let err = SelectionChain::default()
            .bind(&[PropertyDeclaration::new(property)], &Features::default())
            .unwrap_err();
        assert!(matches!(err, GeneratorError::InvalidProperty { .. }));
    }

    #[test]
    fn test_custom_chain_order() {
        let chain = SelectionChain::new([PropertyFactory::Required, PropertyFactory::Collection]);
        let declaration = declaration("tags", "java.util.List<java.lang.String>");
        assert_eq!(chain.select(&declaration, &Features::default()).unwrap().name(), "required");
        assert_eq!(chain.factories().len(), 2);
    }

    // ==========================================================================
    // Property Tests
    // ==========================================================================

    fn arb_declaration() -> impl proptest::strategy::Strategy<Value = PropertyDeclaration> {
        let types = prop::sample::select(vec![
            "int",
            "boolean",
            "java.lang.String",
            "java.util.List<java.lang.String>",
            "java.util.Set<T>",
            "java.util.Map<K, V>",
            "java.util.Optional<java.lang.Integer>",
            "com.google.common.base.Optional<java.lang.Integer>",
            "com.google.common.collect.Multiset<java.lang.String>",
            "com.example.Address",
        ]);
        (types, any::<bool>(), any::<bool>()).prop_map(|(ty, nullable_marker, with_default)| {
            let mut declaration = declaration("value", ty);
            if nullable_marker {
                declaration = declaration.with_annotation(nullable());
            }
            if with_default {
                declaration = declaration.with_default(DefaultSource::Constructor);
            }
            declaration
        })
    }

    fn arb_features() -> impl proptest::strategy::Strategy<Value = Features> {
        (
            prop::sample::select(vec![SourceLevel::Java6, SourceLevel::Java7, SourceLevel::Java8]),
            any::<bool>(),
        )
            .prop_map(|(level, guava)| Features::new(level, guava))
    }

    proptest! {
        /// The same declaration always binds to the same strategy.
        #[test]
        fn prop_selection_is_deterministic(
            declaration in arb_declaration(),
            features in arb_features(),
        ) {
            let chain = SelectionChain::default();
            let first = chain.select(&declaration, &features).unwrap();
            let second = chain.select(&declaration.clone(), &features).unwrap();
            prop_assert_eq!(first, second);
        }

        /// Every resolved declaration is accepted by some factory.
        #[test]
        fn prop_resolved_types_always_bind(
            declaration in arb_declaration(),
            features in arb_features(),
        ) {
            prop_assert!(SelectionChain::default().select(&declaration, &features).is_ok());
        }
    }
}
