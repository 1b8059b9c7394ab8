//! Property-based tests for the model.

#[cfg(test)]
mod tests {
    use crate::model::{Primitive, Property, QualifiedName, TypeRef};
    use proptest::collection;
    use proptest::prelude::*;

    // ==========================================================================
    // Strategies
    // ==========================================================================

    fn arb_primitive() -> impl Strategy<Value = Primitive> {
        proptest::sample::select(Primitive::ALL.to_vec())
    }

    fn arb_qualified_name() -> impl Strategy<Value = QualifiedName> {
        (
            "[a-z][a-z0-9]{0,5}(\\.[a-z][a-z0-9]{0,5}){0,2}",
            collection::vec("[A-Z][a-zA-Z0-9]{0,8}", 1..3),
        )
            .prop_map(|(package, simple_names)| {
                let mut name = QualifiedName::new(package, simple_names[0].clone());
                for nested in &simple_names[1..] {
                    name = name.nested(nested.clone());
                }
                name
            })
    }

    /// Types that may appear anywhere, including as type arguments.
    fn arb_type_ref() -> impl Strategy<Value = TypeRef> {
        let leaf = prop_oneof![
            arb_primitive().prop_map(TypeRef::Primitive),
            "[A-Z][A-Z0-9]{0,2}".prop_map(TypeRef::Variable),
            arb_qualified_name().prop_map(TypeRef::declared),
        ];
        leaf.prop_recursive(3, 16, 3, |inner| {
            prop_oneof![
                (arb_qualified_name(), collection::vec(arb_type_arg(inner.clone()), 1..3))
                    .prop_map(|(name, args)| TypeRef::generic(name, args)),
                inner.prop_map(|component| TypeRef::Array(Box::new(component))),
            ]
        })
    }

    fn arb_type_arg(inner: BoxedStrategy<TypeRef>) -> impl Strategy<Value = TypeRef> {
        prop_oneof![
            3 => inner.clone(),
            1 => Just(TypeRef::Wildcard(None)),
            1 => inner.prop_map(TypeRef::extends_wildcard),
        ]
    }

    // ==========================================================================
    // Property Tests
    // ==========================================================================

    proptest! {
        /// Every property derived from an identifier passes validation.
        #[test]
        fn prop_derived_name_forms_are_consistent(
            name in "[a-z][a-zA-Z0-9]{0,15}",
            ty in arb_type_ref(),
            bean in any::<bool>(),
        ) {
            let property = Property::new(name.clone(), ty).with_bean_convention(bean);
            prop_assert!(property.validate().is_ok());
            prop_assert_eq!(&property.capitalized_name[1..], &name[1..]);
            prop_assert!(property.capitalized_name.starts_with(|c: char| c.is_ascii_uppercase()));
            prop_assert!(!property.all_caps_name.chars().any(|c| c.is_lowercase()));
            prop_assert!(!property.getter_name.is_empty());
        }

        /// Rendering a type and parsing it back yields the same type.
        #[test]
        fn prop_type_source_text_roundtrip(ty in arb_type_ref()) {
            let text = ty.to_string();
            prop_assert_eq!(TypeRef::parse(&text), ty);
        }

        /// Descriptors written with serde_json read back unchanged.
        #[test]
        fn prop_property_serialization_roundtrip(
            name in "[a-z][a-zA-Z0-9]{0,15}",
            ty in arb_type_ref(),
        ) {
            let property = Property::new(name, ty);
            let json = serde_json::to_string(&property)
                .expect("Property should serialize to JSON");
            let deserialized: Property = serde_json::from_str(&json)
                .expect("JSON should deserialize back to Property");
            prop_assert_eq!(property, deserialized);
        }
    }
}
