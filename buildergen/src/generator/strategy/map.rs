//! `Map` properties.

use super::{collections, plain_type_arg, Category, PropertyCodeGenerator};
use crate::generator::context::{java_util, GenerationContext, Javadoc};
use crate::generator::equality::FieldKind;
use crate::generator::traits::Features;
use crate::model::{Property, PropertyDeclaration, QualifiedName, TypeRef};
use crate::source::SourceWriter;

/// A `Map<K, V>` built up entry by entry, keeping insertion order.
#[derive(Debug, Clone, PartialEq)]
pub struct MapProperty {
    property: Property,
    key: TypeRef,
    value: TypeRef,
}

impl MapProperty {
    /// Accepts `java.util.Map<K, V>`.
    pub fn create(declaration: &PropertyDeclaration, _features: &Features) -> Option<Self> {
        let ty = &declaration.property.declared_type;
        if !ty.is_class("java.util.Map") {
            return None;
        }
        let [key, value] = ty.type_args() else {
            return None;
        };
        Some(Self {
            property: declaration.property.clone(),
            key: plain_type_arg(key)?.clone(),
            value: plain_type_arg(value)?.clone(),
        })
    }

    fn linked_hash_map(&self) -> TypeRef {
        TypeRef::generic(
            java_util("LinkedHashMap"),
            vec![self.key.clone(), self.value.clone()],
        )
    }

    /// `? extends K, ? extends V`
    fn wildcard_args(&self) -> Vec<TypeRef> {
        vec![
            TypeRef::extends_wildcard(self.key.clone()),
            TypeRef::extends_wildcard(self.value.clone()),
        ]
    }
}

impl PropertyCodeGenerator for MapProperty {
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
        let map = self.linked_hash_map();
        if ctx.features.has_diamond() {
            code.add_line(
                "private final {} {} = new {}<>();",
                &[&map, &self.property.name, &java_util("LinkedHashMap")],
            );
        } else {
            code.add_line(
                "private final {} {} = new {}();",
                &[&map, &self.property.name, &map],
            );
        }
    }

    fn add_builder_field_accessors(&self, code: &mut SourceWriter, ctx: &GenerationContext<'_>) {
        let property = &self.property;
        let name = &property.name;
        let link = ctx.getter_link(property);
        let put = property.method("put");

        ctx.add_javadoc(
            code,
            Javadoc::new()
                .line("Associates {@code key} with {@code value} in the map to be returned from", &[])
                .line("{}.", &[&link])
                .line("If the map previously contained a mapping for the key,", &[])
                .line("the old value is replaced by the specified value.", &[])
                .blank()
                .line("@return this {@code Builder} object", &[])
                .line("@throws NullPointerException if either {@code key} or {@code value} are null", &[]),
        );
        code.add_line(
            "public {} {}({} key, {} value) {",
            &[ctx.builder(), &put, &self.key, &self.value],
        );
        ctx.add_null_check(code, "key");
        ctx.add_null_check(code, "value");
        code.add_line("this.{}.put(key, value);", &[name]);
        ctx.add_return_this(code);
        code.add_line("}", &[]);

        code.add_line("", &[]);
        ctx.add_javadoc(
            code,
            Javadoc::new()
                .line("Copies all of the mappings from {@code map} to the map to be returned from", &[])
                .line("{}.", &[&link])
                .blank()
                .line("@return this {@code Builder} object", &[])
                .line(
                    "@throws NullPointerException if {@code map} is null or contains a",
                    &[],
                )
                .line("    null key or value", &[]),
        );
        let wildcard_map = TypeRef::generic(java_util("Map"), self.wildcard_args());
        let entry = TypeRef::generic(
            QualifiedName::new("java.util", "Map").nested("Entry"),
            self.wildcard_args(),
        );
        code.add_line(
            "public {} {}({} map) {",
            &[ctx.builder(), &property.method("putAll"), &wildcard_map],
        );
        code.add_line("for ({} entry : map.entrySet()) {", &[&entry]);
        code.add_line("{}(entry.getKey(), entry.getValue());", &[&put]);
        code.add_line("}", &[]);
        ctx.add_return_this(code);
        code.add_line("}", &[]);

        code.add_line("", &[]);
        ctx.add_javadoc(
            code,
            Javadoc::new()
                .line("Removes the mapping for {@code key} from the map to be returned from", &[])
                .line("{}, if one is present.", &[&link])
                .blank()
                .line("@return this {@code Builder} object", &[])
                .line("@throws NullPointerException if {@code key} is null", &[]),
        );
        code.add_line(
            "public {} {}({} key) {",
            &[ctx.builder(), &property.method("remove"), &self.key],
        );
        ctx.add_null_check(code, "key");
        code.add_line("this.{}.remove(key);", &[name]);
        ctx.add_return_this(code);
        code.add_line("}", &[]);

        code.add_line("", &[]);
        ctx.add_javadoc(
            code,
            Javadoc::new()
                .line("Removes all of the mappings from the map to be returned from", &[])
                .line("{}.", &[&link])
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
                .line("Returns an unmodifiable view of the map that will be returned by", &[])
                .line("{}.", &[&link])
                .line("Changes to this builder will be reflected in the view.", &[]),
        );
        code.add_line(
            "public {} {}() {",
            &[&property.declared_type, &property.builder_getter_name()],
        );
        code.add_line("return {}.unmodifiableMap({});", &[&collections(), name]);
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
                &[
                    &final_field,
                    &QualifiedName::new("com.google.common.collect", "ImmutableMap"),
                    &builder,
                    name,
                ],
            );
        } else {
            code.add_line(
                "{} = {}.unmodifiableMap(new {}({}.{}));",
                &[&final_field, &collections(), &self.linked_hash_map(), &builder, name],
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
            &[&self.property.method("putAll"), &value, &self.property.getter_name],
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
                &self.property.method("putAll"),
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
