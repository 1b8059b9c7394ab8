//! Properties whose type has a generated builder of its own.

use super::{Category, PropertyCodeGenerator};
use crate::generator::context::{field_ref, GenerationContext, Javadoc};
use crate::generator::equality::FieldKind;
use crate::generator::traits::Features;
use crate::model::{BuildableType, BuilderFactory, Property, PropertyDeclaration, QualifiedName};
use crate::source::{Emit, SourceWriter};

/// A property edited in place through a nested builder.
#[derive(Debug, Clone, PartialEq)]
pub struct BuildableProperty {
    property: Property,
    buildable: BuildableType,
}

impl BuildableProperty {
    /// Accepts declared types annotated with their builder.
    pub fn create(declaration: &PropertyDeclaration, _features: &Features) -> Option<Self> {
        let buildable = declaration.buildable.as_ref()?;
        let ty = &declaration.property.declared_type;
        if ty.erasure().is_none() || !ty.is_resolved() || !buildable.builder_type.is_resolved() {
            return None;
        }
        Some(Self {
            property: declaration.property.clone(),
            buildable: buildable.clone(),
        })
    }

    fn builder_getter(&self) -> String {
        format!("{}Builder", self.property.builder_getter_name())
    }
}

/// `new Address.Builder()` or `Address.builder()`.
struct NewBuilder<'a>(&'a BuildableProperty);

impl Emit for NewBuilder<'_> {
    fn emit(&self, code: &mut SourceWriter) {
        let buildable = &self.0.buildable;
        match buildable.builder_factory {
            BuilderFactory::NoArgsConstructor => {
                code.add("new {}()", &[&buildable.builder_type]);
            }
            BuilderFactory::BuilderMethod => {
                let ty = &self.0.property.declared_type;
                if let Some(name) = ty.erasure() {
                    code.add("{}.", &[name]);
                }
                let args = ty.type_args();
                if !args.is_empty() {
                    code.text("<");
                    for (i, arg) in args.iter().enumerate() {
                        if i > 0 {
                            code.text(", ");
                        }
                        arg.emit(code);
                    }
                    code.text(">");
                }
                code.text("builder()");
            }
        }
    }
}

impl PropertyCodeGenerator for BuildableProperty {
    fn property(&self) -> &Property {
        &self.property
    }

    fn category(&self) -> Category {
        Category::HasDefault
    }

    fn field_kind(&self) -> FieldKind {
        FieldKind::NonNull
    }

    fn add_builder_field_declaration(&self, code: &mut SourceWriter, _ctx: &GenerationContext<'_>) {
        code.add_line(
            "private final {} {} = {};",
            &[&self.buildable.builder_type, &self.property.name, &NewBuilder(self)],
        );
    }

    fn add_builder_field_accessors(&self, code: &mut SourceWriter, ctx: &GenerationContext<'_>) {
        let property = &self.property;
        let name = &property.name;
        let link = ctx.getter_link(property);
        let setter = property.setter_name();
        let builder_type = &self.buildable.builder_type;

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
            &[ctx.builder(), &setter, &property.declared_type, name],
        );
        ctx.add_null_check(code, name);
        code.add_line("this.{}.clear();", &[name]);
        code.add_line("this.{}.mergeFrom({});", &[name, name]);
        ctx.add_return_this(code);
        code.add_line("}", &[]);

        code.add_line("", &[]);
        ctx.add_javadoc(
            code,
            Javadoc::new()
                .line("Sets the value to be returned by {}.", &[&link])
                .blank()
                .line("@return this {@code Builder} object", &[])
                .line("@throws NullPointerException if {@code builder} is null", &[]),
        );
        code.add_line(
            "public {} {}({} builder) {",
            &[ctx.builder(), &setter, builder_type],
        );
        code.add_line("return {}(builder.build());", &[&setter]);
        code.add_line("}", &[]);

        code.add_line("", &[]);
        ctx.add_javadoc(
            code,
            Javadoc::new()
                .line("Returns a builder for the value that will be returned by {}.", &[&link]),
        );
        code.add_line("public {} {}() {", &[builder_type, &self.builder_getter()]);
        code.add_line("return {};", &[name]);
        code.add_line("}", &[]);

        if ctx.features.has_lambdas() {
            let consumer = QualifiedName::new("java.util.function", "Consumer");
            code.add_line("", &[]);
            ctx.add_javadoc(
                code,
                Javadoc::new()
                    .line("Applies {@code mutator} to the builder for the value that will be", &[])
                    .line("returned by {}.", &[&link])
                    .blank()
                    .line("@return this {@code Builder} object", &[])
                    .line("@throws NullPointerException if {@code mutator} is null", &[]),
            );
            code.add_line(
                "public {} {}({}<{}> mutator) {",
                &[ctx.builder(), &property.method("mutate"), &consumer, builder_type],
            );
            ctx.add_null_check(code, "mutator");
            code.add_line("mutator.accept({});", &[name]);
            ctx.add_return_this(code);
            code.add_line("}", &[]);
        }
    }

    fn add_final_field_assignment(
        &self,
        code: &mut SourceWriter,
        _ctx: &GenerationContext<'_>,
        final_field: &str,
        builder: &str,
    ) {
        code.add_line(
            "{} = {}.{}.build();",
            &[&final_field, &builder, &self.property.name],
        );
    }

    fn add_partial_field_assignment(
        &self,
        code: &mut SourceWriter,
        ctx: &GenerationContext<'_>,
        final_field: &str,
        builder: &str,
    ) {
        if self.buildable.supports_partial {
            code.add_line(
                "{} = {}.{}.buildPartial();",
                &[&final_field, &builder, &self.property.name],
            );
        } else {
            self.add_final_field_assignment(code, ctx, final_field, builder);
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
            "{}.mergeFrom({}.{}());",
            &[&field_ref(&self.property.name, &[value]), &value, &self.property.getter_name],
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
            "{}.mergeFrom({}.{}());",
            &[&field_ref(&self.property.name, &[builder]), &builder, &self.builder_getter()],
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
