//! Java builder emitter.
//!
//! Assembles the generated builder class for one datatype: builder state and
//! accessors, `mergeFrom`, `clear`, `build`, `buildPartial`, and the nested
//! `Value` and `Partial` implementations of the source type.
//!
//! # Example
//!
//! ```rust,ignore
//! use buildergen::generator::{BuilderEmitter, CodeGenerator, GeneratorConfig};
//!
//! let emitter = BuilderEmitter::new();
//! let generated = emitter.generate_descriptor(&descriptor, &GeneratorConfig::default())?;
//! println!("{}", generated.code);
//! ```

use tracing::debug;

use super::context::{java_lang, GenerationContext, Javadoc, BASE, DEFAULTS};
use super::equality::{
    add_comma_joiner, add_equals, add_hash_code, add_partial_to_string, add_value_to_string,
    needs_comma_joiner, RenderedField,
};
use super::selection::SelectionChain;
use super::strategy::{Category, Strategy};
use super::tracking::RequiredTracking;
use super::traits::{CodeGenerator, GeneratedCode, GeneratorConfig};
use crate::error::GeneratorResult;
use crate::model::{Datatype, ParameterizedType, PropertyDeclaration, QualifiedName};
use crate::source::{CompilationUnit, Instantiation, SourceWriter, StringLiteral};

/// Comment written at the top of every generated file.
pub const HEADER_COMMENT: &str = "Autogenerated code. Do not modify.";

/// Value of the `@Generated` annotation.
pub const GENERATOR_NAME: &str = "buildergen";

/// Java builder code generator.
///
/// Binds each property to a strategy through a [`SelectionChain`], then drives
/// the strategies in a fixed order to produce one compilation unit.
#[derive(Debug, Clone, Default)]
pub struct BuilderEmitter {
    chain: SelectionChain,
}

impl BuilderEmitter {
    /// Create an emitter using the standard selection chain.
    pub fn new() -> Self {
        Self::default()
    }

    /// Create an emitter with a custom selection chain.
    pub fn with_chain(chain: SelectionChain) -> Self {
        Self { chain }
    }
}

impl CodeGenerator for BuilderEmitter {
    fn id(&self) -> &'static str {
        "java-builder"
    }

    fn name(&self) -> &'static str {
        "Java Builder"
    }

    fn file_extension(&self) -> &'static str {
        "java"
    }

    fn generate(
        &self,
        datatype: &Datatype,
        properties: &[PropertyDeclaration],
        config: &GeneratorConfig,
    ) -> GeneratorResult<GeneratedCode> {
        datatype.validate()?;
        let strategies = self.chain.bind(properties, &config.features)?;
        let tracking = RequiredTracking::new(
            datatype,
            strategies.iter().map(|s| (s.property(), s.category())),
        )?;
        let ctx = GenerationContext::new(datatype, config.features, config.generate_docs, tracking);

        let mut code = SourceWriter::new();
        Assembler {
            ctx: &ctx,
            strategies: &strategies,
            config,
        }
        .add_class(&mut code);

        let unit = CompilationUnit::new(datatype.generated_builder.name.clone())
            .with_visible_nested_types(datatype.visible_nested_types.iter().cloned())
            .with_header_comment(HEADER_COMMENT);
        let text = unit.render(&code, config.indent, config.line_ending);

        debug!(
            type_name = %datatype.generated_builder.name,
            properties = strategies.len(),
            required = ctx.tracking.properties().len(),
            "Generated builder"
        );

        let bound = strategies
            .iter()
            .map(|s| (s.property().name.clone(), s.name()))
            .collect();
        Ok(GeneratedCode::new(text, datatype.generated_builder.name.clone()).with_strategies(bound))
    }
}

/// One rendering pass over a datatype.
struct Assembler<'a> {
    ctx: &'a GenerationContext<'a>,
    strategies: &'a [Strategy],
    config: &'a GeneratorConfig,
}

impl Assembler<'_> {
    fn datatype(&self) -> &Datatype {
        self.ctx.datatype
    }

    fn add_class(&self, code: &mut SourceWriter) {
        let datatype = self.datatype();
        let ctx = self.ctx;

        ctx.add_javadoc(
            code,
            Javadoc::new()
                .line("Auto-generated superclass of {@link {}},", &[&datatype.builder.name])
                .line("derived from the API of {@link {}}.", &[&datatype.source_type.name]),
        );
        if self.config.generated_annotation {
            code.add_line(
                "@{}({})",
                &[
                    &QualifiedName::new("javax.annotation", "Generated"),
                    &StringLiteral(GENERATOR_NAME),
                ],
            );
        }
        if datatype.builder_serializable {
            code.add_line(
                "abstract class {} implements {} {",
                &[&datatype.generated_builder, &QualifiedName::new("java.io", "Serializable")],
            );
        } else {
            code.add_line("abstract class {} {", &[&datatype.generated_builder]);
        }
        code.add_line("", &[]);

        self.add_static_fields(code);
        self.add_static_from_method(code);

        if !ctx.tracking.is_empty() {
            ctx.tracking.add_enum_declaration(code);
            code.add_line("", &[]);
        }

        for strategy in self.strategies {
            strategy.generator().add_builder_field_declaration(code, ctx);
        }
        ctx.tracking.add_unset_field(code);
        if !self.strategies.is_empty() {
            code.add_line("", &[]);
        }

        for strategy in self.strategies {
            strategy.generator().add_builder_field_accessors(code, ctx);
            code.add_line("", &[]);
        }

        self.add_merge_from_value(code);
        code.add_line("", &[]);
        self.add_merge_from_builder(code);
        code.add_line("", &[]);
        if self.add_clear(code) {
            code.add_line("", &[]);
        }
        self.add_build(code);
        if let Some(partial) = &datatype.partial_type {
            code.add_line("", &[]);
            self.add_build_partial(code, partial);
        }

        code.add_line("", &[]);
        self.add_value_class(code);
        if let Some(partial) = &datatype.partial_type {
            code.add_line("", &[]);
            self.add_partial_class(code, partial);
        }
        code.add_line("}", &[]);
    }

    // =========================================================================
    // Static members
    // =========================================================================

    fn add_static_fields(&self, code: &mut SourceWriter) {
        let mut any = false;
        if self.datatype().builder_serializable {
            code.add_line("private static final long serialVersionUID = 1L;", &[]);
            any = true;
        }
        if needs_comma_joiner(&self.ctx.features, &self.value_fields()) {
            add_comma_joiner(code);
            any = true;
        }
        if any {
            code.add_line("", &[]);
        }
    }

    /// `from(value)`, for extensible types whose builder can be created.
    fn add_static_from_method(&self, code: &mut SourceWriter) {
        let datatype = self.datatype();
        if !datatype.extensible {
            return;
        }
        let Some(fresh) = self.ctx.fresh_builder(false) else {
            return;
        };
        self.ctx.add_javadoc(
            code,
            Javadoc::new().line("Creates a new builder using {@code value} as a template.", &[]),
        );
        let type_params = datatype.source_type.type_parameters();
        let type_params = if type_params.is_empty() {
            type_params
        } else {
            format!("{} ", type_params)
        };
        code.add_line(
            "public static {}{} from({} value) {",
            &[&type_params, &datatype.builder, &datatype.source_type],
        );
        code.add_line("return {}.mergeFrom(value);", &[&fresh]);
        code.add_line("}", &[]);
        code.add_line("", &[]);
    }

    // =========================================================================
    // Builder methods
    // =========================================================================

    /// Declare `_defaults` if a builder factory exists and `needed` holds.
    fn add_defaults_variable(&self, code: &mut SourceWriter, needed: bool) -> Option<&'static str> {
        if !needed {
            return None;
        }
        let fresh = self.ctx.fresh_builder(true)?;
        code.add_line(
            "{} {} = {};",
            &[&self.datatype().generated_builder, &DEFAULTS, &fresh],
        );
        Some(DEFAULTS)
    }

    fn add_merge_from_value(&self, code: &mut SourceWriter) {
        let datatype = self.datatype();
        let ctx = self.ctx;
        ctx.add_javadoc(
            code,
            Javadoc::new().line(
                "Sets all property values using the given {@code {}} as a template.",
                &[&datatype.source_type.name.simple_name()],
            ),
        );
        code.add_line(
            "public {} mergeFrom({} value) {",
            &[&datatype.builder, &datatype.source_type],
        );
        let defaults = self.add_defaults_variable(
            code,
            self.strategies
                .iter()
                .any(|s| s.generator().merges_against_defaults()),
        );
        for strategy in self.strategies {
            strategy
                .generator()
                .add_merge_from_value(code, ctx, "value", defaults);
        }
        ctx.add_return_this(code);
        code.add_line("}", &[]);
    }

    fn add_merge_from_builder(&self, code: &mut SourceWriter) {
        let datatype = self.datatype();
        let ctx = self.ctx;
        ctx.add_javadoc(
            code,
            Javadoc::new()
                .line("Copies values from the given {@code Builder}.", &[])
                .line("Does not affect any properties not set on the input.", &[]),
        );
        code.add_line(
            "public {} mergeFrom({} template) {",
            &[&datatype.builder, &datatype.builder],
        );
        if !ctx.tracking.is_empty() {
            code.add_line("// Upcast to access private fields", &[]);
            code.add_line(
                "{} {} = template;",
                &[&datatype.generated_builder, &BASE],
            );
        }
        let defaults = self.add_defaults_variable(
            code,
            self.strategies
                .iter()
                .any(|s| s.generator().merges_against_defaults()),
        );
        for strategy in self.strategies {
            strategy
                .generator()
                .add_merge_from_builder(code, ctx, "template", defaults);
        }
        ctx.add_return_this(code);
        code.add_line("}", &[]);
    }

    /// Emit `clear()`; returns whether anything was written.
    fn add_clear(&self, code: &mut SourceWriter) -> bool {
        let datatype = self.datatype();
        let ctx = self.ctx;
        if datatype.builder_factory.is_some() {
            ctx.add_javadoc(
                code,
                Javadoc::new().line("Resets the state of this builder.", &[]),
            );
            code.add_line("public {} clear() {", &[&datatype.builder]);
            let template = self.add_defaults_variable(
                code,
                self.strategies
                    .iter()
                    .any(|s| s.generator().is_template_required_in_clear()),
            );
            for strategy in self.strategies {
                strategy
                    .generator()
                    .add_clear(code, ctx, template.unwrap_or(DEFAULTS));
            }
            ctx.tracking.add_restore_unset(code, template);
        } else if datatype.extensible {
            ctx.add_javadoc(
                code,
                Javadoc::new()
                    .line("Resets the state of this builder.", &[])
                    .blank()
                    .line("<p>Only available to tests, as the builder has no public constructor.", &[]),
            );
            self.add_visible_for_testing(code);
            code.add_line("public {} clear() {", &[&datatype.builder]);
            for strategy in self.strategies {
                strategy.generator().add_partial_clear(code, ctx);
            }
            ctx.tracking.add_restore_unset(code, None);
        } else {
            return false;
        }
        ctx.add_return_this(code);
        code.add_line("}", &[]);
        true
    }

    fn add_build(&self, code: &mut SourceWriter) {
        let datatype = self.datatype();
        let ctx = self.ctx;
        let mut doc = Javadoc::new().line(
            "Returns a newly-created {@link {}} based on the contents of the {@code Builder}.",
            &[&datatype.source_type.name],
        );
        if !ctx.tracking.is_empty() {
            doc = doc
                .blank()
                .line("@throws IllegalStateException if any field has not been set", &[]);
        }
        ctx.add_javadoc(code, doc);
        code.add_line("public {} build() {", &[&datatype.source_type]);
        ctx.tracking.add_build_check(code, &ctx.features);
        code.add_line(
            "return new {}(this);",
            &[&Instantiation {
                ty: &datatype.value_type,
                diamond: ctx.features.has_diamond(),
            }],
        );
        code.add_line("}", &[]);
    }

    fn add_build_partial(&self, code: &mut SourceWriter, partial: &ParameterizedType) {
        let datatype = self.datatype();
        let ctx = self.ctx;
        ctx.add_javadoc(
            code,
            Javadoc::new()
                .line("Returns a newly-created partial {@link {}}", &[&datatype.source_type.name])
                .line("for use in unit tests. State checking will not be performed.", &[])
                .line("Unset properties will throw an {@link {}}", &[&java_lang("UnsupportedOperationException")])
                .line("when accessed via the partial object.", &[])
                .blank()
                .line("<p>Partials should only ever be used in tests. They permit writing robust", &[])
                .line("test cases that won't fail if this type gains more application-level", &[])
                .line("constraints (e.g. new required fields) in future. If you require partially", &[])
                .line("complete values in production code, consider using a Builder.", &[]),
        );
        self.add_visible_for_testing(code);
        code.add_line("public {} buildPartial() {", &[&datatype.source_type]);
        code.add_line(
            "return new {}(this);",
            &[&Instantiation {
                ty: partial,
                diamond: ctx.features.has_diamond(),
            }],
        );
        code.add_line("}", &[]);
    }

    fn add_visible_for_testing(&self, code: &mut SourceWriter) {
        if self.ctx.features.guava {
            code.add_line(
                "@{}",
                &[&QualifiedName::new("com.google.common.annotations", "VisibleForTesting")],
            );
        }
    }

    // =========================================================================
    // Value and Partial
    // =========================================================================

    fn value_fields(&self) -> Vec<RenderedField<'_>> {
        self.strategies
            .iter()
            .map(|s| {
                let property = s.property();
                RenderedField {
                    field: &property.name,
                    label: &property.name,
                    kind: s.generator().field_kind(),
                    tracked: None,
                }
            })
            .collect()
    }

    fn partial_fields(&self) -> Vec<RenderedField<'_>> {
        self.strategies
            .iter()
            .map(|s| {
                let property = s.property();
                let kind = s.generator().field_kind();
                let (kind, tracked) = match s.category() {
                    Category::Required => {
                        (kind.in_partial(), self.ctx.tracking.constant(&property.name))
                    }
                    _ => (kind, None),
                };
                RenderedField {
                    field: &property.name,
                    label: &property.name,
                    kind,
                    tracked,
                }
            })
            .collect()
    }

    /// `private static final class Value<A> extends Person<A> {`
    fn add_nested_class_header(&self, code: &mut SourceWriter, class: &ParameterizedType) {
        let datatype = self.datatype();
        let relation = if datatype.interface_type {
            "implements"
        } else {
            "extends"
        };
        code.add_line(
            "private static final class {}{} {} {} {",
            &[
                &class.name.simple_name(),
                &class.type_parameters(),
                &relation,
                &datatype.source_type,
            ],
        );
    }

    fn add_getter_header(&self, code: &mut SourceWriter, strategy: &Strategy) {
        let property = strategy.property();
        code.add_line("@Override", &[]);
        strategy.generator().add_getter_annotations(code);
        code.add_line(
            "public {} {}() {",
            &[&property.declared_type, &property.getter_name],
        );
    }

    fn add_value_class(&self, code: &mut SourceWriter) {
        let datatype = self.datatype();
        let ctx = self.ctx;
        let value = &datatype.value_type;

        self.add_nested_class_header(code, value);
        for strategy in self.strategies {
            let field = &strategy.property().name;
            strategy.generator().add_value_field_declaration(code, field);
        }
        if !self.strategies.is_empty() {
            code.add_line("", &[]);
        }

        code.add_line(
            "private {}({} builder) {",
            &[&value.name.simple_name(), &datatype.generated_builder],
        );
        for strategy in self.strategies {
            let field = format!("this.{}", strategy.property().name);
            strategy
                .generator()
                .add_final_field_assignment(code, ctx, &field, "builder");
        }
        code.add_line("}", &[]);

        for strategy in self.strategies {
            code.add_line("", &[]);
            self.add_getter_header(code, strategy);
            strategy
                .generator()
                .add_value_getter_body(code, ctx, &strategy.property().name);
            code.add_line("}", &[]);
        }

        let fields = self.value_fields();
        code.add_line("", &[]);
        add_equals(code, ctx, value, &fields, false);
        code.add_line("", &[]);
        add_hash_code(code, ctx, &fields, false);
        code.add_line("", &[]);
        add_value_to_string(code, ctx, &fields);
        code.add_line("}", &[]);
    }

    fn add_partial_class(&self, code: &mut SourceWriter, partial: &ParameterizedType) {
        let datatype = self.datatype();
        let ctx = self.ctx;
        let tracked = !ctx.tracking.is_empty();

        self.add_nested_class_header(code, partial);
        for strategy in self.strategies {
            let field = &strategy.property().name;
            strategy.generator().add_value_field_declaration(code, field);
        }
        ctx.tracking.add_partial_unset_field(code);
        if !self.strategies.is_empty() {
            code.add_line("", &[]);
        }

        code.add_line(
            "{}({} builder) {",
            &[&partial.name.simple_name(), &datatype.generated_builder],
        );
        for strategy in self.strategies {
            let field = format!("this.{}", strategy.property().name);
            strategy
                .generator()
                .add_partial_field_assignment(code, ctx, &field, "builder");
        }
        ctx.tracking.add_partial_unset_assignment(code, "builder");
        code.add_line("}", &[]);

        for strategy in self.strategies {
            code.add_line("", &[]);
            self.add_getter_header(code, strategy);
            ctx.tracking
                .add_partial_require_set(code, strategy.property());
            strategy
                .generator()
                .add_value_getter_body(code, ctx, &strategy.property().name);
            code.add_line("}", &[]);
        }

        let fields = self.partial_fields();
        code.add_line("", &[]);
        add_equals(code, ctx, partial, &fields, tracked);
        code.add_line("", &[]);
        add_hash_code(code, ctx, &fields, tracked);
        code.add_line("", &[]);
        add_partial_to_string(code, ctx, &fields);
        code.add_line("}", &[]);
    }
}
