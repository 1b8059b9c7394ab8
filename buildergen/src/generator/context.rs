//! Shared state and helpers for one rendering pass.

use super::tracking::RequiredTracking;
use super::traits::Features;
use crate::model::{BuilderFactory, Datatype, ParameterizedType, Property, QualifiedName};
use crate::source::{Emit, Instantiation, SourceWriter};

/// Local variable holding a default builder inside `mergeFrom`.
pub const DEFAULTS: &str = "_defaults";

/// Local variable holding the source builder upcast to the generated type.
pub const BASE: &str = "base";

/// Locals declared by `mapX(UnaryOperator)` methods.
pub const MAP_LOCALS: &[&str] = &["mapper", "result"];

/// Refers to `field` from a method declaring `locals`, qualifying it with
/// `this.` when a local of the same name would shadow it.
pub fn field_ref(field: &str, locals: &[&str]) -> String {
    if locals.contains(&field) {
        format!("this.{}", field)
    } else {
        field.to_string()
    }
}

/// Everything a strategy needs to know about the type being generated.
#[derive(Debug)]
pub struct GenerationContext<'a> {
    /// The datatype being generated
    pub datatype: &'a Datatype,

    /// Language level and libraries
    pub features: Features,

    /// Whether Javadoc is emitted
    pub generate_docs: bool,

    /// Required-property tracking shape
    pub tracking: RequiredTracking,
}

impl<'a> GenerationContext<'a> {
    /// Create a context.
    pub fn new(
        datatype: &'a Datatype,
        features: Features,
        generate_docs: bool,
        tracking: RequiredTracking,
    ) -> Self {
        Self {
            datatype,
            features,
            generate_docs,
            tracking,
        }
    }

    /// The user-visible builder type.
    pub fn builder(&self) -> &ParameterizedType {
        &self.datatype.builder
    }

    /// The source type's class name.
    pub fn source_name(&self) -> &QualifiedName {
        &self.datatype.source_type.name
    }

    /// `return (Person.Builder) this;`
    pub fn add_return_this(&self, code: &mut SourceWriter) {
        code.add_line("return ({}) this;", &[self.builder()]);
    }

    /// Emit a Javadoc block, unless docs are disabled.
    pub fn add_javadoc(&self, code: &mut SourceWriter, doc: Javadoc) {
        if !self.generate_docs {
            return;
        }
        code.add_line("/**", &[]);
        code.append(doc.lines);
        code.add_line(" */", &[]);
    }

    /// Link to the source accessor of a property.
    pub fn getter_link<'p>(&'p self, property: &'p Property) -> GetterLink<'p> {
        GetterLink {
            source: self.source_name(),
            getter: &property.getter_name,
        }
    }

    /// `target = checkNotNull(expr);`, spelled for the available libraries.
    pub fn add_checked_assignment(&self, code: &mut SourceWriter, target: &str, expr: &str) {
        if self.features.guava {
            code.add_line("{} = {}.checkNotNull({});", &[&target, &preconditions(), &expr]);
        } else if self.features.has_objects() {
            code.add_line("{} = {}.requireNonNull({});", &[&target, &objects(), &expr]);
        } else {
            self.add_null_check(code, expr);
            code.add_line("{} = {};", &[&target, &expr]);
        }
    }

    /// A statement throwing `NullPointerException` when `expr` is null.
    pub fn add_null_check(&self, code: &mut SourceWriter, expr: &str) {
        if self.features.guava {
            code.add_line("{}.checkNotNull({});", &[&preconditions(), &expr]);
        } else if self.features.has_objects() {
            code.add_line("{}.requireNonNull({});", &[&objects(), &expr]);
        } else {
            code.add_line("if ({} == null) {", &[&expr]);
            code.add_line("throw new {}();", &[&java_lang("NullPointerException")]);
            code.add_line("}", &[]);
        }
    }

    /// A fresh user builder, if the datatype has a factory.
    pub fn fresh_builder(&self, diamond: bool) -> Option<FreshBuilder<'_>> {
        self.datatype.builder_factory.map(|factory| FreshBuilder {
            datatype: self.datatype,
            factory,
            diamond: diamond && self.features.has_diamond(),
        })
    }
}

/// Accumulates the lines of a Javadoc comment.
#[derive(Debug, Default)]
pub struct Javadoc {
    lines: SourceWriter,
}

impl Javadoc {
    /// Start an empty comment.
    pub fn new() -> Self {
        Self::default()
    }

    /// Add a line of text.
    pub fn line(mut self, template: &str, args: &[&dyn Emit]) -> Self {
        self.lines.text(" * ");
        self.lines.add_line(template, args);
        self
    }

    /// Add a paragraph break.
    pub fn blank(mut self) -> Self {
        self.lines.text(" *\n");
        self
    }
}

/// `{@link Person#getName()}`
pub struct GetterLink<'a> {
    source: &'a QualifiedName,
    getter: &'a str,
}

impl Emit for GetterLink<'_> {
    fn emit(&self, code: &mut SourceWriter) {
        code.add("{@link {}#{}()}", &[self.source, &self.getter]);
    }
}

/// An expression creating a new user builder.
pub struct FreshBuilder<'a> {
    datatype: &'a Datatype,
    factory: BuilderFactory,
    diamond: bool,
}

impl Emit for FreshBuilder<'_> {
    fn emit(&self, code: &mut SourceWriter) {
        match self.factory {
            BuilderFactory::NoArgsConstructor => {
                let ty = Instantiation {
                    ty: &self.datatype.builder,
                    diamond: self.diamond,
                };
                code.add("new {}()", &[&ty]);
            }
            BuilderFactory::BuilderMethod => {
                let source = &self.datatype.source_type;
                code.add("{}.{}builder()", &[&source.name, &source.type_parameters()]);
            }
        }
    }
}

/// `com.google.common.base.Preconditions`
pub fn preconditions() -> QualifiedName {
    QualifiedName::new("com.google.common.base", "Preconditions")
}

/// `java.util.Objects`
pub fn objects() -> QualifiedName {
    QualifiedName::new("java.util", "Objects")
}

/// A class in `java.lang`.
pub fn java_lang(simple_name: &str) -> QualifiedName {
    QualifiedName::new("java.lang", simple_name)
}

/// A class in `java.util`.
pub fn java_util(simple_name: &str) -> QualifiedName {
    QualifiedName::new("java.util", simple_name)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::generator::traits::SourceLevel;
    use crate::model::QualifiedName;

    fn datatype() -> Datatype {
        Datatype::standard(
            ParameterizedType::new(QualifiedName::new("com.example", "Person")).with_params(["A"]),
        )
    }

    fn render(datatype: &Datatype, features: Features, f: impl Fn(&GenerationContext, &mut SourceWriter)) -> String {
        let ctx = GenerationContext::new(datatype, features, true, RequiredTracking::empty());
        let mut code = SourceWriter::new();
        f(&ctx, &mut code);
        code.to_qualified_string()
    }

    #[test]
    fn test_checked_assignment_per_feature() {
        let datatype = datatype();
        let guava = render(&datatype, Features::new(SourceLevel::Java6, true), |ctx, code| {
            ctx.add_checked_assignment(code, "this.name", "name")
        });
        assert_eq!(
            guava,
            "this.name = com.google.common.base.Preconditions.checkNotNull(name);\n"
        );

        let java7 = render(&datatype, Features::new(SourceLevel::Java7, false), |ctx, code| {
            ctx.add_checked_assignment(code, "this.name", "name")
        });
        assert_eq!(java7, "this.name = java.util.Objects.requireNonNull(name);\n");

        let java6 = render(&datatype, Features::new(SourceLevel::Java6, false), |ctx, code| {
            ctx.add_checked_assignment(code, "this.name", "name")
        });
        assert_eq!(
            java6,
            "if (name == null) {\nthrow new java.lang.NullPointerException();\n}\nthis.name = name;\n"
        );
    }

    #[test]
    fn test_fresh_builder() {
        let datatype = datatype();
        let text = render(&datatype, Features::default(), |ctx, code| {
            code.add("{}", &[&ctx.fresh_builder(true).unwrap()]);
        });
        assert_eq!(text, "new com.example.Person.Builder<>()");

        let text = render(&datatype, Features::new(SourceLevel::Java6, false), |ctx, code| {
            code.add("{}", &[&ctx.fresh_builder(true).unwrap()]);
        });
        assert_eq!(text, "new com.example.Person.Builder<A>()");

        let datatype = datatype.with_builder_factory(Some(BuilderFactory::BuilderMethod));
        let text = render(&datatype, Features::default(), |ctx, code| {
            code.add("{}", &[&ctx.fresh_builder(false).unwrap()]);
        });
        assert_eq!(text, "com.example.Person.<A>builder()");
    }

    #[test]
    fn test_javadoc_can_be_disabled() {
        let datatype = datatype();
        let ctx = GenerationContext::new(&datatype, Features::default(), false, RequiredTracking::empty());
        let mut code = SourceWriter::new();
        ctx.add_javadoc(&mut code, Javadoc::new().line("Hidden.", &[]));
        assert!(code.tokens().is_empty());
    }

    #[test]
    fn test_javadoc_lines() {
        let datatype = datatype();
        let property = Property::new("name", crate::model::TypeRef::parse("java.lang.String"));
        let text = render(&datatype, Features::default(), |ctx, code| {
            ctx.add_javadoc(
                code,
                Javadoc::new()
                    .line("Returns {}.", &[&ctx.getter_link(&property)])
                    .blank()
                    .line("@return the value", &[]),
            );
        });
        assert_eq!(
            text,
            "/**\n * Returns {@link com.example.Person#getName()}.\n *\n * @return the value\n */\n"
        );
    }
}
