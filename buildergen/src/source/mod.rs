//! Java source emission.
//!
//! Code is appended to a [`SourceWriter`] as a stream of text and symbolic
//! type references. Nothing is indented or imported while emitting: the
//! [`CompilationUnit`] resolves imports once the whole body is known, then
//! re-indents the result by brace depth.

mod format;
mod imports;

pub use format::reindent;
pub use imports::{CompilationUnit, ImportManager};

use crate::model::{ParameterizedType, QualifiedName, TypeRef};

/// A piece of emitted code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Token {
    /// Literal source text.
    Text(String),
    /// A class reference, shortened at render time where possible.
    Type(QualifiedName),
}

/// Something that can be written into a [`SourceWriter`].
pub trait Emit {
    fn emit(&self, code: &mut SourceWriter);
}

/// Accumulates the tokens of a compilation unit body.
#[derive(Debug, Clone, Default)]
pub struct SourceWriter {
    tokens: Vec<Token>,
}

impl SourceWriter {
    /// Create an empty writer.
    pub fn new() -> Self {
        Self::default()
    }

    /// Append a template, substituting each `{}` with the next argument.
    pub fn add(&mut self, template: &str, args: &[&dyn Emit]) -> &mut Self {
        let mut pieces = template.split("{}");
        if let Some(first) = pieces.next() {
            self.text(first);
        }
        let mut args = args.iter();
        for piece in pieces {
            match args.next() {
                Some(arg) => arg.emit(self),
                None => debug_assert!(false, "missing argument for template {:?}", template),
            }
            self.text(piece);
        }
        debug_assert!(args.next().is_none(), "unused argument for template {:?}", template);
        self
    }

    /// Append a template followed by a newline.
    pub fn add_line(&mut self, template: &str, args: &[&dyn Emit]) -> &mut Self {
        self.add(template, args);
        self.text("\n")
    }

    /// Append literal text.
    pub fn text(&mut self, text: &str) -> &mut Self {
        if text.is_empty() {
            return self;
        }
        if let Some(Token::Text(last)) = self.tokens.last_mut() {
            last.push_str(text);
        } else {
            self.tokens.push(Token::Text(text.to_string()));
        }
        self
    }

    /// Append a class reference.
    pub fn type_name(&mut self, name: &QualifiedName) -> &mut Self {
        self.tokens.push(Token::Type(name.clone()));
        self
    }

    /// Append everything written to another writer.
    pub fn append(&mut self, other: SourceWriter) -> &mut Self {
        for token in other.tokens {
            match token {
                Token::Text(text) => self.text(&text),
                Token::Type(name) => self.type_name(&name),
            };
        }
        self
    }

    /// The tokens written so far.
    pub fn tokens(&self) -> &[Token] {
        &self.tokens
    }

    /// Render with every class reference fully qualified.
    pub fn to_qualified_string(&self) -> String {
        self.tokens
            .iter()
            .map(|token| match token {
                Token::Text(text) => text.clone(),
                Token::Type(name) => name.to_string(),
            })
            .collect()
    }
}

// =============================================================================
// Emit implementations
// =============================================================================

impl Emit for &str {
    fn emit(&self, code: &mut SourceWriter) {
        code.text(self);
    }
}

impl Emit for String {
    fn emit(&self, code: &mut SourceWriter) {
        code.text(self);
    }
}

impl Emit for usize {
    fn emit(&self, code: &mut SourceWriter) {
        code.text(&self.to_string());
    }
}

impl Emit for QualifiedName {
    fn emit(&self, code: &mut SourceWriter) {
        code.type_name(self);
    }
}

impl Emit for TypeRef {
    fn emit(&self, code: &mut SourceWriter) {
        match self {
            TypeRef::Declared { name, args } => {
                code.type_name(name);
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
            }
            TypeRef::Wildcard(Some(bound)) => {
                code.text("? extends ");
                bound.emit(code);
            }
            TypeRef::Array(component) => {
                component.emit(code);
                code.text("[]");
            }
            other => {
                code.text(&other.to_string());
            }
        }
    }
}

impl Emit for ParameterizedType {
    fn emit(&self, code: &mut SourceWriter) {
        code.type_name(&self.name);
        code.text(&self.type_parameters());
    }
}

/// A generic class with every type argument replaced by `?`.
pub struct Wildcards<'a>(pub &'a ParameterizedType);

impl Emit for Wildcards<'_> {
    fn emit(&self, code: &mut SourceWriter) {
        code.type_name(&self.0.name);
        if self.0.is_generic() {
            let wildcards = vec!["?"; self.0.params.len()];
            code.text(&format!("<{}>", wildcards.join(", ")));
        }
    }
}

/// The type in a `new` expression, using `<>` when `diamond` is set.
pub struct Instantiation<'a> {
    pub ty: &'a ParameterizedType,
    pub diamond: bool,
}

impl Emit for Instantiation<'_> {
    fn emit(&self, code: &mut SourceWriter) {
        if self.diamond && self.ty.is_generic() {
            code.type_name(&self.ty.name);
            code.text("<>");
        } else {
            self.ty.emit(code);
        }
    }
}

/// A string literal with Java escaping.
pub struct StringLiteral<'a>(pub &'a str);

impl Emit for StringLiteral<'_> {
    fn emit(&self, code: &mut SourceWriter) {
        let mut literal = String::with_capacity(self.0.len() + 2);
        literal.push('"');
        for c in self.0.chars() {
            match c {
                '"' => literal.push_str("\\\""),
                '\\' => literal.push_str("\\\\"),
                '\n' => literal.push_str("\\n"),
                '\t' => literal.push_str("\\t"),
                c => literal.push(c),
            }
        }
        literal.push('"');
        code.text(&literal);
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn person() -> ParameterizedType {
        ParameterizedType::new(QualifiedName::new("com.example", "Person")).with_params(["A", "B"])
    }

    #[test]
    fn test_template_substitution() {
        let mut code = SourceWriter::new();
        let name = "name".to_string();
        code.add_line("private {} {};", &[&TypeRef::parse("java.lang.String"), &name]);
        assert_eq!(code.to_qualified_string(), "private java.lang.String name;\n");
    }

    #[test]
    fn test_adjacent_text_is_merged() {
        let mut code = SourceWriter::new();
        code.text("a").text("b").type_name(&QualifiedName::new("java.util", "List"));
        code.text("c");
        assert_eq!(code.tokens().len(), 3);
    }

    #[test]
    fn test_generic_type_tokens() {
        let mut code = SourceWriter::new();
        code.add("{}", &[&TypeRef::parse("java.util.Map<K, java.util.List<V>>")]);
        let types: Vec<_> = code
            .tokens()
            .iter()
            .filter_map(|t| match t {
                Token::Type(name) => Some(name.simple_name().to_string()),
                Token::Text(_) => None,
            })
            .collect();
        assert_eq!(types, vec!["Map", "List"]);
    }

    #[test]
    fn test_wildcards_and_instantiation() {
        let person = person();
        let mut code = SourceWriter::new();
        code.add(
            "{} {} {}",
            &[
                &Wildcards(&person),
                &Instantiation { ty: &person, diamond: true },
                &Instantiation { ty: &person, diamond: false },
            ],
        );
        assert_eq!(
            code.to_qualified_string(),
            "com.example.Person<?, ?> com.example.Person<> com.example.Person<A, B>"
        );
    }

    #[test]
    fn test_string_literal_escaping() {
        let mut code = SourceWriter::new();
        code.add("{}", &[&StringLiteral("say \"hi\"\\")]);
        assert_eq!(code.to_qualified_string(), r#""say \"hi\"\\""#);
    }
}
