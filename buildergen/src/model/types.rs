//! Java type references.
//!
//! Types are symbolic: a [`QualifiedName`] is split into package and nested
//! simple names so the source writer can decide later whether a reference
//! can be shortened through an import. [`TypeRef`] serializes to and from
//! plain Java source text (`java.util.Map<java.lang.String, V>`), which is
//! the form host adapters write into descriptors.

use serde::{Deserialize, Serialize};
use std::fmt;

// =============================================================================
// Qualified names
// =============================================================================

/// Fully qualified name of a (possibly nested) Java class.
#[derive(Debug, Clone, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(try_from = "String", into = "String")]
pub struct QualifiedName {
    package: String,
    simple_names: Vec<String>,
}

impl QualifiedName {
    /// Create a top-level class name.
    pub fn new(package: impl Into<String>, simple_name: impl Into<String>) -> Self {
        Self {
            package: package.into(),
            simple_names: vec![simple_name.into()],
        }
    }

    /// Parse a dotted name, treating leading lowercase segments as the package.
    ///
    /// `com.example.Person.Builder` parses as package `com.example` with
    /// simple names `Person` and `Builder`.
    pub fn parse(text: &str) -> Option<Self> {
        let segments: Vec<&str> = text.split('.').collect();
        if segments.iter().any(|s| !is_identifier(s)) {
            return None;
        }
        let split = segments
            .iter()
            .position(|s| s.starts_with(|c: char| c.is_ascii_uppercase()))?;
        Some(Self {
            package: segments[..split].join("."),
            simple_names: segments[split..].iter().map(|s| s.to_string()).collect(),
        })
    }

    /// Name of a class nested directly inside this one.
    pub fn nested(&self, simple_name: impl Into<String>) -> Self {
        let mut simple_names = self.simple_names.clone();
        simple_names.push(simple_name.into());
        Self {
            package: self.package.clone(),
            simple_names,
        }
    }

    /// The package, empty for the default package.
    pub fn package(&self) -> &str {
        &self.package
    }

    /// The innermost simple name.
    pub fn simple_name(&self) -> &str {
        self.simple_names.last().map(String::as_str).unwrap_or_default()
    }

    /// All simple names from the top-level class inwards.
    pub fn simple_names(&self) -> &[String] {
        &self.simple_names
    }

    /// The top-level class containing this one (or this class itself).
    pub fn top_level(&self) -> QualifiedName {
        Self {
            package: self.package.clone(),
            simple_names: self.simple_names[..1].to_vec(),
        }
    }

    /// The directly enclosing class, if this class is nested.
    pub fn enclosing_type(&self) -> Option<QualifiedName> {
        if self.simple_names.len() < 2 {
            return None;
        }
        Some(Self {
            package: self.package.clone(),
            simple_names: self.simple_names[..self.simple_names.len() - 1].to_vec(),
        })
    }

    /// Whether this is a top-level class.
    pub fn is_top_level(&self) -> bool {
        self.simple_names.len() == 1
    }

    /// Dotted simple names without the package (`Person.Builder`).
    pub fn relative_name(&self) -> String {
        self.simple_names.join(".")
    }
}

impl fmt::Display for QualifiedName {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        if self.package.is_empty() {
            write!(f, "{}", self.relative_name())
        } else {
            write!(f, "{}.{}", self.package, self.relative_name())
        }
    }
}

impl TryFrom<String> for QualifiedName {
    type Error = String;

    fn try_from(value: String) -> Result<Self, Self::Error> {
        Self::parse(&value).ok_or_else(|| format!("not a qualified class name: '{}'", value))
    }
}

impl From<QualifiedName> for String {
    fn from(value: QualifiedName) -> Self {
        value.to_string()
    }
}

fn is_identifier(text: &str) -> bool {
    let mut chars = text.chars();
    match chars.next() {
        Some(c) if c.is_alphabetic() || c == '_' || c == '$' => {}
        _ => return false,
    }
    chars.all(|c| c.is_alphanumeric() || c == '_' || c == '$')
}

// =============================================================================
// Primitives
// =============================================================================

/// Java primitive types.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum Primitive {
    Boolean,
    Byte,
    Short,
    Int,
    Long,
    Char,
    Float,
    Double,
}

impl Primitive {
    /// All primitive types.
    pub const ALL: [Primitive; 8] = [
        Primitive::Boolean,
        Primitive::Byte,
        Primitive::Short,
        Primitive::Int,
        Primitive::Long,
        Primitive::Char,
        Primitive::Float,
        Primitive::Double,
    ];

    /// The Java keyword.
    pub fn keyword(self) -> &'static str {
        match self {
            Primitive::Boolean => "boolean",
            Primitive::Byte => "byte",
            Primitive::Short => "short",
            Primitive::Int => "int",
            Primitive::Long => "long",
            Primitive::Char => "char",
            Primitive::Float => "float",
            Primitive::Double => "double",
        }
    }

    /// Look up a primitive by keyword.
    pub fn from_keyword(keyword: &str) -> Option<Self> {
        Self::ALL.into_iter().find(|p| p.keyword() == keyword)
    }

    /// The `java.lang` wrapper class.
    pub fn boxed(self) -> QualifiedName {
        let simple = match self {
            Primitive::Boolean => "Boolean",
            Primitive::Byte => "Byte",
            Primitive::Short => "Short",
            Primitive::Int => "Integer",
            Primitive::Long => "Long",
            Primitive::Char => "Character",
            Primitive::Float => "Float",
            Primitive::Double => "Double",
        };
        QualifiedName::new("java.lang", simple)
    }

    /// Literal for the field's zero value.
    pub fn zero_value(self) -> &'static str {
        match self {
            Primitive::Boolean => "false",
            Primitive::Long => "0L",
            Primitive::Char => "'\\0'",
            Primitive::Float => "0.0f",
            Primitive::Double => "0.0",
            Primitive::Byte | Primitive::Short | Primitive::Int => "0",
        }
    }

    /// Whether values must be compared through their bit patterns.
    pub fn is_floating_point(self) -> bool {
        matches!(self, Primitive::Float | Primitive::Double)
    }
}

// =============================================================================
// Type references
// =============================================================================

/// A reference to a Java type as written in source.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(from = "String", into = "String")]
pub enum TypeRef {
    /// A primitive type.
    Primitive(Primitive),
    /// A class or interface, with type arguments.
    Declared {
        name: QualifiedName,
        args: Vec<TypeRef>,
    },
    /// A type variable.
    Variable(String),
    /// `?`, or `? extends Bound`.
    Wildcard(Option<Box<TypeRef>>),
    /// An array of the component type.
    Array(Box<TypeRef>),
    /// `void`
    Void,
    /// A type the host toolchain could not resolve, kept as raw text.
    Unresolved(String),
}

impl TypeRef {
    /// A class reference without type arguments.
    pub fn declared(name: QualifiedName) -> Self {
        TypeRef::Declared {
            name,
            args: Vec::new(),
        }
    }

    /// A parameterized class reference.
    pub fn generic(name: QualifiedName, args: Vec<TypeRef>) -> Self {
        TypeRef::Declared { name, args }
    }

    /// A type variable reference.
    pub fn variable(name: impl Into<String>) -> Self {
        TypeRef::Variable(name.into())
    }

    /// `? extends bound`
    pub fn extends_wildcard(bound: TypeRef) -> Self {
        TypeRef::Wildcard(Some(Box::new(bound)))
    }

    /// Parse Java source text; unparseable text yields [`TypeRef::Unresolved`].
    pub fn parse(text: &str) -> Self {
        TypeParser::new(text)
            .and_then(TypeParser::parse_complete)
            .unwrap_or_else(|| TypeRef::Unresolved(text.trim().to_string()))
    }

    /// The primitive kind, if this is a primitive.
    pub fn as_primitive(&self) -> Option<Primitive> {
        match self {
            TypeRef::Primitive(p) => Some(*p),
            _ => None,
        }
    }

    /// Whether this is a primitive type.
    pub fn is_primitive(&self) -> bool {
        self.as_primitive().is_some()
    }

    /// The wrapper type for primitives; other types are returned unchanged.
    pub fn boxed(&self) -> TypeRef {
        match self {
            TypeRef::Primitive(p) => TypeRef::declared(p.boxed()),
            other => other.clone(),
        }
    }

    /// The class name of a declared type.
    pub fn erasure(&self) -> Option<&QualifiedName> {
        match self {
            TypeRef::Declared { name, .. } => Some(name),
            _ => None,
        }
    }

    /// Type arguments of a declared type.
    pub fn type_args(&self) -> &[TypeRef] {
        match self {
            TypeRef::Declared { args, .. } => args,
            _ => &[],
        }
    }

    /// Whether this is a declared type with the given erasure.
    pub fn is_class(&self, qualified: &str) -> bool {
        self.erasure().is_some_and(|name| name.to_string() == qualified)
    }

    /// Whether the host toolchain resolved this type.
    pub fn is_resolved(&self) -> bool {
        match self {
            TypeRef::Unresolved(_) => false,
            TypeRef::Declared { args, .. } => args.iter().all(TypeRef::is_resolved),
            TypeRef::Wildcard(Some(bound)) | TypeRef::Array(bound) => bound.is_resolved(),
            _ => true,
        }
    }
}

impl fmt::Display for TypeRef {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            TypeRef::Primitive(p) => write!(f, "{}", p.keyword()),
            TypeRef::Declared { name, args } => {
                write!(f, "{}", name)?;
                if !args.is_empty() {
                    let args: Vec<String> = args.iter().map(ToString::to_string).collect();
                    write!(f, "<{}>", args.join(", "))?;
                }
                Ok(())
            }
            TypeRef::Variable(name) => write!(f, "{}", name),
            TypeRef::Wildcard(None) => write!(f, "?"),
            TypeRef::Wildcard(Some(bound)) => write!(f, "? extends {}", bound),
            TypeRef::Array(component) => write!(f, "{}[]", component),
            TypeRef::Void => write!(f, "void"),
            TypeRef::Unresolved(text) => write!(f, "{}", text),
        }
    }
}

impl From<String> for TypeRef {
    fn from(value: String) -> Self {
        TypeRef::parse(&value)
    }
}

impl From<TypeRef> for String {
    fn from(value: TypeRef) -> Self {
        value.to_string()
    }
}

// =============================================================================
// Parameterized class declarations
// =============================================================================

/// A class declaration together with its type parameter names.
///
/// Used for the source type, the user builder and every generated class,
/// which all share the source type's parameters.
#[derive(Debug, Clone, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub struct ParameterizedType {
    /// Qualified class name
    pub name: QualifiedName,

    /// Type parameter names, in declaration order
    #[serde(default, skip_serializing_if = "Vec::is_empty")]
    pub params: Vec<String>,
}

impl ParameterizedType {
    /// Create a non-generic class declaration.
    pub fn new(name: QualifiedName) -> Self {
        Self {
            name,
            params: Vec::new(),
        }
    }

    /// Set the type parameters.
    pub fn with_params<I, S>(mut self, params: I) -> Self
    where
        I: IntoIterator<Item = S>,
        S: Into<String>,
    {
        self.params = params.into_iter().map(Into::into).collect();
        self
    }

    /// A sibling declaration sharing these type parameters.
    pub fn with_name(&self, name: QualifiedName) -> Self {
        Self {
            name,
            params: self.params.clone(),
        }
    }

    /// Whether the class declares type parameters.
    pub fn is_generic(&self) -> bool {
        !self.params.is_empty()
    }

    /// `<A, B>`, or an empty string for non-generic classes.
    pub fn type_parameters(&self) -> String {
        if self.params.is_empty() {
            String::new()
        } else {
            format!("<{}>", self.params.join(", "))
        }
    }

    /// The type as referenced from inside its own declaration (`Person<A, B>`).
    pub fn as_type_ref(&self) -> TypeRef {
        TypeRef::generic(
            self.name.clone(),
            self.params.iter().map(TypeRef::variable).collect(),
        )
    }
}

// =============================================================================
// Parser
// =============================================================================

#[derive(Debug, Clone, Copy, PartialEq)]
enum Token<'a> {
    Word(&'a str),
    Punct(char),
}

struct TypeParser<'a> {
    tokens: Vec<Token<'a>>,
    pos: usize,
}

impl<'a> TypeParser<'a> {
    fn new(text: &'a str) -> Option<Self> {
        let mut tokens = Vec::new();
        let mut start = None;
        for (i, c) in text.char_indices() {
            let is_word = c.is_alphanumeric() || c == '_' || c == '$' || c == '.';
            if is_word {
                start.get_or_insert(i);
                continue;
            }
            if let Some(s) = start.take() {
                tokens.push(Token::Word(&text[s..i]));
            }
            match c {
                '<' | '>' | ',' | '?' | '[' | ']' => tokens.push(Token::Punct(c)),
                c if c.is_whitespace() => {}
                _ => return None,
            }
        }
        if let Some(s) = start {
            tokens.push(Token::Word(&text[s..]));
        }
        Some(Self { tokens, pos: 0 })
    }

    fn parse_complete(mut self) -> Option<TypeRef> {
        let ty = self.parse_type()?;
        (self.pos == self.tokens.len()).then_some(ty)
    }

    fn peek(&self) -> Option<Token<'a>> {
        self.tokens.get(self.pos).copied()
    }

    fn next(&mut self) -> Option<Token<'a>> {
        let token = self.peek()?;
        self.pos += 1;
        Some(token)
    }

    fn eat(&mut self, punct: char) -> bool {
        if self.peek() == Some(Token::Punct(punct)) {
            self.pos += 1;
            true
        } else {
            false
        }
    }

    fn parse_type(&mut self) -> Option<TypeRef> {
        let base = match self.next()? {
            Token::Punct('?') => {
                if self.peek() == Some(Token::Word("extends")) {
                    self.pos += 1;
                    return Some(TypeRef::extends_wildcard(self.parse_type()?));
                }
                return match self.peek() {
                    Some(Token::Word(_)) => None,
                    _ => Some(TypeRef::Wildcard(None)),
                };
            }
            Token::Punct(_) => return None,
            Token::Word("void") => return Some(TypeRef::Void),
            Token::Word(word) => {
                if let Some(primitive) = Primitive::from_keyword(word) {
                    TypeRef::Primitive(primitive)
                } else if word.contains('.') {
                    let name = QualifiedName::parse(word)?;
                    let args = if self.eat('<') {
                        self.parse_args()?
                    } else {
                        Vec::new()
                    };
                    TypeRef::Declared { name, args }
                } else if is_identifier(word) {
                    TypeRef::Variable(word.to_string())
                } else {
                    return None;
                }
            }
        };
        let mut ty = base;
        while self.eat('[') {
            if !self.eat(']') {
                return None;
            }
            ty = TypeRef::Array(Box::new(ty));
        }
        Some(ty)
    }

    fn parse_args(&mut self) -> Option<Vec<TypeRef>> {
        let mut args = vec![self.parse_type()?];
        while self.eat(',') {
            args.push(self.parse_type()?);
        }
        self.eat('>').then_some(args)
    }
}
