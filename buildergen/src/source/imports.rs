//! Import resolution.

use std::collections::{BTreeMap, BTreeSet};

use super::format::reindent;
use super::{SourceWriter, Token};
use crate::generator::{IndentStyle, LineEnding};
use crate::model::QualifiedName;

/// Decides how each class reference is spelled in one compilation unit.
///
/// References are processed in emission order. The first top-level class to
/// use a simple name claims it; later classes with the same simple name are
/// written fully qualified. Simple names of nested types visible in the class
/// body are never imported, since the nested type would shadow the import.
#[derive(Debug, Clone)]
pub struct ImportManager {
    package: String,
    unit_type: QualifiedName,
    shadowed: BTreeSet<String>,
    claimed: BTreeMap<String, QualifiedName>,
    imports: BTreeSet<String>,
}

impl ImportManager {
    /// Create a manager for the unit declaring `unit_type`.
    pub fn new<'a, I>(unit_type: &QualifiedName, visible_nested_types: I) -> Self
    where
        I: IntoIterator<Item = &'a QualifiedName>,
    {
        let unit_type = unit_type.top_level();
        let mut claimed = BTreeMap::new();
        claimed.insert(unit_type.simple_name().to_string(), unit_type.clone());
        Self {
            package: unit_type.package().to_string(),
            shadowed: visible_nested_types
                .into_iter()
                .map(|name| name.simple_name().to_string())
                .collect(),
            unit_type,
            claimed,
            imports: BTreeSet::new(),
        }
    }

    /// The spelling to use for `name`, recording an import if needed.
    pub fn shorten(&mut self, name: &QualifiedName) -> String {
        let top = name.top_level();
        if top == self.unit_type {
            return name.relative_name();
        }
        let simple = top.simple_name();
        if self.shadowed.contains(simple) {
            return name.to_string();
        }
        match self.claimed.get(simple) {
            Some(owner) if *owner == top => name.relative_name(),
            Some(_) => name.to_string(),
            None => {
                self.claimed.insert(simple.to_string(), top.clone());
                if top.package() != "java.lang" && top.package() != self.package {
                    self.imports.insert(top.to_string());
                }
                name.relative_name()
            }
        }
    }

    /// Imports recorded so far, sorted.
    pub fn imports(&self) -> impl Iterator<Item = &str> {
        self.imports.iter().map(String::as_str)
    }
}

/// One generated `.java` file.
#[derive(Debug, Clone)]
pub struct CompilationUnit {
    unit_type: QualifiedName,
    visible_nested_types: Vec<QualifiedName>,
    header_comment: Option<String>,
}

impl CompilationUnit {
    /// Create a unit declaring the given top-level class.
    pub fn new(unit_type: QualifiedName) -> Self {
        Self {
            unit_type,
            visible_nested_types: Vec::new(),
            header_comment: None,
        }
    }

    /// Record nested types that shadow imports inside the class body.
    pub fn with_visible_nested_types<I>(mut self, types: I) -> Self
    where
        I: IntoIterator<Item = QualifiedName>,
    {
        self.visible_nested_types.extend(types);
        self
    }

    /// Line comment placed before the package declaration.
    pub fn with_header_comment(mut self, comment: impl Into<String>) -> Self {
        self.header_comment = Some(comment.into());
        self
    }

    /// Resolve imports, then lay out and indent the file.
    pub fn render(&self, body: &SourceWriter, indent: IndentStyle, line_ending: LineEnding) -> String {
        let mut imports = ImportManager::new(&self.unit_type, &self.visible_nested_types);
        let mut text = String::new();
        for token in body.tokens() {
            match token {
                Token::Text(t) => text.push_str(t),
                Token::Type(name) => text.push_str(&imports.shorten(name)),
            }
        }

        let mut file = String::new();
        if let Some(comment) = &self.header_comment {
            file.push_str(&format!("// {}\n", comment));
        }
        let package = self.unit_type.package();
        if !package.is_empty() {
            file.push_str(&format!("package {};\n\n", package));
        }
        let mut any_import = false;
        for import in imports.imports() {
            file.push_str(&format!("import {};\n", import));
            any_import = true;
        }
        if any_import {
            file.push('\n');
        }
        file.push_str(&text);
        reindent(&file, indent, line_ending)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn unit_type() -> QualifiedName {
        QualifiedName::new("com.example", "Person_Builder")
    }

    fn name(text: &str) -> QualifiedName {
        QualifiedName::parse(text).unwrap()
    }

    fn no_nested() -> Vec<&'static QualifiedName> {
        Vec::new()
    }

    #[test]
    fn test_java_lang_and_same_package_are_not_imported() {
        let mut imports = ImportManager::new(&unit_type(), no_nested());
        assert_eq!(imports.shorten(&name("java.lang.String")), "String");
        assert_eq!(imports.shorten(&name("com.example.Person.Builder")), "Person.Builder");
        assert_eq!(imports.imports().count(), 0);
    }

    #[test]
    fn test_nested_types_import_their_top_level() {
        let mut imports = ImportManager::new(&unit_type(), no_nested());
        assert_eq!(imports.shorten(&name("java.util.Map.Entry")), "Map.Entry");
        assert_eq!(imports.shorten(&name("java.util.Map")), "Map");
        assert_eq!(imports.imports().collect::<Vec<_>>(), vec!["java.util.Map"]);
    }

    #[test]
    fn test_conflicting_simple_names_stay_qualified() {
        let mut imports = ImportManager::new(&unit_type(), no_nested());
        assert_eq!(imports.shorten(&name("java.util.List")), "List");
        assert_eq!(imports.shorten(&name("java.awt.List")), "java.awt.List");
        assert_eq!(imports.imports().collect::<Vec<_>>(), vec!["java.util.List"]);
    }

    #[test]
    fn test_own_nested_types_use_relative_names() {
        let value = unit_type().nested("Value");
        let mut imports = ImportManager::new(&unit_type(), [&value]);
        assert_eq!(imports.shorten(&value), "Person_Builder.Value");
    }

    #[test]
    fn test_visible_nested_names_shadow_imports() {
        let value = unit_type().nested("Value");
        let mut imports = ImportManager::new(&unit_type(), [&value]);
        assert_eq!(imports.shorten(&name("org.other.Value")), "org.other.Value");
        assert_eq!(imports.imports().count(), 0);
    }

    #[test]
    fn test_render_layout() {
        let mut body = SourceWriter::new();
        body.add_line("class {} {", &[&unit_type()]);
        body.add_line("private {} names;", &[&name("java.util.List")]);
        body.add_line("}", &[]);
        let unit = CompilationUnit::new(unit_type()).with_header_comment("Generated.");
        let text = unit.render(&body, IndentStyle::Spaces2, LineEnding::Lf);
        assert_eq!(
            text,
            "// Generated.\npackage com.example;\n\nimport java.util.List;\n\n\
             class Person_Builder {\n  private List names;\n}\n"
        );
    }
}
