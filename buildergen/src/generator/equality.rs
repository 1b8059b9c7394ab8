//! `equals`, `hashCode` and `toString` for the generated value classes.

use super::context::{field_ref, java_lang, java_util, objects, GenerationContext};
use super::tracking::{EnumConstant, UNSET_PROPERTIES};
use super::traits::Features;
use crate::model::{ParameterizedType, Primitive, QualifiedName, TypeRef};
use crate::source::{Emit, SourceWriter, StringLiteral, Wildcards};

/// Name of the static Guava joiner used by `Value.toString()`.
pub const COMMA_JOINER: &str = "COMMA_JOINER";

/// Locals declared by `equals(Object)`.
const EQUALS_LOCALS: &[&str] = &["obj", "other"];

/// Locals declared by the `StringBuilder` form of `toString()`.
const STRING_BUILDER_LOCALS: &[&str] = &["result", "separator"];

/// How a stored field is compared.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum FieldKind {
    /// A primitive, compared with `==` (floats by bit pattern).
    Primitive(Primitive),
    /// A reference that is never null.
    NonNull,
    /// A reference that may be null.
    Nullable,
}

impl FieldKind {
    /// Kind of a field of the given type.
    pub fn of(ty: &TypeRef, nullable: bool) -> Self {
        match ty.as_primitive() {
            Some(primitive) => FieldKind::Primitive(primitive),
            None if nullable => FieldKind::Nullable,
            None => FieldKind::NonNull,
        }
    }

    /// Kind of the same field on a partial, where references may be unset.
    pub fn in_partial(self) -> Self {
        match self {
            FieldKind::NonNull => FieldKind::Nullable,
            other => other,
        }
    }

    /// Whether the field may hold null.
    pub fn is_nullable(self) -> bool {
        self == FieldKind::Nullable
    }
}

/// Boolean expression that is true when two field values differ.
pub struct Differs<'a> {
    pub kind: FieldKind,
    pub lhs: &'a str,
    pub rhs: &'a str,
    pub features: Features,
}

impl Emit for Differs<'_> {
    fn emit(&self, code: &mut SourceWriter) {
        let (lhs, rhs) = (&self.lhs, &self.rhs);
        match self.kind {
            FieldKind::Primitive(p) if p.is_floating_point() => {
                let (class, method) = bit_pattern(p);
                code.add(
                    "{}.{}({}) != {}.{}({})",
                    &[&class, &method, lhs, &class, &method, rhs],
                );
            }
            FieldKind::Primitive(_) => {
                code.add("{} != {}", &[lhs, rhs]);
            }
            _ if self.features.has_objects() => {
                code.add("!{}.equals({}, {})", &[&objects(), lhs, rhs]);
            }
            FieldKind::NonNull => {
                code.add("!{}.equals({})", &[lhs, rhs]);
            }
            FieldKind::Nullable => {
                code.add(
                    "({} != {} && ({} == null || !{}.equals({})))",
                    &[lhs, rhs, lhs, lhs, rhs],
                );
            }
        }
    }
}

/// Boolean expression that is true when two field values are equal.
///
/// Only used where `java.util.Objects` is available.
struct Same<'a> {
    kind: FieldKind,
    lhs: &'a str,
    rhs: &'a str,
}

impl Emit for Same<'_> {
    fn emit(&self, code: &mut SourceWriter) {
        let (lhs, rhs) = (&self.lhs, &self.rhs);
        match self.kind {
            FieldKind::Primitive(p) if p.is_floating_point() => {
                let (class, method) = bit_pattern(p);
                code.add(
                    "{}.{}({}) == {}.{}({})",
                    &[&class, &method, lhs, &class, &method, rhs],
                );
            }
            FieldKind::Primitive(_) => {
                code.add("{} == {}", &[lhs, rhs]);
            }
            _ => {
                code.add("{}.equals({}, {})", &[&objects(), lhs, rhs]);
            }
        }
    }
}

fn bit_pattern(primitive: Primitive) -> (QualifiedName, &'static str) {
    match primitive {
        Primitive::Float => (java_lang("Float"), "floatToIntBits"),
        _ => (java_lang("Double"), "doubleToLongBits"),
    }
}

/// A field as seen by the renderers.
pub struct RenderedField<'a> {
    /// Field name
    pub field: &'a str,
    /// Label in `toString()`
    pub label: &'a str,
    /// Comparison kind
    pub kind: FieldKind,
    /// Tracking constant, for REQUIRED properties
    pub tracked: Option<EnumConstant<'a>>,
}

/// Whether `Value.toString()` uses the Guava comma joiner.
///
/// `Joiner.join` needs at least two arguments to pick the varargs overload.
pub fn needs_comma_joiner(features: &Features, fields: &[RenderedField<'_>]) -> bool {
    features.guava && fields.len() >= 2 && fields.iter().any(|f| f.kind.is_nullable())
}

/// Declare the static comma joiner.
pub fn add_comma_joiner(code: &mut SourceWriter) {
    let joiner = QualifiedName::new("com.google.common.base", "Joiner");
    code.add_line(
        "private static final {} {} = {}.on(\", \").skipNulls();",
        &[&joiner, &COMMA_JOINER, &joiner],
    );
}

/// `equals(Object)` comparing every field, and the unset set if requested.
pub fn add_equals(
    code: &mut SourceWriter,
    ctx: &GenerationContext<'_>,
    class: &ParameterizedType,
    fields: &[RenderedField<'_>],
    include_unset: bool,
) {
    let wildcards = Wildcards(class);
    code.add_line("@Override", &[]);
    code.add_line("public boolean equals({} obj) {", &[&java_lang("Object")]);
    code.add_line("if (!(obj instanceof {})) {", &[&class.name]);
    code.add_line("return false;", &[]);
    code.add_line("}", &[]);
    code.add_line("{} other = ({}) obj;", &[&wildcards, &wildcards]);

    let this_fields: Vec<String> = fields
        .iter()
        .map(|f| field_ref(f.field, EQUALS_LOCALS))
        .collect();
    let other_fields: Vec<String> = fields.iter().map(|f| format!("other.{}", f.field)).collect();
    let unset_other = format!("other.{}", UNSET_PROPERTIES);
    if ctx.features.has_objects() {
        let mut clauses: Vec<Same<'_>> = fields
            .iter()
            .zip(this_fields.iter().zip(&other_fields))
            .map(|(f, (this, other))| Same {
                kind: f.kind,
                lhs: this,
                rhs: other,
            })
            .collect();
        if include_unset {
            clauses.push(Same {
                kind: FieldKind::NonNull,
                lhs: UNSET_PROPERTIES,
                rhs: &unset_other,
            });
        }
        if clauses.is_empty() {
            code.add_line("return true;", &[]);
        } else {
            for (i, clause) in clauses.iter().enumerate() {
                let prefix = if i == 0 { "return " } else { "    && " };
                let suffix = if i + 1 == clauses.len() { ";" } else { "" };
                code.add_line("{}{}{}", &[&prefix, clause, &suffix]);
            }
        }
    } else {
        for (f, (this, other)) in fields.iter().zip(this_fields.iter().zip(&other_fields)) {
            let differs = Differs {
                kind: f.kind,
                lhs: this,
                rhs: other,
                features: ctx.features,
            };
            code.add_line("if ({}) {", &[&differs]);
            code.add_line("return false;", &[]);
            code.add_line("}", &[]);
        }
        if include_unset {
            code.add_line("return {}.equals({});", &[&UNSET_PROPERTIES, &unset_other]);
        } else {
            code.add_line("return true;", &[]);
        }
    }
    code.add_line("}", &[]);
}

/// `hashCode()` combining every field in order.
pub fn add_hash_code(
    code: &mut SourceWriter,
    ctx: &GenerationContext<'_>,
    fields: &[RenderedField<'_>],
    include_unset: bool,
) {
    let mut names: Vec<&str> = fields.iter().map(|f| f.field).collect();
    if include_unset {
        names.push(UNSET_PROPERTIES);
    }
    let names = names.join(", ");
    code.add_line("@Override", &[]);
    code.add_line("public int hashCode() {", &[]);
    if ctx.features.has_objects() {
        code.add_line("return {}.hash({});", &[&objects(), &names]);
    } else {
        code.add_line(
            "return {}.hashCode(new {}[] {{}});",
            &[&java_util("Arrays"), &java_lang("Object"), &names],
        );
    }
    code.add_line("}", &[]);
}

/// `toString()` of the value class: `Person{name=..., age=...}`.
///
/// Nullable fields are left out while null.
pub fn add_value_to_string(
    code: &mut SourceWriter,
    ctx: &GenerationContext<'_>,
    fields: &[RenderedField<'_>],
) {
    let type_name = ctx.source_name().simple_name();
    code.add_line("@Override", &[]);
    code.add_line("public {} toString() {", &[&java_lang("String")]);
    if fields.is_empty() {
        code.add_line("return {};", &[&StringLiteral(&format!("{}{{}}", type_name))]);
    } else if !fields.iter().any(|f| f.kind.is_nullable()) {
        for (i, f) in fields.iter().enumerate() {
            let label = if i == 0 {
                format!("{}{{{}=", type_name, f.label)
            } else {
                format!(", {}=", f.label)
            };
            let prefix = if i == 0 { "return " } else { "    + " };
            code.add_line("{}{} + {}", &[&prefix, &StringLiteral(&label), &f.field]);
        }
        code.add_line("    + \"}\";", &[]);
    } else if needs_comma_joiner(&ctx.features, fields) {
        code.add_line("return {}", &[&StringLiteral(&format!("{}{{", type_name))]);
        code.add_line("    + {}.join(", &[&COMMA_JOINER]);
        for (i, f) in fields.iter().enumerate() {
            let label = StringLiteral(&format!("{}=", f.label));
            let separator = if i + 1 == fields.len() { ")" } else { "," };
            if f.kind.is_nullable() {
                code.add_line(
                    "        ({} != null ? {} + {} : null){}",
                    &[&f.field, &label, &f.field, &separator],
                );
            } else {
                code.add_line("        {} + {}{}", &[&label, &f.field, &separator]);
            }
        }
        code.add_line("    + \"}\";", &[]);
    } else {
        add_string_builder_body(code, &format!("{}{{", type_name), fields, |f, field| {
            f.kind.is_nullable().then(|| NonNullCheck(field))
        });
    }
    code.add_line("}", &[]);
}

/// `toString()` of the partial: `partial Person{...}`, showing set fields only.
pub fn add_partial_to_string(
    code: &mut SourceWriter,
    ctx: &GenerationContext<'_>,
    fields: &[RenderedField<'_>],
) {
    let type_name = ctx.source_name().simple_name();
    code.add_line("@Override", &[]);
    code.add_line("public {} toString() {", &[&java_lang("String")]);
    if fields.is_empty() {
        code.add_line(
            "return {};",
            &[&StringLiteral(&format!("partial {}{{}}", type_name))],
        );
    } else {
        add_string_builder_body(code, &format!("partial {}{{", type_name), fields, |f, field| {
            match f.tracked {
                Some(constant) => Some(Condition::IsSet(constant)),
                None => f.kind.is_nullable().then(|| Condition::NonNull(field)),
            }
        });
    }
    code.add_line("}", &[]);
}

struct NonNullCheck(String);

impl Emit for NonNullCheck {
    fn emit(&self, code: &mut SourceWriter) {
        code.add("{} != null", &[&self.0]);
    }
}

enum Condition<'a> {
    IsSet(EnumConstant<'a>),
    NonNull(String),
}

impl Emit for Condition<'_> {
    fn emit(&self, code: &mut SourceWriter) {
        match self {
            Condition::IsSet(constant) => {
                code.add("!{}.contains({})", &[&UNSET_PROPERTIES, constant]);
            }
            Condition::NonNull(field) => NonNullCheck(field.clone()).emit(code),
        }
    }
}

/// Appends each field to a `StringBuilder`, guarding the ones `condition`
/// returns a check for.
fn add_string_builder_body<'f, C, F>(
    code: &mut SourceWriter,
    opening: &str,
    fields: &'f [RenderedField<'f>],
    condition: F,
) where
    C: Emit,
    F: Fn(&'f RenderedField<'f>, String) -> Option<C>,
{
    let string_builder = java_lang("StringBuilder");
    code.add_line(
        "{} result = new {}({});",
        &[&string_builder, &string_builder, &StringLiteral(opening)],
    );
    code.add_line("{} separator = \"\";", &[&java_lang("String")]);
    for f in fields {
        let label = StringLiteral(&format!("{}=", f.label));
        let field = field_ref(f.field, STRING_BUILDER_LOCALS);
        match condition(f, field.clone()) {
            Some(check) => {
                code.add_line("if ({}) {", &[&check]);
                code.add_line(
                    "result.append(separator).append({}).append({});",
                    &[&label, &field],
                );
                code.add_line("separator = \", \";", &[]);
                code.add_line("}", &[]);
            }
            None => {
                code.add_line(
                    "result.append(separator).append({}).append({});",
                    &[&label, &field],
                );
                code.add_line("separator = \", \";", &[]);
            }
        }
    }
    code.add_line("return result.append(\"}\").toString();", &[]);
}
