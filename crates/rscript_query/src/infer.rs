//! Syntactic type inference.
//!
//! Both entry points here work from the tree alone: [`infer_type_from_type_node`]
//! renders a type annotation, [`infer_type_from_expression`] guesses the type of
//! a value expression. Their results are canonical type strings:
//!
//! - primitives are lowercase names;
//! - arrays end in `[]`;
//! - unions are sorted and joined with `" | "`;
//! - object shapes are written `{ a: T; b: U }`;
//! - generic references are written `Name<A, B>`.
//!
//! Note the two empty-object renderings: an empty type literal is `"{  }"`
//! while an empty object expression is `"{}"`.

use crate::query::find_first;
use indexmap::IndexMap;
use rscript_ast::{
    BinaryExpression, CallExpression, Expression, Node, ObjectLiteralElement, ObjectLiteralExpression,
    SourceFile, SyntaxKind, TypeElement, TypeNode,
};
use rustc_hash::FxHashSet;
use std::collections::BTreeSet;

const UNKNOWN: &str = "unknown";

// ============================================================================
// Type nodes
// ============================================================================

/// The canonical string for a type annotation.
///
/// Forms without a dedicated rendering fall back to their source text.
pub fn infer_type_from_type_node(type_node: &TypeNode<'_>, source_file: &SourceFile<'_>) -> String {
    TypeNodeRenderer { source_text: &source_file.text }.render(type_node)
}

struct TypeNodeRenderer<'s> {
    /// Text of the module the rendered nodes were parsed from.
    source_text: &'s str,
}

impl TypeNodeRenderer<'_> {
    fn render(&self, type_node: &TypeNode<'_>) -> String {
        match type_node {
            TypeNode::KeywordType(keyword) => match keyword_type_name(keyword.data.kind) {
                Some(name) => name.to_string(),
                None => self.source_text(type_node),
            },
            TypeNode::ArrayType(array) => format!("{}[]", self.render(array.element_type)),
            TypeNode::UnionType(union) => {
                let mut members: Vec<String> = union.types.iter().map(|t| self.render(t)).collect();
                members.sort();
                members.join(" | ")
            }
            TypeNode::IntersectionType(intersection) => intersection
                .types
                .iter()
                .map(|t| self.render(t))
                .collect::<Vec<_>>()
                .join(" & "),
            TypeNode::LiteralType(literal) => match literal.literal {
                Expression::StringLiteral(s) => format!("\"{}\"", s.text),
                Expression::NumericLiteral(n) => n.text.to_string(),
                Expression::TrueKeyword(_) => "true".to_string(),
                Expression::FalseKeyword(_) => "false".to_string(),
                // `-1` and other shapes keep their source text.
                _ => self.source_text(type_node),
            },
            TypeNode::TypeReference(reference) => {
                let name = reference.type_name.to_dotted_string();
                match reference.type_arguments {
                    Some(arguments) if !arguments.is_empty() => {
                        let arguments: Vec<String> = arguments.iter().map(|t| self.render(t)).collect();
                        format!("{}<{}>", name, arguments.join(", "))
                    }
                    _ => name,
                }
            }
            TypeNode::TypeLiteral(literal) => {
                let members: Vec<String> = literal
                    .members
                    .iter()
                    .filter_map(|member| {
                        let (name, type_node) = simple_property_signature(member)?;
                        Some(format!("{}: {}", name, self.render(type_node)))
                    })
                    .collect();
                format!("{{ {} }}", members.join("; "))
            }
            TypeNode::ParenthesizedType(inner) => self.render(inner.type_node),
            _ => self.source_text(type_node),
        }
    }

    fn source_text(&self, type_node: &TypeNode<'_>) -> String {
        self.source_text
            .get(type_node.data().range.to_range())
            .unwrap_or_default()
            .to_string()
    }
}

fn keyword_type_name(kind: SyntaxKind) -> Option<&'static str> {
    Some(match kind {
        SyntaxKind::StringKeyword => "string",
        SyntaxKind::NumberKeyword => "number",
        SyntaxKind::BooleanKeyword => "boolean",
        SyntaxKind::NullKeyword => "null",
        SyntaxKind::UndefinedKeyword => "undefined",
        SyntaxKind::VoidKeyword => "void",
        SyntaxKind::AnyKeyword => "any",
        SyntaxKind::UnknownKeyword => "unknown",
        SyntaxKind::NeverKeyword => "never",
        SyntaxKind::BigIntKeyword => "bigint",
        SyntaxKind::SymbolKeyword => "symbol",
        SyntaxKind::ObjectKeyword => "object",
        _ => return None,
    })
}

/// A property signature with an identifier or string name and a type.
fn simple_property_signature<'e, 'a>(member: &'e TypeElement<'a>) -> Option<(&'a str, &'a TypeNode<'a>)> {
    let TypeElement::PropertySignature(signature) = member else {
        return None;
    };
    Some((signature.name.simple_text()?, signature.type_annotation?))
}

/// The right-hand side of the first type alias named `name`, at any depth.
///
/// Interfaces are not considered.
pub fn find_type_alias<'a>(name: &str, source_file: &'a SourceFile<'a>) -> Option<&'a TypeNode<'a>> {
    find_first(Node::SourceFile(source_file), |node| {
        node.as_type_alias_declaration().map_or(false, |alias| alias.name.text == name)
    })
    .and_then(|node| node.as_type_alias_declaration())
    .map(|alias| alias.type_node)
}

/// The `name: type` pairs of an object type.
///
/// `source_text` is the text `type_node` was parsed from; members without a
/// dedicated rendering keep their slice of it. A reference is followed
/// through type aliases in `source_file`, and only when one is given. A type
/// that is not an object literal, or a reference that does not resolve to
/// one, gives an empty map.
pub fn parse_object_type<'a>(
    type_node: &'a TypeNode<'a>,
    source_text: &'a str,
    source_file: Option<&'a SourceFile<'a>>,
) -> IndexMap<String, String> {
    let mut seen = FxHashSet::default();
    parse_object_type_inner(type_node, source_text, source_file, &mut seen)
}

fn parse_object_type_inner<'a>(
    type_node: &'a TypeNode<'a>,
    source_text: &'a str,
    source_file: Option<&'a SourceFile<'a>>,
    seen: &mut FxHashSet<&'a str>,
) -> IndexMap<String, String> {
    match type_node {
        TypeNode::TypeReference(reference) => {
            let (Some(source_file), Some(name)) = (source_file, reference.type_name.as_identifier()) else {
                return IndexMap::new();
            };
            if !seen.insert(name.text) {
                return IndexMap::new();
            }
            match find_type_alias(name.text, source_file) {
                Some(resolved) => parse_object_type_inner(resolved, &source_file.text, Some(source_file), seen),
                None => IndexMap::new(),
            }
        }
        TypeNode::TypeLiteral(literal) => {
            let renderer = TypeNodeRenderer { source_text };
            literal
                .members
                .iter()
                .filter_map(simple_property_signature)
                .map(|(name, type_node)| (name.to_string(), renderer.render(type_node)))
                .collect()
        }
        _ => IndexMap::new(),
    }
}

/// `T` for `Promise<T>`, otherwise `type_node` itself.
pub fn unwrap_promise_type_node<'a>(type_node: &'a TypeNode<'a>) -> &'a TypeNode<'a> {
    if let TypeNode::TypeReference(reference) = type_node {
        let is_promise = reference
            .type_name
            .as_identifier()
            .map_or(false, |id| id.text == "Promise");
        if let (true, Some([argument])) = (is_promise, reference.type_arguments) {
            return argument;
        }
    }
    type_node
}

/// [`parse_object_type`] on the promised type of a `Promise<T>`.
pub fn parse_object_type_unwrapping_promise<'a>(
    type_node: &'a TypeNode<'a>,
    source_text: &'a str,
    source_file: Option<&'a SourceFile<'a>>,
) -> IndexMap<String, String> {
    parse_object_type(unwrap_promise_type_node(type_node), source_text, source_file)
}

// ============================================================================
// Expressions
// ============================================================================

/// A best-effort type for `expr`, or `"unknown"`.
pub fn infer_type_from_expression(expr: &Expression<'_>) -> String {
    try_infer_type_from_expression(expr).unwrap_or_else(|| UNKNOWN.to_string())
}

/// A best-effort type for `expr`, or `None` when nothing can be said.
///
/// Parentheses are not unwrapped: `(1)` is unresolved, so `c ? (1) : 'a'`
/// infers as `string`.
pub fn try_infer_type_from_expression(expr: &Expression<'_>) -> Option<String> {
    match expr {
        Expression::StringLiteral(_) => Some("string".to_string()),
        Expression::NumericLiteral(_) => Some("number".to_string()),
        Expression::TrueKeyword(_) | Expression::FalseKeyword(_) => Some("boolean".to_string()),
        Expression::NullKeyword(_) => Some("null".to_string()),
        Expression::Identifier(id) => infer_identifier(id.text),
        Expression::ArrayLiteralExpression(array) => Some(infer_array(array.elements)),
        Expression::ObjectLiteralExpression(object) => Some(infer_object(object)),
        Expression::NewExpression(new) => Some(
            match new.expression {
                Expression::Identifier(id) if id.text == "Date" => "Date",
                _ => "object",
            }
            .to_string(),
        ),
        // The asserted type is never consulted, `as const` included.
        Expression::AsExpression(assertion) => try_infer_type_from_expression(assertion.expression),
        Expression::ConditionalExpression(conditional) => merge_alternatives(
            try_infer_type_from_expression(conditional.when_true),
            try_infer_type_from_expression(conditional.when_false),
        ),
        Expression::BinaryExpression(binary) => infer_binary(binary),
        Expression::CallExpression(call) => infer_call(call),
        Expression::PrefixUnaryExpression(unary) => match unary.operator {
            SyntaxKind::ExclamationToken => Some("boolean".to_string()),
            SyntaxKind::PlusToken | SyntaxKind::MinusToken => Some("number".to_string()),
            _ => None,
        },
        Expression::TemplateExpression(_) | Expression::NoSubstitutionTemplateLiteral(_) => {
            Some("string".to_string())
        }
        Expression::SpreadElement(spread) => try_infer_type_from_expression(spread.expression),
        _ => None,
    }
}

/// Guess from an identifier's name alone. Substring checks, case-sensitive.
fn infer_identifier(name: &str) -> Option<String> {
    if name == "undefined" {
        Some("undefined".to_string())
    } else if ["Id", "Name", "Key"].iter().any(|part| name.contains(part)) {
        Some("string | null | undefined".to_string())
    } else if ["enabled", "is", "has"].iter().any(|part| name.contains(part)) {
        Some("boolean".to_string())
    } else {
        None
    }
}

fn infer_array(elements: &[Expression<'_>]) -> String {
    let types: BTreeSet<String> = elements
        .iter()
        .filter(|e| !matches!(e, Expression::OmittedExpression(_) | Expression::SpreadElement(_)))
        .map(infer_type_from_expression)
        .collect();
    if types.len() > 1 {
        let members: Vec<&str> = types.iter().map(String::as_str).collect();
        return format!("({})[]", members.join(" | "));
    }
    match types.first().map(String::as_str) {
        Some(primitive @ ("string" | "number" | "boolean")) => format!("{primitive}[]"),
        _ => "unknown[]".to_string(),
    }
}

fn infer_object(object: &ObjectLiteralExpression<'_>) -> String {
    let members: Vec<String> = object
        .properties
        .iter()
        .filter_map(|element| {
            let (name, ty) = match element {
                ObjectLiteralElement::PropertyAssignment(assignment) => (
                    assignment.name.simple_text()?,
                    try_infer_type_from_expression(assignment.initializer)?,
                ),
                ObjectLiteralElement::ShorthandPropertyAssignment(shorthand) => {
                    (shorthand.name.text, infer_identifier(shorthand.name.text)?)
                }
                _ => return None,
            };
            Some(format!("{name}: {ty}"))
        })
        .collect();
    if members.is_empty() {
        "{}".to_string()
    } else {
        format!("{{ {} }}", members.join("; "))
    }
}

/// Both branches of `a ? b : c` or `b || c`.
fn merge_alternatives(left: Option<String>, right: Option<String>) -> Option<String> {
    match (left, right) {
        (Some(left), Some(right)) if left == right => Some(left),
        (Some(left), Some(right)) => Some(format!("{left} | {right}")),
        (Some(one), None) | (None, Some(one)) => Some(one),
        (None, None) => None,
    }
}

fn infer_binary(binary: &BinaryExpression<'_>) -> Option<String> {
    match binary.operator_token.data.kind {
        SyntaxKind::BarBarToken => merge_alternatives(
            try_infer_type_from_expression(binary.left),
            try_infer_type_from_expression(binary.right),
        ),
        SyntaxKind::AmpersandAmpersandToken => try_infer_type_from_expression(binary.right),
        SyntaxKind::EqualsEqualsEqualsToken
        | SyntaxKind::ExclamationEqualsEqualsToken
        | SyntaxKind::LessThanToken
        | SyntaxKind::GreaterThanToken
        | SyntaxKind::LessThanEqualsToken
        | SyntaxKind::GreaterThanEqualsToken => Some("boolean".to_string()),
        SyntaxKind::PercentToken
        | SyntaxKind::PlusToken
        | SyntaxKind::MinusToken
        | SyntaxKind::AsteriskToken
        | SyntaxKind::SlashToken => Some("number".to_string()),
        _ => None,
    }
}

fn infer_call(call: &CallExpression<'_>) -> Option<String> {
    let known = match call.expression {
        Expression::PropertyAccessExpression(access) => match access.name.text {
            "filter" | "slice" => return try_infer_type_from_expression(access.expression),
            "toString" | "substr" => "string",
            "get" => "string | null",
            "now" | "random" => "number",
            _ => return None,
        },
        Expression::Identifier(callee) => match callee.text {
            "parseInt" | "parseFloat" | "Number" => "number",
            "String" => "string",
            "Boolean" => "boolean",
            _ => return None,
        },
        _ => return None,
    };
    Some(known.to_string())
}

/// The inferred type of every named or shorthand property, in order.
/// Properties that cannot be inferred map to `"unknown"`.
pub fn extract_properties_from_object_literal(object: &ObjectLiteralExpression<'_>) -> IndexMap<String, String> {
    object
        .properties
        .iter()
        .filter_map(|element| match element {
            ObjectLiteralElement::PropertyAssignment(assignment) => Some((
                assignment.name.simple_text()?.to_string(),
                infer_type_from_expression(assignment.initializer),
            )),
            ObjectLiteralElement::ShorthandPropertyAssignment(shorthand) => Some((
                shorthand.name.text.to_string(),
                infer_identifier(shorthand.name.text).unwrap_or_else(|| UNKNOWN.to_string()),
            )),
            _ => None,
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use bumpalo::Bump;
    use rscript_parser::parse_source_file;

    /// Infers the initializer of the single variable in `const x = <expr>;`.
    fn expr_type(expr: &str) -> String {
        let arena = Bump::new();
        let sf = parse_source_file(&arena, "t.ts", &format!("const x = {expr};"));
        let initializer = find_first(Node::SourceFile(&sf), |n| n.as_variable_declaration().is_some())
            .and_then(|n| n.as_variable_declaration())
            .and_then(|d| d.initializer)
            .expect("initializer");
        infer_type_from_expression(initializer)
    }

    /// Renders the annotation of `let x: <ty>;`.
    fn type_string(ty: &str) -> String {
        let arena = Bump::new();
        let sf = parse_source_file(&arena, "t.ts", &format!("let x: {ty};"));
        let annotation = find_first(Node::SourceFile(&sf), |n| n.as_variable_declaration().is_some())
            .and_then(|n| n.as_variable_declaration())
            .and_then(|d| d.type_annotation)
            .expect("annotation");
        infer_type_from_type_node(annotation, &sf)
    }

    #[test]
    fn test_keyword_types() {
        for keyword in ["string", "number", "boolean", "null", "undefined", "void", "any", "unknown", "never"] {
            assert_eq!(type_string(keyword), keyword);
        }
    }

    #[test]
    fn test_union_is_sorted() {
        assert_eq!(type_string("string | number | boolean"), "boolean | number | string");
        assert_eq!(type_string("number | string"), type_string("string | number"));
        assert_eq!(type_string("never | string"), "never | string");
    }

    #[test]
    fn test_structured_types() {
        assert_eq!(type_string("string[]"), "string[]");
        assert_eq!(type_string("A & B"), "A & B");
        assert_eq!(type_string("Record<string, number>"), "Record<string, number>");
        assert_eq!(type_string("Api.Response"), "Api.Response");
        assert_eq!(type_string("(string | null)[]"), "null | string[]");
        assert_eq!(type_string("'a' | 42 | true"), "\"a\" | 42 | true");
    }

    #[test]
    fn test_type_literal() {
        assert_eq!(type_string("{ a: string; 'b': number[]; c; [k: string]: any }"), "{ a: string; b: number[] }");
        assert_eq!(type_string("{}"), "{  }");
    }

    #[test]
    fn test_fallback_is_source_text() {
        assert_eq!(type_string("(a: string) => void"), "(a: string) => void");
        assert_eq!(type_string("-1"), "-1");
    }

    #[test]
    fn test_expression_literals() {
        assert_eq!(expr_type("'a'"), "string");
        assert_eq!(expr_type("1.5"), "number");
        assert_eq!(expr_type("true"), "boolean");
        assert_eq!(expr_type("null"), "null");
        assert_eq!(expr_type("undefined"), "undefined");
        assert_eq!(expr_type("`t${x}`"), "string");
    }

    #[test]
    fn test_arrays() {
        assert_eq!(expr_type("[1, 2, 3]"), "number[]");
        assert_eq!(expr_type("[]"), "unknown[]");
        assert_eq!(expr_type("[1, 'a']"), "(number | string)[]");
        assert_eq!(expr_type("[...rest]"), "unknown[]");
        assert_eq!(expr_type("[null]"), "unknown[]");
        assert_eq!(expr_type("[1, foo]"), "(number | unknown)[]");
        assert_eq!(expr_type("[foo, bar]"), "unknown[]");
        assert_eq!(expr_type("[, 1, ...rest]"), "number[]");
    }

    #[test]
    fn test_objects() {
        assert_eq!(expr_type("{ name: 'John', age: 30 }"), "{ name: string; age: number }");
        assert_eq!(expr_type("{}"), "{}");
        assert_eq!(expr_type("{ [k]: 1, f: call() }"), "{}");
    }

    #[test]
    fn test_operators() {
        assert_eq!(expr_type("a === b"), "boolean");
        assert_eq!(expr_type("a + b"), "number");
        assert_eq!(expr_type("'a' + 'b'"), "number");
        assert_eq!(expr_type("a && 'x'"), "string");
        assert_eq!(expr_type("a && b"), "unknown");
        assert_eq!(expr_type("a || 1"), "number");
        assert_eq!(expr_type("'a' || 1"), "string | number");
        assert_eq!(expr_type("!a"), "boolean");
        assert_eq!(expr_type("-a"), "number");
    }

    #[test]
    fn test_conditional_merge() {
        assert_eq!(expr_type("c ? 1 : 2"), "number");
        assert_eq!(expr_type("c ? 1 : 'a'"), "number | string");
        assert_eq!(expr_type("c ? foo : 'a'"), "string");
        assert_eq!(expr_type("c ? foo : bar"), "unknown");
    }

    #[test]
    fn test_parentheses_are_not_unwrapped() {
        assert_eq!(expr_type("(1)"), "unknown");
        assert_eq!(expr_type("c ? (1) : 'a'"), "string");
    }

    #[test]
    fn test_calls_and_new() {
        assert_eq!(expr_type("[1].filter(f)"), "number[]");
        assert_eq!(expr_type("x.toString()"), "string");
        assert_eq!(expr_type("params.get('a')"), "string | null");
        assert_eq!(expr_type("Date.now()"), "number");
        assert_eq!(expr_type("parseInt(s)"), "number");
        assert_eq!(expr_type("Boolean(s)"), "boolean");
        assert_eq!(expr_type("x.other()"), "unknown");
        assert_eq!(expr_type("new Date()"), "Date");
        assert_eq!(expr_type("new Map()"), "object");
    }

    #[test]
    fn test_identifier_heuristics() {
        assert_eq!(expr_type("userId"), "string | null | undefined");
        assert_eq!(expr_type("isReady"), "boolean");
        assert_eq!(expr_type("thisIsIt"), "boolean");
        assert_eq!(expr_type("Enabled"), "unknown");
        assert_eq!(expr_type("count"), "unknown");
    }

    #[test]
    fn test_as_expressions_ignore_the_type() {
        assert_eq!(expr_type("['a'] as const"), "string[]");
        assert_eq!(expr_type("value as string"), "unknown");
    }

    #[test]
    fn test_unwrap_promise_type_node() {
        let arena = Bump::new();
        let sf = parse_source_file(&arena, "t.ts", "let a: Promise<User>; let b: Promise<A, B>; let c: User;");
        let annotations: Vec<&TypeNode<'_>> = crate::find_all(Node::SourceFile(&sf), |n| n.as_variable_declaration().is_some())
            .into_iter()
            .filter_map(|n| n.as_variable_declaration().and_then(|d| d.type_annotation))
            .collect();
        assert_eq!(infer_type_from_type_node(unwrap_promise_type_node(annotations[0]), &sf), "User");
        assert_eq!(infer_type_from_type_node(unwrap_promise_type_node(annotations[1]), &sf), "Promise<A, B>");
        assert_eq!(infer_type_from_type_node(unwrap_promise_type_node(annotations[2]), &sf), "User");
    }

    #[test]
    fn test_merge_alternatives() {
        assert_eq!(merge_alternatives(None, None), None);
        assert_eq!(merge_alternatives(Some("a".into()), None), Some("a".into()));
        assert_eq!(merge_alternatives(None, Some("b".into())), Some("b".into()));
        assert_eq!(merge_alternatives(Some("a".into()), Some("b".into())), Some("a | b".into()));
    }
}
