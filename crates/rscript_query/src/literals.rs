//! Literal value extraction.

use rscript_ast::Expression;
use serde::Serialize;

/// The value of a literal expression.
///
/// Serializes to the plain JSON value; `Null` and `Undefined` both become
/// `null`.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum LiteralValue {
    String(String),
    Number(f64),
    Boolean(bool),
    Null,
    /// The `undefined` identifier, distinct from "not a literal".
    Undefined,
}

impl LiteralValue {
    pub fn as_str(&self) -> Option<&str> {
        match self {
            LiteralValue::String(s) => Some(s),
            _ => None,
        }
    }
}

/// The literal value of `expr`, or `None` if it is not a literal.
pub fn literal_value(expr: &Expression<'_>) -> Option<LiteralValue> {
    match expr {
        Expression::StringLiteral(s) => Some(LiteralValue::String(s.text.to_string())),
        Expression::NoSubstitutionTemplateLiteral(t) => Some(LiteralValue::String(t.text.to_string())),
        Expression::NumericLiteral(n) => Some(LiteralValue::Number(n.value())),
        Expression::TrueKeyword(_) => Some(LiteralValue::Boolean(true)),
        Expression::FalseKeyword(_) => Some(LiteralValue::Boolean(false)),
        Expression::NullKeyword(_) => Some(LiteralValue::Null),
        Expression::Identifier(id) if id.text == "undefined" => Some(LiteralValue::Undefined),
        _ => None,
    }
}

/// The string elements of an array literal. Other elements are dropped.
pub fn string_array_values(expr: &Expression<'_>) -> Vec<String> {
    let Expression::ArrayLiteralExpression(array) = expr else {
        return Vec::new();
    };
    array
        .elements
        .iter()
        .filter_map(|element| match literal_value(element) {
            Some(LiteralValue::String(s)) => Some(s),
            _ => None,
        })
        .collect()
}

/// The literal elements of an array literal. Non-literal elements are dropped.
pub fn generic_array_values(expr: &Expression<'_>) -> Vec<LiteralValue> {
    let Expression::ArrayLiteralExpression(array) = expr else {
        return Vec::new();
    };
    array.elements.iter().filter_map(literal_value).collect()
}

#[cfg(test)]
mod tests {
    use super::*;
    use bumpalo::Bump;
    use rscript_ast::{Node, SyntaxKind};
    use rscript_parser::parse_source_file;

    /// Runs `f` on the initializer of the first variable in `source`.
    fn with_initializer<R>(source: &str, f: impl FnOnce(&Expression<'_>) -> R) -> R {
        let arena = Bump::new();
        let sf = parse_source_file(&arena, "test.ts", source);
        let node = crate::find_first(Node::SourceFile(&sf), |n| n.kind() == SyntaxKind::VariableDeclaration)
            .and_then(|n| n.as_variable_declaration())
            .and_then(|d| d.initializer)
            .expect("initializer");
        f(node)
    }

    #[test]
    fn test_literal_value_kinds() {
        assert_eq!(
            with_initializer("const a = 'hi';", literal_value),
            Some(LiteralValue::String("hi".into()))
        );
        assert_eq!(
            with_initializer("const a = `plain`;", literal_value),
            Some(LiteralValue::String("plain".into()))
        );
        assert_eq!(with_initializer("const a = 0x10;", literal_value), Some(LiteralValue::Number(16.0)));
        assert_eq!(with_initializer("const a = false;", literal_value), Some(LiteralValue::Boolean(false)));
        assert_eq!(with_initializer("const a = null;", literal_value), Some(LiteralValue::Null));
        assert_eq!(with_initializer("const a = undefined;", literal_value), Some(LiteralValue::Undefined));
        assert_eq!(with_initializer("const a = foo();", literal_value), None);
        assert_eq!(with_initializer("const a = `x${y}`;", literal_value), None);
    }

    #[test]
    fn test_string_array_values_drops_non_strings() {
        assert_eq!(
            with_initializer("const a = ['x', 1, 'y', z, null];", string_array_values),
            vec!["x".to_string(), "y".to_string()]
        );
        assert!(with_initializer("const a = 'x';", string_array_values).is_empty());
    }

    #[test]
    fn test_generic_array_values_keeps_null_and_undefined() {
        assert_eq!(
            with_initializer("const a = [1, call(), null, undefined, true];", generic_array_values),
            vec![
                LiteralValue::Number(1.0),
                LiteralValue::Null,
                LiteralValue::Undefined,
                LiteralValue::Boolean(true),
            ]
        );
    }
}
