//! Modifier and name inspection for declarations.

use rscript_ast::{Expression, ModifierFlags, Node, SourceFile, Statement, SyntaxKind};
use rscript_core::LineMap;

/// Whether `node` is a function declaration, function expression or arrow
/// function marked `async`.
pub fn is_async(node: Node<'_>) -> bool {
    matches!(
        node.kind(),
        SyntaxKind::FunctionDeclaration | SyntaxKind::FunctionExpression | SyntaxKind::ArrowFunction
    ) && node.modifier_flags().contains(ModifierFlags::ASYNC)
}

/// Whether `node` carries the modifier keyword `modifier`.
///
/// Always false for node kinds that cannot have modifiers and for kinds that
/// are not modifier keywords.
pub fn has_modifier(node: Node<'_>, modifier: SyntaxKind) -> bool {
    let flag = ModifierFlags::from_modifier_kind(modifier);
    if flag.is_empty() {
        return false;
    }
    node.modifiers().map_or(false, |modifiers| modifiers.contains(flag))
}

pub fn is_exported(node: Node<'_>) -> bool {
    has_modifier(node, SyntaxKind::ExportKeyword)
}

pub fn is_default_export(node: Node<'_>) -> bool {
    has_modifier(node, SyntaxKind::DefaultKeyword)
}

/// The declared name of a function declaration, class declaration or
/// variable declaration bound to a plain identifier.
pub fn declaration_name<'a>(node: Node<'a>) -> Option<&'a str> {
    match node {
        Node::Statement(Statement::FunctionDeclaration(f)) => f.name.as_ref().map(|name| name.text),
        Node::Statement(Statement::ClassDeclaration(c)) => c.name.as_ref().map(|name| name.text),
        Node::VariableDeclaration(d) => d.name.as_identifier().map(|name| name.text),
        _ => None,
    }
}

/// The 1-based line on which `node` starts.
pub fn line_of_node(node: Node<'_>, source_file: &SourceFile<'_>) -> u32 {
    LineMap::new(&source_file.text).line_number(node.range().pos)
}

/// The function an exported variable is initialized with, if any.
pub(crate) fn function_initializer<'a>(expr: &'a Expression<'a>) -> Option<Node<'a>> {
    match expr.skip_parentheses() {
        e @ (Expression::ArrowFunction(_) | Expression::FunctionExpression(_)) => Some(Node::Expression(e)),
        _ => None,
    }
}
