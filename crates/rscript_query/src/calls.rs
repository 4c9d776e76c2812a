//! Call-site and exported-function scanning.

use crate::declarations::{function_initializer, is_async};
use crate::query::find_all;
use rscript_ast::{CallExpression, Expression, ModifierFlags, Node, SourceFile, Statement};
use serde::Serialize;

/// A call to a named function.
#[derive(Debug, Clone, Serialize)]
pub struct FunctionCallRecord<'a> {
    pub name: String,
    #[serde(skip)]
    pub node: &'a CallExpression<'a>,
    /// Whether the outermost function declaration or variable statement
    /// around the call is exported. Locals inside an exported function do
    /// not reset it.
    pub is_exported: bool,
}

/// Every call to `name`, either bare (`name()`) or as a method
/// (`x.name()`), in document order.
pub fn find_function_calls<'a>(source_file: &'a SourceFile<'a>, name: &str) -> Vec<FunctionCallRecord<'a>> {
    let mut calls = Vec::new();
    collect_calls(Node::SourceFile(source_file), name, None, &mut calls);
    calls
}

/// `owner_exported` is `None` until the walk enters its first function
/// declaration or variable statement.
fn collect_calls<'a>(
    node: Node<'a>,
    name: &str,
    owner_exported: Option<bool>,
    calls: &mut Vec<FunctionCallRecord<'a>>,
) {
    let owner_exported = match (owner_exported, node) {
        (None, Node::Statement(Statement::FunctionDeclaration(_) | Statement::VariableStatement(_))) => {
            Some(node.modifier_flags().contains(ModifierFlags::EXPORT))
        }
        _ => owner_exported,
    };
    if let Some(call) = node.as_call_expression() {
        if callee_name(call.expression) == Some(name) {
            calls.push(FunctionCallRecord {
                name: name.to_string(),
                node: call,
                is_exported: owner_exported.unwrap_or(false),
            });
        }
    }
    for child in node.children() {
        collect_calls(child, name, owner_exported, calls);
    }
}

fn callee_name<'a>(callee: &'a Expression<'a>) -> Option<&'a str> {
    match callee {
        Expression::Identifier(id) => Some(id.text),
        Expression::PropertyAccessExpression(access) => Some(access.name.text),
        _ => None,
    }
}

/// An exported function declaration, or an exported variable initialized
/// with a function.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExportedFunction {
    pub name: String,
    pub is_async: bool,
}

/// The exported functions of `source_file`, in document order.
pub fn find_exported_functions(source_file: &SourceFile<'_>) -> Vec<ExportedFunction> {
    let mut functions = Vec::new();
    for node in find_all(Node::SourceFile(source_file), |n| n.as_statement().is_some()) {
        if !node.modifier_flags().contains(ModifierFlags::EXPORT) {
            continue;
        }
        match node.as_statement() {
            Some(Statement::FunctionDeclaration(function)) => {
                if let Some(name) = &function.name {
                    functions.push(ExportedFunction {
                        name: name.text.to_string(),
                        is_async: is_async(node),
                    });
                }
            }
            Some(Statement::VariableStatement(variables)) => {
                for declaration in variables.declaration_list.declarations {
                    let (Some(name), Some(function)) = (
                        declaration.name.as_identifier(),
                        declaration.initializer.and_then(function_initializer),
                    ) else {
                        continue;
                    };
                    functions.push(ExportedFunction {
                        name: name.text.to_string(),
                        is_async: is_async(function),
                    });
                }
            }
            _ => {}
        }
    }
    functions
}

#[cfg(test)]
mod tests {
    use super::*;
    use bumpalo::Bump;
    use rscript_parser::parse_source_file;

    const SOURCE: &str = r#"
        import { track } from "./analytics";

        export function load() {
            track("load");
        }

        function internal() {
            analytics.track("internal");
        }

        export const handler = async () => {
            const result = track("inner");
            return track(result);
        };

        track("top");
        tracker("not a match");
    "#;

    #[test]
    fn test_find_function_calls() {
        let arena = Bump::new();
        let sf = parse_source_file(&arena, "app.ts", SOURCE);
        let calls = find_function_calls(&sf, "track");
        let exported: Vec<_> = calls.iter().map(|c| c.is_exported).collect();
        assert_eq!(exported, vec![true, false, true, true, false]);
        assert!(calls.iter().all(|c| c.name == "track"));
        assert_eq!(calls[0].node.arguments.len(), 1);
    }

    #[test]
    fn test_locals_keep_the_exported_owner() {
        let arena = Bump::new();
        let sf = parse_source_file(
            &arena,
            "app.ts",
            "export function load() {\n    const r = track(1);\n    track(2);\n    let q = () => track(3);\n}\nfunction save() {\n    const s = track(4);\n}",
        );
        let exported: Vec<_> = find_function_calls(&sf, "track").iter().map(|c| c.is_exported).collect();
        assert_eq!(exported, vec![true, true, true, false]);
    }

    #[test]
    fn test_no_calls() {
        let arena = Bump::new();
        let sf = parse_source_file(&arena, "app.ts", "");
        assert!(find_function_calls(&sf, "track").is_empty());
    }

    #[test]
    fn test_find_exported_functions() {
        let arena = Bump::new();
        let sf = parse_source_file(
            &arena,
            "api.ts",
            "export async function a() {}\nexport const b = () => 1, c = 2;\nexport const d = async function () {};\nfunction e() {}\nexport default function () {}",
        );
        assert_eq!(
            find_exported_functions(&sf),
            vec![
                ExportedFunction { name: "a".into(), is_async: true },
                ExportedFunction { name: "b".into(), is_async: false },
                ExportedFunction { name: "d".into(), is_async: true },
            ]
        );
    }
}
