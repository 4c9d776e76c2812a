//! Query integration tests.
//!
//! Parses realistic module sources and runs the tree queries, export
//! analysis and object-literal readers against them.

use bumpalo::Bump;
use rscript_ast::node::*;
use rscript_ast::node_ref::Node;
use rscript_ast::SyntaxKind;
use rscript_parser::parse_source_file;
use rscript_query::*;
use serde_json::json;

/// Helper: export summary of `source`.
fn exports_of(source: &str) -> ExportSummary {
    let arena = Bump::new();
    let sf = parse_source_file(&arena, "module.ts", source);
    analyze_exports(&sf)
}

/// Helper: the object literal initializing the first variable named `name`.
fn object_named<'a>(sf: &'a SourceFile<'a>, name: &str) -> &'a ObjectLiteralExpression<'a> {
    find_first(Node::SourceFile(sf), |n| {
        n.as_variable_declaration()
            .and_then(|d| d.name.as_identifier())
            .map_or(false, |id| id.text == name)
    })
    .and_then(|n| n.as_variable_declaration())
    .and_then(|d| d.initializer)
    .and_then(|init| match init.skip_parentheses() {
        Expression::ObjectLiteralExpression(object) => Some(object),
        _ => None,
    })
    .unwrap_or_else(|| panic!("{name} is not initialized with an object literal"))
}

// ============================================================================
// Export Analysis
// ============================================================================

#[test]
fn test_route_module_exports() {
    let source = r#"
        import { db } from "./db";

        export interface Params { id: string }
        export type Result = { ok: boolean };
        export const config = { runtime: "edge" };

        export async function loader() {
            return db.find();
        }

        export default function Page() {
            return null;
        }
    "#;
    let summary = exports_of(source);
    assert_eq!(summary.export_kind, ExportKind::Both);
    assert_eq!(summary.named_export_names, vec!["Params", "Result", "config", "loader"]);
    assert!(summary.has_default_export);
}

#[test]
fn test_export_clause_uses_exported_names() {
    let summary = exports_of("const a = 1, b = 2;\nexport { a, b as renamed };\nexport { a };");
    assert_eq!(summary.export_kind, ExportKind::Named);
    assert_eq!(summary.named_export_names, vec!["a", "renamed"]);
}

#[test]
fn test_re_exports_count_as_named() {
    let star = exports_of("export * from './other';");
    assert_eq!(star.export_kind, ExportKind::Named);
    assert!(star.named_export_names.is_empty());

    let namespace = exports_of("export * as utils from './utils';");
    assert_eq!(namespace.named_export_names, vec!["utils"]);
}

#[test]
fn test_default_expression_and_export_equals() {
    assert_eq!(exports_of("export default { a: 1 };").export_kind, ExportKind::Default);
    assert_eq!(exports_of("const x = 1;\nexport = x;").export_kind, ExportKind::None);
}

#[test]
fn test_module_without_exports() {
    let summary = exports_of("import './side-effect';\nconst local = 1;");
    assert_eq!(summary, ExportSummary::default());
}

#[test]
fn test_summary_serializes_lowercase_kind() {
    let value = serde_json::to_value(exports_of("export const a = 1;\nexport default a;")).expect("serializes");
    assert_eq!(
        value,
        json!({
            "export_kind": "both",
            "named_export_names": ["a"],
            "has_default_export": true,
        })
    );
}

#[test]
fn test_batch_matches_single_file_analysis() {
    let files = vec![
        ("a.ts".to_string(), "export const a = 1;".to_string()),
        ("b.ts".to_string(), "export default class B {}".to_string()),
    ];
    let results = analyze_exports_batch(&files, &BatchOptions::default());
    assert_eq!(results[0], ("a.ts".to_string(), exports_of("export const a = 1;")));
    assert_eq!(results[1].1.export_kind, ExportKind::Default);
}

// ============================================================================
// Object Literals
// ============================================================================

const PAGE_CONFIG: &str = r#"
    const KEY = "dynamic";
    export const config = {
        title: "Dashboard",
        revalidate: 60,
        "cache-control": "no-store",
        [KEY]: true,
        regions: ["iad1", "sfo1"],
        auth: { required: true },
        middleware: withAuth(handler),
        ...defaults,
        dynamic,
        render() {},
    };
"#;

#[test]
fn test_read_page_config() {
    let arena = Bump::new();
    let sf = parse_source_file(&arena, "page.ts", PAGE_CONFIG);
    let config = object_named(&sf, "config");
    let props = read_object_literal(config, &sf);

    let keys: Vec<_> = props.iter().map(|p| p.key.as_str()).collect();
    assert_eq!(
        keys,
        vec!["title", "revalidate", "cache-control", "KEY", "regions", "auth", "middleware"]
    );
    assert!(props[3].is_computed);
    assert!(!props[0].is_computed);
    assert_eq!(
        props[4].raw_value,
        RawValue::Array(vec![LiteralValue::String("iad1".into()), LiteralValue::String("sfo1".into())])
    );
    assert_eq!(props[5].raw_value, RawValue::Object);
    assert_eq!(props[6].raw_value, RawValue::Absent);
    assert!(matches!(props[6].value_node, Expression::CallExpression(_)));
}

#[test]
fn test_config_lookups() {
    let arena = Bump::new();
    let sf = parse_source_file(&arena, "page.ts", PAGE_CONFIG);
    let config = object_named(&sf, "config");

    assert_eq!(get_property_value(config, "revalidate"), Some(LiteralValue::Number(60.0)));
    assert_eq!(get_property_value(config, "cache-control"), None);
    assert_eq!(get_property_value(config, "middleware"), None);
    assert_eq!(get_boolean_property(config, "title"), None);

    assert!(has_property(config, "dynamic"));
    assert!(has_property(config, "render"));
    assert!(!has_property(config, "defaults"));
    assert!(!has_property(config, "cache-control"));
}

#[test]
fn test_parenthesized_object_initializer() {
    let arena = Bump::new();
    let sf = parse_source_file(&arena, "flags.ts", "const flags = ({ beta: false, stable: true });");
    let flags = object_named(&sf, "flags");
    assert_eq!(get_boolean_property(flags, "beta"), Some(false));
    assert_eq!(get_boolean_property(flags, "stable"), Some(true));
}

// ============================================================================
// Literals
// ============================================================================

#[test]
fn test_array_values_skip_non_literals() {
    let arena = Bump::new();
    let sf = parse_source_file(
        &arena,
        "list.ts",
        "const list = ['a', 1, name, true, null, undefined, `t`, ...rest];",
    );
    let list = find_first(Node::SourceFile(&sf), |n| n.as_variable_declaration().is_some())
        .and_then(|n| n.as_variable_declaration())
        .and_then(|d| d.initializer)
        .expect("initializer");

    assert_eq!(string_array_values(list), vec!["a", "t"]);
    let values = generic_array_values(list);
    assert_eq!(
        serde_json::to_value(&values).expect("serializes"),
        json!(["a", 1.0, true, null, null, "t"])
    );
}

// ============================================================================
// Declarations
// ============================================================================

#[test]
fn test_declaration_queries() {
    let source = "export async function load() {}\nexport default class App {}\nconst helper = () => 1;\n";
    let arena = Bump::new();
    let sf = parse_source_file(&arena, "app.ts", source);
    let statements: Vec<Node<'_>> = sf.statements.iter().map(Node::Statement).collect();

    assert!(is_async(statements[0]));
    assert!(is_exported(statements[0]));
    assert!(!is_default_export(statements[0]));
    assert!(has_modifier(statements[0], SyntaxKind::AsyncKeyword));
    assert_eq!(declaration_name(statements[0]), Some("load"));

    assert!(is_default_export(statements[1]));
    assert_eq!(declaration_name(statements[1]), Some("App"));

    assert!(!is_exported(statements[2]));
    assert_eq!(line_of_node(statements[2], &sf), 3);

    let helper = find_first(statements[2], |n| n.kind() == SyntaxKind::VariableDeclaration).expect("declaration");
    assert_eq!(declaration_name(helper), Some("helper"));
}

#[test]
fn test_find_all_counts_identifiers() {
    let arena = Bump::new();
    let sf = parse_source_file(&arena, "ids.ts", "const a = b + c;\nfunction d(e) { return a; }");
    let identifiers = find_all(Node::SourceFile(&sf), |n| n.kind() == SyntaxKind::Identifier);
    let names: Vec<_> = identifiers.iter().map(|n| n.source_text(&sf)).collect();
    assert_eq!(names, vec!["a", "b", "c", "d", "e", "a"]);
}

// ============================================================================
// Calls
// ============================================================================

#[test]
fn test_calls_in_exported_handlers() {
    let source = r#"
        export const GET = async (req) => json(await getSession(req));

        export async function POST(req) {
            const session = getSession(req);
            return json(session);
        }

        function audit() {
            log.getSession();
        }
    "#;
    let arena = Bump::new();
    let sf = parse_source_file(&arena, "route.ts", source);
    let calls = find_function_calls(&sf, "getSession");
    let exported: Vec<_> = calls.iter().map(|c| c.is_exported).collect();
    assert_eq!(exported, vec![true, true, false]);
    assert_eq!(
        serde_json::to_value(&calls[0]).expect("serializes"),
        json!({ "name": "getSession", "is_exported": true })
    );

    assert_eq!(
        find_exported_functions(&sf),
        vec![
            ExportedFunction { name: "GET".into(), is_async: true },
            ExportedFunction { name: "POST".into(), is_async: true },
        ]
    );
}
