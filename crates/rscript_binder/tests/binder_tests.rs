//! Binder integration tests.
//!
//! Tests the parse -> bind pipeline and verifies symbol creation and merging.

use bumpalo::Bump;
use rscript_ast::types::SymbolFlags;
use rscript_binder::{Binder, Declaration};
use rscript_parser::Parser;

/// Helper: parse and bind source, return the global names in declaration order.
fn global_names(source: &str) -> Vec<String> {
    let arena = Bump::new();
    let sf = Parser::new(&arena, "test.ts", source).parse_source_file();
    let mut binder = Binder::new();
    binder.bind_source_file(&sf);
    binder
        .globals()
        .iter()
        .map(|id| binder.symbol_name(id).to_string())
        .collect()
}

/// Helper: the binder's diagnostic codes for `source`.
fn diagnostic_codes(source: &str) -> Vec<u32> {
    let arena = Bump::new();
    let sf = Parser::new(&arena, "test.ts", source).parse_source_file();
    let mut binder = Binder::new();
    binder.bind_source_file(&sf);
    binder
        .take_diagnostics()
        .into_diagnostics()
        .iter()
        .map(|d| d.code)
        .collect()
}

// ============================================================================
// Symbol Creation
// ============================================================================

#[test]
fn test_bind_empty_file() {
    assert!(global_names("").is_empty());
}

#[test]
fn test_bind_each_declaration_kind() {
    let source = r#"
        interface User { id: number }
        type Id = string;
        class Service {}
        enum Color { Red }
        function load() {}
        const config = {};
        namespace Util {}
    "#;
    assert_eq!(
        global_names(source),
        vec!["User", "Id", "Service", "Color", "load", "config", "Util"]
    );
}

#[test]
fn test_bind_destructured_variables() {
    assert_eq!(
        global_names("const { a, b: [c, ...d] } = obj, e = 1;"),
        vec!["a", "c", "d", "e"]
    );
}

#[test]
fn test_function_bodies_are_not_entered() {
    assert_eq!(
        global_names("function outer() { const inner = 1; interface Local {} }"),
        vec!["outer"]
    );
}

#[test]
fn test_anonymous_default_exports_are_skipped() {
    assert!(global_names("export default class {}").is_empty());
    assert!(global_names("export default function () {}").is_empty());
}

#[test]
fn test_exported_flag() {
    let arena = Bump::new();
    let sf = Parser::new(&arena, "test.ts", "export const a = 1; const b = 2;").parse_source_file();
    let mut binder = Binder::new();
    binder.bind_source_file(&sf);
    let a = binder.resolve_name("a").and_then(|id| binder.get_symbol(id)).expect("a bound");
    let b = binder.resolve_name("b").and_then(|id| binder.get_symbol(id)).expect("b bound");
    assert!(a.is_exported());
    assert!(!b.is_exported());
    assert!(a.flags.contains(SymbolFlags::BLOCK_SCOPED_VARIABLE));
}

// ============================================================================
// Declaration Merging
// ============================================================================

#[test]
fn test_interfaces_merge() {
    let arena = Bump::new();
    let sf = Parser::new(&arena, "test.ts", "interface A { x: number }\ninterface A { y: string }")
        .parse_source_file();
    let mut binder = Binder::new();
    binder.bind_source_file(&sf);
    assert_eq!(binder.symbols().len(), 1);
    let symbol = &binder.symbols()[0];
    assert_eq!(symbol.declarations.len(), 2);
    assert!(symbol.declarations.iter().all(|d| matches!(d, Declaration::Interface(_))));
    assert!(binder.take_diagnostics().is_empty());
}

#[test]
fn test_allowed_merges_report_nothing() {
    assert!(diagnostic_codes("function f(a: string): void;\nfunction f(a: any) {}").is_empty());
    assert!(diagnostic_codes("class C {}\ninterface C { extra: number }").is_empty());
    assert!(diagnostic_codes("enum E { A }\nenum E { B = 1 }").is_empty());
    assert!(diagnostic_codes("type T = string;\nconst T = 1;").is_empty());
    assert!(diagnostic_codes("var v = 1;\nvar v = 2;").is_empty());
    assert!(diagnostic_codes("function N() {}\nnamespace N { export const x = 1; }").is_empty());
}

#[test]
fn test_conflicting_declarations() {
    assert_eq!(diagnostic_codes("let x = 1;\nlet x = 2;"), vec![2451]);
    assert_eq!(diagnostic_codes("const f = 1;\nfunction f() {}"), vec![2451]);
    assert_eq!(diagnostic_codes("type A = string;\ninterface A {}"), vec![2300]);
    assert_eq!(diagnostic_codes("class K {}\nclass K {}"), vec![2300]);
}

#[test]
fn test_duplicate_diagnostic_location() {
    let source = "type A = 1;\ntype A = 2;";
    let arena = Bump::new();
    let sf = Parser::new(&arena, "dup.ts", source).parse_source_file();
    let mut binder = Binder::new();
    binder.bind_source_file(&sf);
    let diagnostics = binder.take_diagnostics().into_diagnostics();
    assert_eq!(diagnostics.len(), 1);
    assert_eq!(diagnostics[0].file.as_deref(), Some("dup.ts"));
    assert_eq!(diagnostics[0].span.map(|s| s.start), source.rfind('A').map(|p| p as u32));
    assert_eq!(diagnostics[0].message_text, "Duplicate identifier 'A'.");
}

// ============================================================================
// Namespaces
// ============================================================================

#[test]
fn test_namespace_members_resolve() {
    let source = r#"
        namespace Api.V1 { export interface Request { url: string } }
        namespace Api { export type Method = "GET" | "POST"; }
    "#;
    let arena = Bump::new();
    let sf = Parser::new(&arena, "test.ts", source).parse_source_file();
    let mut binder = Binder::new();
    binder.bind_source_file(&sf);

    assert_eq!(binder.globals().len(), 1);
    let request = binder.resolve_qualified_name(&["Api", "V1", "Request"]).expect("request bound");
    assert_eq!(binder.symbol_name(request), "Request");
    assert!(binder.resolve_qualified_name(&["Api", "Method"]).is_some());
    assert!(binder.resolve_qualified_name(&["Api", "Request"]).is_none());
    assert!(binder.resolve_name("Request").is_none());

    let v1 = binder.resolve_qualified_name(&["Api", "V1"]).expect("v1 bound");
    let api = binder.resolve_name("Api");
    assert_eq!(binder.get_symbol(v1).and_then(|s| s.parent), api);
}

#[test]
fn test_ambient_module_names_are_quoted() {
    let arena = Bump::new();
    let sf = Parser::new(&arena, "test.ts", "declare module \"fs\" { export function readFile(): string; }")
        .parse_source_file();
    let mut binder = Binder::new();
    binder.bind_source_file(&sf);
    assert!(binder.resolve_name("fs").is_none());
    assert!(binder.resolve_qualified_name(&["\"fs\"", "readFile"]).is_some());
}

#[test]
fn test_global_augmentation_binds_globals() {
    assert_eq!(
        global_names("export {};\ndeclare global { interface Window { app: string } }\nconst x = 1;"),
        vec!["Window", "x"]
    );
}
