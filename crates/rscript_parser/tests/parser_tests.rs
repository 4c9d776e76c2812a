//! Parser integration tests.
//!
//! Verifies tree shapes, node ranges, error recovery and the nesting guard.

use bumpalo::Bump;
use rscript_ast::node::*;
use rscript_ast::syntax_kind::SyntaxKind;
use rscript_ast::types::{ModifierFlags, NodeFlags};
use rscript_parser::{parse_source_file, try_parse_source_file, ParseError, Parser, ParserOptions};

/// Helper: parse source text and return the number of top-level statements.
fn parse(source: &str) -> usize {
    let arena = Bump::new();
    let parser = Parser::new(&arena, "test.ts", source);
    let sf = parser.parse_source_file();
    sf.statements.len()
}

/// Helper: assert that parsing produces the expected number of top-level statements.
fn assert_statement_count(source: &str, expected: usize) {
    assert_eq!(parse(source), expected, "source: {}", source);
}

/// Helper: assert that `source` parses without diagnostics.
fn assert_clean(source: &str) {
    let arena = Bump::new();
    let sf = parse_source_file(&arena, "test.ts", source);
    assert!(
        sf.parse_diagnostics.is_empty(),
        "source: {}\ndiagnostics: {:?}",
        source,
        sf.parse_diagnostics
    );
}

/// Helper: the kinds of the top-level statements.
fn statement_kinds(source: &str) -> Vec<SyntaxKind> {
    let arena = Bump::new();
    let sf = parse_source_file(&arena, "test.ts", source);
    sf.statements.iter().map(|s| s.kind()).collect()
}

/// Helper: the initializer of the first declaration in `const x = <expr>`.
fn with_initializer<R>(source: &str, f: impl FnOnce(&Expression<'_>) -> R) -> R {
    let arena = Bump::new();
    let sf = parse_source_file(&arena, "test.ts", source);
    let Statement::VariableStatement(stmt) = &sf.statements[0] else {
        panic!("expected a variable statement in {}", source);
    };
    let init = stmt.declaration_list.declarations[0]
        .initializer
        .expect("declaration has an initializer");
    f(init)
}

// ============================================================================
// Variable Declarations
// ============================================================================

#[test]
fn test_parse_const_declaration() {
    assert_statement_count("const x = 42;", 1);
}

#[test]
fn test_parse_multiple_declarations() {
    assert_statement_count("const a = 1; let b = 2; var c = 3;", 3);
}

#[test]
fn test_declaration_list_flags() {
    let arena = Bump::new();
    let sf = parse_source_file(&arena, "test.ts", "const a = 1; let b = 2; var c = 3;");
    let flags: Vec<NodeFlags> = sf
        .statements
        .iter()
        .map(|s| match s {
            Statement::VariableStatement(v) => v.declaration_list.data.flags,
            _ => panic!("expected variable statement"),
        })
        .collect();
    assert!(flags[0].contains(NodeFlags::CONST));
    assert!(flags[1].contains(NodeFlags::LET));
    assert!(!flags[2].intersects(NodeFlags::CONST | NodeFlags::LET));
}

#[test]
fn test_declaration_range_covers_statement() {
    let source = "export const config = { a: 1 };";
    let arena = Bump::new();
    let sf = parse_source_file(&arena, "test.ts", source);
    let data = sf.statements[0].data();
    assert_eq!(data.range.pos, 0);
    assert_eq!(data.range.end as usize, source.len());
    assert!(data.modifier_flags.contains(ModifierFlags::EXPORT));
}

#[test]
fn test_destructuring_declarations() {
    assert_clean("const { a, b: [c, , d = 1], ...rest } = obj;");
    assert_clean("let [x, ...ys] = list;");
}

#[test]
fn test_let_as_identifier() {
    assert_eq!(statement_kinds("let;"), vec![SyntaxKind::ExpressionStatement]);
}

// ============================================================================
// Functions and Classes
// ============================================================================

#[test]
fn test_parse_function_with_params() {
    assert_clean("function add(a: number, b = 2, ...rest: number[]): number { return a + b; }");
}

#[test]
fn test_parse_async_and_generator_functions() {
    assert_clean("async function fetchData() { return await fetch('url'); }");
    assert_clean("function* gen() { yield 1; yield* other(); }");
}

#[test]
fn test_overload_signatures() {
    assert_eq!(
        statement_kinds("function f(a: string): void;\nfunction f(a: any) {}"),
        vec![SyntaxKind::FunctionDeclaration, SyntaxKind::FunctionDeclaration]
    );
}

#[test]
fn test_parse_class_with_members() {
    let source = r#"
        @Component({ selector: "app" })
        export abstract class Foo<T> extends Base<T> implements A, B {
            static count = 0;
            private readonly name!: string;
            [key: string]: any;
            constructor(public value: T) { super(); }
            get size(): number { return 1; }
            set size(v: number) {}
            async *items() {}
            abstract run(): void;
            static { Foo.count = 1; }
        }
    "#;
    let arena = Bump::new();
    let sf = parse_source_file(&arena, "test.ts", source);
    assert!(sf.parse_diagnostics.is_empty(), "{:?}", sf.parse_diagnostics);
    let Statement::ClassDeclaration(class) = &sf.statements[0] else {
        panic!("expected class");
    };
    assert_eq!(class.decorators.len(), 1);
    assert_eq!(class.heritage_clauses.len(), 2);
    assert!(class.data.modifier_flags.contains(ModifierFlags::EXPORT | ModifierFlags::ABSTRACT));
    let kinds: Vec<SyntaxKind> = class.members.iter().map(|m| m.data().kind).collect();
    assert_eq!(
        kinds,
        vec![
            SyntaxKind::PropertyDeclaration,
            SyntaxKind::PropertyDeclaration,
            SyntaxKind::IndexSignature,
            SyntaxKind::Constructor,
            SyntaxKind::GetAccessor,
            SyntaxKind::SetAccessor,
            SyntaxKind::MethodDeclaration,
            SyntaxKind::MethodDeclaration,
            SyntaxKind::SemicolonClassElement,
        ]
    );
}

#[test]
fn test_modifier_names_as_members() {
    assert_clean("class C { static() {} get = 1; readonly; }");
}

// ============================================================================
// Interfaces, Types and Enums
// ============================================================================

#[test]
fn test_parse_interface_members() {
    let source = "interface A extends B<C> { (x: number): string; new (): A; readonly [k: string]: any; m?<T>(t: T): void; p: number, q?: string }";
    let arena = Bump::new();
    let sf = parse_source_file(&arena, "test.ts", source);
    assert!(sf.parse_diagnostics.is_empty(), "{:?}", sf.parse_diagnostics);
    let Statement::InterfaceDeclaration(decl) = &sf.statements[0] else {
        panic!("expected interface");
    };
    let kinds: Vec<SyntaxKind> = decl.members.iter().map(|m| m.data().kind).collect();
    assert_eq!(
        kinds,
        vec![
            SyntaxKind::CallSignature,
            SyntaxKind::ConstructSignature,
            SyntaxKind::IndexSignature,
            SyntaxKind::MethodSignature,
            SyntaxKind::PropertySignature,
            SyntaxKind::PropertySignature,
        ]
    );
}

#[test]
fn test_parse_complex_types() {
    assert_clean("type A = | 'a' | 'b';");
    assert_clean("type B<T> = T extends (infer U)[] ? U : never;");
    assert_clean("type C<T> = { readonly [K in keyof T as `get${K & string}`]-?: () => T[K] };");
    assert_clean("type D = [first: string, second?: number, ...rest: boolean[]];");
    assert_clean("type E = typeof import_x.y;");
    assert_clean("type F = new (...args: any[]) => object;");
    assert_clean("type G = abstract new () => void;");
    assert_clean("type H = -1 | 10n | true | unique symbol;");
    assert_clean("type I<T> = T extends [infer H extends string, ...infer R] ? H : never;");
}

#[test]
fn test_type_alias_union_shape() {
    let arena = Bump::new();
    let sf = parse_source_file(&arena, "test.ts", "type U = string | number[] | { a: 1 };");
    let Statement::TypeAliasDeclaration(alias) = &sf.statements[0] else {
        panic!("expected type alias");
    };
    let TypeNode::UnionType(union) = alias.type_node else {
        panic!("expected union, got {:?}", alias.type_node.kind());
    };
    let kinds: Vec<SyntaxKind> = union.types.iter().map(|t| t.kind()).collect();
    assert_eq!(
        kinds,
        vec![SyntaxKind::StringKeyword, SyntaxKind::ArrayType, SyntaxKind::TypeLiteral]
    );
}

#[test]
fn test_type_predicates() {
    assert_clean("function isString(x: unknown): x is string { return true; }");
    assert_clean("function assert(x: unknown): asserts x {}");
    assert_clean("class C { isC(): this is C { return true; } }");
}

#[test]
fn test_parse_enums() {
    assert_clean("enum Color { Red, Green = 'g', Blue = 1 << 2, }");
    let arena = Bump::new();
    let sf = parse_source_file(&arena, "test.ts", "export const enum E { A }");
    assert!(sf.statements[0]
        .data()
        .modifier_flags
        .contains(ModifierFlags::EXPORT | ModifierFlags::CONST));
}

// ============================================================================
// Namespaces and Modules
// ============================================================================

#[test]
fn test_dotted_namespace_nests() {
    let arena = Bump::new();
    let sf = parse_source_file(&arena, "test.ts", "namespace A.B.C { export const x = 1; }");
    let Statement::ModuleDeclaration(outer) = &sf.statements[0] else {
        panic!("expected module declaration");
    };
    assert_eq!(outer.name.text(), "A");
    let Some(ModuleBody::ModuleDeclaration(b)) = &outer.body else {
        panic!("expected nested declaration");
    };
    assert_eq!(b.name.text(), "B");
    assert!(b.data.modifier_flags.contains(ModifierFlags::EXPORT));
    let Some(ModuleBody::ModuleDeclaration(c)) = &b.body else {
        panic!("expected nested declaration");
    };
    let Some(ModuleBody::ModuleBlock(block)) = &c.body else {
        panic!("expected module block");
    };
    assert_eq!(block.statements.len(), 1);
}

#[test]
fn test_ambient_declarations() {
    let source = r#"
        declare module "fs" { export function readFile(p: string): string; }
        declare global { interface Window { x: number } }
        declare const VERSION: string;
    "#;
    let arena = Bump::new();
    let sf = parse_source_file(&arena, "test.ts", source);
    assert!(sf.parse_diagnostics.is_empty(), "{:?}", sf.parse_diagnostics);
    assert_eq!(sf.statements.len(), 3);
    assert!(sf.statements[1].data().flags.contains(NodeFlags::GLOBAL_AUGMENTATION));
    assert!(sf.statements[2].data().modifier_flags.contains(ModifierFlags::AMBIENT));
}

#[test]
fn test_declaration_file_is_ambient() {
    let arena = Bump::new();
    let sf = parse_source_file(&arena, "lib.d.ts", "interface A {}");
    assert!(sf.is_declaration_file);
    assert!(sf.statements[0].data().flags.contains(NodeFlags::AMBIENT));
}

// ============================================================================
// Imports and Exports
// ============================================================================

#[test]
fn test_parse_import_forms() {
    let source = r#"
        import "side-effect";
        import def from "a";
        import * as ns from "b";
        import def2, { x, y as z, type T } from "c";
        import type { U } from "d";
        import data from "./data.json" with { type: "json" };
        import fs = require("fs");
    "#;
    let arena = Bump::new();
    let sf = parse_source_file(&arena, "test.ts", source);
    assert!(sf.parse_diagnostics.is_empty(), "{:?}", sf.parse_diagnostics);
    assert_eq!(sf.statements.len(), 7);
    assert!(sf.statements.iter().all(|s| s.kind() == SyntaxKind::ImportDeclaration));

    let Statement::ImportDeclaration(decl) = &sf.statements[3] else {
        panic!("expected import");
    };
    let clause = decl.import_clause.as_ref().expect("import clause");
    assert_eq!(clause.name.as_ref().map(|n| n.text), Some("def2"));
    let Some(NamedImportBindings::NamedImports(named)) = &clause.named_bindings else {
        panic!("expected named imports");
    };
    assert_eq!(named.elements.len(), 3);
    assert_eq!(named.elements[1].property_name.as_ref().map(|n| n.text), Some("y"));
    assert_eq!(named.elements[1].name.text, "z");
    assert!(named.elements[2].is_type_only);
}

#[test]
fn test_parse_export_forms() {
    let source = r#"
        export { a, b as c };
        export * from "m";
        export * as ns from "n";
        export type { T } from "t";
        export default function () {}
        export default 42;
        export = foo;
    "#;
    assert_eq!(
        statement_kinds(source),
        vec![
            SyntaxKind::ExportDeclaration,
            SyntaxKind::ExportDeclaration,
            SyntaxKind::ExportDeclaration,
            SyntaxKind::ExportDeclaration,
            SyntaxKind::FunctionDeclaration,
            SyntaxKind::ExportAssignment,
            SyntaxKind::ExportAssignment,
        ]
    );
}

#[test]
fn test_export_default_modifiers() {
    let arena = Bump::new();
    let sf = parse_source_file(&arena, "test.ts", "export default class {}");
    let flags = sf.statements[0].data().modifier_flags;
    assert!(flags.contains(ModifierFlags::EXPORT | ModifierFlags::DEFAULT));
}

// ============================================================================
// Statements
// ============================================================================

#[test]
fn test_parse_control_flow() {
    assert_clean("if (a) b(); else { c(); }");
    assert_clean("for (let i = 0; i < 10; i++) {}");
    assert_clean("for (const x of xs) {} for (const k in o) {} for await (const y of ys) {}");
    assert_clean("while (true) { break; } do { continue; } while (false)");
    assert_clean("switch (x) { case 1: case 2: f(); break; default: g(); }");
    assert_clean("try { f(); } catch { } finally { g(); }");
    assert_clean("try { f(); } catch (e) { throw e; }");
    assert_clean("outer: for (;;) { break outer; }");
}

#[test]
fn test_automatic_semicolon_insertion() {
    assert_statement_count("const a = 1\nconst b = 2\nfoo()\n", 3);
    assert_clean("function f() { return\n1 }");
}

#[test]
fn test_for_in_initializer_disallows_in() {
    assert_eq!(statement_kinds("for (var k in obj) {}"), vec![SyntaxKind::ForInStatement]);
}

// ============================================================================
// Expressions
// ============================================================================

#[test]
fn test_parse_arrow_functions() {
    assert_clean("const f = x => x * 2;");
    assert_clean("const g = async (a: number, { b }: Opts = {}): Promise<void> => { await a; };");
    assert_clean("const h = <T,>(t: T) => t;");
    assert_clean("const i = async x => x;");
    with_initializer("const f = (a, b) => a + b;", |init| {
        let Expression::ArrowFunction(arrow) = init else {
            panic!("expected arrow function, got {:?}", init.kind());
        };
        assert_eq!(arrow.parameters.len(), 2);
        assert!(matches!(arrow.body, ConciseBody::Expression(_)));
    });
}

#[test]
fn test_parenthesized_expression_is_not_arrow() {
    with_initializer("const v = (a + b) * c;", |init| {
        let Expression::BinaryExpression(bin) = init else {
            panic!("expected binary expression");
        };
        assert_eq!(bin.operator_token.data.kind, SyntaxKind::AsteriskToken);
        assert_eq!(bin.left.kind(), SyntaxKind::ParenthesizedExpression);
    });
}

#[test]
fn test_async_call_is_not_arrow() {
    with_initializer("const v = async(1, 2);", |init| {
        assert_eq!(init.kind(), SyntaxKind::CallExpression);
    });
}

#[test]
fn test_binary_precedence() {
    with_initializer("const v = 1 + 2 * 3;", |init| {
        let Expression::BinaryExpression(bin) = init else {
            panic!("expected binary expression");
        };
        assert_eq!(bin.operator_token.data.kind, SyntaxKind::PlusToken);
        assert_eq!(bin.right.kind(), SyntaxKind::BinaryExpression);
    });
    with_initializer("const v = 2 ** 3 ** 2;", |init| {
        let Expression::BinaryExpression(bin) = init else {
            panic!("expected binary expression");
        };
        assert_eq!(bin.left.kind(), SyntaxKind::NumericLiteral);
        assert_eq!(bin.right.kind(), SyntaxKind::BinaryExpression);
    });
}

#[test]
fn test_shift_operators_rescan() {
    with_initializer("const v = a >> 2;", |init| {
        let Expression::BinaryExpression(bin) = init else {
            panic!("expected binary expression");
        };
        assert_eq!(bin.operator_token.data.kind, SyntaxKind::GreaterThanGreaterThanToken);
    });
}

#[test]
fn test_as_const_and_satisfies() {
    with_initializer("const v = [1, 2] as const;", |init| {
        assert_eq!(init.kind(), SyntaxKind::AsExpression);
    });
    with_initializer("const v = { a: 1 } satisfies Record<string, number>;", |init| {
        assert_eq!(init.kind(), SyntaxKind::SatisfiesExpression);
    });
}

#[test]
fn test_generic_call_versus_comparison() {
    with_initializer("const v = f<string>(x);", |init| {
        let Expression::CallExpression(call) = init else {
            panic!("expected call");
        };
        assert_eq!(call.type_arguments.map(|t| t.len()), Some(1));
    });
    with_initializer("const v = a < b;", |init| {
        assert_eq!(init.kind(), SyntaxKind::BinaryExpression);
    });
}

#[test]
fn test_optional_chain_flags() {
    with_initializer("const v = a?.b.c();", |init| {
        let Expression::CallExpression(call) = init else {
            panic!("expected call");
        };
        assert!(call.data.flags.contains(NodeFlags::OPTIONAL_CHAIN));
        let Expression::PropertyAccessExpression(c) = call.expression else {
            panic!("expected property access");
        };
        let Expression::PropertyAccessExpression(b) = c.expression else {
            panic!("expected property access");
        };
        assert!(b.question_dot_token);
    });
}

#[test]
fn test_object_literal_elements() {
    let source = "const o = { a: 1, b, c = 2, ...rest, m() {}, get g() { return 1; }, set s(v) {}, [k]: 3, 'q': 4, 5: 6, async *gen() {} };";
    with_initializer(source, |init| {
        let Expression::ObjectLiteralExpression(obj) = init else {
            panic!("expected object literal");
        };
        let kinds: Vec<SyntaxKind> = obj.properties.iter().map(|p| p.data().kind).collect();
        assert_eq!(
            kinds,
            vec![
                SyntaxKind::PropertyAssignment,
                SyntaxKind::ShorthandPropertyAssignment,
                SyntaxKind::ShorthandPropertyAssignment,
                SyntaxKind::SpreadAssignment,
                SyntaxKind::MethodDeclaration,
                SyntaxKind::GetAccessor,
                SyntaxKind::SetAccessor,
                SyntaxKind::PropertyAssignment,
                SyntaxKind::PropertyAssignment,
                SyntaxKind::PropertyAssignment,
                SyntaxKind::MethodDeclaration,
            ]
        );
    });
}

#[test]
fn test_template_literals() {
    with_initializer("const t = `a${b}c${d}e`;", |init| {
        let Expression::TemplateExpression(tpl) = init else {
            panic!("expected template expression");
        };
        assert_eq!(tpl.head.text, "a");
        assert_eq!(tpl.template_spans.len(), 2);
        assert_eq!(tpl.template_spans[0].literal.data.kind, SyntaxKind::TemplateMiddle);
        assert_eq!(tpl.template_spans[1].literal.text, "e");
    });
    assert_clean("const u = tag`x${y}`;");
    assert_clean("const w = `outer ${`inner ${x}`}`;");
}

#[test]
fn test_regex_and_division() {
    assert_clean("const r = /ab+c/gi.test(s);");
    with_initializer("const d = a / b / c;", |init| {
        assert_eq!(init.kind(), SyntaxKind::BinaryExpression);
    });
}

#[test]
fn test_new_expressions() {
    assert_clean("const m = new Map<string, number>();");
    assert_clean("const d = new Date;");
    assert_clean("function F() { return new.target; }");
    with_initializer("const x = new a.B(1).c;", |init| {
        let Expression::PropertyAccessExpression(access) = init else {
            panic!("expected property access");
        };
        assert_eq!(access.expression.kind(), SyntaxKind::NewExpression);
    });
}

#[test]
fn test_string_literal_quotes() {
    with_initializer("const s = 'single';", |init| {
        let Expression::StringLiteral(lit) = init else {
            panic!("expected string literal");
        };
        assert_eq!(lit.text, "single");
        assert!(lit.is_single_quote);
    });
}

// ============================================================================
// Error Recovery
// ============================================================================

#[test]
fn test_missing_initializer_reports_error() {
    let arena = Bump::new();
    let sf = parse_source_file(&arena, "test.ts", "const x = ;\nconst y = 2;");
    assert!(!sf.parse_diagnostics.is_empty());
    assert_eq!(sf.parse_diagnostics[0].code, 1109);
    assert_eq!(sf.statements.len(), 2);
}

#[test]
fn test_recovers_at_next_statement() {
    let arena = Bump::new();
    let sf = parse_source_file(&arena, "test.ts", "const a = 1;\n) ) )\nconst b = 2;");
    assert!(sf.has_parse_errors());
    let names: Vec<&str> = sf
        .statements
        .iter()
        .filter_map(|s| match s {
            Statement::VariableStatement(v) => v.declaration_list.declarations[0].name.as_identifier().map(|i| i.text),
            _ => None,
        })
        .collect();
    assert_eq!(names, vec!["a", "b"]);
}

#[test]
fn test_unclosed_block_terminates() {
    let arena = Bump::new();
    let sf = parse_source_file(&arena, "test.ts", "function f() { if (x) {");
    assert!(sf.has_parse_errors());
    assert_eq!(sf.statements.len(), 1);
}

#[test]
fn test_diagnostics_are_sorted_and_located() {
    let arena = Bump::new();
    let sf = parse_source_file(&arena, "src/a.ts", "let = ;\nclass { }\n'unterminated");
    assert!(sf.parse_diagnostics.len() >= 2);
    let starts: Vec<u32> = sf
        .parse_diagnostics
        .iter()
        .map(|d| d.span.map(|s| s.start).unwrap_or(0))
        .collect();
    let mut sorted = starts.clone();
    sorted.sort();
    assert_eq!(starts, sorted);
    assert!(sf.parse_diagnostics.iter().all(|d| d.file.as_deref() == Some("src/a.ts")));
}

#[test]
fn test_garbage_input_does_not_panic() {
    for source in ["}}}}", "(((", "class", "import {", "type = ", "<<<>>>", "`${", "@@@", "export default"] {
        let arena = Bump::new();
        let sf = parse_source_file(&arena, "test.ts", source);
        assert!(sf.has_parse_errors(), "expected errors for {:?}", source);
    }
}

// ============================================================================
// Limits
// ============================================================================

#[test]
fn test_nesting_limit_reports_error() {
    let source = format!("const x = {}1{};", "(".repeat(50), ")".repeat(50));
    let arena = Bump::new();
    let options = ParserOptions {
        max_depth: 20,
        ..ParserOptions::default()
    };
    let result = try_parse_source_file(&arena, "test.ts", &source, options.clone());
    assert!(matches!(result, Err(ParseError::NestingTooDeep { depth: 20, .. })));

    let sf = Parser::with_options(&arena, "test.ts", &source, options).parse_source_file();
    assert!(sf.parse_diagnostics.iter().any(|d| d.code == 1999));
}

#[test]
fn test_nesting_within_limit_succeeds() {
    let source = format!("const x = {}1{};", "[".repeat(30), "]".repeat(30));
    let arena = Bump::new();
    let result = try_parse_source_file(&arena, "test.ts", &source, ParserOptions::default());
    assert!(result.is_ok());
}

#[test]
fn test_deep_nesting_with_default_limit() {
    // Run on a larger stack so only the depth guard decides the outcome.
    let handle = std::thread::Builder::new()
        .stack_size(64 * 1024 * 1024)
        .spawn(|| {
            let source = format!("const x = {}1{};", "(".repeat(5000), ")".repeat(5000));
            let arena = Bump::new();
            let result = try_parse_source_file(&arena, "test.ts", &source, ParserOptions::default());
            matches!(result, Err(ParseError::NestingTooDeep { .. }))
        })
        .expect("spawn parser thread");
    assert!(handle.join().expect("parser thread panicked"));
}

#[test]
fn test_source_too_large() {
    let arena = Bump::new();
    let options = ParserOptions {
        max_source_length: 4,
        ..ParserOptions::default()
    };
    let result = try_parse_source_file(&arena, "test.ts", "const x = 1;", options);
    assert_eq!(result.err(), Some(ParseError::SourceTooLarge { length: 12, limit: 4 }));
}

#[test]
fn test_long_unary_chain_does_not_recurse() {
    let source = format!("const x = {}y;", "!".repeat(10_000));
    assert_clean(&source);
}
