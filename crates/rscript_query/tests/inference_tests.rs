//! Type inference integration tests.
//!
//! Covers the syntactic renderers on realistic declarations and the
//! canonicalization layered over the checker, with and without the bundled
//! lib.

use bumpalo::Bump;
use indexmap::IndexMap;
use rscript_ast::node_ref::Node;
use rscript_checker::Checker;
use rscript_parser::parse_source_file;
use rscript_query::*;

const MODELS: &str = r#"
    type User = { id: string; age: number; tags: string[]; role: "user" | "admin" };
    type Wrapper = User;
    type Response = Promise<User>;
    type Nested = { user: User; meta: { created: Date }; offset: -1 };
    type Status = "b" | "a" | null;
    type Handler = (req: Request) => Promise<void>;
    type Loop = Other;
    type Other = Loop;
"#;

/// Helper: `(name, type)` pairs in map order.
fn entries(map: &IndexMap<String, String>) -> Vec<(&str, &str)> {
    map.iter().map(|(k, v)| (k.as_str(), v.as_str())).collect()
}

/// Helper: properties of the alias `name` in [`MODELS`].
fn alias_properties(name: &str) -> IndexMap<String, String> {
    let arena = Bump::new();
    let sf = parse_source_file(&arena, "models.ts", MODELS);
    let alias = find_type_alias(name, &sf).unwrap_or_else(|| panic!("{name} is not declared"));
    parse_object_type_unwrapping_promise(alias, MODELS, Some(&sf))
}

/// Helper: the rendered right-hand side of the alias `name` in [`MODELS`].
fn alias_string(name: &str) -> String {
    let arena = Bump::new();
    let sf = parse_source_file(&arena, "models.ts", MODELS);
    let alias = find_type_alias(name, &sf).unwrap_or_else(|| panic!("{name} is not declared"));
    infer_type_from_type_node(alias, &sf)
}

/// Helper: check `source` into `checker`.
fn check_into(checker: &mut Checker, source: &str) {
    let arena = Bump::new();
    let sf = parse_source_file(&arena, "test.ts", source);
    checker.check_source_file(&sf);
}

fn declared(checker: &Checker, name: &str) -> rscript_checker::TypeId {
    checker
        .get_type_of_symbol_name(name)
        .unwrap_or_else(|| panic!("{name} is not declared"))
}

// ============================================================================
// Type Annotations
// ============================================================================

#[test]
fn test_object_alias_properties() {
    assert_eq!(
        entries(&alias_properties("User")),
        vec![
            ("id", "string"),
            ("age", "number"),
            ("tags", "string[]"),
            ("role", "\"admin\" | \"user\""),
        ]
    );
}

#[test]
fn test_reference_follows_alias() {
    assert_eq!(alias_properties("Wrapper"), alias_properties("User"));
}

#[test]
fn test_promise_is_unwrapped() {
    assert_eq!(alias_properties("Response"), alias_properties("User"));
}

#[test]
fn test_nested_members_are_rendered_not_expanded() {
    assert_eq!(
        entries(&alias_properties("Nested")),
        vec![("user", "User"), ("meta", "{ created: Date }"), ("offset", "-1")]
    );
}

#[test]
fn test_alias_cycle_is_empty() {
    assert!(alias_properties("Loop").is_empty());
}

#[test]
fn test_rendered_aliases() {
    assert_eq!(alias_string("Status"), "\"a\" | \"b\" | null");
    assert_eq!(alias_string("Response"), "Promise<User>");
    assert_eq!(alias_string("Handler"), "(req: Request) => Promise<void>");
}

#[test]
fn test_without_source_file_aliases_are_not_followed() {
    let arena = Bump::new();
    let sf = parse_source_file(&arena, "models.ts", MODELS);
    let wrapper = find_type_alias("Wrapper", &sf).expect("declared");
    assert!(parse_object_type(wrapper, MODELS, None).is_empty());

    let nested = find_type_alias("Nested", &sf).expect("declared");
    assert_eq!(
        entries(&parse_object_type(nested, MODELS, None)),
        vec![("user", "User"), ("meta", "{ created: Date }"), ("offset", "-1")]
    );
}

#[test]
fn test_without_source_file_members_keep_source_text() {
    let source = "type Props = { onClose: () => void; offset: -1; size: number };";
    let arena = Bump::new();
    let sf = parse_source_file(&arena, "props.ts", source);
    let props = find_type_alias("Props", &sf).expect("declared");
    assert_eq!(
        entries(&parse_object_type(props, source, None)),
        vec![("onClose", "() => void"), ("offset", "-1"), ("size", "number")]
    );
}

#[test]
fn test_missing_alias() {
    let arena = Bump::new();
    let sf = parse_source_file(&arena, "models.ts", "interface User { id: string }");
    assert!(find_type_alias("User", &sf).is_none());
}

// ============================================================================
// Value Expressions
// ============================================================================

#[test]
fn test_component_props_from_object_literal() {
    let source = r#"
        const props = {
            title: "Inbox",
            count: items.length,
            userId,
            isOpen,
            list: [1, 2],
            mixed: [1, "a", 2],
            when: new Date(),
            total: a + b,
            label: name || "none",
            ok: !done,
            ...rest,
        };
    "#;
    let arena = Bump::new();
    let sf = parse_source_file(&arena, "props.ts", source);
    let object = find_first(Node::SourceFile(&sf), |n| n.as_object_literal().is_some())
        .and_then(|n| n.as_object_literal())
        .expect("object literal");

    assert_eq!(
        entries(&extract_properties_from_object_literal(object)),
        vec![
            ("title", "string"),
            ("count", "unknown"),
            ("userId", "string | null | undefined"),
            ("isOpen", "boolean"),
            ("list", "number[]"),
            ("mixed", "(number | string)[]"),
            ("when", "Date"),
            ("total", "number"),
            ("label", "string"),
            ("ok", "boolean"),
        ]
    );
}

// ============================================================================
// Checker-Resolved Types
// ============================================================================

const SERVICE: &str = r#"
    interface User { id: number; name?: string; tags: string[] }
    type Empty = {};
    type Holder = { data: Empty; user: User };
    type Loader = Promise<User>;
    type MaybeLoader = Promise<User> | undefined;
    type Pair = Promise<User> | Promise<string>;
"#;

#[test]
fn test_resolved_interface_properties() {
    let mut checker = Checker::with_default_lib();
    check_into(&mut checker, SERVICE);
    let user = declared(&checker, "User");
    assert_eq!(
        entries(&extract_properties_from_type(&checker, user)),
        vec![("id", "number"), ("name", "string | undefined"), ("tags", "string[]")]
    );
}

#[test]
fn test_empty_object_property_is_any() {
    let mut checker = Checker::with_default_lib();
    check_into(&mut checker, SERVICE);
    let holder = declared(&checker, "Holder");
    assert_eq!(
        entries(&extract_properties_from_type(&checker, holder)),
        vec![("data", "any"), ("user", "User")]
    );
}

#[test]
fn test_resolved_promise_unwrapping() {
    let mut checker = Checker::with_default_lib();
    check_into(&mut checker, SERVICE);
    let user = declared(&checker, "User");

    assert_eq!(unwrap_promise_type(&checker, declared(&checker, "Loader")), user);
    assert_eq!(unwrap_promise_type(&checker, declared(&checker, "MaybeLoader")), user);

    // Two promise members are ambiguous.
    let pair = declared(&checker, "Pair");
    assert_eq!(unwrap_promise_type(&checker, pair), pair);
    assert_eq!(unwrap_promise_type(&checker, user), user);
}

#[test]
fn test_never_members_are_dropped() {
    let mut checker = Checker::with_default_lib();
    let string = checker.type_table.string_type;
    let number = checker.type_table.number_type;
    let never = checker.type_table.never_type;

    let with_never = checker.create_union_type(vec![string, never, number]);
    assert_eq!(type_to_canonical_string(&checker, with_never), "string | number");
    assert_eq!(type_to_canonical_string(&checker, never), "never");
}

#[test]
fn test_without_lib_promise_degrades_to_any() {
    let mut checker = Checker::new();
    check_into(&mut checker, SERVICE);
    let loader = declared(&checker, "Loader");
    assert_eq!(unwrap_promise_type(&checker, loader), loader);
    assert_eq!(type_to_canonical_string(&checker, loader), "any");
}
