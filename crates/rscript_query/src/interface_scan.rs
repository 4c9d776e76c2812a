//! Callback-driven scans over interface members.
//!
//! The scan parses raw source text on its own, so it can be pointed at files
//! that were never loaded into a program. Each registered interface name gets
//! a handler that is called once per named member with a shared accumulator.

use crate::query::find_all;
use bumpalo::Bump;
use rscript_ast::{Expression, InterfaceDeclaration, Node, PropertyName, SourceFile, TypeElement, TypeNode};
use rscript_parser::{try_parse_source_file, ParserOptions};
use rustc_hash::FxHashMap;

const SCAN_FILE_NAME: &str = "scan.ts";
const PLACEHOLDER: &str = "${string}";

type InterfaceHandler<'h, R> = Box<dyn FnMut(&str, &TypeElement<'_>, &mut R) + 'h>;

/// Member handlers keyed by interface name.
pub struct InterfaceHandlers<'h, R> {
    handlers: FxHashMap<String, InterfaceHandler<'h, R>>,
}

impl<'h, R> InterfaceHandlers<'h, R> {
    pub fn new() -> Self {
        Self {
            handlers: FxHashMap::default(),
        }
    }

    /// Register `handler` for members of interfaces named `interface`,
    /// replacing any previous handler for that name.
    pub fn insert(
        &mut self,
        interface: impl Into<String>,
        handler: impl FnMut(&str, &TypeElement<'_>, &mut R) + 'h,
    ) {
        self.handlers.insert(interface.into(), Box::new(handler));
    }

    /// Builder form of [`InterfaceHandlers::insert`].
    pub fn with(
        mut self,
        interface: impl Into<String>,
        handler: impl FnMut(&str, &TypeElement<'_>, &mut R) + 'h,
    ) -> Self {
        self.insert(interface, handler);
        self
    }

    pub fn len(&self) -> usize {
        self.handlers.len()
    }

    pub fn is_empty(&self) -> bool {
        self.handlers.is_empty()
    }
}

impl<R> Default for InterfaceHandlers<'_, R> {
    fn default() -> Self {
        Self::new()
    }
}

/// Parse `source_text` and feed the members of every interface that has a
/// handler, at any depth, to that handler.
///
/// Members contribute their identifier, string or numeric name. A computed
/// template name or an index signature keyed by a template literal type
/// contributes its pattern, e.g. `` [key: `on_${string}`] `` gives
/// `"on_${string}"`. Other members are skipped.
///
/// If the text cannot be parsed at all, the failure is logged and `initial`
/// is returned unchanged.
pub fn scan_interfaces<R>(source_text: &str, handlers: &mut InterfaceHandlers<'_, R>, initial: R) -> R {
    let arena = Bump::new();
    let source_file = match try_parse_source_file(&arena, SCAN_FILE_NAME, source_text, ParserOptions::default()) {
        Ok(source_file) => source_file,
        Err(error) => {
            tracing::warn!(%error, "interface scan skipped: source could not be parsed");
            return initial;
        }
    };
    if source_file.has_parse_errors() {
        tracing::debug!(
            errors = source_file.parse_diagnostics.len(),
            "interface scan continuing past syntax errors"
        );
    }

    let mut results = initial;
    for interface in interfaces(&source_file) {
        let Some(handler) = handlers.handlers.get_mut(interface.name.text) else {
            continue;
        };
        for member in interface.members {
            if let Some(name) = member_name(member) {
                handler(&name, member, &mut results);
            }
        }
    }
    results
}

/// The member names [`scan_interfaces`] would report for every declaration
/// of the interface `name` in an already parsed file.
pub fn interface_property_names(source_file: &SourceFile<'_>, name: &str) -> Vec<String> {
    interfaces(source_file)
        .into_iter()
        .filter(|interface| interface.name.text == name)
        .flat_map(|interface| interface.members.iter().filter_map(member_name))
        .collect()
}

fn interfaces<'a>(source_file: &'a SourceFile<'a>) -> Vec<&'a InterfaceDeclaration<'a>> {
    find_all(Node::SourceFile(source_file), |n| n.as_interface_declaration().is_some())
        .into_iter()
        .filter_map(|n| n.as_interface_declaration())
        .collect()
}

fn member_name(member: &TypeElement<'_>) -> Option<String> {
    match member {
        TypeElement::PropertySignature(signature) => match &signature.name {
            PropertyName::Identifier(id) => Some(id.text.to_string()),
            PropertyName::StringLiteral(s) => Some(s.text.to_string()),
            PropertyName::NumericLiteral(n) => Some(n.text.to_string()),
            PropertyName::ComputedPropertyName(computed) => template_expression_pattern(computed.expression),
            PropertyName::PrivateIdentifier(_) => None,
        },
        TypeElement::IndexSignature(index) => match index.parameters.first()?.type_annotation? {
            TypeNode::TemplateLiteralType(template) => Some(reconstruct_pattern(
                template.head.text,
                template.template_spans.iter().map(|span| span.literal.text),
            )),
            _ => None,
        },
        _ => None,
    }
}

fn template_expression_pattern(expr: &Expression<'_>) -> Option<String> {
    match expr {
        Expression::TemplateExpression(template) => Some(reconstruct_pattern(
            template.head.text,
            template.template_spans.iter().map(|span| span.literal.text),
        )),
        Expression::NoSubstitutionTemplateLiteral(literal) => Some(literal.text.to_string()),
        _ => None,
    }
}

/// `head`, then `${string}` and the literal text of each span.
fn reconstruct_pattern<'t>(head: &str, span_literals: impl Iterator<Item = &'t str>) -> String {
    let mut pattern = head.to_string();
    for literal in span_literals {
        pattern.push_str(PLACEHOLDER);
        pattern.push_str(literal);
    }
    pattern
}

#[cfg(test)]
mod tests {
    use super::*;
    use rscript_parser::parse_source_file;

    #[test]
    fn test_reconstruct_pattern() {
        assert_eq!(reconstruct_pattern("prefix_", [""].into_iter()), "prefix_${string}");
        assert_eq!(reconstruct_pattern("", ["_", "_", ""].into_iter()), "${string}_${string}_${string}");
        assert_eq!(reconstruct_pattern("", ["suffix"].into_iter()), "${string}suffix");
        assert_eq!(reconstruct_pattern("plain", std::iter::empty()), "plain");
    }

    #[test]
    fn test_member_names() {
        let arena = Bump::new();
        let sf = parse_source_file(
            &arena,
            "a.ts",
            r#"interface Env {
                API_URL: string;
                "quoted-name": string;
                42: number;
                [key: `VITE_${string}`]: string;
                [key: string]: unknown;
                method(): void;
                (call: number): void;
            }"#,
        );
        assert_eq!(
            interface_property_names(&sf, "Env"),
            vec!["API_URL", "quoted-name", "42", "VITE_${string}"]
        );
        assert!(interface_property_names(&sf, "Missing").is_empty());
    }

    #[test]
    fn test_handlers_builder() {
        let handlers: InterfaceHandlers<'_, Vec<String>> = InterfaceHandlers::new()
            .with("A", |name: &str, _: &TypeElement<'_>, out: &mut Vec<String>| out.push(name.to_string()));
        assert_eq!(handlers.len(), 1);
        assert!(!handlers.is_empty());
    }

    #[test]
    fn test_scan_collects_into_accumulator() {
        let mut handlers = InterfaceHandlers::new().with("Config", |name: &str, _: &TypeElement<'_>, out: &mut Vec<String>| {
            out.push(name.to_string())
        });
        let names = scan_interfaces(
            "interface Other { skip: 1 }\ninterface Config { a: 1; b?: 2 }",
            &mut handlers,
            Vec::new(),
        );
        assert_eq!(names, vec!["a", "b"]);
    }
}
