//! Export-shape analysis of a source file.

use crate::declarations::declaration_name;
use crate::query::find_all;
use indexmap::IndexSet;
use rscript_ast::{ModifierFlags, NamedExportBindings, Node, SourceFile, Statement};
use serde::Serialize;

/// How a file exposes its bindings.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize)]
#[serde(rename_all = "lowercase")]
pub enum ExportKind {
    Named,
    Default,
    Both,
    None,
}

impl ExportKind {
    fn classify(has_named: bool, has_default: bool) -> ExportKind {
        match (has_named, has_default) {
            (true, true) => ExportKind::Both,
            (false, true) => ExportKind::Default,
            (true, false) => ExportKind::Named,
            (false, false) => ExportKind::None,
        }
    }
}

#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct ExportSummary {
    pub export_kind: ExportKind,
    /// Exported names in first-seen order, without duplicates.
    pub named_export_names: Vec<String>,
    pub has_default_export: bool,
}

impl Default for ExportSummary {
    fn default() -> Self {
        Self {
            export_kind: ExportKind::None,
            named_export_names: Vec::new(),
            has_default_export: false,
        }
    }
}

#[derive(Default)]
struct ExportCollector {
    has_named: bool,
    has_default: bool,
    names: IndexSet<String>,
}

impl ExportCollector {
    /// Keeps the first position of a repeated name.
    fn add_name(&mut self, name: &str) {
        self.names.insert(name.to_string());
    }

    fn visit_statement(&mut self, statement: &Statement<'_>) {
        match statement {
            Statement::ExportDeclaration(export) => {
                self.has_named = true;
                match &export.export_clause {
                    Some(NamedExportBindings::NamedExports(list)) => {
                        for specifier in list.elements {
                            self.add_name(specifier.name.text);
                        }
                    }
                    Some(NamedExportBindings::NamespaceExport(ns)) => self.add_name(ns.name.text),
                    None => {}
                }
            }
            Statement::ExportAssignment(assignment) => {
                if !assignment.is_export_equals {
                    self.has_default = true;
                }
            }
            Statement::FunctionDeclaration(_)
            | Statement::ClassDeclaration(_)
            | Statement::TypeAliasDeclaration(_)
            | Statement::InterfaceDeclaration(_)
            | Statement::EnumDeclaration(_)
            | Statement::VariableStatement(_) => self.visit_declaration(statement),
            _ => {}
        }
    }

    fn visit_declaration(&mut self, statement: &Statement<'_>) {
        let flags = statement.data().modifier_flags;
        if !flags.contains(ModifierFlags::EXPORT) {
            return;
        }
        if flags.contains(ModifierFlags::DEFAULT) {
            self.has_default = true;
            return;
        }
        self.has_named = true;
        match statement {
            Statement::VariableStatement(variables) => {
                for declaration in variables.declaration_list.declarations {
                    if let Some(name) = declaration_name(Node::VariableDeclaration(declaration)) {
                        self.add_name(name);
                    }
                }
            }
            Statement::TypeAliasDeclaration(alias) => self.add_name(alias.name.text),
            Statement::InterfaceDeclaration(interface) => self.add_name(interface.name.text),
            Statement::EnumDeclaration(declaration) => self.add_name(declaration.name.text),
            _ => {
                if let Some(name) = declaration_name(Node::Statement(statement)) {
                    self.add_name(name);
                }
            }
        }
    }

    fn finish(self) -> ExportSummary {
        ExportSummary {
            export_kind: ExportKind::classify(self.has_named, self.has_default),
            named_export_names: self.names.into_iter().collect(),
            has_default_export: self.has_default,
        }
    }
}

/// Classify what `source_file` exports.
///
/// Export constructs count wherever they appear, including inside namespace
/// bodies. `export = x` is not a default export.
pub fn analyze_exports(source_file: &SourceFile<'_>) -> ExportSummary {
    let mut collector = ExportCollector::default();
    for node in find_all(Node::SourceFile(source_file), |n| n.as_statement().is_some()) {
        if let Some(statement) = node.as_statement() {
            collector.visit_statement(statement);
        }
    }
    collector.finish()
}

#[cfg(test)]
mod tests {
    use super::*;
    use bumpalo::Bump;
    use rscript_parser::parse_source_file;

    fn analyze(source: &str) -> ExportSummary {
        let arena = Bump::new();
        let sf = parse_source_file(&arena, "mod.ts", source);
        analyze_exports(&sf)
    }

    #[test]
    fn test_classification_table() {
        assert_eq!(ExportKind::classify(true, true), ExportKind::Both);
        assert_eq!(ExportKind::classify(false, true), ExportKind::Default);
        assert_eq!(ExportKind::classify(true, false), ExportKind::Named);
        assert_eq!(ExportKind::classify(false, false), ExportKind::None);
    }

    #[test]
    fn test_named_declarations() {
        let summary = analyze("export function f() {}\nexport class C {}\nexport const X = 1;");
        assert_eq!(summary.export_kind, ExportKind::Named);
        assert_eq!(summary.named_export_names, vec!["f", "C", "X"]);
        assert!(!summary.has_default_export);
    }

    #[test]
    fn test_default_class() {
        let summary = analyze("export default class D {}");
        assert_eq!(summary.export_kind, ExportKind::Default);
        assert!(summary.named_export_names.is_empty());
        assert!(summary.has_default_export);
    }

    #[test]
    fn test_empty_file() {
        assert_eq!(analyze(""), ExportSummary::default());
    }

    #[test]
    fn test_names_are_deduplicated() {
        let summary = analyze("export const a = 1;\nexport { a };\nexport { b as a, c };");
        assert_eq!(summary.named_export_names, vec!["a", "c"]);

        let repeated = analyze("export { c };\nexport const a = 1;\nexport { c, a };");
        assert_eq!(repeated.named_export_names, vec!["c", "a"]);
    }
}
