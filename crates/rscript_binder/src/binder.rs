//! The binder implementation.
//!
//! Walks the top-level statements of a file and the bodies of its
//! namespaces, creating one symbol per declared name. Handles:
//! - Interfaces, type aliases, classes, enums, functions and variables
//! - Namespaces, including dotted names and `declare module "m"`
//! - `declare global` blocks, bound into the file's globals
//! - Declaration merging (interfaces, namespaces, enums, overloads)
//!
//! Function bodies and blocks are not entered: the checker only needs the
//! names visible from type positions.

use crate::scope::Scope;
use crate::symbol::{Declaration, Symbol, SymbolTable};
use rscript_ast::node::*;
use rscript_ast::types::*;
use rscript_core::intern::{InternedString, StringInterner};
use rscript_core::text::TextRange;
use rscript_diagnostics::{messages, Diagnostic, DiagnosticCollection};

/// The binder creates symbols and links declarations.
pub struct Binder<'a> {
    interner: StringInterner,
    /// All symbols created during binding, indexed by `SymbolId`.
    symbols: Vec<Symbol<'a>>,
    /// The container stack. `scopes[0]` holds the globals.
    scopes: Vec<Scope>,
    file_name: String,
    diagnostics: DiagnosticCollection,
}

impl<'a> Binder<'a> {
    pub fn new() -> Self {
        Self::with_interner(StringInterner::new())
    }

    /// Create a binder that interns names into a shared interner.
    pub fn with_interner(interner: StringInterner) -> Self {
        Self {
            interner,
            symbols: Vec::new(),
            scopes: vec![Scope::default()],
            file_name: String::new(),
            diagnostics: DiagnosticCollection::new(),
        }
    }

    /// Take diagnostics from the binder.
    pub fn take_diagnostics(&mut self) -> DiagnosticCollection {
        std::mem::take(&mut self.diagnostics)
    }

    pub fn interner(&self) -> &StringInterner {
        &self.interner
    }

    /// Get all symbols created by this binder.
    pub fn symbols(&self) -> &[Symbol<'a>] {
        &self.symbols
    }

    /// Get a symbol by ID.
    pub fn get_symbol(&self, id: SymbolId) -> Option<&Symbol<'a>> {
        self.symbols.get(id.index())
    }

    pub fn symbol_name(&self, id: SymbolId) -> &str {
        match self.get_symbol(id) {
            Some(symbol) => self.interner.resolve(symbol.name),
            None => "",
        }
    }

    /// The file-level symbol table.
    pub fn globals(&self) -> &SymbolTable {
        &self.scopes[0].locals
    }

    // ========================================================================
    // Source file binding
    // ========================================================================

    /// Bind a source file, creating symbols for all declarations.
    pub fn bind_source_file(&mut self, source_file: &'a SourceFile<'a>) {
        self.file_name = source_file.file_name.clone();
        for statement in source_file.statements.iter() {
            self.bind_statement(statement);
        }
        tracing::debug!(
            file = %self.file_name,
            symbols = self.symbols.len(),
            globals = self.globals().len(),
            "bound source file"
        );
    }

    fn bind_statement(&mut self, stmt: &'a Statement<'a>) {
        match stmt {
            Statement::InterfaceDeclaration(n) => {
                self.declare(&n.name, SymbolFlags::INTERFACE, n.data.modifier_flags, Declaration::Interface(n));
            }
            Statement::TypeAliasDeclaration(n) => {
                self.declare(&n.name, SymbolFlags::TYPE_ALIAS, n.data.modifier_flags, Declaration::TypeAlias(n));
            }
            Statement::ClassDeclaration(n) => {
                if let Some(name) = &n.name {
                    self.declare(name, SymbolFlags::CLASS, n.data.modifier_flags, Declaration::Class(n));
                }
            }
            Statement::EnumDeclaration(n) => {
                self.declare(&n.name, SymbolFlags::REGULAR_ENUM, n.data.modifier_flags, Declaration::Enum(n));
            }
            Statement::FunctionDeclaration(n) => {
                if let Some(name) = &n.name {
                    self.declare(name, SymbolFlags::FUNCTION, n.data.modifier_flags, Declaration::Function(n));
                }
            }
            Statement::VariableStatement(n) => self.bind_variable_statement(n),
            Statement::ModuleDeclaration(n) => self.bind_module_declaration(n, n.data.modifier_flags),
            _ => {}
        }
    }

    fn bind_variable_statement(&mut self, node: &'a VariableStatement<'a>) {
        let flags = if node.declaration_list.data.flags.intersects(NodeFlags::BLOCK_SCOPED) {
            SymbolFlags::BLOCK_SCOPED_VARIABLE
        } else {
            SymbolFlags::FUNCTION_SCOPED_VARIABLE
        };
        for decl in node.declaration_list.declarations.iter() {
            self.bind_binding_name(&decl.name, flags, node.data.modifier_flags, decl);
        }
    }

    fn bind_binding_name(
        &mut self,
        name: &'a BindingName<'a>,
        flags: SymbolFlags,
        modifiers: ModifierFlags,
        decl: &'a VariableDeclaration<'a>,
    ) {
        match name {
            BindingName::Identifier(id) => {
                self.declare(id, flags, modifiers, Declaration::Variable(decl));
            }
            BindingName::ObjectBindingPattern(pattern) => {
                for elem in pattern.elements.iter() {
                    self.bind_binding_name(&elem.name, flags, modifiers, decl);
                }
            }
            BindingName::ArrayBindingPattern(pattern) => {
                for elem in pattern.elements.iter() {
                    if let ArrayBindingElement::BindingElement(e) = elem {
                        self.bind_binding_name(&e.name, flags, modifiers, decl);
                    }
                }
            }
        }
    }

    fn bind_module_declaration(&mut self, node: &'a ModuleDeclaration<'a>, modifiers: ModifierFlags) {
        if node.data.flags.contains(NodeFlags::GLOBAL_AUGMENTATION) {
            let globals = std::mem::take(&mut self.scopes[0].locals);
            self.scopes.push(Scope::new(globals, None));
            self.bind_module_body(node);
            if let Some(scope) = self.scopes.pop() {
                self.scopes[0].locals = scope.locals;
            }
            return;
        }

        let (name_text, name_range) = match &node.name {
            ModuleName::Identifier(id) => (id.text.to_string(), id.data.range),
            ModuleName::StringLiteral(lit) => (format!("\"{}\"", lit.text), lit.data.range),
        };
        if name_text.is_empty() {
            return;
        }
        let name = self.interner.intern(&name_text);
        let id = self.declare_symbol(
            name,
            &name_text,
            name_range,
            SymbolFlags::NAMESPACE_MODULE,
            modifiers,
            Declaration::Module(node),
        );

        let exports = self.symbols[id.index()].exports.take().unwrap_or_default();
        self.scopes.push(Scope::new(exports, Some(id)));
        self.bind_module_body(node);
        if let Some(scope) = self.scopes.pop() {
            self.symbols[id.index()].exports = Some(scope.locals);
        }
    }

    fn bind_module_body(&mut self, node: &'a ModuleDeclaration<'a>) {
        match &node.body {
            Some(ModuleBody::ModuleBlock(block)) => {
                for statement in block.statements.iter() {
                    self.bind_statement(statement);
                }
            }
            Some(ModuleBody::ModuleDeclaration(inner)) => {
                self.bind_module_declaration(inner, inner.data.modifier_flags);
            }
            None => {}
        }
    }

    // ========================================================================
    // Symbol resolution
    // ========================================================================

    /// Resolve a file-level name.
    pub fn resolve_name(&self, name: &str) -> Option<SymbolId> {
        let key = self.interner.get(name)?;
        self.globals().get(&key)
    }

    /// Resolve a dotted name such as `A.B.C` through namespace exports.
    pub fn resolve_qualified_name(&self, parts: &[&str]) -> Option<SymbolId> {
        let (first, rest) = parts.split_first()?;
        let mut current = self.resolve_name(first)?;
        for part in rest {
            current = self.resolve_member(current, part)?;
        }
        Some(current)
    }

    /// Resolve `name` among the exports of the namespace `container`.
    pub fn resolve_member(&self, container: SymbolId, name: &str) -> Option<SymbolId> {
        let key = self.interner.get(name)?;
        self.get_symbol(container)?.exports.as_ref()?.get(&key)
    }

    /// Resolve a type or expression entity name.
    pub fn resolve_entity_name(&self, name: &EntityName<'_>) -> Option<SymbolId> {
        match name {
            EntityName::Identifier(id) => self.resolve_name(id.text),
            EntityName::QualifiedName(q) => {
                let container = self.resolve_entity_name(&q.left)?;
                self.resolve_member(container, q.right.text)
            }
        }
    }

    // ========================================================================
    // Declaration
    // ========================================================================

    fn declare(
        &mut self,
        name: &Identifier<'a>,
        flags: SymbolFlags,
        modifiers: ModifierFlags,
        declaration: Declaration<'a>,
    ) -> Option<SymbolId> {
        if name.is_missing() {
            return None;
        }
        let key = self.interner.intern(name.text);
        Some(self.declare_symbol(key, name.text, name.data.range, flags, modifiers, declaration))
    }

    fn declare_symbol(
        &mut self,
        name: InternedString,
        name_text: &str,
        name_range: TextRange,
        flags: SymbolFlags,
        modifiers: ModifierFlags,
        declaration: Declaration<'a>,
    ) -> SymbolId {
        let mut flags = flags;
        if modifiers.contains(ModifierFlags::EXPORT) {
            flags |= SymbolFlags::EXPORTED;
        }

        let container = self.scopes.last().and_then(|scope| scope.container);
        let existing = self.scopes.last().and_then(|scope| scope.locals.get(&name));
        if let Some(id) = existing {
            let existing_flags = self.symbols[id.index()].flags;
            if existing_flags.intersects(excludes(flags)) {
                let message = if (existing_flags | flags).contains(SymbolFlags::BLOCK_SCOPED_VARIABLE) {
                    &messages::CANNOT_REDECLARE_BLOCK_SCOPED_VARIABLE_0
                } else {
                    &messages::DUPLICATE_IDENTIFIER_0
                };
                self.diagnostics.add(Diagnostic::with_location(
                    self.file_name.clone(),
                    name_range.to_span(),
                    message,
                    &[name_text],
                ));
            }
            let symbol = &mut self.symbols[id.index()];
            symbol.flags |= flags;
            symbol.declarations.push(declaration);
            return id;
        }

        let id = SymbolId(self.symbols.len() as u32);
        let mut symbol = Symbol::new(id, name, flags);
        symbol.declarations.push(declaration);
        symbol.parent = container;
        self.symbols.push(symbol);
        if let Some(scope) = self.scopes.last_mut() {
            scope.locals.set(name, id);
        }
        id
    }
}

impl<'a> Default for Binder<'a> {
    fn default() -> Self {
        Self::new()
    }
}

/// Flags a new declaration may not share a name with.
fn excludes(flags: SymbolFlags) -> SymbolFlags {
    let mut excluded = SymbolFlags::NONE;
    if flags.contains(SymbolFlags::BLOCK_SCOPED_VARIABLE) {
        excluded |= SymbolFlags::VALUE;
    }
    if flags.contains(SymbolFlags::FUNCTION_SCOPED_VARIABLE) {
        excluded |= SymbolFlags::VALUE.difference(SymbolFlags::FUNCTION_SCOPED_VARIABLE);
    }
    if flags.contains(SymbolFlags::FUNCTION) {
        excluded |= SymbolFlags::VALUE.difference(SymbolFlags::FUNCTION);
    }
    if flags.contains(SymbolFlags::CLASS) {
        excluded |= (SymbolFlags::VALUE | SymbolFlags::TYPE).difference(SymbolFlags::INTERFACE);
    }
    if flags.contains(SymbolFlags::INTERFACE) {
        excluded |= SymbolFlags::TYPE.difference(SymbolFlags::INTERFACE | SymbolFlags::CLASS);
    }
    if flags.contains(SymbolFlags::TYPE_ALIAS) {
        excluded |= SymbolFlags::TYPE;
    }
    if flags.contains(SymbolFlags::REGULAR_ENUM) {
        excluded |= (SymbolFlags::VALUE | SymbolFlags::TYPE).difference(SymbolFlags::REGULAR_ENUM);
    }
    excluded
}

/// Bind `source_file` with a fresh binder.
pub fn bind_source_file<'a>(source_file: &'a SourceFile<'a>) -> Binder<'a> {
    let mut binder = Binder::new();
    binder.bind_source_file(source_file);
    binder
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_binder_creation() {
        let binder = Binder::new();
        assert!(binder.symbols().is_empty());
        assert!(binder.globals().is_empty());
        assert_eq!(binder.symbol_name(SymbolId(7)), "");
    }

    #[test]
    fn test_excludes() {
        assert!(excludes(SymbolFlags::INTERFACE).contains(SymbolFlags::TYPE_ALIAS));
        assert!(!excludes(SymbolFlags::INTERFACE).contains(SymbolFlags::INTERFACE));
        assert!(!excludes(SymbolFlags::FUNCTION).contains(SymbolFlags::FUNCTION));
        assert!(excludes(SymbolFlags::BLOCK_SCOPED_VARIABLE).contains(SymbolFlags::FUNCTION));
        assert!(!excludes(SymbolFlags::TYPE_ALIAS).intersects(SymbolFlags::VARIABLE));
        assert!(!excludes(SymbolFlags::CLASS).contains(SymbolFlags::NAMESPACE_MODULE));
    }
}
