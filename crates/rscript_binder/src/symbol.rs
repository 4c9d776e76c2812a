//! Symbol and symbol table definitions.

use rscript_ast::node::*;
use rscript_ast::types::{ModifierFlags, SymbolFlags, SymbolId};
use rscript_core::intern::InternedString;
use rscript_core::text::TextRange;
use rustc_hash::FxHashMap;

/// A declaration site contributing to a symbol.
#[derive(Debug, Clone, Copy)]
pub enum Declaration<'a> {
    Interface(&'a InterfaceDeclaration<'a>),
    TypeAlias(&'a TypeAliasDeclaration<'a>),
    Class(&'a ClassDeclaration<'a>),
    Enum(&'a EnumDeclaration<'a>),
    Function(&'a FunctionDeclaration<'a>),
    Variable(&'a VariableDeclaration<'a>),
    Module(&'a ModuleDeclaration<'a>),
}

impl<'a> Declaration<'a> {
    pub fn range(&self) -> TextRange {
        match self {
            Declaration::Interface(n) => n.data.range,
            Declaration::TypeAlias(n) => n.data.range,
            Declaration::Class(n) => n.data.range,
            Declaration::Enum(n) => n.data.range,
            Declaration::Function(n) => n.data.range,
            Declaration::Variable(n) => n.data.range,
            Declaration::Module(n) => n.data.range,
        }
    }

    /// Modifiers of the declaring statement.
    ///
    /// A variable declarator carries none of its own; the binder records the
    /// statement's modifiers on the symbol instead.
    pub fn modifier_flags(&self) -> ModifierFlags {
        match self {
            Declaration::Interface(n) => n.data.modifier_flags,
            Declaration::TypeAlias(n) => n.data.modifier_flags,
            Declaration::Class(n) => n.data.modifier_flags,
            Declaration::Enum(n) => n.data.modifier_flags,
            Declaration::Function(n) => n.data.modifier_flags,
            Declaration::Variable(n) => n.data.modifier_flags,
            Declaration::Module(n) => n.data.modifier_flags,
        }
    }
}

/// A named entity: an interface, alias, class, enum, function, variable or
/// namespace.
#[derive(Debug, Clone)]
pub struct Symbol<'a> {
    pub id: SymbolId,
    pub name: InternedString,
    pub flags: SymbolFlags,
    /// Every declaration merged into this symbol, in source order.
    pub declarations: Vec<Declaration<'a>>,
    /// Members of a namespace.
    pub exports: Option<SymbolTable>,
    /// The enclosing namespace symbol.
    pub parent: Option<SymbolId>,
}

impl<'a> Symbol<'a> {
    pub fn new(id: SymbolId, name: InternedString, flags: SymbolFlags) -> Self {
        Self {
            id,
            name,
            flags,
            declarations: Vec::new(),
            exports: None,
            parent: None,
        }
    }

    pub fn is_exported(&self) -> bool {
        self.flags.contains(SymbolFlags::EXPORTED)
    }

    /// The first declaration of the given shape.
    pub fn find_declaration<T>(&self, f: impl FnMut(&Declaration<'a>) -> Option<T>) -> Option<T> {
        self.declarations.iter().find_map(f)
    }
}

/// A symbol table maps names to symbols, remembering insertion order.
#[derive(Debug, Clone, Default)]
pub struct SymbolTable {
    table: FxHashMap<InternedString, SymbolId>,
    order: Vec<SymbolId>,
}

impl SymbolTable {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn get(&self, name: &InternedString) -> Option<SymbolId> {
        self.table.get(name).copied()
    }

    pub fn set(&mut self, name: InternedString, symbol: SymbolId) {
        if self.table.insert(name, symbol).is_none() {
            self.order.push(symbol);
        }
    }

    pub fn has(&self, name: &InternedString) -> bool {
        self.table.contains_key(name)
    }

    pub fn len(&self) -> usize {
        self.table.len()
    }

    pub fn is_empty(&self) -> bool {
        self.table.is_empty()
    }

    /// Symbols in the order they were first declared.
    pub fn iter(&self) -> impl Iterator<Item = SymbolId> + '_ {
        self.order.iter().copied()
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rscript_core::intern::StringInterner;

    #[test]
    fn test_symbol_table_keeps_first_insertion_order() {
        let interner = StringInterner::new();
        let mut table = SymbolTable::new();
        table.set(interner.intern("b"), SymbolId(0));
        table.set(interner.intern("a"), SymbolId(1));
        table.set(interner.intern("b"), SymbolId(0));
        assert_eq!(table.len(), 2);
        assert_eq!(table.iter().collect::<Vec<_>>(), vec![SymbolId(0), SymbolId(1)]);
        assert!(table.has(&interner.intern("a")));
        assert_eq!(table.get(&interner.intern("c")), None);
    }
}
