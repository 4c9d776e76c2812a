//! Declaration containers for the binder.

use crate::symbol::SymbolTable;
use rscript_ast::types::SymbolId;

/// A container receiving declarations: the file's globals, or the body of a
/// namespace. Scopes form a stack mirroring namespace nesting.
#[derive(Debug, Default)]
pub struct Scope {
    /// The symbols declared directly in this container.
    pub locals: SymbolTable,
    /// The namespace symbol that owns `locals`, or `None` for globals.
    pub container: Option<SymbolId>,
}

impl Scope {
    pub fn new(locals: SymbolTable, container: Option<SymbolId>) -> Self {
        Self { locals, container }
    }
}
