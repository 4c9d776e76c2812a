//! rscript_binder: Symbol table construction.
//!
//! The binder walks the declarations of a parsed file and creates one symbol
//! per name, merging declarations that may share a name and reporting the
//! ones that may not.

mod binder;
mod scope;
mod symbol;

pub use binder::{bind_source_file, Binder};
pub use symbol::{Declaration, Symbol, SymbolTable};
