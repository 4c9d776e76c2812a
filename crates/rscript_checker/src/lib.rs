//! rscript_checker: declared-type resolution.
//!
//! The checker binds each source file, resolves its interfaces, type
//! aliases, classes, enums, variables and functions into a [`TypeTable`],
//! and answers questions about the resulting types: their members, union
//! constituents, generic instantiations and printed form.

mod checker;
mod default_lib;
mod types;

pub use checker::Checker;
pub use rscript_ast::types::TypeId;
pub use types::{ObjectType, Property, Signature, SignatureParameter, Type, TypeKind, TypeTable};
