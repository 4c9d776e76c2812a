//! rscript_ast: syntax tree definitions.
//!
//! Defines the `SyntaxKind` enum, the flag types shared with the binder and
//! checker, the arena-allocated typed AST, and the uniform `Node` view used
//! by generic tree walkers.

pub mod node;
pub mod node_ref;
pub mod syntax_kind;
pub mod types;

pub use node::*;
pub use node_ref::Node;
pub use syntax_kind::SyntaxKind;
pub use types::*;
