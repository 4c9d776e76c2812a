//! rscript_core: shared primitives for the rscript query crates.
//!
//! Text ranges and line maps used to locate nodes, and the string interner
//! used by the binder and checker for names.

pub mod intern;
pub mod text;

pub use intern::{InternedString, StringInterner};
pub use text::{LineMap, TextRange, TextSpan};
