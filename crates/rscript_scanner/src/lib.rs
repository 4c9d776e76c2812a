//! rscript_scanner: tokenizer for TypeScript source text.
//!
//! Produces the token stream the parser consumes, with cooked string and
//! template values, numeric literal flags, regular expression rescanning and
//! Unicode identifiers.

mod scanner;
mod token;

pub use scanner::{is_identifier_part, is_identifier_start, is_identifier_text, tokenize, Scanner, ScannerState};
pub use token::TokenInfo;
