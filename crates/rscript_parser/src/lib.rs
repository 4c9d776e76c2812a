//! rscript_parser: Recursive descent parser for TypeScript.
//!
//! Parses token streams from the scanner into an arena-allocated AST.
//! Syntax errors never abort a parse: they are recorded on the resulting
//! [`SourceFile`] and the parser resynchronizes at the next statement.

mod error;
mod parser;
pub mod precedence;
pub mod utilities;

pub use error::ParseError;
pub use parser::{Parser, ParserOptions, DEFAULT_MAX_DEPTH};

use bumpalo::Bump;
use rscript_ast::node::SourceFile;

/// Parse `text` as the file `file_name`, recovering from every syntax error.
pub fn parse_source_file<'a>(arena: &'a Bump, file_name: &str, text: &str) -> SourceFile<'a> {
    Parser::new(arena, file_name, text).parse_source_file()
}

/// Parse `text`, failing on inputs that exceed the limits in `options`.
pub fn try_parse_source_file<'a>(
    arena: &'a Bump,
    file_name: &str,
    text: &str,
    options: ParserOptions,
) -> Result<SourceFile<'a>, ParseError> {
    Parser::with_options(arena, file_name, text, options).try_parse_source_file()
}
