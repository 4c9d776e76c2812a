//! Owned snapshot of a scanned token.

use rscript_ast::syntax_kind::SyntaxKind;
use rscript_ast::types::TokenFlags;

#[derive(Debug, Clone, PartialEq)]
pub struct TokenInfo {
    pub kind: SyntaxKind,
    /// Start offset, after leading trivia.
    pub pos: u32,
    pub end: u32,
    /// Identifier name, cooked literal value or raw numeric text.
    pub text: String,
    pub flags: TokenFlags,
}

impl TokenInfo {
    pub fn len(&self) -> u32 {
        self.end - self.pos
    }

    pub fn is_empty(&self) -> bool {
        self.pos == self.end
    }

    pub fn has_preceding_line_break(&self) -> bool {
        self.flags.contains(TokenFlags::PRECEDING_LINE_BREAK)
    }
}
