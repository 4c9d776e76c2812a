//! Errors for parses that cannot produce a usable tree.

use thiserror::Error;

/// A parse that failed outright.
///
/// Ordinary syntax errors are not failures; they are recovered from and
/// recorded in `SourceFile::parse_diagnostics`.
#[derive(Debug, Clone, PartialEq, Eq, Error)]
pub enum ParseError {
    #[error("source text is {length} bytes, above the limit of {limit}")]
    SourceTooLarge { length: usize, limit: usize },

    #[error("nesting deeper than {depth} levels at offset {pos}")]
    NestingTooDeep { depth: u32, pos: u32 },
}
