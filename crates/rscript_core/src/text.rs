//! Source positions.
//!
//! Every node carries a [`TextRange`] of byte offsets into its file's text.
//! Diagnostics carry a [`TextSpan`]. [`LineMap`] turns offsets into lines for
//! call-site reports.

use std::fmt;
use std::ops::Range;

/// A byte offset into source text.
pub type TextPos = u32;

/// A start offset plus a length, the shape diagnostics use.
#[derive(Copy, Clone, Eq, PartialEq, Hash)]
pub struct TextSpan {
    pub start: TextPos,
    pub length: TextPos,
}

impl TextSpan {
    #[inline]
    pub fn new(start: TextPos, length: TextPos) -> Self {
        Self { start, length }
    }

    /// Span between two offsets; an inverted pair yields an empty span at `start`.
    #[inline]
    pub fn from_bounds(start: TextPos, end: TextPos) -> Self {
        Self {
            start,
            length: end.saturating_sub(start),
        }
    }

    #[inline]
    pub fn end(&self) -> TextPos {
        self.start + self.length
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.length == 0
    }

    #[inline]
    pub fn contains(&self, pos: TextPos) -> bool {
        pos >= self.start && pos < self.end()
    }
}

impl fmt::Debug for TextSpan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}+{}", self.start, self.length)
    }
}

impl fmt::Display for TextSpan {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "[{}, {})", self.start, self.end())
    }
}

/// A half-open byte range `pos..end`.
#[derive(Copy, Clone, Eq, PartialEq, Hash, Default)]
pub struct TextRange {
    pub pos: TextPos,
    pub end: TextPos,
}

impl TextRange {
    #[inline]
    pub fn new(pos: TextPos, end: TextPos) -> Self {
        Self { pos, end }
    }

    #[inline]
    pub fn empty(pos: TextPos) -> Self {
        Self { pos, end: pos }
    }

    #[inline]
    pub fn len(&self) -> TextPos {
        self.end.saturating_sub(self.pos)
    }

    #[inline]
    pub fn is_empty(&self) -> bool {
        self.end <= self.pos
    }

    #[inline]
    pub fn to_span(&self) -> TextSpan {
        TextSpan::from_bounds(self.pos, self.end)
    }

    /// Range usable for slicing the source string.
    #[inline]
    pub fn to_range(&self) -> Range<usize> {
        self.pos as usize..self.end as usize
    }

    /// Whether `other` lies entirely inside this range.
    #[inline]
    pub fn encloses(&self, other: TextRange) -> bool {
        other.pos >= self.pos && other.end <= self.end
    }
}

impl fmt::Debug for TextRange {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{}..{}", self.pos, self.end)
    }
}

impl From<TextRange> for TextSpan {
    fn from(range: TextRange) -> Self {
        range.to_span()
    }
}

/// Zero-based line and byte column.
#[derive(Debug, Copy, Clone, Eq, PartialEq)]
pub struct LineAndColumn {
    pub line: u32,
    pub column: u32,
}

/// Offsets of line starts, for offset-to-line lookups.
///
/// `\n`, `\r\n` and a lone `\r` all end a line.
#[derive(Debug, Clone)]
pub struct LineMap {
    line_starts: Vec<TextPos>,
}

impl LineMap {
    pub fn new(text: &str) -> Self {
        let bytes = text.as_bytes();
        let mut line_starts = vec![0];
        let mut i = 0;
        while i < bytes.len() {
            match bytes[i] {
                b'\r' if bytes.get(i + 1) == Some(&b'\n') => {
                    i += 2;
                    line_starts.push(i as TextPos);
                }
                b'\n' | b'\r' => {
                    i += 1;
                    line_starts.push(i as TextPos);
                }
                _ => i += 1,
            }
        }
        Self { line_starts }
    }

    /// Zero-based line containing `pos`.
    pub fn line_of(&self, pos: TextPos) -> u32 {
        match self.line_starts.binary_search(&pos) {
            Ok(line) => line as u32,
            Err(next) => next.saturating_sub(1) as u32,
        }
    }

    /// One-based line number, the form shown to people.
    pub fn line_number(&self, pos: TextPos) -> u32 {
        self.line_of(pos) + 1
    }

    pub fn line_and_column_of(&self, pos: TextPos) -> LineAndColumn {
        let line = self.line_of(pos);
        let start = self.line_starts.get(line as usize).copied().unwrap_or(0);
        LineAndColumn {
            line,
            column: pos.saturating_sub(start),
        }
    }

    pub fn line_count(&self) -> usize {
        self.line_starts.len()
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_span_bounds() {
        let span = TextSpan::from_bounds(5, 15);
        assert_eq!(span.length, 10);
        assert_eq!(span.end(), 15);
        assert!(span.contains(14));
        assert!(!span.contains(15));
        assert!(TextSpan::from_bounds(9, 3).is_empty());
    }

    #[test]
    fn test_range_encloses() {
        let outer = TextRange::new(0, 20);
        assert!(outer.encloses(TextRange::new(3, 20)));
        assert!(!outer.encloses(TextRange::new(3, 21)));
        assert_eq!(TextRange::new(4, 9).len(), 5);
        assert_eq!(TextRange::new(4, 9).to_range(), 4..9);
    }

    #[test]
    fn test_line_map_newlines() {
        let map = LineMap::new("a\nbb\r\nccc\rd");
        assert_eq!(map.line_count(), 4);
        assert_eq!(map.line_of(0), 0);
        assert_eq!(map.line_of(1), 0);
        assert_eq!(map.line_of(2), 1);
        assert_eq!(map.line_of(6), 2);
        assert_eq!(map.line_number(10), 4);

        let lc = map.line_and_column_of(7);
        assert_eq!(lc, LineAndColumn { line: 2, column: 1 });
    }
}
