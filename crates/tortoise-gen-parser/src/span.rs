//! Byte ranges into the schema source, used to point errors at their text.

use std::ops::Range;

/// Half-open byte range `start..end`.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Span {
    pub start: usize,
    pub end: usize,
}

impl Span {
    pub fn new(start: usize, end: usize) -> Self {
        Self { start, end }
    }

    /// Smallest span containing `self` and `other`.
    pub fn merge(self, other: Span) -> Span {
        Span::new(self.start.min(other.start), self.end.max(other.end))
    }

    /// Number of bytes covered, for underlining in error excerpts.
    pub(crate) fn width(&self) -> usize {
        self.end.saturating_sub(self.start)
    }
}

impl From<Range<usize>> for Span {
    fn from(range: Range<usize>) -> Self {
        Span::new(range.start, range.end)
    }
}

/// A parsed name together with where it was written.
#[derive(Debug, Clone, PartialEq)]
pub struct Spanned<T> {
    pub value: T,
    pub span: Span,
}

impl<T> Spanned<T> {
    pub fn new(value: T, span: Span) -> Self {
        Self { value, span }
    }
}

/// 1-based `(line, column)` of a byte offset; columns count chars.
pub fn offset_to_line_col(source: &str, offset: usize) -> (usize, usize) {
    let mut end = offset.min(source.len());
    while !source.is_char_boundary(end) {
        end -= 1;
    }
    let before = &source[..end];
    let line = before.matches('\n').count() + 1;
    let line_start = before.rfind('\n').map_or(0, |i| i + 1);
    (line, before[line_start..].chars().count() + 1)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_merge_covers_both() {
        let merged = Span::new(5, 10).merge(Span::new(8, 15));
        assert_eq!(merged, Span::new(5, 15));
        assert_eq!(merged.width(), 10);
        assert_eq!(Span::from(3..7), Span::new(3, 7));
    }

    #[test]
    fn test_offset_to_line_col() {
        let source = "model\nUser {\n}";

        assert_eq!(offset_to_line_col(source, 0), (1, 1));
        assert_eq!(offset_to_line_col(source, 5), (1, 6));
        assert_eq!(offset_to_line_col(source, 6), (2, 1));
        assert_eq!(offset_to_line_col(source, 11), (2, 6));
        assert_eq!(offset_to_line_col(source, 13), (3, 1));
        assert_eq!(offset_to_line_col(source, 99), (3, 2));
    }
}
