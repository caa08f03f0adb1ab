//! Source position tracking.
//!
//! Every token and AST node carries a [`SourceSpan`] so diagnostics can point
//! back at the exact bytes that produced them.

/// A single point in source text: 1-based line, 1-based column, 0-based byte
/// offset.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash)]
pub struct SourceLocation {
    pub line: usize,
    pub column: usize,
    pub offset: usize,
}

impl SourceLocation {
    pub fn new(line: usize, column: usize, offset: usize) -> Self {
        Self {
            line,
            column,
            offset,
        }
    }

    pub const fn start() -> Self {
        Self {
            line: 1,
            column: 1,
            offset: 0,
        }
    }
}

/// A half-open range `[start, end)` between two [`SourceLocation`]s.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct SourceSpan {
    pub start: SourceLocation,
    pub end: SourceLocation,
}

impl SourceSpan {
    pub fn new(start: SourceLocation, end: SourceLocation) -> Self {
        Self { start, end }
    }

    /// A zero-width span at a single location, used for errors that have no
    /// natural range (e.g. end-of-file).
    pub fn at(loc: SourceLocation) -> Self {
        Self {
            start: loc,
            end: loc,
        }
    }

    pub fn merge(self, other: SourceSpan) -> SourceSpan {
        let start = if self.start.offset <= other.start.offset {
            self.start
        } else {
            other.start
        };
        let end = if self.end.offset >= other.end.offset {
            self.end
        } else {
            other.end
        };
        SourceSpan { start, end }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn merge_picks_outer_bounds() {
        let a = SourceSpan::new(SourceLocation::new(1, 1, 0), SourceLocation::new(1, 5, 4));
        let b = SourceSpan::new(SourceLocation::new(2, 1, 10), SourceLocation::new(2, 3, 12));
        let merged = a.merge(b);
        assert_eq!(merged.start.offset, 0);
        assert_eq!(merged.end.offset, 12);
    }
}
