//! Offsets, spans, and selections.
//!
//! The jump engine works in **char offsets**: absolute indices into a buffer
//! counted in Unicode scalar values, exactly how `ropey` indexes text. Three
//! types build on that:
//!
//! - [`Span`] — a half-open `[begin, end)` offset range (candidates, labeled
//!   regions, visible windows)
//! - [`Selection`] — an anchor/head pair; a zero-width selection is a cursor
//! - [`Position`] — a 0-indexed `(line, col)` pair for human display only
//!
//! Display layers convert to 1-indexed; that conversion never belongs here.

use std::fmt;

// ---------------------------------------------------------------------------
// Position
// ---------------------------------------------------------------------------

/// A position in a text buffer: (line, column), both 0-indexed.
///
/// `col` is the char offset from the start of the line, **not** a byte offset.
/// The engine itself never uses positions; they exist so the driver can
/// report where the cursor landed.
#[derive(Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct Position {
    pub line: usize,
    pub col: usize,
}

impl Position {
    /// The origin, line 0 column 0.
    pub const ZERO: Self = Self { line: 0, col: 0 };

    /// Create a new position.
    #[inline]
    #[must_use]
    pub const fn new(line: usize, col: usize) -> Self {
        Self { line, col }
    }
}

impl fmt::Debug for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Pos({}:{})", self.line, self.col)
    }
}

impl fmt::Display for Position {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        // 1-indexed for human display.
        write!(f, "{}:{}", self.line + 1, self.col + 1)
    }
}

// ---------------------------------------------------------------------------
// Span
// ---------------------------------------------------------------------------

/// A half-open char offset range: `[begin, end)`.
///
/// `begin` is inclusive, `end` is exclusive. An empty span has
/// `begin == end`. Spans are always normalized so that `begin <= end`.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Span {
    pub begin: usize,
    pub end: usize,
}

impl Span {
    /// Create a span. Panics in debug if `begin > end`.
    #[inline]
    #[must_use]
    pub const fn new(begin: usize, end: usize) -> Self {
        debug_assert!(begin <= end, "Span::new requires begin <= end");
        Self { begin, end }
    }

    /// A one-character span starting at `offset`.
    #[inline]
    #[must_use]
    pub const fn char_at(offset: usize) -> Self {
        Self {
            begin: offset,
            end: offset + 1,
        }
    }

    /// Number of chars covered.
    #[inline]
    #[must_use]
    pub const fn len(self) -> usize {
        self.end - self.begin
    }

    /// True when the span covers nothing.
    #[inline]
    #[must_use]
    pub const fn is_empty(self) -> bool {
        self.begin == self.end
    }

    /// The same span moved right by `delta` chars.
    #[inline]
    #[must_use]
    pub const fn shifted(self, delta: usize) -> Self {
        Self {
            begin: self.begin + delta,
            end: self.end + delta,
        }
    }
}

impl fmt::Debug for Span {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Span({}..{})", self.begin, self.end)
    }
}

// ---------------------------------------------------------------------------
// Selection
// ---------------------------------------------------------------------------

/// A selection: `anchor` stays put, `head` is where the cursor is drawn.
///
/// The head may sit before the anchor (a backwards selection). A selection
/// whose anchor equals its head is a plain cursor.
#[derive(Clone, Copy, PartialEq, Eq, Hash)]
pub struct Selection {
    pub anchor: usize,
    pub head: usize,
}

impl Selection {
    /// A selection from `anchor` to `head`.
    #[inline]
    #[must_use]
    pub const fn new(anchor: usize, head: usize) -> Self {
        Self { anchor, head }
    }

    /// A zero-width cursor at `offset`.
    #[inline]
    #[must_use]
    pub const fn cursor(offset: usize) -> Self {
        Self {
            anchor: offset,
            head: offset,
        }
    }

    /// The lower of anchor and head.
    #[inline]
    #[must_use]
    pub const fn begin(self) -> usize {
        if self.anchor < self.head {
            self.anchor
        } else {
            self.head
        }
    }

    /// The higher of anchor and head.
    #[inline]
    #[must_use]
    pub const fn end(self) -> usize {
        if self.anchor > self.head {
            self.anchor
        } else {
            self.head
        }
    }

    /// True when the selection is a plain cursor.
    #[inline]
    #[must_use]
    pub const fn is_cursor(self) -> bool {
        self.anchor == self.head
    }

    /// The covered range, direction dropped.
    #[inline]
    #[must_use]
    pub const fn span(self) -> Span {
        Span::new(self.begin(), self.end())
    }
}

impl fmt::Debug for Selection {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "Sel({}->{})", self.anchor, self.head)
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    // -- Position -----------------------------------------------------------

    #[test]
    fn position_ordering_is_line_first() {
        assert!(Position::new(0, 100) < Position::new(1, 0));
        assert!(Position::new(1, 3) < Position::new(1, 7));
    }

    #[test]
    fn position_display_is_1_indexed() {
        assert_eq!(format!("{}", Position::ZERO), "1:1");
        assert_eq!(format!("{}", Position::new(9, 14)), "10:15");
    }

    #[test]
    fn position_debug_format() {
        assert_eq!(format!("{:?}", Position::new(2, 5)), "Pos(2:5)");
    }

    // -- Span ---------------------------------------------------------------

    #[test]
    fn span_char_at_is_one_wide() {
        let s = Span::char_at(4);
        assert_eq!(s, Span::new(4, 5));
        assert_eq!(s.len(), 1);
        assert!(!s.is_empty());
    }

    #[test]
    fn span_shifted() {
        assert_eq!(Span::new(2, 4).shifted(3), Span::new(5, 7));
        assert_eq!(Span::new(2, 4).shifted(0), Span::new(2, 4));
    }

    #[test]
    fn span_debug_format() {
        assert_eq!(format!("{:?}", Span::new(1, 3)), "Span(1..3)");
    }

    // -- Selection ----------------------------------------------------------

    #[test]
    fn cursor_is_zero_width() {
        let c = Selection::cursor(7);
        assert!(c.is_cursor());
        assert_eq!(c.begin(), 7);
        assert_eq!(c.end(), 7);
        assert!(c.span().is_empty());
    }

    #[test]
    fn backwards_selection_normalizes_span() {
        let s = Selection::new(9, 2);
        assert!(!s.is_cursor());
        assert_eq!(s.begin(), 2);
        assert_eq!(s.end(), 9);
        assert_eq!(s.span(), Span::new(2, 9));
    }

    #[test]
    fn selection_debug_format() {
        assert_eq!(format!("{:?}", Selection::new(2, 9)), "Sel(2->9)");
    }
}
