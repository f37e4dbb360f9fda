//! Matcher — finding jump candidates inside a window.
//!
//! A [`PatternKind`] says *what* to jump to; a compiled [`Pattern`] is what
//! the host searches with. [`scan`] walks a window left to right, asking the
//! host for the next match each time, and keeps only the leading character
//! of every match as a candidate.
//!
//! # Batches and resumption
//!
//! A scan stops at whichever comes first:
//!
//! - the batch is full (`labeled == max_labels`)
//! - the host finds nothing more
//! - the next match would end at or past the window end; a match cut off
//!   at the edge of the screen is never labeled
//!
//! When the batch fills up, the [`ScanCursor`] keeps the offset to resume
//! from. Otherwise the window is exhausted and the cursor is cleared, so the
//! next scan (of this or another view) starts at its window's beginning.

use regex::{Regex, RegexBuilder};
use tracing::trace;

use crate::error::PatternError;
use crate::host::{Host, ViewId};
use crate::position::Span;

// ---------------------------------------------------------------------------
// Pattern kinds
// ---------------------------------------------------------------------------

/// What a jump targets.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum PatternKind {
    /// The first character of every word.
    WordStart,
    /// Every letter followed by at least two more characters on its line.
    CharStart,
    /// The first character of every non-blank line.
    LineStart,
    /// The first and last character of every word on the current line.
    WithinLine,
    /// A user-supplied regular expression.
    Regex(String),
}

impl PatternKind {
    /// The regular expression this kind searches with.
    #[must_use]
    pub fn source(&self) -> &str {
        match self {
            Self::WordStart => r"\b\w+",
            Self::CharStart => r"[a-zA-Z]..",
            Self::LineStart => r".*\S.*\n",
            Self::WithinLine => r"\b\w|\w\b",
            Self::Regex(source) => source,
        }
    }

    /// Where this kind looks for candidates.
    #[must_use]
    pub const fn region(&self) -> RegionKind {
        match self {
            Self::WithinLine => RegionKind::CurrentLine,
            Self::WordStart | Self::CharStart | Self::LineStart | Self::Regex(_) => {
                RegionKind::VisibleRegion
            }
        }
    }

    /// Prompt title while this kind is active.
    #[must_use]
    pub const fn prompt(&self) -> &'static str {
        match self {
            Self::WordStart => "Jump Target",
            Self::CharStart => "Char",
            Self::LineStart => "Line",
            Self::WithinLine => "Within Line",
            Self::Regex(_) => "Pattern",
        }
    }
}

/// The window a scan covers.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RegionKind {
    /// Everything currently on screen.
    VisibleRegion,
    /// The line holding the view's first selection.
    CurrentLine,
}

impl RegionKind {
    /// Resolve to a concrete span in `view`.
    #[must_use]
    pub fn window<H: Host + ?Sized>(self, host: &H, view: ViewId) -> Span {
        match self {
            Self::VisibleRegion => host.visible_region(view),
            Self::CurrentLine => {
                let cursor = host
                    .selections(view)
                    .first()
                    .map_or(0, |sel| sel.begin());
                host.line_region(view, cursor)
            }
        }
    }
}

// ---------------------------------------------------------------------------
// Pattern
// ---------------------------------------------------------------------------

/// A compiled search pattern.
#[derive(Debug, Clone)]
pub struct Pattern {
    regex: Regex,
}

impl Pattern {
    /// Compile `kind`, folding case unless `case_sensitive`.
    ///
    /// # Errors
    ///
    /// Returns an error if a [`PatternKind::Regex`] source doesn't compile.
    pub fn new(kind: &PatternKind, case_sensitive: bool) -> Result<Self, PatternError> {
        let regex = RegexBuilder::new(kind.source())
            .case_insensitive(!case_sensitive)
            .build()?;
        Ok(Self { regex })
    }

    /// First match in `haystack` starting at byte `from`, as a byte range.
    ///
    /// The whole haystack stays visible to the regex, so `\b` at `from` sees
    /// the character before it.
    #[must_use]
    pub fn find_at(&self, haystack: &str, from: usize) -> Option<(usize, usize)> {
        if from > haystack.len() {
            return None;
        }
        self.regex.find_at(haystack, from).map(|m| (m.start(), m.end()))
    }
}

// ---------------------------------------------------------------------------
// Scanning
// ---------------------------------------------------------------------------

/// Resumable scan state, kept across batches of one session.
#[derive(Debug, Default, Clone, Copy, PartialEq, Eq)]
pub struct ScanCursor {
    resume: Option<usize>,
}

impl ScanCursor {
    /// A fresh cursor: the next scan starts at its window's beginning.
    #[must_use]
    pub const fn new() -> Self {
        Self { resume: None }
    }

    /// True when the last scan reached the end of its window.
    #[must_use]
    pub const fn is_exhausted(&self) -> bool {
        self.resume.is_none()
    }

    /// Forget any resume point.
    pub const fn reset(&mut self) {
        self.resume = None;
    }
}

/// Scan `window` of `view` for candidates.
///
/// `labeled` is the batch-wide label count; it grows by one per candidate
/// and the scan never lets it exceed `max_labels`. Candidates are returned as
/// one-character spans in scan order.
pub fn scan<H: Host + ?Sized>(
    host: &H,
    view: ViewId,
    window: Span,
    pattern: &Pattern,
    max_labels: usize,
    labeled: &mut usize,
    cursor: &mut ScanCursor,
) -> Vec<Span> {
    let mut candidates = Vec::new();
    let mut next = cursor.resume.unwrap_or(window.begin);

    while next < window.end && *labeled < max_labels {
        let Some(found) = host.find(view, pattern, next) else {
            break;
        };
        if found.end >= window.end {
            break;
        }

        trace!(%view, begin = found.begin, end = found.end, "candidate");
        *labeled += 1;
        // An empty match must still move the scan forward.
        next = if found.is_empty() {
            found.end + 1
        } else {
            found.end
        };
        candidates.push(Span::char_at(found.begin));
    }

    cursor.resume = if *labeled < max_labels {
        None
    } else {
        Some(next)
    };

    candidates
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
