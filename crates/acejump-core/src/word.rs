//! Character classes and the small motions a jump finishes with.
//!
//! The resolver needs two things from here: whether a character counts as a
//! word character (for boundary snapping), and where "one semantic unit
//! forward" lands when a jump-after is requested:
//!
//! | Motion | Used after | Lands |
//! |--------|------------|-------|
//! | [`word_end`] | word / within-line jumps | just past the end of the word |
//! | [`char_forward`] | char / regex jumps | one character right |
//! | [`line_end`] | line jumps | before the line ending |
//!
//! All motions read through [`TextSource`] so they work on any host view,
//! not only on a local [`Buffer`].

use crate::buffer::Buffer;

// ---------------------------------------------------------------------------
// TextSource
// ---------------------------------------------------------------------------

/// Read-only char access by offset.
pub trait TextSource {
    /// The character at `offset`, or `None` past the end.
    fn char_at(&self, offset: usize) -> Option<char>;
}

impl TextSource for Buffer {
    fn char_at(&self, offset: usize) -> Option<char> {
        Self::char_at(self, offset)
    }
}

impl TextSource for str {
    fn char_at(&self, offset: usize) -> Option<char> {
        self.chars().nth(offset)
    }
}

// ---------------------------------------------------------------------------
// Character classification
// ---------------------------------------------------------------------------

/// Character class for word boundary detection.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CharClass {
    /// Letters, digits, underscore.
    Word,
    /// Non-blank, non-word characters (operators, brackets, etc.).
    Punctuation,
    /// Whitespace within a line (space, tab).
    Blank,
    /// Line ending (`\n`, `\r`).
    Newline,
}

/// Classify a character.
#[must_use]
pub fn classify(ch: char) -> CharClass {
    if is_newline(ch) {
        CharClass::Newline
    } else if ch.is_whitespace() {
        CharClass::Blank
    } else if is_word_char(ch) {
        CharClass::Word
    } else {
        CharClass::Punctuation
    }
}

/// True for the characters a regex `\w` matches: letters, digits, underscore.
#[inline]
#[must_use]
pub fn is_word_char(ch: char) -> bool {
    ch.is_alphanumeric() || ch == '_'
}

/// True for `\n` and `\r`.
#[inline]
#[must_use]
pub const fn is_newline(ch: char) -> bool {
    ch == '\n' || ch == '\r'
}

// ---------------------------------------------------------------------------
// Motions
// ---------------------------------------------------------------------------

/// Forward to the end of the current or next word.
///
/// 1. Skip blanks and newlines.
/// 2. Skip the run of same-class characters (word or punctuation).
///
/// Returns the offset just past the run. At the end of the text the offset
/// stays where the scan stopped.
#[must_use]
pub fn word_end<T: TextSource + ?Sized>(text: &T, offset: usize) -> usize {
    let mut idx = offset;

    while let Some(ch) = text.char_at(idx) {
        if matches!(classify(ch), CharClass::Word | CharClass::Punctuation) {
            break;
        }
        idx += 1;
    }

    let Some(first) = text.char_at(idx) else {
        return idx;
    };
    let class = classify(first);
    while text.char_at(idx).is_some_and(|ch| classify(ch) == class) {
        idx += 1;
    }
    idx
}

/// One character right, never past the end of the text.
#[must_use]
pub fn char_forward<T: TextSource + ?Sized>(text: &T, offset: usize) -> usize {
    if text.char_at(offset).is_some() {
        offset + 1
    } else {
        offset
    }
}

/// Forward to the line ending of the line containing `offset` (the cursor
/// lands before `\n`/`\r`, or at the end of the text).
#[must_use]
pub fn line_end<T: TextSource + ?Sized>(text: &T, offset: usize) -> usize {
    let mut idx = offset;
    while text.char_at(idx).is_some_and(|ch| !is_newline(ch)) {
        idx += 1;
    }
    idx
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
