//! Text buffer — rope-backed storage for the reference host.
//!
//! A `Buffer` wraps a [`ropey::Rope`] with the handful of operations the jump
//! engine needs from a host: char access by offset, span replacement, line
//! lookup for visible windows, and file I/O.
//!
//! # Design choices
//!
//! - **Offsets are char indices**, not byte offsets. Offset 3 of `"café"` is
//!   `'é'`. Byte offsets never leak into the public API; the one place that
//!   needs them (regex search) converts through the rope.
//!
//! - **No line-ending normalization.** Label overlays are reverted before a
//!   save ever happens, so the buffer writes back exactly the bytes it holds.
//!
//! - **No undo here.** The overlay transaction lives in [`crate::history`],
//!   which wraps `Buffer::replace` with recorded inverses.

use std::fmt;
use std::fs;
use std::io;
use std::path::{Path, PathBuf};

use ropey::Rope;

use crate::position::{Position, Span};

// ---------------------------------------------------------------------------
// Buffer
// ---------------------------------------------------------------------------

/// A text buffer backed by a rope.
///
/// Tracks the text, an optional file path, a modified flag, and a read-only
/// flag (read-only buffers are never saved after a jump).
pub struct Buffer {
    rope: Rope,
    path: Option<PathBuf>,
    modified: bool,
    read_only: bool,
}

impl Buffer {
    // -- Construction -------------------------------------------------------

    /// Create an empty buffer with no file path.
    #[must_use]
    pub fn new() -> Self {
        Self {
            rope: Rope::new(),
            path: None,
            modified: false,
            read_only: false,
        }
    }

    /// Create a buffer from a string.
    #[must_use]
    pub fn from_text(text: &str) -> Self {
        Self {
            rope: Rope::from_str(text),
            ..Self::new()
        }
    }

    /// Load a buffer from a file. The buffer starts unmodified.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or contains invalid UTF-8.
    pub fn from_file(path: &Path) -> io::Result<Self> {
        let text = fs::read_to_string(path)?;
        Ok(Self {
            rope: Rope::from_str(&text),
            path: Some(path.to_path_buf()),
            ..Self::new()
        })
    }

    // -- Text access --------------------------------------------------------

    /// Total character count (Unicode scalar values, not bytes).
    #[inline]
    #[must_use]
    pub fn len_chars(&self) -> usize {
        self.rope.len_chars()
    }

    /// True when the buffer contains no text.
    #[inline]
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.rope.len_chars() == 0
    }

    /// Total number of lines. A buffer ending with `\n` has a trailing empty
    /// line, matching how editors display files.
    #[inline]
    #[must_use]
    pub fn line_count(&self) -> usize {
        self.rope.len_lines()
    }

    /// The character at `offset`, or `None` past the end.
    #[inline]
    #[must_use]
    pub fn char_at(&self, offset: usize) -> Option<char> {
        self.rope.get_char(offset)
    }

    /// The text covered by `span`, or `None` if it runs past the end.
    #[must_use]
    pub fn slice(&self, span: Span) -> Option<String> {
        self.rope
            .get_slice(span.begin..span.end)
            .map(|s| s.to_string())
    }

    /// Collect all text into a `String`.
    #[must_use]
    pub fn contents(&self) -> String {
        self.rope.to_string()
    }

    // -- Lines --------------------------------------------------------------

    /// The line containing `offset`, including its line ending.
    ///
    /// Offsets past the end clamp to the last line.
    #[must_use]
    pub fn line_span(&self, offset: usize) -> Span {
        let offset = offset.min(self.rope.len_chars());
        let line = self.rope.char_to_line(offset);
        let begin = self.rope.line_to_char(line);
        Span::new(begin, begin + self.rope.line(line).len_chars())
    }

    /// The span covering `count` lines starting at `first`. Lines past the
    /// end of the buffer are ignored, so the result may be shorter.
    #[must_use]
    pub fn lines_span(&self, first: usize, count: usize) -> Span {
        let lines = self.rope.len_lines();
        let first = first.min(lines);
        let last = first.saturating_add(count).min(lines);
        let begin = self.rope.line_to_char(first);
        let end = if last >= lines {
            self.rope.len_chars()
        } else {
            self.rope.line_to_char(last)
        };
        Span::new(begin, end)
    }

    /// Convert an offset to a `(line, col)` position. Offsets past the end
    /// clamp to the end of the buffer.
    #[must_use]
    pub fn offset_to_pos(&self, offset: usize) -> Position {
        let offset = offset.min(self.rope.len_chars());
        let line = self.rope.char_to_line(offset);
        Position::new(line, offset - self.rope.line_to_char(line))
    }

    /// Convert a char offset to a byte offset. Offsets past the end clamp.
    #[inline]
    #[must_use]
    pub fn offset_to_byte(&self, offset: usize) -> usize {
        self.rope.char_to_byte(offset.min(self.rope.len_chars()))
    }

    /// Convert a byte offset to a char offset. Offsets past the end clamp.
    #[inline]
    #[must_use]
    pub fn byte_to_offset(&self, byte: usize) -> usize {
        self.rope.byte_to_char(byte.min(self.rope.len_bytes()))
    }

    // -- Editing ------------------------------------------------------------

    /// Replace the text in `span` with `text`, returning the removed text.
    ///
    /// # Panics
    ///
    /// Panics if `span` runs past the end of the buffer.
    pub fn replace(&mut self, span: Span, text: &str) -> String {
        let removed = self.rope.slice(span.begin..span.end).to_string();
        self.rope.remove(span.begin..span.end);
        self.rope.insert(span.begin, text);
        self.modified = true;
        removed
    }

    // -- Metadata -----------------------------------------------------------

    /// The file path this buffer is associated with, if any.
    #[inline]
    #[must_use]
    pub fn path(&self) -> Option<&Path> {
        self.path.as_deref()
    }

    /// Set the file path for this buffer.
    #[inline]
    pub fn set_path(&mut self, path: PathBuf) {
        self.path = Some(path);
    }

    /// True if the buffer has been modified since the last save (or creation).
    #[inline]
    #[must_use]
    pub const fn is_modified(&self) -> bool {
        self.modified
    }

    /// Force the modified flag. Undo uses this to put back the flag a
    /// transaction started from.
    #[inline]
    pub const fn set_modified(&mut self, modified: bool) {
        self.modified = modified;
    }

    /// True if the buffer must not be written.
    #[inline]
    #[must_use]
    pub const fn is_read_only(&self) -> bool {
        self.read_only
    }

    /// Mark the buffer read-only (or writable again).
    #[inline]
    pub const fn set_read_only(&mut self, read_only: bool) {
        self.read_only = read_only;
    }

    // -- File I/O -----------------------------------------------------------

    /// Save the buffer to its associated file path and mark it unmodified.
    ///
    /// # Errors
    ///
    /// Returns an error if no path is set or the write fails.
    pub fn save(&mut self) -> io::Result<()> {
        let path = self
            .path
            .clone()
            .ok_or_else(|| io::Error::new(io::ErrorKind::NotFound, "buffer has no file path"))?;
        fs::write(&path, self.rope.to_string())?;
        self.modified = false;
        Ok(())
    }
}

impl Default for Buffer {
    fn default() -> Self {
        Self::new()
    }
}

impl fmt::Debug for Buffer {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("Buffer")
            .field("lines", &self.line_count())
            .field("chars", &self.len_chars())
            .field("modified", &self.modified)
            .field("read_only", &self.read_only)
            .field("path", &self.path)
            .finish_non_exhaustive()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
