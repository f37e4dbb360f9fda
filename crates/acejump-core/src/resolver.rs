//! Jump resolution — from a resolved offset to the selections a view ends
//! up with.
//!
//! Resolution is pure: it reads text through [`TextSource`] and returns new
//! selections. The session controller applies them to the host.

use std::fmt;

use crate::matcher::PatternKind;
use crate::position::Selection;
use crate::word::{TextSource, char_forward, is_word_char, line_end, word_end};

// ---------------------------------------------------------------------------
// JumpMode
// ---------------------------------------------------------------------------

/// How a jump changes the selections.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq, Hash)]
pub enum JumpMode {
    /// Move: one cursor at the target.
    #[default]
    Normal,
    /// Extend every selection to the target.
    Select,
    /// Keep the selections and add a cursor at the target.
    AddCursor,
    /// Move, then step past the target (word end, line end, ...).
    JumpAfter,
}

impl JumpMode {
    /// Short name, as shown in a status line.
    #[must_use]
    pub const fn name(self) -> &'static str {
        match self {
            Self::Normal => "NORMAL",
            Self::Select => "SELECT",
            Self::AddCursor => "ADD CURSOR",
            Self::JumpAfter => "JUMP AFTER",
        }
    }
}

impl fmt::Display for JumpMode {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.name())
    }
}

// ---------------------------------------------------------------------------
// Resolution
// ---------------------------------------------------------------------------

/// Move `offset` one right when the character after it is not a word
/// character. At the end of the text nothing moves.
#[must_use]
pub fn snap_to_boundary<T: TextSource + ?Sized>(text: &T, offset: usize) -> usize {
    match text.char_at(offset + 1) {
        Some(next) if !is_word_char(next) => offset + 1,
        _ => offset,
    }
}

/// Compute the selections after jumping to `offset`.
///
/// `existing` is the view's selections before the jump.
#[must_use]
pub fn resolve<T: TextSource + ?Sized>(
    text: &T,
    offset: usize,
    mode: JumpMode,
    jump_to_boundary: bool,
    existing: &[Selection],
) -> Vec<Selection> {
    let target = if jump_to_boundary {
        snap_to_boundary(text, offset)
    } else {
        offset
    };

    match mode {
        JumpMode::Normal | JumpMode::JumpAfter => vec![Selection::cursor(target)],
        JumpMode::Select => {
            let mut out: Vec<Selection> = Vec::with_capacity(existing.len());
            for sel in existing {
                let extended = Selection::new(sel.begin(), target);
                if !out.contains(&extended) {
                    out.push(extended);
                }
            }
            if out.is_empty() {
                out.push(Selection::cursor(target));
            }
            out
        }
        JumpMode::AddCursor => {
            let mut out = existing.to_vec();
            let cursor = Selection::cursor(target);
            if !out.contains(&cursor) {
                out.push(cursor);
            }
            out
        }
    }
}

/// Where one semantic unit past `offset` is for a jump of `kind`.
#[must_use]
pub fn step_after<T: TextSource + ?Sized>(text: &T, kind: &PatternKind, offset: usize) -> usize {
    match kind {
        PatternKind::WordStart | PatternKind::WithinLine => word_end(text, offset),
        PatternKind::CharStart | PatternKind::Regex(_) => char_forward(text, offset),
        PatternKind::LineStart => line_end(text, offset),
    }
}

/// Step every selection's head past its target; each becomes a cursor.
#[must_use]
pub fn jump_after<T: TextSource + ?Sized>(
    text: &T,
    kind: &PatternKind,
    selections: &[Selection],
) -> Vec<Selection> {
    let mut out: Vec<Selection> = Vec::with_capacity(selections.len());
    for sel in selections {
        let moved = Selection::cursor(step_after(text, kind, sel.head));
        if !out.contains(&moved) {
            out.push(moved);
        }
    }
    out
}

/// True when a char jump to `candidate` should land behind it instead:
/// the candidate's following character is a line feed.
#[must_use]
pub fn lands_behind<T: TextSource + ?Sized>(text: &T, candidate: usize) -> bool {
    text.char_at(candidate + 1) == Some('\n')
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
