//! Undo history — transaction-based edit tracking for label overlays.
//!
//! Every replacement made through [`History::replace`] is recorded with the
//! text it removed, grouped into a [`Transaction`]. A transaction is the
//! atomic unit of undo: reverting a label overlay is exactly one
//! [`History::undo`], nothing more and nothing less.
//!
//! # Usage
//!
//! ```text
//! history.begin(&buf);
//! history.replace(&mut buf, span, "a");
//! history.replace(&mut buf, other_span, "b\n");
//! history.commit();
//! // later:
//! history.undo(&mut buf);
//! ```
//!
//! Empty transactions (no edits between begin and commit) are discarded, so
//! an undo never pops an unrelated, earlier transaction.

use crate::buffer::Buffer;
use crate::position::Span;

// ---------------------------------------------------------------------------
// Edit
// ---------------------------------------------------------------------------

/// A single reversible replacement.
///
/// `begin` is where both the removed and the inserted text start, which is
/// enough to rebuild either side of the edit.
#[derive(Debug, Clone, PartialEq, Eq)]
struct Edit {
    begin: usize,
    removed: String,
    inserted: String,
}

impl Edit {
    /// Put the removed text back.
    fn revert(&self, buf: &mut Buffer) {
        let inserted_len = self.inserted.chars().count();
        buf.replace(Span::new(self.begin, self.begin + inserted_len), &self.removed);
    }
}

// ---------------------------------------------------------------------------
// Transaction
// ---------------------------------------------------------------------------

/// A group of edits that undo as one unit.
///
/// Remembers the buffer's modified flag from before the first edit so that
/// undoing an overlay on a clean buffer leaves it clean.
#[derive(Debug, Clone)]
struct Transaction {
    edits: Vec<Edit>,
    modified_before: bool,
}

impl Transaction {
    /// Apply this transaction's edits in reverse.
    fn undo(&self, buf: &mut Buffer) {
        for edit in self.edits.iter().rev() {
            edit.revert(buf);
        }
        buf.set_modified(self.modified_before);
    }
}

// ---------------------------------------------------------------------------
// History
// ---------------------------------------------------------------------------

/// Undo history for a buffer.
#[derive(Debug, Default)]
pub struct History {
    undo_stack: Vec<Transaction>,
    pending: Option<Transaction>,
}

impl History {
    /// Create an empty history.
    #[must_use]
    pub const fn new() -> Self {
        Self {
            undo_stack: Vec::new(),
            pending: None,
        }
    }

    /// Start a new transaction on `buf`.
    ///
    /// If a previous transaction was still pending (begin without commit),
    /// it is auto-committed first.
    pub fn begin(&mut self, buf: &Buffer) {
        self.commit();
        self.pending = Some(Transaction {
            edits: Vec::new(),
            modified_before: buf.is_modified(),
        });
    }

    /// Replace `span` with `text` in `buf`, recording the inverse in the
    /// pending transaction.
    ///
    /// Without a pending transaction the edit still happens but can't be
    /// undone.
    pub fn replace(&mut self, buf: &mut Buffer, span: Span, text: &str) {
        let removed = buf.replace(span, text);
        if let Some(txn) = &mut self.pending {
            txn.edits.push(Edit {
                begin: span.begin,
                removed,
                inserted: text.to_string(),
            });
        }
    }

    /// Finalize the current transaction. Empty transactions are discarded.
    pub fn commit(&mut self) {
        if let Some(txn) = self.pending.take() {
            if !txn.edits.is_empty() {
                self.undo_stack.push(txn);
            }
        }
    }

    /// Undo the last transaction. Returns `false` if there was nothing to
    /// undo.
    pub fn undo(&mut self, buf: &mut Buffer) -> bool {
        self.commit();
        let Some(txn) = self.undo_stack.pop() else {
            return false;
        };
        txn.undo(buf);
        true
    }

    /// Number of committed transactions.
    #[must_use]
    pub fn undo_count(&self) -> usize {
        self.undo_stack.len()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    fn edited(text: &str, edits: &[(Span, &str)]) -> (Buffer, History) {
        let mut buf = Buffer::from_text(text);
        let mut history = History::new();
        history.begin(&buf);
        for (span, label) in edits {
            history.replace(&mut buf, *span, label);
        }
        history.commit();
        (buf, history)
    }

    #[test]
    fn undo_restores_single_replacement() {
        let (mut buf, mut history) = edited("foo bar", &[(Span::new(4, 5), "a")]);
        assert_eq!(buf.contents(), "foo aar");

        assert!(history.undo(&mut buf));
        assert_eq!(buf.contents(), "foo bar");
    }

    #[test]
    fn undo_reverts_growing_edits_in_reverse() {
        // Second edit was computed against the shifted text.
        let (mut buf, mut history) = edited(
            "ab\ncd\n",
            &[(Span::new(1, 3), "xy\n"), (Span::new(5, 7), "zw\n")],
        );
        assert_eq!(buf.contents(), "axy\nczw\n");

        assert!(history.undo(&mut buf));
        assert_eq!(buf.contents(), "ab\ncd\n");
    }

    #[test]
    fn undo_restores_clean_flag() {
        let (mut buf, mut history) = edited("abc", &[(Span::new(0, 1), "z")]);
        assert!(buf.is_modified());
        history.undo(&mut buf);
        assert!(!buf.is_modified());
    }

    #[test]
    fn undo_keeps_dirty_flag() {
        let mut buf = Buffer::from_text("abc");
        buf.set_modified(true);
        let mut history = History::new();
        history.begin(&buf);
        history.replace(&mut buf, Span::new(0, 1), "z");
        history.undo(&mut buf);
        assert!(buf.is_modified());
    }

    #[test]
    fn empty_transaction_is_discarded() {
        let (mut buf, mut history) = edited("one", &[(Span::new(0, 1), "t")]);
        history.begin(&buf);
        history.commit();
        assert_eq!(history.undo_count(), 1);

        // The only undo reverts the real edit, not a phantom.
        assert!(history.undo(&mut buf));
        assert_eq!(buf.contents(), "one");
        assert!(!history.undo(&mut buf));
    }

    #[test]
    fn undo_only_pops_last_transaction() {
        let (mut buf, mut history) = edited("abc", &[(Span::new(0, 1), "x")]);
        history.begin(&buf);
        history.replace(&mut buf, Span::new(2, 3), "y");
        history.commit();
        assert_eq!(buf.contents(), "xby");

        history.undo(&mut buf);
        assert_eq!(buf.contents(), "xbc");
        assert_eq!(history.undo_count(), 1);
    }

    #[test]
    fn pending_transaction_is_undoable() {
        let mut buf = Buffer::from_text("abc");
        let mut history = History::new();
        history.begin(&buf);
        history.replace(&mut buf, Span::new(1, 2), "Q");
        assert!(history.undo(&mut buf));
        assert_eq!(buf.contents(), "abc");
    }

    #[test]
    fn replace_without_transaction_is_not_recorded() {
        let mut buf = Buffer::from_text("abc");
        let mut history = History::new();
        history.replace(&mut buf, Span::new(0, 1), "z");
        assert_eq!(history.undo_count(), 0);
        assert!(!history.undo(&mut buf));
        assert_eq!(buf.contents(), "zbc");
    }
}
