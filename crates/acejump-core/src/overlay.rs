//! Label overlay — writing labels into a view as one undoable transaction.
//!
//! Labels are rendered by replacing the text under each candidate with the
//! label itself. Everything happens in a single host transaction per view so
//! that [`Overlay::revert`] is exactly one undo.
//!
//! # Regions
//!
//! The region a label replaces starts at the candidate and is as wide as the
//! label, clamped to the buffer end and to the next candidate's start. If the
//! region ends in a line break, the break is appended to the label so line
//! structure survives. Each replacement shifts every later region by
//! `rendered_len - region_len` (never negative, since a region is never wider
//! than its label); [`plan`] folds that running delta in, so the
//! edits it returns can be applied in order as-is.

use tracing::{debug, warn};

use crate::error::HostError;
use crate::host::{Host, ViewId, ViewText};
use crate::position::Span;
use crate::word::{TextSource, is_newline};

/// Region key the label highlight is stored under.
pub const HINTS_KEY: &str = "ace_jump_hints";

// ---------------------------------------------------------------------------
// Planning
// ---------------------------------------------------------------------------

/// One label substitution.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct LabelEdit {
    /// The text to replace, in coordinates after all earlier edits.
    pub span: Span,
    /// What it's replaced with.
    pub text: String,
    /// The label as rendered, for highlighting.
    pub label: Span,
}

/// Work out the edits that render `labels` over `candidates`.
///
/// Candidates must be in scan order, and `labels` must be at least as long.
#[must_use]
pub fn plan<T: TextSource + ?Sized>(
    text: &T,
    candidates: &[Span],
    labels: &[String],
) -> Vec<LabelEdit> {
    let mut edits = Vec::with_capacity(candidates.len());
    let mut delta = 0;

    for (i, (candidate, label)) in candidates.iter().zip(labels).enumerate() {
        let begin = candidate.begin;
        let limit = candidates
            .get(i + 1)
            .map_or(usize::MAX, |next| next.begin)
            .min(begin + label.chars().count());

        let mut end = begin;
        let mut last = None;
        while end < limit {
            let Some(ch) = text.char_at(end) else { break };
            last = Some(ch);
            end += 1;
        }

        let mut rendered = label.clone();
        if let Some(ch) = last.filter(|&c| is_newline(c)) {
            rendered.push(ch);
        }

        let span = Span::new(begin, end).shifted(delta);
        let label_len = label.chars().count();
        let rendered_len = rendered.chars().count();
        edits.push(LabelEdit {
            span,
            label: Span::new(span.begin, span.begin + label_len),
            text: rendered,
        });

        delta += rendered_len - span.len();
    }

    edits
}

// ---------------------------------------------------------------------------
// Overlay
// ---------------------------------------------------------------------------

/// Labels currently rendered into one view.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Overlay {
    view: ViewId,
}

impl Overlay {
    /// Render `labels` over `candidates` in `view` and highlight them with
    /// `scope`.
    ///
    /// Returns `None` without touching the view when there are no
    /// candidates. On error the view is left as it was: labels already
    /// written are undone, and an empty transaction undoes nothing.
    ///
    /// # Errors
    ///
    /// Returns the host's error if the view can't be edited or highlighted.
    pub fn apply<H: Host + ?Sized>(
        host: &mut H,
        view: ViewId,
        candidates: &[Span],
        labels: &[String],
        scope: &str,
    ) -> Result<Option<Self>, HostError> {
        if candidates.is_empty() {
            return Ok(None);
        }

        let edits = plan(&ViewText::new(host, view), candidates, labels);

        host.begin_edit(view)?;
        for (written, edit) in edits.iter().enumerate() {
            if let Err(err) = host.replace(view, edit.span, &edit.text) {
                if let Err(close) = host.end_edit(view) {
                    warn!(%view, err = %close, "failed to close label transaction");
                }
                if written > 0 {
                    rollback(host, view);
                }
                return Err(err);
            }
        }
        host.end_edit(view)?;

        let regions: Vec<Span> = edits.iter().map(|e| e.label).collect();
        if let Err(err) = host.add_regions(view, HINTS_KEY, &regions, scope) {
            rollback(host, view);
            return Err(err);
        }
        debug!(%view, labels = regions.len(), "overlay applied");

        Ok(Some(Self { view }))
    }

    /// The view the labels are in.
    #[must_use]
    pub const fn view(&self) -> ViewId {
        self.view
    }

    /// Remove the highlight and undo the label transaction.
    ///
    /// # Errors
    ///
    /// Returns the host's error if the view is gone.
    pub fn revert<H: Host + ?Sized>(self, host: &mut H) -> Result<(), HostError> {
        host.erase_regions(self.view, HINTS_KEY)?;
        host.undo(self.view)
    }
}

/// Undo a label transaction that was written but can't be kept.
fn rollback<H: Host + ?Sized>(host: &mut H, view: ViewId) {
    if let Err(err) = host.undo(view) {
        warn!(%view, %err, "failed to roll back labels");
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
