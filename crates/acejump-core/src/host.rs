//! The host contract — everything the jump engine asks of an editor.
//!
//! The engine never owns text, views, or UI. It drives an editor through the
//! [`Host`] trait: reading text, replacing spans inside undoable
//! transactions, snapshotting and restoring per-view state, and opening the
//! input prompt. The editor feeds prompt activity back as [`Input`] events
//! (see [`crate::session::AceJump::on_event`]).
//!
//! Two identifiers matter:
//!
//! - [`ViewId`] — one visible pane. Selections, syntax, settings, and the
//!   visible window belong to a view.
//! - [`BufferId`] — the text behind a view. Two views may show the same
//!   buffer; the engine never labels one buffer twice in a batch.
//!
//! [`crate::memory::MemoryHost`] is a complete in-process implementation.

use std::fmt;

use crate::error::HostError;
use crate::matcher::Pattern;
use crate::position::{Selection, Span};
use crate::word::TextSource;

// ---------------------------------------------------------------------------
// Identifiers
// ---------------------------------------------------------------------------

/// A view (pane) handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct ViewId(pub usize);

impl fmt::Display for ViewId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

/// A buffer handle.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct BufferId(pub usize);

// ---------------------------------------------------------------------------
// Input
// ---------------------------------------------------------------------------

/// Prompt activity reported by the host.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum Input {
    /// The prompt text changed.
    Changed(String),
    /// Return was pressed with this text.
    Commit(String),
    /// The prompt was dismissed.
    Closed,
}

// ---------------------------------------------------------------------------
// Host
// ---------------------------------------------------------------------------

/// Editor services the engine calls.
///
/// Getters on a closed view return empty values (`None`, empty vectors);
/// mutators return [`HostError::ViewClosed`].
pub trait Host {
    // -- Views --------------------------------------------------------------

    /// The focused view.
    fn active_view(&self) -> Option<ViewId>;

    /// The active view of every group, in group order.
    fn views_in_groups(&self) -> Vec<ViewId>;

    /// The buffer a view shows.
    fn buffer_id(&self, view: ViewId) -> Option<BufferId>;

    /// The offset range currently on screen.
    fn visible_region(&self, view: ViewId) -> Span;

    /// The line containing `offset`, including its line ending.
    fn line_region(&self, view: ViewId, offset: usize) -> Span;

    // -- Text ---------------------------------------------------------------

    /// The character at `offset`.
    fn char_at(&self, view: ViewId, offset: usize) -> Option<char>;

    /// The next match of `pattern` starting at or after `from`.
    fn find(&self, view: ViewId, pattern: &Pattern, from: usize) -> Option<Span>;

    // -- Edits --------------------------------------------------------------

    /// Open an undoable transaction on the view's buffer.
    fn begin_edit(&mut self, view: ViewId) -> Result<(), HostError>;

    /// Replace `span` with `text` inside the open transaction.
    fn replace(&mut self, view: ViewId, span: Span, text: &str) -> Result<(), HostError>;

    /// Close the transaction opened by [`begin_edit`](Self::begin_edit).
    fn end_edit(&mut self, view: ViewId) -> Result<(), HostError>;

    /// Undo the last transaction on the view's buffer.
    fn undo(&mut self, view: ViewId) -> Result<(), HostError>;

    // -- Highlight regions --------------------------------------------------

    /// Highlight `spans` under `key` with the given scope.
    fn add_regions(
        &mut self,
        view: ViewId,
        key: &str,
        spans: &[Span],
        scope: &str,
    ) -> Result<(), HostError>;

    /// Remove the regions stored under `key`.
    fn erase_regions(&mut self, view: ViewId, key: &str) -> Result<(), HostError>;

    // -- View state ---------------------------------------------------------

    fn selections(&self, view: ViewId) -> Vec<Selection>;

    fn set_selections(&mut self, view: ViewId, selections: &[Selection]) -> Result<(), HostError>;

    fn syntax(&self, view: ViewId) -> Option<String>;

    fn set_syntax(&mut self, view: ViewId, syntax: &str) -> Result<(), HostError>;

    /// Current values of `keys`; `None` for unset keys.
    fn settings(&self, view: ViewId, keys: &[String]) -> Vec<Option<String>>;

    /// Write `values` back to `keys`; `None` erases the key.
    fn set_settings(
        &mut self,
        view: ViewId,
        keys: &[String],
        values: &[Option<String>],
    ) -> Result<(), HostError>;

    // -- Focus & scrolling --------------------------------------------------

    fn focus(&mut self, view: ViewId) -> Result<(), HostError>;

    /// Scroll so `offset` is visible.
    fn show(&mut self, view: ViewId, offset: usize) -> Result<(), HostError>;

    // -- Prompt -------------------------------------------------------------

    fn show_prompt(&mut self, title: &str, initial: &str);

    fn hide_prompt(&mut self);

    // -- Persistence --------------------------------------------------------

    fn is_read_only(&self, view: ViewId) -> bool;

    fn is_dirty(&self, view: ViewId) -> bool;

    fn save(&mut self, view: ViewId) -> Result<(), HostError>;
}

// ---------------------------------------------------------------------------
// ViewText
// ---------------------------------------------------------------------------

/// A [`TextSource`] over one host view.
pub struct ViewText<'a, H: ?Sized> {
    host: &'a H,
    view: ViewId,
}

impl<'a, H: Host + ?Sized> ViewText<'a, H> {
    #[must_use]
    pub const fn new(host: &'a H, view: ViewId) -> Self {
        Self { host, view }
    }
}

impl<H: Host + ?Sized> TextSource for ViewText<'_, H> {
    fn char_at(&self, offset: usize) -> Option<char> {
        self.host.char_at(self.view, offset)
    }
}
