//! `MemoryHost`: a complete [`Host`] over in-process buffers.
//!
//! Used by the test suite and by the `acejump` driver. Each buffer carries
//! its own [`History`], so overlay transactions undo exactly like they would
//! in a real editor. Each view has its own selections, syntax, settings,
//! visible window, and highlight regions; several views may share one
//! buffer.
//!
//! The host also records what the engine asked of it (the prompt it opened,
//! which view got focus, which offsets were revealed) so tests can
//! assert on the side effects. [`MemoryHost::close_view`] lets tests pull
//! a view out from under a running session, and the `refuse_*` controls make
//! single operations fail.

use std::cell::OnceCell;
use std::collections::BTreeMap;
use std::io;
use std::path::Path;

use crate::buffer::Buffer;
use crate::error::HostError;
use crate::history::History;
use crate::host::{BufferId, Host, ViewId};
use crate::matcher::Pattern;
use crate::position::{Selection, Span};

/// Syntax name new views start with.
pub const PLAIN_TEXT: &str = "Plain Text";

// ---------------------------------------------------------------------------
// Parts
// ---------------------------------------------------------------------------

#[derive(Debug)]
struct MemoryBuffer {
    buffer: Buffer,
    history: History,
    /// The buffer's text for regex searches, built on first use after an edit.
    text: OnceCell<String>,
}

impl MemoryBuffer {
    fn text(&self) -> &str {
        self.text.get_or_init(|| self.buffer.contents())
    }
}

/// Per-view state.
#[derive(Debug, Clone)]
struct MemoryView {
    buffer: usize,
    selections: Vec<Selection>,
    syntax: Option<String>,
    settings: BTreeMap<String, String>,
    top_line: usize,
    height: usize,
    regions: BTreeMap<String, (Vec<Span>, String)>,
    closed: bool,
    refuse_edits: bool,
    refuse_regions: bool,
}

/// The last prompt the engine opened.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Prompt {
    pub title: String,
    pub initial: String,
}

// ---------------------------------------------------------------------------
// MemoryHost
// ---------------------------------------------------------------------------

/// An in-memory editor.
#[derive(Debug, Default)]
pub struct MemoryHost {
    buffers: Vec<MemoryBuffer>,
    views: Vec<MemoryView>,
    active: Option<ViewId>,
    prompt: Option<Prompt>,
    prompts_shown: usize,
    revealed: Vec<(ViewId, usize)>,
}

impl MemoryHost {
    // -- Construction -------------------------------------------------------

    /// An editor with no buffers or views.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// One buffer and one view per text, the first view focused.
    #[must_use]
    pub fn with_views(texts: &[&str]) -> Self {
        let mut host = Self::new();
        for text in texts {
            let buffer = host.add_buffer(Buffer::from_text(text));
            host.add_view(buffer);
        }
        host
    }

    /// Add a buffer; it isn't visible until a view shows it.
    pub fn add_buffer(&mut self, buffer: Buffer) -> BufferId {
        self.buffers.push(MemoryBuffer {
            buffer,
            history: History::new(),
            text: OnceCell::new(),
        });
        BufferId(self.buffers.len() - 1)
    }

    /// Add a view of `buffer` with a cursor at offset 0. The first view
    /// added becomes the active one.
    ///
    /// # Panics
    ///
    /// Panics if `buffer` wasn't returned by [`add_buffer`](Self::add_buffer).
    pub fn add_view(&mut self, buffer: BufferId) -> ViewId {
        assert!(buffer.0 < self.buffers.len(), "unknown buffer {buffer:?}");
        self.views.push(MemoryView {
            buffer: buffer.0,
            selections: vec![Selection::cursor(0)],
            syntax: Some(PLAIN_TEXT.to_string()),
            settings: BTreeMap::new(),
            top_line: 0,
            height: usize::MAX,
            regions: BTreeMap::new(),
            closed: false,
            refuse_edits: false,
            refuse_regions: false,
        });
        let id = ViewId(self.views.len() - 1);
        self.active.get_or_insert(id);
        id
    }

    /// Load a file into a new buffer and show it in a new view.
    ///
    /// # Errors
    ///
    /// Returns an error if the file can't be read.
    pub fn open_file(&mut self, path: &Path) -> io::Result<ViewId> {
        let buffer = self.add_buffer(Buffer::from_file(path)?);
        Ok(self.add_view(buffer))
    }

    // -- Test & driver controls ---------------------------------------------

    /// Restrict the visible window to `height` lines from `top_line`.
    pub fn set_visible_lines(&mut self, view: ViewId, top_line: usize, height: usize) {
        if let Some(v) = self.views.get_mut(view.0) {
            v.top_line = top_line;
            v.height = height;
        }
    }

    /// Set a single view setting.
    pub fn set_setting(&mut self, view: ViewId, key: &str, value: &str) {
        if let Some(v) = self.views.get_mut(view.0) {
            v.settings.insert(key.to_string(), value.to_string());
        }
    }

    /// Mark a view closed. Reads return nothing and writes fail afterwards.
    pub fn close_view(&mut self, view: ViewId) {
        if let Some(v) = self.views.get_mut(view.0) {
            v.closed = true;
        }
        if self.active == Some(view) {
            self.active = self.views_in_groups().first().copied();
        }
    }

    /// Drop the view's syntax, as for a host that has none to report.
    pub fn clear_syntax(&mut self, view: ViewId) {
        if let Some(v) = self.views.get_mut(view.0) {
            v.syntax = None;
        }
    }

    /// Make every [`Host::replace`] on `view` fail.
    pub fn refuse_edits(&mut self, view: ViewId, refuse: bool) {
        if let Some(v) = self.views.get_mut(view.0) {
            v.refuse_edits = refuse;
        }
    }

    /// Make every [`Host::add_regions`] on `view` fail.
    pub fn refuse_regions(&mut self, view: ViewId, refuse: bool) {
        if let Some(v) = self.views.get_mut(view.0) {
            v.refuse_regions = refuse;
        }
    }

    /// Make `view` the focused view.
    pub fn set_active(&mut self, view: ViewId) {
        self.active = Some(view);
    }

    /// Mark the buffer behind `view` read-only.
    pub fn set_read_only(&mut self, view: ViewId, read_only: bool) {
        if let Some(idx) = self.view(view).map(|v| v.buffer) {
            self.buffers[idx].buffer.set_read_only(read_only);
        }
    }

    // -- Inspection ---------------------------------------------------------

    /// The buffer behind `view`.
    #[must_use]
    pub fn buffer(&self, view: ViewId) -> Option<&Buffer> {
        self.view(view).map(|v| &self.buffers[v.buffer].buffer)
    }

    /// The full text behind `view` (empty for a closed view).
    #[must_use]
    pub fn text(&self, view: ViewId) -> String {
        self.buffer(view).map(Buffer::contents).unwrap_or_default()
    }

    /// The regions stored under `key`, with their scope.
    #[must_use]
    pub fn regions(&self, view: ViewId, key: &str) -> Option<(&[Span], &str)> {
        self.view(view)
            .and_then(|v| v.regions.get(key))
            .map(|(spans, scope)| (spans.as_slice(), scope.as_str()))
    }

    /// The open prompt, if any.
    #[must_use]
    pub const fn prompt(&self) -> Option<&Prompt> {
        self.prompt.as_ref()
    }

    /// How many times a prompt was opened.
    #[must_use]
    pub const fn prompts_shown(&self) -> usize {
        self.prompts_shown
    }

    /// Every `(view, offset)` passed to [`Host::show`], in order.
    #[must_use]
    pub fn revealed(&self) -> &[(ViewId, usize)] {
        &self.revealed
    }

    /// Number of undoable transactions on the buffer behind `view`.
    #[must_use]
    pub fn undo_count(&self, view: ViewId) -> usize {
        self.view(view)
            .map_or(0, |v| self.buffers[v.buffer].history.undo_count())
    }

    // -- Helpers ------------------------------------------------------------

    fn view(&self, view: ViewId) -> Option<&MemoryView> {
        self.views.get(view.0).filter(|v| !v.closed)
    }

    fn view_mut(&mut self, view: ViewId) -> Result<&mut MemoryView, HostError> {
        self.views
            .get_mut(view.0)
            .filter(|v| !v.closed)
            .ok_or(HostError::ViewClosed(view))
    }

    fn buffer_mut(&mut self, view: ViewId) -> Result<&mut MemoryBuffer, HostError> {
        let idx = self.view_mut(view)?.buffer;
        Ok(&mut self.buffers[idx])
    }
}

// ---------------------------------------------------------------------------
// Host
// ---------------------------------------------------------------------------

impl Host for MemoryHost {
    fn active_view(&self) -> Option<ViewId> {
        self.active.filter(|&id| self.view(id).is_some())
    }

    fn views_in_groups(&self) -> Vec<ViewId> {
        (0..self.views.len())
            .map(ViewId)
            .filter(|&id| self.view(id).is_some())
            .collect()
    }

    fn buffer_id(&self, view: ViewId) -> Option<BufferId> {
        self.view(view).map(|v| BufferId(v.buffer))
    }

    fn visible_region(&self, view: ViewId) -> Span {
        self.view(view).map_or(Span::new(0, 0), |v| {
            self.buffers[v.buffer].buffer.lines_span(v.top_line, v.height)
        })
    }

    fn line_region(&self, view: ViewId, offset: usize) -> Span {
        self.buffer(view)
            .map_or(Span::new(0, 0), |buf| buf.line_span(offset))
    }

    fn char_at(&self, view: ViewId, offset: usize) -> Option<char> {
        self.buffer(view)?.char_at(offset)
    }

    fn find(&self, view: ViewId, pattern: &Pattern, from: usize) -> Option<Span> {
        let memory = &self.buffers[self.view(view)?.buffer];
        let buf = &memory.buffer;
        if from > buf.len_chars() {
            return None;
        }
        let text = memory.text();
        let (start, end) = pattern.find_at(text, buf.offset_to_byte(from))?;
        Some(Span::new(buf.byte_to_offset(start), buf.byte_to_offset(end)))
    }

    fn begin_edit(&mut self, view: ViewId) -> Result<(), HostError> {
        let MemoryBuffer { buffer, history, .. } = self.buffer_mut(view)?;
        history.begin(buffer);
        Ok(())
    }

    fn replace(&mut self, view: ViewId, span: Span, text: &str) -> Result<(), HostError> {
        if self.view_mut(view)?.refuse_edits {
            return Err(HostError::Refused {
                view,
                operation: "replace",
            });
        }
        let MemoryBuffer {
            buffer,
            history,
            text: cache,
        } = self.buffer_mut(view)?;
        if span.end > buffer.len_chars() {
            return Err(HostError::OutOfBounds(view));
        }
        history.replace(buffer, span, text);
        cache.take();
        Ok(())
    }

    fn end_edit(&mut self, view: ViewId) -> Result<(), HostError> {
        self.buffer_mut(view)?.history.commit();
        Ok(())
    }

    fn undo(&mut self, view: ViewId) -> Result<(), HostError> {
        let MemoryBuffer {
            buffer,
            history,
            text,
        } = self.buffer_mut(view)?;
        if history.undo(buffer) {
            text.take();
        }
        Ok(())
    }

    fn add_regions(
        &mut self,
        view: ViewId,
        key: &str,
        spans: &[Span],
        scope: &str,
    ) -> Result<(), HostError> {
        let v = self.view_mut(view)?;
        if v.refuse_regions {
            return Err(HostError::Refused {
                view,
                operation: "add_regions",
            });
        }
        v.regions
            .insert(key.to_string(), (spans.to_vec(), scope.to_string()));
        Ok(())
    }

    fn erase_regions(&mut self, view: ViewId, key: &str) -> Result<(), HostError> {
        self.view_mut(view)?.regions.remove(key);
        Ok(())
    }

    fn selections(&self, view: ViewId) -> Vec<Selection> {
        self.view(view)
            .map(|v| v.selections.clone())
            .unwrap_or_default()
    }

    fn set_selections(&mut self, view: ViewId, selections: &[Selection]) -> Result<(), HostError> {
        self.view_mut(view)?.selections = selections.to_vec();
        Ok(())
    }

    fn syntax(&self, view: ViewId) -> Option<String> {
        self.view(view).and_then(|v| v.syntax.clone())
    }

    fn set_syntax(&mut self, view: ViewId, syntax: &str) -> Result<(), HostError> {
        self.view_mut(view)?.syntax = Some(syntax.to_string());
        Ok(())
    }

    fn settings(&self, view: ViewId, keys: &[String]) -> Vec<Option<String>> {
        let Some(v) = self.view(view) else {
            return vec![None; keys.len()];
        };
        keys.iter().map(|key| v.settings.get(key).cloned()).collect()
    }

    fn set_settings(
        &mut self,
        view: ViewId,
        keys: &[String],
        values: &[Option<String>],
    ) -> Result<(), HostError> {
        let v = self.view_mut(view)?;
        for (key, value) in keys.iter().zip(values) {
            match value {
                Some(value) => v.settings.insert(key.clone(), value.clone()),
                None => v.settings.remove(key),
            };
        }
        Ok(())
    }

    fn focus(&mut self, view: ViewId) -> Result<(), HostError> {
        self.view_mut(view)?;
        self.active = Some(view);
        Ok(())
    }

    fn show(&mut self, view: ViewId, offset: usize) -> Result<(), HostError> {
        self.view_mut(view)?;
        self.revealed.push((view, offset));
        Ok(())
    }

    fn show_prompt(&mut self, title: &str, initial: &str) {
        self.prompt = Some(Prompt {
            title: title.to_string(),
            initial: initial.to_string(),
        });
        self.prompts_shown += 1;
    }

    fn hide_prompt(&mut self) {
        self.prompt = None;
    }

    fn is_read_only(&self, view: ViewId) -> bool {
        self.buffer(view).is_none_or(Buffer::is_read_only)
    }

    fn is_dirty(&self, view: ViewId) -> bool {
        self.buffer(view).is_some_and(Buffer::is_modified)
    }

    fn save(&mut self, view: ViewId) -> Result<(), HostError> {
        let MemoryBuffer { buffer, .. } = self.buffer_mut(view)?;
        if buffer.is_read_only() {
            return Err(HostError::ReadOnly(view));
        }
        if buffer.path().is_none() {
            return Err(HostError::NoPath(view));
        }
        buffer.save()?;
        Ok(())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
