//! The jump session — scanning in batches, reading the label, jumping.
//!
//! [`AceJump`] is the controller a host keeps around. It owns the settings,
//! the pending [`JumpMode`], and at most one running session:
//!
//! ```text
//! Idle ──start──▶ Prompting ◀──▶ Scanning
//!                     │
//!                     ▼
//!                 Resolving ──▶ Idle
//! ```
//!
//! `start` snapshots every target view, opens the prompt, and labels the
//! first batch. From then on the host reports prompt activity through
//! [`AceJump::on_event`]:
//!
//! | Input             | Effect |
//! |-------------------|--------|
//! | `Changed("")`     | label a batch, unless one is shown |
//! | `Changed(label)`  | once the label is complete, jump |
//! | `Commit("")`      | drop the labels and label the next batch |
//! | `Commit(label)`   | jump (or end the session on a bad label) |
//! | `Closed`          | end the session, jumping if a label was typed |
//!
//! # Batches
//!
//! A batch holds at most [`Labels::capacity`] labels. It walks the views
//! that still have unlabeled matches in order, filling the batch until it's
//! full, a view repeats a buffer already labeled in this batch, or the views
//! run out. A view whose scan was cut short stays first in line for the next
//! batch; the scan resumes where it stopped. Once every view is done the next
//! batch starts over from the first view.
//!
//! Label indices are global within a batch. `breakpoints[i]` is the label
//! count after the `i`-th labeled view, so the owner of index `n` is the first
//! view whose breakpoint exceeds `n`.
//!
//! # Ending
//!
//! However a session ends, every overlay is reverted and every view gets its
//! selections, syntax, and watched settings back before the jump is applied.
//! A view that can't be restored is logged and skipped.

use tracing::{debug, info, warn};

use crate::config::Config;
use crate::error::{ConfigError, HostError, PatternError};
use crate::host::{BufferId, Host, Input, ViewId, ViewText};
use crate::labels::Labels;
use crate::matcher::{Pattern, PatternKind, RegionKind, ScanCursor, scan};
use crate::overlay::Overlay;
use crate::position::{Selection, Span};
use crate::resolver::{JumpMode, jump_after, lands_behind, resolve};

/// Syntax views are switched to while labels are shown.
pub const LABEL_SYNTAX: &str = "AceJump Labels";

// ---------------------------------------------------------------------------
// Outcomes
// ---------------------------------------------------------------------------

/// A completed jump.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct Jump {
    /// The view that was jumped into (now focused).
    pub view: ViewId,
    /// The cursor position the jump settled on.
    pub offset: usize,
}

/// What an input did.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Status {
    /// No session is running.
    Idle,
    /// A batch was labeled; this many labels are shown.
    Labeled(usize),
    /// Nothing to do yet (a partial label, or labels already shown).
    Waiting,
    /// The session ended with a jump.
    Jumped(Jump),
    /// The session ended without a jump.
    Cancelled,
}

/// One labeled candidate of the current batch.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Hint {
    pub label: String,
    pub view: ViewId,
    pub target: Span,
}

// ---------------------------------------------------------------------------
// Snapshots
// ---------------------------------------------------------------------------

/// Per-view state captured at session start.
#[derive(Debug, Clone)]
struct Snapshot {
    view: ViewId,
    selections: Vec<Selection>,
    syntax: Option<String>,
    settings: Vec<Option<String>>,
}

impl Snapshot {
    fn capture<H: Host + ?Sized>(host: &H, view: ViewId, keys: &[String]) -> Self {
        Self {
            view,
            selections: host.selections(view),
            syntax: host.syntax(view),
            settings: host.settings(view, keys),
        }
    }

    /// Switch to the label syntax, keeping the watched settings. A view with
    /// no syntax to restore keeps none.
    fn dress<H: Host + ?Sized>(&self, host: &mut H, keys: &[String]) -> Result<(), HostError> {
        if self.syntax.is_some() {
            host.set_syntax(self.view, LABEL_SYNTAX)?;
        }
        host.set_settings(self.view, keys, &self.settings)
    }

    fn restore<H: Host + ?Sized>(&self, host: &mut H, keys: &[String]) -> Result<(), HostError> {
        host.set_selections(self.view, &self.selections)?;
        if let Some(syntax) = &self.syntax {
            host.set_syntax(self.view, syntax)?;
        }
        host.set_settings(self.view, keys, &self.settings)
    }
}

// ---------------------------------------------------------------------------
// Session
// ---------------------------------------------------------------------------

/// State of one running jump.
#[derive(Debug)]
struct Session {
    kind: PatternKind,
    pattern: Pattern,
    region: RegionKind,
    all_views: Vec<ViewId>,
    /// Views with matches left, in order.
    remaining: Vec<ViewId>,
    snapshots: Vec<Snapshot>,
    /// Views labeled in the current batch, parallel to `breakpoints`.
    changed: Vec<ViewId>,
    breakpoints: Vec<usize>,
    /// Views that had labels written at any point in the session.
    touched: Vec<ViewId>,
    overlays: Vec<Overlay>,
    /// Candidates of the current batch, indexed by label index.
    hints: Vec<Span>,
    labeled: usize,
    cursor: ScanCursor,
    shown: bool,
    target: Option<String>,
}

impl Session {
    /// Label the next batch. Returns the number of labels shown.
    fn run_batch<H: Host + ?Sized>(
        &mut self,
        host: &mut H,
        labels: &Labels,
        config: &Config,
        mode: JumpMode,
    ) -> usize {
        self.labeled = 0;
        self.hints.clear();
        self.breakpoints.clear();
        self.changed.clear();

        let views: Vec<ViewId> = if mode != JumpMode::Normal {
            host.active_view().into_iter().collect()
        } else if self.remaining.is_empty() {
            self.all_views.clone()
        } else {
            self.remaining.clone()
        };
        self.remaining.clone_from(&views);
        let mut buffers: Vec<BufferId> = Vec::with_capacity(views.len());

        for view in views {
            let Some(buffer) = host.buffer_id(view) else {
                warn!(%view, "view is gone, skipping");
                self.remaining.retain(|&v| v != view);
                continue;
            };
            if buffers.contains(&buffer) {
                break;
            }

            let window = self.region.window(&*host, view);
            let before = self.labeled;
            let candidates = scan(
                &*host,
                view,
                window,
                &self.pattern,
                labels.capacity(),
                &mut self.labeled,
                &mut self.cursor,
            );

            let batch = match labels.allocate(before, candidates.len()) {
                Ok(batch) => batch,
                Err(err) => {
                    warn!(%view, %err, "out of labels");
                    self.labeled = before;
                    break;
                }
            };
            match Overlay::apply(host, view, &candidates, batch, &config.labels_scope) {
                Ok(Some(overlay)) => {
                    self.overlays.push(overlay);
                    if !self.touched.contains(&view) {
                        self.touched.push(view);
                    }
                }
                Ok(None) => {}
                Err(err) => {
                    warn!(%view, %err, "failed to label view");
                    self.labeled = before;
                    self.cursor.reset();
                    self.remaining.retain(|&v| v != view);
                    continue;
                }
            }

            debug!(%view, labels = candidates.len(), "view labeled");
            self.hints.extend_from_slice(&candidates);
            self.breakpoints.push(self.labeled);
            self.changed.push(view);
            buffers.push(buffer);

            if !self.cursor.is_exhausted() {
                break;
            }
            self.remaining.retain(|&v| v != view);
        }

        for snapshot in &self.snapshots {
            if let Err(err) = snapshot.dress(host, &config.view_settings) {
                warn!(view = %snapshot.view, %err, "failed to switch to label syntax");
            }
        }

        self.shown = true;
        debug!(
            labels = self.labeled,
            views = self.changed.len(),
            remaining = self.remaining.len(),
            "batch labeled"
        );
        self.labeled
    }

    /// Revert every overlay of the current batch.
    fn remove_labels<H: Host + ?Sized>(&mut self, host: &mut H) {
        for overlay in self.overlays.drain(..) {
            let view = overlay.view();
            if let Err(err) = overlay.revert(host) {
                warn!(%view, %err, "failed to remove labels");
            }
        }
        self.shown = false;
    }

    /// The view that owns label index `index`.
    fn view_for_index(&self, index: usize) -> Option<ViewId> {
        let slot = self.breakpoints.iter().position(|&bp| index < bp)?;
        self.changed.get(slot).copied()
    }

    /// The typed label's index, if it names a label of this batch.
    fn target_index(&self, labels: &Labels) -> Option<usize> {
        let target = self.target.as_deref().filter(|t| !t.is_empty())?;
        labels.index_of(target).filter(|&index| index < self.labeled)
    }

    fn hints(&self, labels: &Labels) -> Vec<Hint> {
        self.hints
            .iter()
            .enumerate()
            .filter_map(|(index, &target)| {
                Some(Hint {
                    label: labels.get(index)?.to_string(),
                    view: self.view_for_index(index)?,
                    target,
                })
            })
            .collect()
    }
}

// ---------------------------------------------------------------------------
// AceJump
// ---------------------------------------------------------------------------

/// The jump controller.
#[derive(Debug)]
pub struct AceJump {
    config: Config,
    labels: Labels,
    mode: JumpMode,
    session: Option<Session>,
}

impl AceJump {
    /// Create a controller.
    ///
    /// # Errors
    ///
    /// Returns an error if the label alphabet is empty or repeats a
    /// character.
    pub fn new(config: Config) -> Result<Self, ConfigError> {
        let alphabet = config.alphabet()?;
        let labels = Labels::new(&alphabet, config.double_char_label);
        Ok(Self {
            config,
            labels,
            mode: JumpMode::Normal,
            session: None,
        })
    }

    #[must_use]
    pub const fn config(&self) -> &Config {
        &self.config
    }

    /// The mode the next (or current) jump uses.
    #[must_use]
    pub const fn mode(&self) -> JumpMode {
        self.mode
    }

    /// True when no session is running and [`start`](Self::start) would
    /// succeed.
    #[must_use]
    pub const fn is_enabled(&self) -> bool {
        self.session.is_none()
    }

    /// Labels shown in the current batch.
    #[must_use]
    pub fn labeled(&self) -> usize {
        self.session.as_ref().map_or(0, |s| s.labeled)
    }

    /// The current batch's labels and what they point at, in label order.
    #[must_use]
    pub fn hints(&self) -> Vec<Hint> {
        self.session
            .as_ref()
            .map(|s| s.hints(&self.labels))
            .unwrap_or_default()
    }

    // -- Modes --------------------------------------------------------------

    /// Toggle jump-after. Always available.
    pub fn toggle_jump_after(&mut self) -> bool {
        self.toggle(JumpMode::JumpAfter);
        true
    }

    /// Toggle select mode. Needs `selection_modes`.
    pub fn toggle_select(&mut self) -> bool {
        self.config.selection_modes && self.toggle(JumpMode::Select)
    }

    /// Toggle add-cursor mode. Needs `selection_modes`.
    pub fn toggle_add_cursor(&mut self) -> bool {
        self.config.selection_modes && self.toggle(JumpMode::AddCursor)
    }

    fn toggle(&mut self, mode: JumpMode) -> bool {
        self.mode = if self.mode == mode {
            JumpMode::Normal
        } else {
            mode
        };
        debug!(mode = %self.mode, "mode toggled");
        true
    }

    // -- Lifecycle ----------------------------------------------------------

    /// Start a session targeting `kind`.
    ///
    /// Labels only the active view when `current_buffer_only` is set or a
    /// modifier mode is on. Returns `Ok(false)` if a session is already
    /// running or there's no view to label.
    ///
    /// # Errors
    ///
    /// Returns an error if a [`PatternKind::Regex`] doesn't compile.
    pub fn start<H: Host + ?Sized>(
        &mut self,
        host: &mut H,
        kind: PatternKind,
        current_buffer_only: bool,
    ) -> Result<bool, PatternError> {
        if self.session.is_some() {
            debug!("session already running");
            return Ok(false);
        }

        let pattern = Pattern::new(&kind, self.config.search_case_sensitivity)?;
        let all_views: Vec<ViewId> = if current_buffer_only || self.mode != JumpMode::Normal {
            host.active_view().into_iter().collect()
        } else {
            host.views_in_groups()
        };
        if all_views.is_empty() {
            debug!("no view to label");
            return Ok(false);
        }

        let snapshots = all_views
            .iter()
            .map(|&view| Snapshot::capture(&*host, view, &self.config.view_settings))
            .collect();

        debug!(?kind, views = all_views.len(), mode = %self.mode, "session started");
        host.show_prompt(kind.prompt(), "");

        let mut session = Session {
            region: kind.region(),
            kind,
            pattern,
            all_views,
            remaining: Vec::new(),
            snapshots,
            changed: Vec::new(),
            breakpoints: Vec::new(),
            touched: Vec::new(),
            overlays: Vec::new(),
            hints: Vec::new(),
            labeled: 0,
            cursor: ScanCursor::new(),
            shown: false,
            target: None,
        };
        session.run_batch(host, &self.labels, &self.config, self.mode);
        self.session = Some(session);
        Ok(true)
    }

    /// Feed prompt activity into the running session.
    pub fn on_event<H: Host + ?Sized>(&mut self, host: &mut H, input: Input) -> Status {
        let width = self.labels.width();
        let Some(session) = self.session.as_mut() else {
            return Status::Idle;
        };

        match input {
            Input::Changed(text) if text.is_empty() => {
                if session.shown {
                    Status::Waiting
                } else {
                    Status::Labeled(session.run_batch(host, &self.labels, &self.config, self.mode))
                }
            }
            Input::Changed(text) => {
                if session.shown && text.chars().count() == width {
                    session.target = Some(text);
                    self.finish(host)
                } else {
                    Status::Waiting
                }
            }
            Input::Commit(text) if text.is_empty() => {
                session.remove_labels(host);
                host.show_prompt(session.kind.prompt(), "");
                Status::Labeled(session.run_batch(host, &self.labels, &self.config, self.mode))
            }
            Input::Commit(text) => {
                session.target = Some(text);
                self.finish(host)
            }
            Input::Closed => self.finish(host),
        }
    }

    /// End the session: restore every view, then jump if the typed label is
    /// valid.
    fn finish<H: Host + ?Sized>(&mut self, host: &mut H) -> Status {
        let Some(mut session) = self.session.take() else {
            return Status::Idle;
        };

        session.cursor.reset();
        session.remove_labels(host);
        host.hide_prompt();
        for snapshot in &session.snapshots {
            if let Err(err) = snapshot.restore(host, &self.config.view_settings) {
                warn!(view = %snapshot.view, %err, "failed to restore view");
            }
        }

        let owner = session
            .target_index(&self.labels)
            .and_then(|index| Some((index, session.view_for_index(index)?)));
        let status = match owner {
            Some((index, view)) => match self.jump(host, &session, index, view) {
                Ok(jump) => Status::Jumped(jump),
                Err(err) => {
                    warn!(%err, "jump failed");
                    Status::Cancelled
                }
            },
            None => {
                debug!(target = ?session.target, "no jump");
                Status::Cancelled
            }
        };

        self.mode = JumpMode::Normal;

        if self.config.save_files_after_jump && matches!(status, Status::Jumped(_)) {
            for &view in &session.touched {
                if host.is_read_only(view) || host.is_dirty(view) {
                    continue;
                }
                if let Err(err) = host.save(view) {
                    warn!(%view, %err, "failed to save");
                }
            }
        }

        status
    }

    /// Apply the jump to label `index`, owned by `view`.
    fn jump<H: Host + ?Sized>(
        &self,
        host: &mut H,
        session: &Session,
        index: usize,
        view: ViewId,
    ) -> Result<Jump, HostError> {
        let hint = session.hints[index];

        let selections = {
            let text = ViewText::new(&*host, view);
            let mut mode = self.mode;
            if session.kind == PatternKind::CharStart
                && self.config.jump_behind_last_characters
                && lands_behind(&text, hint.begin)
            {
                mode = JumpMode::JumpAfter;
            }

            let existing = host.selections(view);
            let resolved = resolve(
                &text,
                hint.begin,
                mode,
                self.config.jump_to_boundary,
                &existing,
            );
            if mode == JumpMode::JumpAfter {
                jump_after(&text, &session.kind, &resolved)
            } else {
                resolved
            }
        };

        let offset = selections.last().map_or(hint.begin, |sel| sel.head);
        host.focus(view)?;
        host.set_selections(view, &selections)?;
        host.show(view, offset)?;

        info!(%view, offset, mode = %self.mode, "jumped");
        Ok(Jump { view, offset })
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;
    use crate::buffer::Buffer;
    use crate::memory::{MemoryHost, PLAIN_TEXT};
    use crate::overlay::HINTS_KEY;
    use pretty_assertions::assert_eq;
    use std::collections::HashSet;
    use std::fs;

    fn config(labels: &str) -> Config {
        Config {
            labels: labels.to_string(),
            ..Config::default()
        }
    }

    fn ace(labels: &str) -> AceJump {
        AceJump::new(config(labels)).unwrap()
    }

    fn changed(text: &str) -> Input {
        Input::Changed(text.to_string())
    }

    fn commit(text: &str) -> Input {
        Input::Commit(text.to_string())
    }

    fn targets(ace: &AceJump) -> Vec<(String, usize, usize)> {
        ace.hints()
            .into_iter()
            .map(|h| (h.label, h.view.0, h.target.begin))
            .collect()
    }

    // -- Construction & modes -----------------------------------------------

    #[test]
    fn empty_alphabet_is_rejected() {
        assert!(matches!(
            AceJump::new(config("")),
            Err(ConfigError::EmptyAlphabet)
        ));
    }

    #[test]
    fn selection_toggles_are_gated() {
        let mut ace = ace("abc");
        assert!(!ace.toggle_select());
        assert!(!ace.toggle_add_cursor());
        assert_eq!(ace.mode(), JumpMode::Normal);

        assert!(ace.toggle_jump_after());
        assert_eq!(ace.mode(), JumpMode::JumpAfter);
        assert!(ace.toggle_jump_after());
        assert_eq!(ace.mode(), JumpMode::Normal);

        let mut ace = AceJump::new(Config {
            selection_modes: true,
            ..Config::default()
        })
        .unwrap();
        assert!(ace.toggle_select());
        assert_eq!(ace.mode(), JumpMode::Select);
        assert!(ace.toggle_add_cursor());
        assert_eq!(ace.mode(), JumpMode::AddCursor);
        assert!(ace.toggle_add_cursor());
        assert_eq!(ace.mode(), JumpMode::Normal);
    }

    // -- Starting -----------------------------------------------------------

    #[test]
    fn start_labels_first_batch() {
        let mut host = MemoryHost::with_views(&["foo bar baz\n"]);
        let mut ace = ace("abc");
        assert!(ace.start(&mut host, PatternKind::WordStart, false).unwrap());

        assert_eq!(host.text(ViewId(0)), "aoo bar caz\n");
        assert_eq!(ace.labeled(), 3);
        assert_eq!(host.prompt().unwrap().title, "Jump Target");
        assert_eq!(host.syntax(ViewId(0)).as_deref(), Some(LABEL_SYNTAX));
        let (regions, scope) = host.regions(ViewId(0), HINTS_KEY).unwrap();
        assert_eq!(regions.len(), 3);
        assert_eq!(scope, "invalid");
    }

    #[test]
    fn second_start_is_rejected() {
        let mut host = MemoryHost::with_views(&["foo bar\n"]);
        let mut ace = ace("abc");
        assert!(ace.start(&mut host, PatternKind::WordStart, false).unwrap());
        assert!(!ace.is_enabled());
        assert!(!ace.start(&mut host, PatternKind::CharStart, false).unwrap());
        assert_eq!(host.prompts_shown(), 1);

        assert_eq!(ace.on_event(&mut host, Input::Closed), Status::Cancelled);
        assert!(ace.is_enabled());
        assert!(ace.start(&mut host, PatternKind::WordStart, false).unwrap());
    }

    #[test]
    fn bad_regex_fails_to_start() {
        let mut host = MemoryHost::with_views(&["x\n"]);
        let mut ace = ace("abc");
        assert!(ace.start(&mut host, PatternKind::Regex("[".into()), false).is_err());
        assert!(ace.is_enabled());
        assert_eq!(host.prompt(), None);
    }

    // -- Labeling across views ----------------------------------------------

    #[test]
    fn labels_are_unique_across_views() {
        let mut host = MemoryHost::with_views(&["one two\n", "three four five\n", "six\n"]);
        let mut ace = ace("abcdefgh");
        ace.start(&mut host, PatternKind::WordStart, false).unwrap();

        let found = targets(&ace);
        assert_eq!(
            found,
            vec![
                ("a".into(), 0, 0),
                ("b".into(), 0, 4),
                ("c".into(), 1, 0),
                ("d".into(), 1, 6),
                ("e".into(), 1, 11),
                ("f".into(), 2, 0),
            ]
        );
        let unique: HashSet<&String> = found.iter().map(|(l, _, _)| l).collect();
        assert_eq!(unique.len(), found.len());
        assert_eq!(host.text(ViewId(1)), "chree dour eive\n");
    }

    #[test]
    fn current_buffer_only_labels_active_view() {
        let mut host = MemoryHost::with_views(&["one two\n", "three four\n"]);
        host.set_active(ViewId(1));
        let mut ace = ace("abcdefgh");
        ace.start(&mut host, PatternKind::WordStart, true).unwrap();

        assert_eq!(host.text(ViewId(0)), "one two\n");
        assert_eq!(host.text(ViewId(1)), "ahree bour\n");
        assert_eq!(host.syntax(ViewId(0)).as_deref(), Some(PLAIN_TEXT));
    }

    #[test]
    fn labeling_is_deterministic() {
        let texts = ["alpha beta\ngamma\n", "delta epsilon\n"];
        let run = || {
            let mut host = MemoryHost::with_views(&texts);
            let mut ace = AceJump::new(Config {
                labels: "qwer".into(),
                double_char_label: true,
                ..Config::default()
            })
            .unwrap();
            ace.start(&mut host, PatternKind::WordStart, false).unwrap();
            (targets(&ace), host.text(ViewId(0)), host.text(ViewId(1)))
        };
        assert_eq!(run(), run());
    }

    #[test]
    fn shared_buffer_is_labeled_once_per_batch() {
        let mut host = MemoryHost::new();
        let buffer = host.add_buffer(Buffer::from_text("one two\n"));
        let left = host.add_view(buffer);
        let right = host.add_view(buffer);
        let mut ace = ace("abcdefgh");
        ace.start(&mut host, PatternKind::WordStart, false).unwrap();

        assert_eq!(targets(&ace), vec![("a".into(), 0, 0), ("b".into(), 0, 4)]);
        assert_eq!(host.text(left), "ane bwo\n");

        // The next batch picks up the second view of the same buffer.
        assert_eq!(ace.on_event(&mut host, commit("")), Status::Labeled(2));
        assert_eq!(targets(&ace), vec![("a".into(), 1, 0), ("b".into(), 1, 4)]);
        assert_eq!(host.text(right), "ane bwo\n");
        assert_eq!(host.undo_count(left), 1);
    }

    #[test]
    fn window_limits_candidates() {
        let mut host = MemoryHost::with_views(&["aa\nbb\ncc\ndd\n"]);
        host.set_visible_lines(ViewId(0), 1, 2);
        let mut ace = ace("xyz");
        ace.start(&mut host, PatternKind::WordStart, false).unwrap();
        assert_eq!(host.text(ViewId(0)), "aa\nxb\nyc\ndd\n");
    }

    #[test]
    fn within_line_uses_current_line() {
        let mut host = MemoryHost::with_views(&["ab cd\nef gh\n"]);
        host.set_selections(ViewId(0), &[Selection::cursor(7)]).unwrap();
        let mut ace = ace("wxyz");
        ace.start(&mut host, PatternKind::WithinLine, false).unwrap();
        assert_eq!(host.prompt().unwrap().title, "Within Line");
        assert_eq!(host.text(ViewId(0)), "ab cd\nwx yz\n");
    }

    // -- Batches ------------------------------------------------------------

    #[test]
    fn return_continues_where_the_batch_stopped() {
        let mut host = MemoryHost::with_views(&["one two three four five\n"]);
        let v = ViewId(0);
        let mut ace = ace("ab");
        ace.start(&mut host, PatternKind::WordStart, false).unwrap();
        assert_eq!(ace.labeled(), 2);
        assert_eq!(host.text(v), "ane bwo three four five\n");

        assert_eq!(ace.on_event(&mut host, commit("")), Status::Labeled(2));
        assert_eq!(host.text(v), "one two ahree bour five\n");
        assert_eq!(host.prompts_shown(), 2);

        assert_eq!(ace.on_event(&mut host, commit("")), Status::Labeled(1));
        assert_eq!(host.text(v), "one two three four aive\n");

        // Every match was shown; start over.
        assert_eq!(ace.on_event(&mut host, commit("")), Status::Labeled(2));
        assert_eq!(host.text(v), "ane bwo three four five\n");

        assert_eq!(host.undo_count(v), 1);
    }

    #[test]
    fn batch_fills_from_the_next_view() {
        let mut host = MemoryHost::with_views(&["a b c\n", "d e\n"]);
        let mut ace = ace("wxyz");
        ace.start(&mut host, PatternKind::WordStart, false).unwrap();
        assert_eq!(
            targets(&ace),
            vec![
                ("w".into(), 0, 0),
                ("x".into(), 0, 2),
                ("y".into(), 0, 4),
                ("z".into(), 1, 0),
            ]
        );

        // View 1 was cut short; it resumes first.
        assert_eq!(ace.on_event(&mut host, commit("")), Status::Labeled(1));
        assert_eq!(targets(&ace), vec![("w".into(), 1, 2)]);
        assert_eq!(host.text(ViewId(0)), "a b c\n");
    }

    #[test]
    fn empty_change_while_labels_shown_is_ignored() {
        let mut host = MemoryHost::with_views(&["one two\n"]);
        let mut ace = ace("ab");
        ace.start(&mut host, PatternKind::WordStart, false).unwrap();
        assert_eq!(ace.on_event(&mut host, changed("")), Status::Waiting);
        assert_eq!(host.undo_count(ViewId(0)), 1);
    }

    // -- Jumping ------------------------------------------------------------

    #[test]
    fn typing_a_label_jumps() {
        let mut host = MemoryHost::with_views(&["foo bar baz\n"]);
        let v = ViewId(0);
        let mut ace = ace("abc");
        ace.start(&mut host, PatternKind::WordStart, false).unwrap();

        let status = ace.on_event(&mut host, changed("b"));
        assert_eq!(status, Status::Jumped(Jump { view: v, offset: 4 }));
        assert_eq!(host.text(v), "foo bar baz\n");
        assert_eq!(host.selections(v), vec![Selection::cursor(4)]);
        assert_eq!(host.revealed(), &[(v, 4)]);
        assert_eq!(host.prompt(), None);
        assert_eq!(host.syntax(v).as_deref(), Some(PLAIN_TEXT));
        assert!(ace.is_enabled());
    }

    #[test]
    fn jump_snaps_to_boundary() {
        let mut host = MemoryHost::with_views(&["a bc\n"]);
        let mut ace = ace("xy");
        ace.start(&mut host, PatternKind::WordStart, false).unwrap();
        let status = ace.on_event(&mut host, changed("x"));
        assert_eq!(status, Status::Jumped(Jump { view: ViewId(0), offset: 1 }));
    }

    #[test]
    fn jump_focuses_owning_view() {
        let mut host = MemoryHost::with_views(&["one\n", "two three\n"]);
        let mut ace = ace("abc");
        ace.start(&mut host, PatternKind::WordStart, false).unwrap();
        let status = ace.on_event(&mut host, commit("c"));
        assert_eq!(status, Status::Jumped(Jump { view: ViewId(1), offset: 4 }));
        assert_eq!(host.active_view(), Some(ViewId(1)));
        assert_eq!(host.selections(ViewId(1)), vec![Selection::cursor(4)]);
        assert_eq!(host.selections(ViewId(0)), vec![Selection::cursor(0)]);
    }

    #[test]
    fn double_char_labels_wait_for_both_chars() {
        let mut host = MemoryHost::with_views(&["aa bb cc dd ee\n"]);
        let mut ace = AceJump::new(Config {
            labels: "ab".into(),
            double_char_label: true,
            ..Config::default()
        })
        .unwrap();
        ace.start(&mut host, PatternKind::WordStart, false).unwrap();
        assert_eq!(host.text(ViewId(0)), "aa bb ab ba ee\n");

        assert_eq!(ace.on_event(&mut host, changed("a")), Status::Waiting);
        let status = ace.on_event(&mut host, changed("ab"));
        assert_eq!(status, Status::Jumped(Jump { view: ViewId(0), offset: 6 }));
    }

    #[test]
    fn jump_after_moves_past_the_word() {
        let mut host = MemoryHost::with_views(&["foo bar\n", "other\n"]);
        let mut ace = ace("abc");
        ace.toggle_jump_after();
        ace.start(&mut host, PatternKind::WordStart, false).unwrap();
        // Modifier modes label the active view only.
        assert_eq!(host.text(ViewId(1)), "other\n");

        let status = ace.on_event(&mut host, changed("b"));
        assert_eq!(status, Status::Jumped(Jump { view: ViewId(0), offset: 7 }));
        assert_eq!(ace.mode(), JumpMode::Normal);
    }

    #[test]
    fn line_jump_after_lands_at_line_end() {
        let mut host = MemoryHost::with_views(&["first line\nsecond\n\n"]);
        let mut ace = ace("abc");
        ace.toggle_jump_after();
        ace.start(&mut host, PatternKind::LineStart, false).unwrap();
        let status = ace.on_event(&mut host, commit("b"));
        assert_eq!(status, Status::Jumped(Jump { view: ViewId(0), offset: 17 }));
    }

    #[test]
    fn select_mode_extends_selection() {
        let mut host = MemoryHost::with_views(&["abc def ghi\n"]);
        host.set_selections(ViewId(0), &[Selection::cursor(2)]).unwrap();
        let mut ace = AceJump::new(Config {
            selection_modes: true,
            ..Config::default()
        })
        .unwrap();
        assert!(ace.toggle_select());
        ace.start(&mut host, PatternKind::WordStart, false).unwrap();
        ace.on_event(&mut host, changed("c"));
        assert_eq!(host.selections(ViewId(0)), vec![Selection::new(2, 8)]);
    }

    #[test]
    fn add_cursor_mode_keeps_selections() {
        let mut host = MemoryHost::with_views(&["abc def ghi\n"]);
        host.set_selections(ViewId(0), &[Selection::cursor(1)]).unwrap();
        let mut ace = AceJump::new(Config {
            selection_modes: true,
            ..Config::default()
        })
        .unwrap();
        ace.toggle_add_cursor();
        ace.start(&mut host, PatternKind::WordStart, false).unwrap();
        ace.on_event(&mut host, changed("b"));
        assert_eq!(
            host.selections(ViewId(0)),
            vec![Selection::cursor(1), Selection::cursor(4)]
        );
    }

    // -- Ending without a jump ----------------------------------------------

    #[test]
    fn cancel_restores_every_view() {
        let mut host = MemoryHost::with_views(&["foo bar\n", "baz qux\n"]);
        let keys = vec!["gutter".to_string(), "word_wrap".to_string()];
        host.set_setting(ViewId(0), "gutter", "false");
        host.set_selections(ViewId(1), &[Selection::new(1, 5)]).unwrap();
        host.set_syntax(ViewId(1), "Rust").unwrap();

        let before: Vec<_> = (0..2)
            .map(|i| {
                let v = ViewId(i);
                (host.text(v), host.selections(v), host.syntax(v), host.settings(v, &keys))
            })
            .collect();

        let mut ace = AceJump::new(Config {
            view_settings: keys.clone(),
            ..Config::default()
        })
        .unwrap();
        ace.start(&mut host, PatternKind::WordStart, false).unwrap();
        assert_ne!(host.text(ViewId(1)), before[1].0);
        assert_eq!(host.syntax(ViewId(1)).as_deref(), Some(LABEL_SYNTAX));

        assert_eq!(ace.on_event(&mut host, Input::Closed), Status::Cancelled);
        let after: Vec<_> = (0..2)
            .map(|i| {
                let v = ViewId(i);
                (host.text(v), host.selections(v), host.syntax(v), host.settings(v, &keys))
            })
            .collect();
        assert_eq!(after, before);
        assert_eq!(host.regions(ViewId(0), HINTS_KEY), None);
        assert!(!host.is_dirty(ViewId(0)));
        assert!(host.revealed().is_empty());
    }

    #[test]
    fn unknown_label_cancels() {
        let mut host = MemoryHost::with_views(&["foo bar\n"]);
        let mut ace = ace("abc");
        ace.start(&mut host, PatternKind::WordStart, false).unwrap();
        assert_eq!(ace.on_event(&mut host, commit("z")), Status::Cancelled);
        assert_eq!(host.text(ViewId(0)), "foo bar\n");
        assert!(ace.is_enabled());
    }

    #[test]
    fn label_past_batch_cancels() {
        // Two candidates: "c" is in the alphabet but wasn't handed out.
        let mut host = MemoryHost::with_views(&["x y\n"]);
        let mut ace = ace("abc");
        ace.start(&mut host, PatternKind::WordStart, false).unwrap();
        assert_eq!(ace.on_event(&mut host, changed("c")), Status::Cancelled);
        assert_eq!(host.selections(ViewId(0)), vec![Selection::cursor(0)]);
    }

    #[test]
    fn cancel_resets_mode() {
        let mut host = MemoryHost::with_views(&["foo\n"]);
        let mut ace = ace("abc");
        ace.toggle_jump_after();
        ace.start(&mut host, PatternKind::WordStart, false).unwrap();
        ace.on_event(&mut host, Input::Closed);
        assert_eq!(ace.mode(), JumpMode::Normal);
    }

    #[test]
    fn closed_view_does_not_block_restore() {
        let mut host = MemoryHost::with_views(&["one two\n", "three\n"]);
        host.set_syntax(ViewId(0), "Markdown").unwrap();
        let mut ace = ace("abc");
        ace.start(&mut host, PatternKind::WordStart, false).unwrap();
        host.close_view(ViewId(1));

        assert_eq!(ace.on_event(&mut host, Input::Closed), Status::Cancelled);
        assert_eq!(host.text(ViewId(0)), "one two\n");
        assert_eq!(host.syntax(ViewId(0)).as_deref(), Some("Markdown"));
    }

    #[test]
    fn unhighlightable_view_is_skipped_and_left_clean() {
        let mut host = MemoryHost::with_views(&["foo bar\n", "baz qux\n"]);
        host.refuse_regions(ViewId(0), true);
        let mut ace = ace("ab");
        assert!(ace.start(&mut host, PatternKind::WordStart, false).unwrap());

        assert_eq!(host.text(ViewId(0)), "foo bar\n");
        assert_eq!(host.undo_count(ViewId(0)), 0);
        assert_eq!(host.text(ViewId(1)), "aaz bux\n");
        assert_eq!(
            ace.on_event(&mut host, commit("b")),
            Status::Jumped(Jump { view: ViewId(1), offset: 4 })
        );
        assert_eq!(host.text(ViewId(0)), "foo bar\n");
        assert_eq!(host.text(ViewId(1)), "baz qux\n");
    }

    #[test]
    fn unhighlightable_view_survives_cancel() {
        let mut host = MemoryHost::with_views(&["foo bar\n"]);
        host.refuse_regions(ViewId(0), true);
        let mut ace = ace("abc");
        ace.start(&mut host, PatternKind::WordStart, false).unwrap();
        assert_eq!(ace.labeled(), 0);

        assert_eq!(ace.on_event(&mut host, Input::Closed), Status::Cancelled);
        assert_eq!(host.text(ViewId(0)), "foo bar\n");
    }

    #[test]
    fn view_without_syntax_keeps_none() {
        let mut host = MemoryHost::with_views(&["foo bar\n"]);
        host.clear_syntax(ViewId(0));
        let mut ace = ace("abc");
        ace.start(&mut host, PatternKind::WordStart, false).unwrap();
        assert_eq!(host.syntax(ViewId(0)), None);

        ace.on_event(&mut host, Input::Closed);
        assert_eq!(host.syntax(ViewId(0)), None);
    }

    #[test]
    fn events_without_session_are_idle() {
        let mut host = MemoryHost::with_views(&["x\n"]);
        let mut ace = ace("abc");
        assert_eq!(ace.on_event(&mut host, commit("")), Status::Idle);
        assert_eq!(ace.on_event(&mut host, Input::Closed), Status::Idle);
    }

    // -- Saving -------------------------------------------------------------

    fn temp_file(name: &str, text: &str) -> std::path::PathBuf {
        let path = std::env::temp_dir().join(format!("acejump-{}-{name}", std::process::id()));
        fs::write(&path, text).unwrap();
        path
    }

    #[test]
    fn touched_files_are_saved_after_jump() {
        let path = temp_file("save", "one two\n");
        let mut host = MemoryHost::new();
        let v = host.open_file(&path).unwrap();
        fs::write(&path, "stale\n").unwrap();

        let mut ace = AceJump::new(Config {
            save_files_after_jump: true,
            ..Config::default()
        })
        .unwrap();
        ace.start(&mut host, PatternKind::WordStart, false).unwrap();
        assert!(matches!(ace.on_event(&mut host, changed("a")), Status::Jumped(_)));

        assert_eq!(fs::read_to_string(&path).unwrap(), "one two\n");
        assert!(!host.is_dirty(v));
        fs::remove_file(&path).unwrap();
    }

    #[test]
    fn unlabeled_files_are_not_saved() {
        let labeled_path = temp_file("labeled", "one two\n");
        let blank_path = temp_file("blank", "   \n");
        let mut host = MemoryHost::new();
        host.open_file(&labeled_path).unwrap();
        host.open_file(&blank_path).unwrap();
        fs::write(&blank_path, "external edit\n").unwrap();

        let mut ace = AceJump::new(Config {
            save_files_after_jump: true,
            ..Config::default()
        })
        .unwrap();
        ace.start(&mut host, PatternKind::WordStart, false).unwrap();
        assert_eq!(ace.labeled(), 2);
        assert!(matches!(ace.on_event(&mut host, changed("a")), Status::Jumped(_)));

        assert_eq!(fs::read_to_string(&blank_path).unwrap(), "external edit\n");
        fs::remove_file(&labeled_path).unwrap();
        fs::remove_file(&blank_path).unwrap();
    }

    #[test]
    fn dirty_and_read_only_files_are_not_saved() {
        let dirty_path = temp_file("dirty", "one two\n");
        let locked_path = temp_file("locked", "three\n");
        let mut host = MemoryHost::new();
        let dirty = host.open_file(&dirty_path).unwrap();
        let locked = host.open_file(&locked_path).unwrap();
        host.begin_edit(dirty).unwrap();
        host.replace(dirty, Span::new(0, 0), "x").unwrap();
        host.end_edit(dirty).unwrap();
        host.set_read_only(locked, true);

        let mut ace = AceJump::new(Config {
            save_files_after_jump: true,
            ..Config::default()
        })
        .unwrap();
        ace.start(&mut host, PatternKind::WordStart, false).unwrap();
        assert!(matches!(ace.on_event(&mut host, changed("c")), Status::Jumped(_)));

        assert_eq!(fs::read_to_string(&dirty_path).unwrap(), "one two\n");
        assert!(host.is_dirty(dirty));
        fs::remove_file(&dirty_path).unwrap();
        fs::remove_file(&locked_path).unwrap();
    }
}
