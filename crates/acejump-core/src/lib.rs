//! # acejump-core — label-based jumping for text editors
//!
//! The engine scans the visible text of one or more views for jump targets,
//! overlays a short label on each, and moves the cursor to whichever target's
//! label the user types.
//!
//! - **[`session`]** — `AceJump`, the controller: batches, input, jumping
//! - **[`matcher`]** — pattern kinds, search windows, resumable scanning
//! - **[`labels`]** — label alphabets, single- and double-char allocation
//! - **[`overlay`]** — writing labels into a view as one undoable edit
//! - **[`resolver`]** — jump modes, boundary snapping, the final selections
//! - **[`host`]** — the `Host` trait the engine drives an editor through
//! - **[`memory`]** — `MemoryHost`, a complete in-process `Host`
//! - **[`config`]** — settings from TOML and `:set`-style overrides
//!
//! Supporting types live in [`position`] (offsets, spans, selections),
//! [`buffer`] (rope-backed text), [`history`] (transactional undo), and
//! [`word`] (character classes and motions). Errors are in [`error`].
//!
//! ```
//! use acejump_core::host::{Input, ViewId};
//! use acejump_core::matcher::PatternKind;
//! use acejump_core::memory::MemoryHost;
//! use acejump_core::session::{AceJump, Jump, Status};
//! use acejump_core::config::Config;
//!
//! let mut host = MemoryHost::with_views(&["fn main() {}\n"]);
//! let mut ace = AceJump::new(Config::default()).unwrap();
//! ace.start(&mut host, PatternKind::WordStart, false).unwrap();
//! assert_eq!(host.text(ViewId(0)), "an bain() {}\n");
//!
//! let status = ace.on_event(&mut host, Input::Changed("b".into()));
//! assert_eq!(status, Status::Jumped(Jump { view: ViewId(0), offset: 3 }));
//! ```

pub mod buffer;
pub mod config;
pub mod error;
pub mod history;
pub mod host;
pub mod labels;
pub mod matcher;
pub mod memory;
pub mod overlay;
pub mod position;
pub mod resolver;
pub mod session;
pub mod word;
