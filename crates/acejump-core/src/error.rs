//! Error types.
//!
//! Most things that go wrong during a jump are not errors at all. An empty
//! window or a mistyped label just ends a batch or a session. What remains is a host refusing an operation, a bad settings
//! file, or a pattern that won't compile.

use std::io;
use std::path::PathBuf;

use thiserror::Error;

use crate::host::ViewId;

/// A host operation failed.
#[derive(Debug, Error)]
pub enum HostError {
    /// The view was closed (or never existed).
    #[error("view {0} is closed")]
    ViewClosed(ViewId),

    /// The view's buffer can't be written.
    #[error("view {0} is read-only")]
    ReadOnly(ViewId),

    /// An edit reached past the end of the view's buffer.
    #[error("edit out of bounds in view {0}")]
    OutOfBounds(ViewId),

    /// Saving needs a file path the buffer doesn't have.
    #[error("view {0} has no file path")]
    NoPath(ViewId),

    /// The host declined the operation.
    #[error("view {view} refused {operation}")]
    Refused {
        view: ViewId,
        operation: &'static str,
    },

    #[error(transparent)]
    Io(#[from] io::Error),
}

/// Loading or changing settings failed.
#[derive(Debug, Error)]
pub enum ConfigError {
    #[error("failed to read {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: io::Error,
    },

    #[error("invalid settings: {0}")]
    Parse(#[from] toml::de::Error),

    #[error("label alphabet is empty")]
    EmptyAlphabet,

    #[error("label {0:?} appears more than once in the alphabet")]
    DuplicateLabel(char),

    #[error("unknown option: {0}")]
    UnknownOption(String),

    #[error("invalid value for {option}: {value}")]
    InvalidValue { option: String, value: String },
}

/// Label allocation failed.
#[derive(Debug, Error, PartialEq, Eq)]
pub enum LabelError {
    /// More labels were requested than the alphabet can produce.
    #[error("need {requested} labels but only {capacity} are available")]
    CapacityExceeded { requested: usize, capacity: usize },
}

/// A jump pattern didn't compile.
#[derive(Debug, Error)]
#[error("invalid jump pattern: {0}")]
pub struct PatternError(#[from] pub regex::Error);
