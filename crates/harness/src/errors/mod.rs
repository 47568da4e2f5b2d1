//! Error types and fault classification for the harness crate.
//!
//! This module provides:
//! - [`HarnessError`]: I/O, serialization and input errors surfaced to callers
//! - [`BackendError`]: failures at the generation backend seam
//! - [`FaultClass`]: how the batch loop reacts to a [`BackendError`]

mod fault;

pub use fault::FaultClass;

use std::path::PathBuf;

use thiserror::Error;

/// Errors raised outside of the dispatch loop: loading prompts, saving or
/// reloading the response artifact, writing reports.
#[derive(Error, Debug)]
pub enum HarnessError {
    /// A file could not be read or written.
    #[error("I/O error on {path}: {source}")]
    Io {
        path: PathBuf,
        #[source]
        source: std::io::Error,
    },

    /// The response artifact or a report could not be (de)serialized.
    #[error("JSON error: {0}")]
    Json(#[from] serde_json::Error),

    /// A CSV prompt file is malformed.
    #[error("CSV error in {path}: {message}")]
    Csv { path: PathBuf, message: String },

    /// Invalid caller-supplied input.
    #[error("{0}")]
    InvalidInput(String),
}

impl HarnessError {
    pub fn io(path: impl Into<PathBuf>, source: std::io::Error) -> Self {
        Self::Io {
            path: path.into(),
            source,
        }
    }

    pub fn invalid_input(msg: impl Into<String>) -> Self {
        Self::InvalidInput(msg.into())
    }
}

/// Errors returned by a [`GenerationBackend`](crate::backend::GenerationBackend).
#[derive(Error, Debug)]
pub enum BackendError {
    /// The backend answered with a non-200 status.
    /// The body carries no guaranteed structure and is kept only for logging.
    #[error("Backend rejected request with status {status}")]
    Rejected { status: u16, body: String },

    /// The backend could not be reached at all (connection refused, DNS, ...).
    #[error("Backend unreachable at {endpoint}: {message}")]
    Unreachable { endpoint: String, message: String },

    /// The connection was established but the exchange failed
    /// (timeout, truncated body, invalid request).
    #[error("Transport error: {0}")]
    Transport(String),
}

impl BackendError {
    /// Returns how the batch loop should react to this error.
    ///
    /// ```
    /// use verdict_harness::errors::{BackendError, FaultClass};
    ///
    /// let error = BackendError::Rejected { status: 500, body: String::new() };
    /// assert_eq!(error.fault_class(), FaultClass::SkipPrompt);
    ///
    /// let error = BackendError::Transport("timed out".to_string());
    /// assert_eq!(error.fault_class(), FaultClass::AbortBatch);
    /// ```
    pub fn fault_class(&self) -> FaultClass {
        match self {
            Self::Rejected { .. } => FaultClass::SkipPrompt,
            Self::Unreachable { .. } | Self::Transport(_) => FaultClass::AbortBatch,
        }
    }

    /// HTTP status for rejections, `None` for transport-level faults.
    pub fn status(&self) -> Option<u16> {
        match self {
            Self::Rejected { status, .. } => Some(*status),
            _ => None,
        }
    }
}
