//! Framework-level error types.
//!
//! Core dispatch errors are defined in `anneal-core`; this module adds the
//! errors of the rendering boundary.

use thiserror::Error;

use anneal_core::ProcessError;

/// Errors that can occur while handling a handler result end to end.
#[derive(Debug, Error)]
pub enum RenderError {
    /// Post-processing failed before the delegate was reached.
    #[error(transparent)]
    Process(#[from] ProcessError),

    /// The delegate renderer failed.
    #[error("renderer failed: {0}")]
    Delegate(String),
}

impl RenderError {
    /// Creates a delegate failure.
    pub fn delegate(msg: impl Into<String>) -> Self {
        Self::Delegate(msg.into())
    }
}

/// Result type for rendering operations.
pub type RenderResult<T> = Result<T, RenderError>;
