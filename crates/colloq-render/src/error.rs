//! Error types for renderer operations

use thiserror::Error;

/// Result type for renderer operations
pub type RenderResult<T> = std::result::Result<T, RenderError>;

/// Errors that can occur while locating or running the renderer
#[derive(Error, Debug)]
pub enum RenderError {
    /// The renderer could not be found, even after an install attempt.
    /// Nothing can be rendered until the process is restarted.
    #[error("Renderer unavailable: {0}")]
    Unavailable(String),

    /// The renderer ran but failed, could not start, or timed out.
    /// Carries the captured standard error.
    #[error("Rendering failed: {stderr}")]
    Failed { stderr: String },

    /// I/O error
    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),
}

impl RenderError {
    /// Build a `Failed` error from a message
    pub fn failed(stderr: impl Into<String>) -> Self {
        Self::Failed {
            stderr: stderr.into(),
        }
    }

    /// True when the session cannot continue after this error
    pub fn is_fatal(&self) -> bool {
        matches!(self, Self::Unavailable(_))
    }

    /// Captured renderer diagnostics, if any
    pub fn stderr(&self) -> Option<&str> {
        match self {
            Self::Failed { stderr } => Some(stderr),
            _ => None,
        }
    }
}
