//! Error types for poster composition

use thiserror::Error;

/// Result type for poster operations
pub type Result<T> = std::result::Result<T, PosterError>;

/// Errors that can occur while preparing a poster document
#[derive(Error, Debug)]
pub enum PosterError {
    /// Theme name is not registered
    #[error("Unknown theme: {0}")]
    UnknownTheme(String),

    /// A numeric style setting is outside its allowed range
    #[error("{field} must be between {min} and {max}, got {value}")]
    OutOfRange {
        field: &'static str,
        value: f64,
        min: f64,
        max: f64,
    },

    /// Photo is not one of the accepted image types
    #[error("Unsupported image type: {0}")]
    UnsupportedImage(String),

    /// IO error
    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}
