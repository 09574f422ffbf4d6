//! Error types for Montage.

use thiserror::Error;

/// Main error type for Montage operations.
#[derive(Error, Debug)]
pub enum MontageError {
    /// A clip spec, fade width, curve or frame rate is invalid.
    /// Raised while building a timeline, before any frame is sampled.
    #[error("Configuration error: {0}")]
    Configuration(String),

    /// Duration metadata for a clip could not be resolved.
    #[error("Failed to resolve duration of {media}: {reason}")]
    Resolution { media: String, reason: String },

    /// A frame was sampled outside `[0, total)`.
    #[error("Frame {frame} is outside the timeline [0, {total})")]
    Domain { frame: i64, total: i64 },

    #[error("I/O error: {0}")]
    Io(#[from] std::io::Error),

    #[error("Serialization error: {0}")]
    Serialization(String),
}

impl MontageError {
    /// Shorthand for a configuration error.
    pub fn config(msg: impl Into<String>) -> Self {
        Self::Configuration(msg.into())
    }
}

/// Result type alias for Montage operations.
pub type Result<T> = std::result::Result<T, MontageError>;
