//! Error types for media resolution.

use std::time::Duration;
use thiserror::Error;

/// Errors raised by a duration resolver.
#[derive(Debug, Error)]
pub enum MediaError {
    /// The resolver has no entry for this media.
    #[error("Media not found: {media}")]
    NotFound { media: String },

    /// The resolver answered with a length no clip can have.
    #[error("Invalid duration for {media}: {reason}")]
    InvalidDuration { media: String, reason: String },

    /// The resolver did not answer in time.
    #[error("Timed out after {timeout:?} resolving {media}")]
    Timeout { media: String, timeout: Duration },

    /// Malformed duration manifest.
    #[error("Manifest error: {0}")]
    Manifest(String),

    #[error("IO error: {0}")]
    Io(#[from] std::io::Error),
}

/// Result type alias for media operations.
pub type MediaResult<T> = std::result::Result<T, MediaError>;
