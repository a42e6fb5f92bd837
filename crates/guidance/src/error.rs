//! Error types for guidance requests.
//!
//! None of these reach the player directly: the guidance service turns every
//! failure into a fallback message and keeps the error text for logging.

use std::time::Duration;

/// Errors that can occur while producing guidance text.
#[derive(Debug, thiserror::Error)]
pub enum GuidanceError {
    /// The HTTP request to a guidance backend failed.
    #[error("guidance request failed: {0}")]
    Http(#[from] reqwest::Error),

    /// The backend answered with an error of its own.
    #[error("guidance backend error: {reason}")]
    Backend {
        /// The error reported by the backend.
        reason: String,
    },

    /// The provider did not answer in time.
    #[error("guidance request timed out after {}ms", .0.as_millis())]
    Timeout(Duration),

    /// The chat-completions backend has no API key.
    #[error("API key not configured")]
    MissingApiKey,

    /// The backend answered without any text.
    #[error("guidance backend returned an empty response")]
    EmptyResponse,
}

/// A specialized Result type for guidance operations.
pub type Result<T> = std::result::Result<T, GuidanceError>;
