//! JSON bodies exchanged with a guidance relay.
//!
//! ```text
//! POST <endpoint>
//! { "message": "...", "isSystemContext": true }
//!
//! 200 { "response": "..." }
//! 500 { "error": "...", "response": "<fallback text>" }
//! ```

use serde::{Deserialize, Serialize};

use crate::error::{GuidanceError, Result};

/// A guidance request as sent to the relay.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(rename_all = "camelCase")]
pub struct GuidanceRequest {
    /// The user's message or the generated prompt.
    pub message: String,
    /// Whether the relay should prepend the hunter assistant system prompt.
    #[serde(default)]
    pub is_system_context: bool,
}

impl GuidanceRequest {
    #[must_use]
    pub fn new(message: impl Into<String>, is_system_context: bool) -> Self {
        Self {
            message: message.into(),
            is_system_context,
        }
    }
}

/// The relay's reply, for both success and failure.
///
/// # Examples
///
/// ```
/// use hunter_guidance::GuidanceResponse;
///
/// let ok: GuidanceResponse = serde_json::from_str(r#"{"response":"Keep going"}"#).unwrap();
/// assert_eq!(ok.into_result().unwrap(), "Keep going");
///
/// let failed: GuidanceResponse =
///     serde_json::from_str(r#"{"error":"boom","response":"fallback"}"#).unwrap();
/// assert!(failed.into_result().is_err());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GuidanceResponse {
    /// Backend failure message, present only on error.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub error: Option<String>,
    /// Generated text, or the fallback text on error.
    #[serde(default)]
    pub response: String,
}

impl GuidanceResponse {
    /// A successful reply.
    #[must_use]
    pub fn ok(response: impl Into<String>) -> Self {
        Self {
            error: None,
            response: response.into(),
        }
    }

    /// A failed reply carrying fallback text.
    #[must_use]
    pub fn failed(error: impl Into<String>, fallback: impl Into<String>) -> Self {
        Self {
            error: Some(error.into()),
            response: fallback.into(),
        }
    }

    /// Converts the reply into the generated text.
    ///
    /// # Errors
    ///
    /// Returns [`GuidanceError::Backend`] if the reply carries an error, and
    /// [`GuidanceError::EmptyResponse`] if it carries no text.
    pub fn into_result(self) -> Result<String> {
        if let Some(reason) = self.error {
            return Err(GuidanceError::Backend { reason });
        }
        if self.response.trim().is_empty() {
            return Err(GuidanceError::EmptyResponse);
        }
        Ok(self.response)
    }
}
