//! The guidance relay.
//!
//! A relay sits between the application and a language model: it receives a
//! [`GuidanceRequest`], frames it with the assistant persona when asked to,
//! calls a [`ChatBackend`] and always replies with a [`GuidanceResponse`].
//! [`RelayProvider`] runs the same logic in-process.

use async_trait::async_trait;
use tracing::{error, instrument};

use crate::canned::{EMPTY_RESPONSE_FALLBACK, SYSTEM_ERROR_FALLBACK, SYSTEM_PROMPT};
use crate::error::Result;
use crate::openai::{ChatBackend, ChatMessage};
use crate::provider::{GuidancePrompt, GuidanceProvider};
use crate::wire::{GuidanceRequest, GuidanceResponse};

pub const STATUS_OK: u16 = 200;
pub const STATUS_ERROR: u16 = 500;

/// A relay reply: HTTP status plus body.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelayReply {
    pub status: u16,
    pub body: GuidanceResponse,
}

/// Builds the chat transcript for a request.
///
/// The persona prompt comes first, and only for system-context requests.
///
/// # Examples
///
/// ```
/// use hunter_guidance::GuidanceRequest;
/// use hunter_guidance::relay::build_messages;
///
/// let plain = build_messages(&GuidanceRequest::new("hi", false));
/// assert_eq!(plain.len(), 1);
/// assert_eq!(plain[0].role, "user");
///
/// let framed = build_messages(&GuidanceRequest::new("hi", true));
/// assert_eq!(framed[0].role, "system");
/// assert_eq!(framed[1].content, "hi");
/// ```
#[must_use]
pub fn build_messages(request: &GuidanceRequest) -> Vec<ChatMessage> {
    let mut messages = Vec::with_capacity(2);
    if request.is_system_context {
        messages.push(ChatMessage::system(SYSTEM_PROMPT));
    }
    messages.push(ChatMessage::user(request.message.clone()));
    messages
}

/// Answers a relay request using `backend`.
///
/// Never fails: backend errors produce a 500 reply with the system error
/// fallback text, and an empty answer is replaced by an apology.
#[instrument(skip_all, fields(system = request.is_system_context))]
pub async fn answer(backend: &dyn ChatBackend, request: &GuidanceRequest) -> RelayReply {
    match backend.complete(&build_messages(request)).await {
        Ok(answer) => {
            let text = answer
                .filter(|text| !text.is_empty())
                .unwrap_or_else(|| EMPTY_RESPONSE_FALLBACK.to_string());
            RelayReply {
                status: STATUS_OK,
                body: GuidanceResponse::ok(text),
            }
        }
        Err(e) => {
            error!(error = %e, "relay could not reach the model");
            RelayReply {
                status: STATUS_ERROR,
                body: GuidanceResponse::failed(e.to_string(), SYSTEM_ERROR_FALLBACK),
            }
        }
    }
}

/// A provider that runs the relay in-process over a chat backend.
#[derive(Debug)]
pub struct RelayProvider<B> {
    backend: B,
}

impl<B: ChatBackend> RelayProvider<B> {
    #[must_use]
    pub fn new(backend: B) -> Self {
        Self { backend }
    }
}

#[async_trait]
impl<B: ChatBackend> GuidanceProvider for RelayProvider<B> {
    async fn request_guidance(&self, prompt: &GuidancePrompt) -> Result<String> {
        answer(&self.backend, &prompt.to_request())
            .await
            .body
            .into_result()
    }

    fn name(&self) -> &'static str {
        "relay"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::error::GuidanceError;
    use parking_lot::Mutex;

    /// Records transcripts and replays a fixed outcome.
    struct ScriptedBackend {
        outcome: fn() -> Result<Option<String>>,
        seen: Mutex<Vec<Vec<ChatMessage>>>,
    }

    impl ScriptedBackend {
        fn new(outcome: fn() -> Result<Option<String>>) -> Self {
            Self {
                outcome,
                seen: Mutex::new(Vec::new()),
            }
        }
    }

    #[async_trait]
    impl ChatBackend for ScriptedBackend {
        async fn complete(&self, messages: &[ChatMessage]) -> Result<Option<String>> {
            self.seen.lock().push(messages.to_vec());
            (self.outcome)()
        }
    }

    #[tokio::test]
    async fn success_is_200_with_answer() {
        let backend = ScriptedBackend::new(|| Ok(Some("Clear the B-rank gate.".to_string())));
        let reply = answer(&backend, &GuidanceRequest::new("what next?", true)).await;

        assert_eq!(reply.status, 200);
        assert_eq!(reply.body, GuidanceResponse::ok("Clear the B-rank gate."));

        let seen = backend.seen.lock();
        assert_eq!(seen[0][0], ChatMessage::system(SYSTEM_PROMPT));
        assert_eq!(seen[0][1], ChatMessage::user("what next?"));
    }

    #[tokio::test]
    async fn no_persona_without_system_context() {
        let backend = ScriptedBackend::new(|| Ok(Some("ok".to_string())));
        answer(&backend, &GuidanceRequest::new("plain", false)).await;

        let seen = backend.seen.lock();
        assert_eq!(seen[0], vec![ChatMessage::user("plain")]);
    }

    #[tokio::test]
    async fn empty_answer_becomes_apology() {
        for outcome in [
            (|| Ok(None)) as fn() -> Result<Option<String>>,
            || Ok(Some(String::new())),
        ] {
            let backend = ScriptedBackend::new(outcome);
            let reply = answer(&backend, &GuidanceRequest::new("hi", true)).await;
            assert_eq!(reply.status, 200);
            assert_eq!(reply.body.response, EMPTY_RESPONSE_FALLBACK);
        }
    }

    #[tokio::test]
    async fn failure_is_500_with_system_error() {
        let backend = ScriptedBackend::new(|| Err(GuidanceError::MissingApiKey));
        let reply = answer(&backend, &GuidanceRequest::new("hi", true)).await;

        assert_eq!(reply.status, 500);
        assert_eq!(reply.body.error.as_deref(), Some("API key not configured"));
        assert_eq!(reply.body.response, SYSTEM_ERROR_FALLBACK);
    }

    #[tokio::test]
    async fn relay_provider_surfaces_errors() {
        let provider = RelayProvider::new(ScriptedBackend::new(|| {
            Err(GuidanceError::Backend {
                reason: "OpenAI API error: 503".to_string(),
            })
        }));
        let err = provider
            .request_guidance(&GuidancePrompt::Question("hi".to_string()))
            .await
            .unwrap_err();
        assert!(matches!(err, GuidanceError::Backend { ref reason } if reason == "OpenAI API error: 503"));
    }

    #[tokio::test]
    async fn relay_provider_returns_text() {
        let provider = RelayProvider::new(ScriptedBackend::new(|| Ok(Some("Arise".to_string()))));
        let text = provider
            .request_guidance(&GuidancePrompt::Motivation { task_title: None })
            .await
            .unwrap();
        assert_eq!(text, "Arise");
        assert_eq!(provider.name(), "relay");
    }
}
