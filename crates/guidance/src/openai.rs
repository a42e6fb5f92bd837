//! Chat-completions upstream for the relay.
//!
//! [`ChatBackend`] is what the relay needs from a language model: a list of
//! role-tagged messages in, an optional answer out. [`ChatCompletionsClient`]
//! implements it against an OpenAI-compatible `/chat/completions` endpoint.

use std::time::Duration;

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use serde::{Deserialize, Serialize};
use tracing::{debug, error, instrument};

use crate::error::{GuidanceError, Result};

pub const DEFAULT_BASE_URL: &str = "https://api.openai.com/v1";
pub const DEFAULT_MODEL: &str = "gpt-4o-mini";
pub const DEFAULT_MAX_TOKENS: u32 = 1024;
pub const DEFAULT_TEMPERATURE: f32 = 0.7;

const HTTP_TIMEOUT: Duration = Duration::from_secs(120);

/// One message of a chat transcript.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct ChatMessage {
    /// `system`, `user` or `assistant`.
    pub role: String,
    pub content: String,
}

impl ChatMessage {
    #[must_use]
    pub fn system(content: impl Into<String>) -> Self {
        Self {
            role: "system".to_string(),
            content: content.into(),
        }
    }

    #[must_use]
    pub fn user(content: impl Into<String>) -> Self {
        Self {
            role: "user".to_string(),
            content: content.into(),
        }
    }
}

/// A language model that answers chat transcripts.
#[async_trait]
pub trait ChatBackend: Send + Sync {
    /// Returns the model's answer, or `None` if it produced no text.
    ///
    /// # Errors
    ///
    /// Returns an error if the model could not be called.
    async fn complete(&self, messages: &[ChatMessage]) -> Result<Option<String>>;
}

#[derive(Debug, Serialize)]
struct CompletionRequest<'a> {
    model: &'a str,
    messages: &'a [ChatMessage],
    max_tokens: u32,
    temperature: f32,
}

#[derive(Debug, Deserialize)]
struct CompletionResponse {
    #[serde(default)]
    choices: Vec<Choice>,
}

#[derive(Debug, Deserialize)]
struct Choice {
    message: Option<ChoiceMessage>,
}

#[derive(Debug, Deserialize)]
struct ChoiceMessage {
    content: Option<String>,
}

/// Client for an OpenAI-compatible chat-completions API.
///
/// A client without an API key can be built; every call then fails with
/// [`GuidanceError::MissingApiKey`].
///
/// # Examples
///
/// ```no_run
/// use hunter_guidance::openai::{ChatBackend, ChatCompletionsClient, ChatMessage};
/// use secrecy::SecretString;
///
/// # async fn example() -> hunter_guidance::Result<()> {
/// let key = SecretString::from("sk-...".to_string());
/// let client = ChatCompletionsClient::new(Some(key))?.with_model("gpt-4o-mini");
/// let answer = client.complete(&[ChatMessage::user("Hello")]).await?;
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct ChatCompletionsClient {
    http: reqwest::Client,
    base_url: String,
    model: String,
    api_key: Option<SecretString>,
    max_tokens: u32,
    temperature: f32,
}

impl ChatCompletionsClient {
    /// Creates a client for the default endpoint and model.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be initialized.
    pub fn new(api_key: Option<SecretString>) -> Result<Self> {
        let http = reqwest::Client::builder().timeout(HTTP_TIMEOUT).build()?;
        Ok(Self::with_http_client(http, api_key))
    }

    #[must_use]
    pub fn with_http_client(http: reqwest::Client, api_key: Option<SecretString>) -> Self {
        Self {
            http,
            base_url: DEFAULT_BASE_URL.to_string(),
            model: DEFAULT_MODEL.to_string(),
            api_key,
            max_tokens: DEFAULT_MAX_TOKENS,
            temperature: DEFAULT_TEMPERATURE,
        }
    }

    /// Points the client at another OpenAI-compatible API root.
    #[must_use]
    pub fn with_base_url(mut self, base_url: impl Into<String>) -> Self {
        self.base_url = base_url.into().trim_end_matches('/').to_string();
        self
    }

    #[must_use]
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }

    #[must_use]
    pub fn model(&self) -> &str {
        &self.model
    }

    fn endpoint(&self) -> String {
        format!("{}/chat/completions", self.base_url)
    }
}

#[async_trait]
impl ChatBackend for ChatCompletionsClient {
    #[instrument(skip(self, messages), fields(model = %self.model, messages = messages.len()))]
    async fn complete(&self, messages: &[ChatMessage]) -> Result<Option<String>> {
        let api_key = self.api_key.as_ref().ok_or(GuidanceError::MissingApiKey)?;

        let body = CompletionRequest {
            model: &self.model,
            messages,
            max_tokens: self.max_tokens,
            temperature: self.temperature,
        };

        let response = self
            .http
            .post(self.endpoint())
            .bearer_auth(api_key.expose_secret())
            .json(&body)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let detail = response.text().await.unwrap_or_default();
            error!(%status, %detail, "chat completions request failed");
            return Err(GuidanceError::Backend {
                reason: format!("OpenAI API error: {}", status.as_u16()),
            });
        }

        let parsed: CompletionResponse = response.json().await?;
        let answer = parsed
            .choices
            .into_iter()
            .next()
            .and_then(|choice| choice.message)
            .and_then(|message| message.content);
        debug!(answered = answer.is_some(), "chat completions returned");
        Ok(answer)
    }
}
