//! HTTP client for a remote guidance relay.
//!
//! The relay accepts a [`GuidanceRequest`] and always answers with a
//! [`GuidanceResponse`] body, using status 500 when it failed. The client
//! decodes the body regardless of status so the relay's error text is kept.

use std::time::Duration;

use async_trait::async_trait;
use secrecy::{ExposeSecret, SecretString};
use tracing::{debug, instrument, warn};

use crate::error::{GuidanceError, Result};
use crate::provider::{GuidancePrompt, GuidanceProvider};
use crate::wire::{GuidanceRequest, GuidanceResponse};

/// Upper bound for a single HTTP exchange, independent of the service timeout.
const HTTP_TIMEOUT: Duration = Duration::from_secs(120);

/// Client for a guidance relay endpoint.
///
/// # Security
///
/// The optional bearer token is stored as a [`SecretString`] and never
/// appears in debug output.
///
/// # Examples
///
/// ```no_run
/// use hunter_guidance::{GuidancePrompt, GuidanceProvider, RemoteGuidanceClient};
///
/// # async fn example() -> hunter_guidance::Result<()> {
/// let client = RemoteGuidanceClient::new("https://example.com/functions/v1/chat-ai", None)?;
/// let text = client
///     .request_guidance(&GuidancePrompt::Question("Suggest a quest".to_string()))
///     .await?;
/// println!("{text}");
/// # Ok(())
/// # }
/// ```
#[derive(Debug)]
pub struct RemoteGuidanceClient {
    http: reqwest::Client,
    endpoint: String,
    token: Option<SecretString>,
}

impl RemoteGuidanceClient {
    /// Creates a client for `endpoint`, sending `token` as a bearer token
    /// when given.
    ///
    /// # Errors
    ///
    /// Returns an error if the HTTP client cannot be initialized.
    pub fn new(endpoint: impl Into<String>, token: Option<SecretString>) -> Result<Self> {
        let http = reqwest::Client::builder().timeout(HTTP_TIMEOUT).build()?;
        Ok(Self::with_http_client(http, endpoint, token))
    }

    /// Creates a client reusing an existing HTTP client.
    #[must_use]
    pub fn with_http_client(
        http: reqwest::Client,
        endpoint: impl Into<String>,
        token: Option<SecretString>,
    ) -> Self {
        Self {
            http,
            endpoint: endpoint.into(),
            token,
        }
    }

    #[must_use]
    pub fn endpoint(&self) -> &str {
        &self.endpoint
    }

    /// Sends a raw relay request and decodes the reply body.
    ///
    /// # Errors
    ///
    /// Returns [`GuidanceError::Http`] if the exchange fails, or
    /// [`GuidanceError::Backend`] if the reply cannot be decoded.
    #[instrument(skip(self, request), fields(endpoint = %self.endpoint, system = request.is_system_context))]
    pub async fn send(&self, request: &GuidanceRequest) -> Result<GuidanceResponse> {
        let mut builder = self.http.post(&self.endpoint).json(request);
        if let Some(token) = &self.token {
            builder = builder.bearer_auth(token.expose_secret());
        }

        let response = builder.send().await?;
        let status = response.status();
        debug!(%status, "relay answered");

        let bytes = response.bytes().await?;
        serde_json::from_slice(&bytes).map_err(|e| {
            warn!(%status, error = %e, "relay reply is not a guidance response");
            GuidanceError::Backend {
                reason: format!("unexpected relay reply (HTTP {})", status.as_u16()),
            }
        })
    }
}

#[async_trait]
impl GuidanceProvider for RemoteGuidanceClient {
    async fn request_guidance(&self, prompt: &GuidancePrompt) -> Result<String> {
        let reply = self.send(&prompt.to_request()).await?;
        if let Some(error) = &reply.error {
            warn!(%error, "relay reported a failure");
        }
        reply.into_result()
    }

    fn name(&self) -> &'static str {
        "remote"
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::test_server::{direct_client, serve_once};

    fn client(url: String, token: Option<&str>) -> RemoteGuidanceClient {
        RemoteGuidanceClient::with_http_client(
            direct_client(),
            url,
            token.map(|t| SecretString::from(t.to_string())),
        )
    }

    #[tokio::test]
    async fn posts_wire_request_and_reads_response() {
        let (url, server) = serve_once("200 OK", r#"{"response":"Arise."}"#.to_string()).await;
        let client = client(url, Some("anon-key"));

        let text = client
            .request_guidance(&GuidancePrompt::Question("What now?".to_string()))
            .await
            .expect("guidance");
        assert_eq!(text, "Arise.");

        let recorded = server.await.expect("server");
        assert!(recorded.head.starts_with("POST / HTTP/1.1"));
        assert_eq!(recorded.header("authorization"), Some("Bearer anon-key"));
        assert_eq!(
            recorded.json(),
            serde_json::json!({ "message": "What now?", "isSystemContext": true })
        );
    }

    #[tokio::test]
    async fn error_body_on_500_becomes_backend_error() {
        let body = r#"{"error":"OpenAI API key not configured","response":"fallback"}"#;
        let (url, server) = serve_once("500 Internal Server Error", body.to_string()).await;
        let client = client(url, None);

        let err = client
            .request_guidance(&GuidancePrompt::Raw("hi".to_string()))
            .await
            .unwrap_err();
        assert!(
            matches!(err, GuidanceError::Backend { ref reason } if reason == "OpenAI API key not configured")
        );

        let recorded = server.await.expect("server");
        assert_eq!(recorded.header("authorization"), None);
        assert_eq!(recorded.json()["isSystemContext"], false);
    }

    #[tokio::test]
    async fn send_exposes_full_reply() {
        let body = r#"{"error":"boom","response":"System Error"}"#;
        let (url, _server) = serve_once("500 Internal Server Error", body.to_string()).await;

        let reply = client(url, None)
            .send(&GuidanceRequest::new("hi", true))
            .await
            .expect("decoded reply");
        assert_eq!(reply, GuidanceResponse::failed("boom", "System Error"));
    }

    #[tokio::test]
    async fn non_json_reply_is_backend_error() {
        let (url, _server) = serve_once("502 Bad Gateway", "<html>".to_string()).await;

        let err = client(url, None)
            .request_guidance(&GuidancePrompt::Question("hi".to_string()))
            .await
            .unwrap_err();
        assert!(
            matches!(err, GuidanceError::Backend { ref reason } if reason == "unexpected relay reply (HTTP 502)")
        );
    }

    #[tokio::test]
    async fn unreachable_endpoint_is_http_error() {
        let client = client("http://127.0.0.1:1".to_string(), None);
        let err = client
            .request_guidance(&GuidancePrompt::Question("hi".to_string()))
            .await
            .unwrap_err();
        assert!(matches!(err, GuidanceError::Http(_)));
    }

    #[test]
    fn debug_hides_token() {
        let client = client("http://localhost".to_string(), Some("super-secret"));
        assert!(!format!("{client:?}").contains("super-secret"));
    }
}
