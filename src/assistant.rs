//! Builds the guidance service selected by the configuration.

use std::sync::Arc;

use anyhow::{Context, bail};
use hunter_config::{GuidanceBackend, GuidanceConfig};
use hunter_guidance::openai::ChatCompletionsClient;
use hunter_guidance::{
    GuidanceProvider, GuidanceService, LocalProvider, RelayProvider, RemoteGuidanceClient,
};
use secrecy::SecretString;
use tracing::debug;

/// Creates the provider for `config`.
///
/// # Errors
///
/// Returns an error if the remote backend has no endpoint or an HTTP client
/// cannot be created.
pub fn build_provider(
    config: &GuidanceConfig,
    api_key: Option<SecretString>,
) -> anyhow::Result<Arc<dyn GuidanceProvider>> {
    let provider: Arc<dyn GuidanceProvider> = match config.backend {
        GuidanceBackend::Local => Arc::new(LocalProvider::from_entropy()),
        GuidanceBackend::Remote => {
            let Some(endpoint) = config.endpoint() else {
                bail!("the remote guidance backend needs an endpoint");
            };
            let client = RemoteGuidanceClient::new(endpoint, api_key)
                .context("cannot create guidance client")?;
            Arc::new(client)
        }
        GuidanceBackend::OpenAi => {
            let mut client =
                ChatCompletionsClient::new(api_key).context("cannot create chat client")?;
            if let Some(base_url) = config.endpoint() {
                client = client.with_base_url(base_url);
            }
            if let Some(model) = config.model.as_deref() {
                client = client.with_model(model);
            }
            Arc::new(RelayProvider::new(client))
        }
    };
    debug!(backend = %config.backend, provider = provider.name(), "guidance provider ready");
    Ok(provider)
}

/// Creates the guidance service for `config`, with its timeout applied.
///
/// # Errors
///
/// See [`build_provider`].
pub fn build_service(
    config: &GuidanceConfig,
    api_key: Option<SecretString>,
) -> anyhow::Result<GuidanceService> {
    let provider = build_provider(config, api_key)?;
    Ok(GuidanceService::new(provider).with_timeout(config.timeout()))
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn local_backend() {
        let provider = build_provider(&GuidanceConfig::default(), None).unwrap();
        assert_eq!(provider.name(), "local");
    }

    #[test]
    fn remote_backend() {
        let config = GuidanceConfig::remote("http://127.0.0.1:9/chat-ai");
        let provider = build_provider(&config, None).unwrap();
        assert_eq!(provider.name(), "remote");
    }

    #[test]
    fn remote_without_endpoint() {
        let config = GuidanceConfig {
            backend: GuidanceBackend::Remote,
            ..Default::default()
        };
        assert!(build_provider(&config, None).is_err());
    }

    #[test]
    fn openai_backend() {
        let config = GuidanceConfig {
            backend: GuidanceBackend::OpenAi,
            model: Some("gpt-4o".to_string()),
            ..Default::default()
        };
        let provider = build_provider(&config, Some(SecretString::from("sk-test"))).unwrap();
        assert_eq!(provider.name(), "relay");
    }

    #[test]
    fn service_uses_configured_timeout() {
        let config = GuidanceConfig {
            timeout_secs: 3,
            ..Default::default()
        };
        let service = build_service(&config, None).unwrap();
        assert_eq!(service.timeout().as_secs(), 3);
        assert_eq!(service.provider_name(), "local");
    }
}
