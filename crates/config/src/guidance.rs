//! Guidance backend configuration.
//!
//! Selects where guidance text comes from and how long a request may take
//! before the canned fallback is shown.
//!
//! - `local`: built-in phrase tables, no network
//! - `remote`: a relay endpoint (requires `endpoint`)
//! - `openai`: an OpenAI-compatible chat-completions API called directly
//!   (uses `endpoint` as the API root when set)

use std::fmt;
use std::str::FromStr;
use std::time::Duration;

use serde::{Deserialize, Serialize};

use crate::error::{ConfigError, Result};

/// Default guidance timeout in seconds.
pub const DEFAULT_TIMEOUT_SECS: u32 = 15;

/// Minimum allowed guidance timeout in seconds.
pub const MIN_TIMEOUT_SECS: u32 = 1;

/// Maximum allowed guidance timeout in seconds.
pub const MAX_TIMEOUT_SECS: u32 = 120;

/// Where guidance text comes from.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default, Serialize, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum GuidanceBackend {
    /// Built-in phrase tables.
    #[default]
    Local,
    /// A guidance relay endpoint.
    Remote,
    /// A chat-completions API, relayed in-process.
    #[serde(rename = "openai")]
    OpenAi,
}

impl GuidanceBackend {
    #[must_use]
    pub fn as_str(self) -> &'static str {
        match self {
            Self::Local => "local",
            Self::Remote => "remote",
            Self::OpenAi => "openai",
        }
    }
}

impl fmt::Display for GuidanceBackend {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for GuidanceBackend {
    type Err = String;

    fn from_str(s: &str) -> std::result::Result<Self, Self::Err> {
        match s.trim().to_ascii_lowercase().as_str() {
            "local" => Ok(Self::Local),
            "remote" => Ok(Self::Remote),
            "openai" => Ok(Self::OpenAi),
            other => Err(format!(
                "unknown guidance backend '{other}', expected local, remote or openai"
            )),
        }
    }
}

/// Guidance settings.
///
/// # Examples
///
/// ```
/// use hunter_config::{GuidanceBackend, GuidanceConfig};
///
/// let config = GuidanceConfig::default();
/// assert_eq!(config.backend, GuidanceBackend::Local);
/// assert_eq!(config.timeout().as_secs(), 15);
///
/// let remote = GuidanceConfig::remote("https://example.com/chat-ai");
/// assert!(remote.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct GuidanceConfig {
    #[serde(default)]
    pub backend: GuidanceBackend,

    /// Relay URL for `remote`, API root override for `openai`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub endpoint: Option<String>,

    /// Seconds before a request falls back to canned text.
    #[serde(default = "default_timeout")]
    pub timeout_secs: u32,

    /// API key or bearer token for the backend.
    ///
    /// When unset, `HUNTER_API_KEY` and then `OPENAI_API_KEY` are consulted.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub api_key: Option<String>,

    /// Model name for the `openai` backend.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub model: Option<String>,
}

fn default_timeout() -> u32 {
    DEFAULT_TIMEOUT_SECS
}

impl Default for GuidanceConfig {
    fn default() -> Self {
        Self {
            backend: GuidanceBackend::Local,
            endpoint: None,
            timeout_secs: DEFAULT_TIMEOUT_SECS,
            api_key: None,
            model: None,
        }
    }
}

impl GuidanceConfig {
    /// Settings for a remote relay at `endpoint`.
    #[must_use]
    pub fn remote(endpoint: impl Into<String>) -> Self {
        Self {
            backend: GuidanceBackend::Remote,
            endpoint: Some(endpoint.into()),
            ..Self::default()
        }
    }

    #[must_use]
    pub fn timeout(&self) -> Duration {
        Duration::from_secs(u64::from(self.timeout_secs))
    }

    /// The endpoint, ignoring blank values.
    #[must_use]
    pub fn endpoint(&self) -> Option<&str> {
        self.endpoint
            .as_deref()
            .map(str::trim)
            .filter(|e| !e.is_empty())
    }

    /// Validates the guidance settings.
    ///
    /// # Errors
    ///
    /// Returns an error if the timeout is outside the allowed range or the
    /// remote backend has no endpoint.
    pub fn validate(&self) -> Result<()> {
        if self.timeout_secs < MIN_TIMEOUT_SECS {
            return Err(ConfigError::InvalidGuidance {
                reason: format!(
                    "timeout {} is below minimum of {} seconds",
                    self.timeout_secs, MIN_TIMEOUT_SECS
                ),
            });
        }

        if self.timeout_secs > MAX_TIMEOUT_SECS {
            return Err(ConfigError::InvalidGuidance {
                reason: format!(
                    "timeout {} exceeds maximum of {} seconds",
                    self.timeout_secs, MAX_TIMEOUT_SECS
                ),
            });
        }

        if self.backend == GuidanceBackend::Remote && self.endpoint().is_none() {
            return Err(ConfigError::InvalidGuidance {
                reason: "remote backend requires an endpoint".to_string(),
            });
        }

        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn default_is_local() {
        let config = GuidanceConfig::default();
        assert_eq!(config.backend, GuidanceBackend::Local);
        assert_eq!(config.timeout_secs, DEFAULT_TIMEOUT_SECS);
        assert!(config.validate().is_ok());
    }

    #[test]
    fn validate_at_boundaries() {
        for secs in [MIN_TIMEOUT_SECS, MAX_TIMEOUT_SECS] {
            let config = GuidanceConfig {
                timeout_secs: secs,
                ..Default::default()
            };
            assert!(config.validate().is_ok(), "{secs} should be accepted");
        }
    }

    #[test]
    fn validate_below_minimum() {
        let config = GuidanceConfig {
            timeout_secs: 0,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }

    #[test]
    fn validate_above_maximum() {
        let config = GuidanceConfig {
            timeout_secs: 121,
            ..Default::default()
        };
        let err = config.validate().unwrap_err();
        assert!(err.to_string().contains("exceeds maximum of 120 seconds"));
    }

    #[test]
    fn remote_requires_endpoint() {
        let config = GuidanceConfig {
            backend: GuidanceBackend::Remote,
            ..Default::default()
        };
        assert!(config.validate().is_err());

        let blank = GuidanceConfig {
            endpoint: Some("   ".to_string()),
            ..config
        };
        assert!(blank.validate().is_err());
    }

    #[test]
    fn openai_needs_no_endpoint() {
        let config = GuidanceConfig {
            backend: GuidanceBackend::OpenAi,
            ..Default::default()
        };
        assert!(config.validate().is_ok());
    }

    #[test]
    fn backend_parsing() {
        assert_eq!("local".parse::<GuidanceBackend>(), Ok(GuidanceBackend::Local));
        assert_eq!(" Remote ".parse::<GuidanceBackend>(), Ok(GuidanceBackend::Remote));
        assert_eq!("OPENAI".parse::<GuidanceBackend>(), Ok(GuidanceBackend::OpenAi));
        assert!("carrier-pigeon".parse::<GuidanceBackend>().is_err());
    }

    #[test]
    fn backend_serializes_lowercase() {
        assert_eq!(
            serde_json::to_string(&GuidanceBackend::OpenAi).unwrap(),
            r#""openai""#
        );
        assert_eq!(
            serde_json::to_string(&GuidanceBackend::Remote).unwrap(),
            r#""remote""#
        );
        assert_eq!(GuidanceBackend::OpenAi.to_string(), "openai");
    }

    #[test]
    fn deserialize_with_defaults() {
        let config: GuidanceConfig = serde_json::from_str("{}").unwrap();
        assert_eq!(config, GuidanceConfig::default());
    }

    #[test]
    fn deserialize_partial() {
        let config: GuidanceConfig =
            serde_json::from_str(r#"{"backend": "remote", "endpoint": "http://relay"}"#).unwrap();
        assert_eq!(config.backend, GuidanceBackend::Remote);
        assert_eq!(config.endpoint(), Some("http://relay"));
        assert_eq!(config.timeout_secs, DEFAULT_TIMEOUT_SECS);
    }
}
