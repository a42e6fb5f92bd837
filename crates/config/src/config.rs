//! Core configuration struct and loading logic.
//!
//! This module provides the main [`Config`] struct which aggregates all
//! configuration options for the hunter application.

use std::path::{Path, PathBuf};

use serde::{Deserialize, Serialize};
use tracing::{debug, instrument};

use crate::error::{ConfigError, Result};
use crate::guidance::{GuidanceBackend, GuidanceConfig};
use crate::persistence::{default_data_dir, find_config_file, read_config_file, write_config_file};

/// Overrides the data directory.
pub const DATA_DIR_ENV: &str = "HUNTER_DATA_DIR";

/// Overrides the guidance backend (`local`, `remote` or `openai`).
pub const GUIDANCE_BACKEND_ENV: &str = "HUNTER_GUIDANCE_BACKEND";

/// Overrides the guidance endpoint.
pub const GUIDANCE_ENDPOINT_ENV: &str = "HUNTER_GUIDANCE_ENDPOINT";

/// Overrides the guidance timeout, in whole seconds.
pub const GUIDANCE_TIMEOUT_ENV: &str = "HUNTER_GUIDANCE_TIMEOUT_SECS";

/// The main configuration struct for the hunter application.
///
/// # Examples
///
/// ```
/// use hunter_config::{Config, GuidanceConfig};
///
/// let config = Config::default();
/// assert!(config.seed_on_first_run);
/// assert!(config.data_dir.is_none());
///
/// let config = Config {
///     guidance: GuidanceConfig::remote("https://relay.example.com/chat-ai"),
///     ..Default::default()
/// };
/// assert!(config.validate().is_ok());
/// ```
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct Config {
    /// Where player profiles are stored.
    ///
    /// Defaults to the platform data directory, e.g. `~/.local/share/hunter`.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub data_dir: Option<PathBuf>,

    /// Whether a brand-new profile starts with the sample dungeons.
    #[serde(default = "default_seed_on_first_run")]
    pub seed_on_first_run: bool,

    /// Guidance backend settings.
    #[serde(default)]
    pub guidance: GuidanceConfig,
}

fn default_seed_on_first_run() -> bool {
    true
}

impl Default for Config {
    fn default() -> Self {
        Self {
            data_dir: None,
            seed_on_first_run: true,
            guidance: GuidanceConfig::default(),
        }
    }
}

impl Config {
    /// Creates a new default configuration.
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    /// Loads configuration from the default file locations, then applies
    /// `HUNTER_*` environment overrides.
    ///
    /// If no configuration file is found, the defaults are used.
    ///
    /// # Errors
    ///
    /// Returns an error if a configuration file is found but cannot be
    /// read or parsed, if an environment override is malformed, or if the
    /// result fails validation.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use hunter_config::Config;
    ///
    /// # fn example() -> hunter_config::Result<()> {
    /// let config = Config::load()?;
    /// println!("Guidance backend: {}", config.guidance.backend);
    /// # Ok(())
    /// # }
    /// ```
    #[instrument]
    pub fn load() -> Result<Self> {
        let mut config = match find_config_file() {
            Some(path) => {
                debug!(path = %path.display(), "loading config file");
                read_config_file(&path)?
            }
            None => Self::default(),
        };
        config.apply_env_overrides(|var| std::env::var(var).ok())?;
        config.validate()?;
        Ok(config)
    }

    /// Loads configuration from a specific file.
    ///
    /// Environment overrides are not applied.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be read or parsed, or if it fails
    /// validation.
    pub fn load_from(path: impl AsRef<Path>) -> Result<Self> {
        let config: Config = read_config_file(path)?;
        config.validate()?;
        Ok(config)
    }

    /// Saves the configuration to a file.
    ///
    /// # Errors
    ///
    /// Returns an error if the file cannot be written.
    pub fn save_to(&self, path: impl AsRef<Path>) -> Result<()> {
        write_config_file(path, self)
    }

    /// Applies `HUNTER_*` overrides read through `lookup`.
    ///
    /// Blank values are ignored.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidEnvironment`] if the backend or timeout
    /// override cannot be parsed.
    ///
    /// # Examples
    ///
    /// ```
    /// use hunter_config::{Config, GuidanceBackend};
    ///
    /// let mut config = Config::default();
    /// config
    ///     .apply_env_overrides(|var| match var {
    ///         "HUNTER_GUIDANCE_BACKEND" => Some("remote".to_string()),
    ///         "HUNTER_GUIDANCE_ENDPOINT" => Some("http://localhost:8787".to_string()),
    ///         _ => None,
    ///     })
    ///     .unwrap();
    /// assert_eq!(config.guidance.backend, GuidanceBackend::Remote);
    /// ```
    pub fn apply_env_overrides(&mut self, lookup: impl Fn(&str) -> Option<String>) -> Result<()> {
        let read = |var: &str| {
            lookup(var)
                .map(|v| v.trim().to_string())
                .filter(|v| !v.is_empty())
        };

        if let Some(dir) = read(DATA_DIR_ENV) {
            debug!(var = DATA_DIR_ENV, "overriding data directory");
            self.data_dir = Some(PathBuf::from(dir));
        }

        if let Some(value) = read(GUIDANCE_BACKEND_ENV) {
            let backend = value.parse::<GuidanceBackend>().map_err(|reason| {
                ConfigError::InvalidEnvironment {
                    var: GUIDANCE_BACKEND_ENV,
                    value: value.clone(),
                    reason,
                }
            })?;
            self.guidance.backend = backend;
        }

        if let Some(endpoint) = read(GUIDANCE_ENDPOINT_ENV) {
            self.guidance.endpoint = Some(endpoint);
        }

        if let Some(value) = read(GUIDANCE_TIMEOUT_ENV) {
            let secs = value
                .parse::<u32>()
                .map_err(|_| ConfigError::InvalidEnvironment {
                    var: GUIDANCE_TIMEOUT_ENV,
                    value: value.clone(),
                    reason: "expected a whole number of seconds".to_string(),
                })?;
            self.guidance.timeout_secs = secs;
        }

        Ok(())
    }

    /// Validates the configuration.
    ///
    /// # Errors
    ///
    /// Returns an error if the guidance settings are invalid.
    pub fn validate(&self) -> Result<()> {
        self.guidance.validate()
    }

    /// The data directory, falling back to the platform default.
    ///
    /// # Errors
    ///
    /// Returns an error if no directory is configured and the platform data
    /// directory cannot be determined.
    pub fn data_dir(&self) -> Result<PathBuf> {
        match &self.data_dir {
            Some(dir) => Ok(dir.clone()),
            None => default_data_dir(),
        }
    }
}
