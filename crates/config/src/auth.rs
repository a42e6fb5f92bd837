//! API key resolution for guidance backends.
//!
//! Keys are resolved with a fallback chain:
//!
//! 1. `guidance.api_key` from the config file
//! 2. `HUNTER_API_KEY` environment variable
//! 3. `OPENAI_API_KEY` environment variable
//! 4. No key (the backend decides whether that is fatal)
//!
//! Blank values are skipped at every step. Resolved keys are wrapped in
//! [`SecretString`] so they never end up in logs.

use secrecy::SecretString;
use tracing::debug;

/// Environment variables consulted for an API key, in priority order.
pub const API_KEY_ENV_VARS: [&str; 2] = ["HUNTER_API_KEY", "OPENAI_API_KEY"];

/// Resolves an API key from the configured value and an environment lookup.
///
/// `lookup` returns the value of an environment variable, if set.
///
/// # Examples
///
/// ```
/// use hunter_config::auth::resolve_api_key;
/// use secrecy::ExposeSecret;
///
/// let key = resolve_api_key(None, |var| {
///     (var == "OPENAI_API_KEY").then(|| "sk-env".to_string())
/// });
/// assert_eq!(key.unwrap().expose_secret(), "sk-env");
///
/// let key = resolve_api_key(Some("sk-config"), |_| Some("sk-env".to_string()));
/// assert_eq!(key.unwrap().expose_secret(), "sk-config");
/// ```
pub fn resolve_api_key(
    configured: Option<&str>,
    lookup: impl Fn(&str) -> Option<String>,
) -> Option<SecretString> {
    if let Some(key) = configured.map(str::trim).filter(|k| !k.is_empty()) {
        debug!("using API key from config");
        return Some(SecretString::from(key.to_string()));
    }

    for var in API_KEY_ENV_VARS {
        if let Some(key) = lookup(var) {
            let key = key.trim();
            if !key.is_empty() {
                debug!(var, "using API key from environment");
                return Some(SecretString::from(key.to_string()));
            }
        }
    }

    debug!("no API key available");
    None
}

/// Resolves an API key using the process environment.
#[must_use]
pub fn resolve_api_key_from_env(configured: Option<&str>) -> Option<SecretString> {
    resolve_api_key(configured, |var| std::env::var(var).ok())
}

/// Checks whether any API key source is available.
pub fn has_api_key(configured: Option<&str>, lookup: impl Fn(&str) -> Option<String>) -> bool {
    resolve_api_key(configured, lookup).is_some()
}

#[cfg(test)]
mod tests {
    use super::*;
    use secrecy::ExposeSecret;
    use std::collections::HashMap;

    fn env(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_string(), (*v).to_string()))
            .collect();
        move |var| map.get(var).cloned()
    }

    #[test]
    fn configured_key_wins() {
        let key = resolve_api_key(Some("sk-config"), env(&[("HUNTER_API_KEY", "sk-hunter")]));
        assert_eq!(key.unwrap().expose_secret(), "sk-config");
    }

    #[test]
    fn hunter_var_beats_openai_var() {
        let key = resolve_api_key(
            None,
            env(&[("HUNTER_API_KEY", "sk-hunter"), ("OPENAI_API_KEY", "sk-openai")]),
        );
        assert_eq!(key.unwrap().expose_secret(), "sk-hunter");
    }

    #[test]
    fn falls_back_to_openai_var() {
        let key = resolve_api_key(None, env(&[("OPENAI_API_KEY", "sk-openai")]));
        assert_eq!(key.unwrap().expose_secret(), "sk-openai");
    }

    #[test]
    fn blank_values_are_skipped() {
        let key = resolve_api_key(
            Some("  "),
            env(&[("HUNTER_API_KEY", ""), ("OPENAI_API_KEY", " sk-trimmed ")]),
        );
        assert_eq!(key.unwrap().expose_secret(), "sk-trimmed");
    }

    #[test]
    fn nothing_available() {
        assert!(resolve_api_key(None, env(&[])).is_none());
        assert!(!has_api_key(None, env(&[])));
    }

    #[test]
    fn has_api_key_with_config_value() {
        assert!(has_api_key(Some("sk"), env(&[])));
    }
}
