//! Engine configuration loaded from the process environment.
//!
//! Only the external report generation service needs configuration. When no
//! usable API key is present the engine falls back to its deterministic
//! report templates.
//!
//! # Environment variables
//!
//! - `KEYSTONE_GENERATION_API_KEY`: bearer credential for the generation
//!   service. Empty, `unset` and `your_openai_api_key_here` count as absent.
//! - `KEYSTONE_GENERATION_API_URL`: chat-completions endpoint.
//! - `KEYSTONE_GENERATION_MODEL`: model identifier sent with each request.
//! - `KEYSTONE_GENERATION_TEMPERATURE`: sampling temperature.
//! - `KEYSTONE_GENERATION_TIMEOUT_MS`: request timeout in milliseconds.

use serde::{Deserialize, Serialize};
use std::time::Duration;
use thiserror::Error;
use tracing::debug;

/// Credential values that mean "no key configured".
pub const PLACEHOLDER_API_KEYS: [&str; 2] = ["unset", "your_openai_api_key_here"];

const API_KEY_VAR: &str = "KEYSTONE_GENERATION_API_KEY";
const API_URL_VAR: &str = "KEYSTONE_GENERATION_API_URL";
const MODEL_VAR: &str = "KEYSTONE_GENERATION_MODEL";
const TEMPERATURE_VAR: &str = "KEYSTONE_GENERATION_TEMPERATURE";
const TIMEOUT_VAR: &str = "KEYSTONE_GENERATION_TIMEOUT_MS";

/// Errors raised while reading configuration values.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ConfigError {
    /// A variable was present but could not be parsed.
    #[error("invalid value '{value}' for {variable}: {reason}")]
    InvalidValue {
        /// Environment variable name.
        variable: &'static str,
        /// Raw value that failed to parse.
        value: String,
        /// Parser message.
        reason: String,
    },
}

/// Complete engine configuration.
#[derive(Debug, Clone, Default, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct EngineConfig {
    /// External report generation settings.
    pub generation: GenerationConfig,
}

impl EngineConfig {
    /// Loads configuration from the environment, reading `.env` first when
    /// one exists.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] when a numeric variable cannot
    /// be parsed.
    pub fn from_env() -> Result<Self, ConfigError> {
        if let Err(error) = dotenvy::dotenv() {
            debug!(%error, "no .env file loaded");
        }
        Self::from_lookup(|name| std::env::var(name).ok())
    }

    /// Builds configuration from an arbitrary variable lookup.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] when a numeric variable cannot
    /// be parsed.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self, ConfigError> {
        let mut generation = GenerationConfig::default();

        if let Some(api_key) = lookup(API_KEY_VAR) {
            generation.api_key = Some(api_key);
        }
        if let Some(api_url) = lookup(API_URL_VAR) {
            generation.api_url = api_url;
        }
        if let Some(model) = lookup(MODEL_VAR) {
            generation.model = model;
        }
        if let Some(raw) = lookup(TEMPERATURE_VAR) {
            generation.temperature = parse_value(TEMPERATURE_VAR, &raw)?;
        }
        if let Some(raw) = lookup(TIMEOUT_VAR) {
            generation.timeout_ms = parse_value(TIMEOUT_VAR, &raw)?;
        }

        debug!(
            configured = generation.is_configured(),
            model = %generation.model,
            "loaded generation config"
        );
        Ok(Self { generation })
    }
}

fn parse_value<T>(variable: &'static str, raw: &str) -> Result<T, ConfigError>
where
    T: std::str::FromStr,
    T::Err: std::fmt::Display,
{
    raw.trim()
        .parse::<T>()
        .map_err(|err| ConfigError::InvalidValue {
            variable,
            value: raw.to_owned(),
            reason: err.to_string(),
        })
}

/// Settings for the external chat-completions service.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(default)]
pub struct GenerationConfig {
    /// Bearer credential, if any.
    #[serde(rename = "api-key")]
    pub api_key: Option<String>,

    /// Chat-completions endpoint.
    #[serde(rename = "api-url")]
    pub api_url: String,

    /// Model identifier.
    pub model: String,

    /// Sampling temperature.
    pub temperature: f32,

    /// Request timeout in milliseconds.
    #[serde(rename = "timeout-ms")]
    pub timeout_ms: u64,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            api_key: None,
            api_url: "https://api.openai.com/v1/chat/completions".to_owned(),
            model: "gpt-3.5-turbo".to_owned(),
            temperature: 0.7,
            timeout_ms: 60_000,
        }
    }
}

impl GenerationConfig {
    /// Returns the credential when it is usable.
    ///
    /// Missing, blank and placeholder keys yield `None`.
    #[must_use]
    pub fn usable_api_key(&self) -> Option<&str> {
        self.api_key
            .as_deref()
            .map(str::trim)
            .filter(|key| !key.is_empty() && !PLACEHOLDER_API_KEYS.contains(key))
    }

    /// Returns `true` when the external service should be called.
    #[must_use]
    pub fn is_configured(&self) -> bool {
        self.usable_api_key().is_some()
    }

    /// Returns the request timeout.
    #[must_use]
    pub const fn timeout(&self) -> Duration {
        Duration::from_millis(self.timeout_ms)
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use rstest::rstest;
    use std::collections::HashMap;

    fn lookup_from(pairs: &[(&str, &str)]) -> impl Fn(&str) -> Option<String> {
        let map: HashMap<String, String> = pairs
            .iter()
            .map(|(k, v)| ((*k).to_owned(), (*v).to_owned()))
            .collect();
        move |name| map.get(name).cloned()
    }

    #[rstest]
    fn defaults_leave_generation_unconfigured() {
        let config = EngineConfig::from_lookup(|_| None).expect("empty lookup is valid");

        assert!(!config.generation.is_configured());
        assert_eq!(config.generation.model, "gpt-3.5-turbo");
        assert_eq!(config.generation.timeout(), Duration::from_secs(60));
    }

    #[rstest]
    #[case("")]
    #[case("   ")]
    #[case("unset")]
    #[case("your_openai_api_key_here")]
    fn placeholder_keys_are_not_usable(#[case] key: &str) {
        let config = EngineConfig::from_lookup(lookup_from(&[(API_KEY_VAR, key)]))
            .expect("lookup is valid");

        assert_eq!(config.generation.usable_api_key(), None);
    }

    #[rstest]
    fn real_key_and_overrides_are_applied() {
        let config = EngineConfig::from_lookup(lookup_from(&[
            (API_KEY_VAR, "sk-live"),
            (API_URL_VAR, "http://localhost:9999/v1/chat/completions"),
            (MODEL_VAR, "gpt-4o-mini"),
            (TIMEOUT_VAR, "1500"),
        ]))
        .expect("lookup is valid");

        assert_eq!(config.generation.usable_api_key(), Some("sk-live"));
        assert_eq!(config.generation.model, "gpt-4o-mini");
        assert_eq!(
            config.generation.api_url,
            "http://localhost:9999/v1/chat/completions"
        );
        assert_eq!(config.generation.timeout(), Duration::from_millis(1500));
    }

    #[rstest]
    fn non_numeric_timeout_is_rejected() {
        let result = EngineConfig::from_lookup(lookup_from(&[(TIMEOUT_VAR, "soon")]));

        assert!(matches!(
            result,
            Err(ConfigError::InvalidValue {
                variable: TIMEOUT_VAR,
                ..
            })
        ));
    }
}
