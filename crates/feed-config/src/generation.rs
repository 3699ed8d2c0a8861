//! Text-generation service configuration.

use serde::{Deserialize, Serialize};

use crate::CREDENTIAL_ENV;
use crate::error::ConfigError;

fn default_base_url() -> String {
    "https://api.openai.com/v1".to_string()
}

fn default_model() -> String {
    "gpt-4o-mini".to_string()
}

const fn default_temperature() -> f32 {
    0.7
}

/// Default request timeout in seconds. Completions for large plans are slow.
const fn default_timeout_secs() -> u64 {
    120
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct GenerationConfig {
    /// Bearer credential for the chat-completions endpoint.
    #[serde(default)]
    pub api_key: String,

    /// Base URL of an OpenAI-compatible API (no trailing `/chat/completions`).
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Model identifier.
    #[serde(default = "default_model")]
    pub model: String,

    /// Sampling temperature.
    #[serde(default = "default_temperature")]
    pub temperature: f32,

    /// Optional completion length cap.
    #[serde(default)]
    pub max_tokens: Option<u32>,

    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,
}

impl Default for GenerationConfig {
    fn default() -> Self {
        Self {
            api_key: String::new(),
            base_url: default_base_url(),
            model: default_model(),
            temperature: default_temperature(),
            max_tokens: None,
            timeout_secs: default_timeout_secs(),
        }
    }
}

impl GenerationConfig {
    /// The credential, or a configuration error when it is absent.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::MissingCredential`] if `api_key` is empty.
    pub fn require_api_key(&self) -> Result<&str, ConfigError> {
        let key = self.api_key.trim();
        if key.is_empty() {
            return Err(ConfigError::MissingCredential {
                key: "generation.api_key".into(),
                env: format!("{CREDENTIAL_ENV} or STUDYFEED_GENERATION__API_KEY"),
            });
        }
        Ok(key)
    }

    pub(crate) fn validate(&self) -> Result<(), ConfigError> {
        if self.model.trim().is_empty() {
            return Err(ConfigError::invalid("generation.model", "must not be empty"));
        }
        if self.base_url.trim().is_empty() {
            return Err(ConfigError::invalid("generation.base_url", "must not be empty"));
        }
        if !(0.0..=2.0).contains(&self.temperature) {
            return Err(ConfigError::invalid(
                "generation.temperature",
                format!("{} is outside 0.0..=2.0", self.temperature),
            ));
        }
        if self.timeout_secs == 0 {
            return Err(ConfigError::invalid("generation.timeout_secs", "must be at least 1"));
        }
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn defaults_match_the_daily_generator() {
        let config = GenerationConfig::default();
        assert_eq!(config.model, "gpt-4o-mini");
        assert!((config.temperature - 0.7).abs() < f32::EPSILON);
        assert!(config.max_tokens.is_none());
        assert!(config.validate().is_ok());
    }

    #[test]
    fn missing_key_is_a_credential_error() {
        let config = GenerationConfig {
            api_key: "   ".into(),
            ..Default::default()
        };
        let err = config.require_api_key().unwrap_err();
        assert!(matches!(err, ConfigError::MissingCredential { .. }));
        assert!(err.to_string().contains("OPENAI_API_KEY"));
    }

    #[test]
    fn present_key_is_trimmed() {
        let config = GenerationConfig {
            api_key: " sk-test \n".into(),
            ..Default::default()
        };
        assert_eq!(config.require_api_key().unwrap(), "sk-test");
    }

    #[test]
    fn temperature_out_of_range_is_rejected() {
        let config = GenerationConfig {
            temperature: 2.5,
            ..Default::default()
        };
        assert!(config.validate().is_err());
    }
}
