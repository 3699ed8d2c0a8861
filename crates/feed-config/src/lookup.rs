//! Bibliographic lookup configuration.

use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

const fn default_enabled() -> bool {
    true
}

fn default_base_url() -> String {
    "https://api.crossref.org".to_string()
}

/// Minimum title similarity for accepting a registry match.
const fn default_threshold() -> f64 {
    0.85
}

const fn default_timeout_secs() -> u64 {
    8
}

fn default_search_base() -> String {
    "https://scholar.google.com/scholar".to_string()
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct LookupConfig {
    /// Query the registry at all. When off, every record without a link gets
    /// the search fallback.
    #[serde(default = "default_enabled")]
    pub enabled: bool,

    /// Crossref REST API root.
    #[serde(default = "default_base_url")]
    pub base_url: String,

    /// Acceptance threshold in `(0, 1]`, measured as normalised Levenshtein
    /// similarity of the lower-cased, whitespace-collapsed titles.
    #[serde(default = "default_threshold")]
    pub threshold: f64,

    /// Per-request timeout.
    #[serde(default = "default_timeout_secs")]
    pub timeout_secs: u64,

    /// Contact address sent in the `User-Agent` (Crossref "polite pool").
    #[serde(default)]
    pub mailto: String,

    /// Search page the fallback link points at; the title goes in `?q=`.
    #[serde(default = "default_search_base")]
    pub search_base: String,
}

impl Default for LookupConfig {
    fn default() -> Self {
        Self {
            enabled: default_enabled(),
            base_url: default_base_url(),
            threshold: default_threshold(),
            timeout_secs: default_timeout_secs(),
            mailto: String::new(),
            search_base: default_search_base(),
        }
    }
}

impl LookupConfig {
    pub(crate) fn validate(&self) -> Result<(), ConfigError> {
        if !(self.threshold > 0.0 && self.threshold <= 1.0) {
            return Err(ConfigError::invalid(
                "lookup.threshold",
                format!("{} is outside (0, 1]", self.threshold),
            ));
        }
        if self.timeout_secs == 0 {
            return Err(ConfigError::invalid("lookup.timeout_secs", "must be at least 1"));
        }
        if self.enabled && self.base_url.trim().is_empty() {
            return Err(ConfigError::invalid("lookup.base_url", "must not be empty"));
        }
        if !feed_core::link::is_web_link(&self.search_base) {
            return Err(ConfigError::invalid(
                "lookup.search_base",
                format!("'{}' is not an http(s) URL", self.search_base),
            ));
        }
        Ok(())
    }
}
