//! # feed-config
//!
//! Layered configuration loading for studyfeed using figment.
//!
//! Configuration sources (in priority order, highest wins):
//! 1. Environment variables (`STUDYFEED_*` prefix, `__` as separator)
//! 2. Conventional fallbacks: `OPENAI_API_KEY` -> `generation.api_key`,
//!    `DATABASE_URL` -> `store.url`
//! 3. An explicit file passed with `--config`
//! 4. Project-level `studyfeed.toml`
//! 5. User-level `~/.config/studyfeed/config.toml`
//! 6. Built-in defaults
//!
//! # Environment Variable Mapping
//!
//! Figment maps `STUDYFEED_LOOKUP__THRESHOLD` -> `lookup.threshold`,
//! `STUDYFEED_STORE__URL` -> `store.url`, etc.
//!
//! # Usage
//!
//! ```no_run
//! use feed_config::FeedConfig;
//!
//! let config = FeedConfig::load_with_dotenv(None).expect("config");
//! let plan = config.plan().expect("plan");
//! println!("{} studies per run", plan.total());
//! ```

mod error;
mod feed;
mod generation;
mod lookup;
mod output;
mod store;

pub use error::ConfigError;
pub use feed::FeedSection;
pub use generation::GenerationConfig;
pub use lookup::LookupConfig;
pub use output::OutputConfig;
pub use store::StoreConfig;

use feed_core::{FeedPlan, Strictness};
use figment::{
    Figment,
    providers::{Env, Format, Serialized, Toml},
};
use serde::{Deserialize, Serialize};
use std::path::{Path, PathBuf};

/// Project-local config file name, resolved against the working directory.
pub const PROJECT_CONFIG_FILE: &str = "studyfeed.toml";

/// Conventional variable carrying the generation credential.
pub const CREDENTIAL_ENV: &str = "OPENAI_API_KEY";

/// Conventional variable carrying the store connection string.
pub const DATABASE_URL_ENV: &str = "DATABASE_URL";

#[derive(Debug, Clone, Default, Deserialize, Serialize)]
pub struct FeedConfig {
    #[serde(default)]
    pub generation: GenerationConfig,
    #[serde(default)]
    pub lookup: LookupConfig,
    #[serde(default)]
    pub store: StoreConfig,
    #[serde(default)]
    pub output: OutputConfig,
    #[serde(default)]
    pub feed: FeedSection,
}

impl FeedConfig {
    /// Load configuration from all sources and validate it.
    ///
    /// Does NOT call `dotenvy`; use [`FeedConfig::load_with_dotenv`] for `.env` support.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError`] if a source fails to parse or a value is out of range.
    pub fn load(extra_file: Option<&Path>) -> Result<Self, ConfigError> {
        let config: Self = Self::figment(extra_file).extract()?;
        config.validate()?;
        Ok(config)
    }

    /// Load configuration after reading `.env` from the working directory.
    ///
    /// # Errors
    ///
    /// Same as [`FeedConfig::load`].
    pub fn load_with_dotenv(extra_file: Option<&Path>) -> Result<Self, ConfigError> {
        // A missing .env is normal.
        let _ = dotenvy::dotenv();
        Self::load(extra_file)
    }

    /// Build the figment provider chain.
    ///
    /// Public so tests can inspect the figment or layer providers on top.
    #[must_use]
    pub fn figment(extra_file: Option<&Path>) -> Figment {
        let mut figment = Figment::from(Serialized::defaults(Self::default()));

        if let Some(global_path) = Self::global_config_path()
            && global_path.exists()
        {
            figment = figment.merge(Toml::file(global_path));
        }

        let local_path = PathBuf::from(PROJECT_CONFIG_FILE);
        if local_path.exists() {
            figment = figment.merge(Toml::file(local_path));
        }

        if let Some(path) = extra_file {
            figment = figment.merge(Toml::file(path));
        }

        figment
            .merge(
                Env::raw()
                    .only(&[CREDENTIAL_ENV])
                    .map(|_| "generation.api_key".into()),
            )
            .merge(
                Env::raw()
                    .only(&[DATABASE_URL_ENV])
                    .map(|_| "store.url".into()),
            )
            .merge(Env::prefixed("STUDYFEED_").split("__"))
    }

    /// Range checks figment cannot express.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] naming the first offending field.
    pub fn validate(&self) -> Result<(), ConfigError> {
        self.generation.validate()?;
        self.lookup.validate()?;
        self.plan()?;
        Ok(())
    }

    /// Resolve the run plan: a custom quota list wins over the preset name.
    ///
    /// # Errors
    ///
    /// Returns [`ConfigError::InvalidValue`] for an unknown preset or an
    /// invalid quota list.
    pub fn plan(&self) -> Result<FeedPlan, ConfigError> {
        self.feed.plan()
    }

    #[must_use]
    pub const fn strictness(&self) -> Strictness {
        self.feed.strictness()
    }

    /// Path to the user-global config file.
    fn global_config_path() -> Option<PathBuf> {
        dirs::config_dir().map(|p| p.join("studyfeed").join("config.toml"))
    }
}
