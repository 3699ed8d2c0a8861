//! Run plan and validation mode.

use feed_core::{FeedPlan, Strictness, TrackQuota};
use serde::{Deserialize, Serialize};

use crate::error::ConfigError;

fn default_plan() -> String {
    FeedPlan::DEFAULT_PRESET.to_string()
}

const fn default_strict() -> bool {
    true
}

#[derive(Debug, Clone, Deserialize, Serialize)]
pub struct FeedSection {
    /// Preset name: `brief`, `daily`, or `extended`.
    #[serde(default = "default_plan")]
    pub plan: String,

    /// Reject records with missing or mistyped fields instead of passing them through.
    #[serde(default = "default_strict")]
    pub strict: bool,

    /// Custom quotas; when non-empty they replace the preset.
    ///
    /// ```toml
    /// [[feed.tracks]]
    /// track = "mind_and_media"
    /// count = 4
    /// ```
    #[serde(default)]
    pub tracks: Vec<TrackQuota>,
}

impl Default for FeedSection {
    fn default() -> Self {
        Self {
            plan: default_plan(),
            strict: default_strict(),
            tracks: Vec::new(),
        }
    }
}

impl FeedSection {
    pub(crate) fn plan(&self) -> Result<FeedPlan, ConfigError> {
        if !self.tracks.is_empty() {
            return FeedPlan::new(self.tracks.clone())
                .map_err(|e| ConfigError::invalid("feed.tracks", e.to_string()));
        }
        FeedPlan::preset(&self.plan).ok_or_else(|| {
            ConfigError::invalid(
                "feed.plan",
                format!(
                    "unknown preset '{}' (expected one of: {})",
                    self.plan,
                    FeedPlan::PRESETS.join(", ")
                ),
            )
        })
    }

    pub(crate) const fn strictness(&self) -> Strictness {
        if self.strict {
            Strictness::Strict
        } else {
            Strictness::Permissive
        }
    }
}
