//! Feed plans: how many entries each track gets in one run.
//!
//! A plan is the contract the parsed collection is checked against. Presets
//! cover the usual run sizes; configuration can supply a custom quota list.

use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;

use crate::errors::CoreError;
use crate::study::StudyRecord;
use crate::track::Track;

/// Entry count for one track.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub struct TrackQuota {
    pub track: Track,
    pub count: usize,
}

impl TrackQuota {
    #[must_use]
    pub const fn new(track: Track, count: usize) -> Self {
        Self { track, count }
    }
}

/// Ordered, validated set of track quotas.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct FeedPlan {
    quotas: Vec<TrackQuota>,
}

impl FeedPlan {
    /// Names accepted by [`FeedPlan::preset`].
    pub const PRESETS: [&'static str; 3] = ["brief", "daily", "extended"];

    /// Preset used when configuration names none.
    pub const DEFAULT_PRESET: &'static str = "daily";

    /// Build a plan from quotas.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::InvalidPlan`] if `quotas` is empty, names a track
    /// twice, or has a zero count.
    pub fn new(quotas: Vec<TrackQuota>) -> Result<Self, CoreError> {
        if quotas.is_empty() {
            return Err(CoreError::InvalidPlan("a plan needs at least one track".into()));
        }
        for (i, quota) in quotas.iter().enumerate() {
            if quota.count == 0 {
                return Err(CoreError::InvalidPlan(format!(
                    "track '{}' has a zero count",
                    quota.track
                )));
            }
            if quotas[..i].iter().any(|q| q.track == quota.track) {
                return Err(CoreError::InvalidPlan(format!(
                    "track '{}' is listed twice",
                    quota.track
                )));
            }
        }
        Ok(Self { quotas })
    }

    /// Look up a built-in plan by name (case-insensitive).
    #[must_use]
    pub fn preset(name: &str) -> Option<Self> {
        use Track::{ArchitecturesOfCapital, ContestedIdeas, MindAndMedia, PlaySystems, SocialLayer};

        let quotas = match name.trim().to_ascii_lowercase().as_str() {
            "brief" => vec![TrackQuota::new(SocialLayer, 5)],
            "daily" => vec![
                TrackQuota::new(SocialLayer, 5),
                TrackQuota::new(ArchitecturesOfCapital, 5),
            ],
            "extended" => vec![
                TrackQuota::new(SocialLayer, 5),
                TrackQuota::new(ArchitecturesOfCapital, 5),
                TrackQuota::new(PlaySystems, 3),
                TrackQuota::new(MindAndMedia, 3),
                TrackQuota::new(ContestedIdeas, 2),
            ],
            _ => return None,
        };
        Some(Self { quotas })
    }

    #[must_use]
    pub fn quotas(&self) -> &[TrackQuota] {
        &self.quotas
    }

    /// Total number of records a run must produce.
    #[must_use]
    pub fn total(&self) -> usize {
        self.quotas.iter().map(|q| q.count).sum()
    }

    /// Check that `records` partition exactly into this plan.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::TotalMismatch`] if the collection size is wrong,
    /// otherwise [`CoreError::TrackMismatch`] for the first track (in plan order,
    /// then unplanned tracks alphabetically) whose count differs.
    pub fn check(&self, records: &[StudyRecord]) -> Result<(), CoreError> {
        if records.len() != self.total() {
            return Err(CoreError::TotalMismatch {
                expected: self.total(),
                actual: records.len(),
            });
        }

        let mut actual: BTreeMap<&str, usize> = BTreeMap::new();
        for record in records {
            *actual.entry(record.track.as_str()).or_default() += 1;
        }

        for quota in &self.quotas {
            let got = actual.remove(quota.track.as_str()).unwrap_or(0);
            if got != quota.count {
                return Err(CoreError::TrackMismatch {
                    track: quota.track.as_str().to_string(),
                    expected: quota.count,
                    actual: got,
                });
            }
        }

        match actual.into_iter().next() {
            Some((track, got)) => Err(CoreError::TrackMismatch {
                track: track.to_string(),
                expected: 0,
                actual: got,
            }),
            None => Ok(()),
        }
    }
}

impl Default for FeedPlan {
    fn default() -> Self {
        Self::preset(Self::DEFAULT_PRESET).unwrap_or_else(|| Self {
            quotas: vec![TrackQuota::new(Track::SocialLayer, 5)],
        })
    }
}
