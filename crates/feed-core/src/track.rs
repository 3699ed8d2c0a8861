//! Thematic tracks and their field schemas.
//!
//! Every record belongs to one [`Track`]. Tracks differ in which extra fields
//! the model must supply; [`TrackDetail`] holds those fields as a variant tagged
//! by the track identifier, so the schema of each track is declared once, in
//! the type.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;
use std::str::FromStr;

use crate::errors::CoreError;

// ---------------------------------------------------------------------------
// Track
// ---------------------------------------------------------------------------

/// A named thematic feed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Track {
    SocialLayer,
    ArchitecturesOfCapital,
    PlaySystems,
    MindAndMedia,
    ContestedIdeas,
}

impl Track {
    pub const ALL: [Self; 5] = [
        Self::SocialLayer,
        Self::ArchitecturesOfCapital,
        Self::PlaySystems,
        Self::MindAndMedia,
        Self::ContestedIdeas,
    ];

    /// Identifier used on the wire and in SQL storage.
    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::SocialLayer => "social_layer",
            Self::ArchitecturesOfCapital => "architectures_of_capital",
            Self::PlaySystems => "play_systems",
            Self::MindAndMedia => "mind_and_media",
            Self::ContestedIdeas => "contested_ideas",
        }
    }

    /// Human-facing feed name used in the prompt.
    #[must_use]
    pub const fn display_name(self) -> &'static str {
        match self {
            Self::SocialLayer => "The Social Layer",
            Self::ArchitecturesOfCapital => "Architectures of Capital",
            Self::PlaySystems => "Play Systems",
            Self::MindAndMedia => "Mind & Media",
            Self::ContestedIdeas => "Contested Ideas",
        }
    }

    /// One-line framing of the track.
    #[must_use]
    pub const fn focus(self) -> &'static str {
        match self {
            Self::SocialLayer => "cross-disciplinary behavioral & policy studies",
            Self::ArchitecturesOfCapital => "crypto & finance infrastructure",
            Self::PlaySystems => "game design, mechanics & interactive systems",
            Self::MindAndMedia => "cognition, learning & how media shapes attention",
            Self::ContestedIdeas => "research with a clear stance and a serious rebuttal",
        }
    }

    /// Topical guidance bullets rendered under the track heading.
    #[must_use]
    pub const fn guidance(self) -> &'static [&'static str] {
        match self {
            Self::SocialLayer => &[
                "behavioral economics (scarcity mindset, choice overload, nudges)",
                "psychology & urban mental-health (noise, green space)",
                "civic tech & voter nudges",
                "inequality / inheritance mobility",
                "algorithmic governance",
                "fresh adjacent topics are welcome (climate policy, AI ethics, education)",
            ],
            Self::ArchitecturesOfCapital => &[
                "zero-knowledge proofs & recursive SNARKs",
                "rollups & data availability / modular L2s",
                "DeFi systemic risk (collateral rehypothecation, leverage chains)",
                "stablecoin peg & run dynamics, on-chain reserve attestations",
                "latency arbitrage & market microstructure",
                "tokenized real-world assets & on-chain treasuries",
                "staking & restaking economics",
                "MEV, proposer-builder separation & auction design",
                "cross-chain bridges & interoperability",
                "new execution layers (parallel EVMs, zk-VMs)",
                "derivatives & structured products (options AMMs, perps)",
                "intent-based protocols & shared sequencers",
                "adjacent institutional-finance angles (asset management, PE, liquidity)",
            ],
            Self::PlaySystems => &[
                "reward schedules, progression loops & player motivation",
                "emergent gameplay & systemic design",
                "economy design in multiplayer games",
                "gamification outside games (education, health, work)",
            ],
            Self::MindAndMedia => &[
                "attention, memory & learning science",
                "reading on screens vs. paper, audio vs. text",
                "feeds, recommendation systems & belief formation",
                "sleep, focus & cognitive load",
            ],
            Self::ContestedIdeas => &[
                "findings that challenge a popular consensus",
                "replication disputes & methodological debates",
                "policy research with a visible ideological lean",
            ],
        }
    }

    /// Fields every record on this track must carry besides the common ones.
    #[must_use]
    pub const fn required_fields(self) -> &'static [&'static str] {
        match self {
            Self::SocialLayer => &[],
            Self::ArchitecturesOfCapital => &[
                "example",
                "why_powerful",
                "further_explanation",
                "projects",
            ],
            Self::PlaySystems => &["mechanic"],
            Self::MindAndMedia => &["modality"],
            Self::ContestedIdeas => &["lean", "counterpoint"],
        }
    }

    /// Fields a record on this track may carry.
    #[must_use]
    pub const fn optional_fields(self) -> &'static [&'static str] {
        match self {
            Self::PlaySystems => &["example"],
            Self::SocialLayer
            | Self::ArchitecturesOfCapital
            | Self::MindAndMedia
            | Self::ContestedIdeas => &[],
        }
    }

    /// Prompt description of a track-specific field.
    #[must_use]
    pub fn field_hint(field: &str) -> Option<&'static str> {
        Some(match field {
            "example" => "a concrete real-world example",
            "why_powerful" => "why the idea is powerful",
            "further_explanation" => "a deeper explanation for a curious non-specialist",
            "projects" => "array of 2-3 real projects",
            "mechanic" => "the core game mechanic or loop studied",
            "modality" => "the medium or modality involved (e.g. text, audio, video, VR)",
            "lean" => "the stance or lean of the work",
            "counterpoint" => "the strongest counter-argument",
            _ => return None,
        })
    }
}

impl fmt::Display for Track {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Track {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        let needle = s.trim();
        Self::ALL
            .into_iter()
            .find(|track| track.as_str().eq_ignore_ascii_case(needle))
            .ok_or_else(|| CoreError::UnknownTrack(s.to_string()))
    }
}

// ---------------------------------------------------------------------------
// TrackDetail
// ---------------------------------------------------------------------------

/// A project reference: models answer with either a bare name or an object.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Project {
    Name(String),
    Described(Map<String, Value>),
}

/// Track-specific fields, tagged by the track identifier.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
#[serde(tag = "track", rename_all = "snake_case")]
pub enum TrackDetail {
    SocialLayer,
    ArchitecturesOfCapital {
        example: String,
        why_powerful: String,
        further_explanation: String,
        projects: Vec<Project>,
    },
    PlaySystems {
        mechanic: String,
        #[serde(default, skip_serializing_if = "Option::is_none")]
        example: Option<String>,
    },
    MindAndMedia {
        modality: String,
    },
    ContestedIdeas {
        lean: String,
        counterpoint: String,
    },
}

impl TrackDetail {
    #[must_use]
    pub const fn track(&self) -> Track {
        match self {
            Self::SocialLayer => Track::SocialLayer,
            Self::ArchitecturesOfCapital { .. } => Track::ArchitecturesOfCapital,
            Self::PlaySystems { .. } => Track::PlaySystems,
            Self::MindAndMedia { .. } => Track::MindAndMedia,
            Self::ContestedIdeas { .. } => Track::ContestedIdeas,
        }
    }

    /// Pull the fields belonging to `track` out of `fields` and type them.
    ///
    /// On success the consumed keys are removed from `fields`; on failure
    /// `fields` is left untouched.
    ///
    /// # Errors
    ///
    /// Returns [`CoreError::InvalidRecord`] when a required field is missing or
    /// has the wrong shape.
    pub fn extract(track: Track, fields: &mut Map<String, Value>) -> Result<Self, CoreError> {
        let keys = track
            .required_fields()
            .iter()
            .chain(track.optional_fields())
            .copied();

        let mut tagged = Map::new();
        tagged.insert("track".into(), Value::String(track.as_str().into()));
        for key in keys.clone() {
            if let Some(value) = fields.get(key) {
                tagged.insert(key.into(), value.clone());
            }
        }

        let detail: Self = serde_json::from_value(Value::Object(tagged))
            .map_err(|e| CoreError::InvalidRecord(format!("{track} fields: {e}")))?;

        for key in keys {
            fields.remove(key);
        }
        Ok(detail)
    }

    /// Flatten back into wire fields, without the `track` tag.
    #[must_use]
    pub fn into_fields(self) -> Map<String, Value> {
        match serde_json::to_value(self) {
            Ok(Value::Object(mut map)) => {
                map.remove("track");
                map
            }
            _ => Map::new(),
        }
    }
}
