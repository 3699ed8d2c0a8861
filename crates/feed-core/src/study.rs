//! The generated study record and its wire form.
//!
//! Models return loosely shaped objects, so the wire form ([`RawStudy`]) is an
//! untyped JSON object. [`StudyRecord::from_raw`] types it; whatever cannot be
//! typed stays in [`StudyRecord::extra`]. Converting back with
//! [`StudyRecord::to_raw`] restores every key, so a record written to disk and
//! read back compares equal.
//!
//! The link fields (`source_url`, `doi`, `year`) are the exception: enrichment
//! owns them, so a value that cannot be typed is discarded rather than kept.

use serde::{Deserialize, Serialize};
use serde_json::{Map, Value};
use std::fmt;

use crate::errors::CoreError;
use crate::track::{Track, TrackDetail};

// ---------------------------------------------------------------------------
// Authors
// ---------------------------------------------------------------------------

/// Author list as returned by the model: a single string or an array.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(untagged)]
pub enum Authors {
    List(Vec<String>),
    Joined(String),
}

impl Default for Authors {
    fn default() -> Self {
        Self::List(Vec::new())
    }
}

impl Authors {
    /// Comma-joined form used by the table sink.
    #[must_use]
    pub fn joined(&self) -> String {
        match self {
            Self::List(names) => names.join(", "),
            Self::Joined(names) => names.clone(),
        }
    }

    #[must_use]
    pub fn is_empty(&self) -> bool {
        match self {
            Self::List(names) => names.iter().all(|name| name.trim().is_empty()),
            Self::Joined(names) => names.trim().is_empty(),
        }
    }
}

// ---------------------------------------------------------------------------
// Interest
// ---------------------------------------------------------------------------

/// Reader classification carried in the `tags` field.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum Interest {
    #[serde(rename = "interested")]
    Interested,
    #[serde(rename = "maybe later")]
    MaybeLater,
    #[serde(rename = "not now")]
    NotNow,
}

impl Interest {
    pub const ALL: [Self; 3] = [Self::Interested, Self::MaybeLater, Self::NotNow];

    #[must_use]
    pub const fn as_str(self) -> &'static str {
        match self {
            Self::Interested => "interested",
            Self::MaybeLater => "maybe later",
            Self::NotNow => "not now",
        }
    }

    /// Case-insensitive match against the closed set.
    #[must_use]
    pub fn parse(value: &str) -> Option<Self> {
        let value = value.trim();
        Self::ALL
            .into_iter()
            .find(|interest| interest.as_str().eq_ignore_ascii_case(value))
    }
}

impl fmt::Display for Interest {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Strictness
// ---------------------------------------------------------------------------

/// How hard record typing pushes back on model output.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub enum Strictness {
    /// Common text fields non-empty, known track, valid tags, track fields typed.
    #[default]
    Strict,
    /// Never reject; untypeable values stay in `extra`.
    Permissive,
}

// ---------------------------------------------------------------------------
// StudyRecord
// ---------------------------------------------------------------------------

/// Flat JSON object exactly as exchanged with the model and the file sink.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(transparent)]
pub struct RawStudy(pub Map<String, Value>);

/// One generated study.
#[derive(Debug, Clone, PartialEq, Default, Serialize, Deserialize)]
#[serde(from = "RawStudy", into = "RawStudy")]
pub struct StudyRecord {
    pub track: String,
    pub title: String,
    pub authors: Authors,
    pub source: String,
    pub summary: String,
    pub why_notable: String,
    pub tags: Option<Interest>,
    pub source_url: Option<String>,
    pub doi: Option<String>,
    pub year: Option<i32>,
    /// Typed track fields; `None` only for records accepted permissively.
    pub detail: Option<TrackDetail>,
    /// Every wire field not covered above.
    pub extra: Map<String, Value>,
}

impl StudyRecord {
    /// Type a wire object.
    ///
    /// # Errors
    ///
    /// In [`Strictness::Strict`] mode, returns [`CoreError`] for an empty common
    /// text field, an unknown track, a `tags` value outside the closed set, or
    /// missing/mistyped track fields. Permissive mode never fails.
    pub fn from_raw(raw: RawStudy, strictness: Strictness) -> Result<Self, CoreError> {
        let strict = strictness == Strictness::Strict;
        let mut fields = raw.0;

        let mut record = Self {
            track: take_string(&mut fields, "track").unwrap_or_default(),
            title: take_string(&mut fields, "title").unwrap_or_default(),
            authors: take_authors(&mut fields).unwrap_or_default(),
            source: take_string(&mut fields, "source").unwrap_or_default(),
            summary: take_string(&mut fields, "summary").unwrap_or_default(),
            why_notable: take_string(&mut fields, "why_notable").unwrap_or_default(),
            tags: take_interest(&mut fields),
            source_url: take_string(&mut fields, "source_url"),
            doi: take_string(&mut fields, "doi"),
            year: take_year(&mut fields),
            detail: None,
            extra: Map::new(),
        };
        for key in LINK_FIELDS {
            fields.remove(key);
        }

        if strict {
            for (name, value) in [
                ("title", &record.title),
                ("source", &record.source),
                ("summary", &record.summary),
                ("why_notable", &record.why_notable),
            ] {
                if value.trim().is_empty() {
                    return Err(CoreError::InvalidRecord(format!(
                        "'{name}' is missing or not a non-empty string"
                    )));
                }
            }
            if record.authors.is_empty() {
                return Err(CoreError::InvalidRecord(
                    "'authors' is missing or empty".into(),
                ));
            }
            if let Some(tags) = fields.get("tags") {
                return Err(CoreError::InvalidRecord(format!(
                    "'tags' must be one of \"interested\", \"maybe later\", \"not now\", got {tags}"
                )));
            }
        }

        record.detail = match record.track.parse::<Track>() {
            Ok(track) => {
                // Canonical spelling, so plan counting and storage agree.
                record.track = track.as_str().to_string();
                match TrackDetail::extract(track, &mut fields) {
                    Ok(detail) => Some(detail),
                    Err(err) if strict => return Err(err),
                    Err(_) => None,
                }
            }
            Err(err) if strict => return Err(err),
            Err(_) => None,
        };

        record.extra = fields;
        Ok(record)
    }

    /// Flatten into the wire form. Keys held in `extra` win over typed fields
    /// with the same name, which only happens for values permissive typing
    /// could not place. Typed link fields always win.
    #[must_use]
    pub fn to_raw(&self) -> RawStudy {
        let mut map = Map::new();
        map.insert("track".into(), Value::String(self.track.clone()));
        map.insert("title".into(), Value::String(self.title.clone()));
        map.insert(
            "authors".into(),
            serde_json::to_value(&self.authors).unwrap_or(Value::Null),
        );
        map.insert("source".into(), Value::String(self.source.clone()));
        map.insert("summary".into(), Value::String(self.summary.clone()));
        map.insert("why_notable".into(), Value::String(self.why_notable.clone()));
        if let Some(tags) = self.tags {
            map.insert("tags".into(), Value::String(tags.as_str().into()));
        }
        if let Some(detail) = &self.detail {
            map.extend(detail.clone().into_fields());
        }
        map.extend(self.extra.clone());
        if let Some(url) = &self.source_url {
            map.insert("source_url".into(), Value::String(url.clone()));
        }
        if let Some(doi) = &self.doi {
            map.insert("doi".into(), Value::String(doi.clone()));
        }
        if let Some(year) = self.year {
            map.insert("year".into(), Value::from(year));
        }
        RawStudy(map)
    }

    /// Typed track, if the record's track is known.
    #[must_use]
    pub fn known_track(&self) -> Option<Track> {
        self.detail
            .as_ref()
            .map(TrackDetail::track)
            .or_else(|| self.track.parse().ok())
    }

    /// Fields outside the fixed table columns: tags, track fields, and `extra`.
    #[must_use]
    pub fn auxiliary_fields(&self) -> Map<String, Value> {
        let mut map = Map::new();
        if let Some(tags) = self.tags {
            map.insert("tags".into(), Value::String(tags.as_str().into()));
        }
        if let Some(detail) = &self.detail {
            map.extend(detail.clone().into_fields());
        }
        map.extend(self.extra.clone());
        map
    }
}

impl From<RawStudy> for StudyRecord {
    fn from(raw: RawStudy) -> Self {
        // Permissive typing is infallible.
        Self::from_raw(raw, Strictness::Permissive).unwrap_or_default()
    }
}

impl From<StudyRecord> for RawStudy {
    fn from(record: StudyRecord) -> Self {
        record.to_raw()
    }
}

/// Fields filled by enrichment; never carried in `extra`.
const LINK_FIELDS: [&str; 3] = ["source_url", "doi", "year"];

fn take_string(fields: &mut Map<String, Value>, key: &str) -> Option<String> {
    match fields.get(key) {
        Some(Value::String(_)) => match fields.remove(key) {
            Some(Value::String(s)) => Some(s),
            _ => None,
        },
        // Explicit nulls carry no information.
        Some(Value::Null) => {
            fields.remove(key);
            None
        }
        _ => None,
    }
}

fn take_authors(fields: &mut Map<String, Value>) -> Option<Authors> {
    let authors = serde_json::from_value::<Authors>(fields.get("authors")?.clone()).ok()?;
    fields.remove("authors");
    Some(authors)
}

fn take_year(fields: &mut Map<String, Value>) -> Option<i32> {
    let year = match fields.get("year")? {
        Value::Number(n) => n.as_i64().and_then(|n| i32::try_from(n).ok()),
        Value::String(s) => s.trim().parse::<i32>().ok(),
        _ => None,
    }?;
    fields.remove("year");
    Some(year)
}

fn take_interest(fields: &mut Map<String, Value>) -> Option<Interest> {
    let interest = match fields.get("tags")? {
        Value::String(s) => Interest::parse(s)?,
        Value::Null => {
            fields.remove("tags");
            return None;
        }
        _ => return None,
    };
    fields.remove("tags");
    Some(interest)
}
