//! Completion text to typed records.
//!
//! Models often wrap JSON in a markdown fence even when told not to, so one
//! surrounding fence is tolerated. Anything else that is not a bare JSON
//! array is a [`MalformedResponse`].

use feed_core::{FeedPlan, RawStudy, Strictness, StudyRecord};
use serde_json::Value;

use crate::error::MalformedResponse;

/// Remove one surrounding markdown code fence (with optional language tag).
#[must_use]
pub fn strip_code_fence(raw: &str) -> &str {
    let mut text = raw.trim();
    if let Some(rest) = text.strip_prefix("```") {
        text = match rest.split_once('\n') {
            Some((tag, body)) if tag.trim().chars().all(|c| c.is_ascii_alphanumeric()) => body,
            _ => rest,
        };
        if let Some(body) = text.trim_end().strip_suffix("```") {
            text = body;
        }
    }
    text.trim()
}

/// Parse a completion into records, in order.
///
/// # Errors
///
/// - [`MalformedResponse::NotJson`] when the text is not JSON
/// - [`MalformedResponse::NotArray`] when the top level is not an array
/// - [`MalformedResponse::InvalidRecord`] for the first element that is not
///   an object or fails validation under `strictness`
pub fn parse_completion(
    raw: &str,
    strictness: Strictness,
) -> Result<Vec<StudyRecord>, MalformedResponse> {
    let value: Value = match serde_json::from_str(strip_code_fence(raw)) {
        Ok(value) => value,
        Err(source) => {
            return Err(MalformedResponse::NotJson {
                source,
                raw: raw.to_string(),
            });
        }
    };

    let Value::Array(items) = value else {
        return Err(MalformedResponse::NotArray {
            found: json_kind(&value),
            raw: raw.to_string(),
        });
    };

    items
        .into_iter()
        .enumerate()
        .map(|(index, item)| {
            let Value::Object(map) = item else {
                return Err(MalformedResponse::InvalidRecord {
                    index,
                    source: feed_core::CoreError::InvalidRecord(format!(
                        "expected an object, found {}",
                        json_kind(&item)
                    )),
                    raw: raw.to_string(),
                });
            };
            StudyRecord::from_raw(RawStudy(map), strictness).map_err(|source| {
                MalformedResponse::InvalidRecord {
                    index,
                    source,
                    raw: raw.to_string(),
                }
            })
        })
        .collect()
}

/// Parse a completion and check it against the plan's counts.
///
/// # Errors
///
/// Everything [`parse_completion`] returns, plus [`MalformedResponse::Quota`]
/// when the total or a per-track count differs from the plan.
pub fn parse_for_plan(
    raw: &str,
    plan: &FeedPlan,
    strictness: Strictness,
) -> Result<Vec<StudyRecord>, MalformedResponse> {
    let records = parse_completion(raw, strictness)?;
    plan.check(&records)
        .map_err(|source| MalformedResponse::Quota {
            source,
            raw: raw.to_string(),
        })?;
    Ok(records)
}

const fn json_kind(value: &Value) -> &'static str {
    match value {
        Value::Null => "null",
        Value::Bool(_) => "boolean",
        Value::Number(_) => "number",
        Value::String(_) => "string",
        Value::Array(_) => "array",
        Value::Object(_) => "object",
    }
}
