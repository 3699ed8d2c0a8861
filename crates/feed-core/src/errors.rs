//! Validation errors for records and plans.
//!
//! Transport and persistence errors live in their own crates; this module only
//! covers the rules the domain model itself enforces.

use thiserror::Error;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum CoreError {
    /// A record is missing a field or carries a value of the wrong shape.
    #[error("Invalid record: {0}")]
    InvalidRecord(String),

    /// A track identifier is not one of the known tracks.
    #[error("Unknown track: '{0}'")]
    UnknownTrack(String),

    /// A plan definition breaks a structural rule (empty, duplicate, zero count).
    #[error("Invalid plan: {0}")]
    InvalidPlan(String),

    /// The collection size differs from the plan total.
    #[error("Expected {expected} records in total, got {actual}")]
    TotalMismatch { expected: usize, actual: usize },

    /// One track received a different number of records than planned.
    #[error("Track '{track}' expected {expected} records, got {actual}")]
    TrackMismatch {
        track: String,
        expected: usize,
        actual: usize,
    },
}
