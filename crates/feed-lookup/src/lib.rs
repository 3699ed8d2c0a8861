//! # feed-lookup
//!
//! Makes sure every generated study ends up with a web link.
//!
//! [`LinkEnricher`] keeps links the model supplied, resolves known DOIs,
//! asks a [`WorkLookup`] (Crossref in production) for the closest published
//! work and accepts it above a title-similarity threshold, and otherwise
//! falls back to a title search link.

pub mod crossref;
pub mod enrich;
pub mod link;
pub mod similarity;

mod error;

pub use crossref::CrossrefClient;
pub use enrich::{LinkEnricher, LinkSource};
pub use error::LookupError;

use std::future::Future;

use serde::{Deserialize, Serialize};

/// The single best registry match for a title query.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct WorkCandidate {
    pub title: String,
    pub doi: String,
    pub year: Option<i32>,
}

/// A bibliographic registry that can be searched by title.
///
/// Implementations swallow their own failures: `None` means "no usable
/// match", whether the registry had nothing or could not be reached.
pub trait WorkLookup {
    fn best_match(&self, title: &str) -> impl Future<Output = Option<WorkCandidate>> + Send;
}

/// Lookup disabled: never matches.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoLookup;

impl WorkLookup for NoLookup {
    async fn best_match(&self, _title: &str) -> Option<WorkCandidate> {
        None
    }
}
