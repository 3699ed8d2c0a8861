//! Guaranteeing every record a web link.

use std::fmt;

use feed_config::LookupConfig;
use feed_core::StudyRecord;
use feed_core::link::{is_doi, is_web_link};

use crate::WorkLookup;
use crate::link::{doi_url, search_url};
use crate::similarity::title_similarity;

/// How a record's `source_url` was settled.
#[derive(Debug, Clone, PartialEq)]
pub enum LinkSource {
    /// The record already carried a web link.
    Existing,
    /// The record carried a DOI; linked through the resolver without a lookup.
    Doi,
    /// A registry match cleared the similarity threshold.
    Registry { doi: String, similarity: f64 },
    /// No acceptable match; linked to a title search.
    SearchFallback,
}

impl LinkSource {
    #[must_use]
    pub const fn as_str(&self) -> &'static str {
        match self {
            Self::Existing => "existing",
            Self::Doi => "doi",
            Self::Registry { .. } => "registry",
            Self::SearchFallback => "search_fallback",
        }
    }
}

impl fmt::Display for LinkSource {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Resolves links for records, one at a time.
#[derive(Debug, Clone)]
pub struct LinkEnricher<L> {
    lookup: L,
    threshold: f64,
    search_base: String,
}

impl<L: WorkLookup> LinkEnricher<L> {
    pub fn new(lookup: L, threshold: f64, search_base: impl Into<String>) -> Self {
        Self {
            lookup,
            threshold,
            search_base: search_base.into(),
        }
    }

    pub fn from_config(lookup: L, config: &LookupConfig) -> Self {
        Self::new(lookup, config.threshold, config.search_base.clone())
    }

    /// Ensure `record.source_url` is a web link and report how.
    ///
    /// Never fails and never drops the record: lookup errors and weak
    /// matches end in the search fallback.
    pub async fn enrich(&self, record: &mut StudyRecord) -> LinkSource {
        if record.source_url.as_deref().is_some_and(is_web_link) {
            return LinkSource::Existing;
        }

        if let Some(doi) = record.doi.as_deref().filter(|d| is_doi(d)) {
            record.source_url = Some(doi_url(doi));
            return LinkSource::Doi;
        }

        if !record.title.trim().is_empty()
            && let Some(candidate) = self.lookup.best_match(&record.title).await
        {
            let similarity = title_similarity(&record.title, &candidate.title);
            if similarity >= self.threshold {
                tracing::debug!(title = %record.title, doi = %candidate.doi, similarity, "registry match");
                record.source_url = Some(doi_url(&candidate.doi));
                record.doi = Some(candidate.doi.clone());
                if record.year.is_none() {
                    record.year = candidate.year;
                }
                return LinkSource::Registry {
                    doi: candidate.doi,
                    similarity,
                };
            }
            tracing::debug!(
                title = %record.title,
                candidate = %candidate.title,
                similarity,
                "registry match below threshold"
            );
        }

        record.source_url = Some(search_url(&self.search_base, &record.title));
        LinkSource::SearchFallback
    }
}
