//! Crossref works-search client.
//!
//! One request per title:
//! `GET {base}/works?query.bibliographic={title}&rows=1&select=DOI,title,issued`.

use std::time::Duration;

use feed_config::LookupConfig;
use feed_core::service::check_response;
use serde::Deserialize;

use crate::error::LookupError;
use crate::{WorkCandidate, WorkLookup};

#[derive(Debug, Deserialize)]
struct WorksResponse {
    message: WorksMessage,
}

#[derive(Debug, Deserialize)]
struct WorksMessage {
    #[serde(default)]
    items: Vec<WorkItem>,
}

#[derive(Debug, Deserialize)]
struct WorkItem {
    #[serde(rename = "DOI")]
    doi: String,
    #[serde(default)]
    title: Vec<String>,
    #[serde(default)]
    issued: Option<DateParts>,
}

#[derive(Debug, Deserialize)]
struct DateParts {
    #[serde(rename = "date-parts", default)]
    date_parts: Vec<Vec<Option<i32>>>,
}

impl WorkItem {
    fn year(&self) -> Option<i32> {
        self.issued
            .as_ref()
            .and_then(|issued| issued.date_parts.first())
            .and_then(|parts| parts.first().copied().flatten())
    }

    fn into_candidate(self) -> Option<WorkCandidate> {
        let year = self.year();
        let title = self.title.into_iter().find(|t| !t.trim().is_empty())?;
        Some(WorkCandidate {
            title,
            doi: self.doi,
            year,
        })
    }
}

/// HTTP client for the Crossref REST API.
#[derive(Debug, Clone)]
pub struct CrossrefClient {
    http: reqwest::Client,
    base_url: String,
}

impl CrossrefClient {
    /// Build a client from lookup configuration.
    ///
    /// # Errors
    ///
    /// Returns [`LookupError::Http`] if the HTTP client cannot be built.
    pub fn new(config: &LookupConfig) -> Result<Self, LookupError> {
        let http = reqwest::Client::builder()
            .user_agent(user_agent(&config.mailto))
            .timeout(Duration::from_secs(config.timeout_secs))
            .build()?;
        Ok(Self {
            http,
            base_url: config.base_url.trim_end_matches('/').to_string(),
        })
    }

    /// Best bibliographic match for `title`, if Crossref has any.
    ///
    /// An item without a title is treated as no match.
    ///
    /// # Errors
    ///
    /// Returns [`LookupError`] if the request fails, the registry returns a
    /// non-success status, or the body cannot be decoded.
    pub async fn search_title(&self, title: &str) -> Result<Option<WorkCandidate>, LookupError> {
        let url = format!(
            "{}/works?query.bibliographic={}&rows=1&select=DOI,title,issued",
            self.base_url,
            urlencoding::encode(title)
        );
        let resp = check_response(self.http.get(&url).send().await?).await?;
        let data: WorksResponse = resp.json().await?;
        Ok(data
            .message
            .items
            .into_iter()
            .next()
            .and_then(WorkItem::into_candidate))
    }
}

impl WorkLookup for CrossrefClient {
    async fn best_match(&self, title: &str) -> Option<WorkCandidate> {
        match self.search_title(title).await {
            Ok(candidate) => candidate,
            Err(e) => {
                tracing::warn!(%e, title, "crossref lookup failed");
                None
            }
        }
    }
}

fn user_agent(mailto: &str) -> String {
    let base = concat!("studyfeed/", env!("CARGO_PKG_VERSION"));
    let mailto = mailto.trim();
    if mailto.is_empty() {
        base.to_string()
    } else {
        format!("{base} (mailto:{mailto})")
    }
}
