//! Generation and completion-parsing error types.

use feed_core::{CoreError, ServiceRefusal};
use thiserror::Error;

/// Errors from the text-generation service call.
#[derive(Debug, Error)]
pub enum GenerationError {
    /// HTTP transport error (connect, timeout, body decode).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// The service returned a non-success status code.
    #[error("API error ({status}): {message}")]
    Api {
        /// HTTP status code.
        status: u16,
        /// Error message or response body.
        message: String,
    },

    /// The service returned 429 Too Many Requests.
    #[error("rate limited, retry after {retry_after_secs}s")]
    RateLimited {
        /// Seconds the service asked us to wait.
        retry_after_secs: u64,
    },

    /// Refused to send an empty prompt.
    #[error("prompt is empty")]
    EmptyPrompt,

    /// The response carried no completion text.
    #[error("completion contained no text")]
    EmptyCompletion,
}

impl From<ServiceRefusal> for GenerationError {
    fn from(refusal: ServiceRefusal) -> Self {
        match refusal {
            ServiceRefusal::RateLimited { retry_after_secs } => Self::RateLimited { retry_after_secs },
            ServiceRefusal::Status { status, message } => Self::Api { status, message },
        }
    }
}

/// The completion could not be turned into the planned collection.
///
/// Every variant keeps the raw completion for diagnostics.
#[derive(Debug, Error)]
pub enum MalformedResponse {
    #[error("completion is not valid JSON: {source}")]
    NotJson {
        source: serde_json::Error,
        raw: String,
    },

    #[error("completion is JSON but not an array (found {found})")]
    NotArray { found: &'static str, raw: String },

    #[error("record {index}: {source}")]
    InvalidRecord {
        index: usize,
        source: CoreError,
        raw: String,
    },

    #[error("collection does not match the plan: {source}")]
    Quota { source: CoreError, raw: String },
}

impl MalformedResponse {
    /// The completion text as received.
    #[must_use]
    pub fn raw(&self) -> &str {
        match self {
            Self::NotJson { raw, .. }
            | Self::NotArray { raw, .. }
            | Self::InvalidRecord { raw, .. }
            | Self::Quota { raw, .. } => raw,
        }
    }
}
