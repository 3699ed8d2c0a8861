//! Lookup error types.

use feed_core::ServiceRefusal;
use thiserror::Error;

/// Errors from the bibliographic registry.
///
/// These never abort a run: [`crate::WorkLookup`] implementations log them
/// and report "no match".
#[derive(Debug, Error)]
pub enum LookupError {
    /// HTTP transport error (connect, timeout, body decode).
    #[error("HTTP error: {0}")]
    Http(#[from] reqwest::Error),

    /// Registry returned a non-success status code.
    #[error("API error ({status}): {message}")]
    Api {
        /// HTTP status code returned by the registry.
        status: u16,
        /// Response body.
        message: String,
    },

    /// The registry returned a 429 Too Many Requests response.
    #[error("rate limited, retry after {retry_after_secs}s")]
    RateLimited {
        /// Seconds to wait before retrying.
        retry_after_secs: u64,
    },
}

impl From<ServiceRefusal> for LookupError {
    fn from(refusal: ServiceRefusal) -> Self {
        match refusal {
            ServiceRefusal::RateLimited { retry_after_secs } => Self::RateLimited { retry_after_secs },
            ServiceRefusal::Status { status, message } => Self::Api { status, message },
        }
    }
}
