//! Refusals from the remote services a run talks to.
//!
//! The completion service and the bibliographic registry both answer
//! failures with a status code, sometimes a `Retry-After` header, and a body
//! that may wrap a message in JSON. [`check_response`] turns those into one
//! [`ServiceRefusal`]; each client converts it into its own error type.

use serde::Deserialize;
use serde_json::Value;
use thiserror::Error;

/// Wait applied when a 429 carries no usable `Retry-After`.
pub const DEFAULT_RETRY_AFTER_SECS: u64 = 60;

/// A non-success answer from a remote service.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum ServiceRefusal {
    /// 429 Too Many Requests.
    #[error("rate limited, retry after {retry_after_secs}s")]
    RateLimited { retry_after_secs: u64 },

    /// Any other non-success status.
    #[error("API error ({status}): {message}")]
    Status { status: u16, message: String },
}

impl ServiceRefusal {
    /// Classify a finished response. `None` for a success status.
    #[must_use]
    pub fn classify(status: u16, retry_after: Option<&str>, body: &str) -> Option<Self> {
        if (200..300).contains(&status) {
            return None;
        }
        if status == 429 {
            let retry_after_secs = retry_after
                .and_then(|v| v.trim().parse::<u64>().ok())
                .unwrap_or(DEFAULT_RETRY_AFTER_SECS);
            return Some(Self::RateLimited { retry_after_secs });
        }
        Some(Self::Status {
            status,
            message: service_message(body),
        })
    }
}

/// Return the response unchanged on success, otherwise read the body and
/// classify the refusal.
///
/// # Errors
///
/// Returns [`ServiceRefusal`] for any non-success status.
pub async fn check_response(resp: reqwest::Response) -> Result<reqwest::Response, ServiceRefusal> {
    let status = resp.status();
    if status.is_success() {
        return Ok(resp);
    }
    let retry_after = resp
        .headers()
        .get(reqwest::header::RETRY_AFTER)
        .and_then(|v| v.to_str().ok())
        .map(str::to_owned);
    let body = resp.text().await.unwrap_or_default();
    Err(
        ServiceRefusal::classify(status.as_u16(), retry_after.as_deref(), &body).unwrap_or(
            ServiceRefusal::Status {
                status: status.as_u16(),
                message: body,
            },
        ),
    )
}

#[derive(Deserialize)]
struct Envelope {
    #[serde(default)]
    error: Option<Value>,
    #[serde(default)]
    message: Option<Value>,
}

/// The service's own wording when the body is a JSON error envelope
/// (`{"error":{"message":..}}` or `{"message":".."}`), else the trimmed body.
fn service_message(body: &str) -> String {
    let from_envelope = serde_json::from_str::<Envelope>(body).ok().and_then(|env| {
        env.error
            .as_ref()
            .and_then(|e| e.get("message"))
            .or(env.message.as_ref())
            .and_then(Value::as_str)
            .map(str::to_owned)
    });
    from_envelope.unwrap_or_else(|| body.trim().to_string())
}

#[cfg(test)]
mod tests {
    use super::*;
    use pretty_assertions::assert_eq;
    use rstest::rstest;

    fn mock_response(status: u16, retry_after: Option<&str>, body: &'static str) -> reqwest::Response {
        let mut builder = ::http::Response::builder().status(status);
        if let Some(value) = retry_after {
            builder = builder.header("Retry-After", value);
        }
        reqwest::Response::from(builder.body(body).unwrap())
    }

    #[rstest]
    #[case(Some("12"), 12)]
    #[case(Some(" 5 "), 5)]
    #[case(None, 60)]
    #[case(Some("soon"), 60)]
    fn rate_limit_reads_retry_after(#[case] header: Option<&str>, #[case] expected: u64) {
        assert_eq!(
            ServiceRefusal::classify(429, header, ""),
            Some(ServiceRefusal::RateLimited {
                retry_after_secs: expected
            })
        );
    }

    #[rstest]
    #[case(r#"{"error":{"message":"Incorrect API key provided","type":"auth"}}"#, "Incorrect API key provided")]
    #[case(r#"{"status":"failed","message":"query too long"}"#, "query too long")]
    #[case(r#"{"status":"failed","message":[{"value":"x"}]}"#, r#"{"status":"failed","message":[{"value":"x"}]}"#)]
    #[case("upstream down\n", "upstream down")]
    fn status_prefers_service_wording(#[case] body: &str, #[case] expected: &str) {
        assert_eq!(
            ServiceRefusal::classify(503, None, body),
            Some(ServiceRefusal::Status {
                status: 503,
                message: expected.into()
            })
        );
    }

    #[test]
    fn success_is_not_a_refusal() {
        assert_eq!(ServiceRefusal::classify(200, None, "{}"), None);
        assert_eq!(ServiceRefusal::classify(204, Some("10"), ""), None);
    }

    #[tokio::test]
    async fn response_check_classifies_refusals() {
        let err = check_response(mock_response(429, Some("7"), "")).await.unwrap_err();
        assert_eq!(err, ServiceRefusal::RateLimited { retry_after_secs: 7 });

        let err = check_response(mock_response(401, None, r#"{"error":{"message":"bad key"}}"#))
            .await
            .unwrap_err();
        assert_eq!(err.to_string(), "API error (401): bad key");

        assert!(check_response(mock_response(200, None, "{}")).await.is_ok());
    }
}
