//! Error types for the completions client.

use bragi_util::{redact_sensitive, truncate_for_log};
use thiserror::Error;

const MAX_ERROR_BODY_CHARS: usize = 300;

/// Errors returned by [`ChatClient`](crate::ChatClient).
#[derive(Debug, Error)]
pub enum ApiError {
    #[error("GROQ_API_KEY is not set")]
    MissingApiKey,

    #[error("Invalid API base URL '{url}': {reason}")]
    InvalidBaseUrl { url: String, reason: String },

    #[error("Invalid {0} header value")]
    InvalidHeader(&'static str),

    #[error("Network error: {0}")]
    Http(#[from] reqwest::Error),

    #[error("Provider returned HTTP {status}: {body}")]
    Status { status: u16, body: String },

    #[error("Provider response could not be decoded: {0}")]
    InvalidEnvelope(#[source] serde_json::Error),

    #[error("Provider response contained no choices")]
    EmptyResponse,

    #[error("Model output is not valid JSON: {0}")]
    InvalidJson(#[source] serde_json::Error),

    #[error("Model output is not a JSON object")]
    NotAnObject,
}

impl ApiError {
    /// Create an invalid base URL error.
    pub fn invalid_base_url(url: impl Into<String>, reason: impl Into<String>) -> Self {
        Self::InvalidBaseUrl {
            url: url.into(),
            reason: reason.into(),
        }
    }

    /// Create a status error, redacting and truncating the response body.
    pub fn status(status: u16, body: &str) -> Self {
        Self::Status {
            status,
            body: truncate_for_log(&redact_sensitive(body.trim()), MAX_ERROR_BODY_CHARS),
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn status_error_keeps_bodies_short_and_clean() {
        let body = format!("invalid key gsk_{} {}", "a".repeat(32), "x".repeat(1000));
        let error = ApiError::status(401, &body);
        let ApiError::Status { status, body } = &error else {
            panic!("expected status error");
        };
        assert_eq!(*status, 401);
        assert!(body.contains("gsk_[REDACTED]"));
        assert!(body.chars().count() <= MAX_ERROR_BODY_CHARS + 1);
        assert!(error.to_string().starts_with("Provider returned HTTP 401"));
    }
}
