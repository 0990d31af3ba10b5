use axum::Json;
use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

/// Fallback message when a failed run carries no error text.
const PROCESSING_FAILED: &str = "Processing failed";

/// A request that did not produce a successful workflow envelope.
///
/// Every variant renders as `{"error": "..."}` with the matching status code.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum RouteError {
    /// The request body failed a presence or type check.
    BadRequest(&'static str),
    /// The workflow ran and reported `success = false`.
    WorkflowFailed(Option<String>),
    /// The workflow did not finish within the request deadline.
    TimedOut,
}

impl RouteError {
    pub fn status(&self) -> StatusCode {
        match self {
            RouteError::BadRequest(_) => StatusCode::BAD_REQUEST,
            RouteError::WorkflowFailed(_) => StatusCode::INTERNAL_SERVER_ERROR,
            RouteError::TimedOut => StatusCode::GATEWAY_TIMEOUT,
        }
    }

    pub fn message(&self) -> &str {
        match self {
            RouteError::BadRequest(message) => message,
            RouteError::WorkflowFailed(Some(message)) if !message.is_empty() => message,
            RouteError::WorkflowFailed(_) => PROCESSING_FAILED,
            RouteError::TimedOut => "Request timed out",
        }
    }
}

impl IntoResponse for RouteError {
    fn into_response(self) -> Response {
        (self.status(), Json(json!({ "error": self.message() }))).into_response()
    }
}
