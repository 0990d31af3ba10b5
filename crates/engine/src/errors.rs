//! Errors raised inside a workflow run.
//!
//! None of these escape [`WorkflowExecutor`](crate::WorkflowExecutor): each is
//! recorded on the step that raised it and surfaced as the envelope's
//! top-level `error` string.

use bragi_types::StepTransitionError;
use thiserror::Error;

/// Failure of a single workflow step.
#[derive(Debug, Clone, Error, PartialEq, Eq)]
pub enum WorkflowError {
    /// Caller-supplied input failed a presence or length check.
    #[error("{message}")]
    InvalidInput { message: String },

    /// The text-generation collaborator failed or timed out.
    #[error("Text generation failed: {message}")]
    Generation { message: String },

    /// The collaborator answered with JSON of the wrong shape.
    #[error("Model response did not match the expected format: {message}")]
    MalformedResponse { message: String },

    /// A post-processing invariant was violated.
    #[error("{message}")]
    QualityCheck { message: String },

    /// Anything else, including illegal step transitions.
    #[error("{message}")]
    Unexpected { message: String },
}

impl WorkflowError {
    /// Create an invalid input error.
    pub fn invalid_input(message: impl Into<String>) -> Self {
        Self::InvalidInput { message: message.into() }
    }

    /// Create a text-generation error.
    pub fn generation(message: impl Into<String>) -> Self {
        Self::Generation { message: message.into() }
    }

    /// Create a malformed-response error.
    pub fn malformed_response(message: impl Into<String>) -> Self {
        Self::MalformedResponse { message: message.into() }
    }

    /// Create a quality-check error.
    pub fn quality_check(message: impl Into<String>) -> Self {
        Self::QualityCheck { message: message.into() }
    }

    /// Short label used in logs and observer hooks.
    pub fn category(&self) -> &'static str {
        match self {
            WorkflowError::InvalidInput { .. } => "input",
            WorkflowError::Generation { .. } | WorkflowError::MalformedResponse { .. } => "external",
            WorkflowError::QualityCheck { .. } => "quality",
            WorkflowError::Unexpected { .. } => "unexpected",
        }
    }
}

impl From<StepTransitionError> for WorkflowError {
    fn from(error: StepTransitionError) -> Self {
        Self::Unexpected {
            message: error.to_string(),
        }
    }
}
