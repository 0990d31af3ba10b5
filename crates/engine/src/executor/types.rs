//! Core executor data types.

use bragi_types::{CatchUpResult, ExplainResult, RewriteResult, TaskKind};
use serde::Serialize;

/// A task invocation with its kind-specific inputs.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum TaskRequest {
    /// Summarise `text`.
    CatchUp { text: String },
    /// Rewrite `text` toward `intent` (e.g. "professional", "de-escalate").
    Rewrite { text: String, intent: String },
    /// Explain `text`, optionally forcing a category instead of detecting one.
    Explain { text: String, category: Option<String> },
}

impl TaskRequest {
    /// Build a request from a task kind plus primary and secondary inputs.
    ///
    /// The secondary input is the intent for rewrites and the category hint for
    /// explanations; catch-up ignores it. A rewrite without an intent is still
    /// constructed and fails later at `validate-input`.
    pub fn from_parts(kind: TaskKind, primary: impl Into<String>, secondary: Option<String>) -> Self {
        let text = primary.into();
        match kind {
            TaskKind::CatchUp => TaskRequest::CatchUp { text },
            TaskKind::Rewrite => TaskRequest::Rewrite {
                text,
                intent: secondary.unwrap_or_default(),
            },
            TaskKind::Explain => TaskRequest::Explain { text, category: secondary },
        }
    }

    pub fn kind(&self) -> TaskKind {
        match self {
            TaskRequest::CatchUp { .. } => TaskKind::CatchUp,
            TaskRequest::Rewrite { .. } => TaskKind::Rewrite,
            TaskRequest::Explain { .. } => TaskKind::Explain,
        }
    }
}

/// Output of any task kind. Serialises as the bare inner result.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(untagged)]
pub enum TaskOutput {
    CatchUp(CatchUpResult),
    Rewrite(RewriteResult),
    Explain(ExplainResult),
}

impl From<CatchUpResult> for TaskOutput {
    fn from(result: CatchUpResult) -> Self {
        TaskOutput::CatchUp(result)
    }
}

impl From<RewriteResult> for TaskOutput {
    fn from(result: RewriteResult) -> Self {
        TaskOutput::Rewrite(result)
    }
}

impl From<ExplainResult> for TaskOutput {
    fn from(result: ExplainResult) -> Self {
        TaskOutput::Explain(result)
    }
}
