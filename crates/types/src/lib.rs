//! Shared type definitions for the Bragi writing assistant.
//!
//! The engine, the HTTP surface, and the API client all exchange these
//! models. Every type that crosses the HTTP boundary serialises in camelCase
//! so the web client can consume the JSON unchanged.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

pub mod workflow;

pub use workflow::{StepTransitionError, TaskKind, WorkflowExecutionResult, WorkflowStep, WorkflowStepStatus};

/// Model identifier used by every task kind unless overridden.
pub const DEFAULT_MODEL: &str = "llama-3.1-70b-versatile";

/// Identifier substituted when a caller does not supply a user id.
pub const ANONYMOUS_USER_ID: &str = "anonymous";

/// Output of the catch-up workflow: what the reader missed in a conversation.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct CatchUpResult {
    /// Brief overview of what happened.
    pub summary: String,
    /// Decisions that were made.
    pub key_decisions: Vec<String>,
    /// Action items, with owners when mentioned.
    pub action_items: Vec<String>,
    /// Deadlines mentioned in the content.
    pub deadlines: Vec<Deadline>,
    /// Discussions worth knowing about.
    pub important_discussions: Vec<String>,
}

/// A task paired with its due date, as phrased by the model.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct Deadline {
    #[serde(default)]
    pub task: String,
    #[serde(default)]
    pub deadline: String,
}

/// Output of the rewrite workflow.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct RewriteResult {
    /// The message exactly as the caller submitted it.
    pub original_text: String,
    /// The improved message.
    pub rewritten_text: String,
    /// Specific improvements the model reports having made.
    pub improvements: Vec<String>,
    /// The intent the rewrite targeted.
    pub tone: String,
}

/// Output of the explain workflow.
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct ExplainResult {
    /// One-sentence summary.
    pub tldr: String,
    /// Plain-language explanation, with a disclaimer for sensitive categories.
    pub simple_explanation: String,
    /// Points the reader should know.
    pub key_points: Vec<String>,
    /// Whether the reader has to act on the document.
    pub action_required: bool,
    /// How soon the reader has to act.
    pub urgency_level: UrgencyLevel,
}

/// Urgency reported by the explain workflow.
#[derive(Debug, Clone, Copy, Default, Serialize, Deserialize, PartialEq, Eq, Hash)]
#[serde(rename_all = "lowercase")]
pub enum UrgencyLevel {
    Low,
    #[default]
    Medium,
    High,
}

impl UrgencyLevel {
    pub fn as_str(&self) -> &'static str {
        match self {
            UrgencyLevel::Low => "low",
            UrgencyLevel::Medium => "medium",
            UrgencyLevel::High => "high",
        }
    }
}

impl fmt::Display for UrgencyLevel {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for UrgencyLevel {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "low" => Ok(UrgencyLevel::Low),
            "medium" => Ok(UrgencyLevel::Medium),
            "high" => Ok(UrgencyLevel::High),
            other => Err(format!("unknown urgency level '{other}'")),
        }
    }
}

/// Caller identity and preferences.
///
/// The executor never inspects this value; it is handed to the text
/// generator untouched.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq, Eq)]
#[serde(rename_all = "camelCase")]
pub struct UserContext {
    pub user_id: String,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub preferences: Option<UserPreferences>,
}

impl UserContext {
    /// Create a context for the given user id without preferences.
    pub fn new(user_id: impl Into<String>) -> Self {
        Self {
            user_id: user_id.into(),
            preferences: None,
        }
    }

    /// Context used when the caller did not identify itself.
    pub fn anonymous() -> Self {
        Self::new(ANONYMOUS_USER_ID)
    }
}

/// Optional writing preferences attached to a [`UserContext`].
#[derive(Debug, Clone, Default, Serialize, Deserialize, PartialEq, Eq)]
pub struct UserPreferences {
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub tone: Option<String>,
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub style: Option<String>,
}

/// Sampling configuration for a single text-generation call.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
#[serde(rename_all = "camelCase")]
pub struct ModelConfig {
    /// Provider model identifier.
    pub model: String,
    pub temperature: f32,
    /// Upper bound on generated tokens.
    pub max_tokens: u32,
    /// Nucleus-sampling parameter.
    #[serde(default, skip_serializing_if = "Option::is_none")]
    pub top_p: Option<f32>,
}

impl ModelConfig {
    /// Default sampling configuration for a task kind.
    ///
    /// Summaries and explanations run cooler than rewrites, which need some
    /// variety to avoid echoing the input.
    pub fn for_task(kind: TaskKind) -> Self {
        let (temperature, max_tokens, top_p) = match kind {
            TaskKind::CatchUp => (0.3, 2000, 0.9),
            TaskKind::Rewrite => (0.7, 1000, 0.95),
            TaskKind::Explain => (0.4, 1500, 0.9),
        };
        Self {
            model: DEFAULT_MODEL.to_string(),
            temperature,
            max_tokens,
            top_p: Some(top_p),
        }
    }

    /// Replace the model identifier, keeping the sampling parameters.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }
}
