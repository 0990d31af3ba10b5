//! "Explain this to me": plain-language explanations of complex documents.

use std::fmt;
use std::str::FromStr;

use bragi_types::{ExplainResult, TaskKind, UrgencyLevel};
use serde::Deserialize;
use serde_json::Value;
use tracing::debug;

use super::{DraftList, TaskPipeline, present_entries};
use crate::{WorkflowError, templates};

/// Document category, which drives prompt guidance and disclaimers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Category {
    Medical,
    Legal,
    Financial,
    Technical,
}

/// Keyword families checked in priority order; first match wins.
const CATEGORY_KEYWORDS: &[(Category, &[&str])] = &[
    (Category::Medical, &["medical", "diagnosis", "patient"]),
    (Category::Legal, &["legal", "contract", "agreement"]),
    (Category::Financial, &["bank", "payment", "invoice"]),
    (Category::Technical, &["technical", "code", "system"]),
];

impl Category {
    pub fn as_str(&self) -> &'static str {
        match self {
            Category::Medical => "medical",
            Category::Legal => "legal",
            Category::Financial => "financial",
            Category::Technical => "technical",
        }
    }

    /// Infer a category from the document text.
    pub fn detect(content: &str) -> Option<Category> {
        let lowered = content.to_lowercase();
        CATEGORY_KEYWORDS
            .iter()
            .find(|(_, keywords)| keywords.iter().any(|keyword| lowered.contains(keyword)))
            .map(|(category, _)| *category)
    }

    /// Trailing sentence appended to explanations in sensitive categories.
    pub fn disclaimer(&self) -> Option<&'static str> {
        match self {
            Category::Medical => Some(
                "Note: This is for informational purposes only and not medical advice. Consult a healthcare professional.",
            ),
            Category::Legal => {
                Some("Note: This is for informational purposes only and not legal advice. Consult a qualified attorney.")
            }
            Category::Financial => Some(
                "Note: This is for informational purposes only and not financial advice. Consult a financial advisor.",
            ),
            Category::Technical => None,
        }
    }
}

impl fmt::Display for Category {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

impl FromStr for Category {
    type Err = String;

    fn from_str(value: &str) -> Result<Self, Self::Err> {
        match value.trim().to_ascii_lowercase().as_str() {
            "medical" => Ok(Category::Medical),
            "legal" => Ok(Category::Legal),
            "financial" => Ok(Category::Financial),
            "technical" => Ok(Category::Technical),
            other => Err(format!("unknown category '{other}'")),
        }
    }
}

/// Append `disclaimer` unless the text already ends with it.
pub fn append_disclaimer(explanation: &mut String, disclaimer: &str) {
    if explanation.ends_with(disclaimer) {
        return;
    }
    if !explanation.is_empty() {
        explanation.push_str("\n\n");
    }
    explanation.push_str(disclaimer);
}

/// Explain pipeline: detect-category, ai-explanation, add-disclaimers.
#[derive(Debug, Clone)]
pub struct ExplainPipeline {
    text: String,
    category: Option<String>,
}

impl ExplainPipeline {
    /// `category` is the caller-supplied hint. Blank hints count as absent.
    pub fn new(text: impl Into<String>, category: Option<String>) -> Self {
        Self {
            text: text.into(),
            category: category.filter(|value| !value.trim().is_empty()),
        }
    }
}

/// Model answer before defaults are applied.
#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ExplainDraft {
    pub tldr: Option<String>,
    pub simple_explanation: Option<String>,
    pub key_points: DraftList<String>,
    pub action_required: Option<Value>,
    pub urgency_level: Option<String>,
}

impl TaskPipeline for ExplainPipeline {
    type Prepared = Option<Category>;
    type Draft = ExplainDraft;
    type Output = ExplainResult;

    fn kind(&self) -> TaskKind {
        TaskKind::Explain
    }

    fn primary_input(&self) -> &str {
        &self.text
    }

    fn prepare(&self) -> Result<Option<Category>, WorkflowError> {
        // An explicit hint always wins, even when it names no known category.
        let category = match &self.category {
            Some(hint) => hint.parse::<Category>().ok(),
            None => Category::detect(&self.text),
        };
        debug!(
            category = category.map(|c| c.as_str()).unwrap_or("none"),
            explicit = self.category.is_some(),
            "category resolved"
        );
        Ok(category)
    }

    fn prompt(&self, prepared: &Option<Category>) -> String {
        templates::explain_prompt(&self.text, *prepared)
    }

    fn finish(&self, prepared: Option<Category>, draft: ExplainDraft) -> Result<ExplainResult, WorkflowError> {
        let mut simple_explanation = draft.simple_explanation.unwrap_or_default();
        if let Some(disclaimer) = prepared.and_then(|category| category.disclaimer()) {
            append_disclaimer(&mut simple_explanation, disclaimer);
        }

        let urgency_level = draft
            .urgency_level
            .and_then(|level| level.parse::<UrgencyLevel>().ok())
            .unwrap_or_default();

        Ok(ExplainResult {
            tldr: draft.tldr.unwrap_or_default(),
            simple_explanation,
            key_points: present_entries(draft.key_points),
            action_required: action_required_flag(draft.action_required.as_ref()),
            urgency_level,
        })
    }
}

fn action_required_flag(value: Option<&Value>) -> bool {
    match value {
        Some(Value::Bool(flag)) => *flag,
        Some(Value::String(text)) => text.trim().eq_ignore_ascii_case("true"),
        _ => false,
    }
}
