//! "Did I miss anything?": summarise a conversation.

use bragi_types::{CatchUpResult, Deadline, TaskKind};
use bragi_util::collapse_whitespace;
use serde::Deserialize;
use tracing::debug;

use super::{DraftList, TaskPipeline, present_entries};
use crate::{WorkflowError, templates};

/// Catch-up pipeline: preprocess-content, ai-analysis, format-results.
#[derive(Debug, Clone)]
pub struct CatchUpPipeline {
    text: String,
}

impl CatchUpPipeline {
    pub fn new(text: impl Into<String>) -> Self {
        Self { text: text.into() }
    }
}

/// Model answer before defaults are applied.
#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CatchUpDraft {
    pub summary: Option<String>,
    pub key_decisions: DraftList<String>,
    pub action_items: DraftList<String>,
    pub deadlines: DraftList<DeadlineDraft>,
    pub important_discussions: DraftList<String>,
}

/// A deadline entry as the model wrote it; either half may be `null`.
#[derive(Debug, Default, Deserialize)]
#[serde(default)]
pub struct DeadlineDraft {
    pub task: Option<String>,
    pub deadline: Option<String>,
}

impl From<DeadlineDraft> for Deadline {
    fn from(draft: DeadlineDraft) -> Self {
        Deadline {
            task: draft.task.unwrap_or_default(),
            deadline: draft.deadline.unwrap_or_default(),
        }
    }
}

impl TaskPipeline for CatchUpPipeline {
    type Prepared = String;
    type Draft = CatchUpDraft;
    type Output = CatchUpResult;

    fn kind(&self) -> TaskKind {
        TaskKind::CatchUp
    }

    fn primary_input(&self) -> &str {
        &self.text
    }

    fn prepare(&self) -> Result<String, WorkflowError> {
        let preprocessed = collapse_whitespace(&self.text);
        debug!(preprocessed_chars = preprocessed.chars().count(), "content preprocessed");
        Ok(preprocessed)
    }

    fn prompt(&self, prepared: &String) -> String {
        templates::catch_up_prompt(prepared)
    }

    fn finish(&self, _prepared: String, draft: CatchUpDraft) -> Result<CatchUpResult, WorkflowError> {
        let result = CatchUpResult {
            summary: draft.summary.unwrap_or_default(),
            key_decisions: present_entries(draft.key_decisions),
            action_items: present_entries(draft.action_items),
            deadlines: present_entries(draft.deadlines).into_iter().map(Deadline::from).collect(),
            important_discussions: present_entries(draft.important_discussions),
        };
        debug!(
            decisions = result.key_decisions.len(),
            action_items = result.action_items.len(),
            deadlines = result.deadlines.len(),
            "catch-up results formatted"
        );
        Ok(result)
    }
}
