//! "Say it better": rewrite a message toward an intent.

use bragi_types::{RewriteResult, TaskKind};
use bragi_util::contains_any_keyword;
use serde::Deserialize;
use tracing::debug;

use super::{DraftList, TaskPipeline, present_entries};
use crate::{WorkflowError, templates};

const ANGER_KEYWORDS: &[&str] = &["angry", "hate", "terrible", "awful", "stupid"];
const URGENCY_KEYWORDS: &[&str] = &["urgent", "asap", "immediately", "now"];
const MIN_REWRITE_CHARS: usize = 5;

/// Rewrite pipeline: analyze-tone, ai-rewrite, quality-check.
#[derive(Debug, Clone)]
pub struct RewritePipeline {
    text: String,
    intent: String,
}

impl RewritePipeline {
    pub fn new(text: impl Into<String>, intent: impl Into<String>) -> Self {
        Self {
            text: text.into(),
            intent: intent.into(),
        }
    }
}

/// Tone flags detected in the original message.
///
/// Computed and logged, but not used by later steps.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub struct ToneSignals {
    pub angry: bool,
    pub urgent: bool,
}

impl ToneSignals {
    /// Case-insensitive keyword scan.
    pub fn detect(text: &str) -> Self {
        Self {
            angry: contains_any_keyword(text, ANGER_KEYWORDS),
            urgent: contains_any_keyword(text, URGENCY_KEYWORDS),
        }
    }
}

/// Model answer before defaults are applied.
#[derive(Debug, Default, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct RewriteDraft {
    pub rewritten_text: Option<String>,
    pub improvements: DraftList<String>,
}

impl TaskPipeline for RewritePipeline {
    type Prepared = ToneSignals;
    type Draft = RewriteDraft;
    type Output = RewriteResult;

    fn kind(&self) -> TaskKind {
        TaskKind::Rewrite
    }

    fn primary_input(&self) -> &str {
        &self.text
    }

    fn validate_secondary(&self) -> Result<(), WorkflowError> {
        if self.intent.trim().is_empty() {
            return Err(WorkflowError::invalid_input("Intent is required"));
        }
        Ok(())
    }

    fn prepare(&self) -> Result<ToneSignals, WorkflowError> {
        let signals = ToneSignals::detect(&self.text);
        debug!(angry = signals.angry, urgent = signals.urgent, "tone analyzed");
        Ok(signals)
    }

    fn prompt(&self, _prepared: &ToneSignals) -> String {
        templates::rewrite_prompt(&self.text, &self.intent)
    }

    fn finish(&self, _prepared: ToneSignals, draft: RewriteDraft) -> Result<RewriteResult, WorkflowError> {
        // A missing rewrite falls back to the original, which the gate below rejects.
        let rewritten_text = draft.rewritten_text.unwrap_or_else(|| self.text.clone());

        check_rewrite_quality(&self.text, &rewritten_text)?;

        debug!(
            original_chars = self.text.chars().count(),
            rewritten_chars = rewritten_text.chars().count(),
            "rewrite passed quality check"
        );
        Ok(RewriteResult {
            original_text: self.text.clone(),
            rewritten_text,
            improvements: present_entries(draft.improvements),
            tone: self.intent.clone(),
        })
    }
}

/// Reject empty, too-short, or no-op rewrites. Both texts are compared as given.
pub fn check_rewrite_quality(original: &str, rewritten: &str) -> Result<(), WorkflowError> {
    let reason = if rewritten.is_empty() {
        "rewritten text is empty"
    } else if rewritten.chars().count() < MIN_REWRITE_CHARS {
        "rewritten text is too short"
    } else if rewritten == original {
        "rewritten text is identical to the original"
    } else {
        return Ok(());
    };
    Err(WorkflowError::quality_check(format!("Rewrite quality check failed: {reason}")))
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    #[test]
    fn tone_signals_match_keywords_case_insensitively() {
        assert_eq!(
            ToneSignals::detect("This is TERRIBLE, fix it ASAP"),
            ToneSignals { angry: true, urgent: true }
        );
        assert_eq!(ToneSignals::detect("Thanks for the update"), ToneSignals::default());
    }

    #[test]
    fn blank_intent_is_rejected() {
        let error = RewritePipeline::new("please send the report", "  ").validate_secondary().unwrap_err();
        assert_eq!(error.to_string(), "Intent is required");
    }

    #[test]
    fn quality_gate_rejects_noop_and_short_rewrites() {
        assert!(check_rewrite_quality("send it", "").is_err());
        assert!(check_rewrite_quality("send it", "ok").is_err());
        assert!(check_rewrite_quality("send it now", "send it now").is_err());
        assert!(check_rewrite_quality("send it now", "Could you send it soon?").is_ok());
    }

    #[test]
    fn quality_gate_compares_raw_text() {
        assert!(check_rewrite_quality("Please send the report", "Please send the report\n").is_ok());
        assert!(check_rewrite_quality("  send it now  ", "send it now").is_ok());
        assert!(check_rewrite_quality("ok", "  Okay  ").is_ok());
        assert!(check_rewrite_quality("ok", "  ").is_err());
    }

    #[test]
    fn finish_returns_model_text_verbatim_and_keeps_intent_as_tone() {
        let pipeline = RewritePipeline::new("send the report now", "friendly");
        let draft: RewriteDraft =
            serde_json::from_value(json!({ "rewrittenText": " Could you share the report when you can? \n", "tone": "ignored" }))
                .unwrap();

        let result = pipeline.finish(ToneSignals::default(), draft).unwrap();
        assert_eq!(result.rewritten_text, " Could you share the report when you can? \n");
        assert_eq!(result.original_text, "send the report now");
        assert!(result.improvements.is_empty());
        assert_eq!(result.tone, "friendly");
    }

    #[test]
    fn finish_drops_null_improvements() {
        let pipeline = RewritePipeline::new("send the report now", "friendly");
        let draft: RewriteDraft = serde_json::from_value(json!({
            "rewrittenText": "Could you share the report?",
            "improvements": [null, "Softer opening"],
        }))
        .unwrap();

        let result = pipeline.finish(ToneSignals::default(), draft).unwrap();
        assert_eq!(result.improvements, vec!["Softer opening".to_string()]);
    }

    #[test]
    fn missing_rewrite_fails_quality_check() {
        let pipeline = RewritePipeline::new("send the report now", "calm");
        let error = pipeline.finish(ToneSignals::default(), RewriteDraft::default()).unwrap_err();
        assert!(matches!(error, WorkflowError::QualityCheck { .. }));
    }
}
