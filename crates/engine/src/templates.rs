//! Instruction templates sent to the text generator.
//!
//! Each template spells out the JSON shape the model must answer with; the
//! pipelines decode that shape and fill in anything the model left out.

use crate::workflow::explain::Category;

/// Instruction used when the requested intent has no dedicated entry.
const FALLBACK_TONE_INSTRUCTION: &str = "Improve the message to be clearer and more professional.";

/// Rewrite instructions keyed by intent.
const TONE_INSTRUCTIONS: &[(&str, &str)] = &[
    (
        "professional",
        "Make it professional, clear, and respectful. Remove casual language and emotions.",
    ),
    (
        "friendly",
        "Make it warm and friendly while maintaining clarity. Add appropriate warmth.",
    ),
    (
        "firm",
        "Make it firm and direct while remaining professional. Be assertive but not aggressive.",
    ),
    (
        "apologetic",
        "Make it apologetic and understanding. Show empathy and willingness to resolve issues.",
    ),
    (
        "de-escalate",
        "Remove aggressive or emotional language. Focus on understanding and finding common ground.",
    ),
    ("calm", "Make it calm and measured. Remove any emotional or reactive language."),
];

/// Look up the rewrite instruction for an intent, ignoring case.
pub fn tone_instruction(intent: &str) -> &'static str {
    let normalized = intent.trim().to_lowercase();
    TONE_INSTRUCTIONS
        .iter()
        .find(|(name, _)| *name == normalized)
        .map(|(_, instruction)| *instruction)
        .unwrap_or(FALLBACK_TONE_INSTRUCTION)
}

/// Category-specific guidance prepended to explain prompts.
pub fn category_note(category: Option<Category>) -> &'static str {
    match category {
        Some(Category::Medical) => "This is a medical document. Explain medical terms in simple language. Add disclaimers.",
        Some(Category::Legal) => "This is a legal document. Explain legal terms clearly. Note this is not legal advice.",
        Some(Category::Financial) => {
            "This is a financial document. Explain financial terms simply. Note this is not financial advice."
        }
        Some(Category::Technical) => "This is a technical document. Explain technical concepts in everyday language.",
        None => "",
    }
}

/// Prompt for the catch-up analysis.
pub fn catch_up_prompt(content: &str) -> String {
    format!(
        r#"You are an AI assistant helping someone catch up on what they missed.

Analyze the following conversation/meeting content and provide:
1. A brief summary of what happened
2. Key decisions that were made
3. Action items assigned (with who is responsible if mentioned)
4. Deadlines mentioned (with dates)
5. Important discussions they should know about

Content to analyze:
{content}

Respond in JSON format with this structure:
{{
  "summary": "Brief overview",
  "keyDecisions": ["decision 1", "decision 2"],
  "actionItems": ["action 1", "action 2"],
  "deadlines": [{{"task": "task name", "deadline": "date"}}],
  "importantDiscussions": ["discussion 1", "discussion 2"]
}}"#
    )
}

/// Prompt for rewriting a message toward an intent.
pub fn rewrite_prompt(original_text: &str, intent: &str) -> String {
    let instruction = tone_instruction(intent);
    let tone = serde_json::Value::String(intent.to_string());
    format!(
        r#"You are an AI communication assistant helping someone improve their message.

Original message:
"{original_text}"

Task: {instruction}

Requirements:
- Keep the core meaning unchanged
- Maintain key information and requests
- Make it clear and easy to understand
- Suggest specific improvements made

Respond in JSON format:
{{
  "rewrittenText": "The improved message",
  "improvements": ["improvement 1", "improvement 2", "improvement 3"],
  "tone": {tone}
}}"#
    )
}

/// Prompt for explaining a document in plain language.
pub fn explain_prompt(content: &str, category: Option<Category>) -> String {
    let note = category_note(category);
    format!(
        r#"You are an AI assistant helping someone understand a complex document.

{note}

Document to explain:
{content}

Provide:
1. A one-sentence TL;DR summary
2. A simple, calming explanation in plain language
3. Key points they should know (3-5 points)
4. Whether action is required from them
5. Urgency level (low, medium, or high)

Respond in JSON format:
{{
  "tldr": "One sentence summary",
  "simpleExplanation": "Easy to understand explanation",
  "keyPoints": ["point 1", "point 2", "point 3"],
  "actionRequired": true/false,
  "urgencyLevel": "low/medium/high"
}}"#
    )
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn tone_lookup_is_case_insensitive_with_fallback() {
        assert!(tone_instruction("Professional").starts_with("Make it professional"));
        assert!(tone_instruction("de-escalate").starts_with("Remove aggressive"));
        assert_eq!(tone_instruction("pirate"), FALLBACK_TONE_INSTRUCTION);
    }

    #[test]
    fn catch_up_prompt_embeds_content_and_schema() {
        let prompt = catch_up_prompt("Team decided to ship Friday.");
        assert!(prompt.contains("Content to analyze:\nTeam decided to ship Friday."));
        assert!(prompt.contains(r#""deadlines": [{"task": "task name", "deadline": "date"}]"#));
    }

    #[test]
    fn rewrite_prompt_quotes_intent_as_json() {
        let prompt = rewrite_prompt("send it now", "firm \"but\" fair");
        assert!(prompt.contains("\"send it now\""));
        assert!(prompt.contains(r#""tone": "firm \"but\" fair""#));
        assert!(prompt.contains(FALLBACK_TONE_INSTRUCTION));
    }

    #[test]
    fn explain_prompt_includes_category_note_only_when_known() {
        let prompt = explain_prompt("The contract renews annually.", Some(Category::Legal));
        assert!(prompt.contains("This is a legal document."));

        let prompt = explain_prompt("The weather was mild.", None);
        assert!(!prompt.contains("This is a"));
        assert!(prompt.contains("Document to explain:\nThe weather was mild."));
    }
}
