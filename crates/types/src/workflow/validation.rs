//! Input rules enforced by the `validate-input` step.
//!
//! Each task kind has a minimum length for its primary input, counted in
//! characters after trimming, and the message reported when the input falls
//! short.

use super::TaskKind;

/// Minimum-length rule for a task kind's primary input.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct InputRule {
    pub min_chars: usize,
    pub too_short_message: &'static str,
}

/// Returns the input rule for a task kind.
pub fn input_rule(kind: TaskKind) -> InputRule {
    match kind {
        TaskKind::CatchUp => InputRule {
            min_chars: 10,
            too_short_message: "Input text is too short or empty",
        },
        TaskKind::Rewrite => InputRule {
            min_chars: 5,
            too_short_message: "Message is too short to rewrite",
        },
        TaskKind::Explain => InputRule {
            min_chars: 20,
            too_short_message: "Content is too short to explain",
        },
    }
}

/// Check the primary input against the task kind's rule.
///
/// Returns the rule's message when the trimmed input is shorter than the
/// threshold. Whitespace-only input counts as empty.
pub fn validate_primary_input(kind: TaskKind, input: &str) -> Result<(), &'static str> {
    let rule = input_rule(kind);
    if input.trim().chars().count() < rule.min_chars {
        return Err(rule.too_short_message);
    }
    Ok(())
}
