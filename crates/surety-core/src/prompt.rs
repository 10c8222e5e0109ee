//! Prompt composition and decline detection.
//!
//! A composed prompt is `preface + body`, followed by [`DECLINE_INSTRUCTION`]
//! on its own line when decline detection is enabled. The instruction always
//! comes last so nothing in the body can follow it.

/// Instruction appended to prompts that allow the model to decline.
pub const DECLINE_INSTRUCTION: &str = "If you don't have enough knowledge to provide a reasonable answer, respond only with the exact word DECLINED.";

/// Normalized form of a declining response.
pub const DECLINE_SENTINEL: &str = "declined";

/// Build the prompt sent to the model.
pub fn compose_prompt(preface: &str, body: &str, allow_decline: bool) -> String {
    let mut prompt =
        String::with_capacity(preface.len() + body.len() + DECLINE_INSTRUCTION.len() + 1);
    prompt.push_str(preface);
    prompt.push_str(body);

    if allow_decline {
        if !prompt.is_empty() && !prompt.ends_with('\n') {
            prompt.push('\n');
        }
        prompt.push_str(DECLINE_INSTRUCTION);
    }

    prompt
}

/// Normalize a raw response for decline matching.
///
/// Trims surrounding whitespace, removes every single and double quote
/// character, then lower-cases.
pub fn normalize_decline(response: &str) -> String {
    response
        .trim()
        .chars()
        .filter(|c| !matches!(c, '\'' | '"'))
        .collect::<String>()
        .to_lowercase()
}

/// Whether a raw response is the model declining to answer.
pub fn is_decline(response: &str) -> bool {
    normalize_decline(response) == DECLINE_SENTINEL
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_compose_without_decline() {
        let prompt = compose_prompt("You are terse.\n", "Name a colour.", false);
        assert_eq!(prompt, "You are terse.\nName a colour.");
    }

    #[test]
    fn test_decline_instruction_is_last() {
        let prompt = compose_prompt("", "How tall is Everest?", true);
        assert_eq!(
            prompt,
            format!("How tall is Everest?\n{DECLINE_INSTRUCTION}")
        );
        assert!(prompt.ends_with(DECLINE_INSTRUCTION));
    }

    #[test]
    fn test_no_blank_line_before_instruction() {
        let prompt = compose_prompt("", "Answer briefly.\n", true);
        assert_eq!(prompt, format!("Answer briefly.\n{DECLINE_INSTRUCTION}"));
    }

    #[test]
    fn test_decline_variants() {
        assert!(is_decline("DECLINED"));
        assert!(is_decline("  declined\n"));
        assert!(is_decline("\"Declined\""));
        assert!(is_decline("'DECLINED'"));
        assert!(is_decline("  \"DeClInEd\"  "));
    }

    #[test]
    fn test_not_decline() {
        assert!(!is_decline("DECLINED."));
        assert!(!is_decline("I declined"));
        assert!(!is_decline("decline"));
        assert!(!is_decline(""));
    }

    #[test]
    fn test_normalize_strips_inner_quotes() {
        assert_eq!(normalize_decline(" de'cli\"ned "), "declined");
    }
}
