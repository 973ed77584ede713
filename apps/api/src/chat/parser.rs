//! Response Parser — extracts a structured `{explanation, code}` pair from
//! raw model text.
//!
//! The delimiter strings live in `prompts.rs`; prompt and parser form one
//! protocol and must change in lockstep.

use crate::chat::prompts::{CODE_DELIMITER, CODE_END_DELIMITER};
use crate::errors::AppError;

/// Structured reply extracted from raw model output.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct ParsedReply {
    pub explanation: String,
    pub code: Option<String>,
}

/// Splits raw model text on the code delimiter.
///
/// If the delimiter is absent the entire text is the explanation and `code`
/// is `None` — the pipeline never fails solely because the model omitted
/// code. Empty or whitespace-only raw text fails with `EmptyModelResponse`:
/// an empty explanation is indistinguishable from pipeline malfunction and
/// must be surfaced, not masked.
pub fn parse_reply(raw: &str) -> Result<ParsedReply, AppError> {
    if raw.trim().is_empty() {
        return Err(AppError::EmptyModelResponse);
    }

    let (explanation, code) = match raw.split_once(CODE_DELIMITER) {
        Some((before, after)) => {
            let code_section = match after.split_once(CODE_END_DELIMITER) {
                Some((code, _trailing)) => code,
                None => after,
            };
            let code = code_section.trim();
            (
                before.trim().to_string(),
                (!code.is_empty()).then(|| code.to_string()),
            )
        }
        None => (raw.trim().to_string(), None),
    };

    if explanation.is_empty() {
        // Delimiter present but no explanation before it.
        return Err(AppError::EmptyModelResponse);
    }

    Ok(ParsedReply { explanation, code })
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_delimited_reply_splits_into_explanation_and_code() {
        let raw = "Explanation: X\n---CODE---\nprint(1)";
        let reply = parse_reply(raw).unwrap();
        assert_eq!(reply.explanation, "Explanation: X");
        assert_eq!(reply.code.as_deref(), Some("print(1)"));
    }

    #[test]
    fn test_end_delimiter_bounds_the_code_section() {
        let raw = "Use a loop.\n---CODE---\nfor i in 0..3 {}\n---END---\ntrailing chatter";
        let reply = parse_reply(raw).unwrap();
        assert_eq!(reply.explanation, "Use a loop.");
        assert_eq!(reply.code.as_deref(), Some("for i in 0..3 {}"));
    }

    #[test]
    fn test_no_delimiter_means_code_absent() {
        let reply = parse_reply("Just an answer.").unwrap();
        assert_eq!(reply.explanation, "Just an answer.");
        assert!(reply.code.is_none());
    }

    #[test]
    fn test_empty_raw_text_fails() {
        assert!(matches!(
            parse_reply("").unwrap_err(),
            AppError::EmptyModelResponse
        ));
    }

    #[test]
    fn test_whitespace_only_raw_text_fails() {
        assert!(matches!(
            parse_reply("  \n\t ").unwrap_err(),
            AppError::EmptyModelResponse
        ));
    }

    #[test]
    fn test_delimiter_with_no_explanation_fails() {
        let err = parse_reply("---CODE---\nprint(1)").unwrap_err();
        assert!(matches!(err, AppError::EmptyModelResponse));
    }

    #[test]
    fn test_delimiter_with_empty_code_section_yields_no_code() {
        let reply = parse_reply("An answer.\n---CODE---\n   ").unwrap();
        assert_eq!(reply.explanation, "An answer.");
        assert!(reply.code.is_none());
    }

    #[test]
    fn test_explanation_and_code_are_trimmed() {
        let raw = "  padded explanation  \n---CODE---\n  let x = 1;  \n";
        let reply = parse_reply(raw).unwrap();
        assert_eq!(reply.explanation, "padded explanation");
        assert_eq!(reply.code.as_deref(), Some("let x = 1;"));
    }
}
