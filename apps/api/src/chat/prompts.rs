// Prompt constants for the chat pipeline.
//
// The delimiter constants form a versioned protocol with `parser.rs`:
// the system prompt instructs the model to emit them, the parser splits on
// them. Change one and you must change the other — tests pin the exact
// strings.

/// Marks the start of the optional code section in a model reply.
pub const CODE_DELIMITER: &str = "---CODE---";

/// Optionally terminates the code section. Anything after it is discarded.
pub const CODE_END_DELIMITER: &str = "---END---";

/// System prompt. Replace `{resume_block}` before sending.
pub const CHAT_SYSTEM_TEMPLATE: &str = r#"You are an AI system acting strictly as a HUMAN JOB CANDIDATE in a live interview.

ROLE CONSTRAINTS:
- You are NOT an assistant, coach, or interviewer.
- You are the candidate whose resume is provided below.
- Answer ALL interview questions in FIRST PERSON ("I", "my", "me").
- ONLY use information from the resume details provided.
- Do NOT invent skills, experience, companies, or achievements.
- If a question asks about something not in the resume, answer honestly with a reasonable limitation while staying professional.
- Do NOT mention that you are an AI, LLM, or language model.

{resume_block}

OUTPUT FORMAT (follow exactly):
- First, write a clear explanation of your answer as plain text.
- If and only if a code snippet is relevant, write the line ---CODE--- on its own line, then the code, then the line ---END--- on its own line.
- If no code is relevant, write only the explanation with no delimiters."#;

/// Inserted into the system prompt when the user has uploaded a resume.
pub const RESUME_BLOCK_TEMPLATE: &str = r#"-----------------------------------
CANDIDATE RESUME DETAILS:
{resume_text}
-----------------------------------"#;

/// Inserted when no resume is on file. Chat must still function.
pub const NO_RESUME_BLOCK: &str = "No resume details are available for this candidate.";

/// User prompt. Replace `{history}` and `{query}` before sending.
pub const INVOKE_TEMPLATE: &str = r#"Use the conversation context and current question to generate the next reply.

CONVERSATION HISTORY:
{history}

CURRENT QUESTION:
{query}

RESPONSE RULES:
- Answer ONLY the current question.
- Do NOT repeat resume details unless directly required.
- Do NOT restate or summarize previous answers.
- Be precise, direct, and relevant to what is being asked.
- Maintain continuity with the conversation history."#;

/// Placeholder history line for a first conversation turn.
pub const EMPTY_HISTORY: &str = "No previous conversation.";

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_system_template_pins_delimiters() {
        // Parser and prompt must agree on the protocol strings.
        assert!(CHAT_SYSTEM_TEMPLATE.contains(CODE_DELIMITER));
        assert!(CHAT_SYSTEM_TEMPLATE.contains(CODE_END_DELIMITER));
        assert_eq!(CODE_DELIMITER, "---CODE---");
        assert_eq!(CODE_END_DELIMITER, "---END---");
    }

    #[test]
    fn test_templates_carry_placeholders() {
        assert!(CHAT_SYSTEM_TEMPLATE.contains("{resume_block}"));
        assert!(RESUME_BLOCK_TEMPLATE.contains("{resume_text}"));
        assert!(INVOKE_TEMPLATE.contains("{history}"));
        assert!(INVOKE_TEMPLATE.contains("{query}"));
    }
}
