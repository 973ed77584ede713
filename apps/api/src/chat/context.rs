//! Context Assembler — fetches history and resume text for a user and
//! renders them into a bounded prompt.

use tracing::debug;
use uuid::Uuid;

use crate::chat::prompts::{
    CHAT_SYSTEM_TEMPLATE, EMPTY_HISTORY, INVOKE_TEMPLATE, NO_RESUME_BLOCK, RESUME_BLOCK_TEMPLATE,
};
use crate::chat::ConversationStore;
use crate::config::ChatDefaults;
use crate::errors::AppError;
use crate::models::chat::{ChatTurn, Role};

/// Bounds on the rendered history section. The resume block and the current
/// query are never truncated; resume identity is more stable than old turns.
#[derive(Debug, Clone, Copy)]
pub struct HistoryBudget {
    pub max_turns: usize,
    pub char_budget: usize,
}

impl From<&ChatDefaults> for HistoryBudget {
    fn from(defaults: &ChatDefaults) -> Self {
        HistoryBudget {
            max_turns: defaults.max_history_turns,
            char_budget: defaults.history_char_budget,
        }
    }
}

/// Request-scoped prompt inputs, assembled fresh per call, never persisted.
#[derive(Debug, Clone, PartialEq)]
pub struct PromptContext {
    pub history: Vec<ChatTurn>,
    pub resume_text: Option<String>,
    pub query: String,
}

/// The system/user prompt pair sent to the model collaborator.
#[derive(Debug, Clone)]
pub struct RenderedPrompt {
    pub system: String,
    pub user: String,
}

/// Fetches ordered history for the user and splits it into conversational
/// turns and resume text (most recent non-empty resume wins). An empty
/// history is not an error; a store failure is `ContextUnavailable` — silently
/// dropping history could produce an answer inconsistent with prior turns.
pub async fn assemble(
    store: &dyn ConversationStore,
    user_id: Uuid,
    query: &str,
) -> Result<PromptContext, AppError> {
    let turns = store
        .history(user_id)
        .await
        .map_err(|e| AppError::ContextUnavailable(e.to_string()))?;

    let mut resume_text: Option<String> = None;
    let mut history = Vec::with_capacity(turns.len());
    for turn in turns {
        match &turn.resume_details {
            // History is ordered oldest-first, so the last hit wins.
            Some(details) if !details.trim().is_empty() => {
                resume_text = Some(details.clone());
            }
            // Blank upload record, not a conversational turn.
            Some(_) => {}
            None => history.push(turn),
        }
    }

    debug!(
        "Assembled context: {} conversational turns, resume present: {}",
        history.len(),
        resume_text.is_some()
    );

    Ok(PromptContext {
        history,
        resume_text,
        query: query.to_string(),
    })
}

/// Renders the context into the fixed prompt template, truncating history to
/// the budget. Always keeps the most recent turns.
pub fn render(context: &PromptContext, budget: &HistoryBudget) -> RenderedPrompt {
    let resume_block = match &context.resume_text {
        Some(text) => RESUME_BLOCK_TEMPLATE.replace("{resume_text}", text),
        None => NO_RESUME_BLOCK.to_string(),
    };
    let system = CHAT_SYSTEM_TEMPLATE.replace("{resume_block}", &resume_block);

    let history = render_history(&context.history, budget);
    let user = INVOKE_TEMPLATE
        .replace("{history}", &history)
        .replace("{query}", &context.query);

    RenderedPrompt { system, user }
}

fn render_history(turns: &[ChatTurn], budget: &HistoryBudget) -> String {
    if turns.is_empty() {
        return EMPTY_HISTORY.to_string();
    }

    let start = turns.len().saturating_sub(budget.max_turns);
    let mut lines: Vec<String> = turns[start..].iter().map(format_turn).collect();

    // Drop oldest lines until within the character budget, keeping at least
    // the most recent turn even if it alone exceeds the budget. The total is
    // the joined length: line lengths plus one newline between lines.
    let mut total: usize =
        lines.iter().map(|l| l.len()).sum::<usize>() + lines.len().saturating_sub(1);
    while total > budget.char_budget && lines.len() > 1 {
        let dropped = lines.remove(0);
        total -= dropped.len() + 1;
    }

    lines.join("\n")
}

fn format_turn(turn: &ChatTurn) -> String {
    let label = if turn.role == Role::Assistant.as_str() {
        "Assistant"
    } else {
        "User"
    };
    format!("{label}: {}", turn.message)
}
