//! Pipeline Orchestrator — sequences the chat invocation end to end.
//!
//! Flow: resolve user → normalize input → assemble context → invoke model →
//! parse reply → persist turns (best effort). Stages run strictly
//! sequentially; the first failure is terminal and no partial result is
//! ever returned. There are no retries at this layer.

use std::sync::Arc;

use tracing::{info, warn};

use crate::chat::context::{assemble, render, HistoryBudget};
use crate::chat::normalize::{normalize, InputKind};
use crate::chat::parser::parse_reply;
use crate::chat::{
    ChatResult, CompletionModel, ConversationStore, IdentityStore, ModelConfig, Transcriber,
};
use crate::errors::AppError;
use crate::models::chat::Role;

/// One chat invocation, validated at the HTTP boundary.
#[derive(Debug, Clone)]
pub struct ChatInvocation {
    pub email: String,
    pub input: InputKind,
    pub config: ModelConfig,
}

/// Runs the full chat pipeline for one invocation.
///
/// The conversation store is taken as an `Arc` because turn persistence is
/// spawned onto the runtime: a caller disconnect must not abandon a write
/// mid-flight. Persistence failure is logged, never propagated — the caller
/// already has a valid answer.
pub async fn run_chat(
    identity: &dyn IdentityStore,
    store: Arc<dyn ConversationStore>,
    transcriber: &dyn Transcriber,
    model: &dyn CompletionModel,
    budget: HistoryBudget,
    invocation: ChatInvocation,
) -> Result<ChatResult, AppError> {
    // Resolve the user before the pipeline begins; a miss never reaches the
    // normalizer.
    let user_id = identity
        .lookup(&invocation.email)
        .await
        .map_err(AppError::Internal)?
        .ok_or_else(|| AppError::UserNotFound(invocation.email.clone()))?;

    info!("Chat invocation started for user {user_id}");

    let query = normalize(invocation.input, transcriber).await?;

    let context = assemble(store.as_ref(), user_id, &query.text).await?;
    let prompt = render(&context, &budget);

    let raw = model
        .complete(&prompt.system, &prompt.user, &invocation.config)
        .await
        .map_err(|e| AppError::ModelInvocationFailed(e.to_string()))?;

    let reply = parse_reply(&raw)?;

    info!(
        "Chat invocation completed for user {user_id}: {} explanation chars, code present: {}",
        reply.explanation.len(),
        reply.code.is_some()
    );

    let assistant_message = match &reply.code {
        Some(code) => format!("Explanation: {}\n\nCode: {}", reply.explanation, code),
        None => reply.explanation.clone(),
    };

    // Spawned so an abandoned request cannot drop the writes mid-flight;
    // awaited so both turns land before the response, preserving order.
    let persist_store = Arc::clone(&store);
    let user_text = query.text.clone();
    let handle = tokio::spawn(async move {
        if let Err(e) = persist_store.append(user_id, Role::User, &user_text).await {
            warn!("Failed to persist user turn for {user_id}: {e}. Continuing without saving.");
            return;
        }
        if let Err(e) = persist_store
            .append(user_id, Role::Assistant, &assistant_message)
            .await
        {
            warn!("Failed to persist assistant turn for {user_id}: {e}. Continuing without saving.");
        }
    });
    if handle.await.is_err() {
        warn!("Turn persistence task panicked for user {user_id}");
    }

    Ok(ChatResult {
        explanation: reply.explanation,
        code: reply.code,
        user_id,
    })
}
