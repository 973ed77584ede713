use std::sync::Arc;

use axum::extract::{Multipart, State};
use axum::Json;
use bytes::Bytes;
use serde_json::{json, Value};
use tracing::info;

use crate::chat::context::HistoryBudget;
use crate::chat::normalize::InputKind;
use crate::chat::pipeline::{run_chat, ChatInvocation};
use crate::chat::{ConversationStore, ModelConfig};
use crate::errors::AppError;
use crate::state::AppState;
use crate::store::PgStore;

/// POST /chat/invoke
///
/// Multipart form: `email` (required), `text`, `audio`, `model`,
/// `temperature`, `top_p` (optional).
pub async fn handle_invoke(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<Json<Value>, AppError> {
    let mut email: Option<String> = None;
    let mut text: Option<String> = None;
    let mut audio: Option<(Bytes, String)> = None;
    let mut model: Option<String> = None;
    let mut temperature: Option<f32> = None;
    let mut top_p: Option<f32> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::InvalidInput(format!("Malformed multipart body: {e}")))?
    {
        let name = field.name().unwrap_or_default().to_string();
        match name.as_str() {
            "email" => email = Some(read_text(field, &name).await?),
            "text" => text = Some(read_text(field, &name).await?),
            "audio" => {
                let filename = field.file_name().unwrap_or("audio.wav").to_string();
                let bytes = field.bytes().await.map_err(|e| {
                    AppError::InvalidInput(format!("Failed to read audio field: {e}"))
                })?;
                audio = Some((bytes, filename));
            }
            "model" => model = Some(read_text(field, &name).await?),
            "temperature" => temperature = Some(read_float(field, &name).await?),
            "top_p" => top_p = Some(read_float(field, &name).await?),
            _ => {} // unknown fields ignored
        }
    }

    let email = email
        .filter(|e| !e.trim().is_empty())
        .ok_or_else(|| AppError::InvalidInput("email field is required".to_string()))?;

    info!(
        "Received chat invocation for {}: has_text={}, has_audio={}",
        email,
        text.as_deref().is_some_and(|t| !t.trim().is_empty()),
        audio.is_some()
    );

    let input = InputKind::from_parts(text, audio)?;
    let config = ModelConfig::resolve(&state.config.chat, model, temperature, top_p)?;

    let store = Arc::new(PgStore::new(state.db.clone()));
    let result = run_chat(
        store.as_ref(),
        Arc::clone(&store) as Arc<dyn ConversationStore>,
        &state.transcriber,
        &state.llm,
        HistoryBudget::from(&state.config.chat),
        ChatInvocation {
            email,
            input,
            config,
        },
    )
    .await?;

    Ok(Json(json!({
        "message": "Chat invocation completed successfully",
        "data": {
            "explanation": result.explanation,
            "code": result.code,
            "user_id": result.user_id,
        }
    })))
}

async fn read_text(field: axum::extract::multipart::Field<'_>, name: &str) -> Result<String, AppError> {
    field
        .text()
        .await
        .map_err(|e| AppError::InvalidInput(format!("Failed to read field '{name}': {e}")))
}

async fn read_float(field: axum::extract::multipart::Field<'_>, name: &str) -> Result<f32, AppError> {
    let raw = read_text(field, name).await?;
    raw.trim()
        .parse::<f32>()
        .map_err(|_| AppError::InvalidInput(format!("Field '{name}' must be a number, got '{raw}'")))
}
