use axum::extract::{Multipart, Query, State};
use axum::http::StatusCode;
use axum::Json;
use bytes::Bytes;
use serde_json::{json, Value};
use tracing::info;

use crate::chat::IdentityStore;
use crate::errors::AppError;
use crate::extract::extract_text;
use crate::state::AppState;
use crate::store::PgStore;
use crate::users::handlers::EmailQuery;
use crate::users::service::validate_email;

const MAX_FILE_SIZE: usize = 10 * 1024 * 1024; // 10MB

/// POST /chat/upload-resume
///
/// Multipart form: `file` (PDF or plain text) + `email`. Extracted text is
/// persisted as a resume-bearing turn; the most recent upload wins at
/// prompt-assembly time.
pub async fn handle_upload(
    State(state): State<AppState>,
    mut multipart: Multipart,
) -> Result<(StatusCode, Json<Value>), AppError> {
    let mut email: Option<String> = None;
    let mut file: Option<(Bytes, String, Option<String>)> = None;

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| AppError::InvalidInput(format!("Malformed multipart body: {e}")))?
    {
        match field.name().unwrap_or_default() {
            "email" => {
                email = Some(field.text().await.map_err(|e| {
                    AppError::InvalidInput(format!("Failed to read email field: {e}"))
                })?)
            }
            "file" => {
                let filename = field
                    .file_name()
                    .map(|f| f.to_string())
                    .ok_or_else(|| AppError::Validation("Filename is required".to_string()))?;
                let content_type = field.content_type().map(|c| c.to_string());
                let bytes = field.bytes().await.map_err(|e| {
                    AppError::InvalidInput(format!("Failed to read file field: {e}"))
                })?;
                file = Some((bytes, filename, content_type));
            }
            _ => {}
        }
    }

    let email = validate_email(
        &email.ok_or_else(|| AppError::InvalidInput("email field is required".to_string()))?,
    )?;
    let (data, filename, content_type) =
        file.ok_or_else(|| AppError::InvalidInput("file field is required".to_string()))?;

    if data.len() > MAX_FILE_SIZE {
        return Err(AppError::Validation(format!(
            "File '{filename}' exceeds the {MAX_FILE_SIZE} byte limit"
        )));
    }

    info!(
        "Processing resume upload '{}' ({} bytes) for {}",
        filename,
        data.len(),
        email
    );

    let store = PgStore::new(state.db.clone());
    let user_id = store
        .lookup(&email)
        .await
        .map_err(AppError::Internal)?
        .ok_or_else(|| AppError::UserNotFound(email.clone()))?;

    let resume_text = extract_text(&filename, content_type.as_deref(), &data)?;
    let record_id = store.save_resume(user_id, &filename, &resume_text).await?;

    Ok((
        StatusCode::CREATED,
        Json(json!({
            "message": "Resume uploaded successfully",
            "data": {
                "record_id": record_id,
                "user_id": user_id,
                "filename": filename,
                "characters_extracted": resume_text.len(),
            }
        })),
    ))
}

/// GET /chat/get-resume-details?email=
pub async fn handle_get_details(
    State(state): State<AppState>,
    Query(params): Query<EmailQuery>,
) -> Result<Json<Value>, AppError> {
    let email = validate_email(&params.email)?;

    let store = PgStore::new(state.db.clone());
    let user_id = store
        .lookup(&email)
        .await
        .map_err(AppError::Internal)?
        .ok_or_else(|| AppError::UserNotFound(email.clone()))?;

    let records = store.resume_records(user_id).await?;
    let details: Vec<Value> = records
        .iter()
        .map(|r| {
            json!({
                "id": r.id,
                "message": r.message,
                "resume_details": r.resume_details,
                "role": r.role,
                "created_at": r.created_at,
            })
        })
        .collect();

    Ok(Json(json!({
        "message": "Resume details retrieved successfully",
        "data": {
            "user_id": user_id,
            "user_email": email,
            "resume_count": details.len(),
            "resume_details": details,
        }
    })))
}
