use axum::{
    http::StatusCode,
    response::{IntoResponse, Response},
    Json,
};
use serde_json::json;
use thiserror::Error;

/// Application-level error type.
/// Implements `IntoResponse` so Axum handlers can return `Result<T, AppError>`.
///
/// The first two variants are caller errors and are detected before any
/// collaborator call. The pipeline variants abort the chat invocation at the
/// failing stage; no partial result is ever returned alongside one of them.
#[derive(Debug, Error)]
pub enum AppError {
    #[error("Invalid input: {0}")]
    InvalidInput(String),

    #[error("User not found: {0}")]
    UserNotFound(String),

    #[error("Email already registered: {0}")]
    EmailExists(String),

    #[error("Validation error: {0}")]
    Validation(String),

    #[error("Transcription failed: {0}")]
    TranscriptionFailed(String),

    #[error("Conversation context unavailable: {0}")]
    ContextUnavailable(String),

    #[error("Model invocation failed: {0}")]
    ModelInvocationFailed(String),

    #[error("Model returned an empty response")]
    EmptyModelResponse,

    #[error("Database error: {0}")]
    Database(#[from] sqlx::Error),

    #[error("Internal server error: {0}")]
    Internal(#[from] anyhow::Error),
}

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, kind, message) = match &self {
            AppError::InvalidInput(msg) => (StatusCode::BAD_REQUEST, "INVALID_INPUT", msg.clone()),
            AppError::UserNotFound(email) => (
                StatusCode::NOT_FOUND,
                "USER_NOT_FOUND",
                format!("No user registered for email '{email}'"),
            ),
            AppError::EmailExists(email) => (
                StatusCode::CONFLICT,
                "EMAIL_EXISTS",
                format!("Email '{email}' is already registered"),
            ),
            AppError::Validation(msg) => (StatusCode::BAD_REQUEST, "VALIDATION_ERROR", msg.clone()),
            AppError::TranscriptionFailed(msg) => {
                tracing::error!("Transcription failed: {msg}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "TRANSCRIPTION_FAILED",
                    "Failed to transcribe the supplied audio".to_string(),
                )
            }
            AppError::ContextUnavailable(msg) => {
                tracing::error!("Context unavailable: {msg}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "CONTEXT_UNAVAILABLE",
                    "Conversation history could not be loaded".to_string(),
                )
            }
            AppError::ModelInvocationFailed(msg) => {
                tracing::error!("Model invocation failed: {msg}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "MODEL_INVOCATION_FAILED",
                    "The language model could not be reached".to_string(),
                )
            }
            AppError::EmptyModelResponse => {
                tracing::error!("Model returned an empty response");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "EMPTY_MODEL_RESPONSE",
                    "The language model returned an empty response".to_string(),
                )
            }
            AppError::Database(e) => {
                tracing::error!("Database error: {e}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "DATABASE_ERROR",
                    "A database error occurred".to_string(),
                )
            }
            AppError::Internal(e) => {
                tracing::error!("Internal error: {e:?}");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal server error occurred".to_string(),
                )
            }
        };

        let body = Json(json!({
            "error": kind,
            "message": message
        }));

        (status, body).into_response()
    }
}
