use axum::extract::{Query, State};
use axum::http::StatusCode;
use axum::Json;
use serde::Deserialize;
use serde_json::{json, Value};

use crate::errors::AppError;
use crate::state::AppState;
use crate::users::service;

#[derive(Deserialize)]
pub struct SignupRequest {
    pub email: String,
}

#[derive(Deserialize)]
pub struct EmailQuery {
    pub email: String,
}

/// POST /auth/AddUser
pub async fn handle_signup(
    State(state): State<AppState>,
    Json(req): Json<SignupRequest>,
) -> Result<(StatusCode, Json<Value>), AppError> {
    let user = service::signup(&state.db, &req.email).await?;
    Ok((
        StatusCode::CREATED,
        Json(json!({
            "message": "User created successfully",
            "data": { "id": user.id, "email": user.email }
        })),
    ))
}

/// GET /auth/get-user?email=
pub async fn handle_get_user(
    State(state): State<AppState>,
    Query(params): Query<EmailQuery>,
) -> Result<Json<Value>, AppError> {
    let user = service::get_user(&state.db, &params.email).await?;
    Ok(Json(json!({
        "message": "User retrieved successfully",
        "data": { "id": user.id, "email": user.email, "created_at": user.created_at }
    })))
}

/// DELETE /auth/RemoveUser?email=
pub async fn handle_delete_user(
    State(state): State<AppState>,
    Query(params): Query<EmailQuery>,
) -> Result<Json<Value>, AppError> {
    let id = service::delete_user(&state.db, &params.email).await?;
    Ok(Json(json!({
        "message": "User deleted successfully",
        "data": { "id": id }
    })))
}
