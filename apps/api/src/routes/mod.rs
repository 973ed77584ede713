pub mod health;

use axum::{
    routing::{delete, get, post},
    Router,
};

use crate::chat;
use crate::resume;
use crate::state::AppState;
use crate::users;

pub fn build_router(state: AppState) -> Router {
    Router::new()
        .route("/", get(health::root_handler))
        .route("/health", get(health::health_handler))
        // Auth API
        .route("/auth/AddUser", post(users::handlers::handle_signup))
        .route("/auth/get-user", get(users::handlers::handle_get_user))
        .route("/auth/RemoveUser", delete(users::handlers::handle_delete_user))
        // Chat API
        .route("/chat/upload-resume", post(resume::handlers::handle_upload))
        .route(
            "/chat/get-resume-details",
            get(resume::handlers::handle_get_details),
        )
        .route("/chat/invoke", post(chat::handlers::handle_invoke))
        .with_state(state)
}
