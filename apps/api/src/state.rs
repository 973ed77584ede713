use sqlx::PgPool;

use crate::config::Config;
use crate::llm_client::LlmClient;
use crate::transcribe::GroqTranscriber;

/// Shared application state injected into all route handlers via Axum extractors.
#[derive(Clone)]
pub struct AppState {
    pub db: PgPool,
    pub llm: LlmClient,
    pub transcriber: GroqTranscriber,
    pub config: Config,
}
