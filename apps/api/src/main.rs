mod chat;
mod config;
mod db;
mod errors;
mod extract;
mod llm_client;
mod models;
mod resume;
mod routes;
mod state;
mod store;
mod transcribe;
mod users;

use anyhow::Result;
use std::net::SocketAddr;
use tower_http::{cors::CorsLayer, trace::TraceLayer};
use tracing::info;
use tracing_subscriber::{layer::SubscriberExt, util::SubscriberInitExt, EnvFilter};

use crate::config::Config;
use crate::db::{create_pool, init_schema};
use crate::llm_client::LlmClient;
use crate::routes::build_router;
use crate::state::AppState;
use crate::transcribe::GroqTranscriber;

#[tokio::main]
async fn main() -> Result<()> {
    // Load configuration first (fails on missing required env vars)
    let config = Config::from_env()?;

    // Initialize structured logging
    tracing_subscriber::registry()
        .with(
            EnvFilter::try_from_default_env()
                .unwrap_or_else(|_| default_env_filter(&config.rust_log)),
        )
        .with(tracing_subscriber::fmt::layer())
        .init();

    info!("Starting ProxyTool API v{}", env!("CARGO_PKG_VERSION"));

    // Initialize PostgreSQL
    let pool = create_pool(&config.database_url).await?;
    init_schema(&pool).await?;

    // Initialize collaborator clients
    let llm = LlmClient::new(config.groq_api_key.clone());
    info!("LLM client initialized (default model: {})", config.chat.model);

    let transcriber = GroqTranscriber::new(config.groq_api_key.clone());
    info!("Transcription client initialized");

    // Build app state
    let state = AppState {
        db: pool,
        llm,
        transcriber,
        config: config.clone(),
    };

    // Build router
    let app = build_router(state)
        .layer(TraceLayer::new_for_http())
        .layer(CorsLayer::permissive()); // TODO: tighten CORS in production

    let addr: SocketAddr = format!("0.0.0.0:{}", config.port).parse()?;
    info!("Listening on {addr}");

    let listener = tokio::net::TcpListener::bind(addr).await?;
    axum::serve(listener, app).await?;

    Ok(())
}

/// Default log filter scoped to this crate. Tracing targets are module
/// paths, so the hyphenated package name must become an underscored crate
/// name or the directive matches nothing.
fn default_env_filter(level: &str) -> EnvFilter {
    let crate_target = env!("CARGO_PKG_NAME").replace('-', "_");
    EnvFilter::new(format!("{crate_target}={level}"))
}

#[cfg(test)]
mod tests {
    use super::*;
    use tracing::Level;

    #[test]
    fn test_default_log_filter_enables_crate_module_targets() {
        let subscriber = tracing_subscriber::registry().with(default_env_filter("info"));
        tracing::subscriber::with_default(subscriber, || {
            assert!(
                tracing::event_enabled!(target: "proxytool_api::chat::pipeline", Level::WARN),
                "default filter must not suppress crate logs"
            );
            assert!(tracing::event_enabled!(target: "proxytool_api::errors", Level::ERROR));
        });
    }

    #[test]
    fn test_default_log_filter_scopes_out_other_crates() {
        let subscriber = tracing_subscriber::registry().with(default_env_filter("info"));
        tracing::subscriber::with_default(subscriber, || {
            assert!(!tracing::event_enabled!(target: "hyper::proto", Level::DEBUG));
        });
    }
}
