use anyhow::{Context, Result};

/// Application configuration loaded from environment variables.
/// Startup fails if required variables are missing.
#[derive(Debug, Clone)]
pub struct Config {
    pub database_url: String,
    pub groq_api_key: String,
    pub port: u16,
    pub rust_log: String,
    pub chat: ChatDefaults,
}

/// Deployment-level defaults for the chat pipeline.
/// Per-request overrides are validated in `ModelConfig::resolve`.
#[derive(Debug, Clone)]
pub struct ChatDefaults {
    pub model: String,
    pub temperature: f32,
    pub top_p: f32,
    /// Maximum number of prior turns rendered into the prompt.
    pub max_history_turns: usize,
    /// Character budget for the rendered history section. The resume block
    /// and the current query are never counted against this.
    pub history_char_budget: usize,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok(); // load .env if present; ignore if missing

        Ok(Config {
            database_url: require_env("DATABASE_URL")?,
            groq_api_key: require_env("GROQ_API_KEY")?,
            port: env_or("PORT", "8000")
                .parse::<u16>()
                .context("PORT must be a valid port number")?,
            rust_log: env_or("RUST_LOG", "info"),
            chat: ChatDefaults {
                model: env_or("CHAT_MODEL", "openai/gpt-oss-120b"),
                temperature: env_or("CHAT_TEMPERATURE", "0.6")
                    .parse::<f32>()
                    .context("CHAT_TEMPERATURE must be a float")?,
                top_p: env_or("CHAT_TOP_P", "0.95")
                    .parse::<f32>()
                    .context("CHAT_TOP_P must be a float")?,
                max_history_turns: env_or("CHAT_HISTORY_TURNS", "10")
                    .parse::<usize>()
                    .context("CHAT_HISTORY_TURNS must be an integer")?,
                history_char_budget: env_or("CHAT_HISTORY_CHAR_BUDGET", "6000")
                    .parse::<usize>()
                    .context("CHAT_HISTORY_CHAR_BUDGET must be an integer")?,
            },
        })
    }
}

fn require_env(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("Required environment variable '{key}' is not set"))
}

fn env_or(key: &str, default: &str) -> String {
    std::env::var(key).unwrap_or_else(|_| default.to_string())
}
