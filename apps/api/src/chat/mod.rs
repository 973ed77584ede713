//! Chat invocation pipeline — the core of the service.
//!
//! Flow: normalize input → assemble context → invoke model → parse reply,
//! sequenced by `pipeline::run_chat`. Collaborators (identity store,
//! conversation store, transcription service, generative model) sit behind
//! the traits below so the pipeline can be exercised without the network.

pub mod context;
pub mod handlers;
pub mod normalize;
pub mod parser;
pub mod pipeline;
pub mod prompts;

use anyhow::Result;
use async_trait::async_trait;
use serde::Serialize;
use uuid::Uuid;

use crate::config::ChatDefaults;
use crate::errors::AppError;
use crate::models::chat::{ChatTurn, Role};

/// Resolves an email to a stable user identifier.
#[async_trait]
pub trait IdentityStore: Send + Sync {
    async fn lookup(&self, email: &str) -> Result<Option<Uuid>>;
}

/// Persists and retrieves conversation turns. History is ordered
/// oldest-first; retrieved turns are never mutated, only appended to.
#[async_trait]
pub trait ConversationStore: Send + Sync {
    async fn history(&self, user_id: Uuid) -> Result<Vec<ChatTurn>>;
    async fn append(&self, user_id: Uuid, role: Role, message: &str) -> Result<Uuid>;
}

/// Converts an audio clip to text.
#[async_trait]
pub trait Transcriber: Send + Sync {
    async fn transcribe(&self, audio: &[u8], filename: &str) -> Result<String>;
}

/// Remote text-completion collaborator. Implementations own their retry and
/// timeout policy; the pipeline makes exactly one logical call.
#[async_trait]
pub trait CompletionModel: Send + Sync {
    async fn complete(&self, system: &str, prompt: &str, config: &ModelConfig) -> Result<String>;
}

/// Sampling configuration passed through to the model collaborator.
#[derive(Debug, Clone)]
pub struct ModelConfig {
    pub model: String,
    pub temperature: f32,
    pub top_p: f32,
}

impl ModelConfig {
    /// Merges per-request overrides onto the deployment defaults, rejecting
    /// out-of-range sampling parameters before the pipeline starts.
    pub fn resolve(
        defaults: &ChatDefaults,
        model: Option<String>,
        temperature: Option<f32>,
        top_p: Option<f32>,
    ) -> Result<Self, AppError> {
        let temperature = temperature.unwrap_or(defaults.temperature);
        if !(0.0..=2.0).contains(&temperature) {
            return Err(AppError::InvalidInput(format!(
                "temperature must be within [0, 2], got {temperature}"
            )));
        }

        let top_p = top_p.unwrap_or(defaults.top_p);
        if !(0.0..=1.0).contains(&top_p) {
            return Err(AppError::InvalidInput(format!(
                "top_p must be within [0, 1], got {top_p}"
            )));
        }

        Ok(ModelConfig {
            model: model.unwrap_or_else(|| defaults.model.clone()),
            temperature,
            top_p,
        })
    }
}

/// Terminal artifact of a chat invocation. Constructed once, never mutated.
#[derive(Debug, Clone, Serialize)]
pub struct ChatResult {
    pub explanation: String,
    pub code: Option<String>,
    pub user_id: Uuid,
}

#[cfg(test)]
mod tests {
    use super::*;

    fn defaults() -> ChatDefaults {
        ChatDefaults {
            model: "openai/gpt-oss-120b".to_string(),
            temperature: 0.6,
            top_p: 0.95,
            max_history_turns: 10,
            history_char_budget: 6000,
        }
    }

    #[test]
    fn test_resolve_uses_defaults_when_unset() {
        let config = ModelConfig::resolve(&defaults(), None, None, None).unwrap();
        assert_eq!(config.model, "openai/gpt-oss-120b");
        assert!((config.temperature - 0.6).abs() < f32::EPSILON);
        assert!((config.top_p - 0.95).abs() < f32::EPSILON);
    }

    #[test]
    fn test_resolve_applies_overrides() {
        let config = ModelConfig::resolve(
            &defaults(),
            Some("llama-3.3-70b-versatile".to_string()),
            Some(1.2),
            Some(0.5),
        )
        .unwrap();
        assert_eq!(config.model, "llama-3.3-70b-versatile");
        assert!((config.temperature - 1.2).abs() < f32::EPSILON);
        assert!((config.top_p - 0.5).abs() < f32::EPSILON);
    }

    #[test]
    fn test_resolve_rejects_out_of_range_temperature() {
        let err = ModelConfig::resolve(&defaults(), None, Some(2.5), None).unwrap_err();
        assert!(matches!(err, AppError::InvalidInput(_)));
    }

    #[test]
    fn test_resolve_rejects_out_of_range_top_p() {
        let err = ModelConfig::resolve(&defaults(), None, None, Some(1.5)).unwrap_err();
        assert!(matches!(err, AppError::InvalidInput(_)));
        let err = ModelConfig::resolve(&defaults(), None, None, Some(-0.1)).unwrap_err();
        assert!(matches!(err, AppError::InvalidInput(_)));
    }
}
