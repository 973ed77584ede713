//! Speech-to-text collaborator adapter backed by Groq's Whisper endpoint.

use anyhow::{anyhow, bail, Result};
use async_trait::async_trait;
use reqwest::multipart::{Form, Part};
use reqwest::Client;
use serde::Deserialize;
use tracing::{debug, info};

use crate::chat::Transcriber;

const GROQ_TRANSCRIPTIONS_URL: &str = "https://api.groq.com/openai/v1/audio/transcriptions";
const WHISPER_MODEL: &str = "whisper-large-v3-turbo";

#[derive(Debug, Deserialize)]
struct TranscriptionResponse {
    text: String,
}

/// Uploads an audio clip and returns its transcript.
#[derive(Clone)]
pub struct GroqTranscriber {
    client: Client,
    api_key: String,
}

impl GroqTranscriber {
    pub fn new(api_key: String) -> Self {
        Self {
            client: Client::builder()
                .timeout(std::time::Duration::from_secs(120))
                .build()
                .expect("Failed to build HTTP client"),
            api_key,
        }
    }
}

#[async_trait]
impl Transcriber for GroqTranscriber {
    async fn transcribe(&self, audio: &[u8], filename: &str) -> Result<String> {
        if audio.is_empty() {
            bail!("audio clip is empty");
        }

        debug!(
            "Transcribing {} bytes of audio ({}) with model {}",
            audio.len(),
            filename,
            WHISPER_MODEL
        );

        let form = Form::new()
            .part(
                "file",
                Part::bytes(audio.to_vec()).file_name(filename.to_string()),
            )
            .text("model", WHISPER_MODEL);

        let response = self
            .client
            .post(GROQ_TRANSCRIPTIONS_URL)
            .bearer_auth(&self.api_key)
            .multipart(form)
            .send()
            .await?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            return Err(anyhow!("transcription API returned {status}: {body}"));
        }

        let transcription: TranscriptionResponse = response.json().await?;
        let text = transcription.text.trim().to_string();

        info!("Audio transcribed, {} characters", text.len());
        Ok(text)
    }
}
