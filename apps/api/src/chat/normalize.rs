//! Input Normalizer — merges optional text and optional audio into one
//! canonical query string, transcribing audio when present.

use bytes::Bytes;
use tracing::{debug, info};

use crate::chat::Transcriber;
use crate::errors::AppError;

/// The accepted shapes of chat input, dispatched explicitly rather than via
/// scattered nullability checks.
#[derive(Debug, Clone)]
pub enum InputKind {
    Text(String),
    Audio { audio: Bytes, filename: String },
    Both {
        text: String,
        audio: Bytes,
        filename: String,
    },
}

impl InputKind {
    /// Classifies raw request fields. A request with neither text nor audio
    /// is rejected here, before any collaborator is contacted.
    pub fn from_parts(
        text: Option<String>,
        audio: Option<(Bytes, String)>,
    ) -> Result<Self, AppError> {
        let text = text.map(|t| t.trim().to_string()).filter(|t| !t.is_empty());
        match (text, audio) {
            (Some(text), None) => Ok(InputKind::Text(text)),
            (None, Some((audio, filename))) => Ok(InputKind::Audio { audio, filename }),
            (Some(text), Some((audio, filename))) => Ok(InputKind::Both {
                text,
                audio,
                filename,
            }),
            (None, None) => Err(AppError::InvalidInput(
                "Either text or audio input must be provided".to_string(),
            )),
        }
    }
}

/// The single canonical query string for one invocation. Immutable.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct NormalizedQuery {
    pub text: String,
}

/// Normalizes input to a single query, invoking the transcription
/// collaborator when audio is present. When both text and audio are supplied
/// the typed text comes first; speech is appended as supplementary context.
/// No retries here; failures propagate for classification.
pub async fn normalize(
    input: InputKind,
    transcriber: &dyn Transcriber,
) -> Result<NormalizedQuery, AppError> {
    let text = match input {
        InputKind::Text(text) => {
            debug!("Text-only input, transcription skipped");
            text
        }
        InputKind::Audio { audio, filename } => transcribe(transcriber, &audio, &filename).await?,
        InputKind::Both {
            text,
            audio,
            filename,
        } => {
            let transcript = transcribe(transcriber, &audio, &filename).await?;
            format!("{text}\n{transcript}")
        }
    };

    info!("Normalized query, {} characters", text.len());
    Ok(NormalizedQuery { text })
}

async fn transcribe(
    transcriber: &dyn Transcriber,
    audio: &[u8],
    filename: &str,
) -> Result<String, AppError> {
    let transcript = transcriber
        .transcribe(audio, filename)
        .await
        .map_err(|e| AppError::TranscriptionFailed(e.to_string()))?;

    let transcript = transcript.trim().to_string();
    if transcript.is_empty() {
        // An empty transcript is indistinguishable from a failed transcription.
        return Err(AppError::TranscriptionFailed(
            "transcription returned empty result".to_string(),
        ));
    }
    Ok(transcript)
}

#[cfg(test)]
mod tests {
    use super::*;
    use anyhow::{bail, Result};
    use async_trait::async_trait;
    use std::sync::atomic::{AtomicUsize, Ordering};

    struct MockTranscriber {
        transcript: Option<String>,
        calls: AtomicUsize,
    }

    impl MockTranscriber {
        fn returning(transcript: &str) -> Self {
            Self {
                transcript: Some(transcript.to_string()),
                calls: AtomicUsize::new(0),
            }
        }

        fn failing() -> Self {
            Self {
                transcript: None,
                calls: AtomicUsize::new(0),
            }
        }

        fn call_count(&self) -> usize {
            self.calls.load(Ordering::SeqCst)
        }
    }

    #[async_trait]
    impl Transcriber for MockTranscriber {
        async fn transcribe(&self, _audio: &[u8], _filename: &str) -> Result<String> {
            self.calls.fetch_add(1, Ordering::SeqCst);
            match &self.transcript {
                Some(t) => Ok(t.clone()),
                None => bail!("transcription service unavailable"),
            }
        }
    }

    fn audio_part(bytes: &[u8]) -> Option<(Bytes, String)> {
        Some((Bytes::copy_from_slice(bytes), "clip.wav".to_string()))
    }

    #[test]
    fn test_neither_text_nor_audio_is_invalid_input() {
        let err = InputKind::from_parts(None, None).unwrap_err();
        assert!(matches!(err, AppError::InvalidInput(_)));
    }

    #[test]
    fn test_blank_text_without_audio_is_invalid_input() {
        let err = InputKind::from_parts(Some("   ".to_string()), None).unwrap_err();
        assert!(matches!(err, AppError::InvalidInput(_)));
    }

    #[tokio::test]
    async fn test_text_only_passes_through_unchanged() {
        let transcriber = MockTranscriber::returning("unused");
        let input = InputKind::from_parts(Some("What is a closure?".to_string()), None).unwrap();

        let query = normalize(input, &transcriber).await.unwrap();

        assert_eq!(query.text, "What is a closure?");
        assert_eq!(transcriber.call_count(), 0, "transcription must not run");
    }

    #[tokio::test]
    async fn test_audio_only_uses_transcript() {
        let transcriber = MockTranscriber::returning("explain recursion");
        let input = InputKind::from_parts(None, audio_part(b"riff")).unwrap();

        let query = normalize(input, &transcriber).await.unwrap();

        assert_eq!(query.text, "explain recursion");
        assert_eq!(transcriber.call_count(), 1);
    }

    #[tokio::test]
    async fn test_both_concatenates_text_first() {
        let transcriber = MockTranscriber::returning("and give an example");
        let input =
            InputKind::from_parts(Some("What is a trait?".to_string()), audio_part(b"riff"))
                .unwrap();

        let query = normalize(input, &transcriber).await.unwrap();

        assert_eq!(query.text, "What is a trait?\nand give an example");
    }

    #[tokio::test]
    async fn test_transcriber_error_is_transcription_failed() {
        let transcriber = MockTranscriber::failing();
        let input = InputKind::from_parts(None, audio_part(b"riff")).unwrap();

        let err = normalize(input, &transcriber).await.unwrap_err();
        assert!(matches!(err, AppError::TranscriptionFailed(_)));
    }

    #[tokio::test]
    async fn test_empty_transcript_is_transcription_failed() {
        let transcriber = MockTranscriber::returning("   ");
        let input = InputKind::from_parts(None, audio_part(b"riff")).unwrap();

        let err = normalize(input, &transcriber).await.unwrap_err();
        assert!(matches!(err, AppError::TranscriptionFailed(_)));
    }
}
