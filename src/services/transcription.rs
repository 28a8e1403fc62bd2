// src/services/transcription.rs
//! Speech-to-text adapter backed by the OpenAI Whisper API.
//!
//! Every call is a single finite request with an in-memory audio buffer;
//! no retries, no streaming to the upstream API. Callers enforce size and
//! MIME-type limits before the buffer reaches this adapter.

use reqwest::multipart::{Form, Part};
use reqwest::Client;
use serde::Deserialize;
use thiserror::Error;
use tracing::{debug, error};

#[derive(Debug, Error)]
pub enum TranscriptionError {
    #[error("Transcription API key not configured")]
    NotConfigured,

    #[error("Transcription request failed: {0}")]
    RequestFailed(String),

    #[error("Transcription API error: {0}")]
    ApiError(String),
}

#[derive(Deserialize)]
struct WhisperResponse {
    text: String,
}

#[derive(Debug)]
pub struct TranscriptionService {
    api_key: Option<String>,
    base_url: String,
    model: String,
    client: Client,
}

impl TranscriptionService {
    pub fn new(api_key: Option<String>, base_url: Option<String>) -> Self {
        let client = Client::builder()
            .timeout(std::time::Duration::from_secs(120))
            .build()
            .unwrap_or_else(|_| Client::new());

        Self {
            api_key,
            base_url: base_url.unwrap_or_else(|| "https://api.openai.com".to_string()),
            model: "whisper-1".to_string(),
            client,
        }
    }

    /// Transcribe a finite audio buffer to plain text.
    pub async fn transcribe(
        &self,
        audio: Vec<u8>,
        mime_type: &str,
    ) -> Result<String, TranscriptionError> {
        let api_key = self
            .api_key
            .as_deref()
            .ok_or(TranscriptionError::NotConfigured)?;

        let filename = format!("audio.{}", extension_for_mime(mime_type));

        let part = Part::bytes(audio)
            .file_name(filename)
            .mime_str(mime_type)
            .map_err(|e| TranscriptionError::RequestFailed(e.to_string()))?;

        let form = Form::new()
            .part("file", part)
            .text("model", self.model.clone())
            .text("language", "en");

        let url = format!("{}/v1/audio/transcriptions", self.base_url);

        debug!(model = %self.model, mime_type = %mime_type, "Sending audio to Whisper");

        let response = self
            .client
            .post(&url)
            .bearer_auth(api_key)
            .multipart(form)
            .send()
            .await
            .map_err(|e| {
                error!(error = %e, "HTTP error contacting transcription API");
                TranscriptionError::RequestFailed(e.to_string())
            })?;

        let status = response.status();
        if !status.is_success() {
            let body = response.text().await.unwrap_or_default();
            error!(http_status = %status, body = %body, "Transcription API returned error");
            return Err(TranscriptionError::ApiError(format!(
                "status {}",
                status.as_u16()
            )));
        }

        let parsed: WhisperResponse = response
            .json()
            .await
            .map_err(|e| TranscriptionError::ApiError(e.to_string()))?;

        Ok(parsed.text)
    }
}

/// File extension Whisper expects for each allow-listed MIME type
fn extension_for_mime(mime_type: &str) -> &'static str {
    match mime_type {
        "audio/webm" => "webm",
        "audio/mp3" | "audio/mpeg" => "mp3",
        "audio/wav" => "wav",
        "audio/m4a" | "audio/x-m4a" => "m4a",
        "audio/aac" => "aac",
        "audio/3gpp" => "3gp",
        "audio/ogg" => "ogg",
        "audio/flac" => "flac",
        _ => "webm",
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_extension_mapping_covers_allow_list() {
        assert_eq!(extension_for_mime("audio/mpeg"), "mp3");
        assert_eq!(extension_for_mime("audio/x-m4a"), "m4a");
        assert_eq!(extension_for_mime("audio/flac"), "flac");
        // Unknown types fall back to webm, the recorder default
        assert_eq!(extension_for_mime("audio/unknown"), "webm");
    }

    #[tokio::test]
    async fn test_transcribe_without_api_key_fails_fast() {
        let service = TranscriptionService::new(None, None);
        let result = service.transcribe(vec![0u8; 16], "audio/webm").await;
        assert!(matches!(result, Err(TranscriptionError::NotConfigured)));
    }
}
