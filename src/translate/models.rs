//! Translation data models

use serde::{Deserialize, Serialize};
use sqlx::FromRow;

/// Append-only history record; never updated or deleted
#[derive(FromRow, Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct Translation {
    pub id: String,
    pub user_id: String,
    pub input_text: String,
    /// "speech" or "text"
    pub input_type: String,
    pub language: String,
    pub created_at: Option<String>,
}

/// The subset of a sign returned by text-to-sign matching
#[derive(FromRow, Serialize, Deserialize, Debug, Clone)]
#[serde(rename_all = "camelCase")]
pub struct SignClip {
    pub id: String,
    pub word: String,
    pub video_url: String,
    pub thumbnail: String,
}

#[derive(Deserialize, Debug)]
#[serde(deny_unknown_fields)]
pub struct TextToSignRequest {
    pub text: String,
    pub language: Option<String>,
}

#[derive(Deserialize, Debug, Default)]
pub struct HistoryParams {
    pub page: Option<u32>,
    pub limit: Option<u32>,
}

/// Client -> server events on the realtime transcription channel.
/// Audio itself arrives as binary frames, not JSON.
#[derive(Deserialize, Debug)]
#[serde(tag = "type")]
pub enum WsClientEvent {
    #[serde(rename = "transcribe:start")]
    Start,
    #[serde(rename = "transcribe:stop")]
    Stop,
}

/// Server -> client events on the realtime transcription channel
#[derive(Serialize, Debug)]
#[serde(tag = "type")]
pub enum WsServerEvent {
    #[serde(rename = "transcribe:ready")]
    Ready,
    #[serde(rename = "transcribe:result")]
    Result { text: String },
    #[serde(rename = "transcribe:error")]
    Error { message: String },
    #[serde(rename = "transcribe:stopped")]
    Stopped,
}
