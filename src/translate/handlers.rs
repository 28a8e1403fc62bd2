//! Translation HTTP handlers

use axum::extract::{Extension, Json, Multipart, Query};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{error, info};

use super::models::{HistoryParams, TextToSignRequest, Translation};
use super::{translation, validators};
use crate::auth::AuthedUser;
use crate::common::{generate_translation_id, ApiError, AppState, Pagination};
use crate::signs::validators::is_valid_language;

/// POST /api/translate/transcribe - Speech to text
///
/// Multipart upload with an `audio` field. The MIME type and size are
/// checked before the buffer is handed to the transcription adapter.
pub async fn transcribe(
    Extension(state_lock): Extension<Arc<RwLock<AppState>>>,
    authed: AuthedUser,
    mut multipart: Multipart,
) -> Result<Json<serde_json::Value>, ApiError> {
    let state = state_lock.read().await.clone();

    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::BadRequest(format!("Malformed multipart body: {}", e)))?
    {
        if field.name() != Some("audio") {
            continue;
        }

        let mime_type = field
            .content_type()
            .ok_or_else(|| ApiError::BadRequest("Audio content type is required".to_string()))?
            .to_string();

        let data = field
            .bytes()
            .await
            .map_err(|_| ApiError::BadRequest("Failed to read audio data".to_string()))?;

        validators::validate_audio_upload(&mime_type, data.len())?;

        let text = state
            .transcription_service
            .transcribe(data.to_vec(), &mime_type)
            .await
            .map_err(|e| {
                error!(error = %e, user_id = %authed.id, "Transcription failed");
                ApiError::InternalServer("Failed to transcribe audio".to_string())
            })?;

        // The speech path does not know the spoken content's sign
        // language; history records default to ASL.
        record_translation(&state, &authed.id, &text, "speech", "ASL").await?;

        info!(user_id = %authed.id, "Audio transcribed");

        return Ok(Json(serde_json::json!({ "text": text })));
    }

    Err(ApiError::BadRequest("No audio file provided".to_string()))
}

/// POST /api/translate/text-to-sign - Text to sign clips
pub async fn text_to_sign(
    Extension(state_lock): Extension<Arc<RwLock<AppState>>>,
    authed: AuthedUser,
    Json(payload): Json<TextToSignRequest>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let state = state_lock.read().await.clone();

    if payload.text.trim().is_empty() {
        return Err(ApiError::BadRequest("Text is required".to_string()));
    }

    let language = payload.language.unwrap_or_else(|| "ASL".to_string());
    if !is_valid_language(&language) {
        return Err(ApiError::ValidationError(
            "language: Unknown sign language".to_string(),
        ));
    }

    let result = translation::text_to_sign(&state.db, &payload.text, &language).await?;

    record_translation(&state, &authed.id, &payload.text, "text", &language).await?;

    info!(user_id = %authed.id, language = %language, "Text translated to signs");

    Ok(Json(result))
}

/// GET /api/translate/history - Paginated translation history
pub async fn get_history(
    Extension(state_lock): Extension<Arc<RwLock<AppState>>>,
    authed: AuthedUser,
    Query(params): Query<HistoryParams>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let state = state_lock.read().await.clone();

    let page = params.page.unwrap_or(1).max(1);
    let limit = params.limit.unwrap_or(20).clamp(1, 100);
    // i64 so an absurd page number cannot overflow u32 arithmetic
    let offset = (page as i64 - 1) * limit as i64;

    let total: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM translations WHERE user_id = ?")
        .bind(&authed.id)
        .fetch_one(&state.db)
        .await
        .map_err(ApiError::DatabaseError)?;

    let translations = sqlx::query_as::<_, Translation>(
        "SELECT * FROM translations WHERE user_id = ? \
         ORDER BY created_at DESC, id DESC LIMIT ? OFFSET ?",
    )
    .bind(&authed.id)
    .bind(limit as i64)
    .bind(offset)
    .fetch_all(&state.db)
    .await
    .map_err(ApiError::DatabaseError)?;

    Ok(Json(serde_json::json!({
        "translations": translations,
        "pagination": Pagination::new(page, limit, total),
    })))
}

// ---- Helper Functions ----

async fn record_translation(
    state: &AppState,
    user_id: &str,
    input_text: &str,
    input_type: &str,
    language: &str,
) -> Result<(), ApiError> {
    sqlx::query(
        "INSERT INTO translations (id, user_id, input_text, input_type, language) \
         VALUES (?, ?, ?, ?, ?)",
    )
    .bind(generate_translation_id())
    .bind(user_id)
    .bind(input_text)
    .bind(input_type)
    .bind(language)
    .execute(&state.db)
    .await
    .map_err(ApiError::DatabaseError)?;

    Ok(())
}
