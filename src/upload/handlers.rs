//! Upload handlers

use axum::extract::{Extension, Json, Multipart};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{error, info};

use super::validators;
use crate::auth::AuthedUser;
use crate::common::{generate_raw_id, ApiError, AppState};

/// POST /api/upload/avatar - Upload a profile image
///
/// Multipart `avatar` field. Returns `{url}`; the client applies it to
/// the profile with PATCH /api/users/me.
pub async fn upload_avatar(
    Extension(state_lock): Extension<Arc<RwLock<AppState>>>,
    authed: AuthedUser,
    multipart: Multipart,
) -> Result<Json<serde_json::Value>, ApiError> {
    let state = state_lock.read().await.clone();

    let data = read_field(multipart, "avatar").await?;
    validators::validate_size(data.len())?;
    let mime_type = validators::validate_image(&data)?;

    let key = format!(
        "avatars/{}_{}.{}",
        authed.id,
        generate_raw_id(8),
        validators::extension_for(mime_type)
    );

    let url = store(&state, data, &key, mime_type).await?;

    info!(user_id = %authed.id, url = %url, "Avatar uploaded");

    Ok(Json(serde_json::json!({ "url": url })))
}

/// POST /api/upload/sign-video - Upload a sign clip
///
/// Multipart `video` field.
pub async fn upload_sign_video(
    Extension(state_lock): Extension<Arc<RwLock<AppState>>>,
    authed: AuthedUser,
    multipart: Multipart,
) -> Result<Json<serde_json::Value>, ApiError> {
    let state = state_lock.read().await.clone();

    let data = read_field(multipart, "video").await?;
    validators::validate_size(data.len())?;
    let mime_type = validators::validate_video(&data)?;

    let key = format!(
        "sign-videos/{}_{}.{}",
        authed.id,
        generate_raw_id(8),
        validators::extension_for(mime_type)
    );

    let url = store(&state, data, &key, mime_type).await?;

    info!(user_id = %authed.id, url = %url, "Sign video uploaded");

    Ok(Json(serde_json::json!({ "url": url })))
}

// ---- Helper Functions ----

async fn read_field(mut multipart: Multipart, name: &str) -> Result<Vec<u8>, ApiError> {
    while let Some(field) = multipart
        .next_field()
        .await
        .map_err(|e| ApiError::BadRequest(format!("Malformed multipart body: {}", e)))?
    {
        if field.name() != Some(name) {
            continue;
        }

        let data = field
            .bytes()
            .await
            .map_err(|_| ApiError::BadRequest("Failed to read file data".to_string()))?;

        if data.is_empty() {
            return Err(ApiError::BadRequest("Uploaded file is empty".to_string()));
        }

        return Ok(data.to_vec());
    }

    Err(ApiError::BadRequest("No file uploaded".to_string()))
}

async fn store(
    state: &AppState,
    data: Vec<u8>,
    key: &str,
    content_type: &str,
) -> Result<String, ApiError> {
    state
        .storage_service
        .upload_file(data, key, content_type)
        .await
        .map_err(|e| {
            error!(error = %e, key = %key, "Storage upload failed");
            ApiError::InternalServer("Failed to upload file".to_string())
        })
}
