//! User profile handlers

use axum::extract::{Extension, Json};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::info;

use super::models::{PreferencesRequest, UpdateProfileRequest, UserProfile};
use super::validators;
use crate::auth::AuthedUser;
use crate::common::{ApiError, AppState};

const PROFILE_COLUMNS: &str =
    "id, email, name, avatar, preferences, created_at, updated_at";

/// GET /api/users/me - Current user's profile
pub async fn get_me(
    Extension(state_lock): Extension<Arc<RwLock<AppState>>>,
    authed: AuthedUser,
) -> Result<Json<serde_json::Value>, ApiError> {
    let state = state_lock.read().await.clone();

    let profile = fetch_profile(&state, &authed.id).await?;

    Ok(Json(profile.to_payload()))
}

/// PATCH /api/users/me - Partial profile update
///
/// Only the supplied fields change; `updated_at` is always refreshed.
pub async fn update_me(
    Extension(state_lock): Extension<Arc<RwLock<AppState>>>,
    authed: AuthedUser,
    Json(payload): Json<UpdateProfileRequest>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let state = state_lock.read().await.clone();

    let validation = validators::validate_profile_update(&payload);
    if !validation.is_valid {
        return Err(validation.into());
    }

    sqlx::query(
        "UPDATE users SET \
            name = COALESCE(?, name), \
            avatar = COALESCE(?, avatar), \
            updated_at = ? \
         WHERE id = ?",
    )
    .bind(payload.name.as_ref().map(|n| n.trim().to_string()))
    .bind(&payload.avatar)
    .bind(chrono::Utc::now().to_rfc3339())
    .bind(&authed.id)
    .execute(&state.db)
    .await
    .map_err(ApiError::DatabaseError)?;

    info!(user_id = %authed.id, "User profile updated");

    let profile = fetch_profile(&state, &authed.id).await?;

    Ok(Json(profile.to_payload()))
}

/// PATCH /api/users/preferences - Replace the preferences blob
pub async fn update_preferences(
    Extension(state_lock): Extension<Arc<RwLock<AppState>>>,
    authed: AuthedUser,
    Json(payload): Json<PreferencesRequest>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let state = state_lock.read().await.clone();

    let validation = validators::validate_preferences(&payload);
    if !validation.is_valid {
        return Err(validation.into());
    }

    let blob = serde_json::to_string(&payload)
        .map_err(|_| ApiError::InternalServer("Failed to encode preferences".to_string()))?;

    sqlx::query("UPDATE users SET preferences = ?, updated_at = ? WHERE id = ?")
        .bind(&blob)
        .bind(chrono::Utc::now().to_rfc3339())
        .bind(&authed.id)
        .execute(&state.db)
        .await
        .map_err(ApiError::DatabaseError)?;

    info!(user_id = %authed.id, "User preferences updated");

    let profile = fetch_profile(&state, &authed.id).await?;

    Ok(Json(profile.to_payload()))
}

// ---- Helper Functions ----

async fn fetch_profile(state: &AppState, user_id: &str) -> Result<UserProfile, ApiError> {
    sqlx::query_as::<_, UserProfile>(&format!(
        "SELECT {} FROM users WHERE id = ?",
        PROFILE_COLUMNS
    ))
    .bind(user_id)
    .fetch_optional(&state.db)
    .await
    .map_err(ApiError::DatabaseError)?
    .ok_or_else(|| ApiError::NotFound("User not found".to_string()))
}
