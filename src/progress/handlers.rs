//! Progress tracking handlers

use axum::extract::{Extension, Json};
use chrono::{DateTime, NaiveDateTime, Utc};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::info;

use super::models::{Progress, UpdateProgressRequest};
use crate::auth::AuthedUser;
use crate::common::{generate_progress_id, ApiError, AppState};

const SECONDS_PER_DAY: i64 = 86_400;

/// GET /api/progress - Current counters, lazily created on first read
pub async fn get_progress(
    Extension(state_lock): Extension<Arc<RwLock<AppState>>>,
    authed: AuthedUser,
) -> Result<Json<serde_json::Value>, ApiError> {
    let state = state_lock.read().await.clone();

    // Create-if-missing relies on the UNIQUE(user_id) constraint, so two
    // concurrent first reads cannot produce two rows.
    sqlx::query(
        "INSERT INTO progress (id, user_id, last_active) VALUES (?, ?, ?) \
         ON CONFLICT(user_id) DO NOTHING",
    )
    .bind(generate_progress_id())
    .bind(&authed.id)
    .bind(Utc::now().to_rfc3339())
    .execute(&state.db)
    .await
    .map_err(ApiError::DatabaseError)?;

    let progress = fetch_progress(&state, &authed.id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Progress not found".to_string()))?;

    Ok(Json(progress.to_payload()))
}

/// POST /api/progress/update - Partial upsert of the counters
///
/// Absent fields default to 0 on create and stay untouched on update;
/// `last_active` is always refreshed.
pub async fn update_progress(
    Extension(state_lock): Extension<Arc<RwLock<AppState>>>,
    authed: AuthedUser,
    Json(payload): Json<UpdateProgressRequest>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let state = state_lock.read().await.clone();

    for (field, value) in [
        ("signsLearned", payload.signs_learned),
        ("practiceTime", payload.practice_time),
        ("streak", payload.streak),
    ] {
        if value.map_or(false, |v| v < 0) {
            return Err(ApiError::ValidationError(format!(
                "{}: must be a non-negative integer",
                field
            )));
        }
    }

    let now = Utc::now().to_rfc3339();

    sqlx::query(
        r#"
        INSERT INTO progress (id, user_id, signs_learned, practice_time, streak, last_active)
        VALUES (?, ?, ?, ?, ?, ?)
        ON CONFLICT(user_id) DO UPDATE SET
            signs_learned = COALESCE(?, progress.signs_learned),
            practice_time = COALESCE(?, progress.practice_time),
            streak = COALESCE(?, progress.streak),
            last_active = excluded.last_active
        "#,
    )
    .bind(generate_progress_id())
    .bind(&authed.id)
    .bind(payload.signs_learned.unwrap_or(0))
    .bind(payload.practice_time.unwrap_or(0))
    .bind(payload.streak.unwrap_or(0))
    .bind(&now)
    .bind(payload.signs_learned)
    .bind(payload.practice_time)
    .bind(payload.streak)
    .execute(&state.db)
    .await
    .map_err(ApiError::DatabaseError)?;

    let progress = fetch_progress(&state, &authed.id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Progress not found".to_string()))?;

    info!(user_id = %authed.id, "Progress updated");

    Ok(Json(progress.to_payload()))
}

/// POST /api/progress/streak - Apply the daily streak policy
///
/// Same day: unchanged. Exactly one day later: +1. Anything else,
/// including a last_active in the future (clock skew), breaks the
/// streak and resets it to 1.
pub async fn bump_streak(
    Extension(state_lock): Extension<Arc<RwLock<AppState>>>,
    authed: AuthedUser,
) -> Result<Json<serde_json::Value>, ApiError> {
    let state = state_lock.read().await.clone();

    let progress = fetch_progress(&state, &authed.id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Progress not found".to_string()))?;

    let now = Utc::now();
    let last_active = parse_timestamp(&progress.last_active)
        .ok_or_else(|| ApiError::InternalServer("Stored lastActive is unreadable".to_string()))?;

    let seconds_since = (now - last_active).num_seconds();
    let new_streak = streak_transition(progress.streak, seconds_since);

    sqlx::query("UPDATE progress SET streak = ?, last_active = ? WHERE user_id = ?")
        .bind(new_streak)
        .bind(now.to_rfc3339())
        .bind(&authed.id)
        .execute(&state.db)
        .await
        .map_err(ApiError::DatabaseError)?;

    let progress = fetch_progress(&state, &authed.id)
        .await?
        .ok_or_else(|| ApiError::NotFound("Progress not found".to_string()))?;

    info!(user_id = %authed.id, streak = new_streak, "Streak updated");

    Ok(Json(progress.to_payload()))
}

/// GET /api/progress/achievements - Stored achievements list
///
/// Unlike GET /api/progress this does NOT create a missing row; users
/// with no progress yet just get an empty list.
pub async fn get_achievements(
    Extension(state_lock): Extension<Arc<RwLock<AppState>>>,
    authed: AuthedUser,
) -> Result<Json<serde_json::Value>, ApiError> {
    let state = state_lock.read().await.clone();

    let progress = fetch_progress(&state, &authed.id).await?;

    let achievements = match progress {
        Some(p) => {
            serde_json::from_str(&p.achievements).unwrap_or_else(|_| serde_json::json!([]))
        }
        None => serde_json::json!([]),
    };

    Ok(Json(serde_json::json!({ "achievements": achievements })))
}

// ---- Helper Functions ----

async fn fetch_progress(state: &AppState, user_id: &str) -> Result<Option<Progress>, ApiError> {
    sqlx::query_as::<_, Progress>("SELECT * FROM progress WHERE user_id = ?")
        .bind(user_id)
        .fetch_optional(&state.db)
        .await
        .map_err(ApiError::DatabaseError)
}

/// Streak policy as a pure function of elapsed seconds since last_active
pub fn streak_transition(current: i64, seconds_since: i64) -> i64 {
    if seconds_since < 0 {
        // Clock skew: last_active is in the future. Treated as a broken
        // streak rather than silently keeping the counter.
        return 1;
    }

    match seconds_since / SECONDS_PER_DAY {
        0 => current,
        1 => current + 1,
        _ => 1,
    }
}

/// Accepts both RFC 3339 (written by these handlers) and the
/// `datetime('now')` format SQLite uses for column defaults.
pub fn parse_timestamp(value: &str) -> Option<DateTime<Utc>> {
    if let Ok(t) = DateTime::parse_from_rfc3339(value) {
        return Some(t.with_timezone(&Utc));
    }

    NaiveDateTime::parse_from_str(value, "%Y-%m-%d %H:%M:%S")
        .ok()
        .map(|t| t.and_utc())
}
