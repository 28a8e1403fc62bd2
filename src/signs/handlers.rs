//! Sign dictionary and favorites handlers

use axum::{
    extract::{Extension, Json, Path, Query},
    http::StatusCode,
    response::IntoResponse,
};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, info};

use super::models::{AddFavoriteRequest, Favorite, Sign, SignListParams, SignSearchParams};
use super::validators;
use crate::auth::{AuthedUser, MaybeAuthedUser};
use crate::common::{generate_favorite_id, ApiError, AppState, Pagination};

/// Hard cap for the quick-search endpoint
const SEARCH_RESULT_CAP: i64 = 20;

/// GET /api/signs - Paginated dictionary listing
///
/// Filters: language, category, difficulty, and a case-insensitive
/// substring `search` on the word. Ordered newest first.
pub async fn list_signs(
    Extension(state_lock): Extension<Arc<RwLock<AppState>>>,
    Query(params): Query<SignListParams>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let state = state_lock.read().await.clone();

    let validation = validators::validate_list_params(&params);
    if !validation.is_valid {
        return Err(validation.into());
    }

    let page = params.page.unwrap_or(1).max(1);
    let limit = params.limit.unwrap_or(20).clamp(1, 100);
    // i64 so an absurd page number cannot overflow u32 arithmetic
    let offset = (page as i64 - 1) * limit as i64;

    let mut where_clauses: Vec<&str> = Vec::new();
    let mut binds: Vec<String> = Vec::new();

    if let Some(language) = &params.language {
        where_clauses.push("language = ?");
        binds.push(language.clone());
    }
    if let Some(category) = &params.category {
        where_clauses.push("category = ?");
        binds.push(category.clone());
    }
    if let Some(difficulty) = &params.difficulty {
        where_clauses.push("difficulty = ?");
        binds.push(difficulty.clone());
    }
    if let Some(search) = &params.search {
        where_clauses.push("word LIKE ? ESCAPE '\\'");
        binds.push(format!("%{}%", escape_like(search)));
    }

    let where_sql = if where_clauses.is_empty() {
        String::new()
    } else {
        format!(" WHERE {}", where_clauses.join(" AND "))
    };

    let count_sql = format!("SELECT COUNT(*) FROM signs{}", where_sql);
    let mut count_query = sqlx::query_scalar::<_, i64>(&count_sql);
    for bind in &binds {
        count_query = count_query.bind(bind);
    }
    let total = count_query
        .fetch_one(&state.db)
        .await
        .map_err(ApiError::DatabaseError)?;

    let list_sql = format!(
        "SELECT * FROM signs{} ORDER BY created_at DESC, id DESC LIMIT ? OFFSET ?",
        where_sql
    );
    let mut list_query = sqlx::query_as::<_, Sign>(&list_sql);
    for bind in &binds {
        list_query = list_query.bind(bind);
    }
    let signs = list_query
        .bind(limit as i64)
        .bind(offset)
        .fetch_all(&state.db)
        .await
        .map_err(ApiError::DatabaseError)?;

    debug!(total = total, page = page, limit = limit, "Listed signs");

    Ok(Json(serde_json::json!({
        "success": true,
        "data": signs,
        "pagination": Pagination::new(page, limit, total),
    })))
}

/// GET /api/signs/search?q= - Quick substring search, no pagination
pub async fn search_signs(
    Extension(state_lock): Extension<Arc<RwLock<AppState>>>,
    Query(params): Query<SignSearchParams>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let state = state_lock.read().await.clone();

    let q = match params.q.as_deref() {
        Some(q) if !q.trim().is_empty() => q.trim().to_string(),
        _ => return Err(ApiError::BadRequest("Search query is required".to_string())),
    };

    let signs = sqlx::query_as::<_, Sign>(
        "SELECT * FROM signs WHERE word LIKE ? ESCAPE '\\' \
         ORDER BY created_at DESC, id DESC LIMIT ?",
    )
    .bind(format!("%{}%", escape_like(&q)))
    .bind(SEARCH_RESULT_CAP)
    .fetch_all(&state.db)
    .await
    .map_err(ApiError::DatabaseError)?;

    Ok(Json(serde_json::json!({
        "success": true,
        "data": signs,
    })))
}

/// GET /api/signs/:id - Single sign
///
/// Signed-in callers additionally get `isFavorite`.
pub async fn get_sign(
    Extension(state_lock): Extension<Arc<RwLock<AppState>>>,
    maybe_authed: MaybeAuthedUser,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let state = state_lock.read().await.clone();

    let sign: Option<Sign> = sqlx::query_as::<_, Sign>("SELECT * FROM signs WHERE id = ?")
        .bind(&id)
        .fetch_optional(&state.db)
        .await
        .map_err(ApiError::DatabaseError)?;

    let sign = sign.ok_or_else(|| ApiError::NotFound("Sign not found".to_string()))?;

    let mut data = serde_json::to_value(&sign)
        .map_err(|e| ApiError::InternalServer(e.to_string()))?;

    if let MaybeAuthedUser(Some(authed)) = maybe_authed {
        let favorited: Option<(String,)> = sqlx::query_as(
            "SELECT id FROM favorites WHERE user_id = ? AND sign_id = ?",
        )
        .bind(&authed.id)
        .bind(&sign.id)
        .fetch_optional(&state.db)
        .await
        .map_err(ApiError::DatabaseError)?;

        if let Some(obj) = data.as_object_mut() {
            obj.insert("isFavorite".to_string(), serde_json::json!(favorited.is_some()));
        }
    }

    Ok(Json(serde_json::json!({
        "success": true,
        "data": data,
    })))
}

/// POST /api/signs/favorites - Add a sign to the caller's favorites
///
/// Idempotent: re-adding an existing favorite returns the same record
/// instead of a duplicate-key error.
pub async fn add_favorite(
    Extension(state_lock): Extension<Arc<RwLock<AppState>>>,
    authed: AuthedUser,
    Json(payload): Json<AddFavoriteRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let state = state_lock.read().await.clone();

    let sign_id = payload
        .sign_id
        .filter(|s| !s.is_empty())
        .ok_or_else(|| ApiError::BadRequest("Sign ID is required".to_string()))?;

    let sign: Option<(String,)> = sqlx::query_as("SELECT id FROM signs WHERE id = ?")
        .bind(&sign_id)
        .fetch_optional(&state.db)
        .await
        .map_err(ApiError::DatabaseError)?;

    if sign.is_none() {
        return Err(ApiError::NotFound("Sign not found".to_string()));
    }

    sqlx::query(
        "INSERT INTO favorites (id, user_id, sign_id) VALUES (?, ?, ?) \
         ON CONFLICT(user_id, sign_id) DO NOTHING",
    )
    .bind(generate_favorite_id())
    .bind(&authed.id)
    .bind(&sign_id)
    .execute(&state.db)
    .await
    .map_err(ApiError::DatabaseError)?;

    let favorite = sqlx::query_as::<_, Favorite>(
        "SELECT * FROM favorites WHERE user_id = ? AND sign_id = ?",
    )
    .bind(&authed.id)
    .bind(&sign_id)
    .fetch_one(&state.db)
    .await
    .map_err(ApiError::DatabaseError)?;

    info!(user_id = %authed.id, sign_id = %sign_id, "Sign added to favorites");

    Ok((
        StatusCode::CREATED,
        Json(serde_json::json!({
            "success": true,
            "message": "Added to favorites",
            "data": favorite,
        })),
    ))
}

/// DELETE /api/signs/favorites/:id - Remove a favorite by sign id
///
/// Removing a favorite that does not exist is an error, not a no-op.
pub async fn remove_favorite(
    Extension(state_lock): Extension<Arc<RwLock<AppState>>>,
    authed: AuthedUser,
    Path(id): Path<String>,
) -> Result<Json<serde_json::Value>, ApiError> {
    let state = state_lock.read().await.clone();

    let result = sqlx::query("DELETE FROM favorites WHERE user_id = ? AND sign_id = ?")
        .bind(&authed.id)
        .bind(&id)
        .execute(&state.db)
        .await
        .map_err(ApiError::DatabaseError)?;

    if result.rows_affected() == 0 {
        return Err(ApiError::NotFound("Favorite not found".to_string()));
    }

    info!(user_id = %authed.id, sign_id = %id, "Sign removed from favorites");

    Ok(Json(serde_json::json!({
        "success": true,
        "message": "Removed from favorites",
    })))
}

/// GET /api/signs/favorites/all - The caller's favorited signs
pub async fn list_favorites(
    Extension(state_lock): Extension<Arc<RwLock<AppState>>>,
    authed: AuthedUser,
) -> Result<Json<serde_json::Value>, ApiError> {
    let state = state_lock.read().await.clone();

    let signs = sqlx::query_as::<_, Sign>(
        "SELECT s.* FROM signs s \
         JOIN favorites f ON f.sign_id = s.id \
         WHERE f.user_id = ? \
         ORDER BY f.created_at DESC, f.id DESC",
    )
    .bind(&authed.id)
    .fetch_all(&state.db)
    .await
    .map_err(ApiError::DatabaseError)?;

    Ok(Json(serde_json::json!({
        "success": true,
        "data": signs,
    })))
}

// ---- Helper Functions ----

/// Escape LIKE wildcards so user input matches literally
fn escape_like(input: &str) -> String {
    input
        .replace('\\', "\\\\")
        .replace('%', "\\%")
        .replace('_', "\\_")
}
