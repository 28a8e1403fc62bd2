//! Progress tracking routes

use axum::{
    routing::{get, post},
    Router,
};

use super::handlers;

/// Creates and returns the progress router
///
/// # Routes
/// - `GET /api/progress` - Current counters, created on first read
/// - `POST /api/progress/update` - Partial counter upsert
/// - `POST /api/progress/streak` - Apply the daily streak policy
/// - `GET /api/progress/achievements` - Stored achievements list
pub fn progress_routes() -> Router {
    Router::new()
        .route("/api/progress", get(handlers::get_progress))
        .route("/api/progress/update", post(handlers::update_progress))
        .route("/api/progress/streak", post(handlers::bump_streak))
        .route("/api/progress/achievements", get(handlers::get_achievements))
}
