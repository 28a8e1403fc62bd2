//! User profile routes

use axum::{
    routing::{get, patch},
    Router,
};

use super::handlers;

/// Creates and returns the user router
///
/// # Routes
/// - `GET /api/users/me` - Current user's profile
/// - `PATCH /api/users/me` - Partial profile update
/// - `PATCH /api/users/preferences` - Replace preferences
pub fn user_routes() -> Router {
    Router::new()
        .route("/api/users/me", get(handlers::get_me).patch(handlers::update_me))
        .route("/api/users/preferences", patch(handlers::update_preferences))
}
