//! Sign dictionary routes

use axum::{
    routing::{delete, get, post},
    Router,
};

use super::handlers;

/// Creates and returns the signs router
///
/// # Routes
/// - `GET /api/signs` - Paginated dictionary listing with filters
/// - `GET /api/signs/search` - Quick substring search, capped at 20
/// - `GET /api/signs/:id` - Single sign, with isFavorite when signed in
/// - `POST /api/signs/favorites` - Add a favorite (idempotent)
/// - `DELETE /api/signs/favorites/:id` - Remove a favorite
/// - `GET /api/signs/favorites/all` - All favorited signs, newest first
pub fn signs_routes() -> Router {
    Router::new()
        .route("/api/signs", get(handlers::list_signs))
        .route("/api/signs/search", get(handlers::search_signs))
        .route("/api/signs/favorites", post(handlers::add_favorite))
        .route("/api/signs/favorites/all", get(handlers::list_favorites))
        .route("/api/signs/favorites/:id", delete(handlers::remove_favorite))
        .route("/api/signs/:id", get(handlers::get_sign))
}
