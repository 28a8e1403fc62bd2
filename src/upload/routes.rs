//! Upload routes

use axum::{routing::post, Router};

use super::handlers;

/// Creates and returns the upload router
///
/// # Routes
/// - `POST /api/upload/avatar` - Upload a profile image
/// - `POST /api/upload/sign-video` - Upload a sign clip
pub fn upload_routes() -> Router {
    Router::new()
        .route("/api/upload/avatar", post(handlers::upload_avatar))
        .route("/api/upload/sign-video", post(handlers::upload_sign_video))
}
