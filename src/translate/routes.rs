//! Translation routes

use axum::{
    routing::{get, post},
    Router,
};

use super::{handlers, websocket};

/// Creates and returns the translation router
///
/// # Routes
/// - `POST /api/translate/transcribe` - Speech to text (multipart audio)
/// - `POST /api/translate/text-to-sign` - Text to sign clips
/// - `GET /api/translate/history` - Paginated translation history
/// - `GET /api/translate/stream` - Realtime transcription channel
pub fn translate_routes() -> Router {
    Router::new()
        .route("/api/translate/transcribe", post(handlers::transcribe))
        .route("/api/translate/text-to-sign", post(handlers::text_to_sign))
        .route("/api/translate/history", get(handlers::get_history))
        .route("/api/translate/stream", get(websocket::websocket_handler))
}
