//! Authentication routes

use axum::{
    routing::{get, post},
    Router,
};

use super::handlers;

/// Creates and returns the authentication router
///
/// # Routes
/// - `POST /api/auth/signup` - Create an account (email/password)
/// - `POST /api/auth/login` - Sign in, returns session-bound bearer token
/// - `POST /api/auth/logout` - Revoke the current session
/// - `GET /api/auth/session` - Resolve the current session, 401 if none
/// - `POST /api/auth/refresh` - Extend the current session
pub fn auth_routes() -> Router {
    Router::new()
        .route("/api/auth/signup", post(handlers::signup))
        .route("/api/auth/login", post(handlers::login))
        .route("/api/auth/logout", post(handlers::logout))
        .route("/api/auth/session", get(handlers::get_session))
        .route("/api/auth/refresh", post(handlers::refresh))
}
