//! Authentication extractors for Axum

use async_trait::async_trait;
use axum::{
    extract::{Extension, FromRequestParts},
    http::{header::AUTHORIZATION, request::Parts},
};
use chrono::{DateTime, Utc};
use jsonwebtoken::{decode, Algorithm, DecodingKey, Validation};
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{debug, error, warn};

use super::models::{Claims, Session, User};
use crate::common::{safe_email_log, ApiError, AppState};

/// Authenticated user extractor
///
/// Validates the bearer JWT, checks that the session it is bound to still
/// exists and has not expired, then loads the user row.
#[derive(Debug, Clone)]
pub struct AuthedUser {
    pub id: String,
    pub email: String,
    pub name: String,
    pub avatar: Option<String>,
    pub session_id: String,
}

/// Optional variant of [`AuthedUser`]: resolves to `None` instead of
/// rejecting when no valid session is present. Used by routes that only
/// personalize their response for signed-in callers.
#[derive(Debug)]
pub struct MaybeAuthedUser(pub Option<AuthedUser>);

/// Resolve a bearer token against the sessions and users tables.
/// This is also used by the realtime transcription channel, which
/// authenticates once at handshake time.
pub async fn resolve_token(state: &AppState, token: &str) -> Result<AuthedUser, ApiError> {
    let bare_token = token.strip_prefix("Bearer ").unwrap_or(token);

    let decoded = decode::<Claims>(
        bare_token,
        &DecodingKey::from_secret(state.jwt_secret.as_bytes()),
        &Validation::new(Algorithm::HS256),
    )
    .map_err(|e| {
        warn!(error = %e, "JWT token validation failed");
        ApiError::Unauthorized("invalid token".into())
    })?;

    let claims = decoded.claims;

    let session: Option<Session> =
        sqlx::query_as::<_, Session>("SELECT * FROM sessions WHERE id = ?")
            .bind(&claims.sid)
            .fetch_optional(&state.db)
            .await
            .map_err(|e| {
                error!(error = %e, session_id = %claims.sid, "Database error during session lookup");
                ApiError::DatabaseError(e)
            })?;

    let session = match session {
        Some(s) => s,
        None => {
            warn!(session_id = %claims.sid, "Authentication failed: session revoked or unknown");
            return Err(ApiError::Unauthorized("session not found".into()));
        }
    };

    if session_expired(&session.expires_at) {
        warn!(session_id = %session.id, "Authentication failed: session expired");
        return Err(ApiError::Unauthorized("session expired".into()));
    }

    let user: Option<User> = sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = ?")
        .bind(&claims.sub)
        .fetch_optional(&state.db)
        .await
        .map_err(|e| {
            error!(error = %e, user_id = %claims.sub, "Database error during user lookup");
            ApiError::DatabaseError(e)
        })?;

    match user {
        Some(u) => {
            debug!(
                user_id = %u.id,
                email = %safe_email_log(&u.email),
                "User authentication successful"
            );
            Ok(AuthedUser {
                id: u.id,
                email: u.email,
                name: u.name,
                avatar: u.avatar,
                session_id: session.id,
            })
        }
        None => {
            warn!(user_id = %claims.sub, "Authentication failed: user not found");
            Err(ApiError::Unauthorized("user not found".into()))
        }
    }
}

/// True when the stored RFC 3339 expiry is in the past. Unparseable
/// timestamps count as expired; better to re-login than to trust them.
pub fn session_expired(expires_at: &str) -> bool {
    match DateTime::parse_from_rfc3339(expires_at) {
        Ok(t) => t.with_timezone(&Utc) < Utc::now(),
        Err(_) => true,
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for AuthedUser
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        let Extension(state_lock): Extension<Arc<RwLock<AppState>>> =
            Extension::from_request_parts(parts, state)
                .await
                .map_err(|_| ApiError::InternalServer("missing app state".to_string()))?;

        let app_state = state_lock.read().await.clone();

        let token = parts
            .headers
            .get(AUTHORIZATION)
            .and_then(|h| h.to_str().ok())
            .map(|s| s.to_string());

        let token = match token {
            Some(t) => t,
            None => {
                warn!("Authentication failed: missing Authorization header");
                return Err(ApiError::Unauthorized("missing auth".into()));
            }
        };

        resolve_token(&app_state, &token).await
    }
}

#[async_trait]
impl<S> FromRequestParts<S> for MaybeAuthedUser
where
    S: Send + Sync,
{
    type Rejection = ApiError;

    async fn from_request_parts(parts: &mut Parts, state: &S) -> Result<Self, Self::Rejection> {
        match AuthedUser::from_request_parts(parts, state).await {
            Ok(user) => Ok(MaybeAuthedUser(Some(user))),
            // Absent or invalid credentials just mean "anonymous caller"
            Err(ApiError::Unauthorized(_)) => Ok(MaybeAuthedUser(None)),
            Err(e) => Err(e),
        }
    }
}
