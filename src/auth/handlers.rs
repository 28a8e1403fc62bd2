//! Authentication handlers

use argon2::{
    password_hash::{rand_core::OsRng, PasswordHash, PasswordHasher, PasswordVerifier, SaltString},
    Argon2,
};
use axum::{
    extract::{Extension, Json},
    http::{HeaderMap, HeaderName, HeaderValue, StatusCode},
    response::IntoResponse,
};
use chrono::{Duration, Utc};
use jsonwebtoken::{encode, Algorithm, EncodingKey, Header};
use sqlx::SqlitePool;
use std::sync::Arc;
use tokio::sync::RwLock;
use tracing::{error, info, warn};

use super::extractors::{AuthedUser, MaybeAuthedUser};
use super::models::{Claims, LoginRequest, Session, SignupRequest, User};
use super::validators;
use crate::common::{generate_session_id, generate_user_id, safe_email_log, ApiError, AppState};

/// Sessions (and the JWTs bound to them) live for 7 days
const SESSION_TTL_DAYS: i64 = 7;

/// POST /api/auth/signup
/// Creates an account and signs the user in immediately.
///
/// # Request Body
/// ```json
/// { "email": "...", "password": "...", "name": "..." }
/// ```
pub async fn signup(
    Extension(state_lock): Extension<Arc<RwLock<AppState>>>,
    Json(payload): Json<SignupRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let state = state_lock.read().await.clone();

    let validation = validators::validate_signup(&payload);
    if !validation.is_valid {
        return Err(validation.into());
    }

    let email = payload.email.trim().to_lowercase();

    // Pre-check for a friendlier Conflict than the raw UNIQUE violation
    let existing: Option<(String,)> = sqlx::query_as("SELECT id FROM users WHERE email = ?")
        .bind(&email)
        .fetch_optional(&state.db)
        .await
        .map_err(ApiError::DatabaseError)?;

    if existing.is_some() {
        warn!(email = %safe_email_log(&email), "Signup rejected: email already registered");
        return Err(ApiError::Conflict(
            "User with this email already exists".to_string(),
        ));
    }

    let password_hash = hash_password(&payload.password)?;

    let user_id = generate_user_id();

    if let Err(e) = sqlx::query(
        "INSERT INTO users (id, email, password_hash, name) VALUES (?, ?, ?, ?)",
    )
    .bind(&user_id)
    .bind(&email)
    .bind(&password_hash)
    .bind(payload.name.trim())
    .execute(&state.db)
    .await
    {
        // Lost the race against a concurrent signup for the same email
        if e.to_string().contains("UNIQUE") {
            return Err(ApiError::Conflict(
                "User with this email already exists".to_string(),
            ));
        }
        error!(error = %e, "Database error inserting new user");
        return Err(ApiError::DatabaseError(e));
    }

    let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = ?")
        .bind(&user_id)
        .fetch_one(&state.db)
        .await
        .map_err(ApiError::DatabaseError)?;

    // Auto-signin: every signup gets a session and token right away
    let (session, token) = create_session(&state.db, &state.jwt_secret, &user.id).await?;

    info!(
        user_id = %user.id,
        email = %safe_email_log(&user.email),
        "New user signed up"
    );

    // Best-effort welcome email; never blocks or fails the signup
    let email_service = state.email_service.clone();
    let welcome_to = user.email.clone();
    let welcome_name = user.name.clone();
    tokio::spawn(async move {
        email_service
            .send_welcome_email(&welcome_to, &welcome_name)
            .await;
    });

    let body = serde_json::json!({
        "success": true,
        "message": "User created successfully",
        "data": {
            "user": user_payload(&user),
            "token": token,
            "refreshToken": token,
            "session": session_payload(&session),
        },
    });

    Ok((StatusCode::CREATED, auth_token_header(&token), Json(body)))
}

/// POST /api/auth/login
///
/// Every credential failure (unknown email, wrong password) collapses to
/// the same message so callers cannot probe which half was wrong.
pub async fn login(
    Extension(state_lock): Extension<Arc<RwLock<AppState>>>,
    Json(payload): Json<LoginRequest>,
) -> Result<impl IntoResponse, ApiError> {
    let state = state_lock.read().await.clone();

    let validation = validators::validate_login(&payload);
    if !validation.is_valid {
        return Err(validation.into());
    }

    let email = payload.email.trim().to_lowercase();

    let user: Option<User> = sqlx::query_as::<_, User>("SELECT * FROM users WHERE email = ?")
        .bind(&email)
        .fetch_optional(&state.db)
        .await
        .map_err(ApiError::DatabaseError)?;

    let user = match user {
        Some(u) => u,
        None => {
            warn!(email = %safe_email_log(&email), "Login failed: unknown email");
            return Err(invalid_credentials());
        }
    };

    if !verify_password(&payload.password, &user.password_hash) {
        warn!(user_id = %user.id, "Login failed: wrong password");
        return Err(invalid_credentials());
    }

    let (session, token) = create_session(&state.db, &state.jwt_secret, &user.id).await?;

    info!(
        user_id = %user.id,
        email = %safe_email_log(&user.email),
        "User logged in"
    );

    let body = serde_json::json!({
        "success": true,
        "message": "Login successful",
        "data": {
            "user": user_payload(&user),
            "token": token,
            "refreshToken": token,
            "session": session_payload(&session),
        },
    });

    Ok((StatusCode::OK, auth_token_header(&token), Json(body)))
}

/// POST /api/auth/logout
/// Deletes the session the presented token is bound to, revoking it.
pub async fn logout(
    Extension(state_lock): Extension<Arc<RwLock<AppState>>>,
    authed: AuthedUser,
) -> Result<Json<serde_json::Value>, ApiError> {
    let state = state_lock.read().await.clone();

    sqlx::query("DELETE FROM sessions WHERE id = ?")
        .bind(&authed.session_id)
        .execute(&state.db)
        .await
        .map_err(ApiError::DatabaseError)?;

    info!(user_id = %authed.id, session_id = %authed.session_id, "User logged out");

    Ok(Json(serde_json::json!({
        "message": "Logged out successfully"
    })))
}

/// GET /api/auth/session
/// Resolves the current session; 401 when no valid session is presented.
pub async fn get_session(
    Extension(state_lock): Extension<Arc<RwLock<AppState>>>,
    maybe_authed: MaybeAuthedUser,
) -> Result<Json<serde_json::Value>, ApiError> {
    let authed = match maybe_authed.0 {
        Some(a) => a,
        None => return Err(ApiError::Unauthorized("No active session".to_string())),
    };

    let state = state_lock.read().await.clone();

    let user = sqlx::query_as::<_, User>("SELECT * FROM users WHERE id = ?")
        .bind(&authed.id)
        .fetch_one(&state.db)
        .await
        .map_err(ApiError::DatabaseError)?;

    let session = sqlx::query_as::<_, Session>("SELECT * FROM sessions WHERE id = ?")
        .bind(&authed.session_id)
        .fetch_one(&state.db)
        .await
        .map_err(ApiError::DatabaseError)?;

    Ok(Json(serde_json::json!({
        "success": true,
        "data": {
            "user": user_payload(&user),
            "session": session_payload(&session),
        },
    })))
}

/// POST /api/auth/refresh
/// Slides the session expiry forward and issues a fresh token for it.
pub async fn refresh(
    Extension(state_lock): Extension<Arc<RwLock<AppState>>>,
    authed: AuthedUser,
) -> Result<Json<serde_json::Value>, ApiError> {
    let state = state_lock.read().await.clone();

    let expires_at = (Utc::now() + Duration::days(SESSION_TTL_DAYS)).to_rfc3339();

    sqlx::query("UPDATE sessions SET expires_at = ? WHERE id = ?")
        .bind(&expires_at)
        .bind(&authed.session_id)
        .execute(&state.db)
        .await
        .map_err(ApiError::DatabaseError)?;

    let token = encode_session_token(&state.jwt_secret, &authed.id, &authed.session_id)?;

    info!(user_id = %authed.id, session_id = %authed.session_id, "Session refreshed");

    Ok(Json(serde_json::json!({
        "success": true,
        "message": "Session refreshed successfully",
        "data": {
            "token": token,
            "refreshToken": token,
            "session": {
                "id": authed.session_id,
                "expiresAt": expires_at,
            },
        },
    })))
}

// ---- Helper Functions ----

fn invalid_credentials() -> ApiError {
    ApiError::Unauthorized("Invalid email or password".to_string())
}

fn hash_password(password: &str) -> Result<String, ApiError> {
    let salt = SaltString::generate(&mut OsRng);
    Argon2::default()
        .hash_password(password.as_bytes(), &salt)
        .map(|h| h.to_string())
        .map_err(|e| {
            error!(error = %e, "Password hashing failed");
            ApiError::InternalServer("Signup failed".to_string())
        })
}

fn verify_password(password: &str, password_hash: &str) -> bool {
    match PasswordHash::new(password_hash) {
        Ok(parsed) => Argon2::default()
            .verify_password(password.as_bytes(), &parsed)
            .is_ok(),
        Err(e) => {
            error!(error = %e, "Stored password hash is malformed");
            false
        }
    }
}

/// Insert a session row and issue the JWT bound to it
pub async fn create_session(
    pool: &SqlitePool,
    jwt_secret: &str,
    user_id: &str,
) -> Result<(Session, String), ApiError> {
    let session_id = generate_session_id();
    let expires_at = (Utc::now() + Duration::days(SESSION_TTL_DAYS)).to_rfc3339();

    sqlx::query("INSERT INTO sessions (id, user_id, expires_at) VALUES (?, ?, ?)")
        .bind(&session_id)
        .bind(user_id)
        .bind(&expires_at)
        .execute(pool)
        .await
        .map_err(ApiError::DatabaseError)?;

    let session = sqlx::query_as::<_, Session>("SELECT * FROM sessions WHERE id = ?")
        .bind(&session_id)
        .fetch_one(pool)
        .await
        .map_err(ApiError::DatabaseError)?;

    let token = encode_session_token(jwt_secret, user_id, &session_id)?;

    Ok((session, token))
}

fn encode_session_token(
    jwt_secret: &str,
    user_id: &str,
    session_id: &str,
) -> Result<String, ApiError> {
    let exp = (Utc::now() + Duration::days(SESSION_TTL_DAYS)).timestamp() as usize;
    let claims = Claims {
        sub: user_id.to_string(),
        sid: session_id.to_string(),
        exp,
    };

    encode(
        &Header::new(Algorithm::HS256),
        &claims,
        &EncodingKey::from_secret(jwt_secret.as_bytes()),
    )
    .map_err(|e| {
        error!(error = %e, "JWT encoding error");
        ApiError::InternalServer("jwt error".to_string())
    })
}

/// Mobile clients read the token from this header as well as the body
fn auth_token_header(token: &str) -> HeaderMap {
    let mut headers = HeaderMap::new();
    if let Ok(value) = HeaderValue::from_str(token) {
        headers.insert(HeaderName::from_static("set-auth-token"), value);
    }
    headers
}

/// User object in the shape the mobile app expects. Streak and counters
/// come from the progress API; auth responses report the zero defaults.
fn user_payload(user: &User) -> serde_json::Value {
    serde_json::json!({
        "id": user.id,
        "email": user.email,
        "name": user.name,
        "avatar": user.avatar,
        "learningStreak": 0,
        "signsLearned": 0,
        "practiceTime": 0,
        "level": "beginner",
        "joinedDate": user.created_at.clone().unwrap_or_else(|| Utc::now().to_rfc3339()),
    })
}

fn session_payload(session: &Session) -> serde_json::Value {
    serde_json::json!({
        "id": session.id,
        "expiresAt": session.expires_at,
    })
}
