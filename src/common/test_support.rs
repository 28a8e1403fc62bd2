// Shared fixtures for module tests

use std::sync::Arc;

use sqlx::sqlite::SqlitePoolOptions;
use sqlx::SqlitePool;
use tokio::sync::RwLock;

use crate::auth::extractors::AuthedUser;
use crate::common::AppState;
use crate::services::{EmailService, StorageService, TranscriptionService};

/// Fresh in-memory database with the full schema, wrapped in the same
/// shared state the handlers see in production. External services are
/// unconfigured, so any accidental adapter call fails loudly.
pub async fn test_state() -> Arc<RwLock<AppState>> {
    let pool = SqlitePoolOptions::new()
        .max_connections(1)
        .connect("sqlite::memory:")
        .await
        .expect("Failed to open in-memory database");

    crate::common::migrations::run_migrations(&pool)
        .await
        .expect("Failed to run migrations");

    // Tests insert their own fixtures
    sqlx::query("DELETE FROM signs")
        .execute(&pool)
        .await
        .expect("Failed to clear seed signs");

    let state = AppState {
        db: pool,
        jwt_secret: "test_secret_key".to_string(),
        app_env: "development".to_string(),
        transcription_service: Arc::new(TranscriptionService::new(None, None)),
        storage_service: Arc::new(StorageService::new(None)),
        email_service: Arc::new(EmailService::new(None)),
    };

    Arc::new(RwLock::new(state))
}

pub async fn insert_user(pool: &SqlitePool, id: &str, email: &str) {
    sqlx::query("INSERT INTO users (id, email, password_hash, name) VALUES (?, ?, 'x', 'Test User')")
        .bind(id)
        .bind(email)
        .execute(pool)
        .await
        .expect("Failed to insert user");
}

pub async fn insert_sign(
    pool: &SqlitePool,
    id: &str,
    word: &str,
    language: &str,
    created_at: &str,
) {
    sqlx::query(
        "INSERT INTO signs (id, word, language, category, difficulty, video_url, thumbnail, created_at) \
         VALUES (?, ?, ?, 'test', 'beginner', 'https://cdn.test/v.mp4', 'https://cdn.test/t.jpg', ?)",
    )
    .bind(id)
    .bind(word)
    .bind(language)
    .bind(created_at)
    .execute(pool)
    .await
    .expect("Failed to insert sign");
}

pub fn authed_user(id: &str) -> AuthedUser {
    AuthedUser {
        id: id.to_string(),
        email: format!("{}@example.com", id.to_lowercase()),
        name: "Test User".to_string(),
        avatar: None,
        session_id: "K_TESTSESS1".to_string(),
    }
}
