// src/common/migrations.rs
//! Database migration and schema management

use sqlx::SqlitePool;
use std::env;
use tracing::{info, warn};

/// Run all database migrations
///
/// Tables are created if missing. Set RESET_DB=true to drop and recreate
/// the whole schema (development only - this destroys data).
pub async fn run_migrations(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    let should_reset_db = env::var("RESET_DB").unwrap_or_else(|_| "false".to_string()) == "true";

    if should_reset_db {
        warn!("RESET_DB=true - Dropping all tables and recreating schema...");
        drop_all_tables(pool).await?;
        info!("Dropped old tables");
    }

    create_auth_tables(pool).await?;
    create_sign_tables(pool).await?;
    create_progress_tables(pool).await?;
    create_translation_tables(pool).await?;
    create_indexes(pool).await?;
    seed_signs(pool).await?;

    info!("Database migration completed");

    Ok(())
}

async fn drop_all_tables(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    let tables = [
        "translations",
        "progress",
        "favorites",
        "signs",
        "sessions",
        "users",
    ];

    for table in tables {
        sqlx::query(&format!("DROP TABLE IF EXISTS {}", table))
            .execute(pool)
            .await?;
    }

    Ok(())
}

/// Users and sessions
async fn create_auth_tables(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS users (
            id TEXT PRIMARY KEY,
            email TEXT NOT NULL UNIQUE COLLATE NOCASE,
            password_hash TEXT NOT NULL,
            name TEXT NOT NULL,
            avatar TEXT,
            preferences TEXT,
            created_at TEXT NOT NULL DEFAULT (datetime('now')),
            updated_at TEXT NOT NULL DEFAULT (datetime('now'))
        )
        "#,
    )
    .execute(pool)
    .await?;

    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS sessions (
            id TEXT PRIMARY KEY,
            user_id TEXT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
            expires_at TEXT NOT NULL,
            created_at TEXT NOT NULL DEFAULT (datetime('now'))
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}

/// Sign dictionary and per-user favorites
async fn create_sign_tables(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS signs (
            id TEXT PRIMARY KEY,
            word TEXT NOT NULL,
            language TEXT NOT NULL CHECK (language IN ('ASL','BSL','ISL','LSF','GSL')),
            category TEXT NOT NULL,
            difficulty TEXT NOT NULL CHECK (difficulty IN ('beginner','intermediate','advanced')),
            video_url TEXT NOT NULL,
            thumbnail TEXT NOT NULL,
            description TEXT,
            related_signs TEXT,
            created_at TEXT NOT NULL DEFAULT (datetime('now')),
            updated_at TEXT NOT NULL DEFAULT (datetime('now'))
        )
        "#,
    )
    .execute(pool)
    .await?;

    // UNIQUE(user_id, sign_id) backs the idempotent favorite upsert
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS favorites (
            id TEXT PRIMARY KEY,
            user_id TEXT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
            sign_id TEXT NOT NULL REFERENCES signs(id) ON DELETE CASCADE,
            created_at TEXT NOT NULL DEFAULT (datetime('now')),
            UNIQUE (user_id, sign_id)
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}

/// One progress row per user, lazily created on first read
async fn create_progress_tables(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS progress (
            id TEXT PRIMARY KEY,
            user_id TEXT NOT NULL UNIQUE REFERENCES users(id) ON DELETE CASCADE,
            signs_learned INTEGER NOT NULL DEFAULT 0,
            practice_time INTEGER NOT NULL DEFAULT 0,
            streak INTEGER NOT NULL DEFAULT 0,
            last_active TEXT NOT NULL DEFAULT (datetime('now')),
            achievements TEXT NOT NULL DEFAULT '[]'
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}

/// Append-only translation history
async fn create_translation_tables(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    sqlx::query(
        r#"
        CREATE TABLE IF NOT EXISTS translations (
            id TEXT PRIMARY KEY,
            user_id TEXT NOT NULL REFERENCES users(id) ON DELETE CASCADE,
            input_text TEXT NOT NULL,
            input_type TEXT NOT NULL CHECK (input_type IN ('speech','text')),
            language TEXT NOT NULL,
            created_at TEXT NOT NULL DEFAULT (datetime('now'))
        )
        "#,
    )
    .execute(pool)
    .await?;

    Ok(())
}

async fn create_indexes(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    let indexes = [
        "CREATE INDEX IF NOT EXISTS idx_sessions_user ON sessions(user_id)",
        "CREATE INDEX IF NOT EXISTS idx_signs_word ON signs(word COLLATE NOCASE)",
        "CREATE INDEX IF NOT EXISTS idx_signs_language ON signs(language)",
        "CREATE INDEX IF NOT EXISTS idx_signs_created ON signs(created_at)",
        "CREATE INDEX IF NOT EXISTS idx_favorites_user ON favorites(user_id)",
        "CREATE INDEX IF NOT EXISTS idx_translations_user ON translations(user_id, created_at)",
    ];

    for index in indexes {
        sqlx::query(index).execute(pool).await?;
    }

    Ok(())
}

/// Seed a starter dictionary so a fresh install has something to search.
/// Skipped when any signs already exist.
async fn seed_signs(pool: &SqlitePool) -> Result<(), sqlx::Error> {
    let count: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM signs")
        .fetch_one(pool)
        .await?;

    if count > 0 {
        return Ok(());
    }

    let starter: [(&str, &str, &str); 10] = [
        ("hello", "greetings", "beginner"),
        ("goodbye", "greetings", "beginner"),
        ("please", "courtesy", "beginner"),
        ("thank", "courtesy", "beginner"),
        ("sorry", "courtesy", "beginner"),
        ("help", "daily", "beginner"),
        ("water", "daily", "beginner"),
        ("eat", "daily", "beginner"),
        ("family", "people", "intermediate"),
        ("friend", "people", "intermediate"),
    ];

    for (word, category, difficulty) in starter {
        sqlx::query(
            r#"
            INSERT INTO signs (id, word, language, category, difficulty, video_url, thumbnail)
            VALUES (?, ?, 'ASL', ?, ?, ?, ?)
            "#,
        )
        .bind(super::generate_sign_id())
        .bind(word)
        .bind(category)
        .bind(difficulty)
        .bind(format!("https://cdn.signnova.app/signs/asl/{}.mp4", word))
        .bind(format!("https://cdn.signnova.app/signs/asl/{}.jpg", word))
        .execute(pool)
        .await?;
    }

    info!(count = starter.len(), "Seeded starter sign dictionary");

    Ok(())
}
