// src/main.rs
use axum::{extract::DefaultBodyLimit, extract::Extension, routing::get, Json, Router};
use dotenv::dotenv;
use sqlx::sqlite::{SqliteConnectOptions, SqlitePoolOptions};
use std::env;
use std::path::PathBuf;
use std::{net::SocketAddr, str::FromStr, sync::Arc};
use tokio::{net::TcpListener, sync::RwLock};
use tower_http::{
    cors::{AllowOrigin, CorsLayer},
    trace::TraceLayer,
};
use tracing::info;
use tracing_subscriber::EnvFilter;

// ============================================================================
// MODULE IMPORTS
// ============================================================================

mod auth;
mod common;
mod progress;
mod services;
mod signs;
mod translate;
mod upload;
mod users;

// ============================================================================
// COMMON IMPORTS
// ============================================================================

use common::AppState;
use services::{EmailConfig, EmailService, StorageConfig, StorageService, TranscriptionService};

// The streaming transcribe endpoint accepts 25MB audio files, so the
// body limit sits just above that; per-route caps do the real policing.
const MAX_BODY_BYTES: usize = 26 * 1024 * 1024;

// ============================================================================
// MAIN APPLICATION ENTRY POINT
// ============================================================================

#[tokio::main]
async fn main() -> anyhow::Result<()> {
    dotenv().ok();

    tracing_subscriber::fmt()
        .with_env_filter(
            EnvFilter::try_from_default_env().unwrap_or_else(|_| EnvFilter::new("info")),
        )
        .with_target(false)
        .init();

    // ========================================================================
    // ENVIRONMENT CONFIGURATION
    // ========================================================================

    let database_url =
        env::var("DATABASE_URL").unwrap_or_else(|_| "sqlite://signnova.db".to_string());
    let jwt_secret =
        env::var("JWT_SECRET").unwrap_or_else(|_| "replace_with_strong_secret".to_string());
    let app_env = env::var("APP_ENV").unwrap_or_else(|_| "development".to_string());
    let openai_api_key = env::var("OPENAI_API_KEY").ok();

    let aws_access_key_id = env::var("AWS_ACCESS_KEY_ID").ok();
    let aws_secret_access_key = env::var("AWS_SECRET_ACCESS_KEY").ok();
    let aws_region = env::var("AWS_REGION").unwrap_or_else(|_| "us-east-1".to_string());
    let s3_bucket = env::var("S3_BUCKET").ok();
    let s3_public_base_url = env::var("S3_PUBLIC_BASE_URL").ok();
    let ses_from_address = env::var("SES_FROM_ADDRESS").ok();

    // ========================================================================
    // DATABASE SETUP
    // ========================================================================

    if let Some(path_part) = database_url.strip_prefix("sqlite://") {
        let path_without_params = path_part.split('?').next().unwrap_or("");
        if !path_without_params.is_empty() && !path_without_params.starts_with(':') {
            let db_path = PathBuf::from(path_without_params);
            if let Some(parent) = db_path.parent() {
                if !parent.as_os_str().is_empty() {
                    tokio::fs::create_dir_all(parent).await?;
                }
            }
        }
    }

    let connect_options = SqliteConnectOptions::from_str(&database_url)?.create_if_missing(true);
    let pool = SqlitePoolOptions::new()
        .connect_with(connect_options)
        .await?;

    // Run database migrations
    common::migrations::run_migrations(&pool).await?;

    // ========================================================================
    // SERVICE INITIALIZATION
    // ========================================================================

    let transcription_service = Arc::new(TranscriptionService::new(openai_api_key, None));
    info!("TranscriptionService initialized");

    let storage_config = match (&aws_access_key_id, &aws_secret_access_key, &s3_bucket) {
        (Some(key), Some(secret), Some(bucket)) => Some(StorageConfig {
            access_key_id: key.clone(),
            secret_access_key: secret.clone(),
            region: aws_region.clone(),
            bucket: bucket.clone(),
            public_base_url: s3_public_base_url,
        }),
        _ => {
            info!("S3 credentials missing, uploads disabled");
            None
        }
    };
    let storage_service = Arc::new(StorageService::new(storage_config));
    info!("StorageService initialized");

    let email_config = match (&aws_access_key_id, &aws_secret_access_key, &ses_from_address) {
        (Some(key), Some(secret), Some(from)) => Some(EmailConfig {
            access_key_id: key.clone(),
            secret_access_key: secret.clone(),
            region: aws_region,
            from_address: from.clone(),
        }),
        _ => {
            info!("SES credentials missing, transactional email disabled");
            None
        }
    };
    let email_service = Arc::new(EmailService::new(email_config));
    info!("EmailService initialized");

    // ========================================================================
    // APPLICATION STATE
    // ========================================================================

    let app_state = AppState {
        db: pool.clone(),
        jwt_secret,
        app_env,
        transcription_service,
        storage_service,
        email_service,
    };

    let development = app_state.is_development();

    // Development mode surfaces error detail in 500 responses;
    // production keeps it in the logs only
    common::error::set_verbose_errors(development);

    let shared = Arc::new(RwLock::new(app_state));

    // ========================================================================
    // ROUTER COMPOSITION
    // ========================================================================

    let app = Router::new()
        .route("/api/health", get(health))
        // ====================================================================
        // AUTHENTICATION ROUTES
        // ====================================================================
        .merge(auth::auth_routes())
        // ====================================================================
        // USER ROUTES (Profile, Preferences)
        // ====================================================================
        .merge(users::user_routes())
        // ====================================================================
        // SIGN DICTIONARY ROUTES (Browse, Search, Favorites)
        // ====================================================================
        .merge(signs::signs_routes())
        // ====================================================================
        // PROGRESS ROUTES (Counters, Streak, Achievements)
        // ====================================================================
        .merge(progress::progress_routes())
        // ====================================================================
        // TRANSLATION ROUTES (Transcribe, Text-to-Sign, History, Stream)
        // ====================================================================
        .merge(translate::translate_routes())
        // ====================================================================
        // UPLOAD ROUTES (Avatar, Sign Video)
        // ====================================================================
        .merge(upload::upload_routes())
        // ====================================================================
        // MIDDLEWARE AND LAYERS
        // ====================================================================
        .layer(DefaultBodyLimit::max(MAX_BODY_BYTES))
        .layer(Extension(shared.clone()))
        .layer({
            // Development mirrors whatever origin calls in, so local
            // tooling on arbitrary ports works; production only admits
            // the configured allow-list.
            let allowed_origins = if development {
                AllowOrigin::mirror_request()
            } else {
                let cors_origins = env::var("CORS_ORIGINS").unwrap_or_else(|_| {
                    "http://localhost:3000,http://localhost:19006".to_string()
                });

                let origins: Vec<axum::http::HeaderValue> = cors_origins
                    .split(',')
                    .filter_map(|origin| origin.trim().parse().ok())
                    .collect();

                AllowOrigin::list(origins)
            };

            CorsLayer::new()
                .allow_origin(allowed_origins)
                .allow_methods([
                    axum::http::Method::GET,
                    axum::http::Method::POST,
                    axum::http::Method::PUT,
                    axum::http::Method::DELETE,
                    axum::http::Method::PATCH,
                    axum::http::Method::OPTIONS,
                ])
                .allow_headers([
                    axum::http::header::CONTENT_TYPE,
                    axum::http::header::AUTHORIZATION,
                ])
                .allow_credentials(true)
        })
        .layer(TraceLayer::new_for_http());

    // ========================================================================
    // SERVER STARTUP
    // ========================================================================

    let port = env::var("PORT")
        .ok()
        .and_then(|p| p.parse::<u16>().ok())
        .unwrap_or(8080);

    let addr = SocketAddr::from(([0, 0, 0, 0], port));
    info!("Listening on {}", addr);
    let listener = TcpListener::bind(addr).await?;
    axum::serve(listener, app.into_make_service())
        .with_graceful_shutdown(shutdown_signal())
        .await?;

    // Drain writes before exit
    pool.close().await;

    Ok(())
}

// ---- Helper Functions ----

async fn health() -> Json<serde_json::Value> {
    Json(serde_json::json!({
        "status": "ok",
        "timestamp": chrono::Utc::now().to_rfc3339(),
    }))
}

async fn shutdown_signal() {
    let ctrl_c = async {
        if let Err(e) = tokio::signal::ctrl_c().await {
            tracing::error!(error = %e, "Failed to install Ctrl+C handler");
        }
    };

    #[cfg(unix)]
    let terminate = async {
        match tokio::signal::unix::signal(tokio::signal::unix::SignalKind::terminate()) {
            Ok(mut signal) => {
                signal.recv().await;
            }
            Err(e) => tracing::error!(error = %e, "Failed to install SIGTERM handler"),
        }
    };

    #[cfg(not(unix))]
    let terminate = std::future::pending::<()>();

    tokio::select! {
        _ = ctrl_c => {},
        _ = terminate => {},
    }

    info!("Shutdown signal received, draining connections");
}
