// Application state shared across all modules

use sqlx::SqlitePool;
use std::sync::Arc;

use crate::services::{EmailService, StorageService, TranscriptionService};

/// Application state containing database pool, services, and configuration
#[derive(Clone)]
pub struct AppState {
    pub db: SqlitePool,
    pub jwt_secret: String,
    /// "development" or "production"; gates error detail and CORS breadth
    pub app_env: String,
    pub transcription_service: Arc<TranscriptionService>,
    pub storage_service: Arc<StorageService>,
    pub email_service: Arc<EmailService>,
}

impl AppState {
    pub fn is_development(&self) -> bool {
        self.app_env != "production"
    }
}
