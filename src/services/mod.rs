// External service adapters
//
// Each adapter wraps one third-party API behind a narrow interface:
// transcription (OpenAI Whisper), object storage (S3), email (SES).

pub mod email;
pub mod storage;
pub mod transcription;

pub use email::{EmailConfig, EmailService};
pub use storage::{StorageConfig, StorageService};
pub use transcription::TranscriptionService;
