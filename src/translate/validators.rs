use crate::common::ApiError;

/// MIME types the transcription API accepts, including the platform
/// variants mobile recorders produce (iOS m4a, Android aac/3gpp)
pub const ALLOWED_AUDIO_MIME_TYPES: [&str; 10] = [
    "audio/webm",
    "audio/mp3",
    "audio/wav",
    "audio/mpeg",
    "audio/m4a",
    "audio/aac",
    "audio/3gpp",
    "audio/ogg",
    "audio/flac",
    "audio/x-m4a",
];

/// Whisper API upload limit
pub const MAX_AUDIO_BYTES: usize = 25 * 1024 * 1024;

/// Checked before any audio buffer reaches the transcription adapter
pub fn validate_audio_upload(mime_type: &str, size: usize) -> Result<(), ApiError> {
    if !ALLOWED_AUDIO_MIME_TYPES.contains(&mime_type) {
        return Err(ApiError::BadRequest(format!(
            "Invalid file type. Allowed types: {}",
            ALLOWED_AUDIO_MIME_TYPES.join(", ")
        )));
    }

    if size > MAX_AUDIO_BYTES {
        return Err(ApiError::BadRequest(
            "File size exceeds 25MB limit".to_string(),
        ));
    }

    Ok(())
}
