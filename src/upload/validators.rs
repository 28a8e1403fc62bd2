// src/upload/validators.rs

use crate::common::ApiError;

pub const MAX_UPLOAD_BYTES: usize = 16 * 1024 * 1024;

const IMAGE_MIME_TYPES: [&str; 4] = ["image/jpeg", "image/png", "image/gif", "image/webp"];

const VIDEO_MIME_TYPES: [&str; 3] = ["video/mp4", "video/webm", "video/quicktime"];

/// Sniffs the buffer with `infer` and checks it against the image
/// allow-list. The declared multipart content type is ignored; only
/// the bytes count.
pub fn validate_image(data: &[u8]) -> Result<&'static str, ApiError> {
    validate_against(data, &IMAGE_MIME_TYPES, "Only JPEG, PNG, GIF and WebP images are allowed")
}

/// Same as [`validate_image`] for the video allow-list.
pub fn validate_video(data: &[u8]) -> Result<&'static str, ApiError> {
    validate_against(data, &VIDEO_MIME_TYPES, "Only MP4, WebM and QuickTime videos are allowed")
}

pub fn validate_size(size: usize) -> Result<(), ApiError> {
    if size > MAX_UPLOAD_BYTES {
        return Err(ApiError::BadRequest(
            "File size exceeds 16MB limit".to_string(),
        ));
    }
    Ok(())
}

fn validate_against(
    data: &[u8],
    allowed: &[&'static str],
    message: &str,
) -> Result<&'static str, ApiError> {
    let kind = infer::get(data)
        .ok_or_else(|| ApiError::BadRequest("Unrecognized file type".to_string()))?;

    allowed
        .iter()
        .find(|mime| **mime == kind.mime_type())
        .copied()
        .ok_or_else(|| ApiError::BadRequest(message.to_string()))
}

/// File extension used in the storage key, derived from the sniffed
/// MIME type.
pub fn extension_for(mime_type: &str) -> &'static str {
    match mime_type {
        "image/jpeg" => "jpg",
        "image/png" => "png",
        "image/gif" => "gif",
        "image/webp" => "webp",
        "video/mp4" => "mp4",
        "video/webm" => "webm",
        "video/quicktime" => "mov",
        _ => "bin",
    }
}
