//! Tests for upload module

#[cfg(test)]
mod tests {
    use crate::common::ApiError;
    use crate::upload::validators::{
        extension_for, validate_image, validate_size, validate_video, MAX_UPLOAD_BYTES,
    };

    // Minimal valid magic-number prefixes
    const PNG_HEADER: [u8; 8] = [0x89, 0x50, 0x4E, 0x47, 0x0D, 0x0A, 0x1A, 0x0A];
    const GIF_HEADER: &[u8] = b"GIF89a";

    fn mp4_header() -> Vec<u8> {
        let mut buf = vec![0x00, 0x00, 0x00, 0x18];
        buf.extend_from_slice(b"ftypmp42");
        buf.extend_from_slice(&[0u8; 16]);
        buf
    }

    #[test]
    fn image_sniffing_accepts_png_and_gif() {
        assert_eq!(validate_image(&PNG_HEADER).unwrap(), "image/png");
        assert_eq!(validate_image(GIF_HEADER).unwrap(), "image/gif");
    }

    #[test]
    fn image_sniffing_rejects_video_and_garbage() {
        let err = validate_image(&mp4_header()).unwrap_err();
        assert!(matches!(err, ApiError::BadRequest(_)));

        let err = validate_image(b"plain text, not an image").unwrap_err();
        assert!(matches!(err, ApiError::BadRequest(msg) if msg == "Unrecognized file type"));
    }

    #[test]
    fn video_sniffing_accepts_mp4() {
        assert_eq!(validate_video(&mp4_header()).unwrap(), "video/mp4");
    }

    #[test]
    fn video_sniffing_rejects_images() {
        let err = validate_video(&PNG_HEADER).unwrap_err();
        assert!(matches!(err, ApiError::BadRequest(_)));
    }

    #[test]
    fn size_cap_is_sixteen_megabytes() {
        assert!(validate_size(MAX_UPLOAD_BYTES).is_ok());
        assert!(validate_size(MAX_UPLOAD_BYTES + 1).is_err());
        assert!(validate_size(0).is_ok());
    }

    #[test]
    fn storage_key_extensions() {
        assert_eq!(extension_for("image/jpeg"), "jpg");
        assert_eq!(extension_for("video/quicktime"), "mov");
        assert_eq!(extension_for("application/pdf"), "bin");
    }
}
