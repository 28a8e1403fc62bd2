// src/services/storage.rs
//! Object storage adapter backed by S3.
//!
//! Uploaded avatar and sign-video files are delegated here; the rest of
//! the app only ever sees the returned public URL.

use aws_config::BehaviorVersion;
use aws_sdk_s3::config::{Credentials, Region};
use aws_sdk_s3::primitives::ByteStream;
use aws_sdk_s3::Client as S3Client;
use bytes::Bytes;
use thiserror::Error;
use tracing::{error, info};

#[derive(Debug, Error)]
pub enum StorageError {
    #[error("Storage credentials not configured")]
    NotConfigured,

    #[error("S3 operation failed: {0}")]
    S3Error(String),
}

#[derive(Debug, Clone)]
pub struct StorageConfig {
    pub access_key_id: String,
    pub secret_access_key: String,
    pub region: String,
    pub bucket: String,
    /// CDN or website base URL; falls back to the bucket endpoint
    pub public_base_url: Option<String>,
}

#[derive(Debug)]
pub struct StorageService {
    config: Option<StorageConfig>,
}

impl StorageService {
    pub fn new(config: Option<StorageConfig>) -> Self {
        Self { config }
    }

    async fn get_client(&self) -> Result<(S3Client, &StorageConfig), StorageError> {
        let config = self.config.as_ref().ok_or(StorageError::NotConfigured)?;

        let credentials = Credentials::new(
            &config.access_key_id,
            &config.secret_access_key,
            None,
            None,
            "env",
        );

        let aws_config = aws_config::defaults(BehaviorVersion::latest())
            .region(Region::new(config.region.clone()))
            .credentials_provider(credentials)
            .load()
            .await;

        Ok((S3Client::new(&aws_config), config))
    }

    /// Upload a file and return its public URL
    pub async fn upload_file(
        &self,
        file_data: Vec<u8>,
        key: &str,
        content_type: &str,
    ) -> Result<String, StorageError> {
        let (client, config) = self.get_client().await?;

        let body = ByteStream::from(Bytes::from(file_data));

        client
            .put_object()
            .bucket(&config.bucket)
            .key(key)
            .body(body)
            .content_type(content_type)
            .send()
            .await
            .map_err(|e| {
                error!(error = %e, key = %key, "S3 upload failed");
                StorageError::S3Error(e.to_string())
            })?;

        let url = match &config.public_base_url {
            Some(base) => format!("{}/{}", base.trim_end_matches('/'), key),
            None => format!(
                "https://{}.s3.{}.amazonaws.com/{}",
                config.bucket, config.region, key
            ),
        };

        info!(key = %key, "File uploaded to S3");

        Ok(url)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_upload_without_config_fails_fast() {
        let service = StorageService::new(None);
        let result = service
            .upload_file(vec![1, 2, 3], "avatars/x.png", "image/png")
            .await;
        assert!(matches!(result, Err(StorageError::NotConfigured)));
    }
}
