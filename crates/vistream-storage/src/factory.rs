#[cfg(feature = "storage-http")]
use crate::HttpStorage;
#[cfg(feature = "storage-s3")]
use crate::{S3Credentials, S3Storage};
use crate::{Storage, StorageBackend, StorageError, StorageResult};
use std::sync::Arc;
use vistream_core::Config;

/// Create a storage backend based on configuration
pub fn create_storage(config: &Config) -> StorageResult<Arc<dyn Storage>> {
    match config.storage_backend() {
        #[cfg(feature = "storage-s3")]
        StorageBackend::S3 => {
            let bucket = config
                .s3_bucket()
                .map(String::from)
                .ok_or_else(|| StorageError::ConfigError("S3_BUCKET not configured".to_string()))?;
            let region = config.s3_region().map(String::from).ok_or_else(|| {
                StorageError::ConfigError("S3_REGION or AWS_REGION not configured".to_string())
            })?;
            let endpoint = config.s3_signing_endpoint().map(String::from);
            let credentials = match (config.aws_access_key_id(), config.aws_secret_access_key()) {
                (Some(id), Some(secret)) => Some(S3Credentials {
                    access_key_id: id.to_string(),
                    secret_access_key: secret.to_string(),
                }),
                _ => None,
            };

            tracing::info!(
                bucket = %bucket,
                internal_endpoint = config.s3_internal_endpoint().is_some(),
                "Using S3 storage backend"
            );

            let storage = S3Storage::new(bucket, region, endpoint, credentials)?;
            Ok(Arc::new(storage))
        }

        #[cfg(not(feature = "storage-s3"))]
        StorageBackend::S3 => Err(StorageError::ConfigError(
            "S3 storage backend not available (storage-s3 feature not enabled)".to_string(),
        )),

        #[cfg(feature = "storage-http")]
        StorageBackend::Http => {
            let base_url = config.http_origin_base_url().ok_or_else(|| {
                StorageError::ConfigError("HTTP_ORIGIN_BASE_URL not configured".to_string())
            })?;

            tracing::info!(base_url = %base_url, "Using plain HTTP origin backend");

            let storage = HttpStorage::new(base_url)?;
            Ok(Arc::new(storage))
        }

        #[cfg(not(feature = "storage-http"))]
        StorageBackend::Http => Err(StorageError::ConfigError(
            "HTTP origin backend not available (storage-http feature not enabled)".to_string(),
        )),
    }
}
