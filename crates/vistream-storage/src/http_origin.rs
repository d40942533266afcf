use crate::keys::validate_storage_key;
use crate::traits::{Storage, StorageError, StorageResult};
use crate::StorageBackend;
use async_trait::async_trait;
use http::Method;
use std::time::Duration;
use url::Url;

/// Plain HTTP origin
///
/// Maps a storage key onto `{base_url}/{key}` without signing. Intended for
/// development setups and tests where the origin sits on a private network.
#[derive(Clone, Debug)]
pub struct HttpStorage {
    base_url: String,
}

impl HttpStorage {
    pub fn new(base_url: impl Into<String>) -> StorageResult<Self> {
        let base_url = base_url.into();
        let parsed = Url::parse(&base_url)
            .map_err(|e| StorageError::ConfigError(format!("Invalid origin base URL: {}", e)))?;
        if !matches!(parsed.scheme(), "http" | "https") {
            return Err(StorageError::ConfigError(
                "Origin base URL must use http or https".to_string(),
            ));
        }

        Ok(Self {
            base_url: base_url.trim_end_matches('/').to_string(),
        })
    }
}

#[async_trait]
impl Storage for HttpStorage {
    async fn get_presigned_url(
        &self,
        _method: &Method,
        storage_key: &str,
        _expires_in: Duration,
    ) -> StorageResult<String> {
        validate_storage_key(storage_key)?;

        let encoded: Vec<String> = storage_key
            .split('/')
            .map(|segment| urlencoding::encode(segment).into_owned())
            .collect();

        Ok(format!("{}/{}", self.base_url, encoded.join("/")))
    }

    fn backend_type(&self) -> StorageBackend {
        StorageBackend::Http
    }
}
