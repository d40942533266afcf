//! Asset Locator: path identifier → video asset.

use std::sync::Arc;
use vistream_core::models::VideoAsset;
use vistream_core::AppError;
use vistream_db::VideoAssetStore;

/// Parse the `{id}` path segment. Only plain base-10 integers above zero are accepted.
pub fn parse_video_id(raw: &str) -> Result<i64, AppError> {
    if raw.is_empty() || !raw.bytes().all(|b| b.is_ascii_digit()) {
        return Err(AppError::InvalidIdentifier(raw.to_string()));
    }

    match raw.parse::<i64>() {
        Ok(id) if id > 0 => Ok(id),
        _ => Err(AppError::InvalidIdentifier(raw.to_string())),
    }
}

#[derive(Clone)]
pub struct AssetLocator {
    store: Arc<dyn VideoAssetStore>,
}

impl AssetLocator {
    pub fn new(store: Arc<dyn VideoAssetStore>) -> Self {
        Self { store }
    }

    pub async fn locate(&self, video_id: i64) -> Result<VideoAsset, AppError> {
        self.store
            .get_asset(video_id)
            .await?
            .ok_or_else(|| AppError::NotFound(format!("video {}", video_id)))
    }
}
