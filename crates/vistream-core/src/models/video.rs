use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::constants::STREAM_PATH_PREFIX;

/// A playable video as seen by the proxy.
///
/// Rows are created by the upload workflow; the proxy only reads them.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct VideoAsset {
    pub id: i64,
    pub title: String,
    /// Object key in the storage backend. Never leaves the server.
    #[serde(skip_serializing)]
    pub storage_key: String,
    pub mime_type: String,
    pub file_size: Option<i64>,
    pub published: bool,
    pub owner_id: Option<i64>,
    pub created_at: Option<DateTime<Utc>>,
}

impl VideoAsset {
    /// Opaque URL under which this asset is exposed to clients.
    pub fn proxy_path(&self) -> String {
        proxy_path_for(self.id)
    }
}

pub fn proxy_path_for(video_id: i64) -> String {
    format!("{}/{}", STREAM_PATH_PREFIX, video_id)
}
