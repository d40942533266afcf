//! In-memory metadata, settings and user stores with call counters.

use async_trait::async_trait;
use std::collections::HashMap;
use std::sync::atomic::{AtomicBool, AtomicUsize, Ordering};
use std::sync::{Arc, Mutex};
use vistream_api::auth::{AuthError, Authenticator};
use vistream_core::constants::BYPASS_AUTH_SETTING_KEY;
use vistream_core::models::{Identity, VideoAsset};
use vistream_core::AppError;
use vistream_db::{SettingsStore, UserStore, VideoAssetStore};

#[derive(Default)]
pub struct MemoryAssets {
    assets: Mutex<HashMap<i64, VideoAsset>>,
    views: Mutex<HashMap<i64, u64>>,
    lookups: AtomicUsize,
    unhealthy: AtomicBool,
}

impl MemoryAssets {
    pub fn insert(&self, asset: VideoAsset) {
        self.assets.lock().unwrap().insert(asset.id, asset);
    }

    pub fn lookups(&self) -> usize {
        self.lookups.load(Ordering::SeqCst)
    }

    pub fn views(&self, id: i64) -> u64 {
        self.views.lock().unwrap().get(&id).copied().unwrap_or(0)
    }

    pub fn set_unhealthy(&self) {
        self.unhealthy.store(true, Ordering::SeqCst);
    }
}

#[async_trait]
impl VideoAssetStore for MemoryAssets {
    async fn get_asset(&self, id: i64) -> Result<Option<VideoAsset>, AppError> {
        self.lookups.fetch_add(1, Ordering::SeqCst);
        Ok(self.assets.lock().unwrap().get(&id).cloned())
    }

    async fn increment_view_count(&self, id: i64) -> Result<(), AppError> {
        *self.views.lock().unwrap().entry(id).or_insert(0) += 1;
        Ok(())
    }

    async fn health_check(&self) -> Result<(), AppError> {
        if self.unhealthy.load(Ordering::SeqCst) {
            return Err(AppError::Internal("database unavailable".to_string()));
        }
        Ok(())
    }
}

#[derive(Default)]
pub struct MemorySettings {
    values: Mutex<HashMap<String, String>>,
}

impl MemorySettings {
    pub fn set_bypass(&self, enabled: bool) {
        self.values.lock().unwrap().insert(
            BYPASS_AUTH_SETTING_KEY.to_string(),
            enabled.to_string(),
        );
    }
}

#[async_trait]
impl SettingsStore for MemorySettings {
    async fn get_setting(&self, key: &str) -> Result<Option<String>, AppError> {
        Ok(self.values.lock().unwrap().get(key).cloned())
    }
}

#[derive(Default)]
pub struct MemoryUsers {
    users: Mutex<HashMap<String, Identity>>,
}

impl MemoryUsers {
    pub fn insert(&self, identity: Identity) {
        self.users
            .lock()
            .unwrap()
            .insert(identity.open_id.clone(), identity);
    }
}

#[async_trait]
impl UserStore for MemoryUsers {
    async fn find_by_open_id(&self, open_id: &str) -> Result<Option<Identity>, AppError> {
        Ok(self.users.lock().unwrap().get(open_id).cloned())
    }
}

/// Wraps the real authenticator and counts how often it is consulted.
pub struct CountingAuthenticator {
    inner: Arc<dyn Authenticator>,
    calls: AtomicUsize,
}

impl CountingAuthenticator {
    pub fn new(inner: Arc<dyn Authenticator>) -> Self {
        Self {
            inner,
            calls: AtomicUsize::new(0),
        }
    }

    pub fn calls(&self) -> usize {
        self.calls.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl Authenticator for CountingAuthenticator {
    async fn authenticate(
        &self,
        headers: &axum::http::HeaderMap,
    ) -> Result<Option<Identity>, AuthError> {
        self.calls.fetch_add(1, Ordering::SeqCst);
        self.inner.authenticate(headers).await
    }
}
