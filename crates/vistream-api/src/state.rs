//! Application state shared by all handlers.

use crate::auth::Authenticator;
use crate::stream::{AccessGuard, AssetLocator, OriginFetcher};
use std::sync::Arc;
use vistream_core::PlaybackEvents;
use vistream_db::{SettingsStore, VideoAssetStore};

/// Response and policy settings for the stream route.
#[derive(Clone, Debug)]
pub struct StreamSettings {
    pub require_auth_for_unpublished: bool,
    /// Whether the persisted development bypass may take effect. Off in production.
    pub allow_bypass: bool,
    pub auth_required_message: String,
    pub cache_max_age_secs: u64,
}

#[derive(Clone)]
pub struct AppState {
    pub locator: AssetLocator,
    pub guard: AccessGuard,
    pub origin: OriginFetcher,
    pub authenticator: Arc<dyn Authenticator>,
    pub assets: Arc<dyn VideoAssetStore>,
    pub events: PlaybackEvents,
    pub stream: StreamSettings,
}

impl AppState {
    pub fn new(
        assets: Arc<dyn VideoAssetStore>,
        settings: Arc<dyn SettingsStore>,
        authenticator: Arc<dyn Authenticator>,
        origin: OriginFetcher,
        events: PlaybackEvents,
        stream: StreamSettings,
    ) -> Self {
        Self {
            locator: AssetLocator::new(assets.clone()),
            guard: AccessGuard::new(
                settings,
                stream.require_auth_for_unpublished,
                stream.allow_bypass,
            ),
            origin,
            authenticator,
            assets,
            events,
            stream,
        }
    }
}
