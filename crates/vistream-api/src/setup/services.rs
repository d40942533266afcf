//! Service initialization and application state setup

use crate::auth::SessionAuthenticator;
use crate::state::{AppState, StreamSettings};
use crate::stream::{OriginFetcher, OriginOptions};
use anyhow::Result;
use sqlx::PgPool;
use std::sync::Arc;
use vistream_core::{Config, PlaybackEvents};
use vistream_db::{PgVideoAssetRepository, SettingsRepository, UserRepository, ViewCountSubscriber};
use vistream_storage::Storage;

/// Initialize repositories and services, returning the application state
pub fn initialize_services(
    config: &Config,
    pool: PgPool,
    storage: Arc<dyn Storage>,
) -> Result<Arc<AppState>> {
    let assets = Arc::new(PgVideoAssetRepository::new(pool.clone()));
    let settings = Arc::new(SettingsRepository::new(pool.clone()));
    let users = Arc::new(UserRepository::new(pool));

    let authenticator = Arc::new(SessionAuthenticator::new(
        config.session_cookie_name(),
        config.jwt_secret(),
        users,
    ));

    let origin = OriginFetcher::new(
        storage,
        OriginOptions {
            signed_url_ttl: config.signed_url_ttl(),
            connect_timeout: config.origin_connect_timeout(),
            response_timeout: config.origin_response_timeout(),
        },
    )?;

    let events = PlaybackEvents::new();
    let _view_counter = ViewCountSubscriber::spawn(&events, assets.clone());

    let stream = StreamSettings {
        require_auth_for_unpublished: config.enable_video_auth(),
        allow_bypass: !config.is_production(),
        auth_required_message: config.auth_required_message().to_string(),
        cache_max_age_secs: config.stream_cache_max_age_secs(),
    };

    tracing::info!(
        require_auth_for_unpublished = stream.require_auth_for_unpublished,
        allow_bypass = stream.allow_bypass,
        session_cookie = %config.session_cookie_name(),
        origin_connect_timeout_secs = config.origin_connect_timeout().as_secs(),
        origin_response_timeout_secs = config.origin_response_timeout().as_secs(),
        "Stream services initialized"
    );

    Ok(Arc::new(AppState::new(
        assets,
        settings,
        authenticator,
        origin,
        events,
        stream,
    )))
}
