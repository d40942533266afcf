//! Test helpers: build AppState and router for integration tests.
//!
//! No database or Docker needed: the metadata store is in memory and the
//! origin is an axum server on a random local port.
//!
//! Run from workspace root: `cargo test -p vistream-api`.

#![allow(dead_code)]

pub mod origin;
pub mod stores;

use axum::Router;
use axum_test::TestServer;
use jsonwebtoken::{encode, EncodingKey, Header};
use origin::MockOrigin;
use std::sync::Arc;
use std::time::Duration;
use stores::{CountingAuthenticator, MemoryAssets, MemorySettings, MemoryUsers};
use vistream_api::auth::{SessionAuthenticator, SessionClaims};
use vistream_api::setup::routes::app_router;
use vistream_api::state::{AppState, StreamSettings};
use vistream_api::stream::{OriginFetcher, OriginOptions};
use vistream_core::models::{Identity, UserRole, VideoAsset};
use vistream_core::PlaybackEvents;
use vistream_db::ViewCountSubscriber;
use vistream_storage::HttpStorage;

pub const JWT_SECRET: &str = "test-secret-that-is-at-least-32-characters";
pub const COOKIE_NAME: &str = "app_session_id";
pub const AUTH_MESSAGE: &str = "この動画を視聴するにはログインが必要です";

pub const PUBLISHED_ID: i64 = 1;
pub const UNPUBLISHED_ID: i64 = 2;
pub const SLOW_HEADERS_ID: i64 = 3;
pub const SLOW_BODY_ID: i64 = 4;
pub const ENDLESS_ID: i64 = 5;
pub const UNSATISFIABLE_ID: i64 = 6;
pub const BROKEN_ID: i64 = 7;
pub const EMPTY_PARTIAL_ID: i64 = 8;
pub const TRAVERSAL_ID: i64 = 9;
pub const MISSING_ID: i64 = 404;

pub fn stream_path(id: impl std::fmt::Display) -> String {
    format!("/api/video/stream/{}", id)
}

pub fn asset(id: i64, storage_key: &str, published: bool) -> VideoAsset {
    VideoAsset {
        id,
        title: format!("video {}", id),
        storage_key: storage_key.to_string(),
        mime_type: "video/mp4".to_string(),
        file_size: Some(origin::ASSET_SIZE as i64),
        published,
        owner_id: Some(10),
        created_at: None,
    }
}

pub fn viewer() -> Identity {
    Identity {
        user_id: 10,
        open_id: "viewer-10".to_string(),
        name: Some("Viewer".to_string()),
        role: UserRole::User,
    }
}

/// A valid session cookie header value for `identity`.
pub fn session_cookie(identity: &Identity) -> String {
    let claims = SessionClaims {
        open_id: identity.open_id.clone(),
        app_id: None,
        name: identity.name.clone(),
        exp: (chrono::Utc::now() + chrono::Duration::hours(1)).timestamp(),
    };
    let token = encode(
        &Header::default(),
        &claims,
        &EncodingKey::from_secret(JWT_SECRET.as_bytes()),
    )
    .expect("encode session token");
    format!("{}={}", COOKIE_NAME, token)
}

pub struct TestApp {
    pub server: TestServer,
    pub router: Router,
    pub origin: MockOrigin,
    pub assets: Arc<MemoryAssets>,
    pub settings: Arc<MemorySettings>,
    pub authenticator: Arc<CountingAuthenticator>,
    pub events: PlaybackEvents,
}

impl TestApp {
    pub fn client(&self) -> &TestServer {
        &self.server
    }
}

pub struct TestAppBuilder {
    honor_ranges: bool,
    require_auth_for_unpublished: bool,
    bypass_auth: bool,
    production: bool,
    response_timeout: Duration,
}

impl Default for TestAppBuilder {
    fn default() -> Self {
        Self {
            honor_ranges: true,
            require_auth_for_unpublished: true,
            bypass_auth: false,
            production: false,
            response_timeout: Duration::from_secs(10),
        }
    }
}

impl TestAppBuilder {
    pub fn ignoring_ranges(mut self) -> Self {
        self.honor_ranges = false;
        self
    }

    pub fn without_video_auth(mut self) -> Self {
        self.require_auth_for_unpublished = false;
        self
    }

    pub fn with_bypass(mut self) -> Self {
        self.bypass_auth = true;
        self
    }

    /// Deploy as production: the persisted bypass setting must not take effect.
    pub fn production(mut self) -> Self {
        self.production = true;
        self
    }

    pub fn response_timeout(mut self, timeout: Duration) -> Self {
        self.response_timeout = timeout;
        self
    }

    pub async fn build(self) -> TestApp {
        let origin = MockOrigin::start(self.honor_ranges).await;

        let assets = Arc::new(MemoryAssets::default());
        assets.insert(asset(PUBLISHED_ID, "videos/published.mp4", true));
        assets.insert(asset(UNPUBLISHED_ID, "videos/private/draft.mp4", false));
        assets.insert(asset(SLOW_HEADERS_ID, "slow-headers/clip.mp4", true));
        assets.insert(asset(SLOW_BODY_ID, "slow-body/clip.mp4", true));
        assets.insert(asset(ENDLESS_ID, "endless/live.mp4", true));
        assets.insert(asset(UNSATISFIABLE_ID, "unsatisfiable/clip.mp4", true));
        assets.insert(asset(BROKEN_ID, "broken/clip.mp4", true));
        assets.insert(asset(EMPTY_PARTIAL_ID, "empty-206/clip.mp4", true));
        assets.insert(asset(TRAVERSAL_ID, "../secret/clip.mp4", true));

        let settings = Arc::new(MemorySettings::default());
        settings.set_bypass(self.bypass_auth);

        let users = Arc::new(MemoryUsers::default());
        users.insert(viewer());

        let authenticator = Arc::new(CountingAuthenticator::new(Arc::new(
            SessionAuthenticator::new(COOKIE_NAME, JWT_SECRET, users),
        )));

        let storage = Arc::new(HttpStorage::new(origin.base_url.clone()).expect("origin storage"));
        let fetcher = OriginFetcher::new(
            storage,
            OriginOptions {
                signed_url_ttl: Duration::from_secs(3600),
                connect_timeout: Duration::from_secs(2),
                response_timeout: self.response_timeout,
            },
        )
        .expect("origin fetcher");

        let events = PlaybackEvents::new();
        ViewCountSubscriber::spawn(&events, assets.clone());

        let state = Arc::new(AppState::new(
            assets.clone(),
            settings.clone(),
            authenticator.clone(),
            fetcher,
            events.clone(),
            StreamSettings {
                require_auth_for_unpublished: self.require_auth_for_unpublished,
                allow_bypass: !self.production,
                auth_required_message: AUTH_MESSAGE.to_string(),
                cache_max_age_secs: 3600,
            },
        ));

        let router = app_router(state);
        let server = TestServer::new(router.clone()).expect("Failed to create test server");

        TestApp {
            server,
            router,
            origin,
            assets,
            settings,
            authenticator,
            events,
        }
    }
}

pub async fn setup_test_app() -> TestApp {
    TestAppBuilder::default().build().await
}

/// Serve `router` on a real local socket, for tests that need real connections.
pub async fn serve(router: Router) -> String {
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0")
        .await
        .expect("bind proxy");
    let addr = listener.local_addr().expect("proxy addr");
    tokio::spawn(async move {
        axum::serve(listener, router).await.expect("proxy server");
    });
    format!("http://{}", addr)
}

/// Poll `condition` until it holds or `timeout` elapses.
pub async fn eventually(timeout: Duration, mut condition: impl FnMut() -> bool) -> bool {
    let deadline = tokio::time::Instant::now() + timeout;
    while tokio::time::Instant::now() < deadline {
        if condition() {
            return true;
        }
        tokio::time::sleep(Duration::from_millis(20)).await;
    }
    condition()
}
