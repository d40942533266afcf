//! Shared constants

/// Route prefix under which assets are exposed. The only URL form a client ever sees.
pub const STREAM_PATH_PREFIX: &str = "/api/video/stream";

/// Localized 401 body message for private videos.
pub const DEFAULT_AUTH_REQUIRED_MESSAGE: &str = "この動画を視聴するにはログインが必要です";

/// Settings table key for the development bypass.
pub const BYPASS_AUTH_SETTING_KEY: &str = "BYPASS_AUTH";

pub const DEFAULT_SESSION_COOKIE_NAME: &str = "app_session_id";

/// Signed retrieval URLs are generated per request, so an hour is plenty.
pub const DEFAULT_SIGNED_URL_TTL_SECS: u64 = 3600;

pub const DEFAULT_STREAM_CACHE_MAX_AGE_SECS: u64 = 3600;
