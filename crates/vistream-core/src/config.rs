//! Configuration module
//!
//! Environment-driven configuration for the streaming proxy: server, database,
//! session verification, access flags, storage backend and origin timeouts.
//! The development auth bypass is deliberately absent here; it is a persisted
//! setting read per request.

use std::env;
use std::time::Duration;

use crate::constants::{
    DEFAULT_AUTH_REQUIRED_MESSAGE, DEFAULT_SESSION_COOKIE_NAME, DEFAULT_SIGNED_URL_TTL_SECS,
    DEFAULT_STREAM_CACHE_MAX_AGE_SECS,
};
use crate::storage_types::StorageBackend;

const SERVER_PORT: u16 = 3000;
const MAX_CONNECTIONS: u32 = 20;
const CONNECTION_TIMEOUT_SECS: u64 = 30;
const HTTP_CONCURRENCY_LIMIT: usize = 10_000;
const ORIGIN_CONNECT_TIMEOUT_SECS: u64 = 10;
const ORIGIN_RESPONSE_TIMEOUT_SECS: u64 = 30;
/// S3 presigned URLs cannot outlive seven days.
const MAX_SIGNED_URL_TTL_SECS: u64 = 7 * 24 * 3600;

/// Server-level configuration
#[derive(Clone, Debug)]
pub struct BaseConfig {
    pub server_port: u16,
    pub cors_origins: Vec<String>,
    pub db_max_connections: u32,
    pub db_timeout_seconds: u64,
    pub jwt_secret: String,
    pub environment: String,
    pub http_concurrency_limit: usize,
}

/// Streaming proxy configuration
#[derive(Clone, Debug)]
pub struct ProxyConfig {
    pub base: BaseConfig,
    pub database_url: String,
    // Session verification
    pub session_cookie_name: String,
    // Access flags
    pub enable_video_auth: bool,
    pub auth_required_message: String,
    // Storage configuration
    pub storage_backend: StorageBackend,
    pub s3_bucket: Option<String>,
    pub s3_region: Option<String>,
    pub s3_endpoint: Option<String>, // Public endpoint for S3-compatible providers
    pub s3_internal_endpoint: Option<String>, // Private endpoint reachable from the proxy
    pub aws_region: Option<String>,
    pub aws_access_key_id: Option<String>,
    pub aws_secret_access_key: Option<String>,
    pub http_origin_base_url: Option<String>,
    // Origin behavior
    pub signed_url_ttl_secs: u64,
    pub origin_connect_timeout_secs: u64,
    pub origin_response_timeout_secs: u64,
    pub stream_cache_max_age_secs: u64,
}

/// Application configuration.
#[derive(Clone, Debug)]
pub struct Config(pub Box<ProxyConfig>);

impl Config {
    fn as_proxy(&self) -> &ProxyConfig {
        &self.0
    }

    /// Check if the application is running in production mode
    pub fn is_production(&self) -> bool {
        is_production_env(&self.as_proxy().base.environment)
    }

    pub fn from_env() -> Result<Self, anyhow::Error> {
        let config = ProxyConfig::from_env()?;
        Ok(Config(Box::new(config)))
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        self.as_proxy().validate()
    }

    pub fn server_port(&self) -> u16 {
        self.as_proxy().base.server_port
    }

    pub fn cors_origins(&self) -> &[String] {
        &self.as_proxy().base.cors_origins
    }

    pub fn environment(&self) -> &str {
        &self.as_proxy().base.environment
    }

    pub fn db_max_connections(&self) -> u32 {
        self.as_proxy().base.db_max_connections
    }

    pub fn db_timeout_seconds(&self) -> u64 {
        self.as_proxy().base.db_timeout_seconds
    }

    pub fn jwt_secret(&self) -> &str {
        &self.as_proxy().base.jwt_secret
    }

    pub fn http_concurrency_limit(&self) -> usize {
        self.as_proxy().base.http_concurrency_limit
    }

    pub fn database_url(&self) -> &str {
        &self.as_proxy().database_url
    }

    pub fn session_cookie_name(&self) -> &str {
        &self.as_proxy().session_cookie_name
    }

    pub fn enable_video_auth(&self) -> bool {
        self.as_proxy().enable_video_auth
    }

    pub fn auth_required_message(&self) -> &str {
        &self.as_proxy().auth_required_message
    }

    pub fn storage_backend(&self) -> StorageBackend {
        self.as_proxy().storage_backend
    }

    pub fn s3_bucket(&self) -> Option<&str> {
        self.as_proxy().s3_bucket.as_deref()
    }

    /// S3 region, falling back to `AWS_REGION`.
    pub fn s3_region(&self) -> Option<&str> {
        self.as_proxy()
            .s3_region
            .as_deref()
            .or(self.as_proxy().aws_region.as_deref())
    }

    pub fn s3_endpoint(&self) -> Option<&str> {
        self.as_proxy().s3_endpoint.as_deref()
    }

    pub fn s3_internal_endpoint(&self) -> Option<&str> {
        self.as_proxy().s3_internal_endpoint.as_deref()
    }

    /// Endpoint used for signing: the internal one when configured.
    pub fn s3_signing_endpoint(&self) -> Option<&str> {
        self.s3_internal_endpoint().or(self.s3_endpoint())
    }

    pub fn aws_access_key_id(&self) -> Option<&str> {
        self.as_proxy().aws_access_key_id.as_deref()
    }

    pub fn aws_secret_access_key(&self) -> Option<&str> {
        self.as_proxy().aws_secret_access_key.as_deref()
    }

    pub fn http_origin_base_url(&self) -> Option<&str> {
        self.as_proxy().http_origin_base_url.as_deref()
    }

    pub fn signed_url_ttl(&self) -> Duration {
        Duration::from_secs(self.as_proxy().signed_url_ttl_secs)
    }

    pub fn origin_connect_timeout(&self) -> Duration {
        Duration::from_secs(self.as_proxy().origin_connect_timeout_secs)
    }

    pub fn origin_response_timeout(&self) -> Duration {
        Duration::from_secs(self.as_proxy().origin_response_timeout_secs)
    }

    pub fn stream_cache_max_age_secs(&self) -> u64 {
        self.as_proxy().stream_cache_max_age_secs
    }
}

fn is_production_env(environment: &str) -> bool {
    let environment = environment.to_lowercase();
    environment == "production" || environment == "prod"
}

fn env_u64(name: &str, default: u64) -> u64 {
    env::var(name)
        .unwrap_or_else(|_| default.to_string())
        .parse()
        .unwrap_or(default)
}

impl ProxyConfig {
    pub fn from_env() -> Result<Self, anyhow::Error> {
        dotenvy::dotenv().ok();

        let environment = env::var("ENVIRONMENT")
            .or_else(|_| env::var("APP_ENV"))
            .unwrap_or_else(|_| "development".to_string());

        let cors_origins_str = env::var("CORS_ORIGINS").unwrap_or_else(|_| "*".to_string());
        if is_production_env(&environment) && cors_origins_str.trim() == "*" {
            return Err(anyhow::anyhow!(
                "CORS_ORIGINS cannot be '*' in production. Please specify explicit origins."
            ));
        }

        let cors_origins: Vec<String> = cors_origins_str
            .split(',')
            .map(|s| s.trim().to_string())
            .filter(|s| !s.is_empty())
            .collect();

        let base = BaseConfig {
            server_port: env::var("PORT")
                .unwrap_or_else(|_| SERVER_PORT.to_string())
                .parse()
                .map_err(|_| anyhow::anyhow!("PORT must be a valid number"))?,
            cors_origins,
            db_max_connections: env::var("DB_MAX_CONNECTIONS")
                .unwrap_or_else(|_| MAX_CONNECTIONS.to_string())
                .parse()
                .unwrap_or(MAX_CONNECTIONS),
            db_timeout_seconds: env_u64("DB_TIMEOUT_SECONDS", CONNECTION_TIMEOUT_SECS),
            jwt_secret: env::var("JWT_SECRET")
                .map_err(|_| anyhow::anyhow!("JWT_SECRET must be set for session verification"))?,
            environment,
            http_concurrency_limit: env::var("HTTP_CONCURRENCY_LIMIT")
                .unwrap_or_else(|_| HTTP_CONCURRENCY_LIMIT.to_string())
                .parse()
                .unwrap_or(HTTP_CONCURRENCY_LIMIT),
        };

        let storage_backend = match env::var("STORAGE_BACKEND") {
            Ok(value) => value.parse::<StorageBackend>()?,
            Err(_) => StorageBackend::S3,
        };

        let config = ProxyConfig {
            base,
            database_url: env::var("DATABASE_URL")
                .map_err(|_| anyhow::anyhow!("DATABASE_URL must be set"))?,
            session_cookie_name: env::var("SESSION_COOKIE_NAME")
                .unwrap_or_else(|_| DEFAULT_SESSION_COOKIE_NAME.to_string()),
            enable_video_auth: env::var("ENABLE_VIDEO_AUTH")
                .unwrap_or_else(|_| "true".to_string())
                .to_lowercase()
                .parse()
                .unwrap_or(true),
            auth_required_message: env::var("AUTH_REQUIRED_MESSAGE")
                .unwrap_or_else(|_| DEFAULT_AUTH_REQUIRED_MESSAGE.to_string()),
            storage_backend,
            s3_bucket: env::var("S3_BUCKET").ok(),
            s3_region: env::var("S3_REGION").ok(),
            s3_endpoint: env::var("S3_ENDPOINT").ok(),
            s3_internal_endpoint: env::var("S3_INTERNAL_ENDPOINT").ok(),
            aws_region: env::var("AWS_REGION").ok(),
            aws_access_key_id: env::var("AWS_ACCESS_KEY_ID").ok(),
            aws_secret_access_key: env::var("AWS_SECRET_ACCESS_KEY").ok(),
            http_origin_base_url: env::var("HTTP_ORIGIN_BASE_URL").ok(),
            signed_url_ttl_secs: env_u64("SIGNED_URL_TTL_SECS", DEFAULT_SIGNED_URL_TTL_SECS),
            origin_connect_timeout_secs: env_u64(
                "ORIGIN_CONNECT_TIMEOUT_SECS",
                ORIGIN_CONNECT_TIMEOUT_SECS,
            ),
            origin_response_timeout_secs: env_u64(
                "ORIGIN_RESPONSE_TIMEOUT_SECS",
                ORIGIN_RESPONSE_TIMEOUT_SECS,
            ),
            stream_cache_max_age_secs: env_u64(
                "STREAM_CACHE_MAX_AGE_SECS",
                DEFAULT_STREAM_CACHE_MAX_AGE_SECS,
            ),
        };

        Ok(config)
    }

    pub fn validate(&self) -> Result<(), anyhow::Error> {
        if self.base.jwt_secret.len() < 32 {
            return Err(anyhow::anyhow!(
                "JWT_SECRET must be at least 32 characters long"
            ));
        }

        if !(self.database_url.starts_with("postgres://")
            || self.database_url.starts_with("postgresql://"))
        {
            return Err(anyhow::anyhow!(
                "DATABASE_URL must be a valid PostgreSQL connection string"
            ));
        }

        if self.base.http_concurrency_limit == 0 {
            return Err(anyhow::anyhow!("HTTP_CONCURRENCY_LIMIT must be greater than 0"));
        }

        if self.signed_url_ttl_secs == 0 || self.signed_url_ttl_secs > MAX_SIGNED_URL_TTL_SECS {
            return Err(anyhow::anyhow!(
                "SIGNED_URL_TTL_SECS must be between 1 and {}",
                MAX_SIGNED_URL_TTL_SECS
            ));
        }

        if self.origin_connect_timeout_secs == 0 || self.origin_response_timeout_secs == 0 {
            return Err(anyhow::anyhow!(
                "ORIGIN_CONNECT_TIMEOUT_SECS and ORIGIN_RESPONSE_TIMEOUT_SECS must be greater than 0"
            ));
        }

        match self.storage_backend {
            StorageBackend::S3 => {
                if self.s3_bucket.is_none() {
                    return Err(anyhow::anyhow!(
                        "S3_BUCKET must be set when using S3 storage backend"
                    ));
                }
                if self.s3_region.is_none() && self.aws_region.is_none() {
                    return Err(anyhow::anyhow!(
                        "S3_REGION or AWS_REGION must be set when using S3 storage backend"
                    ));
                }
                if self.aws_access_key_id.is_some() != self.aws_secret_access_key.is_some() {
                    return Err(anyhow::anyhow!(
                        "AWS_ACCESS_KEY_ID and AWS_SECRET_ACCESS_KEY must be set together"
                    ));
                }
            }
            StorageBackend::Http => {
                let Some(base_url) = self.http_origin_base_url.as_deref() else {
                    return Err(anyhow::anyhow!(
                        "HTTP_ORIGIN_BASE_URL must be set when using http storage backend"
                    ));
                };
                if !(base_url.starts_with("http://") || base_url.starts_with("https://")) {
                    return Err(anyhow::anyhow!(
                        "HTTP_ORIGIN_BASE_URL must be an http(s) URL"
                    ));
                }
            }
        }

        Ok(())
    }
}
