//! Configuration validation
//!
//! Startup checks on top of [`Config::validate`] that depend on the deployment.

use anyhow::Result;
use vistream_core::{Config, StorageBackend};

/// Validate critical configuration values
pub fn validate_config(config: &Config) -> Result<()> {
    config.validate()?;

    let is_production = config.is_production();

    if is_production && config.cors_origins().iter().any(|o| o == "*") {
        return Err(anyhow::anyhow!(
            "CORS configured to allow all origins (*) in production. \
            Set specific allowed origins via CORS_ORIGINS."
        ));
    }

    if is_production && config.storage_backend() == StorageBackend::Http {
        tracing::warn!("Unsigned HTTP origin backend in production; intended for development only");
    }

    if config.storage_backend() == StorageBackend::S3 && config.s3_internal_endpoint().is_none() {
        tracing::warn!(
            "S3_INTERNAL_ENDPOINT not set; signed URLs will target the public endpoint"
        );
    }

    if !config.enable_video_auth() {
        tracing::warn!("ENABLE_VIDEO_AUTH is off; unpublished videos stream without authentication");
    }

    if config.origin_response_timeout() > std::time::Duration::from_secs(120) {
        tracing::warn!(
            origin_response_timeout_secs = config.origin_response_timeout().as_secs(),
            "Origin response timeout is very high - slow origins will hold requests open"
        );
    }

    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use vistream_core::{BaseConfig, ProxyConfig};

    fn config(environment: &str, cors_origins: Vec<String>) -> Config {
        Config(Box::new(ProxyConfig {
            base: BaseConfig {
                server_port: 3000,
                cors_origins,
                db_max_connections: 5,
                db_timeout_seconds: 5,
                jwt_secret: "a".repeat(32),
                environment: environment.to_string(),
                http_concurrency_limit: 100,
            },
            database_url: "postgres://localhost/vistream".to_string(),
            session_cookie_name: "app_session_id".to_string(),
            enable_video_auth: true,
            auth_required_message: "login required".to_string(),
            storage_backend: StorageBackend::Http,
            s3_bucket: None,
            s3_region: None,
            s3_endpoint: None,
            s3_internal_endpoint: None,
            aws_region: None,
            aws_access_key_id: None,
            aws_secret_access_key: None,
            http_origin_base_url: Some("http://127.0.0.1:9000/videos".to_string()),
            signed_url_ttl_secs: 3600,
            origin_connect_timeout_secs: 10,
            origin_response_timeout_secs: 30,
            stream_cache_max_age_secs: 3600,
        }))
    }

    #[test]
    fn test_wildcard_cors_rejected_in_production() {
        assert!(validate_config(&config("production", vec!["*".to_string()])).is_err());
    }

    #[test]
    fn test_wildcard_cors_allowed_in_development() {
        assert!(validate_config(&config("development", vec!["*".to_string()])).is_ok());
    }

    #[test]
    fn test_explicit_origins_allowed_in_production() {
        let origins = vec!["https://app.example.com".to_string()];
        assert!(validate_config(&config("production", origins)).is_ok());
    }
}
