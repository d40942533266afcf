//! Operator settings repository: key/value rows in the settings table.

use async_trait::async_trait;
use sqlx::{PgPool, Postgres};
use vistream_core::constants::BYPASS_AUTH_SETTING_KEY;
use vistream_core::AppError;

/// Persisted operator settings.
#[async_trait]
pub trait SettingsStore: Send + Sync {
    async fn get_setting(&self, key: &str) -> Result<Option<String>, AppError>;

    /// Development-only auth bypass. Off unless the row says `true`.
    async fn bypass_auth(&self) -> Result<bool, AppError> {
        let value = self.get_setting(BYPASS_AUTH_SETTING_KEY).await?;
        Ok(value.is_some_and(|v| v.trim().eq_ignore_ascii_case("true")))
    }
}

#[derive(Clone)]
pub struct SettingsRepository {
    pool: PgPool,
}

impl SettingsRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl SettingsStore for SettingsRepository {
    #[tracing::instrument(skip(self), fields(db.table = "settings"))]
    async fn get_setting(&self, key: &str) -> Result<Option<String>, AppError> {
        let value: Option<(String,)> =
            sqlx::query_as::<Postgres, (String,)>("SELECT value FROM settings WHERE key = $1")
                .bind(key)
                .fetch_optional(&self.pool)
                .await?;

        Ok(value.map(|(v,)| v))
    }
}
