//! Video asset repository: lookups and the view counter on the videos table.

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use sqlx::{PgPool, Postgres};
use vistream_core::models::VideoAsset;
use vistream_core::AppError;

/// Metadata store as seen by the streaming proxy.
#[async_trait]
pub trait VideoAssetStore: Send + Sync {
    /// Fetch an asset by id. `Ok(None)` when no such video exists.
    async fn get_asset(&self, id: i64) -> Result<Option<VideoAsset>, AppError>;

    /// Bump the view counter. Called off the request path.
    async fn increment_view_count(&self, id: i64) -> Result<(), AppError>;

    /// Cheap round-trip used by the readiness probe.
    async fn health_check(&self) -> Result<(), AppError>;
}

/// Row type for the videos table (for FromRow).
#[derive(Debug, sqlx::FromRow)]
struct VideoRow {
    id: i64,
    title: String,
    file_key: String,
    mime_type: String,
    file_size: Option<i64>,
    is_published: bool,
    uploaded_by: Option<i64>,
    created_at: DateTime<Utc>,
}

impl VideoRow {
    fn into_asset(self) -> VideoAsset {
        VideoAsset {
            id: self.id,
            title: self.title,
            storage_key: self.file_key,
            mime_type: self.mime_type,
            file_size: self.file_size,
            published: self.is_published,
            owner_id: self.uploaded_by,
            created_at: Some(self.created_at),
        }
    }
}

/// Postgres-backed [`VideoAssetStore`].
#[derive(Clone)]
pub struct PgVideoAssetRepository {
    pool: PgPool,
}

impl PgVideoAssetRepository {
    pub fn new(pool: PgPool) -> Self {
        Self { pool }
    }
}

#[async_trait]
impl VideoAssetStore for PgVideoAssetRepository {
    #[tracing::instrument(skip(self), fields(db.table = "videos", db.record_id = %id))]
    async fn get_asset(&self, id: i64) -> Result<Option<VideoAsset>, AppError> {
        let row: Option<VideoRow> = sqlx::query_as::<Postgres, VideoRow>(
            r#"
            SELECT id, title, file_key, mime_type, file_size, is_published, uploaded_by, created_at
            FROM videos
            WHERE id = $1
            "#,
        )
        .bind(id)
        .fetch_optional(&self.pool)
        .await?;

        Ok(row.map(VideoRow::into_asset))
    }

    #[tracing::instrument(skip(self), fields(db.table = "videos", db.record_id = %id))]
    async fn increment_view_count(&self, id: i64) -> Result<(), AppError> {
        sqlx::query(
            r#"
            UPDATE videos
            SET view_count = view_count + 1
            WHERE id = $1
            "#,
        )
        .bind(id)
        .execute(&self.pool)
        .await?;

        Ok(())
    }

    async fn health_check(&self) -> Result<(), AppError> {
        sqlx::query("SELECT 1").execute(&self.pool).await?;
        Ok(())
    }
}
