//! Metadata store connection

use anyhow::{Context, Result};
use sqlx::migrate::Migrator;
use sqlx::postgres::{PgConnectOptions, PgPoolOptions};
use sqlx::PgPool;
use std::path::Path;
use std::str::FromStr;
use std::time::Duration;
use vistream_core::Config;

/// Connect the pool and bring the schema up to date.
pub async fn setup_database(config: &Config) -> Result<PgPool> {
    let options = PgConnectOptions::from_str(config.database_url())
        .context("DATABASE_URL is not a valid PostgreSQL connection string")?;

    tracing::info!(
        host = %options.get_host(),
        database = ?options.get_database(),
        "Connecting to metadata store..."
    );

    let pool = PgPoolOptions::new()
        .max_connections(config.db_max_connections())
        .acquire_timeout(Duration::from_secs(config.db_timeout_seconds()))
        .idle_timeout(Duration::from_secs(600))
        .max_lifetime(Duration::from_secs(1800))
        .connect_with(options)
        .await
        .context("Failed to connect to metadata store")?;

    tracing::info!(
        max_connections = config.db_max_connections(),
        "Metadata store connected"
    );

    run_migrations(&pool).await?;

    Ok(pool)
}

async fn run_migrations(pool: &PgPool) -> Result<()> {
    let migrations_dir = Path::new(env!("CARGO_MANIFEST_DIR")).join("../../migrations");
    let migrator = Migrator::new(migrations_dir)
        .await
        .context("Failed to load migrations")?;
    migrator
        .run(pool)
        .await
        .context("Failed to run database migrations")?;
    tracing::info!(migrations = migrator.iter().count(), "Database migrations applied");
    Ok(())
}
