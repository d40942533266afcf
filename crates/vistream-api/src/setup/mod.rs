//! Application setup and initialization
//!
//! Everything `main` needs, in order: validate config, start tracing, connect
//! the metadata store, build the signing backend, wire services, mount routes.

pub mod database;
pub mod routes;
pub mod server;
pub mod services;
pub mod storage;
pub mod validation;

use crate::state::AppState;
use anyhow::{Context, Result};
use std::sync::Arc;
use vistream_core::Config;
use vistream_infra::{init_telemetry, LogFormat};

pub const SERVICE_NAME: &str = "vistream";

/// Initialize the entire application
pub async fn initialize_app(config: Config) -> Result<(Arc<AppState>, axum::Router)> {
    validation::validate_config(&config).context("Configuration validation failed")?;

    init_telemetry(
        SERVICE_NAME,
        config.environment(),
        LogFormat::for_environment(config.environment()),
    )
    .map_err(|e| anyhow::anyhow!("Failed to initialize telemetry: {}", e))?;

    tracing::info!("Configuration loaded and validated successfully");

    let pool = database::setup_database(&config).await?;

    let storage = storage::setup_storage(&config)?;

    let state = services::initialize_services(&config, pool, storage)?;

    let router = routes::setup_routes(&config, state.clone())?;

    Ok((state, router))
}
