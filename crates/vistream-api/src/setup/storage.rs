//! Storage setup and initialization

use anyhow::{Context, Result};
use std::sync::Arc;
use vistream_core::Config;
use vistream_storage::{create_storage, Storage};

/// Build the signing backend the origin fetcher will use.
pub fn setup_storage(config: &Config) -> Result<Arc<dyn Storage>> {
    tracing::info!("Initializing storage backend...");
    let storage = create_storage(config).context("Failed to initialize storage backend")?;
    tracing::info!(
        backend = %storage.backend_type(),
        signed_url_ttl_secs = config.signed_url_ttl().as_secs(),
        "Storage backend initialized"
    );
    Ok(storage)
}
