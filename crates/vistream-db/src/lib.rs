//! Vistream metadata store
//!
//! Postgres adapters for the collaborators the streaming proxy consumes:
//! video asset lookup, the view counter, users, and persisted operator settings.

pub mod db;

pub use db::{
    PgVideoAssetRepository, SettingsRepository, SettingsStore, UserRepository, UserStore,
    VideoAssetStore, ViewCountSubscriber,
};
