//! Vistream Core Library
//!
//! Domain models, error taxonomy, configuration and playback hooks shared by
//! every vistream crate.

pub mod config;
pub mod constants;
pub mod error;
pub mod hooks;
pub mod models;
pub mod storage_types;

// Re-export commonly used types
pub use config::{BaseConfig, Config, ProxyConfig};
pub use error::{AppError, ErrorMetadata, LogLevel};
pub use hooks::{PlaybackEvents, PlaybackStarted};
pub use storage_types::StorageBackend;
