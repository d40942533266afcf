//! Vistream Storage Library
//!
//! Signing backends for the origin fetcher. Each backend turns a storage key
//! into a short-lived retrieval URL on a private endpoint.
//!
//! # Storage keys
//!
//! Keys are opaque relative paths written by the upload workflow, e.g.
//! `videos/2024/05/abc123.mp4`. They must not contain `..` or a leading `/`.

pub mod factory;
pub(crate) mod keys;
#[cfg(feature = "storage-http")]
pub mod http_origin;
#[cfg(feature = "storage-s3")]
pub mod s3;
pub mod traits;

// Re-export commonly used types
pub use factory::create_storage;
#[cfg(feature = "storage-http")]
pub use http_origin::HttpStorage;
#[cfg(feature = "storage-s3")]
pub use s3::{S3Credentials, S3Storage};
pub use traits::{Storage, StorageError, StorageResult};
pub use vistream_core::StorageBackend;
