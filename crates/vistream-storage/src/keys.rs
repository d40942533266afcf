//! Storage key checks shared by all backends.

use crate::{StorageError, StorageResult};

/// Reject keys that could escape the bucket or base path.
///
/// Keys must be non-empty, relative, and free of `..` segments and control characters.
pub fn validate_storage_key(storage_key: &str) -> StorageResult<()> {
    if storage_key.trim().is_empty() {
        return Err(StorageError::InvalidKey("empty key".to_string()));
    }
    if storage_key.starts_with('/') || storage_key.contains('\\') {
        return Err(StorageError::InvalidKey("key must be relative".to_string()));
    }
    if storage_key.split('/').any(|segment| segment == "..") {
        return Err(StorageError::InvalidKey("key contains '..'".to_string()));
    }
    if storage_key.chars().any(char::is_control) {
        return Err(StorageError::InvalidKey(
            "key contains control characters".to_string(),
        ));
    }
    Ok(())
}
