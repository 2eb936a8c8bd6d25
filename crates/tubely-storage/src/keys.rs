//! Shared key generation for storage backends.
//!
//! Key format: `{orientation}/{name}`.

use crate::traits::{StorageError, StorageResult};
use tubely_core::models::Orientation;

/// Build the canonical object key for a processed video.
pub fn video_key(orientation: Orientation, name: &str) -> String {
    format!("{}/{}", orientation.as_str(), name)
}

/// Reject keys that could escape a backend's namespace.
pub fn validate_key(key: &str) -> StorageResult<()> {
    if key.is_empty() || key.contains("..") || key.starts_with('/') || key.contains('\\') {
        return Err(StorageError::InvalidKey(format!(
            "Storage key contains invalid characters: {}",
            key
        )));
    }
    Ok(())
}
