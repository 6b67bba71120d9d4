//! Cache record definitions.

use serde::{Deserialize, Serialize};
use std::path::PathBuf;

/// One persisted metadata row describing a uniquely-stored image.
///
/// A record is created exactly once, when a content hash is first seen,
/// and is never mutated or deleted afterwards.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct CacheRecord {
    /// Record id assigned by the index on insertion; unique, > 0, never reused.
    pub id: i64,
    /// Human-readable image title. Not unique across records.
    pub title: String,
    /// Free-form explanation text, opaque to the cache.
    pub explanation: String,
    /// Absolute path of the stored image file.
    pub file_path: PathBuf,
    /// Hex-encoded BLAKE3 digest of the image bytes; the dedup key.
    pub content_hash: String,
}
