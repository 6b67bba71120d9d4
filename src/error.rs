//! Error types and process exit codes.
//!
//! The library surfaces every failure through [`CacheError`]; the binary
//! maps errors onto [`ExitCode`] values with machine-readable prefixes.

use std::path::PathBuf;
use thiserror::Error;

/// Result alias used throughout the cache library.
pub type CacheResult<T> = Result<T, CacheError>;

/// Errors produced while ingesting or looking up cached images.
///
/// Each variant corresponds to one failure point of the ingestion
/// workflow; none of them is retried internally.
#[derive(Debug, Error)]
pub enum CacheError {
    /// The remote source was unavailable or returned unusable data.
    #[error("fetch failed: {0}")]
    Fetch(String),

    /// A filesystem write failed (permissions, disk full, ...).
    #[error("write failed for {path}: {source}")]
    Write {
        /// Path that could not be written.
        path: PathBuf,
        /// The underlying I/O error.
        #[source]
        source: std::io::Error,
    },

    /// The index database could not be read or written.
    #[error("index storage error: {0}")]
    Storage(#[from] rusqlite::Error),

    /// A lookup by record id found nothing.
    #[error("no cache record with id {0}")]
    NotFound(i64),

    /// The derived file path is already occupied by different content.
    ///
    /// Two distinct titles can sanitize to the same file name. The
    /// original tool silently overwrote the older image in that case;
    /// we refuse instead, so the condition is visible to the caller.
    /// The right resolution policy (suffixing, rejecting, ...) is still
    /// an open product decision.
    #[error("path collision: {path} is already occupied by different content")]
    PathCollision {
        /// The contested path inside the cache root.
        path: PathBuf,
    },
}

impl From<reqwest::Error> for CacheError {
    fn from(err: reqwest::Error) -> Self {
        CacheError::Fetch(err.to_string())
    }
}

/// Exit codes for the apodcache binary.
///
/// - 0: Success (an id was produced, or the listing completed)
/// - 1: General error (unexpected failure)
/// - 2: Not found (lookup by record id found nothing)
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum ExitCode {
    /// Success: the requested operation completed.
    Success = 0,
    /// General error: an unexpected error occurred.
    GeneralError = 1,
    /// Not found: a record lookup found nothing.
    NotFound = 2,
}

impl ExitCode {
    /// Get the numeric exit code.
    #[must_use]
    pub fn as_i32(self) -> i32 {
        self as i32
    }

    /// Get the machine-readable code prefix.
    #[must_use]
    pub fn code_prefix(self) -> &'static str {
        match self {
            Self::Success => "AC000",
            Self::GeneralError => "AC001",
            Self::NotFound => "AC002",
        }
    }
}
