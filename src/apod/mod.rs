//! APOD fetch collaborator.
//!
//! The cache core treats the remote source as an external collaborator
//! behind the [`ApodFetcher`] trait: metadata for a date, raw bytes for a
//! URL. [`client::NasaApodClient`] is the production implementation
//! against NASA's APOD API; tests substitute an in-memory fake.

pub mod client;

use chrono::NaiveDate;
use serde::Deserialize;

use crate::error::{CacheError, CacheResult};

pub use client::NasaApodClient;

/// Media kind reported by the APOD API.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Deserialize)]
#[serde(rename_all = "lowercase")]
pub enum MediaKind {
    /// A still image; the primary URL points at the picture itself.
    Image,
    /// A video; only its thumbnail can be cached.
    Video,
    /// Anything the API may add in the future.
    #[serde(other)]
    Other,
}

/// Metadata for one APOD, as returned by the API.
#[derive(Debug, Clone, Deserialize)]
pub struct ApodInfo {
    /// Human-readable title.
    pub title: String,
    /// Free-form explanation text.
    pub explanation: String,
    /// Whether this APOD is an image or a video.
    pub media_type: MediaKind,
    /// Standard-definition image URL.
    #[serde(default)]
    pub url: Option<String>,
    /// High-definition image URL, preferred when present.
    #[serde(default)]
    pub hdurl: Option<String>,
    /// Video thumbnail URL (present when `thumbs=true` was requested).
    #[serde(default)]
    pub thumbnail_url: Option<String>,
}

impl ApodInfo {
    /// The URL whose bytes should be cached for this APOD.
    ///
    /// Images prefer the high-definition URL and fall back to the
    /// standard one; videos substitute their thumbnail.
    ///
    /// # Errors
    ///
    /// Returns [`CacheError::Fetch`] when the metadata carries no usable
    /// URL for its media kind.
    pub fn image_url(&self) -> CacheResult<&str> {
        match self.media_type {
            MediaKind::Video => self
                .thumbnail_url
                .as_deref()
                .ok_or_else(|| CacheError::Fetch("video APOD has no thumbnail URL".into())),
            MediaKind::Image | MediaKind::Other => self
                .hdurl
                .as_deref()
                .or(self.url.as_deref())
                .ok_or_else(|| CacheError::Fetch("APOD metadata has no image URL".into())),
        }
    }
}

/// External collaborator that produces APOD metadata and image bytes.
///
/// Both calls block; timeouts and cancellation are the implementation's
/// responsibility, not the cache's.
pub trait ApodFetcher {
    /// Fetch the metadata for the APOD of a given date.
    fn fetch_info(&self, date: NaiveDate) -> CacheResult<ApodInfo>;

    /// Download the raw bytes behind an image URL.
    fn fetch_image(&self, url: &str) -> CacheResult<Vec<u8>>;
}
