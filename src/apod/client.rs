//! Blocking HTTP client for NASA's APOD API.

use chrono::NaiveDate;
use std::time::Duration;

use crate::apod::{ApodFetcher, ApodInfo};
use crate::error::{CacheError, CacheResult};

/// Production endpoint of the APOD API.
pub const DEFAULT_BASE_URL: &str = "https://api.nasa.gov/planetary/apod";

/// Request timeout; the cache itself has no timeout of its own.
const HTTP_TIMEOUT: Duration = Duration::from_secs(30);

/// Blocking client for the APOD API.
///
/// Requests are made with `thumbs=true` so that video entries carry a
/// cacheable thumbnail URL. No retry or backoff is attempted; a failed
/// request surfaces as [`CacheError::Fetch`].
pub struct NasaApodClient {
    http: reqwest::blocking::Client,
    base_url: String,
    api_key: String,
}

impl NasaApodClient {
    /// Create a client against the production endpoint.
    ///
    /// `api_key` is a NASA API key; the rate-limited `DEMO_KEY` works for
    /// casual use.
    pub fn new(api_key: impl Into<String>) -> CacheResult<Self> {
        Self::with_base_url(DEFAULT_BASE_URL, api_key)
    }

    /// Create a client against a custom endpoint (used by tests).
    pub fn with_base_url(base_url: impl Into<String>, api_key: impl Into<String>) -> CacheResult<Self> {
        let http = reqwest::blocking::Client::builder()
            .timeout(HTTP_TIMEOUT)
            .build()?;
        Ok(Self {
            http,
            base_url: base_url.into(),
            api_key: api_key.into(),
        })
    }
}

impl ApodFetcher for NasaApodClient {
    fn fetch_info(&self, date: NaiveDate) -> CacheResult<ApodInfo> {
        let date_param = date.format("%Y-%m-%d").to_string();
        log::debug!("requesting APOD metadata for {}", date_param);

        let response = self
            .http
            .get(&self.base_url)
            .query(&[
                ("api_key", self.api_key.as_str()),
                ("date", date_param.as_str()),
                ("thumbs", "true"),
            ])
            .send()?;

        let status = response.status();
        if !status.is_success() {
            return Err(CacheError::Fetch(format!(
                "APOD API returned {} for {}",
                status, date_param
            )));
        }

        Ok(response.json()?)
    }

    fn fetch_image(&self, url: &str) -> CacheResult<Vec<u8>> {
        log::debug!("downloading image from {}", url);
        let response = self.http.get(url).send()?;

        let status = response.status();
        if !status.is_success() {
            return Err(CacheError::Fetch(format!(
                "image download returned {} for {}",
                status, url
            )));
        }

        Ok(response.bytes()?.to_vec())
    }
}
