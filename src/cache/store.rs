//! Cache store initialization and the ingestion workflow.
//!
//! [`CacheStore`] composes the cache root directory with the [`Index`]
//! and drives a single ingestion call through its states:
//!
//! ```text
//! Fetching -> Hashing -> DedupCheck -> ReturnExisting
//!                                   \-> Writing -> Indexing -> ReturnNew
//! ```
//!
//! Any step may fail; the call then aborts with the specific error kind
//! and nothing is retried internally.

use chrono::NaiveDate;
use std::fs;
use std::io::Write;
use std::path::{Path, PathBuf};

use crate::apod::ApodFetcher;
use crate::cache::{CacheRecord, Index};
use crate::error::{CacheError, CacheResult};
use crate::{hasher, namer};

/// File name of the index database inside the cache root.
pub const DB_FILE_NAME: &str = "image_cache.db";

/// The content-addressed image cache.
///
/// Holds the cache root as explicit state; the index database lives inside
/// the root and is opened around each logical operation rather than held
/// open. Single-threaded by design: there is no protection against two
/// processes ingesting into the same root concurrently.
pub struct CacheStore {
    root: PathBuf,
}

impl CacheStore {
    /// Initialize the cache at `cache_root`, creating the directory and
    /// the index database together if either is absent. Idempotent.
    pub fn init(cache_root: impl Into<PathBuf>) -> CacheResult<Self> {
        let root = cache_root.into();
        if root.is_dir() {
            log::debug!("image cache directory already exists: {}", root.display());
        } else {
            fs::create_dir_all(&root).map_err(|source| CacheError::Write {
                path: root.clone(),
                source,
            })?;
            log::info!("created image cache directory: {}", root.display());
        }

        let store = Self { root };
        // Opening applies the schema, so directory and database come into
        // existence as one unit of initialization.
        store.open_index()?;
        Ok(store)
    }

    /// The cache root directory.
    #[must_use]
    pub fn root(&self) -> &Path {
        &self.root
    }

    /// Full path of the index database file.
    #[must_use]
    pub fn db_path(&self) -> PathBuf {
        self.root.join(DB_FILE_NAME)
    }

    fn open_index(&self) -> CacheResult<Index> {
        Index::open(&self.db_path())
    }

    /// Ensure the APOD for `date` is cached and return its record id.
    ///
    /// Fetches metadata and bytes through `fetcher`, fingerprints the
    /// bytes, and consults the index. If the content is already present
    /// the existing id is returned and nothing touches the disk. Otherwise
    /// the image is written atomically (temp file, then rename) to its
    /// derived path and a new record is inserted.
    ///
    /// # Errors
    ///
    /// * [`CacheError::Fetch`] - the collaborator could not produce
    ///   metadata or bytes (propagated, never retried here)
    /// * [`CacheError::PathCollision`] - the derived path is already
    ///   occupied by different content
    /// * [`CacheError::Write`] - the image file could not be written
    /// * [`CacheError::Storage`] - the index could not be read or updated;
    ///   a file written in this call is removed again before returning
    pub fn ensure_cached(&self, date: NaiveDate, fetcher: &dyn ApodFetcher) -> CacheResult<i64> {
        let info = fetcher.fetch_info(date)?;
        log::info!("APOD {}: {}", date, info.title);

        let image_url = info.image_url()?.to_owned();
        log::debug!("APOD image URL: {}", image_url);
        let bytes = fetcher.fetch_image(&image_url)?;

        let content_hash = hasher::fingerprint(&bytes);
        log::debug!("content hash: {}", content_hash);

        let index = self.open_index()?;
        if let Some(id) = index.find_by_hash(&content_hash)? {
            // Dedup fast path: identical content is already stored, no
            // matter which date or title it arrived under.
            log::info!("image already cached as record {}", id);
            return Ok(id);
        }

        let path = namer::derive_path(&self.root, &info.title, &image_url);

        // With atomic writes no partial file ever appears at the final
        // path, so anything sitting there now belongs to different
        // content (the hash lookup above missed). Refuse to overwrite.
        if path.exists() || index.find_by_path(&path)?.is_some() {
            return Err(CacheError::PathCollision { path });
        }

        write_atomic(&path, &bytes)?;
        log::info!("saved image file: {}", path.display());

        match index.insert(&info.title, &info.explanation, &path, &content_hash) {
            Ok(id) => {
                log::info!("added record {} to the image cache index", id);
                Ok(id)
            }
            Err(err) => {
                // Roll back the file write so no orphan survives a failed
                // index insert.
                if let Err(rm_err) = fs::remove_file(&path) {
                    log::warn!(
                        "failed to remove {} after index error: {}",
                        path.display(),
                        rm_err
                    );
                }
                Err(err)
            }
        }
    }

    /// Fetch the record with the given id, for presentation use.
    ///
    /// # Errors
    ///
    /// Returns [`CacheError::NotFound`] if no record has that id.
    pub fn record(&self, id: i64) -> CacheResult<CacheRecord> {
        self.open_index()?.get_by_id(id)
    }

    /// Titles of all cached images, in insertion order.
    pub fn titles(&self) -> CacheResult<Vec<String>> {
        self.open_index()?.list_titles()
    }
}

/// Write `bytes` to `path` via a temp file in the same directory followed
/// by a rename, so a partially-written file is never visible at the final
/// path. Fails rather than clobbers if `path` springs into existence
/// between the caller's check and the rename.
fn write_atomic(path: &Path, bytes: &[u8]) -> CacheResult<()> {
    let dir = path.parent().unwrap_or_else(|| Path::new("."));
    let mut tmp = tempfile::NamedTempFile::new_in(dir).map_err(|source| CacheError::Write {
        path: path.to_path_buf(),
        source,
    })?;
    tmp.write_all(bytes).map_err(|source| CacheError::Write {
        path: path.to_path_buf(),
        source,
    })?;
    tmp.as_file().sync_all().map_err(|source| CacheError::Write {
        path: path.to_path_buf(),
        source,
    })?;
    tmp.persist_noclobber(path).map_err(|err| CacheError::Write {
        path: path.to_path_buf(),
        source: err.error,
    })?;
    Ok(())
}
