//! End-to-end ingestion tests against a fake fetch collaborator.

use apodcache::apod::{ApodFetcher, ApodInfo, MediaKind};
use apodcache::cache::{CacheStore, DB_FILE_NAME};
use apodcache::error::{CacheError, CacheResult};
use chrono::NaiveDate;
use std::cell::RefCell;
use std::collections::HashMap;
use std::fs;
use std::path::Path;
use tempfile::tempdir;

/// In-memory stand-in for the NASA client: a fixed set of dated entries,
/// each with its own metadata and image bytes.
struct FakeFetcher {
    entries: HashMap<NaiveDate, (ApodInfo, Vec<u8>)>,
    downloaded_urls: RefCell<Vec<String>>,
}

impl FakeFetcher {
    fn new() -> Self {
        Self {
            entries: HashMap::new(),
            downloaded_urls: RefCell::new(Vec::new()),
        }
    }

    fn with_entry(mut self, date: NaiveDate, info: ApodInfo, bytes: &[u8]) -> Self {
        self.entries.insert(date, (info, bytes.to_vec()));
        self
    }

    fn download_count(&self) -> usize {
        self.downloaded_urls.borrow().len()
    }
}

impl ApodFetcher for FakeFetcher {
    fn fetch_info(&self, date: NaiveDate) -> CacheResult<ApodInfo> {
        self.entries
            .get(&date)
            .map(|(info, _)| info.clone())
            .ok_or_else(|| CacheError::Fetch(format!("no APOD for {}", date)))
    }

    fn fetch_image(&self, url: &str) -> CacheResult<Vec<u8>> {
        self.downloaded_urls.borrow_mut().push(url.to_string());
        self.entries
            .values()
            .find(|(info, _)| info.image_url().map(|u| u == url).unwrap_or(false))
            .map(|(_, bytes)| bytes.clone())
            .ok_or_else(|| CacheError::Fetch(format!("no image at {}", url)))
    }
}

fn image_info(title: &str, url: &str) -> ApodInfo {
    ApodInfo {
        title: title.to_string(),
        explanation: format!("Explanation for {}", title),
        media_type: MediaKind::Image,
        url: Some(url.to_string()),
        hdurl: None,
        thumbnail_url: None,
    }
}

fn date(y: i32, m: u32, d: u32) -> NaiveDate {
    NaiveDate::from_ymd_opt(y, m, d).unwrap()
}

/// Image files in the cache root, i.e. everything except the index db.
fn image_files(root: &Path) -> Vec<String> {
    let mut names: Vec<String> = fs::read_dir(root)
        .unwrap()
        .map(|e| e.unwrap().file_name().to_string_lossy().into_owned())
        .filter(|name| name != DB_FILE_NAME)
        .collect();
    names.sort();
    names
}

#[test]
fn test_new_image_is_written_and_indexed() {
    let dir = tempdir().unwrap();
    let store = CacheStore::init(dir.path()).unwrap();
    let fetcher = FakeFetcher::new().with_entry(
        date(2022, 5, 19),
        image_info("Sunrise", "http://img.example/sunrise.jpg"),
        b"sunrise-bytes",
    );

    let id = store.ensure_cached(date(2022, 5, 19), &fetcher).unwrap();
    assert!(id > 0);

    let record = store.record(id).unwrap();
    assert_eq!(record.title, "Sunrise");
    assert_eq!(record.file_path, dir.path().join("Sunrise.jpg"));
    assert_eq!(fs::read(&record.file_path).unwrap(), b"sunrise-bytes");
    assert_eq!(image_files(dir.path()), vec!["Sunrise.jpg"]);
}

#[test]
fn test_identical_bytes_twice_returns_same_id_and_one_file() {
    let dir = tempdir().unwrap();
    let store = CacheStore::init(dir.path()).unwrap();

    // Same bytes published under two dates with different titles.
    let fetcher = FakeFetcher::new()
        .with_entry(
            date(2022, 5, 19),
            image_info("Sunrise", "http://img.example/sunrise.jpg"),
            b"b1",
        )
        .with_entry(
            date(2022, 5, 20),
            image_info("Dawn", "http://img.example/dawn.jpg"),
            b"b1",
        );

    let first = store.ensure_cached(date(2022, 5, 19), &fetcher).unwrap();
    let second = store.ensure_cached(date(2022, 5, 20), &fetcher).unwrap();

    // Dedup: both calls return the same id and only the first file exists.
    assert_eq!(first, second);
    assert_eq!(image_files(dir.path()), vec!["Sunrise.jpg"]);

    // First writer wins: the record keeps the original title.
    let titles = store.titles().unwrap();
    assert_eq!(titles, vec!["Sunrise"]);
}

#[test]
fn test_distinct_images_get_distinct_records() {
    let dir = tempdir().unwrap();
    let store = CacheStore::init(dir.path()).unwrap();
    let fetcher = FakeFetcher::new()
        .with_entry(
            date(2022, 5, 19),
            image_info("Alpha", "http://img.example/a.jpg"),
            b"alpha",
        )
        .with_entry(
            date(2022, 5, 20),
            image_info("Beta", "http://img.example/b.png"),
            b"beta",
        );

    let a = store.ensure_cached(date(2022, 5, 19), &fetcher).unwrap();
    let b = store.ensure_cached(date(2022, 5, 20), &fetcher).unwrap();

    assert_ne!(a, b);
    assert_eq!(image_files(dir.path()), vec!["Alpha.jpg", "Beta.png"]);
    assert_eq!(store.titles().unwrap(), vec!["Alpha", "Beta"]);
}

#[test]
fn test_reingesting_same_date_downloads_but_never_rewrites() {
    let dir = tempdir().unwrap();
    let store = CacheStore::init(dir.path()).unwrap();
    let fetcher = FakeFetcher::new().with_entry(
        date(2022, 5, 19),
        image_info("Sunrise", "http://img.example/sunrise.jpg"),
        b"b1",
    );

    let first = store.ensure_cached(date(2022, 5, 19), &fetcher).unwrap();
    let second = store.ensure_cached(date(2022, 5, 19), &fetcher).unwrap();

    assert_eq!(first, second);
    // The collaborator was consulted both times; the dedup decision is
    // the cache's, not the fetcher's.
    assert_eq!(fetcher.download_count(), 2);
    assert_eq!(image_files(dir.path()), vec!["Sunrise.jpg"]);
}

#[test]
fn test_fetch_failure_propagates_and_caches_nothing() {
    let dir = tempdir().unwrap();
    let store = CacheStore::init(dir.path()).unwrap();
    let fetcher = FakeFetcher::new();

    let err = store
        .ensure_cached(date(2022, 5, 19), &fetcher)
        .unwrap_err();
    assert!(matches!(err, CacheError::Fetch(_)));
    assert!(image_files(dir.path()).is_empty());
    assert!(store.titles().unwrap().is_empty());
}

#[test]
fn test_colliding_titles_error_instead_of_overwriting() {
    let dir = tempdir().unwrap();
    let store = CacheStore::init(dir.path()).unwrap();

    // Different content, but both titles sanitize to "Moon_Rise".
    let fetcher = FakeFetcher::new()
        .with_entry(
            date(2022, 5, 19),
            image_info("Moon Rise", "http://img.example/a.jpg"),
            b"first-image",
        )
        .with_entry(
            date(2022, 5, 20),
            image_info("Moon: Rise!", "http://img.example/b.jpg"),
            b"second-image",
        );

    let first = store.ensure_cached(date(2022, 5, 19), &fetcher).unwrap();

    let err = store
        .ensure_cached(date(2022, 5, 20), &fetcher)
        .unwrap_err();
    assert!(matches!(err, CacheError::PathCollision { .. }));

    // The first image is untouched and remains the only record.
    let record = store.record(first).unwrap();
    assert_eq!(fs::read(&record.file_path).unwrap(), b"first-image");
    assert_eq!(image_files(dir.path()), vec!["Moon_Rise.jpg"]);
    assert_eq!(store.titles().unwrap(), vec!["Moon Rise"]);
}

#[test]
fn test_failed_index_insert_rolls_back_file_write() {
    let dir = tempdir().unwrap();
    let store = CacheStore::init(dir.path()).unwrap();
    let fetcher = FakeFetcher::new().with_entry(
        date(2022, 5, 19),
        image_info("Sunrise", "http://img.example/sunrise.jpg"),
        b"sunrise-bytes",
    );

    // Inject a storage fault: reads keep working, inserts abort. The
    // dedup check passes, the image file gets written, and only then
    // does the index reject the new record.
    let conn = rusqlite::Connection::open(store.db_path()).unwrap();
    conn.execute_batch(
        "CREATE TRIGGER cache_reject_inserts BEFORE INSERT ON cache
         BEGIN SELECT RAISE(ABORT, 'disk I/O simulated away'); END;",
    )
    .unwrap();

    let err = store
        .ensure_cached(date(2022, 5, 19), &fetcher)
        .unwrap_err();
    assert!(matches!(err, CacheError::Storage(_)));

    // Rollback: the written file was removed again, so neither a record
    // nor an orphaned image survives the failed insert.
    assert!(image_files(dir.path()).is_empty());
    assert!(store.titles().unwrap().is_empty());

    // Once the storage fault clears, a retry ingests normally.
    conn.execute_batch("DROP TRIGGER cache_reject_inserts;").unwrap();
    let id = store.ensure_cached(date(2022, 5, 19), &fetcher).unwrap();
    assert_eq!(store.record(id).unwrap().title, "Sunrise");
    assert_eq!(image_files(dir.path()), vec!["Sunrise.jpg"]);
}

#[test]
fn test_video_apod_caches_the_thumbnail() {
    let dir = tempdir().unwrap();
    let store = CacheStore::init(dir.path()).unwrap();

    let info = ApodInfo {
        title: "Solar Eclipse".to_string(),
        explanation: "A video of an eclipse.".to_string(),
        media_type: MediaKind::Video,
        url: Some("http://video.example/eclipse".to_string()),
        hdurl: None,
        thumbnail_url: Some("http://img.example/eclipse_thumb.jpg".to_string()),
    };
    let fetcher = FakeFetcher::new().with_entry(date(2022, 5, 19), info, b"thumb-bytes");

    let id = store.ensure_cached(date(2022, 5, 19), &fetcher).unwrap();

    let record = store.record(id).unwrap();
    assert_eq!(record.file_path, dir.path().join("Solar_Eclipse.jpg"));
    assert_eq!(
        fetcher.downloaded_urls.borrow().as_slice(),
        ["http://img.example/eclipse_thumb.jpg"]
    );
}

#[test]
fn test_records_survive_store_reinit() {
    let dir = tempdir().unwrap();
    let id = {
        let store = CacheStore::init(dir.path()).unwrap();
        let fetcher = FakeFetcher::new().with_entry(
            date(2022, 5, 19),
            image_info("Sunrise", "http://img.example/sunrise.jpg"),
            b"b1",
        );
        store.ensure_cached(date(2022, 5, 19), &fetcher).unwrap()
    };

    let store = CacheStore::init(dir.path()).unwrap();
    let record = store.record(id).unwrap();
    assert_eq!(record.title, "Sunrise");
    assert_eq!(store.titles().unwrap(), vec!["Sunrise"]);
}

#[test]
fn test_record_lookup_for_unknown_id_is_not_found() {
    let dir = tempdir().unwrap();
    let store = CacheStore::init(dir.path()).unwrap();

    let err = store.record(404).unwrap_err();
    assert!(matches!(err, CacheError::NotFound(404)));
}
