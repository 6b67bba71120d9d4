//! SQLite-backed cache index.
//!
//! The index is the persisted table of [`CacheRecord`]s, keyed both by
//! record id and by content hash. All statements are parameterized; a
//! unique index on `content_hash` enforces the one-record-per-content
//! invariant at the storage layer as well.

use rusqlite::{params, Connection, OptionalExtension};
use std::path::{Path, PathBuf};

use crate::cache::CacheRecord;
use crate::error::{CacheError, CacheResult};

/// Schema applied on every open. All statements are idempotent, so opening
/// an already-initialized database is a no-op beyond acquiring a handle.
const SCHEMA: &str = "
CREATE TABLE IF NOT EXISTS cache (
    id INTEGER PRIMARY KEY,
    title TEXT NOT NULL,
    explanation TEXT NOT NULL,
    file_path TEXT NOT NULL,
    content_hash TEXT NOT NULL
);
CREATE UNIQUE INDEX IF NOT EXISTS idx_cache_content_hash ON cache(content_hash);
";

/// Handle to the persisted cache index.
///
/// Opened around each logical cache operation rather than held long-lived;
/// no cross-process locking is attempted.
pub struct Index {
    conn: Connection,
}

impl Index {
    /// Open the index database at `db_path`, creating it and applying the
    /// schema if it does not exist yet.
    pub fn open(db_path: &Path) -> CacheResult<Self> {
        let conn = Connection::open(db_path)?;
        conn.execute_batch(SCHEMA)?;
        Ok(Self { conn })
    }

    /// Look up the record id for a content hash.
    ///
    /// Absence is `Ok(None)`, not an error: this is the dedup check, and
    /// "never seen before" is an expected answer.
    pub fn find_by_hash(&self, content_hash: &str) -> CacheResult<Option<i64>> {
        let id = self
            .conn
            .query_row(
                "SELECT id FROM cache WHERE content_hash = ?1",
                params![content_hash],
                |row| row.get(0),
            )
            .optional()?;
        Ok(id)
    }

    /// Look up the record id claiming a file path, if any.
    ///
    /// Used by the ingestion workflow to detect title-sanitization
    /// collisions before writing to disk.
    pub fn find_by_path(&self, file_path: &Path) -> CacheResult<Option<i64>> {
        let id = self
            .conn
            .query_row(
                "SELECT id FROM cache WHERE file_path = ?1",
                params![file_path.to_string_lossy()],
                |row| row.get(0),
            )
            .optional()?;
        Ok(id)
    }

    /// Append a new record and return its assigned id (always > 0).
    pub fn insert(
        &self,
        title: &str,
        explanation: &str,
        file_path: &Path,
        content_hash: &str,
    ) -> CacheResult<i64> {
        self.conn.execute(
            "INSERT INTO cache (title, explanation, file_path, content_hash)
             VALUES (?1, ?2, ?3, ?4)",
            params![
                title,
                explanation,
                file_path.to_string_lossy(),
                content_hash
            ],
        )?;
        Ok(self.conn.last_insert_rowid())
    }

    /// Fetch the record with the given id.
    ///
    /// # Errors
    ///
    /// Returns [`CacheError::NotFound`] if no record has that id.
    pub fn get_by_id(&self, id: i64) -> CacheResult<CacheRecord> {
        self.conn
            .query_row(
                "SELECT id, title, explanation, file_path, content_hash
                 FROM cache WHERE id = ?1",
                params![id],
                |row| {
                    Ok(CacheRecord {
                        id: row.get(0)?,
                        title: row.get(1)?,
                        explanation: row.get(2)?,
                        file_path: PathBuf::from(row.get::<_, String>(3)?),
                        content_hash: row.get(4)?,
                    })
                },
            )
            .optional()?
            .ok_or(CacheError::NotFound(id))
    }

    /// Return the titles of all indexed images, in insertion order.
    pub fn list_titles(&self) -> CacheResult<Vec<String>> {
        let mut stmt = self.conn.prepare("SELECT title FROM cache ORDER BY id")?;
        let titles = stmt
            .query_map([], |row| row.get(0))?
            .collect::<Result<Vec<String>, _>>()?;
        Ok(titles)
    }
}
