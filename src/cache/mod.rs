//! Content-addressed image cache.
//!
//! This module is the core of apodcache: it decides, for a downloaded
//! image, whether its content is new or already stored, derives where on
//! disk a new image lives, and keeps a persisted metadata index keyed by
//! record id and by content hash.
//!
//! # Architecture
//!
//! * [`index`]: SQLite persistence of cache records (lookup by hash and
//!   id, insertion, title enumeration).
//! * [`record`]: the data model stored in the index.
//! * [`store`]: cache initialization and the ingestion workflow that ties
//!   hashing, path derivation, the index, and the fetch collaborator
//!   together.
//!
//! # Dedup invariant
//!
//! One content hash maps to exactly one record id and one file path.
//! Ingesting bytes whose hash is already indexed returns the existing id
//! and performs no disk write.

pub mod index;
pub mod record;
pub mod store;

pub use index::Index;
pub use record::CacheRecord;
pub use store::{CacheStore, DB_FILE_NAME};
