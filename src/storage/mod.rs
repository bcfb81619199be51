//! Storage backends for cached feed entries
//!
//! The cache engine talks to its backing store through the [`Storage`] trait,
//! keyed by URL. Any store that can associate a key with an entry and the
//! instant it was last written or confirmed current can implement it: an
//! in-memory map, a file, an external database. [`MemoryStorage`] is the
//! provided in-process implementation.

mod memory;

pub use memory::MemoryStorage;

use async_trait::async_trait;
use chrono::{DateTime, Utc};
use thiserror::Error;

use crate::entry::FeedEntry;

/// Errors raised by storage backends
#[derive(Debug, Error)]
pub enum StorageError {
    /// A timestamp exists for the key but the entry itself is gone
    #[error("no entry stored for key '{0}'")]
    MissingEntry(String),

    /// The backing store failed (I/O, database, serialization)
    #[error("storage backend error: {0}")]
    Backend(String),
}

/// Backing store for the cache, keyed by feed URL
///
/// The store owns the timestamps: `set` and `mark_updated` record the current
/// instant themselves rather than accepting one from the caller. Implementations
/// must tolerate queries for keys that were never set, reporting `Ok(None)`
/// from [`modified_time`](Storage::modified_time) rather than an error.
#[async_trait]
pub trait Storage: Send + Sync {
    /// Returns when `key` was last written or confirmed current, if ever
    async fn modified_time(&self, key: &str) -> Result<Option<DateTime<Utc>>, StorageError>;

    /// Loads the entry stored under `key`
    ///
    /// Only called after [`modified_time`](Storage::modified_time) reported a
    /// timestamp; a vanished entry is [`StorageError::MissingEntry`].
    async fn content(&self, key: &str) -> Result<FeedEntry, StorageError>;

    /// Stores `entry` under `key`, recording the current instant as its timestamp
    async fn set(&self, key: &str, entry: FeedEntry) -> Result<(), StorageError>;

    /// Refreshes the timestamp for `key` without altering the stored entry
    async fn mark_updated(&self, key: &str) -> Result<(), StorageError>;
}
