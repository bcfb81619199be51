//! In-memory storage backend
//!
//! A thread-safe map from URL to entry and timestamp. Cloning produces a
//! handle to the same underlying map, so a storage instance can be shared
//! between a cache and test assertions.

use std::collections::HashMap;
use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use chrono::{DateTime, Utc};

use super::{Storage, StorageError};
use crate::entry::FeedEntry;

/// A stored entry together with its last-written timestamp
#[derive(Debug, Clone)]
struct StoredEntry {
    entry: FeedEntry,
    stored_at: DateTime<Utc>,
}

/// In-process [`Storage`] implementation backed by a `HashMap`
///
/// Does not persist across process lifetimes; suitable for tests, demos, and
/// callers that only need per-process caching.
#[derive(Debug, Clone, Default)]
pub struct MemoryStorage {
    entries: Arc<Mutex<HashMap<String, StoredEntry>>>,
}

impl MemoryStorage {
    /// Creates an empty in-memory store
    pub fn new() -> Self {
        Self::default()
    }

    /// Returns the number of stored entries
    pub fn len(&self) -> usize {
        self.lock().len()
    }

    /// Returns true if nothing has been stored
    pub fn is_empty(&self) -> bool {
        self.lock().is_empty()
    }

    fn lock(&self) -> std::sync::MutexGuard<'_, HashMap<String, StoredEntry>> {
        // A poisoned lock means a writer panicked mid-operation; the map
        // itself is still structurally valid, so continue with its contents.
        self.entries
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }
}

#[async_trait]
impl Storage for MemoryStorage {
    async fn modified_time(&self, key: &str) -> Result<Option<DateTime<Utc>>, StorageError> {
        Ok(self.lock().get(key).map(|stored| stored.stored_at))
    }

    async fn content(&self, key: &str) -> Result<FeedEntry, StorageError> {
        self.lock()
            .get(key)
            .map(|stored| stored.entry.clone())
            .ok_or_else(|| StorageError::MissingEntry(key.to_string()))
    }

    async fn set(&self, key: &str, entry: FeedEntry) -> Result<(), StorageError> {
        self.lock().insert(
            key.to_string(),
            StoredEntry {
                entry,
                stored_at: Utc::now(),
            },
        );
        Ok(())
    }

    async fn mark_updated(&self, key: &str) -> Result<(), StorageError> {
        let mut entries = self.lock();
        let stored = entries
            .get_mut(key)
            .ok_or_else(|| StorageError::MissingEntry(key.to_string()))?;
        stored.stored_at = Utc::now();
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use serde_json::json;

    fn sample_entry() -> FeedEntry {
        FeedEntry::with_validators(
            json!({"title": "Example Feed"}),
            Some("\"etag-1\"".to_string()),
            None,
        )
    }

    #[tokio::test]
    async fn test_modified_time_returns_none_for_missing_key() {
        let storage = MemoryStorage::new();

        let result = storage
            .modified_time("https://example.com/feed.xml")
            .await
            .expect("Query should not error");

        assert!(result.is_none(), "Missing key should yield None, not an error");
    }

    #[tokio::test]
    async fn test_set_records_entry_and_timestamp() {
        let storage = MemoryStorage::new();
        let entry = sample_entry();

        let before = Utc::now();
        storage
            .set("https://example.com/feed.xml", entry.clone())
            .await
            .expect("Set should succeed");
        let after = Utc::now();

        let stored_at = storage
            .modified_time("https://example.com/feed.xml")
            .await
            .expect("Query should succeed")
            .expect("Timestamp should exist after set");
        assert!(stored_at >= before && stored_at <= after);

        let stored = storage
            .content("https://example.com/feed.xml")
            .await
            .expect("Content should exist after set");
        assert_eq!(stored, entry);
    }

    #[tokio::test]
    async fn test_content_errors_for_missing_key() {
        let storage = MemoryStorage::new();

        let result = storage.content("https://example.com/feed.xml").await;

        assert!(matches!(result, Err(StorageError::MissingEntry(_))));
    }

    #[tokio::test]
    async fn test_mark_updated_refreshes_timestamp_without_changing_entry() {
        let storage = MemoryStorage::new();
        let entry = sample_entry();
        storage
            .set("https://example.com/feed.xml", entry.clone())
            .await
            .expect("Set should succeed");

        let first = storage
            .modified_time("https://example.com/feed.xml")
            .await
            .expect("Query should succeed")
            .expect("Timestamp should exist");

        storage
            .mark_updated("https://example.com/feed.xml")
            .await
            .expect("Mark updated should succeed");

        let second = storage
            .modified_time("https://example.com/feed.xml")
            .await
            .expect("Query should succeed")
            .expect("Timestamp should exist");
        assert!(second >= first, "Timestamp should move forward");

        let stored = storage
            .content("https://example.com/feed.xml")
            .await
            .expect("Content should still exist");
        assert_eq!(stored, entry, "Entry should be unchanged by mark_updated");
    }

    #[tokio::test]
    async fn test_mark_updated_errors_for_missing_key() {
        let storage = MemoryStorage::new();

        let result = storage.mark_updated("https://example.com/feed.xml").await;

        assert!(matches!(result, Err(StorageError::MissingEntry(_))));
    }

    #[tokio::test]
    async fn test_clone_shares_underlying_map() {
        let storage = MemoryStorage::new();
        let handle = storage.clone();

        storage
            .set("https://example.com/feed.xml", sample_entry())
            .await
            .expect("Set should succeed");

        assert_eq!(handle.len(), 1, "Clone should see writes through the original");
    }

    #[tokio::test]
    async fn test_overwrite_replaces_entry() {
        let storage = MemoryStorage::new();
        storage
            .set("https://example.com/feed.xml", sample_entry())
            .await
            .expect("First set should succeed");

        let replacement = FeedEntry::new(json!({"title": "Replaced"}));
        storage
            .set("https://example.com/feed.xml", replacement.clone())
            .await
            .expect("Second set should succeed");

        let stored = storage
            .content("https://example.com/feed.xml")
            .await
            .expect("Content should exist");
        assert_eq!(stored, replacement);
        assert_eq!(storage.len(), 1);
    }
}
