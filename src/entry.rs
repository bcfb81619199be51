//! Cached feed entry data model
//!
//! A [`FeedEntry`] is the unit of cached data. The cache engine only examines
//! its validator fields and error indicator; the feed payload itself is
//! carried through unexamined as a JSON value.

use serde::{Deserialize, Serialize};

use crate::fetch::{FetchError, FetchOutcome, FetchResult};

/// A cached feed and the metadata needed to revalidate it
///
/// The `feed` payload is opaque to the cache engine: whatever the fetcher
/// produced (a parsed feed document, a raw body string) is stored and
/// returned without inspection.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct FeedEntry {
    /// Opaque server-supplied content-version token (ETag)
    pub etag: Option<String>,
    /// Opaque server-supplied Last-Modified validator, kept in string form
    pub modified: Option<String>,
    /// Error from the fetch that produced this entry, if any
    ///
    /// Entries carrying an error are returned to the caller but never
    /// persisted to storage.
    pub error: Option<FetchError>,
    /// The feed payload, carried through unexamined
    pub feed: serde_json::Value,
}

impl FeedEntry {
    /// Creates an entry holding a feed payload with no validators
    pub fn new(feed: serde_json::Value) -> Self {
        Self {
            etag: None,
            modified: None,
            error: None,
            feed,
        }
    }

    /// Creates an entry holding a feed payload and its conditional-fetch validators
    pub fn with_validators(
        feed: serde_json::Value,
        etag: Option<String>,
        modified: Option<String>,
    ) -> Self {
        Self {
            etag,
            modified,
            error: None,
            feed,
        }
    }

    /// Returns true if the fetch that produced this entry reported an error
    pub fn is_error(&self) -> bool {
        self.error.is_some()
    }
}

impl From<FetchResult> for FeedEntry {
    /// Converts a fetch result into the entry form returned to callers
    ///
    /// A failed fetch becomes an error-bearing entry with a null payload;
    /// such entries are surfaced to the caller but never stored.
    fn from(result: FetchResult) -> Self {
        match result.outcome {
            FetchOutcome::Content {
                feed,
                etag,
                modified,
            } => Self::with_validators(feed, etag, modified),
            FetchOutcome::Failed { error } => Self {
                etag: None,
                modified: None,
                error: Some(error),
                feed: serde_json::Value::Null,
            },
        }
    }
}
