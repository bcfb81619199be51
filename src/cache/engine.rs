//! The [`FeedCache`] decision engine
//!
//! Mediates between a caller, a [`Storage`] backend, and a [`FeedFetcher`].
//! Each lookup performs at most one storage read, one fetch, and one storage
//! write, sequentially; there are no background tasks, no locking, and no
//! deduplication of concurrent lookups for the same URL (last write wins,
//! per whatever the storage backend does).

use std::sync::Arc;
use std::time::Duration as StdDuration;

use chrono::{Duration, Utc};
use thiserror::Error;

use crate::entry::FeedEntry;
use crate::fetch::{FeedFetcher, FetchOutcome, FetchResult};
use crate::observe::{CacheEvent, CacheObserver, LogObserver};
use crate::storage::{Storage, StorageError};

/// Default time-to-live before a cached entry is revalidated
const DEFAULT_TIME_TO_LIVE_SECS: i64 = 300;

/// Default User-Agent sent to remote feed servers
const DEFAULT_USER_AGENT: &str = concat!("feedcache/", env!("CARGO_PKG_VERSION"));

/// Errors returned by cache lookups
///
/// Fetch and parse failures are *not* errors at this level: they ride inside
/// the returned [`FeedEntry`] as its error indicator. Only the storage
/// backend can fail a lookup outright.
#[derive(Debug, Error)]
pub enum CacheError {
    /// The storage backend failed; propagated without retry
    #[error("storage error: {0}")]
    Storage(#[from] StorageError),
}

/// Caching layer in front of a feed fetch operation
///
/// Serves a stored entry while it is younger than the TTL, revalidates it
/// with the stored ETag / Last-Modified validators once it is older, and
/// persists fresh content unless the fetch reported an error.
///
/// The engine holds no per-URL state of its own; everything durable lives in
/// the storage backend, so it is safe to share across threads to exactly the
/// extent the collaborators are.
pub struct FeedCache<S, F> {
    storage: S,
    fetcher: F,
    time_to_live: Duration,
    user_agent: String,
    observer: Arc<dyn CacheObserver>,
}

impl<S, F> FeedCache<S, F>
where
    S: Storage,
    F: FeedFetcher,
{
    /// Creates a cache with a 300-second TTL, a default User-Agent, and a
    /// log-forwarding observer
    pub fn new(storage: S, fetcher: F) -> Self {
        Self {
            storage,
            fetcher,
            time_to_live: Duration::seconds(DEFAULT_TIME_TO_LIVE_SECS),
            user_agent: DEFAULT_USER_AGENT.to_string(),
            observer: Arc::new(LogObserver),
        }
    }

    /// Sets how long a stored entry is served without revalidation
    pub fn with_time_to_live(mut self, time_to_live: StdDuration) -> Self {
        // Out-of-range durations (beyond ~292 million years) mean "never stale".
        self.time_to_live = Duration::from_std(time_to_live).unwrap_or(Duration::MAX);
        self
    }

    /// Sets the User-Agent string sent to remote servers
    pub fn with_user_agent(mut self, user_agent: impl Into<String>) -> Self {
        self.user_agent = user_agent.into();
        self
    }

    /// Replaces the default log-forwarding observer
    pub fn with_observer(mut self, observer: impl CacheObserver + 'static) -> Self {
        self.observer = Arc::new(observer);
        self
    }

    /// Returns the feed at `url`, from cache or from the network
    ///
    /// The decision procedure:
    /// 1. A stored entry younger than the TTL is returned with no network
    ///    access at all.
    /// 2. A stale entry is revalidated: its validators are sent with the
    ///    fetch, and a 304 answer refreshes the storage timestamp and
    ///    returns the stored entry unchanged.
    /// 3. New content is persisted and returned, unless the fetch reported
    ///    an error, in which case the error-bearing result is returned as-is
    ///    and storage is left untouched.
    ///
    /// Only storage failures produce an `Err`; inspect the returned entry's
    /// `error` field for fetch and parse failures.
    pub async fn fetch(&self, url: &str) -> Result<FeedEntry, CacheError> {
        let mut etag = None;
        let mut modified = None;
        let mut cached: Option<FeedEntry> = None;

        if let Some(stored_at) = self.storage.modified_time(url).await? {
            let entry = self.storage.content(url).await?;
            let age = Utc::now() - stored_at;
            if age <= self.time_to_live {
                self.observer.on_event(CacheEvent::Hit { url });
                return Ok(entry);
            }
            self.observer.on_event(CacheEvent::Stale { url });

            // Out of date, but the stored validators let the server answer
            // 304 instead of resending the feed.
            etag = entry.etag.clone();
            modified = entry.modified.clone();
            cached = Some(entry);
        } else {
            self.observer.on_event(CacheEvent::Miss { url });
        }

        let result = self
            .fetcher
            .fetch(url, &self.user_agent, modified.as_deref(), etag.as_deref())
            .await;

        if result.is_not_modified() {
            if let Some(entry) = cached {
                // The 304 result carries no payload; refresh the timestamp
                // and serve the stored entry.
                self.observer.on_event(CacheEvent::Revalidated { url });
                self.storage.mark_updated(url).await?;
                return Ok(entry);
            }
            // A 304 answer to an unconditional request. Nothing is stored to
            // serve, so surface the empty result without touching storage.
            return Ok(FeedEntry::from(result));
        }

        self.persist_if_clean(url, result).await
    }

    /// Persists new content unless the fetch reported an error
    async fn persist_if_clean(
        &self,
        url: &str,
        result: FetchResult,
    ) -> Result<FeedEntry, CacheError> {
        if let FetchOutcome::Failed { ref error } = result.outcome {
            // Never overwrite a good stored entry with error or partial
            // data; the caller still sees the error-bearing result.
            self.observer.on_event(CacheEvent::NotStored {
                url,
                error: &error.to_string(),
            });
            return Ok(FeedEntry::from(result));
        }

        let entry = FeedEntry::from(result);
        self.observer.on_event(CacheEvent::Stored { url });
        self.storage.set(url, entry.clone()).await?;
        Ok(entry)
    }
}
