//! Cache observability
//!
//! The engine reports what it decided for each lookup through an injected
//! [`CacheObserver`] rather than a process-wide logger. [`LogObserver`]
//! forwards events to the `log` facade and is the default; [`NullObserver`]
//! discards everything.

/// One decision made by the cache engine during a lookup
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum CacheEvent<'a> {
    /// The stored entry was fresh and served without network access
    Hit { url: &'a str },
    /// A stored entry exists but its age exceeded the TTL
    Stale { url: &'a str },
    /// Nothing was stored for this URL
    Miss { url: &'a str },
    /// A conditional fetch confirmed the stored entry is still current
    Revalidated { url: &'a str },
    /// New content was fetched and persisted
    Stored { url: &'a str },
    /// The fetch reported an error, so the result was not persisted
    NotStored { url: &'a str, error: &'a str },
}

/// Receives cache decision events
///
/// Injected at construction so the engine carries no global mutable state.
pub trait CacheObserver: Send + Sync {
    /// Called once per decision during a lookup
    fn on_event(&self, event: CacheEvent<'_>);
}

/// Observer that forwards events to the `log` facade
///
/// Decisions log at debug level; a refusal to persist an error-bearing
/// result logs at warn level.
#[derive(Debug, Clone, Copy, Default)]
pub struct LogObserver;

impl CacheObserver for LogObserver {
    fn on_event(&self, event: CacheEvent<'_>) {
        match event {
            CacheEvent::Hit { url } => log::debug!("cache contents still valid for {url}"),
            CacheEvent::Stale { url } => log::debug!("cache contents older than TTL for {url}"),
            CacheEvent::Miss { url } => log::debug!("nothing in the cache for {url}"),
            CacheEvent::Revalidated { url } => log::debug!("server confirmed cache current for {url}"),
            CacheEvent::Stored { url } => log::debug!("updating stored data for {url}"),
            CacheEvent::NotStored { url, error } => {
                log::warn!("not storing data for {url} with error: {error}");
            }
        }
    }
}

/// Observer that discards every event
#[derive(Debug, Clone, Copy, Default)]
pub struct NullObserver;

impl CacheObserver for NullObserver {
    fn on_event(&self, _event: CacheEvent<'_>) {}
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::sync::{Arc, Mutex};

    /// Observer that records event descriptions for assertions
    #[derive(Debug, Clone, Default)]
    pub struct RecordingObserver {
        events: Arc<Mutex<Vec<String>>>,
    }

    impl CacheObserver for RecordingObserver {
        fn on_event(&self, event: CacheEvent<'_>) {
            self.events
                .lock()
                .expect("Observer lock should not be poisoned")
                .push(format!("{:?}", event));
        }
    }

    #[test]
    fn test_recording_observer_captures_events() {
        let observer = RecordingObserver::default();

        observer.on_event(CacheEvent::Hit { url: "https://example.com/feed.xml" });
        observer.on_event(CacheEvent::Miss { url: "https://example.com/other.xml" });

        let events = observer.events.lock().expect("Lock should not be poisoned");
        assert_eq!(events.len(), 2);
        assert!(events[0].contains("Hit"));
        assert!(events[1].contains("Miss"));
    }

    #[test]
    fn test_null_observer_accepts_events() {
        let observer = NullObserver;
        observer.on_event(CacheEvent::Stale { url: "https://example.com/feed.xml" });
    }
}
