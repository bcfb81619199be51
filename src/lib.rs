//! Feed caching library
//!
//! This crate provides a caching layer in front of a syndication-feed fetch
//! operation. A caller requests a feed by URL and receives either freshly
//! fetched content or a still-valid cached copy. HTTP conditional-fetch
//! validators (ETag, Last-Modified) are used to avoid redundant downloads
//! when the remote server reports "not modified."
//!
//! The core is [`FeedCache`], a decision engine that mediates between the
//! caller, a pluggable [`Storage`] backend, and a pluggable [`FeedFetcher`].
//! Both collaborators are traits, so any backing store or transport can be
//! plugged in; [`MemoryStorage`] and [`HttpFetcher`] are provided.

pub mod cache;
pub mod entry;
pub mod fetch;
pub mod observe;
pub mod storage;

pub use cache::{CacheError, FeedCache};
pub use entry::FeedEntry;
pub use fetch::{FeedFetcher, FetchError, FetchOutcome, FetchResult, HttpFetcher};
pub use observe::{CacheEvent, CacheObserver, LogObserver, NullObserver};
pub use storage::{MemoryStorage, Storage, StorageError};
