//! Feed fetching collaborator interface
//!
//! The cache engine delegates all network access to a [`FeedFetcher`]. The
//! fetcher never fails at the signature level: transport and parse problems
//! are swallowed into the returned [`FetchResult`] as a tagged
//! [`FetchOutcome::Failed`], which the engine pattern-matches to decide
//! whether the result may be persisted.

mod http;

pub use http::HttpFetcher;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use thiserror::Error;

/// HTTP status code signalling that cached content is still current
pub const STATUS_NOT_MODIFIED: u16 = 304;

/// Errors a fetch can report inside its result
///
/// The cache engine treats both variants identically (neither is persisted);
/// the distinction exists for callers inspecting the returned entry.
#[derive(Debug, Clone, PartialEq, Error, Serialize, Deserialize)]
pub enum FetchError {
    /// The request could not be completed (DNS, connection, timeout)
    #[error("transport error: {0}")]
    Transport(String),

    /// The response body was not a usable feed document
    #[error("malformed feed: {0}")]
    Parse(String),
}

/// What a fetch produced: content or a swallowed failure
#[derive(Debug, Clone, PartialEq)]
pub enum FetchOutcome {
    /// New content, with whatever validators the server supplied for next time
    Content {
        /// The feed payload, opaque to the cache
        feed: serde_json::Value,
        /// ETag header value for future conditional fetches
        etag: Option<String>,
        /// Last-Modified header value for future conditional fetches
        modified: Option<String>,
    },
    /// The fetch or parse failed; the error rides in the result
    Failed {
        /// What went wrong
        error: FetchError,
    },
}

/// The complete result of one fetch attempt
#[derive(Debug, Clone, PartialEq)]
pub struct FetchResult {
    /// HTTP status of the response, when one was received
    ///
    /// `Some(304)` signals "not modified"; every other value, including
    /// `None`, is treated uniformly as content-returned.
    pub status: Option<u16>,
    /// The tagged outcome of the attempt
    pub outcome: FetchOutcome,
}

impl FetchResult {
    /// Builds a successful content result
    pub fn content(
        status: Option<u16>,
        feed: serde_json::Value,
        etag: Option<String>,
        modified: Option<String>,
    ) -> Self {
        Self {
            status,
            outcome: FetchOutcome::Content {
                feed,
                etag,
                modified,
            },
        }
    }

    /// Builds a "not modified" result, which carries no usable payload
    pub fn not_modified() -> Self {
        Self {
            status: Some(STATUS_NOT_MODIFIED),
            outcome: FetchOutcome::Content {
                feed: serde_json::Value::Null,
                etag: None,
                modified: None,
            },
        }
    }

    /// Builds a failed result
    pub fn failed(status: Option<u16>, error: FetchError) -> Self {
        Self {
            status,
            outcome: FetchOutcome::Failed { error },
        }
    }

    /// Returns true if the server confirmed the cached copy is still current
    pub fn is_not_modified(&self) -> bool {
        self.status == Some(STATUS_NOT_MODIFIED)
    }
}

/// Fetches a feed, optionally conditionally
///
/// Implementations send `modified` and `etag` (when present) as
/// `If-Modified-Since` / `If-None-Match` so the server can answer 304
/// instead of resending content. Failures are reported inside the result,
/// never as a panic or an `Err`.
#[async_trait]
pub trait FeedFetcher: Send + Sync {
    /// Fetches `url`, identifying as `user_agent`, with optional validators
    async fn fetch(
        &self,
        url: &str,
        user_agent: &str,
        modified: Option<&str>,
        etag: Option<&str>,
    ) -> FetchResult;
}
