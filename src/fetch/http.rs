//! HTTP conditional-fetch implementation of [`FeedFetcher`]
//!
//! Performs a GET with `If-None-Match` / `If-Modified-Since` headers built
//! from the supplied validators. The response body is carried through as an
//! unexamined string payload; interpreting the feed format is the caller's
//! concern, not this crate's.

use async_trait::async_trait;
use reqwest::header::{ETAG, IF_MODIFIED_SINCE, IF_NONE_MATCH, LAST_MODIFIED, USER_AGENT};
use reqwest::{Client, Response};

use super::{FeedFetcher, FetchError, FetchResult, STATUS_NOT_MODIFIED};

/// [`FeedFetcher`] backed by a reqwest HTTP client
#[derive(Debug, Clone, Default)]
pub struct HttpFetcher {
    client: Client,
}

impl HttpFetcher {
    /// Creates a fetcher with a default HTTP client
    pub fn new() -> Self {
        Self::default()
    }

    /// Creates a fetcher using a caller-configured HTTP client
    ///
    /// Useful for setting timeouts, proxies, or TLS options; this crate
    /// configures none of those itself.
    pub fn with_client(client: Client) -> Self {
        Self { client }
    }

    /// Reads a response header as a string, ignoring non-UTF-8 values
    fn header_string(response: &Response, name: reqwest::header::HeaderName) -> Option<String> {
        response
            .headers()
            .get(name)
            .and_then(|value| value.to_str().ok())
            .map(str::to_string)
    }
}

#[async_trait]
impl FeedFetcher for HttpFetcher {
    async fn fetch(
        &self,
        url: &str,
        user_agent: &str,
        modified: Option<&str>,
        etag: Option<&str>,
    ) -> FetchResult {
        let mut request = self.client.get(url).header(USER_AGENT, user_agent);
        if let Some(modified) = modified {
            request = request.header(IF_MODIFIED_SINCE, modified);
        }
        if let Some(etag) = etag {
            request = request.header(IF_NONE_MATCH, etag);
        }

        let response = match request.send().await {
            Ok(response) => response,
            Err(error) => {
                return FetchResult::failed(
                    error.status().map(|status| status.as_u16()),
                    FetchError::Transport(error.to_string()),
                );
            }
        };

        let status = response.status().as_u16();
        if status == STATUS_NOT_MODIFIED {
            return FetchResult::not_modified();
        }

        let etag = Self::header_string(&response, ETAG);
        let modified = Self::header_string(&response, LAST_MODIFIED);

        match response.text().await {
            Ok(body) => FetchResult::content(
                Some(status),
                serde_json::Value::String(body),
                etag,
                modified,
            ),
            Err(error) => {
                FetchResult::failed(Some(status), FetchError::Transport(error.to_string()))
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::fetch::FetchOutcome;

    #[tokio::test]
    async fn test_connection_refused_yields_failed_result() {
        // Bind to an ephemeral port, then release it so the connection is
        // refused locally; no external network access occurs.
        let listener =
            std::net::TcpListener::bind("127.0.0.1:0").expect("Binding an ephemeral port");
        let port = listener
            .local_addr()
            .expect("Bound socket should have an address")
            .port();
        drop(listener);

        let fetcher = HttpFetcher::new();
        let url = format!("http://127.0.0.1:{port}/rss.xml");
        let result = fetcher.fetch(&url, "feedcache-test", None, None).await;

        match result.outcome {
            FetchOutcome::Failed {
                error: FetchError::Transport(_),
            } => {}
            other => panic!("Expected transport failure, got {:?}", other),
        }
    }

    #[test]
    fn test_fetcher_is_cloneable() {
        let fetcher = HttpFetcher::new();
        let _handle = fetcher.clone();
    }
}
