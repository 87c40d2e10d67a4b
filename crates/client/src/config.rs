use std::time::Duration;

use kuler_core::query::FeedUrls;

use crate::error::ClientError;
use crate::retry::RetryConfig;

/// Default per-attempt HTTP timeout.
const DEFAULT_REQUEST_TIMEOUT_SECS: u64 = 30;

/// Client configuration.
#[derive(Debug, Clone)]
pub struct ClientConfig {
    /// URL of the relay endpoint, e.g. `http://localhost:3000/relay`.
    pub relay_url: String,
    /// Upstream feed base URLs. Must match the relay's registered endpoints.
    pub feed_urls: FeedUrls,
    /// Timeout of a single relay attempt.
    pub request_timeout: Duration,
    /// Backoff between attempts.
    pub retry: RetryConfig,
}

impl ClientConfig {
    /// Configuration with defaults for everything but the relay URL.
    pub fn new(relay_url: impl Into<String>) -> Self {
        Self {
            relay_url: relay_url.into(),
            feed_urls: FeedUrls::default(),
            request_timeout: Duration::from_secs(DEFAULT_REQUEST_TIMEOUT_SECS),
            retry: RetryConfig::default(),
        }
    }

    /// Load configuration from environment variables.
    ///
    /// | Env Var                      | Default                       |
    /// |------------------------------|-------------------------------|
    /// | `KULER_RELAY_URL`            | required                      |
    /// | `KULER_REQUEST_TIMEOUT_SECS` | `30`                          |
    /// | `KULER_THEMES_URL`           | public Kuler theme list feed  |
    /// | `KULER_SEARCH_URL`           | public Kuler search feed      |
    /// | `KULER_COMMENTS_URL`         | public Kuler comments feed    |
    pub fn from_env() -> Result<Self, ClientError> {
        let relay_url = std::env::var("KULER_RELAY_URL")
            .map_err(|_| ClientError::Config("KULER_RELAY_URL must be set".into()))?;

        let request_timeout_secs: u64 = match std::env::var("KULER_REQUEST_TIMEOUT_SECS") {
            Ok(raw) => raw.parse().map_err(|_| {
                ClientError::Config("KULER_REQUEST_TIMEOUT_SECS must be a valid u64".into())
            })?,
            Err(_) => DEFAULT_REQUEST_TIMEOUT_SECS,
        };

        let defaults = FeedUrls::default();
        let feed_urls = FeedUrls {
            themes: std::env::var("KULER_THEMES_URL").unwrap_or(defaults.themes),
            search: std::env::var("KULER_SEARCH_URL").unwrap_or(defaults.search),
            comments: std::env::var("KULER_COMMENTS_URL").unwrap_or(defaults.comments),
        };

        Ok(Self {
            relay_url,
            feed_urls,
            request_timeout: Duration::from_secs(request_timeout_secs),
            retry: RetryConfig::default(),
        })
    }

    pub fn with_retry(mut self, retry: RetryConfig) -> Self {
        self.retry = retry;
        self
    }

    pub fn with_feed_urls(mut self, feed_urls: FeedUrls) -> Self {
        self.feed_urls = feed_urls;
        self
    }

    /// Reject configurations that cannot reach a relay.
    pub fn validate(&self) -> Result<(), ClientError> {
        if self.relay_url.trim().is_empty() {
            return Err(ClientError::Config("a relay URL is required".into()));
        }
        url::Url::parse(&self.relay_url)
            .map_err(|e| ClientError::Config(format!("invalid relay URL '{}': {e}", self.relay_url)))?;
        Ok(())
    }
}
