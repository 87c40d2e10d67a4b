//! Fetching the upstream Kuler feeds.

use std::time::Duration;

use async_trait::async_trait;
use url::Url;

#[derive(Debug, thiserror::Error)]
pub enum UpstreamError {
    /// The HTTP request itself failed (network, DNS, TLS, timeout, etc.).
    #[error("Upstream request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The feed answered with a non-2xx status code.
    #[error("Upstream returned status {0}")]
    Status(u16),
}

/// Source of raw feed documents. The relay uses [`HttpFeedSource`]; tests
/// substitute canned documents.
#[async_trait]
pub trait FeedSource: Send + Sync {
    /// Fetch the document at `url` (which already carries the API key).
    async fn fetch(&self, url: &Url) -> Result<String, UpstreamError>;
}

/// Fetches feeds over HTTP with a per-request timeout.
#[derive(Debug, Clone)]
pub struct HttpFeedSource {
    client: reqwest::Client,
}

impl HttpFeedSource {
    pub fn new(timeout: Duration) -> Result<Self, UpstreamError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self { client })
    }
}

#[async_trait]
impl FeedSource for HttpFeedSource {
    async fn fetch(&self, url: &Url) -> Result<String, UpstreamError> {
        let response = self.client.get(url.clone()).send().await?;
        let status = response.status();
        if !status.is_success() {
            return Err(UpstreamError::Status(status.as_u16()));
        }
        Ok(response.text().await?)
    }
}
