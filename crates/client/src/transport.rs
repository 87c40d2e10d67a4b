//! One round trip to the relay.
//!
//! The relay answers `GET ?callback=&requestid=&request_url=` with
//! `callback({"items": [...]});`. Each attempt uses a fresh callback name;
//! [`HttpRelayTransport`] checks that the response is wrapped in the name it
//! sent before decoding the JSON inside.

use std::time::Duration;

use async_trait::async_trait;
use uuid::Uuid;

use crate::error::TransportError;

/// Query parameters of a single relay attempt.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct RelayRequest {
    /// Unique per attempt; the relay wraps its response in a call to it.
    pub callback: String,
    /// Random correlation id, logged by the relay.
    pub request_id: String,
    /// Full upstream feed URL (without the API key).
    pub request_url: String,
}

impl RelayRequest {
    pub fn new(request_url: impl Into<String>) -> Self {
        Self {
            callback: format!("kuler_{}", Uuid::new_v4().simple()),
            request_id: Uuid::new_v4().to_string(),
            request_url: request_url.into(),
        }
    }

    pub fn query_pairs(&self) -> [(&'static str, &str); 3] {
        [
            ("callback", self.callback.as_str()),
            ("requestid", self.request_id.as_str()),
            ("request_url", self.request_url.as_str()),
        ]
    }
}

/// Performs relay round trips. Implemented over HTTP by
/// [`HttpRelayTransport`]; tests substitute scripted transports.
#[async_trait]
pub trait RelayTransport: Send + Sync {
    /// Send one request and return the decoded JSON body.
    async fn fetch(&self, request: &RelayRequest) -> Result<serde_json::Value, TransportError>;
}

/// HTTP client for one relay endpoint.
#[derive(Debug, Clone)]
pub struct HttpRelayTransport {
    client: reqwest::Client,
    relay_url: String,
}

impl HttpRelayTransport {
    /// Create a transport whose attempts time out after `timeout`.
    pub fn new(relay_url: impl Into<String>, timeout: Duration) -> Result<Self, TransportError> {
        let client = reqwest::Client::builder().timeout(timeout).build()?;
        Ok(Self::with_client(client, relay_url))
    }

    /// Create a transport reusing an existing [`reqwest::Client`].
    pub fn with_client(client: reqwest::Client, relay_url: impl Into<String>) -> Self {
        Self {
            client,
            relay_url: relay_url.into(),
        }
    }

    pub fn relay_url(&self) -> &str {
        &self.relay_url
    }

    /// Ensure the response has a success status code.
    async fn ensure_success(
        response: reqwest::Response,
    ) -> Result<reqwest::Response, TransportError> {
        let status = response.status();
        if !status.is_success() {
            let body = response
                .text()
                .await
                .unwrap_or_else(|_| "<unreadable body>".to_string());
            return Err(TransportError::Status {
                status: status.as_u16(),
                body,
            });
        }
        Ok(response)
    }
}

#[async_trait]
impl RelayTransport for HttpRelayTransport {
    async fn fetch(&self, request: &RelayRequest) -> Result<serde_json::Value, TransportError> {
        tracing::debug!(
            request_id = %request.request_id,
            url = %request.request_url,
            "Sending relay request",
        );

        let response = self
            .client
            .get(&self.relay_url)
            .query(&request.query_pairs())
            .send()
            .await?;
        let body = Self::ensure_success(response).await?.text().await?;

        let json = unwrap_callback(&body, &request.callback)?;
        serde_json::from_str(json).map_err(|e| TransportError::Decode(e.to_string()))
    }
}

/// Extract the JSON from a `callback(...)` invocation.
///
/// A bare JSON body (relay called without a callback) is returned as is.
pub fn unwrap_callback<'a>(body: &'a str, callback: &str) -> Result<&'a str, TransportError> {
    let body = body.trim();
    if body.starts_with('{') || body.starts_with('[') {
        return Ok(body);
    }

    let Some(open) = body.find('(') else {
        return Err(TransportError::Decode(format!(
            "expected JSON or a {callback}(...) invocation"
        )));
    };
    let found = body[..open].trim();
    if found != callback {
        return Err(TransportError::CorrelationMismatch {
            expected: callback.to_string(),
            found: found.to_string(),
        });
    }

    let inner = body[open + 1..].trim_end().trim_end_matches(';').trim_end();
    inner
        .strip_suffix(')')
        .ok_or_else(|| TransportError::Decode("unterminated callback invocation".to_string()))
}
