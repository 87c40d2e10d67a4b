//! Single-flight relay fetch with bounded retry.
//!
//! [`FeedLoader::load`] accepts one request at a time. A response counts as
//! successful when its JSON carries an `items` array; anything else (a
//! malformed body, a relay rejection, a transport error) is a failed attempt
//! and is retried until [`MAX_ATTEMPTS`] attempts have been made. The loader
//! returns to idle before it emits the terminal `complete` or `failed` event.

use std::sync::{Arc, PoisonError, RwLock};

use kuler_core::validation::strip_html_tags;
use kuler_events::EventChannel;
use tokio_util::sync::CancellationToken;

use crate::error::LoadError;
use crate::events::LoaderEvent;
use crate::flight::SingleFlight;
use crate::retry::{next_delay, RetryConfig, MAX_ATTEMPTS};
use crate::transport::{RelayRequest, RelayTransport};

/// Items of a successful relay response.
pub type FeedItems = Arc<Vec<serde_json::Value>>;

/// Fetches feed URLs through the relay, one at a time.
pub struct FeedLoader {
    transport: Arc<dyn RelayTransport>,
    retry: RetryConfig,
    flight: SingleFlight,
    events: EventChannel<LoaderEvent>,
    last_response: RwLock<Option<FeedItems>>,
}

impl FeedLoader {
    pub fn new(transport: Arc<dyn RelayTransport>, retry: RetryConfig) -> Self {
        Self {
            transport,
            retry,
            flight: SingleFlight::new(),
            events: EventChannel::default(),
            last_response: RwLock::new(None),
        }
    }

    pub fn events(&self) -> &EventChannel<LoaderEvent> {
        &self.events
    }

    pub fn is_busy(&self) -> bool {
        self.flight.is_busy()
    }

    /// Items of the most recent successful request.
    pub fn last_response(&self) -> Option<FeedItems> {
        self.last_response
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .clone()
    }

    /// Cancel the in-flight request, if any. The pending [`load`](Self::load)
    /// resolves with [`LoadError::Cancelled`].
    pub fn cancel(&self) -> bool {
        self.flight.cancel()
    }

    /// Fetch `request_url` through the relay.
    ///
    /// HTML-tag-like substrings are stripped from the URL first. While a
    /// request is in flight, further calls fail immediately with
    /// [`LoadError::Busy`] and leave the running request untouched.
    pub async fn load(&self, request_url: &str) -> Result<FeedItems, LoadError> {
        if request_url.trim().is_empty() {
            return Err(self.fail(LoadError::InvalidUrl));
        }

        let Some(guard) = self.flight.try_begin() else {
            tracing::debug!(url = request_url, "Loader busy, rejecting request");
            return Err(self.fail(LoadError::Busy));
        };

        let url = strip_html_tags(request_url);
        let result = self.run(&url, guard.cancel_token()).await;
        guard.finish();

        match result {
            Ok(items) => {
                *self
                    .last_response
                    .write()
                    .unwrap_or_else(PoisonError::into_inner) = Some(Arc::clone(&items));
                self.events.emit(LoaderEvent::Complete {
                    message: "Complete".to_string(),
                    items: Arc::clone(&items),
                });
                Ok(items)
            }
            Err(err) => Err(self.fail(err)),
        }
    }

    fn fail(&self, err: LoadError) -> LoadError {
        self.events.emit(LoaderEvent::Failed {
            message: err.to_string(),
            busy: matches!(err, LoadError::Busy),
        });
        err
    }

    async fn run(&self, url: &str, cancel: &CancellationToken) -> Result<FeedItems, LoadError> {
        let cancelled = || LoadError::Cancelled {
            url: url.to_string(),
        };
        let mut delay = self.retry.initial_delay;

        for attempt in 1..=MAX_ATTEMPTS {
            let request = RelayRequest::new(url);

            let result = tokio::select! {
                _ = cancel.cancelled() => return Err(cancelled()),
                result = self.transport.fetch(&request) => result,
            };

            match result {
                Ok(body) => match extract_items(body) {
                    Some(items) => {
                        tracing::debug!(
                            attempt,
                            request_id = %request.request_id,
                            items = items.len(),
                            "Relay request complete",
                        );
                        return Ok(Arc::new(items));
                    }
                    None => tracing::warn!(
                        attempt,
                        request_id = %request.request_id,
                        url,
                        "Relay response has no item collection",
                    ),
                },
                Err(e) => tracing::warn!(
                    attempt,
                    request_id = %request.request_id,
                    url,
                    error = %e,
                    "Relay request failed",
                ),
            }

            if attempt < MAX_ATTEMPTS && !delay.is_zero() {
                tokio::select! {
                    _ = cancel.cancelled() => return Err(cancelled()),
                    _ = tokio::time::sleep(delay) => {}
                }
                delay = next_delay(delay, &self.retry);
            }
        }

        tracing::error!(url, attempts = MAX_ATTEMPTS, "Relay request failed after all attempts");
        Err(LoadError::Exhausted {
            url: url.to_string(),
            attempts: MAX_ATTEMPTS,
        })
    }
}

impl std::fmt::Debug for FeedLoader {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("FeedLoader")
            .field("retry", &self.retry)
            .field("flight", &self.flight)
            .finish_non_exhaustive()
    }
}

/// Take the `items` array out of a relay response body.
fn extract_items(body: serde_json::Value) -> Option<Vec<serde_json::Value>> {
    match body {
        serde_json::Value::Object(mut map) => match map.remove("items") {
            Some(serde_json::Value::Array(items)) => Some(items),
            _ => None,
        },
        _ => None,
    }
}
