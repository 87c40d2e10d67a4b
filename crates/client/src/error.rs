//! Error types for each client layer.

use kuler_core::CoreError;

/// Errors from a single relay round trip.
#[derive(Debug, thiserror::Error)]
pub enum TransportError {
    /// The HTTP request itself failed (network, DNS, TLS, timeout, etc.).
    #[error("HTTP request failed: {0}")]
    Request(#[from] reqwest::Error),

    /// The relay returned a non-2xx status code.
    #[error("Relay error ({status}): {body}")]
    Status {
        /// HTTP status code.
        status: u16,
        /// Raw response body for debugging.
        body: String,
    },

    /// The body was not JSON (or JSON wrapped in a callback invocation).
    #[error("Malformed relay response: {0}")]
    Decode(String),

    /// The body answered a different request than the one sent.
    #[error("Relay response for '{found}' does not match request '{expected}'")]
    CorrelationMismatch {
        /// Callback name sent with the request.
        expected: String,
        /// Callback name found in the response.
        found: String,
    },
}

/// Terminal outcomes of [`crate::FeedLoader::load`] other than success.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum LoadError {
    #[error("load(): a valid request URL is required")]
    InvalidUrl,

    #[error("A request is already in progress")]
    Busy,

    #[error("Request for {url} failed after {attempts} attempts.")]
    Exhausted { url: String, attempts: u32 },

    #[error("Request for {url} was cancelled")]
    Cancelled { url: String },
}

/// Errors surfaced by [`crate::KulerClient`] operations.
///
/// Every variant is also published as a `failed` event on the client's
/// channel; the returned value lets callers that simply `await` an
/// operation inspect the same outcome.
#[derive(Debug, Clone, PartialEq, thiserror::Error)]
pub enum ClientError {
    /// Arguments were rejected before any request was issued.
    #[error("{0}")]
    Validation(String),

    /// Another request is still in flight on this instance.
    #[error("Busy")]
    Busy,

    /// The request failed after exhausting its retry budget.
    #[error("{0}")]
    Failed(String),

    /// The request was cancelled with [`crate::KulerClient::cancel`].
    #[error("{0}")]
    Cancelled(String),

    /// The client could not be constructed.
    #[error("Configuration error: {0}")]
    Config(String),
}

impl ClientError {
    pub fn is_busy(&self) -> bool {
        matches!(self, ClientError::Busy)
    }

    /// Prefix a validation failure with the operation that rejected it,
    /// e.g. `"load_themes(): Invalid list type"`.
    pub(crate) fn validation(operation: &str, err: &CoreError) -> Self {
        ClientError::Validation(format!("{operation}(): {}", err.reason()))
    }
}

impl From<LoadError> for ClientError {
    fn from(err: LoadError) -> Self {
        match err {
            LoadError::Busy => ClientError::Busy,
            LoadError::Cancelled { .. } => ClientError::Cancelled(err.to_string()),
            LoadError::InvalidUrl | LoadError::Exhausted { .. } => {
                ClientError::Failed(err.to_string())
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn exhausted_message_names_url_and_attempts() {
        let err = LoadError::Exhausted {
            url: "https://x/feed?a=1".into(),
            attempts: 5,
        };
        assert_eq!(
            err.to_string(),
            "Request for https://x/feed?a=1 failed after 5 attempts."
        );
    }

    #[test]
    fn busy_load_error_maps_to_busy_client_error() {
        assert!(ClientError::from(LoadError::Busy).is_busy());
        assert!(!ClientError::from(LoadError::InvalidUrl).is_busy());
    }

    #[test]
    fn validation_error_is_prefixed_with_operation() {
        let err = ClientError::validation(
            "load_themes",
            &CoreError::Validation("Invalid list type".into()),
        );
        assert_eq!(err.to_string(), "load_themes(): Invalid list type");
    }

    #[test]
    fn transport_status_display() {
        let err = TransportError::Status {
            status: 502,
            body: "bad gateway".into(),
        };
        assert_eq!(err.to_string(), "Relay error (502): bad gateway");
    }
}
