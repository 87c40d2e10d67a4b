use axum::http::StatusCode;
use axum::response::{IntoResponse, Response};
use serde_json::json;

use crate::upstream::UpstreamError;
use crate::xml::FeedParseError;

/// Relay error type for HTTP handlers.
///
/// Implements [`IntoResponse`] to produce `{ "error": ..., "code": ... }`
/// JSON bodies. Upstream problems surface as `502 Bad Gateway` so the client
/// treats them as a failed attempt and retries.
#[derive(Debug, thiserror::Error)]
pub enum AppError {
    /// The upstream feed could not be fetched.
    #[error(transparent)]
    Upstream(#[from] UpstreamError),

    /// The upstream feed was not a readable RSS document.
    #[error(transparent)]
    FeedParse(#[from] FeedParseError),

    /// A bad request with a human-readable message.
    #[error("Bad request: {0}")]
    BadRequest(String),

    /// An internal error with a human-readable message.
    #[error("Internal error: {0}")]
    InternalError(String),
}

/// Convenience type alias for handler return values.
pub type AppResult<T> = Result<T, AppError>;

impl IntoResponse for AppError {
    fn into_response(self) -> Response {
        let (status, code, message) = match &self {
            AppError::Upstream(err) => {
                tracing::warn!(error = %err, "Upstream feed unavailable");
                (StatusCode::BAD_GATEWAY, "UPSTREAM_ERROR", err.to_string())
            }
            AppError::FeedParse(err) => {
                tracing::warn!(error = %err, "Upstream feed unreadable");
                (StatusCode::BAD_GATEWAY, "UPSTREAM_PARSE_ERROR", err.to_string())
            }
            AppError::BadRequest(msg) => (StatusCode::BAD_REQUEST, "BAD_REQUEST", msg.clone()),
            AppError::InternalError(msg) => {
                tracing::error!(error = %msg, "Internal error");
                (
                    StatusCode::INTERNAL_SERVER_ERROR,
                    "INTERNAL_ERROR",
                    "An internal error occurred".to_string(),
                )
            }
        };

        let body = json!({
            "error": message,
            "code": code,
        });

        (status, axum::Json(body)).into_response()
    }
}
