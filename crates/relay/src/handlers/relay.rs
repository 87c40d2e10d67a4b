//! Handler for the feed relay endpoint.
//!
//! Request flow:
//!
//! 1. Validate the callback name.
//! 2. When an allow-list is configured, the `Referer` host must be on it.
//! 3. `request_url` must target one of the configured feeds (compared on the
//!    part before `?`).
//! 4. Append the API key, fetch the feed and map its items.
//!
//! Failing step 2 or 3 answers an empty `[]` rather than an error, which the
//! client treats as a malformed response.

use axum::extract::{Query, State};
use axum::http::header::REFERER;
use axum::http::HeaderMap;
use axum::response::Response;
use kuler_core::feed::FeedResponse;
use serde::Deserialize;
use url::Url;

use crate::error::{AppError, AppResult};
use crate::response::{empty_response, feed_response, validate_callback};
use crate::state::AppState;
use crate::xml::{parse_comment_feed, parse_theme_feed};

/// Query parameters of `GET /relay`.
#[derive(Debug, Default, Deserialize)]
pub struct RelayParams {
    pub callback: Option<String>,
    pub requestid: Option<String>,
    pub request_url: Option<String>,
}

/// GET /relay
pub async fn relay_feed(
    State(state): State<AppState>,
    headers: HeaderMap,
    Query(params): Query<RelayParams>,
) -> AppResult<Response> {
    let callback = params.callback.as_deref().filter(|c| !c.is_empty());
    if let Some(callback) = callback {
        validate_callback(callback)?;
    }
    let request_id = params.requestid.as_deref().unwrap_or("-");

    if !referer_allowed(&state.config.allowed_domains, &headers) {
        tracing::warn!(request_id, "Rejected relay request from unlisted referer");
        return empty_response(callback);
    }

    let Some(request_url) = params.request_url.as_deref().filter(|u| !u.is_empty()) else {
        tracing::debug!(request_id, "Relay request without request_url");
        return empty_response(callback);
    };

    let Some(endpoint) = state.config.feed_urls.endpoint_of(request_url) else {
        tracing::warn!(request_id, request_url, "Rejected relay request for unknown feed");
        return empty_response(callback);
    };

    let mut upstream_url = Url::parse(request_url)
        .map_err(|e| AppError::BadRequest(format!("Invalid request_url: {e}")))?;
    upstream_url
        .query_pairs_mut()
        .append_pair("key", &state.config.api_key);

    let document = state.feeds.fetch(&upstream_url).await?;

    if endpoint.yields_comments() {
        let items = parse_comment_feed(&document)?;
        tracing::info!(request_id, endpoint = ?endpoint, items = items.len(), "Relayed feed");
        feed_response(&FeedResponse::new(items), callback)
    } else {
        let items = parse_theme_feed(&document)?;
        tracing::info!(request_id, endpoint = ?endpoint, items = items.len(), "Relayed feed");
        feed_response(&FeedResponse::new(items), callback)
    }
}

/// Whether the request's `Referer` host is permitted. An empty allow-list
/// permits everything; otherwise a missing or unparseable referer is refused.
fn referer_allowed(allowed: &[String], headers: &HeaderMap) -> bool {
    if allowed.is_empty() {
        return true;
    }
    headers
        .get(REFERER)
        .and_then(|value| value.to_str().ok())
        .and_then(|referer| Url::parse(referer).ok())
        .and_then(|url| url.host_str().map(str::to_ascii_lowercase))
        .is_some_and(|host| allowed.iter().any(|d| d.eq_ignore_ascii_case(&host)))
}
