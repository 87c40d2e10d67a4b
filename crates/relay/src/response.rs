//! JSON / JSONP response bodies.
//!
//! The relay answers `application/json` by default and
//! `callback(<json>);` as `text/javascript` when the caller names a
//! callback.

use std::sync::LazyLock;

use axum::http::header::CONTENT_TYPE;
use axum::response::{IntoResponse, Response};
use regex::Regex;
use serde::Serialize;

use crate::error::{AppError, AppResult};

/// A JavaScript identifier, optionally a dotted path (`ns.handlers.cb`).
static CALLBACK_RE: LazyLock<Regex> = LazyLock::new(|| {
    Regex::new(r"^[A-Za-z_$][A-Za-z0-9_$]*(\.[A-Za-z_$][A-Za-z0-9_$]*)*$")
        .expect("valid callback regex")
});

/// Reject callback names that are not plain JavaScript identifier paths.
pub fn validate_callback(callback: &str) -> AppResult<()> {
    if CALLBACK_RE.is_match(callback) {
        Ok(())
    } else {
        Err(AppError::BadRequest(format!(
            "Invalid callback name '{callback}'"
        )))
    }
}

/// Serialize `payload` and wrap it for `callback` when one is given.
pub fn feed_response<T: Serialize>(payload: &T, callback: Option<&str>) -> AppResult<Response> {
    let json = serde_json::to_string(payload)
        .map_err(|e| AppError::InternalError(format!("Failed to encode response: {e}")))?;

    let response = match callback {
        Some(callback) => (
            [(CONTENT_TYPE, "text/javascript")],
            format!("{callback}({json});"),
        )
            .into_response(),
        None => ([(CONTENT_TYPE, "application/json")], json).into_response(),
    };
    Ok(response)
}

/// The `[]` body returned for rejected or unknown requests.
pub fn empty_response(callback: Option<&str>) -> AppResult<Response> {
    feed_response(&serde_json::json!([]), callback)
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn accepts_identifiers_and_dotted_paths() {
        for name in ["cb", "kuler_0f3a", "$jsonp", "app.feeds.onLoad", "_x1"] {
            assert!(validate_callback(name).is_ok(), "{name} should be accepted");
        }
    }

    #[test]
    fn rejects_script_injection() {
        for name in ["", "1cb", "alert(1)", "cb;evil", "a..b", "cb.", "<script>"] {
            assert!(validate_callback(name).is_err(), "{name} should be rejected");
        }
    }

    #[test]
    fn content_type_follows_callback() {
        let json = feed_response(&serde_json::json!({"items": []}), None).unwrap();
        assert_eq!(json.headers()[CONTENT_TYPE], "application/json");

        let jsonp = feed_response(&serde_json::json!({"items": []}), Some("cb")).unwrap();
        assert_eq!(jsonp.headers()[CONTENT_TYPE], "text/javascript");
    }
}
