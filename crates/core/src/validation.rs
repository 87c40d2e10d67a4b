//! Argument validation for search and comment queries.
//!
//! All checks are pure and run before any request is issued. Failures are
//! reported as [`CoreError::Validation`] carrying the human-readable reason.

use std::sync::LazyLock;

use regex::Regex;

use crate::error::CoreError;
use crate::types::{CommentFilter, SearchFilter};

// ---------------------------------------------------------------------------
// Patterns
// ---------------------------------------------------------------------------

/// Email address: dotted local part or quoted string, then a bracketed IPv4
/// literal or a domain with an alphabetic TLD.
pub const EMAIL_PATTERN: &str = r#"^(([^<>()\[\]\\.,;:\s@"]+(\.[^<>()\[\]\\.,;:\s@"]+)*)|(".+"))@((\[[0-9]{1,3}\.[0-9]{1,3}\.[0-9]{1,3}\.[0-9]{1,3}\])|(([a-zA-Z\-0-9]+\.)+[a-zA-Z]{2,}))$"#;

/// Six hex digits, optionally prefixed with `0x`.
pub const HEX_PATTERN: &str = r"^(0x)?[0-9A-Fa-f]{6}$";

/// Theme and user ids: optional sign followed by ASCII digits only.
pub const ID_PATTERN: &str = r"^[-+]?[0-9]*$";

/// Anything that looks like an HTML tag.
pub const HTML_TAG_PATTERN: &str = r"<.*?>";

static EMAIL_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(EMAIL_PATTERN).expect("valid regex"));
static HEX_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(HEX_PATTERN).expect("valid regex"));
static ID_RE: LazyLock<Regex> = LazyLock::new(|| Regex::new(ID_PATTERN).expect("valid regex"));
static HTML_TAG_RE: LazyLock<Regex> =
    LazyLock::new(|| Regex::new(HTML_TAG_PATTERN).expect("valid regex"));

// ---------------------------------------------------------------------------
// Predicates
// ---------------------------------------------------------------------------

pub fn is_valid_email(value: &str) -> bool {
    EMAIL_RE.is_match(value)
}

pub fn is_valid_hex(value: &str) -> bool {
    HEX_RE.is_match(value)
}

pub fn is_valid_id(value: &str) -> bool {
    ID_RE.is_match(value)
}

/// Remove every `<...>` sequence from `input`.
pub fn strip_html_tags(input: &str) -> String {
    HTML_TAG_RE.replace_all(input, "").into_owned()
}

// ---------------------------------------------------------------------------
// Query validation
// ---------------------------------------------------------------------------

fn invalid(reason: &str) -> CoreError {
    CoreError::Validation(reason.to_string())
}

/// Ensure a mandatory query argument is present.
pub fn require_query(query: &str) -> Result<(), CoreError> {
    if query.is_empty() {
        return Err(invalid("query argument is required and cannot be an empty string"));
    }
    Ok(())
}

/// Validate a theme search filter/query pair.
pub fn validate_theme_search(filter: SearchFilter, query: &str) -> Result<(), CoreError> {
    require_query(query)?;
    match filter {
        SearchFilter::ThemeId if !is_valid_id(query) => Err(invalid("Invalid themeID")),
        SearchFilter::UserId if !is_valid_id(query) => Err(invalid("Invalid userID")),
        SearchFilter::Email if !is_valid_email(query) => Err(invalid("Invalid email address")),
        SearchFilter::Hex if !is_valid_hex(query) => Err(invalid(
            "Invalid hex value. Must be in the format 'ABCDEF' or '0xABCDEF'",
        )),
        _ => Ok(()),
    }
}

/// Validate a comment feed filter/query pair.
pub fn validate_comment_search(filter: CommentFilter, query: &str) -> Result<(), CoreError> {
    require_query(query)?;
    match filter {
        CommentFilter::ByEmail if !is_valid_email(query) => {
            Err(invalid("Invalid email address"))
        }
        CommentFilter::ByThemeId if !is_valid_id(query) => Err(invalid("Invalid themeID")),
        _ => Ok(()),
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
