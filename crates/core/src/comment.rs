//! Theme comments.

use std::fmt;

use chrono::{DateTime, NaiveDate, NaiveDateTime, Utc};
use serde::Serialize;

use crate::feed::CommentItem;

/// A comment left on a theme.
#[derive(Debug, Clone, PartialEq, Serialize)]
#[serde(rename_all = "camelCase")]
pub struct Comment {
    text: String,
    author: String,
    posted_at: String,
    posted_date: Option<DateTime<Utc>>,
}

impl Comment {
    pub fn new(text: impl Into<String>, author: impl Into<String>, posted_at: impl Into<String>) -> Self {
        let posted_at = posted_at.into();
        let posted_date = parse_posted_at(&posted_at);
        Self {
            text: text.into(),
            author: author.into(),
            posted_at,
            posted_date,
        }
    }

    pub fn from_item(item: CommentItem) -> Self {
        Self::new(item.comment, item.author, item.posted_at)
    }

    pub fn text(&self) -> &str {
        &self.text
    }

    pub fn author(&self) -> &str {
        &self.author
    }

    /// The timestamp exactly as the feed reported it.
    pub fn posted_at(&self) -> &str {
        &self.posted_at
    }

    /// The parsed timestamp, if the feed's format was recognized.
    pub fn posted_date(&self) -> Option<DateTime<Utc>> {
        self.posted_date
    }
}

impl fmt::Display for Comment {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "{} (by {}, {})", self.text, self.author, self.posted_at)
    }
}

/// Accepts RFC 2822 (RSS), RFC 3339, `YYYY-MM-DD HH:MM:SS` and `YYYYMMDD`.
/// Naive values are taken as UTC.
fn parse_posted_at(raw: &str) -> Option<DateTime<Utc>> {
    let raw = raw.trim();
    if raw.is_empty() {
        return None;
    }
    if let Ok(dt) = DateTime::parse_from_rfc2822(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(dt) = DateTime::parse_from_rfc3339(raw) {
        return Some(dt.with_timezone(&Utc));
    }
    if let Ok(naive) = NaiveDateTime::parse_from_str(raw, "%Y-%m-%d %H:%M:%S") {
        return Some(naive.and_utc());
    }
    NaiveDate::parse_from_str(raw, "%Y%m%d")
        .ok()
        .and_then(|date| date.and_hms_opt(0, 0, 0))
        .map(|naive| naive.and_utc())
}

#[cfg(test)]
mod tests {
    use chrono::{Datelike, Timelike};

    use super::*;

    #[test]
    fn parses_rss_dates() {
        let comment = Comment::new("Nice", "sam", "Thu, 02 Jan 2014 10:11:12 +0100");
        let date = comment.posted_date().unwrap();
        assert_eq!((date.year(), date.month(), date.day()), (2014, 1, 2));
        assert_eq!(date.hour(), 9);
    }

    #[test]
    fn parses_sql_style_timestamps() {
        let comment = Comment::new("Nice", "sam", "2014-01-02 10:11:12");
        assert_eq!(comment.posted_date().unwrap().minute(), 11);
    }

    #[test]
    fn unknown_format_keeps_raw_string() {
        let comment = Comment::new("Nice", "sam", "yesterday");
        assert!(comment.posted_date().is_none());
        assert_eq!(comment.posted_at(), "yesterday");
    }

    #[test]
    fn from_item_maps_fields() {
        let comment = Comment::from_item(CommentItem {
            comment: "Great palette".into(),
            author: "kim".into(),
            posted_at: "20140102".into(),
        });
        assert_eq!(comment.text(), "Great palette");
        assert_eq!(comment.author(), "kim");
        assert_eq!(comment.posted_date().unwrap().day(), 2);
    }
}
