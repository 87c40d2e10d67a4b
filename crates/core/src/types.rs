//! Closed vocabularies of the Kuler feed API and their wire names.

use std::fmt;
use std::str::FromStr;

use serde::{Deserialize, Serialize};

use crate::error::CoreError;

// ---------------------------------------------------------------------------
// Defaults
// ---------------------------------------------------------------------------

/// Default `startIndex` (first item of the list).
pub const DEFAULT_START_INDEX: u32 = 0;

/// Default `timeSpan` in days (0 = no time limit).
pub const DEFAULT_TIME_SPAN: u32 = 0;

/// Default `itemsPerPage`.
pub const DEFAULT_ITEMS_PER_PAGE: u32 = 20;

/// Theme list feed.
pub const THEMES_URL: &str = "https://kuler-api.adobe.com/feeds/rss/get.cfm";

/// Theme search feed.
pub const SEARCH_URL: &str = "https://kuler-api.adobe.com/rss/search.cfm";

/// Theme comments feed.
pub const COMMENTS_URL: &str = "https://kuler-api.adobe.com/rss/comments.cfm";

// ---------------------------------------------------------------------------
// Endpoint
// ---------------------------------------------------------------------------

/// The three upstream feeds the relay is willing to forward to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum Endpoint {
    Themes,
    Search,
    Comments,
}

impl Endpoint {
    pub const ALL: [Endpoint; 3] = [Endpoint::Themes, Endpoint::Search, Endpoint::Comments];

    /// The public Kuler URL for this feed.
    pub fn default_url(self) -> &'static str {
        match self {
            Endpoint::Themes => THEMES_URL,
            Endpoint::Search => SEARCH_URL,
            Endpoint::Comments => COMMENTS_URL,
        }
    }

    /// Whether items returned by this feed are comments rather than themes.
    pub fn yields_comments(self) -> bool {
        matches!(self, Endpoint::Comments)
    }
}

// ---------------------------------------------------------------------------
// ListType
// ---------------------------------------------------------------------------

/// Ordering of the theme list feed.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum ListType {
    #[default]
    #[serde(rename = "recent")]
    MostRecent,
    #[serde(rename = "popular")]
    Popular,
    #[serde(rename = "rating")]
    HighestRated,
    #[serde(rename = "random")]
    Random,
}

impl ListType {
    pub fn as_str(self) -> &'static str {
        match self {
            ListType::MostRecent => "recent",
            ListType::Popular => "popular",
            ListType::HighestRated => "rating",
            ListType::Random => "random",
        }
    }
}

impl FromStr for ListType {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "recent" => Ok(ListType::MostRecent),
            "popular" => Ok(ListType::Popular),
            "rating" => Ok(ListType::HighestRated),
            "random" => Ok(ListType::Random),
            _ => Err(CoreError::Validation("Invalid list type".to_string())),
        }
    }
}

impl fmt::Display for ListType {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// SearchFilter
// ---------------------------------------------------------------------------

/// Narrows a theme search to one field. [`SearchFilter::None`] searches
/// titles, tags, author names, ids and hex values at once.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default, Serialize, Deserialize)]
pub enum SearchFilter {
    #[default]
    #[serde(rename = "")]
    None,
    #[serde(rename = "themeID")]
    ThemeId,
    #[serde(rename = "userID")]
    UserId,
    #[serde(rename = "email")]
    Email,
    #[serde(rename = "tag")]
    Tag,
    #[serde(rename = "hex")]
    Hex,
    #[serde(rename = "title")]
    Title,
}

impl SearchFilter {
    pub fn as_str(self) -> &'static str {
        match self {
            SearchFilter::None => "",
            SearchFilter::ThemeId => "themeID",
            SearchFilter::UserId => "userID",
            SearchFilter::Email => "email",
            SearchFilter::Tag => "tag",
            SearchFilter::Hex => "hex",
            SearchFilter::Title => "title",
        }
    }
}

impl FromStr for SearchFilter {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "" => Ok(SearchFilter::None),
            "themeID" => Ok(SearchFilter::ThemeId),
            "userID" => Ok(SearchFilter::UserId),
            "email" => Ok(SearchFilter::Email),
            "tag" => Ok(SearchFilter::Tag),
            "hex" => Ok(SearchFilter::Hex),
            "title" => Ok(SearchFilter::Title),
            _ => Err(CoreError::Validation("Invalid search filter".to_string())),
        }
    }
}

impl fmt::Display for SearchFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// CommentFilter
// ---------------------------------------------------------------------------

/// Selects whose comments the comments feed returns.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Serialize, Deserialize)]
pub enum CommentFilter {
    /// Comments on themes created by the user with this email.
    #[serde(rename = "email")]
    ByEmail,
    /// Comments on one theme.
    #[serde(rename = "themeID")]
    ByThemeId,
}

impl CommentFilter {
    pub fn as_str(self) -> &'static str {
        match self {
            CommentFilter::ByEmail => "email",
            CommentFilter::ByThemeId => "themeID",
        }
    }
}

impl FromStr for CommentFilter {
    type Err = CoreError;

    fn from_str(s: &str) -> Result<Self, Self::Err> {
        match s {
            "email" => Ok(CommentFilter::ByEmail),
            "themeID" => Ok(CommentFilter::ByThemeId),
            _ => Err(CoreError::Validation(
                "Invalid comment search filter".to_string(),
            )),
        }
    }
}

impl fmt::Display for CommentFilter {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn list_type_accepts_known_names() {
        for name in ["recent", "popular", "rating", "random"] {
            let parsed: ListType = name.parse().expect("known list type");
            assert_eq!(parsed.as_str(), name);
        }
    }

    #[test]
    fn list_type_rejects_unknown_names() {
        for name in ["", "Recent", "newest", "rating ", "top"] {
            let err = name.parse::<ListType>().unwrap_err();
            assert_eq!(err.reason(), "Invalid list type");
        }
    }

    #[test]
    fn empty_search_filter_is_none() {
        assert_eq!("".parse::<SearchFilter>().unwrap(), SearchFilter::None);
    }

    #[test]
    fn unknown_search_filter_is_rejected() {
        let err = "author".parse::<SearchFilter>().unwrap_err();
        assert_eq!(err.reason(), "Invalid search filter");
    }

    #[test]
    fn comment_filter_wire_names() {
        assert_eq!(CommentFilter::ByEmail.to_string(), "email");
        assert_eq!(CommentFilter::ByThemeId.to_string(), "themeID");
        assert!("userID".parse::<CommentFilter>().is_err());
    }

    #[test]
    fn only_comments_endpoint_yields_comments() {
        assert!(Endpoint::Comments.yields_comments());
        assert!(!Endpoint::Themes.yields_comments());
        assert!(!Endpoint::Search.yields_comments());
    }
}
