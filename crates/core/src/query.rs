//! Feed request arguments and upstream query URL construction.
//!
//! Callers fill in one of the `*Request` structs (string-typed, so that
//! arbitrary user input can be checked) and call `validate()` to obtain a
//! typed [`FeedQuery`]. The query then renders to the upstream URL that the
//! relay forwards to Kuler.

use serde::{Deserialize, Serialize};
use url::Url;

use crate::error::CoreError;
use crate::types::{
    CommentFilter, Endpoint, ListType, SearchFilter, DEFAULT_ITEMS_PER_PAGE, DEFAULT_START_INDEX,
    DEFAULT_TIME_SPAN,
};
use crate::validation::{
    require_query, strip_html_tags, validate_comment_search, validate_theme_search,
};

// ---------------------------------------------------------------------------
// Feed URLs
// ---------------------------------------------------------------------------

/// Base URLs of the three upstream feeds.
///
/// Must match the endpoint set registered with the relay, which compares the
/// portion of the request URL before `?` against it.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct FeedUrls {
    pub themes: String,
    pub search: String,
    pub comments: String,
}

impl FeedUrls {
    pub fn url_for(&self, endpoint: Endpoint) -> &str {
        match endpoint {
            Endpoint::Themes => &self.themes,
            Endpoint::Search => &self.search,
            Endpoint::Comments => &self.comments,
        }
    }

    /// Identify which feed a full request URL targets, if any.
    pub fn endpoint_of(&self, request_url: &str) -> Option<Endpoint> {
        let (base, _) = request_url.split_once('?')?;
        Endpoint::ALL
            .into_iter()
            .find(|endpoint| self.url_for(*endpoint) == base)
    }
}

impl Default for FeedUrls {
    fn default() -> Self {
        Self {
            themes: Endpoint::Themes.default_url().to_string(),
            search: Endpoint::Search.default_url().to_string(),
            comments: Endpoint::Comments.default_url().to_string(),
        }
    }
}

// ---------------------------------------------------------------------------
// Requests
// ---------------------------------------------------------------------------

/// Arguments of the theme list feed. Defaults: `recent`, 0, 0, 20.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ThemeListRequest {
    pub list_type: String,
    pub start_index: u32,
    pub time_span: u32,
    pub items_per_page: u32,
}

impl Default for ThemeListRequest {
    fn default() -> Self {
        Self {
            list_type: ListType::default().as_str().to_string(),
            start_index: DEFAULT_START_INDEX,
            time_span: DEFAULT_TIME_SPAN,
            items_per_page: DEFAULT_ITEMS_PER_PAGE,
        }
    }
}

impl ThemeListRequest {
    pub fn new(list_type: impl Into<String>) -> Self {
        Self {
            list_type: list_type.into(),
            ..Default::default()
        }
    }

    pub fn with_start_index(mut self, start_index: u32) -> Self {
        self.start_index = start_index;
        self
    }

    pub fn with_time_span(mut self, time_span: u32) -> Self {
        self.time_span = time_span;
        self
    }

    pub fn with_items_per_page(mut self, items_per_page: u32) -> Self {
        self.items_per_page = items_per_page;
        self
    }

    pub fn validate(&self) -> Result<FeedQuery, CoreError> {
        Ok(FeedQuery::List {
            list_type: self.list_type.parse()?,
            start_index: self.start_index,
            time_span: self.time_span,
            items_per_page: self.items_per_page,
        })
    }
}

/// Arguments of the theme search feed. `query` is mandatory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct ThemeSearchRequest {
    pub query: String,
    pub filter: String,
    pub start_index: u32,
    pub items_per_page: u32,
}

impl Default for ThemeSearchRequest {
    fn default() -> Self {
        Self {
            query: String::new(),
            filter: SearchFilter::None.as_str().to_string(),
            start_index: DEFAULT_START_INDEX,
            items_per_page: DEFAULT_ITEMS_PER_PAGE,
        }
    }
}

impl ThemeSearchRequest {
    pub fn new(query: impl Into<String>) -> Self {
        Self {
            query: query.into(),
            ..Default::default()
        }
    }

    pub fn with_filter(mut self, filter: impl Into<String>) -> Self {
        self.filter = filter.into();
        self
    }

    pub fn with_start_index(mut self, start_index: u32) -> Self {
        self.start_index = start_index;
        self
    }

    pub fn with_items_per_page(mut self, items_per_page: u32) -> Self {
        self.items_per_page = items_per_page;
        self
    }

    pub fn validate(&self) -> Result<FeedQuery, CoreError> {
        require_query(&self.query)?;
        let filter: SearchFilter = self.filter.parse()?;
        validate_theme_search(filter, &self.query)?;
        Ok(FeedQuery::Search {
            filter,
            query: self.query.clone(),
            start_index: self.start_index,
            items_per_page: self.items_per_page,
        })
    }
}

/// Arguments of the comments feed. `filter` and `query` are mandatory.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
#[serde(default, rename_all = "camelCase")]
pub struct CommentRequest {
    pub filter: String,
    pub query: String,
    pub start_index: u32,
    pub items_per_page: u32,
}

impl Default for CommentRequest {
    fn default() -> Self {
        Self {
            filter: String::new(),
            query: String::new(),
            start_index: DEFAULT_START_INDEX,
            items_per_page: DEFAULT_ITEMS_PER_PAGE,
        }
    }
}

impl CommentRequest {
    pub fn new(filter: impl Into<String>, query: impl Into<String>) -> Self {
        Self {
            filter: filter.into(),
            query: query.into(),
            ..Default::default()
        }
    }

    /// Comments on a single theme.
    pub fn for_theme(theme_id: impl Into<String>) -> Self {
        Self::new(CommentFilter::ByThemeId.as_str(), theme_id)
    }

    pub fn with_start_index(mut self, start_index: u32) -> Self {
        self.start_index = start_index;
        self
    }

    pub fn with_items_per_page(mut self, items_per_page: u32) -> Self {
        self.items_per_page = items_per_page;
        self
    }

    pub fn validate(&self) -> Result<FeedQuery, CoreError> {
        let filter: CommentFilter = self.filter.parse()?;
        validate_comment_search(filter, &self.query)?;
        Ok(FeedQuery::Comments {
            filter,
            query: self.query.clone(),
            start_index: self.start_index,
            items_per_page: self.items_per_page,
        })
    }
}

// ---------------------------------------------------------------------------
// FeedQuery
// ---------------------------------------------------------------------------

/// A validated request against one of the three feeds.
#[derive(Debug, Clone, PartialEq, Eq)]
pub enum FeedQuery {
    List {
        list_type: ListType,
        start_index: u32,
        time_span: u32,
        items_per_page: u32,
    },
    Search {
        filter: SearchFilter,
        query: String,
        start_index: u32,
        items_per_page: u32,
    },
    Comments {
        filter: CommentFilter,
        query: String,
        start_index: u32,
        items_per_page: u32,
    },
}

impl FeedQuery {
    pub fn endpoint(&self) -> Endpoint {
        match self {
            FeedQuery::List { .. } => Endpoint::Themes,
            FeedQuery::Search { .. } => Endpoint::Search,
            FeedQuery::Comments { .. } => Endpoint::Comments,
        }
    }

    /// Query string parameters, in the order the Kuler API documents them.
    ///
    /// Tag-like markup is removed from free-text queries here, before URL
    /// encoding turns `<` and `>` into `%3C` and `%3E`.
    pub fn params(&self) -> Vec<(&'static str, String)> {
        match self {
            FeedQuery::List {
                list_type,
                start_index,
                time_span,
                items_per_page,
            } => vec![
                ("listType", list_type.as_str().to_string()),
                ("startIndex", start_index.to_string()),
                ("timeSpan", time_span.to_string()),
                ("itemsPerPage", items_per_page.to_string()),
            ],
            FeedQuery::Search {
                filter,
                query,
                start_index,
                items_per_page,
            } => {
                let query = strip_html_tags(query);
                let search_query = match filter {
                    SearchFilter::None => query,
                    other => format!("{}:{query}", other.as_str()),
                };
                vec![
                    ("searchQuery", search_query),
                    ("startIndex", start_index.to_string()),
                    ("itemsPerPage", items_per_page.to_string()),
                ]
            }
            FeedQuery::Comments {
                filter,
                query,
                start_index,
                items_per_page,
            } => vec![
                (filter.as_str(), strip_html_tags(query)),
                ("startIndex", start_index.to_string()),
                ("itemsPerPage", items_per_page.to_string()),
            ],
        }
    }

    /// Render the full upstream URL for this query.
    pub fn to_url(&self, urls: &FeedUrls) -> Result<Url, CoreError> {
        let base = urls.url_for(self.endpoint());
        Url::parse_with_params(base, self.params())
            .map_err(|e| CoreError::Internal(format!("Invalid feed URL '{base}': {e}")))
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn list_defaults_render_expected_url() {
        let url = ThemeListRequest::default()
            .validate()
            .unwrap()
            .to_url(&FeedUrls::default())
            .unwrap();
        assert_eq!(
            url.as_str(),
            "https://kuler-api.adobe.com/feeds/rss/get.cfm?listType=recent&startIndex=0&timeSpan=0&itemsPerPage=20"
        );
    }

    #[test]
    fn unknown_list_type_fails_validation() {
        let err = ThemeListRequest::new("trending").validate().unwrap_err();
        assert_eq!(err.reason(), "Invalid list type");
    }

    #[test]
    fn search_query_is_prefixed_with_filter() {
        let query = ThemeSearchRequest::new("ocean")
            .with_filter("tag")
            .with_items_per_page(5)
            .validate()
            .unwrap();
        let params = query.params();
        assert_eq!(params[0], ("searchQuery", "tag:ocean".to_string()));
        assert_eq!(params[2], ("itemsPerPage", "5".to_string()));
        assert_eq!(query.endpoint(), Endpoint::Search);
    }

    #[test]
    fn unfiltered_search_uses_bare_query() {
        let query = ThemeSearchRequest::new("ocean").validate().unwrap();
        assert_eq!(query.params()[0], ("searchQuery", "ocean".to_string()));
    }

    #[test]
    fn markup_is_removed_before_encoding() {
        let search = ThemeSearchRequest::new("sunset <b>beach</b>")
            .with_filter("tag")
            .validate()
            .unwrap();
        let url = search.to_url(&FeedUrls::default()).unwrap();
        assert_eq!(
            url.as_str(),
            "https://kuler-api.adobe.com/rss/search.cfm?searchQuery=tag%3Asunset+beach&startIndex=0&itemsPerPage=20"
        );

        let bare = ThemeSearchRequest::new("<script>x</script>ocean").validate().unwrap();
        assert_eq!(bare.params()[0], ("searchQuery", "xocean".to_string()));
    }

    #[test]
    fn empty_search_query_is_rejected() {
        assert!(ThemeSearchRequest::new("").validate().is_err());
    }

    #[test]
    fn unknown_search_filter_is_rejected() {
        let err = ThemeSearchRequest::new("x")
            .with_filter("colour")
            .validate()
            .unwrap_err();
        assert_eq!(err.reason(), "Invalid search filter");
    }

    #[test]
    fn comments_use_filter_as_parameter_name() {
        let query = CommentRequest::for_theme("123456").validate().unwrap();
        let url = query.to_url(&FeedUrls::default()).unwrap();
        assert_eq!(
            url.as_str(),
            "https://kuler-api.adobe.com/rss/comments.cfm?themeID=123456&startIndex=0&itemsPerPage=20"
        );
    }

    #[test]
    fn comment_filter_is_mandatory() {
        let err = CommentRequest::new("", "123").validate().unwrap_err();
        assert_eq!(err.reason(), "Invalid comment search filter");
    }

    #[test]
    fn endpoint_of_matches_base_exactly() {
        let urls = FeedUrls::default();
        assert_eq!(
            urls.endpoint_of("https://kuler-api.adobe.com/rss/search.cfm?searchQuery=x"),
            Some(Endpoint::Search)
        );
        assert_eq!(urls.endpoint_of("https://kuler-api.adobe.com/rss/search.cfm"), None);
        assert_eq!(urls.endpoint_of("https://evil.example/rss/search.cfm?x=1"), None);
        assert_eq!(
            urls.endpoint_of("https://kuler-api.adobe.com/rss/search.cfm/extra?x=1"),
            None
        );
    }
}
