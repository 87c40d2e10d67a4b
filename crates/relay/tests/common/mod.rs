#![allow(dead_code)]

use std::sync::{Arc, Mutex};

use async_trait::async_trait;
use axum::body::Body;
use axum::http::{Request, Response};
use axum::Router;
use http_body_util::BodyExt;
use tower::ServiceExt;
use url::Url;

use kuler_core::query::FeedUrls;
use kuler_relay::config::RelayConfig;
use kuler_relay::router::build_app_router;
use kuler_relay::state::AppState;
use kuler_relay::upstream::{FeedSource, UpstreamError};

pub const API_KEY: &str = "test-key";

pub const THEMES_URL: &str = "https://kuler-api.adobe.com/feeds/rss/get.cfm";
pub const SEARCH_URL: &str = "https://kuler-api.adobe.com/rss/search.cfm";
pub const COMMENTS_URL: &str = "https://kuler-api.adobe.com/rss/comments.cfm";

pub const THEME_FEED: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<rss version="2.0" xmlns:kuler="http://kuler.adobe.com/kuler/API/rss/">
  <channel>
    <item>
      <title>Ocean</title>
      <link>https://color.adobe.com/themeID/1234</link>
      <description>Deep   blue
        water</description>
      <pubDate>Thu, 02 Jan 2014 10:11:12 +0000</pubDate>
      <kuler:themeItem>
        <kuler:themeID>1234</kuler:themeID>
        <kuler:themeTitle>Ocean</kuler:themeTitle>
        <kuler:themeImage>https://color.adobe.com/1234.png</kuler:themeImage>
        <kuler:themeAuthor>
          <kuler:authorID>42</kuler:authorID>
          <kuler:authorLabel>jane</kuler:authorLabel>
        </kuler:themeAuthor>
        <kuler:themeTags>blue, sea</kuler:themeTags>
        <kuler:themeRating>4</kuler:themeRating>
        <kuler:themeDownLoadCount>17</kuler:themeDownLoadCount>
        <kuler:themeCreatedAt>20140102</kuler:themeCreatedAt>
        <kuler:themeEditedAt>20140103</kuler:themeEditedAt>
        <kuler:themeSwatches>
          <kuler:swatch>
            <kuler:swatchHexColor>FFFFFF</kuler:swatchHexColor>
            <kuler:swatchColorMode>rgb</kuler:swatchColorMode>
            <kuler:swatchChannel1>1.0</kuler:swatchChannel1>
            <kuler:swatchChannel2>1.0</kuler:swatchChannel2>
            <kuler:swatchChannel3>1.0</kuler:swatchChannel3>
            <kuler:swatchChannel4>0.0</kuler:swatchChannel4>
            <kuler:swatchIndex>0</kuler:swatchIndex>
          </kuler:swatch>
          <kuler:swatch>
            <kuler:swatchHexColor>000000</kuler:swatchHexColor>
            <kuler:swatchColorMode>rgb</kuler:swatchColorMode>
            <kuler:swatchChannel1>0.0</kuler:swatchChannel1>
            <kuler:swatchChannel2>0.0</kuler:swatchChannel2>
            <kuler:swatchChannel3>0.0</kuler:swatchChannel3>
            <kuler:swatchChannel4>0.0</kuler:swatchChannel4>
            <kuler:swatchIndex>1</kuler:swatchIndex>
          </kuler:swatch>
        </kuler:themeSwatches>
      </kuler:themeItem>
    </item>
    <item>
      <title>No swatches</title>
      <kuler:themeItem>
        <kuler:themeID>5678</kuler:themeID>
        <kuler:themeSwatches/>
      </kuler:themeItem>
    </item>
  </channel>
</rss>"#;

pub const COMMENT_FEED: &str = r#"<?xml version="1.0" encoding="UTF-8"?>
<rss version="2.0" xmlns:kuler="http://kuler.adobe.com/kuler/API/rss/">
  <channel>
    <item>
      <kuler:commentItem>
        <kuler:comment>Lovely</kuler:comment>
        <kuler:author>sam</kuler:author>
        <kuler:postedAt>2014-01-02 10:11:12</kuler:postedAt>
      </kuler:commentItem>
    </item>
  </channel>
</rss>"#;

/// Feed source serving canned documents and recording requested URLs.
#[derive(Default)]
pub struct StaticFeeds {
    themes: Option<String>,
    comments: Option<String>,
    requested: Mutex<Vec<Url>>,
}

impl StaticFeeds {
    /// Serves [`THEME_FEED`] and [`COMMENT_FEED`].
    pub fn standard() -> Self {
        Self::serving(THEME_FEED, COMMENT_FEED)
    }

    pub fn serving(themes: &str, comments: &str) -> Self {
        Self {
            themes: Some(themes.to_string()),
            comments: Some(comments.to_string()),
            ..Default::default()
        }
    }

    /// Every fetch fails with a 503 from upstream.
    pub fn unavailable() -> Self {
        Self::default()
    }

    pub fn requested(&self) -> Vec<Url> {
        self.requested.lock().unwrap().clone()
    }
}

#[async_trait]
impl FeedSource for StaticFeeds {
    async fn fetch(&self, url: &Url) -> Result<String, UpstreamError> {
        self.requested.lock().unwrap().push(url.clone());
        let document = if url.as_str().starts_with(COMMENTS_URL) {
            &self.comments
        } else {
            &self.themes
        };
        document.clone().ok_or(UpstreamError::Status(503))
    }
}

/// Relay configuration with safe defaults and no Referer allow-list.
pub fn test_config() -> RelayConfig {
    RelayConfig {
        host: "127.0.0.1".to_string(),
        port: 0,
        api_key: API_KEY.to_string(),
        allowed_domains: Vec::new(),
        cors_origins: vec!["http://localhost:5173".to_string()],
        request_timeout_secs: 30,
        upstream_timeout_secs: 5,
        feed_urls: FeedUrls::default(),
    }
}

pub fn build_test_app(config: RelayConfig, feeds: Arc<StaticFeeds>) -> Router {
    build_app_router(AppState {
        config: Arc::new(config),
        feeds,
    })
}

/// Relay URI for `request_url`, with an optional callback.
pub fn relay_uri(request_url: &str, callback: Option<&str>) -> String {
    let mut url = Url::parse("http://relay.test/relay").unwrap();
    {
        let mut pairs = url.query_pairs_mut();
        if let Some(callback) = callback {
            pairs.append_pair("callback", callback);
        }
        pairs.append_pair("requestid", "test-request");
        pairs.append_pair("request_url", request_url);
    }
    format!("/relay?{}", url.query().unwrap_or_default())
}

pub async fn get(app: Router, uri: &str) -> Response<Body> {
    send(app, Request::get(uri).body(Body::empty()).unwrap()).await
}

pub async fn get_with_referer(app: Router, uri: &str, referer: &str) -> Response<Body> {
    let request = Request::get(uri)
        .header("Referer", referer)
        .body(Body::empty())
        .unwrap();
    send(app, request).await
}

pub async fn send(app: Router, request: Request<Body>) -> Response<Body> {
    app.oneshot(request).await.unwrap()
}

pub async fn body_text(response: Response<Body>) -> String {
    let bytes = response.into_body().collect().await.unwrap().to_bytes();
    String::from_utf8(bytes.to_vec()).unwrap()
}

pub async fn body_json(response: Response<Body>) -> serde_json::Value {
    serde_json::from_str(&body_text(response).await).unwrap()
}
