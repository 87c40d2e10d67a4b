//! The client library talking HTTP to a running relay.

mod common;

use std::sync::Arc;

use kuler_client::{ClientConfig, ClientError, KulerClient};
use kuler_client::retry::RetryConfig;
use kuler_core::query::{ThemeListRequest, ThemeSearchRequest};

use common::{build_test_app, test_config, StaticFeeds};

/// Serve the relay on an ephemeral port and return its `/relay` URL.
async fn spawn_relay(feeds: Arc<StaticFeeds>) -> String {
    let app = build_test_app(test_config(), feeds);
    let listener = tokio::net::TcpListener::bind("127.0.0.1:0").await.unwrap();
    let addr = listener.local_addr().unwrap();
    tokio::spawn(async move {
        axum::serve(listener, app).await.unwrap();
    });
    format!("http://{addr}/relay")
}

fn client(relay_url: String) -> KulerClient {
    KulerClient::new(ClientConfig::new(relay_url).with_retry(RetryConfig::immediate())).unwrap()
}

#[tokio::test]
async fn themes_and_comments_round_trip_through_the_relay() {
    let feeds = Arc::new(StaticFeeds::standard());
    let client = client(spawn_relay(feeds.clone()).await);

    let outcome = client.load_themes(ThemeListRequest::default()).await.unwrap();

    // The second feed item has no swatches and is dropped.
    assert_eq!(outcome.count, 1);
    let theme = client.theme_by_index(0).unwrap();
    assert_eq!(theme.id(), "1234");
    assert_eq!(theme.download_count(), 17);
    assert_eq!(theme.swatch_count(), 2);
    assert!(!theme.swatch_by_index(0).unwrap().is_dark());
    assert!(theme.swatch_by_index(1).unwrap().is_dark());

    let comments = client.theme_comments(&theme);
    let outcome = comments.load().await.unwrap();
    assert_eq!(outcome.count, 1);
    assert_eq!(comments.comment_by_index(0).unwrap().author(), "sam");

    let requested = feeds.requested();
    assert_eq!(requested.len(), 2);
    assert!(requested[1].as_str().contains("themeID=1234"));
    assert!(requested.iter().all(|url| url.as_str().ends_with("&key=test-key")));
}

#[tokio::test]
async fn upstream_outage_exhausts_the_retry_budget() {
    let feeds = Arc::new(StaticFeeds::unavailable());
    let client = client(spawn_relay(feeds.clone()).await);

    let err = client
        .search_themes(ThemeSearchRequest::new("ocean").with_filter("tag"))
        .await
        .unwrap_err();

    assert!(matches!(err, ClientError::Failed(ref msg) if msg.ends_with("after 5 attempts.")));
    assert_eq!(feeds.requested().len(), 5);
    assert!(!client.is_busy());
}
