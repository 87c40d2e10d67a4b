//! The Kuler client facade.
//!
//! [`KulerClient`] validates arguments, renders the upstream query URL,
//! drives its [`FeedLoader`] and parses the returned items into [`Theme`] or
//! [`Comment`] records. Each operation both returns its outcome and publishes
//! it on [`KulerClient::events`]:
//!
//! - invalid arguments → `failed` with a reason, no request issued;
//! - a call while another is in flight → `failed` with `busy = true`;
//! - retry budget exhausted → `failed` with a descriptive message;
//! - success → `complete`, with `empty = true` when no records survived
//!   parsing.

use std::collections::HashMap;
use std::sync::{Arc, Mutex, PoisonError, RwLock};

use kuler_core::feed::{CommentItem, ThemeItem};
use kuler_core::query::{CommentRequest, FeedQuery, ThemeListRequest, ThemeSearchRequest};
use kuler_core::{Comment, CoreError, Theme};
use kuler_events::EventChannel;
use rand::seq::IndexedRandom;
use serde::Serialize;

use crate::comments::ThemeComments;
use crate::config::ClientConfig;
use crate::error::ClientError;
use crate::events::{ClientEvent, FeedOutcome};
use crate::flight::SingleFlight;
use crate::loader::FeedLoader;
use crate::transport::{HttpRelayTransport, RelayTransport};

/// Which record type a request produces.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
enum RecordKind {
    Themes,
    Comments,
}

#[derive(Debug, Default)]
struct Records {
    themes: Arc<Vec<Theme>>,
    comments: Arc<Vec<Comment>>,
}

/// Snapshot of a client's current collections.
#[derive(Debug, Clone, Serialize)]
pub struct FeedData {
    pub themes: Arc<Vec<Theme>>,
    pub comments: Arc<Vec<Comment>>,
}

/// Client for the list, search and comments feeds.
pub struct KulerClient {
    config: ClientConfig,
    transport: Arc<dyn RelayTransport>,
    loader: FeedLoader,
    flight: SingleFlight,
    events: EventChannel<ClientEvent>,
    records: RwLock<Records>,
    theme_comments: Mutex<HashMap<String, Arc<ThemeComments>>>,
}

impl KulerClient {
    /// Create a client talking HTTP to `config.relay_url`.
    pub fn new(config: ClientConfig) -> Result<Self, ClientError> {
        config.validate()?;
        let transport = HttpRelayTransport::new(config.relay_url.clone(), config.request_timeout)
            .map_err(|e| ClientError::Config(e.to_string()))?;
        Ok(Self::with_transport(config, Arc::new(transport)))
    }

    /// Create a client over a custom transport.
    pub fn with_transport(config: ClientConfig, transport: Arc<dyn RelayTransport>) -> Self {
        let loader = FeedLoader::new(Arc::clone(&transport), config.retry.clone());
        Self {
            config,
            transport,
            loader,
            flight: SingleFlight::new(),
            events: EventChannel::default(),
            records: RwLock::new(Records::default()),
            theme_comments: Mutex::new(HashMap::new()),
        }
    }

    pub fn config(&self) -> &ClientConfig {
        &self.config
    }

    pub fn events(&self) -> &EventChannel<ClientEvent> {
        &self.events
    }

    pub fn loader(&self) -> &FeedLoader {
        &self.loader
    }

    /// Whether a request is in flight on this instance.
    pub fn is_busy(&self) -> bool {
        self.flight.is_busy()
    }

    /// Cancel the in-flight request, if any.
    pub fn cancel(&self) -> bool {
        self.loader.cancel()
    }

    // ---- operations ----

    /// Load a theme list (`recent`, `popular`, `rating` or `random`).
    pub async fn load_themes(&self, request: ThemeListRequest) -> Result<FeedOutcome, ClientError> {
        let query = self.validated("load_themes", request.validate())?;
        self.fetch(query, RecordKind::Themes).await
    }

    /// Search themes, optionally narrowed by a filter.
    pub async fn search_themes(
        &self,
        request: ThemeSearchRequest,
    ) -> Result<FeedOutcome, ClientError> {
        let query = self.validated("search_themes", request.validate())?;
        self.fetch(query, RecordKind::Themes).await
    }

    /// Load comments by author email or theme id.
    pub async fn load_comments(&self, request: CommentRequest) -> Result<FeedOutcome, ClientError> {
        let query = self.validated("load_comments", request.validate())?;
        self.fetch(query, RecordKind::Comments).await
    }

    /// The comments feed attached to `theme`.
    ///
    /// Created on first use and shared afterwards, so every handle for one
    /// theme id sees the same records and the same in-flight request.
    pub fn theme_comments(&self, theme: &Theme) -> Arc<ThemeComments> {
        let mut feeds = self
            .theme_comments
            .lock()
            .unwrap_or_else(PoisonError::into_inner);
        let feed = feeds.entry(theme.id().to_string()).or_insert_with(|| {
            let nested =
                KulerClient::with_transport(self.config.clone(), Arc::clone(&self.transport));
            Arc::new(ThemeComments::new(theme.id(), nested))
        });
        Arc::clone(feed)
    }

    // ---- getters ----

    pub fn themes(&self) -> Arc<Vec<Theme>> {
        Arc::clone(&self.read_records().themes)
    }

    pub fn theme_count(&self) -> usize {
        self.read_records().themes.len()
    }

    pub fn theme_by_index(&self, index: usize) -> Option<Theme> {
        self.read_records().themes.get(index).cloned()
    }

    pub fn random_theme(&self) -> Option<Theme> {
        self.read_records().themes.choose(&mut rand::rng()).cloned()
    }

    pub fn comments(&self) -> Arc<Vec<Comment>> {
        Arc::clone(&self.read_records().comments)
    }

    pub fn comment_count(&self) -> usize {
        self.read_records().comments.len()
    }

    pub fn comment_by_index(&self, index: usize) -> Option<Comment> {
        self.read_records().comments.get(index).cloned()
    }

    pub fn random_comment(&self) -> Option<Comment> {
        self.read_records().comments.choose(&mut rand::rng()).cloned()
    }

    pub fn data(&self) -> FeedData {
        let records = self.read_records();
        FeedData {
            themes: Arc::clone(&records.themes),
            comments: Arc::clone(&records.comments),
        }
    }

    // ---- private helpers ----

    fn read_records(&self) -> std::sync::RwLockReadGuard<'_, Records> {
        self.records.read().unwrap_or_else(PoisonError::into_inner)
    }

    /// Publish a validation failure and convert it into a [`ClientError`].
    fn validated(
        &self,
        operation: &str,
        result: Result<FeedQuery, CoreError>,
    ) -> Result<FeedQuery, ClientError> {
        result.map_err(|err| {
            let err = ClientError::validation(operation, &err);
            tracing::debug!(operation, error = %err, "Rejected invalid arguments");
            self.events.emit(ClientEvent::failed(err.to_string()));
            err
        })
    }

    async fn fetch(&self, query: FeedQuery, kind: RecordKind) -> Result<FeedOutcome, ClientError> {
        let Some(guard) = self.flight.try_begin() else {
            self.events.emit(ClientEvent::busy());
            return Err(ClientError::Busy);
        };

        let url = match query.to_url(&self.config.feed_urls) {
            Ok(url) => url,
            Err(err) => {
                guard.finish();
                let err = ClientError::Failed(err.reason().to_string());
                self.events.emit(ClientEvent::failed(err.to_string()));
                return Err(err);
            }
        };

        let result = self.loader.load(url.as_str()).await;
        let outcome = result
            .map(|items| self.store(kind, &items))
            .map_err(ClientError::from);
        guard.finish();

        match &outcome {
            Ok(outcome) => self.events.emit(ClientEvent::Complete(outcome.clone())),
            Err(err) => self.events.emit(ClientEvent::Failed {
                message: err.to_string(),
                busy: err.is_busy(),
            }),
        }
        outcome
    }

    /// Parse `items` into records of `kind`, replace the stored collection
    /// and summarize the result.
    fn store(&self, kind: RecordKind, items: &[serde_json::Value]) -> FeedOutcome {
        let mut records = self.records.write().unwrap_or_else(PoisonError::into_inner);
        let (count, noun) = match kind {
            RecordKind::Themes => {
                let themes = parse_themes(items);
                let count = themes.len();
                records.themes = Arc::new(themes);
                (count, "themes")
            }
            RecordKind::Comments => {
                let comments = parse_comments(items);
                let count = comments.len();
                records.comments = Arc::new(comments);
                (count, "comments")
            }
        };

        tracing::info!(kind = noun, received = items.len(), stored = count, "Feed parsed");

        if count == 0 {
            FeedOutcome {
                message: format!("0 {noun} found"),
                count,
                empty: true,
            }
        } else {
            let label = match kind {
                RecordKind::Themes => "Themes",
                RecordKind::Comments => "Comments",
            };
            FeedOutcome {
                message: format!("{label} loaded and ready"),
                count,
                empty: false,
            }
        }
    }
}

impl std::fmt::Debug for KulerClient {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("KulerClient")
            .field("config", &self.config)
            .field("busy", &self.is_busy())
            .finish_non_exhaustive()
    }
}

/// Map raw theme items to records, dropping items without usable swatches.
pub fn parse_themes(items: &[serde_json::Value]) -> Vec<Theme> {
    items
        .iter()
        .filter_map(|raw| {
            let parsed = serde_json::from_value::<ThemeItem>(raw.clone())
                .map_err(|e| CoreError::InvalidRecord(e.to_string()))
                .and_then(Theme::from_item);
            match parsed {
                Ok(theme) => Some(theme),
                Err(e) => {
                    tracing::debug!(error = %e, "Dropping theme item");
                    None
                }
            }
        })
        .collect()
}

/// Map raw comment items to records, dropping items that are not objects.
pub fn parse_comments(items: &[serde_json::Value]) -> Vec<Comment> {
    items
        .iter()
        .filter_map(|raw| match serde_json::from_value::<CommentItem>(raw.clone()) {
            Ok(item) if raw.is_object() => Some(Comment::from_item(item)),
            Ok(_) => None,
            Err(e) => {
                tracing::debug!(error = %e, "Dropping comment item");
                None
            }
        })
        .collect()
}

#[cfg(test)]
mod tests {
    use serde_json::json;

    use super::*;

    fn theme_json(id: &str, with_swatches: bool) -> serde_json::Value {
        let swatches = if with_swatches {
            json!({ "swatch": [
                { "swatchHexColor": "FFFFFF", "swatchColorMode": "rgb", "swatchIndex": "0" },
                { "swatchHexColor": "000000", "swatchColorMode": "rgb", "swatchIndex": "1" }
            ]})
        } else {
            json!([])
        };
        json!({
            "themeID": id,
            "themeTitle": format!("Theme {id}"),
            "themeTags": "blue, sky",
            "themeAuthor": { "authorID": "1", "authorLabel": "jane" },
            "themeSwatches": swatches
        })
    }

    #[test]
    fn themes_without_swatches_are_dropped() {
        let items = vec![
            theme_json("1", true),
            theme_json("2", false),
            theme_json("3", true),
        ];
        let themes = parse_themes(&items);
        assert_eq!(themes.len(), 2);
        assert_eq!(themes[0].id(), "1");
        assert_eq!(themes[1].id(), "3");
    }

    #[test]
    fn non_object_items_are_dropped() {
        let items = vec![json!("nope"), json!(42), theme_json("9", true)];
        assert_eq!(parse_themes(&items).len(), 1);

        let items = vec![json!({"comment": "hi", "author": "a", "postedAt": ""}), json!(null)];
        assert_eq!(parse_comments(&items).len(), 1);
    }
}
