//! Comments attached to a single theme.

use std::sync::atomic::{AtomicBool, Ordering};
use std::sync::Arc;

use kuler_core::query::CommentRequest;
use kuler_core::types::{DEFAULT_ITEMS_PER_PAGE, DEFAULT_START_INDEX};
use kuler_core::Comment;
use kuler_events::{EventChannel, EventKind};

use crate::client::KulerClient;
use crate::error::ClientError;
use crate::events::{ClientEvent, FeedOutcome};

/// A theme's comments feed, backed by its own [`KulerClient`].
///
/// Created with [`KulerClient::theme_comments`]. The nested client has its
/// own single-flight state, so loading comments never makes the parent
/// client busy, while a second `load` on the same handle is rejected as busy.
/// Getters return `None` until a load has completed.
#[derive(Debug)]
pub struct ThemeComments {
    theme_id: String,
    client: KulerClient,
    loaded: Arc<AtomicBool>,
}

impl ThemeComments {
    pub(crate) fn new(theme_id: impl Into<String>, client: KulerClient) -> Self {
        // Registered before any caller listener, so the flag is already set
        // when callers observe `complete`.
        let loaded = Arc::new(AtomicBool::new(false));
        let flag = Arc::clone(&loaded);
        client.events().on(EventKind::Complete, move |_| {
            flag.store(true, Ordering::Release);
        });

        Self {
            theme_id: theme_id.into(),
            client,
            loaded,
        }
    }

    pub fn theme_id(&self) -> &str {
        &self.theme_id
    }

    /// Events of the nested client.
    pub fn events(&self) -> &EventChannel<ClientEvent> {
        self.client.events()
    }

    pub fn is_busy(&self) -> bool {
        self.client.is_busy()
    }

    pub fn is_loaded(&self) -> bool {
        self.loaded.load(Ordering::Acquire)
    }

    /// Load the first page of comments with default paging.
    pub async fn load(&self) -> Result<FeedOutcome, ClientError> {
        self.load_page(DEFAULT_START_INDEX, DEFAULT_ITEMS_PER_PAGE)
            .await
    }

    pub async fn load_page(
        &self,
        start_index: u32,
        items_per_page: u32,
    ) -> Result<FeedOutcome, ClientError> {
        let request = CommentRequest::for_theme(self.theme_id.clone())
            .with_start_index(start_index)
            .with_items_per_page(items_per_page);
        self.client.load_comments(request).await
    }

    pub fn count(&self) -> Option<usize> {
        self.is_loaded().then(|| self.client.comment_count())
    }

    pub fn comments(&self) -> Option<Arc<Vec<Comment>>> {
        self.is_loaded().then(|| self.client.comments())
    }

    pub fn comment_by_index(&self, index: usize) -> Option<Comment> {
        self.is_loaded()
            .then(|| self.client.comment_by_index(index))
            .flatten()
    }

    pub fn random_comment(&self) -> Option<Comment> {
        self.is_loaded()
            .then(|| self.client.random_comment())
            .flatten()
    }
}
