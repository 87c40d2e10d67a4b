//! Payloads published on the loader's and the client's event channels.

use std::sync::Arc;

use kuler_events::{Event, EventKind};
use serde::Serialize;

/// Events emitted by [`crate::FeedLoader`].
#[derive(Debug, Clone)]
pub enum LoaderEvent {
    /// The relay returned a recognizable item collection.
    Complete {
        message: String,
        items: Arc<Vec<serde_json::Value>>,
    },
    /// The request was rejected (`busy`) or failed after all attempts.
    Failed { message: String, busy: bool },
}

impl Event for LoaderEvent {
    fn kind(&self) -> EventKind {
        match self {
            LoaderEvent::Complete { .. } => EventKind::Complete,
            LoaderEvent::Failed { .. } => EventKind::Failed,
        }
    }
}

/// Summary of a successful client operation.
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
pub struct FeedOutcome {
    pub message: String,
    /// Number of records stored after parsing.
    pub count: usize,
    /// `true` when the feed (after dropping malformed items) had no records.
    pub empty: bool,
}

/// Events emitted by [`crate::KulerClient`] and [`crate::ThemeComments`].
#[derive(Debug, Clone, PartialEq, Eq, Serialize)]
#[serde(tag = "event", rename_all = "snake_case")]
pub enum ClientEvent {
    Complete(FeedOutcome),
    Failed { message: String, busy: bool },
}

impl ClientEvent {
    pub(crate) fn failed(message: impl Into<String>) -> Self {
        ClientEvent::Failed {
            message: message.into(),
            busy: false,
        }
    }

    pub(crate) fn busy() -> Self {
        ClientEvent::Failed {
            message: "Busy".to_string(),
            busy: true,
        }
    }

    pub fn is_busy(&self) -> bool {
        matches!(self, ClientEvent::Failed { busy: true, .. })
    }
}

impl Event for ClientEvent {
    fn kind(&self) -> EventKind {
        match self {
            ClientEvent::Complete(_) => EventKind::Complete,
            ClientEvent::Failed { .. } => EventKind::Failed,
        }
    }
}
