//! In-process named-event channel.
//!
//! [`EventChannel`] dispatches each emitted event synchronously: first to
//! every handler registered for the event's [`EventKind`], in registration
//! order, then to the kind's default handler if one is set. Every event is
//! additionally forwarded to a `tokio::sync::broadcast` channel so async code
//! can `subscribe()` and await it.

use std::collections::HashMap;
use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, PoisonError, RwLock};

use serde::{Deserialize, Serialize};
use tokio::sync::broadcast;

// ---------------------------------------------------------------------------
// EventKind / Event
// ---------------------------------------------------------------------------

/// The names events are published under.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
#[serde(rename_all = "snake_case")]
pub enum EventKind {
    /// A request finished successfully (possibly with an empty result).
    Complete,
    /// A request was rejected or failed.
    Failed,
}

impl EventKind {
    pub fn as_str(self) -> &'static str {
        match self {
            EventKind::Complete => "complete",
            EventKind::Failed => "failed",
        }
    }
}

impl fmt::Display for EventKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// A payload that can travel over an [`EventChannel`].
pub trait Event: Clone + Send + 'static {
    fn kind(&self) -> EventKind;
}

// ---------------------------------------------------------------------------
// EventChannel
// ---------------------------------------------------------------------------

/// Default buffer capacity for the broadcast mirror.
const DEFAULT_CAPACITY: usize = 64;

/// Handle returned by [`EventChannel::on`], used to unregister the handler.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ListenerId(u64);

type Handler<E> = Arc<dyn Fn(&E) + Send + Sync>;

struct Listener<E> {
    id: ListenerId,
    handler: Handler<E>,
}

/// Synchronous fan-out channel for events of type `E`.
///
/// # Usage
///
/// ```rust
/// use kuler_events::{Event, EventChannel, EventKind};
///
/// #[derive(Clone)]
/// struct Done;
///
/// impl Event for Done {
///     fn kind(&self) -> EventKind {
///         EventKind::Complete
///     }
/// }
///
/// let channel = EventChannel::default();
/// let id = channel.on(EventKind::Complete, |_: &Done| println!("done"));
/// channel.emit(Done);
/// channel.off(EventKind::Complete, id);
/// ```
pub struct EventChannel<E: Event> {
    listeners: RwLock<HashMap<EventKind, Vec<Listener<E>>>>,
    defaults: RwLock<HashMap<EventKind, Handler<E>>>,
    next_id: AtomicU64,
    sender: broadcast::Sender<E>,
}

impl<E: Event> EventChannel<E> {
    /// Create a channel whose broadcast mirror buffers `capacity` events.
    ///
    /// Slow async subscribers observe `RecvError::Lagged` once the buffer is
    /// exceeded; synchronous handlers are unaffected.
    pub fn new(capacity: usize) -> Self {
        let (sender, _) = broadcast::channel(capacity);
        Self {
            listeners: RwLock::new(HashMap::new()),
            defaults: RwLock::new(HashMap::new()),
            next_id: AtomicU64::new(1),
            sender,
        }
    }

    /// Register `handler` for events of `kind`.
    pub fn on<F>(&self, kind: EventKind, handler: F) -> ListenerId
    where
        F: Fn(&E) + Send + Sync + 'static,
    {
        let id = ListenerId(self.next_id.fetch_add(1, Ordering::Relaxed));
        self.listeners
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .entry(kind)
            .or_default()
            .push(Listener {
                id,
                handler: Arc::new(handler),
            });
        id
    }

    /// Unregister a handler. Returns `false` if it was not registered.
    pub fn off(&self, kind: EventKind, id: ListenerId) -> bool {
        let mut listeners = self
            .listeners
            .write()
            .unwrap_or_else(PoisonError::into_inner);
        let Some(list) = listeners.get_mut(&kind) else {
            return false;
        };
        let before = list.len();
        list.retain(|listener| listener.id != id);
        before != list.len()
    }

    /// Set the handler invoked after all registered listeners for `kind`.
    /// Replaces any previous default handler.
    pub fn set_default_handler<F>(&self, kind: EventKind, handler: F)
    where
        F: Fn(&E) + Send + Sync + 'static,
    {
        self.defaults
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .insert(kind, Arc::new(handler));
    }

    pub fn clear_default_handler(&self, kind: EventKind) {
        self.defaults
            .write()
            .unwrap_or_else(PoisonError::into_inner)
            .remove(&kind);
    }

    /// Number of explicit listeners registered for `kind`.
    pub fn listener_count(&self, kind: EventKind) -> usize {
        self.listeners
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&kind)
            .map_or(0, Vec::len)
    }

    /// Dispatch `event` to its listeners, then its default handler, then the
    /// broadcast mirror.
    ///
    /// Handlers run on a snapshot taken before dispatch, so a handler may
    /// call [`on`](Self::on) or [`off`](Self::off) on this channel.
    pub fn emit(&self, event: E) {
        let kind = event.kind();
        let handlers: Vec<Handler<E>> = self
            .listeners
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&kind)
            .map(|list| list.iter().map(|l| Arc::clone(&l.handler)).collect())
            .unwrap_or_default();
        let default = self
            .defaults
            .read()
            .unwrap_or_else(PoisonError::into_inner)
            .get(&kind)
            .cloned();

        tracing::trace!(
            event = %kind,
            listeners = handlers.len(),
            has_default = default.is_some(),
            "Dispatching event",
        );

        for handler in &handlers {
            handler(&event);
        }
        if let Some(default) = default {
            default(&event);
        }

        // Ignore the SendError -- it only means there are zero receivers.
        let _ = self.sender.send(event);
    }

    /// Subscribe to every event emitted from now on.
    pub fn subscribe(&self) -> broadcast::Receiver<E> {
        self.sender.subscribe()
    }
}

impl<E: Event> Default for EventChannel<E> {
    fn default() -> Self {
        Self::new(DEFAULT_CAPACITY)
    }
}

impl<E: Event> fmt::Debug for EventChannel<E> {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("EventChannel")
            .field("complete_listeners", &self.listener_count(EventKind::Complete))
            .field("failed_listeners", &self.listener_count(EventKind::Failed))
            .finish_non_exhaustive()
    }
}

// ---------------------------------------------------------------------------
// Tests
// ---------------------------------------------------------------------------
