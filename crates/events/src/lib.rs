//! Named-event publish/subscribe for the Kuler client.
//!
//! - [`EventChannel`]: synchronous fan-out to registered handlers, followed
//!   by an optional per-kind default handler, with a
//!   `tokio::sync::broadcast` mirror for async consumers.
//! - [`EventKind`]: the closed set of event names.
//! - [`Event`]: implemented by payload types to declare their kind.

pub mod channel;

pub use channel::{Event, EventChannel, EventKind, ListenerId};
