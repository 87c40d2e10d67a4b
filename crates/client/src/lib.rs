//! Client library for the Kuler theme feeds.
//!
//! Requests travel through the relay (see the `kuler-relay` crate), which
//! holds the API key and converts the upstream RSS into JSON. The pieces:
//!
//! - [`transport`]: one relay round trip over HTTP ([`HttpRelayTransport`]).
//! - [`loader`]: [`FeedLoader`], single-flight fetch with bounded retry.
//! - [`client`]: [`KulerClient`], argument validation, URL building and
//!   record parsing for the list, search and comments feeds.
//! - [`comments`]: [`ThemeComments`], a theme's own nested comments feed.
//! - [`events`]: payloads published on each component's event channel.

pub mod client;
pub mod comments;
pub mod config;
pub mod error;
pub mod events;
pub mod flight;
pub mod loader;
pub mod retry;
pub mod transport;

pub use client::{FeedData, KulerClient};
pub use comments::ThemeComments;
pub use config::ClientConfig;
pub use error::{ClientError, LoadError, TransportError};
pub use events::{ClientEvent, FeedOutcome, LoaderEvent};
pub use loader::FeedLoader;
pub use transport::{HttpRelayTransport, RelayRequest, RelayTransport};
