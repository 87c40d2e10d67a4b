//! Domain records, wire types, argument validation and query construction
//! for the Kuler theme feeds.
//!
//! This crate has no I/O: it is shared by the client library (which parses
//! relay payloads into [`Theme`] / [`Comment`] records) and by the relay
//! (which serializes upstream RSS items into the [`feed`] wire types).

pub mod comment;
pub mod error;
pub mod feed;
pub mod query;
pub mod swatch;
pub mod theme;
pub mod types;
pub mod validation;

pub use comment::Comment;
pub use error::CoreError;
pub use swatch::{Rgb, Swatch};
pub use theme::Theme;
