//! Kuler feed relay.
//!
//! A small HTTP service that forwards whitelisted Kuler feed requests
//! upstream with the API key attached, converts the RSS response into the
//! flat JSON records the client expects and answers as JSON or JSONP.
//! Exposes its building blocks (config, state, router, handlers) so the
//! binary and the integration tests share them.

pub mod config;
pub mod error;
pub mod handlers;
pub mod response;
pub mod router;
pub mod routes;
pub mod state;
pub mod upstream;
pub mod xml;
