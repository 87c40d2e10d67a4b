//! Route definitions for the feed relay.
//!
//! ```text
//! GET /relay    ?callback=&requestid=&request_url=
//! ```

use axum::routing::get;
use axum::Router;

use crate::handlers::relay;
use crate::state::AppState;

pub fn router() -> Router<AppState> {
    Router::new().route("/relay", get(relay::relay_feed))
}
