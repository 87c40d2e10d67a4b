use std::sync::Arc;

use crate::config::RelayConfig;
use crate::upstream::FeedSource;

/// Shared state available to all handlers via `State<AppState>`.
#[derive(Clone)]
pub struct AppState {
    pub config: Arc<RelayConfig>,
    /// Where upstream feed documents come from.
    pub feeds: Arc<dyn FeedSource>,
}
