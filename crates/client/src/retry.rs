//! Backoff between relay attempts.
//!
//! A logical request is attempted at most [`MAX_ATTEMPTS`] times. Between
//! attempts the loader waits according to [`RetryConfig`]; the delay grows
//! exponentially and is clamped to `max_delay`. A zero `initial_delay`
//! retries immediately.

use std::time::Duration;

/// Upper bound on relay attempts for one logical request.
pub const MAX_ATTEMPTS: u32 = 5;

/// Tunable parameters for the backoff between attempts.
#[derive(Debug, Clone, PartialEq)]
pub struct RetryConfig {
    /// Delay before the second attempt.
    pub initial_delay: Duration,
    /// Upper bound on the delay between attempts.
    pub max_delay: Duration,
    /// Factor by which the delay grows after each failure.
    pub multiplier: f64,
}

impl RetryConfig {
    /// Retry without waiting.
    pub fn immediate() -> Self {
        Self {
            initial_delay: Duration::ZERO,
            max_delay: Duration::ZERO,
            multiplier: 1.0,
        }
    }
}

impl Default for RetryConfig {
    fn default() -> Self {
        Self {
            initial_delay: Duration::from_millis(250),
            max_delay: Duration::from_secs(2),
            multiplier: 2.0,
        }
    }
}

/// Calculate the next backoff delay from the current delay and config.
///
/// The result is clamped to [`RetryConfig::max_delay`].
pub fn next_delay(current: Duration, config: &RetryConfig) -> Duration {
    let next_ms = (current.as_millis() as f64 * config.multiplier) as u64;
    Duration::from_millis(next_ms).min(config.max_delay)
}
