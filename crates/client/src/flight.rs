//! Single-flight request state.
//!
//! A [`SingleFlight`] is either idle or tracking exactly one in-flight
//! request. [`SingleFlight::try_begin`] moves it to in-flight and hands out a
//! [`FlightGuard`]; dropping the guard returns it to idle, so every exit path
//! of a request (success, failure, cancellation, panic) resets the state.

use std::sync::{Mutex, MutexGuard, PoisonError};
use std::time::{Duration, Instant};

use tokio_util::sync::CancellationToken;

#[derive(Debug)]
enum FlightState {
    Idle,
    InFlight {
        cancel: CancellationToken,
        started_at: Instant,
    },
}

/// Idle / in-flight state of one loader or client instance.
#[derive(Debug)]
pub struct SingleFlight {
    state: Mutex<FlightState>,
}

impl SingleFlight {
    pub fn new() -> Self {
        Self {
            state: Mutex::new(FlightState::Idle),
        }
    }

    fn lock(&self) -> MutexGuard<'_, FlightState> {
        self.state.lock().unwrap_or_else(PoisonError::into_inner)
    }

    /// Start a request, or return `None` if one is already in flight.
    pub fn try_begin(&self) -> Option<FlightGuard<'_>> {
        let mut state = self.lock();
        if matches!(*state, FlightState::InFlight { .. }) {
            return None;
        }
        let cancel = CancellationToken::new();
        *state = FlightState::InFlight {
            cancel: cancel.clone(),
            started_at: Instant::now(),
        };
        Some(FlightGuard {
            flight: self,
            cancel,
        })
    }

    pub fn is_busy(&self) -> bool {
        matches!(*self.lock(), FlightState::InFlight { .. })
    }

    /// How long the current request has been running.
    pub fn elapsed(&self) -> Option<Duration> {
        match &*self.lock() {
            FlightState::InFlight { started_at, .. } => Some(started_at.elapsed()),
            FlightState::Idle => None,
        }
    }

    /// Signal cancellation to the in-flight request. Returns `false` when
    /// idle.
    pub fn cancel(&self) -> bool {
        match &*self.lock() {
            FlightState::InFlight { cancel, .. } => {
                cancel.cancel();
                true
            }
            FlightState::Idle => false,
        }
    }
}

impl Default for SingleFlight {
    fn default() -> Self {
        Self::new()
    }
}

/// Proof that the owner is in flight. Dropping it returns to idle.
#[derive(Debug)]
pub struct FlightGuard<'a> {
    flight: &'a SingleFlight,
    cancel: CancellationToken,
}

impl FlightGuard<'_> {
    pub fn cancel_token(&self) -> &CancellationToken {
        &self.cancel
    }

    /// Return to idle now. Equivalent to dropping the guard.
    pub fn finish(self) {}
}

impl Drop for FlightGuard<'_> {
    fn drop(&mut self) {
        *self.flight.lock() = FlightState::Idle;
    }
}
