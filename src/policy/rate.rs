//! Cooldown between accepted open-URL calls.

use std::sync::Mutex;
use std::time::{Duration, Instant};

/// Result of a cooldown check.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum RateCheck {
    /// The gate was passed and the timestamp advanced to `now`.
    Allowed,
    /// Too soon; `elapsed` is the time since the last accepted call.
    Limited { elapsed: Duration },
}

impl RateCheck {
    pub fn is_allowed(&self) -> bool {
        matches!(self, RateCheck::Allowed)
    }
}

/// Timestamp of the last call that passed the cooldown gate.
///
/// Shared by every request. The compare and the update happen under one lock,
/// so two concurrent calls inside the window cannot both pass.
#[derive(Debug)]
pub struct RateState {
    last_accepted_at: Mutex<Instant>,
}

impl RateState {
    /// The window opens at construction, so a call within the first idle
    /// period after startup is limited.
    pub fn new() -> Self {
        Self::starting_at(Instant::now())
    }

    /// Treat `start` as the last accepted call.
    pub fn starting_at(start: Instant) -> Self {
        Self {
            last_accepted_at: Mutex::new(start),
        }
    }

    /// Allow the call if at least `idle_period` has passed since the last
    /// allowed one, advancing the timestamp to `now`. Otherwise leave it alone.
    pub fn check_and_advance(&self, now: Instant, idle_period: Duration) -> RateCheck {
        let mut last = self
            .last_accepted_at
            .lock()
            .unwrap_or_else(|e| e.into_inner());

        let elapsed = now.saturating_duration_since(*last);
        if elapsed < idle_period {
            return RateCheck::Limited { elapsed };
        }

        *last = now;
        RateCheck::Allowed
    }

    #[cfg(test)]
    fn last_accepted_at(&self) -> Instant {
        *self
            .last_accepted_at
            .lock()
            .unwrap_or_else(|e| e.into_inner())
    }
}

impl Default for RateState {
    fn default() -> Self {
        Self::new()
    }
}
