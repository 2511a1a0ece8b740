//! Polling for a GPU adapter at startup.
//!
//! On some systems the adapter is not available the instant the window
//! appears (drivers still loading, compositor not ready). Initialization is
//! retried on a fixed interval instead of failing outright.

use std::time::{Duration, Instant};

/// What to do after a failed attempt.
#[derive(Clone, Copy, Debug, PartialEq, Eq)]
pub enum RetryDecision {
    /// Try again at the given instant.
    RetryAt(Instant),
    /// The attempt budget is spent.
    GiveUp,
}

/// Fixed-interval retry bookkeeping.
#[derive(Clone, Debug)]
pub struct InitRetry {
    interval: Duration,
    /// `None` retries forever.
    max_attempts: Option<u32>,
    failures: u32,
}

impl InitRetry {
    pub fn new(interval: Duration, max_attempts: Option<u32>) -> Self {
        Self {
            interval,
            max_attempts,
            failures: 0,
        }
    }

    /// Record a failed attempt made at `now`.
    pub fn record_failure(&mut self, now: Instant) -> RetryDecision {
        self.failures = self.failures.saturating_add(1);
        match self.max_attempts {
            Some(max) if self.failures >= max => RetryDecision::GiveUp,
            _ => RetryDecision::RetryAt(now + self.interval),
        }
    }

    /// Failed attempts so far.
    pub fn failures(&self) -> u32 {
        self.failures
    }

    pub fn interval(&self) -> Duration {
        self.interval
    }
}
