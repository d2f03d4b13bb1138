//! Elapsed-time tracking for wait loops.

use std::time::{Duration, Instant};

/// Monotonic stopwatch with a fixed allowance.
///
/// Once the allowance elapses the watch stays timed out until
/// [`restart`](TimeoutWatch::restart); wall-clock adjustments never affect it.
#[derive(Debug, Clone, Copy)]
pub struct TimeoutWatch {
    started: Instant,
    allowance: Duration,
}

impl TimeoutWatch {
    /// Starts a watch that times out once `allowance` has elapsed.
    #[must_use]
    pub fn start(allowance: Duration) -> Self {
        Self {
            started: Instant::now(),
            allowance,
        }
    }

    /// Resets the start time, clearing any previous timeout.
    pub fn restart(&mut self) {
        self.started = Instant::now();
    }

    /// Whether the allowance has fully elapsed.
    #[must_use]
    pub fn is_timed_out(&self) -> bool {
        self.started.elapsed() >= self.allowance
    }

    /// Time since the watch started or was last restarted.
    #[must_use]
    pub fn elapsed(&self) -> Duration {
        self.started.elapsed()
    }
}
