//! One-shot blocking handoff.

use std::sync::{Condvar, Mutex};
use std::time::Duration;

/// Gate that starts closed and opens exactly once.
///
/// Waiters block until the gate opens; opening is idempotent and wakes every
/// waiter, including ones that arrive afterwards.
#[derive(Default)]
pub(crate) struct OneShotLatch {
    open: Mutex<bool>,
    cvar: Condvar,
}

impl OneShotLatch {
    pub(crate) fn new() -> Self {
        Self::default()
    }

    pub(crate) fn open(&self) {
        let mut open = match self.open.lock() {
            Ok(open) => open,
            Err(poisoned) => poisoned.into_inner(),
        };
        *open = true;
        self.cvar.notify_all();
    }

    /// Blocks until the gate opens.
    pub(crate) fn wait(&self) {
        let mut open = match self.open.lock() {
            Ok(open) => open,
            Err(poisoned) => poisoned.into_inner(),
        };
        while !*open {
            open = self
                .cvar
                .wait(open)
                .unwrap_or_else(|poisoned| poisoned.into_inner());
        }
    }

    /// Blocks until the gate opens or `timeout` elapses. Returns whether the
    /// gate is open.
    pub(crate) fn wait_timeout(&self, timeout: Duration) -> bool {
        let open = match self.open.lock() {
            Ok(open) => open,
            Err(poisoned) => poisoned.into_inner(),
        };
        let (open, _) = self
            .cvar
            .wait_timeout_while(open, timeout, |open| !*open)
            .unwrap_or_else(|poisoned| poisoned.into_inner());
        *open
    }
}
