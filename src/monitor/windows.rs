//! Registry of window readiness.

use std::collections::HashMap;
use std::sync::{Mutex, MutexGuard};

use tracing::trace;

use crate::scene::component::ComponentId;

#[derive(Clone, Copy, Debug, Eq, PartialEq)]
enum ReadyState {
    /// On screen, but no event has come back out of it yet.
    ShowingButNotReady,
    Ready,
}

/// Tracks which windows have proven they process input.
///
/// A window enters as showing-but-not-ready when shown, is promoted to ready
/// once any input event is dispatched into it, and leaves on dispose. Owned
/// by the robot that drives it, never process-wide.
#[derive(Debug, Default)]
pub struct Windows {
    state: Mutex<HashMap<ComponentId, ReadyState>>,
}

impl Windows {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> MutexGuard<'_, HashMap<ComponentId, ReadyState>> {
        self.state
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    /// Records `window` as showing but not yet verified. Re-showing a ready
    /// window demotes it; it has to prove itself again.
    pub fn mark_as_showing(&self, window: ComponentId) {
        trace!(?window, "window showing, not yet ready");
        self.state().insert(window, ReadyState::ShowingButNotReady);
    }

    /// Promotes `window` to ready. Windows never marked as showing count
    /// too; a dispatched event is proof enough.
    pub fn mark_as_ready(&self, window: ComponentId) {
        let previous = self.state().insert(window, ReadyState::Ready);
        if previous != Some(ReadyState::Ready) {
            trace!(?window, "window ready for input");
        }
    }

    /// Forgets `window` entirely.
    pub fn remove(&self, window: ComponentId) {
        self.state().remove(&window);
    }

    #[must_use]
    pub fn is_showing_but_not_ready(&self, window: ComponentId) -> bool {
        self.state().get(&window).copied() == Some(ReadyState::ShowingButNotReady)
    }

    #[must_use]
    pub fn is_ready(&self, window: ComponentId) -> bool {
        self.state().get(&window).copied() == Some(ReadyState::Ready)
    }
}
