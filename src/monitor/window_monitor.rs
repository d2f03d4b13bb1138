//! Event-driven window readiness monitoring.

use std::sync::Arc;

use crate::hierarchy::window_for;
use crate::input::generator::EventGenerator;
use crate::monitor::window_status::WindowStatus;
use crate::monitor::windows::Windows;
use crate::scene::component::SceneComponent;
use crate::scene::event::InputEvent;
use crate::scene::screen::{Screen, ScreenListener};

/// Keeps the readiness registry current by watching screen traffic.
///
/// Showing a window registers it as not-yet-ready; the first input event
/// dispatched into it proves it processes input and promotes it. The monitor
/// also owns the active [`WindowStatus`] check used to poke windows that
/// stay silent.
pub struct WindowMonitor {
    windows: Arc<Windows>,
    status: WindowStatus,
}

impl WindowMonitor {
    #[must_use]
    pub fn new(generator: Option<Arc<dyn EventGenerator>>) -> Self {
        let windows = Arc::new(Windows::new());
        let status = WindowStatus::new(Arc::clone(&windows), generator);
        Self { windows, status }
    }

    /// Creates a monitor and registers it as a listener on `screen`.
    pub fn attach(screen: &Screen, generator: Option<Arc<dyn EventGenerator>>) -> Arc<Self> {
        let monitor = Arc::new(Self::new(generator));
        screen.add_listener(Arc::clone(&monitor) as Arc<dyn ScreenListener>);
        monitor
    }

    #[must_use]
    pub fn windows(&self) -> &Arc<Windows> {
        &self.windows
    }

    /// Whether `window` is ready for input. Windows that have not proven
    /// themselves yet get poked, so repeated polling converges.
    #[must_use]
    pub fn is_window_ready(&self, window: &SceneComponent) -> bool {
        if self.windows.is_ready(window.id()) {
            return true;
        }
        self.status.check_if_ready(window);
        self.windows.is_ready(window.id())
    }
}

impl ScreenListener for WindowMonitor {
    fn window_shown(&self, window: &SceneComponent) {
        self.windows.mark_as_showing(window.id());
    }

    fn window_hidden(&self, window: &SceneComponent) {
        // Hidden windows receive nothing; drop them until they are reshown.
        self.windows.remove(window.id());
    }

    fn window_disposed(&self, window: &SceneComponent) {
        self.windows.remove(window.id());
    }

    fn event_dispatched(&self, target: &SceneComponent, _event: &InputEvent) {
        if let Some(window) = window_for(target) {
            self.windows.mark_as_ready(window.id());
        }
    }
}
