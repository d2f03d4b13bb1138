//! Native-input synthesis seam.

use std::sync::{Arc, Weak};

use tracing::trace;

use crate::dispatch::ui_thread::UiThread;
use crate::scene::event::{InputEvent, Key, MouseButton};
use crate::scene::screen::Screen;

/// Source of low-level input events. The robot drives this seam instead of an
/// OS facility, so input can be rerouted or swallowed wholesale.
pub trait EventGenerator: Send + Sync {
    fn mouse_move(&self, x: i32, y: i32);
    fn mouse_press(&self, button: MouseButton);
    fn mouse_release(&self, button: MouseButton);
    fn key_press(&self, key: Key);
    fn key_release(&self, key: Key);
}

/// Posts input events to the dispatch queue, where they are delivered to the
/// widget graph in order with every other unit of work.
///
/// Holds weak handles to the dispatch thread and the screen: the generator is
/// reachable from the screen's listener list, and strong handles there would
/// keep the whole runtime alive forever. Events posted after the runtime is
/// gone are swallowed.
pub struct PostingGenerator {
    ui: Weak<UiThread>,
    screen: Weak<Screen>,
}

impl PostingGenerator {
    #[must_use]
    pub fn new(ui: Arc<UiThread>, screen: Arc<Screen>) -> Self {
        Self {
            ui: Arc::downgrade(&ui),
            screen: Arc::downgrade(&screen),
        }
    }

    fn post(&self, event: InputEvent) {
        let (Some(ui), Some(screen)) = (self.ui.upgrade(), self.screen.upgrade()) else {
            return;
        };
        trace!(?event, "posting input event");
        ui.invoke_later(move || screen.dispatch_input(event));
    }
}

impl EventGenerator for PostingGenerator {
    fn mouse_move(&self, x: i32, y: i32) {
        self.post(InputEvent::MouseMove { x, y });
    }

    fn mouse_press(&self, button: MouseButton) {
        self.post(InputEvent::MousePress { button });
    }

    fn mouse_release(&self, button: MouseButton) {
        self.post(InputEvent::MouseRelease { button });
    }

    fn key_press(&self, key: Key) {
        self.post(InputEvent::KeyPress { key });
    }

    fn key_release(&self, key: Key) {
        self.post(InputEvent::KeyRelease { key });
    }
}

/// Swallows every event. Stands in where no input synthesis is available,
/// so headless runs degrade instead of failing.
#[derive(Clone, Copy, Debug, Default)]
pub struct NullGenerator;

impl EventGenerator for NullGenerator {
    fn mouse_move(&self, _x: i32, _y: i32) {}

    fn mouse_press(&self, _button: MouseButton) {}

    fn mouse_release(&self, _button: MouseButton) {}

    fn key_press(&self, _key: Key) {}

    fn key_release(&self, _key: Key) {}
}
