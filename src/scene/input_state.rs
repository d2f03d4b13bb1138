//! Tracked pointer and keyboard state.

use std::sync::{Mutex, MutexGuard, Weak};

use crate::scene::component::{ComponentCore, SceneComponent};
use crate::scene::event::{Key, MouseButton};
use crate::scene::geometry::Point;

#[derive(Default)]
struct Inner {
    mouse_location: Point,
    buttons: Vec<MouseButton>,
    keys: Vec<Key>,
    press_origin: Option<Point>,
    drag_source: Weak<ComponentCore>,
    dragging: bool,
}

/// Pointer/keyboard state updated during event delivery on the dispatch
/// thread and readable from any thread.
///
/// A drag is considered in effect from the first pointer move with a button
/// held until every button is released.
#[derive(Default)]
pub struct InputState {
    inner: Mutex<Inner>,
}

impl InputState {
    fn inner(&self) -> MutexGuard<'_, Inner> {
        self.inner
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    #[must_use]
    pub fn mouse_location(&self) -> Point {
        self.inner().mouse_location
    }

    #[must_use]
    pub fn is_button_down(&self, button: MouseButton) -> bool {
        self.inner().buttons.contains(&button)
    }

    #[must_use]
    pub fn any_button_down(&self) -> bool {
        !self.inner().buttons.is_empty()
    }

    #[must_use]
    pub fn buttons_down(&self) -> Vec<MouseButton> {
        self.inner().buttons.clone()
    }

    #[must_use]
    pub fn keys_down(&self) -> Vec<Key> {
        self.inner().keys.clone()
    }

    #[must_use]
    pub fn is_dragging(&self) -> bool {
        self.inner().dragging
    }

    /// Pointer position when the current press started.
    #[must_use]
    pub fn press_origin(&self) -> Option<Point> {
        self.inner().press_origin
    }

    /// Component under the pointer when the current press started.
    #[must_use]
    pub fn drag_source(&self) -> Option<SceneComponent> {
        self.inner().drag_source.upgrade().map(SceneComponent::from_core)
    }

    pub(crate) fn mouse_moved(&self, location: Point) {
        let mut inner = self.inner();
        if !inner.buttons.is_empty() {
            inner.dragging = true;
        }
        inner.mouse_location = location;
    }

    pub(crate) fn mouse_pressed(&self, button: MouseButton, target: Option<&SceneComponent>) {
        let mut inner = self.inner();
        if !inner.buttons.contains(&button) {
            inner.buttons.push(button);
        }
        let origin = inner.mouse_location;
        inner.press_origin = Some(origin);
        inner.drag_source = target.map(SceneComponent::downgrade).unwrap_or_default();
    }

    pub(crate) fn mouse_released(&self, button: MouseButton) {
        let mut inner = self.inner();
        inner.buttons.retain(|held| *held != button);
        if inner.buttons.is_empty() {
            inner.dragging = false;
            inner.press_origin = None;
            inner.drag_source = Weak::new();
        }
    }

    pub(crate) fn key_pressed(&self, key: Key) {
        let mut inner = self.inner();
        if !inner.keys.contains(&key) {
            inner.keys.push(key);
        }
    }

    pub(crate) fn key_released(&self, key: Key) {
        self.inner().keys.retain(|held| *held != key);
    }
}
