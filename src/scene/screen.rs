//! Top-level window list, focus ownership, and event delivery.

use std::sync::{Arc, Mutex, MutexGuard, Weak};

use tracing::trace;

use crate::scene::component::{ComponentCore, SceneComponent};
use crate::scene::event::{InputEvent, Key};
use crate::scene::geometry::Point;
use crate::scene::input_state::InputState;

/// Observer of screen-level lifecycle and event traffic.
///
/// Callbacks run on the thread that performed the mutation, which is the
/// dispatch thread for everything the crate posts itself.
pub trait ScreenListener: Send + Sync {
    fn window_shown(&self, _window: &SceneComponent) {}
    fn window_hidden(&self, _window: &SceneComponent) {}
    fn window_disposed(&self, _window: &SceneComponent) {}
    fn event_dispatched(&self, _target: &SceneComponent, _event: &InputEvent) {}
}

#[derive(Default)]
struct ScreenState {
    /// Z-order, last entry is frontmost.
    roots: Vec<SceneComponent>,
    focus_owner: Weak<ComponentCore>,
}

/// The display every component ultimately lives on.
///
/// Holds the top-level windows in z-order, the focus owner, and the tracked
/// [`InputState`]. Mutations are reserved to the dispatch thread by
/// convention; reads are safe from any thread.
#[derive(Default)]
pub struct Screen {
    state: Mutex<ScreenState>,
    input: InputState,
    listeners: Mutex<Vec<Arc<dyn ScreenListener>>>,
}

impl Screen {
    #[must_use]
    pub fn new() -> Self {
        Self::default()
    }

    fn state(&self) -> MutexGuard<'_, ScreenState> {
        self.state
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    #[must_use]
    pub fn input_state(&self) -> &InputState {
        &self.input
    }

    pub fn add_listener(&self, listener: Arc<dyn ScreenListener>) {
        self.listeners
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .push(listener);
    }

    fn listeners(&self) -> Vec<Arc<dyn ScreenListener>> {
        self.listeners
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
            .clone()
    }

    /// Makes `window` visible and places it frontmost. Callers pass window
    /// kinds; the screen does not enforce it.
    pub fn show_window(&self, window: &SceneComponent) {
        window.set_visible(true);
        {
            let mut state = self.state();
            state.roots.retain(|root| root != window);
            state.roots.push(window.clone());
        }
        trace!(window = %window.describe(), "window shown");
        for listener in self.listeners() {
            listener.window_shown(window);
        }
    }

    /// Hides `window` without removing it from the screen.
    pub fn hide_window(&self, window: &SceneComponent) {
        window.set_visible(false);
        for listener in self.listeners() {
            listener.window_hidden(window);
        }
    }

    /// Removes `window` from the screen for good, dropping focus if the owner
    /// lived inside it.
    pub fn dispose_window(&self, window: &SceneComponent) {
        window.set_visible(false);
        {
            let mut state = self.state();
            state.roots.retain(|root| root != window);
            let owner_in_window = state
                .focus_owner
                .upgrade()
                .map(SceneComponent::from_core)
                .is_some_and(|owner| top_level_ancestor(owner) == *window);
            if owner_in_window {
                state.focus_owner = Weak::new();
            }
        }
        trace!(window = %window.describe(), "window disposed");
        for listener in self.listeners() {
            listener.window_disposed(window);
        }
    }

    /// Disposes every window currently on the screen.
    pub fn dispose_all_windows(&self) {
        let roots = self.root_windows();
        for window in roots.iter().rev() {
            self.dispose_window(window);
        }
    }

    pub fn move_to_front(&self, window: &SceneComponent) {
        let mut state = self.state();
        if state.roots.iter().any(|root| root == window) {
            state.roots.retain(|root| root != window);
            state.roots.push(window.clone());
        }
    }

    /// Windows on the screen, back to front.
    #[must_use]
    pub fn root_windows(&self) -> Vec<SceneComponent> {
        self.state().roots.clone()
    }

    #[must_use]
    pub fn focus_owner(&self) -> Option<SceneComponent> {
        self.state().focus_owner.upgrade().map(SceneComponent::from_core)
    }

    pub fn set_focus_owner(&self, owner: Option<&SceneComponent>) {
        self.state().focus_owner = owner.map(SceneComponent::downgrade).unwrap_or_default();
    }

    /// Deepest visible component under `point`, honoring window z-order.
    #[must_use]
    pub fn component_at(&self, point: Point) -> Option<SceneComponent> {
        let roots = self.root_windows();
        for window in roots.iter().rev() {
            if window.is_showing() && window.bounds().contains(point) {
                return Some(descend(window, point));
            }
        }
        None
    }

    /// Delivers one input event: updates the tracked input state, routes the
    /// event to the component under the pointer (or the focus owner for
    /// keys), and lets built-in behavior react, then notifies listeners.
    pub fn dispatch_input(&self, event: InputEvent) {
        trace!(?event, "dispatching input");
        match event {
            InputEvent::MouseMove { x, y } => {
                let location = Point::new(x, y);
                self.input.mouse_moved(location);
                if let Some(target) = self.component_at(location) {
                    self.notify_event(&target, &event);
                }
            }
            InputEvent::MousePress { button } => {
                let location = self.input.mouse_location();
                let target = self.component_at(location);
                self.input.mouse_pressed(button, target.as_ref());
                if let Some(target) = target {
                    if target.capabilities().focusable && target.is_enabled() {
                        self.set_focus_owner(Some(&target));
                    }
                    self.notify_event(&target, &event);
                }
            }
            InputEvent::MouseRelease { button } => {
                let was_dragging = self.input.is_dragging();
                let press_source = self.input.drag_source();
                self.input.mouse_released(button);
                let location = self.input.mouse_location();
                if let Some(target) = self.component_at(location) {
                    let clicked = !was_dragging
                        && target.capabilities().clickable
                        && press_source.as_ref() == Some(&target);
                    if clicked {
                        target.record_click();
                    }
                    self.notify_event(&target, &event);
                }
            }
            InputEvent::KeyPress { key } => {
                self.input.key_pressed(key);
                if let Some(owner) = self.focus_owner() {
                    if owner.capabilities().textual && owner.is_enabled() {
                        apply_key_to_text(&owner, key);
                    }
                    self.notify_event(&owner, &event);
                }
            }
            InputEvent::KeyRelease { key } => {
                self.input.key_released(key);
                if let Some(owner) = self.focus_owner() {
                    self.notify_event(&owner, &event);
                }
            }
        }
    }

    fn notify_event(&self, target: &SceneComponent, event: &InputEvent) {
        for listener in self.listeners() {
            listener.event_dispatched(target, event);
        }
    }
}

fn descend(component: &SceneComponent, point: Point) -> SceneComponent {
    for child in component.children().iter().rev() {
        if child.is_visible() && child.bounds().contains(point) {
            return descend(child, point);
        }
    }
    component.clone()
}

fn top_level_ancestor(component: SceneComponent) -> SceneComponent {
    let mut current = component;
    while let Some(parent) = current.parent() {
        current = parent;
    }
    current
}

fn apply_key_to_text(owner: &SceneComponent, key: Key) {
    match key {
        Key::Char(ch) => {
            let mut text = owner.text();
            text.push(ch);
            owner.set_text(text);
        }
        Key::Backspace => {
            let mut text = owner.text();
            text.pop();
            owner.set_text(text);
        }
        Key::Enter | Key::Escape | Key::Tab => {}
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::component::{Capabilities, ComponentBuilder, ComponentKind};
    use crate::scene::event::MouseButton;
    use crate::scene::geometry::Rect;

    fn frame_at(name: &str, bounds: Rect) -> SceneComponent {
        ComponentBuilder::new(ComponentKind::Frame)
            .name(name)
            .bounds(bounds)
            .build()
    }

    fn button_at(name: &str, bounds: Rect) -> SceneComponent {
        ComponentBuilder::new(ComponentKind::Control)
            .name(name)
            .bounds(bounds)
            .capabilities(Capabilities::button())
            .build()
    }

    #[derive(Default)]
    struct RecordingListener {
        log: Mutex<Vec<String>>,
    }

    impl RecordingListener {
        fn entries(&self) -> Vec<String> {
            self.log.lock().unwrap().clone()
        }
    }

    impl ScreenListener for RecordingListener {
        fn window_shown(&self, window: &SceneComponent) {
            self.log
                .lock()
                .unwrap()
                .push(format!("shown {}", window.name().unwrap_or_default()));
        }

        fn event_dispatched(&self, target: &SceneComponent, event: &InputEvent) {
            self.log.lock().unwrap().push(format!(
                "{:?} -> {}",
                event,
                target.name().unwrap_or_default()
            ));
        }
    }

    #[test]
    fn hit_test_picks_the_frontmost_window() {
        let screen = Screen::new();
        let back = frame_at("back", Rect::new(0, 0, 100, 100));
        let front = frame_at("front", Rect::new(50, 50, 100, 100));
        screen.show_window(&back);
        screen.show_window(&front);

        let hit = screen.component_at(Point::new(60, 60)).unwrap();
        assert_eq!(hit, front);

        screen.move_to_front(&back);
        let hit = screen.component_at(Point::new(60, 60)).unwrap();
        assert_eq!(hit, back);
    }

    #[test]
    fn hit_test_descends_to_the_deepest_visible_child() {
        let screen = Screen::new();
        let window = frame_at("main", Rect::new(0, 0, 200, 200));
        let panel = ComponentBuilder::new(ComponentKind::Panel)
            .bounds(Rect::new(10, 10, 180, 180))
            .build();
        let button = button_at("ok", Rect::new(20, 20, 40, 20));
        window.add_child(&panel);
        panel.add_child(&button);
        screen.show_window(&window);

        assert_eq!(screen.component_at(Point::new(30, 30)).unwrap(), button);
        assert_eq!(screen.component_at(Point::new(150, 150)).unwrap(), panel);

        button.set_visible(false);
        assert_eq!(screen.component_at(Point::new(30, 30)).unwrap(), panel);
    }

    #[test]
    fn press_moves_focus_to_focusable_targets() {
        let screen = Screen::new();
        let window = frame_at("main", Rect::new(0, 0, 200, 200));
        let button = button_at("ok", Rect::new(20, 20, 40, 20));
        window.add_child(&button);
        screen.show_window(&window);

        screen.dispatch_input(InputEvent::MouseMove { x: 30, y: 25 });
        screen.dispatch_input(InputEvent::MousePress {
            button: MouseButton::Left,
        });
        assert_eq!(screen.focus_owner(), Some(button));
    }

    #[test]
    fn press_and_release_over_the_same_component_counts_a_click() {
        let screen = Screen::new();
        let window = frame_at("main", Rect::new(0, 0, 200, 200));
        let button = button_at("ok", Rect::new(20, 20, 40, 20));
        window.add_child(&button);
        screen.show_window(&window);

        screen.dispatch_input(InputEvent::MouseMove { x: 30, y: 25 });
        screen.dispatch_input(InputEvent::MousePress {
            button: MouseButton::Left,
        });
        screen.dispatch_input(InputEvent::MouseRelease {
            button: MouseButton::Left,
        });
        assert_eq!(button.click_count(), 1);
    }

    #[test]
    fn a_release_that_ends_a_drag_is_not_a_click() {
        let screen = Screen::new();
        let window = frame_at("main", Rect::new(0, 0, 200, 200));
        let button = button_at("ok", Rect::new(20, 20, 100, 100));
        window.add_child(&button);
        screen.show_window(&window);

        screen.dispatch_input(InputEvent::MouseMove { x: 30, y: 30 });
        screen.dispatch_input(InputEvent::MousePress {
            button: MouseButton::Left,
        });
        screen.dispatch_input(InputEvent::MouseMove { x: 80, y: 80 });
        screen.dispatch_input(InputEvent::MouseRelease {
            button: MouseButton::Left,
        });
        assert_eq!(button.click_count(), 0);
    }

    #[test]
    fn key_events_type_into_the_focused_textual_component() {
        let screen = Screen::new();
        let window = frame_at("main", Rect::new(0, 0, 200, 200));
        let field = ComponentBuilder::new(ComponentKind::Control)
            .name("city")
            .bounds(Rect::new(10, 10, 100, 20))
            .capabilities(Capabilities::text_field())
            .build();
        window.add_child(&field);
        screen.show_window(&window);
        screen.set_focus_owner(Some(&field));

        for key in [Key::Char('y'), Key::Char('o'), Key::Char('w'), Key::Backspace] {
            screen.dispatch_input(InputEvent::KeyPress { key });
            screen.dispatch_input(InputEvent::KeyRelease { key });
        }
        assert_eq!(field.text(), "yo");
    }

    #[test]
    fn dispose_removes_the_window_and_clears_focus_inside_it() {
        let screen = Screen::new();
        let window = frame_at("main", Rect::new(0, 0, 200, 200));
        let button = button_at("ok", Rect::new(20, 20, 40, 20));
        window.add_child(&button);
        screen.show_window(&window);
        screen.set_focus_owner(Some(&button));

        screen.dispose_window(&window);
        assert!(screen.root_windows().is_empty());
        assert_eq!(screen.focus_owner(), None);
        assert!(!window.is_visible());
    }

    #[test]
    fn listeners_observe_shows_and_dispatched_events() {
        let screen = Screen::new();
        let listener = Arc::new(RecordingListener::default());
        screen.add_listener(listener.clone());

        let window = frame_at("main", Rect::new(0, 0, 100, 100));
        screen.show_window(&window);
        screen.dispatch_input(InputEvent::MouseMove { x: 10, y: 10 });

        let entries = listener.entries();
        assert_eq!(entries[0], "shown main");
        assert_eq!(entries[1], "MouseMove { x: 10, y: 10 } -> main");
    }
}
