//! Active readiness checks for windows that claim to be showing.

use std::sync::atomic::{AtomicI32, Ordering};
use std::sync::Arc;

use tracing::debug;

use crate::input::generator::EventGenerator;
use crate::monitor::windows::Windows;
use crate::scene::component::SceneComponent;
use crate::scene::geometry::{Point, Size};

const RESIZE_PADDING: i32 = 20;

/// Verifies that a window is actually able to receive input.
///
/// Some window managers report a window as showing before layout and paint
/// have finished. The check moves the synthetic cursor to the window's client
/// center with a one-pixel nudge, so the window receives motion events as
/// soon as it truly is ready. Windows whose insets consume their whole width
/// or height can never be hit and are grown first.
pub struct WindowStatus {
    windows: Arc<Windows>,
    generator: Option<Arc<dyn EventGenerator>>,
    /// Direction of the next nudge; alternates per check.
    sign: AtomicI32,
}

impl WindowStatus {
    /// `generator` carries `None` on headless setups; checks then degrade to
    /// no-ops and readiness relies on ordinary event traffic alone.
    #[must_use]
    pub fn new(windows: Arc<Windows>, generator: Option<Arc<dyn EventGenerator>>) -> Self {
        Self {
            windows,
            generator,
            sign: AtomicI32::new(1),
        }
    }

    #[must_use]
    pub fn windows(&self) -> &Arc<Windows> {
        &self.windows
    }

    /// Nudges `window` so it receives input if it can. Windows too small to
    /// be hit are grown, which pays off on the next check. No-op without an
    /// event generator.
    pub fn check_if_ready(&self, window: &SceneComponent) {
        let Some(generator) = &self.generator else {
            return;
        };
        // Aim for the client area; decorations are insensitive to motion on
        // some platforms.
        self.mouse_move(generator.as_ref(), window, client_center(window));
        if self.windows.is_showing_but_not_ready(window.id()) && is_empty_window(window) {
            make_large_enough_to_receive_events(window);
        }
    }

    fn mouse_move(&self, generator: &dyn EventGenerator, window: &SceneComponent, point: Point) {
        let (x, y) = (point.x, point.y);
        if x == 0 || y == 0 {
            return;
        }
        generator.mouse_move(x, y);
        let size = window.size();
        let sign = self.sign.load(Ordering::SeqCst);
        if size.width > size.height {
            generator.mouse_move(x + sign, y);
        } else {
            generator.mouse_move(x, y + sign);
        }
        self.sign.store(-sign, Ordering::SeqCst);
    }
}

fn client_center(window: &SceneComponent) -> Point {
    let bounds = window.bounds();
    let insets = window.insets();
    Point::new(
        bounds.x + insets.left + (bounds.width - (insets.left + insets.right)) / 2,
        bounds.y + insets.top + (bounds.height - (insets.top + insets.bottom)) / 2,
    )
}

/// Whether decorations consume the window's whole width or height, leaving no
/// client area to deliver events into.
fn is_empty_window(window: &SceneComponent) -> bool {
    let size = window.size();
    let insets = window.insets();
    insets.top + insets.bottom == size.height || insets.left + insets.right == size.width
}

fn make_large_enough_to_receive_events(window: &SceneComponent) {
    let size = window.size();
    let insets = window.insets();
    let width = size.width.max(insets.left + insets.right + RESIZE_PADDING);
    let height = size.height.max(insets.top + insets.bottom + RESIZE_PADDING);
    debug!(window = %window.describe(), width, height, "growing window to receive events");
    window.set_size(Size::new(width, height));
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::input::generator::NullGenerator;
    use crate::scene::component::{ComponentBuilder, ComponentKind};
    use crate::scene::event::{Key, MouseButton};
    use crate::scene::geometry::{Insets, Rect};
    use std::sync::Mutex;

    #[derive(Default)]
    struct RecordingGenerator {
        moves: Mutex<Vec<(i32, i32)>>,
    }

    impl RecordingGenerator {
        fn moves(&self) -> Vec<(i32, i32)> {
            self.moves.lock().unwrap().clone()
        }
    }

    impl EventGenerator for RecordingGenerator {
        fn mouse_move(&self, x: i32, y: i32) {
            self.moves.lock().unwrap().push((x, y));
        }

        fn mouse_press(&self, _button: MouseButton) {}

        fn mouse_release(&self, _button: MouseButton) {}

        fn key_press(&self, _key: Key) {}

        fn key_release(&self, _key: Key) {}
    }

    fn shown_window(bounds: Rect) -> SceneComponent {
        let window = ComponentBuilder::new(ComponentKind::Frame)
            .bounds(bounds)
            .build();
        window.set_visible(true);
        window
    }

    #[test]
    fn moves_to_the_center_and_nudges_the_larger_axis() {
        let windows = Arc::new(Windows::new());
        let generator = Arc::new(RecordingGenerator::default());
        let status = WindowStatus::new(Arc::clone(&windows), Some(generator.clone()));

        // Wider than tall, so the nudge is horizontal.
        let window = shown_window(Rect::new(100, 100, 200, 100));
        status.check_if_ready(&window);
        assert_eq!(generator.moves(), vec![(200, 150), (201, 150)]);
    }

    #[test]
    fn nudge_direction_alternates_between_checks() {
        let windows = Arc::new(Windows::new());
        let generator = Arc::new(RecordingGenerator::default());
        let status = WindowStatus::new(Arc::clone(&windows), Some(generator.clone()));

        // Taller than wide, so nudges are vertical.
        let window = shown_window(Rect::new(100, 100, 100, 200));
        status.check_if_ready(&window);
        status.check_if_ready(&window);
        assert_eq!(
            generator.moves(),
            vec![(150, 200), (150, 201), (150, 200), (150, 199)]
        );
    }

    #[test]
    fn skips_windows_whose_center_sits_on_an_axis() {
        let windows = Arc::new(Windows::new());
        let generator = Arc::new(RecordingGenerator::default());
        let status = WindowStatus::new(Arc::clone(&windows), Some(generator.clone()));

        // Center lands on x == 0.
        let window = shown_window(Rect::new(-100, 50, 200, 100));
        status.check_if_ready(&window);
        assert!(generator.moves().is_empty());
    }

    #[test]
    fn grows_a_window_whose_insets_consume_its_height() {
        let windows = Arc::new(Windows::new());
        let generator = Arc::new(RecordingGenerator::default());
        let status = WindowStatus::new(Arc::clone(&windows), Some(generator.clone()));

        let window = ComponentBuilder::new(ComponentKind::Frame)
            .bounds(Rect::new(100, 100, 200, 24))
            .insets(Insets::new(24, 4, 0, 4))
            .build();
        window.set_visible(true);
        windows.mark_as_showing(window.id());

        status.check_if_ready(&window);
        let size = window.size();
        assert_eq!(size.width, 200);
        assert_eq!(size.height, 24 + RESIZE_PADDING);
        // The move still happened, aimed at the pre-grow center.
        assert_eq!(generator.moves(), vec![(200, 124), (201, 124)]);
    }

    #[test]
    fn ready_windows_are_not_resized() {
        let windows = Arc::new(Windows::new());
        let generator = Arc::new(RecordingGenerator::default());
        let status = WindowStatus::new(Arc::clone(&windows), Some(generator.clone()));

        let window = ComponentBuilder::new(ComponentKind::Frame)
            .bounds(Rect::new(100, 100, 200, 24))
            .insets(Insets::new(24, 4, 0, 4))
            .build();
        window.set_visible(true);
        windows.mark_as_showing(window.id());
        windows.mark_as_ready(window.id());

        status.check_if_ready(&window);
        assert_eq!(window.size().height, 24);
    }

    #[test]
    fn headless_checks_are_a_no_op() {
        let windows = Arc::new(Windows::new());
        let status = WindowStatus::new(Arc::clone(&windows), None);

        let window = ComponentBuilder::new(ComponentKind::Frame)
            .bounds(Rect::new(100, 100, 200, 24))
            .insets(Insets::new(24, 4, 0, 4))
            .build();
        windows.mark_as_showing(window.id());

        status.check_if_ready(&window);
        assert_eq!(window.size().height, 24);
        assert!(!windows.is_ready(window.id()));
    }

    #[test]
    fn null_generator_satisfies_the_seam() {
        let windows = Arc::new(Windows::new());
        let status = WindowStatus::new(windows, Some(Arc::new(NullGenerator)));
        let window = shown_window(Rect::new(100, 100, 200, 100));
        status.check_if_ready(&window);
    }
}
