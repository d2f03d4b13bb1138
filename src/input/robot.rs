//! Simulation of user input against the live widget graph.

use std::sync::Arc;

use tracing::{debug, trace};

use crate::config::{env_config, EnvConfig};
use crate::dispatch::action::Task;
use crate::dispatch::latch::OneShotLatch;
use crate::dispatch::runner::ActionRunner;
use crate::dispatch::ui_thread::UiThread;
use crate::error::{Error, Result};
use crate::hierarchy::existing::ExistingHierarchy;
use crate::hierarchy::parent::window_for;
use crate::input::generator::{EventGenerator, NullGenerator, PostingGenerator};
use crate::input::platform::Platform;
use crate::input::settings::Settings;
use crate::monitor::window_monitor::WindowMonitor;
use crate::scene::component::SceneComponent;
use crate::scene::event::{Key, MouseButton};
use crate::scene::geometry::Point;
use crate::scene::screen::Screen;
use crate::timing::{condition, pause, pause_for};

/// Synthesizes user input and keeps caller-observed state consistent with
/// what the dispatch thread has processed.
///
/// A robot owns the whole stack for one test run: the dispatch thread, the
/// screen, an [`ActionRunner`], timing [`Settings`], and the window-readiness
/// monitor. Input goes through the [`EventGenerator`] seam, so everything a
/// robot does could have come from a real user.
///
/// Points handed to robot methods are in the target component's own
/// coordinate space, like the input coordinates a component would see.
pub struct Robot {
    ui: Arc<UiThread>,
    screen: Arc<Screen>,
    runner: ActionRunner,
    settings: Settings,
    platform: Platform,
    generator: Arc<dyn EventGenerator>,
    monitor: Arc<WindowMonitor>,
    hierarchy: ExistingHierarchy,
}

impl Default for Robot {
    fn default() -> Self {
        Self::new()
    }
}

impl Robot {
    /// Robot over a fresh screen and dispatch thread, tuned from the process
    /// environment.
    #[must_use]
    pub fn new() -> Self {
        Self::from_config(Platform::current(), env_config())
    }

    /// Like [`Robot::new`] with an explicit platform, for deterministic drag
    /// thresholds in tests.
    #[must_use]
    pub fn with_platform(platform: Platform) -> Self {
        Self::from_config(platform, env_config())
    }

    #[must_use]
    pub fn from_config(platform: Platform, config: &EnvConfig) -> Self {
        let ui = Arc::new(UiThread::new());
        let screen = Arc::new(Screen::new());
        let settings = Settings::from_config(config);
        let (generator, monitor_generator): (
            Arc<dyn EventGenerator>,
            Option<Arc<dyn EventGenerator>>,
        ) = if config.headless {
            (Arc::new(NullGenerator), None)
        } else {
            let posting: Arc<dyn EventGenerator> = Arc::new(PostingGenerator::new(
                Arc::clone(&ui),
                Arc::clone(&screen),
            ));
            (Arc::clone(&posting), Some(posting))
        };
        let monitor = WindowMonitor::attach(&screen, monitor_generator);
        let runner = ActionRunner::new(Arc::clone(&ui));
        let hierarchy = ExistingHierarchy::new(Arc::clone(&screen));
        Self {
            ui,
            screen,
            runner,
            settings,
            platform,
            generator,
            monitor,
            hierarchy,
        }
    }

    #[must_use]
    pub fn ui_thread(&self) -> &Arc<UiThread> {
        &self.ui
    }

    #[must_use]
    pub fn screen(&self) -> &Arc<Screen> {
        &self.screen
    }

    #[must_use]
    pub fn runner(&self) -> &ActionRunner {
        &self.runner
    }

    #[must_use]
    pub fn settings(&self) -> &Settings {
        &self.settings
    }

    #[must_use]
    pub fn platform(&self) -> Platform {
        self.platform
    }

    #[must_use]
    pub fn hierarchy(&self) -> &ExistingHierarchy {
        &self.hierarchy
    }

    /// Shows `window` frontmost and blocks until it is ready for input.
    pub fn show_window(&self, window: &SceneComponent) -> Result<()> {
        debug!(window = %window.describe(), "showing window");
        let screen = Arc::clone(&self.screen);
        let handle = window.clone();
        let show = Task::new(move || screen.show_window(&handle));
        self.runner.execute(&show)?;

        let mut ready = condition(
            format!("window {} to be ready for input", window.describe()),
            || self.is_ready_for_input(window),
        );
        pause(&mut ready)
    }

    /// Whether `component` is showing inside a window that has proven it
    /// processes input. Not-yet-ready windows are poked, so polling this
    /// converges. Detached components are never ready.
    #[must_use]
    pub fn is_ready_for_input(&self, component: &SceneComponent) -> bool {
        let Some(window) = window_for(component) else {
            return false;
        };
        component.is_showing() && self.monitor.is_window_ready(&window)
    }

    /// Moves the pointer to `at` in `component`'s coordinate space.
    pub fn mouse_move(&self, component: &SceneComponent, at: Point) {
        let target = screen_location(component, at);
        trace!(x = target.x, y = target.y, "mouse move");
        self.generator.mouse_move(target.x, target.y);
        self.settle();
    }

    /// Moves the pointer to `at` and presses `button` there.
    pub fn mouse_press(&self, component: &SceneComponent, at: Point, button: MouseButton) {
        let target = screen_location(component, at);
        trace!(x = target.x, y = target.y, ?button, "mouse press");
        self.generator.mouse_move(target.x, target.y);
        self.settle();
        self.generator.mouse_press(button);
        self.settle();
    }

    /// Releases every mouse button the tracked input state reports as held.
    pub fn release_mouse_buttons(&self) {
        for button in self.screen.input_state().buttons_down() {
            trace!(?button, "mouse release");
            self.generator.mouse_release(button);
            self.settle();
        }
    }

    /// Left-clicks the center of `component`.
    pub fn click(&self, component: &SceneComponent) -> Result<()> {
        self.click_with(component, MouseButton::Left)
    }

    /// Clicks the center of `component` with `button`.
    pub fn click_with(&self, component: &SceneComponent, button: MouseButton) -> Result<()> {
        self.click_at(component, center_of(component), button)
    }

    /// Presses and releases `button` at `at` in `component`'s coordinates,
    /// then waits for the queue to drain. Focus follows the press for
    /// focusable targets, exactly as it would for a real click.
    pub fn click_at(
        &self,
        component: &SceneComponent,
        at: Point,
        button: MouseButton,
    ) -> Result<()> {
        debug!(target = %component.describe(), ?button, "click");
        let target = screen_location(component, at);
        self.generator.mouse_move(target.x, target.y);
        self.settle();
        self.generator.mouse_press(button);
        self.settle();
        self.generator.mouse_release(button);
        self.settle();
        self.wait_for_idle()
    }

    /// Presses and releases each key in order, draining the queue after each
    /// one so typed text is observable on return.
    pub fn press_and_release_keys(&self, keys: &[Key]) -> Result<()> {
        for &key in keys {
            self.press_key(key);
            self.release_key(key);
            self.wait_for_idle()?;
        }
        Ok(())
    }

    pub fn press_key(&self, key: Key) {
        trace!(?key, "key press");
        self.generator.key_press(key);
        self.settle();
    }

    pub fn release_key(&self, key: Key) {
        trace!(?key, "key release");
        self.generator.key_release(key);
        self.settle();
    }

    /// Nudges the pointer one pixel off `component`'s center. Some toolkits
    /// postpone popup realization until the invoker sees motion.
    pub fn jitter(&self, component: &SceneComponent) {
        let center = center_of(component);
        let x = if center.x > 0 { center.x - 1 } else { center.x + 1 };
        self.mouse_move(component, Point::new(x, center.y));
    }

    /// Gives `component` the focus, on the dispatch thread.
    pub fn focus(&self, component: &SceneComponent) -> Result<()> {
        let screen = Arc::clone(&self.screen);
        let target = component.clone();
        let task = Task::new(move || screen.set_focus_owner(Some(&target)));
        self.runner.execute(&task)
    }

    /// Runs `action` on the dispatch thread without waiting for it.
    pub fn invoke_later(&self, action: impl FnOnce() + Send + 'static) {
        self.ui.invoke_later(action);
    }

    /// Whether a drag is currently in effect according to the tracked input
    /// state.
    #[must_use]
    pub fn is_dragging(&self) -> bool {
        self.screen.input_state().is_dragging()
    }

    /// Blocks until the dispatch queue has drained past this call, bounded
    /// by the settings idle timeout.
    pub fn wait_for_idle(&self) -> Result<()> {
        if self.ui.is_dispatch_thread() {
            // Blocking the queue on its own drain marker can never finish.
            return Err(Error::action_failed(
                "cannot wait for idle on the dispatch thread",
            ));
        }
        let drained = Arc::new(OneShotLatch::new());
        let opener = Arc::clone(&drained);
        self.ui.invoke_later(move || opener.open());
        if drained.wait_timeout(self.settings.idle_timeout()) {
            Ok(())
        } else {
            Err(Error::wait_timed_out("the dispatch queue to go idle"))
        }
    }

    /// Releases held buttons and keys and disposes every window. Failures
    /// are logged rather than raised; this runs in teardown paths.
    pub fn clean_up(&self) {
        debug!("robot cleanup");
        for button in self.screen.input_state().buttons_down() {
            self.generator.mouse_release(button);
        }
        for key in self.screen.input_state().keys_down() {
            self.generator.key_release(key);
        }
        if let Err(error) = self.wait_for_idle() {
            debug!(%error, "input release did not settle during cleanup");
        }
        let screen = Arc::clone(&self.screen);
        let dispose = Task::new(move || screen.dispose_all_windows());
        if let Err(error) = self.runner.execute(&dispose) {
            debug!(%error, "window disposal failed during cleanup");
        }
    }

    fn settle(&self) {
        pause_for(self.settings.delay_between_events());
    }
}

fn screen_location(component: &SceneComponent, at: Point) -> Point {
    let bounds = component.bounds();
    Point::new(bounds.x + at.x, bounds.y + at.y)
}

/// Center of `component` in its own coordinate space.
fn center_of(component: &SceneComponent) -> Point {
    let size = component.size();
    Point::new(size.width / 2, size.height / 2)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::component::{Capabilities, ComponentBuilder, ComponentKind};
    use crate::scene::geometry::Rect;
    use std::time::Duration;

    fn quick_robot() -> Robot {
        let robot = Robot::from_config(Platform::X11, &EnvConfig::default());
        robot.settings().set_delay_between_events(Duration::ZERO);
        robot
    }

    fn shown_frame(robot: &Robot) -> SceneComponent {
        let frame = ComponentBuilder::new(ComponentKind::Frame)
            .name("main")
            .bounds(Rect::new(10, 10, 300, 200))
            .build();
        robot.show_window(&frame).unwrap();
        frame
    }

    #[test]
    fn show_window_blocks_until_the_window_is_ready() {
        let robot = quick_robot();
        let frame = shown_frame(&robot);
        assert!(frame.is_visible());
        assert!(robot.is_ready_for_input(&frame));
        robot.clean_up();
    }

    #[test]
    fn click_reaches_the_component_and_moves_focus() {
        let robot = quick_robot();
        let frame = shown_frame(&robot);
        let button = ComponentBuilder::new(ComponentKind::Control)
            .name("ok")
            .bounds(Rect::new(30, 30, 80, 24))
            .capabilities(Capabilities::button())
            .build();
        frame.add_child(&button);

        robot.click(&button).unwrap();
        assert_eq!(button.click_count(), 1);
        assert_eq!(robot.screen().focus_owner(), Some(button));
        robot.clean_up();
    }

    #[test]
    fn typed_keys_land_in_the_focused_component() {
        let robot = quick_robot();
        let frame = shown_frame(&robot);
        let field = ComponentBuilder::new(ComponentKind::Control)
            .bounds(Rect::new(30, 70, 120, 24))
            .capabilities(Capabilities::text_field())
            .build();
        frame.add_child(&field);

        robot.focus(&field).unwrap();
        robot
            .press_and_release_keys(&[Key::Char('h'), Key::Char('i')])
            .unwrap();
        assert_eq!(field.text(), "hi");
        robot.clean_up();
    }

    #[test]
    fn detached_components_are_never_ready_for_input() {
        let robot = quick_robot();
        let orphan = ComponentBuilder::new(ComponentKind::Control).build();
        assert!(!robot.is_ready_for_input(&orphan));
        robot.clean_up();
    }

    #[test]
    fn wait_for_idle_refuses_to_run_on_the_dispatch_thread() {
        let robot = Arc::new(quick_robot());
        let on_dispatch = Arc::clone(&robot);
        let query = crate::dispatch::action::Query::new(move || {
            on_dispatch.wait_for_idle().unwrap_err().to_string()
        });
        let message = robot.runner().execute_query(&query).unwrap();
        assert!(message.contains("cannot wait for idle"));
        robot.clean_up();
    }

    #[test]
    fn dropping_the_robot_frees_the_screen_and_dispatch_thread() {
        let robot = quick_robot();
        let frame = shown_frame(&robot);
        robot.click(&frame).unwrap();
        robot.clean_up();

        let screen = Arc::downgrade(robot.screen());
        let ui = Arc::downgrade(robot.ui_thread());
        drop(robot);
        assert!(
            screen.upgrade().is_none(),
            "screen still alive after the robot was dropped"
        );
        assert!(
            ui.upgrade().is_none(),
            "dispatch thread still alive after the robot was dropped"
        );
    }

    #[test]
    fn clean_up_releases_held_input_and_disposes_windows() {
        let robot = quick_robot();
        let frame = shown_frame(&robot);
        robot.mouse_press(&frame, Point::new(50, 50), MouseButton::Left);
        robot.wait_for_idle().unwrap();
        assert!(robot.screen().input_state().any_button_down());

        robot.clean_up();
        assert!(!robot.screen().input_state().any_button_down());
        assert!(robot.hierarchy().roots().is_empty());
    }
}
