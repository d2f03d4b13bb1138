//! High-level gestures composed from primitive robot input.

use std::sync::Arc;
use std::time::Duration;

use tracing::debug;

use crate::dispatch::action::Query;
use crate::error::{Error, Result};
use crate::input::platform::Platform;
use crate::input::robot::Robot;
use crate::scene::component::{ComponentKind, SceneComponent};
use crate::scene::event::MouseButton;
use crate::scene::geometry::Point;
use crate::timing::{pause_for, TimeoutWatch};

/// Sleep between polls while waiting on input the dispatch thread has not
/// caught up with yet.
const POLL_INTERVAL: Duration = Duration::from_millis(10);

/// Drives gestures against components: clicks with state validation, drags
/// tuned to the platform's recognition threshold, and accessible-action
/// fallbacks for components plain input cannot reach.
pub struct ComponentDriver {
    robot: Arc<Robot>,
}

impl ComponentDriver {
    #[must_use]
    pub fn new(robot: Arc<Robot>) -> Self {
        Self { robot }
    }

    #[must_use]
    pub fn robot(&self) -> &Arc<Robot> {
        &self.robot
    }

    /// Left-clicks `component` after checking, on the dispatch thread, that
    /// it is enabled and showing.
    pub fn click(&self, component: &SceneComponent) -> Result<()> {
        self.check_enabled_and_showing(component)?;
        self.robot.click(component)
    }

    fn check_enabled_and_showing(&self, component: &SceneComponent) -> Result<()> {
        let target = component.clone();
        let check = Query::fallible(move || {
            validate_is_enabled_and_showing(&target)?;
            Ok(())
        });
        self.robot.runner().execute_query(&check)
    }

    /// Starts a drag at `start` in `target`'s coordinates: presses the left
    /// button, honors the configured drag delay, and moves far enough past
    /// the platform threshold for the gesture to register.
    pub fn drag(&self, target: &SceneComponent, start: Point) -> Result<()> {
        debug!(target = %target.describe(), x = start.x, y = start.y, "drag");
        self.robot.mouse_press(target, start, MouseButton::Left);
        let settings = self.robot.settings();
        if settings.drag_delay() > settings.delay_between_events() {
            pause_for(settings.drag_delay());
        }
        let threshold = self.robot.platform().drag_threshold();
        match self.robot.platform() {
            Platform::Windows | Platform::MacOs => {
                // Move past the threshold and one pixel further, staying
                // inside the target where its size allows.
                let size = target.size();
                let mut dx = if start.x + threshold < size.width {
                    threshold
                } else {
                    0
                };
                let dy = if start.y + threshold < size.height {
                    threshold
                } else {
                    0
                };
                if dx == 0 && dy == 0 {
                    dx = threshold;
                }
                self.robot
                    .mouse_move(target, Point::new(start.x + dx / 4, start.y + dy / 4));
                self.robot
                    .mouse_move(target, Point::new(start.x + dx / 2, start.y + dy / 2));
                self.robot
                    .mouse_move(target, Point::new(start.x + dx, start.y + dy));
                self.robot
                    .mouse_move(target, Point::new(start.x + dx + 1, start.y + dy));
            }
            Platform::X11 => {
                // Sweep out past the threshold and back to the start.
                self.robot.mouse_move(
                    target,
                    Point::new(start.x + threshold / 2, start.y + threshold / 2),
                );
                self.robot
                    .mouse_move(target, Point::new(start.x + threshold, start.y + threshold));
                self.robot.mouse_move(
                    target,
                    Point::new(start.x + threshold / 2, start.y + threshold / 2),
                );
                self.robot.mouse_move(target, start);
            }
        }
        self.robot.wait_for_idle()
    }

    /// Moves an in-flight drag over `to` in `target`'s coordinates,
    /// approaching from the left so the motion is unambiguous.
    pub fn drag_over(&self, target: &SceneComponent, to: Point) {
        self.robot.mouse_move(target, Point::new(to.x - 4, to.y));
        self.robot.mouse_move(target, to);
    }

    /// Ends a drag with a drop at `to` in `target`'s coordinates.
    ///
    /// Fails if no drag registers within four event-posting delays.
    pub fn drop(&self, target: &SceneComponent, to: Point) -> Result<()> {
        debug!(target = %target.describe(), x = to.x, y = to.y, "drop");
        self.drag_over(target, to);
        let settings = self.robot.settings();
        let watch = TimeoutWatch::start(settings.event_posting_delay() * 4);
        while !self.robot.is_dragging() {
            if watch.is_timed_out() {
                return Err(Error::action_failed("There is no drag in effect"));
            }
            pause_for(POLL_INTERVAL);
        }
        let drop_delay = settings.drop_delay();
        let delay_between_events = settings.delay_between_events();
        if drop_delay > delay_between_events {
            pause_for(drop_delay - delay_between_events);
        }
        self.robot.release_mouse_buttons();
        self.robot.wait_for_idle()
    }

    /// Waits up to `timeout` for `component` to be ready for input, returning
    /// whether it became ready.
    ///
    /// A popup whose invoker is a menu gets the invoker jittered while
    /// waiting; toolkits may postpone realizing a submenu until the pointer
    /// moves over its parent item.
    pub fn wait_for_showing(&self, component: &SceneComponent, timeout: Duration) -> bool {
        if self.robot.is_ready_for_input(component) {
            return true;
        }
        let watch = TimeoutWatch::start(timeout);
        while !self.robot.is_ready_for_input(component) {
            if component.kind() == ComponentKind::PopupMenu {
                if let Some(invoker) = component.invoker() {
                    if invoker.kind() == ComponentKind::Menu {
                        self.robot.jitter(&invoker);
                    }
                }
            }
            if watch.is_timed_out() {
                return false;
            }
            pause_for(POLL_INTERVAL);
        }
        true
    }

    /// Whether a user could resize `component`. Dialogs and frames carry
    /// their own resizable flag; anything else depends on whether the window
    /// manager resizes arbitrary windows.
    #[must_use]
    pub fn is_user_resizable(&self, component: &SceneComponent) -> bool {
        match component.kind() {
            ComponentKind::Dialog | ComponentKind::Frame => component.is_resizable(),
            _ => self.robot.platform().can_resize_windows(),
        }
    }

    /// Whether a user could move `component`.
    #[must_use]
    pub fn is_user_movable(&self, component: &SceneComponent) -> bool {
        matches!(
            component.kind(),
            ComponentKind::Dialog | ComponentKind::Frame
        ) || self.robot.platform().can_move_windows()
    }

    /// Fires `component`'s default accessible action on the dispatch thread,
    /// without waiting for it to run.
    pub fn perform_accessible_action(&self, component: &SceneComponent) -> Result<()> {
        let Some(action) = component.default_accessible_action() else {
            return Err(Error::action_failed(format!(
                "Unable to perform accessible action for {}",
                component.describe()
            )));
        };
        debug!(target = %component.describe(), "accessible action");
        self.robot.invoke_later(move || {
            let mut action = action
                .lock()
                .unwrap_or_else(|poisoned| poisoned.into_inner());
            (*action)();
        });
        Ok(())
    }
}

/// Fails unless `component` is enabled.
pub fn validate_is_enabled(component: &SceneComponent) -> Result<()> {
    if component.is_enabled() {
        Ok(())
    } else {
        Err(Error::action_failed(format!(
            "Expecting component {} to be enabled",
            component.describe()
        )))
    }
}

/// Fails unless `component` is showing on the screen.
pub fn validate_is_showing(component: &SceneComponent) -> Result<()> {
    if component.is_showing() {
        Ok(())
    } else {
        Err(Error::action_failed(format!(
            "Expecting component {} to be showing on the screen",
            component.describe()
        )))
    }
}

/// Fails unless `component` is both enabled and showing, checking the
/// enabled state first.
pub fn validate_is_enabled_and_showing(component: &SceneComponent) -> Result<()> {
    validate_is_enabled(component)?;
    validate_is_showing(component)
}
