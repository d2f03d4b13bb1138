//! Thread-marshalled GUI automation core: a dedicated dispatch thread with
//! blocking task handoff, a simulated-input robot, pollable wait conditions,
//! and window readiness monitoring.
//!
//! Invariant: single mutation gate — component and screen state changes happen
//! on the dispatch thread, reached via [`ActionRunner`] or posted input.
//!
//! # Public API Overview
//! - Marshal work onto the dispatch thread with [`ActionRunner`], [`Query`],
//!   and [`Task`].
//! - Simulate user input through [`Robot`] and [`ComponentDriver`].
//! - Wait on UI state with [`Condition`], [`pause`], and [`pause_with_timeout`].
//! - Look up components with [`ExistingHierarchy`] and [`ComponentMatcher`].

pub mod config;
#[cfg(feature = "log-subscriber")]
pub mod logging;

pub mod dispatch;
pub mod error;
pub mod hierarchy;
pub mod input;
pub mod monitor;
pub mod scene;
pub mod timing;

/// Marshalling of closures onto the dispatch thread.
pub use crate::dispatch::{until_executed, ActionRunner, ExecutedCondition, Query, Task, UiThread};

/// Crate-wide error and result types.
pub use crate::error::{Error, Result};

/// Hierarchy traversal and component lookup.
pub use crate::hierarchy::{
    invoker_for, parent_of, window_for, ComponentMatcher, ExistingHierarchy, NameAndKindMatcher,
};

/// Simulated user input and gesture driving.
pub use crate::input::{ComponentDriver, EventGenerator, Platform, Robot, Settings};

/// Window readiness tracking.
pub use crate::monitor::{WindowMonitor, WindowStatus, Windows};

/// The widget graph the robot drives.
pub use crate::scene::{
    Capabilities, ComponentBuilder, ComponentId, ComponentKind, InputEvent, InputState, Insets,
    Key, MouseButton, Point, Rect, SceneComponent, Screen, ScreenListener, Size,
};

/// Wait conditions, poll loops, and timeout tracking.
pub use crate::timing::{
    condition, pause, pause_for, pause_with_timeout, Condition, FnCondition, TimeoutWatch,
    DEFAULT_TIMEOUT,
};
