//! Wait conditions, poll loops, and timeout tracking.

pub mod condition;
pub mod pause;
pub mod timeout_watch;

pub use condition::{condition, Condition, FnCondition};
pub use pause::{pause, pause_for, pause_with_timeout, DEFAULT_TIMEOUT};
pub use timeout_watch::TimeoutWatch;
