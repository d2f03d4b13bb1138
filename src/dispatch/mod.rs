//! Marshalling of work onto the dispatch thread.

pub mod action;
pub(crate) mod latch;
pub mod runner;
pub mod ui_thread;

pub use action::{Query, Task};
pub use runner::{until_executed, ActionRunner, ExecutedCondition};
pub use ui_thread::UiThread;
