//! Window readiness tracking: registry, active checks, and the screen
//! listener that feeds them.

pub mod window_monitor;
pub mod window_status;
pub mod windows;

pub use window_monitor::WindowMonitor;
pub use window_status::WindowStatus;
pub use windows::Windows;
