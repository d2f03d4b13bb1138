//! Simulated user input: the robot, gesture driver, and their tunables.

pub mod driver;
pub mod generator;
pub mod platform;
pub mod robot;
pub mod settings;

pub use driver::{
    validate_is_enabled, validate_is_enabled_and_showing, validate_is_showing, ComponentDriver,
};
pub use generator::{EventGenerator, NullGenerator, PostingGenerator};
pub use platform::Platform;
pub use robot::Robot;
pub use settings::Settings;
