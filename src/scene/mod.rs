//! In-process widget graph driven by the dispatch and input layers.

pub mod component;
pub mod event;
pub mod geometry;
pub mod input_state;
pub mod screen;

pub use component::{Capabilities, ComponentBuilder, ComponentId, ComponentKind, SceneComponent};
pub use event::{InputEvent, Key, MouseButton};
pub use geometry::{Insets, Point, Rect, Size};
pub use input_state::InputState;
pub use screen::{Screen, ScreenListener};
