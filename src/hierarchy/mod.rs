//! Queries over the widget hierarchy: parents, windows, and lookups.

pub mod existing;
pub mod matcher;
pub mod parent;

pub use existing::ExistingHierarchy;
pub use matcher::{ComponentMatcher, NameAndKindMatcher};
pub use parent::{invoker_for, parent_of, window_for};
