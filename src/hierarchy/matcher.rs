//! Predicates for picking components out of the hierarchy.

use crate::scene::component::{ComponentKind, SceneComponent};

/// Decides whether a component is the one a lookup is after.
pub trait ComponentMatcher {
    fn matches(&self, component: &SceneComponent) -> bool;
}

impl<F> ComponentMatcher for F
where
    F: Fn(&SceneComponent) -> bool,
{
    fn matches(&self, component: &SceneComponent) -> bool {
        self(component)
    }
}

/// Matches components by name and kind, optionally restricted to components
/// currently showing on the screen.
#[derive(Clone, Debug)]
pub struct NameAndKindMatcher {
    name: String,
    kind: ComponentKind,
    require_showing: bool,
}

impl NameAndKindMatcher {
    /// Matches any component with the given name and kind, showing or not.
    #[must_use]
    pub fn new(name: impl Into<String>, kind: ComponentKind) -> Self {
        Self {
            name: name.into(),
            kind,
            require_showing: false,
        }
    }

    /// Like [`NameAndKindMatcher::new`], but only components showing on the
    /// screen qualify.
    #[must_use]
    pub fn showing_only(name: impl Into<String>, kind: ComponentKind) -> Self {
        Self {
            require_showing: true,
            ..Self::new(name, kind)
        }
    }
}

impl ComponentMatcher for NameAndKindMatcher {
    fn matches(&self, component: &SceneComponent) -> bool {
        component.name().as_deref() == Some(self.name.as_str())
            && component.kind() == self.kind
            && (!self.require_showing || component.is_showing())
    }
}
