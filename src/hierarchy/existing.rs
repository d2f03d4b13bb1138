//! View over the widget hierarchy as it currently exists on screen.

use std::sync::Arc;

use crate::hierarchy::matcher::ComponentMatcher;
use crate::hierarchy::parent::parent_of;
use crate::scene::component::{ComponentKind, SceneComponent};
use crate::scene::screen::Screen;

/// Access to the live widget hierarchy: the windows currently on screen and
/// the parent/child links between the components under them.
///
/// Unlike a recorded snapshot, this view never filters anything out; every
/// component reachable from a root window is part of it.
#[derive(Clone)]
pub struct ExistingHierarchy {
    screen: Arc<Screen>,
}

impl ExistingHierarchy {
    #[must_use]
    pub fn new(screen: Arc<Screen>) -> Self {
        Self { screen }
    }

    /// Root windows, back to front.
    #[must_use]
    pub fn roots(&self) -> Vec<SceneComponent> {
        self.screen.root_windows()
    }

    /// Whether `component` is part of this hierarchy. The live hierarchy
    /// spans every component, so this always holds.
    #[must_use]
    pub fn contains(&self, _component: &SceneComponent) -> bool {
        true
    }

    /// Parent of `component`, resolving iconified internal frames through
    /// their desktop icon.
    #[must_use]
    pub fn parent_of(&self, component: &SceneComponent) -> Option<SceneComponent> {
        parent_of(component)
    }

    /// Direct children of `component`. For menus this includes the popup the
    /// menu invokes, which hangs off the menu without a standard parent link.
    #[must_use]
    pub fn children_of(&self, component: &SceneComponent) -> Vec<SceneComponent> {
        let mut children = component.children();
        if component.kind() == ComponentKind::Menu {
            if let Some(popup) = component.attached_popup() {
                if !children.contains(&popup) {
                    children.push(popup);
                }
            }
        }
        children
    }

    /// Every component satisfying `matcher`, walking the hierarchy depth
    /// first from the root windows.
    #[must_use]
    pub fn find_all(&self, matcher: &dyn ComponentMatcher) -> Vec<SceneComponent> {
        let mut found = Vec::new();
        for root in self.roots() {
            self.collect_matches(&root, matcher, &mut found);
        }
        found
    }

    /// The single component satisfying `matcher`, or `None` when there is no
    /// match or the match is ambiguous.
    #[must_use]
    pub fn find_one(&self, matcher: &dyn ComponentMatcher) -> Option<SceneComponent> {
        let mut found = self.find_all(matcher);
        match found.len() {
            1 => found.pop(),
            _ => None,
        }
    }

    /// Disposes `window`: takes it off the screen and releases focus held
    /// inside it.
    pub fn dispose(&self, window: &SceneComponent) {
        self.screen.dispose_window(window);
    }

    fn collect_matches(
        &self,
        component: &SceneComponent,
        matcher: &dyn ComponentMatcher,
        found: &mut Vec<SceneComponent>,
    ) {
        if matcher.matches(component) {
            found.push(component.clone());
        }
        for child in self.children_of(component) {
            self.collect_matches(&child, matcher, found);
        }
    }
}
