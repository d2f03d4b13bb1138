//! Parent, invoker, and window resolution over the widget graph.

use crate::scene::component::{ComponentKind, SceneComponent};

/// Parent of `component`.
///
/// Iconified internal frames are detached from their desktop pane; for those
/// the desktop icon's pane stands in as the parent. Everything else uses the
/// standard parent link.
#[must_use]
pub fn parent_of(component: &SceneComponent) -> Option<SceneComponent> {
    let parent = component.parent();
    if parent.is_none() && component.kind() == ComponentKind::InternalFrame {
        return component
            .desktop_icon()
            .and_then(|icon| icon.desktop_pane());
    }
    parent
}

/// Invoker of the popup menu `component` sits on, or `None` when it is not on
/// a popup of any sort.
#[must_use]
pub fn invoker_for(component: &SceneComponent) -> Option<SceneComponent> {
    if component.kind() == ComponentKind::PopupMenu {
        return component.invoker();
    }
    let parent = component.parent()?;
    invoker_for(&parent)
}

/// Window ancestor of `component`: the component itself when it is a window,
/// the invoker's window for menu elements, otherwise the nearest window up
/// the parent chain. `None` only for fully detached components.
#[must_use]
pub fn window_for(component: &SceneComponent) -> Option<SceneComponent> {
    if component.kind().is_window() {
        return Some(component.clone());
    }
    if component.is_menu_element() {
        if let Some(invoker) = invoker_for(component) {
            return window_for(&invoker);
        }
    }
    window_for(&parent_of(component)?)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::scene::component::ComponentBuilder;

    fn component(kind: ComponentKind) -> SceneComponent {
        ComponentBuilder::new(kind).build()
    }

    #[test]
    fn parent_of_uses_the_standard_link_when_present() {
        let window = component(ComponentKind::Frame);
        let panel = component(ComponentKind::Panel);
        window.add_child(&panel);
        assert_eq!(parent_of(&panel), Some(window));
    }

    #[test]
    fn iconified_internal_frame_resolves_through_its_desktop_icon() {
        let pane = component(ComponentKind::DesktopPane);
        let icon = component(ComponentKind::DesktopIcon);
        let internal = component(ComponentKind::InternalFrame);
        icon.set_desktop_pane(&pane);
        internal.set_desktop_icon(&icon);

        assert_eq!(parent_of(&internal), Some(pane));
    }

    #[test]
    fn internal_frame_without_an_icon_has_no_parent() {
        let internal = component(ComponentKind::InternalFrame);
        assert_eq!(parent_of(&internal), None);

        let icon = component(ComponentKind::DesktopIcon);
        internal.set_desktop_icon(&icon);
        assert_eq!(parent_of(&internal), None);
    }

    #[test]
    fn invoker_resolves_from_anywhere_inside_the_popup() {
        let button = component(ComponentKind::Control);
        let popup = component(ComponentKind::PopupMenu);
        let item = component(ComponentKind::MenuItem);
        popup.set_invoker(&button);
        popup.add_child(&item);

        assert_eq!(invoker_for(&item), Some(button.clone()));
        assert_eq!(invoker_for(&popup), Some(button));
    }

    #[test]
    fn components_off_any_popup_have_no_invoker() {
        let window = component(ComponentKind::Frame);
        let panel = component(ComponentKind::Panel);
        window.add_child(&panel);
        assert_eq!(invoker_for(&panel), None);
    }

    #[test]
    fn window_for_returns_the_window_itself() {
        let window = component(ComponentKind::Dialog);
        assert_eq!(window_for(&window), Some(window.clone()));
    }

    #[test]
    fn window_for_follows_parents_for_plain_components() {
        let window = component(ComponentKind::Frame);
        let panel = component(ComponentKind::Panel);
        let field = component(ComponentKind::Control);
        window.add_child(&panel);
        panel.add_child(&field);
        assert_eq!(window_for(&field), Some(window));
    }

    #[test]
    fn menu_elements_resolve_through_the_invoker_chain() {
        let window = component(ComponentKind::Frame);
        let button = component(ComponentKind::Control);
        window.add_child(&button);

        let popup_host = component(ComponentKind::Window);
        let popup = component(ComponentKind::PopupMenu);
        let item = component(ComponentKind::MenuItem);
        popup_host.add_child(&popup);
        popup.add_child(&item);
        popup.set_invoker(&button);

        // The popup lives in its own undecorated window, but its items belong
        // to the invoker's window.
        assert_eq!(window_for(&item), Some(window));
    }

    #[test]
    fn detached_components_have_no_window() {
        let orphan = component(ComponentKind::Control);
        assert_eq!(window_for(&orphan), None);
    }
}
