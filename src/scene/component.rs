//! Widget-graph handles and built-in component state.

use std::fmt;
use std::sync::atomic::{AtomicU64, Ordering};
use std::sync::{Arc, Mutex, MutexGuard, Weak};

use crate::scene::geometry::{Insets, Point, Rect, Size};

/// Stable identifier for a component.
///
/// Semantics:
/// - IDs are unique within the process.
/// - IDs are never reused.
#[repr(transparent)]
#[derive(Clone, Copy, Debug, Eq, Hash, Ord, PartialEq, PartialOrd)]
pub struct ComponentId(u64);

impl ComponentId {
    fn allocate() -> Self {
        static NEXT: AtomicU64 = AtomicU64::new(1);
        Self(NEXT.fetch_add(1, Ordering::Relaxed))
    }

    pub fn raw(self) -> u64 {
        self.0
    }
}

/// Structural role of a component in the widget graph.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum ComponentKind {
    /// Decorated top-level window with a title bar.
    Frame,
    /// Decorated top-level window owned by another window.
    Dialog,
    /// Undecorated top-level window, e.g. the container backing a heavyweight
    /// popup.
    Window,
    InternalFrame,
    DesktopIcon,
    DesktopPane,
    PopupMenu,
    Menu,
    MenuItem,
    Panel,
    Control,
}

impl ComponentKind {
    /// Whether the component is a top-level window.
    #[must_use]
    pub fn is_window(self) -> bool {
        matches!(self, Self::Frame | Self::Dialog | Self::Window)
    }

    /// Whether the component participates in menu chains.
    #[must_use]
    pub fn is_menu_element(self) -> bool {
        matches!(self, Self::PopupMenu | Self::Menu | Self::MenuItem)
    }
}

/// Behavior a component supports, orthogonal to its structural kind.
///
/// A single component type plus a capability set replaces a subclass per
/// widget: a button is a `Control` that is clickable and focusable, a text
/// field is one that is also textual.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Default)]
pub struct Capabilities {
    /// Reacts to mouse clicks; clicks over it are counted.
    pub clickable: bool,
    /// Can own the keyboard focus.
    pub focusable: bool,
    /// Holds editable text fed by key events.
    pub textual: bool,
}

impl Capabilities {
    /// Clickable + focusable, the usual button shape.
    #[must_use]
    pub fn button() -> Self {
        Self {
            clickable: true,
            focusable: true,
            textual: false,
        }
    }

    /// Clickable + focusable + textual, the usual text-field shape.
    #[must_use]
    pub fn text_field() -> Self {
        Self {
            clickable: true,
            focusable: true,
            textual: true,
        }
    }
}

/// Callback invoked when a component's default accessible action runs.
pub(crate) type AccessibleAction = Arc<Mutex<Box<dyn FnMut() + Send>>>;

struct ComponentState {
    name: Option<String>,
    kind: ComponentKind,
    capabilities: Capabilities,
    bounds: Rect,
    insets: Insets,
    visible: bool,
    enabled: bool,
    resizable: bool,
    text: String,
    click_count: u32,
    parent: Weak<ComponentCore>,
    children: Vec<SceneComponent>,
    desktop_icon: Weak<ComponentCore>,
    desktop_pane: Weak<ComponentCore>,
    invoker: Weak<ComponentCore>,
    attached_popup: Weak<ComponentCore>,
    accessible_actions: Vec<AccessibleAction>,
}

pub(crate) struct ComponentCore {
    id: ComponentId,
    state: Mutex<ComponentState>,
}

/// Cheap-clone handle to a live component.
///
/// The handle always reads the live object, never a snapshot. Handles may be
/// held and cloned on any thread; mutating component state is reserved to the
/// dispatch thread by convention, the crate's own delivery and marshalling
/// paths follow it.
#[derive(Clone)]
pub struct SceneComponent {
    core: Arc<ComponentCore>,
}

/// Configures and creates a [`SceneComponent`].
pub struct ComponentBuilder {
    state: ComponentState,
}

impl ComponentBuilder {
    /// Starts a builder for a component of `kind`.
    ///
    /// Defaults: enabled, zero bounds, no capabilities, resizable. Windows
    /// start hidden until shown on a screen; everything else starts visible.
    #[must_use]
    pub fn new(kind: ComponentKind) -> Self {
        Self {
            state: ComponentState {
                name: None,
                kind,
                capabilities: Capabilities::default(),
                bounds: Rect::default(),
                insets: Insets::default(),
                visible: !kind.is_window(),
                enabled: true,
                resizable: true,
                text: String::new(),
                click_count: 0,
                parent: Weak::new(),
                children: Vec::new(),
                desktop_icon: Weak::new(),
                desktop_pane: Weak::new(),
                invoker: Weak::new(),
                attached_popup: Weak::new(),
                accessible_actions: Vec::new(),
            },
        }
    }

    #[must_use]
    pub fn name(mut self, name: impl Into<String>) -> Self {
        self.state.name = Some(name.into());
        self
    }

    /// Bounds in screen coordinates.
    #[must_use]
    pub fn bounds(mut self, bounds: Rect) -> Self {
        self.state.bounds = bounds;
        self
    }

    #[must_use]
    pub fn insets(mut self, insets: Insets) -> Self {
        self.state.insets = insets;
        self
    }

    #[must_use]
    pub fn capabilities(mut self, capabilities: Capabilities) -> Self {
        self.state.capabilities = capabilities;
        self
    }

    #[must_use]
    pub fn visible(mut self, visible: bool) -> Self {
        self.state.visible = visible;
        self
    }

    #[must_use]
    pub fn enabled(mut self, enabled: bool) -> Self {
        self.state.enabled = enabled;
        self
    }

    #[must_use]
    pub fn resizable(mut self, resizable: bool) -> Self {
        self.state.resizable = resizable;
        self
    }

    #[must_use]
    pub fn text(mut self, text: impl Into<String>) -> Self {
        self.state.text = text.into();
        self
    }

    #[must_use]
    pub fn build(self) -> SceneComponent {
        SceneComponent {
            core: Arc::new(ComponentCore {
                id: ComponentId::allocate(),
                state: Mutex::new(self.state),
            }),
        }
    }
}

impl SceneComponent {
    fn state(&self) -> MutexGuard<'_, ComponentState> {
        self.core
            .state
            .lock()
            .unwrap_or_else(|poisoned| poisoned.into_inner())
    }

    pub(crate) fn from_core(core: Arc<ComponentCore>) -> Self {
        Self { core }
    }

    pub(crate) fn downgrade(&self) -> Weak<ComponentCore> {
        Arc::downgrade(&self.core)
    }

    #[must_use]
    pub fn id(&self) -> ComponentId {
        self.core.id
    }

    #[must_use]
    pub fn kind(&self) -> ComponentKind {
        self.state().kind
    }

    #[must_use]
    pub fn name(&self) -> Option<String> {
        self.state().name.clone()
    }

    #[must_use]
    pub fn capabilities(&self) -> Capabilities {
        self.state().capabilities
    }

    #[must_use]
    pub fn bounds(&self) -> Rect {
        self.state().bounds
    }

    pub fn set_bounds(&self, bounds: Rect) {
        self.state().bounds = bounds;
    }

    /// Top-left corner in screen coordinates.
    #[must_use]
    pub fn location(&self) -> Point {
        self.state().bounds.location()
    }

    #[must_use]
    pub fn size(&self) -> Size {
        self.state().bounds.size()
    }

    /// Resizes in place, keeping the top-left corner.
    pub fn set_size(&self, size: Size) {
        let mut state = self.state();
        state.bounds.width = size.width;
        state.bounds.height = size.height;
    }

    /// Centroid in screen coordinates.
    #[must_use]
    pub fn center(&self) -> Point {
        self.state().bounds.center()
    }

    #[must_use]
    pub fn insets(&self) -> Insets {
        self.state().insets
    }

    pub fn set_insets(&self, insets: Insets) {
        self.state().insets = insets;
    }

    #[must_use]
    pub fn is_visible(&self) -> bool {
        self.state().visible
    }

    pub fn set_visible(&self, visible: bool) {
        self.state().visible = visible;
    }

    #[must_use]
    pub fn is_enabled(&self) -> bool {
        self.state().enabled
    }

    pub fn set_enabled(&self, enabled: bool) {
        self.state().enabled = enabled;
    }

    /// Window resizability flag. Meaningful for frames and dialogs, which
    /// honor it regardless of platform; other windows defer to the platform.
    #[must_use]
    pub fn is_resizable(&self) -> bool {
        self.state().resizable
    }

    pub fn set_resizable(&self, resizable: bool) {
        self.state().resizable = resizable;
    }

    #[must_use]
    pub fn text(&self) -> String {
        self.state().text.clone()
    }

    pub fn set_text(&self, text: impl Into<String>) {
        self.state().text = text.into();
    }

    /// Clicks delivered over this component since creation.
    #[must_use]
    pub fn click_count(&self) -> u32 {
        self.state().click_count
    }

    pub(crate) fn record_click(&self) {
        self.state().click_count += 1;
    }

    /// Whether the component and every ancestor up to a visible window are
    /// visible. Detached non-window components are never showing.
    #[must_use]
    pub fn is_showing(&self) -> bool {
        let (visible, kind, parent) = {
            let state = self.state();
            (state.visible, state.kind, state.parent.upgrade())
        };
        if !visible {
            return false;
        }
        match parent {
            Some(parent) => Self::from_core(parent).is_showing(),
            None => kind.is_window(),
        }
    }

    #[must_use]
    pub fn is_menu_element(&self) -> bool {
        self.kind().is_menu_element()
    }

    /// Standard parent link. Association fallbacks (desktop icons, popup
    /// invokers) live in the hierarchy layer, not here.
    #[must_use]
    pub fn parent(&self) -> Option<SceneComponent> {
        self.state().parent.upgrade().map(Self::from_core)
    }

    #[must_use]
    pub fn children(&self) -> Vec<SceneComponent> {
        self.state().children.clone()
    }

    /// Attaches `child`, replacing any previous parent link it had.
    pub fn add_child(&self, child: &SceneComponent) {
        child.state().parent = Arc::downgrade(&self.core);
        self.state().children.push(child.clone());
    }

    /// Desktop icon shown for this internal frame while iconified.
    #[must_use]
    pub fn desktop_icon(&self) -> Option<SceneComponent> {
        self.state().desktop_icon.upgrade().map(Self::from_core)
    }

    pub fn set_desktop_icon(&self, icon: &SceneComponent) {
        self.state().desktop_icon = icon.downgrade();
    }

    /// Desktop pane a desktop icon belongs to.
    #[must_use]
    pub fn desktop_pane(&self) -> Option<SceneComponent> {
        self.state().desktop_pane.upgrade().map(Self::from_core)
    }

    pub fn set_desktop_pane(&self, pane: &SceneComponent) {
        self.state().desktop_pane = pane.downgrade();
    }

    /// Component a popup menu was invoked from.
    #[must_use]
    pub fn invoker(&self) -> Option<SceneComponent> {
        self.state().invoker.upgrade().map(Self::from_core)
    }

    /// Records `invoker` as the component this popup was invoked from, and
    /// the reverse popup link on the invoker.
    pub fn set_invoker(&self, invoker: &SceneComponent) {
        self.state().invoker = invoker.downgrade();
        invoker.state().attached_popup = self.downgrade();
    }

    /// Popup menu this component invokes, if one has been attached.
    #[must_use]
    pub fn attached_popup(&self) -> Option<SceneComponent> {
        self.state().attached_popup.upgrade().map(Self::from_core)
    }

    /// Registers an accessible action. The first registered action is the
    /// default one.
    pub fn add_accessible_action(&self, action: impl FnMut() + Send + 'static) {
        self.state()
            .accessible_actions
            .push(Arc::new(Mutex::new(Box::new(action))));
    }

    #[must_use]
    pub fn accessible_action_count(&self) -> usize {
        self.state().accessible_actions.len()
    }

    pub(crate) fn default_accessible_action(&self) -> Option<AccessibleAction> {
        self.state().accessible_actions.first().cloned()
    }

    /// One-line description used in failure messages, e.g.
    /// `Frame[name='main', enabled=true, visible=true, showing=false]`.
    #[must_use]
    pub fn describe(&self) -> String {
        let (kind, name, enabled, visible, textual, text) = {
            let state = self.state();
            (
                state.kind,
                state.name.clone(),
                state.enabled,
                state.visible,
                state.capabilities.textual,
                state.text.clone(),
            )
        };
        let showing = self.is_showing();
        let name = match name {
            Some(name) => format!("'{name}'"),
            None => "unset".to_string(),
        };
        if textual {
            format!(
                "{kind:?}[name={name}, text='{text}', enabled={enabled}, visible={visible}, showing={showing}]"
            )
        } else {
            format!(
                "{kind:?}[name={name}, enabled={enabled}, visible={visible}, showing={showing}]"
            )
        }
    }
}

impl PartialEq for SceneComponent {
    fn eq(&self, other: &Self) -> bool {
        self.core.id == other.core.id
    }
}

impl Eq for SceneComponent {}

impl fmt::Debug for SceneComponent {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(&self.describe())
    }
}
