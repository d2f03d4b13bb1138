//! Input events delivered to the widget graph.

/// Mouse button identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseButton {
    Left,
    Middle,
    Right,
}

/// Key identifier for simulated keyboard input.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Key {
    Char(char),
    Enter,
    Escape,
    Tab,
    Backspace,
}

/// Low-level input event, delivered one at a time on the dispatch thread.
///
/// Notes:
/// - Mouse presses and releases carry no coordinates; they apply at the
///   pointer position tracked by the screen's input state, the same way a
///   hardware event does.
/// - Key events are routed to the current focus owner.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum InputEvent {
    MouseMove { x: i32, y: i32 },
    MousePress { button: MouseButton },
    MouseRelease { button: MouseButton },
    KeyPress { key: Key },
    KeyRelease { key: Key },
}
