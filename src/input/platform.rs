//! Platform-dependent input behavior.

/// Host platform family, as far as input synthesis cares.
///
/// Carried as a value on the robot so tests can simulate a platform other
/// than the one they run on.
#[derive(Clone, Copy, Debug, Eq, Hash, PartialEq)]
pub enum Platform {
    Windows,
    MacOs,
    X11,
}

impl Platform {
    /// Platform family the process is running on. Anything that is not
    /// Windows or macOS gets X11 input behavior.
    #[must_use]
    pub fn current() -> Self {
        if cfg!(target_os = "windows") {
            Self::Windows
        } else if cfg!(target_os = "macos") {
            Self::MacOs
        } else {
            Self::X11
        }
    }

    /// Pixels the pointer must travel before the toolkit recognizes a drag.
    #[must_use]
    pub fn drag_threshold(self) -> i32 {
        match self {
            Self::Windows | Self::MacOs => 10,
            Self::X11 => 16,
        }
    }

    /// Whether the user can resize windows without native decorations.
    /// Most X11 window managers allow arbitrary resizing.
    #[must_use]
    pub fn can_resize_windows(self) -> bool {
        self == Self::X11
    }

    /// Whether the user can move windows without native decorations.
    #[must_use]
    pub fn can_move_windows(self) -> bool {
        self == Self::X11
    }
}
