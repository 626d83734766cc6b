use glam::DVec2;

/// Platform-agnostic input events.
///
/// These are fed into a [`GestureRecognizer`](super::GestureRecognizer)
/// (usually through [`Navigator::handle_input`]). Coordinates are logical
/// pixels relative to the viewer surface.
///
/// Pointer releases should be forwarded even when they happen outside the
/// surface, otherwise a drag that leaves the viewport never resolves.
///
/// # Example
///
/// ```ignore
/// let events = navigator.handle_input(InputEvent::PointerDown {
///     button: MouseButton::Left,
///     x: 100.0,
///     y: 200.0,
/// });
/// ```
///
/// [`Navigator::handle_input`]: crate::navigator::Navigator::handle_input
#[derive(Debug, Clone, PartialEq)]
pub enum InputEvent {
    /// Mouse button pressed.
    PointerDown {
        /// Which button.
        button: MouseButton,
        /// Horizontal position.
        x: f64,
        /// Vertical position.
        y: f64,
    },
    /// Cursor moved.
    PointerMove {
        /// Horizontal position.
        x: f64,
        /// Vertical position.
        y: f64,
    },
    /// Mouse button released.
    PointerUp {
        /// Which button.
        button: MouseButton,
        /// Horizontal position.
        x: f64,
        /// Vertical position.
        y: f64,
    },
    /// One or more fingers touched down.
    TouchStart {
        /// Every finger currently on the surface.
        touches: Vec<DVec2>,
    },
    /// Fingers moved.
    TouchMove {
        /// Every finger currently on the surface.
        touches: Vec<DVec2>,
    },
    /// One or more fingers lifted.
    TouchEnd {
        /// Fingers still on the surface.
        touches: Vec<DVec2>,
        /// Fingers that were just lifted.
        changed: Vec<DVec2>,
    },
    /// The platform aborted the touch sequence.
    TouchCancel,
    /// Scroll wheel.
    Wheel {
        /// Vertical delta (positive = scroll down = zoom out).
        delta_y: f64,
        /// Whether Ctrl was held.
        ctrl: bool,
    },
    /// Key pressed (DOM `KeyboardEvent.key` naming).
    KeyDown {
        /// Key name, e.g. `"ArrowLeft"` or `"Control"`.
        key: String,
    },
    /// Key released.
    KeyUp {
        /// Key name.
        key: String,
    },
    /// The viewer entered (`true`) or left fullscreen.
    FullscreenChanged(bool),
}

/// Platform-agnostic mouse button identifier.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseButton {
    /// Primary (left) mouse button.
    Left,
    /// Secondary (right) mouse button.
    Right,
    /// Middle mouse button (wheel click).
    Middle,
}

#[cfg(feature = "viewer")]
impl From<winit::event::MouseButton> for MouseButton {
    fn from(button: winit::event::MouseButton) -> Self {
        use winit::event::MouseButton as Winit;
        match button {
            Winit::Right => Self::Right,
            Winit::Middle => Self::Middle,
            Winit::Left | Winit::Back | Winit::Forward | Winit::Other(_) => {
                Self::Left
            }
        }
    }
}

/// Click reported by the recognizer.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct ClickData {
    /// Secondary click (right button or long press).
    pub rightclick: bool,
    /// Horizontal position where the press started.
    pub x: f64,
    /// Vertical position where the press started.
    pub y: f64,
}

/// Transient hint overlays the host may show.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Hint {
    /// "Use Ctrl + scroll to zoom".
    CtrlZoom,
    /// "Use two fingers to move".
    TwoFingers,
}

/// Output of the recognizer for the host to act on.
#[derive(Debug, Clone, PartialEq)]
pub enum ViewerEvent {
    /// Single click (or long press, as a right click).
    Click(ClickData),
    /// Second click close to the first one; carries the first click.
    DoubleClick(ClickData),
    /// Show a hint overlay.
    ShowHint(Hint),
    /// Hide a hint overlay.
    HideHint(Hint),
    /// A key bound to [`KeyAction::Command`](super::KeyAction::Command) was
    /// pressed.
    KeyCommand(String),
}
