use afterglow_common::{PointerPosition, Viewport};

/// A high-level action produced from window input.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum Action {
    /// Pointer moved to a new position inside the window.
    PointerMoved(PointerPosition),
    /// Drag the orbit camera by a logical-pixel delta.
    Orbit { dx: f32, dy: f32 },
    /// One zoom step. Positive zooms in.
    Zoom(f32),
    /// Window inner size or scale factor changed.
    Resize(Viewport),
    /// Show or hide the inspector overlay.
    ToggleInspector,
    /// Close the window.
    Quit,
}

/// Keys the scene reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum Key {
    F1,
    Escape,
    Other,
}

impl Key {
    pub fn action(self) -> Option<Action> {
        match self {
            Key::F1 => Some(Action::ToggleInspector),
            Key::Escape => Some(Action::Quit),
            Key::Other => None,
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn key_bindings() {
        assert_eq!(Key::F1.action(), Some(Action::ToggleInspector));
        assert_eq!(Key::Escape.action(), Some(Action::Quit));
        assert_eq!(Key::Other.action(), None);
    }

    #[test]
    fn action_pointer_is_constructible() {
        let a = Action::PointerMoved(PointerPosition::new(1.0, 2.0));
        assert!(matches!(a, Action::PointerMoved(p) if p.x == 1.0 && p.y == 2.0));
    }
}
