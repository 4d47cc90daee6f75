use crate::action::{Action, Key};
use afterglow_common::{PointerPosition, Viewport};

/// Tracks cursor, drag and scale-factor state between window events.
#[derive(Debug, Clone)]
pub struct InputState {
    scale_factor: f64,
    physical_size: (u32, u32),
    cursor: Option<PointerPosition>,
    dragging: bool,
}

impl InputState {
    pub fn new(physical_width: u32, physical_height: u32, scale_factor: f64) -> Self {
        Self {
            scale_factor,
            physical_size: (physical_width, physical_height),
            cursor: None,
            dragging: false,
        }
    }

    /// Current viewport in logical pixels.
    pub fn viewport(&self) -> Viewport {
        Viewport::from_physical(self.physical_size.0, self.physical_size.1, self.scale_factor)
    }

    pub fn is_dragging(&self) -> bool {
        self.dragging
    }

    /// Cursor moved to a physical-pixel position inside the window.
    ///
    /// Always reports the new pointer; also reports an orbit delta while the
    /// primary button is held.
    pub fn cursor_moved(&mut self, x: f64, y: f64) -> Vec<Action> {
        let scale = self.scale_factor;
        let pointer = PointerPosition::new((x / scale) as f32, (y / scale) as f32);
        let mut actions = vec![Action::PointerMoved(pointer)];
        if let (true, Some(last)) = (self.dragging, self.cursor) {
            actions.push(Action::Orbit {
                dx: pointer.x - last.x,
                dy: pointer.y - last.y,
            });
        }
        self.cursor = Some(pointer);
        actions
    }

    pub fn cursor_left(&mut self) {
        self.dragging = false;
    }

    /// Primary button pressed or released.
    pub fn primary_button(&mut self, pressed: bool) {
        self.dragging = pressed;
    }

    /// Wheel scrolled by `delta_y` lines or pixels. Scrolling up zooms in.
    pub fn wheel(&mut self, delta_y: f32) -> Option<Action> {
        if delta_y == 0.0 {
            return None;
        }
        Some(Action::Zoom(delta_y.signum()))
    }

    pub fn key_pressed(&self, key: Key) -> Option<Action> {
        key.action()
    }

    /// Window inner size changed, in physical pixels.
    pub fn resized(&mut self, width: u32, height: u32) -> Action {
        self.physical_size = (width, height);
        Action::Resize(self.viewport())
    }

    /// Display scale factor changed. The physical size follows in a
    /// separate resize.
    pub fn scale_factor_changed(&mut self, scale_factor: f64) -> Action {
        tracing::debug!("scale factor changed to {scale_factor}");
        self.scale_factor = scale_factor;
        Action::Resize(self.viewport())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn cursor_is_reported_in_logical_pixels() {
        let mut input = InputState::new(2000, 1000, 2.0);
        let actions = input.cursor_moved(400.0, 300.0);
        assert_eq!(
            actions,
            vec![Action::PointerMoved(PointerPosition::new(200.0, 150.0))]
        );
    }

    #[test]
    fn drag_emits_orbit_delta() {
        let mut input = InputState::new(800, 600, 1.0);
        input.cursor_moved(100.0, 100.0);
        input.primary_button(true);
        assert!(input.is_dragging());

        let actions = input.cursor_moved(110.0, 95.0);
        assert_eq!(actions.len(), 2);
        assert_eq!(actions[1], Action::Orbit { dx: 10.0, dy: -5.0 });

        input.primary_button(false);
        assert_eq!(input.cursor_moved(120.0, 95.0).len(), 1);
    }

    #[test]
    fn first_move_while_dragging_has_no_delta() {
        let mut input = InputState::new(800, 600, 1.0);
        input.primary_button(true);
        assert_eq!(input.cursor_moved(5.0, 5.0).len(), 1);
    }

    #[test]
    fn leaving_window_ends_drag() {
        let mut input = InputState::new(800, 600, 1.0);
        input.primary_button(true);
        input.cursor_left();
        assert!(!input.is_dragging());
    }

    #[test]
    fn wheel_maps_to_unit_zoom() {
        let mut input = InputState::new(800, 600, 1.0);
        assert_eq!(input.wheel(3.0), Some(Action::Zoom(1.0)));
        assert_eq!(input.wheel(-0.5), Some(Action::Zoom(-1.0)));
        assert_eq!(input.wheel(0.0), None);
    }

    #[test]
    fn resize_reports_logical_viewport() {
        let mut input = InputState::new(800, 600, 1.0);
        input.scale_factor_changed(2.0);
        let action = input.resized(1600, 1200);
        assert_eq!(action, Action::Resize(Viewport::new(800.0, 600.0, 2.0)));
    }
}
