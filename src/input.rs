use std::collections::HashSet;

use glam::Vec2;
use winit::event::{ElementState, MouseScrollDelta, WindowEvent};
use winit::keyboard::{KeyCode, PhysicalKey};

/// Keyboard and pointer state sampled by the camera controller each frame.
///
/// Window events feed it through [`Input::handle_event`]; the individual
/// mutators are public so the state can also be driven directly.
#[derive(Debug, Default)]
pub struct Input {
    keys_down: HashSet<KeyCode>,
    /// `None` until the first cursor event, and again after the cursor leaves.
    pointer_position: Option<Vec2>,
}

impl Input {
    /// Empty state: no keys held, no pointer sample yet.
    pub fn new() -> Self {
        Self::default()
    }

    /// Track key and cursor state. Scroll is not tracked here, it goes
    /// straight to the camera controller (see [`scroll_lines`]).
    pub fn handle_event(&mut self, event: &WindowEvent) {
        match event {
            WindowEvent::KeyboardInput { event, .. } => {
                if let PhysicalKey::Code(key) = event.physical_key {
                    match event.state {
                        ElementState::Pressed => self.press(key),
                        ElementState::Released => self.release(key),
                    }
                }
            }
            WindowEvent::CursorMoved { position, .. } => {
                self.move_pointer(Vec2::new(position.x as f32, position.y as f32));
            }
            WindowEvent::CursorLeft { .. } => self.clear_pointer(),
            WindowEvent::Focused(false) => self.keys_down.clear(),
            _ => {}
        }
    }

    /// Mark `key` as held.
    pub fn press(&mut self, key: KeyCode) {
        self.keys_down.insert(key);
    }

    /// Mark `key` as released.
    pub fn release(&mut self, key: KeyCode) {
        self.keys_down.remove(&key);
    }

    /// Record a pointer sample in window coordinates.
    pub fn move_pointer(&mut self, position: Vec2) {
        self.pointer_position = Some(position);
    }

    /// Forget the pointer, so the next sample starts a fresh baseline.
    pub fn clear_pointer(&mut self) {
        self.pointer_position = None;
    }

    /// Returns true if the key is currently held down.
    pub fn key_down(&self, key: KeyCode) -> bool {
        self.keys_down.contains(&key)
    }

    /// Current pointer position in window coordinates, y pointing down, or
    /// `None` while the cursor is outside the window.
    pub fn pointer_position(&self) -> Option<Vec2> {
        self.pointer_position
    }
}

/// Vertical scroll amount in lines, positive away from the user.
pub fn scroll_lines(delta: &MouseScrollDelta) -> f32 {
    match delta {
        MouseScrollDelta::LineDelta(_, y) => *y,
        MouseScrollDelta::PixelDelta(pos) => pos.y as f32 / 120.0,
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keys_toggle_with_press_and_release() {
        let mut input = Input::new();
        input.press(KeyCode::KeyW);
        assert!(input.key_down(KeyCode::KeyW));
        assert!(!input.key_down(KeyCode::KeyS));

        input.release(KeyCode::KeyW);
        assert!(!input.key_down(KeyCode::KeyW));
    }

    #[test]
    fn pointer_is_unknown_until_first_sample() {
        let mut input = Input::new();
        assert_eq!(input.pointer_position(), None);

        input.move_pointer(Vec2::new(400.0, 300.0));
        assert_eq!(input.pointer_position(), Some(Vec2::new(400.0, 300.0)));

        input.clear_pointer();
        assert_eq!(input.pointer_position(), None);
    }

    #[test]
    fn pixel_scroll_is_converted_to_lines() {
        let delta = MouseScrollDelta::PixelDelta(winit::dpi::PhysicalPosition::new(0.0, 240.0));
        assert_eq!(scroll_lines(&delta), 2.0);
        assert_eq!(scroll_lines(&MouseScrollDelta::LineDelta(0.0, -1.0)), -1.0);
    }
}
