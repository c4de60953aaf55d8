//! Input handling for the viewer.
//!
//! [`Input`] folds raw winit window events into per-frame state: keys that
//! went down this frame, the accumulated left-drag movement and scroll, and
//! which mouse buttons are held. The viewer reads it once per frame to drive
//! the orbit camera and the keyboard shortcuts, then calls
//! [`Input::begin_frame`].

use std::collections::HashSet;

use glam::Vec2;
use winit::event::{ElementState, MouseButton as WinitMouseButton, MouseScrollDelta, WindowEvent};
use winit::keyboard::{KeyCode as WinitKeyCode, PhysicalKey};

/// Mouse button identifiers.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseButton {
    Left,
    Right,
    Middle,
}

impl From<WinitMouseButton> for MouseButton {
    fn from(btn: WinitMouseButton) -> Self {
        match btn {
            WinitMouseButton::Right => MouseButton::Right,
            WinitMouseButton::Middle => MouseButton::Middle,
            _ => MouseButton::Left,
        }
    }
}

/// Keys the viewer reacts to.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyCode {
    A,
    B,
    P,
    R,
    Space,
    Escape,
    Other,
}

impl From<WinitKeyCode> for KeyCode {
    fn from(key: WinitKeyCode) -> Self {
        match key {
            WinitKeyCode::KeyA => KeyCode::A,
            WinitKeyCode::KeyB => KeyCode::B,
            WinitKeyCode::KeyP => KeyCode::P,
            WinitKeyCode::KeyR => KeyCode::R,
            WinitKeyCode::Space => KeyCode::Space,
            WinitKeyCode::Escape => KeyCode::Escape,
            _ => KeyCode::Other,
        }
    }
}

/// Keyboard shortcut actions.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Shortcut {
    /// New random seed, then rebuild.
    RandomizeSeed,
    /// Cycle to the next palette, then recolor.
    NextPalette,
    ToggleBloom,
    ToggleAutoRotate,
    TogglePause,
    Quit,
}

impl Shortcut {
    /// The shortcut bound to `key`, if any.
    pub fn for_key(key: KeyCode) -> Option<Self> {
        match key {
            KeyCode::R => Some(Shortcut::RandomizeSeed),
            KeyCode::P => Some(Shortcut::NextPalette),
            KeyCode::B => Some(Shortcut::ToggleBloom),
            KeyCode::A => Some(Shortcut::ToggleAutoRotate),
            KeyCode::Space => Some(Shortcut::TogglePause),
            KeyCode::Escape => Some(Shortcut::Quit),
            KeyCode::Other => None,
        }
    }
}

/// Per-frame input state.
#[derive(Debug, Default)]
pub struct Input {
    keys_held: HashSet<KeyCode>,
    keys_pressed: HashSet<KeyCode>,
    mouse_held: HashSet<MouseButton>,
    mouse_position: Option<Vec2>,
    drag_delta: Vec2,
    scroll_delta: f32,
}

impl Input {
    pub fn new() -> Self {
        Self::default()
    }

    /// Check if a key went down this frame (repeats excluded).
    pub fn key_pressed(&self, key: KeyCode) -> bool {
        self.keys_pressed.contains(&key)
    }

    /// Cursor movement in pixels while the left button was held, this frame.
    pub fn drag_delta(&self) -> Vec2 {
        self.drag_delta
    }

    /// Scroll wheel lines this frame. Positive scrolls up/forward.
    pub fn scroll_delta(&self) -> f32 {
        self.scroll_delta
    }

    /// Shortcuts triggered this frame.
    pub fn shortcuts(&self) -> impl Iterator<Item = Shortcut> + '_ {
        self.keys_pressed.iter().filter_map(|&key| Shortcut::for_key(key))
    }

    /// Clear per-frame state. Held keys and buttons persist.
    pub fn begin_frame(&mut self) {
        self.keys_pressed.clear();
        self.drag_delta = Vec2::ZERO;
        self.scroll_delta = 0.0;
    }

    /// Process a winit window event.
    pub fn handle_event(&mut self, event: &WindowEvent) {
        match event {
            WindowEvent::KeyboardInput { event, .. } => {
                if let PhysicalKey::Code(keycode) = event.physical_key {
                    match event.state {
                        ElementState::Pressed => self.press_key(keycode.into()),
                        ElementState::Released => self.release_key(keycode.into()),
                    }
                }
            }
            WindowEvent::MouseInput { state, button, .. } => match state {
                ElementState::Pressed => self.press_button((*button).into()),
                ElementState::Released => self.release_button((*button).into()),
            },
            WindowEvent::CursorMoved { position, .. } => {
                self.move_cursor(Vec2::new(position.x as f32, position.y as f32));
            }
            WindowEvent::CursorLeft { .. } => {
                self.mouse_position = None;
            }
            WindowEvent::MouseWheel { delta, .. } => {
                self.scroll(match delta {
                    MouseScrollDelta::LineDelta(_, y) => *y,
                    MouseScrollDelta::PixelDelta(pos) => pos.y as f32 / 100.0,
                });
            }
            WindowEvent::Focused(false) => {
                self.keys_held.clear();
                self.mouse_held.clear();
            }
            _ => {}
        }
    }

    fn press_key(&mut self, key: KeyCode) {
        // Only fire pressed if not already held (no repeat)
        if self.keys_held.insert(key) {
            self.keys_pressed.insert(key);
        }
    }

    fn release_key(&mut self, key: KeyCode) {
        self.keys_held.remove(&key);
    }

    fn press_button(&mut self, button: MouseButton) {
        self.mouse_held.insert(button);
    }

    fn release_button(&mut self, button: MouseButton) {
        self.mouse_held.remove(&button);
    }

    fn move_cursor(&mut self, position: Vec2) {
        if let Some(last) = self.mouse_position {
            if self.mouse_held.contains(&MouseButton::Left) {
                self.drag_delta += position - last;
            }
        }
        self.mouse_position = Some(position);
    }

    fn scroll(&mut self, lines: f32) {
        self.scroll_delta += lines;
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_key_state() {
        let mut input = Input::new();
        assert!(!input.keys_held.contains(&KeyCode::Space));

        input.press_key(KeyCode::Space);
        assert!(input.keys_held.contains(&KeyCode::Space));
        assert!(input.key_pressed(KeyCode::Space));

        // After begin_frame, pressed is cleared but held remains
        input.begin_frame();
        assert!(input.keys_held.contains(&KeyCode::Space));
        assert!(!input.key_pressed(KeyCode::Space));

        // Auto-repeat while held does not re-fire
        input.press_key(KeyCode::Space);
        assert!(!input.key_pressed(KeyCode::Space));

        input.release_key(KeyCode::Space);
        input.press_key(KeyCode::Space);
        assert!(input.key_pressed(KeyCode::Space));
    }

    #[test]
    fn test_drag_accumulates_only_while_held() {
        let mut input = Input::new();
        input.move_cursor(Vec2::new(10.0, 10.0));
        input.move_cursor(Vec2::new(20.0, 10.0));
        assert_eq!(input.drag_delta(), Vec2::ZERO);

        input.press_button(MouseButton::Left);
        input.move_cursor(Vec2::new(25.0, 12.0));
        input.move_cursor(Vec2::new(30.0, 15.0));
        assert_eq!(input.drag_delta(), Vec2::new(10.0, 5.0));

        input.begin_frame();
        assert_eq!(input.drag_delta(), Vec2::ZERO);
        assert!(input.mouse_held.contains(&MouseButton::Left));
    }

    #[test]
    fn test_scroll_accumulates() {
        let mut input = Input::new();
        input.scroll(1.0);
        input.scroll(0.5);
        assert_eq!(input.scroll_delta(), 1.5);
        input.begin_frame();
        assert_eq!(input.scroll_delta(), 0.0);
    }

    #[test]
    fn test_shortcuts() {
        let mut input = Input::new();
        input.press_key(KeyCode::R);
        input.press_key(KeyCode::Other);
        let shortcuts: Vec<Shortcut> = input.shortcuts().collect();
        assert_eq!(shortcuts, vec![Shortcut::RandomizeSeed]);
        assert_eq!(Shortcut::for_key(KeyCode::P), Some(Shortcut::NextPalette));
        assert_eq!(Shortcut::for_key(KeyCode::Escape), Some(Shortcut::Quit));
    }
}
