use std::collections::HashSet;
use winit::event::{ElementState, WindowEvent};
use winit::keyboard::{KeyCode, PhysicalKey};

use crate::traits::{Button, Controller};

/// Adapter that bridges Winit events to the Controller trait
#[derive(Debug, Clone, Default)]
pub struct WinitController {
    /// Currently pressed buttons
    pressed_keys: HashSet<Button>,
    /// Current mouse position (relative to window)
    mouse_position: Option<(f32, f32)>,
}

impl WinitController {
    /// Create a new WinitController with no pressed keys
    pub fn new() -> Self {
        Self::default()
    }

    /// Process a Winit WindowEvent and update internal state.
    /// Returns the button if this event pressed it (key repeat excluded).
    pub fn process_event(&mut self, event: &WindowEvent) -> Option<Button> {
        match event {
            WindowEvent::KeyboardInput { event, .. } => {
                let PhysicalKey::Code(keycode) = event.physical_key else {
                    return None;
                };
                let button = Self::keycode_to_button(keycode)?;
                match event.state {
                    ElementState::Pressed => self.press(button).then_some(button),
                    ElementState::Released => {
                        self.release(button);
                        None
                    }
                }
            }
            WindowEvent::CursorMoved { position, .. } => {
                self.mouse_position = Some((position.x as f32, position.y as f32));
                None
            }
            WindowEvent::CursorLeft { .. } => {
                self.mouse_position = None;
                None
            }
            WindowEvent::Focused(false) => {
                self.clear();
                None
            }
            _ => None,
        }
    }

    /// Mark a button down; false if it already was
    pub fn press(&mut self, button: Button) -> bool {
        self.pressed_keys.insert(button)
    }

    pub fn release(&mut self, button: Button) {
        self.pressed_keys.remove(&button);
    }

    /// Drop every held key, e.g. when the window loses focus
    pub fn clear(&mut self) {
        self.pressed_keys.clear();
    }

    /// Get current mouse position (if available)
    pub fn mouse_position(&self) -> Option<(f32, f32)> {
        self.mouse_position
    }

    /// Map Winit KeyCode to Button
    fn keycode_to_button(keycode: KeyCode) -> Option<Button> {
        match keycode {
            KeyCode::ArrowLeft => Some(Button::ArrowLeft),
            KeyCode::ArrowRight => Some(Button::ArrowRight),
            KeyCode::ArrowUp => Some(Button::ArrowUp),
            KeyCode::ArrowDown => Some(Button::ArrowDown),
            KeyCode::KeyW => Some(Button::KeyW),
            KeyCode::KeyF => Some(Button::KeyF),
            KeyCode::KeyM => Some(Button::KeyM),
            KeyCode::KeyA => Some(Button::KeyA),
            KeyCode::KeyQ => Some(Button::KeyQ),
            KeyCode::Escape => Some(Button::Escape),
            _ => None,
        }
    }
}

impl Controller for WinitController {
    fn is_down(&self, button: Button) -> bool {
        self.pressed_keys.contains(&button)
    }
}
