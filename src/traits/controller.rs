/// Input button identifier
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum Button {
    ArrowLeft,
    ArrowRight,
    ArrowUp,
    ArrowDown,
    /// Wireframe toggle
    KeyW,
    /// Fog toggle
    KeyF,
    /// Mipmap toggle
    KeyM,
    /// Anisotropic filtering toggle
    KeyA,
    KeyQ,
    Escape,
}

/// Controller - handles button input states
pub trait Controller {
    /// Check if button is currently down
    fn is_down(&self, button: Button) -> bool;
}

#[cfg(test)]
mod tests {
    use super::*;
    use std::collections::HashSet;

    #[test]
    fn test_button_hash_duplicates() {
        let mut set = HashSet::new();
        set.insert(Button::ArrowUp);
        set.insert(Button::ArrowUp);

        assert_eq!(set.len(), 1);
    }

    struct MockController {
        pressed: Vec<Button>,
    }

    impl Controller for MockController {
        fn is_down(&self, button: Button) -> bool {
            self.pressed.contains(&button)
        }
    }

    #[test]
    fn test_controller_is_down() {
        let controller = MockController {
            pressed: vec![Button::ArrowUp, Button::ArrowLeft],
        };

        assert!(controller.is_down(Button::ArrowUp));
        assert!(controller.is_down(Button::ArrowLeft));
        assert!(!controller.is_down(Button::ArrowDown));
    }

    #[test]
    fn test_controller_no_keys_pressed() {
        let controller = MockController { pressed: vec![] };

        assert!(!controller.is_down(Button::ArrowUp));
        assert!(!controller.is_down(Button::Escape));
    }
}
