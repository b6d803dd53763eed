use std::collections::HashMap;

use crate::api::config::KeyBindings;
use crate::api::types::Action;

/// Held state per key code. Written by key events, read once per tick.
#[derive(Debug, Clone, Default)]
pub struct KeyState {
    held: HashMap<u32, bool>,
}

impl KeyState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn press(&mut self, key_code: u32) {
        self.held.insert(key_code, true);
    }

    pub fn release(&mut self, key_code: u32) {
        self.held.insert(key_code, false);
    }

    /// Unknown keys read as released.
    pub fn is_held(&self, key_code: u32) -> bool {
        self.held.get(&key_code).copied().unwrap_or(false)
    }

    /// Whether any of the given keys is held.
    pub fn any_held(&self, key_codes: &[u32]) -> bool {
        key_codes.iter().any(|&k| self.is_held(k))
    }

    /// Whether any key bound to `action` is held.
    pub fn action_held(&self, bindings: &KeyBindings, action: Action) -> bool {
        self.any_held(bindings.keys_for(action))
    }

    /// Release every key (e.g. when the page loses focus).
    pub fn clear(&mut self) {
        self.held.clear();
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::api::config::keycode;

    #[test]
    fn press_and_release() {
        let mut keys = KeyState::new();
        assert!(!keys.is_held(keycode::W));
        keys.press(keycode::W);
        assert!(keys.is_held(keycode::W));
        keys.release(keycode::W);
        assert!(!keys.is_held(keycode::W));
    }

    #[test]
    fn repeated_key_down_is_idempotent() {
        let mut keys = KeyState::new();
        keys.press(keycode::A);
        keys.press(keycode::A);
        keys.release(keycode::A);
        assert!(!keys.is_held(keycode::A));
    }

    #[test]
    fn alternate_binding_triggers_action() {
        let bindings = KeyBindings::default();
        let mut keys = KeyState::new();
        assert!(!keys.action_held(&bindings, Action::Forward));

        keys.press(keycode::S);
        assert!(keys.action_held(&bindings, Action::Forward));
        assert!(!keys.action_held(&bindings, Action::Reverse));

        keys.release(keycode::S);
        keys.press(keycode::ARROW_DOWN);
        assert!(keys.action_held(&bindings, Action::Forward));
    }

    #[test]
    fn clear_releases_everything() {
        let mut keys = KeyState::new();
        keys.press(keycode::ARROW_LEFT);
        keys.press(keycode::D);
        keys.clear();
        assert!(!keys.any_held(&[keycode::ARROW_LEFT, keycode::D]));
    }
}
