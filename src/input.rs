use std::collections::HashSet;

use glam::Vec2;
use parking_lot::RwLock;
use serde::{Deserialize, Serialize};

/// Identifier for a keyboard key.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum KeyCode {
    Named(NamedKey),
    /// Letter keys, stored upper-case.
    Character(char),
}

/// Non-character keys the camera controls read.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum NamedKey {
    Left,
    Right,
    Up,
    Down,
}

#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Serialize, Deserialize)]
pub enum MouseButton {
    Left,
    Right,
}

/// Thread-safe input snapshot written by the event loop and drained once
/// per frame by the camera.
#[derive(Debug, Default)]
pub struct InputState {
    keys: RwLock<HashSet<KeyCode>>,
    mouse_buttons: RwLock<HashSet<MouseButton>>,
    cursor: RwLock<Option<Vec2>>,
    drag: RwLock<Vec2>,
    scroll: RwLock<f32>,
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    pub fn set_key_down(&self, key: KeyCode) {
        self.keys.write().insert(key);
    }

    pub fn set_key_up(&self, key: KeyCode) {
        self.keys.write().remove(&key);
    }

    pub fn set_mouse_button_down(&self, button: MouseButton) {
        self.mouse_buttons.write().insert(button);
    }

    pub fn set_mouse_button_up(&self, button: MouseButton) {
        self.mouse_buttons.write().remove(&button);
    }

    /// Records the cursor position; movement while a button is held
    /// accumulates into the drag delta.
    pub fn set_mouse_position(&self, position: Vec2) {
        let previous = self.cursor.write().replace(position);
        if let Some(previous) = previous {
            if !self.mouse_buttons.read().is_empty() {
                *self.drag.write() += position - previous;
            }
        }
    }

    pub fn add_scroll(&self, delta: f32) {
        *self.scroll.write() += delta;
    }

    pub fn is_key_down(&self, key: KeyCode) -> bool {
        self.keys.read().contains(&key)
    }

    pub fn is_mouse_button_down(&self, button: MouseButton) -> bool {
        self.mouse_buttons.read().contains(&button)
    }

    pub fn mouse_position(&self) -> Vec2 {
        self.cursor.read().unwrap_or(Vec2::ZERO)
    }

    /// Returns and clears the drag accumulated since the previous call.
    pub fn take_drag(&self) -> Vec2 {
        std::mem::take(&mut *self.drag.write())
    }

    /// Returns and clears the scroll accumulated since the previous call.
    pub fn take_scroll(&self) -> f32 {
        std::mem::take(&mut *self.scroll.write())
    }
}
