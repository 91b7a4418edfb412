/// Per-frame keyboard and mouse state.
///
/// The window layer feeds raw winit events in; engine systems query edge
/// (triggered / released) and level (down) states during the frame.
/// `end_frame` clears the edge states once the frame has been processed.

use rustc_hash::FxHashSet;
use winit::event::{ElementState, MouseButton};
use winit::keyboard::KeyCode;

#[derive(Debug, Default, Clone)]
pub struct InputState {
    keys_down: FxHashSet<KeyCode>,
    keys_triggered: FxHashSet<KeyCode>,
    keys_released: FxHashSet<KeyCode>,
    mouse_down: FxHashSet<MouseButton>,
    mouse_triggered: FxHashSet<MouseButton>,
    mouse_released: FxHashSet<MouseButton>,
    cursor_position: (f64, f64),
}

impl InputState {
    pub fn new() -> Self {
        Self::default()
    }

    /// Record a keyboard event. Key repeats do not re-trigger a held key.
    pub fn key_event(&mut self, key: KeyCode, state: ElementState) {
        match state {
            ElementState::Pressed => {
                if self.keys_down.insert(key) {
                    self.keys_triggered.insert(key);
                }
            }
            ElementState::Released => {
                if self.keys_down.remove(&key) {
                    self.keys_released.insert(key);
                }
            }
        }
    }

    /// Record a mouse button event
    pub fn mouse_event(&mut self, button: MouseButton, state: ElementState) {
        match state {
            ElementState::Pressed => {
                if self.mouse_down.insert(button) {
                    self.mouse_triggered.insert(button);
                }
            }
            ElementState::Released => {
                if self.mouse_down.remove(&button) {
                    self.mouse_released.insert(button);
                }
            }
        }
    }

    pub fn set_cursor_position(&mut self, x: f64, y: f64) {
        self.cursor_position = (x, y);
    }

    pub fn cursor_position(&self) -> (f64, f64) {
        self.cursor_position
    }

    /// Pressed this frame
    pub fn is_key_triggered(&self, key: KeyCode) -> bool {
        self.keys_triggered.contains(&key)
    }

    /// Held (including the frame it was pressed)
    pub fn is_key_down(&self, key: KeyCode) -> bool {
        self.keys_down.contains(&key)
    }

    /// Released this frame
    pub fn is_key_released(&self, key: KeyCode) -> bool {
        self.keys_released.contains(&key)
    }

    pub fn is_mouse_triggered(&self, button: MouseButton) -> bool {
        self.mouse_triggered.contains(&button)
    }

    pub fn is_mouse_down(&self, button: MouseButton) -> bool {
        self.mouse_down.contains(&button)
    }

    pub fn is_mouse_released(&self, button: MouseButton) -> bool {
        self.mouse_released.contains(&button)
    }

    /// Clear edge states; held keys and buttons stay down.
    pub fn end_frame(&mut self) {
        self.keys_triggered.clear();
        self.keys_released.clear();
        self.mouse_triggered.clear();
        self.mouse_released.clear();
    }
}

#[cfg(test)]
#[path = "input_tests.rs"]
mod tests;
