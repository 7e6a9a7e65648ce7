use std::collections::HashSet;

/// Re-exported key and mouse enums from `winit` so callers don't need a
/// direct dependency.
pub use winit::event::MouseButton;
pub use winit::keyboard::KeyCode;

/// State of the keyboard and mouse at a given moment.
///
/// The runner feeds platform events into this structure; the engine and the
/// camera controller query it.  Edge-triggered presses are kept until
/// [`end_frame`](Self::end_frame).
#[derive(Debug, Default)]
pub struct InputState {
    keys_down: HashSet<KeyCode>,
    keys_pressed: HashSet<KeyCode>,
    mouse_buttons: HashSet<MouseButton>,
    buttons_pressed: HashSet<MouseButton>,
    mouse_pos: Option<(f32, f32)>,
    /// movement accumulated since the last `consume_mouse_delta`
    mouse_delta: (f32, f32),
}

impl InputState {
    pub fn new() -> Self {
        Default::default()
    }

    pub fn update_key(&mut self, key: KeyCode, pressed: bool) {
        if pressed {
            if self.keys_down.insert(key) {
                self.keys_pressed.insert(key);
            }
        } else {
            self.keys_down.remove(&key);
        }
    }

    /// `true` while the key is held.
    pub fn is_key_pressed(&self, key: KeyCode) -> bool {
        self.keys_down.contains(&key)
    }

    /// `true` only during the frame the key went down.
    pub fn just_pressed(&self, key: KeyCode) -> bool {
        self.keys_pressed.contains(&key)
    }

    pub fn update_mouse_button(&mut self, button: MouseButton, pressed: bool) {
        if pressed {
            if self.mouse_buttons.insert(button) {
                self.buttons_pressed.insert(button);
            }
        } else {
            self.mouse_buttons.remove(&button);
        }
    }

    pub fn is_button_down(&self, button: MouseButton) -> bool {
        self.mouse_buttons.contains(&button)
    }

    pub fn button_just_pressed(&self, button: MouseButton) -> bool {
        self.buttons_pressed.contains(&button)
    }

    /// Records the cursor position in window pixels.  The first report only
    /// establishes the reference point and yields no delta.
    pub fn set_mouse_position(&mut self, x: f32, y: f32) {
        if let Some((px, py)) = self.mouse_pos {
            self.mouse_delta.0 += x - px;
            self.mouse_delta.1 += y - py;
        }
        self.mouse_pos = Some((x, y));
    }

    /// Last cursor position, or the origin before any motion was seen.
    pub fn mouse_position(&self) -> (f32, f32) {
        self.mouse_pos.unwrap_or((0.0, 0.0))
    }

    /// Returns and resets the accumulated mouse movement.
    pub fn consume_mouse_delta(&mut self) -> (f32, f32) {
        std::mem::take(&mut self.mouse_delta)
    }

    /// Clears the edge-triggered sets.  Call once per frame after update.
    pub fn end_frame(&mut self) {
        self.keys_pressed.clear();
        self.buttons_pressed.clear();
    }
}
