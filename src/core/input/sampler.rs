//=========================================================================
// Input Sampler
//=========================================================================
//
// Double-buffered input snapshots with edge detection.
//
// Architecture:
//   InputSource → poll() → [previous | current] → query
//
// Frame lifecycle: poll() exactly once per frame, then query freely.
// Key and button queries return false while the window is unfocused, so
// gameplay never reacts to input aimed at another application. Pointer
// queries are plain geometry and ignore focus.
//
//=========================================================================

//=== External Dependencies ===============================================

use glam::Vec2;

//=== Internal Dependencies ===============================================

use super::event::{GamepadButton, KeyCode, MouseButton};
use super::snapshot::{InputSnapshot, InputSource};
use crate::core::viewport::ViewportTransform;

//=== InputSampler ========================================================

/// Per-frame input state with just-pressed and released edges.
#[derive(Debug, Clone, Default)]
pub struct InputSampler {
    previous: InputSnapshot,
    current: InputSnapshot,
}

impl InputSampler {
    pub fn new() -> Self {
        Self::default()
    }

    /// Shifts the current snapshot to previous and captures a fresh one.
    pub fn poll(&mut self, source: &dyn InputSource) {
        self.previous = std::mem::replace(&mut self.current, source.snapshot());
    }

    //=====================================================================
    // Query API - Keyboard
    //=====================================================================

    /// Returns `true` while the key is held.
    pub fn is_key_down(&self, key: KeyCode) -> bool {
        self.current.focused && self.current.keys.contains(&key)
    }

    /// Returns `true` only on the first polled frame the key is held.
    ///
    /// Use for discrete actions like jumping or toggling menus.
    pub fn is_key_just_pressed(&self, key: KeyCode) -> bool {
        self.is_key_down(key) && !self.previous.keys.contains(&key)
    }

    /// Returns `true` on the first polled frame after the key was let go.
    pub fn is_key_released(&self, key: KeyCode) -> bool {
        self.current.focused && !self.current.keys.contains(&key) && self.previous.keys.contains(&key)
    }

    //=====================================================================
    // Query API - Mouse Buttons
    //=====================================================================

    /// Like [`is_key_down`](Self::is_key_down) but for mouse buttons.
    pub fn is_button_down(&self, button: MouseButton) -> bool {
        self.current.focused && self.current.mouse_buttons.contains(&button)
    }

    /// Like [`is_key_just_pressed`](Self::is_key_just_pressed) but for mouse buttons.
    pub fn is_button_just_pressed(&self, button: MouseButton) -> bool {
        self.is_button_down(button) && !self.previous.mouse_buttons.contains(&button)
    }

    /// Left button just pressed.
    pub fn is_left_click(&self) -> bool {
        self.is_button_just_pressed(MouseButton::Left)
    }

    /// Right button just pressed.
    pub fn is_right_click(&self) -> bool {
        self.is_button_just_pressed(MouseButton::Right)
    }

    /// Middle button just pressed.
    pub fn is_middle_click(&self) -> bool {
        self.is_button_just_pressed(MouseButton::Middle)
    }

    //=====================================================================
    // Query API - Gamepad
    //=====================================================================

    pub fn is_gamepad_button_down(&self, button: GamepadButton) -> bool {
        self.current.focused && self.current.gamepad_buttons.contains(&button)
    }

    pub fn is_gamepad_button_just_pressed(&self, button: GamepadButton) -> bool {
        self.is_gamepad_button_down(button) && !self.previous.gamepad_buttons.contains(&button)
    }

    //=====================================================================
    // Query API - Pointer
    //=====================================================================

    /// Pointer position in device space (back-buffer pixels).
    pub fn pointer_position(&self) -> Vec2 {
        self.current.pointer
    }

    /// Pointer position mapped into the virtual canvas.
    pub fn pointer_virtual(&self, viewport: &ViewportTransform) -> Vec2 {
        viewport.to_virtual(self.current.pointer)
    }

    /// Returns `true` if the pointer maps inside the virtual canvas.
    ///
    /// Both edges are inclusive, so a pointer on the far border of the
    /// letterboxed area still counts as inside. Focus is not considered.
    pub fn is_pointer_in_bounds(&self, viewport: &ViewportTransform) -> bool {
        let p = self.pointer_virtual(viewport);
        let size = viewport.virtual_size();

        p.x >= 0.0 && p.x <= size.x && p.y >= 0.0 && p.y <= size.y
    }

    /// Whether the window had focus at the last poll.
    pub fn is_focused(&self) -> bool {
        self.current.focused
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::collections::VecDeque;

    //--- Test Helpers -----------------------------------------------------

    /// Source that hands out pre-scripted snapshots, one per poll.
    struct ScriptedSource {
        frames: RefCell<VecDeque<InputSnapshot>>,
    }

    impl ScriptedSource {
        fn new(frames: Vec<InputSnapshot>) -> Self {
            Self { frames: RefCell::new(frames.into()) }
        }
    }

    impl InputSource for ScriptedSource {
        fn snapshot(&self) -> InputSnapshot {
            self.frames.borrow_mut().pop_front().unwrap_or_default()
        }
    }

    fn holding(keys: &[KeyCode]) -> InputSnapshot {
        InputSnapshot {
            keys: keys.iter().copied().collect(),
            ..InputSnapshot::default()
        }
    }

    fn pointer_at(x: f32, y: f32) -> InputSnapshot {
        InputSnapshot {
            pointer: Vec2::new(x, y),
            ..InputSnapshot::default()
        }
    }

    //--- Tests ------------------------------------------------------------

    #[test]
    fn key_held_for_three_polls_is_just_pressed_once() {
        let source = ScriptedSource::new(vec![
            holding(&[KeyCode::Space]),
            holding(&[KeyCode::Space]),
            holding(&[KeyCode::Space]),
        ]);
        let mut sampler = InputSampler::new();

        let mut edges = Vec::new();
        for _ in 0..3 {
            sampler.poll(&source);
            assert!(sampler.is_key_down(KeyCode::Space));
            edges.push(sampler.is_key_just_pressed(KeyCode::Space));
        }

        assert_eq!(edges, vec![true, false, false]);
    }

    #[test]
    fn release_is_reported_for_one_poll() {
        let source = ScriptedSource::new(vec![
            holding(&[KeyCode::KeyA]),
            holding(&[]),
            holding(&[]),
        ]);
        let mut sampler = InputSampler::new();

        sampler.poll(&source);
        assert!(!sampler.is_key_released(KeyCode::KeyA));
        sampler.poll(&source);
        assert!(sampler.is_key_released(KeyCode::KeyA));
        sampler.poll(&source);
        assert!(!sampler.is_key_released(KeyCode::KeyA));
    }

    #[test]
    fn unfocused_window_reports_nothing() {
        let mut snapshot = holding(&[KeyCode::Escape]);
        snapshot.focused = false;
        let source = ScriptedSource::new(vec![snapshot]);
        let mut sampler = InputSampler::new();

        sampler.poll(&source);

        assert!(!sampler.is_focused());
        assert!(!sampler.is_key_down(KeyCode::Escape));
        assert!(!sampler.is_key_just_pressed(KeyCode::Escape));
    }

    #[test]
    fn mouse_click_edges() {
        let pressed = InputSnapshot {
            mouse_buttons: [MouseButton::Left].into_iter().collect(),
            ..InputSnapshot::default()
        };
        let source = ScriptedSource::new(vec![pressed.clone(), pressed]);
        let mut sampler = InputSampler::new();

        sampler.poll(&source);
        assert!(sampler.is_left_click());
        assert!(!sampler.is_right_click());

        sampler.poll(&source);
        assert!(!sampler.is_left_click());
        assert!(sampler.is_button_down(MouseButton::Left));
    }

    #[test]
    fn gamepad_edges() {
        let back = InputSnapshot {
            gamepad_buttons: [GamepadButton::Back].into_iter().collect(),
            ..InputSnapshot::default()
        };
        let source = ScriptedSource::new(vec![back.clone(), back]);
        let mut sampler = InputSampler::new();

        sampler.poll(&source);
        assert!(sampler.is_gamepad_button_just_pressed(GamepadButton::Back));
        sampler.poll(&source);
        assert!(!sampler.is_gamepad_button_just_pressed(GamepadButton::Back));
        assert!(sampler.is_gamepad_button_down(GamepadButton::Back));
    }

    #[test]
    fn pointer_bounds_follow_the_letterbox() {
        let mut viewport = ViewportTransform::new(1280, 720).unwrap();
        viewport.resize(1000, 1000);

        let source = ScriptedSource::new(vec![
            pointer_at(500.0, 500.0),
            pointer_at(500.0, 100.0),
            pointer_at(1000.0, 781.0),
        ]);
        let mut sampler = InputSampler::new();

        sampler.poll(&source);
        assert!(sampler.is_pointer_in_bounds(&viewport));

        // Above the letterboxed area
        sampler.poll(&source);
        assert!(!sampler.is_pointer_in_bounds(&viewport));

        // Exactly on the far corner: inclusive
        sampler.poll(&source);
        assert!(sampler.is_pointer_in_bounds(&viewport));
    }

    #[test]
    fn pointer_bounds_ignore_focus() {
        let viewport = ViewportTransform::new(1280, 720).unwrap();
        let mut snapshot = pointer_at(640.0, 360.0);
        snapshot.focused = false;
        let source = ScriptedSource::new(vec![snapshot]);
        let mut sampler = InputSampler::new();

        sampler.poll(&source);

        assert!(!sampler.is_focused());
        assert!(sampler.is_pointer_in_bounds(&viewport));
    }
}
