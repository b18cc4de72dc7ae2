//=========================================================================
// Input Snapshot
//=========================================================================
//
// Immutable picture of the input devices at one instant, plus the
// boundary trait through which the sampler obtains it.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::collections::HashSet;

use glam::Vec2;

//=== Internal Dependencies ===============================================

use super::event::{GamepadButton, KeyCode, MouseButton};

//=== InputSnapshot =======================================================

/// Held keys and buttons, pointer position and window focus.
///
/// The pointer is in device space (back-buffer pixels).
#[derive(Debug, Clone, PartialEq)]
pub struct InputSnapshot {
    pub keys: HashSet<KeyCode>,
    pub mouse_buttons: HashSet<MouseButton>,
    pub gamepad_buttons: HashSet<GamepadButton>,
    pub pointer: Vec2,
    pub focused: bool,
}

impl Default for InputSnapshot {
    /// Nothing held, pointer at the origin, window focused.
    fn default() -> Self {
        Self {
            keys: HashSet::new(),
            mouse_buttons: HashSet::new(),
            gamepad_buttons: HashSet::new(),
            pointer: Vec2::ZERO,
            focused: true,
        }
    }
}

//=== InputSource =========================================================

/// Platform input backend.
pub trait InputSource {
    /// Captures the current device state.
    fn snapshot(&self) -> InputSnapshot;
}
