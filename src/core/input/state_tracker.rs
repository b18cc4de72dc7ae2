//=========================================================================
// State Tracker
//=========================================================================
//
// Event-driven input source.
//
// Architecture:
//   InputEvent → process_events() → HashSet (keys/buttons held) → snapshot()
//
// The tracker only knows what is held *now*. Edges (just pressed,
// released) are derived one level up by the InputSampler, which compares
// consecutive snapshots.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::collections::HashSet;

use glam::Vec2;
use log::{debug, trace};

//=== Internal Dependencies ===============================================

use super::event::{GamepadButton, InputEvent, KeyCode, MouseButton};
use super::snapshot::{InputSnapshot, InputSource};

//=== StateTracker ========================================================

/// Tracks which keys and buttons are held from a stream of [`InputEvent`]s.
///
/// Duplicate downs (OS key repeat) and ups for buttons that were never
/// down are ignored. Losing focus releases everything, since the window
/// stops receiving the matching up events, and presses that arrive while
/// unfocused are dropped for the same reason.
pub struct StateTracker {
    keys_down: HashSet<KeyCode>,
    mouse_buttons_down: HashSet<MouseButton>,
    gamepad_buttons_down: HashSet<GamepadButton>,
    pointer: Vec2,
    focused: bool,
}

impl StateTracker {
    /// Creates a focused tracker with nothing held.
    pub fn new() -> Self {
        Self {
            keys_down: HashSet::new(),
            mouse_buttons_down: HashSet::new(),
            gamepad_buttons_down: HashSet::new(),
            pointer: Vec2::ZERO,
            focused: true,
        }
    }

    //--- Event Processing -------------------------------------------------

    /// Processes input events, updating held state.
    pub fn process_events(&mut self, events: &[InputEvent]) {
        for event in events {
            self.process_event(event);
        }
    }

    /// Records a window focus change.
    pub fn set_focused(&mut self, focused: bool) {
        if self.focused == focused {
            return;
        }

        self.focused = focused;
        if !focused {
            debug!(target: "input", "Focus lost, releasing all held inputs");
            self.keys_down.clear();
            self.mouse_buttons_down.clear();
            self.gamepad_buttons_down.clear();
        }
    }

    //--- Internal Helpers -------------------------------------------------

    /// Presses are dropped while unfocused: the matching release goes to
    /// whichever window has focus and would never reach the tracker.
    fn process_event(&mut self, event: &InputEvent) {
        if !self.focused && event.is_press() {
            trace!(target: "input", "Ignoring {:?} while unfocused", event);
            return;
        }

        match event {
            InputEvent::KeyDown(key) => {
                if !self.keys_down.insert(*key) {
                    trace!(target: "input", "Ignoring repeated KeyDown({:?})", key);
                }
            }

            InputEvent::KeyUp(key) => {
                if !self.keys_down.remove(key) {
                    trace!(target: "input", "Ignoring KeyUp({:?}) for a key that was not down", key);
                }
            }

            InputEvent::MouseButtonDown(button) => {
                self.mouse_buttons_down.insert(*button);
            }

            InputEvent::MouseButtonUp(button) => {
                self.mouse_buttons_down.remove(button);
            }

            InputEvent::GamepadButtonDown(button) => {
                self.gamepad_buttons_down.insert(*button);
            }

            InputEvent::GamepadButtonUp(button) => {
                self.gamepad_buttons_down.remove(button);
            }

            InputEvent::PointerMoved { x, y } => {
                self.pointer = Vec2::new(*x, *y);
            }

            InputEvent::Unidentified => {
                // Ignore unrecognized events
            }
        }
    }

    //=====================================================================
    // Query API
    //=====================================================================

    /// Returns `true` while the key is held.
    pub fn is_key_down(&self, key: KeyCode) -> bool {
        self.keys_down.contains(&key)
    }

    /// Like [`is_key_down`](Self::is_key_down) but for mouse buttons.
    pub fn is_button_down(&self, button: MouseButton) -> bool {
        self.mouse_buttons_down.contains(&button)
    }

    /// Like [`is_key_down`](Self::is_key_down) but for gamepad buttons.
    pub fn is_gamepad_button_down(&self, button: GamepadButton) -> bool {
        self.gamepad_buttons_down.contains(&button)
    }

    /// Last reported pointer position in device space.
    pub fn pointer_position(&self) -> Vec2 {
        self.pointer
    }

    pub fn is_focused(&self) -> bool {
        self.focused
    }
}

//--- Trait Implementations -----------------------------------------------

impl InputSource for StateTracker {
    fn snapshot(&self) -> InputSnapshot {
        InputSnapshot {
            keys: self.keys_down.clone(),
            mouse_buttons: self.mouse_buttons_down.clone(),
            gamepad_buttons: self.gamepad_buttons_down.clone(),
            pointer: self.pointer,
            focused: self.focused,
        }
    }
}

impl Default for StateTracker {
    fn default() -> Self {
        Self::new()
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
