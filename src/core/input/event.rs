//=========================================================================
// Input Event Types
//
// Defines the internal representation of low-level input events.
//
// This module abstracts away platform-specific input (e.g. Winit) into
// a unified, engine-friendly format consumed by the state tracker.
//
// Responsibilities:
// - Represent keyboard, mouse and gamepad inputs in a portable way
// - Provide equality and hashing semantics for deduplication
// - Enable event coalescing (e.g., multiple PointerMoved → last position)
//
// Event Flow:
// ```text
// Platform Layer (Winit)
//         ↓
//    InputEvent (this module)
//         ↓
//    StateTracker (held state + focus)
//         ↓
//    InputSampler (per-frame snapshots, edges)
// ```
//
//=========================================================================

//=== Standard Library Imports ============================================

use std::hash::{Hash, Hasher};

//=== MouseButton =========================================================

/// Physical mouse button identifier.
///
/// The `Other` variant covers side buttons, macro buttons, and any
/// non-standard inputs.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum MouseButton {
    /// Primary button (typically left).
    Left,

    /// Secondary button (typically right).
    Right,

    /// Middle button (wheel click).
    Middle,

    /// Any other button.
    Other,
}

//=== GamepadButton =======================================================

/// Buttons of the first connected gamepad, named by layout position.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum GamepadButton {
    //--- Face Buttons -----------------------------------------------------
    South,
    East,
    West,
    North,

    //--- System Buttons ---------------------------------------------------
    Back,
    Start,

    //--- D-Pad ------------------------------------------------------------
    DPadUp,
    DPadDown,
    DPadLeft,
    DPadRight,

    //--- Shoulders --------------------------------------------------------
    LeftShoulder,
    RightShoulder,
}

//=== KeyCode =============================================================

/// Physical keyboard key identifier.
///
/// Represents the physical key location, not the character produced.
/// Additional keys can be added as needed without breaking existing code.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub enum KeyCode {
    //--- Numeric Keys -----------------------------------------------------

    /// Number row: 0-9
    Digit0, Digit1, Digit2, Digit3, Digit4,
    Digit5, Digit6, Digit7, Digit8, Digit9,

    //--- Alphabetic Keys --------------------------------------------------

    /// Letter keys: A-Z (physical location, not character)
    KeyA, KeyB, KeyC, KeyD, KeyE, KeyF, KeyG, KeyH, KeyI,
    KeyJ, KeyK, KeyL, KeyM, KeyN, KeyO, KeyP, KeyQ, KeyR,
    KeyS, KeyT, KeyU, KeyV, KeyW, KeyX, KeyY, KeyZ,

    //--- Arrow Keys -------------------------------------------------------

    ArrowDown,
    ArrowLeft,
    ArrowRight,
    ArrowUp,

    //--- Function Keys ----------------------------------------------------

    /// F1-F12. F11 toggles fullscreen and F12 toggles fast-forward.
    F1, F2, F3, F4, F5, F6, F7, F8, F9, F10, F11, F12,

    //--- Special Keys -----------------------------------------------------

    Space,
    Enter,
    /// Quits the application.
    Escape,
    Tab,
    Backspace,
    Delete,
    ShiftLeft,
    ShiftRight,
    ControlLeft,
    ControlRight,

    /// Fallback for keys not explicitly mapped by the input layer.
    Unidentified,
}

//=== InputEvent ==========================================================

/// Low-level input event from the platform layer.
///
/// # Equality & Hashing Semantics
///
/// Events are compared by type + payload. `PointerMoved` events are
/// equal regardless of coordinates, allowing efficient coalescing
/// (last position wins).
///
/// ```text
/// KeyDown(A)       == KeyDown(A)         ✓
/// KeyDown(A)       == KeyUp(A)           ✗ (different type)
/// PointerMoved{..} == PointerMoved{..}   ✓ (always equal)
/// ```
#[derive(Debug, Clone, Copy)]
pub enum InputEvent {
    KeyDown(KeyCode),
    KeyUp(KeyCode),
    MouseButtonDown(MouseButton),
    MouseButtonUp(MouseButton),
    GamepadButtonDown(GamepadButton),
    GamepadButtonUp(GamepadButton),

    /// Pointer moved to a new position in device space
    /// (pixels, top-left origin of the back buffer).
    PointerMoved { x: f32, y: f32 },

    /// Unrecognized or unsupported event, ignored by the tracker.
    Unidentified,
}

impl InputEvent {
    /// Returns `true` for events that change continuously (coalescable).
    pub fn is_continuous(&self) -> bool {
        matches!(self, InputEvent::PointerMoved { .. })
    }

    /// Returns `true` for key and button presses.
    pub fn is_press(&self) -> bool {
        matches!(
            self,
            InputEvent::KeyDown(_) | InputEvent::MouseButtonDown(_) | InputEvent::GamepadButtonDown(_)
        )
    }
}

//--- Trait Implementations -----------------------------------------------

impl PartialEq for InputEvent {
    fn eq(&self, other: &Self) -> bool {
        use InputEvent::*;
        match (self, other) {
            (KeyDown(a), KeyDown(b)) | (KeyUp(a), KeyUp(b)) => a == b,
            (MouseButtonDown(a), MouseButtonDown(b)) | (MouseButtonUp(a), MouseButtonUp(b)) => a == b,
            (GamepadButtonDown(a), GamepadButtonDown(b))
            | (GamepadButtonUp(a), GamepadButtonUp(b)) => a == b,
            // PointerMoved: coordinates ignored, always equal
            (PointerMoved { .. }, PointerMoved { .. }) => true,
            (Unidentified, Unidentified) => true,
            _ => false,
        }
    }
}

impl Eq for InputEvent {}

/// Hashes discriminant + payload. Coordinates are NOT hashed for
/// `PointerMoved` (consistent with equality).
impl Hash for InputEvent {
    fn hash<H: Hasher>(&self, state: &mut H) {
        std::mem::discriminant(self).hash(state);

        match self {
            Self::KeyDown(key) | Self::KeyUp(key) => key.hash(state),
            Self::MouseButtonDown(button) | Self::MouseButtonUp(button) => button.hash(state),
            Self::GamepadButtonDown(button) | Self::GamepadButtonUp(button) => button.hash(state),
            _ => {}
        }
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
