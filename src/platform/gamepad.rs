//=========================================================================
// Gamepad Poller
//=========================================================================
//
// Native gamepad input via gilrs, converted into engine InputEvents.
//
// Architecture:
//   gilrs event queue → poll() → InputEvent → InputBuffer (discrete)
//
// Winit has no gamepad support, so the platform drains gilrs once per
// redraw next to the window events. If gilrs fails to initialize (no
// backend on this OS), gamepad input is disabled and the engine keeps
// running keyboard/mouse only.
//
//=========================================================================

//=== External Dependencies ===============================================

use gilrs::{Button, Event, EventType, Gilrs};
use log::{debug, info, warn};

//=== Internal Dependencies ===============================================

use super::input_buffer::InputBuffer;
use crate::core::input::event::{GamepadButton, InputEvent};

//=== GamepadPoller =======================================================

pub(crate) struct GamepadPoller {
    gilrs: Option<Gilrs>,
}

impl GamepadPoller {
    pub(crate) fn new() -> Self {
        let gilrs = match Gilrs::new() {
            Ok(gilrs) => {
                let connected = gilrs.gamepads().count();
                info!(target: "platform::input", "Gamepad backend ready ({} connected)", connected);
                Some(gilrs)
            }
            Err(e) => {
                warn!(target: "platform::input", "Gamepad input disabled: {}", e);
                None
            }
        };

        Self { gilrs }
    }

    /// Drains pending gamepad events into the frame's input buffer.
    pub(crate) fn poll(&mut self, buffer: &mut InputBuffer) {
        let Some(gilrs) = self.gilrs.as_mut() else { return };

        while let Some(Event { event, .. }) = gilrs.next_event() {
            match event {
                EventType::ButtonPressed(button, _) => {
                    if let Some(button) = map_button(button) {
                        buffer.push_discrete(InputEvent::GamepadButtonDown(button));
                    }
                }
                EventType::ButtonReleased(button, _) => {
                    if let Some(button) = map_button(button) {
                        buffer.push_discrete(InputEvent::GamepadButtonUp(button));
                    }
                }
                EventType::Connected => debug!(target: "platform::input", "Gamepad connected"),
                EventType::Disconnected => debug!(target: "platform::input", "Gamepad disconnected"),
                _ => {}
            }
        }
    }
}

//=== Conversions =========================================================

/// Maps gilrs buttons to engine buttons (layout position, not label).
///
/// Triggers, stick clicks and the guide button are not mapped.
fn map_button(button: Button) -> Option<GamepadButton> {
    let mapped = match button {
        Button::South => GamepadButton::South,
        Button::East => GamepadButton::East,
        Button::West => GamepadButton::West,
        Button::North => GamepadButton::North,
        Button::Select => GamepadButton::Back,
        Button::Start => GamepadButton::Start,
        Button::DPadUp => GamepadButton::DPadUp,
        Button::DPadDown => GamepadButton::DPadDown,
        Button::DPadLeft => GamepadButton::DPadLeft,
        Button::DPadRight => GamepadButton::DPadRight,
        Button::LeftTrigger => GamepadButton::LeftShoulder,
        Button::RightTrigger => GamepadButton::RightShoulder,
        _ => return None,
    };
    Some(mapped)
}

//=========================================================================
// Unit Tests
//=========================================================================
