//=========================================================================
// Input Subsystem
//=========================================================================
//
// Two-tier input model:
//
//   Platform → InputEvent → StateTracker   (what is held right now)
//                                ↓ snapshot()
//                           InputSampler     (edges across frames)
//
// The StateTracker is fed by the platform layer every frame. Gameplay
// only ever talks to the InputSampler, which compares the snapshot
// polled this frame against the one polled last frame.
//
//=========================================================================

//=== Module Declarations =================================================

pub mod event;
mod sampler;
mod snapshot;
mod state_tracker;

//=== Public API ==========================================================

pub use event::{GamepadButton, InputEvent, KeyCode, MouseButton};
pub use sampler::InputSampler;
pub use snapshot::{InputSnapshot, InputSource};
pub use state_tracker::StateTracker;
