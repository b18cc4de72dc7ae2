//=========================================================================
// Global Context
//=========================================================================
//
// Shared data container for entities.
//
// Contains state data that behaviors read during updates:
// - clock: scaled frame timing
// - input: per-frame input snapshots with edges
// - viewport: virtual canvas and its letterboxed placement
//
//=========================================================================

//=== Internal Dependencies ===============================================

use crate::core::clock::Clock;
use crate::core::input::InputSampler;
use crate::core::viewport::ViewportTransform;

//=== GlobalContext =======================================================

/// Shared context data accessible to behaviors during updates.
///
/// Behaviors receive `&GlobalContext` in [`Behavior::update`](crate::core::entity::Behavior::update).
/// This separates entity-readable data from the systems that produce it.
///
/// # Available Data
///
/// - `clock`: Delta time, time scale, frame count
/// - `input`: Keyboard, mouse and gamepad state polled this frame
/// - `viewport`: Virtual resolution, scale and coordinate mapping
pub struct GlobalContext {
    /// Frame timing. Ticked once per frame before input is polled.
    pub clock: Clock,

    /// Input polled once per frame.
    ///
    /// For pointer queries in virtual space, pass `viewport` along, e.g.
    /// `context.input.pointer_virtual(&context.viewport)`.
    pub input: InputSampler,

    /// Virtual canvas and back-buffer mapping.
    pub viewport: ViewportTransform,
}

impl GlobalContext {
    /// Creates a context with a fresh clock and empty input.
    pub(crate) fn new(viewport: ViewportTransform) -> Self {
        Self {
            clock: Clock::new(),
            input: InputSampler::new(),
            viewport,
        }
    }
}
