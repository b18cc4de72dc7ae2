//=========================================================================
// Platform Bridge
//=========================================================================
//
// Bridges the platform layer (winit) with core systems.
//
// This module defines the contract between platform implementations and
// core logic, so the windowing backend can be swapped without changing
// core code.
//
// Components:
// - `interface`: Event types and error definitions (the contract)
// - `event_collector`: Core-side event collection and buffering
//
//=========================================================================

//=== Module Declarations =================================================

pub(crate) mod event_collector;
pub(crate) mod interface;

//=== Internal API ========================================================

pub use event_collector::TickControl;
pub use interface::PlatformError;
pub(crate) use event_collector::EventCollector;
pub(crate) use interface::PlatformEvent;
