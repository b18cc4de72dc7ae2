//=========================================================================
// Letterbox Engine - Library Root
//
// This crate defines the public API surface of the Letterbox Engine.
//
// Responsibilities:
// - Expose the engine facade (`Engine`, `EngineBuilder`)
// - Keep internal modules (like `platform`) hidden from end users
// - Provide clean separation between the high-level engine facade
//   and lower-level subsystems (input, viewport, entities, OS integration)
//
// Typical usage:
// ```no_run
// use letterbox_engine::prelude::*;
//
// fn main() -> Result<(), EngineError> {
//     EngineBuilder::new()
//         .with_virtual_resolution(320, 180)
//         .build()?
//         .init(|systems, _context| {
//             systems.entities.instantiate(Entity::new(), Passive)?;
//             Ok(())
//         })?
//         .run(MyRenderer::new())
// }
// ```
//
//=========================================================================

//--- Public Modules ------------------------------------------------------
//
// `core` contains all platform-independent engine systems (clock, input,
// viewport, entities, rendering contract). It is exposed publicly for
// engine-level extensibility, but normal application code will mostly
// use the prelude.
//
pub mod core;
pub mod prelude;

//--- Internal Modules ----------------------------------------------------
//
// `platform` contains OS-specific logic (window, Winit and gilrs
// integration, event loop) and is kept private, as it is not part of the
// public API surface.
//
// `engine` defines the main engine entry point and initialization logic.
//
mod engine;
mod platform;

//--- Public Exports ------------------------------------------------------
//
// Re-exports the engine facade so applications can simply
// `use letterbox_engine::EngineBuilder;`.
//
pub use engine::{Engine, EngineBuilder, EngineError};
