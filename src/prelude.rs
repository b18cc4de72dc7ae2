//=========================================================================
// Prelude
//=========================================================================
//
// Convenience module that re-exports commonly used types and traits.
//
// Usage:
//   use letterbox_engine::prelude::*;
//
//=========================================================================

//=== Public API ==========================================================

// Engine facade
pub use crate::engine::{Engine, EngineBuilder, EngineError};

// Global systems and context
pub use crate::core::globals::{GlobalContext, GlobalSystems};

// Entities
pub use crate::core::entity::{Behavior, Entity, EntityError, EntityId, Frame, Passive, Spawner, Sprite};

// Input system
pub use crate::core::input::{GamepadButton, InputSampler, KeyCode, MouseButton};

// Content and rendering
pub use crate::core::content::{ContentError, ContentLibrary, ContentLoader, Texture};
pub use crate::core::render::{Color, DrawCommand, Flip, RenderBackend};

// Geometry and viewport
pub use crate::core::math::{origins, Rect};
pub use crate::core::viewport::{Viewport, ViewportTransform};

// Vector math
pub use glam::{Mat4, Vec2};
