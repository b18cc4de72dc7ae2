//=========================================================================
// Rendering Boundary
//=========================================================================
//
// Contract between the core and the sprite-batch renderer.
//
// The core never touches the GPU. Each frame it:
//   set_viewport(letterboxed rect) → clear(color)
//     → begin_batch(scale matrix) → draw(cmd)* → end_batch()
//
// Per-call state is expected to apply immediately; the core assumes no
// deferred command buffer semantics.
//
//=========================================================================

//=== External Dependencies ===============================================

use glam::{Mat4, Vec2};

//=== Internal Dependencies ===============================================

use crate::core::content::TextureId;
use crate::core::math::Rect;
use crate::core::viewport::Viewport;

//=== Color ===============================================================

/// 8-bit RGBA colour.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Color {
    pub r: u8,
    pub g: u8,
    pub b: u8,
    pub a: u8,
}

impl Color {
    pub const WHITE: Color = Color::rgb(255, 255, 255);
    pub const BLACK: Color = Color::rgb(0, 0, 0);
    pub const TRANSPARENT: Color = Color::rgba(0, 0, 0, 0);
    pub const CORNFLOWER_BLUE: Color = Color::rgb(100, 149, 237);

    pub const fn rgb(r: u8, g: u8, b: u8) -> Self {
        Self { r, g, b, a: 255 }
    }

    pub const fn rgba(r: u8, g: u8, b: u8, a: u8) -> Self {
        Self { r, g, b, a }
    }
}

impl Default for Color {
    fn default() -> Self {
        Self::WHITE
    }
}

//=== Flip ================================================================

/// Mirroring applied to a sprite when drawn.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, Default)]
pub enum Flip {
    #[default]
    None,
    Horizontal,
    Vertical,
    Both,
}

impl Flip {
    pub fn horizontal(self) -> bool {
        matches!(self, Flip::Horizontal | Flip::Both)
    }

    pub fn vertical(self) -> bool {
        matches!(self, Flip::Vertical | Flip::Both)
    }
}

//=== DrawCommand =========================================================

/// One textured quad, expressed in virtual-space coordinates.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct DrawCommand {
    pub texture: TextureId,
    /// Region of the texture to sample, in texels.
    pub source: Rect,
    pub position: Vec2,
    /// Pivot in texels, relative to the source region.
    pub origin: Vec2,
    pub rotation: f32,
    pub scale: Vec2,
    pub tint: Color,
    pub flip: Flip,
    /// Backend depth hint. Draw order is already resolved by the core.
    pub layer_depth: f32,
}

//=== RenderBackend =======================================================

/// Sprite-batch renderer driven by the frame runner.
pub trait RenderBackend {
    /// Sets the device-space rectangle the batch renders into.
    fn set_viewport(&mut self, viewport: Viewport);

    /// Clears the current render target.
    fn clear(&mut self, color: Color);

    /// Opens a batch; every subsequent draw is transformed by `transform`.
    fn begin_batch(&mut self, transform: Mat4);

    fn draw(&mut self, command: &DrawCommand);

    fn end_batch(&mut self);
}

//=========================================================================
// Test Support
//=========================================================================


//=========================================================================
// Unit Tests
//=========================================================================
