//=========================================================================
// Sprite
//=========================================================================
//
// Visual attached to an entity: a texture, a list of animation frames,
// and the draw parameters (pivot, scale, rotation, tint, flip).
//
// The pivot is stored in texels. Entities express it as a normalized
// origin and re-derive the texel pivot whenever either side changes.
//
//=========================================================================

//=== External Dependencies ===============================================

use glam::Vec2;
use log::warn;

//=== Internal Dependencies ===============================================

use crate::core::content::Texture;
use crate::core::math::Rect;
use crate::core::render::{Color, DrawCommand, Flip, RenderBackend};

//=== Frame ===============================================================

/// One animation frame: a source region and how long it stays on screen.
#[derive(Debug, Clone, Copy, PartialEq)]
pub struct Frame {
    pub source: Rect,
    /// Seconds of scaled time.
    pub duration: f64,
}

//=== Sprite ==============================================================

#[derive(Debug, Clone, PartialEq)]
pub struct Sprite {
    texture: Texture,
    frames: Vec<Frame>,
    current: usize,
    elapsed: f64,
    looping: bool,
    origin: Vec2,

    pub scale: Vec2,
    /// Radians, clockwise on screen.
    pub rotation: f32,
    pub tint: Color,
    pub flip: Flip,
}

impl Sprite {
    /// Static sprite covering the whole texture.
    pub fn new(texture: Texture) -> Self {
        let whole = Frame {
            source: Rect::new(0, 0, texture.width as i32, texture.height as i32),
            duration: 0.0,
        };
        Self::from_frames(texture, vec![whole], false)
    }

    /// Animated sprite cycling through `frames`.
    ///
    /// An empty frame list falls back to a static sprite.
    pub fn animated(texture: Texture, frames: Vec<Frame>, looping: bool) -> Self {
        if frames.is_empty() {
            warn!(target: "entities", "Animated sprite for {:?} has no frames, using whole texture", texture.id);
            return Self::new(texture);
        }
        Self::from_frames(texture, frames, looping)
    }

    /// Animation laid out as equal cells in a horizontal strip.
    pub fn from_strip(
        texture: Texture,
        frame_width: u32,
        frame_count: u32,
        frame_duration: f64,
        looping: bool,
    ) -> Self {
        let frames = (0..frame_count)
            .map(|i| Frame {
                source: Rect::new((i * frame_width) as i32, 0, frame_width as i32, texture.height as i32),
                duration: frame_duration,
            })
            .collect();
        Self::animated(texture, frames, looping)
    }

    fn from_frames(texture: Texture, frames: Vec<Frame>, looping: bool) -> Self {
        Self {
            texture,
            frames,
            current: 0,
            elapsed: 0.0,
            looping,
            origin: Vec2::ZERO,
            scale: Vec2::ONE,
            rotation: 0.0,
            tint: Color::WHITE,
            flip: Flip::None,
        }
    }

    //--- Animation --------------------------------------------------------

    /// Advances the animation by `dt` seconds.
    ///
    /// Frames with a non-positive duration hold forever. A non-looping
    /// animation stops on its last frame. A non-finite `dt` is ignored.
    pub fn update(&mut self, dt: f64) {
        if self.frames.len() < 2 || !dt.is_finite() {
            return;
        }

        self.elapsed += dt;
        loop {
            let duration = self.frames[self.current].duration;
            if duration <= 0.0 || self.elapsed < duration {
                break;
            }

            if self.current + 1 < self.frames.len() {
                self.current += 1;
            } else if self.looping {
                self.current = 0;
            } else {
                self.elapsed = 0.0;
                break;
            }
            self.elapsed -= duration;
        }
    }

    pub fn current_frame(&self) -> usize {
        self.current
    }

    /// Returns `true` once a non-looping animation reached its last frame.
    pub fn is_finished(&self) -> bool {
        !self.looping && self.current + 1 == self.frames.len()
    }

    /// Rewinds to the first frame.
    pub fn restart(&mut self) {
        self.current = 0;
        self.elapsed = 0.0;
    }

    //--- Geometry ---------------------------------------------------------

    /// Unscaled width of the current frame, in texels.
    pub fn width(&self) -> f32 {
        self.frames[self.current].source.width as f32
    }

    /// Unscaled height of the current frame, in texels.
    pub fn height(&self) -> f32 {
        self.frames[self.current].source.height as f32
    }

    /// Pivot in texels.
    pub fn origin(&self) -> Vec2 {
        self.origin
    }

    pub(crate) fn set_origin(&mut self, origin: Vec2) {
        self.origin = origin;
    }

    pub fn texture(&self) -> Texture {
        self.texture
    }

    //--- Rendering --------------------------------------------------------

    /// Emits one draw command for the current frame anchored at `position`.
    pub fn draw(&self, batch: &mut dyn RenderBackend, position: Vec2) {
        batch.draw(&DrawCommand {
            texture: self.texture.id,
            source: self.frames[self.current].source,
            position,
            origin: self.origin,
            rotation: self.rotation,
            scale: self.scale,
            tint: self.tint,
            flip: self.flip,
            layer_depth: 0.0,
        });
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
