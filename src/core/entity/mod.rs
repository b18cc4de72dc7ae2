//=========================================================================
// Entity System
//=========================================================================
//
// Positioned, optionally drawable game objects with a deferred lifecycle.
//
// Architecture:
//   EntityManager
//     ├─ live: Vec<(EntityId, Slot)>        (admission order)
//     └─ Spawner
//          ├─ pending: Vec<(EntityId, Slot)> (instantiated this frame)
//          └─ removals: Vec<EntityId>        (marks queued by behaviors)
//
// Flow:
//   instantiate() → load_content() → pending
//   update_all() → Behavior::update() → reconcile() → draw_all()
//
//=========================================================================

//=== External Dependencies ===============================================

use std::fmt;

use glam::Vec2;

//=== Internal Dependencies ===============================================

use crate::core::content::{ContentError, ContentLoader};
use crate::core::globals::GlobalContext;
use crate::core::math::{origins, Rect};
use crate::core::render::{Color, Flip, RenderBackend};

//=== Module Declarations =================================================

mod manager;
mod sprite;

//=== Public API ==========================================================

pub use manager::{EntityError, EntityManager, Spawner};
pub use sprite::{Frame, Sprite};

//=== EntityId ============================================================

/// Stable handle returned by [`EntityManager::instantiate`].
///
/// Valid from the moment of instantiation, before the entity is admitted,
/// until the reconciliation that removes it.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash, PartialOrd, Ord)]
pub struct EntityId(pub(crate) u64);

impl fmt::Display for EntityId {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        write!(f, "#{}", self.0)
    }
}

//=== Entity ==============================================================

/// A positioned object in virtual space.
///
/// Scale, rotation, tint and flip live on the attached [`Sprite`]. Without
/// one they read as identity values and writes are ignored.
#[derive(Debug, Clone)]
pub struct Entity {
    /// Anchor point in virtual space.
    pub position: Vec2,
    /// Gates [`Behavior::update`].
    pub enabled: bool,
    /// Gates [`Behavior::draw`].
    pub visible: bool,
    /// Draw order, ascending. Ties keep admission order.
    pub layer: i32,

    origin: Vec2,
    visual: Option<Sprite>,
    removal_requested: bool,
}

impl Entity {
    /// Creates an enabled, visible entity at the virtual origin without a visual.
    pub fn new() -> Self {
        Self {
            position: Vec2::ZERO,
            enabled: true,
            visible: true,
            layer: 0,
            origin: Vec2::ZERO,
            visual: None,
            removal_requested: false,
        }
    }

    /// Builder form of [`set_visual`](Self::set_visual).
    pub fn with_visual(mut self, sprite: Sprite) -> Self {
        self.set_visual(sprite);
        self
    }

    pub fn at(mut self, position: Vec2) -> Self {
        self.position = position;
        self
    }

    pub fn on_layer(mut self, layer: i32) -> Self {
        self.layer = layer;
        self
    }

    //--- Position ---------------------------------------------------------

    pub fn x(&self) -> f32 {
        self.position.x
    }

    pub fn y(&self) -> f32 {
        self.position.y
    }

    pub fn set_x(&mut self, x: f32) {
        self.position.x = x;
    }

    pub fn set_y(&mut self, y: f32) {
        self.position.y = y;
    }

    /// Moves the entity by `delta`.
    pub fn translate(&mut self, delta: Vec2) {
        self.position += delta;
    }

    //--- Origin -----------------------------------------------------------

    /// Normalized pivot: (0,0) top-left, (0.5,0.5) center, (1,1) bottom-right.
    pub fn origin(&self) -> Vec2 {
        self.origin
    }

    /// Sets the normalized pivot and re-derives the visual's texel pivot.
    pub fn set_origin(&mut self, origin: Vec2) {
        self.origin = origin;
        if let Some(visual) = self.visual.as_mut() {
            let pivot = Vec2::new(visual.width(), visual.height()) * origin;
            visual.set_origin(pivot);
        }
    }

    //--- Visual -----------------------------------------------------------

    pub fn visual(&self) -> Option<&Sprite> {
        self.visual.as_ref()
    }

    pub fn visual_mut(&mut self) -> Option<&mut Sprite> {
        self.visual.as_mut()
    }

    /// Attaches a visual and centers the origin on it.
    pub fn set_visual(&mut self, sprite: Sprite) {
        self.visual = Some(sprite);
        self.set_origin(origins::CENTER);
    }

    /// Detaches the visual. The entity can no longer be drawn and is hidden.
    pub fn clear_visual(&mut self) -> Option<Sprite> {
        self.visible = false;
        self.visual.take()
    }

    /// Advances the visual's animation, if any.
    ///
    /// Frames may differ in size, so the texel pivot is re-derived from the
    /// normalized origin whenever the frame changes.
    pub fn advance_animation(&mut self, dt: f64) {
        let Some(visual) = self.visual.as_mut() else { return };

        let frame = visual.current_frame();
        visual.update(dt);
        if visual.current_frame() != frame {
            let pivot = Vec2::new(visual.width(), visual.height()) * self.origin;
            visual.set_origin(pivot);
        }
    }

    /// Draws the visual at the entity position, if any.
    pub fn draw_visual(&self, batch: &mut dyn RenderBackend) {
        if let Some(visual) = self.visual.as_ref() {
            visual.draw(batch, self.position);
        }
    }

    //--- Delegated Draw Parameters ----------------------------------------

    pub fn scale(&self) -> Vec2 {
        self.visual.as_ref().map_or(Vec2::ONE, |v| v.scale)
    }

    pub fn set_scale(&mut self, scale: Vec2) {
        if let Some(visual) = self.visual.as_mut() {
            visual.scale = scale;
        }
    }

    /// Rotation in radians.
    pub fn rotation(&self) -> f32 {
        self.visual.as_ref().map_or(0.0, |v| v.rotation)
    }

    pub fn set_rotation(&mut self, rotation: f32) {
        if let Some(visual) = self.visual.as_mut() {
            visual.rotation = rotation;
        }
    }

    pub fn tint(&self) -> Color {
        self.visual.as_ref().map_or(Color::WHITE, |v| v.tint)
    }

    pub fn set_tint(&mut self, tint: Color) {
        if let Some(visual) = self.visual.as_mut() {
            visual.tint = tint;
        }
    }

    pub fn flip(&self) -> Flip {
        self.visual.as_ref().map_or(Flip::None, |v| v.flip)
    }

    pub fn set_flip(&mut self, flip: Flip) {
        if let Some(visual) = self.visual.as_mut() {
            visual.flip = flip;
        }
    }

    //--- Derived Geometry -------------------------------------------------

    /// Scaled width truncated to whole pixels (0 without a visual).
    pub fn width(&self) -> i32 {
        self.visual.as_ref().map_or(0, |v| (v.width() * v.scale.x) as i32)
    }

    /// Scaled height truncated to whole pixels (0 without a visual).
    pub fn height(&self) -> i32 {
        self.visual.as_ref().map_or(0, |v| (v.height() * v.scale.y) as i32)
    }

    /// Axis-aligned bounds in virtual space, accounting for origin and scale.
    pub fn bounds(&self) -> Rect {
        let width = self.width();
        let height = self.height();
        Rect::new(
            (self.position.x - width as f32 * self.origin.x) as i32,
            (self.position.y - height as f32 * self.origin.y) as i32,
            width,
            height,
        )
    }

    //--- State Transitions ------------------------------------------------

    pub fn enable(&mut self) {
        self.enabled = true;
    }

    pub fn disable(&mut self) {
        self.enabled = false;
    }

    pub fn show(&mut self) {
        self.visible = true;
    }

    pub fn hide(&mut self) {
        self.visible = false;
    }

    pub fn hide_and_disable(&mut self) {
        self.disable();
        self.hide();
    }

    /// Requests removal at the next reconciliation. Cannot be undone.
    pub fn mark_for_removal(&mut self) {
        self.removal_requested = true;
    }

    pub fn is_marked_for_removal(&self) -> bool {
        self.removal_requested
    }

    /// Applied once content loading is done: nothing to draw, nothing visible.
    pub(crate) fn finish_loading(&mut self) {
        if self.visual.is_none() {
            self.visible = false;
        }
    }
}

impl Default for Entity {
    fn default() -> Self {
        Self::new()
    }
}

//=== Behavior Trait ======================================================

/// Per-entity logic invoked by the [`EntityManager`].
///
/// Every hook has a default that does the base work, so a behavior only
/// overrides what it needs. An overriding `update` that still wants its
/// sprite animated calls [`Entity::advance_animation`] itself.
///
/// ```rust
/// # use letterbox_engine::prelude::*;
/// struct Drift {
///     velocity: Vec2,
/// }
///
/// impl Behavior for Drift {
///     fn update(&mut self, entity: &mut Entity, context: &GlobalContext, _spawner: &mut Spawner) {
///         let dt = context.clock.delta_time() as f32;
///         entity.translate(self.velocity * dt);
///         entity.advance_animation(context.clock.delta_time());
///     }
/// }
/// ```
pub trait Behavior: 'static {
    /// One-time content acquisition, run during instantiation.
    ///
    /// Default implementation loads nothing.
    fn load_content(
        &mut self,
        _entity: &mut Entity,
        _content: &mut dyn ContentLoader,
    ) -> Result<(), ContentError> {
        Ok(())
    }

    /// Called once per frame while the entity is live and enabled.
    ///
    /// Default implementation advances the sprite animation by the scaled
    /// frame delta.
    fn update(&mut self, entity: &mut Entity, context: &GlobalContext, _spawner: &mut Spawner) {
        entity.advance_animation(context.clock.delta_time());
    }

    /// Called once per frame while the entity is live and visible.
    ///
    /// Default implementation draws the sprite at the entity position.
    fn draw(&self, entity: &Entity, batch: &mut dyn RenderBackend) {
        entity.draw_visual(batch);
    }
}

/// Behavior with no logic beyond the defaults.
#[derive(Debug, Clone, Copy, Default)]
pub struct Passive;

impl Behavior for Passive {}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crate::core::content::{Texture, TextureId};

    //--- Test Helpers -----------------------------------------------------

    fn sprite(width: u32, height: u32) -> Sprite {
        Sprite::new(Texture { id: TextureId(1), width, height })
    }

    //--- Tests ------------------------------------------------------------

    #[test]
    fn entity_without_visual_has_identity_parameters() {
        let mut entity = Entity::new();
        entity.set_scale(Vec2::splat(4.0));
        entity.set_tint(Color::BLACK);

        assert_eq!(entity.width(), 0);
        assert_eq!(entity.height(), 0);
        assert_eq!(entity.scale(), Vec2::ONE);
        assert_eq!(entity.rotation(), 0.0);
        assert_eq!(entity.tint(), Color::WHITE);
        assert_eq!(entity.flip(), Flip::None);
    }

    #[test]
    fn finish_loading_hides_entities_without_visual() {
        let mut bare = Entity::new();
        bare.finish_loading();
        assert!(!bare.visible);

        let mut drawn = Entity::new().with_visual(sprite(8, 8));
        drawn.finish_loading();
        assert!(drawn.visible);
    }

    #[test]
    fn set_visual_centers_origin() {
        let entity = Entity::new().with_visual(sprite(10, 20));

        assert_eq!(entity.origin(), origins::CENTER);
        assert_eq!(entity.visual().map(Sprite::origin), Some(Vec2::new(5.0, 10.0)));
    }

    #[test]
    fn changing_origin_rederives_pixel_pivot() {
        let mut entity = Entity::new().with_visual(sprite(10, 20));
        entity.set_origin(origins::BOTTOM_RIGHT);

        assert_eq!(entity.visual().map(Sprite::origin), Some(Vec2::new(10.0, 20.0)));
    }

    #[test]
    fn size_and_bounds_truncate() {
        let mut entity = Entity::new().with_visual(sprite(10, 10)).at(Vec2::new(100.0, 50.0));
        entity.set_scale(Vec2::new(1.55, 2.0));

        assert_eq!(entity.width(), 15);
        assert_eq!(entity.height(), 20);
        // x = trunc(100 - 15 * 0.5), y = trunc(50 - 20 * 0.5)
        assert_eq!(entity.bounds(), Rect::new(92, 40, 15, 20));
    }

    #[test]
    fn position_accessors_and_translate() {
        let mut entity = Entity::new();
        entity.set_x(3.0);
        entity.set_y(4.0);
        entity.translate(Vec2::new(1.0, -1.0));

        assert_eq!((entity.x(), entity.y()), (4.0, 3.0));
    }

    #[test]
    fn removal_latch_is_monotonic() {
        let mut entity = Entity::new();
        entity.mark_for_removal();
        entity.mark_for_removal();
        entity.enable();
        entity.show();

        assert!(entity.is_marked_for_removal());
    }

    #[test]
    fn hide_and_disable_clears_both_flags() {
        let mut entity = Entity::new();
        entity.hide_and_disable();
        assert!(!entity.enabled && !entity.visible);
    }

    #[test]
    fn pivot_follows_frame_size() {
        let texture = Texture { id: TextureId(2), width: 32, height: 16 };
        let frames = vec![
            Frame { source: Rect::new(0, 0, 8, 8), duration: 0.1 },
            Frame { source: Rect::new(8, 0, 16, 4), duration: 0.1 },
        ];
        let mut entity = Entity::new().with_visual(Sprite::animated(texture, frames, true));
        assert_eq!(entity.visual().unwrap().origin(), Vec2::new(4.0, 4.0));

        entity.advance_animation(0.1);

        assert_eq!(entity.visual().unwrap().current_frame(), 1);
        assert_eq!(entity.visual().unwrap().origin(), Vec2::new(8.0, 2.0));
    }

    #[test]
    fn clearing_visual_hides() {
        let mut entity = Entity::new().with_visual(sprite(4, 4));
        assert!(entity.clear_visual().is_some());
        assert!(!entity.visible);
        assert_eq!(entity.width(), 0);
    }
}
