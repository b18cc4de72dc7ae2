//=========================================================================
// Entity Manager
//=========================================================================
//
// Canonical collection of entities with deferred admission and removal.
//
// Nothing changes the live set while it is being iterated. Instantiation
// and removal marks made during update_all() are buffered and applied in
// one place, reconcile(), at the frame boundary:
//
//   1. queued marks are applied (live and pending)
//   2. marked live entities are dropped
//   3. pending entities are appended in admission order
//      (those already marked are dropped without ever being live)
//
//=========================================================================

//=== External Dependencies ===============================================

use log::{debug, warn};
use thiserror::Error;

//=== Internal Dependencies ===============================================

use super::{Behavior, Entity, EntityId};
use crate::core::content::{ContentError, ContentLoader};
use crate::core::globals::GlobalContext;
use crate::core::render::RenderBackend;

//=== EntityError =========================================================

#[derive(Debug, Error, PartialEq, Eq)]
pub enum EntityError {
    #[error("entity {0} does not exist")]
    NotFound(EntityId),
}

//=== Slot ================================================================

struct Slot {
    entity: Entity,
    behavior: Box<dyn Behavior>,
}

//=== HostRequests ========================================================

/// Engine-level changes requested during a frame, applied by the frame
/// runner after reconciliation. The last request of each kind wins.
#[derive(Debug, Clone, Copy, Default, PartialEq)]
pub(crate) struct HostRequests {
    pub time_scale: Option<f64>,
    pub resolution: Option<(i32, i32)>,
}

//=== Spawner =============================================================

/// Deferred-mutation handle handed to behaviors during updates.
///
/// Owns the content loader so entities spawned mid-frame initialize the
/// same way as those spawned by the host.
pub struct Spawner {
    pending: Vec<(EntityId, Slot)>,
    removals: Vec<EntityId>,
    next_id: u64,
    content: Box<dyn ContentLoader>,
    requests: HostRequests,
}

impl Spawner {
    fn new(content: Box<dyn ContentLoader>) -> Self {
        Self {
            pending: Vec::new(),
            removals: Vec::new(),
            next_id: 0,
            content,
            requests: HostRequests::default(),
        }
    }

    /// Initializes `entity` and queues it for admission at the next
    /// reconciliation.
    ///
    /// Content is loaded immediately. On failure the entity is discarded
    /// and the error returned.
    pub fn instantiate(
        &mut self,
        mut entity: Entity,
        mut behavior: impl Behavior,
    ) -> Result<EntityId, ContentError> {
        behavior.load_content(&mut entity, self.content.as_mut())?;
        entity.finish_loading();

        let id = EntityId(self.next_id);
        self.next_id += 1;

        debug!(target: "entities", "Instantiated entity {} (pending admission)", id);
        self.pending.push((
            id,
            Slot {
                entity,
                behavior: Box::new(behavior),
            },
        ));
        Ok(id)
    }

    /// Queues a removal mark, applied at the next reconciliation.
    ///
    /// To mark the entity currently being updated, call
    /// [`Entity::mark_for_removal`] on it directly.
    pub fn mark_for_removal(&mut self, id: EntityId) {
        self.removals.push(id);
    }

    /// Content loader shared by every instantiation.
    pub fn content(&mut self) -> &mut dyn ContentLoader {
        self.content.as_mut()
    }

    /// Requests a new clock time scale, applied at the end of this frame.
    ///
    /// 0 pauses scaled time; unscaled time keeps running.
    pub fn request_time_scale(&mut self, scale: f64) {
        self.requests.time_scale = Some(scale);
    }

    /// Requests a windowed back-buffer size, applied at the end of this
    /// frame. Ignored while fullscreen.
    pub fn request_resolution(&mut self, width: i32, height: i32) {
        self.requests.resolution = Some((width, height));
    }

    fn pending_mut(&mut self, id: EntityId) -> Option<&mut Entity> {
        self.pending
            .iter_mut()
            .find(|(pending_id, _)| *pending_id == id)
            .map(|(_, slot)| &mut slot.entity)
    }
}

//=== EntityManager =======================================================

pub struct EntityManager {
    live: Vec<(EntityId, Slot)>,
    spawner: Spawner,
}

impl EntityManager {
    //--- Construction -----------------------------------------------------

    /// Creates an empty manager resolving assets through `content`.
    pub fn new(content: impl ContentLoader + 'static) -> Self {
        Self {
            live: Vec::new(),
            spawner: Spawner::new(Box::new(content)),
        }
    }

    //--- Lifecycle --------------------------------------------------------

    /// Initializes `entity` with `behavior` and queues it for admission.
    ///
    /// The returned id resolves through [`get`](Self::get) right away, but
    /// the entity is neither updated nor drawn until the next
    /// [`reconcile`](Self::reconcile).
    pub fn instantiate(
        &mut self,
        entity: Entity,
        behavior: impl Behavior,
    ) -> Result<EntityId, ContentError> {
        self.spawner.instantiate(entity, behavior)
    }

    /// Updates every live, enabled entity in admission order.
    pub fn update_all(&mut self, context: &GlobalContext) {
        let spawner = &mut self.spawner;
        for (_, slot) in self.live.iter_mut() {
            if slot.entity.enabled {
                slot.behavior.update(&mut slot.entity, context, spawner);
            }
        }
    }

    /// Applies buffered removals and admissions.
    pub fn reconcile(&mut self) {
        //--- Step 1: Apply queued marks ------------------------------------
        for id in std::mem::take(&mut self.spawner.removals) {
            match self.entity_mut(id) {
                Some(entity) => entity.mark_for_removal(),
                None => warn!(target: "entities", "Ignoring removal of unknown entity {}", id),
            }
        }

        //--- Step 2: Drop marked live entities -----------------------------
        let before = self.live.len();
        self.live.retain(|(_, slot)| !slot.entity.is_marked_for_removal());
        let removed = before - self.live.len();

        //--- Step 3: Admit pending entities --------------------------------
        let mut admitted = 0;
        let mut discarded = 0;
        for (id, slot) in self.spawner.pending.drain(..) {
            if slot.entity.is_marked_for_removal() {
                discarded += 1;
                continue;
            }
            self.live.push((id, slot));
            admitted += 1;
        }

        if removed + admitted + discarded > 0 {
            debug!(
                target: "entities",
                "Reconciled: {} removed, {} admitted, {} discarded before admission ({} live)",
                removed,
                admitted,
                discarded,
                self.live.len()
            );
        }
    }

    /// Draws every live, visible entity, lowest layer first.
    ///
    /// Entities sharing a layer draw in admission order.
    pub fn draw_all(&self, batch: &mut dyn RenderBackend) {
        let mut visible: Vec<&Slot> = self
            .live
            .iter()
            .map(|(_, slot)| slot)
            .filter(|slot| slot.entity.visible)
            .collect();

        // sort_by_key is stable
        visible.sort_by_key(|slot| slot.entity.layer);

        for slot in visible {
            slot.behavior.draw(&slot.entity, batch);
        }
    }

    /// Marks an entity, live or pending, for removal.
    ///
    /// Marking twice is harmless.
    pub fn mark_for_removal(&mut self, id: EntityId) -> Result<(), EntityError> {
        match self.entity_mut(id) {
            Some(entity) => {
                entity.mark_for_removal();
                Ok(())
            }
            None => {
                warn!(target: "entities", "Cannot mark unknown entity {} for removal", id);
                Err(EntityError::NotFound(id))
            }
        }
    }

    //--- Queries ----------------------------------------------------------

    /// Looks up a live or pending entity.
    pub fn get(&self, id: EntityId) -> Option<&Entity> {
        self.live
            .iter()
            .chain(self.spawner.pending.iter())
            .find(|(entity_id, _)| *entity_id == id)
            .map(|(_, slot)| &slot.entity)
    }

    /// Mutable form of [`get`](Self::get).
    pub fn get_mut(&mut self, id: EntityId) -> Option<&mut Entity> {
        self.entity_mut(id)
    }

    /// Returns `true` if the entity has been admitted and not yet removed.
    pub fn is_live(&self, id: EntityId) -> bool {
        self.live.iter().any(|(entity_id, _)| *entity_id == id)
    }

    /// Live entity ids in admission order.
    pub fn live_ids(&self) -> impl Iterator<Item = EntityId> + '_ {
        self.live.iter().map(|(id, _)| *id)
    }

    /// Number of live entities.
    pub fn len(&self) -> usize {
        self.live.len()
    }

    pub fn is_empty(&self) -> bool {
        self.live.is_empty()
    }

    /// Number of entities waiting for admission.
    pub fn pending_len(&self) -> usize {
        self.spawner.pending.len()
    }

    /// Content loader used for instantiation.
    pub fn content(&mut self) -> &mut dyn ContentLoader {
        self.spawner.content()
    }

    //--- Host Requests ----------------------------------------------------

    /// See [`Spawner::request_time_scale`].
    pub fn request_time_scale(&mut self, scale: f64) {
        self.spawner.request_time_scale(scale);
    }

    /// See [`Spawner::request_resolution`].
    pub fn request_resolution(&mut self, width: i32, height: i32) {
        self.spawner.request_resolution(width, height);
    }

    /// Hands over and clears the requests gathered this frame.
    pub(crate) fn take_requests(&mut self) -> HostRequests {
        std::mem::take(&mut self.spawner.requests)
    }

    //--- Internal Helpers -------------------------------------------------
    fn entity_mut(&mut self, id: EntityId) -> Option<&mut Entity> {
        if let Some((_, slot)) = self.live.iter_mut().find(|(entity_id, _)| *entity_id == id) {
            return Some(&mut slot.entity);
        }
        self.spawner.pending_mut(id)
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use std::cell::RefCell;
    use std::rc::Rc;

    use glam::Vec2;

    use crate::core::content::ContentLibrary;
    use crate::core::entity::{Passive, Sprite};
    use crate::core::render::testing::RecordingRenderer;
    use crate::core::viewport::ViewportTransform;

    //--- Test Helpers -----------------------------------------------------

    type Log = Rc<RefCell<Vec<&'static str>>>;

    /// Records every update under a name.
    struct Probe {
        name: &'static str,
        log: Log,
    }

    impl Behavior for Probe {
        fn update(&mut self, _entity: &mut Entity, _context: &GlobalContext, _spawner: &mut Spawner) {
            self.log.borrow_mut().push(self.name);
        }
    }

    /// Spawns one child on its first update.
    struct Parent {
        spawned: Rc<RefCell<Option<EntityId>>>,
    }

    impl Behavior for Parent {
        fn update(&mut self, _entity: &mut Entity, _context: &GlobalContext, spawner: &mut Spawner) {
            let mut spawned = self.spawned.borrow_mut();
            if spawned.is_none() {
                *spawned = spawner.instantiate(Entity::new(), Passive).ok();
            }
        }
    }

    /// Marks itself for removal on its first update.
    struct SelfDestruct;

    impl Behavior for SelfDestruct {
        fn update(&mut self, entity: &mut Entity, _context: &GlobalContext, _spawner: &mut Spawner) {
            entity.mark_for_removal();
        }
    }

    /// Requires a texture that the test library does not have.
    struct NeedsAsset;

    impl Behavior for NeedsAsset {
        fn load_content(
            &mut self,
            entity: &mut Entity,
            content: &mut dyn ContentLoader,
        ) -> Result<(), ContentError> {
            let texture = content.load_texture("missing.png")?;
            entity.set_visual(Sprite::new(texture));
            Ok(())
        }
    }

    /// Loads the built-in pixel as its visual.
    struct Pixel;

    impl Behavior for Pixel {
        fn load_content(
            &mut self,
            entity: &mut Entity,
            content: &mut dyn ContentLoader,
        ) -> Result<(), ContentError> {
            let texture = content.load_texture(ContentLibrary::PIXEL)?;
            entity.set_visual(Sprite::new(texture));
            Ok(())
        }
    }

    fn manager() -> EntityManager {
        EntityManager::new(ContentLibrary::new())
    }

    fn context() -> GlobalContext {
        GlobalContext::new(ViewportTransform::new(1280, 720).unwrap())
    }

    fn drawable(x: f32, layer: i32) -> Entity {
        Entity::new().at(Vec2::new(x, 0.0)).on_layer(layer)
    }

    //--- Tests ------------------------------------------------------------

    #[test]
    fn instantiated_entity_waits_for_reconcile() {
        let mut entities = manager();
        let ctx = context();
        let log: Log = Rc::default();

        let id = entities
            .instantiate(Entity::new(), Probe { name: "a", log: log.clone() })
            .unwrap();

        assert!(entities.get(id).is_some());
        assert!(!entities.is_live(id));
        assert_eq!(entities.pending_len(), 1);

        entities.update_all(&ctx);
        assert!(log.borrow().is_empty());

        entities.reconcile();
        entities.update_all(&ctx);
        assert_eq!(*log.borrow(), vec!["a"]);
        assert!(entities.is_live(id));
        assert_eq!(entities.pending_len(), 0);
    }

    #[test]
    fn entity_spawned_during_update_is_not_updated_that_frame() {
        let mut entities = manager();
        let ctx = context();
        let spawned = Rc::new(RefCell::new(None));

        entities.instantiate(Entity::new(), Parent { spawned: spawned.clone() }).unwrap();
        entities.reconcile();

        entities.update_all(&ctx);
        let child = spawned.borrow().expect("child spawned");
        assert_eq!(entities.len(), 1);
        assert!(!entities.is_live(child));

        entities.reconcile();
        assert_eq!(entities.len(), 2);
        assert!(entities.is_live(child));
    }

    #[test]
    fn marked_entity_stays_until_reconcile() {
        let mut entities = manager();
        let ctx = context();
        let id = entities.instantiate(Entity::new(), SelfDestruct).unwrap();
        entities.reconcile();

        entities.update_all(&ctx);
        assert!(entities.is_live(id));
        assert!(entities.get(id).unwrap().is_marked_for_removal());

        entities.reconcile();
        assert!(!entities.is_live(id));
        assert!(entities.get(id).is_none());
    }

    #[test]
    fn last_request_wins_and_is_taken_once() {
        let mut entities = manager();
        entities.request_time_scale(0.0);
        entities.request_time_scale(0.5);
        entities.request_resolution(800, 600);

        let requests = entities.take_requests();
        assert_eq!(requests.time_scale, Some(0.5));
        assert_eq!(requests.resolution, Some((800, 600)));
        assert_eq!(entities.take_requests(), HostRequests::default());
    }

    #[test]
    fn removals_happen_before_admissions() {
        let mut entities = manager();
        let old = entities.instantiate(Entity::new(), Passive).unwrap();
        entities.reconcile();

        entities.mark_for_removal(old).unwrap();
        let new = entities.instantiate(Entity::new(), Passive).unwrap();
        entities.reconcile();

        assert_eq!(entities.live_ids().collect::<Vec<_>>(), vec![new]);
    }

    #[test]
    fn pending_entity_marked_before_admission_is_never_live() {
        let mut entities = manager();
        let id = entities.instantiate(Entity::new(), Passive).unwrap();

        entities.mark_for_removal(id).unwrap();
        entities.reconcile();

        assert!(!entities.is_live(id));
        assert!(entities.is_empty());
        assert_eq!(entities.pending_len(), 0);
    }

    #[test]
    fn double_mark_is_idempotent() {
        let mut entities = manager();
        let id = entities.instantiate(Entity::new(), Passive).unwrap();
        entities.reconcile();

        assert!(entities.mark_for_removal(id).is_ok());
        assert!(entities.mark_for_removal(id).is_ok());
        entities.reconcile();

        assert!(entities.is_empty());
    }

    #[test]
    fn marking_unknown_entity_is_reported() {
        let mut entities = manager();
        let id = entities.instantiate(Entity::new(), Passive).unwrap();
        entities.mark_for_removal(id).unwrap();
        entities.reconcile();

        assert_eq!(entities.mark_for_removal(id), Err(EntityError::NotFound(id)));
    }

    #[test]
    fn queued_removal_from_spawner_applies_at_reconcile() {
        let mut entities = manager();
        let id = entities.instantiate(Entity::new(), Passive).unwrap();
        entities.reconcile();

        entities.spawner.mark_for_removal(id);
        assert!(entities.is_live(id));

        entities.reconcile();
        assert!(!entities.is_live(id));
    }

    #[test]
    fn disabled_entities_are_not_updated() {
        let mut entities = manager();
        let ctx = context();
        let log: Log = Rc::default();

        let mut sleeper = Entity::new();
        sleeper.disable();
        entities.instantiate(sleeper, Probe { name: "sleeper", log: log.clone() }).unwrap();
        entities.instantiate(Entity::new(), Probe { name: "awake", log: log.clone() }).unwrap();
        entities.reconcile();

        entities.update_all(&ctx);
        assert_eq!(*log.borrow(), vec!["awake"]);
    }

    #[test]
    fn draw_order_is_layer_then_admission() {
        let mut entities = manager();
        for (x, layer) in [(0.0, 2), (1.0, 0), (2.0, 1), (3.0, 0)] {
            entities.instantiate(drawable(x, layer), Pixel).unwrap();
        }
        entities.reconcile();

        let mut renderer = RecordingRenderer::default();
        entities.draw_all(&mut renderer);

        let xs: Vec<f32> = renderer.draws().iter().map(|cmd| cmd.position.x).collect();
        assert_eq!(xs, vec![1.0, 3.0, 2.0, 0.0]);
    }

    #[test]
    fn draw_order_is_stable_across_frames() {
        let mut entities = manager();
        for x in 0..5 {
            entities.instantiate(drawable(x as f32, 0), Pixel).unwrap();
        }
        entities.reconcile();

        let mut first = RecordingRenderer::default();
        let mut second = RecordingRenderer::default();
        entities.draw_all(&mut first);
        entities.draw_all(&mut second);

        assert_eq!(first.draws(), second.draws());
    }

    #[test]
    fn entity_without_visual_is_invisible_after_load() {
        let mut entities = manager();
        let id = entities.instantiate(Entity::new(), Passive).unwrap();
        entities.reconcile();

        let entity = entities.get(id).unwrap();
        assert!(!entity.visible);
        assert_eq!((entity.width(), entity.height()), (0, 0));

        let mut renderer = RecordingRenderer::default();
        entities.draw_all(&mut renderer);
        assert!(renderer.draws().is_empty());
    }

    #[test]
    fn missing_asset_fails_instantiation() {
        let mut entities = manager();

        let result = entities.instantiate(Entity::new(), NeedsAsset);

        assert_eq!(
            result,
            Err(ContentError::MissingAsset { path: "missing.png".into() })
        );
        assert_eq!(entities.pending_len(), 0);
    }

    #[test]
    fn hidden_entities_are_updated_but_not_drawn() {
        let mut entities = manager();
        let ctx = context();
        let log: Log = Rc::default();

        let id = entities
            .instantiate(drawable(0.0, 0), Probe { name: "hidden", log: log.clone() })
            .unwrap();
        entities.reconcile();
        entities.get_mut(id).unwrap().hide();

        let mut renderer = RecordingRenderer::default();
        entities.update_all(&ctx);
        entities.draw_all(&mut renderer);

        assert_eq!(*log.borrow(), vec!["hidden"]);
        assert!(renderer.draws().is_empty());
    }
}
