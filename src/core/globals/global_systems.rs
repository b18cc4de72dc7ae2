//=========================================================================
// Global Systems
//=========================================================================
//
// Container for engine-level systems with logic.
//
// Contains systems that track input and manage entities. Systems operate
// on GlobalContext data.
//
//=========================================================================

//=== Internal Dependencies ===============================================

use super::GlobalContext;
use crate::core::content::ContentLoader;
use crate::core::entity::EntityManager;
use crate::core::input::{InputEvent, StateTracker};

//=== GlobalSystems =======================================================

/// Container for engine-level logic systems.
///
/// # Available Systems
///
/// - `input`: Event-driven tracker of held keys and buttons
/// - `entities`: Entity manager with deferred admission and removal
pub struct GlobalSystems {
    /// Tracker fed with platform input events every frame.
    ///
    /// Acts as the [`InputSource`](crate::core::input::InputSource) the
    /// context's sampler polls.
    pub input: StateTracker,

    /// Canonical entity collection.
    pub entities: EntityManager,
}

impl GlobalSystems {
    /// Creates a systems container with an empty entity set.
    ///
    /// This is typically called internally by the engine. Users should access
    /// systems via [`crate::Engine::init`] instead.
    pub(crate) fn new(content: impl ContentLoader + 'static) -> Self {
        Self {
            input: StateTracker::new(),
            entities: EntityManager::new(content),
        }
    }

    //--- Update Loop ------------------------------------------------------

    /// Feeds this frame's input batches to the tracker and polls the sampler.
    pub(crate) fn sample_input(&mut self, context: &mut GlobalContext, batches: &[Vec<InputEvent>]) {
        for batch in batches {
            self.input.process_events(batch);
        }
        context.input.poll(&self.input);
    }

    /// Updates entities, then applies deferred admissions and removals.
    ///
    /// # Processing Pipeline
    ///
    /// 1. **Entity Update**: Runs every live, enabled behavior
    /// 2. **Reconciliation**: Drops marked entities, admits pending ones
    pub(crate) fn update(&mut self, context: &GlobalContext) {
        self.entities.update_all(context);
        self.entities.reconcile();
    }
}
