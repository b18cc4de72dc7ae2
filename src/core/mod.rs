//=========================================================================
// Core Systems
//
// Platform-independent engine logic: timing, input, viewport, entities,
// and the frame runner that sequences them.
//
// Responsibilities:
// - Drain platform events delivered over the bridge channel
// - Advance the clock and sample input once per frame
// - React to host signals (quit, fullscreen, fast-forward)
// - Update and reconcile entities, then drive the render backend
//
// Notes:
// The frame runner does not own a thread or a timer. The platform layer
// calls `run_frame()` once per redraw with the elapsed wall-clock time,
// so pacing follows the display refresh.
//
//=========================================================================

//=== Module Declarations =================================================

pub mod clock;
pub mod content;
pub mod entity;
pub mod globals;
pub mod input;
pub mod math;
pub(crate) mod platform_bridge;
pub mod render;
pub mod viewport;

//=== Public API ==========================================================

pub use platform_bridge::{PlatformError, TickControl};

//=== Standard Library Imports ============================================

use std::time::Duration;

//=== External Crates =====================================================

use crossbeam_channel::Receiver;
use log::{debug, info, warn};

//=== Internal Modules ====================================================

use globals::{GlobalContext, GlobalSystems};
use input::{GamepadButton, KeyCode};
use platform_bridge::{EventCollector, PlatformEvent};
use render::{Color, RenderBackend};
use viewport::DisplayBackend;

//=== FrameSettings =======================================================

/// Per-frame knobs fixed at engine build time.
#[derive(Debug, Clone, Copy, PartialEq)]
pub(crate) struct FrameSettings {
    /// Colour the back buffer is cleared to before drawing.
    pub clear_color: Color,
    /// Time scale F12 switches to from normal speed.
    pub fast_forward_scale: f64,
}

impl Default for FrameSettings {
    fn default() -> Self {
        Self {
            clear_color: Color::CORNFLOWER_BLUE,
            fast_forward_scale: 3.0,
        }
    }
}

//=== FrameRunner =========================================================

/// Owns the engine state and advances it one frame at a time.
///
/// # Frame Pipeline
///
/// 1. **Platform events**: input batches, resize, focus, close
/// 2. **Clock**: tick with the elapsed wall-clock time
/// 3. **Input**: feed the tracker, poll the sampler
/// 4. **Host signals**: Escape / gamepad Back, F11, F12
/// 5. **Entities**: update, reconcile, then apply time-scale and
///    resolution requests
/// 6. **Render**: viewport, clear, scaled batch of layer-sorted draws
pub(crate) struct FrameRunner {
    context: GlobalContext,
    systems: GlobalSystems,
    collector: EventCollector,
    settings: FrameSettings,
}

impl FrameRunner {
    //--- Construction -----------------------------------------------------

    pub(crate) fn new(
        context: GlobalContext,
        systems: GlobalSystems,
        receiver: Receiver<PlatformEvent>,
        settings: FrameSettings,
    ) -> Self {
        Self {
            context,
            systems,
            collector: EventCollector::new(receiver),
            settings,
        }
    }

    //--- Accessors --------------------------------------------------------

    #[cfg(test)]
    pub(crate) fn context(&self) -> &GlobalContext {
        &self.context
    }

    /// Systems together with the read-only context, for host initialization.
    pub(crate) fn split_mut(&mut self) -> (&mut GlobalSystems, &GlobalContext) {
        (&mut self.systems, &self.context)
    }

    //--- Frame Execution --------------------------------------------------

    /// Runs exactly one frame.
    ///
    /// Returns [`TickControl::Exit`] when the window closed, the channel
    /// disconnected, or a quit signal was received. Nothing is updated or
    /// drawn on an exiting frame.
    pub(crate) fn run_frame(
        &mut self,
        elapsed: Duration,
        display: &mut dyn DisplayBackend,
        renderer: &mut dyn RenderBackend,
    ) -> TickControl {
        //--- Step 1: Gather platform events --------------------------------
        if self.collector.collect_frame() == TickControl::Exit {
            info!("Platform requested shutdown");
            return TickControl::Exit;
        }
        if let Some((width, height)) = self.collector.resize() {
            self.context.viewport.resize(width, height);
        }
        if let Some(focused) = self.collector.focus() {
            self.systems.input.set_focused(focused);
        }

        //--- Step 2: Advance time ------------------------------------------
        self.context.clock.tick(elapsed);

        //--- Step 3: Sample input ------------------------------------------
        self.systems.sample_input(&mut self.context, self.collector.batches());

        //--- Step 4: Host signals ------------------------------------------
        if self.handle_host_signals(display) == TickControl::Exit {
            return TickControl::Exit;
        }

        //--- Step 5: Update entities ---------------------------------------
        self.systems.update(&self.context);
        self.apply_requests(display);

        //--- Step 6: Render ------------------------------------------------
        self.render(renderer);

        TickControl::Continue
    }

    //--- Internal Helpers -------------------------------------------------

    fn handle_host_signals(&mut self, display: &mut dyn DisplayBackend) -> TickControl {
        let input = &self.context.input;
        let quit = input.is_key_just_pressed(KeyCode::Escape)
            || input.is_gamepad_button_down(GamepadButton::Back);
        let toggle_fullscreen = input.is_key_just_pressed(KeyCode::F11);
        let toggle_fast_forward = input.is_key_just_pressed(KeyCode::F12);

        if quit {
            info!("Quit requested");
            return TickControl::Exit;
        }

        if toggle_fullscreen {
            if let Err(e) = self.context.viewport.toggle_fullscreen(display) {
                warn!(target: "viewport", "Fullscreen toggle rejected: {}", e);
            }
        }

        if toggle_fast_forward {
            let clock = &mut self.context.clock;
            let scale = if clock.time_scale() == 1.0 {
                self.settings.fast_forward_scale
            } else {
                1.0
            };
            clock.set_time_scale(scale);
            debug!("Time scale set to {}", scale);
        }

        TickControl::Continue
    }

    /// Applies time-scale and resolution requests made during the update.
    fn apply_requests(&mut self, display: &mut dyn DisplayBackend) {
        let requests = self.systems.entities.take_requests();

        if let Some(scale) = requests.time_scale {
            self.context.clock.set_time_scale(scale);
            debug!("Time scale set to {}", self.context.clock.time_scale());
        }

        if let Some((width, height)) = requests.resolution {
            if let Err(e) = self.context.viewport.set_resolution(width, height, display) {
                warn!(target: "viewport", "Resolution change rejected: {}", e);
            }
        }
    }

    fn render(&self, renderer: &mut dyn RenderBackend) {
        let viewport = &self.context.viewport;

        renderer.set_viewport(viewport.viewport());
        renderer.clear(self.settings.clear_color);
        renderer.begin_batch(viewport.scale_matrix());
        self.systems.entities.draw_all(renderer);
        renderer.end_batch();
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crossbeam_channel::{unbounded, Sender};
    use glam::Vec2;

    use crate::core::content::{ContentError, ContentLibrary, ContentLoader};
    use crate::core::entity::{Behavior, Entity, Passive, Spawner, Sprite};
    use crate::core::input::InputEvent;
    use crate::core::render::testing::{RecordingRenderer, RenderCall};
    use crate::core::viewport::testing::MockDisplay;
    use crate::core::viewport::{BackBuffer, Viewport, ViewportTransform};

    //--- Test Helpers -----------------------------------------------------

    const FRAME: Duration = Duration::from_millis(16);

    struct Harness {
        tx: Sender<PlatformEvent>,
        runner: FrameRunner,
        display: MockDisplay,
        renderer: RecordingRenderer,
    }

    impl Harness {
        fn new() -> Self {
            let (tx, rx) = unbounded();
            let context = GlobalContext::new(ViewportTransform::new(1280, 720).unwrap());
            let systems = GlobalSystems::new(ContentLibrary::new());
            Self {
                tx,
                runner: FrameRunner::new(context, systems, rx, FrameSettings::default()),
                display: MockDisplay::new(1920, 1080),
                renderer: RecordingRenderer::default(),
            }
        }

        fn send(&self, event: PlatformEvent) {
            self.tx.send(event).unwrap();
        }

        fn press(&self, key: KeyCode) {
            self.send(inputs(vec![InputEvent::KeyDown(key)]));
        }

        fn release(&self, key: KeyCode) {
            self.send(inputs(vec![InputEvent::KeyUp(key)]));
        }

        fn frame(&mut self) -> TickControl {
            self.renderer.reset();
            self.runner.run_frame(FRAME, &mut self.display, &mut self.renderer)
        }
    }

    fn inputs(discrete: Vec<InputEvent>) -> PlatformEvent {
        PlatformEvent::Inputs { discrete, continuous: Vec::new() }
    }

    struct Pixel;

    impl Behavior for Pixel {
        fn load_content(
            &mut self,
            entity: &mut Entity,
            content: &mut dyn ContentLoader,
        ) -> Result<(), ContentError> {
            let texture = content.load_texture(ContentLibrary::PIXEL)?;
            entity.set_visual(Sprite::new(texture));
            entity.set_scale(Vec2::splat(100.0));
            Ok(())
        }
    }

    /// Drawn like [`Pixel`], then marks itself on its first update.
    struct FlashPixel;

    impl Behavior for FlashPixel {
        fn load_content(
            &mut self,
            entity: &mut Entity,
            content: &mut dyn ContentLoader,
        ) -> Result<(), ContentError> {
            Pixel.load_content(entity, content)
        }

        fn update(&mut self, entity: &mut Entity, _context: &GlobalContext, _spawner: &mut Spawner) {
            entity.mark_for_removal();
        }
    }

    /// Issues its requests on its first update only.
    struct Requester {
        time_scale: Option<f64>,
        resolution: Option<(i32, i32)>,
    }

    impl Behavior for Requester {
        fn update(&mut self, _entity: &mut Entity, _context: &GlobalContext, spawner: &mut Spawner) {
            if let Some(scale) = self.time_scale.take() {
                spawner.request_time_scale(scale);
            }
            if let Some((width, height)) = self.resolution.take() {
                spawner.request_resolution(width, height);
            }
        }
    }

    //--- Tests ------------------------------------------------------------

    #[test]
    fn render_pass_order() {
        let mut h = Harness::new();
        let (systems, _) = h.runner.split_mut();
        systems.entities.instantiate(Entity::new(), Pixel).unwrap();

        assert_eq!(h.frame(), TickControl::Continue);

        let calls = &h.renderer.calls;
        assert_eq!(calls.len(), 5);
        assert_eq!(calls[0], RenderCall::SetViewport(Viewport { x: 0, y: 0, width: 1280, height: 720 }));
        assert_eq!(calls[1], RenderCall::Clear(Color::CORNFLOWER_BLUE));
        assert!(matches!(calls[2], RenderCall::Begin(_)));
        assert!(matches!(calls[3], RenderCall::Draw(_)));
        assert_eq!(calls[4], RenderCall::End);
    }

    #[test]
    fn resize_is_applied_before_rendering() {
        let mut h = Harness::new();
        h.send(PlatformEvent::Resized { width: 1000, height: 1000 });

        h.frame();

        assert_eq!(
            h.renderer.calls[0],
            RenderCall::SetViewport(Viewport { x: 0, y: 219, width: 1000, height: 562 })
        );
        assert_eq!(h.runner.context().viewport.scale(), 0.78125);
    }

    #[test]
    fn escape_quits() {
        let mut h = Harness::new();
        assert_eq!(h.frame(), TickControl::Continue);

        h.press(KeyCode::Escape);
        assert_eq!(h.frame(), TickControl::Exit);
        assert!(h.renderer.calls.is_empty(), "exiting frame draws nothing");
    }

    #[test]
    fn gamepad_back_quits() {
        let mut h = Harness::new();
        h.send(inputs(vec![InputEvent::GamepadButtonDown(GamepadButton::Back)]));
        assert_eq!(h.frame(), TickControl::Exit);
    }

    #[test]
    fn window_close_quits() {
        let mut h = Harness::new();
        h.send(PlatformEvent::WindowClosed);
        assert_eq!(h.frame(), TickControl::Exit);
    }

    #[test]
    fn unfocused_escape_is_ignored() {
        let mut h = Harness::new();
        h.send(PlatformEvent::FocusChanged(false));
        h.press(KeyCode::Escape);

        assert_eq!(h.frame(), TickControl::Continue);
    }

    #[test]
    fn press_buffered_behind_focus_loss_is_not_stuck() {
        let mut h = Harness::new();
        h.send(PlatformEvent::FocusChanged(false));
        h.press(KeyCode::KeyA);
        h.frame();

        h.send(PlatformEvent::FocusChanged(true));
        h.frame();
        h.frame();

        assert!(!h.runner.context().input.is_key_down(KeyCode::KeyA));
        let (systems, _) = h.runner.split_mut();
        assert!(!systems.input.is_key_down(KeyCode::KeyA));
    }

    #[test]
    fn f11_toggles_fullscreen() {
        let mut h = Harness::new();

        h.press(KeyCode::F11);
        h.frame();
        assert!(h.runner.context().viewport.is_fullscreen());
        assert_eq!(h.runner.context().viewport.scale(), 1.5);

        // Held key does not toggle again
        h.frame();
        assert!(h.runner.context().viewport.is_fullscreen());

        h.release(KeyCode::F11);
        h.frame();
        h.press(KeyCode::F11);
        h.frame();
        assert!(!h.runner.context().viewport.is_fullscreen());
        assert_eq!(h.runner.context().viewport.scale(), 1.0);
    }

    #[test]
    fn rejected_fullscreen_keeps_running() {
        let mut h = Harness::new();
        h.display.reject = true;

        h.press(KeyCode::F11);
        assert_eq!(h.frame(), TickControl::Continue);
        assert!(!h.runner.context().viewport.is_fullscreen());
    }

    #[test]
    fn f12_toggles_fast_forward() {
        let mut h = Harness::new();

        h.press(KeyCode::F12);
        h.frame();
        assert_eq!(h.runner.context().clock.time_scale(), 3.0);
        assert!((h.runner.context().clock.delta_time() - 0.048).abs() < 1e-9);

        h.release(KeyCode::F12);
        h.frame();
        h.press(KeyCode::F12);
        h.frame();
        assert_eq!(h.runner.context().clock.time_scale(), 1.0);
    }

    #[test]
    fn behavior_can_pause_scaled_time() {
        let mut h = Harness::new();
        let (systems, _) = h.runner.split_mut();
        systems
            .entities
            .instantiate(Entity::new(), Requester { time_scale: Some(0.0), resolution: None })
            .unwrap();

        // Admitted on the first frame, updated on the second
        h.frame();
        h.frame();
        assert_eq!(h.runner.context().clock.time_scale(), 0.0);

        h.frame();
        assert_eq!(h.runner.context().clock.delta_time(), 0.0);
        assert!(h.runner.context().clock.unscaled_delta_time() > 0.0);
    }

    #[test]
    fn behavior_resolution_request_resizes_before_rendering() {
        let mut h = Harness::new();
        let (systems, _) = h.runner.split_mut();
        systems
            .entities
            .instantiate(Entity::new(), Requester { time_scale: None, resolution: Some((1000, 1000)) })
            .unwrap();

        h.frame();
        assert!(h.display.applied.is_empty());

        h.frame();
        assert_eq!(
            h.display.applied,
            vec![BackBuffer { width: 1000, height: 1000, fullscreen: false }]
        );
        assert_eq!(
            h.renderer.calls[0],
            RenderCall::SetViewport(Viewport { x: 0, y: 219, width: 1000, height: 562 })
        );
    }

    #[test]
    fn host_resolution_request_is_applied_on_first_frame() {
        let mut h = Harness::new();
        let (systems, _) = h.runner.split_mut();
        systems.entities.request_resolution(640, 360);

        h.frame();

        assert_eq!(h.runner.context().viewport.actual_width(), 640);
        assert_eq!(h.runner.context().viewport.scale(), 0.5);
    }

    #[test]
    fn rejected_resolution_request_keeps_running() {
        let mut h = Harness::new();
        h.display.reject = true;
        let (systems, _) = h.runner.split_mut();
        systems.entities.request_resolution(640, 360);

        assert_eq!(h.frame(), TickControl::Continue);
        assert_eq!(h.runner.context().viewport.actual_width(), 1280);
    }

    #[test]
    fn entity_marking_itself_is_not_drawn_again() {
        let mut h = Harness::new();
        let (systems, _) = h.runner.split_mut();
        let id = systems.entities.instantiate(Entity::new(), FlashPixel).unwrap();

        h.frame();
        assert_eq!(h.renderer.draws().len(), 1);

        h.frame();
        assert!(h.renderer.draws().is_empty());
        let (systems, _) = h.runner.split_mut();
        assert!(!systems.entities.is_live(id));

        h.frame();
        assert!(h.renderer.draws().is_empty());
    }

    #[test]
    fn entity_instantiated_before_first_frame_is_drawn_on_it() {
        let mut h = Harness::new();
        let (systems, _) = h.runner.split_mut();
        let id = systems.entities.instantiate(Entity::new(), Passive).unwrap();
        systems.entities.instantiate(Entity::new().at(Vec2::new(25.0, 25.0)), Pixel).unwrap();

        h.frame();

        let (systems, _) = h.runner.split_mut();
        assert!(systems.entities.is_live(id));
        assert_eq!(h.renderer.draws().len(), 1);
        assert_eq!(h.renderer.draws()[0].position, Vec2::new(25.0, 25.0));
    }
}
