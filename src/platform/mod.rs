//=========================================================================
// Platform Subsystem
//
// Bridges Winit (OS-level events) with the frame runner via channel.
//
// Architecture:
// ```text
//  Main Thread:
//  ┌─────────────────────────────────────────────────────┐
//  │  Winit Event Loop                                   │
//  │   ↓                                                 │
//  │  input_processor / GamepadPoller                    │
//  │   ↓                                                 │
//  │  InputBuffer                                        │
//  │   ├─ discrete: Vec<>                                │
//  │   └─ continuous: HashSet<>                          │
//  │   ↓                                                 │
//  │  RedrawRequested                                    │
//  │   ├─ flush → channel ──► EventCollector             │
//  │   └─ FrameRunner::run_frame(elapsed, display, gfx)  │
//  │        └─ Continue → request_redraw / Exit → exit   │
//  └─────────────────────────────────────────────────────┘
//
//  Frame Boundary: RedrawRequested
//    → All buffered input sent atomically
//    → Exactly one core frame per redraw
//    → Empty buffers NOT sent
// ```
//
// Key Design Decisions:
// - **RedrawRequested = frame boundary**: Batches all input atomically,
//   ensuring deterministic order even with high event rates
// - **Single thread**: the channel decouples event conversion from the
//   core without any locking; sends never block
// - **Main thread requirement**: Winit mandates main thread on macOS/iOS,
//   so this runs on the thread that called `Engine::run()`
//
// Responsibilities:
// - Create and manage the OS window
// - Convert Winit and gilrs events → engine InputEvents
// - Forward resize, focus and close notifications
// - Drive the frame runner and the renderer
//
//=========================================================================

//=== Submodules ==========================================================

mod display;
mod gamepad;
mod input_buffer;
mod input_processor;

//=== Standard Library Imports ============================================

use std::time::{Duration, Instant};

//=== External Crates =====================================================

use crossbeam_channel::{Sender, TrySendError};
use log::*;
use winit::{
    application::ApplicationHandler,
    dpi::PhysicalSize,
    event::WindowEvent,
    event_loop::{ActiveEventLoop, EventLoop},
    window::{Window, WindowAttributes, WindowId},
};

//=== Internal Imports ====================================================

use crate::core::platform_bridge::{PlatformError, PlatformEvent, TickControl};
use crate::core::render::RenderBackend;
use crate::core::FrameRunner;
use display::WinitDisplay;
use gamepad::GamepadPoller;
use input_buffer::InputBuffer;

//=== WindowConfig ========================================================

/// Initial window parameters.
#[derive(Debug, Clone, PartialEq, Eq)]
pub(crate) struct WindowConfig {
    pub title: String,
    /// Initial back-buffer size in physical pixels.
    pub width: u32,
    pub height: u32,
}

//=== Platform ============================================================

/// Window manager, input aggregator and frame driver.
///
/// # Lifecycle
///
/// 1. **Construction**: `Platform::new(...)` - initializes subsystems
/// 2. **Execution**: `platform.run()` - blocks in the event loop
/// 3. **Event processing**: Winit calls `ApplicationHandler` methods
/// 4. **Shutdown**: close request or quit signal → `exit()` → `run()` returns
///
/// # Fields
///
/// - `window`: Created lazily in `resumed()` (mobile compatibility)
/// - `buffer`: Accumulates events until `RedrawRequested`
/// - `event_sender`: Channel into the frame runner's collector
/// - `last_frame`: Timestamp of the previous redraw, for elapsed time
pub(crate) struct Platform {
    config: WindowConfig,
    window: Option<Window>,
    buffer: InputBuffer,
    gamepad: GamepadPoller,
    event_sender: Sender<PlatformEvent>,
    runner: FrameRunner,
    renderer: Box<dyn RenderBackend>,
    last_frame: Option<Instant>,
    fatal: Option<PlatformError>,
}

impl Platform {
    //--- Construction -----------------------------------------------------

    /// Does not create the window yet; that happens lazily in `resumed()`.
    pub(crate) fn new(
        config: WindowConfig,
        event_sender: Sender<PlatformEvent>,
        runner: FrameRunner,
        renderer: Box<dyn RenderBackend>,
    ) -> Self {
        info!(target: "platform", "Platform subsystem initialized");
        Self {
            config,
            window: None,
            buffer: InputBuffer::new(),
            gamepad: GamepadPoller::new(),
            event_sender,
            runner,
            renderer,
            last_frame: None,
            fatal: None,
        }
    }

    //--- Execution --------------------------------------------------------

    /// Runs the event loop until the application exits.
    ///
    /// # Errors
    ///
    /// Returns [`PlatformError`] if the event loop cannot be created or
    /// fails, or if the window cannot be created.
    ///
    /// # Panics
    ///
    /// Panics if called off the main thread (macOS/iOS Winit requirement).
    pub(crate) fn run(mut self) -> Result<(), PlatformError> {
        debug!(target: "platform", "Starting Winit event loop");

        let event_loop =
            EventLoop::new().map_err(|e| PlatformError::EventLoopCreation(e.to_string()))?;

        event_loop
            .run_app(&mut self)
            .map_err(|e| PlatformError::EventLoopExecution(e.to_string()))?;

        match self.fatal.take() {
            Some(error) => Err(error),
            None => Ok(()),
        }
    }

    //--- Internal Helpers -------------------------------------------------

    /// Sends an event to the core without blocking.
    ///
    /// The core drains the channel on this same thread, so a full channel
    /// means the core is behind; the event is dropped with a warning.
    fn send(&self, event: PlatformEvent) {
        match self.event_sender.try_send(event) {
            Ok(()) => {}
            Err(TrySendError::Full(event)) => {
                warn!(target: "platform", "Channel full, dropping {:?}", event);
            }
            Err(TrySendError::Disconnected(_)) => {
                warn!(target: "platform", "Channel disconnected, event dropped");
            }
        }
    }

    /// Flushes buffered input events to the core.
    ///
    /// Empty buffers are not sent. Typical frame has 0-10 events.
    fn flush_input_buffer(&mut self) {
        if let Some((discrete, continuous)) = self.buffer.drain() {
            trace!(
                target: "platform::input",
                "Flushing {} discrete + {} continuous events",
                discrete.len(),
                continuous.len()
            );
            self.send(PlatformEvent::Inputs { discrete, continuous });
        }
    }

    /// Runs one core frame. Called on every `RedrawRequested`.
    fn redraw(&mut self, event_loop: &ActiveEventLoop) {
        self.gamepad.poll(&mut self.buffer);
        self.flush_input_buffer();

        let now = Instant::now();
        let elapsed = self.last_frame.map_or(Duration::ZERO, |last| now.duration_since(last));
        self.last_frame = Some(now);

        let Some(window) = self.window.as_ref() else { return };
        let mut display = WinitDisplay::new(window);

        match self.runner.run_frame(elapsed, &mut display, self.renderer.as_mut()) {
            TickControl::Continue => window.request_redraw(),
            TickControl::Exit => {
                info!(target: "platform", "Core requested exit");
                event_loop.exit();
            }
        }
    }

    //--- Test Accessors ---------------------------------------------------

    #[cfg(test)]
    pub(crate) fn window(&self) -> Option<&Window> {
        self.window.as_ref()
    }
}

//=== Winit Integration ===================================================

impl ApplicationHandler for Platform {
    /// Called when app becomes active (startup or mobile resume).
    ///
    /// Creates the window if it doesn't exist yet. On mobile, this may be
    /// called multiple times (suspend/resume cycle).
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            debug!(target: "platform", "Window already exists (mobile resume?)");
            return;
        }

        let attrs = WindowAttributes::default()
            .with_title(self.config.title.clone())
            .with_inner_size(PhysicalSize::new(self.config.width, self.config.height));

        match event_loop.create_window(attrs) {
            Ok(window) => {
                let size = window.inner_size();
                info!(
                    target: "platform",
                    "Window created: {}x{} @ {}x DPI",
                    size.width,
                    size.height,
                    window.scale_factor()
                );
                self.send(PlatformEvent::Resized {
                    width: size.width as i32,
                    height: size.height as i32,
                });
                window.request_redraw();
                self.window = Some(window);
            }
            Err(e) => {
                error!(target: "platform", "Window creation failed: {}", e);
                self.fatal = Some(PlatformError::WindowCreation(e.to_string()));
                self.send(PlatformEvent::WindowClosed);
                event_loop.exit();
            }
        }
    }

    /// Handles per-window events.
    fn window_event(&mut self, event_loop: &ActiveEventLoop, _window_id: WindowId, event: WindowEvent) {
        match &event {
            WindowEvent::CloseRequested => {
                info!(target: "platform", "Window close requested");
                self.send(PlatformEvent::WindowClosed);
                event_loop.exit();
            }

            WindowEvent::Resized(size) => {
                self.send(PlatformEvent::Resized {
                    width: size.width as i32,
                    height: size.height as i32,
                });
            }

            WindowEvent::Focused(focused) => {
                trace!(target: "platform::input", "Focus changed: {}", focused);
                self.send(PlatformEvent::FocusChanged(*focused));
            }

            WindowEvent::CursorMoved { position, .. } => {
                let event = input_processor::process_pointer_move(position.x, position.y);
                self.buffer.push_continuous(event);
            }

            WindowEvent::KeyboardInput { event: key_event, .. } => {
                if let Some(event) = input_processor::process_key_event(key_event) {
                    self.buffer.push_discrete(event);
                } else {
                    trace!(target: "platform::input", "Unmapped or repeated key ignored");
                }
            }

            WindowEvent::MouseInput { state, button, .. } => {
                let event = input_processor::process_mouse_button(*button, *state);
                self.buffer.push_discrete(event);
            }

            WindowEvent::RedrawRequested => self.redraw(event_loop),

            _ => {}
        }
    }
}

//=========================================================================
// Unit Tests
//=========================================================================

#[cfg(test)]
mod tests {
    use super::*;
    use crossbeam_channel::bounded;

    use crate::core::content::ContentLibrary;
    use crate::core::globals::{GlobalContext, GlobalSystems};
    use crate::core::input::event::{InputEvent, KeyCode};
    use crate::core::render::testing::RecordingRenderer;
    use crate::core::viewport::ViewportTransform;
    use crate::core::FrameSettings;

    //--- Test Helpers -----------------------------------------------------

    fn platform(capacity: usize) -> (Platform, crossbeam_channel::Receiver<PlatformEvent>) {
        let (tx, rx) = bounded(capacity);
        // The runner gets its own channel; these tests only observe what
        // the platform sends.
        let (_core_tx, core_rx) = bounded(1);
        let runner = FrameRunner::new(
            GlobalContext::new(ViewportTransform::new(320, 180).unwrap()),
            GlobalSystems::new(ContentLibrary::new()),
            core_rx,
            FrameSettings::default(),
        );
        let config = WindowConfig {
            title: "test".into(),
            width: 320,
            height: 180,
        };
        let platform = Platform::new(config, tx, runner, Box::new(RecordingRenderer::default()));
        (platform, rx)
    }

    //--- Tests ------------------------------------------------------------

    #[test]
    fn window_is_created_lazily() {
        let (platform, _rx) = platform(8);
        assert!(platform.window().is_none());
    }

    #[test]
    fn flush_empty_buffer_is_noop() {
        let (mut platform, rx) = platform(8);

        platform.flush_input_buffer();

        assert!(rx.try_recv().is_err(), "No events should be sent for empty buffer");
    }

    #[test]
    fn flush_sends_buffered_events() {
        let (mut platform, rx) = platform(8);
        platform.buffer.push_discrete(InputEvent::KeyDown(KeyCode::Space));
        platform.buffer.push_continuous(InputEvent::PointerMoved { x: 1.0, y: 2.0 });

        platform.flush_input_buffer();

        match rx.try_recv() {
            Ok(PlatformEvent::Inputs { discrete, continuous }) => {
                assert_eq!(discrete, vec![InputEvent::KeyDown(KeyCode::Space)]);
                assert_eq!(continuous.len(), 1);
            }
            other => panic!("Expected Inputs event, got {:?}", other),
        }
    }

    #[test]
    fn multiple_flushes_clear_buffer() {
        let (mut platform, rx) = platform(8);
        platform.buffer.push_discrete(InputEvent::KeyDown(KeyCode::KeyA));

        platform.flush_input_buffer();
        platform.flush_input_buffer();

        assert!(rx.try_recv().is_ok(), "First flush should send");
        assert!(rx.try_recv().is_err(), "Second flush should not send");
    }

    #[test]
    fn full_channel_drops_instead_of_blocking() {
        let (platform, rx) = platform(1);

        platform.send(PlatformEvent::FocusChanged(false));
        platform.send(PlatformEvent::FocusChanged(true));

        assert_eq!(rx.try_recv().ok(), Some(PlatformEvent::FocusChanged(false)));
        assert!(rx.try_recv().is_err());
    }

    #[test]
    fn disconnected_channel_does_not_panic() {
        let (mut platform, rx) = platform(8);
        platform.buffer.push_discrete(InputEvent::KeyDown(KeyCode::Space));
        drop(rx);

        platform.flush_input_buffer();
    }
}
