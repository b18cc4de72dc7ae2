//=========================================================================
// Letterbox Engine
//
// Main entry point and coordinator for the engine.
//
// Architecture:
// ```text
//     EngineBuilder  ──build()──>  Engine  ──init()──>  Engine  ──run()──>  [Runtime]
//         │                          │                    │
//         ├─ with_title()            └─ FrameRunner       └─ Platform drives one
//         ├─ with_virtual_resolution()   + channel           frame per redraw,
//         ├─ with_channel_capacity()                         blocks until exit
//         ├─ with_fast_forward_scale()
//         ├─ with_clear_color()
//         └─ with_content()
// ```
//
//=========================================================================

//=== External Dependencies ===============================================

use crossbeam_channel::{bounded, Sender};
use log::{error, info};
use thiserror::Error;

//=== Internal Dependencies ===============================================

use crate::core::content::{ContentError, ContentLibrary, ContentLoader};
use crate::core::entity::EntityError;
use crate::core::globals::{GlobalContext, GlobalSystems};
use crate::core::platform_bridge::{PlatformError, PlatformEvent};
use crate::core::render::{Color, RenderBackend};
use crate::core::viewport::{DisplayError, ViewportError, ViewportTransform};
use crate::core::{FrameRunner, FrameSettings};
use crate::platform::{Platform, WindowConfig};

//=== EngineError =========================================================

/// Any error surfaced by the engine facade.
#[derive(Debug, Error)]
pub enum EngineError {
    #[error(transparent)]
    Viewport(#[from] ViewportError),

    #[error(transparent)]
    Content(#[from] ContentError),

    #[error(transparent)]
    Entity(#[from] EntityError),

    #[error(transparent)]
    Display(#[from] DisplayError),

    #[error(transparent)]
    Platform(#[from] PlatformError),
}

//=== EngineBuilder =======================================================

/// Builder for configuring and constructing an [`Engine`].
///
/// # Default Values
///
/// - **Title**: "Engine"
/// - **Virtual resolution**: 1280×720
/// - **Channel capacity**: 128 events
/// - **Fast-forward scale**: 3.0
/// - **Clear color**: cornflower blue
/// - **Content**: an empty [`ContentLibrary`] (built-in pixel only)
///
/// # Examples
///
/// ```no_run
/// use letterbox_engine::EngineBuilder;
///
/// # fn main() -> Result<(), letterbox_engine::EngineError> {
/// # struct NullRenderer;
/// # impl letterbox_engine::core::render::RenderBackend for NullRenderer {
/// #     fn set_viewport(&mut self, _: letterbox_engine::core::viewport::Viewport) {}
/// #     fn clear(&mut self, _: letterbox_engine::core::render::Color) {}
/// #     fn begin_batch(&mut self, _: glam::Mat4) {}
/// #     fn draw(&mut self, _: &letterbox_engine::core::render::DrawCommand) {}
/// #     fn end_batch(&mut self) {}
/// # }
/// EngineBuilder::new()
///     .with_title("Demo")
///     .with_virtual_resolution(320, 180)
///     .build()?
///     .run(NullRenderer)?;
/// # Ok(())
/// # }
/// ```
pub struct EngineBuilder {
    title: String,
    virtual_width: i32,
    virtual_height: i32,
    channel_capacity: usize,
    fast_forward_scale: f64,
    clear_color: Color,
    content: Box<dyn ContentLoader>,
}

impl EngineBuilder {
    /// Creates a new builder with default settings.
    pub fn new() -> Self {
        Self {
            title: "Engine".to_owned(),
            virtual_width: 1280,
            virtual_height: 720,
            channel_capacity: 128,
            fast_forward_scale: 3.0,
            clear_color: Color::CORNFLOWER_BLUE,
            content: Box::new(ContentLibrary::new()),
        }
    }

    /// Sets the window title.
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Sets the fixed coordinate space the game is authored in.
    ///
    /// The initial window uses the same size in physical pixels.
    ///
    /// # Panics
    ///
    /// Panics if either dimension is not positive.
    pub fn with_virtual_resolution(mut self, width: i32, height: i32) -> Self {
        assert!(width > 0 && height > 0, "Virtual resolution must be positive");
        self.virtual_width = width;
        self.virtual_height = height;
        self
    }

    /// Sets the platform → core channel capacity.
    ///
    /// # Panics
    ///
    /// Panics if capacity is 0.
    pub fn with_channel_capacity(mut self, capacity: usize) -> Self {
        assert!(capacity > 0, "Channel capacity must be positive");
        self.channel_capacity = capacity;
        self
    }

    /// Sets the time scale F12 switches to.
    ///
    /// # Panics
    ///
    /// Panics if `scale` is not a positive finite number.
    pub fn with_fast_forward_scale(mut self, scale: f64) -> Self {
        assert!(scale.is_finite() && scale > 0.0, "Fast-forward scale must be positive");
        self.fast_forward_scale = scale;
        self
    }

    /// Sets the colour the back buffer is cleared to each frame.
    pub fn with_clear_color(mut self, color: Color) -> Self {
        self.clear_color = color;
        self
    }

    /// Replaces the content source used during entity instantiation.
    pub fn with_content(mut self, content: impl ContentLoader + 'static) -> Self {
        self.content = Box::new(content);
        self
    }

    /// Builds the engine instance.
    ///
    /// Creates the platform → core channel and the frame runner. No
    /// window exists until [`Engine::run`].
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Viewport`] if the virtual resolution is
    /// rejected by the viewport transform.
    pub fn build(self) -> Result<Engine, EngineError> {
        info!(
            "Building engine '{}' ({}x{} virtual, channel: {})",
            self.title, self.virtual_width, self.virtual_height, self.channel_capacity
        );

        let viewport = ViewportTransform::new(self.virtual_width, self.virtual_height)?;
        let (sender, receiver) = bounded(self.channel_capacity);

        let settings = FrameSettings {
            clear_color: self.clear_color,
            fast_forward_scale: self.fast_forward_scale,
        };
        let runner = FrameRunner::new(
            GlobalContext::new(viewport),
            GlobalSystems::new(self.content),
            receiver,
            settings,
        );

        Ok(Engine {
            runner,
            sender,
            window: WindowConfig {
                title: self.title,
                width: self.virtual_width as u32,
                height: self.virtual_height as u32,
            },
        })
    }
}

impl Default for EngineBuilder {
    fn default() -> Self {
        Self::new()
    }
}

//=== Engine ==============================================================

/// Letterbox Engine runtime.
///
/// Create via [`EngineBuilder`], populate the world in [`Engine::init`],
/// then hand a rendering backend to [`Engine::run`].
///
/// # Architecture
///
/// ```text
/// Engine (Main Thread)
///   └─► Platform (Event Loop)
///         ├─► Window, keyboard/mouse, gamepad
///         └─► FrameRunner (one frame per redraw)
///               └─► Clock, Input, Viewport, Entities, Render
///
/// Communication: bounded channel (PlatformEvent)
/// ```
pub struct Engine {
    runner: FrameRunner,
    sender: Sender<PlatformEvent>,
    window: WindowConfig,
}

impl Engine {
    //--- Initialization ---------------------------------------------------

    /// Runs host setup before the first frame.
    ///
    /// The closure receives the systems (to instantiate entities, register
    /// content) and the context (virtual resolution, clock). Entities
    /// instantiated here are admitted at the end of the first frame's
    /// update and drawn on that frame.
    ///
    /// # Errors
    ///
    /// Propagates whatever the closure returns.
    ///
    /// # Examples
    ///
    /// ```no_run
    /// use letterbox_engine::prelude::*;
    ///
    /// # fn main() -> Result<(), EngineError> {
    /// EngineBuilder::new()
    ///     .build()?
    ///     .init(|systems, context| {
    ///         let center = context.viewport.virtual_size() / 2.0;
    ///         systems.entities.instantiate(Entity::new().at(center), Passive)?;
    ///         Ok(())
    ///     })?;
    /// # Ok(())
    /// # }
    /// ```
    pub fn init<F>(mut self, init_fn: F) -> Result<Self, EngineError>
    where
        F: FnOnce(&mut GlobalSystems, &GlobalContext) -> Result<(), EngineError>,
    {
        info!("Initializing engine systems");

        let (systems, context) = self.runner.split_mut();
        init_fn(&mut *systems, context)?;

        info!(
            "Engine initialization complete ({} entities pending)",
            systems.entities.pending_len()
        );
        Ok(self)
    }

    //--- Execution --------------------------------------------------------

    /// Opens the window and blocks until the application exits.
    ///
    /// # Errors
    ///
    /// Returns [`EngineError::Platform`] if the event loop or the window
    /// cannot be created.
    ///
    /// # Panics
    ///
    /// Panics if called off the main thread on platforms that require it.
    pub fn run(self, renderer: impl RenderBackend + 'static) -> Result<(), EngineError> {
        info!("Starting engine runtime '{}'", self.window.title);

        let platform = Platform::new(self.window, self.sender, self.runner, Box::new(renderer));

        if let Err(e) = platform.run() {
            error!("Platform error: {}", e);
            return Err(e.into());
        }

        info!("Engine shutdown complete");
        Ok(())
    }

    //--- Test Accessors ---------------------------------------------------

    #[cfg(test)]
    fn runner(&self) -> &FrameRunner {
        &self.runner
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
