//=========================================================================
// Viewport Transform
//=========================================================================
//
// Resolution independence: the game is authored against a fixed virtual
// canvas, scaled uniformly into the actual back buffer and centred with
// letterbox (top/bottom) or pillarbox (left/right) bars.
//
// Derived state:
//   scale   = min(actual_w / virtual_w, actual_h / virtual_h)
//   scaled  = floor(virtual × scale)
//   offset  = (actual − scaled) / 2        (integer halves)
//
// Coordinate spaces:
//   device  ──to_virtual()──►  virtual
//   virtual ──to_device()───►  device
//
// The transform does not observe the window. `resize()` must be called
// after every back-buffer change (explicit resize or fullscreen toggle).
//
//=========================================================================

//=== External Dependencies ===============================================

use glam::{Mat4, Vec2, Vec3};
use log::{debug, info};
use thiserror::Error;

//=== Errors ==============================================================

/// Invalid viewport configuration.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum ViewportError {
    #[error("virtual resolution must be positive, got {width}x{height}")]
    InvalidVirtualResolution { width: i32, height: i32 },
}

/// Failure reported by the window/device backend while committing a mode.
#[derive(Debug, Error, Clone, PartialEq, Eq)]
pub enum DisplayError {
    #[error("display rejected {width}x{height} (fullscreen: {fullscreen}): {reason}")]
    Rejected {
        width: i32,
        height: i32,
        fullscreen: bool,
        reason: String,
    },

    #[error("no display is available")]
    Unavailable,
}

//=== Viewport ============================================================

/// Device-space rectangle the virtual canvas is rendered into.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct Viewport {
    pub x: i32,
    pub y: i32,
    pub width: i32,
    pub height: i32,
}

//=== Display Backend =====================================================

/// Back-buffer configuration committed to the window/device backend.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub struct BackBuffer {
    pub width: i32,
    pub height: i32,
    pub fullscreen: bool,
}

/// Window/device collaborator that owns the real back buffer.
pub trait DisplayBackend {
    /// Size of the display's current mode, used for fullscreen.
    fn native_resolution(&self) -> (i32, i32);

    /// Commits a back-buffer configuration.
    ///
    /// Returns the back-buffer size actually in effect afterwards.
    fn apply(&mut self, back_buffer: BackBuffer) -> Result<(i32, i32), DisplayError>;
}

//=== ViewportTransform ===================================================

/// Owns the virtual resolution and maps between virtual and device space.
///
/// The scale is always uniform, so the virtual aspect ratio is preserved
/// and never stretched.
#[derive(Debug, Clone)]
pub struct ViewportTransform {
    virtual_width: i32,
    virtual_height: i32,
    actual_width: i32,
    actual_height: i32,
    fullscreen: bool,
    scale: f32,
    viewport: Viewport,
}

impl ViewportTransform {
    //--- Construction -----------------------------------------------------

    /// Creates a transform for the given virtual resolution.
    ///
    /// The initial device surface matches the virtual size (1:1 scale).
    ///
    /// # Errors
    ///
    /// Returns [`ViewportError::InvalidVirtualResolution`] if either
    /// dimension is zero or negative.
    pub fn new(virtual_width: i32, virtual_height: i32) -> Result<Self, ViewportError> {
        if virtual_width <= 0 || virtual_height <= 0 {
            return Err(ViewportError::InvalidVirtualResolution {
                width: virtual_width,
                height: virtual_height,
            });
        }

        let mut transform = Self {
            virtual_width,
            virtual_height,
            actual_width: virtual_width,
            actual_height: virtual_height,
            fullscreen: false,
            scale: 1.0,
            viewport: Viewport {
                x: 0,
                y: 0,
                width: virtual_width,
                height: virtual_height,
            },
        };
        transform.recompute();
        Ok(transform)
    }

    //--- Resize -----------------------------------------------------------

    /// Updates the actual back-buffer size and re-derives scale and offset.
    ///
    /// Non-positive sizes (e.g. a minimized window) are ignored and the
    /// previous mapping is kept.
    pub fn resize(&mut self, actual_width: i32, actual_height: i32) {
        if actual_width <= 0 || actual_height <= 0 {
            debug!(
                target: "viewport",
                "Ignoring degenerate back buffer {}x{}", actual_width, actual_height
            );
            return;
        }

        self.actual_width = actual_width;
        self.actual_height = actual_height;
        self.recompute();

        debug!(
            target: "viewport",
            "Resized to {}x{} (scale {}, viewport {:?})",
            actual_width, actual_height, self.scale, self.viewport
        );
    }

    /// Switches between the display's native mode and a window at the
    /// virtual resolution, then resizes with the committed size.
    pub fn toggle_fullscreen(&mut self, display: &mut dyn DisplayBackend) -> Result<(), DisplayError> {
        let target = if self.fullscreen {
            BackBuffer {
                width: self.virtual_width,
                height: self.virtual_height,
                fullscreen: false,
            }
        } else {
            let (width, height) = display.native_resolution();
            BackBuffer { width, height, fullscreen: true }
        };

        let (width, height) = display.apply(target)?;
        self.fullscreen = target.fullscreen;
        info!(
            target: "viewport",
            "Fullscreen {} ({}x{})",
            if self.fullscreen { "enabled" } else { "disabled" },
            width,
            height
        );
        self.resize(width, height);
        Ok(())
    }

    /// Sets the windowed back-buffer size.
    ///
    /// Does nothing while fullscreen, where the OS-driven mode wins.
    pub fn set_resolution(
        &mut self,
        width: i32,
        height: i32,
        display: &mut dyn DisplayBackend,
    ) -> Result<(), DisplayError> {
        if self.fullscreen {
            debug!(target: "viewport", "Ignoring resolution {}x{} while fullscreen", width, height);
            return Ok(());
        }

        let (width, height) = display.apply(BackBuffer { width, height, fullscreen: false })?;
        self.resize(width, height);
        Ok(())
    }

    //--- Coordinate Mapping -----------------------------------------------

    /// Maps a device-space point (e.g. the pointer) into virtual space.
    pub fn to_virtual(&self, device: Vec2) -> Vec2 {
        (device - self.offset()) / self.scale
    }

    /// Maps a device-space point into normalized virtual space.
    ///
    /// Letterbox-aware: (0,0) and (1,1) are the corners of the rendered
    /// canvas, not of the window. Points over the bars fall outside [0,1].
    pub fn to_virtual_normalized(&self, device: Vec2) -> Vec2 {
        self.to_virtual(device) / self.virtual_size()
    }

    /// Maps a virtual-space point to device space.
    pub fn to_device(&self, virtual_point: Vec2) -> Vec2 {
        virtual_point * self.scale + self.offset()
    }

    /// Converts a normalized origin into a virtual-space position.
    pub fn anchor(&self, origin: Vec2) -> Vec2 {
        origin * self.virtual_size()
    }

    /// Uniform scale transform for the sprite batch.
    ///
    /// Encodes the scale only; the letterbox offset is applied by
    /// rendering into [`viewport`](Self::viewport).
    pub fn scale_matrix(&self) -> Mat4 {
        Mat4::from_scale(Vec3::new(self.scale, self.scale, 1.0))
    }

    //--- Queries ----------------------------------------------------------

    pub fn scale(&self) -> f32 {
        self.scale
    }

    /// Letterbox offset in device pixels.
    pub fn offset(&self) -> Vec2 {
        Vec2::new(self.viewport.x as f32, self.viewport.y as f32)
    }

    pub fn viewport(&self) -> Viewport {
        self.viewport
    }

    pub fn virtual_width(&self) -> i32 {
        self.virtual_width
    }

    pub fn virtual_height(&self) -> i32 {
        self.virtual_height
    }

    pub fn virtual_size(&self) -> Vec2 {
        Vec2::new(self.virtual_width as f32, self.virtual_height as f32)
    }

    pub fn actual_width(&self) -> i32 {
        self.actual_width
    }

    pub fn actual_height(&self) -> i32 {
        self.actual_height
    }

    pub fn is_fullscreen(&self) -> bool {
        self.fullscreen
    }

    /// Width over height of the virtual canvas.
    pub fn aspect_ratio(&self) -> f32 {
        self.virtual_width as f32 / self.virtual_height as f32
    }

    //--- Internal Helpers -------------------------------------------------

    fn recompute(&mut self) {
        let scale = f32::min(
            self.actual_width as f32 / self.virtual_width as f32,
            self.actual_height as f32 / self.virtual_height as f32,
        );

        // Same floor rule for size and offset, so bars and content meet
        // without a seam.
        let scaled_width = ((self.virtual_width as f32 * scale).floor() as i32).min(self.actual_width);
        let scaled_height = ((self.virtual_height as f32 * scale).floor() as i32).min(self.actual_height);

        self.scale = scale;
        self.viewport = Viewport {
            x: (self.actual_width - scaled_width) / 2,
            y: (self.actual_height - scaled_height) / 2,
            width: scaled_width,
            height: scaled_height,
        };
    }
}

//=========================================================================
// Test Support
//=========================================================================

#[cfg(test)]
pub(crate) mod testing {
    use super::*;

    /// Display double that accepts every mode and records commits.
    pub(crate) struct MockDisplay {
        pub native: (i32, i32),
        pub applied: Vec<BackBuffer>,
        pub reject: bool,
    }

    impl MockDisplay {
        pub fn new(native_width: i32, native_height: i32) -> Self {
            Self {
                native: (native_width, native_height),
                applied: Vec::new(),
                reject: false,
            }
        }
    }

    impl DisplayBackend for MockDisplay {
        fn native_resolution(&self) -> (i32, i32) {
            self.native
        }

        fn apply(&mut self, back_buffer: BackBuffer) -> Result<(i32, i32), DisplayError> {
            if self.reject {
                return Err(DisplayError::Rejected {
                    width: back_buffer.width,
                    height: back_buffer.height,
                    fullscreen: back_buffer.fullscreen,
                    reason: "mock".into(),
                });
            }
            self.applied.push(back_buffer);
            Ok((back_buffer.width, back_buffer.height))
        }
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
