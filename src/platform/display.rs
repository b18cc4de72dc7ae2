//=========================================================================
// Winit Display
//=========================================================================
//
// DisplayBackend over a winit window: native monitor resolution,
// borderless fullscreen, and windowed back-buffer sizing.
//
// Winit applies size and mode changes asynchronously on most platforms.
// apply() reports the requested size when the OS has not confirmed one
// yet; the follow-up Resized window event corrects it if needed.
//
//=========================================================================

//=== External Dependencies ===============================================

use log::debug;
use winit::{
    dpi::PhysicalSize,
    window::{Fullscreen, Window},
};

//=== Internal Dependencies ===============================================

use crate::core::viewport::{BackBuffer, DisplayBackend, DisplayError};

//=== WinitDisplay ========================================================

/// Borrowed view of the window used for one frame.
pub(crate) struct WinitDisplay<'a> {
    window: &'a Window,
}

impl<'a> WinitDisplay<'a> {
    pub(crate) fn new(window: &'a Window) -> Self {
        Self { window }
    }
}

impl DisplayBackend for WinitDisplay<'_> {
    fn native_resolution(&self) -> (i32, i32) {
        let size = self
            .window
            .current_monitor()
            .map(|monitor| monitor.size())
            .unwrap_or_else(|| self.window.inner_size());
        (size.width as i32, size.height as i32)
    }

    fn apply(&mut self, back_buffer: BackBuffer) -> Result<(i32, i32), DisplayError> {
        if back_buffer.width <= 0 || back_buffer.height <= 0 {
            return Err(DisplayError::Rejected {
                width: back_buffer.width,
                height: back_buffer.height,
                fullscreen: back_buffer.fullscreen,
                reason: "back buffer must have a positive size".into(),
            });
        }

        if back_buffer.fullscreen {
            let monitor = self.window.current_monitor().ok_or(DisplayError::Unavailable)?;
            debug!(target: "platform", "Entering borderless fullscreen on {:?}", monitor.name());
            self.window.set_fullscreen(Some(Fullscreen::Borderless(Some(monitor))));
            return Ok((back_buffer.width, back_buffer.height));
        }

        self.window.set_fullscreen(None);
        let requested = PhysicalSize::new(back_buffer.width as u32, back_buffer.height as u32);
        match self.window.request_inner_size(requested) {
            Some(size) => Ok((size.width as i32, size.height as i32)),
            None => Ok((back_buffer.width, back_buffer.height)),
        }
    }
}
