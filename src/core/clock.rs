//=========================================================================
// Clock
//=========================================================================
//
// Converts platform frame timing into the delta time consumed by all
// per-frame logic.
//
// Two views of the same measurement:
//   unscaled_delta_time()  raw seconds since the previous frame
//   delta_time()           raw × time_scale (0 = gameplay paused)
//
// UI and menus keyed to unscaled time keep animating while gameplay
// driven by scaled time is frozen.
//
//=========================================================================

//=== External Dependencies ===============================================

use std::time::Duration;

use log::warn;

//=== Clock ===============================================================

/// Frame timing source for the engine.
///
/// Ticked once per frame by the frame runner; read by entities through
/// [`GlobalContext`](crate::core::globals::GlobalContext).
#[derive(Debug, Clone)]
pub struct Clock {
    raw_elapsed: f64,
    time_scale: f64,
    frame_count: u64,
    total_time: Duration,
}

impl Clock {
    /// Creates a clock with no elapsed time and a time scale of 1.0.
    pub fn new() -> Self {
        Self {
            raw_elapsed: 0.0,
            time_scale: 1.0,
            frame_count: 0,
            total_time: Duration::ZERO,
        }
    }

    //--- Frame Processing -------------------------------------------------

    /// Records the time elapsed since the previous frame.
    pub fn tick(&mut self, elapsed: Duration) {
        self.raw_elapsed = elapsed.as_secs_f64();
        self.total_time += elapsed;
        self.frame_count += 1;
    }

    //--- Queries ----------------------------------------------------------

    /// Seconds since the previous frame, scaled by [`time_scale`](Self::time_scale).
    ///
    /// Use for gameplay logic that should honour slow-motion or pause.
    pub fn delta_time(&self) -> f64 {
        self.raw_elapsed * self.time_scale
    }

    /// Seconds since the previous frame, ignoring the time scale.
    pub fn unscaled_delta_time(&self) -> f64 {
        self.raw_elapsed
    }

    pub fn time_scale(&self) -> f64 {
        self.time_scale
    }

    /// Number of ticks recorded so far.
    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }

    /// Unscaled time accumulated across all ticks.
    pub fn total_time(&self) -> Duration {
        self.total_time
    }

    //--- Configuration ----------------------------------------------------

    /// Sets the rate at which scaled time passes.
    ///
    /// 1.0 is normal speed, 0.5 half speed, 0.0 paused. Negative or NaN
    /// values are rejected and clamp to 0.0.
    pub fn set_time_scale(&mut self, scale: f64) {
        if scale.is_nan() || scale < 0.0 {
            warn!(target: "clock", "Rejected time scale {}, clamping to 0.0", scale);
            self.time_scale = 0.0;
        } else {
            self.time_scale = scale;
        }
    }
}

//--- Trait Implementations -----------------------------------------------

impl Default for Clock {
    fn default() -> Self {
        Self::new()
    }
}

//=========================================================================
// Unit Tests
//=========================================================================
