//! Frame clock
//!
//! Turns the host's per-frame timestamps (monotonic milliseconds, as handed to a
//! `requestAnimationFrame` callback) into a bounded delta time in seconds.

use crate::consts::MAX_FRAME_DT;

/// Delta-time source fed by external frame timestamps
///
/// The delta is clamped to `max_dt` so a suspended tab or a slow frame cannot
/// push the physics through the ground or the player through an obstacle.
#[derive(Debug, Clone)]
pub struct FrameClock {
    /// Timestamp of the previous frame, `None` until the first frame after a reset
    last_ms: Option<f64>,
    max_dt: f32,
    frame_index: u64,
}

impl FrameClock {
    pub fn new(max_dt: f32) -> Self {
        debug_assert!(max_dt > 0.0);
        Self {
            last_ms: None,
            max_dt,
            frame_index: 0,
        }
    }

    /// Forget the previous timestamp; the next tick reports zero elapsed time
    pub fn reset(&mut self) {
        self.last_ms = None;
        self.frame_index = 0;
    }

    /// Advance to `now_ms` and return the elapsed seconds, within `[0, max_dt]`
    pub fn tick(&mut self, now_ms: f64) -> f32 {
        let dt = match self.last_ms {
            // Host clocks can step backwards (or hand out NaN); treat as no time passing
            Some(last) if now_ms > last => (((now_ms - last) / 1000.0) as f32).min(self.max_dt),
            Some(_) => 0.0,
            None => 0.0,
        };
        self.last_ms = Some(now_ms);
        self.frame_index = self.frame_index.wrapping_add(1);
        dt
    }

    /// Number of ticks since the last reset
    pub fn frame_index(&self) -> u64 {
        self.frame_index
    }
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new(MAX_FRAME_DT)
    }
}
