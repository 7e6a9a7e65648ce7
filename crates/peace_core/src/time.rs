//! Frame timing.
//!
//! The runner owns a [`FrameClock`], ticks it at the top of every frame and
//! hands the resulting [`Time`] snapshot to the engine.  When a frame cap is
//! configured the clock also reports how long to sleep before the next frame.

use std::time::{Duration, Instant};

/// Largest delta handed to the simulation, in seconds.
pub const MAX_DELTA: f32 = 0.1;

/// A snapshot of timing information for the current frame.
#[derive(Debug, Clone, Copy, Default)]
pub struct Time {
    /// Seconds since the previous frame, clamped to [`MAX_DELTA`].
    pub delta: f32,
    /// Seconds since the clock started.
    pub elapsed: f64,
    /// Index of this frame, starting at 0.
    pub frame_count: u64,
    pub fps: f32,
}

pub struct FrameClock {
    start:       Instant,
    last_tick:   Instant,
    frame_count: u64,
    frame_time:  Option<Duration>,
}

impl FrameClock {
    /// `fps_cap` of 0 disables the cap.
    pub fn new(fps_cap: u32) -> Self {
        let now = Instant::now();
        Self {
            start:       now,
            last_tick:   now,
            frame_count: 0,
            frame_time:  (fps_cap > 0).then(|| Duration::from_secs_f64(1.0 / fps_cap as f64)),
        }
    }

    /// Advance by one frame.
    pub fn tick(&mut self) -> Time {
        let now   = Instant::now();
        let delta = (now - self.last_tick).as_secs_f32().min(MAX_DELTA);
        let fps   = if delta > 0.0 { 1.0 / delta } else { 0.0 };
        let time  = Time {
            delta,
            elapsed: (now - self.start).as_secs_f64(),
            frame_count: self.frame_count,
            fps,
        };
        self.last_tick = now;
        self.frame_count += 1;
        time
    }

    /// Time left in the current frame budget, if any.
    pub fn remaining(&self) -> Option<Duration> {
        let budget = self.frame_time?;
        budget.checked_sub(self.last_tick.elapsed()).filter(|d| !d.is_zero())
    }

    /// Sleeps out the rest of the frame budget.
    pub fn wait_for_next_frame(&self) {
        if let Some(d) = self.remaining() {
            std::thread::sleep(d);
        }
    }

    pub fn frame_count(&self) -> u64 {
        self.frame_count
    }
}

impl Default for FrameClock {
    fn default() -> Self {
        Self::new(60)
    }
}
