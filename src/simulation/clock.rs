//! Frame pacing

use std::time::{Duration, Instant};

/// Caps the loop rate and reports elapsed time between ticks
pub struct FrameClock {
    last: Instant,
    /// Longest step ever reported, in seconds
    max_step: f32,
}

impl FrameClock {
    pub fn new(max_step: f32) -> Self {
        Self {
            last: Instant::now(),
            max_step,
        }
    }

    /// Sleep out the rest of this frame's budget at `fps`, then return
    /// seconds since the previous tick (clamped to `max_step`)
    pub fn tick(&mut self, fps: u32) -> f32 {
        if fps > 0 {
            let budget = Duration::from_secs_f64(1.0 / fps as f64);
            let elapsed = self.last.elapsed();
            if elapsed < budget {
                std::thread::sleep(budget - elapsed);
            }
        }

        let now = Instant::now();
        let dt = now.duration_since(self.last).as_secs_f32();
        self.last = now;
        dt.min(self.max_step)
    }
}
