//! Tick source
//!
//! Caps the frame loop at the target rate and reports how long each frame
//! really took. Stalls are capped, never caught up.

use std::thread;
use std::time::{Duration, Instant};

use crate::consts::MAX_FRAME_DT;

/// Supplies elapsed seconds per frame
pub trait TickSource {
    fn tick(&mut self) -> f32;
}

/// Clamp a measured frame duration to the largest step the simulation accepts
pub fn cap_frame_dt(elapsed: Duration) -> f32 {
    elapsed.as_secs_f32().min(MAX_FRAME_DT)
}

/// Wall-clock frame limiter
#[derive(Debug)]
pub struct FrameClock {
    budget: Duration,
    last: Instant,
}

impl FrameClock {
    pub fn new(target_fps: f32) -> Self {
        Self {
            budget: Duration::from_secs_f32(1.0 / target_fps),
            last: Instant::now(),
        }
    }
}

impl TickSource for FrameClock {
    /// Sleep out the rest of the frame budget, then report the frame time
    fn tick(&mut self) -> f32 {
        let spent = self.last.elapsed();
        if spent < self.budget {
            thread::sleep(self.budget - spent);
        }
        let now = Instant::now();
        let dt = cap_frame_dt(now - self.last);
        self.last = now;
        dt
    }
}

/// Constant step, for headless runs and tests
#[derive(Debug, Clone, Copy)]
pub struct FixedStep(pub f32);

impl TickSource for FixedStep {
    fn tick(&mut self) -> f32 {
        self.0
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_long_frames_are_capped() {
        assert_eq!(cap_frame_dt(Duration::from_secs(2)), MAX_FRAME_DT);
        assert!((cap_frame_dt(Duration::from_millis(16)) - 0.016).abs() < 1e-6);
    }

    #[test]
    fn test_clock_never_runs_fast() {
        let mut clock = FrameClock::new(200.0);
        let dt = clock.tick();
        assert!(dt >= 0.004, "frame took {dt}");
        assert!(dt <= MAX_FRAME_DT);
    }
}
