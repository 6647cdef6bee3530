use web_time::{Duration, Instant};

/// Log the smoothed frame rate every this many frames.
const FPS_LOG_INTERVAL: u64 = 600;

/// Minimum time between frames for a frame cap (0 = uncapped).
#[must_use]
pub fn frame_interval(max_fps: u32) -> Duration {
    if max_fps > 0 {
        Duration::from_secs_f64(1.0 / f64::from(max_fps))
    } else {
        Duration::ZERO
    }
}

/// Frame pacing with a smoothed FPS estimate.
#[derive(Debug)]
pub struct FrameTiming {
    min_frame_duration: Duration,
    last_frame: Instant,
    smoothed_fps: f32,
    /// Weight of the newest sample in the moving average.
    smoothing: f32,
    frames: u64,
}

impl FrameTiming {
    /// Timer capped at `max_fps` frames per second (0 = uncapped).
    #[must_use]
    pub fn new(max_fps: u32) -> Self {
        Self {
            min_frame_duration: frame_interval(max_fps),
            last_frame: Instant::now(),
            smoothed_fps: 60.0,
            smoothing: 0.05,
            frames: 0,
        }
    }

    /// Whether enough time has passed since the last frame to draw another.
    #[must_use]
    pub fn should_render(&self) -> bool {
        self.min_frame_duration.is_zero()
            || self.last_frame.elapsed() >= self.min_frame_duration
    }

    /// Record that a frame was drawn.
    pub fn end_frame(&mut self) {
        let now = Instant::now();
        let frame_time = now.duration_since(self.last_frame).as_secs_f32();
        self.last_frame = now;
        self.frames += 1;

        if frame_time > 0.0 {
            self.smoothed_fps = self.smoothed_fps * (1.0 - self.smoothing)
                + (1.0 / frame_time) * self.smoothing;
        }
        if self.frames % FPS_LOG_INTERVAL == 0 {
            log::debug!("{} frames, {:.1} fps", self.frames, self.smoothed_fps);
        }
    }

    /// Smoothed frames per second.
    #[must_use]
    pub fn fps(&self) -> f32 {
        self.smoothed_fps
    }

    /// Frames drawn so far.
    #[must_use]
    pub fn frame_count(&self) -> u64 {
        self.frames
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn uncapped_always_renders() {
        let timing = FrameTiming::new(0);
        assert_eq!(frame_interval(0), Duration::ZERO);
        assert!(timing.should_render());
    }

    #[test]
    fn cap_sets_interval() {
        assert!((frame_interval(50).as_secs_f64() - 0.02).abs() < 1e-9);
    }

    #[test]
    fn capped_timer_waits_after_a_frame() {
        // One frame per hour: the second frame is never due within a test.
        let mut timing = FrameTiming::new(0);
        timing.min_frame_duration = Duration::from_secs(3600);
        timing.end_frame();
        assert!(!timing.should_render());
        assert_eq!(timing.frame_count(), 1);
    }
}
