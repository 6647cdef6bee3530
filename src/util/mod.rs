//! Small standalone helpers.

/// Frame pacing and FPS tracking.
pub mod frame_timing;
