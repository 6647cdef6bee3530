//! Scroll-following perspective camera.
//!
//! The camera sits at the origin looking down -Z; page scroll moves it along
//! Y and a viewport resize replaces it with a fresh projection.

/// GPU uniform buffer and bind group for the camera.
pub mod controller;
/// Core camera struct and GPU uniform types.
pub mod core;
