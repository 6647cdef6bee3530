//! Platform-agnostic host events.
//!
//! The native viewer and the web host translate their own callbacks into
//! [`HostEvent`] values and feed them to the animator in delivery order.

/// Drawable size in physical pixels.
#[derive(Debug, Clone, Copy, PartialEq, Eq, Hash)]
pub struct ViewportSize {
    /// Width in pixels.
    pub width: u32,
    /// Height in pixels.
    pub height: u32,
}

impl ViewportSize {
    /// Viewport of `width` x `height` pixels.
    #[must_use]
    pub fn new(width: u32, height: u32) -> Self {
        Self { width, height }
    }

    /// `width / height`, or 1.0 for a zero-height viewport.
    #[must_use]
    pub fn aspect(&self) -> f32 {
        if self.height == 0 {
            1.0
        } else {
            self.width as f32 / self.height as f32
        }
    }

    /// Whether either dimension is zero (e.g. a minimised window).
    #[must_use]
    pub fn is_empty(&self) -> bool {
        self.width == 0 || self.height == 0
    }
}

impl From<(u32, u32)> for ViewportSize {
    fn from((width, height): (u32, u32)) -> Self {
        Self { width, height }
    }
}

/// Notification from the embedding host.
#[derive(Debug, Clone, Copy, PartialEq)]
pub enum HostEvent {
    /// The drawable area changed size.
    Resized {
        /// New width in pixels.
        width: u32,
        /// New height in pixels.
        height: u32,
    },
    /// The display is ready for a new frame.
    Frame {
        /// Current vertical page scroll, in pixels.
        scroll_offset: f64,
    },
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn aspect_ratio() {
        assert!((ViewportSize::new(1920, 1080).aspect() - 16.0 / 9.0).abs() < 1e-6);
        assert_eq!(ViewportSize::new(800, 0).aspect(), 1.0);
    }

    #[test]
    fn empty_viewports() {
        assert!(ViewportSize::new(0, 600).is_empty());
        assert!(ViewportSize::new(800, 0).is_empty());
        assert!(!ViewportSize::from((800, 600)).is_empty());
    }
}
