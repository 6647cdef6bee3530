//! Standalone background window backed by winit.
//!
//! There is no page to scroll natively, so the mouse wheel drives a virtual
//! scroll offset (clamped at zero, like the top of a page) that is fed to the
//! animator on every redraw.
//!
//! ```no_run
//! # use gridglow::viewer::Viewer;
//! Viewer::builder()
//!     .with_title("gridglow")
//!     .build()
//!     .run()
//!     .unwrap();
//! ```

use std::sync::Arc;

use winit::{
    application::ApplicationHandler,
    event::{MouseScrollDelta, WindowEvent},
    event_loop::{ActiveEventLoop, ControlFlow, EventLoop},
    window::{Window, WindowId},
};

use crate::{
    animator::InstancedGridAnimator, error::GridGlowError, host::HostEvent,
    host::ViewportSize, options::Options, renderer::GridRenderer,
    scene::SceneGraph,
};

/// Pixels scrolled per wheel notch.
const LINE_HEIGHT_PX: f64 = 40.0;

/// Scroll offset after a wheel event. Wheel-up (positive delta) scrolls
/// toward the top; the offset never goes below zero.
fn scrolled(offset: f64, delta: MouseScrollDelta) -> f64 {
    let dy = match delta {
        MouseScrollDelta::LineDelta(_, y) => f64::from(y) * LINE_HEIGHT_PX,
        MouseScrollDelta::PixelDelta(pos) => pos.y,
    };
    (offset - dy).max(0.0)
}

// ── Builder ──────────────────────────────────────────────────────────────

/// Fluent builder for [`Viewer`].
pub struct ViewerBuilder {
    options: Option<Options>,
    title: String,
}

impl ViewerBuilder {
    /// Create a builder with sensible defaults (title "gridglow", default
    /// options).
    fn new() -> Self {
        Self {
            options: None,
            title: "gridglow".into(),
        }
    }

    /// Override the default options.
    #[must_use]
    pub fn with_options(mut self, options: Options) -> Self {
        self.options = Some(options);
        self
    }

    /// Set the window title.
    #[must_use]
    pub fn with_title(mut self, title: impl Into<String>) -> Self {
        self.title = title.into();
        self
    }

    /// Consume the builder and produce a [`Viewer`].
    #[must_use]
    pub fn build(self) -> Viewer {
        Viewer {
            options: self.options.unwrap_or_default(),
            title: self.title,
        }
    }
}

// ── Viewer ───────────────────────────────────────────────────────────────

/// A standalone window showing the animated background.
///
/// Construct via [`Viewer::builder`], then call [`run`](Self::run) to
/// enter the event loop.
pub struct Viewer {
    options: Options,
    title: String,
}

impl Viewer {
    /// Start a new builder.
    #[must_use]
    pub fn builder() -> ViewerBuilder {
        ViewerBuilder::new()
    }

    /// Open the window and run the event loop. Blocks until the window is
    /// closed.
    ///
    /// # Errors
    ///
    /// Returns [`GridGlowError::Viewer`] if the event loop cannot be created
    /// or exits with an error.
    pub fn run(self) -> Result<(), GridGlowError> {
        let event_loop = EventLoop::new()
            .map_err(|e| GridGlowError::Viewer(e.to_string()))?;
        event_loop.set_control_flow(ControlFlow::Poll);

        let mut app = ViewerApp {
            window: None,
            animator: None,
            scroll_offset: 0.0,
            options: self.options,
            title: self.title,
        };

        event_loop
            .run_app(&mut app)
            .map_err(|e| GridGlowError::Viewer(e.to_string()))
    }
}

// ── Winit app ────────────────────────────────────────────────────────────

/// Internal winit application handler.
struct ViewerApp {
    window: Option<Arc<Window>>,
    animator: Option<InstancedGridAnimator<GridRenderer>>,
    scroll_offset: f64,
    options: Options,
    title: String,
}

fn viewport_of(window: &Window) -> ViewportSize {
    let inner = window.inner_size();
    ViewportSize::new(inner.width, inner.height)
}

impl ViewerApp {
    fn dispatch(&mut self, event: HostEvent) {
        let Some(animator) = &mut self.animator else {
            return;
        };
        match animator.handle_event(event) {
            Ok(_) => {}
            Err(e) if e.is_surface_stale() => {
                // Reconfigure at the current size; the next frame recovers.
                if let Some(window) = &self.window {
                    if let Err(e) = animator.resize(viewport_of(window)) {
                        log::error!("resize after surface loss failed: {e}");
                    }
                }
            }
            Err(e) => log::error!("{e}"),
        }
    }
}

impl ApplicationHandler for ViewerApp {
    fn resumed(&mut self, event_loop: &ActiveEventLoop) {
        if self.window.is_some() {
            return;
        }

        let monitor = event_loop
            .primary_monitor()
            .or_else(|| event_loop.available_monitors().next());
        let attrs = if let Some(mon) = &monitor {
            let mon_size = mon.size();
            let scale = mon.scale_factor();
            let logical_w = (f64::from(mon_size.width) / scale * 0.75) as u32;
            let logical_h = (f64::from(mon_size.height) / scale * 0.75) as u32;
            Window::default_attributes()
                .with_title(&self.title)
                .with_inner_size(winit::dpi::LogicalSize::new(
                    logical_w, logical_h,
                ))
        } else {
            Window::default_attributes().with_title(&self.title)
        };

        let window = match event_loop.create_window(attrs) {
            Ok(w) => Arc::new(w),
            Err(e) => {
                log::error!("Failed to create window: {e}");
                event_loop.exit();
                return;
            }
        };

        let viewport = viewport_of(&window);
        let scene = SceneGraph::from_options(&self.options);
        let renderer = match pollster::block_on(GridRenderer::new(
            window.clone(),
            viewport,
            &scene,
            &self.options,
        )) {
            Ok(r) => r,
            Err(e) => {
                log::error!("Failed to initialize renderer: {e}");
                event_loop.exit();
                return;
            }
        };

        let mut animator =
            InstancedGridAnimator::new(renderer, &self.options, viewport);
        animator.start();

        window.request_redraw();
        self.window = Some(window);
        self.animator = Some(animator);
    }

    fn window_event(
        &mut self,
        event_loop: &ActiveEventLoop,
        _id: WindowId,
        event: WindowEvent,
    ) {
        if matches!(event, WindowEvent::CloseRequested) {
            if let Some(animator) = &mut self.animator {
                animator.stop();
            }
            event_loop.exit();
            return;
        }

        match event {
            WindowEvent::Resized(size) => {
                self.dispatch(HostEvent::Resized {
                    width: size.width,
                    height: size.height,
                });
            }

            WindowEvent::RedrawRequested => {
                self.dispatch(HostEvent::Frame {
                    scroll_offset: self.scroll_offset,
                });
                if let Some(w) = &self.window {
                    w.request_redraw();
                }
            }

            WindowEvent::MouseWheel { delta, .. } => {
                self.scroll_offset = scrolled(self.scroll_offset, delta);
            }

            _ => (),
        }
    }
}

#[cfg(test)]
mod tests {
    use winit::dpi::PhysicalPosition;

    use super::*;

    #[test]
    fn wheel_down_scrolls_down() {
        let offset = scrolled(0.0, MouseScrollDelta::LineDelta(0.0, -3.0));
        assert_eq!(offset, 120.0);
    }

    #[test]
    fn scroll_stops_at_top() {
        let offset = scrolled(40.0, MouseScrollDelta::LineDelta(0.0, 5.0));
        assert_eq!(offset, 0.0);
    }

    #[test]
    fn pixel_deltas_scroll_by_pixels() {
        let delta =
            MouseScrollDelta::PixelDelta(PhysicalPosition::new(0.0, -250.0));
        assert_eq!(scrolled(100.0, delta), 350.0);
    }
}
