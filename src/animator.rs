//! The instanced grid animator.
//!
//! Owns the grid layout, the camera and the run state, and drives a
//! [`Compositor`] from host events:
//!
//! - `Resized`: fresh camera for the new aspect ratio, output resized, bloom
//!   rebuilt at the new resolution.
//! - `Frame`: every instance transform recomputed, camera moved to follow the
//!   scroll offset, frame submitted.
//!
//! Lifecycle: `Idle` → [`start`](InstancedGridAnimator::start) → `Running` →
//! [`stop`](InstancedGridAnimator::stop) → `Stopped`. Frames outside
//! `Running` draw nothing. Starting again from `Stopped` resumes.

use crate::camera::core::Camera;
use crate::error::GridGlowError;
use crate::host::{HostEvent, ViewportSize};
use crate::layout::{GridConfiguration, InstanceTransform};
use crate::options::{CameraOptions, Options};
use crate::util::frame_timing::FrameTiming;

/// Everything the compositor needs to draw one frame.
#[derive(Debug, Clone, Copy)]
pub struct FrameSubmission<'a> {
    /// Model matrix of every instance, in index order.
    pub instances: &'a [InstanceTransform],
    /// Camera for this frame.
    pub camera: &'a Camera,
}

/// Rendering surface driven by the animator.
///
/// [`GridRenderer`](crate::renderer::GridRenderer) is the wgpu
/// implementation.
pub trait Compositor {
    /// Resize the output surface and every full-resolution target.
    fn set_size(&mut self, viewport: ViewportSize);

    /// Replace the bloom stage with one built for `viewport`, keeping its
    /// position in the post-processing chain.
    ///
    /// # Errors
    ///
    /// Returns an error if the new bloom stage cannot be built.
    fn rebuild_bloom(&mut self, viewport: ViewportSize)
        -> Result<(), GridGlowError>;

    /// Draw and present one frame.
    ///
    /// # Errors
    ///
    /// Returns an error if the frame cannot be acquired or drawn.
    fn render(&mut self, frame: &FrameSubmission<'_>)
        -> Result<(), GridGlowError>;
}

/// Run state of an [`InstancedGridAnimator`].
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum AnimatorState {
    /// Constructed, never started.
    Idle,
    /// Drawing on every frame event.
    Running,
    /// Stopped by the host.
    Stopped,
}

/// Lays out the capsule grid and feeds it to a [`Compositor`].
pub struct InstancedGridAnimator<C: Compositor> {
    compositor: C,
    grid: GridConfiguration,
    camera: Camera,
    camera_options: CameraOptions,
    viewport: ViewportSize,
    state: AnimatorState,
    frame_timing: FrameTiming,
}

impl<C: Compositor> InstancedGridAnimator<C> {
    /// Idle animator for a compositor already sized to `viewport`.
    pub fn new(compositor: C, options: &Options, viewport: ViewportSize) -> Self {
        Self {
            compositor,
            grid: GridConfiguration::from_options(&options.grid),
            camera: Camera::new(&options.camera, viewport.aspect()),
            camera_options: options.camera.clone(),
            viewport,
            state: AnimatorState::Idle,
            frame_timing: FrameTiming::new(options.surface.max_fps),
        }
    }

    /// Begin (or resume) drawing on frame events.
    pub fn start(&mut self) {
        if self.state != AnimatorState::Running {
            log::info!("animator started ({:?} -> Running)", self.state);
            self.state = AnimatorState::Running;
        }
    }

    /// Stop drawing. No-op unless running.
    pub fn stop(&mut self) {
        if self.state == AnimatorState::Running {
            log::info!("animator stopped");
            self.state = AnimatorState::Stopped;
        }
    }

    /// Current run state.
    #[must_use]
    pub fn state(&self) -> AnimatorState {
        self.state
    }

    /// Whether frame events draw.
    #[must_use]
    pub fn is_running(&self) -> bool {
        self.state == AnimatorState::Running
    }

    /// React to a viewport change. Zero-sized viewports are ignored.
    ///
    /// # Errors
    ///
    /// Propagates a failure to rebuild the bloom stage.
    pub fn resize(&mut self, viewport: ViewportSize) -> Result<(), GridGlowError> {
        if viewport.is_empty() {
            log::debug!(
                "ignoring empty viewport {}x{}",
                viewport.width,
                viewport.height
            );
            return Ok(());
        }
        log::info!("viewport resized to {}x{}", viewport.width, viewport.height);

        self.camera = Camera::new(&self.camera_options, viewport.aspect());
        self.compositor.set_size(viewport);
        self.compositor.rebuild_bloom(viewport)?;
        self.viewport = viewport;
        Ok(())
    }

    /// Draw one frame for the given page scroll offset.
    ///
    /// Returns `true` if a frame was submitted; `false` when not running or
    /// when the frame cap says it is too early.
    ///
    /// # Errors
    ///
    /// Propagates compositor failures (e.g. a lost surface).
    pub fn tick(&mut self, scroll_offset: f64) -> Result<bool, GridGlowError> {
        if !self.is_running() || !self.frame_timing.should_render() {
            return Ok(false);
        }

        let instances = self.grid.instance_data();
        self.camera.follow_scroll(scroll_offset);
        self.compositor.render(&FrameSubmission {
            instances: &instances,
            camera: &self.camera,
        })?;
        self.frame_timing.end_frame();
        Ok(true)
    }

    /// Dispatch a host event. Returns `true` if a frame was submitted.
    ///
    /// # Errors
    ///
    /// See [`resize`](Self::resize) and [`tick`](Self::tick).
    pub fn handle_event(&mut self, event: HostEvent) -> Result<bool, GridGlowError> {
        match event {
            HostEvent::Resized { width, height } => {
                self.resize(ViewportSize::new(width, height))?;
                Ok(false)
            }
            HostEvent::Frame { scroll_offset } => self.tick(scroll_offset),
        }
    }

    /// Active camera.
    #[must_use]
    pub fn camera(&self) -> &Camera {
        &self.camera
    }

    /// Grid layout.
    #[must_use]
    pub fn grid(&self) -> &GridConfiguration {
        &self.grid
    }

    /// Last accepted viewport.
    #[must_use]
    pub fn viewport(&self) -> ViewportSize {
        self.viewport
    }

    /// Smoothed frame rate.
    #[must_use]
    pub fn fps(&self) -> f32 {
        self.frame_timing.fps()
    }

    /// The driven compositor.
    #[must_use]
    pub fn compositor(&self) -> &C {
        &self.compositor
    }

    /// Mutable access to the driven compositor.
    pub fn compositor_mut(&mut self) -> &mut C {
        &mut self.compositor
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::renderer::postprocess::chain::PassChain;
    use crate::renderer::postprocess::screen_pass::PassKind;

    #[derive(Debug, Clone, PartialEq)]
    enum Call {
        SetSize(ViewportSize),
        RebuildBloom(ViewportSize),
        Render {
            instances: Vec<InstanceTransform>,
            camera: Camera,
        },
    }

    /// Records every call and keeps a pass chain shaped like the real one.
    struct RecordingCompositor {
        calls: Vec<Call>,
        chain: PassChain<(PassKind, ViewportSize)>,
    }

    impl RecordingCompositor {
        fn new(viewport: ViewportSize) -> Self {
            let mut chain = PassChain::new();
            chain.add_pass((PassKind::Bloom, viewport));
            chain.add_pass((PassKind::Output, viewport));
            Self {
                calls: Vec::new(),
                chain,
            }
        }

        fn renders(&self) -> Vec<(&[InstanceTransform], &Camera)> {
            self.calls
                .iter()
                .filter_map(|c| match c {
                    Call::Render { instances, camera } => {
                        Some((instances.as_slice(), camera))
                    }
                    _ => None,
                })
                .collect()
        }
    }

    impl Compositor for RecordingCompositor {
        fn set_size(&mut self, viewport: ViewportSize) {
            self.calls.push(Call::SetSize(viewport));
        }

        fn rebuild_bloom(
            &mut self,
            viewport: ViewportSize,
        ) -> Result<(), GridGlowError> {
            self.calls.push(Call::RebuildBloom(viewport));
            let (index, _) = self
                .chain
                .remove_pass(|(kind, _)| *kind == PassKind::Bloom)
                .expect("recording chain always holds a bloom pass");
            self.chain.insert_pass(index, (PassKind::Bloom, viewport));
            Ok(())
        }

        fn render(
            &mut self,
            frame: &FrameSubmission<'_>,
        ) -> Result<(), GridGlowError> {
            self.calls.push(Call::Render {
                instances: frame.instances.to_vec(),
                camera: frame.camera.clone(),
            });
            Ok(())
        }
    }

    const SMALL: ViewportSize = ViewportSize {
        width: 800,
        height: 600,
    };
    const LARGE: ViewportSize = ViewportSize {
        width: 1920,
        height: 1080,
    };

    fn animator(count: u32) -> InstancedGridAnimator<RecordingCompositor> {
        let mut options = Options::default();
        options.grid.instance_count = count;
        InstancedGridAnimator::new(
            RecordingCompositor::new(SMALL),
            &options,
            SMALL,
        )
    }

    #[test]
    fn ticks_before_start_draw_nothing() {
        let mut a = animator(16);
        assert_eq!(a.state(), AnimatorState::Idle);
        assert!(!a.tick(0.0).unwrap());
        assert!(a.compositor().calls.is_empty());
    }

    #[test]
    fn lifecycle_start_stop_resume() {
        let mut a = animator(16);
        a.start();
        assert!(a.is_running());
        assert!(a.tick(0.0).unwrap());

        a.stop();
        assert_eq!(a.state(), AnimatorState::Stopped);
        assert!(!a.tick(0.0).unwrap());
        assert_eq!(a.compositor().renders().len(), 1);

        a.start();
        assert!(a.tick(0.0).unwrap());
        assert_eq!(a.compositor().renders().len(), 2);
    }

    #[test]
    fn redundant_transitions_are_noops() {
        let mut a = animator(4);
        a.stop();
        assert_eq!(a.state(), AnimatorState::Idle);
        a.start();
        a.start();
        assert_eq!(a.state(), AnimatorState::Running);
    }

    #[test]
    fn tick_submits_every_instance() {
        let mut a = animator(16);
        a.start();
        let _ = a.tick(0.0).unwrap();
        let renders = a.compositor().renders();
        let (instances, _) = renders[0];
        assert_eq!(instances.len(), 16);
        // i = 5 sits at (5.2, 2.7, -2)
        let t = instances[5].model[3];
        assert!((t[0] - 5.2).abs() < 1e-5);
        assert!((t[1] - 2.7).abs() < 1e-5);
        assert!((t[2] + 2.0).abs() < 1e-5);
    }

    #[test]
    fn camera_follows_scroll() {
        let mut a = animator(16);
        a.start();
        let _ = a.tick(1500.0).unwrap();
        assert!((a.camera().eye.y + 1.5).abs() < 1e-6);
        let _ = a.tick(0.0).unwrap();
        assert_eq!(a.camera().eye.y, 0.0);

        let renders = a.compositor().renders();
        assert!((renders[0].1.eye.y + 1.5).abs() < 1e-6);
        assert_eq!(renders[1].1.eye.y, 0.0);
    }

    #[test]
    fn same_scroll_gives_identical_frames() {
        let mut a = animator(100);
        a.start();
        let _ = a.tick(321.0).unwrap();
        let _ = a.tick(321.0).unwrap();
        let renders = a.compositor().renders();
        assert_eq!(renders[0].0, renders[1].0);
        assert_eq!(renders[0].1, renders[1].1);
    }

    #[test]
    fn empty_grid_submits_no_instances() {
        let mut a = animator(0);
        a.start();
        assert!(a.tick(0.0).unwrap());
        assert!(a.compositor().renders()[0].0.is_empty());
    }

    #[test]
    fn resize_sets_size_before_rebuilding_bloom() {
        let mut a = animator(16);
        a.resize(LARGE).unwrap();
        assert_eq!(
            a.compositor().calls,
            [Call::SetSize(LARGE), Call::RebuildBloom(LARGE)]
        );
        assert_eq!(a.viewport(), LARGE);
        assert!((a.camera().aspect - 16.0 / 9.0).abs() < 1e-6);
    }

    #[test]
    fn resize_keeps_bloom_slot() {
        let mut a = animator(16);
        a.resize(LARGE).unwrap();
        let chain: Vec<_> = a.compositor().chain.iter().copied().collect();
        assert_eq!(
            chain,
            [(PassKind::Bloom, LARGE), (PassKind::Output, SMALL)]
        );
    }

    #[test]
    fn resize_after_frames_only_touches_size_and_bloom() {
        let mut a = animator(16);
        a.start();
        let _ = a.tick(0.0).unwrap();
        a.compositor_mut().calls.clear();
        a.resize(LARGE).unwrap();
        assert_eq!(
            a.compositor().calls,
            [Call::SetSize(LARGE), Call::RebuildBloom(LARGE)]
        );
    }

    #[test]
    fn resize_is_idempotent() {
        let mut a = animator(16);
        a.resize(LARGE).unwrap();
        let camera = a.camera().clone();
        a.resize(LARGE).unwrap();
        assert_eq!(*a.camera(), camera);
        assert_eq!(a.compositor().chain.len(), 2);
        assert_eq!(a.compositor().chain.position(|(k, _)| *k == PassKind::Bloom), Some(0));
    }

    #[test]
    fn resize_resets_camera_until_next_tick() {
        let mut a = animator(16);
        a.start();
        let _ = a.tick(800.0).unwrap();
        a.resize(LARGE).unwrap();
        assert_eq!(a.camera().eye.y, 0.0);
        let _ = a.tick(800.0).unwrap();
        assert!((a.camera().eye.y + 0.8).abs() < 1e-6);
    }

    #[test]
    fn resize_leaves_layout_unchanged() {
        let mut a = animator(1000);
        a.start();
        let _ = a.tick(0.0).unwrap();
        a.resize(LARGE).unwrap();
        let _ = a.tick(0.0).unwrap();
        let renders = a.compositor().renders();
        assert_eq!(renders[0].0, renders[1].0);
        assert_ne!(renders[0].1.aspect, renders[1].1.aspect);
    }

    #[test]
    fn empty_viewport_is_ignored() {
        let mut a = animator(16);
        a.resize(ViewportSize::new(0, 0)).unwrap();
        a.resize(ViewportSize::new(1024, 0)).unwrap();
        assert!(a.compositor().calls.is_empty());
        assert_eq!(a.viewport(), SMALL);
    }

    #[test]
    fn host_events_dispatch() {
        let mut a = animator(9);
        a.start();
        assert!(!a
            .handle_event(HostEvent::Resized {
                width: 1024,
                height: 768,
            })
            .unwrap());
        assert!(a
            .handle_event(HostEvent::Frame {
                scroll_offset: 100.0,
            })
            .unwrap());
        assert_eq!(a.viewport(), ViewportSize::new(1024, 768));
        assert!((a.camera().eye.y + 0.1).abs() < 1e-6);
    }
}
