// -- Lint policy ---------------------------------------------------------
// This is the single source of truth for crate-wide lints.

// Broad lint groups
#![deny(clippy::all)]
#![deny(clippy::pedantic)]
#![deny(clippy::nursery)]
// Documentation
#![deny(missing_docs)]
#![deny(rustdoc::broken_intra_doc_links)]
#![deny(rustdoc::private_intra_doc_links)]
#![deny(rustdoc::bare_urls)]
// No panicking in library code
#![deny(clippy::unwrap_used)]
#![deny(clippy::expect_used)]
#![deny(clippy::panic)]
#![deny(clippy::todo)]
#![deny(clippy::unimplemented)]
// No debug/print artifacts
#![deny(clippy::dbg_macro)]
#![deny(clippy::print_stdout)]
#![deny(clippy::print_stderr)]
// Import hygiene
#![deny(clippy::wildcard_imports)]
// Complexity limits (thresholds in clippy.toml)
#![deny(clippy::cognitive_complexity)]
#![deny(clippy::too_many_lines)]
#![deny(clippy::excessive_nesting)]
// Function signature hygiene
#![deny(clippy::too_many_arguments)]
#![deny(clippy::fn_params_excessive_bools)]
// Clone / pass-by-value hygiene
#![deny(clippy::needless_pass_by_value)]
#![deny(clippy::implicit_clone)]
// String hygiene
#![deny(clippy::inefficient_to_string)]
#![deny(clippy::redundant_closure_for_method_calls)]
#![deny(clippy::manual_string_new)]
#![deny(clippy::str_to_string)]
// Cargo lints (warn, not deny since cargo lints can be noisy)
#![warn(clippy::cargo)]
// Unused / redundant code
#![deny(unused_results)]
#![deny(unused_qualifications)]
// Cast hygiene
#![deny(trivial_casts)]
#![deny(trivial_numeric_casts)]

//! Animated capsule-grid background with bloom, built on wgpu.
//!
//! A grid of instanced capsules is laid out from a single instance count,
//! shaded with a hemisphere plus directional light into an HDR target, and
//! finished with an Unreal-style bloom. The camera drifts vertically with the
//! host page's scroll offset.
//!
//! # Key entry points
//!
//! - [`animator::InstancedGridAnimator`] - owns layout, camera and run state;
//!   feed it [`host::HostEvent`]s
//! - [`animator::Compositor`] - the rendering seam the animator drives
//! - [`renderer::GridRenderer`] - the wgpu compositor
//! - [`layout::GridConfiguration`] - the instance layout algorithm
//! - [`options::Options`] - runtime configuration (grid, camera, lighting,
//!   bloom, surface)
//!
//! # Hosts
//!
//! With the `viewer` feature, `viewer::Viewer` opens a native window and
//! maps the mouse wheel to a virtual scroll offset. With the `web` feature on
//! `wasm32`, `web::create_backdrop` attaches a full-viewport canvas behind
//! the page and drives the animator from `requestAnimationFrame`.

pub mod animator;
pub mod camera;
pub mod error;
pub mod gpu;
pub mod host;
pub mod layout;
pub mod options;
pub mod renderer;
pub mod scene;
pub mod util;
#[cfg(feature = "viewer")]
pub mod viewer;
#[cfg(all(feature = "web", target_arch = "wasm32"))]
pub mod web;

pub use animator::{AnimatorState, Compositor, InstancedGridAnimator};
pub use error::GridGlowError;
pub use host::{HostEvent, ViewportSize};
pub use layout::GridConfiguration;
pub use options::Options;
pub use renderer::GridRenderer;
pub use scene::SceneGraph;
