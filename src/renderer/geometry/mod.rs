//! Procedural mesh generation.
//!
//! Meshes are generated on the CPU once at renderer construction; nothing is
//! loaded from disk.

/// Capsule (cylinder with hemispherical caps) mesh.
pub mod capsule;
