//! Post-processing effect passes.
//!
//! Provides Unreal-style bloom and the final output copy to the surface,
//! arranged in an ordered [`chain::PassChain`].

pub mod bloom;
pub mod chain;
pub mod output;
pub mod screen_pass;
