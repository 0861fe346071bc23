// trellis/src/pipeline/mod.rs

//! Defines the `Pipeline` struct, its step registration facade, and the
//! build driver that brings targets up to date.

pub mod definition;
pub mod execution;

// Re-export the main Pipeline struct and the build outcome
pub use definition::Pipeline;
pub use execution::BuildSummary;
