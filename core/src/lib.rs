// src/lib.rs

//! Trellis: a convention-driven, file-backed step pipeline for Rust.
//!
//! A pipeline is a sequence of named steps, each step one directory level in
//! a managed path of the shape `prefix/step/job`. Dependency edges are
//! inferred from the path structure instead of declared per target:
//!  - Steps chain implicitly onto the previously defined step, or declare
//!    fixed / fan-in / fully custom dependencies.
//!  - A step handler's return value is persisted transparently: text is
//!    written verbatim, structured values are serialized generically.
//!  - The next step loads that output back with the content classifier
//!    deciding between the two representations.
//!  - A per-job `.info` side-document accumulates metadata across steps.
//!  - A minimal synchronous build driver re-runs handlers only for targets
//!    that are missing or older than their prerequisites.
//!
//! The classifier is a heuristic: a serialized value whose first kilobyte is
//! entirely printable ASCII would load as text. In practice the generic
//! encoding emits non-printable framing bytes almost immediately, but short
//! hand-crafted payloads can be misclassified.

// Declare modules according to the planned structure
pub mod core;
pub mod error;
pub mod info;
pub mod io;
pub mod pipeline;
pub mod rule;

// --- Re-exports for the Public API ---

// Core types that users will interact with frequently
pub use crate::core::content::is_binary;
pub use crate::core::path::{decompose, PathParts};
pub use crate::core::task::{StepHandler, Task};

// Dependency declaration and rule construction
pub use crate::rule::builder::{build_rule, DefinitionContext, StepRule};
pub use crate::rule::spec::{DependencySpec, PathRewriter};

// The typed I/O layer and the per-job metadata store
pub use crate::info::{info_path, load_info, save_info, InfoMap};
pub use crate::io::{input_path, load_data, load_input, load_text, output_path, save_output, Payload};

// The main Pipeline struct and the build driver outcome
pub use crate::pipeline::definition::Pipeline;
pub use crate::pipeline::execution::BuildSummary;

pub use crate::error::{TrellisError, TrellisResult};

/*
    Core Workflow:
    1. Create a `Pipeline` instance.
    2. Define steps in pipeline order with `pipeline.step(name, deps, handler)`;
       use `DependencySpec::Auto` to chain onto the previous step, or
       `DependencySpec::steps([...])` to fan in several predecessors.
    3. Handlers read their input with `load_text` / `load_data::<T>` and
       return `Some(Payload)` (or `None` to write nothing).
    4. Call `pipeline.build("work/<step>/<job>")`; stale or missing
       prerequisites are built first, fresh targets are left alone.
    5. Use `load_info` / `save_info` inside handlers to accumulate per-job
       metadata under `work/.info/`.
*/
