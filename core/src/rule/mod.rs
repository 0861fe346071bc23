// trellis/src/rule/mod.rs

//! Dependency rule construction: a step name plus a dependency declaration
//! become a (pattern, prerequisite-resolver) pair.

pub mod builder;
pub mod spec;

pub use builder::{build_rule, DefinitionContext, StepRule};
pub use spec::{DependencySpec, PathRewriter};
