// trellis/src/rule/spec.rs

//! Defines `DependencySpec`: how a step declares where its input comes from.

use crate::error::TrellisResult;
use std::sync::Arc;

/// Type alias for a user-supplied prerequisite rewriter.
///
/// Given a concrete target path, returns the prerequisite path(s) for it.
/// Uses Arc to be easily cloneable and shareable.
pub type PathRewriter = Arc<dyn Fn(&str) -> TrellisResult<Vec<String>> + Send + Sync + 'static>;

/// The dependency declaration attached to a step definition.
#[derive(Clone)]
pub enum DependencySpec {
  /// No explicit dependency: chain to the most recently defined step, or
  /// have no prerequisites if this is the first step of the pipeline.
  Auto,
  /// One or more named predecessor steps. A single name is the
  /// fixed-substitution case; several names fan in, yielding one
  /// prerequisite path per name.
  Steps(Vec<String>),
  /// An arbitrary path rewrite, for layouts the step/job convention cannot
  /// express.
  Custom(PathRewriter),
}

impl DependencySpec {
  /// Dependency on a single named step.
  pub fn step(name: impl Into<String>) -> Self {
    DependencySpec::Steps(vec![name.into()])
  }

  /// Fan-in dependency on several named steps.
  pub fn steps<I, S>(names: I) -> Self
  where
    I: IntoIterator<Item = S>,
    S: Into<String>,
  {
    DependencySpec::Steps(names.into_iter().map(Into::into).collect())
  }

  /// Custom prerequisite resolution from a path-rewriting closure.
  pub fn custom(f: impl Fn(&str) -> TrellisResult<Vec<String>> + Send + Sync + 'static) -> Self {
    DependencySpec::Custom(Arc::new(f))
  }
}

// PathRewriter (Arc<dyn Fn...>) doesn't implement Debug, so provide a
// placeholder debug output.
impl std::fmt::Debug for DependencySpec {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    match self {
      DependencySpec::Auto => f.write_str("DependencySpec::Auto"),
      DependencySpec::Steps(names) => f.debug_tuple("DependencySpec::Steps").field(names).finish(),
      DependencySpec::Custom(_) => f.write_str("DependencySpec::Custom(..)"),
    }
  }
}
