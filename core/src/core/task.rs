// trellis/src/core/task.rs

//! Defines the `Task` handed to step handlers: the target path being built
//! plus its resolved prerequisite paths.

use crate::error::TrellisResult;
use crate::io::Payload;

/// One invocation of a step rule: the concrete target path and the
/// prerequisite paths the rule resolved for it.
///
/// Handlers receive the task explicitly — there is no ambient "current task"
/// state, so nothing races when the surrounding application decides to run
/// several pipelines side by side.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct Task {
  name: String,
  prerequisites: Vec<String>,
}

impl Task {
  pub fn new(name: impl Into<String>, prerequisites: Vec<String>) -> Self {
    Self {
      name: name.into(),
      prerequisites,
    }
  }

  /// The target path this task produces (its canonical `prefix/step/job`).
  pub fn name(&self) -> &str {
    &self.name
  }

  /// Prerequisite paths, in the order the rule resolved them.
  pub fn prerequisites(&self) -> &[String] {
    &self.prerequisites
  }

  /// The default input source for a step: its first prerequisite.
  pub fn first_prerequisite(&self) -> Option<&str> {
    self.prerequisites.first().map(String::as_str)
  }

  /// The job component of the target path (its final segment), shared by
  /// every step that processes this unit of work.
  pub fn job_name(&self) -> &str {
    self.name.rsplit('/').next().unwrap_or(&self.name)
  }
}

/// Type alias for a registered step handler.
///
/// A handler takes the task being built and returns the step's output:
/// `None` writes nothing, `Some(Payload)` is persisted to the task's target
/// path by the build driver. Handler errors abort the build of the target.
pub type StepHandler = Box<dyn Fn(&Task) -> TrellisResult<Option<Payload>> + Send + Sync>;
