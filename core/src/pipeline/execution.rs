// trellis/src/pipeline/execution.rs

//! Contains the `Pipeline::build()` method: a minimal synchronous file-task
//! driver over the registered rules.
//!
//! Building a target walks the inferred dependency graph depth-first: each
//! prerequisite is built before its dependent, and a target's handler runs
//! only when the target file is missing or older than one of its
//! prerequisites. Execution is strictly one task at a time.

use crate::core::task::Task;
use crate::error::{TrellisError, TrellisResult};
use crate::io::save_output;
use crate::pipeline::definition::Pipeline;
use std::fs;
use std::io::ErrorKind;
use std::path::Path;
use std::time::SystemTime;
use tracing::{event, span, Level};

/// Outcome of a `build` call: which targets were (re)built, in the order
/// their handlers ran.
#[derive(Debug, Clone, Default, PartialEq, Eq)]
pub struct BuildSummary {
  rebuilt: Vec<String>,
}

impl BuildSummary {
  /// Targets whose handlers were invoked, in execution order.
  pub fn rebuilt(&self) -> &[String] {
    &self.rebuilt
  }

  pub fn was_rebuilt(&self, target: &str) -> bool {
    self.rebuilt.iter().any(|t| t == target)
  }

  /// True when every requested target was already up to date.
  pub fn is_fresh(&self) -> bool {
    self.rebuilt.is_empty()
  }
}

impl Pipeline {
  /// Brings `target` up to date, building stale or missing prerequisites
  /// first.
  ///
  /// A path with no matching rule is treated as a source file and must
  /// already exist; otherwise the build fails with
  /// [`TrellisError::NoRuleForTarget`]. Handler failures abort the build at
  /// the failing task, leaving earlier outputs in place.
  pub fn build(&self, target: &str) -> TrellisResult<BuildSummary> {
    let build_span = span!(Level::INFO, "pipeline_build", target_path = target);
    let _guard = build_span.enter();

    let mut summary = BuildSummary::default();
    let mut in_progress = Vec::new();
    self.build_target(target, &mut in_progress, &mut summary)?;

    event!(Level::DEBUG, rebuilt = summary.rebuilt.len(), "Build finished.");
    Ok(summary)
  }

  fn build_target(
    &self,
    target: &str,
    in_progress: &mut Vec<String>,
    summary: &mut BuildSummary,
  ) -> TrellisResult<()> {
    if in_progress.iter().any(|t| t == target) {
      event!(Level::ERROR, target_path = target, "Dependency cycle in inferred graph.");
      return Err(TrellisError::DependencyCycle {
        target: target.to_string(),
      });
    }

    let Some(entry) = self.rule_matching(target) else {
      // No rule: acceptable only for pre-existing source files.
      if Path::new(target).exists() {
        event!(Level::TRACE, target_path = target, "No rule; existing file treated as source.");
        return Ok(());
      }
      return Err(TrellisError::NoRuleForTarget {
        target: target.to_string(),
      });
    };

    in_progress.push(target.to_string());
    let prerequisites = entry.rule.prerequisites(target)?;
    for prerequisite in &prerequisites {
      self.build_target(prerequisite, in_progress, summary)?;
    }

    if is_stale(target, &prerequisites)? {
      let step_span = span!(
        Level::INFO,
        "step_task",
        step = entry.rule.step_name(),
        target_path = target
      );
      let _step_guard = step_span.enter();
      event!(Level::DEBUG, prerequisites = ?prerequisites, "Target stale; invoking handler.");

      let task = Task::new(target, prerequisites);
      let output = (entry.handler)(&task)?;
      save_output(&task, output)?;
      summary.rebuilt.push(target.to_string());
    } else {
      event!(Level::TRACE, target_path = target, "Target up to date.");
    }

    in_progress.pop();
    Ok(())
  }
}

/// A target is stale when it is missing or older than any prerequisite.
fn is_stale(target: &str, prerequisites: &[String]) -> TrellisResult<bool> {
  let target_mtime = match mtime(target) {
    Ok(t) => t,
    Err(TrellisError::Io { ref source, .. }) if source.kind() == ErrorKind::NotFound => {
      return Ok(true);
    }
    Err(err) => return Err(err),
  };

  for prerequisite in prerequisites {
    // Prerequisites were just built (or verified as sources); a missing one
    // here is a genuine I/O failure, not a scheduling gap.
    if mtime(prerequisite)? > target_mtime {
      return Ok(true);
    }
  }
  Ok(false)
}

fn mtime(path: &str) -> TrellisResult<SystemTime> {
  let io_err = |source| TrellisError::Io {
    path: path.to_string(),
    source,
  };
  fs::metadata(path).map_err(io_err)?.modified().map_err(io_err)
}
