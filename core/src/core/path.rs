// trellis/src/core/path.rs

//! The path decomposer: every pipeline-managed path has the shape
//! `prefix/step/job`, and this module takes it apart and puts it back
//! together.

use crate::error::{TrellisError, TrellisResult};

/// The three components of a pipeline-managed path.
///
/// `job` is the final path segment (the unit of work), `step` is the single
/// segment before it (the pipeline stage), and `prefix` is everything else,
/// normalized to `"."` when the path has only two segments.
#[derive(Debug, Clone, PartialEq, Eq)]
pub struct PathParts {
  pub prefix: String,
  pub step: String,
  pub job: String,
}

impl PathParts {
  /// Rebuilds the `prefix/step/job` path string.
  pub fn join(&self) -> String {
    format!("{}/{}/{}", self.prefix, self.step, self.job)
  }

  /// Returns the parts for the same job under a different step.
  ///
  /// This is the basis of dependency rewriting: the prerequisite of
  /// `work/revert/job1` under step `parse` is `work/parse/job1`. Operating
  /// on parsed segments (instead of substring substitution on the raw path)
  /// keeps the rewrite unambiguous even when a step name happens to recur
  /// inside the prefix or the job name.
  pub fn with_step(&self, step: impl Into<String>) -> PathParts {
    PathParts {
      prefix: self.prefix.clone(),
      step: step.into(),
      job: self.job.clone(),
    }
  }
}

/// Splits a pipeline path on its last two separators.
///
/// A path with a single separator (`step/job`) gets prefix `"."`. A path
/// with no separator at all violates the layout precondition and fails with
/// [`TrellisError::MalformedPath`] — callers must hand in paths with at
/// least two levels.
pub fn decompose(path: &str) -> TrellisResult<PathParts> {
  let (rest, job) = path.rsplit_once('/').ok_or_else(|| TrellisError::MalformedPath {
    path: path.to_string(),
  })?;

  let (prefix, step) = match rest.rsplit_once('/') {
    Some((before, step)) if !before.is_empty() => (before.to_string(), step.to_string()),
    Some((_, step)) => (".".to_string(), step.to_string()),
    None => (".".to_string(), rest.to_string()),
  };

  if step.is_empty() || job.is_empty() {
    return Err(TrellisError::MalformedPath {
      path: path.to_string(),
    });
  }

  Ok(PathParts {
    prefix,
    step,
    job: job.to_string(),
  })
}
