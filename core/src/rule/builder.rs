// trellis/src/rule/builder.rs

//! Turns a step name plus a `DependencySpec` into a `StepRule`: a
//! path-pattern matcher paired with a prerequisite resolver. Rule
//! construction is a pure function over an explicit `DefinitionContext`
//! rather than process-wide registries, so two pipelines defined in the same
//! process never interfere.

use crate::core::path::decompose;
use crate::error::TrellisResult;
use crate::rule::spec::{DependencySpec, PathRewriter};
use std::collections::HashMap;
use tracing::{event, Level};

/// Mutable state accumulated while a pipeline is being defined.
///
/// Holds the ordered list of declared steps, the "last step" pointer that
/// drives implicit chaining, the pending free-text description, and the
/// description registry. Step definition order matters: `DependencySpec::Auto`
/// resolves against whichever step was declared immediately before.
#[derive(Debug, Default)]
pub struct DefinitionContext {
  steps: Vec<String>,
  last_step: Option<String>,
  pending_description: Option<String>,
  descriptions: HashMap<String, String>,
}

impl DefinitionContext {
  pub fn new() -> Self {
    Self::default()
  }

  /// Stores a free-text description to be attached to the next rule built.
  pub fn set_pending_description(&mut self, text: impl Into<String>) {
    self.pending_description = Some(text.into());
  }

  /// Appends a step name to the ordered declared-step list.
  ///
  /// The list is bookkeeping for introspection only; execution order is
  /// whatever the build driver derives from staleness.
  pub fn declare(&mut self, name: impl Into<String>) {
    self.steps.push(name.into());
  }

  pub fn declared_steps(&self) -> &[String] {
    &self.steps
  }

  /// The accumulated `step name -> "name: description"` registry.
  pub fn descriptions(&self) -> &HashMap<String, String> {
    &self.descriptions
  }

  pub fn last_step(&self) -> Option<&str> {
    self.last_step.as_deref()
  }
}

/// How a matched rule resolves the prerequisite path(s) of a target.
#[derive(Clone)]
enum Resolver {
  /// Pattern-only rule: the step has no prerequisites.
  None,
  /// Rewrite the step segment of the target to each named dependency.
  Substitute(Vec<String>),
  /// User-supplied path rewrite.
  Custom(PathRewriter),
}

/// A dependency rule: matches the output paths belonging to one step and
/// computes the prerequisite paths for any matched target.
#[derive(Clone)]
pub struct StepRule {
  step: String,
  resolver: Resolver,
}

impl StepRule {
  pub fn step_name(&self) -> &str {
    &self.step
  }

  /// Whether `path` is an output of this rule's step, i.e. its
  /// second-to-last segment equals the step name. Anchored on segments, the
  /// pattern matches the step anywhere in the path without being fooled by
  /// the step name recurring inside the prefix or the job name.
  pub fn matches(&self, path: &str) -> bool {
    decompose(path).map(|parts| parts.step == self.step).unwrap_or(false)
  }

  /// Resolves the prerequisite paths for a concrete target path.
  ///
  /// Substitution works on the decomposed `{prefix, step, job}` triple and
  /// rebuilds `prefix/<dependency>/job` per dependency, preserving job
  /// identity across steps.
  pub fn prerequisites(&self, path: &str) -> TrellisResult<Vec<String>> {
    match &self.resolver {
      Resolver::None => Ok(Vec::new()),
      Resolver::Substitute(deps) => {
        let parts = decompose(path)?;
        Ok(deps.iter().map(|dep| parts.with_step(dep).join()).collect())
      }
      Resolver::Custom(rewrite) => rewrite(path),
    }
  }
}

impl std::fmt::Debug for StepRule {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    let resolver = match &self.resolver {
      Resolver::None => "none".to_string(),
      Resolver::Substitute(deps) => format!("substitute {:?}", deps),
      Resolver::Custom(_) => "custom".to_string(),
    };
    f.debug_struct("StepRule")
      .field("step", &self.step)
      .field("resolver", &resolver)
      .finish()
  }
}

/// Builds the dependency rule for `name` against the definition context.
///
/// Consumes the pending description (if one was declared) into the
/// description registry, resolves `DependencySpec::Auto` against the context's
/// "last step" pointer, and finally moves that pointer to `name` so the
/// *next* `Auto` step chains onto this one.
pub fn build_rule(ctx: &mut DefinitionContext, name: &str, spec: DependencySpec) -> StepRule {
  if let Some(description) = ctx.pending_description.take() {
    ctx
      .descriptions
      .insert(name.to_string(), format!("{}: {}", name, description));
  }

  let resolver = match spec {
    DependencySpec::Auto => match ctx.last_step.clone() {
      Some(previous) => {
        event!(Level::DEBUG, step = name, dependency = %previous, "Implicitly chaining step to its predecessor.");
        Resolver::Substitute(vec![previous])
      }
      None => {
        event!(Level::DEBUG, step = name, "First step of the pipeline; rule is pattern-only.");
        Resolver::None
      }
    },
    DependencySpec::Steps(deps) => {
      event!(Level::DEBUG, step = name, dependencies = ?deps, "Step depends on named predecessors.");
      Resolver::Substitute(deps)
    }
    DependencySpec::Custom(rewrite) => {
      event!(Level::DEBUG, step = name, "Step uses a custom prerequisite rewriter.");
      Resolver::Custom(rewrite)
    }
  };

  ctx.last_step = Some(name.to_string());

  StepRule {
    step: name.to_string(),
    resolver,
  }
}
