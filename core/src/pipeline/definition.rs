// trellis/src/pipeline/definition.rs

//! Contains the `Pipeline` struct definition and the step registration
//! facade: `describe` + `step` tie a step name, a dependency declaration and
//! a handler body into one registered rule.

use crate::core::task::{StepHandler, Task};
use crate::error::TrellisResult;
use crate::io::Payload;
use crate::rule::builder::{build_rule, DefinitionContext, StepRule};
use crate::rule::spec::DependencySpec;
use parking_lot::RwLock;
use std::collections::HashMap;
use tracing::{event, Level};

/// A rule registered on the pipeline: the pattern/resolver pair plus the
/// handler invoked when a matched target is stale.
pub(crate) struct RuleEntry {
  pub(crate) rule: StepRule,
  pub(crate) handler: StepHandler,
}

/// A pipeline definition: an ordered set of named steps, each one directory
/// level in the managed path space, with dependency edges inferred from the
/// path structure.
///
/// All definition state lives on this instance — two pipelines defined in
/// the same process are fully independent. Definition is expected to
/// complete before any [`build`](Pipeline::build) call; the `&mut self`
/// registration methods and `&self` build method make that ordering hard to
/// get wrong.
pub struct Pipeline {
  // Interior lock so introspection works from &self; uncontended in the
  // single-threaded definition pass.
  pub(crate) context: RwLock<DefinitionContext>,
  pub(crate) rules: Vec<RuleEntry>,
}

impl Pipeline {
  /// Creates a new, empty pipeline definition.
  pub fn new() -> Self {
    Self {
      context: RwLock::new(DefinitionContext::new()),
      rules: Vec::new(),
    }
  }

  /// Declares a free-text description for the *next* step defined.
  ///
  /// The description lands in [`step_descriptions`](Pipeline::step_descriptions)
  /// as `"<step>: <text>"` once that step is registered.
  pub fn describe(&mut self, text: impl Into<String>) {
    self.context.write().set_pending_description(text);
  }

  /// Defines a step: name, dependency declaration and handler body.
  ///
  /// The handler runs whenever a target matching `<...>/<name>/<job>` is
  /// stale or missing; its return value is persisted to the target path via
  /// the typed I/O layer (`None` writes nothing).
  ///
  /// Definition order matters: [`DependencySpec::Auto`] chains onto the step
  /// defined immediately before this one.
  ///
  /// # Panics
  ///
  /// Panics if a rule for `name` is already registered — duplicate step
  /// names are a setup error, not a runtime condition.
  pub fn step<F>(&mut self, name: &str, dependencies: DependencySpec, handler: F)
  where
    F: Fn(&Task) -> TrellisResult<Option<Payload>> + Send + Sync + 'static,
  {
    if self.rules.iter().any(|entry| entry.rule.step_name() == name) {
      panic!("trellis setup error: step '{}' already defined in this pipeline.", name);
    }

    let mut ctx = self.context.write();
    ctx.declare(name);
    let rule = build_rule(&mut ctx, name, dependencies);
    drop(ctx);

    event!(Level::DEBUG, step = name, rule = ?rule, "Registered step rule.");
    self.rules.push(RuleEntry {
      rule,
      handler: Box::new(handler),
    });
  }

  /// The declared step names, in definition order (bookkeeping only —
  /// execution order is driven by staleness, not by this list).
  pub fn steps(&self) -> Vec<String> {
    self.context.read().declared_steps().to_vec()
  }

  /// The accumulated `step -> "step: description"` registry.
  pub fn step_descriptions(&self) -> HashMap<String, String> {
    self.context.read().descriptions().clone()
  }

  /// Finds the registered rule whose pattern matches a target path, if any.
  pub(crate) fn rule_matching(&self, target: &str) -> Option<&RuleEntry> {
    self.rules.iter().find(|entry| entry.rule.matches(target))
  }
}

impl Default for Pipeline {
  fn default() -> Self {
    Self::new()
  }
}

impl std::fmt::Debug for Pipeline {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    f.debug_struct("Pipeline")
      .field("steps", &self.context.read().declared_steps())
      .field("rules", &self.rules.len())
      .finish()
  }
}
