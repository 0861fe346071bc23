// trellis/examples/basic_pipeline.rs

use tracing::info;
use trellis::{DependencySpec, Payload, Pipeline, Task, TrellisError};

fn main() -> Result<(), TrellisError> {
  // Initialize tracing (optional, for demonstration)
  tracing_subscriber::fmt().with_max_level(tracing::Level::INFO).init();

  info!("--- Basic Pipeline Example ---");

  // A scratch directory serves as the pipeline's working root.
  let root = tempfile::TempDir::new().expect("scratch dir");
  let work = |rel: &str| format!("{}/{}", root.path().display(), rel);

  // 1. Define the pipeline. Steps chain implicitly in definition order:
  //    `revert` depends on `parse` without saying so.
  let mut pipeline = Pipeline::new();

  pipeline.describe("Produce the text to work on");
  pipeline.step("parse", DependencySpec::Auto, |_task: &Task| {
    Ok(Some(Payload::text("hello")))
  });

  pipeline.describe("Reverse the previous step's output");
  pipeline.step("revert", DependencySpec::Auto, |task: &Task| {
    let text = trellis::load_text(task, None)?;
    Ok(Some(Payload::text(text.chars().rev().collect::<String>())))
  });

  for description in pipeline.step_descriptions().values() {
    info!("registered {}", description);
  }

  // 2. Ask for the *last* step's output; the missing prerequisite is built
  //    first.
  let revert_target = work("work/revert/job1");
  let summary = pipeline.build(&revert_target)?;
  info!("rebuilt {} target(s)", summary.rebuilt().len());

  let parsed = std::fs::read_to_string(work("work/parse/job1")).expect("parse output");
  let reverted = std::fs::read_to_string(&revert_target).expect("revert output");
  info!("parse produced '{}', revert produced '{}'", parsed, reverted);

  assert_eq!(parsed, "hello");
  assert_eq!(reverted, "olleh");

  // 3. A second build finds everything fresh and runs no handlers.
  let second = pipeline.build(&revert_target)?;
  assert!(second.is_fresh());
  info!("second build was a no-op");

  Ok(())
}
