// trellis/examples/structured_outputs.rs
//
// A three-step pipeline whose intermediate values are structured: `tokenize`
// emits a token list, `count` turns it into a frequency table, `report`
// renders text. Each step also drops a note into the per-job info file.

use serde_json::json;
use std::collections::BTreeMap;
use tracing::info;
use trellis::{load_data, load_text, save_info, DependencySpec, Payload, Pipeline, Task, TrellisError};

fn note(task: &Task, key: &str) -> Result<(), TrellisError> {
  save_info(task, [(key.to_string(), json!(true))].into_iter().collect())?;
  Ok(())
}

fn main() -> Result<(), TrellisError> {
  tracing_subscriber::fmt().with_max_level(tracing::Level::INFO).init();

  let root = tempfile::TempDir::new().expect("scratch dir");
  let work = |rel: &str| format!("{}/{}", root.path().display(), rel);

  // The raw input is a plain source file; no rule produces it.
  std::fs::create_dir_all(root.path().join("work/raw")).expect("raw dir");
  std::fs::write(root.path().join("work/raw/poem"), "the rain in the plain").expect("raw file");

  let mut pipeline = Pipeline::new();

  pipeline.step("tokenize", DependencySpec::step("raw"), |task: &Task| {
    let text = load_text(task, None)?;
    let tokens: Vec<String> = text.split_whitespace().map(str::to_string).collect();
    note(task, "tokenized")?;
    Ok(Some(Payload::data(&tokens)?))
  });

  pipeline.step("count", DependencySpec::Auto, |task: &Task| {
    let tokens: Vec<String> = load_data(task, None)?;
    let mut counts: BTreeMap<String, u64> = BTreeMap::new();
    for token in tokens {
      *counts.entry(token).or_insert(0) += 1;
    }
    note(task, "counted")?;
    Ok(Some(Payload::data(&counts)?))
  });

  pipeline.step("report", DependencySpec::Auto, |task: &Task| {
    let counts: BTreeMap<String, u64> = load_data(task, None)?;
    let mut lines: Vec<String> = counts.iter().map(|(w, n)| format!("{} {}", n, w)).collect();
    lines.sort();
    lines.reverse();
    Ok(Some(Payload::text(lines.join("\n"))))
  });

  let report_target = work("work/report/poem");
  pipeline.build(&report_target)?;

  let report = std::fs::read_to_string(&report_target).expect("report output");
  info!("report:\n{}", report);
  assert!(report.starts_with("2 the"));

  // The info file accumulated entries from both annotating steps.
  let info = trellis::load_info(&Task::new(report_target, vec![]))?;
  assert_eq!(info.get("tokenized"), Some(&json!(true)));
  assert_eq!(info.get("counted"), Some(&json!(true)));
  info!("job info: {}", serde_json::Value::Object(info));

  Ok(())
}
