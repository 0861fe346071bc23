// trellis/src/info.rs

//! The per-job metadata store: a key/value side-document persisted under a
//! hidden `.info` directory next to the step directories.
//!
//! The document is keyed by job, not by step — every step processing a job
//! reads and merges into the same file, so metadata accumulates across the
//! pipeline. Writes shallow-merge over what is already persisted; new values
//! win on key collision, and nothing is ever implicitly deleted.

use crate::core::path::decompose;
use crate::core::task::Task;
use crate::error::{TrellisError, TrellisResult};
use std::fs;
use std::io::ErrorKind;
use std::path::Path;
use tracing::{event, Level};

/// The persisted metadata mapping for one job.
pub type InfoMap = serde_json::Map<String, serde_json::Value>;

const INFO_DIR: &str = ".info";
const INFO_EXT: &str = "json";

/// The info file path for a target: `<prefix>/.info/<job>.json`.
///
/// Derived from the target's job component, irrespective of its step.
pub fn info_path(target: &str) -> TrellisResult<String> {
  let parts = decompose(target)?;
  Ok(format!("{}/{}/{}.{}", parts.prefix, INFO_DIR, parts.job, INFO_EXT))
}

/// Loads the persisted metadata for the task's job.
///
/// A missing info file is not an error; it reads as an empty mapping.
pub fn load_info(task: &Task) -> TrellisResult<InfoMap> {
  let path = info_path(task.name())?;

  match fs::read(&path) {
    Ok(bytes) => serde_json::from_slice(&bytes).map_err(|source| TrellisError::InfoFormat { path, source }),
    Err(err) if err.kind() == ErrorKind::NotFound => Ok(InfoMap::new()),
    Err(source) => Err(TrellisError::Io { path, source }),
  }
}

/// Shallow-merges `updates` over the persisted metadata and writes it back.
///
/// Creates the `.info` directory on first write. Returns the merged mapping.
/// No partial-write protection is provided at this layer.
pub fn save_info(task: &Task, updates: InfoMap) -> TrellisResult<InfoMap> {
  let path = info_path(task.name())?;

  let mut merged = load_info(task)?;
  for (key, value) in updates {
    merged.insert(key, value);
  }

  if let Some(parent) = Path::new(&path).parent() {
    fs::create_dir_all(parent).map_err(|source| TrellisError::Io {
      path: parent.display().to_string(),
      source,
    })?;
  }

  let bytes = serde_json::to_vec_pretty(&merged).map_err(|source| TrellisError::InfoFormat {
    path: path.clone(),
    source,
  })?;
  fs::write(&path, bytes).map_err(|source| TrellisError::Io {
    path: path.clone(),
    source,
  })?;

  event!(Level::DEBUG, path, keys = merged.len(), "Saved job info.");
  Ok(merged)
}
