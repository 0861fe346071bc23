// tests/common/mod.rs
#![allow(dead_code)] // Allow unused code in this common test module

use tempfile::TempDir;
use tracing::Level;

/// Creates a scratch directory serving as the pipeline's working root.
pub fn scratch() -> TempDir {
  TempDir::new().expect("failed to create scratch directory")
}

/// Builds a pipeline path string under the scratch root.
///
/// Targets are plain strings in trellis; the scratch root becomes the
/// pipeline prefix.
pub fn target(root: &TempDir, rel: &str) -> String {
  format!("{}/{}", root.path().display(), rel)
}

pub fn read_file(path: &str) -> String {
  std::fs::read_to_string(path).unwrap_or_else(|e| panic!("failed to read '{}': {}", path, e))
}

// --- Helper for Tracing Setup (call once per test run if needed) ---
use once_cell::sync::Lazy;
static TRACING_INIT: Lazy<()> = Lazy::new(|| {
  tracing_subscriber::fmt()
    .with_max_level(Level::DEBUG)
    .with_test_writer() // Important for tests to capture output
    .try_init()
    .ok(); // Allow multiple initializations in tests (ok if fails)
});

pub fn setup_tracing() {
  Lazy::force(&TRACING_INIT);
}
