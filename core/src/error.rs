// trellis/src/error.rs
use anyhow::Error as AnyhowError;
use thiserror::Error;

#[derive(Debug, Error)]
pub enum TrellisError {
  #[error("Malformed pipeline path '{path}': expected at least '<step>/<job>'")]
  MalformedPath { path: String },

  #[error("No rule matches target '{target}' and no file exists at that path")]
  NoRuleForTarget { target: String },

  #[error("Dependency cycle detected while building '{target}'")]
  DependencyCycle { target: String },

  #[error("Task '{task}' has no prerequisite to load input from")]
  NoPrerequisite { task: String },

  #[error("I/O failure on '{path}'. Source: {source}")]
  Io {
    path: String,
    #[source]
    source: std::io::Error,
  },

  #[error("Failed to encode step output. Source: {source}")]
  Encode {
    #[source]
    source: bincode::Error,
  },

  #[error("Failed to decode serialized step output at '{path}'. Source: {source}")]
  Decode {
    path: String,
    #[source]
    source: bincode::Error,
  },

  #[error("Expected text content at '{path}' but found serialized data")]
  UnexpectedBinary { path: String },

  #[error("Expected serialized data at '{path}' but found text content")]
  UnexpectedText { path: String },

  #[error("Malformed info document at '{path}'. Source: {source}")]
  InfoFormat {
    path: String,
    #[source]
    source: serde_json::Error,
  },

  #[error("Error in user-provided step handler. Source: {source}")]
  Handler {
    #[source]
    source: AnyhowError,
  },
}

// This is the key conversion trellis provides for external errors: it lets
// step handlers use `?` on anything anyhow can absorb.
impl From<AnyhowError> for TrellisError {
  fn from(err: AnyhowError) -> Self {
    // An anyhow::Error may already be wrapping a TrellisError; re-wrapping as
    // Handler keeps the source chain intact either way.
    TrellisError::Handler { source: err }
  }
}

pub type TrellisResult<T, E = TrellisError> = std::result::Result<T, E>;
