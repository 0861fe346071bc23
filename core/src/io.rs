// trellis/src/io.rs

//! The typed I/O layer: how a step's value gets onto disk and how the next
//! step gets it back.
//!
//! A handler returns a [`Payload`]: raw text is written verbatim, structured
//! values are encoded generically with bincode. On the way back in, the
//! content classifier decides which of the two a file holds — text loads as
//! the raw string, serialized data loads as the original value via
//! [`load_data`]. A value saved by one step round-trips through the next
//! step's load unchanged.

use crate::core::content::is_binary;
use crate::core::path::decompose;
use crate::core::task::Task;
use crate::error::{TrellisError, TrellisResult};
use serde::de::DeserializeOwned;
use serde::Serialize;
use std::fs::{self, File};
use std::io::Read;
use std::path::Path;
use tracing::{event, Level};

/// A step's output value (or a loaded input), as it crosses the filesystem.
#[derive(Clone, PartialEq, Eq)]
pub enum Payload {
  /// Textual content, written and read back verbatim.
  Text(String),
  /// A structured value, already encoded to its serialized byte form.
  Data(Vec<u8>),
}

impl Payload {
  pub fn text(content: impl Into<String>) -> Self {
    Payload::Text(content.into())
  }

  /// Encodes an arbitrary serializable value into its on-disk byte form.
  pub fn data<T: Serialize>(value: &T) -> TrellisResult<Self> {
    let bytes = bincode::serialize(value).map_err(|source| TrellisError::Encode { source })?;
    Ok(Payload::Data(bytes))
  }

  /// Reconstructs the value a [`Payload::data`] call encoded.
  ///
  /// Fails with [`TrellisError::UnexpectedText`] on a text payload; there is
  /// no silent fallback between the two representations.
  pub fn decode<T: DeserializeOwned>(&self) -> TrellisResult<T> {
    match self {
      Payload::Data(bytes) => bincode::deserialize(bytes).map_err(|source| TrellisError::Decode {
        path: "<payload>".to_string(),
        source,
      }),
      Payload::Text(_) => Err(TrellisError::UnexpectedText {
        path: "<payload>".to_string(),
      }),
    }
  }

  pub fn is_text(&self) -> bool {
    matches!(self, Payload::Text(_))
  }

  pub fn is_data(&self) -> bool {
    matches!(self, Payload::Data(_))
  }
}

// Serialized bytes are noise in debug output; show their length instead.
impl std::fmt::Debug for Payload {
  fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
    match self {
      Payload::Text(content) => f.debug_tuple("Payload::Text").field(content).finish(),
      Payload::Data(bytes) => f
        .debug_struct("Payload::Data")
        .field("len", &bytes.len())
        .finish(),
    }
  }
}

/// The path a task's output is written to: its own target path.
pub fn output_path(task: &Task) -> &str {
  task.name()
}

/// Resolves the file a task reads its input from.
///
/// By default this is the task's first prerequisite. With an explicit step
/// name, it is the sibling path obtained by substituting that step into the
/// task's own target path — useful for reaching past the immediate
/// predecessor.
pub fn input_path(task: &Task, step: Option<&str>) -> TrellisResult<String> {
  match step {
    Some(step) => Ok(decompose(task.name())?.with_step(step).join()),
    None => task
      .first_prerequisite()
      .map(str::to_string)
      .ok_or_else(|| TrellisError::NoPrerequisite {
        task: task.name().to_string(),
      }),
  }
}

fn load_at(path: &str) -> TrellisResult<Payload> {
  let io_err = |source| TrellisError::Io {
    path: path.to_string(),
    source,
  };

  let mut file = File::open(path).map_err(io_err)?;
  let binary = is_binary(&mut file).map_err(io_err)?;

  if binary {
    let mut bytes = Vec::new();
    file.read_to_end(&mut bytes).map_err(io_err)?;
    event!(Level::TRACE, path, len = bytes.len(), "Loaded serialized input.");
    Ok(Payload::Data(bytes))
  } else {
    let mut text = String::new();
    file.read_to_string(&mut text).map_err(io_err)?;
    event!(Level::TRACE, path, len = text.len(), "Loaded text input.");
    Ok(Payload::Text(text))
  }
}

/// Loads a task's input, classified as text or serialized data.
///
/// A missing input file is fatal: the handler cannot proceed without its
/// declared prerequisite.
pub fn load_input(task: &Task, step: Option<&str>) -> TrellisResult<Payload> {
  let path = input_path(task, step)?;
  load_at(&path)
}

/// Loads a task's input, requiring textual content.
pub fn load_text(task: &Task, step: Option<&str>) -> TrellisResult<String> {
  let path = input_path(task, step)?;
  match load_at(&path)? {
    Payload::Text(content) => Ok(content),
    Payload::Data(_) => Err(TrellisError::UnexpectedBinary { path }),
  }
}

/// Loads a task's input, requiring serialized data, and reconstructs the
/// value the producing step saved.
pub fn load_data<T: DeserializeOwned>(task: &Task, step: Option<&str>) -> TrellisResult<T> {
  let path = input_path(task, step)?;
  match load_at(&path)? {
    Payload::Data(bytes) => {
      bincode::deserialize(&bytes).map_err(|source| TrellisError::Decode { path, source })
    }
    Payload::Text(_) => Err(TrellisError::UnexpectedText { path }),
  }
}

/// Persists a step's output to the task's target path.
///
/// `None` writes nothing. Otherwise the target's step directory is created
/// if absent and the file is overwritten wholesale — each output file is
/// owned by exactly one step/job pair.
pub fn save_output(task: &Task, output: Option<Payload>) -> TrellisResult<()> {
  let Some(payload) = output else {
    event!(Level::TRACE, task = task.name(), "Handler produced no output; nothing written.");
    return Ok(());
  };

  let path = output_path(task);
  if let Some(parent) = Path::new(path).parent() {
    if !parent.as_os_str().is_empty() {
      fs::create_dir_all(parent).map_err(|source| TrellisError::Io {
        path: parent.display().to_string(),
        source,
      })?;
    }
  }

  let bytes: &[u8] = match &payload {
    Payload::Text(content) => content.as_bytes(),
    Payload::Data(bytes) => bytes,
  };
  fs::write(path, bytes).map_err(|source| TrellisError::Io {
    path: path.to_string(),
    source,
  })?;

  event!(Level::DEBUG, path, len = bytes.len(), text = payload.is_text(), "Saved step output.");
  Ok(())
}
