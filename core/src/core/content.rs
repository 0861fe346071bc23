// trellis/src/core/content.rs

//! Heuristic binary/text classification of step output files.
//!
//! A step's output is either raw text (written verbatim by the producing
//! handler) or an opaque serialized value. Nothing on disk tags which is
//! which; instead the head of the file is probed for bytes outside the
//! printable range. This is intentionally a heuristic — see the crate docs
//! for the known failure modes.

use std::io::{Read, Seek, SeekFrom};

/// How many bytes of the stream head are inspected.
const PROBE_LEN: usize = 1024;

/// Returns `true` if the stream looks like serialized data rather than text.
///
/// Reads up to [`PROBE_LEN`] bytes from the current position and classifies
/// as binary if any byte falls outside printable ASCII (`0x20..=0x7E`) and
/// is not ASCII whitespace. The stream position is restored before
/// returning, so the probe is non-destructive.
pub fn is_binary<R: Read + Seek>(stream: &mut R) -> std::io::Result<bool> {
  let start = stream.stream_position()?;

  let mut buf = [0u8; PROBE_LEN];
  let mut filled = 0;
  while filled < PROBE_LEN {
    let n = stream.read(&mut buf[filled..])?;
    if n == 0 {
      break;
    }
    filled += n;
  }

  stream.seek(SeekFrom::Start(start))?;

  Ok(
    buf[..filled]
      .iter()
      .any(|b| !(0x20..=0x7e).contains(b) && !b.is_ascii_whitespace()),
  )
}
