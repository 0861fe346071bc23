// tests/io_tests.rs
mod common;

use common::*;
use serde::{Deserialize, Serialize};
use std::collections::BTreeMap;
use std::io::{Cursor, Read, Seek, SeekFrom};
use trellis::{is_binary, load_data, load_input, load_text, save_output, Payload, Task, TrellisError};

#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
struct ParseResult {
  tokens: Vec<String>,
  counts: BTreeMap<String, i64>,
  total: i64,
}

fn sample_result() -> ParseResult {
  ParseResult {
    tokens: vec!["hello".to_string(), "world".to_string()],
    counts: BTreeMap::from([("hello".to_string(), 1), ("world".to_string(), 1)]),
    total: 2,
  }
}

// --- Classifier ---

#[test]
fn test_printable_ascii_with_whitespace_classifies_as_text() {
  setup_tracing();
  let mut stream = Cursor::new(b"hello world\n\tsecond line\r\n".to_vec());
  assert!(!is_binary(&mut stream).unwrap());
}

#[test]
fn test_any_non_printable_byte_classifies_as_binary() {
  setup_tracing();
  let mut with_nul = Cursor::new(b"hello\x00world".to_vec());
  assert!(is_binary(&mut with_nul).unwrap());

  let mut with_high_bit = Cursor::new(vec![b'a', b'b', 0x80, b'c']);
  assert!(is_binary(&mut with_high_bit).unwrap());
}

#[test]
fn test_classifier_only_probes_the_first_kilobyte() {
  setup_tracing();
  // A control byte past the probe window goes unnoticed: the classifier is
  // a bounded heuristic, not a full scan.
  let mut bytes = vec![b'x'; 1500];
  bytes[1400] = 0x00;
  assert!(!is_binary(&mut Cursor::new(bytes)).unwrap());

  let mut bytes = vec![b'x'; 1500];
  bytes[1000] = 0x00;
  assert!(is_binary(&mut Cursor::new(bytes)).unwrap());
}

#[test]
fn test_classifier_restores_the_stream_position() {
  setup_tracing();
  let mut stream = Cursor::new(b"abcdef\x00ghij".to_vec());
  stream.seek(SeekFrom::Start(3)).unwrap();

  assert!(is_binary(&mut stream).unwrap());
  assert_eq!(stream.stream_position().unwrap(), 3);

  // The probe starts at the current position, so a stream positioned past
  // the only control byte reads as text.
  stream.seek(SeekFrom::Start(7)).unwrap();
  assert!(!is_binary(&mut stream).unwrap());
  let mut rest = String::new();
  stream.read_to_string(&mut rest).unwrap();
  assert_eq!(rest, "ghij");
}

// --- Typed load/save round trips ---

#[test]
fn test_text_output_round_trips_verbatim() {
  setup_tracing();
  let root = scratch();
  let parse_target = target(&root, "work/parse/job1");

  let producer = Task::new(parse_target.clone(), vec![]);
  save_output(&producer, Some(Payload::text("hello\nworld"))).unwrap();

  let consumer = Task::new(target(&root, "work/revert/job1"), vec![parse_target]);
  assert_eq!(load_text(&consumer, None).unwrap(), "hello\nworld");
  assert!(load_input(&consumer, None).unwrap().is_text());
}

#[test]
fn test_structured_output_round_trips_structurally() {
  setup_tracing();
  let root = scratch();
  let parse_target = target(&root, "work/parse/job1");

  let value = sample_result();
  let producer = Task::new(parse_target.clone(), vec![]);
  save_output(&producer, Some(Payload::data(&value).unwrap())).unwrap();

  let consumer = Task::new(target(&root, "work/count/job1"), vec![parse_target]);
  assert!(load_input(&consumer, None).unwrap().is_data());
  let reloaded: ParseResult = load_data(&consumer, None).unwrap();
  assert_eq!(reloaded, value);
}

#[test]
fn test_payload_decode_round_trips_in_memory() {
  setup_tracing();
  let value = sample_result();
  let payload = Payload::data(&value).unwrap();
  assert_eq!(payload.decode::<ParseResult>().unwrap(), value);

  let err = Payload::text("plain").decode::<ParseResult>().unwrap_err();
  assert!(matches!(err, TrellisError::UnexpectedText { .. }));
}

#[test]
fn test_no_output_writes_no_file() {
  setup_tracing();
  let root = scratch();
  let parse_target = target(&root, "work/parse/job1");

  let producer = Task::new(parse_target.clone(), vec![]);
  save_output(&producer, None).unwrap();
  assert!(!std::path::Path::new(&parse_target).exists());
}

#[test]
fn test_explicit_step_load_reaches_a_named_sibling() {
  setup_tracing();
  let root = scratch();
  let parse_target = target(&root, "work/parse/job1");

  let producer = Task::new(parse_target, vec![]);
  save_output(&producer, Some(Payload::text("from parse"))).unwrap();

  // The consumer has no prerequisites at all; the explicit step name
  // substitutes into its own target path.
  let consumer = Task::new(target(&root, "work/render/job1"), vec![]);
  assert_eq!(load_text(&consumer, Some("parse")).unwrap(), "from parse");

  // Without a step name the same task has nothing to load from.
  let err = load_text(&consumer, None).unwrap_err();
  assert!(matches!(err, TrellisError::NoPrerequisite { .. }));
}

// --- Failure surfaces ---

#[test]
fn test_missing_input_file_is_fatal() {
  setup_tracing();
  let root = scratch();
  let consumer = Task::new(
    target(&root, "work/revert/job1"),
    vec![target(&root, "work/parse/job1")],
  );
  let err = load_text(&consumer, None).unwrap_err();
  assert!(matches!(err, TrellisError::Io { .. }));
}

#[test]
fn test_kind_mismatch_is_fatal_with_no_fallback() {
  setup_tracing();
  let root = scratch();
  let parse_target = target(&root, "work/parse/job1");
  let count_target = target(&root, "work/count/job1");

  save_output(&Task::new(parse_target.clone(), vec![]), Some(Payload::text("text"))).unwrap();
  save_output(
    &Task::new(count_target.clone(), vec![]),
    Some(Payload::data(&sample_result()).unwrap()),
  )
  .unwrap();

  let wants_data = Task::new(target(&root, "work/a/job1"), vec![parse_target]);
  let err = load_data::<ParseResult>(&wants_data, None).unwrap_err();
  assert!(matches!(err, TrellisError::UnexpectedText { .. }));

  let wants_text = Task::new(target(&root, "work/b/job1"), vec![count_target]);
  let err = load_text(&wants_text, None).unwrap_err();
  assert!(matches!(err, TrellisError::UnexpectedBinary { .. }));
}

#[test]
fn test_corrupted_serialized_output_fails_to_decode() {
  setup_tracing();
  let root = scratch();
  let parse_target = target(&root, "work/parse/job1");

  std::fs::create_dir_all(root.path().join("work/parse")).unwrap();
  // Non-printable garbage: classified as data, but not a valid encoding.
  std::fs::write(&parse_target, [0xffu8; 16]).unwrap();

  let consumer = Task::new(target(&root, "work/count/job1"), vec![parse_target]);
  let err = load_data::<ParseResult>(&consumer, None).unwrap_err();
  assert!(matches!(err, TrellisError::Decode { .. }));
}

#[test]
fn test_overwrite_replaces_output_wholesale() {
  setup_tracing();
  let root = scratch();
  let parse_target = target(&root, "work/parse/job1");
  let producer = Task::new(parse_target.clone(), vec![]);

  save_output(&producer, Some(Payload::text("a much longer first version"))).unwrap();
  save_output(&producer, Some(Payload::text("short"))).unwrap();
  assert_eq!(read_file(&parse_target), "short");
}
