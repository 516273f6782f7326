//! JSON documents stored under namespaced collection keys.
//!
//! Every collection lives in its own file with a small envelope so a file
//! copied to the wrong name is refused instead of silently misread.

use crate::domain::{Note, Task};
use crate::persistence::files::{atomic_write, collection_file, read_file};
use anyhow::{Context, Result};
use serde::de::DeserializeOwned;
use serde::{Deserialize, Serialize};
use std::path::Path;
use thiserror::Error;

pub const TASKS_KEY: &str = "taskflow.tasks";
pub const NOTES_KEY: &str = "taskflow.notes";
pub const SNAPSHOT_VERSION: u32 = 1;

#[derive(Debug, Error, PartialEq, Eq)]
pub enum SnapshotError {
    #[error("snapshot key mismatch: expected {expected}, found {found}")]
    KeyMismatch { expected: String, found: String },
    #[error("unsupported snapshot version {0}")]
    UnsupportedVersion(u32),
}

#[derive(Debug, Deserialize)]
struct Envelope<T> {
    key: String,
    version: u32,
    records: Vec<T>,
}

#[derive(Serialize)]
struct EnvelopeRef<'a, T> {
    key: &'a str,
    version: u32,
    records: &'a [T],
}

/// Decode a document, checking it belongs to `key`
pub fn decode<T: DeserializeOwned>(key: &str, content: &str) -> Result<Vec<T>> {
    if content.trim().is_empty() {
        return Ok(Vec::new());
    }

    let envelope: Envelope<T> =
        serde_json::from_str(content).with_context(|| format!("Failed to parse {} document", key))?;

    if envelope.key != key {
        return Err(SnapshotError::KeyMismatch {
            expected: key.to_string(),
            found: envelope.key,
        }
        .into());
    }
    if envelope.version > SNAPSHOT_VERSION {
        return Err(SnapshotError::UnsupportedVersion(envelope.version).into());
    }

    Ok(envelope.records)
}

/// Encode records under `key`
pub fn encode<T: Serialize>(key: &str, records: &[T]) -> Result<String> {
    let envelope = EnvelopeRef {
        key,
        version: SNAPSHOT_VERSION,
        records,
    };
    serde_json::to_string_pretty(&envelope).with_context(|| format!("Failed to encode {} document", key))
}

fn load_collection<T: DeserializeOwned>(dir: &Path, key: &str) -> Result<Vec<T>> {
    let path = collection_file(dir, key);
    let content = read_file(&path)?;
    let records = decode(key, &content).with_context(|| format!("Failed to load {}", path.display()))?;
    tracing::debug!(key, count = records.len(), "collection loaded");
    Ok(records)
}

fn save_collection<T: Serialize>(dir: &Path, key: &str, records: &[T]) -> Result<()> {
    let path = collection_file(dir, key);
    atomic_write(&path, &encode(key, records)?)?;
    tracing::debug!(key, count = records.len(), "collection saved");
    Ok(())
}

pub fn load_tasks(dir: &Path) -> Result<Vec<Task>> {
    load_collection(dir, TASKS_KEY)
}

pub fn save_tasks(dir: &Path, tasks: &[Task]) -> Result<()> {
    save_collection(dir, TASKS_KEY, tasks)
}

pub fn load_notes(dir: &Path) -> Result<Vec<Note>> {
    load_collection(dir, NOTES_KEY)
}

pub fn save_notes(dir: &Path, notes: &[Note]) -> Result<()> {
    save_collection(dir, NOTES_KEY, notes)
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::domain::{Priority, TaskDraft};
    use chrono::{Duration, TimeZone, Utc};
    use pretty_assertions::assert_eq;
    use tempfile::tempdir;

    #[test]
    fn test_missing_files_load_empty() {
        let dir = tempdir().unwrap();
        assert!(load_tasks(dir.path()).unwrap().is_empty());
        assert!(load_notes(dir.path()).unwrap().is_empty());
    }

    #[test]
    fn test_tasks_round_trip_preserves_timestamps() {
        let dir = tempdir().unwrap();
        let t0 = Utc.with_ymd_and_hms(2024, 3, 1, 9, 0, 0).unwrap();

        let mut draft = TaskDraft::new("Review PR", 45);
        draft.priority = Priority::High;
        draft.due_date = Some(t0 + Duration::days(2));
        draft.tags = vec!["work".to_string()];
        let mut paused = Task::from_draft(draft.validate().unwrap(), t0);
        paused.begin(t0);
        paused.pause(t0 + Duration::seconds(95));

        let mut running = Task::from_draft(TaskDraft::new("Write", 25), t0);
        running.begin(t0 + Duration::seconds(120));

        let tasks = vec![paused, running];
        save_tasks(dir.path(), &tasks).unwrap();
        let loaded = load_tasks(dir.path()).unwrap();

        assert_eq!(loaded, tasks);
        assert_eq!(loaded[0].started_at, Some(t0));
        assert_eq!(loaded[0].last_paused_at(), Some(t0 + Duration::seconds(95)));
        assert_eq!(loaded[0].active_secs, 95);
    }

    #[test]
    fn test_notes_round_trip() {
        let dir = tempdir().unwrap();
        let now = Utc.with_ymd_and_hms(2024, 3, 1, 9, 0, 0).unwrap();
        let notes = vec![Note::new("call back", now).unwrap()];

        save_notes(dir.path(), &notes).unwrap();
        assert_eq!(load_notes(dir.path()).unwrap(), notes);
    }

    #[test]
    fn test_key_mismatch_rejected() {
        let content = encode::<Note>(NOTES_KEY, &[]).unwrap();
        let err = decode::<Task>(TASKS_KEY, &content).unwrap_err();
        assert_eq!(
            err.downcast_ref::<SnapshotError>(),
            Some(&SnapshotError::KeyMismatch {
                expected: TASKS_KEY.to_string(),
                found: NOTES_KEY.to_string(),
            })
        );
    }

    #[test]
    fn test_newer_version_rejected() {
        let content = r#"{"key":"taskflow.tasks","version":9,"records":[]}"#;
        let err = decode::<Task>(TASKS_KEY, content).unwrap_err();
        assert_eq!(
            err.downcast_ref::<SnapshotError>(),
            Some(&SnapshotError::UnsupportedVersion(9))
        );
    }

    #[test]
    fn test_garbage_is_an_error() {
        assert!(decode::<Task>(TASKS_KEY, "not json").is_err());
    }

    #[test]
    fn test_envelope_shape() {
        let content = encode::<Task>(TASKS_KEY, &[]).unwrap();
        let value: serde_json::Value = serde_json::from_str(&content).unwrap();
        assert_eq!(value["key"], "taskflow.tasks");
        assert_eq!(value["version"], 1);
        assert!(value["records"].as_array().unwrap().is_empty());
    }
}
