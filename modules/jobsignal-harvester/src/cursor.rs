use std::fs;
use std::path::{Path, PathBuf};

use anyhow::{Context, Result};
use chrono::NaiveDateTime;
use serde::{Deserialize, Serialize};
use tracing::{debug, warn};

use jobsignal_common::ChatMessage;

#[derive(Debug, Serialize, Deserialize)]
struct CursorFile {
    #[serde(default)]
    last_message_timestamp: Option<NaiveDateTime>,
}

/// Watermark file holding the newest analyzed message timestamp. A missing
/// or unreadable file means "no cursor": the next run reprocesses the full
/// collected window, and record dedup absorbs the resubmission.
pub struct CursorStore {
    path: PathBuf,
}

impl CursorStore {
    pub fn new(path: impl Into<PathBuf>) -> Self {
        Self { path: path.into() }
    }

    pub fn path(&self) -> &Path {
        &self.path
    }

    pub fn load(&self) -> Option<NaiveDateTime> {
        let raw = match fs::read_to_string(&self.path) {
            Ok(raw) => raw,
            Err(e) => {
                debug!(path = %self.path.display(), error = %e, "No cursor file, processing full history");
                return None;
            }
        };
        match serde_json::from_str::<CursorFile>(&raw) {
            Ok(cursor) => cursor.last_message_timestamp,
            Err(e) => {
                warn!(path = %self.path.display(), error = %e, "Cursor file unreadable, processing full history");
                None
            }
        }
    }

    pub fn save(&self, timestamp: NaiveDateTime) -> Result<()> {
        if let Some(parent) = self.path.parent() {
            fs::create_dir_all(parent)
                .with_context(|| format!("creating {}", parent.display()))?;
        }
        let cursor = CursorFile {
            last_message_timestamp: Some(timestamp),
        };
        let raw = serde_json::to_string_pretty(&cursor)?;
        fs::write(&self.path, raw)
            .with_context(|| format!("writing cursor file {}", self.path.display()))?;
        debug!(path = %self.path.display(), %timestamp, "Cursor saved");
        Ok(())
    }
}

/// Messages strictly newer than the cursor; everything when there is none.
/// Equal timestamps were covered by the previous run and are excluded.
pub fn filter_after(
    messages: Vec<ChatMessage>,
    cursor: Option<NaiveDateTime>,
) -> Vec<ChatMessage> {
    match cursor {
        Some(cutoff) => messages
            .into_iter()
            .filter(|m| m.timestamp > cutoff)
            .collect(),
        None => messages,
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;

    fn ts(day: u32, hour: u32) -> NaiveDateTime {
        NaiveDate::from_ymd_opt(2026, 1, day)
            .unwrap()
            .and_hms_opt(hour, 0, 0)
            .unwrap()
    }

    fn message(day: u32, hour: u32) -> ChatMessage {
        ChatMessage {
            sender: "Alice".to_string(),
            timestamp: ts(day, hour),
            text: "hello".to_string(),
        }
    }

    // --- store tests ---

    #[test]
    fn missing_file_loads_as_none() {
        let dir = tempfile::tempdir().unwrap();
        let store = CursorStore::new(dir.path().join("last_processed.json"));
        assert_eq!(store.load(), None);
    }

    #[test]
    fn save_then_load_round_trips() {
        let dir = tempfile::tempdir().unwrap();
        let store = CursorStore::new(dir.path().join("last_processed.json"));
        store.save(ts(2, 9)).unwrap();
        assert_eq!(store.load(), Some(ts(2, 9)));
    }

    #[test]
    fn save_creates_parent_directories() {
        let dir = tempfile::tempdir().unwrap();
        let store = CursorStore::new(dir.path().join("nested/state/last_processed.json"));
        store.save(ts(2, 9)).unwrap();
        assert_eq!(store.load(), Some(ts(2, 9)));
    }

    #[test]
    fn corrupt_json_loads_as_none() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("last_processed.json");
        fs::write(&path, "{ not json").unwrap();
        assert_eq!(CursorStore::new(&path).load(), None);
    }

    #[test]
    fn null_timestamp_loads_as_none() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("last_processed.json");
        fs::write(&path, r#"{ "last_message_timestamp": null }"#).unwrap();
        assert_eq!(CursorStore::new(&path).load(), None);
    }

    #[test]
    fn wrong_timestamp_type_loads_as_none() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("last_processed.json");
        fs::write(&path, r#"{ "last_message_timestamp": 42 }"#).unwrap();
        assert_eq!(CursorStore::new(&path).load(), None);
    }

    #[test]
    fn unparsable_timestamp_string_loads_as_none() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("last_processed.json");
        fs::write(&path, r#"{ "last_message_timestamp": "not-a-date" }"#).unwrap();
        assert_eq!(CursorStore::new(&path).load(), None);
    }

    // --- cutoff filter tests ---

    #[test]
    fn keeps_only_strictly_newer_messages() {
        let messages = vec![message(1, 8), message(2, 9), message(3, 10)];
        let kept = filter_after(messages, Some(ts(2, 9)));
        assert_eq!(kept.len(), 1);
        assert_eq!(kept[0].timestamp, ts(3, 10));
    }

    #[test]
    fn equal_timestamps_are_excluded() {
        let kept = filter_after(vec![message(2, 9)], Some(ts(2, 9)));
        assert!(kept.is_empty());
    }

    #[test]
    fn no_cursor_keeps_everything() {
        let messages = vec![message(1, 8), message(2, 9)];
        assert_eq!(filter_after(messages.clone(), None), messages);
    }
}
