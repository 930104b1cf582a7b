use std::fs;
use std::path::Path;

use anyhow::{Context, Result};
use chrono::{DateTime, Utc};
use serde::Serialize;
use tracing::debug;
use uuid::Uuid;

use jobsignal_common::ChatMessage;

#[derive(Serialize)]
struct SnapshotFile<'a> {
    generated_at: DateTime<Utc>,
    run_id: Uuid,
    count: usize,
    messages: &'a [ChatMessage],
}

/// Dump the collected transcript to disk before analysis, so a run that
/// dies mid-classification leaves the raw material behind for inspection.
pub fn write_snapshot(path: &Path, run_id: Uuid, messages: &[ChatMessage]) -> Result<()> {
    if let Some(parent) = path.parent() {
        fs::create_dir_all(parent).with_context(|| format!("creating {}", parent.display()))?;
    }
    let snapshot = SnapshotFile {
        generated_at: Utc::now(),
        run_id,
        count: messages.len(),
        messages,
    };
    let raw = serde_json::to_string_pretty(&snapshot)?;
    fs::write(path, raw)
        .with_context(|| format!("writing snapshot file {}", path.display()))?;
    debug!(path = %path.display(), count = messages.len(), "Transcript snapshot written");
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use chrono::NaiveDate;
    use serde_json::Value;

    #[test]
    fn snapshot_file_carries_count_and_messages() {
        let dir = tempfile::tempdir().unwrap();
        let path = dir.path().join("state/scraped_messages.json");
        let messages = vec![ChatMessage {
            sender: "Alice".to_string(),
            timestamp: NaiveDate::from_ymd_opt(2026, 1, 2)
                .unwrap()
                .and_hms_opt(9, 0, 0)
                .unwrap(),
            text: "hello".to_string(),
        }];

        write_snapshot(&path, Uuid::new_v4(), &messages).unwrap();

        let raw = fs::read_to_string(&path).unwrap();
        let parsed: Value = serde_json::from_str(&raw).unwrap();
        assert_eq!(parsed["count"], 1);
        assert_eq!(parsed["messages"][0]["sender"], "Alice");
        assert_eq!(parsed["messages"][0]["timestamp"], "2026-01-02T09:00:00");
        assert!(parsed["run_id"].is_string());
    }
}
