use std::collections::HashSet;

use tracing::info;

use jobsignal_common::{ChatMessage, JobRecord};

/// Drop repeated messages, keeping first-occurrence order. Identity is
/// (sender, second-precision timestamp, trimmed text). Pure and idempotent.
pub fn dedupe_messages(messages: &[ChatMessage]) -> Vec<ChatMessage> {
    let mut seen = HashSet::new();
    messages
        .iter()
        .filter(|m| seen.insert(m.dedup_key()))
        .cloned()
        .collect()
}

/// Keys of rows already persisted. The first row is the header and rows
/// with fewer than seven cells are skipped as malformed.
pub fn existing_record_keys(rows: &[Vec<String>]) -> HashSet<String> {
    rows.iter()
        .skip(1)
        .filter(|row| row.len() >= 7)
        .map(|row| row[..7].join("|").trim().to_lowercase())
        .collect()
}

/// Drop records whose key is already persisted or repeats within this
/// batch. Batch order is preserved.
pub fn dedupe_records(records: Vec<JobRecord>, existing: &HashSet<String>) -> Vec<JobRecord> {
    let mut batch_seen = HashSet::new();
    let mut unique = Vec::new();
    for record in records {
        let key = record.dedup_key();
        if existing.contains(&key) {
            info!(company = %record.company, role = %record.role, "Skipping job already present in sheet");
            continue;
        }
        if !batch_seen.insert(key) {
            info!(company = %record.company, role = %record.role, "Skipping duplicate job within batch");
            continue;
        }
        unique.push(record);
    }
    unique
}
