use std::path::PathBuf;

use anyhow::{Context, Result};
use chrono::NaiveDateTime;
use tracing::info;
use uuid::Uuid;

use jobsignal_common::JobRecord;

use crate::analyzer::JobAnalyzer;
use crate::collector::{CollectorSettings, TranscriptCollector, TranscriptView};
use crate::cursor::{filter_after, CursorStore};
use crate::dedup::{dedupe_messages, dedupe_records, existing_record_keys};
use crate::notify::SummaryNotifier;
use crate::records::{records_to_rows, RecordStore};
use crate::snapshot::write_snapshot;

#[derive(Debug, Default)]
pub struct HarvestStats {
    pub messages_collected: u32,
    pub messages_new: u32,
    pub analyzed: u32,
    pub degraded: u32,
    pub relevant: u32,
    pub appended: u32,
    pub duplicates_skipped: u32,
    pub notified: bool,
    pub cursor: Option<NaiveDateTime>,
}

impl std::fmt::Display for HarvestStats {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        writeln!(f, "\n=== Harvest Run Complete ===")?;
        writeln!(f, "Messages collected: {}", self.messages_collected)?;
        writeln!(f, "Messages new:       {}", self.messages_new)?;
        writeln!(f, "Messages analyzed:  {}", self.analyzed)?;
        writeln!(f, "Degraded:           {}", self.degraded)?;
        writeln!(f, "Relevant jobs:      {}", self.relevant)?;
        writeln!(f, "Rows appended:      {}", self.appended)?;
        writeln!(f, "Duplicates skipped: {}", self.duplicates_skipped)?;
        writeln!(
            f,
            "Summary e-mail:     {}",
            if self.notified { "sent" } else { "skipped" }
        )?;
        match self.cursor {
            Some(ts) => writeln!(f, "Cursor:             {ts}"),
            None => writeln!(f, "Cursor:             unchanged"),
        }
    }
}

#[derive(Debug, Clone)]
pub struct HarvestSettings {
    pub collector: CollectorSettings,
    pub cursor_path: PathBuf,
    pub snapshot_path: PathBuf,
}

impl Default for HarvestSettings {
    fn default() -> Self {
        Self {
            collector: CollectorSettings::default(),
            cursor_path: PathBuf::from("data/last_processed.json"),
            snapshot_path: PathBuf::from("data/scraped_messages.json"),
        }
    }
}

/// One full harvest pass: collect the transcript, classify what's new,
/// persist relevant jobs and advance the cursor. Every stage is sequential;
/// the only concurrency is inside the HTTP clients.
pub struct Harvester {
    view: Box<dyn TranscriptView>,
    analyzer: JobAnalyzer,
    store: Box<dyn RecordStore>,
    notifier: Box<dyn SummaryNotifier>,
    cursor: CursorStore,
    settings: HarvestSettings,
}

impl Harvester {
    pub fn new(
        view: Box<dyn TranscriptView>,
        analyzer: JobAnalyzer,
        store: Box<dyn RecordStore>,
        notifier: Box<dyn SummaryNotifier>,
        settings: HarvestSettings,
    ) -> Self {
        let cursor = CursorStore::new(settings.cursor_path.clone());
        Self {
            view,
            analyzer,
            store,
            notifier,
            cursor,
            settings,
        }
    }

    pub async fn run(&self) -> Result<HarvestStats> {
        let run_id = Uuid::new_v4();
        let mut stats = HarvestStats::default();

        info!(%run_id, "Harvest run starting");

        let cursor = self.cursor.load();
        match cursor {
            Some(ts) => info!(cursor = %ts, "Resuming after last processed message"),
            None => info!("No cursor, processing the full collected transcript"),
        }

        let collector = TranscriptCollector::new(self.view.as_ref(), self.settings.collector.clone());
        let transcript = collector.collect().await?;

        write_snapshot(&self.settings.snapshot_path, run_id, &transcript)
            .context("writing scrape snapshot")?;

        if transcript.is_empty() {
            info!("No messages collected, nothing to do");
            return Ok(stats);
        }

        let deduped = dedupe_messages(&transcript);
        stats.messages_collected = deduped.len() as u32;

        let to_analyze = filter_after(deduped, cursor);
        stats.messages_new = to_analyze.len() as u32;
        if to_analyze.is_empty() {
            info!("No messages newer than the cursor, nothing to analyze");
            return Ok(stats);
        }

        info!(count = to_analyze.len(), "Analyzing new messages");
        let mut relevant_jobs: Vec<JobRecord> = Vec::new();
        for message in &to_analyze {
            let outcome = self.analyzer.analyze(&message.text).await;
            stats.analyzed += 1;
            if outcome.is_degraded() {
                stats.degraded += 1;
            }
            let classification = outcome.classification();
            if !classification.relevant {
                continue;
            }
            relevant_jobs.push(JobRecord::from_message(message, classification));
        }
        stats.relevant = relevant_jobs.len() as u32;

        if !relevant_jobs.is_empty() {
            let rows = self.store.read_all_rows().await?;
            let existing = existing_record_keys(&rows);
            let unique = dedupe_records(relevant_jobs, &existing);
            stats.duplicates_skipped = stats.relevant - unique.len() as u32;
            stats.appended = unique.len() as u32;

            if !unique.is_empty() {
                self.store.append_rows(records_to_rows(&unique)).await?;
                info!(appended = unique.len(), "Appended new job rows");
                self.notifier.send_summary(&unique).await?;
                stats.notified = true;
            } else {
                info!("All relevant jobs already persisted, nothing to append");
            }
        } else {
            info!("No relevant jobs in this batch");
        }

        // Watermark covers every analyzed message, including degraded ones.
        if let Some(max_ts) = to_analyze.iter().map(|m| m.timestamp).max() {
            self.cursor.save(max_ts)?;
            stats.cursor = Some(max_ts);
            info!(cursor = %max_ts, "Cursor advanced");
        }

        info!(%run_id, "Harvest run finished");
        Ok(stats)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn stats_display_reports_sent_summary_and_cursor() {
        let stats = HarvestStats {
            messages_collected: 5,
            messages_new: 2,
            analyzed: 2,
            degraded: 1,
            relevant: 1,
            appended: 1,
            duplicates_skipped: 0,
            notified: true,
            cursor: chrono::NaiveDate::from_ymd_opt(2026, 1, 2)
                .unwrap()
                .and_hms_opt(9, 0, 0),
        };
        let rendered = stats.to_string();
        assert!(rendered.contains("=== Harvest Run Complete ==="));
        assert!(rendered.contains("Messages collected: 5"));
        assert!(rendered.contains("Summary e-mail:     sent"));
        assert!(rendered.contains("Cursor:             2026-01-02 09:00:00"));
    }

    #[test]
    fn stats_display_reports_skipped_summary_and_unchanged_cursor() {
        let rendered = HarvestStats::default().to_string();
        assert!(rendered.contains("Summary e-mail:     skipped"));
        assert!(rendered.contains("Cursor:             unchanged"));
    }
}
