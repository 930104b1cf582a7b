use anyhow::{Context, Result};
use async_trait::async_trait;
use tracing::info;

use jobsignal_common::{JobRecord, SHEET_HEADER};
use sheets_client::SheetsClient;

/// Persisted storage for job rows. The production implementation is a
/// worksheet; tests implement it with an in-memory table.
#[async_trait]
pub trait RecordStore: Send + Sync {
    /// Every row of the store, header included, in sheet order.
    async fn read_all_rows(&self) -> Result<Vec<Vec<String>>>;

    /// Append rows after the current last row.
    async fn append_rows(&self, rows: Vec<Vec<String>>) -> Result<()>;
}

pub struct SheetStore {
    client: SheetsClient,
    spreadsheet_id: String,
    worksheet: String,
}

impl SheetStore {
    pub fn new(client: SheetsClient, spreadsheet_id: &str, worksheet: &str) -> Self {
        Self {
            client,
            spreadsheet_id: spreadsheet_id.to_string(),
            worksheet: worksheet.to_string(),
        }
    }

    fn data_range(&self) -> String {
        format!("{}!A:G", self.worksheet)
    }

    /// Write the column header row if the worksheet doesn't carry it yet.
    pub async fn ensure_header(&self) -> Result<()> {
        let header_range = format!("{}!A1:G1", self.worksheet);
        let rows = self
            .client
            .get_values(&self.spreadsheet_id, &header_range)
            .await
            .context("reading sheet header row")?;

        if !header_present(&rows) {
            info!(worksheet = %self.worksheet, "Writing sheet header row");
            let header: Vec<String> = SHEET_HEADER.iter().map(|c| c.to_string()).collect();
            self.client
                .update_values(&self.spreadsheet_id, &header_range, &[header])
                .await
                .context("writing sheet header row")?;
        }
        Ok(())
    }
}

#[async_trait]
impl RecordStore for SheetStore {
    async fn read_all_rows(&self) -> Result<Vec<Vec<String>>> {
        self.client
            .get_values(&self.spreadsheet_id, &self.data_range())
            .await
            .context("reading sheet rows")
    }

    async fn append_rows(&self, rows: Vec<Vec<String>>) -> Result<()> {
        self.client
            .append_rows(&self.spreadsheet_id, &self.data_range(), &rows)
            .await
            .context("appending sheet rows")
    }
}

pub fn records_to_rows(records: &[JobRecord]) -> Vec<Vec<String>> {
    records.iter().map(JobRecord::to_row).collect()
}

/// True when the first returned row is exactly the expected column header.
/// Header cells are compared verbatim; a renamed or reordered header is
/// rewritten rather than trusted.
fn header_present(rows: &[Vec<String>]) -> bool {
    rows.first().is_some_and(|row| row == &SHEET_HEADER)
}
