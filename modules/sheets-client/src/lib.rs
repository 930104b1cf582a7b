pub mod error;
pub mod types;

pub use error::{Result, SheetsError};
pub use types::{ValueRange, WriteBody};

use tracing::debug;

const SHEETS_API_URL: &str = "https://sheets.googleapis.com/v4/spreadsheets";

/// Client for the Google Sheets v4 values API. Authenticates with a
/// caller-supplied OAuth bearer token; obtaining and refreshing the token
/// is the caller's concern.
pub struct SheetsClient {
    http: reqwest::Client,
    access_token: String,
    base_url: String,
}

impl SheetsClient {
    pub fn new(access_token: &str) -> Self {
        Self {
            http: reqwest::Client::new(),
            access_token: access_token.to_string(),
            base_url: SHEETS_API_URL.to_string(),
        }
    }

    /// Point the client at a different endpoint (local fake in tests).
    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }

    /// All rows in the given A1-notation range. Empty ranges yield an
    /// empty vec.
    pub async fn get_values(&self, spreadsheet_id: &str, range: &str) -> Result<Vec<Vec<String>>> {
        let url = self.values_url(spreadsheet_id, range, "")?;

        debug!(spreadsheet_id, range, "Sheets values.get");

        let resp = self
            .http
            .get(url)
            .bearer_auth(&self.access_token)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let message = resp.text().await.unwrap_or_default();
            return Err(SheetsError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let value_range: ValueRange = resp.json().await?;
        Ok(value_range.values)
    }

    /// Append rows after the last non-empty row of the range's table.
    pub async fn append_rows(
        &self,
        spreadsheet_id: &str,
        range: &str,
        rows: &[Vec<String>],
    ) -> Result<()> {
        let url = self.values_url(spreadsheet_id, range, ":append")?;
        let body = WriteBody {
            values: rows.to_vec(),
        };

        debug!(spreadsheet_id, range, rows = rows.len(), "Sheets values.append");

        let resp = self
            .http
            .post(url)
            .bearer_auth(&self.access_token)
            .query(&[("valueInputOption", "USER_ENTERED")])
            .json(&body)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let message = resp.text().await.unwrap_or_default();
            return Err(SheetsError::Api {
                status: status.as_u16(),
                message,
            });
        }

        Ok(())
    }

    /// Overwrite the cells of the given range.
    pub async fn update_values(
        &self,
        spreadsheet_id: &str,
        range: &str,
        rows: &[Vec<String>],
    ) -> Result<()> {
        let url = self.values_url(spreadsheet_id, range, "")?;
        let body = WriteBody {
            values: rows.to_vec(),
        };

        debug!(spreadsheet_id, range, rows = rows.len(), "Sheets values.update");

        let resp = self
            .http
            .put(url)
            .bearer_auth(&self.access_token)
            .query(&[("valueInputOption", "RAW")])
            .json(&body)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let message = resp.text().await.unwrap_or_default();
            return Err(SheetsError::Api {
                status: status.as_u16(),
                message,
            });
        }

        Ok(())
    }

    /// `{base}/{id}/values/{range}{suffix}` with the range percent-encoded
    /// as a path segment (worksheet titles may contain spaces).
    fn values_url(
        &self,
        spreadsheet_id: &str,
        range: &str,
        suffix: &str,
    ) -> Result<reqwest::Url> {
        let mut url = reqwest::Url::parse(&self.base_url)
            .map_err(|e| SheetsError::Url(e.to_string()))?;
        {
            let mut segments = url
                .path_segments_mut()
                .map_err(|_| SheetsError::Url(format!("cannot-be-a-base URL: {}", self.base_url)))?;
            segments
                .pop_if_empty()
                .push(spreadsheet_id)
                .push("values")
                .push(&format!("{range}{suffix}"));
        }
        Ok(url)
    }
}

/// Extract the spreadsheet id from a full sheet URL
/// (`https://docs.google.com/spreadsheets/d/<id>/edit#gid=0`).
pub fn spreadsheet_id_from_url(url: &str) -> Option<&str> {
    let (_, rest) = url.split_once("/d/")?;
    let id = rest.split(['/', '?', '#']).next()?;
    if id.is_empty() {
        None
    } else {
        Some(id)
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn extracts_id_from_edit_url() {
        let url = "https://docs.google.com/spreadsheets/d/1AbC_dEf-123/edit#gid=0";
        assert_eq!(spreadsheet_id_from_url(url), Some("1AbC_dEf-123"));
    }

    #[test]
    fn extracts_id_without_trailing_path() {
        let url = "https://docs.google.com/spreadsheets/d/1AbC_dEf-123";
        assert_eq!(spreadsheet_id_from_url(url), Some("1AbC_dEf-123"));
    }

    #[test]
    fn rejects_urls_without_id_segment() {
        assert_eq!(spreadsheet_id_from_url("https://docs.google.com/spreadsheets"), None);
        assert_eq!(spreadsheet_id_from_url("https://docs.google.com/spreadsheets/d/"), None);
    }

    #[test]
    fn values_url_encodes_worksheet_spaces() {
        let client = SheetsClient::new("token");
        let url = client
            .values_url("sheet123", "Filtered Jobs!A:G", ":append")
            .unwrap();
        assert_eq!(
            url.as_str(),
            "https://sheets.googleapis.com/v4/spreadsheets/sheet123/values/Filtered%20Jobs!A:G:append"
        );
    }
}
