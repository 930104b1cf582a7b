use std::path::PathBuf;
use std::time::Duration;

use anyhow::{Context, Result};

/// Fallback relevance profile when `PROFILE_KEYWORDS` is unset.
pub const DEFAULT_PROFILE_KEYWORDS: &[&str] = &[
    "qa",
    "quality assurance",
    "software testing",
    "automation testing",
    "playwright",
    "selenium",
    "api testing",
    "python",
    "manual testing",
    "test engineer",
];

const DEFAULT_MODEL: &str = "openai/gpt-4o-mini";
const DEFAULT_WORKSHEET: &str = "Filtered Jobs";
const DEFAULT_DATA_DIR: &str = "data";
const DEFAULT_SCROLL_BUDGET_SECS: u64 = 30;

/// Runtime configuration loaded from environment variables. Secrets and
/// endpoints only; pipeline tunables have defaults and are overridable.
#[derive(Debug, Clone)]
pub struct Config {
    // Transcript source (remote browser session)
    pub chatview_url: String,
    pub chatview_token: Option<String>,
    pub group_name: String,

    // AI / LLM
    pub openrouter_api_key: String,
    pub openrouter_model: String,
    pub openrouter_site_url: Option<String>,
    pub openrouter_site_name: Option<String>,

    // Spreadsheet persistence
    pub sheets_access_token: String,
    pub sheet_url: String,
    pub worksheet_name: String,

    // Notification
    pub resend_api_key: String,
    pub mail_from: String,
    pub summary_recipient: String,

    // Pipeline tuning
    pub profile_keywords: Vec<String>,
    pub data_dir: PathBuf,
    pub scroll_budget_secs: u64,
}

impl Config {
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();

        let config = Self {
            chatview_url: require("CHATVIEW_URL")?,
            chatview_token: std::env::var("CHATVIEW_TOKEN").ok(),
            group_name: require("GROUP_NAME")?,
            openrouter_api_key: require("OPENROUTER_API_KEY")?,
            openrouter_model: std::env::var("OPENROUTER_MODEL")
                .unwrap_or_else(|_| DEFAULT_MODEL.to_string()),
            openrouter_site_url: std::env::var("OPENROUTER_SITE_URL").ok(),
            openrouter_site_name: std::env::var("OPENROUTER_SITE_NAME").ok(),
            sheets_access_token: require("SHEETS_ACCESS_TOKEN")?,
            sheet_url: require("SHEET_URL")?,
            worksheet_name: std::env::var("WORKSHEET_NAME")
                .unwrap_or_else(|_| DEFAULT_WORKSHEET.to_string()),
            resend_api_key: require("RESEND_API_KEY")?,
            mail_from: require("MAIL_FROM")?,
            summary_recipient: require("SUMMARY_RECIPIENT")?,
            profile_keywords: keyword_list(std::env::var("PROFILE_KEYWORDS").ok()),
            data_dir: PathBuf::from(
                std::env::var("DATA_DIR").unwrap_or_else(|_| DEFAULT_DATA_DIR.to_string()),
            ),
            scroll_budget_secs: std::env::var("SCROLL_BUDGET_SECS")
                .ok()
                .and_then(|v| v.parse().ok())
                .unwrap_or(DEFAULT_SCROLL_BUDGET_SECS),
        };

        config.log_keys();
        Ok(config)
    }

    pub fn scroll_budget(&self) -> Duration {
        Duration::from_secs(self.scroll_budget_secs)
    }

    fn log_keys(&self) {
        fn preview(val: &str) -> String {
            let n = val.len().min(5);
            format!("{}...({} chars)", &val[..n], val.len())
        }
        fn preview_opt(val: &Option<String>) -> String {
            match val {
                Some(v) if !v.is_empty() => preview(v),
                _ => "<not set>".to_string(),
            }
        }

        tracing::info!("Config loaded:");
        tracing::info!("  CHATVIEW_URL: {}", self.chatview_url);
        tracing::info!("  CHATVIEW_TOKEN: {}", preview_opt(&self.chatview_token));
        tracing::info!("  GROUP_NAME: {}", self.group_name);
        tracing::info!("  OPENROUTER_API_KEY: {}", preview(&self.openrouter_api_key));
        tracing::info!("  OPENROUTER_MODEL: {}", self.openrouter_model);
        tracing::info!("  SHEETS_ACCESS_TOKEN: {}", preview(&self.sheets_access_token));
        tracing::info!("  RESEND_API_KEY: {}", preview(&self.resend_api_key));
        tracing::info!("  WORKSHEET_NAME: {}", self.worksheet_name);
        tracing::info!("  DATA_DIR: {}", self.data_dir.display());
        tracing::info!("  SCROLL_BUDGET_SECS: {}", self.scroll_budget_secs);
    }
}

fn require(key: &str) -> Result<String> {
    std::env::var(key).with_context(|| format!("{key} environment variable must be set"))
}

fn keyword_list(raw: Option<String>) -> Vec<String> {
    let parsed: Vec<String> = raw
        .unwrap_or_default()
        .split(',')
        .map(|s| s.trim().to_lowercase())
        .filter(|s| !s.is_empty())
        .collect();
    if parsed.is_empty() {
        DEFAULT_PROFILE_KEYWORDS
            .iter()
            .map(|s| s.to_string())
            .collect()
    } else {
        parsed
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn keyword_list_falls_back_to_defaults() {
        let keywords = keyword_list(None);
        assert_eq!(keywords.len(), DEFAULT_PROFILE_KEYWORDS.len());
        assert!(keywords.contains(&"playwright".to_string()));
    }

    #[test]
    fn keyword_list_parses_and_normalizes_csv() {
        let keywords = keyword_list(Some(" Rust , backend ,, SRE ".to_string()));
        assert_eq!(keywords, vec!["rust", "backend", "sre"]);
    }
}
