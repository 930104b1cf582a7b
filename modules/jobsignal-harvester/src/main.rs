use std::time::Duration;

use anyhow::{anyhow, Result};
use tracing::info;
use tracing_subscriber::EnvFilter;

use chatview_client::ChatViewClient;
use jobsignal_common::Config;
use jobsignal_harvester::analyzer::{AnalyzerSettings, JobAnalyzer, OpenRouterCompleter};
use jobsignal_harvester::collector::CollectorSettings;
use jobsignal_harvester::harvester::{HarvestSettings, Harvester};
use jobsignal_harvester::notify::EmailNotifier;
use jobsignal_harvester::records::SheetStore;
use openrouter_client::OpenRouterClient;
use resend_client::ResendClient;
use sheets_client::{spreadsheet_id_from_url, SheetsClient};

/// How long to wait for the hosted chat session to render its chat list.
const SESSION_WAIT: Duration = Duration::from_secs(120);

#[tokio::main]
async fn main() -> Result<()> {
    // Initialize logging
    tracing_subscriber::fmt()
        .with_env_filter(EnvFilter::from_default_env().add_directive("jobsignal=info".parse()?))
        .init();

    info!("Job Signal harvester starting...");

    // Load config
    let config = Config::from_env()?;

    // Connect to the hosted chat session and open the group
    let chat = ChatViewClient::new(&config.chatview_url, config.chatview_token.as_deref());
    chat.await_ready(SESSION_WAIT).await?;
    chat.open_conversation(&config.group_name).await?;

    // Classification backend
    let mut openrouter = OpenRouterClient::new(&config.openrouter_api_key);
    if let Some(ref url) = config.openrouter_site_url {
        openrouter = openrouter.with_site_url(url);
    }
    if let Some(ref name) = config.openrouter_site_name {
        openrouter = openrouter.with_app_name(name);
    }
    let analyzer = JobAnalyzer::new(
        Box::new(OpenRouterCompleter::new(openrouter, &config.openrouter_model)),
        config.profile_keywords.clone(),
        AnalyzerSettings::default(),
    );

    // Spreadsheet persistence
    let spreadsheet_id = spreadsheet_id_from_url(&config.sheet_url)
        .ok_or_else(|| anyhow!("SHEET_URL does not contain a spreadsheet id"))?;
    let store = SheetStore::new(
        SheetsClient::new(&config.sheets_access_token),
        spreadsheet_id,
        &config.worksheet_name,
    );
    store.ensure_header().await?;

    // Summary notification
    let notifier = EmailNotifier::new(
        ResendClient::new(&config.resend_api_key),
        &config.mail_from,
        &config.summary_recipient,
        &format!("New Filtered Jobs - {}", config.group_name),
    );

    let settings = HarvestSettings {
        collector: CollectorSettings {
            budget: config.scroll_budget(),
            ..CollectorSettings::default()
        },
        cursor_path: config.data_dir.join("last_processed.json"),
        snapshot_path: config.data_dir.join("scraped_messages.json"),
    };

    let harvester = Harvester::new(
        Box::new(chat),
        analyzer,
        Box::new(store),
        Box::new(notifier),
        settings,
    );

    let stats = harvester.run().await?;
    info!("Harvest run complete. {stats}");

    Ok(())
}
