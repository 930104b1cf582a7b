use std::time::Duration;

use anyhow::{Context, Result};
use async_trait::async_trait;
use tracing::{info, warn};

use jobsignal_common::JobClassification;
use openrouter_client::{ChatRequest, Message, OpenRouterClient};

const SYSTEM_PROMPT: &str = "Return valid JSON only. No markdown. No extra keys.";

/// One chat completion round-trip. The production implementation calls
/// OpenRouter; tests implement it with scripted replies.
#[async_trait]
pub trait ChatCompleter: Send + Sync {
    async fn complete(&self, system: &str, user: &str) -> Result<String>;
}

pub struct OpenRouterCompleter {
    client: OpenRouterClient,
    model: String,
}

impl OpenRouterCompleter {
    pub fn new(client: OpenRouterClient, model: &str) -> Self {
        Self {
            client,
            model: model.to_string(),
        }
    }
}

#[async_trait]
impl ChatCompleter for OpenRouterCompleter {
    async fn complete(&self, system: &str, user: &str) -> Result<String> {
        let request = ChatRequest::new(
            &self.model,
            vec![Message::system(system), Message::user(user)],
        )
        .with_temperature(0.0)
        .with_json_output();

        self.client
            .chat_text(&request)
            .await
            .context("OpenRouter chat completion failed")
    }
}

#[derive(Debug, Clone)]
pub struct AnalyzerSettings {
    /// Total attempts per message, not retries after the first.
    pub retries: u32,
    /// Delay before the second attempt; doubles on each later one.
    pub initial_delay: Duration,
}

impl Default for AnalyzerSettings {
    fn default() -> Self {
        Self {
            retries: 3,
            initial_delay: Duration::from_secs(2),
        }
    }
}

/// How a message's classification concluded. `Degraded` means every attempt
/// failed and the message was assigned the zero-value classification, which
/// is never relevant; the run carries on.
#[derive(Debug, Clone, PartialEq)]
pub enum AnalysisOutcome {
    Classified(JobClassification),
    Degraded(JobClassification),
}

impl AnalysisOutcome {
    pub fn classification(&self) -> &JobClassification {
        match self {
            AnalysisOutcome::Classified(c) | AnalysisOutcome::Degraded(c) => c,
        }
    }

    pub fn is_degraded(&self) -> bool {
        matches!(self, AnalysisOutcome::Degraded(_))
    }
}

/// Classifies one message at a time against the configured CV keywords.
/// Transport errors and malformed replies are retried with exponential
/// backoff; a message that exhausts its attempts degrades instead of
/// failing the run.
pub struct JobAnalyzer {
    backend: Box<dyn ChatCompleter>,
    profile_keywords: Vec<String>,
    settings: AnalyzerSettings,
}

impl JobAnalyzer {
    pub fn new(
        backend: Box<dyn ChatCompleter>,
        profile_keywords: Vec<String>,
        settings: AnalyzerSettings,
    ) -> Self {
        Self {
            backend,
            profile_keywords,
            settings,
        }
    }

    pub async fn analyze(&self, text: &str) -> AnalysisOutcome {
        let prompt = self.user_prompt(text);

        for attempt in 1..=self.settings.retries {
            match self.attempt(&prompt).await {
                Ok(classification) => {
                    info!(attempt, relevant = classification.relevant, "Message classified");
                    return AnalysisOutcome::Classified(classification);
                }
                Err(e) => {
                    warn!(attempt, error = %e, "Classification attempt failed");
                    if attempt < self.settings.retries {
                        tokio::time::sleep(backoff_delay(self.settings.initial_delay, attempt))
                            .await;
                    }
                }
            }
        }

        warn!(
            retries = self.settings.retries,
            "Classification degraded to empty result"
        );
        AnalysisOutcome::Degraded(JobClassification::default())
    }

    async fn attempt(&self, prompt: &str) -> Result<JobClassification> {
        let content = self.backend.complete(SYSTEM_PROMPT, prompt).await?;
        serde_json::from_str(content.trim()).context("classification reply is not valid JSON")
    }

    fn user_prompt(&self, text: &str) -> String {
        format!(
            "You are an assistant that filters chat-group job posts.\n\
             CV keywords: {:?}\n\
             Return JSON ONLY with keys exactly as:\n\
             {{ \"relevant\": true/false, \"company\": \"\", \"role\": \"\", \"location\": \"\", \"experience\": \"\", \"skills\": \"\", \"contact_email\": \"\" }}\n\
             If not a job post or not relevant to keywords, set relevant=false.\n\
             Job post text:\n{text}",
            self.profile_keywords
        )
    }
}

fn backoff_delay(initial: Duration, attempt: u32) -> Duration {
    initial * 2u32.pow(attempt - 1)
}
