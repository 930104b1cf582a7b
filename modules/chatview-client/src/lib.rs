pub mod error;
pub mod scripts;
pub mod types;

pub use error::{ChatViewError, Result};
pub use types::{RenderedBubble, ScrollOutcome};

use std::time::Duration;

use serde::de::DeserializeOwned;
use serde_json::Value;

use types::FoundReply;

const READY_POLL_INTERVAL: Duration = Duration::from_secs(2);

/// Client for a hosted browser-session service that keeps the chat web app
/// logged in and evaluates scripts inside its page. Session bring-up (QR
/// login, persistence, keep-alive) is the service's job; this client only
/// drives the already-open view.
pub struct ChatViewClient {
    client: reqwest::Client,
    base_url: String,
    token: Option<String>,
}

impl ChatViewClient {
    pub fn new(base_url: &str, token: Option<&str>) -> Self {
        let client = reqwest::Client::builder()
            .timeout(Duration::from_secs(30))
            .build()
            .expect("Failed to build HTTP client");

        Self {
            client,
            base_url: base_url.trim_end_matches('/').to_string(),
            token: token.map(String::from),
        }
    }

    /// Evaluate a script in the session's page via the /function endpoint
    /// and deserialize its JSON result. `context` is exposed to the script
    /// as a global of the same name.
    pub async fn evaluate<T: DeserializeOwned>(&self, script: &str, context: Value) -> Result<T> {
        let mut endpoint = format!("{}/function", self.base_url);
        if let Some(ref token) = self.token {
            endpoint.push_str(&format!("?token={token}"));
        }

        let body = serde_json::json!({ "code": script, "context": context });

        let resp = self
            .client
            .post(&endpoint)
            .header("Content-Type", "application/json")
            .json(&body)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let message = resp.text().await.unwrap_or_default();
            return Err(ChatViewError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let text = resp.text().await?;
        Ok(serde_json::from_str(&text)?)
    }

    /// Poll until the chat list renders or the wait window elapses. The
    /// session service owns authentication; an expired session surfaces
    /// here as `SessionNotReady`.
    pub async fn await_ready(&self, timeout: Duration) -> Result<()> {
        let started = std::time::Instant::now();
        loop {
            let ready: bool = self.evaluate(scripts::READY_SCRIPT, Value::Null).await?;
            if ready {
                tracing::info!("Chat session is active");
                return Ok(());
            }
            if started.elapsed() >= timeout {
                return Err(ChatViewError::SessionNotReady);
            }
            tracing::debug!(
                elapsed_secs = started.elapsed().as_secs(),
                "Chat list not rendered yet"
            );
            tokio::time::sleep(READY_POLL_INTERVAL).await;
        }
    }

    /// Open the conversation whose chat-list title equals `name`.
    pub async fn open_conversation(&self, name: &str) -> Result<()> {
        let reply: FoundReply = self
            .evaluate(
                scripts::FIND_CHAT_SCRIPT,
                serde_json::json!({ "name": name }),
            )
            .await?;
        if !reply.found {
            return Err(ChatViewError::ConversationNotFound(name.to_string()));
        }
        tracing::info!(conversation = name, "Opened conversation");
        Ok(())
    }

    /// Every message bubble currently rendered in the open conversation.
    pub async fn rendered_messages(&self) -> Result<Vec<RenderedBubble>> {
        let bubbles: Vec<RenderedBubble> =
            self.evaluate(scripts::COLLECT_SCRIPT, Value::Null).await?;
        tracing::debug!(count = bubbles.len(), "Collected rendered bubbles");
        Ok(bubbles)
    }

    /// Expand truncated messages in the viewport; returns the click count.
    pub async fn expand_truncated(&self) -> Result<u32> {
        self.evaluate(scripts::EXPAND_SCRIPT, Value::Null).await
    }

    /// Scroll the history pane up one step and report its position.
    pub async fn scroll_history(&self) -> Result<ScrollOutcome> {
        self.evaluate(scripts::SCROLL_SCRIPT, Value::Null).await
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn base_url_is_right_trimmed() {
        let client = ChatViewClient::new("http://localhost:3000/", None);
        assert_eq!(client.base_url, "http://localhost:3000");
    }

    #[test]
    fn scroll_outcome_not_found_reply_deserializes() {
        let outcome: ScrollOutcome = serde_json::from_str(r#"{ "found": false }"#).unwrap();
        assert!(!outcome.found);
        assert!(!outcome.at_top);
        assert_eq!(outcome.scroll_height, 0.0);
    }

    #[test]
    fn scroll_outcome_full_reply_deserializes() {
        let raw = r#"{
            "found": true,
            "before": 1200.0,
            "after": 300.0,
            "at_top": false,
            "scroll_height": 5000.0,
            "client_height": 1000.0
        }"#;
        let outcome: ScrollOutcome = serde_json::from_str(raw).unwrap();
        assert!(outcome.found);
        assert_eq!(outcome.before, 1200.0);
        assert_eq!(outcome.after, 300.0);
    }
}
