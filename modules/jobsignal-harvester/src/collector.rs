use std::time::{Duration, Instant};

use anyhow::Result;
use async_trait::async_trait;
use tracing::{debug, info};

use chatview_client::ChatViewClient;
use jobsignal_common::{ChatMessage, RawBubble, ScrollProbe};

use crate::dedup::dedupe_messages;
use crate::header::HeaderParser;

/// A conversation view that can be read and scrolled. The production
/// implementation drives a hosted browser session; tests implement it with
/// a scripted in-memory view. No browser, no session service.
#[async_trait]
pub trait TranscriptView: Send + Sync {
    /// Every message bubble currently rendered, oldest first.
    async fn rendered_messages(&self) -> Result<Vec<RawBubble>>;

    /// Expand truncated messages in the viewport; returns the click count.
    async fn expand_truncated(&self) -> Result<u32>;

    /// Scroll the history pane up one step and report its position.
    async fn scroll_up(&self) -> Result<ScrollProbe>;
}

#[async_trait]
impl TranscriptView for ChatViewClient {
    async fn rendered_messages(&self) -> Result<Vec<RawBubble>> {
        let bubbles = ChatViewClient::rendered_messages(self).await?;
        Ok(bubbles
            .into_iter()
            .map(|b| RawBubble {
                header_text: b.header,
                body_text: b.text,
            })
            .collect())
    }

    async fn expand_truncated(&self) -> Result<u32> {
        Ok(ChatViewClient::expand_truncated(self).await?)
    }

    async fn scroll_up(&self) -> Result<ScrollProbe> {
        let outcome = self.scroll_history().await?;
        Ok(ScrollProbe {
            found: outcome.found,
            at_top: outcome.at_top,
            before: outcome.before,
            after: outcome.after,
            scroll_height: outcome.scroll_height,
            client_height: outcome.client_height,
        })
    }
}

#[derive(Debug, Clone)]
pub struct CollectorSettings {
    /// Wall-clock budget for the scroll-back loop. Rounds already started
    /// run to completion, so the total can overshoot slightly.
    pub budget: Duration,
    /// Pause between scroll rounds, giving lazy-loaded history time to render.
    pub round_pause: Duration,
    /// Pause after expanding truncated messages before reading the viewport.
    pub settle_pause: Duration,
}

impl Default for CollectorSettings {
    fn default() -> Self {
        Self {
            budget: Duration::from_secs(30),
            round_pause: Duration::from_millis(900),
            settle_pause: Duration::from_millis(250),
        }
    }
}

/// Walks the conversation history backwards under a time budget, scraping
/// the viewport after each scroll step. The history pane virtualizes old
/// messages, so the same bubble is scraped many times across rounds; the
/// final pass collapses those repeats and sorts by timestamp.
pub struct TranscriptCollector<'a> {
    view: &'a dyn TranscriptView,
    parser: HeaderParser,
    settings: CollectorSettings,
}

impl<'a> TranscriptCollector<'a> {
    pub fn new(view: &'a dyn TranscriptView, settings: CollectorSettings) -> Self {
        Self {
            view,
            parser: HeaderParser::new(),
            settings,
        }
    }

    pub async fn collect(&self) -> Result<Vec<ChatMessage>> {
        info!(
            budget_secs = self.settings.budget.as_secs(),
            "Starting transcript scroll-back"
        );

        let started = Instant::now();
        let mut collected: Vec<ChatMessage> = Vec::new();
        let mut round = 0u32;

        // Rounds run to completion; budget, top-of-pane and a missing
        // container are checked between rounds, so even a tiny budget reads
        // the current viewport once.
        loop {
            round += 1;

            let expanded = self.view.expand_truncated().await?;
            if expanded > 0 {
                info!(expanded, "Expanded truncated messages");
                tokio::time::sleep(self.settings.settle_pause).await;
            }

            collected.extend(self.snapshot().await?);
            let unique = dedupe_messages(&collected).len();

            let probe = self.view.scroll_up().await?;
            info!(
                round,
                elapsed_secs = started.elapsed().as_secs(),
                unique,
                at_top = probe.at_top,
                "Scroll round complete"
            );

            if !probe.found {
                info!("No scrollable history container found, stopping scroll-back");
                break;
            }
            if probe.at_top {
                info!("Reached top of history");
                break;
            }
            if started.elapsed() >= self.settings.budget {
                info!("Collection budget exhausted");
                break;
            }

            tokio::time::sleep(self.settings.round_pause).await;
        }

        // Late-rendered long messages may still be collapsed.
        let expanded = self.view.expand_truncated().await?;
        if expanded > 0 {
            info!(expanded, "Expanded truncated messages in final pass");
        }

        let mut unique = dedupe_messages(&collected);
        unique.sort_by_key(|m| m.timestamp);
        info!(
            collected = collected.len(),
            unique = unique.len(),
            "Transcript collection complete"
        );
        Ok(unique)
    }

    /// Parse every bubble currently rendered. Bubbles with headers that
    /// match no known format, and bubbles with empty bodies, are dropped
    /// without logging: the viewport is full of system notices and media
    /// placeholders that are not messages.
    async fn snapshot(&self) -> Result<Vec<ChatMessage>> {
        let bubbles = self.view.rendered_messages().await?;
        let rendered = bubbles.len();

        let mut messages: Vec<ChatMessage> = bubbles
            .into_iter()
            .filter_map(|bubble| {
                let header = self.parser.parse(&bubble.header_text)?;
                let text = bubble.body_text.trim();
                if text.is_empty() {
                    return None;
                }
                Some(ChatMessage {
                    sender: header.sender,
                    timestamp: header.timestamp,
                    text: text.to_string(),
                })
            })
            .collect();
        messages.sort_by_key(|m| m.timestamp);

        debug!(rendered, parsed = messages.len(), "Scraped current viewport");
        Ok(messages)
    }
}
