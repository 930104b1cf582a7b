use serde::Deserialize;

/// One message bubble as returned by the collection script: the raw
/// metadata header attribute and the joined visible body text.
#[derive(Debug, Clone, Deserialize)]
pub struct RenderedBubble {
    #[serde(default)]
    pub header: String,
    #[serde(default)]
    pub text: String,
}

/// Result of one scroll step. When `found` is false no scrollable history
/// container exists in the page and the remaining fields are zeroed.
#[derive(Debug, Clone, Copy, Default, Deserialize)]
pub struct ScrollOutcome {
    #[serde(default)]
    pub found: bool,
    #[serde(default)]
    pub at_top: bool,
    #[serde(default)]
    pub before: f64,
    #[serde(default)]
    pub after: f64,
    #[serde(default)]
    pub scroll_height: f64,
    #[serde(default)]
    pub client_height: f64,
}

#[derive(Debug, Clone, Copy, Deserialize)]
pub(crate) struct FoundReply {
    #[serde(default)]
    pub found: bool,
}
