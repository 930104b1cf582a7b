use thiserror::Error;

pub type Result<T> = std::result::Result<T, ChatViewError>;

#[derive(Debug, Error)]
pub enum ChatViewError {
    #[error("Network error: {0}")]
    Network(String),

    #[error("API error (status {status}): {message}")]
    Api { status: u16, message: String },

    #[error("Parse error: {0}")]
    Parse(String),

    #[error("Session not ready: chat list did not render within the wait window")]
    SessionNotReady,

    #[error("Conversation not found in chat list: {0}")]
    ConversationNotFound(String),
}

impl From<reqwest::Error> for ChatViewError {
    fn from(err: reqwest::Error) -> Self {
        ChatViewError::Network(err.to_string())
    }
}

impl From<serde_json::Error> for ChatViewError {
    fn from(err: serde_json::Error) -> Self {
        ChatViewError::Parse(err.to_string())
    }
}
