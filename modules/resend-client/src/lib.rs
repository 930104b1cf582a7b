pub mod error;
pub mod types;

pub use error::{ResendError, Result};
pub use types::{SendEmailRequest, SendEmailResponse};

use tracing::debug;

const RESEND_API_URL: &str = "https://api.resend.com";

/// Client for the Resend transactional e-mail API.
pub struct ResendClient {
    http: reqwest::Client,
    api_key: String,
    base_url: String,
}

impl ResendClient {
    pub fn new(api_key: &str) -> Self {
        Self {
            http: reqwest::Client::new(),
            api_key: api_key.to_string(),
            base_url: RESEND_API_URL.to_string(),
        }
    }

    /// Point the client at a different endpoint (local fake in tests).
    pub fn with_base_url(mut self, base_url: &str) -> Self {
        self.base_url = base_url.trim_end_matches('/').to_string();
        self
    }

    /// Send one plain-text e-mail; returns the provider message id.
    pub async fn send(&self, request: &SendEmailRequest) -> Result<String> {
        let url = format!("{}/emails", self.base_url);

        debug!(to = ?request.to, subject = %request.subject, "Sending e-mail");

        let resp = self
            .http
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(request)
            .send()
            .await?;

        let status = resp.status();
        if !status.is_success() {
            let message = resp.text().await.unwrap_or_default();
            return Err(ResendError::Api {
                status: status.as_u16(),
                message,
            });
        }

        let reply: SendEmailResponse = resp.json().await?;
        Ok(reply.id)
    }
}
