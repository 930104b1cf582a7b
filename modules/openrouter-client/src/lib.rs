pub mod error;
pub mod types;

pub use error::{OpenRouterError, Result};
pub use types::{ChatRequest, ChatResponse, Message, ResponseFormat};

use tracing::debug;

const OPENROUTER_API_URL: &str = "https://openrouter.ai/api/v1";

pub struct OpenRouterClient {
    api_key: String,
    http: reqwest::Client,
    app_name: Option<String>,
    site_url: Option<String>,
}

impl OpenRouterClient {
    pub fn new(api_key: &str) -> Self {
        Self {
            api_key: api_key.to_string(),
            http: reqwest::Client::new(),
            app_name: None,
            site_url: None,
        }
    }

    /// Sent as X-Title for OpenRouter app attribution.
    pub fn with_app_name(mut self, name: &str) -> Self {
        self.app_name = Some(name.to_string());
        self
    }

    /// Sent as HTTP-Referer for OpenRouter app attribution.
    pub fn with_site_url(mut self, url: &str) -> Self {
        self.site_url = Some(url.to_string());
        self
    }

    pub async fn chat(&self, request: &ChatRequest) -> Result<ChatResponse> {
        let url = format!("{}/chat/completions", OPENROUTER_API_URL);

        debug!(model = %request.model, "OpenRouter chat request");

        let mut req = self
            .http
            .post(&url)
            .bearer_auth(&self.api_key)
            .json(request);
        if let Some(ref site_url) = self.site_url {
            req = req.header("HTTP-Referer", site_url);
        }
        if let Some(ref name) = self.app_name {
            req = req.header("X-Title", name);
        }

        let response = req.send().await?;

        let status = response.status();
        if !status.is_success() {
            let message = response.text().await.unwrap_or_default();
            return Err(OpenRouterError::Api {
                status: status.as_u16(),
                message,
            });
        }

        Ok(response.json().await?)
    }

    /// Send a chat request and return the first choice's content.
    pub async fn chat_text(&self, request: &ChatRequest) -> Result<String> {
        let response = self.chat(request).await?;
        response
            .choices
            .into_iter()
            .next()
            .and_then(|c| c.message.content)
            .ok_or(OpenRouterError::EmptyResponse)
    }
}
