//! Pure Together AI REST API client
//!
//! A clean, minimal client for the Together AI chat completions API with no
//! domain-specific logic. Supports text and vision (image URL) messages.
//!
//! # Example
//!
//! ```rust,ignore
//! use together_client::{TogetherClient, ChatRequest, Message};
//!
//! let client = TogetherClient::from_env()?;
//!
//! let response = client.chat_completion(ChatRequest {
//!     model: "meta-llama/Llama-Vision-Free".into(),
//!     messages: vec![Message::user_with_image(
//!         "Describe this image",
//!         "https://example.com/photo.jpg",
//!     )],
//!     ..Default::default()
//! }).await?;
//!
//! println!("{}", response.content);
//! ```

pub mod error;
pub mod types;

pub use error::{Result, TogetherError};
pub use types::*;

use reqwest::Client;
use tracing::{debug, warn};

/// Pure Together AI API client.
#[derive(Clone)]
pub struct TogetherClient {
    http_client: Client,
    api_key: String,
    base_url: String,
}

impl TogetherClient {
    /// Create a new Together client with the given API key.
    pub fn new(api_key: impl Into<String>) -> Self {
        Self {
            http_client: Client::new(),
            api_key: api_key.into(),
            base_url: "https://api.together.xyz/v1".to_string(),
        }
    }

    /// Create from environment variable `TOGETHER_API_KEY`.
    pub fn from_env() -> Result<Self> {
        let api_key = std::env::var("TOGETHER_API_KEY")
            .map_err(|_| TogetherError::Config("TOGETHER_API_KEY not set".into()))?;
        Ok(Self::new(api_key))
    }

    /// Set a custom base URL (for proxies or compatible endpoints).
    pub fn with_base_url(mut self, url: impl Into<String>) -> Self {
        self.base_url = url.into();
        self
    }

    /// Get the API key.
    pub fn api_key(&self) -> &str {
        &self.api_key
    }

    /// Get the base URL.
    pub fn base_url(&self) -> &str {
        &self.base_url
    }

    /// Chat completion.
    ///
    /// Send messages to the chat completions API and get a response.
    pub async fn chat_completion(&self, request: ChatRequest) -> Result<ChatResponse> {
        let start = std::time::Instant::now();

        let response = self
            .http_client
            .post(format!("{}/chat/completions", self.base_url))
            .header("Authorization", format!("Bearer {}", self.api_key))
            .header("Content-Type", "application/json")
            .json(&request)
            .send()
            .await
            .map_err(|e| {
                warn!(error = %e, "Together request failed");
                TogetherError::Network(e.to_string())
            })?;

        let status = response.status();
        if !status.is_success() {
            let error_text = response.text().await.unwrap_or_default();
            warn!(status = %status, error = %error_text, "Together API error");
            return Err(TogetherError::Api(format!(
                "Together API error: {}",
                error_text
            )));
        }

        let chat_response: types::ChatResponseRaw = response
            .json()
            .await
            .map_err(|e| TogetherError::Parse(e.to_string()))?;

        let content = chat_response
            .choices
            .into_iter()
            .next()
            .map(|c| c.message.content)
            .ok_or_else(|| TogetherError::Api("No response from Together".into()))?;

        debug!(
            model = %request.model,
            duration_ms = start.elapsed().as_millis(),
            "Together chat completion"
        );

        Ok(ChatResponse {
            content,
            usage: chat_response.usage,
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_client_builder() {
        let client = TogetherClient::new("tok-test").with_base_url("https://custom.api.com");

        assert_eq!(client.api_key, "tok-test");
        assert_eq!(client.base_url, "https://custom.api.com");
    }
}
