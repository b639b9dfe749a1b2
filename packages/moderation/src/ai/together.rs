//! Together AI implementation of the [`ModelClient`] trait.

use async_trait::async_trait;
use together_client::{ChatRequest, Message, TogetherClient};

use crate::error::{ModerationError, Result};
use crate::traits::model::ModelClient;

/// Free vision model used for moderation analysis.
pub const DEFAULT_VISION_MODEL: &str = "meta-llama/Llama-Vision-Free";

/// [`ModelClient`] backed by the Together AI chat completions API.
pub struct TogetherModelClient {
    client: TogetherClient,
    model: String,
}

impl TogetherModelClient {
    /// Wrap an existing client with the default vision model.
    pub fn new(client: TogetherClient) -> Self {
        Self {
            client,
            model: DEFAULT_VISION_MODEL.to_string(),
        }
    }

    /// Create from the `TOGETHER_API_KEY` environment variable.
    pub fn from_env() -> Result<Self> {
        let client = TogetherClient::from_env()
            .map_err(|e| ModerationError::Config(e.to_string()))?;
        Ok(Self::new(client))
    }

    /// Use a different model.
    pub fn with_model(mut self, model: impl Into<String>) -> Self {
        self.model = model.into();
        self
    }
}

#[async_trait]
impl ModelClient for TogetherModelClient {
    async fn invoke(&self, prompt: &str, image_url: Option<&str>) -> Result<String> {
        let message = match image_url {
            Some(url) => Message::user_with_image(prompt, url),
            None => Message::user(prompt),
        };

        let request = ChatRequest::new(&self.model)
            .message(message)
            .max_tokens(256)
            .temperature(0.7)
            .stop(vec!["<|eot_id|>".to_string(), "<|eom_id|>".to_string()]);

        let response = self
            .client
            .chat_completion(request)
            .await
            .map_err(ModerationError::model)?;

        Ok(response.content)
    }
}
