//! Testing utilities including mock implementations.
//!
//! These are useful for testing applications that use the moderation
//! library without making real model calls.

use async_trait::async_trait;
use std::collections::HashMap;
use std::io;
use std::sync::{Arc, RwLock};

use crate::error::{ModerationError, Result};
use crate::traits::model::ModelClient;

/// A mock model client for testing.
///
/// Returns scripted responses keyed by image URL, with configurable
/// failure injection and call tracking. Useful for exercising the
/// retry and extraction paths without a real LLM.
#[derive(Default)]
pub struct MockModel {
    /// Scripted responses by image URL
    responses: Arc<RwLock<HashMap<String, String>>>,

    /// Response for invocations without a matching script
    default_response: Arc<RwLock<Option<String>>>,

    /// Number of initial invocations that fail before any succeed
    fail_remaining: Arc<RwLock<u32>>,

    /// Image URLs whose invocations always fail
    fail_urls: Arc<RwLock<Vec<String>>>,

    /// Call tracking for assertions
    calls: Arc<RwLock<Vec<MockModelCall>>>,
}

/// Record of a call made to the mock model.
#[derive(Debug, Clone)]
pub struct MockModelCall {
    /// Prompt sent to the model
    pub prompt: String,

    /// Image URL, if the call was multimodal
    pub image_url: Option<String>,
}

impl MockModel {
    /// Create a new mock model with default behavior.
    pub fn new() -> Self {
        Self::default()
    }

    /// Script a response for calls carrying this image URL.
    pub fn with_response(self, image_url: impl Into<String>, text: impl Into<String>) -> Self {
        self.responses
            .write()
            .unwrap()
            .insert(image_url.into(), text.into());
        self
    }

    /// Set the response for calls with no matching script.
    pub fn with_default_response(self, text: impl Into<String>) -> Self {
        *self.default_response.write().unwrap() = Some(text.into());
        self
    }

    /// Fail the next `n` invocations with a transport error.
    pub fn fail_times(self, n: u32) -> Self {
        *self.fail_remaining.write().unwrap() = n;
        self
    }

    /// Always fail invocations carrying this image URL.
    pub fn fail_url(self, image_url: impl Into<String>) -> Self {
        self.fail_urls.write().unwrap().push(image_url.into());
        self
    }

    /// Get all calls made to this mock.
    pub fn calls(&self) -> Vec<MockModelCall> {
        self.calls.read().unwrap().clone()
    }

    /// Total number of invocations.
    pub fn invocation_count(&self) -> usize {
        self.calls.read().unwrap().len()
    }

    /// Clear call history.
    pub fn clear_calls(&self) {
        self.calls.write().unwrap().clear();
    }

    fn transport_error() -> ModerationError {
        ModerationError::model(io::Error::new(
            io::ErrorKind::ConnectionRefused,
            "mock connection refused",
        ))
    }
}

#[async_trait]
impl ModelClient for MockModel {
    async fn invoke(&self, prompt: &str, image_url: Option<&str>) -> Result<String> {
        self.calls.write().unwrap().push(MockModelCall {
            prompt: prompt.to_string(),
            image_url: image_url.map(|u| u.to_string()),
        });

        {
            let mut remaining = self.fail_remaining.write().unwrap();
            if *remaining > 0 {
                *remaining -= 1;
                return Err(Self::transport_error());
            }
        }

        if let Some(url) = image_url {
            if self.fail_urls.read().unwrap().iter().any(|u| u == url) {
                return Err(Self::transport_error());
            }
            if let Some(text) = self.responses.read().unwrap().get(url) {
                return Ok(text.clone());
            }
        }

        if let Some(text) = self.default_response.read().unwrap().clone() {
            return Ok(text);
        }

        // Sensible defaults: a short summary for text-only calls, a
        // benign verdict for analysis calls.
        Ok(match image_url {
            None => "A short summary of the post.".to_string(),
            Some(_) => {
                r#"{"is_remove": false, "summary": "No issues detected.", "toxicity_score": 0}"#
                    .to_string()
            }
        })
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_scripted_response_by_url() {
        let model = MockModel::new().with_response("https://a.png", "scripted");

        let text = model.invoke("prompt", Some("https://a.png")).await.unwrap();
        assert_eq!(text, "scripted");

        let calls = model.calls();
        assert_eq!(calls.len(), 1);
        assert_eq!(calls[0].image_url.as_deref(), Some("https://a.png"));
    }

    #[tokio::test]
    async fn test_fail_times_then_recover() {
        let model = MockModel::new()
            .with_default_response("ok")
            .fail_times(2);

        assert!(model.invoke("p", None).await.is_err());
        assert!(model.invoke("p", None).await.is_err());
        assert_eq!(model.invoke("p", None).await.unwrap(), "ok");
        assert_eq!(model.invocation_count(), 3);
    }

    #[tokio::test]
    async fn test_fail_url_always_fails() {
        let model = MockModel::new().fail_url("https://bad.png");

        assert!(model.invoke("p", Some("https://bad.png")).await.is_err());
        assert!(model.invoke("p", Some("https://good.png")).await.is_ok());
    }

    #[tokio::test]
    async fn test_default_analysis_response_is_benign_json() {
        let model = MockModel::new();
        let text = model.invoke("p", Some("https://a.png")).await.unwrap();
        assert!(text.contains("\"is_remove\": false"));
    }
}
