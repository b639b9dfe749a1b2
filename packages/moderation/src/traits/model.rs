//! Model invocation trait.

use async_trait::async_trait;

use crate::error::Result;

/// A single-round-trip model invocation.
///
/// Implementations wrap a specific provider (Together, OpenAI, etc.)
/// and handle transport. The pipeline treats the call as a black box
/// that returns raw text or fails: any transport error, timeout, or
/// empty response is a failure the attempt controller may retry.
#[async_trait]
pub trait ModelClient: Send + Sync {
    /// Send a prompt, optionally with an attached image URL, and return
    /// the raw response text.
    async fn invoke(&self, prompt: &str, image_url: Option<&str>) -> Result<String>;
}
