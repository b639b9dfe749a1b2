//! Typed errors for the moderation library.
//!
//! Uses `thiserror` for library errors (not `anyhow`) to provide
//! strongly-typed, composable error handling.

use thiserror::Error;

/// Errors that can occur during moderation operations.
#[derive(Debug, Error)]
pub enum ModerationError {
    /// Model invocation failed (transport, timeout, API error)
    #[error("model error: {0}")]
    Model(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// Model returned no usable text
    #[error("empty model response")]
    EmptyResponse,

    /// Verdict is missing its post identifier
    #[error("verdict missing post_id")]
    MissingPostId,

    /// Storage operation failed
    #[error("storage error: {0}")]
    Storage(#[source] Box<dyn std::error::Error + Send + Sync>),

    /// Submission rejected: the post_id is already stored
    #[error("post already exists: {post_id}")]
    DuplicatePost { post_id: String },

    /// Submission rejected: required field missing or empty
    #[error("invalid submission: {reason}")]
    InvalidSubmission { reason: String },

    /// JSON parsing error
    #[error("JSON parse error: {0}")]
    JsonParse(#[from] serde_json::Error),

    /// Configuration error
    #[error("config error: {0}")]
    Config(String),
}

impl ModerationError {
    /// Wrap an arbitrary error as a model transport failure.
    pub fn model(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Model(Box::new(err))
    }

    /// Wrap an arbitrary error as a storage failure.
    pub fn storage(err: impl std::error::Error + Send + Sync + 'static) -> Self {
        Self::Storage(Box::new(err))
    }
}

/// Result type alias for moderation operations.
pub type Result<T> = std::result::Result<T, ModerationError>;
