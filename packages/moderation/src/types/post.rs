//! Post and analysis-unit types.

use serde::{Deserialize, Serialize};

/// A stored post awaiting (or past) moderation.
///
/// Owned by the store collaborator; the pipeline only reads it.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Post {
    /// Opaque post identifier, stable across attempts
    pub post_id: String,

    /// Caption / body text submitted with the post
    pub content: String,

    /// Ordered attachment URLs
    pub attachments: Vec<String>,

    /// Whether an analysis cycle has handled this post
    pub processed: bool,
}

impl Post {
    /// Create an unprocessed post.
    pub fn new(
        post_id: impl Into<String>,
        content: impl Into<String>,
        attachments: Vec<String>,
    ) -> Self {
        Self {
            post_id: post_id.into(),
            content: content.into(),
            attachments,
            processed: false,
        }
    }

    /// Flatten this post into per-attachment analysis units.
    pub fn units(&self) -> Vec<Unit> {
        self.attachments
            .iter()
            .map(|url| Unit {
                post_id: self.post_id.clone(),
                caption: self.content.clone(),
                attachment_url: url.clone(),
            })
            .collect()
    }
}

/// One unit of analysis: a single attachment of a single post.
///
/// Each unit costs exactly one model invocation per attempt.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Unit {
    pub post_id: String,
    pub caption: String,
    pub attachment_url: String,
}

/// An incoming submission at the ingestion boundary.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct Submission {
    pub post_id: String,
    pub post_content: String,
    pub post_attachments: Vec<String>,
}

/// Acknowledgement returned by the ingestion boundary.
///
/// Not an analysis result: analysis happens in a deferred batch.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SubmitAck {
    pub post_id: String,
    pub message: String,
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn test_units_flatten_attachments() {
        let post = Post::new(
            "p1",
            "caption",
            vec!["https://a.png".into(), "https://b.png".into()],
        );
        let units = post.units();

        assert_eq!(units.len(), 2);
        assert_eq!(units[0].post_id, "p1");
        assert_eq!(units[0].caption, "caption");
        assert_eq!(units[0].attachment_url, "https://a.png");
        assert_eq!(units[1].attachment_url, "https://b.png");
    }
}
