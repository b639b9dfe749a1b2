//! Ingestion boundary: accept a submission and queue it for analysis.
//!
//! Submissions are stored `processed = false` and analyzed by a later
//! batch; the acknowledgement returned here is not an analysis result.
//! The queue transport itself (Celery-style deferral, cron, etc.) is
//! the caller's concern.

use tracing::info;

use crate::error::{ModerationError, Result};
use crate::traits::store::PostStore;
use crate::types::post::{Submission, SubmitAck};

/// Validate and store an incoming submission.
///
/// Rejects missing required fields and duplicate `post_id`s; a
/// duplicate is never reprocessed (idempotent ingestion).
pub async fn submit_post<S: PostStore>(store: &S, submission: Submission) -> Result<SubmitAck> {
    validate(&submission)?;

    store.insert_post(&submission).await?;

    info!(post_id = %submission.post_id, "post received and queued for processing");
    Ok(SubmitAck {
        post_id: submission.post_id,
        message: "Post received and queued for processing".to_string(),
    })
}

fn validate(submission: &Submission) -> Result<()> {
    if submission.post_id.trim().is_empty() {
        return Err(ModerationError::InvalidSubmission {
            reason: "post_id is required".to_string(),
        });
    }
    if submission.post_content.trim().is_empty() {
        return Err(ModerationError::InvalidSubmission {
            reason: "post_content is required".to_string(),
        });
    }
    if submission.post_attachments.is_empty()
        || submission.post_attachments.iter().any(|a| a.trim().is_empty())
    {
        return Err(ModerationError::InvalidSubmission {
            reason: "post_attachments must contain at least one non-empty URL".to_string(),
        });
    }
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::stores::MemoryStore;

    fn submission(post_id: &str) -> Submission {
        Submission {
            post_id: post_id.to_string(),
            post_content: "a post about rust".to_string(),
            post_attachments: vec!["https://img.example/a.png".to_string()],
        }
    }

    #[tokio::test]
    async fn test_submit_stores_unprocessed_post() {
        let store = MemoryStore::new();
        let ack = submit_post(&store, submission("p1")).await.unwrap();

        assert_eq!(ack.post_id, "p1");
        assert_eq!(store.post_count(), 1);
        assert_eq!(store.is_processed("p1"), Some(false));
    }

    #[tokio::test]
    async fn test_duplicate_post_id_rejected() {
        let store = MemoryStore::new();
        submit_post(&store, submission("p1")).await.unwrap();

        let err = submit_post(&store, submission("p1")).await.unwrap_err();
        assert!(matches!(err, ModerationError::DuplicatePost { .. }));
        assert_eq!(store.post_count(), 1);
    }

    #[tokio::test]
    async fn test_missing_fields_rejected() {
        let store = MemoryStore::new();

        let mut s = submission("p1");
        s.post_content = "".to_string();
        assert!(matches!(
            submit_post(&store, s).await.unwrap_err(),
            ModerationError::InvalidSubmission { .. }
        ));

        let mut s = submission("p2");
        s.post_attachments.clear();
        assert!(matches!(
            submit_post(&store, s).await.unwrap_err(),
            ModerationError::InvalidSubmission { .. }
        ));

        assert_eq!(store.post_count(), 0);
    }
}
