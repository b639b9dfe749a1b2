//! Storage trait for posts and analysis records.

use async_trait::async_trait;

use crate::error::Result;
use crate::types::{
    post::{Post, Submission},
    verdict::AnalysisRecord,
};

/// Persistent store for posts and audit records.
///
/// Implementations back this with SQLite, Postgres, or memory. The
/// mutating operations are idempotent: marking an already-processed
/// post or deleting an already-deleted post succeeds silently, so the
/// runner can apply them per attachment without coordination.
#[async_trait]
pub trait PostStore: Send + Sync {
    /// Fetch all posts with `processed = false`. Ordering unspecified.
    async fn fetch_unprocessed(&self) -> Result<Vec<Post>>;

    /// Insert a new submission with `processed = false`.
    ///
    /// Returns `ModerationError::DuplicatePost` if the `post_id` is
    /// already stored; duplicates are rejected, never reprocessed.
    async fn insert_post(&self, submission: &Submission) -> Result<()>;

    /// Mark a post processed. Idempotent; missing ids are a no-op.
    async fn mark_processed(&self, post_id: &str) -> Result<()>;

    /// Delete a post. Idempotent; safe to call on an already-deleted id.
    async fn delete_post(&self, post_id: &str) -> Result<()>;

    /// Append an audit record. Not required for decision correctness.
    async fn insert_analysis(&self, record: &AnalysisRecord) -> Result<()>;
}
