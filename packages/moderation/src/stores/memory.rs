//! In-memory storage implementation for testing and development.

use async_trait::async_trait;
use indexmap::IndexMap;
use std::sync::RwLock;

use crate::error::{ModerationError, Result};
use crate::traits::store::PostStore;
use crate::types::{
    post::{Post, Submission},
    verdict::AnalysisRecord,
};

/// In-memory store for posts and analysis records.
///
/// Useful for testing and development. Not suitable for production
/// as data is lost on restart. Iteration order follows insertion
/// order, which keeps batch processing deterministic in tests.
pub struct MemoryStore {
    posts: RwLock<IndexMap<String, Post>>,
    analyses: RwLock<Vec<AnalysisRecord>>,
}

impl Default for MemoryStore {
    fn default() -> Self {
        Self::new()
    }
}

impl MemoryStore {
    /// Create a new empty memory store.
    pub fn new() -> Self {
        Self {
            posts: RwLock::new(IndexMap::new()),
            analyses: RwLock::new(Vec::new()),
        }
    }

    /// Seed a post directly, bypassing submission validation.
    pub fn seed_post(&self, post: Post) {
        self.posts
            .write()
            .unwrap()
            .insert(post.post_id.clone(), post);
    }

    /// Get the number of stored posts.
    pub fn post_count(&self) -> usize {
        self.posts.read().unwrap().len()
    }

    /// Get the number of stored analysis records.
    pub fn analysis_count(&self) -> usize {
        self.analyses.read().unwrap().len()
    }

    /// Get a post by id.
    pub fn get_post(&self, post_id: &str) -> Option<Post> {
        self.posts.read().unwrap().get(post_id).cloned()
    }

    /// Processed flag for a post, or None if the post does not exist.
    pub fn is_processed(&self, post_id: &str) -> Option<bool> {
        self.posts
            .read()
            .unwrap()
            .get(post_id)
            .map(|p| p.processed)
    }

    /// All stored analysis records.
    pub fn analyses(&self) -> Vec<AnalysisRecord> {
        self.analyses.read().unwrap().clone()
    }

    /// Clear all stored data.
    pub fn clear(&self) {
        self.posts.write().unwrap().clear();
        self.analyses.write().unwrap().clear();
    }
}

#[async_trait]
impl PostStore for MemoryStore {
    async fn fetch_unprocessed(&self) -> Result<Vec<Post>> {
        Ok(self
            .posts
            .read()
            .unwrap()
            .values()
            .filter(|p| !p.processed)
            .cloned()
            .collect())
    }

    async fn insert_post(&self, submission: &Submission) -> Result<()> {
        let mut posts = self.posts.write().unwrap();
        if posts.contains_key(&submission.post_id) {
            return Err(ModerationError::DuplicatePost {
                post_id: submission.post_id.clone(),
            });
        }
        posts.insert(
            submission.post_id.clone(),
            Post::new(
                &submission.post_id,
                &submission.post_content,
                submission.post_attachments.clone(),
            ),
        );
        Ok(())
    }

    async fn mark_processed(&self, post_id: &str) -> Result<()> {
        if let Some(post) = self.posts.write().unwrap().get_mut(post_id) {
            post.processed = true;
        }
        Ok(())
    }

    async fn delete_post(&self, post_id: &str) -> Result<()> {
        self.posts.write().unwrap().shift_remove(post_id);
        Ok(())
    }

    async fn insert_analysis(&self, record: &AnalysisRecord) -> Result<()> {
        self.analyses.write().unwrap().push(record.clone());
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    #[tokio::test]
    async fn test_fetch_skips_processed() {
        let store = MemoryStore::new();
        store.seed_post(Post::new("p1", "one", vec!["a".into()]));
        let mut done = Post::new("p2", "two", vec!["b".into()]);
        done.processed = true;
        store.seed_post(done);

        let unprocessed = store.fetch_unprocessed().await.unwrap();
        assert_eq!(unprocessed.len(), 1);
        assert_eq!(unprocessed[0].post_id, "p1");
    }

    #[tokio::test]
    async fn test_mark_processed_idempotent() {
        let store = MemoryStore::new();
        store.seed_post(Post::new("p1", "one", vec!["a".into()]));

        store.mark_processed("p1").await.unwrap();
        store.mark_processed("p1").await.unwrap();
        assert_eq!(store.is_processed("p1"), Some(true));

        // Missing id is a no-op, not an error.
        store.mark_processed("ghost").await.unwrap();
    }

    #[tokio::test]
    async fn test_delete_idempotent() {
        let store = MemoryStore::new();
        store.seed_post(Post::new("p1", "one", vec!["a".into()]));

        store.delete_post("p1").await.unwrap();
        store.delete_post("p1").await.unwrap();
        assert_eq!(store.post_count(), 0);
    }
}
