//! SQLite storage implementation.
//!
//! A file-based storage backend using SQLite, matching the schema the
//! submission endpoint writes: one `posts` row per submission with the
//! attachment list serialized into a single column, plus an
//! `analysis_results` audit table.

use async_trait::async_trait;
use sqlx::sqlite::{SqlitePool, SqlitePoolOptions};

use crate::error::{ModerationError, Result};
use crate::traits::store::PostStore;
use crate::types::{
    post::{Post, Submission},
    verdict::AnalysisRecord,
};

/// SQLite-based post store.
pub struct SqliteStore {
    pool: SqlitePool,
}

impl SqliteStore {
    /// Create a new SQLite store with the given connection URL.
    ///
    /// # Example URLs
    /// - `sqlite::memory:` - In-memory database (ephemeral)
    /// - `sqlite:posts.db?mode=rwc` - File-based, create if not exists
    pub async fn new(database_url: &str) -> Result<Self> {
        let pool = SqlitePoolOptions::new()
            .max_connections(5)
            .connect(database_url)
            .await
            .map_err(ModerationError::storage)?;

        let store = Self { pool };
        store.run_migrations().await?;
        Ok(store)
    }

    /// Create an in-memory SQLite store (for testing).
    pub async fn in_memory() -> Result<Self> {
        Self::new("sqlite::memory:").await
    }

    /// Run database migrations.
    async fn run_migrations(&self) -> Result<()> {
        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS posts (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                post_id TEXT NOT NULL UNIQUE,
                post_content TEXT,
                post_attachment TEXT,
                processed INTEGER DEFAULT 0
            );

            CREATE INDEX IF NOT EXISTS idx_posts_processed ON posts(processed);
            "#,
        )
        .execute(&self.pool)
        .await
        .map_err(ModerationError::storage)?;

        sqlx::query(
            r#"
            CREATE TABLE IF NOT EXISTS analysis_results (
                id INTEGER PRIMARY KEY AUTOINCREMENT,
                post_id TEXT NOT NULL,
                toxicity_score REAL,
                threat_level_score REAL,
                non_educational_score REAL,
                description TEXT,
                message TEXT,
                created_at TEXT
            );
            "#,
        )
        .execute(&self.pool)
        .await
        .map_err(ModerationError::storage)?;

        Ok(())
    }
}

/// Parse the stored attachment column.
///
/// The column holds either a JSON array of URLs or, in older rows, a
/// single bare URL; both are accepted.
fn parse_attachments(raw: &str) -> Vec<String> {
    match serde_json::from_str::<Vec<String>>(raw) {
        Ok(urls) => urls,
        Err(_) if !raw.trim().is_empty() => vec![raw.to_string()],
        Err(_) => Vec::new(),
    }
}

#[async_trait]
impl PostStore for SqliteStore {
    async fn fetch_unprocessed(&self) -> Result<Vec<Post>> {
        let rows: Vec<(String, Option<String>, Option<String>)> = sqlx::query_as(
            "SELECT post_id, post_content, post_attachment FROM posts WHERE processed = 0",
        )
        .fetch_all(&self.pool)
        .await
        .map_err(ModerationError::storage)?;

        Ok(rows
            .into_iter()
            .map(|(post_id, content, attachment)| Post {
                post_id,
                content: content.unwrap_or_default(),
                attachments: parse_attachments(attachment.as_deref().unwrap_or("")),
                processed: false,
            })
            .collect())
    }

    async fn insert_post(&self, submission: &Submission) -> Result<()> {
        let existing: i64 = sqlx::query_scalar("SELECT COUNT(*) FROM posts WHERE post_id = ?")
            .bind(&submission.post_id)
            .fetch_one(&self.pool)
            .await
            .map_err(ModerationError::storage)?;

        if existing > 0 {
            return Err(ModerationError::DuplicatePost {
                post_id: submission.post_id.clone(),
            });
        }

        let attachment = serde_json::to_string(&submission.post_attachments)?;
        sqlx::query(
            "INSERT INTO posts (post_id, post_content, post_attachment, processed) \
             VALUES (?, ?, ?, 0)",
        )
        .bind(&submission.post_id)
        .bind(&submission.post_content)
        .bind(&attachment)
        .execute(&self.pool)
        .await
        .map_err(ModerationError::storage)?;

        Ok(())
    }

    async fn mark_processed(&self, post_id: &str) -> Result<()> {
        sqlx::query("UPDATE posts SET processed = 1 WHERE post_id = ?")
            .bind(post_id)
            .execute(&self.pool)
            .await
            .map_err(ModerationError::storage)?;
        Ok(())
    }

    async fn delete_post(&self, post_id: &str) -> Result<()> {
        sqlx::query("DELETE FROM posts WHERE post_id = ?")
            .bind(post_id)
            .execute(&self.pool)
            .await
            .map_err(ModerationError::storage)?;
        Ok(())
    }

    async fn insert_analysis(&self, record: &AnalysisRecord) -> Result<()> {
        sqlx::query(
            "INSERT INTO analysis_results \
             (post_id, toxicity_score, threat_level_score, non_educational_score, description, message, created_at) \
             VALUES (?, ?, ?, ?, ?, ?, ?)",
        )
        .bind(&record.post_id)
        .bind(record.toxicity_score)
        .bind(record.threat_level_score)
        .bind(record.non_educational_score)
        .bind(&record.description)
        .bind(&record.message)
        .bind(record.created_at.to_rfc3339())
        .execute(&self.pool)
        .await
        .map_err(ModerationError::storage)?;
        Ok(())
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn submission(post_id: &str) -> Submission {
        Submission {
            post_id: post_id.to_string(),
            post_content: "content".to_string(),
            post_attachments: vec!["https://img.example/a.png".to_string()],
        }
    }

    #[test]
    fn test_parse_attachments_variants() {
        assert_eq!(
            parse_attachments(r#"["https://a.png","https://b.png"]"#),
            vec!["https://a.png", "https://b.png"]
        );
        assert_eq!(parse_attachments("https://a.png"), vec!["https://a.png"]);
        assert!(parse_attachments("").is_empty());
    }

    #[tokio::test]
    async fn test_insert_and_fetch_roundtrip() {
        let store = SqliteStore::in_memory().await.unwrap();
        store.insert_post(&submission("p1")).await.unwrap();

        let posts = store.fetch_unprocessed().await.unwrap();
        assert_eq!(posts.len(), 1);
        assert_eq!(posts[0].post_id, "p1");
        assert_eq!(posts[0].attachments, vec!["https://img.example/a.png"]);
    }

    #[tokio::test]
    async fn test_duplicate_insert_rejected() {
        let store = SqliteStore::in_memory().await.unwrap();
        store.insert_post(&submission("p1")).await.unwrap();

        let err = store.insert_post(&submission("p1")).await.unwrap_err();
        assert!(matches!(err, ModerationError::DuplicatePost { .. }));
    }

    #[tokio::test]
    async fn test_mark_and_delete_idempotent() {
        let store = SqliteStore::in_memory().await.unwrap();
        store.insert_post(&submission("p1")).await.unwrap();

        store.mark_processed("p1").await.unwrap();
        store.mark_processed("p1").await.unwrap();
        assert!(store.fetch_unprocessed().await.unwrap().is_empty());

        store.delete_post("p1").await.unwrap();
        store.delete_post("p1").await.unwrap();
    }

    #[tokio::test]
    async fn test_insert_analysis_with_nullable_axes() {
        let store = SqliteStore::in_memory().await.unwrap();
        let record = AnalysisRecord {
            post_id: "p1".to_string(),
            toxicity_score: 80.0,
            threat_level_score: None,
            non_educational_score: Some(90.0),
            description: "desc".to_string(),
            message: AnalysisRecord::DELETE_MESSAGE.to_string(),
            created_at: chrono::Utc::now(),
        };
        store.insert_analysis(&record).await.unwrap();
    }
}
