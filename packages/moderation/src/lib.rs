//! Resilient Content Moderation Library
//!
//! A structured-extraction pipeline that turns free-form vision model
//! output into typed moderation verdicts, no matter how malformed the
//! output is.
//!
//! # Design Philosophy
//!
//! **"Never let a bad response stop the batch"**
//!
//! - Every model response produces a verdict (parse ladder + heuristics)
//! - Transient failures retry with a bounded budget, then fail open
//! - Posts are always marked processed, so nothing is analyzed twice
//! - Library handles mechanics, app handles the model and the store
//!
//! # Usage
//!
//! ```rust,ignore
//! use moderation::{ModerationRunner, RunnerConfig, MemoryStore};
//! use moderation::testing::MockModel;
//!
//! let store = MemoryStore::new();
//! let model = MockModel::new()
//!     .with_default_response(r#"{"is_remove": false, "toxicity_score": 5}"#);
//!
//! let runner = ModerationRunner::with_config(store, model, RunnerConfig::default());
//! let report = runner.run_batch().await?;
//! println!("processed {} posts", report.posts_processed);
//! ```
//!
//! # Modules
//!
//! - [`traits`] - Core trait abstractions (ModelClient, PostStore)
//! - [`types`] - Verdicts, posts, analysis records, runner config
//! - [`pipeline`] - Extraction ladder, retries, aggregation, batch runner
//! - [`stores`] - Storage implementations (MemoryStore, etc.)
//! - [`testing`] - Mock implementations for testing

pub mod error;
pub mod pipeline;
pub mod stores;
pub mod testing;
pub mod traits;
pub mod types;

#[cfg(feature = "together")]
pub mod ai;

// Re-export core types at crate root
pub use error::{ModerationError, Result};
pub use traits::{model::ModelClient, store::PostStore};
pub use types::{
    config::{RemovalPolicy, RunnerConfig},
    post::{Post, Submission, SubmitAck, Unit},
    verdict::{AnalysisRecord, RawVerdict, Verdict},
};

// Re-export pipeline components
pub use pipeline::{
    aggregate, extract_verdict, format_moderation_prompt, format_post_summary_prompt, submit_post,
    AttemptController, AttemptOutcome, AttemptRecord, ModerationRunner, RunReport,
    MODERATION_PROMPT,
};

// Re-export stores
pub use stores::MemoryStore;

#[cfg(feature = "sqlite")]
pub use stores::SqliteStore;

#[cfg(feature = "together")]
pub use ai::TogetherModelClient;

// Re-export testing utilities
pub use testing::MockModel;
