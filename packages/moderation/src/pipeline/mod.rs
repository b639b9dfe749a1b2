//! Moderation pipeline - the core of the library.
//!
//! The pipeline orchestrates:
//! - Ingestion (validate, dedupe, store unprocessed)
//! - Attempt control (bounded retries around model calls)
//! - Verdict extraction (JSON parse ladder with heuristic fallback)
//! - Keyword scoring (fallback variant with no JSON at all)
//! - Aggregation (max-toxicity, any-flag-removes)
//! - Batch orchestration and store side effects

pub mod aggregate;
pub mod attempt;
pub mod extract;
pub mod ingest;
pub mod keywords;
pub mod prompts;
pub mod runner;

pub use aggregate::aggregate;
pub use attempt::{AttemptController, AttemptOutcome, AttemptRecord};
pub use extract::{extract_verdict, parse_direct, parse_embedded, parse_partial, reconstruct};
pub use ingest::submit_post;
pub use keywords::{assess, keyword_score, matched_categories};
pub use prompts::{
    format_moderation_prompt, format_post_summary_prompt, MODERATION_PROMPT, POST_SUMMARY_PROMPT,
};
pub use runner::{ModerationRunner, RunReport};
