//! The verdict schema: the bounded data contract for one moderation outcome.
//!
//! Construction never produces invalid output: scores are clamped into
//! `[0, 100]` and a missing summary is replaced with a fixed default.
//! A missing `post_id` is the only hard error, since it is caller-supplied
//! context that cannot be inferred from model output.

use chrono::{DateTime, Utc};
use serde::{Deserialize, Serialize};

use crate::error::{ModerationError, Result};

/// Default summary when a verdict recommends removal.
pub const DEFAULT_REMOVE_SUMMARY: &str =
    "The post contains harmful content and should be removed.";

/// Default summary when a verdict does not recommend removal.
pub const DEFAULT_SAFE_SUMMARY: &str = "The post is generally safe.";

/// Summary used when a post fails the relevance check.
pub const RELEVANCE_FAILURE_SUMMARY: &str =
    "The post does not align with the platform's educational and technological purpose.";

/// A validated moderation verdict for one unit of analysis
/// (a single attachment, or the aggregate for a whole post).
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct Verdict {
    /// Identifier of the post this verdict belongs to
    pub post_id: String,

    /// Whether the content should be removed
    pub is_remove: bool,

    /// Free-text explanation, never empty
    pub summary: String,

    /// Toxicity score, always within `[0, 100]`
    pub toxicity_score: f64,
}

impl Verdict {
    /// Build a verdict from arbitrary field values, normalizing as needed.
    ///
    /// - `toxicity_score` is clamped into `[0, 100]`; non-finite values
    ///   become 0.
    /// - A missing or empty `summary` is replaced with a fixed default
    ///   conditioned on `is_remove`.
    /// - An empty `post_id` is rejected.
    pub fn new(
        post_id: impl Into<String>,
        is_remove: bool,
        summary: Option<String>,
        toxicity_score: f64,
    ) -> Result<Self> {
        let post_id = post_id.into();
        if post_id.trim().is_empty() {
            return Err(ModerationError::MissingPostId);
        }

        let summary = match summary {
            Some(s) if !s.trim().is_empty() => s,
            _ => default_summary(is_remove).to_string(),
        };

        Ok(Self {
            post_id,
            is_remove,
            summary,
            toxicity_score: clamp_score(toxicity_score),
        })
    }

    /// The safest-available verdict: score 0, not removed.
    ///
    /// Used when extraction is wholly inconclusive (fail-open).
    pub fn safe_default(post_id: impl Into<String>) -> Result<Self> {
        Self::new(post_id, false, None, 0.0)
    }
}

/// The default summary for a given removal decision.
pub fn default_summary(is_remove: bool) -> &'static str {
    if is_remove {
        DEFAULT_REMOVE_SUMMARY
    } else {
        DEFAULT_SAFE_SUMMARY
    }
}

/// Clamp a score into `[0, 100]`, mapping non-finite values to 0.
pub fn clamp_score(score: f64) -> f64 {
    if !score.is_finite() {
        return 0.0;
    }
    score.clamp(0.0, 100.0)
}

/// Unvalidated verdict shape as deserialized from model output.
///
/// `is_remove` is the anchor field: a JSON object without it does not
/// count as a verdict at all and the parse stage fails over.
#[derive(Debug, Clone, Deserialize)]
pub struct RawVerdict {
    #[serde(default)]
    pub post_id: Option<String>,

    pub is_remove: bool,

    #[serde(default)]
    pub summary: Option<String>,

    #[serde(default)]
    pub toxicity_score: Option<f64>,
}

impl RawVerdict {
    /// Validate into a [`Verdict`], injecting `fallback_post_id` when the
    /// model omitted the field.
    pub fn validate(self, fallback_post_id: &str) -> Result<Verdict> {
        let post_id = match self.post_id {
            Some(id) if !id.trim().is_empty() => id,
            _ => fallback_post_id.to_string(),
        };

        Verdict::new(
            post_id,
            self.is_remove,
            self.summary,
            self.toxicity_score.unwrap_or(0.0),
        )
    }
}

/// Audit record persisted for each aggregated verdict.
///
/// Different pipeline variants score on one or three axes against the
/// same table, so the extra axes are nullable.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub struct AnalysisRecord {
    pub post_id: String,
    pub toxicity_score: f64,
    pub threat_level_score: Option<f64>,
    pub non_educational_score: Option<f64>,
    pub description: String,
    pub message: String,
    pub created_at: DateTime<Utc>,
}

impl AnalysisRecord {
    /// Message recorded when the post is slated for deletion.
    pub const DELETE_MESSAGE: &'static str = "It should be deleted.";

    /// Message recorded when the post is kept.
    pub const RETAIN_MESSAGE: &'static str = "The post can retain.";

    /// Build an audit record from an aggregated verdict.
    pub fn from_verdict(verdict: &Verdict, delete: bool) -> Self {
        Self {
            post_id: verdict.post_id.clone(),
            toxicity_score: verdict.toxicity_score,
            threat_level_score: None,
            non_educational_score: None,
            description: verdict.summary.clone(),
            message: if delete {
                Self::DELETE_MESSAGE.to_string()
            } else {
                Self::RETAIN_MESSAGE.to_string()
            },
            created_at: Utc::now(),
        }
    }
}
