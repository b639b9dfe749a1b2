//! Aggregation of per-attachment verdicts into one post-level verdict.
//!
//! The aggregation is deliberately asymmetric: maximum toxicity and a
//! logical OR over removal flags. One damning attachment dominates the
//! aggregate no matter how many siblings were benign.

use crate::error::Result;
use crate::types::verdict::Verdict;

/// Combine the per-attachment verdicts for one post.
///
/// - `toxicity_score`: maximum across attachments, 0 when none succeeded
/// - `is_remove`: true if any attachment verdict set it
/// - `summary`: the first removing attachment's summary, else the fixed
///   "generally safe" default
///
/// An empty slice yields the safest-available default verdict
/// (fail-open).
pub fn aggregate(post_id: &str, verdicts: &[Verdict]) -> Result<Verdict> {
    let toxicity_score = verdicts
        .iter()
        .map(|v| v.toxicity_score)
        .fold(0.0_f64, f64::max);

    let is_remove = verdicts.iter().any(|v| v.is_remove);

    let summary = verdicts
        .iter()
        .find(|v| v.is_remove)
        .map(|v| v.summary.clone());

    Verdict::new(post_id, is_remove, summary, toxicity_score)
}
