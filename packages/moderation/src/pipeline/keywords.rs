//! Keyword-based toxicity scoring.
//!
//! The simplest fallback path: no JSON is expected at all. Used by the
//! pipeline variant that prompts the model for freeform commentary and
//! scores the commentary purely by keyword presence.

use regex::Regex;

use crate::error::Result;
use crate::types::verdict::{clamp_score, Verdict};

/// Score added once per matched category.
pub const CATEGORY_INCREMENT: f64 = 25.0;

/// Score above which the post is flagged for removal.
pub const REMOVAL_THRESHOLD: f64 = 70.0;

/// Summary when no harmful category matched.
pub const NO_HARM_SUMMARY: &str = "The Post does not contain any harmful content.";

/// Summary when the score crosses the removal threshold.
pub const REMOVE_SUMMARY: &str = "The Post contains harmful content and should be removed.";

/// Summary for scores between zero and the removal threshold.
pub const MILD_RISK_SUMMARY: &str = "The Post contains mild risks but is generally safe.";

/// Fixed taxonomy of harmful-content categories and their keywords.
const HARMFUL_KEYWORDS: &[(&str, &[&str])] = &[
    (
        "violence",
        &["attack", "knife", "gun", "murder", "assault", "harm", "blood"],
    ),
    (
        "nudity",
        &["nude", "explicit", "sexual", "porn", "naked", "intimate"],
    ),
    (
        "war",
        &["battle", "bomb", "explosion", "military", "warfare"],
    ),
    (
        "discrimination",
        &["hate speech", "racist", "sexist", "discriminatory"],
    ),
];

/// Categories whose keywords appear in the text (whole-word,
/// case-insensitive).
pub fn matched_categories(text: &str) -> Vec<&'static str> {
    HARMFUL_KEYWORDS
        .iter()
        .filter(|(_, keywords)| {
            keywords.iter().any(|keyword| {
                Regex::new(&format!(r"(?i)\b{}\b", keyword))
                    .unwrap()
                    .is_match(text)
            })
        })
        .map(|(category, _)| *category)
        .collect()
}

/// Toxicity score for the text: one fixed increment per matched
/// category, clamped to 100. Multiple keywords within a single
/// category never stack.
pub fn keyword_score(text: &str) -> f64 {
    clamp_score(matched_categories(text).len() as f64 * CATEGORY_INCREMENT)
}

/// Produce a full verdict for the text.
pub fn assess(text: &str, post_id: &str) -> Result<Verdict> {
    let toxicity_score = keyword_score(text);
    let is_remove = toxicity_score > REMOVAL_THRESHOLD;

    let summary = if toxicity_score == 0.0 {
        NO_HARM_SUMMARY
    } else if is_remove {
        REMOVE_SUMMARY
    } else {
        MILD_RISK_SUMMARY
    };

    Verdict::new(post_id, is_remove, Some(summary.to_string()), toxicity_score)
}
