//! Verdict extraction from raw model output.
//!
//! Model responses are supposed to contain a JSON verdict but often do
//! not: they arrive wrapped in code fences, buried in prose, missing
//! fields, or as plain natural language. Extraction is a strictly
//! ordered ladder of stages, each a pure function `text -> Option<Verdict>`:
//!
//! 1. [`parse_direct`] - the whole text is a JSON object
//! 2. [`parse_embedded`] - first embedded object anchored on `"post_id"`
//! 3. [`parse_partial`] - first object anchored on `"is_remove"`, with
//!    the caller's post_id injected
//! 4. [`reconstruct`] - field-by-field recovery from natural language;
//!    never fails
//!
//! The ladder as a whole is total: malformed input degrades the verdict,
//! it never produces an error past this boundary.

use regex::Regex;
use tracing::debug;

use crate::error::Result;
use crate::types::verdict::{RawVerdict, Verdict, RELEVANCE_FAILURE_SUMMARY};

/// Phrases indicating the model recommends removal.
///
/// Checked before the safety phrases; a removal match wins on conflict.
const REMOVE_PATTERNS: &[&str] = &[
    r#"is_remove"?\s*:\s*true"#,
    r"remove\s*[=:]\s*true",
    r"recommend(?:ed|ing)?\s*(?:to)?\s*remov(?:e|al)",
    r"flag(?:ged|ging)?\s*(?:it|the post)?\s*for\s*removal",
    r"should be removed",
    r"require(?:s|d)?\s*removal",
];

/// Phrases indicating the model considers the content safe.
const SAFE_PATTERNS: &[&str] = &[
    r#"is_remove"?\s*:\s*false"#,
    r"remove\s*[=:]\s*false",
    r"does not (?:require|need) removal",
    r"should not be removed",
    r"(?:safe|appropriate|relevant|educational) content",
];

/// Patterns locating an integer adjacent to a "toxicity score" phrase.
const SCORE_PATTERNS: &[&str] = &[
    r#"toxicity[_\s]score"?\s*:\s*(\d+)"#,
    r"toxicity[_\s]score\s*(?:is|=|:)\s*(\d+)",
    r"toxicity[_\s]score\s*(?:of)?\s*(\d+)",
];

/// Patterns locating an explicit summary in the text.
const SUMMARY_PATTERNS: &[&str] = &[
    r#"summary"?\s*:\s*"([^"]+)""#,
    r#"summary"?\s*:\s*'([^']+)'"#,
    r"summary\s*(?:is|=|:)\s*(.+?)(?:\.|$)",
];

/// Extract a verdict from raw model output.
///
/// Tries each parse stage in order and falls back to heuristic
/// reconstruction, which always produces a verdict. The only possible
/// error is an empty `post_id`, which is caller-supplied context and
/// not recoverable from the text.
pub fn extract_verdict(text: &str, post_id: &str) -> Result<Verdict> {
    if let Some(verdict) = parse_direct(text, post_id) {
        return Ok(verdict);
    }
    debug!(post_id, "direct JSON parse failed, trying embedded object");

    if let Some(verdict) = parse_embedded(text, post_id) {
        return Ok(verdict);
    }

    if let Some(verdict) = parse_partial(text, post_id) {
        return Ok(verdict);
    }
    debug!(post_id, "no parseable JSON object, reconstructing from text");

    reconstruct(text, post_id)
}

/// Stage 1: treat the entire text as a JSON verdict object.
///
/// Code fences are stripped first; `post_id` is injected if absent.
pub fn parse_direct(text: &str, post_id: &str) -> Option<Verdict> {
    let cleaned = strip_code_fences(text);
    let raw: RawVerdict = serde_json::from_str(cleaned).ok()?;
    raw.validate(post_id).ok()
}

/// Stage 2: find the first embedded JSON object anchored on `"post_id"`.
pub fn parse_embedded(text: &str, post_id: &str) -> Option<Verdict> {
    let pattern = Regex::new(r#"(?s)\{\s*"post_id"\s*:.*?\}"#).unwrap();
    let candidate = pattern.find(text)?;
    let raw: RawVerdict = serde_json::from_str(candidate.as_str()).ok()?;
    raw.validate(post_id).ok()
}

/// Stage 3: find an object anchored on `"is_remove"` (no `post_id`)
/// and inject the caller's post_id.
pub fn parse_partial(text: &str, post_id: &str) -> Option<Verdict> {
    let pattern = Regex::new(r#"(?s)\{\s*"is_remove"\s*:.*?\}"#).unwrap();
    let candidate = pattern.find(text)?;
    let raw: RawVerdict = serde_json::from_str(candidate.as_str()).ok()?;
    raw.validate(post_id).ok()
}

/// Stage 4: reconstruct each field independently from natural-language
/// patterns. Never fails to produce a verdict.
pub fn reconstruct(text: &str, post_id: &str) -> Result<Verdict> {
    // Removal phrases take precedence; safety phrases (or no signal at
    // all) leave the post in place.
    let is_remove = matches_any(text, REMOVE_PATTERNS);
    let safety_indicated = !is_remove && matches_any(text, SAFE_PATTERNS);
    debug!(post_id, is_remove, safety_indicated, "reconstructing verdict from text");

    let toxicity_score = extract_score(text);
    let explicit_summary = extract_summary(text);
    let summary_was_default = explicit_summary.is_none();

    let mut verdict = Verdict::new(post_id, is_remove, explicit_summary, toxicity_score)?;

    // Relevance override: fires only when no explicit summary was found,
    // and takes precedence over the safety determination above.
    if summary_was_default && has_relevance_failure(text) {
        verdict.is_remove = true;
        verdict.summary = RELEVANCE_FAILURE_SUMMARY.to_string();
    }

    Ok(verdict)
}

/// Strip markdown code fences from a response.
fn strip_code_fences(text: &str) -> &str {
    text.trim()
        .trim_start_matches("```json")
        .trim_start_matches("```")
        .trim_end_matches("```")
        .trim()
}

fn matches_any(text: &str, patterns: &[&str]) -> bool {
    patterns.iter().any(|p| {
        Regex::new(&format!("(?i){}", p))
            .unwrap()
            .is_match(text)
    })
}

/// First integer adjacent to a "toxicity score" phrase, accepted only
/// when already in `[0, 100]`; 0 otherwise.
fn extract_score(text: &str) -> f64 {
    for pattern in SCORE_PATTERNS {
        let re = Regex::new(&format!("(?i){}", pattern)).unwrap();
        if let Some(caps) = re.captures(text) {
            if let Ok(score) = caps[1].parse::<i64>() {
                if (0..=100).contains(&score) {
                    return score as f64;
                }
            }
        }
    }
    0.0
}

/// First quoted or inline `summary: ...` phrase, if any.
fn extract_summary(text: &str) -> Option<String> {
    for pattern in SUMMARY_PATTERNS {
        let re = Regex::new(&format!("(?i){}", pattern)).unwrap();
        if let Some(caps) = re.captures(text) {
            let summary = caps[1].trim();
            if !summary.is_empty() {
                return Some(summary.to_string());
            }
        }
    }
    None
}

/// Whether the text signals the post failed the relevance check.
fn has_relevance_failure(text: &str) -> bool {
    let lower = text.to_lowercase();
    lower.contains("does not align") || lower.contains("not fall under")
}
