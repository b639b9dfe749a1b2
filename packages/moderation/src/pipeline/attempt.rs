//! Bounded-retry attempt controller for one analysis unit.
//!
//! One unit = one attachment of one post = one model invocation per
//! attempt. The controller drives an explicit state machine:
//!
//! ```text
//! PENDING -> (model call) -> SUCCESS
//!                         -> RETRYABLE_FAILURE -> PENDING (after delay)
//!                         -> TERMINAL_FAILURE  (ceiling reached)
//! ```
//!
//! A terminal failure is reported, never raised: one attachment's
//! exhaustion must not abort sibling attachments or sibling posts.

use std::time::Duration;
use tracing::{info, warn};

use crate::error::ModerationError;
use crate::pipeline::extract::extract_verdict;
use crate::pipeline::prompts::{format_moderation_prompt, format_post_summary_prompt};
use crate::traits::model::ModelClient;
use crate::types::{config::RunnerConfig, post::Unit, verdict::Verdict};

/// Ephemeral record of one unit's retry loop. Not persisted.
#[derive(Debug, Clone)]
pub struct AttemptRecord {
    /// Attachment being analyzed
    pub attachment_url: String,

    /// Attempts consumed (including the failed ones)
    pub attempts: u32,

    /// Error from the last failed attempt
    pub last_error: Option<String>,
}

/// Terminal outcome of one unit's retry loop.
#[derive(Debug)]
pub enum AttemptOutcome {
    /// A valid verdict was extracted
    Success(Verdict),

    /// All attempts exhausted without a verdict
    Exhausted(AttemptRecord),
}

impl AttemptOutcome {
    /// Whether this outcome carries a verdict.
    pub fn is_success(&self) -> bool {
        matches!(self, Self::Success(_))
    }
}

/// Result of a single attempt, before the retry decision.
enum Attempt {
    Success(Verdict),
    Retryable(String),
}

/// Drives the bounded-retry loop for one unit at a time.
pub struct AttemptController<'a, M: ModelClient> {
    model: &'a M,
    max_attempts: u32,
    retry_delay: Duration,
    generate_post_summary: bool,
}

impl<'a, M: ModelClient> AttemptController<'a, M> {
    /// Create a controller from the runner configuration.
    pub fn new(model: &'a M, config: &RunnerConfig) -> Self {
        Self {
            model,
            max_attempts: config.max_attempts.max(1),
            retry_delay: config.retry_delay(),
            generate_post_summary: config.generate_post_summary,
        }
    }

    /// Analyze one unit: optional caption summary, then up to
    /// `max_attempts` model calls, each fed through the extraction
    /// ladder. Returns on the first valid verdict.
    pub async fn analyze_unit(&self, unit: &Unit, base_prompt: &str) -> AttemptOutcome {
        let post_summary = if self.generate_post_summary {
            self.summarize_unit(unit).await
        } else {
            String::new()
        };

        let prompt = format_moderation_prompt(base_prompt, &unit.post_id, &post_summary);

        let mut record = AttemptRecord {
            attachment_url: unit.attachment_url.clone(),
            attempts: 0,
            last_error: None,
        };

        while record.attempts < self.max_attempts {
            record.attempts += 1;
            info!(
                post_id = %unit.post_id,
                attachment = %unit.attachment_url,
                attempt = record.attempts,
                "analyzing attachment"
            );

            match self.attempt(unit, &prompt).await {
                Attempt::Success(verdict) => return AttemptOutcome::Success(verdict),
                Attempt::Retryable(reason) => {
                    record.last_error = Some(reason.clone());
                    if record.attempts < self.max_attempts {
                        warn!(
                            post_id = %unit.post_id,
                            attempt = record.attempts,
                            error = %reason,
                            delay_secs = self.retry_delay.as_secs(),
                            "attempt failed, retrying"
                        );
                        tokio::time::sleep(self.retry_delay).await;
                    }
                }
            }
        }

        warn!(
            post_id = %unit.post_id,
            attachment = %unit.attachment_url,
            attempts = record.attempts,
            "max attempts reached, skipping attachment"
        );
        AttemptOutcome::Exhausted(record)
    }

    /// One model call plus extraction.
    async fn attempt(&self, unit: &Unit, prompt: &str) -> Attempt {
        let text = match self
            .model
            .invoke(prompt, Some(&unit.attachment_url))
            .await
        {
            Ok(text) => text,
            Err(e) => return Attempt::Retryable(e.to_string()),
        };

        if text.trim().is_empty() {
            return Attempt::Retryable(ModerationError::EmptyResponse.to_string());
        }

        match extract_verdict(&text, &unit.post_id) {
            Ok(verdict) => Attempt::Success(verdict),
            Err(e) => Attempt::Retryable(e.to_string()),
        }
    }

    /// Ask the model for a short caption+image summary. Failure is
    /// tolerated; the moderation prompt simply goes out without it.
    async fn summarize_unit(&self, unit: &Unit) -> String {
        let prompt = format_post_summary_prompt(&unit.caption, &unit.attachment_url);
        match self.model.invoke(&prompt, None).await {
            Ok(summary) => summary.trim().to_string(),
            Err(e) => {
                warn!(post_id = %unit.post_id, error = %e, "post summary generation failed");
                String::new()
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;
    use crate::testing::MockModel;

    fn unit() -> Unit {
        Unit {
            post_id: "p1".to_string(),
            caption: "caption".to_string(),
            attachment_url: "https://img.example/a.png".to_string(),
        }
    }

    fn config(max_attempts: u32) -> RunnerConfig {
        RunnerConfig {
            max_attempts,
            retry_delay_secs: 0,
            generate_post_summary: false,
            ..Default::default()
        }
    }

    #[tokio::test]
    async fn test_succeeds_on_third_attempt() {
        let model = MockModel::new()
            .with_default_response(r#"{"post_id":"p1","is_remove":false,"toxicity_score":10}"#)
            .fail_times(2);
        let config = config(3);
        let controller = AttemptController::new(&model, &config);

        let outcome = controller.analyze_unit(&unit(), "base").await;
        match outcome {
            AttemptOutcome::Success(v) => assert_eq!(v.toxicity_score, 10.0),
            AttemptOutcome::Exhausted(_) => panic!("expected success after retries"),
        }
        assert_eq!(model.invocation_count(), 3);
    }

    #[tokio::test]
    async fn test_exhaustion_after_ceiling() {
        let model = MockModel::new()
            .with_default_response(r#"{"is_remove":false}"#)
            .fail_times(5);
        let config = config(3);
        let controller = AttemptController::new(&model, &config);

        let outcome = controller.analyze_unit(&unit(), "base").await;
        match outcome {
            AttemptOutcome::Exhausted(record) => {
                assert_eq!(record.attempts, 3);
                assert!(record.last_error.is_some());
            }
            AttemptOutcome::Success(_) => panic!("expected exhaustion"),
        }
        assert_eq!(model.invocation_count(), 3);
    }

    #[tokio::test]
    async fn test_empty_response_is_retryable() {
        let model = MockModel::new().with_default_response("   ");
        let config = config(2);
        let controller = AttemptController::new(&model, &config);

        let outcome = controller.analyze_unit(&unit(), "base").await;
        assert!(!outcome.is_success());
        assert_eq!(model.invocation_count(), 2);
    }

    #[tokio::test]
    async fn test_malformed_text_still_succeeds() {
        // Garbage text reaches the heuristic stage, which always yields
        // a verdict; no retry is burned on malformed responses.
        let model = MockModel::new().with_default_response("completely unstructured rambling");
        let config = config(3);
        let controller = AttemptController::new(&model, &config);

        let outcome = controller.analyze_unit(&unit(), "base").await;
        assert!(outcome.is_success());
        assert_eq!(model.invocation_count(), 1);
    }

    #[tokio::test]
    async fn test_summary_call_precedes_analysis() {
        let model = MockModel::new()
            .with_default_response(r#"{"post_id":"p1","is_remove":false,"toxicity_score":0}"#);
        let config = RunnerConfig {
            max_attempts: 3,
            retry_delay_secs: 0,
            generate_post_summary: true,
            ..Default::default()
        };
        let controller = AttemptController::new(&model, &config);

        let outcome = controller.analyze_unit(&unit(), "base").await;
        assert!(outcome.is_success());

        let calls = model.calls();
        assert_eq!(calls.len(), 2);
        assert!(calls[0].image_url.is_none(), "summary call is text-only");
        assert!(calls[1].image_url.is_some(), "analysis call carries the image");
    }
}
