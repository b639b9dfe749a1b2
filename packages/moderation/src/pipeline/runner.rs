//! Batch orchestration: fetch, analyze, aggregate, report.
//!
//! The runner owns the injected store and model client and drives one
//! batch at a time, sequentially. Units are grouped by post so that a
//! post's aggregation sees all of its attachment verdicts, and store
//! effects for a given post are applied exactly once per cycle.
//!
//! Store write failures are logged and never halt the batch: an
//! affected post simply stays `processed = false` and is picked up by
//! the next cycle.

use indexmap::IndexMap;
use tracing::{error, info, warn};

use crate::error::Result;
use crate::pipeline::aggregate::aggregate;
use crate::pipeline::attempt::{AttemptController, AttemptOutcome};
use crate::pipeline::prompts::MODERATION_PROMPT;
use crate::traits::{model::ModelClient, store::PostStore};
use crate::types::{
    config::RunnerConfig,
    post::Unit,
    verdict::{AnalysisRecord, Verdict},
};

/// Outcome of one batch run.
#[derive(Debug, Default)]
pub struct RunReport {
    /// Aggregated post-level verdicts, in processing order
    pub verdicts: Vec<Verdict>,

    /// Posts marked processed this cycle
    pub posts_processed: usize,

    /// Posts deleted this cycle
    pub posts_deleted: usize,

    /// Units that exhausted all attempts
    pub failed_units: usize,
}

/// Batch moderation orchestrator.
pub struct ModerationRunner<S: PostStore, M: ModelClient> {
    store: S,
    model: M,
    config: RunnerConfig,
    prompt: String,
}

impl<S: PostStore, M: ModelClient> ModerationRunner<S, M> {
    /// Create a runner with the default configuration and prompt.
    pub fn new(store: S, model: M) -> Self {
        Self::with_config(store, model, RunnerConfig::default())
    }

    /// Create a runner with a custom configuration.
    pub fn with_config(store: S, model: M, config: RunnerConfig) -> Self {
        Self {
            store,
            model,
            config,
            prompt: MODERATION_PROMPT.to_string(),
        }
    }

    /// Override the base moderation prompt.
    pub fn with_prompt(mut self, prompt: impl Into<String>) -> Self {
        self.prompt = prompt.into();
        self
    }

    /// Get a reference to the configuration.
    pub fn config(&self) -> &RunnerConfig {
        &self.config
    }

    /// Get a reference to the store.
    pub fn store(&self) -> &S {
        &self.store
    }

    /// Get a reference to the model client.
    pub fn model(&self) -> &M {
        &self.model
    }

    /// Run one batch over all unprocessed posts.
    ///
    /// Each post's effects are committed after its own extraction
    /// completes, so aborting between posts leaves a well-defined
    /// committed subset. No transaction spans multiple posts.
    pub async fn run_batch(&self) -> Result<RunReport> {
        let posts = self.store.fetch_unprocessed().await?;
        if posts.is_empty() {
            info!("no unprocessed posts found");
            return Ok(RunReport::default());
        }

        // Group units by post_id, preserving fetch order. All of a
        // post's attachments are analyzed before its aggregation.
        let mut grouped: IndexMap<String, Vec<Unit>> = IndexMap::new();
        for post in &posts {
            grouped
                .entry(post.post_id.clone())
                .or_default()
                .extend(post.units());
        }

        info!(posts = grouped.len(), "starting moderation batch");

        let controller = AttemptController::new(&self.model, &self.config);
        let mut report = RunReport::default();

        for (post_id, units) in &grouped {
            let mut verdicts = Vec::with_capacity(units.len());

            for unit in units {
                match controller.analyze_unit(unit, &self.prompt).await {
                    AttemptOutcome::Success(verdict) => {
                        // Per-attachment marking; idempotent, so several
                        // attachments of one post may each apply it.
                        if let Err(e) = self.store.mark_processed(post_id).await {
                            warn!(post_id = %post_id, error = %e, "failed to mark post processed");
                        }
                        verdicts.push(verdict);
                    }
                    AttemptOutcome::Exhausted(record) => {
                        error!(
                            post_id = %post_id,
                            attachment = %record.attachment_url,
                            attempts = record.attempts,
                            last_error = record.last_error.as_deref().unwrap_or("unknown"),
                            "attachment analysis exhausted"
                        );
                        report.failed_units += 1;
                    }
                }
            }

            let aggregated = aggregate(post_id, &verdicts)?;
            self.report_verdict(&aggregated, &mut report).await;
            report.verdicts.push(aggregated);
        }

        info!(
            processed = report.posts_processed,
            deleted = report.posts_deleted,
            failed_units = report.failed_units,
            "moderation batch complete"
        );
        Ok(report)
    }

    /// Apply the side effects for one aggregated verdict.
    async fn report_verdict(&self, verdict: &Verdict, report: &mut RunReport) {
        let mut record = AnalysisRecord::from_verdict(verdict, false);
        let delete = self.config.removal_policy.should_delete(verdict, &record);
        if delete {
            record.message = AnalysisRecord::DELETE_MESSAGE.to_string();
        }

        if let Err(e) = self.store.insert_analysis(&record).await {
            warn!(post_id = %verdict.post_id, error = %e, "failed to insert analysis record");
        }

        if let Err(e) = self.store.mark_processed(&verdict.post_id).await {
            warn!(post_id = %verdict.post_id, error = %e, "failed to mark post processed");
            return;
        }
        report.posts_processed += 1;

        if delete {
            match self.store.delete_post(&verdict.post_id).await {
                Ok(()) => {
                    info!(post_id = %verdict.post_id, "post deleted");
                    report.posts_deleted += 1;
                }
                Err(e) => {
                    warn!(post_id = %verdict.post_id, error = %e, "failed to delete post");
                }
            }
        }
    }
}
