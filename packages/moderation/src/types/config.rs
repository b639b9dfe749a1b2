//! Configuration types for the moderation pipeline.

use serde::{Deserialize, Serialize};
use std::time::Duration;

use super::verdict::{AnalysisRecord, Verdict};

/// Configuration for batch moderation runs.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct RunnerConfig {
    /// Maximum model attempts per attachment.
    ///
    /// Default: 3.
    pub max_attempts: u32,

    /// Fixed delay between attempts, in seconds. No backoff.
    ///
    /// Default: 5.
    pub retry_delay_secs: u64,

    /// Which signal triggers deletion of a post.
    pub removal_policy: RemovalPolicy,

    /// Ask the model for a short caption+image summary before analysis
    /// and fold it into the moderation prompt.
    ///
    /// Default: true. Disable to save one model call per unit.
    pub generate_post_summary: bool,
}

impl Default for RunnerConfig {
    fn default() -> Self {
        Self {
            max_attempts: 3,
            retry_delay_secs: 5,
            removal_policy: RemovalPolicy::default(),
            generate_post_summary: true,
        }
    }
}

impl RunnerConfig {
    /// The inter-attempt delay as a [`Duration`].
    pub fn retry_delay(&self) -> Duration {
        Duration::from_secs(self.retry_delay_secs)
    }
}

/// Deletion policy applied to the aggregated post verdict.
///
/// Deployments observed in the wild use three different rules against
/// the same stored schema; pick one per deployment.
#[derive(Debug, Clone, PartialEq, Serialize, Deserialize)]
pub enum RemovalPolicy {
    /// Delete when the aggregated `is_remove` flag is set.
    RemoveFlag,

    /// Delete when the aggregated toxicity score reaches the threshold.
    ToxicityThreshold { threshold: f64 },

    /// Delete when any recorded axis (toxicity, threat level,
    /// non-educational) reaches the threshold.
    AnyAxisThreshold { threshold: f64 },
}

impl Default for RemovalPolicy {
    fn default() -> Self {
        Self::RemoveFlag
    }
}

impl RemovalPolicy {
    /// Conventional threshold used by the score-based variants.
    pub const DEFAULT_THRESHOLD: f64 = 70.0;

    /// Decide whether the post behind this verdict should be deleted.
    pub fn should_delete(&self, verdict: &Verdict, record: &AnalysisRecord) -> bool {
        match self {
            Self::RemoveFlag => verdict.is_remove,
            Self::ToxicityThreshold { threshold } => verdict.toxicity_score >= *threshold,
            Self::AnyAxisThreshold { threshold } => {
                record.toxicity_score >= *threshold
                    || record.threat_level_score.is_some_and(|s| s >= *threshold)
                    || record.non_educational_score.is_some_and(|s| s >= *threshold)
            }
        }
    }
}

#[cfg(test)]
mod tests {
    use super::*;

    fn verdict(is_remove: bool, score: f64) -> Verdict {
        Verdict::new("p1", is_remove, None, score).unwrap()
    }

    #[test]
    fn test_remove_flag_policy() {
        let policy = RemovalPolicy::RemoveFlag;
        let v = verdict(true, 10.0);
        let record = AnalysisRecord::from_verdict(&v, false);
        assert!(policy.should_delete(&v, &record));

        let v = verdict(false, 99.0);
        let record = AnalysisRecord::from_verdict(&v, false);
        assert!(!policy.should_delete(&v, &record));
    }

    #[test]
    fn test_toxicity_threshold_policy() {
        let policy = RemovalPolicy::ToxicityThreshold {
            threshold: RemovalPolicy::DEFAULT_THRESHOLD,
        };
        let v = verdict(false, 70.0);
        let record = AnalysisRecord::from_verdict(&v, false);
        assert!(policy.should_delete(&v, &record));

        let v = verdict(true, 69.9);
        let record = AnalysisRecord::from_verdict(&v, false);
        assert!(!policy.should_delete(&v, &record));
    }

    #[test]
    fn test_any_axis_policy_checks_optional_axes() {
        let policy = RemovalPolicy::AnyAxisThreshold { threshold: 70.0 };
        let v = verdict(false, 10.0);
        let mut record = AnalysisRecord::from_verdict(&v, false);
        assert!(!policy.should_delete(&v, &record));

        record.non_educational_score = Some(85.0);
        assert!(policy.should_delete(&v, &record));
    }
}
