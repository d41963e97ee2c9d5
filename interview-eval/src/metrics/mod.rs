//! The four transcript quality metrics.
//!
//! Each metric grades every test case with the judge model, averages the
//! per-case scores, and asks the judge once for a reason. The result is
//! returned directly from [`Metric::measure`]; metrics keep no state between
//! calls.

mod answer_relevancy;
mod contextual_precision;
mod contextual_recall;
mod faithfulness;
mod judge;

use std::fmt;

use async_trait::async_trait;
use serde::{Deserialize, Serialize};
use tracing::info;

pub use answer_relevancy::AnswerRelevancyMetric;
pub use contextual_precision::ContextualPrecisionMetric;
pub use contextual_recall::ContextualRecallMetric;
pub use faithfulness::FaithfulnessMetric;

use crate::adapter::JudgeModel;
use crate::error::Result;
use crate::test_case::LlmTestCase;

/// Identifies a metric. Serializes as the metric's type name.
#[derive(Debug, Clone, Copy, PartialEq, Eq, PartialOrd, Ord, Hash, Serialize, Deserialize)]
pub enum MetricKind {
    AnswerRelevancyMetric,
    ContextualPrecisionMetric,
    ContextualRecallMetric,
    FaithfulnessMetric,
}

impl MetricKind {
    pub const ALL: [MetricKind; 4] = [
        Self::AnswerRelevancyMetric,
        Self::ContextualPrecisionMetric,
        Self::ContextualRecallMetric,
        Self::FaithfulnessMetric,
    ];

    pub fn as_str(&self) -> &'static str {
        match self {
            Self::AnswerRelevancyMetric => "AnswerRelevancyMetric",
            Self::ContextualPrecisionMetric => "ContextualPrecisionMetric",
            Self::ContextualRecallMetric => "ContextualRecallMetric",
            Self::FaithfulnessMetric => "FaithfulnessMetric",
        }
    }
}

impl fmt::Display for MetricKind {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.write_str(self.as_str())
    }
}

/// Outcome of one metric over a whole batch of test cases.
///
/// Serializes as `{"score": .., "reason": ..}`; both are `null` when the
/// batch was empty. The metric is the key of the surrounding results map.
#[derive(Debug, Clone, PartialEq, Serialize)]
pub struct EvaluationRecord {
    #[serde(skip)]
    pub metric: MetricKind,
    pub score: Option<f64>,
    pub reason: Option<String>,
    #[serde(skip)]
    pub threshold: f64,
}

impl EvaluationRecord {
    pub fn new(
        metric: MetricKind,
        score: Option<f64>,
        reason: Option<String>,
        threshold: f64,
    ) -> Self {
        Self { metric, score, reason, threshold }
    }

    /// Whether the score reached the threshold.
    pub fn passed(&self) -> bool {
        self.score.is_some_and(|score| score >= self.threshold)
    }
}

/// A transcript quality metric.
#[async_trait]
pub trait Metric: Send + Sync {
    fn kind(&self) -> MetricKind;

    /// Grade every case and return the aggregated record.
    async fn measure(&self, cases: &[LlmTestCase], threshold: f64) -> Result<EvaluationRecord>;
}

/// Score of one test case plus the judge findings that lowered it.
#[derive(Debug, Clone, PartialEq)]
pub(crate) struct CaseScore {
    pub score: f64,
    pub findings: Vec<String>,
}

/// Average per-case scores and attach the judge's reason.
pub(crate) async fn finish(
    judge: &dyn JudgeModel,
    metric: MetricKind,
    threshold: f64,
    scored: Vec<CaseScore>,
) -> Result<EvaluationRecord> {
    if scored.is_empty() {
        return Ok(EvaluationRecord::new(metric, None, None, threshold));
    }

    let score = scored.iter().map(|c| c.score).sum::<f64>() / scored.len() as f64;
    let findings: Vec<String> = scored.into_iter().flat_map(|c| c.findings).collect();
    let reason = judge::explain(judge, metric, score, &findings).await?;

    info!(metric = %metric, score, threshold, passed = score >= threshold, "metric measured");
    Ok(EvaluationRecord::new(metric, Some(score), Some(reason), threshold))
}
