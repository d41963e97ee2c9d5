//! Batch evaluation of a finished transcript.

use std::collections::BTreeMap;
use std::path::Path;
use std::sync::Arc;

use interview_core::Transcript;
use tracing::{info, warn};

use crate::adapter::JudgeModel;
use crate::error::{EvalError, Result};
use crate::metrics::{
    AnswerRelevancyMetric, ContextualPrecisionMetric, ContextualRecallMetric, EvaluationRecord,
    FaithfulnessMetric, Metric, MetricKind,
};
use crate::test_case::build_test_cases;

/// Pass threshold used when none is given.
pub const DEFAULT_THRESHOLD: f64 = 0.7;

/// One record per metric, keyed by metric kind.
pub type EvaluationResults = BTreeMap<MetricKind, EvaluationRecord>;

/// Grades transcripts with the four quality metrics.
///
/// Every metric sees the same test cases, judge and threshold. Metric
/// instances are built fresh for each [`evaluate`](Evaluator::evaluate) call.
pub struct Evaluator {
    judge: Arc<dyn JudgeModel>,
    threshold: f64,
}

impl Evaluator {
    /// # Errors
    ///
    /// Returns [`EvalError::InvalidThreshold`] unless `threshold` lies in `[0, 1]`.
    pub fn new(judge: Arc<dyn JudgeModel>, threshold: f64) -> Result<Self> {
        Ok(Self { judge, threshold: validate_threshold(threshold)? })
    }

    pub fn threshold(&self) -> f64 {
        self.threshold
    }

    /// Fresh answer relevancy, contextual precision, contextual recall and
    /// faithfulness metrics sharing this evaluator's judge.
    pub fn default_metrics(&self) -> Vec<Box<dyn Metric>> {
        vec![
            Box::new(AnswerRelevancyMetric::new(self.judge.clone())),
            Box::new(ContextualPrecisionMetric::new(self.judge.clone())),
            Box::new(ContextualRecallMetric::new(self.judge.clone())),
            Box::new(FaithfulnessMetric::new(self.judge.clone())),
        ]
    }

    pub async fn evaluate(&self, transcript: &Transcript) -> Result<EvaluationResults> {
        self.evaluate_with(transcript, self.default_metrics()).await
    }

    /// Run `metrics` over every turn of `transcript`.
    ///
    /// A later metric of the same kind replaces an earlier one's record.
    ///
    /// # Errors
    ///
    /// Returns [`EvalError::InvalidTranscript`] for an empty transcript before
    /// any metric runs; otherwise the first metric failure, with no partial
    /// results.
    pub async fn evaluate_with(
        &self,
        transcript: &Transcript,
        metrics: Vec<Box<dyn Metric>>,
    ) -> Result<EvaluationResults> {
        if transcript.is_empty() {
            return Err(EvalError::InvalidTranscript("transcript has no turns".to_string()));
        }

        let cases = build_test_cases(transcript);
        info!(
            case_count = cases.len(),
            metric_count = metrics.len(),
            judge = %self.judge.model_name(),
            threshold = self.threshold,
            "starting evaluation"
        );

        let mut results = EvaluationResults::new();
        for metric in metrics {
            let record = metric.measure(&cases, self.threshold).await?;
            if results.insert(metric.kind(), record).is_some() {
                warn!(metric = %metric.kind(), "metric measured twice, keeping the later record");
            }
        }
        Ok(results)
    }
}

/// Evaluate `transcript` with the four default metrics.
pub async fn run_evaluation(
    judge: Arc<dyn JudgeModel>,
    transcript: &Transcript,
    threshold: f64,
) -> Result<EvaluationResults> {
    Evaluator::new(judge, threshold)?.evaluate(transcript).await
}

pub fn validate_threshold(threshold: f64) -> Result<f64> {
    if (0.0..=1.0).contains(&threshold) {
        Ok(threshold)
    } else {
        Err(EvalError::InvalidThreshold(threshold))
    }
}

/// Decode a transcript, rejecting malformed JSON and empty transcripts.
pub fn parse_transcript(json: &str) -> Result<Transcript> {
    let transcript =
        Transcript::from_json(json).map_err(|e| EvalError::InvalidTranscript(e.to_string()))?;
    if transcript.is_empty() {
        return Err(EvalError::InvalidTranscript("transcript has no turns".to_string()));
    }
    Ok(transcript)
}

/// Read and decode a transcript file.
pub fn load_transcript(path: impl AsRef<Path>) -> Result<Transcript> {
    parse_transcript(&std::fs::read_to_string(path)?)
}

/// Write results as a pretty-printed JSON object keyed by metric name.
pub fn save_results(results: &EvaluationResults, path: impl AsRef<Path>) -> Result<()> {
    std::fs::write(path, serde_json::to_string_pretty(results)?)?;
    Ok(())
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn threshold_bounds_are_inclusive() {
        assert!(validate_threshold(0.0).is_ok());
        assert!(validate_threshold(1.0).is_ok());
        assert!(matches!(validate_threshold(1.5), Err(EvalError::InvalidThreshold(_))));
        assert!(validate_threshold(-0.1).is_err());
        assert!(validate_threshold(f64::NAN).is_err());
    }

    #[test]
    fn malformed_and_empty_transcripts_are_rejected() {
        assert!(matches!(parse_transcript("{not json"), Err(EvalError::InvalidTranscript(_))));
        assert!(matches!(parse_transcript("[]"), Err(EvalError::InvalidTranscript(_))));
        assert!(matches!(
            parse_transcript(r#"[{"question": "q"}]"#),
            Err(EvalError::InvalidTranscript(_))
        ));
    }

    #[test]
    fn well_formed_transcript_parses() {
        let json = r#"[{"question": "q", "user_answer": "u", "generated_answer": "g", "relevant_context": "c"}]"#;
        assert_eq!(parse_transcript(json).unwrap().len(), 1);
    }
}
