//! Evaluation runs over whole transcripts.

use std::sync::Arc;

use async_trait::async_trait;
use interview_core::{InterviewTurn, Transcript};
use interview_eval::{
    EvalError, EvaluationRecord, Evaluator, JudgeAdapter, LlmTestCase, Metric, MetricKind,
    load_transcript, run_evaluation, save_results,
};
use interview_model::MockModel;

fn one_turn_transcript() -> Transcript {
    let answer = "Raft elects a leader that replicates a log to followers.";
    Transcript::from(vec![InterviewTurn {
        question: "How does Raft reach consensus?".into(),
        user_answer: answer.into(),
        generated_answer: answer.into(),
        relevant_context: "Distributed systems require consensus protocols".into(),
    }])
}

struct FixedScore(f64);

#[async_trait]
impl Metric for FixedScore {
    fn kind(&self) -> MetricKind {
        MetricKind::AnswerRelevancyMetric
    }

    async fn measure(
        &self,
        cases: &[LlmTestCase],
        threshold: f64,
    ) -> interview_eval::Result<EvaluationRecord> {
        assert_eq!(cases[0].actual_output, cases[0].expected_output);
        Ok(EvaluationRecord::new(self.kind(), Some(self.0), Some("fixed".into()), threshold))
    }
}

/// A judge that answers every metric prompt with an all-"yes" verdict.
fn agreeable_judge() -> (Arc<MockModel>, Arc<JudgeAdapter>) {
    let model = Arc::new(MockModel::new("judge").with_responder(|prompt| {
        if prompt.starts_with("Break the following text") {
            r#"{"statements": ["Raft elects a leader."]}"#.to_string()
        } else if prompt.starts_with("Extract every factual claim") {
            r#"{"claims": ["Raft elects a leader."]}"#.to_string()
        } else if prompt.starts_with("Give a concise reason") {
            r#"{"reason": "fully supported"}"#.to_string()
        } else {
            r#"{"verdicts": [{"verdict": "yes", "reason": "matches"}]}"#.to_string()
        }
    }));
    let judge = Arc::new(JudgeAdapter::new(model.clone()));
    (model, judge)
}

#[tokio::test]
async fn fixed_score_above_threshold_passes() {
    let (_, judge) = agreeable_judge();
    let evaluator = Evaluator::new(judge, 0.7).unwrap();

    let results = evaluator
        .evaluate_with(&one_turn_transcript(), vec![Box::new(FixedScore(0.9))])
        .await
        .unwrap();

    let record = &results[&MetricKind::AnswerRelevancyMetric];
    assert_eq!(record.score, Some(0.9));
    assert!(record.passed());
}

#[tokio::test]
async fn default_run_produces_all_four_metrics() {
    let (_, judge) = agreeable_judge();

    let results = run_evaluation(judge, &one_turn_transcript(), 0.7).await.unwrap();

    assert_eq!(results.keys().copied().collect::<Vec<_>>(), MetricKind::ALL);
    for (kind, record) in &results {
        assert_eq!(record.metric, *kind);
        assert_eq!(record.score, Some(1.0));
        assert_eq!(record.reason.as_deref(), Some("fully supported"));
        assert!(record.passed());
    }
}

#[tokio::test]
async fn empty_transcript_fails_before_any_judge_call() {
    let (model, judge) = agreeable_judge();
    let evaluator = Evaluator::new(judge, 0.7).unwrap();

    let err = evaluator.evaluate(&Transcript::new()).await.unwrap_err();

    assert!(matches!(err, EvalError::InvalidTranscript(_)));
    assert_eq!(model.call_count(), 0);
}

#[tokio::test]
async fn out_of_range_threshold_is_rejected() {
    let (model, judge) = agreeable_judge();

    let err = run_evaluation(judge, &one_turn_transcript(), 1.2).await.unwrap_err();

    assert!(matches!(err, EvalError::InvalidThreshold(t) if t == 1.2));
    assert_eq!(model.call_count(), 0);
}

#[tokio::test]
async fn judge_failure_aborts_without_partial_results() {
    let model = MockModel::new("judge").with_failure("quota exceeded");
    let judge = Arc::new(JudgeAdapter::new(Arc::new(model)));

    let err = run_evaluation(judge, &one_turn_transcript(), 0.7).await.unwrap_err();
    assert!(matches!(err, EvalError::Model(_)));
}

#[tokio::test]
async fn results_file_is_keyed_by_metric_name() {
    let (_, judge) = agreeable_judge();
    let dir = tempfile::tempdir().unwrap();
    let transcript_path = dir.path().join("interview_data.json");
    one_turn_transcript().save(&transcript_path).unwrap();

    let transcript = load_transcript(&transcript_path).unwrap();
    let results = run_evaluation(judge, &transcript, 0.7).await.unwrap();
    let out = dir.path().join("evaluation_results.json");
    save_results(&results, &out).unwrap();

    let written: serde_json::Value =
        serde_json::from_str(&std::fs::read_to_string(&out).unwrap()).unwrap();
    assert_eq!(
        written["FaithfulnessMetric"],
        serde_json::json!({"score": 1.0, "reason": "fully supported"})
    );
    assert_eq!(written.as_object().unwrap().len(), 4);
}
