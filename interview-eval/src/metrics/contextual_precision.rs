use std::sync::Arc;

use async_trait::async_trait;

use super::judge::{self, JSON_ONLY, Verdicts};
use super::{CaseScore, EvaluationRecord, Metric, MetricKind, finish};
use crate::adapter::JudgeModel;
use crate::error::Result;
use crate::test_case::LlmTestCase;

/// Whether relevant context nodes are ranked ahead of irrelevant ones.
///
/// Each node is judged useful (`yes`) or not for reaching the expected
/// output. The case score is the weighted cumulative precision over the
/// ranked nodes; with no useful node it is 0.
pub struct ContextualPrecisionMetric {
    judge: Arc<dyn JudgeModel>,
}

impl ContextualPrecisionMetric {
    pub fn new(judge: Arc<dyn JudgeModel>) -> Self {
        Self { judge }
    }

    async fn score_case(&self, case: &LlmTestCase) -> Result<CaseScore> {
        let Verdicts { verdicts } =
            judge::ask(self.judge.as_ref(), self.kind(), &verdicts_prompt(case)).await?;

        let relevance: Vec<bool> = verdicts.iter().map(|v| v.is("yes")).collect();
        let findings = verdicts
            .iter()
            .enumerate()
            .filter(|(_, v)| !v.is("yes"))
            .map(|(rank, v)| v.finding(&format!("node {} is not relevant", rank + 1)))
            .collect();
        Ok(CaseScore { score: weighted_cumulative_precision(&relevance), findings })
    }
}

#[async_trait]
impl Metric for ContextualPrecisionMetric {
    fn kind(&self) -> MetricKind {
        MetricKind::ContextualPrecisionMetric
    }

    async fn measure(&self, cases: &[LlmTestCase], threshold: f64) -> Result<EvaluationRecord> {
        let mut scored = Vec::with_capacity(cases.len());
        for case in cases {
            scored.push(self.score_case(case).await?);
        }
        finish(self.judge.as_ref(), self.kind(), threshold, scored).await
    }
}

/// Mean of precision@k over the ranks k holding a relevant node.
fn weighted_cumulative_precision(relevance: &[bool]) -> f64 {
    let mut hits = 0usize;
    let mut sum = 0.0;
    for (rank, _) in relevance.iter().enumerate().filter(|(_, relevant)| **relevant) {
        hits += 1;
        sum += hits as f64 / (rank + 1) as f64;
    }
    if hits == 0 { 0.0 } else { sum / hits as f64 }
}

fn verdicts_prompt(case: &LlmTestCase) -> String {
    let nodes = case
        .retrieval_context
        .iter()
        .enumerate()
        .map(|(i, node)| format!("Node {}:\n{node}", i + 1))
        .collect::<Vec<_>>()
        .join("\n\n");
    format!(
        "For each retrieval context node, in order, decide whether it was useful in arriving at \
         the expected output for the input. Use \"yes\" or \"no\" and give a reason for each.\n\n\
         Input:\n{}\n\n\
         Expected output:\n{}\n\n\
         Retrieval context:\n{nodes}\n\n\
         {JSON_ONLY} Format: {{\"verdicts\": [{{\"verdict\": \"yes\", \"reason\": \"...\"}}]}}",
        case.input, case.expected_output
    )
}

#[cfg(test)]
mod tests {
    use interview_model::MockModel;

    use super::*;
    use crate::adapter::JudgeAdapter;

    #[test]
    fn precision_rewards_early_relevant_nodes() {
        assert_eq!(weighted_cumulative_precision(&[true, false]), 1.0);
        assert_eq!(weighted_cumulative_precision(&[false, true]), 0.5);
        // (1/1 + 2/3) / 2
        assert!((weighted_cumulative_precision(&[true, false, true]) - 5.0 / 6.0).abs() < 1e-9);
        assert_eq!(weighted_cumulative_precision(&[false, false]), 0.0);
        assert_eq!(weighted_cumulative_precision(&[]), 0.0);
    }

    #[tokio::test]
    async fn scores_are_averaged_across_cases() {
        let model = MockModel::new("judge")
            .with_response(r#"{"verdicts": [{"verdict": "yes", "reason": "on point"}]}"#)
            .with_response(r#"{"verdicts": [{"verdict": "no", "reason": "unrelated"}]}"#)
            .with_response(r#"{"reason": "one of two contexts helped"}"#);
        let metric = ContextualPrecisionMetric::new(Arc::new(JudgeAdapter::new(Arc::new(model))));
        let case = LlmTestCase {
            input: "q".into(),
            actual_output: "a".into(),
            expected_output: "e".into(),
            retrieval_context: vec!["ctx".into()],
        };

        let record = metric.measure(&[case.clone(), case], 0.7).await.unwrap();
        assert_eq!(record.score, Some(0.5));
        assert_eq!(record.metric, MetricKind::ContextualPrecisionMetric);
    }
}
