use std::sync::Arc;

use async_trait::async_trait;

use super::judge::{self, Claims, JSON_ONLY, Verdicts};
use super::{CaseScore, EvaluationRecord, Metric, MetricKind, finish};
use crate::adapter::JudgeModel;
use crate::error::Result;
use crate::test_case::LlmTestCase;

/// Whether the candidate's claims agree with the retrieval context.
///
/// Claims are extracted from the answer and each is checked against the
/// context; only contradictions (`no`) count against the score. An answer
/// without claims scores 1.
pub struct FaithfulnessMetric {
    judge: Arc<dyn JudgeModel>,
}

impl FaithfulnessMetric {
    pub fn new(judge: Arc<dyn JudgeModel>) -> Self {
        Self { judge }
    }

    async fn score_case(&self, case: &LlmTestCase) -> Result<CaseScore> {
        let kind = self.kind();
        let Claims { claims } =
            judge::ask(self.judge.as_ref(), kind, &claims_prompt(&case.actual_output)).await?;
        if claims.is_empty() {
            return Ok(CaseScore { score: 1.0, findings: Vec::new() });
        }

        let prompt = verdicts_prompt(&case.retrieval_context, &claims);
        let Verdicts { verdicts } = judge::ask(self.judge.as_ref(), kind, &prompt).await?;

        let findings = verdicts
            .iter()
            .zip(&claims)
            .filter(|(v, _)| v.is("no"))
            .map(|(v, claim)| v.finding(claim))
            .collect();
        Ok(CaseScore { score: judge::non_negative_ratio(&verdicts, 1.0), findings })
    }
}

#[async_trait]
impl Metric for FaithfulnessMetric {
    fn kind(&self) -> MetricKind {
        MetricKind::FaithfulnessMetric
    }

    async fn measure(&self, cases: &[LlmTestCase], threshold: f64) -> Result<EvaluationRecord> {
        let mut scored = Vec::with_capacity(cases.len());
        for case in cases {
            scored.push(self.score_case(case).await?);
        }
        finish(self.judge.as_ref(), self.kind(), threshold, scored).await
    }
}

fn claims_prompt(actual_output: &str) -> String {
    format!(
        "Extract every factual claim made in the following text. \
         Only include claims the text states, do not add outside knowledge.\n\n\
         Text:\n{actual_output}\n\n\
         {JSON_ONLY} Format: {{\"claims\": [\"...\"]}}"
    )
}

fn verdicts_prompt(retrieval_context: &[String], claims: &[String]) -> String {
    format!(
        "For each claim, decide whether it agrees with the retrieval context. \
         Use \"yes\" if the context supports it, \"no\" if the context contradicts it, \
         and \"idk\" if the context does not say. Give a reason for every \"no\". \
         Return one verdict per claim, in order.\n\n\
         Retrieval context:\n{}\n\n\
         Claims:\n{}\n\n\
         {JSON_ONLY} Format: {{\"verdicts\": [{{\"verdict\": \"yes\", \"reason\": \"...\"}}]}}",
        retrieval_context.join("\n\n"),
        judge::json_list(claims)
    )
}

#[cfg(test)]
mod tests {
    use interview_model::MockModel;

    use super::*;
    use crate::adapter::JudgeAdapter;

    #[tokio::test]
    async fn contradicted_claims_lower_the_score() {
        let model = MockModel::new("judge")
            .with_response(
                r#"{"claims": ["Raft needs a leader.", "Raft has no log.", "Raft is old."]}"#,
            )
            .with_response(
                r#"{"verdicts": [{"verdict": "yes"}, {"verdict": "no", "reason": "Raft replicates a log"}, {"verdict": "idk"}]}"#,
            )
            .with_response(r#"{"reason": "one claim contradicts the context"}"#);
        let model = Arc::new(model);
        let metric = FaithfulnessMetric::new(Arc::new(JudgeAdapter::new(model.clone())));
        let case = LlmTestCase {
            input: "What is Raft?".into(),
            actual_output: "Raft needs a leader and has no log.".into(),
            expected_output: String::new(),
            retrieval_context: vec!["Raft elects a leader that replicates a log".into()],
        };

        let record = metric.measure(&[case], 0.5).await.unwrap();

        assert!((record.score.unwrap() - 2.0 / 3.0).abs() < 1e-9);
        assert!(record.passed());
        assert!(model.prompts()[2].contains("- Raft replicates a log"));
    }
}
