use std::sync::Arc;

use async_trait::async_trait;

use super::judge::{self, JSON_ONLY, Verdicts};
use super::{CaseScore, EvaluationRecord, Metric, MetricKind, finish};
use crate::adapter::JudgeModel;
use crate::error::Result;
use crate::test_case::LlmTestCase;

/// How much of the expected output the retrieval context can account for.
///
/// Every sentence of the expected output is judged attributable (`yes`) to
/// the context or not. The case score is the attributable share; 0 when the
/// judge finds no sentences.
pub struct ContextualRecallMetric {
    judge: Arc<dyn JudgeModel>,
}

impl ContextualRecallMetric {
    pub fn new(judge: Arc<dyn JudgeModel>) -> Self {
        Self { judge }
    }

    async fn score_case(&self, case: &LlmTestCase) -> Result<CaseScore> {
        let Verdicts { verdicts } =
            judge::ask(self.judge.as_ref(), self.kind(), &verdicts_prompt(case)).await?;
        if verdicts.is_empty() {
            return Ok(CaseScore { score: 0.0, findings: Vec::new() });
        }

        let attributable = verdicts.iter().filter(|v| v.is("yes")).count();
        let findings = verdicts
            .iter()
            .filter(|v| !v.is("yes"))
            .map(|v| v.finding("a sentence is not supported by the context"))
            .collect();
        Ok(CaseScore { score: attributable as f64 / verdicts.len() as f64, findings })
    }
}

#[async_trait]
impl Metric for ContextualRecallMetric {
    fn kind(&self) -> MetricKind {
        MetricKind::ContextualRecallMetric
    }

    async fn measure(&self, cases: &[LlmTestCase], threshold: f64) -> Result<EvaluationRecord> {
        let mut scored = Vec::with_capacity(cases.len());
        for case in cases {
            scored.push(self.score_case(case).await?);
        }
        finish(self.judge.as_ref(), self.kind(), threshold, scored).await
    }
}

fn verdicts_prompt(case: &LlmTestCase) -> String {
    format!(
        "For each sentence in the expected output, decide whether it can be attributed to the \
         retrieval context. Use \"yes\" or \"no\" and give a reason for each.\n\n\
         Expected output:\n{}\n\n\
         Retrieval context:\n{}\n\n\
         {JSON_ONLY} Format: {{\"verdicts\": [{{\"verdict\": \"yes\", \"reason\": \"...\"}}]}}",
        case.expected_output,
        case.retrieval_context.join("\n\n")
    )
}
