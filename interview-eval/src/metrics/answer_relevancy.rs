use std::sync::Arc;

use async_trait::async_trait;

use super::judge::{self, JSON_ONLY, Statements, Verdicts};
use super::{CaseScore, EvaluationRecord, Metric, MetricKind, finish};
use crate::adapter::JudgeModel;
use crate::error::Result;
use crate::test_case::LlmTestCase;

/// How much of the candidate's answer addresses the question.
///
/// The answer is split into statements and each is judged relevant (`yes`),
/// irrelevant (`no`) or ambiguous (`idk`). The case score is the share of
/// statements not judged irrelevant; an answer with no statements scores 1.
pub struct AnswerRelevancyMetric {
    judge: Arc<dyn JudgeModel>,
}

impl AnswerRelevancyMetric {
    pub fn new(judge: Arc<dyn JudgeModel>) -> Self {
        Self { judge }
    }

    async fn score_case(&self, case: &LlmTestCase) -> Result<CaseScore> {
        let kind = self.kind();
        let Statements { statements } =
            judge::ask(self.judge.as_ref(), kind, &statements_prompt(&case.actual_output)).await?;
        if statements.is_empty() {
            return Ok(CaseScore { score: 1.0, findings: Vec::new() });
        }

        let prompt = verdicts_prompt(&case.input, &statements);
        let Verdicts { verdicts } = judge::ask(self.judge.as_ref(), kind, &prompt).await?;

        let findings = verdicts
            .iter()
            .zip(&statements)
            .filter(|(v, _)| v.is("no"))
            .map(|(v, statement)| v.finding(statement))
            .collect();
        Ok(CaseScore { score: judge::non_negative_ratio(&verdicts, 1.0), findings })
    }
}

#[async_trait]
impl Metric for AnswerRelevancyMetric {
    fn kind(&self) -> MetricKind {
        MetricKind::AnswerRelevancyMetric
    }

    async fn measure(&self, cases: &[LlmTestCase], threshold: f64) -> Result<EvaluationRecord> {
        let mut scored = Vec::with_capacity(cases.len());
        for case in cases {
            scored.push(self.score_case(case).await?);
        }
        finish(self.judge.as_ref(), self.kind(), threshold, scored).await
    }
}

fn statements_prompt(actual_output: &str) -> String {
    format!(
        "Break the following text into standalone statements.\n\n\
         Text:\n{actual_output}\n\n\
         {JSON_ONLY} Format: {{\"statements\": [\"...\"]}}"
    )
}

fn verdicts_prompt(input: &str, statements: &[String]) -> String {
    format!(
        "For each statement, decide whether it is relevant to the input. \
         Use \"yes\" if it is relevant, \"no\" if it is irrelevant, and \"idk\" if it is ambiguous. \
         Give a reason for every \"no\". Return one verdict per statement, in order.\n\n\
         Input:\n{input}\n\n\
         Statements:\n{}\n\n\
         {JSON_ONLY} Format: {{\"verdicts\": [{{\"verdict\": \"yes\", \"reason\": \"...\"}}]}}",
        judge::json_list(statements)
    )
}
