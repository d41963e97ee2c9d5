//! Conversion of transcript turns into graded test cases.

use interview_core::{InterviewTurn, Transcript};
use serde::{Deserialize, Serialize};

/// One turn, framed for the metrics.
///
/// The candidate's answer is the output under test; the generated reference
/// answer is what it is compared against.
#[derive(Debug, Clone, PartialEq, Eq, Serialize, Deserialize)]
pub struct LlmTestCase {
    pub input: String,
    pub actual_output: String,
    pub expected_output: String,
    pub retrieval_context: Vec<String>,
}

impl From<&InterviewTurn> for LlmTestCase {
    fn from(turn: &InterviewTurn) -> Self {
        Self {
            input: turn.question.clone(),
            actual_output: turn.user_answer.clone(),
            expected_output: turn.generated_answer.clone(),
            retrieval_context: vec![turn.relevant_context.clone()],
        }
    }
}

/// One test case per turn, in transcript order.
pub fn build_test_cases(transcript: &Transcript) -> Vec<LlmTestCase> {
    transcript.iter().map(LlmTestCase::from).collect()
}

#[cfg(test)]
mod tests {
    use super::*;

    #[test]
    fn turn_fields_map_onto_case_roles() {
        let mut transcript = Transcript::new();
        transcript.push(InterviewTurn {
            question: "What is Raft?".into(),
            user_answer: "A consensus protocol.".into(),
            generated_answer: "Raft is a leader-based consensus algorithm.".into(),
            relevant_context: "Distributed systems require consensus protocols".into(),
        });

        let cases = build_test_cases(&transcript);
        assert_eq!(
            cases,
            [LlmTestCase {
                input: "What is Raft?".into(),
                actual_output: "A consensus protocol.".into(),
                expected_output: "Raft is a leader-based consensus algorithm.".into(),
                retrieval_context: vec!["Distributed systems require consensus protocols".into()],
            }]
        );
    }

    #[test]
    fn empty_context_is_still_one_node() {
        let mut transcript = Transcript::new();
        transcript.push(InterviewTurn {
            question: "q".into(),
            user_answer: String::new(),
            generated_answer: "a".into(),
            relevant_context: String::new(),
        });
        assert_eq!(build_test_cases(&transcript)[0].retrieval_context, [""]);
    }
}
