//! End-to-end session runs against scripted engines.

use std::sync::Arc;

use async_trait::async_trait;
use interview_core::{CompletionModel, Transcript};
use interview_model::MockModel;
use interview_rag::{Document, Retriever};
use interview_session::{
    AnswerProvider, ContextStrategy, InterviewSession, KeywordContextResolver, ScriptedAnswers,
    SessionError, SessionState, TurnStage,
};
use proptest::prelude::*;

const CV: &str = "Experienced backend engineer with distributed systems background.";
const JD: &str = "Looking for a distributed systems engineer.";

fn references() -> Vec<Document> {
    vec![Document::new("ref-0", "Distributed systems require consensus protocols.")]
}

/// Answers the question prompt with `questions` and every other prompt with
/// a deterministic echo of its question line.
fn scripted_model(questions: &str) -> Arc<MockModel> {
    Arc::new(MockModel::new("mock").with_response(questions).with_responder(|prompt| {
        let question = prompt.rsplit('\n').next().unwrap_or_default();
        format!("Reference answer for: {question}")
    }))
}

fn session(model: Arc<MockModel>) -> InterviewSession {
    InterviewSession::builder()
        .model(model)
        .cv_text(CV)
        .jd_text(JD)
        .reference_documents(references())
        .build()
        .unwrap()
}

#[tokio::test]
async fn keyword_context_grounds_reference_answer() {
    let model = scripted_model("How have you worked with distributed systems?");
    let mut session = session(model.clone());

    let transcript =
        session.run(&mut ScriptedAnswers::new(["I built a Raft cluster."])).await.unwrap();

    assert_eq!(transcript.len(), 1);
    let turn = &transcript.turns()[0];
    assert_eq!(turn.question, "How have you worked with distributed systems?");
    assert!(turn.relevant_context.contains("Distributed systems require consensus protocols"));
    assert_eq!(turn.user_answer, "I built a Raft cluster.");
    assert_eq!(
        turn.generated_answer,
        "Reference answer for: How have you worked with distributed systems?"
    );

    let answer_prompt = &model.prompts()[1];
    assert!(answer_prompt.starts_with("Using the following context:\n"));
    assert!(answer_prompt.contains(&turn.relevant_context));
    assert_eq!(session.state(), SessionState::Completed);
}

#[tokio::test]
async fn short_answer_script_leaves_trailing_answers_empty() {
    let model = scripted_model("Question one?\nQuestion two?\nQuestion three?");
    let mut session = session(model);

    let transcript =
        session.run(&mut ScriptedAnswers::from_lines("only one answer\n")).await.unwrap();

    let answers: Vec<_> = transcript.iter().map(|t| t.user_answer.as_str()).collect();
    assert_eq!(answers, ["only one answer", "", ""]);
}

#[tokio::test]
async fn turns_follow_question_order() {
    let questions = "- First?\n- Second?\n- Third?\n- Fourth?";
    let mut session = session(scripted_model(questions));

    let transcript = session.run(&mut ScriptedAnswers::new(["a", "b", "c", "d"])).await.unwrap();

    let asked: Vec<_> = transcript.iter().map(|t| t.question.as_str()).collect();
    assert_eq!(asked, ["First?", "Second?", "Third?", "Fourth?"]);
    let answered: Vec<_> = transcript.iter().map(|t| t.user_answer.as_str()).collect();
    assert_eq!(answered, ["a", "b", "c", "d"]);
}

#[tokio::test]
async fn identical_inputs_produce_identical_transcripts() {
    let questions = "Describe distributed tracing.\nWhat consensus protocols do you know?";

    let mut first = session(scripted_model(questions));
    let mut second = session(scripted_model(questions));
    let a = first.run(&mut ScriptedAnswers::new(["x", "y"])).await.unwrap();
    let b = second.run(&mut ScriptedAnswers::new(["x", "y"])).await.unwrap();

    assert_eq!(a.to_json_pretty().unwrap(), b.to_json_pretty().unwrap());
}

#[tokio::test]
async fn transcript_round_trips_through_disk() {
    let mut session = session(scripted_model("Why Rust?"));
    let transcript = session.run(&mut ScriptedAnswers::new(["Ownership."])).await.unwrap();

    let dir = tempfile::tempdir().unwrap();
    let path = dir.path().join("interview_data.json");
    transcript.save(&path).unwrap();

    assert_eq!(Transcript::load(&path).unwrap(), transcript);
}

#[tokio::test]
async fn answer_provider_is_called_once_per_turn() {
    struct Counting(usize);

    #[async_trait]
    impl AnswerProvider for Counting {
        async fn answer(&mut self, _question: &str) -> interview_session::Result<String> {
            self.0 += 1;
            Ok(format!("answer {}", self.0))
        }
    }

    let mut session = session(scripted_model("One?\nTwo?\nThree?"));
    let mut provider = Counting(0);
    let transcript = session.run(&mut provider).await.unwrap();

    assert_eq!(provider.0, 3);
    assert_eq!(transcript.turns()[2].user_answer, "answer 3");
}

#[tokio::test]
async fn second_run_is_rejected() {
    let mut session = session(scripted_model("Only?"));
    session.run(&mut ScriptedAnswers::default()).await.unwrap();

    let err = session.run(&mut ScriptedAnswers::default()).await.unwrap_err();
    assert!(matches!(err, SessionError::AlreadyRun));
    assert_eq!(session.transcript().len(), 1);
}

#[tokio::test]
async fn model_failure_aborts_the_run() {
    let model = Arc::new(MockModel::new("broken").with_failure("rate limited"));
    let mut session = session(model);

    let err = session.run(&mut ScriptedAnswers::default()).await.unwrap_err();
    assert!(matches!(err, SessionError::Model(_)));
    assert!(session.transcript().is_empty());
}

#[tokio::test]
async fn failed_answer_leaves_session_at_last_completed_stage() {
    struct FailsOnSecond(usize);

    #[async_trait]
    impl AnswerProvider for FailsOnSecond {
        async fn answer(&mut self, _question: &str) -> interview_session::Result<String> {
            self.0 += 1;
            if self.0 == 2 {
                return Err(std::io::Error::other("stdin closed").into());
            }
            Ok("first answer".to_string())
        }
    }

    let mut session = session(scripted_model("One?\nTwo?\nThree?"));
    assert_eq!(session.state(), SessionState::Init);

    let err = session.run(&mut FailsOnSecond(0)).await.unwrap_err();

    assert!(matches!(err, SessionError::AnswerProvider(_)));
    assert_eq!(
        session.state(),
        SessionState::InTurn { turn: 1, stage: TurnStage::ModelAnswered }
    );
    assert_eq!(session.transcript().len(), 1);
    assert!(matches!(
        session.run(&mut ScriptedAnswers::default()).await,
        Err(SessionError::AlreadyRun)
    ));
}

#[tokio::test]
async fn summary_is_truncated() {
    let model = Arc::new(
        MockModel::new("mock")
            .with_response("Q?")
            .with_response("ref")
            .with_responder(|_| "é".repeat(900)),
    );
    let mut session = session(model.clone());
    session.run(&mut ScriptedAnswers::new(["yes"])).await.unwrap();

    let summary = session.summarize_history().await.unwrap();
    assert_eq!(summary.chars().count(), 500);
    let prompt = model.prompts().pop().unwrap();
    assert!(prompt.ends_with("Q: Q?\nA: yes"));
}

struct StubRetriever {
    lines: Vec<String>,
}

#[async_trait]
impl Retriever for StubRetriever {
    async fn query(&self, _text: &str) -> interview_rag::Result<Vec<String>> {
        Ok(self.lines.clone())
    }
}

#[tokio::test]
async fn retriever_lines_become_questions_verbatim() {
    let retriever: Arc<dyn Retriever> = Arc::new(StubRetriever {
        lines: vec![
            "Distributed systems require consensus protocols.".into(),
            "Tell me about Raft?".into(),
        ],
    });
    let model = Arc::new(MockModel::new("mock").with_responder(|_| "ref".to_string()));
    let mut session = InterviewSession::builder()
        .model(model.clone())
        .cv_text(CV)
        .jd_text(JD)
        .retriever(retriever)
        .build()
        .unwrap();

    let transcript = session.run(&mut ScriptedAnswers::default()).await.unwrap();

    assert_eq!(transcript.turns()[0].question, "Distributed systems require consensus protocols.");
    assert_eq!(transcript.len(), 2);
    // One reference answer per turn, no question-generation call.
    assert_eq!(model.call_count(), 2);
    assert_eq!(session.context_strategy(), ContextStrategy::KeywordHeuristic);
}

#[tokio::test]
async fn retriever_strategy_uses_retrieved_lines_as_context() {
    let retriever: Arc<dyn Retriever> = Arc::new(StubRetriever {
        lines: vec!["Window one.".into(), "Window two.".into()],
    });
    let model = Arc::new(MockModel::new("mock").with_responder(|_| "ref".to_string()));
    let mut session = InterviewSession::builder()
        .model(model)
        .retriever(retriever)
        .context_strategy(ContextStrategy::Retriever)
        .build()
        .unwrap();

    let transcript = session.run(&mut ScriptedAnswers::default()).await.unwrap();
    assert_eq!(transcript.turns()[0].relevant_context, "Window one.\nWindow two.");
}

#[test]
fn retriever_strategy_without_retriever_is_a_config_error() {
    let model: Arc<dyn CompletionModel> = Arc::new(MockModel::new("mock"));
    let result = InterviewSession::builder()
        .model(model)
        .context_strategy(ContextStrategy::Retriever)
        .build();
    assert!(matches!(result, Err(SessionError::Config(_))));
}

#[test]
fn missing_model_is_a_config_error() {
    assert!(matches!(InterviewSession::builder().build(), Err(SessionError::Config(_))));
}

proptest! {
    #[test]
    fn no_keyword_overlap_falls_back_to_leading_sentences(
        sentences in prop::collection::vec("[a-m]{1,6}( [a-m]{1,6}){0,3}", 1..60),
        question in "[n-z]{1,8}( [n-z]{1,8}){0,4}",
    ) {
        let cv = sentences.iter().map(|s| format!("{s}.")).collect::<Vec<_>>().join(" ");
        let resolver = KeywordContextResolver::new(&cv, &[]);

        let expected = sentences.iter().take(10).cloned().collect::<Vec<_>>().join(". ");
        prop_assert_eq!(resolver.select(&question), expected);
    }
}
