//! The interview turn loop.
//!
//! A session starts in [`SessionState::Init`], runs every generated
//! question through the turn stages in order, and ends in
//! [`SessionState::Completed`]:
//!
//! ```text
//! QuestionGenerated -> ContextResolved -> ModelAnswered -> UserAnswered -> Recorded
//! ```
//!
//! There are no retries, skips, or cancellation; any error aborts the run.

use std::sync::Arc;

use interview_core::{CompletionModel, InterviewTurn, Transcript};
use interview_rag::{Document, Retriever};
use tracing::{debug, info};

use crate::answer::AnswerProvider;
use crate::context::{
    ContextResolver, ContextStrategy, KeywordContextResolver, RetrieverContextResolver,
};
use crate::error::{Result, SessionError};
use crate::question::QuestionGenerator;

/// Maximum length, in characters, of [`InterviewSession::summarize_history`].
pub const SUMMARY_MAX_CHARS: usize = 500;

/// Lifecycle of a session.
///
/// A run that fails part-way stays in the [`InTurn`](SessionState::InTurn)
/// state of the last stage it reached.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum SessionState {
    /// Built, not yet run.
    Init,
    /// `stage` of the turn with zero-based index `turn` has completed.
    InTurn { turn: usize, stage: TurnStage },
    /// Every question has been recorded.
    Completed,
}

/// Progress within a single turn, in order.
#[derive(Debug, Clone, Copy, PartialEq, Eq)]
pub enum TurnStage {
    QuestionGenerated,
    ContextResolved,
    ModelAnswered,
    UserAnswered,
    Recorded,
}

/// One mock interview over a CV, a job description and reference material.
pub struct InterviewSession {
    model: Arc<dyn CompletionModel>,
    cv_text: String,
    jd_text: String,
    objective: String,
    questions: QuestionGenerator,
    context: Arc<dyn ContextResolver>,
    transcript: Transcript,
    state: SessionState,
}

impl InterviewSession {
    pub fn builder() -> InterviewSessionBuilder {
        InterviewSessionBuilder::default()
    }

    pub fn state(&self) -> SessionState {
        self.state
    }

    pub fn transcript(&self) -> &Transcript {
        &self.transcript
    }

    pub fn context_strategy(&self) -> ContextStrategy {
        self.context.strategy()
    }

    /// Resolve grounding context for `question` with the configured strategy.
    pub async fn find_relevant_context(&self, question: &str) -> Result<String> {
        self.context.resolve(question).await
    }

    /// Ask the engine for a reference answer grounded on `context`.
    ///
    /// The completion is returned verbatim.
    pub async fn generate_model_answer(&self, question: &str, context: &str) -> Result<String> {
        let prompt = format!(
            "Using the following context:\n{context}\n\n\
             Provide a detailed and thoughtful answer to:\n{question}"
        );
        Ok(self.model.complete(&prompt).await?)
    }

    /// Run the whole interview and return the finished transcript.
    ///
    /// `answers` is asked exactly once per question, after the reference
    /// answer has been generated.
    ///
    /// # Errors
    ///
    /// Returns [`SessionError::AlreadyRun`] if the session was run before,
    /// otherwise the first engine, retriever or answer-provider error.
    pub async fn run(&mut self, answers: &mut dyn AnswerProvider) -> Result<Transcript> {
        if self.state != SessionState::Init {
            return Err(SessionError::AlreadyRun);
        }

        let questions =
            self.questions.generate_questions(&self.cv_text, &self.jd_text, &self.objective).await?;
        info!(
            question_count = questions.len(),
            context_strategy = %self.context.strategy(),
            "starting interview"
        );

        for (turn, question) in questions.into_iter().enumerate() {
            self.advance(turn, TurnStage::QuestionGenerated);

            let relevant_context = self.find_relevant_context(&question).await?;
            self.advance(turn, TurnStage::ContextResolved);

            let generated_answer =
                self.generate_model_answer(&question, &relevant_context).await?;
            self.advance(turn, TurnStage::ModelAnswered);

            let user_answer = answers.answer(&question).await?;
            self.advance(turn, TurnStage::UserAnswered);

            self.transcript.push(InterviewTurn {
                question,
                user_answer,
                generated_answer,
                relevant_context,
            });
            self.advance(turn, TurnStage::Recorded);
        }

        self.state = SessionState::Completed;
        info!(turn_count = self.transcript.len(), "interview completed");
        Ok(self.transcript.clone())
    }

    /// Summarize the recorded questions and answers in at most
    /// [`SUMMARY_MAX_CHARS`] characters.
    pub async fn summarize_history(&self) -> Result<String> {
        let history = self
            .transcript
            .iter()
            .map(|t| format!("Q: {}\nA: {}", t.question, t.user_answer))
            .collect::<Vec<_>>()
            .join("\n");
        let prompt = format!("Summarize the following interview transcript concisely:\n{history}");
        let summary = self.model.complete(&prompt).await?;
        Ok(summary.chars().take(SUMMARY_MAX_CHARS).collect())
    }

    fn advance(&mut self, turn: usize, stage: TurnStage) {
        self.state = SessionState::InTurn { turn, stage };
        debug!(turn, ?stage, "turn advanced");
    }
}

/// Builder for [`InterviewSession`].
///
/// `model` is required. A retriever, when set, drives question generation;
/// the context strategy is chosen separately and defaults to the keyword
/// heuristic.
///
/// # Example
///
/// ```rust,ignore
/// let mut session = InterviewSession::builder()
///     .model(model)
///     .cv_text(cv)
///     .jd_text(jd)
///     .reference_documents(docs)
///     .retriever(retriever)
///     .build()?;
/// let transcript = session.run(&mut ScriptedAnswers::from_lines(script)).await?;
/// ```
#[derive(Default)]
pub struct InterviewSessionBuilder {
    model: Option<Arc<dyn CompletionModel>>,
    cv_text: String,
    jd_text: String,
    objective: String,
    reference_documents: Vec<Document>,
    retriever: Option<Arc<dyn Retriever>>,
    context_strategy: ContextStrategy,
}

impl InterviewSessionBuilder {
    pub fn model(mut self, model: Arc<dyn CompletionModel>) -> Self {
        self.model = Some(model);
        self
    }

    pub fn cv_text(mut self, text: impl Into<String>) -> Self {
        self.cv_text = text.into();
        self
    }

    pub fn jd_text(mut self, text: impl Into<String>) -> Self {
        self.jd_text = text.into();
        self
    }

    pub fn objective(mut self, objective: impl Into<String>) -> Self {
        self.objective = objective.into();
        self
    }

    pub fn reference_documents(mut self, documents: Vec<Document>) -> Self {
        self.reference_documents = documents;
        self
    }

    pub fn retriever(mut self, retriever: Arc<dyn Retriever>) -> Self {
        self.retriever = Some(retriever);
        self
    }

    pub fn context_strategy(mut self, strategy: ContextStrategy) -> Self {
        self.context_strategy = strategy;
        self
    }

    /// # Errors
    ///
    /// Returns [`SessionError::Config`] if no model is set, or if the
    /// retriever strategy is selected without a retriever.
    pub fn build(self) -> Result<InterviewSession> {
        let model =
            self.model.ok_or_else(|| SessionError::Config("model is required".to_string()))?;

        let context: Arc<dyn ContextResolver> = match self.context_strategy {
            ContextStrategy::KeywordHeuristic => {
                Arc::new(KeywordContextResolver::new(&self.cv_text, &self.reference_documents))
            }
            ContextStrategy::Retriever => {
                let retriever = self.retriever.clone().ok_or_else(|| {
                    SessionError::Config("retriever context strategy requires a retriever".into())
                })?;
                Arc::new(RetrieverContextResolver::new(retriever))
            }
        };

        Ok(InterviewSession {
            questions: QuestionGenerator::new(model.clone(), self.retriever),
            model,
            cv_text: self.cv_text,
            jd_text: self.jd_text,
            objective: self.objective,
            context,
            transcript: Transcript::new(),
            state: SessionState::Init,
        })
    }
}
