//! # interview-session
//!
//! Drives a mock interview: generate questions from a CV and job
//! description, resolve grounding context for each, generate a reference
//! answer, capture the candidate's answer, and append the turn to the
//! transcript.
//!
//! ```rust,ignore
//! use interview_session::{InterviewSession, ScriptedAnswers};
//!
//! let mut session = InterviewSession::builder()
//!     .model(model)
//!     .cv_text(cv)
//!     .jd_text(jd)
//!     .reference_documents(references)
//!     .build()?;
//! let transcript = session.run(&mut ScriptedAnswers::from_file("answers.txt")?).await?;
//! ```

pub mod answer;
pub mod context;
pub mod error;
pub mod question;
pub mod session;

pub use answer::{AnswerProvider, InteractiveAnswers, ScriptedAnswers};
pub use context::{
    ContextResolver, ContextStrategy, KeywordContextResolver, RetrieverContextResolver,
};
pub use error::{Result, SessionError};
pub use question::{QuestionGenerator, parse_question_lines};
pub use session::{InterviewSession, InterviewSessionBuilder, SessionState, TurnStage};
