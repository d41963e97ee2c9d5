//! Error types for the `interview-session` crate.

use interview_core::CoreError;
use interview_rag::RagError;
use thiserror::Error;

/// Errors that abort a session.
///
/// Context underflow and a drained answer script are handled inside the
/// session and never show up here.
#[derive(Debug, Error)]
pub enum SessionError {
    /// The generation engine failed.
    #[error(transparent)]
    Model(#[from] CoreError),

    /// The retriever failed while generating questions or resolving context.
    #[error(transparent)]
    Retrieval(#[from] RagError),

    /// Reading an answer failed.
    #[error("Answer provider error: {0}")]
    AnswerProvider(#[from] std::io::Error),

    /// The session was assembled with missing or inconsistent parts.
    #[error("Configuration error: {0}")]
    Config(String),

    /// `run` was called on a session that already ran.
    #[error("interview session has already been run")]
    AlreadyRun,
}

/// A convenience result type for session operations.
pub type Result<T> = std::result::Result<T, SessionError>;
