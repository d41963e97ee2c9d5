//! Error types for the `interview-eval` crate.

use interview_core::CoreError;
use thiserror::Error;

/// Errors that abort an evaluation run.
///
/// No partial results are returned alongside any of these.
#[derive(Debug, Error)]
pub enum EvalError {
    /// The transcript was malformed or empty. Raised before any metric runs.
    #[error("Invalid transcript: {0}")]
    InvalidTranscript(String),

    /// The pass threshold was outside `[0, 1]`.
    #[error("Invalid threshold {0}: must lie between 0 and 1")]
    InvalidThreshold(f64),

    /// The judge model failed.
    #[error(transparent)]
    Model(#[from] CoreError),

    /// A metric could not make sense of the judge's output.
    #[error("{metric} failed: {message}")]
    Metric {
        /// Name of the failing metric.
        metric: String,
        /// A description of the failure.
        message: String,
    },

    /// Results could not be encoded.
    #[error("Serialization error: {0}")]
    Serialization(#[from] serde_json::Error),

    /// Reading a transcript or writing results failed.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// A convenience result type for evaluation operations.
pub type Result<T> = std::result::Result<T, EvalError>;
