//! Error types for the `interview-core` crate.

use thiserror::Error;

/// Errors raised by generation engines and shared data handling.
#[derive(Debug, Error)]
pub enum CoreError {
    /// A required setting (typically an API credential) is missing or invalid.
    ///
    /// Raised at engine construction, before any document or index work.
    #[error("Configuration error: {0}")]
    Config(String),

    /// The generation engine failed to produce a completion.
    #[error("Model error ({model}): {message}")]
    Model {
        /// The model that produced the error.
        model: String,
        /// A description of the failure.
        message: String,
    },

    /// A transcript could not be encoded or decoded.
    #[error("Transcript error: {0}")]
    Transcript(#[from] serde_json::Error),

    /// Reading or writing a transcript file failed.
    #[error(transparent)]
    Io(#[from] std::io::Error),
}

/// A convenience result type for core operations.
pub type Result<T> = std::result::Result<T, CoreError>;
