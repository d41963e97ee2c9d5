//! Error types for the `interview-rag` crate.

use thiserror::Error;

/// Errors that can occur in indexing and retrieval.
#[derive(Debug, Error)]
pub enum RagError {
    /// An error occurred during embedding generation.
    #[error("Embedding error ({provider}): {message}")]
    EmbeddingError {
        /// The embedding provider that produced the error.
        provider: String,
        /// A description of the failure.
        message: String,
    },

    /// A persisted index could not be read or written.
    #[error("Index error ({path}): {message}")]
    IndexError {
        /// The index directory involved.
        path: String,
        /// A description of the failure.
        message: String,
    },

    /// An index build was requested with no indexable text.
    #[error("cannot build an index from an empty document set")]
    EmptyDocumentSet,

    /// An error occurred during result reranking.
    #[error("Reranker error ({reranker}): {message}")]
    RerankerError {
        /// The reranker that produced the error.
        reranker: String,
        /// A description of the failure.
        message: String,
    },

    /// A configuration validation error.
    #[error("Configuration error: {0}")]
    ConfigError(String),

    /// An error in retrieval orchestration.
    #[error("Retrieval error: {0}")]
    RetrievalError(String),
}

/// A convenience result type for RAG operations.
pub type Result<T> = std::result::Result<T, RagError>;
