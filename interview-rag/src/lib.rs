//! # interview-rag
//!
//! Sentence-window retrieval for the mock interview engine.
//!
//! ## Overview
//!
//! - [`SentenceWindowNodeParser`] - one node per sentence, with the
//!   surrounding window stored in metadata
//! - [`IndexManager`] - builds a [`VectorIndex`] or loads the persisted one
//! - [`SentenceWindowRetriever`] - similarity search, window replacement,
//!   reranking and line flattening behind the [`Retriever`] trait
//! - [`EmbeddingProvider`] / [`Reranker`] - pluggable backends;
//!   [`HashEmbeddingProvider`] and [`LexicalReranker`] need no model files,
//!   the `fastembed` feature adds local ONNX models
//!
//! Every call is awaited in sequence; nothing here spawns tasks.

pub mod config;
pub mod document;
pub mod embedding;
pub mod error;
pub mod index;
pub mod index_manager;
pub mod node_parser;
#[cfg(feature = "fastembed")]
pub mod onnx;
pub mod postprocessor;
pub mod reranker;
pub mod retriever;

pub use config::{RetrieverConfig, RetrieverConfigBuilder};
pub use document::{
    Document, ORIGINAL_TEXT_METADATA_KEY, SearchResult, SentenceWindowNode, WINDOW_METADATA_KEY,
};
pub use embedding::{EmbeddingProvider, HashEmbeddingProvider};
pub use error::{RagError, Result};
pub use index::VectorIndex;
pub use index_manager::IndexManager;
pub use node_parser::{NodeParser, SentenceWindowNodeParser, split_sentences};
#[cfg(feature = "fastembed")]
pub use onnx::{FastEmbedProvider, FastEmbedReranker};
pub use postprocessor::MetadataReplacementPostProcessor;
pub use reranker::{LexicalReranker, NoOpReranker, Reranker};
pub use retriever::{Retriever, SentenceWindowRetriever, flatten_response};
