//! Configuration for the sentence-window retriever.

use std::path::PathBuf;

use serde::{Deserialize, Serialize};

use crate::error::{RagError, Result};

pub const DEFAULT_EMBEDDING_MODEL: &str = "BAAI/bge-small-en-v1.5";
pub const DEFAULT_RERANKER_MODEL: &str = "BAAI/bge-reranker-base";
pub const DEFAULT_WINDOW_SIZE: usize = 5;
pub const DEFAULT_SIMILARITY_TOP_K: usize = 6;
pub const DEFAULT_RERANK_TOP_N: usize = 2;
pub const DEFAULT_INDEX_DIR: &str = ".sentence_index";

/// Configuration parameters for [`SentenceWindowRetriever`](crate::SentenceWindowRetriever).
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct RetrieverConfig {
    /// Identifier of the embedding model used for nodes and queries.
    pub embedding_model: String,
    /// Identifier of the cross-encoder used for reranking.
    pub reranker_model: String,
    /// Number of sentences kept on each side of a node's original sentence.
    pub window_size: usize,
    /// Number of nearest nodes fetched by vector similarity.
    pub similarity_top_k: usize,
    /// Number of nodes kept after reranking.
    pub rerank_top_n: usize,
    /// Directory the index is persisted to and loaded from.
    pub index_dir: PathBuf,
}

impl Default for RetrieverConfig {
    fn default() -> Self {
        Self {
            embedding_model: DEFAULT_EMBEDDING_MODEL.to_string(),
            reranker_model: DEFAULT_RERANKER_MODEL.to_string(),
            window_size: DEFAULT_WINDOW_SIZE,
            similarity_top_k: DEFAULT_SIMILARITY_TOP_K,
            rerank_top_n: DEFAULT_RERANK_TOP_N,
            index_dir: PathBuf::from(DEFAULT_INDEX_DIR),
        }
    }
}

impl RetrieverConfig {
    /// Create a new builder for constructing a [`RetrieverConfig`].
    pub fn builder() -> RetrieverConfigBuilder {
        RetrieverConfigBuilder::default()
    }
}

/// Builder for constructing a validated [`RetrieverConfig`].
#[derive(Debug, Clone, Default)]
pub struct RetrieverConfigBuilder {
    config: RetrieverConfig,
}

impl RetrieverConfigBuilder {
    pub fn embedding_model(mut self, model: impl Into<String>) -> Self {
        self.config.embedding_model = model.into();
        self
    }

    pub fn reranker_model(mut self, model: impl Into<String>) -> Self {
        self.config.reranker_model = model.into();
        self
    }

    pub fn window_size(mut self, window_size: usize) -> Self {
        self.config.window_size = window_size;
        self
    }

    pub fn similarity_top_k(mut self, top_k: usize) -> Self {
        self.config.similarity_top_k = top_k;
        self
    }

    pub fn rerank_top_n(mut self, top_n: usize) -> Self {
        self.config.rerank_top_n = top_n;
        self
    }

    pub fn index_dir(mut self, dir: impl Into<PathBuf>) -> Self {
        self.config.index_dir = dir.into();
        self
    }

    /// Build the [`RetrieverConfig`], validating that parameters are consistent.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::ConfigError`] if:
    /// - `similarity_top_k == 0` or `rerank_top_n == 0`
    /// - `rerank_top_n > similarity_top_k`
    /// - the embedding model identifier is blank
    pub fn build(self) -> Result<RetrieverConfig> {
        let config = self.config;
        if config.similarity_top_k == 0 {
            return Err(RagError::ConfigError("similarity_top_k must be greater than zero".into()));
        }
        if config.rerank_top_n == 0 {
            return Err(RagError::ConfigError("rerank_top_n must be greater than zero".into()));
        }
        if config.rerank_top_n > config.similarity_top_k {
            return Err(RagError::ConfigError(format!(
                "rerank_top_n ({}) must not exceed similarity_top_k ({})",
                config.rerank_top_n, config.similarity_top_k
            )));
        }
        if config.embedding_model.trim().is_empty() {
            return Err(RagError::ConfigError("embedding_model must not be empty".into()));
        }
        Ok(config)
    }
}
