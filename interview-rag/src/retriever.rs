//! Sentence-window retrieval.
//!
//! The [`SentenceWindowRetriever`] runs the full query pipeline on every
//! call, with no caching between calls:
//!
//! 1. embed the query and take the `similarity_top_k` nearest nodes
//! 2. replace each node's sentence with its stored window
//! 3. rerank and keep the `rerank_top_n` best
//! 4. flatten the remaining windows into non-empty lines
//!
//! # Example
//!
//! ```rust,ignore
//! use std::sync::Arc;
//! use interview_rag::{
//!     HashEmbeddingProvider, LexicalReranker, RetrieverConfig, SentenceWindowRetriever,
//! };
//!
//! let retriever = SentenceWindowRetriever::build_or_load(
//!     RetrieverConfig::default(),
//!     &documents,
//!     Arc::new(HashEmbeddingProvider::new("local/hash", 256)?),
//!     Arc::new(LexicalReranker::default()),
//! )
//! .await?;
//! let lines = retriever.query("What does the role require?").await?;
//! ```

use std::sync::Arc;

use async_trait::async_trait;
use tracing::{debug, error};

use crate::config::RetrieverConfig;
use crate::document::{Document, SearchResult};
use crate::embedding::EmbeddingProvider;
use crate::error::{RagError, Result};
use crate::index::VectorIndex;
use crate::index_manager::IndexManager;
use crate::node_parser::SentenceWindowNodeParser;
use crate::postprocessor::MetadataReplacementPostProcessor;
use crate::reranker::Reranker;

/// Anything that turns a query into ordered context lines.
#[async_trait]
pub trait Retriever: Send + Sync {
    /// Return context lines for `text`, most relevant first.
    async fn query(&self, text: &str) -> Result<Vec<String>>;
}

/// Retriever over a sentence-window [`VectorIndex`].
pub struct SentenceWindowRetriever {
    config: RetrieverConfig,
    embedding_provider: Arc<dyn EmbeddingProvider>,
    index: VectorIndex,
    postprocessor: MetadataReplacementPostProcessor,
    reranker: Arc<dyn Reranker>,
}

impl SentenceWindowRetriever {
    /// Create a retriever over an existing index.
    pub fn new(
        config: RetrieverConfig,
        index: VectorIndex,
        embedding_provider: Arc<dyn EmbeddingProvider>,
        reranker: Arc<dyn Reranker>,
    ) -> Self {
        Self {
            config,
            embedding_provider,
            index,
            postprocessor: MetadataReplacementPostProcessor::default(),
            reranker,
        }
    }

    /// Load the index from `config.index_dir`, rebuilding it from `documents`
    /// if it cannot be loaded, and wrap it in a retriever.
    pub async fn build_or_load(
        config: RetrieverConfig,
        documents: &[Document],
        embedding_provider: Arc<dyn EmbeddingProvider>,
        reranker: Arc<dyn Reranker>,
    ) -> Result<Self> {
        let manager = IndexManager::new(
            embedding_provider.clone(),
            SentenceWindowNodeParser::new(config.window_size),
        );
        let index = manager.build_or_load(documents, &config.index_dir).await?;
        Ok(Self::new(config, index, embedding_provider, reranker))
    }

    pub fn config(&self) -> &RetrieverConfig {
        &self.config
    }

    pub fn index(&self) -> &VectorIndex {
        &self.index
    }

    /// Run steps 1-3 of the pipeline and return the reranked windows.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::RetrievalError`] if embedding or reranking fails.
    pub async fn retrieve(&self, text: &str) -> Result<Vec<SearchResult>> {
        let query_embedding = self.embedding_provider.embed(text).await.map_err(|e| {
            error!(error = %e, "embedding failed during query");
            RagError::RetrievalError(format!("query embedding failed: {e}"))
        })?;

        let candidates = self.index.search(&query_embedding, self.config.similarity_top_k);
        let candidates = self.postprocessor.process(candidates);
        let candidate_count = candidates.len();

        let mut results = self.reranker.rerank(text, candidates).await.map_err(|e| {
            error!(error = %e, "reranking failed");
            RagError::RetrievalError(format!("reranking failed: {e}"))
        })?;
        results.truncate(self.config.rerank_top_n);

        debug!(candidate_count, result_count = results.len(), "retrieval completed");
        Ok(results)
    }
}

#[async_trait]
impl Retriever for SentenceWindowRetriever {
    async fn query(&self, text: &str) -> Result<Vec<String>> {
        let results = self.retrieve(text).await?;
        Ok(flatten_response(results.iter().map(|r| r.node.text.as_str())))
    }
}

/// Flatten response texts into non-empty lines, one per text.
///
/// Whitespace inside a text, line breaks included, collapses to single
/// spaces, so the line count never exceeds the number of texts.
pub fn flatten_response<'a>(texts: impl IntoIterator<Item = &'a str>) -> Vec<String> {
    texts
        .into_iter()
        .map(|text| text.split_whitespace().collect::<Vec<_>>().join(" "))
        .filter(|line| !line.is_empty())
        .collect()
}
