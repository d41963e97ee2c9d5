//! Local ONNX embedding and cross-encoder reranking via `fastembed`.
//!
//! This module is only available when the `fastembed` feature is enabled.
//! Models are downloaded from the Hugging Face hub on first use and cached.

use std::str::FromStr;

use async_trait::async_trait;
use fastembed::{
    EmbeddingModel, RerankInitOptions, RerankerModel, TextEmbedding, TextInitOptions, TextRerank,
};
use parking_lot::Mutex;
use tracing::debug;

use crate::document::SearchResult;
use crate::embedding::EmbeddingProvider;
use crate::error::{RagError, Result};
use crate::reranker::Reranker;

fn embedding_error(message: impl Into<String>) -> RagError {
    RagError::EmbeddingError { provider: "fastembed".into(), message: message.into() }
}

/// An [`EmbeddingProvider`] backed by a local `fastembed` model such as
/// `BAAI/bge-small-en-v1.5`.
///
/// The loaded model sits behind a mutex and is reused across calls.
pub struct FastEmbedProvider {
    model_id: String,
    dimensions: usize,
    inner: Mutex<TextEmbedding>,
}

impl FastEmbedProvider {
    pub fn try_new(model_id: impl AsRef<str>) -> Result<Self> {
        let label = model_id.as_ref().trim();
        let model = EmbeddingModel::from_str(label)
            .map_err(|e| embedding_error(format!("unknown model `{label}`: {e}")))?;
        let info = TextEmbedding::get_model_info(&model)
            .map_err(|e| embedding_error(format!("no metadata for `{label}`: {e}")))?;
        let dimensions = info.dim;
        let embedding = TextEmbedding::try_new(TextInitOptions::new(model))
            .map_err(|e| embedding_error(format!("failed to initialise `{label}`: {e}")))?;

        Ok(Self { model_id: label.to_string(), dimensions, inner: Mutex::new(embedding) })
    }
}

#[async_trait]
impl EmbeddingProvider for FastEmbedProvider {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        self.embed_batch(&[text])
            .await?
            .into_iter()
            .next()
            .ok_or_else(|| embedding_error("model returned no embedding"))
    }

    async fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>> {
        if texts.is_empty() {
            return Ok(Vec::new());
        }
        debug!(
            provider = "fastembed",
            batch_size = texts.len(),
            model = %self.model_id,
            "embedding batch"
        );

        let mut model = self.inner.lock();
        model
            .embed(texts.to_vec(), None)
            .map_err(|e| embedding_error(format!("inference failed: {e}")))
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }

    fn model_id(&self) -> &str {
        &self.model_id
    }
}

/// A cross-encoder [`Reranker`] backed by `fastembed`.
///
/// Supports `BAAI/bge-reranker-base` and `rozgo/bge-reranker-v2-m3`.
pub struct FastEmbedReranker {
    model_id: String,
    inner: Mutex<TextRerank>,
}

impl FastEmbedReranker {
    pub fn try_new(model_id: impl AsRef<str>) -> Result<Self> {
        let label = model_id.as_ref().trim();
        let model = match label {
            "BAAI/bge-reranker-base" => RerankerModel::BGERerankerBase,
            "rozgo/bge-reranker-v2-m3" => RerankerModel::BGERerankerV2M3,
            other => {
                return Err(RagError::ConfigError(format!("unsupported reranker model `{other}`")));
            }
        };
        let rerank = TextRerank::try_new(RerankInitOptions::new(model)).map_err(|e| {
            RagError::RerankerError {
                reranker: label.to_string(),
                message: format!("failed to initialise: {e}"),
            }
        })?;
        Ok(Self { model_id: label.to_string(), inner: Mutex::new(rerank) })
    }
}

#[async_trait]
impl Reranker for FastEmbedReranker {
    async fn rerank(&self, query: &str, results: Vec<SearchResult>) -> Result<Vec<SearchResult>> {
        if results.is_empty() {
            return Ok(results);
        }

        let documents: Vec<&str> = results.iter().map(|r| r.node.text.as_str()).collect();
        let scored = {
            let mut model = self.inner.lock();
            model.rerank(query, documents, false, None).map_err(|e| RagError::RerankerError {
                reranker: self.model_id.clone(),
                message: e.to_string(),
            })?
        };

        let mut slots: Vec<Option<SearchResult>> = results.into_iter().map(Some).collect();
        let mut reranked = Vec::with_capacity(slots.len());
        for hit in scored {
            if let Some(mut result) = slots.get_mut(hit.index).and_then(Option::take) {
                result.score = hit.score;
                reranked.push(result);
            }
        }
        Ok(reranked)
    }
}
