//! Embedding provider trait for generating vector embeddings from text.

use async_trait::async_trait;

use crate::error::{RagError, Result};

/// A provider that generates vector embeddings from text input.
///
/// Implementations wrap specific embedding backends behind a unified async
/// interface. The default [`embed_batch`](EmbeddingProvider::embed_batch)
/// implementation calls [`embed`](EmbeddingProvider::embed) sequentially;
/// backends that support native batching should override it.
///
/// # Example
///
/// ```rust,ignore
/// use interview_rag::EmbeddingProvider;
///
/// let provider = HashEmbeddingProvider::new("local/hash", 256)?;
/// let embedding = provider.embed("hello world").await?;
/// assert_eq!(embedding.len(), provider.dimensions());
/// ```
#[async_trait]
pub trait EmbeddingProvider: Send + Sync {
    /// Generate an embedding vector for a single text input.
    async fn embed(&self, text: &str) -> Result<Vec<f32>>;

    /// Generate embedding vectors for a batch of text inputs.
    ///
    /// The default implementation calls [`embed`](EmbeddingProvider::embed)
    /// sequentially for each input.
    async fn embed_batch(&self, texts: &[&str]) -> Result<Vec<Vec<f32>>> {
        let mut results = Vec::with_capacity(texts.len());
        for text in texts {
            results.push(self.embed(text).await?);
        }
        Ok(results)
    }

    /// Return the dimensionality of embeddings produced by this provider.
    fn dimensions(&self) -> usize;

    /// Return the identifier of the model behind this provider.
    fn model_id(&self) -> &str;
}

/// A deterministic embedder that hashes lowercase word tokens into a
/// fixed-size, L2-normalized vector.
///
/// Texts sharing words land close together, which is enough for sentence
/// matching without downloading a model. The hash is FNV-1a, so vectors are
/// stable across runs, platforms and releases and can be persisted.
#[derive(Debug, Clone)]
pub struct HashEmbeddingProvider {
    model_id: String,
    dimensions: usize,
}

const FNV_OFFSET: u64 = 0xcbf2_9ce4_8422_2325;
const FNV_PRIME: u64 = 0x0100_0000_01b3;

impl HashEmbeddingProvider {
    /// Create a provider producing `dimensions`-long vectors.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::ConfigError`] if `dimensions` is zero.
    pub fn new(model_id: impl Into<String>, dimensions: usize) -> Result<Self> {
        if dimensions == 0 {
            return Err(RagError::ConfigError(
                "embedding dimensions must be greater than zero".into(),
            ));
        }
        Ok(Self { model_id: model_id.into(), dimensions })
    }

    fn embed_sync(&self, text: &str) -> Vec<f32> {
        let mut vector = vec![0.0f32; self.dimensions];
        let tokens = text.split(|c: char| !c.is_alphanumeric()).filter(|t| !t.is_empty());
        for token in tokens {
            let hash = token
                .chars()
                .flat_map(char::to_lowercase)
                .fold(FNV_OFFSET, |acc, c| (acc ^ c as u64).wrapping_mul(FNV_PRIME));
            vector[(hash % self.dimensions as u64) as usize] += 1.0;
        }

        let norm = vector.iter().map(|v| v * v).sum::<f32>().sqrt();
        if norm > 0.0 {
            vector.iter_mut().for_each(|v| *v /= norm);
        }
        vector
    }
}

#[async_trait]
impl EmbeddingProvider for HashEmbeddingProvider {
    async fn embed(&self, text: &str) -> Result<Vec<f32>> {
        Ok(self.embed_sync(text))
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }

    fn model_id(&self) -> &str {
        &self.model_id
    }
}
