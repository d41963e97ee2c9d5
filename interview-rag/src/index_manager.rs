//! Build-or-load lifecycle for the persisted index.
//!
//! The presence of a loadable index in the persist directory is the only
//! build-vs-load signal. There is no staleness check: an index built from a
//! different document set is loaded as long as it decodes and was embedded by
//! the active embedding model with the same dimensionality. The directory has a single writer;
//! concurrent rebuilds against one directory are not coordinated.

use std::path::Path;
use std::sync::Arc;

use tracing::{error, info, warn};

use crate::document::Document;
use crate::embedding::EmbeddingProvider;
use crate::error::{RagError, Result};
use crate::index::VectorIndex;
use crate::node_parser::{NodeParser, SentenceWindowNodeParser};

/// Builds, persists and reloads [`VectorIndex`]es.
pub struct IndexManager {
    embedding_provider: Arc<dyn EmbeddingProvider>,
    parser: SentenceWindowNodeParser,
}

impl IndexManager {
    pub fn new(
        embedding_provider: Arc<dyn EmbeddingProvider>,
        parser: SentenceWindowNodeParser,
    ) -> Self {
        Self { embedding_provider, parser }
    }

    /// Load the index in `persist_dir`, or rebuild it from `documents`.
    ///
    /// Any load failure (missing directory, corrupted file, incompatible
    /// format) is logged and treated as "no index". The rebuild path embeds
    /// every node and persists the result to `persist_dir`; the load path
    /// neither embeds nor writes.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::EmptyDocumentSet`] if a rebuild is needed and the
    /// documents contain no sentences, or any embedding or persistence error
    /// from the rebuild.
    pub async fn build_or_load(
        &self,
        documents: &[Document],
        persist_dir: impl AsRef<Path>,
    ) -> Result<VectorIndex> {
        let persist_dir = persist_dir.as_ref();
        match self.load(persist_dir) {
            Ok(index) => {
                info!(
                    path = %persist_dir.display(),
                    node_count = index.len(),
                    "loaded persisted index"
                );
                return Ok(index);
            }
            Err(e) => {
                warn!(
                    path = %persist_dir.display(),
                    error = %e,
                    "no usable persisted index, rebuilding"
                );
            }
        }

        let index = self.build(documents).await?;
        index.persist(persist_dir)?;
        info!(path = %persist_dir.display(), node_count = index.len(), "persisted rebuilt index");
        Ok(index)
    }

    /// Load a persisted index compatible with the configured embedder.
    ///
    /// An index embedded by a different model, or with a different
    /// dimensionality, is rejected.
    pub fn load(&self, persist_dir: &Path) -> Result<VectorIndex> {
        let index = VectorIndex::load(persist_dir)?;
        let model_id = self.embedding_provider.model_id();
        if index.embedding_model() != model_id {
            return Err(RagError::IndexError {
                path: persist_dir.display().to_string(),
                message: format!(
                    "index was embedded with `{}`, active embedder is `{model_id}`",
                    index.embedding_model()
                ),
            });
        }
        let expected = self.embedding_provider.dimensions();
        if index.dimensions() != expected {
            return Err(RagError::IndexError {
                path: persist_dir.display().to_string(),
                message: format!(
                    "index has {}-dimensional embeddings, embedder produces {expected}",
                    index.dimensions()
                ),
            });
        }
        Ok(index)
    }

    /// Parse and embed `documents` into a fresh in-memory index.
    pub async fn build(&self, documents: &[Document]) -> Result<VectorIndex> {
        let mut nodes: Vec<_> = documents.iter().flat_map(|doc| self.parser.parse(doc)).collect();
        if nodes.is_empty() {
            error!(document_count = documents.len(), "no sentences to index");
            return Err(RagError::EmptyDocumentSet);
        }

        let texts: Vec<&str> = nodes.iter().map(|n| n.text.as_str()).collect();
        let embeddings = self.embedding_provider.embed_batch(&texts).await.map_err(|e| {
            error!(error = %e, "embedding failed during index build");
            e
        })?;
        if embeddings.len() != nodes.len() {
            return Err(RagError::EmbeddingError {
                provider: self.embedding_provider.model_id().to_string(),
                message: format!("expected {} embeddings, got {}", nodes.len(), embeddings.len()),
            });
        }

        for (node, embedding) in nodes.iter_mut().zip(embeddings) {
            node.embedding = embedding;
        }

        info!(
            document_count = documents.len(),
            node_count = nodes.len(),
            "built sentence window index"
        );

        Ok(VectorIndex::new(
            self.embedding_provider.model_id(),
            self.embedding_provider.dimensions(),
            self.parser.window_size(),
            nodes,
        ))
    }
}
