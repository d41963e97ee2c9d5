//! The persisted sentence-window vector index.
//!
//! [`VectorIndex`] keeps every embedded node in memory and answers
//! nearest-neighbour queries with cosine similarity. It persists to a single
//! `index.json` file inside a directory; the layout is private to this crate.

use std::fs;
use std::path::Path;

use serde::{Deserialize, Serialize};
use tracing::debug;

use crate::document::{SearchResult, SentenceWindowNode};
use crate::error::{RagError, Result};

/// File name of the persisted index inside its directory.
pub const INDEX_FILE_NAME: &str = "index.json";

/// Version of the on-disk layout. Files with another version fail to load.
pub const INDEX_FORMAT_VERSION: u32 = 1;

/// An in-memory vector index over [`SentenceWindowNode`]s.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct VectorIndex {
    format_version: u32,
    embedding_model: String,
    dimensions: usize,
    window_size: usize,
    nodes: Vec<SentenceWindowNode>,
}

/// Compute cosine similarity between two vectors.
///
/// Returns 0.0 if either vector has zero magnitude.
fn cosine_similarity(a: &[f32], b: &[f32]) -> f32 {
    let dot: f32 = a.iter().zip(b.iter()).map(|(x, y)| x * y).sum();
    let norm_a: f32 = a.iter().map(|x| x * x).sum::<f32>().sqrt();
    let norm_b: f32 = b.iter().map(|x| x * x).sum::<f32>().sqrt();
    if norm_a == 0.0 || norm_b == 0.0 {
        return 0.0;
    }
    dot / (norm_a * norm_b)
}

fn index_error(dir: &Path, message: impl Into<String>) -> RagError {
    RagError::IndexError { path: dir.display().to_string(), message: message.into() }
}

impl VectorIndex {
    /// Create an index from already-embedded nodes.
    pub fn new(
        embedding_model: impl Into<String>,
        dimensions: usize,
        window_size: usize,
        nodes: Vec<SentenceWindowNode>,
    ) -> Self {
        Self {
            format_version: INDEX_FORMAT_VERSION,
            embedding_model: embedding_model.into(),
            dimensions,
            window_size,
            nodes,
        }
    }

    pub fn nodes(&self) -> &[SentenceWindowNode] {
        &self.nodes
    }

    pub fn len(&self) -> usize {
        self.nodes.len()
    }

    pub fn is_empty(&self) -> bool {
        self.nodes.is_empty()
    }

    /// The embedding model the index was built with.
    pub fn embedding_model(&self) -> &str {
        &self.embedding_model
    }

    pub fn dimensions(&self) -> usize {
        self.dimensions
    }

    pub fn window_size(&self) -> usize {
        self.window_size
    }

    /// Return the `top_k` nodes most similar to `embedding`.
    ///
    /// Results are ordered by descending cosine similarity; ties keep index
    /// order.
    pub fn search(&self, embedding: &[f32], top_k: usize) -> Vec<SearchResult> {
        let mut scored: Vec<SearchResult> = self
            .nodes
            .iter()
            .map(|node| SearchResult {
                node: node.clone(),
                score: cosine_similarity(&node.embedding, embedding),
            })
            .collect();

        scored.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));
        scored.truncate(top_k);
        scored
    }

    /// Write the index to `dir`, creating the directory if needed.
    ///
    /// The file is written next to its final name and then renamed, so a
    /// reader never observes a half-written index.
    pub fn persist(&self, dir: impl AsRef<Path>) -> Result<()> {
        let dir = dir.as_ref();
        fs::create_dir_all(dir).map_err(|e| index_error(dir, format!("create directory: {e}")))?;

        let payload =
            serde_json::to_vec(self).map_err(|e| index_error(dir, format!("serialize: {e}")))?;
        let tmp = dir.join(format!("{INDEX_FILE_NAME}.tmp"));
        fs::write(&tmp, payload).map_err(|e| index_error(dir, format!("write: {e}")))?;
        fs::rename(&tmp, dir.join(INDEX_FILE_NAME))
            .map_err(|e| index_error(dir, format!("rename: {e}")))?;

        debug!(path = %dir.display(), node_count = self.nodes.len(), "persisted index");
        Ok(())
    }

    /// Read an index previously written by [`VectorIndex::persist`].
    ///
    /// # Errors
    ///
    /// Returns [`RagError::IndexError`] if the file is missing, unreadable,
    /// not valid JSON, or has an unknown format version.
    pub fn load(dir: impl AsRef<Path>) -> Result<Self> {
        let dir = dir.as_ref();
        let raw = fs::read(dir.join(INDEX_FILE_NAME))
            .map_err(|e| index_error(dir, format!("read: {e}")))?;
        let index: VectorIndex =
            serde_json::from_slice(&raw).map_err(|e| index_error(dir, format!("decode: {e}")))?;

        if index.format_version != INDEX_FORMAT_VERSION {
            return Err(index_error(
                dir,
                format!(
                    "unsupported format version {} (expected {INDEX_FORMAT_VERSION})",
                    index.format_version
                ),
            ));
        }
        Ok(index)
    }
}
