//! Node postprocessors applied between similarity search and reranking.

use crate::document::{SearchResult, WINDOW_METADATA_KEY};

/// Replaces each node's text with one of its metadata values.
///
/// With the default target key this swaps a matched sentence for its stored
/// sentence window, so matching stays sentence-precise while the returned
/// context is window-wide. Nodes lacking the key are left unchanged.
#[derive(Debug, Clone)]
pub struct MetadataReplacementPostProcessor {
    target_metadata_key: String,
}

impl Default for MetadataReplacementPostProcessor {
    fn default() -> Self {
        Self::new(WINDOW_METADATA_KEY)
    }
}

impl MetadataReplacementPostProcessor {
    pub fn new(target_metadata_key: impl Into<String>) -> Self {
        Self { target_metadata_key: target_metadata_key.into() }
    }

    pub fn process(&self, mut results: Vec<SearchResult>) -> Vec<SearchResult> {
        for result in &mut results {
            if let Some(replacement) = result.node.metadata.get(&self.target_metadata_key) {
                result.node.text = replacement.clone();
            }
        }
        results
    }
}
