//! Data types for documents, sentence-window nodes, and search results.

use std::collections::HashMap;

use serde::{Deserialize, Serialize};

/// Metadata key holding a node's surrounding sentence window.
pub const WINDOW_METADATA_KEY: &str = "window";

/// Metadata key holding a node's original sentence.
pub const ORIGINAL_TEXT_METADATA_KEY: &str = "original_text";

/// A source document containing text content and metadata.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct Document {
    /// Unique identifier for the document.
    pub id: String,
    /// The text content of the document.
    pub text: String,
    /// Key-value metadata associated with the document.
    pub metadata: HashMap<String, String>,
    /// Optional URI pointing to the original source.
    #[serde(skip_serializing_if = "Option::is_none")]
    pub source_uri: Option<String>,
}

impl Document {
    /// Create a document with no metadata.
    pub fn new(id: impl Into<String>, text: impl Into<String>) -> Self {
        Self { id: id.into(), text: text.into(), metadata: HashMap::new(), source_uri: None }
    }

    pub fn with_metadata(mut self, key: impl Into<String>, value: impl Into<String>) -> Self {
        self.metadata.insert(key.into(), value.into());
        self
    }

    pub fn with_source_uri(mut self, uri: impl Into<String>) -> Self {
        self.source_uri = Some(uri.into());
        self
    }
}

/// One sentence of a [`Document`] with its surrounding window.
///
/// `text` is the original sentence and is what gets embedded. The window is
/// stored under [`WINDOW_METADATA_KEY`] and the sentence again under
/// [`ORIGINAL_TEXT_METADATA_KEY`], next to the parent document's metadata.
#[derive(Debug, Clone, Serialize, Deserialize, PartialEq)]
pub struct SentenceWindowNode {
    /// Unique identifier, `{document_id}_{sentence_index}`.
    pub id: String,
    /// The node's content; the original sentence until metadata replacement.
    pub text: String,
    /// The vector embedding of the original sentence.
    pub embedding: Vec<f32>,
    /// Parent document metadata plus the window and original-text keys.
    pub metadata: HashMap<String, String>,
    /// The ID of the parent [`Document`].
    pub document_id: String,
}

impl SentenceWindowNode {
    /// The stored sentence window, if present.
    pub fn window(&self) -> Option<&str> {
        self.metadata.get(WINDOW_METADATA_KEY).map(String::as_str)
    }

    /// The stored original sentence, if present.
    pub fn original_text(&self) -> Option<&str> {
        self.metadata.get(ORIGINAL_TEXT_METADATA_KEY).map(String::as_str)
    }
}

/// A retrieved [`SentenceWindowNode`] paired with a relevance score.
#[derive(Debug, Clone, Serialize, Deserialize)]
pub struct SearchResult {
    /// The retrieved node.
    pub node: SentenceWindowNode,
    /// The relevance score (higher is more relevant).
    pub score: f32,
}
