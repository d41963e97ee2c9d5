//! Sentence-window node parsing.
//!
//! Documents are split into sentences; each sentence becomes one
//! [`SentenceWindowNode`] whose metadata also carries the `window_size`
//! sentences on either side of it. Similarity search then matches single
//! sentences while retrieval can hand back the wider window.

use crate::document::{
    Document, ORIGINAL_TEXT_METADATA_KEY, SentenceWindowNode, WINDOW_METADATA_KEY,
};

/// A strategy for turning documents into indexable nodes.
///
/// Implementations produce nodes with text and metadata but no embeddings.
/// Embeddings are attached later by the [`IndexManager`](crate::IndexManager).
pub trait NodeParser: Send + Sync {
    /// Split a document into nodes.
    ///
    /// Returns an empty `Vec` if the document has no sentences.
    fn parse(&self, document: &Document) -> Vec<SentenceWindowNode>;
}

/// Splits documents into one node per sentence with a surrounding window.
///
/// # Example
///
/// ```rust
/// use interview_rag::{Document, NodeParser, SentenceWindowNodeParser};
///
/// let parser = SentenceWindowNodeParser::new(1);
/// let nodes = parser.parse(&Document::new("d", "One. Two. Three."));
/// assert_eq!(nodes[1].window(), Some("One. Two. Three."));
/// ```
#[derive(Debug, Clone)]
pub struct SentenceWindowNodeParser {
    window_size: usize,
    window_metadata_key: String,
    original_text_metadata_key: String,
}

impl SentenceWindowNodeParser {
    /// Create a parser keeping `window_size` sentences on each side.
    pub fn new(window_size: usize) -> Self {
        Self {
            window_size,
            window_metadata_key: WINDOW_METADATA_KEY.to_string(),
            original_text_metadata_key: ORIGINAL_TEXT_METADATA_KEY.to_string(),
        }
    }

    pub fn with_window_metadata_key(mut self, key: impl Into<String>) -> Self {
        self.window_metadata_key = key.into();
        self
    }

    pub fn with_original_text_metadata_key(mut self, key: impl Into<String>) -> Self {
        self.original_text_metadata_key = key.into();
        self
    }

    pub fn window_size(&self) -> usize {
        self.window_size
    }

    pub fn window_metadata_key(&self) -> &str {
        &self.window_metadata_key
    }
}

impl NodeParser for SentenceWindowNodeParser {
    fn parse(&self, document: &Document) -> Vec<SentenceWindowNode> {
        let sentences = split_sentences(&document.text);
        let last = sentences.len().saturating_sub(1);

        sentences
            .iter()
            .enumerate()
            .map(|(i, sentence)| {
                let start = i.saturating_sub(self.window_size);
                let end = i.saturating_add(self.window_size).min(last);
                let window = sentences[start..=end].join(" ");

                let mut metadata = document.metadata.clone();
                metadata.insert(self.window_metadata_key.clone(), window);
                metadata.insert(self.original_text_metadata_key.clone(), sentence.clone());

                SentenceWindowNode {
                    id: format!("{}_{i}", document.id),
                    text: sentence.clone(),
                    embedding: Vec::new(),
                    metadata,
                    document_id: document.id.clone(),
                }
            })
            .collect()
    }
}

/// Split text into trimmed, non-empty sentences.
///
/// A sentence ends at `.`, `!` or `?` followed by whitespace or the end of
/// the text; the terminator stays with its sentence. Runs such as `...` or
/// `?!` end at their last character.
pub fn split_sentences(text: &str) -> Vec<String> {
    let mut sentences = Vec::new();
    let mut start = 0;
    let mut chars = text.char_indices().peekable();

    while let Some((pos, c)) = chars.next() {
        if !matches!(c, '.' | '!' | '?') {
            continue;
        }
        let at_boundary = chars.peek().is_none_or(|(_, next)| next.is_whitespace());
        if at_boundary {
            let end = pos + c.len_utf8();
            push_trimmed(&mut sentences, &text[start..end]);
            start = end;
        }
    }
    push_trimmed(&mut sentences, &text[start..]);

    sentences
}

fn push_trimmed(sentences: &mut Vec<String>, raw: &str) {
    let sentence = raw.trim();
    if !sentence.is_empty() {
        sentences.push(sentence.to_string());
    }
}
