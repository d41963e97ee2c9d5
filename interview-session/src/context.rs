//! Context resolution strategies for reference answers.
//!
//! Two strategies are available and chosen by [`ContextStrategy`]:
//!
//! - [`KeywordContextResolver`] - a cheap keyword heuristic over raw CV and
//!   reference sentences; needs no index
//! - [`RetrieverContextResolver`] - the full retriever pipeline

use std::fmt;
use std::str::FromStr;
use std::sync::Arc;

use async_trait::async_trait;
use interview_rag::{Document, Retriever};
use tracing::debug;

use crate::error::{Result, SessionError};

/// Character sentences are split on by the keyword heuristic.
pub const SENTENCE_TERMINATOR: char = '.';

/// Separator placed between selected sentences.
pub const CONTEXT_SEPARATOR: &str = ". ";

/// Only the first this-many candidate sentences are scanned for keywords.
pub const CANDIDATE_POOL_LIMIT: usize = 40;

/// At most this many matching sentences are kept.
pub const MAX_MATCHED_SENTENCES: usize = 8;

/// Sentences used when no candidate matches any keyword.
pub const FALLBACK_SENTENCES: usize = 10;

/// Which context resolver a session uses.
#[derive(Debug, Clone, Copy, Default, PartialEq, Eq)]
pub enum ContextStrategy {
    /// [`KeywordContextResolver`].
    #[default]
    KeywordHeuristic,
    /// [`RetrieverContextResolver`].
    Retriever,
}

impl FromStr for ContextStrategy {
    type Err = SessionError;

    fn from_str(s: &str) -> Result<Self> {
        match s.trim().to_ascii_lowercase().as_str() {
            "keyword" | "heuristic" | "keyword-heuristic" => Ok(Self::KeywordHeuristic),
            "retriever" | "retrieval" => Ok(Self::Retriever),
            other => Err(SessionError::Config(format!(
                "unknown context strategy `{other}` (expected `keyword` or `retriever`)"
            ))),
        }
    }
}

impl fmt::Display for ContextStrategy {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        match self {
            Self::KeywordHeuristic => f.write_str("keyword"),
            Self::Retriever => f.write_str("retriever"),
        }
    }
}

/// Resolves the grounding context for one interview question.
#[async_trait]
pub trait ContextResolver: Send + Sync {
    fn strategy(&self) -> ContextStrategy;

    async fn resolve(&self, question: &str) -> Result<String>;
}

/// Keyword heuristic over CV and reference sentences.
///
/// The candidate pool is every sentence of the CV followed by every sentence
/// of each reference document, split on [`SENTENCE_TERMINATOR`]. Among the
/// first [`CANDIDATE_POOL_LIMIT`] candidates, a sentence is kept when it
/// contains (case-insensitively) any whitespace-separated token of the
/// question; at most [`MAX_MATCHED_SENTENCES`] are kept. With no match the
/// first [`FALLBACK_SENTENCES`] candidates are used instead.
#[derive(Debug, Clone)]
pub struct KeywordContextResolver {
    candidates: Vec<String>,
}

impl KeywordContextResolver {
    pub fn new(cv_text: &str, reference_documents: &[Document]) -> Self {
        let candidates = std::iter::once(cv_text)
            .chain(reference_documents.iter().map(|d| d.text.as_str()))
            .flat_map(|text| text.split(SENTENCE_TERMINATOR))
            .map(str::trim)
            .filter(|s| !s.is_empty())
            .map(str::to_string)
            .collect();
        Self { candidates }
    }

    /// The full candidate pool, CV sentences first.
    pub fn candidates(&self) -> &[String] {
        &self.candidates
    }

    /// Run the heuristic without going through the async trait.
    pub fn select(&self, question: &str) -> String {
        let lowered = question.to_lowercase();
        let keywords: Vec<&str> = lowered.split_whitespace().collect();

        let matched: Vec<&str> = self
            .candidates
            .iter()
            .take(CANDIDATE_POOL_LIMIT)
            .filter(|sentence| {
                let sentence = sentence.to_lowercase();
                keywords.iter().any(|k| sentence.contains(k))
            })
            .take(MAX_MATCHED_SENTENCES)
            .map(String::as_str)
            .collect();

        if matched.is_empty() {
            debug!(
                candidate_count = self.candidates.len(),
                "no keyword match, using leading sentences"
            );
            return self
                .candidates
                .iter()
                .take(FALLBACK_SENTENCES)
                .map(String::as_str)
                .collect::<Vec<_>>()
                .join(CONTEXT_SEPARATOR);
        }

        debug!(matched_count = matched.len(), "keyword context resolved");
        matched.join(CONTEXT_SEPARATOR)
    }
}

#[async_trait]
impl ContextResolver for KeywordContextResolver {
    fn strategy(&self) -> ContextStrategy {
        ContextStrategy::KeywordHeuristic
    }

    async fn resolve(&self, question: &str) -> Result<String> {
        Ok(self.select(question))
    }
}

/// Context from the full retrieval pipeline, one retrieved line per line.
pub struct RetrieverContextResolver {
    retriever: Arc<dyn Retriever>,
}

impl RetrieverContextResolver {
    pub fn new(retriever: Arc<dyn Retriever>) -> Self {
        Self { retriever }
    }
}

#[async_trait]
impl ContextResolver for RetrieverContextResolver {
    fn strategy(&self) -> ContextStrategy {
        ContextStrategy::Retriever
    }

    async fn resolve(&self, question: &str) -> Result<String> {
        Ok(self.retriever.query(question).await?.join("\n"))
    }
}
