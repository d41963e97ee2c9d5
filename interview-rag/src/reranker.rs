//! Reranker trait for post-retrieval result reordering.

use std::collections::HashSet;

use async_trait::async_trait;

use crate::document::SearchResult;
use crate::error::Result;

/// A reranker that reorders search results by relevance to a query.
///
/// Rerankers score the full candidate list; truncation to the configured
/// top-N happens in the retriever.
#[async_trait]
pub trait Reranker: Send + Sync {
    /// Rerank search results given the original query.
    ///
    /// Returns results in a new order with updated scores.
    async fn rerank(&self, query: &str, results: Vec<SearchResult>) -> Result<Vec<SearchResult>>;
}

/// A no-op reranker that returns results unchanged.
#[derive(Debug, Clone, Copy, Default)]
pub struct NoOpReranker;

#[async_trait]
impl Reranker for NoOpReranker {
    async fn rerank(&self, _query: &str, results: Vec<SearchResult>) -> Result<Vec<SearchResult>> {
        Ok(results)
    }
}

/// A model-free cross scorer based on query term coverage.
///
/// Each candidate is scored jointly with the query as the fraction of
/// distinct query terms (longer than `min_term_len` characters) that occur in
/// the candidate text. Ties keep the incoming similarity order.
#[derive(Debug, Clone)]
pub struct LexicalReranker {
    min_term_len: usize,
}

impl Default for LexicalReranker {
    fn default() -> Self {
        Self { min_term_len: 2 }
    }
}

impl LexicalReranker {
    pub fn new(min_term_len: usize) -> Self {
        Self { min_term_len }
    }

    fn terms<'a>(&self, text: &'a str) -> impl Iterator<Item = String> + 'a {
        let min = self.min_term_len;
        text.split(|c: char| !c.is_alphanumeric())
            .filter(move |t| t.chars().count() > min)
            .map(str::to_lowercase)
    }
}

#[async_trait]
impl Reranker for LexicalReranker {
    async fn rerank(
        &self,
        query: &str,
        mut results: Vec<SearchResult>,
    ) -> Result<Vec<SearchResult>> {
        let query_terms: HashSet<String> = self.terms(query).collect();
        if query_terms.is_empty() {
            return Ok(results);
        }

        for result in &mut results {
            let node_terms: HashSet<String> = self.terms(&result.node.text).collect();
            let matched = query_terms.iter().filter(|t| node_terms.contains(*t)).count();
            result.score = matched as f32 / query_terms.len() as f32;
        }

        results.sort_by(|a, b| b.score.partial_cmp(&a.score).unwrap_or(std::cmp::Ordering::Equal));
        Ok(results)
    }
}
