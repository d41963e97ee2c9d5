//! Process configuration, read once at startup.

use std::fmt;
use std::path::PathBuf;
use std::str::FromStr;

use anyhow::{Context, Result};
use interview_model::GroqConfig;
use interview_model::groq::DEFAULT_GROQ_MODEL;
use interview_rag::RetrieverConfig;
use interview_rag::config::{
    DEFAULT_EMBEDDING_MODEL, DEFAULT_INDEX_DIR, DEFAULT_RERANK_TOP_N, DEFAULT_RERANKER_MODEL,
    DEFAULT_SIMILARITY_TOP_K, DEFAULT_WINDOW_SIZE,
};
use interview_session::ContextStrategy;

/// Settings for both entry points.
///
/// Built by [`AppConfig::from_env`] in `main` and passed down; nothing below
/// the binary reads the environment.
#[derive(Clone)]
pub struct AppConfig {
    pub groq_api_key: String,
    pub groq_model: String,
    pub embedding_model: String,
    pub reranker_model: String,
    pub sentence_window_size: usize,
    pub similarity_top_k: usize,
    pub rerank_top_n: usize,
    pub index_dir: PathBuf,
    pub context_strategy: ContextStrategy,
}

impl AppConfig {
    /// Load `.env` if present, then read the process environment.
    pub fn from_env() -> Result<Self> {
        dotenvy::dotenv().ok();
        Self::from_lookup(|key| std::env::var(key).ok())
    }

    /// Build from any key lookup; unset keys take their defaults.
    pub fn from_lookup(lookup: impl Fn(&str) -> Option<String>) -> Result<Self> {
        let text = |key: &str, default: &str| lookup(key).unwrap_or_else(|| default.to_string());

        Ok(Self {
            groq_api_key: text("GROQ_API_KEY", ""),
            groq_model: text("GROQ_MODEL", DEFAULT_GROQ_MODEL),
            embedding_model: text("EMBEDDING_MODEL", DEFAULT_EMBEDDING_MODEL),
            reranker_model: text("RERANKER_MODEL", DEFAULT_RERANKER_MODEL),
            sentence_window_size: parsed(&lookup, "SENTENCE_WINDOW_SIZE", DEFAULT_WINDOW_SIZE)?,
            similarity_top_k: parsed(&lookup, "SIMILARITY_TOP_K", DEFAULT_SIMILARITY_TOP_K)?,
            rerank_top_n: parsed(&lookup, "RERANK_TOP_N", DEFAULT_RERANK_TOP_N)?,
            index_dir: PathBuf::from(text("INDEX_DIR", DEFAULT_INDEX_DIR)),
            context_strategy: parsed(&lookup, "CONTEXT_STRATEGY", ContextStrategy::default())?,
        })
    }

    pub fn groq_config(&self) -> GroqConfig {
        GroqConfig::new(self.groq_api_key.clone(), self.groq_model.clone())
    }

    pub fn retriever_config(&self) -> Result<RetrieverConfig> {
        RetrieverConfig::builder()
            .embedding_model(self.embedding_model.clone())
            .reranker_model(self.reranker_model.clone())
            .window_size(self.sentence_window_size)
            .similarity_top_k(self.similarity_top_k)
            .rerank_top_n(self.rerank_top_n)
            .index_dir(self.index_dir.clone())
            .build()
            .context("invalid retrieval settings")
    }
}

impl fmt::Debug for AppConfig {
    fn fmt(&self, f: &mut fmt::Formatter<'_>) -> fmt::Result {
        f.debug_struct("AppConfig")
            .field(
                "groq_api_key",
                &if self.groq_api_key.is_empty() { "<unset>" } else { "<redacted>" },
            )
            .field("groq_model", &self.groq_model)
            .field("embedding_model", &self.embedding_model)
            .field("reranker_model", &self.reranker_model)
            .field("sentence_window_size", &self.sentence_window_size)
            .field("similarity_top_k", &self.similarity_top_k)
            .field("rerank_top_n", &self.rerank_top_n)
            .field("index_dir", &self.index_dir)
            .field("context_strategy", &self.context_strategy)
            .finish()
    }
}

fn parsed<T>(lookup: &impl Fn(&str) -> Option<String>, key: &str, default: T) -> Result<T>
where
    T: FromStr,
    T::Err: fmt::Display,
{
    match lookup(key) {
        None => Ok(default),
        Some(raw) => raw
            .trim()
            .parse()
            .map_err(|e| anyhow::anyhow!("{key} has invalid value `{raw}`: {e}")),
    }
}

#[cfg(test)]
mod tests {
    use std::collections::HashMap;

    use super::*;

    fn config_from(pairs: &[(&str, &str)]) -> Result<AppConfig> {
        let vars: HashMap<String, String> =
            pairs.iter().map(|(k, v)| (k.to_string(), v.to_string())).collect();
        AppConfig::from_lookup(|key| vars.get(key).cloned())
    }

    #[test]
    fn unset_keys_take_defaults() {
        let config = config_from(&[]).unwrap();
        assert_eq!(config.groq_api_key, "");
        assert_eq!(config.groq_model, "llama-3.3-70b-versatile");
        assert_eq!(config.embedding_model, "BAAI/bge-small-en-v1.5");
        assert_eq!(config.reranker_model, "BAAI/bge-reranker-base");
        assert_eq!(config.sentence_window_size, 5);
        assert_eq!(config.similarity_top_k, 6);
        assert_eq!(config.rerank_top_n, 2);
        assert_eq!(config.index_dir, PathBuf::from(".sentence_index"));
        assert_eq!(config.context_strategy, ContextStrategy::KeywordHeuristic);
    }

    #[test]
    fn values_are_read_and_parsed() {
        let config = config_from(&[
            ("GROQ_API_KEY", "gsk_test"),
            ("SIMILARITY_TOP_K", " 10 "),
            ("CONTEXT_STRATEGY", "retriever"),
            ("INDEX_DIR", "/tmp/idx"),
        ])
        .unwrap();
        assert_eq!(config.similarity_top_k, 10);
        assert_eq!(config.context_strategy, ContextStrategy::Retriever);
        assert_eq!(config.retriever_config().unwrap().index_dir, PathBuf::from("/tmp/idx"));
    }

    #[test]
    fn non_numeric_value_is_an_error() {
        let err = config_from(&[("RERANK_TOP_N", "two")]).unwrap_err();
        assert!(err.to_string().contains("RERANK_TOP_N"));
    }

    #[test]
    fn inconsistent_retrieval_settings_are_rejected() {
        let config = config_from(&[("SIMILARITY_TOP_K", "1"), ("RERANK_TOP_N", "3")]).unwrap();
        assert!(config.retriever_config().is_err());
    }

    #[test]
    fn debug_output_hides_the_api_key() {
        let config = config_from(&[("GROQ_API_KEY", "gsk_secret")]).unwrap();
        assert!(!format!("{config:?}").contains("gsk_secret"));
    }
}
