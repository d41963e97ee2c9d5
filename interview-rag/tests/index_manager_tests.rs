//! Build-vs-load behaviour of the index manager.

use std::fs;
use std::sync::Arc;
use std::sync::atomic::{AtomicUsize, Ordering};

use async_trait::async_trait;
use interview_rag::index::INDEX_FILE_NAME;
use interview_rag::{
    Document, EmbeddingProvider, HashEmbeddingProvider, IndexManager, RagError,
    SentenceWindowNodeParser,
};

/// Wraps the hash embedder and counts how many texts it embedded.
struct CountingEmbedder {
    inner: HashEmbeddingProvider,
    embedded: AtomicUsize,
}

impl CountingEmbedder {
    fn new(dimensions: usize) -> Self {
        Self::named("test/hash", dimensions)
    }

    fn named(model_id: &str, dimensions: usize) -> Self {
        Self {
            inner: HashEmbeddingProvider::new(model_id, dimensions).unwrap(),
            embedded: AtomicUsize::new(0),
        }
    }

    fn embedded(&self) -> usize {
        self.embedded.load(Ordering::SeqCst)
    }
}

#[async_trait]
impl EmbeddingProvider for CountingEmbedder {
    async fn embed(&self, text: &str) -> interview_rag::Result<Vec<f32>> {
        self.embedded.fetch_add(1, Ordering::SeqCst);
        self.inner.embed(text).await
    }

    fn dimensions(&self) -> usize {
        self.inner.dimensions()
    }

    fn model_id(&self) -> &str {
        self.inner.model_id()
    }
}

fn documents() -> Vec<Document> {
    vec![
        Document::new(
            "ref",
            "Distributed systems require consensus protocols. Raft elects a leader.",
        ),
        Document::new("notes", "Paxos is older than Raft. Both tolerate crash faults."),
    ]
}

#[tokio::test]
async fn second_call_loads_without_embedding() {
    let dir = tempfile::tempdir().unwrap();
    let embedder = Arc::new(CountingEmbedder::new(64));
    let manager = IndexManager::new(embedder.clone(), SentenceWindowNodeParser::new(1));

    let built = manager.build_or_load(&documents(), dir.path()).await.unwrap();
    let after_build = embedder.embedded();
    assert_eq!(after_build, 4);
    assert!(dir.path().join(INDEX_FILE_NAME).exists());

    let loaded = manager.build_or_load(&documents(), dir.path()).await.unwrap();
    assert_eq!(embedder.embedded(), after_build, "load path must not embed");
    assert_eq!(loaded, built);
}

#[tokio::test]
async fn index_from_other_documents_is_loaded_silently() {
    let dir = tempfile::tempdir().unwrap();
    let manager =
        IndexManager::new(Arc::new(CountingEmbedder::new(32)), SentenceWindowNodeParser::new(1));
    manager.build_or_load(&documents(), dir.path()).await.unwrap();

    let other = vec![Document::new("other", "Completely unrelated text.")];
    let loaded = manager.build_or_load(&other, dir.path()).await.unwrap();
    assert!(loaded.nodes().iter().all(|n| n.document_id != "other"));
}

#[tokio::test]
async fn corrupted_index_is_rebuilt_and_rewritten() {
    let dir = tempfile::tempdir().unwrap();
    fs::write(dir.path().join(INDEX_FILE_NAME), b"garbage").unwrap();

    let embedder = Arc::new(CountingEmbedder::new(32));
    let manager = IndexManager::new(embedder.clone(), SentenceWindowNodeParser::new(2));
    let index = manager.build_or_load(&documents(), dir.path()).await.unwrap();

    assert_eq!(index.len(), 4);
    assert_eq!(embedder.embedded(), 4);
    let raw = fs::read_to_string(dir.path().join(INDEX_FILE_NAME)).unwrap();
    assert!(raw.contains("consensus protocols"));
}

#[tokio::test]
async fn missing_directory_is_created_on_rebuild() {
    let dir = tempfile::tempdir().unwrap();
    let persist_dir = dir.path().join("nested").join(".sentence_index");
    let manager =
        IndexManager::new(Arc::new(CountingEmbedder::new(16)), SentenceWindowNodeParser::new(5));

    manager.build_or_load(&documents(), &persist_dir).await.unwrap();
    assert!(persist_dir.join(INDEX_FILE_NAME).exists());
}

#[tokio::test]
async fn dimension_mismatch_forces_rebuild() {
    let dir = tempfile::tempdir().unwrap();
    IndexManager::new(Arc::new(CountingEmbedder::new(16)), SentenceWindowNodeParser::new(1))
        .build_or_load(&documents(), dir.path())
        .await
        .unwrap();

    let wider = Arc::new(CountingEmbedder::new(48));
    let index = IndexManager::new(wider.clone(), SentenceWindowNodeParser::new(1))
        .build_or_load(&documents(), dir.path())
        .await
        .unwrap();
    assert_eq!(index.dimensions(), 48);
    assert_eq!(wider.embedded(), 4);
}

#[tokio::test]
async fn index_from_another_embedding_model_is_rebuilt() {
    let dir = tempfile::tempdir().unwrap();
    IndexManager::new(
        Arc::new(CountingEmbedder::named("hash/fnv1a", 384)),
        SentenceWindowNodeParser::new(1),
    )
    .build_or_load(&documents(), dir.path())
    .await
    .unwrap();

    let bge = Arc::new(CountingEmbedder::named("BAAI/bge-small-en-v1.5", 384));
    let manager = IndexManager::new(bge.clone(), SentenceWindowNodeParser::new(1));
    assert!(matches!(manager.load(dir.path()), Err(RagError::IndexError { .. })));

    let index = manager.build_or_load(&documents(), dir.path()).await.unwrap();
    assert_eq!(index.embedding_model(), "BAAI/bge-small-en-v1.5");
    assert_eq!(bge.embedded(), 4);

    let reloaded = manager.build_or_load(&documents(), dir.path()).await.unwrap();
    assert_eq!(reloaded, index);
    assert_eq!(bge.embedded(), 4);
}

#[tokio::test]
async fn empty_document_set_is_rejected_without_writing() {
    let dir = tempfile::tempdir().unwrap();
    let manager =
        IndexManager::new(Arc::new(CountingEmbedder::new(16)), SentenceWindowNodeParser::new(1));

    let err = manager.build_or_load(&[], dir.path()).await.unwrap_err();
    assert!(matches!(err, RagError::EmptyDocumentSet));

    let blank = vec![Document::new("blank", "   \n  ")];
    let err = manager.build_or_load(&blank, dir.path()).await.unwrap_err();
    assert!(matches!(err, RagError::EmptyDocumentSet));
    assert!(!dir.path().join(INDEX_FILE_NAME).exists());
}
