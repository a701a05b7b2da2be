//! End-to-end pipeline tests with a deterministic embedding double.

use std::sync::Arc;

use async_trait::async_trait;
use sage_rag::document::Document;
use sage_rag::embedding::EmbeddingProvider;
use sage_rag::error::RagError;
use sage_rag::inmemory::InMemoryVectorStore;
use sage_rag::jsonfile::JsonFileVectorStore;
use sage_rag::vectorstore::VectorStore;
use sage_rag::{RagConfig, RagPipeline};

/// Deterministic hash-based embeddings: identical text maps to an
/// identical unit vector, so self-retrieval scores exactly 1.0.
struct HashEmbedder {
    dimensions: usize,
}

impl HashEmbedder {
    fn new(dimensions: usize) -> Self {
        Self { dimensions }
    }
}

#[async_trait]
impl EmbeddingProvider for HashEmbedder {
    async fn embed(&self, text: &str) -> sage_rag::Result<Vec<f32>> {
        let hash = text.bytes().fold(0u64, |acc, b| acc.wrapping_mul(31).wrapping_add(b as u64));
        let mut emb = vec![0.0f32; self.dimensions];
        for (i, v) in emb.iter_mut().enumerate() {
            *v = ((hash.wrapping_add(i as u64)) as f32).sin();
        }
        let norm: f32 = emb.iter().map(|x| x * x).sum::<f32>().sqrt();
        if norm > 0.0 {
            emb.iter_mut().for_each(|x| *x /= norm);
        }
        Ok(emb)
    }

    fn dimensions(&self) -> usize {
        self.dimensions
    }
}

/// An embedder that always fails, for exercising the build error path.
struct FailingEmbedder;

#[async_trait]
impl EmbeddingProvider for FailingEmbedder {
    async fn embed(&self, _text: &str) -> sage_rag::Result<Vec<f32>> {
        Err(RagError::Embedding {
            provider: "Failing".into(),
            message: "backend is down".into(),
        })
    }

    fn dimensions(&self) -> usize {
        8
    }
}

fn pipeline_with_store(store: Arc<InMemoryVectorStore>) -> RagPipeline {
    RagPipeline::builder()
        .config(RagConfig::builder().chunk_size(120).chunk_overlap(20).top_k(3).build().unwrap())
        .embedding_provider(Arc::new(HashEmbedder::new(64)))
        .vector_store(store)
        .build()
        .unwrap()
}

fn sample_documents() -> Vec<Document> {
    vec![
        Document::new("rust.txt", "Rust achieves memory safety without a garbage collector."),
        Document::new("python.txt", "Python is an interpreted language used in data science."),
        Document::new("rag.txt", "Retrieval finds the chunks most similar to a question."),
    ]
}

#[tokio::test]
async fn build_then_self_retrieve_returns_the_matching_chunk() {
    let store = Arc::new(InMemoryVectorStore::new());
    let pipeline = pipeline_with_store(store);

    let report = pipeline.rebuild_index(&sample_documents()).await.unwrap();
    assert_eq!(report.documents, 3);
    assert_eq!(report.chunks, 3);

    // Each stored text, used as the query, retrieves itself first.
    for doc in sample_documents() {
        let results = pipeline.retrieve_with_limit(&doc.text, 1).await.unwrap();
        assert_eq!(results.len(), 1);
        assert_eq!(results[0].chunk.text, doc.text);
        assert!(results[0].score > 0.999);
    }
}

#[tokio::test]
async fn retrieve_uses_configured_top_k_and_caller_override() {
    let store = Arc::new(InMemoryVectorStore::new());
    let pipeline = pipeline_with_store(store);
    let docs: Vec<Document> = (0..10)
        .map(|i| Document::new(format!("doc{i}.txt"), format!("unique fact number {i}")))
        .collect();
    pipeline.rebuild_index(&docs).await.unwrap();

    let results = pipeline.retrieve("unique fact").await.unwrap();
    assert_eq!(results.len(), 3);
    for window in results.windows(2) {
        assert!(window[0].score >= window[1].score);
    }

    let results = pipeline.retrieve_with_limit("unique fact", 20).await.unwrap();
    assert_eq!(results.len(), 10);
}

#[tokio::test]
async fn retrieve_before_any_build_is_index_unavailable() {
    let store = Arc::new(InMemoryVectorStore::new());
    let pipeline = pipeline_with_store(store);

    let err = pipeline.retrieve("anything").await.unwrap_err();
    assert!(matches!(err, RagError::IndexUnavailable));
}

#[tokio::test]
async fn empty_document_set_fails_the_build() {
    let store = Arc::new(InMemoryVectorStore::new());
    let pipeline = pipeline_with_store(store);

    let err = pipeline.rebuild_index(&[]).await.unwrap_err();
    assert!(matches!(err, RagError::EmptyInput));
}

#[tokio::test]
async fn blank_documents_fail_the_build_distinctly() {
    let store = Arc::new(InMemoryVectorStore::new());
    let pipeline = pipeline_with_store(store);

    let docs = vec![Document::new("blank.txt", "   ")];
    let err = pipeline.rebuild_index(&docs).await.unwrap_err();
    assert!(matches!(err, RagError::Pipeline(_)));
}

#[tokio::test]
async fn embedding_failure_aborts_the_build_with_context() {
    let store = Arc::new(InMemoryVectorStore::new());
    let pipeline = RagPipeline::builder()
        .config(RagConfig::default())
        .embedding_provider(Arc::new(FailingEmbedder))
        .vector_store(store.clone())
        .build()
        .unwrap();

    let err = pipeline.rebuild_index(&sample_documents()).await.unwrap_err();
    assert!(matches!(err, RagError::Pipeline(_)));
    assert!(err.to_string().contains("embedding failed"));

    // The store was never touched: still in the never-built state.
    let err = store.count().await.unwrap_err();
    assert!(matches!(err, RagError::IndexUnavailable));
}

#[tokio::test]
async fn full_round_trip_through_the_persistent_store() {
    let dir = tempfile::tempdir().unwrap();
    let store = Arc::new(JsonFileVectorStore::open(dir.path()).unwrap());
    let pipeline = RagPipeline::builder()
        .config(RagConfig::builder().chunk_size(120).chunk_overlap(20).top_k(3).build().unwrap())
        .embedding_provider(Arc::new(HashEmbedder::new(64)))
        .vector_store(store)
        .build()
        .unwrap();

    pipeline.rebuild_index(&sample_documents()).await.unwrap();

    // A second pipeline over a fresh store handle reads the persisted
    // generation; the embedding function is shared, so the space matches.
    let reopened = Arc::new(JsonFileVectorStore::open(dir.path()).unwrap());
    let pipeline2 = RagPipeline::builder()
        .config(RagConfig::builder().chunk_size(120).chunk_overlap(20).top_k(3).build().unwrap())
        .embedding_provider(Arc::new(HashEmbedder::new(64)))
        .vector_store(reopened)
        .build()
        .unwrap();

    let results = pipeline2
        .retrieve_with_limit("Rust achieves memory safety without a garbage collector.", 1)
        .await
        .unwrap();
    assert_eq!(results[0].chunk.source, "rust.txt");
}

#[tokio::test]
async fn builder_rejects_missing_components() {
    let err = RagPipeline::builder().config(RagConfig::default()).build().unwrap_err();
    assert!(matches!(err, RagError::Config(_)));
}
