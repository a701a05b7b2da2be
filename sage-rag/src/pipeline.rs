//! Retrieval pipeline orchestrator.
//!
//! [`RagPipeline`] coordinates the two flows of the system:
//!
//! - **index build**: documents → chunk → embed → [`VectorStore::rebuild`]
//! - **query**: question → embed → [`VectorStore::search`] → ranked chunks
//!
//! Construct one via [`RagPipeline::builder()`].

use std::sync::Arc;
use std::time::{Duration, Instant};

use tracing::{error, info};

use crate::chunking::{Chunker, RecursiveChunker};
use crate::config::RagConfig;
use crate::document::{Document, SearchResult};
use crate::embedding::EmbeddingProvider;
use crate::error::{RagError, Result};
use crate::vectorstore::VectorStore;

/// Counts and timing reported by a completed index build.
#[derive(Debug, Clone, PartialEq)]
pub struct BuildReport {
    /// Number of input documents (pages count individually).
    pub documents: usize,
    /// Number of chunks embedded and stored.
    pub chunks: usize,
    /// Wall-clock duration of the whole build.
    pub elapsed: Duration,
}

/// The retrieval pipeline.
///
/// Composes a [`Chunker`], an [`EmbeddingProvider`], and a [`VectorStore`]
/// behind the two operations the rest of the system needs:
/// [`rebuild_index`](RagPipeline::rebuild_index) and
/// [`retrieve`](RagPipeline::retrieve). Query embeddings are recomputed on
/// every call; with a single interactive user there is nothing worth
/// caching.
pub struct RagPipeline {
    config: RagConfig,
    embedding_provider: Arc<dyn EmbeddingProvider>,
    vector_store: Arc<dyn VectorStore>,
    chunker: Arc<dyn Chunker>,
}

impl std::fmt::Debug for RagPipeline {
    fn fmt(&self, f: &mut std::fmt::Formatter<'_>) -> std::fmt::Result {
        f.debug_struct("RagPipeline")
            .field("config", &self.config)
            .finish_non_exhaustive()
    }
}

impl RagPipeline {
    /// Create a new [`RagPipelineBuilder`].
    pub fn builder() -> RagPipelineBuilder {
        RagPipelineBuilder::default()
    }

    /// Return a reference to the pipeline configuration.
    pub fn config(&self) -> &RagConfig {
        &self.config
    }

    /// Return a reference to the vector store.
    pub fn vector_store(&self) -> &Arc<dyn VectorStore> {
        &self.vector_store
    }

    /// Rebuild the index from scratch: chunk → embed → swap in the new
    /// generation. The previous generation is replaced wholesale; there is
    /// no incremental path.
    ///
    /// # Errors
    ///
    /// [`RagError::EmptyInput`] when `documents` is empty;
    /// [`RagError::Pipeline`] when embedding or storage fails, with the
    /// failing step named in the message.
    pub async fn rebuild_index(&self, documents: &[Document]) -> Result<BuildReport> {
        let started = Instant::now();

        let mut chunks = self.chunker.chunk(documents)?;
        if chunks.is_empty() {
            // Non-empty input that chunked to nothing means every document
            // was blank, which is not the same failure as an empty input set.
            return Err(RagError::Pipeline(
                "documents contained no chunkable text".to_string(),
            ));
        }
        info!(documents = documents.len(), chunks = chunks.len(), "chunked documents");

        let texts: Vec<&str> = chunks.iter().map(|c| c.text.as_str()).collect();
        let embeddings = self.embedding_provider.embed_batch(&texts).await.map_err(|e| {
            error!(error = %e, "embedding failed during index build");
            RagError::Pipeline(format!("embedding failed during index build: {e}"))
        })?;

        for (chunk, embedding) in chunks.iter_mut().zip(embeddings) {
            chunk.embedding = embedding;
        }

        self.vector_store.rebuild(&chunks).await.map_err(|e| {
            error!(error = %e, "store rebuild failed during index build");
            RagError::Pipeline(format!("store rebuild failed: {e}"))
        })?;

        let report = BuildReport {
            documents: documents.len(),
            chunks: chunks.len(),
            elapsed: started.elapsed(),
        };
        info!(
            documents = report.documents,
            chunks = report.chunks,
            elapsed_ms = report.elapsed.as_millis() as u64,
            "index build complete"
        );
        Ok(report)
    }

    /// Retrieve the configured `top_k` most similar chunks for a query.
    ///
    /// Results are ordered by descending similarity.
    pub async fn retrieve(&self, query: &str) -> Result<Vec<SearchResult>> {
        self.retrieve_with_limit(query, self.config.top_k).await
    }

    /// Retrieve with a caller-chosen `k`, overriding the configured value.
    ///
    /// A `k` larger than the index returns every entry, still ordered.
    pub async fn retrieve_with_limit(&self, query: &str, k: usize) -> Result<Vec<SearchResult>> {
        let query_embedding = self.embedding_provider.embed(query).await.map_err(|e| {
            error!(error = %e, "embedding failed during query");
            e
        })?;

        let results = self.vector_store.search(&query_embedding, k).await?;
        info!(result_count = results.len(), "retrieval completed");
        Ok(results)
    }
}

/// Builder for constructing a [`RagPipeline`].
///
/// `config`, `embedding_provider`, and `vector_store` are required; the
/// chunker defaults to a [`RecursiveChunker`] driven by the config's
/// `chunk_size`/`chunk_overlap`.
#[derive(Default)]
pub struct RagPipelineBuilder {
    config: Option<RagConfig>,
    embedding_provider: Option<Arc<dyn EmbeddingProvider>>,
    vector_store: Option<Arc<dyn VectorStore>>,
    chunker: Option<Arc<dyn Chunker>>,
}

impl RagPipelineBuilder {
    /// Set the pipeline configuration.
    pub fn config(mut self, config: RagConfig) -> Self {
        self.config = Some(config);
        self
    }

    /// Set the embedding provider.
    pub fn embedding_provider(mut self, provider: Arc<dyn EmbeddingProvider>) -> Self {
        self.embedding_provider = Some(provider);
        self
    }

    /// Set the vector store backend.
    pub fn vector_store(mut self, store: Arc<dyn VectorStore>) -> Self {
        self.vector_store = Some(store);
        self
    }

    /// Override the default chunker.
    pub fn chunker(mut self, chunker: Arc<dyn Chunker>) -> Self {
        self.chunker = Some(chunker);
        self
    }

    /// Build the [`RagPipeline`], validating that required fields are set.
    ///
    /// # Errors
    ///
    /// Returns [`RagError::Config`] if any required field is missing.
    pub fn build(self) -> Result<RagPipeline> {
        let config =
            self.config.ok_or_else(|| RagError::Config("config is required".to_string()))?;
        let embedding_provider = self
            .embedding_provider
            .ok_or_else(|| RagError::Config("embedding_provider is required".to_string()))?;
        let vector_store = self
            .vector_store
            .ok_or_else(|| RagError::Config("vector_store is required".to_string()))?;
        let chunker = self.chunker.unwrap_or_else(|| {
            Arc::new(RecursiveChunker::new(config.chunk_size, config.chunk_overlap))
        });

        Ok(RagPipeline { config, embedding_provider, vector_store, chunker })
    }
}
